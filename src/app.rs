use std::collections::VecDeque;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::{Duration, Instant};

use tracing::{info, warn};

use crate::config::{Config, nearest_question_count};
use crate::engine::adaptation::{AdaptationBridge, AdaptationNotice};
use crate::engine::advisor::{DifficultyAdvisor, build_advisor};
use crate::generator::category::MathCategory;
use crate::session::machine::Session;
use crate::session::report::SessionReport;
use crate::session::state::{
    DifficultyLevel, Phase, PowerUp, QUESTION_COUNTS, SessionState, TICK_MS,
};
use crate::store::json_store::JsonStore;
use crate::store::schema::{ProfileData, SessionHistoryData};
use crate::ui::components::category_menu::CategoryMenu;
use crate::ui::theme::Theme;

const NOTICE_TTL: Duration = Duration::from_secs(4);

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AppScreen {
    /// Whatever the session phase calls for.
    Session,
    Shop,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PreConfigField {
    Level,
    Questions,
}

pub struct Notice {
    pub text: String,
    pub expires_at: Instant,
}

pub struct App {
    pub screen: AppScreen,
    pub session: Session,
    pub bridge: AdaptationBridge,
    pub config: Config,
    /// Where chosen settings are written back; `None` keeps them in memory.
    pub config_path: Option<PathBuf>,
    pub profile: ProfileData,
    pub history: SessionHistoryData,
    pub store: Option<JsonStore>,
    pub theme: &'static Theme,
    pub category_menu: CategoryMenu,
    pub level: DifficultyLevel,
    pub question_count: usize,
    pub pre_config_field: PreConfigField,
    pub selected_option: usize,
    pub shop_selected: usize,
    pub notices: VecDeque<Notice>,
    pub last_report: Option<SessionReport>,
    pub should_quit: bool,
    last_tick: Instant,
}

impl App {
    pub fn new(config: Config, seed: Option<u64>) -> Self {
        let theme: &'static Theme = Box::leak(Box::new(Theme::load_or_default(&config.theme)));
        let store = match JsonStore::new() {
            Ok(store) => Some(store),
            Err(e) => {
                warn!(error = %e, "profile storage unavailable, progress will not be saved");
                None
            }
        };
        let advisor = build_advisor(config.advisor_url.as_deref(), config.advisor_timeout_secs);
        let session = match seed {
            Some(seed) => Session::seeded(seed),
            None => Session::from_entropy(),
        };
        let mut app = Self::with_parts(config, store, advisor, session, theme);
        app.config_path = Some(Config::path());
        app
    }

    pub fn with_parts(
        config: Config,
        store: Option<JsonStore>,
        advisor: Arc<dyn DifficultyAdvisor>,
        session: Session,
        theme: &'static Theme,
    ) -> Self {
        let (profile, history) = match &store {
            Some(s) => (s.load_profile(), s.load_history()),
            None => (ProfileData::default(), SessionHistoryData::default()),
        };
        Self {
            screen: AppScreen::Session,
            session,
            bridge: AdaptationBridge::new(advisor),
            level: config.difficulty_level,
            question_count: nearest_question_count(config.question_count),
            config,
            config_path: None,
            profile,
            history,
            store,
            theme,
            category_menu: CategoryMenu::new(),
            pre_config_field: PreConfigField::Level,
            selected_option: 0,
            shop_selected: 0,
            notices: VecDeque::new(),
            last_report: None,
            should_quit: false,
            last_tick: Instant::now(),
        }
    }

    pub fn state(&self) -> &SessionState {
        self.session.state()
    }

    pub fn notify(&mut self, text: impl Into<String>) {
        self.notices.push_back(Notice {
            text: text.into(),
            expires_at: Instant::now() + NOTICE_TTL,
        });
        while self.notices.len() > 3 {
            self.notices.pop_front();
        }
    }

    /// Follow-up work after any session transition.
    fn after_transition(&mut self, prev: SessionState) {
        self.bridge.observe(&prev, self.session.state());
        let next = self.session.state();
        if next.current_question_index != prev.current_question_index {
            self.selected_option = 0;
        }
        if prev.phase != Phase::Summary && next.phase == Phase::Summary {
            self.finish_session();
        }
    }

    /// Advance the session clock by whole ticks since the last call and
    /// collect any advisory replies.
    pub fn on_tick(&mut self, now: Instant) {
        let elapsed = now.saturating_duration_since(self.last_tick).as_millis() as u64;
        let steps = elapsed / TICK_MS;
        for _ in 0..steps {
            let prev = self.session.tick(TICK_MS, now);
            self.after_transition(prev);
        }
        self.last_tick += Duration::from_millis(steps * TICK_MS);

        for notice in self.bridge.poll(&mut self.session) {
            self.notify(notice.message());
        }
        let reviews = self.bridge.poll_profile(&mut self.profile);
        self.apply_profile_reviews(reviews);
        self.notices.retain(|n| n.expires_at > now);
    }

    pub fn select_category(&mut self, category: MathCategory) {
        let prev = self.session.select_category(category);
        self.pre_config_field = PreConfigField::Level;
        self.after_transition(prev);
    }

    pub fn select_highlighted_category(&mut self) {
        let category = self.category_menu.selected_category();
        self.select_category(category);
    }

    pub fn back_to_config(&mut self) {
        let prev = self.session.back_to_config();
        self.after_transition(prev);
    }

    pub fn start_game(&mut self) {
        self.remember_settings();
        let prev = self
            .session
            .start_configured_game(self.level, self.question_count);
        self.last_tick = Instant::now();
        self.selected_option = 0;
        self.last_report = None;
        self.after_transition(prev);
    }

    /// Keep the chosen level and length as the defaults for next launch.
    fn remember_settings(&mut self) {
        if self.config.difficulty_level == self.level
            && self.config.question_count == self.question_count
        {
            return;
        }
        self.config.difficulty_level = self.level;
        self.config.question_count = self.question_count;
        let Some(path) = &self.config_path else {
            return;
        };
        // Only the picker values change on disk so one-off command-line
        // overrides stay out of the file.
        let saved = Config::load_from(path).and_then(|mut on_disk| {
            on_disk.difficulty_level = self.level;
            on_disk.question_count = self.question_count;
            on_disk.save_to(path)
        });
        if let Err(e) = saved {
            warn!(error = %e, path = %path.display(), "failed to save config");
        }
    }

    pub fn cycle_level(&mut self, forward: bool) {
        let all = DifficultyLevel::ALL;
        let idx = all.iter().position(|&l| l == self.level).unwrap_or(0);
        self.level = all[cycle(idx, all.len(), forward)];
    }

    pub fn cycle_question_count(&mut self, forward: bool) {
        let idx = QUESTION_COUNTS
            .iter()
            .position(|&n| n == self.question_count)
            .unwrap_or(0);
        self.question_count = QUESTION_COUNTS[cycle(idx, QUESTION_COUNTS.len(), forward)];
    }

    pub fn move_option(&mut self, forward: bool) {
        let count = self
            .state()
            .current_challenge
            .as_ref()
            .map(|c| c.options.len())
            .unwrap_or(0);
        if count > 0 {
            self.selected_option = cycle(self.selected_option, count, forward);
        }
    }

    pub fn submit_option(&mut self, index: usize) {
        let Some(answer) = self
            .state()
            .current_challenge
            .as_ref()
            .and_then(|c| c.options.get(index))
            .map(|o| o.text())
        else {
            return;
        };
        self.selected_option = index;
        let prev = self.session.submit_answer(&answer, Instant::now());
        self.after_transition(prev);
    }

    pub fn submit_selected(&mut self) {
        self.submit_option(self.selected_option);
    }

    /// Spend one unit of `power_up` if the player owns one and it applies.
    pub fn use_power_up(&mut self, power_up: PowerUp) {
        if self.state().phase != Phase::Solve {
            return;
        }
        if self.profile.inventory.count(power_up) == 0 {
            self.notify(format!("You don't have any {}. Visit the shop!", power_up.label()));
            return;
        }
        if !self.session.use_power_up(power_up) {
            return;
        }
        self.profile.inventory.take(power_up);
        self.notify(format!("{} activated!", power_up.label()));
        self.save_profile();
    }

    pub fn end_game(&mut self) {
        let prev = self.session.end_game();
        self.after_transition(prev);
    }

    /// Leave the summary (or an abandoned session) for the category list.
    pub fn reset_to_menu(&mut self) {
        let prev = self.session.reset_game();
        self.screen = AppScreen::Session;
        self.after_transition(prev);
    }

    /// Replay the finished category with the same level and length.
    pub fn play_again(&mut self) {
        let Some(category) = self.state().category else {
            self.reset_to_menu();
            return;
        };
        self.reset_to_menu();
        self.select_category(category);
        self.start_game();
    }

    fn finish_session(&mut self) {
        let state = self.session.state();
        if state.history.is_empty() {
            // Nothing answered: nothing worth recording.
            info!("session ended without answers");
            self.reset_to_menu();
            return;
        }
        let report = SessionReport::from_state(state);
        match &self.store {
            Some(store) => {
                if let Err(e) = store.record_session(&mut self.profile, &report) {
                    warn!(error = %e, "failed to save session");
                    self.notify("Could not save your progress.");
                }
            }
            None => self.profile.apply_report(&report),
        }
        self.bridge.review_profile(&report, self.profile.difficulty);
        self.history.sessions.push(report.clone());
        self.last_report = Some(report);
    }

    /// Surface end-of-session reviews and persist any new difficulty.
    fn apply_profile_reviews(&mut self, reviews: Vec<AdaptationNotice>) {
        if reviews.is_empty() {
            return;
        }
        let changed = reviews
            .iter()
            .any(|n| matches!(n, AdaptationNotice::Adjusted { .. }));
        for notice in reviews {
            self.notify(notice.message());
        }
        if changed {
            self.save_profile();
        }
    }

    pub fn open_shop(&mut self) {
        if self.state().phase == Phase::Config {
            self.screen = AppScreen::Shop;
        }
    }

    pub fn close_shop(&mut self) {
        self.screen = AppScreen::Session;
    }

    pub fn purchase_selected(&mut self) {
        let power_up = PowerUp::ALL[self.shop_selected.min(PowerUp::ALL.len() - 1)];
        match self.profile.purchase(power_up) {
            Ok(()) => {
                info!(item = power_up.label(), coins = self.profile.coins, "purchased");
                self.notify(format!("Purchased {}!", power_up.label()));
                self.save_profile();
            }
            Err(e) => self.notify(e.to_string()),
        }
    }

    pub fn move_shop(&mut self, forward: bool) {
        self.shop_selected = cycle(self.shop_selected, PowerUp::ALL.len(), forward);
    }

    fn save_profile(&mut self) {
        if let Some(store) = &self.store
            && let Err(e) = store.save_profile(&self.profile)
        {
            warn!(error = %e, "failed to save profile");
        }
    }

    /// Wait briefly for in-flight advice so late replies are logged and a
    /// pending profile review still reaches disk.
    pub fn shutdown(&mut self) {
        if self.bridge.pending() > 0 {
            let _ = self.bridge.wait(&mut self.session, Duration::from_millis(200));
        }
        if self.bridge.pending() > 0
            && let Some(notice) = self
                .bridge
                .wait_profile(&mut self.profile, Duration::from_millis(200))
        {
            self.apply_profile_reviews(vec![notice]);
        }
    }
}

fn cycle(idx: usize, len: usize, forward: bool) -> usize {
    if forward {
        (idx + 1) % len
    } else if idx == 0 {
        len - 1
    } else {
        idx - 1
    }
}
