mod app;
mod config;
mod engine;
mod event;
mod generator;
mod session;
mod store;
mod ui;

use std::fs::{self, OpenOptions};
use std::io;
use std::path::PathBuf;
use std::sync::Mutex;
use std::time::{Duration, Instant};

use anyhow::Result;
use clap::Parser;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use crossterm::execute;
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;
use ratatui::layout::{Alignment, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Paragraph};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use app::{App, AppScreen, PreConfigField};
use config::Config;
use engine::adaptation::MAX_DIFFICULTY;
use event::{AppEvent, EventHandler};
use generator::category::MathCategory;
use session::state::{DifficultyLevel, Phase, PowerUp, TICK_MS};
use ui::components::challenge_view::ChallengeView;
use ui::components::pre_config::PreConfig;
use ui::components::shop::Shop;
use ui::components::summary::Summary;
use ui::layout::{AppLayout, centered_rect, pack_hint_lines};

#[derive(Parser)]
#[command(name = "mathdash", version, about = "Terminal math sprints with adaptive difficulty")]
struct Cli {
    #[arg(short, long, help = "Theme name")]
    theme: Option<String>,

    #[arg(short, long, help = "Difficulty level (easy, medium, hard)")]
    level: Option<String>,

    #[arg(short, long, help = "Questions per session (10, 20, 30 or 50)")]
    questions: Option<usize>,

    #[arg(short, long, help = "Skip the menu and configure this category")]
    category: Option<String>,

    #[arg(long, help = "Seed the problem generator for a reproducible session")]
    seed: Option<u64>,
}

fn init_logging() -> Option<PathBuf> {
    let dir = dirs::data_dir()?.join("mathdash");
    fs::create_dir_all(&dir).ok()?;
    let path = dir.join("mathdash.log");
    let file = OpenOptions::new().create(true).append(true).open(&path).ok()?;

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_env("MATHDASH_LOG").unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .init();
    Some(path)
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let log_path = init_logging();

    let mut config = Config::load().unwrap_or_else(|e| {
        warn!(error = %e, "config unreadable, using defaults");
        Config::default()
    });
    if let Some(theme) = cli.theme {
        config.theme = theme;
    }
    if let Some(level) = cli.level.as_deref() {
        match DifficultyLevel::from_name(level) {
            Some(level) => config.difficulty_level = level,
            None => anyhow::bail!("unknown level '{level}' (expected easy, medium or hard)"),
        }
    }
    if let Some(questions) = cli.questions {
        config.question_count = config::nearest_question_count(questions);
    }
    let category = match cli.category.as_deref() {
        Some(slug) => match MathCategory::from_slug(slug) {
            Some(category) => Some(category),
            None => anyhow::bail!("unknown category '{slug}'"),
        },
        None => None,
    };

    info!(version = env!("CARGO_PKG_VERSION"), log = ?log_path, "mathdash starting");

    let mut app = App::new(config, cli.seed);
    if let Some(category) = category {
        app.select_category(category);
    }

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;

    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let events = EventHandler::new(Duration::from_millis(TICK_MS));

    let result = run_app(&mut terminal, &mut app, &events);
    app.shutdown();

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    if let Err(err) = result {
        eprintln!("Error: {err:?}");
    }
    info!("mathdash exiting");

    Ok(())
}

fn run_app(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
    events: &EventHandler,
) -> Result<()> {
    loop {
        terminal.draw(|frame| render(frame, app))?;

        match events.next()? {
            AppEvent::Key(key) => handle_key(app, key),
            AppEvent::Tick | AppEvent::Resize => {}
        }
        // Key presses can arrive faster than the tick rate, so the clock is
        // advanced from wall time on every iteration.
        app.on_tick(Instant::now());

        if app.should_quit {
            return Ok(());
        }
    }
}

fn handle_key(app: &mut App, key: KeyEvent) {
    if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
        app.should_quit = true;
        return;
    }

    if app.screen == AppScreen::Shop {
        handle_shop_key(app, key);
        return;
    }

    match app.state().phase {
        Phase::Config => handle_menu_key(app, key),
        Phase::PreConfig => handle_pre_config_key(app, key),
        Phase::Memorize | Phase::ReMemorize | Phase::Result => match key.code {
            KeyCode::Esc | KeyCode::Char('e') => app.end_game(),
            _ => {}
        },
        Phase::Solve => handle_solve_key(app, key),
        Phase::Summary => handle_summary_key(app, key),
    }
}

fn handle_menu_key(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Char('q') | KeyCode::Esc => app.should_quit = true,
        KeyCode::Up | KeyCode::Char('k') => app.category_menu.prev(),
        KeyCode::Down | KeyCode::Char('j') => app.category_menu.next(),
        KeyCode::Left | KeyCode::Char('h') => app.category_menu.jump_group(false),
        KeyCode::Right | KeyCode::Char('l') => app.category_menu.jump_group(true),
        KeyCode::Enter => app.select_highlighted_category(),
        KeyCode::Char('p') => app.open_shop(),
        _ => {}
    }
}

fn handle_pre_config_key(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Char('q') => app.should_quit = true,
        KeyCode::Esc => app.back_to_config(),
        KeyCode::Enter => app.start_game(),
        KeyCode::Up | KeyCode::Down | KeyCode::Tab | KeyCode::Char('j') | KeyCode::Char('k') => {
            app.pre_config_field = match app.pre_config_field {
                PreConfigField::Level => PreConfigField::Questions,
                PreConfigField::Questions => PreConfigField::Level,
            };
        }
        KeyCode::Left | KeyCode::Char('h') => cycle_pre_config(app, false),
        KeyCode::Right | KeyCode::Char('l') => cycle_pre_config(app, true),
        _ => {}
    }
}

fn cycle_pre_config(app: &mut App, forward: bool) {
    match app.pre_config_field {
        PreConfigField::Level => app.cycle_level(forward),
        PreConfigField::Questions => app.cycle_question_count(forward),
    }
}

fn handle_solve_key(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Char(ch @ '1'..='4') => app.submit_option(ch as usize - '1' as usize),
        KeyCode::Up | KeyCode::Char('k') => app.move_option(false),
        KeyCode::Down | KeyCode::Char('j') => app.move_option(true),
        KeyCode::Enter => app.submit_selected(),
        KeyCode::Esc | KeyCode::Char('e') => app.end_game(),
        KeyCode::Char(ch) => {
            if let Some(power_up) = PowerUp::ALL.into_iter().find(|p| p.hotkey() == ch) {
                app.use_power_up(power_up);
            }
        }
        _ => {}
    }
}

fn handle_summary_key(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Char('q') => app.should_quit = true,
        KeyCode::Enter => app.play_again(),
        KeyCode::Esc => app.reset_to_menu(),
        _ => {}
    }
}

fn handle_shop_key(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Esc | KeyCode::Char('p') | KeyCode::Char('q') => app.close_shop(),
        KeyCode::Up | KeyCode::Char('k') => app.move_shop(false),
        KeyCode::Down | KeyCode::Char('j') => app.move_shop(true),
        KeyCode::Enter => app.purchase_selected(),
        _ => {}
    }
}

fn footer_hints(app: &App) -> Vec<&'static str> {
    if app.screen == AppScreen::Shop {
        return vec!["[Enter] Buy", "[Up/Down] Select", "[Esc] Back"];
    }
    match app.state().phase {
        Phase::Config => vec![
            "[Enter] Choose",
            "[Up/Down] Move",
            "[Left/Right] Group",
            "[p] Shop",
            "[q] Quit",
        ],
        Phase::PreConfig => vec!["[Enter] Start", "[Left/Right] Change", "[Esc] Back"],
        Phase::Solve => vec![
            "[1-4] Answer",
            "[Up/Down+Enter] Pick",
            "[x] Extra time",
            "[s] Shield",
            "[r] Reveal",
            "[e] End",
        ],
        Phase::Memorize | Phase::ReMemorize | Phase::Result => vec!["[e] End session"],
        Phase::Summary => vec!["[Enter] Play again", "[Esc] Categories", "[q] Quit"],
    }
}

fn render(frame: &mut ratatui::Frame, app: &App) {
    let area = frame.area();
    let colors = &app.theme.colors;

    frame.render_widget(Block::default().style(Style::default().bg(colors.bg())), area);

    let hints = footer_hints(app);
    let hint_lines = pack_hint_lines(&hints, area.width as usize);
    let layout = AppLayout::new(area, hint_lines.len() as u16 + 1);

    render_header(frame, app, layout.header);

    let main = match layout.sidebar {
        Some(sidebar) => {
            render_sidebar(frame, app, sidebar);
            layout.main
        }
        None => layout.main,
    };

    match app.screen {
        AppScreen::Shop => {
            let shop = Shop::new(&app.profile, app.shop_selected, app.theme);
            frame.render_widget(shop, centered_rect(70, 80, main));
        }
        AppScreen::Session => render_session(frame, app, main),
    }

    let mut footer: Vec<Line> = app
        .notices
        .back()
        .map(|n| {
            Line::from(Span::styled(
                format!(" {}", n.text),
                Style::default()
                    .fg(colors.highlight())
                    .add_modifier(Modifier::BOLD),
            ))
        })
        .into_iter()
        .collect();
    if footer.is_empty() {
        footer.push(Line::from(""));
    }
    footer.extend(
        hint_lines
            .into_iter()
            .map(|l| Line::from(Span::styled(l, Style::default().fg(colors.muted())))),
    );
    frame.render_widget(Paragraph::new(footer), layout.footer);
}

fn render_header(frame: &mut ratatui::Frame, app: &App, area: Rect) {
    let colors = &app.theme.colors;
    let state = app.state();

    let info = if state.phase.is_timed() {
        format!(
            " Q {}/{} | Score {} | +{} coins | Difficulty {}/10",
            state.current_question_index,
            state.total_questions,
            state.score,
            state.coins,
            state.difficulty
        )
    } else {
        format!(
            " Level {} | Total score {} | {} coins",
            engine::scoring::level_from_score(app.profile.total_score),
            app.profile.total_score,
            app.profile.coins
        )
    };
    let header = Paragraph::new(Line::from(vec![
        Span::styled(
            " mathdash ",
            Style::default()
                .fg(colors.header_fg())
                .bg(colors.header_bg())
                .add_modifier(Modifier::BOLD),
        ),
        Span::styled(info, Style::default().fg(colors.fg()).bg(colors.header_bg())),
    ]))
    .block(Block::bordered().border_style(Style::default().fg(colors.border())))
    .style(Style::default().bg(colors.header_bg()));
    frame.render_widget(header, area);
}

fn render_sidebar(frame: &mut ratatui::Frame, app: &App, area: Rect) {
    let colors = &app.theme.colors;
    let inventory = &app.profile.inventory;

    let mut lines = vec![
        Line::from(Span::styled(
            " Power-ups",
            Style::default().fg(colors.accent()).add_modifier(Modifier::BOLD),
        )),
    ];
    for power_up in PowerUp::ALL {
        lines.push(Line::from(Span::styled(
            format!("  [{}] {} x{}", power_up.hotkey(), power_up.label(), inventory.count(power_up)),
            Style::default().fg(colors.fg()),
        )));
    }
    lines.push(Line::from(""));
    lines.push(Line::from(Span::styled(
        " Progress",
        Style::default().fg(colors.accent()).add_modifier(Modifier::BOLD),
    )));
    lines.push(Line::from(Span::styled(
        format!("  Sessions played: {}", app.profile.sessions_played),
        Style::default().fg(colors.fg()),
    )));
    lines.push(Line::from(Span::styled(
        format!("  Best score: {}", app.profile.best_session_score),
        Style::default().fg(colors.fg()),
    )));
    lines.push(Line::from(Span::styled(
        format!("  Difficulty: {}/{MAX_DIFFICULTY}", app.profile.difficulty),
        Style::default().fg(colors.fg()),
    )));
    if let Some(best) = app.history.best_accuracy() {
        lines.push(Line::from(Span::styled(
            format!("  Best accuracy: {best}%"),
            Style::default().fg(colors.fg()),
        )));
    }
    lines.push(Line::from(Span::styled(
        format!(
            "  Next level in {} pts",
            engine::scoring::score_to_next_level(app.profile.total_score)
        ),
        Style::default().fg(colors.muted()),
    )));
    if app.bridge.pending() > 0 {
        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled(
            "  Reviewing difficulty...",
            Style::default().fg(colors.muted()),
        )));
    }

    let sidebar = Paragraph::new(lines).block(
        Block::bordered()
            .title(" Stats ")
            .border_style(Style::default().fg(colors.border())),
    );
    frame.render_widget(sidebar, area);
}

fn render_session(frame: &mut ratatui::Frame, app: &App, area: Rect) {
    let colors = &app.theme.colors;
    let state = app.state();

    match state.phase {
        Phase::Config => {
            let menu_area = centered_rect(60, 90, area);
            frame.render_widget(app.category_menu.widget(app.theme), menu_area);
        }
        Phase::PreConfig => {
            let Some(category) = state.category else {
                return;
            };
            let picker = PreConfig {
                category,
                level: app.level,
                question_count: app.question_count,
                focused: app.pre_config_field,
                theme: app.theme,
            };
            frame.render_widget(picker, centered_rect(60, 60, area));
        }
        Phase::Memorize | Phase::ReMemorize | Phase::Solve | Phase::Result => {
            let view = ChallengeView::new(state, app.selected_option, app.theme);
            frame.render_widget(view, area);
        }
        Phase::Summary => match &app.last_report {
            Some(report) => {
                frame.render_widget(Summary::new(report, app.theme), centered_rect(70, 80, area));
            }
            None => {
                let waiting = Paragraph::new("Session finished.")
                    .alignment(Alignment::Center)
                    .style(Style::default().fg(colors.muted()));
                frame.render_widget(waiting, area);
            }
        },
    }
}
