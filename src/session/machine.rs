use std::time::Instant;

use rand::rngs::SmallRng;
use rand::{RngCore, SeedableRng};
use tracing::{debug, info};

use crate::engine::adaptation::clamp_difficulty;
use crate::engine::scoring::{coins_for_correct, points_for_correct};
use crate::generator;
use crate::generator::category::MathCategory;
use crate::session::state::{
    DifficultyLevel, EXTRA_TIME_MS, Feedback, PerformanceRecord, Phase, PowerUp,
    REMEMORIZE_DURATION_MS, RESULT_DURATION_MS, SessionState,
};

#[derive(Clone, Debug, PartialEq)]
pub enum SessionEvent {
    SelectCategory(MathCategory),
    StartConfigured {
        level: DifficultyLevel,
        total_questions: usize,
    },
    BackToConfig,
    Tick {
        elapsed_ms: u64,
        at: Instant,
    },
    /// `question` is the 1-based index the answer was given for.
    SubmitAnswer {
        question: usize,
        answer: String,
        at: Instant,
    },
    UsePowerUp(PowerUp),
    SetDifficulty {
        session_id: u64,
        difficulty: u32,
    },
    EndGame,
    Reset,
}

/// Compute the state that follows `state` under `event`.
///
/// Events that do not apply to the current phase, and answers tagged with a
/// question that is no longer current, leave the state unchanged.
pub fn transition(state: &SessionState, event: SessionEvent, rng: &mut dyn RngCore) -> SessionState {
    match event {
        SessionEvent::SelectCategory(category) => {
            if state.phase != Phase::Config {
                return state.clone();
            }
            SessionState {
                phase: Phase::PreConfig,
                category: Some(category),
                ..state.clone()
            }
        }
        SessionEvent::StartConfigured {
            level,
            total_questions,
        } => start(state, level, total_questions, rng),
        SessionEvent::BackToConfig => {
            if state.phase != Phase::PreConfig {
                return state.clone();
            }
            SessionState {
                phase: Phase::Config,
                category: None,
                ..state.clone()
            }
        }
        SessionEvent::Tick { elapsed_ms, at } => tick(state, elapsed_ms, at, rng),
        SessionEvent::SubmitAnswer {
            question,
            answer,
            at,
        } => submit(state, question, &answer, at),
        SessionEvent::UsePowerUp(power_up) => apply_power_up(state, power_up),
        SessionEvent::SetDifficulty {
            session_id,
            difficulty,
        } => {
            if session_id != state.session_id || state.phase == Phase::Config {
                return state.clone();
            }
            SessionState {
                difficulty: clamp_difficulty(difficulty as i64),
                ..state.clone()
            }
        }
        SessionEvent::EndGame => {
            if !state.phase.is_timed() {
                return state.clone();
            }
            SessionState {
                phase: Phase::Summary,
                remaining_ms: 0,
                paused_solve_ms: None,
                ..state.clone()
            }
        }
        SessionEvent::Reset => SessionState {
            session_id: state.session_id,
            ..SessionState::default()
        },
    }
}

/// Whether `power_up` would change the session right now. Callers only
/// spend inventory when this holds.
pub fn power_up_applies(state: &SessionState, power_up: PowerUp) -> bool {
    state.phase == Phase::Solve && !(power_up == PowerUp::MistakeShield && state.shield_active)
}

fn start(
    state: &SessionState,
    level: DifficultyLevel,
    total_questions: usize,
    rng: &mut dyn RngCore,
) -> SessionState {
    let Some(category) = state.category else {
        return state.clone();
    };
    if state.phase != Phase::PreConfig {
        return state.clone();
    }

    let difficulty = level.starting_difficulty();
    let challenge = generator::generate(category, difficulty, rng);
    SessionState {
        phase: Phase::Memorize,
        category: Some(category),
        difficulty_level: level,
        difficulty,
        total_questions: total_questions.max(1),
        current_question_index: 1,
        score: 0,
        coins: 0,
        current_challenge: Some(challenge),
        solve_started_at: None,
        history: Vec::new(),
        feedback: Feedback::None,
        remaining_ms: level.memorize_ms(),
        memorize_duration_ms: level.memorize_ms(),
        solve_duration_ms: level.solve_ms(),
        paused_solve_ms: None,
        shield_active: false,
        session_id: state.session_id + 1,
    }
}

fn tick(state: &SessionState, elapsed_ms: u64, at: Instant, rng: &mut dyn RngCore) -> SessionState {
    if !state.phase.is_timed() {
        return state.clone();
    }
    let remaining_ms = state.remaining_ms.saturating_sub(elapsed_ms);
    if remaining_ms > 0 {
        return SessionState {
            remaining_ms,
            ..state.clone()
        };
    }
    expire(state, at, rng)
}

/// The transition a phase takes when its countdown runs out.
fn expire(state: &SessionState, at: Instant, rng: &mut dyn RngCore) -> SessionState {
    match state.phase {
        Phase::Memorize => SessionState {
            phase: Phase::Solve,
            remaining_ms: state.solve_duration_ms,
            solve_started_at: Some(at),
            ..state.clone()
        },
        Phase::ReMemorize => SessionState {
            phase: Phase::Solve,
            remaining_ms: state.paused_solve_ms.unwrap_or(state.solve_duration_ms),
            paused_solve_ms: None,
            ..state.clone()
        },
        Phase::Solve => {
            let mut history = state.history.clone();
            history.push(PerformanceRecord {
                correct: false,
                time_ms: state.solve_duration_ms,
                difficulty: state.difficulty,
            });
            SessionState {
                phase: Phase::Result,
                feedback: Feedback::TimeUp,
                remaining_ms: RESULT_DURATION_MS,
                history,
                ..state.clone()
            }
        }
        Phase::Result if state.is_last_question() => SessionState {
            phase: Phase::Summary,
            remaining_ms: 0,
            ..state.clone()
        },
        Phase::Result => {
            let Some(category) = state.category else {
                return state.clone();
            };
            let challenge = generator::generate(category, state.difficulty, rng);
            SessionState {
                phase: Phase::Memorize,
                current_question_index: state.current_question_index + 1,
                current_challenge: Some(challenge),
                solve_started_at: None,
                feedback: Feedback::None,
                remaining_ms: state.memorize_duration_ms,
                ..state.clone()
            }
        }
        Phase::Config | Phase::PreConfig | Phase::Summary => state.clone(),
    }
}

fn submit(state: &SessionState, question: usize, answer: &str, at: Instant) -> SessionState {
    if state.phase != Phase::Solve || question != state.current_question_index {
        return state.clone();
    }
    let Some(challenge) = &state.current_challenge else {
        return state.clone();
    };

    let time_ms = state
        .solve_started_at
        .map(|started| at.saturating_duration_since(started).as_millis() as u64)
        .unwrap_or(0);
    let correct = challenge.answer.matches(answer);

    let mut next = state.clone();
    if correct {
        next.score += points_for_correct(state.difficulty);
        next.coins += coins_for_correct(state.difficulty);
        next.feedback = Feedback::Correct;
    } else if state.shield_active {
        next.shield_active = false;
        next.feedback = Feedback::Shielded;
    } else {
        next.feedback = Feedback::Incorrect;
    }
    next.history.push(PerformanceRecord {
        correct,
        time_ms,
        difficulty: state.difficulty,
    });
    next.phase = Phase::Result;
    next.remaining_ms = RESULT_DURATION_MS;
    next
}

fn apply_power_up(state: &SessionState, power_up: PowerUp) -> SessionState {
    if !power_up_applies(state, power_up) {
        return state.clone();
    }
    match power_up {
        PowerUp::ExtraTime => SessionState {
            remaining_ms: (state.remaining_ms + EXTRA_TIME_MS).min(state.countdown_ceiling_ms()),
            ..state.clone()
        },
        PowerUp::MistakeShield => SessionState {
            shield_active: true,
            ..state.clone()
        },
        PowerUp::NumberReveal => SessionState {
            phase: Phase::ReMemorize,
            paused_solve_ms: Some(state.remaining_ms),
            remaining_ms: REMEMORIZE_DURATION_MS,
            ..state.clone()
        },
    }
}

/// Owns the live session state and the rng challenges are drawn from.
pub struct Session {
    state: SessionState,
    rng: SmallRng,
}

impl Session {
    pub fn new(rng: SmallRng) -> Self {
        Self {
            state: SessionState::new(),
            rng,
        }
    }

    pub fn seeded(seed: u64) -> Self {
        Self::new(SmallRng::seed_from_u64(seed))
    }

    pub fn from_entropy() -> Self {
        Self::new(SmallRng::from_entropy())
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    /// Apply `event` and return the state it replaced.
    pub fn dispatch(&mut self, event: SessionEvent) -> SessionState {
        let next = transition(&self.state, event, &mut self.rng);
        if next.phase != self.state.phase {
            debug!(
                from = ?self.state.phase,
                to = ?next.phase,
                question = next.current_question_index,
                "session phase change"
            );
        }
        if self.state.phase == Phase::PreConfig && next.phase == Phase::Memorize {
            info!(
                session = next.session_id,
                category = ?next.category,
                level = next.difficulty_level.label(),
                questions = next.total_questions,
                "session started"
            );
        }
        if next.phase == Phase::Summary && self.state.phase != Phase::Summary {
            info!(
                session = next.session_id,
                score = next.score,
                answered = next.history.len(),
                "session finished"
            );
        }
        std::mem::replace(&mut self.state, next)
    }

    pub fn select_category(&mut self, category: MathCategory) -> SessionState {
        self.dispatch(SessionEvent::SelectCategory(category))
    }

    pub fn start_configured_game(
        &mut self,
        level: DifficultyLevel,
        total_questions: usize,
    ) -> SessionState {
        self.dispatch(SessionEvent::StartConfigured {
            level,
            total_questions,
        })
    }

    pub fn back_to_config(&mut self) -> SessionState {
        self.dispatch(SessionEvent::BackToConfig)
    }

    /// Answer the current question.
    pub fn submit_answer(&mut self, answer: &str, at: Instant) -> SessionState {
        let question = self.state.current_question_index;
        self.submit_answer_for(question, answer, at)
    }

    /// Answer a specific question; ignored unless it is still current.
    pub fn submit_answer_for(&mut self, question: usize, answer: &str, at: Instant) -> SessionState {
        self.dispatch(SessionEvent::SubmitAnswer {
            question,
            answer: answer.to_string(),
            at,
        })
    }

    /// Returns true when the power-up took effect.
    pub fn use_power_up(&mut self, power_up: PowerUp) -> bool {
        if !power_up_applies(&self.state, power_up) {
            return false;
        }
        self.dispatch(SessionEvent::UsePowerUp(power_up));
        true
    }

    pub fn set_difficulty(&mut self, session_id: u64, difficulty: u32) -> SessionState {
        self.dispatch(SessionEvent::SetDifficulty {
            session_id,
            difficulty,
        })
    }

    pub fn end_game(&mut self) -> SessionState {
        self.dispatch(SessionEvent::EndGame)
    }

    pub fn reset_game(&mut self) -> SessionState {
        self.dispatch(SessionEvent::Reset)
    }

    pub fn tick(&mut self, elapsed_ms: u64, at: Instant) -> SessionState {
        self.dispatch(SessionEvent::Tick { elapsed_ms, at })
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;
    use crate::session::state::TICK_MS;

    fn started(level: DifficultyLevel, total: usize) -> Session {
        let mut session = Session::seeded(7);
        session.select_category(MathCategory::Addition);
        session.start_configured_game(level, total);
        session
    }

    /// Tick until the phase changes, returning the number of ticks taken.
    fn run_phase(session: &mut Session, at: Instant) -> usize {
        let phase = session.state().phase;
        let mut ticks = 0;
        while session.state().phase == phase {
            session.tick(TICK_MS, at);
            ticks += 1;
            assert!(ticks < 10_000, "phase {phase:?} never expired");
        }
        ticks
    }

    fn answer_text(session: &Session) -> String {
        session.state().current_challenge.as_ref().unwrap().answer.text()
    }

    fn wrong_text(session: &Session) -> String {
        let challenge = session.state().current_challenge.as_ref().unwrap();
        challenge
            .options
            .iter()
            .find(|o| **o != challenge.answer)
            .unwrap()
            .text()
    }

    #[test]
    fn test_config_flow() {
        let mut session = Session::seeded(1);
        session.select_category(MathCategory::Division);
        assert_eq!(session.state().phase, Phase::PreConfig);
        assert_eq!(session.state().category, Some(MathCategory::Division));

        session.back_to_config();
        assert_eq!(session.state().phase, Phase::Config);
        assert_eq!(session.state().category, None);

        session.select_category(MathCategory::Division);
        session.start_configured_game(DifficultyLevel::Easy, 10);
        let state = session.state();
        assert_eq!(state.phase, Phase::Memorize);
        assert_eq!(state.current_question_index, 1);
        assert_eq!(state.remaining_ms, 5000);
        assert_eq!(state.difficulty, 2);
        assert_eq!(state.session_id, 1);
        assert!(state.current_challenge.is_some());
    }

    #[test]
    fn test_start_requires_category() {
        let mut session = Session::seeded(1);
        session.start_configured_game(DifficultyLevel::Hard, 10);
        assert_eq!(session.state(), &SessionState::new());
    }

    #[test]
    fn test_tick_is_monotonic_and_transitions_once() {
        let mut session = started(DifficultyLevel::Medium, 10);
        let at = Instant::now();
        let mut last = session.state().remaining_ms;
        for _ in 0..29 {
            session.tick(TICK_MS, at);
            assert_eq!(session.state().phase, Phase::Memorize);
            assert!(session.state().remaining_ms < last);
            last = session.state().remaining_ms;
        }
        assert_eq!(last, 100);

        session.tick(TICK_MS, at);
        assert_eq!(session.state().phase, Phase::Solve);
        assert_eq!(session.state().remaining_ms, 10000);
        assert_eq!(session.state().solve_started_at, Some(at));
    }

    #[test]
    fn test_oversized_tick_expires_only_current_phase() {
        let mut session = started(DifficultyLevel::Medium, 10);
        session.tick(60_000, Instant::now());
        assert_eq!(session.state().phase, Phase::Solve);
        assert_eq!(session.state().remaining_ms, 10000);
    }

    #[test]
    fn test_ticks_are_inert_outside_timed_phases() {
        let mut session = Session::seeded(3);
        let before = session.state().clone();
        session.tick(TICK_MS, Instant::now());
        assert_eq!(session.state(), &before);

        session.select_category(MathCategory::Addition);
        let before = session.state().clone();
        session.tick(TICK_MS, Instant::now());
        assert_eq!(session.state(), &before);
    }

    #[test]
    fn test_correct_answer_at_difficulty_four() {
        let mut session = started(DifficultyLevel::Medium, 10);
        let id = session.state().session_id;
        session.set_difficulty(id, 4);
        let start = Instant::now();
        run_phase(&mut session, start);

        let answer = answer_text(&session);
        session.submit_answer(&answer, start + Duration::from_millis(2500));
        let state = session.state();
        assert_eq!(state.phase, Phase::Result);
        assert_eq!(state.feedback, Feedback::Correct);
        assert_eq!(state.score, 40);
        assert_eq!(state.coins, 4);
        assert_eq!(
            state.history,
            vec![PerformanceRecord {
                correct: true,
                time_ms: 2500,
                difficulty: 4
            }]
        );
    }

    #[test]
    fn test_answers_compare_case_insensitively() {
        let mut session = Session::seeded(11);
        session.select_category(MathCategory::RomanNumerals);
        session.start_configured_game(DifficultyLevel::Easy, 10);
        run_phase(&mut session, Instant::now());
        let answer = answer_text(&session).to_lowercase();
        session.submit_answer(&format!("  {answer} "), Instant::now());
        assert_eq!(session.state().feedback, Feedback::Correct);
    }

    #[test]
    fn test_shield_absorbs_one_mistake() {
        let mut session = started(DifficultyLevel::Medium, 10);
        run_phase(&mut session, Instant::now());
        assert!(session.use_power_up(PowerUp::MistakeShield));
        assert!(session.state().shield_active);
        // Re-arming is a no-op and should not cost inventory.
        assert!(!session.use_power_up(PowerUp::MistakeShield));

        let wrong = wrong_text(&session);
        session.submit_answer(&wrong, Instant::now());
        let state = session.state();
        assert_eq!(state.feedback, Feedback::Shielded);
        assert!(!state.shield_active);
        assert_eq!(state.score, 0);
        assert_eq!(state.coins, 0);
        assert!(!state.history[0].correct);
    }

    #[test]
    fn test_incorrect_without_shield() {
        let mut session = started(DifficultyLevel::Medium, 10);
        run_phase(&mut session, Instant::now());
        let wrong = wrong_text(&session);
        session.submit_answer(&wrong, Instant::now());
        assert_eq!(session.state().feedback, Feedback::Incorrect);
        assert_eq!(session.state().score, 0);
    }

    #[test]
    fn test_solve_timeout_records_full_duration() {
        let mut session = started(DifficultyLevel::Hard, 10);
        let at = Instant::now();
        run_phase(&mut session, at);
        let ticks = run_phase(&mut session, at);
        assert_eq!(ticks, 70);
        let state = session.state();
        assert_eq!(state.phase, Phase::Result);
        assert_eq!(state.feedback, Feedback::TimeUp);
        assert_eq!(
            state.history.last(),
            Some(&PerformanceRecord {
                correct: false,
                time_ms: 7000,
                difficulty: 8
            })
        );
    }

    #[test]
    fn test_ten_question_session_reaches_summary() {
        let mut session = started(DifficultyLevel::Hard, 10);
        let at = Instant::now();
        for i in 0..10 {
            run_phase(&mut session, at);
            let answer = if i % 2 == 0 {
                answer_text(&session)
            } else {
                wrong_text(&session)
            };
            session.submit_answer(&answer, at);
            assert_eq!(session.state().phase, Phase::Result);
            run_phase(&mut session, at);
        }
        let state = session.state();
        assert_eq!(state.phase, Phase::Summary);
        assert_eq!(state.history.len(), 10);
        assert_eq!(state.current_question_index, 10);
        assert_eq!(state.correct_count(), 5);
    }

    #[test]
    fn test_result_advances_to_fresh_memorize() {
        let mut session = started(DifficultyLevel::Easy, 10);
        let at = Instant::now();
        run_phase(&mut session, at);
        session.submit_answer("nope", at);
        let ticks = run_phase(&mut session, at);
        assert_eq!(ticks, 20);
        let state = session.state();
        assert_eq!(state.phase, Phase::Memorize);
        assert_eq!(state.current_question_index, 2);
        assert_eq!(state.feedback, Feedback::None);
        assert_eq!(state.remaining_ms, 5000);
    }

    #[test]
    fn test_stale_submission_is_dropped() {
        let mut session = started(DifficultyLevel::Easy, 10);
        let at = Instant::now();
        run_phase(&mut session, at);
        session.submit_answer("nope", at);
        run_phase(&mut session, at);
        run_phase(&mut session, at);
        assert_eq!(session.state().current_question_index, 2);

        let before = session.state().clone();
        let stale_answer = answer_text(&session);
        session.submit_answer_for(1, &stale_answer, at);
        assert_eq!(session.state(), &before);
    }

    #[test]
    fn test_submission_outside_solve_is_ignored() {
        let mut session = started(DifficultyLevel::Easy, 10);
        let before = session.state().clone();
        let answer = answer_text(&session);
        session.submit_answer(&answer, Instant::now());
        assert_eq!(session.state(), &before);
    }

    #[test]
    fn test_number_reveal_preserves_solve_countdown() {
        let mut session = started(DifficultyLevel::Medium, 10);
        let at = Instant::now();
        run_phase(&mut session, at);
        for _ in 0..12 {
            session.tick(TICK_MS, at);
        }
        assert_eq!(session.state().remaining_ms, 8800);

        assert!(session.use_power_up(PowerUp::NumberReveal));
        assert_eq!(session.state().phase, Phase::ReMemorize);
        assert_eq!(session.state().remaining_ms, REMEMORIZE_DURATION_MS);

        let ticks = run_phase(&mut session, at + Duration::from_secs(1));
        assert_eq!(ticks, 15);
        let state = session.state();
        assert_eq!(state.phase, Phase::Solve);
        assert_eq!(state.remaining_ms, 8800);
        assert_eq!(state.solve_started_at, Some(at));
        assert_eq!(state.paused_solve_ms, None);
    }

    #[test]
    fn test_extra_time_respects_ceiling() {
        let mut session = started(DifficultyLevel::Medium, 10);
        let at = Instant::now();
        run_phase(&mut session, at);
        for _ in 0..80 {
            session.tick(TICK_MS, at);
        }
        assert_eq!(session.state().remaining_ms, 2000);
        assert!(session.use_power_up(PowerUp::ExtraTime));
        assert_eq!(session.state().remaining_ms, 7000);
        assert!(session.use_power_up(PowerUp::ExtraTime));
        assert_eq!(session.state().remaining_ms, 10000);
        assert_eq!(session.state().solve_duration_ms, 10000);
    }

    #[test]
    fn test_power_ups_only_in_solve() {
        let mut session = started(DifficultyLevel::Medium, 10);
        for power_up in PowerUp::ALL {
            assert!(!session.use_power_up(power_up));
        }
        assert_eq!(session.state().phase, Phase::Memorize);
    }

    #[test]
    fn test_end_game_skips_remaining_questions() {
        let mut session = started(DifficultyLevel::Medium, 20);
        let at = Instant::now();
        run_phase(&mut session, at);
        session.submit_answer("0", at);
        run_phase(&mut session, at);
        session.end_game();
        let state = session.state();
        assert_eq!(state.phase, Phase::Summary);
        assert_eq!(state.history.len(), 1);

        let before = state.clone();
        session.tick(TICK_MS, at);
        session.end_game();
        assert_eq!(session.state(), &before);
    }

    #[test]
    fn test_reset_clears_session_but_keeps_id_counter() {
        let mut session = started(DifficultyLevel::Medium, 10);
        session.end_game();
        session.reset_game();
        let state = session.state();
        assert_eq!(state.phase, Phase::Config);
        assert!(state.history.is_empty());
        assert!(state.current_challenge.is_none());
        assert_eq!(state.session_id, 1);

        session.select_category(MathCategory::Addition);
        session.start_configured_game(DifficultyLevel::Medium, 10);
        assert_eq!(session.state().session_id, 2);
    }

    #[test]
    fn test_set_difficulty_ignores_other_sessions_and_clamps() {
        let mut session = started(DifficultyLevel::Medium, 10);
        let id = session.state().session_id;
        session.set_difficulty(id + 1, 9);
        assert_eq!(session.state().difficulty, 5);
        session.set_difficulty(id, 42);
        assert_eq!(session.state().difficulty, 10);
    }
}
