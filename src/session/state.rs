use std::time::Instant;

use serde::{Deserialize, Serialize};

use crate::generator::category::MathCategory;
use crate::generator::challenge::Challenge;

/// Driver cadence for the countdown.
pub const TICK_MS: u64 = 100;
pub const RESULT_DURATION_MS: u64 = 2000;
pub const REMEMORIZE_DURATION_MS: u64 = 1500;
pub const EXTRA_TIME_MS: u64 = 5000;

/// Question counts offered before a session starts.
pub const QUESTION_COUNTS: [usize; 4] = [10, 20, 30, 50];

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Phase {
    Config,
    PreConfig,
    Memorize,
    ReMemorize,
    Solve,
    Result,
    Summary,
}

impl Phase {
    /// Phases the clock drives. Everything else ignores ticks.
    pub fn is_timed(self) -> bool {
        matches!(
            self,
            Phase::Memorize | Phase::ReMemorize | Phase::Solve | Phase::Result
        )
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DifficultyLevel {
    Easy,
    #[default]
    Medium,
    Hard,
}

impl DifficultyLevel {
    pub const ALL: [DifficultyLevel; 3] = [
        DifficultyLevel::Easy,
        DifficultyLevel::Medium,
        DifficultyLevel::Hard,
    ];

    pub fn memorize_ms(self) -> u64 {
        match self {
            DifficultyLevel::Easy => 5000,
            DifficultyLevel::Medium => 3000,
            DifficultyLevel::Hard => 2000,
        }
    }

    pub fn solve_ms(self) -> u64 {
        match self {
            DifficultyLevel::Easy => 15000,
            DifficultyLevel::Medium => 10000,
            DifficultyLevel::Hard => 7000,
        }
    }

    /// Generator difficulty a session at this level starts with.
    pub fn starting_difficulty(self) -> u32 {
        match self {
            DifficultyLevel::Easy => 2,
            DifficultyLevel::Medium => 5,
            DifficultyLevel::Hard => 8,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            DifficultyLevel::Easy => "Easy",
            DifficultyLevel::Medium => "Medium",
            DifficultyLevel::Hard => "Hard",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        match name.trim().to_ascii_lowercase().as_str() {
            "easy" => Some(DifficultyLevel::Easy),
            "medium" => Some(DifficultyLevel::Medium),
            "hard" => Some(DifficultyLevel::Hard),
            _ => None,
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Feedback {
    #[default]
    None,
    Correct,
    Incorrect,
    TimeUp,
    Shielded,
}

impl Feedback {
    pub fn message(self) -> &'static str {
        match self {
            Feedback::None => "",
            Feedback::Correct => "Correct!",
            Feedback::Incorrect => "Incorrect",
            Feedback::TimeUp => "Time's up!",
            Feedback::Shielded => "Shielded! No penalty this time.",
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum PowerUp {
    ExtraTime,
    MistakeShield,
    NumberReveal,
}

impl PowerUp {
    pub const ALL: [PowerUp; 3] = [
        PowerUp::ExtraTime,
        PowerUp::MistakeShield,
        PowerUp::NumberReveal,
    ];

    /// Shop price in coins.
    pub fn price(self) -> u64 {
        match self {
            PowerUp::ExtraTime => 50,
            PowerUp::MistakeShield => 100,
            PowerUp::NumberReveal => 200,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            PowerUp::ExtraTime => "Extra Time",
            PowerUp::MistakeShield => "Mistake Shield",
            PowerUp::NumberReveal => "Number Reveal",
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            PowerUp::ExtraTime => "Add 5 seconds to the solve timer.",
            PowerUp::MistakeShield => "Your next mistake won't count against you.",
            PowerUp::NumberReveal => "Show the numbers again for a moment.",
        }
    }

    /// Key that fires this power-up during the solve phase.
    pub fn hotkey(self) -> char {
        match self {
            PowerUp::ExtraTime => 'x',
            PowerUp::MistakeShield => 's',
            PowerUp::NumberReveal => 'r',
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct PerformanceRecord {
    pub correct: bool,
    pub time_ms: u64,
    pub difficulty: u32,
}

/// Complete state of one challenge session. Replaced wholesale by every
/// transition; never persisted.
#[derive(Clone, Debug, PartialEq)]
pub struct SessionState {
    pub phase: Phase,
    pub category: Option<MathCategory>,
    pub difficulty_level: DifficultyLevel,
    pub difficulty: u32,
    pub total_questions: usize,
    /// 1-based once a session has started.
    pub current_question_index: usize,
    pub score: u64,
    pub coins: u64,
    pub current_challenge: Option<Challenge>,
    pub solve_started_at: Option<Instant>,
    pub history: Vec<PerformanceRecord>,
    pub feedback: Feedback,
    pub remaining_ms: u64,
    pub memorize_duration_ms: u64,
    pub solve_duration_ms: u64,
    /// Solve countdown parked while the numbers are shown again.
    pub paused_solve_ms: Option<u64>,
    pub shield_active: bool,
    pub session_id: u64,
}

impl Default for SessionState {
    fn default() -> Self {
        let level = DifficultyLevel::default();
        Self {
            phase: Phase::Config,
            category: None,
            difficulty_level: level,
            difficulty: level.starting_difficulty(),
            total_questions: QUESTION_COUNTS[0],
            current_question_index: 0,
            score: 0,
            coins: 0,
            current_challenge: None,
            solve_started_at: None,
            history: Vec::new(),
            feedback: Feedback::None,
            remaining_ms: 0,
            memorize_duration_ms: level.memorize_ms(),
            solve_duration_ms: level.solve_ms(),
            paused_solve_ms: None,
            shield_active: false,
            session_id: 0,
        }
    }
}

impl SessionState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn correct_count(&self) -> usize {
        self.history.iter().filter(|r| r.correct).count()
    }

    pub fn incorrect_count(&self) -> usize {
        self.history.len() - self.correct_count()
    }

    /// Upper bound of the live countdown outside the result window.
    pub fn countdown_ceiling_ms(&self) -> u64 {
        self.memorize_duration_ms.max(self.solve_duration_ms)
    }

    /// Full length of the current phase's countdown, for progress display.
    pub fn phase_duration_ms(&self) -> u64 {
        match self.phase {
            Phase::Memorize => self.memorize_duration_ms,
            Phase::ReMemorize => REMEMORIZE_DURATION_MS,
            Phase::Solve => self.solve_duration_ms.max(self.remaining_ms),
            Phase::Result => RESULT_DURATION_MS,
            Phase::Config | Phase::PreConfig | Phase::Summary => 0,
        }
    }

    /// Fraction of the current countdown still left, in 0..=1.
    pub fn remaining_fraction(&self) -> f64 {
        match self.phase_duration_ms() {
            0 => 0.0,
            total => (self.remaining_ms as f64 / total as f64).clamp(0.0, 1.0),
        }
    }

    pub fn is_last_question(&self) -> bool {
        self.current_question_index >= self.total_questions
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_level_timings() {
        assert_eq!(DifficultyLevel::Easy.memorize_ms(), 5000);
        assert_eq!(DifficultyLevel::Medium.solve_ms(), 10000);
        assert_eq!(DifficultyLevel::Hard.memorize_ms(), 2000);
        for level in DifficultyLevel::ALL {
            assert!(level.memorize_ms() < level.solve_ms());
        }
    }

    #[test]
    fn test_level_from_name() {
        assert_eq!(DifficultyLevel::from_name(" Hard "), Some(DifficultyLevel::Hard));
        assert_eq!(DifficultyLevel::from_name("extreme"), None);
    }

    #[test]
    fn test_timed_phases() {
        assert!(Phase::Solve.is_timed());
        assert!(Phase::ReMemorize.is_timed());
        assert!(!Phase::Config.is_timed());
        assert!(!Phase::PreConfig.is_timed());
        assert!(!Phase::Summary.is_timed());
    }

    #[test]
    fn test_power_up_prices() {
        assert_eq!(PowerUp::ExtraTime.price(), 50);
        assert_eq!(PowerUp::MistakeShield.price(), 100);
        assert_eq!(PowerUp::NumberReveal.price(), 200);
    }

    #[test]
    fn test_power_up_wire_names() {
        let json = serde_json::to_string(&PowerUp::MistakeShield).unwrap();
        assert_eq!(json, "\"mistakeShield\"");
    }

    #[test]
    fn test_remaining_fraction() {
        let mut state = SessionState::new();
        assert_eq!(state.remaining_fraction(), 0.0);
        state.phase = Phase::Result;
        state.remaining_ms = RESULT_DURATION_MS / 2;
        assert!((state.remaining_fraction() - 0.5).abs() < 1e-9);
    }
}
