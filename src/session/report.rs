use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::engine::scoring::accuracy_percent;
use crate::generator::category::MathCategory;
use crate::session::state::{DifficultyLevel, SessionState};

/// What a finished session hands to the profile store.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SessionReport {
    pub category: Option<MathCategory>,
    #[serde(default)]
    pub level: DifficultyLevel,
    pub score: u64,
    pub coins: u64,
    pub correct: usize,
    pub incorrect: usize,
    pub skipped: usize,
    pub total_questions: usize,
    /// Over answered questions only.
    pub accuracy_percent: u32,
    pub average_time_secs: f64,
    pub final_difficulty: u32,
    pub timestamp: DateTime<Utc>,
}

impl SessionReport {
    pub fn from_state(state: &SessionState) -> Self {
        let answered = state.history.len();
        let correct = state.correct_count();
        let average_time_secs = if answered == 0 {
            0.0
        } else {
            let total_ms: u64 = state.history.iter().map(|r| r.time_ms).sum();
            let secs = total_ms as f64 / answered as f64 / 1000.0;
            (secs * 10.0).round() / 10.0
        };

        Self {
            category: state.category,
            level: state.difficulty_level,
            score: state.score,
            coins: state.coins,
            correct,
            incorrect: answered - correct,
            skipped: state.total_questions.saturating_sub(answered),
            total_questions: state.total_questions,
            accuracy_percent: accuracy_percent(correct, answered),
            average_time_secs,
            final_difficulty: state.difficulty,
            timestamp: Utc::now(),
        }
    }

    pub fn answered(&self) -> usize {
        self.correct + self.incorrect
    }
}
