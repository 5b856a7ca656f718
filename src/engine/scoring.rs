/// Points awarded for a correct answer at `difficulty`.
pub fn points_for_correct(difficulty: u32) -> u64 {
    difficulty as u64 * 10
}

/// Coins awarded for a correct answer at `difficulty`.
pub fn coins_for_correct(difficulty: u32) -> u64 {
    difficulty as u64
}

/// Player level shown on the menu, derived from lifetime score.
pub fn level_from_score(total_score: u64) -> u32 {
    let level = (total_score as f64 / 100.0).sqrt() as u32;
    level.max(1)
}

pub fn score_to_next_level(total_score: u64) -> u64 {
    let current_level = level_from_score(total_score);
    let next_level_score = (current_level as u64 + 1).pow(2) * 100;
    next_level_score.saturating_sub(total_score)
}

/// Percentage of answered questions that were correct, rounded.
pub fn accuracy_percent(correct: usize, answered: usize) -> u32 {
    if answered == 0 {
        return 0;
    }
    (correct as f64 / answered as f64 * 100.0).round() as u32
}
