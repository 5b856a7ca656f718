use serde::{Deserialize, Serialize};

use crate::generator::category::{MathCategory, OperatorSymbol};

/// Canonical correct answer or multiple-choice option.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Answer {
    Number(f64),
    Text(String),
}

impl Answer {
    /// Rendering used for display, uniqueness checks and answer matching.
    pub fn text(&self) -> String {
        match self {
            Answer::Number(n) => format_number(*n),
            Answer::Text(s) => s.clone(),
        }
    }

    pub fn as_number(&self) -> Option<f64> {
        match self {
            Answer::Number(n) => Some(*n),
            Answer::Text(_) => None,
        }
    }

    /// Case-insensitive comparison against user input so numeric and string
    /// answers are checked the same way.
    pub fn matches(&self, submitted: &str) -> bool {
        submitted.trim().to_lowercase() == self.text().to_lowercase()
    }
}

impl std::fmt::Display for Answer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.text())
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Challenge {
    pub category: MathCategory,
    pub numbers: Vec<f64>,
    pub operator: OperatorSymbol,
    pub question: String,
    pub answer: Answer,
    pub options: Vec<Answer>,
}

impl Challenge {
    pub fn numbers_text(&self) -> Vec<String> {
        self.numbers.iter().map(|n| format_number(*n)).collect()
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DistractorStyle {
    Numeric,
    /// Two-valued answers ("1"/"0"); the only real distractor is the complement.
    Boolean,
    /// Swap digits inside each comma or colon separated part, or truncate the
    /// answer and append characters from the pool.
    Mutate(&'static str),
}

/// Output of a single category formula, before options are attached.
#[derive(Clone, Debug)]
pub struct Draft {
    pub category: MathCategory,
    pub numbers: Vec<f64>,
    pub prompt: String,
    pub answer: Answer,
    pub style: DistractorStyle,
}

impl Draft {
    pub fn numeric(category: MathCategory, numbers: &[i64], prompt: String, answer: f64) -> Self {
        Self {
            category,
            numbers: numbers.iter().map(|&n| n as f64).collect(),
            prompt,
            answer: Answer::Number(round2(answer)),
            style: DistractorStyle::Numeric,
        }
    }

    pub fn text(
        category: MathCategory,
        numbers: &[i64],
        prompt: String,
        answer: String,
        pool: &'static str,
    ) -> Self {
        Self {
            category,
            numbers: numbers.iter().map(|&n| n as f64).collect(),
            prompt,
            answer: Answer::Text(answer),
            style: DistractorStyle::Mutate(pool),
        }
    }

    pub fn boolean(category: MathCategory, numbers: &[i64], prompt: String, answer: bool) -> Self {
        Self {
            category,
            numbers: numbers.iter().map(|&n| n as f64).collect(),
            prompt,
            answer: Answer::Number(if answer { 1.0 } else { 0.0 }),
            style: DistractorStyle::Boolean,
        }
    }

    pub fn with_numbers(mut self, numbers: Vec<f64>) -> Self {
        self.numbers = numbers;
        self
    }
}

pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Integers print without a decimal point; everything else is rounded to two
/// decimals with trailing zeros trimmed.
pub fn format_number(value: f64) -> String {
    let rounded = round2(value);
    if rounded.fract() == 0.0 {
        format!("{}", rounded as i64)
    } else {
        let s = format!("{rounded:.2}");
        s.trim_end_matches('0').to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_number_integral() {
        assert_eq!(format_number(42.0), "42");
        assert_eq!(format_number(-7.0), "-7");
        assert_eq!(format_number(-0.0), "0");
    }

    #[test]
    fn test_format_number_trims_trailing_zeros() {
        assert_eq!(format_number(0.5), "0.5");
        assert_eq!(format_number(3.14159), "3.14");
        assert_eq!(format_number(1.999), "2");
    }

    #[test]
    fn test_matches_is_case_insensitive() {
        let roman = Answer::Text("XLII".to_string());
        assert!(roman.matches("xlii"));
        assert!(roman.matches(" XLII "));
        assert!(!roman.matches("XLI"));
    }

    #[test]
    fn test_matches_numeric_text() {
        let n = Answer::Number(12.5);
        assert!(n.matches("12.5"));
        assert!(!n.matches("12.50x"));
        assert!(Answer::Number(30.0).matches("30"));
    }
}
