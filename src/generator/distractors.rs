use std::collections::HashSet;

use rand::seq::SliceRandom;
use rand::{Rng, RngCore};

use crate::generator::challenge::{Answer, DistractorStyle, round2};

pub const OPTION_COUNT: usize = 4;

/// Upper bound on random draws before falling back to padding.
const MAX_DRAWS: usize = 64;

/// Build the shuffled multiple-choice set: the answer plus three unique
/// distractors, padded deterministically if the draws come up short.
pub fn build_options(
    answer: &Answer,
    style: DistractorStyle,
    difficulty: u32,
    rng: &mut dyn RngCore,
) -> Vec<Answer> {
    let candidates = match (style, answer) {
        (DistractorStyle::Numeric, Answer::Number(value)) => {
            numeric_distractors(*value, difficulty, rng)
        }
        (DistractorStyle::Boolean, Answer::Number(value)) => {
            vec![Answer::Number(if *value == 0.0 { 1.0 } else { 0.0 })]
        }
        (DistractorStyle::Mutate(pool), _) => mutated_distractors(&answer.text(), pool, rng),
        (_, Answer::Text(text)) => mutated_distractors(text, "0123456789", rng),
    };

    let mut seen: HashSet<String> = HashSet::new();
    seen.insert(answer.text());
    let mut options = vec![answer.clone()];
    for candidate in candidates {
        if options.len() == OPTION_COUNT {
            break;
        }
        if seen.insert(candidate.text()) {
            options.push(candidate);
        }
    }

    pad_options(&mut options, &mut seen, answer);
    options.shuffle(rng);
    options
}

fn numeric_distractors(answer: f64, difficulty: u32, rng: &mut dyn RngCore) -> Vec<Answer> {
    let integral = answer.fract() == 0.0;
    let spread = (answer.abs() * 0.2).max(1.0) + difficulty as f64 + 2.0;

    let mut seen = HashSet::new();
    seen.insert(Answer::Number(answer).text());
    let mut out = Vec::with_capacity(OPTION_COUNT - 1);

    for _ in 0..MAX_DRAWS {
        if out.len() == OPTION_COUNT - 1 {
            break;
        }
        let offset = rng.gen_range(-spread..=spread);
        let candidate = if integral {
            (answer + offset).round()
        } else {
            round2(answer + offset)
        };
        if answer >= 0.0 && candidate < 0.0 {
            continue;
        }
        let candidate = Answer::Number(candidate);
        if seen.insert(candidate.text()) {
            out.push(candidate);
        }
    }
    out
}

/// Characters that split compound answers ("-3,4", "09:35") into parts that
/// are mutated independently.
const SEPARATORS: [char; 2] = [',', ':'];

fn mutated_distractors(answer: &str, pool: &str, rng: &mut dyn RngCore) -> Vec<Answer> {
    let pool: Vec<char> = pool.chars().collect();
    let parts: Vec<&str> = answer.split(SEPARATORS).collect();
    let separators: Vec<char> = answer.chars().filter(|c| SEPARATORS.contains(c)).collect();
    // Clock times are zero-padded, so a leading zero is a plausible digit there.
    let fixed_width = separators.contains(&':');
    if pool.is_empty() || parts.iter().all(|p| p.is_empty()) {
        return Vec::new();
    }

    let mut seen = HashSet::new();
    seen.insert(answer.to_string());
    let mut out = Vec::with_capacity(OPTION_COUNT - 1);

    for _ in 0..MAX_DRAWS {
        if out.len() == OPTION_COUNT - 1 {
            break;
        }
        let target = rng.gen_range(0..parts.len());
        let Some(mutated) = mutate_part(parts[target], &pool, fixed_width, rng) else {
            continue;
        };
        let mut candidate = String::with_capacity(answer.len() + 1);
        for (i, part) in parts.iter().enumerate() {
            if i > 0 {
                candidate.push(separators[i - 1]);
            }
            candidate.push_str(if i == target { mutated.as_str() } else { *part });
        }
        if seen.insert(candidate.clone()) {
            out.push(Answer::Text(candidate));
        }
    }
    out
}

/// Signed digit runs swap one digit and keep their length. Anything else is
/// truncated by one or two characters and topped up from the pool.
fn mutate_part(
    part: &str,
    pool: &[char],
    fixed_width: bool,
    rng: &mut dyn RngCore,
) -> Option<String> {
    let mut chars: Vec<char> = part.chars().collect();
    if chars.is_empty() {
        return None;
    }

    let digits: Vec<usize> = chars
        .iter()
        .enumerate()
        .filter(|(_, c)| c.is_ascii_digit())
        .map(|(i, _)| i)
        .collect();
    let numeric = !digits.is_empty() && chars.iter().all(|c| c.is_ascii_digit() || *c == '-');
    if numeric {
        let pos = digits[rng.gen_range(0..digits.len())];
        let replacement = pool[rng.gen_range(0..pool.len())];
        let leading = pos == digits[0] && digits.len() > 1;
        if !replacement.is_ascii_digit()
            || replacement == chars[pos]
            || (leading && replacement == '0' && !fixed_width)
        {
            return None;
        }
        chars[pos] = replacement;
        let text: String = chars.into_iter().collect();
        return (text != "-0").then_some(text);
    }

    let cut = if chars.len() > 2 && rng.gen_bool(0.5) { 2 } else { 1 };
    let mut candidate: String = chars[..chars.len() - cut].iter().collect();
    for _ in 0..rng.gen_range(1..=cut) {
        candidate.push(pool[rng.gen_range(0..pool.len())]);
    }
    Some(candidate)
}

fn pad_options(options: &mut Vec<Answer>, seen: &mut HashSet<String>, answer: &Answer) {
    let mut step = 1u32;
    while options.len() < OPTION_COUNT {
        let candidate = match answer {
            Answer::Number(value) => Answer::Number(value + step as f64),
            Answer::Text(text) => Answer::Text(format!("{text}{step}")),
        };
        if seen.insert(candidate.text()) {
            options.push(candidate);
        }
        step += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::SmallRng;

    fn assert_valid(options: &[Answer], answer: &Answer) {
        assert_eq!(options.len(), OPTION_COUNT);
        let texts: HashSet<String> = options.iter().map(Answer::text).collect();
        assert_eq!(texts.len(), OPTION_COUNT, "duplicates in {options:?}");
        let hits = options.iter().filter(|o| o.text() == answer.text()).count();
        assert_eq!(hits, 1);
    }

    #[test]
    fn test_numeric_options_are_unique_and_non_negative() {
        let mut rng = SmallRng::seed_from_u64(7);
        for value in [0.0, 1.0, 13.0, 250.0, 6.28] {
            let answer = Answer::Number(value);
            let options = build_options(&answer, DistractorStyle::Numeric, 3, &mut rng);
            assert_valid(&options, &answer);
            for option in &options {
                assert!(option.as_number().unwrap() >= 0.0, "negative option {option}");
            }
        }
    }

    #[test]
    fn test_decimal_answers_keep_two_decimal_precision() {
        let mut rng = SmallRng::seed_from_u64(11);
        let answer = Answer::Number(3.14);
        let options = build_options(&answer, DistractorStyle::Numeric, 5, &mut rng);
        assert_valid(&options, &answer);
        for option in options {
            let n = option.as_number().unwrap();
            assert!((n * 100.0 - (n * 100.0).round()).abs() < 1e-6);
        }
    }

    #[test]
    fn test_boolean_pads_after_complement() {
        let mut rng = SmallRng::seed_from_u64(1);
        let answer = Answer::Number(0.0);
        let options = build_options(&answer, DistractorStyle::Boolean, 1, &mut rng);
        assert_valid(&options, &answer);
        let mut texts: Vec<String> = options.iter().map(Answer::text).collect();
        texts.sort();
        assert_eq!(texts, vec!["0", "1", "2", "3"]);
    }

    #[test]
    fn test_mutated_text_options() {
        let mut rng = SmallRng::seed_from_u64(3);
        let answer = Answer::Text("XLVIII".to_string());
        let options = build_options(&answer, DistractorStyle::Mutate("IVXLCDM"), 4, &mut rng);
        assert_valid(&options, &answer);
    }

    #[test]
    fn test_root_pair_options_keep_comma_shape() {
        let mut rng = SmallRng::seed_from_u64(9);
        for text in ["-3,12", "0,5", "-7,-2", "4,10"] {
            let answer = Answer::Text(text.to_string());
            let options = build_options(&answer, DistractorStyle::Mutate("0123456789"), 4, &mut rng);
            assert_valid(&options, &answer);
            for option in &options {
                let option = option.text();
                let parts: Vec<&str> = option.split(',').collect();
                assert_eq!(parts.len(), 2, "{option} from {text}");
                for part in parts {
                    assert!(part.parse::<i64>().is_ok(), "{option} from {text}");
                    assert!(!part.starts_with('0') || part == "0", "{option} from {text}");
                }
            }
        }
    }

    #[test]
    fn test_generated_times_and_roots_keep_their_format() {
        use crate::generator::category::MathCategory;
        use crate::generator::generate;

        let mut rng = SmallRng::seed_from_u64(17);
        for difficulty in 1..=10 {
            for _ in 0..30 {
                let time = generate(MathCategory::TimeCalculation, difficulty, &mut rng);
                for option in &time.options {
                    let text = option.text();
                    assert_eq!(text.len(), 5, "{text}");
                    assert_eq!(text.as_bytes()[2], b':', "{text}");
                    assert!(
                        text.chars().filter(|c| *c != ':').all(|c| c.is_ascii_digit()),
                        "{text}"
                    );
                }

                let roots = generate(MathCategory::QuadraticEquations, difficulty, &mut rng);
                for option in &roots.options {
                    let text = option.text();
                    assert_eq!(text.matches(',').count(), 1, "{text}");
                    assert!(text.split(',').all(|p| p.parse::<i64>().is_ok()), "{text}");
                }
            }
        }
    }

    #[test]
    fn test_single_char_text_answer_still_gets_four_options() {
        let mut rng = SmallRng::seed_from_u64(5);
        let answer = Answer::Text("I".to_string());
        let options = build_options(&answer, DistractorStyle::Mutate("I"), 1, &mut rng);
        // Pool can only produce "I" again, so every distractor comes from padding.
        assert_valid(&options, &answer);
        assert!(options.iter().any(|o| o.text() == "I1"));
    }
}
