use rand::seq::SliceRandom;
use rand::{Rng, RngCore};

use crate::generator::category::MathCategory;
use crate::generator::challenge::Draft;
use crate::generator::{max_number, operand_count, operands, pick};

fn list(numbers: &[i64]) -> String {
    numbers
        .iter()
        .map(|n| n.to_string())
        .collect::<Vec<_>>()
        .join(", ")
}

pub fn mean(rng: &mut dyn RngCore, difficulty: u32) -> Draft {
    let mut numbers = operands(rng, difficulty);
    let count = numbers.len() as i64;
    // Nudge the last value so the sum divides evenly.
    let remainder = numbers.iter().sum::<i64>() % count;
    if remainder != 0 {
        if let Some(last) = numbers.last_mut() {
            *last += count - remainder;
        }
    }
    let answer = numbers.iter().sum::<i64>() / count;
    Draft::numeric(
        MathCategory::Mean,
        &numbers,
        format!("Mean of {}", list(&numbers)),
        answer as f64,
    )
}

pub fn median(rng: &mut dyn RngCore, difficulty: u32) -> Draft {
    let max = max_number(difficulty);
    let mut count = operand_count(difficulty);
    if count % 2 == 0 {
        count += 1;
    }
    let numbers: Vec<i64> = (0..count).map(|_| rng.gen_range(1..=max)).collect();
    let mut sorted = numbers.clone();
    sorted.sort_unstable();
    Draft::numeric(
        MathCategory::Median,
        &numbers,
        format!("Median of {}", list(&numbers)),
        sorted[count / 2] as f64,
    )
}

pub fn mode(rng: &mut dyn RngCore, difficulty: u32) -> Draft {
    let mut pool: Vec<i64> = (1..=max_number(difficulty)).collect();
    pool.shuffle(rng);
    let mut numbers: Vec<i64> = pool.into_iter().take(operand_count(difficulty)).collect();
    let repeated = numbers[0];
    numbers.push(repeated);
    numbers.shuffle(rng);
    Draft::numeric(
        MathCategory::Mode,
        &numbers,
        format!("Mode of {}", list(&numbers)),
        repeated as f64,
    )
}

pub fn range(rng: &mut dyn RngCore, difficulty: u32) -> Draft {
    let numbers = operands(rng, difficulty);
    let hi = numbers.iter().copied().max().unwrap_or(0);
    let lo = numbers.iter().copied().min().unwrap_or(0);
    Draft::numeric(
        MathCategory::Range,
        &numbers,
        format!("Range of {}", list(&numbers)),
        (hi - lo) as f64,
    )
}

pub fn simple_probability(rng: &mut dyn RngCore, _difficulty: u32) -> Draft {
    // Totals divide 100 so the percentage is whole.
    let total = pick(rng, &[2i64, 4, 5, 10, 20, 25]);
    let red = rng.gen_range(1..total);
    let blue = total - red;
    Draft::numeric(
        MathCategory::SimpleProbability,
        &[red, blue],
        format!("A bag holds {red} red and {blue} blue marbles. Chance of red in %"),
        (red * 100 / total) as f64,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::SmallRng;

    #[test]
    fn test_mean_is_whole() {
        let mut rng = SmallRng::seed_from_u64(50);
        for difficulty in 1..=10 {
            let draft = mean(&mut rng, difficulty);
            let sum: f64 = draft.numbers.iter().sum();
            let expected = sum / draft.numbers.len() as f64;
            assert_eq!(draft.answer.as_number().unwrap(), expected);
            assert_eq!(expected.fract(), 0.0);
        }
    }

    #[test]
    fn test_median_uses_odd_count() {
        let mut rng = SmallRng::seed_from_u64(51);
        for difficulty in 1..=10 {
            let draft = median(&mut rng, difficulty);
            assert_eq!(draft.numbers.len() % 2, 1);
        }
    }

    #[test]
    fn test_mode_value_appears_twice_and_others_once() {
        let mut rng = SmallRng::seed_from_u64(52);
        for difficulty in 1..=10 {
            let draft = mode(&mut rng, difficulty);
            let answer = draft.answer.as_number().unwrap();
            for &n in &draft.numbers {
                let count = draft.numbers.iter().filter(|&&m| m == n).count();
                if n == answer {
                    assert_eq!(count, 2);
                } else {
                    assert_eq!(count, 1);
                }
            }
        }
    }

    #[test]
    fn test_probability_is_whole_percentage() {
        let mut rng = SmallRng::seed_from_u64(53);
        for _ in 0..50 {
            let draft = simple_probability(&mut rng, 1);
            let (red, blue) = (draft.numbers[0], draft.numbers[1]);
            let pct = red * 100.0 / (red + blue);
            assert_eq!(draft.answer.as_number().unwrap(), pct);
        }
    }
}
