use rand::{Rng, RngCore};

use crate::generator::category::MathCategory;
use crate::generator::challenge::Draft;
use crate::generator::{max_number, pick};

/// (from, to, factor)
const CONVERSIONS: [(&str, &str, i64); 6] = [
    ("km", "m", 1000),
    ("m", "cm", 100),
    ("kg", "g", 1000),
    ("h", "min", 60),
    ("min", "s", 60),
    ("L", "mL", 1000),
];

const MINUTES_PER_DAY: i64 = 24 * 60;

fn clock(minutes: i64) -> String {
    let minutes = minutes.rem_euclid(MINUTES_PER_DAY);
    format!("{:02}:{:02}", minutes / 60, minutes % 60)
}

fn shelf_price(rng: &mut dyn RngCore, difficulty: u32) -> i64 {
    // Multiples of 20 keep every listed percentage of the price whole.
    rng.gen_range(1..=difficulty as i64 * 3 + 3) * 20
}

pub fn simple_interest(rng: &mut dyn RngCore, difficulty: u32) -> Draft {
    let principal = rng.gen_range(1..=difficulty as i64 * 2 + 2) * 100;
    let rate = rng.gen_range(1..=10);
    let years = rng.gen_range(1..=5);
    Draft::numeric(
        MathCategory::SimpleInterest,
        &[principal, rate, years],
        format!("Simple interest on ${principal} at {rate}% for {years} years"),
        (principal * rate * years / 100) as f64,
    )
}

pub fn compound_interest(rng: &mut dyn RngCore, difficulty: u32) -> Draft {
    let principal = rng.gen_range(1..=difficulty as i64 + 2) * 1000;
    let rate = pick(rng, &[5i64, 10, 20]);
    let years = rng.gen_range(1..=(2 + difficulty as i64 / 4));
    let amount = principal as f64 * (1.0 + rate as f64 / 100.0).powi(years as i32);
    Draft::numeric(
        MathCategory::CompoundInterest,
        &[principal, rate, years],
        format!("${principal} at {rate}% compounded yearly for {years} years, total"),
        amount,
    )
}

pub fn discounts(rng: &mut dyn RngCore, difficulty: u32) -> Draft {
    let price = shelf_price(rng, difficulty);
    let pct = pick(rng, &[10i64, 20, 25, 50]);
    Draft::numeric(
        MathCategory::Discounts,
        &[price, pct],
        format!("${price} with {pct}% off"),
        (price - price * pct / 100) as f64,
    )
}

pub fn sales_tax(rng: &mut dyn RngCore, difficulty: u32) -> Draft {
    let price = shelf_price(rng, difficulty);
    let pct = pick(rng, &[5i64, 10, 15, 20, 25]);
    Draft::numeric(
        MathCategory::SalesTax,
        &[price, pct],
        format!("${price} plus {pct}% sales tax"),
        (price + price * pct / 100) as f64,
    )
}

pub fn unit_conversion(rng: &mut dyn RngCore, difficulty: u32) -> Draft {
    let (from, to, factor) = pick(rng, &CONVERSIONS);
    let value = rng.gen_range(1..=max_number(difficulty));
    Draft::numeric(
        MathCategory::UnitConversion,
        &[value, factor],
        format!("{value} {from} in {to}"),
        (value * factor) as f64,
    )
}

pub fn time_calculation(rng: &mut dyn RngCore, difficulty: u32) -> Draft {
    let hour = rng.gen_range(0..24);
    let minute = rng.gen_range(0..12) * 5;
    let added = rng.gen_range(1..=difficulty as i64 * 6 + 6) * 5;
    let start = hour * 60 + minute;
    Draft::text(
        MathCategory::TimeCalculation,
        &[hour, minute, added],
        format!("{} plus {added} minutes (24h)", clock(start)),
        clock(start + added),
        "0123456789",
    )
}

pub fn logic_puzzles(rng: &mut dyn RngCore, difficulty: u32) -> Draft {
    let terms: Vec<i64> = if difficulty >= 6 && rng.gen_bool(0.5) {
        let start = rng.gen_range(1..=5);
        let ratio: i64 = rng.gen_range(2..=3);
        (0..5).map(|i| start * ratio.pow(i)).collect()
    } else {
        let start = rng.gen_range(1..=max_number(difficulty));
        let step = rng.gen_range(2..=difficulty as i64 + 3);
        (0..5).map(|i| start + step * i as i64).collect()
    };
    let shown = &terms[..4];
    let list = shown
        .iter()
        .map(|n| n.to_string())
        .collect::<Vec<_>>()
        .join(", ");
    Draft::numeric(
        MathCategory::LogicPuzzles,
        shown,
        format!("Next in {list}"),
        terms[4] as f64,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generator::challenge::Answer;
    use rand::SeedableRng;
    use rand::rngs::SmallRng;

    #[test]
    fn test_clock_wraps_midnight() {
        assert_eq!(clock(23 * 60 + 50 + 20), "00:10");
        assert_eq!(clock(9 * 60 + 5), "09:05");
    }

    #[test]
    fn test_time_answer_format() {
        let mut rng = SmallRng::seed_from_u64(60);
        for difficulty in 1..=10 {
            let draft = time_calculation(&mut rng, difficulty);
            let Answer::Text(text) = &draft.answer else {
                panic!("time answer should be text");
            };
            assert_eq!(text.len(), 5);
            assert_eq!(&text[2..3], ":");
        }
    }

    #[test]
    fn test_money_answers_are_whole() {
        let mut rng = SmallRng::seed_from_u64(61);
        for difficulty in 1..=10 {
            for draft in [
                simple_interest(&mut rng, difficulty),
                discounts(&mut rng, difficulty),
                sales_tax(&mut rng, difficulty),
            ] {
                assert_eq!(draft.answer.as_number().unwrap().fract(), 0.0, "{}", draft.prompt);
            }
        }
    }

    #[test]
    fn test_sequence_continues_pattern() {
        let mut rng = SmallRng::seed_from_u64(62);
        for difficulty in 1..=10 {
            let draft = logic_puzzles(&mut rng, difficulty);
            let n = &draft.numbers;
            let next = draft.answer.as_number().unwrap();
            let arithmetic = n[1] - n[0] == n[2] - n[1] && next - n[3] == n[1] - n[0];
            let geometric = n[1] / n[0] == n[2] / n[1] && next / n[3] == n[1] / n[0];
            assert!(arithmetic || geometric, "{:?} -> {next}", n);
        }
    }
}
