use rand::{Rng, RngCore};

use crate::generator::category::{MIXED_POOL, MathCategory};
use crate::generator::challenge::{Draft, format_number, round2};
use crate::generator::{formula_for, max_number, operands, pick};

fn join(numbers: &[i64], sep: &str) -> String {
    numbers
        .iter()
        .map(|n| n.to_string())
        .collect::<Vec<_>>()
        .join(sep)
}

pub fn mixed(rng: &mut dyn RngCore, difficulty: u32) -> Draft {
    let category = pick(rng, &MIXED_POOL);
    formula_for(category)(rng, difficulty)
}

pub fn addition(rng: &mut dyn RngCore, difficulty: u32) -> Draft {
    let numbers = operands(rng, difficulty);
    let answer: i64 = numbers.iter().sum();
    Draft::numeric(
        MathCategory::Addition,
        &numbers,
        join(&numbers, " + "),
        answer as f64,
    )
}

pub fn subtraction(rng: &mut dyn RngCore, difficulty: u32) -> Draft {
    let mut numbers = operands(rng, difficulty);
    numbers.sort_unstable_by(|a, b| b.cmp(a));

    // The leading operand has to dominate the rest or the result goes negative.
    let rest: i64 = numbers[1..].iter().sum();
    if numbers[0] < rest {
        numbers[0] = rest + rng.gen_range(0..=max_number(difficulty));
    }
    let answer = numbers[0] - rest;
    Draft::numeric(
        MathCategory::Subtraction,
        &numbers,
        join(&numbers, " - "),
        answer as f64,
    )
}

pub fn multiplication(rng: &mut dyn RngCore, difficulty: u32) -> Draft {
    let numbers: Vec<i64> = operands(rng, difficulty)
        .into_iter()
        .map(|n| if n / 5 > 1 { n / 5 } else { 2 })
        .collect();
    let answer: i64 = numbers.iter().product();
    Draft::numeric(
        MathCategory::Multiplication,
        &numbers,
        join(&numbers, " × "),
        answer as f64,
    )
}

pub fn division(rng: &mut dyn RngCore, difficulty: u32) -> Draft {
    let d = difficulty as i64;
    let divisor = rng.gen_range(0..5) + d;
    let quotient = rng.gen_range(0..5) + d;
    division_from(divisor, quotient)
}

/// Dividend is built from divisor and quotient so the division is always exact.
pub fn division_from(divisor: i64, quotient: i64) -> Draft {
    let dividend = divisor * quotient;
    Draft::numeric(
        MathCategory::Division,
        &[dividend, divisor],
        format!("{dividend} ÷ {divisor}"),
        quotient as f64,
    )
}

pub fn algebra(rng: &mut dyn RngCore, difficulty: u32) -> Draft {
    let max = max_number(difficulty);
    let x = rng.gen_range(1..=max);
    let a = rng.gen_range(1..=max);
    let b = x + a;
    Draft::numeric(
        MathCategory::Algebra,
        &[a, b],
        format!("x + {a} = {b}, x"),
        x as f64,
    )
}

pub fn percentages(rng: &mut dyn RngCore, difficulty: u32) -> Draft {
    let pct = pick(rng, &[10, 20, 25, 50, 75]);
    let base = rng.gen_range(1..=difficulty as i64 * 2 + 2) * 20;
    let answer = base * pct / 100;
    Draft::numeric(
        MathCategory::Percentages,
        &[pct, base],
        format!("{pct}% of {base}"),
        answer as f64,
    )
}

pub fn exponents(rng: &mut dyn RngCore, difficulty: u32) -> Draft {
    let d = difficulty as i64;
    let base = rng.gen_range(2..=2 + d / 2);
    let exp = rng.gen_range(2..=2 + d / 4) as u32;
    Draft::numeric(
        MathCategory::Exponents,
        &[base, exp as i64],
        format!("{base}^{exp}"),
        base.pow(exp) as f64,
    )
}

pub fn fractions(rng: &mut dyn RngCore, difficulty: u32) -> Draft {
    let d = difficulty as i64;
    let den = rng.gen_range(2..=d + 3);
    let num = rng.gen_range(1..den);
    let whole = den * rng.gen_range(1..=d + 4);
    Draft::numeric(
        MathCategory::Fractions,
        &[num, den, whole],
        format!("{num}/{den} of {whole}"),
        (whole / den * num) as f64,
    )
}

pub fn decimals(rng: &mut dyn RngCore, difficulty: u32) -> Draft {
    let tenths = max_number(difficulty) * 10;
    let a = rng.gen_range(10..=tenths) as f64 / 10.0;
    let b = rng.gen_range(10..=tenths) as f64 / 10.0;
    let (prompt, answer) = if rng.gen_bool(0.5) {
        (
            format!("{} + {}", format_number(a), format_number(b)),
            a + b,
        )
    } else {
        let (hi, lo) = if a >= b { (a, b) } else { (b, a) };
        (
            format!("{} - {}", format_number(hi), format_number(lo)),
            hi - lo,
        )
    };
    Draft::numeric(MathCategory::Decimals, &[], prompt, round2(answer)).with_numbers(vec![a, b])
}

pub fn ratios(rng: &mut dyn RngCore, difficulty: u32) -> Draft {
    let d = difficulty as i64;
    let a = rng.gen_range(1..=5 + d);
    let b = rng.gen_range(1..=5 + d);
    let k = rng.gen_range(2..=2 + d / 2);
    let c = a * k;
    Draft::numeric(
        MathCategory::Ratios,
        &[a, b, c],
        format!("{a}:{b} = {c}:x, x"),
        (b * k) as f64,
    )
}

pub fn square_roots(rng: &mut dyn RngCore, difficulty: u32) -> Draft {
    let root = rng.gen_range(2..=5 + difficulty as i64 * 2);
    let square = root * root;
    Draft::numeric(
        MathCategory::SquareRoots,
        &[square],
        format!("√{square}"),
        root as f64,
    )
}

pub fn order_of_operations(rng: &mut dyn RngCore, difficulty: u32) -> Draft {
    let d = difficulty as i64;
    let a = rng.gen_range(1..=max_number(difficulty));
    let b = rng.gen_range(2..=2 + d);
    let c = rng.gen_range(2..=2 + d);
    if d >= 5 {
        let e = rng.gen_range(1..=a);
        Draft::numeric(
            MathCategory::OrderOfOperations,
            &[a, b, c, e],
            format!("{a} + {b} × {c} - {e}"),
            (a + b * c - e) as f64,
        )
    } else {
        Draft::numeric(
            MathCategory::OrderOfOperations,
            &[a, b, c],
            format!("{a} + {b} × {c}"),
            (a + b * c) as f64,
        )
    }
}
