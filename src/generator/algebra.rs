use rand::{Rng, RngCore};

use crate::generator::category::MathCategory;
use crate::generator::challenge::Draft;
use crate::generator::{max_number, pick};

const STANDARD_ANGLES: [i64; 5] = [0, 30, 45, 60, 90];

/// `x² + px + q` style rendering with signs folded into the operators.
fn quadratic_text(p: i64, q: i64) -> String {
    let mut out = String::from("x²");
    match p {
        0 => {}
        1 => out.push_str(" + x"),
        -1 => out.push_str(" - x"),
        p if p > 0 => out.push_str(&format!(" + {p}x")),
        p => out.push_str(&format!(" - {}x", -p)),
    }
    match q {
        0 => {}
        q if q > 0 => out.push_str(&format!(" + {q}")),
        q => out.push_str(&format!(" - {}", -q)),
    }
    out
}

fn monomial(coef: i64, power: u32) -> String {
    match power {
        0 => coef.to_string(),
        1 => format!("{coef}x"),
        2 => format!("{coef}x²"),
        p => format!("{coef}x^{p}"),
    }
}

pub fn linear_equations(rng: &mut dyn RngCore, difficulty: u32) -> Draft {
    let max = max_number(difficulty);
    let a = rng.gen_range(2..=difficulty as i64 + 2);
    let x = rng.gen_range(1..=max);
    let b = rng.gen_range(1..=max);
    let c = a * x + b;
    Draft::numeric(
        MathCategory::LinearEquations,
        &[a, b, c],
        format!("{a}x + {b} = {c}, x"),
        x as f64,
    )
}

pub fn quadratic_equations(rng: &mut dyn RngCore, difficulty: u32) -> Draft {
    let bound = difficulty as i64 + 2;
    let r1 = rng.gen_range(-bound..=bound);
    let mut r2 = rng.gen_range(-bound..=bound);
    if r2 == r1 {
        r2 = if r1 < bound { r1 + 1 } else { r1 - 1 };
    }
    let (lo, hi) = if r1 < r2 { (r1, r2) } else { (r2, r1) };
    let p = -(lo + hi);
    let q = lo * hi;
    Draft::text(
        MathCategory::QuadraticEquations,
        &[p, q],
        format!("{} = 0, x (smaller root first)", quadratic_text(p, q)),
        format!("{lo},{hi}"),
        "0123456789",
    )
}

pub fn inequalities(rng: &mut dyn RngCore, difficulty: u32) -> Draft {
    let max = max_number(difficulty);
    let a = rng.gen_range(2..=difficulty as i64 + 2);
    let x = rng.gen_range(1..=max);
    let b = rng.gen_range(1..=max);
    // c in (a*x + b, a*(x+1) + b] makes x the largest solution.
    let c = a * x + b + rng.gen_range(1..=a);
    Draft::numeric(
        MathCategory::Inequalities,
        &[a, b, c],
        format!("{a}x + {b} < {c}, largest whole x"),
        x as f64,
    )
}

fn polynomial(rng: &mut dyn RngCore, difficulty: u32, subtract: bool) -> Draft {
    let top = difficulty as i64 + 3;
    let p: Vec<i64> = (0..3).map(|_| rng.gen_range(1..=top)).collect();
    let q: Vec<i64> = (0..3).map(|_| rng.gen_range(1..=top)).collect();
    let render = |c: &[i64]| format!("{} + {} + {}", monomial(c[0], 2), monomial(c[1], 1), c[2]);

    let term = rng.gen_range(0..3);
    let term_name = ["x²", "x", "the constant term"][term];
    let (op, answer, category) = if subtract {
        ("-", p[term] - q[term], MathCategory::PolynomialSubtraction)
    } else {
        ("+", p[term] + q[term], MathCategory::PolynomialAddition)
    };

    let numbers: Vec<i64> = p.iter().chain(q.iter()).copied().collect();
    Draft::numeric(
        category,
        &numbers,
        format!(
            "({}) {op} ({}): coefficient of {term_name}",
            render(&p),
            render(&q)
        ),
        answer as f64,
    )
}

pub fn polynomial_addition(rng: &mut dyn RngCore, difficulty: u32) -> Draft {
    polynomial(rng, difficulty, false)
}

pub fn polynomial_subtraction(rng: &mut dyn RngCore, difficulty: u32) -> Draft {
    polynomial(rng, difficulty, true)
}

pub fn logarithms(rng: &mut dyn RngCore, difficulty: u32) -> Draft {
    let base = pick(rng, &[2i64, 3, 5, 10]);
    let exp = rng.gen_range(1..=(2 + difficulty / 3).min(5));
    let value = base.pow(exp);
    Draft::numeric(
        MathCategory::Logarithms,
        &[base, value],
        format!("log_{base}({value})"),
        exp as f64,
    )
}

pub fn basic_derivatives(rng: &mut dyn RngCore, difficulty: u32) -> Draft {
    let coef = rng.gen_range(1..=difficulty as i64 + 2);
    let power = rng.gen_range(2..=2 + difficulty / 4);
    let x = rng.gen_range(1..=3i64);
    let answer = coef * power as i64 * x.pow(power - 1);
    Draft::numeric(
        MathCategory::BasicDerivatives,
        &[coef, power as i64, x],
        format!("d/dx ({}) at x = {x}", monomial(coef, power)),
        answer as f64,
    )
}

pub fn basic_integrals(rng: &mut dyn RngCore, difficulty: u32) -> Draft {
    let power = rng.gen_range(1..=1 + difficulty / 4);
    let m = rng.gen_range(1..=difficulty as i64 + 2);
    // Coefficient is a multiple of (power + 1) so the definite integral is whole.
    let coef = (power as i64 + 1) * m;
    let upper = rng.gen_range(1..=3i64);
    let answer = m * upper.pow(power + 1);
    Draft::numeric(
        MathCategory::BasicIntegrals,
        &[coef, power as i64, upper],
        format!("∫ from 0 to {upper} of {} dx", monomial(coef, power)),
        answer as f64,
    )
}

fn trig(
    rng: &mut dyn RngCore,
    category: MathCategory,
    name: &str,
    angles: &[i64],
    f: fn(f64) -> f64,
) -> Draft {
    let angle = pick(rng, angles);
    let value = f((angle as f64).to_radians());
    Draft::numeric(
        category,
        &[angle],
        format!("{name}({angle}°) (2 d.p.)"),
        value,
    )
}

pub fn sine(rng: &mut dyn RngCore, _difficulty: u32) -> Draft {
    trig(rng, MathCategory::Sine, "sin", &STANDARD_ANGLES, f64::sin)
}

pub fn cosine(rng: &mut dyn RngCore, _difficulty: u32) -> Draft {
    trig(rng, MathCategory::Cosine, "cos", &STANDARD_ANGLES, f64::cos)
}

pub fn tangent(rng: &mut dyn RngCore, _difficulty: u32) -> Draft {
    trig(rng, MathCategory::Tangent, "tan", &STANDARD_ANGLES[..4], f64::tan)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generator::challenge::Answer;
    use rand::SeedableRng;
    use rand::rngs::SmallRng;

    #[test]
    fn test_quadratic_text_signs() {
        assert_eq!(quadratic_text(-5, 6), "x² - 5x + 6");
        assert_eq!(quadratic_text(1, -6), "x² + x - 6");
        assert_eq!(quadratic_text(0, -9), "x² - 9");
        assert_eq!(quadratic_text(-1, 0), "x² - x");
    }

    #[test]
    fn test_quadratic_roots_satisfy_equation() {
        let mut rng = SmallRng::seed_from_u64(17);
        for difficulty in 1..=10 {
            let draft = quadratic_equations(&mut rng, difficulty);
            let (p, q) = (draft.numbers[0], draft.numbers[1]);
            let Answer::Text(text) = &draft.answer else {
                panic!("quadratic answer should be text");
            };
            let roots: Vec<f64> = text.split(',').map(|r| r.parse().unwrap()).collect();
            assert_eq!(roots.len(), 2);
            assert!(roots[0] < roots[1]);
            for r in roots {
                assert_eq!(r * r + p * r + q, 0.0);
            }
        }
    }

    #[test]
    fn test_inequality_answer_is_largest_solution() {
        let mut rng = SmallRng::seed_from_u64(23);
        for _ in 0..100 {
            let draft = inequalities(&mut rng, 5);
            let (a, b, c) = (draft.numbers[0], draft.numbers[1], draft.numbers[2]);
            let x = draft.answer.as_number().unwrap();
            assert!(a * x + b < c);
            assert!(a * (x + 1.0) + b >= c);
        }
    }

    #[test]
    fn test_integral_is_whole() {
        let mut rng = SmallRng::seed_from_u64(29);
        for difficulty in 1..=10 {
            let draft = basic_integrals(&mut rng, difficulty);
            let (coef, power, upper) = (draft.numbers[0], draft.numbers[1], draft.numbers[2]);
            let exact = coef * upper.powf(power + 1.0) / (power + 1.0);
            assert_eq!(draft.answer.as_number().unwrap(), exact);
        }
    }

    #[test]
    fn test_standard_trig_values() {
        let mut rng = SmallRng::seed_from_u64(1);
        for _ in 0..40 {
            let draft = sine(&mut rng, 1);
            let expected = match draft.numbers[0] as i64 {
                0 => 0.0,
                30 => 0.5,
                45 => 0.71,
                60 => 0.87,
                90 => 1.0,
                other => panic!("unexpected angle {other}"),
            };
            assert_eq!(draft.answer.as_number().unwrap(), expected);
        }
    }

    #[test]
    fn test_tangent_avoids_ninety_degrees() {
        let mut rng = SmallRng::seed_from_u64(6);
        for _ in 0..50 {
            assert_ne!(tangent(&mut rng, 10).numbers[0], 90.0);
        }
    }

    #[test]
    fn test_logarithm_inverts_power() {
        let mut rng = SmallRng::seed_from_u64(14);
        let draft = logarithms(&mut rng, 10);
        let (base, value) = (draft.numbers[0], draft.numbers[1]);
        let exp = draft.answer.as_number().unwrap();
        assert_eq!(base.powf(exp), value);
    }
}
