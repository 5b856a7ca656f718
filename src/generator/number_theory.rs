use rand::seq::SliceRandom;
use rand::{Rng, RngCore};

use crate::generator::category::MathCategory;
use crate::generator::challenge::Draft;
use crate::generator::max_number;

const ROMAN_DIGITS: [(i64, &str); 13] = [
    (1000, "M"),
    (900, "CM"),
    (500, "D"),
    (400, "CD"),
    (100, "C"),
    (90, "XC"),
    (50, "L"),
    (40, "XL"),
    (10, "X"),
    (9, "IX"),
    (5, "V"),
    (4, "IV"),
    (1, "I"),
];

pub fn is_prime(n: i64) -> bool {
    if n < 2 {
        return false;
    }
    let mut i = 2;
    while i * i <= n {
        if n % i == 0 {
            return false;
        }
        i += 1;
    }
    true
}

pub fn divisor_count(n: i64) -> i64 {
    (1..=n).filter(|d| n % d == 0).count() as i64
}

/// Standard subtractive notation; `n` must be in 1..=3999.
pub fn to_roman(mut n: i64) -> String {
    let mut out = String::new();
    for &(value, glyph) in &ROMAN_DIGITS {
        while n >= value {
            out.push_str(glyph);
            n -= value;
        }
    }
    out
}

pub fn factorial_of(n: i64) -> i64 {
    (1..=n).product()
}

fn ordinal(n: i64) -> String {
    let suffix = match (n % 10, n % 100) {
        (_, 11..=13) => "th",
        (1, _) => "st",
        (2, _) => "nd",
        (3, _) => "rd",
        _ => "th",
    };
    format!("{n}{suffix}")
}

fn set_text(items: &[i64]) -> String {
    let inner = items
        .iter()
        .map(|n| n.to_string())
        .collect::<Vec<_>>()
        .join(", ");
    format!("{{{inner}}}")
}

pub fn prime_numbers(rng: &mut dyn RngCore, difficulty: u32) -> Draft {
    let n = rng.gen_range(2..=max_number(difficulty) * 2);
    Draft::boolean(
        MathCategory::PrimeNumbers,
        &[n],
        format!("Is {n} prime? (1 = yes, 0 = no)"),
        is_prime(n),
    )
}

pub fn factors(rng: &mut dyn RngCore, difficulty: u32) -> Draft {
    let n = rng.gen_range(2..=max_number(difficulty) * 2);
    Draft::numeric(
        MathCategory::Factors,
        &[n],
        format!("Number of factors of {n}"),
        divisor_count(n) as f64,
    )
}

pub fn multiples(rng: &mut dyn RngCore, difficulty: u32) -> Draft {
    let d = difficulty as i64;
    let n = rng.gen_range(2..=d + 5);
    let k = rng.gen_range(2..=d + 4);
    Draft::numeric(
        MathCategory::Multiples,
        &[n, k],
        format!("The {} multiple of {n}", ordinal(k)),
        (n * k) as f64,
    )
}

pub fn roman_numerals(rng: &mut dyn RngCore, difficulty: u32) -> Draft {
    let n = rng.gen_range(1..=(difficulty as i64 * 30 + 20).min(3999));
    Draft::text(
        MathCategory::RomanNumerals,
        &[n],
        format!("{n} in Roman numerals"),
        to_roman(n),
        "IVXLCDM",
    )
}

pub fn factorial(rng: &mut dyn RngCore, difficulty: u32) -> Draft {
    let n = rng.gen_range(1..=3 + difficulty as i64 / 2);
    Draft::numeric(
        MathCategory::Factorial,
        &[n],
        format!("{n}!"),
        factorial_of(n) as f64,
    )
}

fn choose_nk(rng: &mut dyn RngCore, difficulty: u32) -> (i64, i64) {
    let n = rng.gen_range(3..=5 + difficulty as i64 / 2);
    let k = rng.gen_range(1..=n.min(3));
    (n, k)
}

pub fn permutations(rng: &mut dyn RngCore, difficulty: u32) -> Draft {
    let (n, k) = choose_nk(rng, difficulty);
    let answer: i64 = (n - k + 1..=n).product();
    Draft::numeric(
        MathCategory::Permutations,
        &[n, k],
        format!("P({n}, {k})"),
        answer as f64,
    )
}

pub fn combinations(rng: &mut dyn RngCore, difficulty: u32) -> Draft {
    let (n, k) = choose_nk(rng, difficulty);
    let perms: i64 = (n - k + 1..=n).product();
    Draft::numeric(
        MathCategory::Combinations,
        &[n, k],
        format!("C({n}, {k})"),
        (perms / factorial_of(k)) as f64,
    )
}

fn random_set(rng: &mut dyn RngCore, universe: i64, max_size: usize) -> Vec<i64> {
    let mut pool: Vec<i64> = (1..=universe).collect();
    pool.shuffle(rng);
    let size = rng.gen_range(2..=max_size);
    let mut set: Vec<i64> = pool.into_iter().take(size).collect();
    set.sort_unstable();
    set
}

fn random_sets(rng: &mut dyn RngCore, difficulty: u32) -> (Vec<i64>, Vec<i64>) {
    let universe = 6 + difficulty as i64;
    let max_size = 2 + difficulty as usize / 2;
    let a = random_set(rng, universe, max_size);
    let b = random_set(rng, universe, max_size);
    (a, b)
}

fn set_numbers(a: &[i64], b: &[i64]) -> Vec<i64> {
    a.iter().chain(b.iter()).copied().collect()
}

pub fn set_union(rng: &mut dyn RngCore, difficulty: u32) -> Draft {
    let (a, b) = random_sets(rng, difficulty);
    let union = a.len() + b.iter().filter(|x| !a.contains(x)).count();
    Draft::numeric(
        MathCategory::SetUnion,
        &set_numbers(&a, &b),
        format!("|A ∪ B| for A = {}, B = {}", set_text(&a), set_text(&b)),
        union as f64,
    )
}

pub fn set_intersection(rng: &mut dyn RngCore, difficulty: u32) -> Draft {
    let (a, b) = random_sets(rng, difficulty);
    let common = b.iter().filter(|x| a.contains(x)).count();
    Draft::numeric(
        MathCategory::SetIntersection,
        &set_numbers(&a, &b),
        format!("|A ∩ B| for A = {}, B = {}", set_text(&a), set_text(&b)),
        common as f64,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generator::challenge::{Answer, DistractorStyle};
    use rand::SeedableRng;
    use rand::rngs::SmallRng;

    #[test]
    fn test_to_roman() {
        assert_eq!(to_roman(1), "I");
        assert_eq!(to_roman(4), "IV");
        assert_eq!(to_roman(48), "XLVIII");
        assert_eq!(to_roman(1994), "MCMXCIV");
        assert_eq!(to_roman(3999), "MMMCMXCIX");
    }

    #[test]
    fn test_is_prime() {
        let primes: Vec<i64> = (0..30).filter(|&n| is_prime(n)).collect();
        assert_eq!(primes, vec![2, 3, 5, 7, 11, 13, 17, 19, 23, 29]);
    }

    #[test]
    fn test_divisor_count() {
        assert_eq!(divisor_count(1), 1);
        assert_eq!(divisor_count(12), 6);
        assert_eq!(divisor_count(13), 2);
    }

    #[test]
    fn test_ordinals() {
        assert_eq!(ordinal(1), "1st");
        assert_eq!(ordinal(2), "2nd");
        assert_eq!(ordinal(3), "3rd");
        assert_eq!(ordinal(4), "4th");
        assert_eq!(ordinal(11), "11th");
        assert_eq!(ordinal(12), "12th");
        assert_eq!(ordinal(22), "22nd");
    }

    #[test]
    fn test_prime_category_is_boolean() {
        let mut rng = SmallRng::seed_from_u64(10);
        for _ in 0..30 {
            let draft = prime_numbers(&mut rng, 4);
            assert_eq!(draft.style, DistractorStyle::Boolean);
            let n = draft.numbers[0] as i64;
            let expected = if is_prime(n) { 1.0 } else { 0.0 };
            assert_eq!(draft.answer, Answer::Number(expected));
        }
    }

    #[test]
    fn test_combinations_match_pascal() {
        let mut rng = SmallRng::seed_from_u64(40);
        for _ in 0..30 {
            let draft = combinations(&mut rng, 10);
            let (n, k) = (draft.numbers[0] as i64, draft.numbers[1] as i64);
            let expected = factorial_of(n) / (factorial_of(k) * factorial_of(n - k));
            assert_eq!(draft.answer.as_number().unwrap() as i64, expected);
        }
    }

    #[test]
    fn test_set_text() {
        assert_eq!(set_text(&[1, 3, 5]), "{1, 3, 5}");
    }
}
