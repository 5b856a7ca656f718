pub mod algebra;
pub mod arithmetic;
pub mod category;
pub mod challenge;
pub mod distractors;
pub mod geometry;
pub mod number_theory;
pub mod practical;
pub mod statistics;

use rand::{Rng, RngCore};

use crate::engine::adaptation::clamp_difficulty;
use crate::generator::category::MathCategory;
use crate::generator::challenge::{Challenge, Draft};

/// One category formula: difficulty in, draft (question + answer) out.
pub type Formula = fn(&mut dyn RngCore, u32) -> Draft;

/// Generate a complete challenge for `category` at `difficulty` (clamped to 1..=10).
pub fn generate(category: MathCategory, difficulty: u32, rng: &mut dyn RngCore) -> Challenge {
    let difficulty = clamp_difficulty(difficulty as i64);
    let draft = formula_for(category)(rng, difficulty);
    let options = distractors::build_options(&draft.answer, draft.style, difficulty, rng);

    Challenge {
        category: draft.category,
        operator: draft.category.operator(),
        numbers: draft.numbers,
        question: format!("{} = ?", draft.prompt),
        answer: draft.answer,
        options,
    }
}

pub fn formula_for(category: MathCategory) -> Formula {
    use MathCategory::*;
    match category {
        Addition => arithmetic::addition,
        Subtraction => arithmetic::subtraction,
        Multiplication => arithmetic::multiplication,
        Division => arithmetic::division,
        Mixed => arithmetic::mixed,
        Algebra => arithmetic::algebra,
        Percentages => arithmetic::percentages,
        Exponents => arithmetic::exponents,
        Fractions => arithmetic::fractions,
        Decimals => arithmetic::decimals,
        Ratios => arithmetic::ratios,
        SquareRoots => arithmetic::square_roots,
        OrderOfOperations => arithmetic::order_of_operations,
        AreaOfSquares => geometry::area_of_squares,
        AreaOfRectangles => geometry::area_of_rectangles,
        AreaOfTriangles => geometry::area_of_triangles,
        Circumference => geometry::circumference,
        PythagoreanTheorem => geometry::pythagorean_theorem,
        VolumeCube => geometry::volume_cube,
        VolumeSphere => geometry::volume_sphere,
        VolumeCylinder => geometry::volume_cylinder,
        DistanceFormula => geometry::distance_formula,
        SlopeFormula => geometry::slope_formula,
        LinearEquations => algebra::linear_equations,
        QuadraticEquations => algebra::quadratic_equations,
        Inequalities => algebra::inequalities,
        PolynomialAddition => algebra::polynomial_addition,
        PolynomialSubtraction => algebra::polynomial_subtraction,
        Logarithms => algebra::logarithms,
        BasicDerivatives => algebra::basic_derivatives,
        BasicIntegrals => algebra::basic_integrals,
        Sine => algebra::sine,
        Cosine => algebra::cosine,
        Tangent => algebra::tangent,
        PrimeNumbers => number_theory::prime_numbers,
        Factors => number_theory::factors,
        Multiples => number_theory::multiples,
        RomanNumerals => number_theory::roman_numerals,
        Factorial => number_theory::factorial,
        Permutations => number_theory::permutations,
        Combinations => number_theory::combinations,
        SetUnion => number_theory::set_union,
        SetIntersection => number_theory::set_intersection,
        Mean => statistics::mean,
        Median => statistics::median,
        Mode => statistics::mode,
        Range => statistics::range,
        SimpleProbability => statistics::simple_probability,
        SimpleInterest => practical::simple_interest,
        CompoundInterest => practical::compound_interest,
        Discounts => practical::discounts,
        SalesTax => practical::sales_tax,
        UnitConversion => practical::unit_conversion,
        TimeCalculation => practical::time_calculation,
        LogicPuzzles => practical::logic_puzzles,
    }
}

pub(crate) fn operand_count(difficulty: u32) -> usize {
    (difficulty / 3 + 2) as usize
}

pub(crate) fn max_number(difficulty: u32) -> i64 {
    difficulty as i64 * 5 + 5
}

/// `difficulty/3 + 2` operands, each in `1..=difficulty*5 + 5`.
pub(crate) fn operands(rng: &mut dyn RngCore, difficulty: u32) -> Vec<i64> {
    let max = max_number(difficulty);
    (0..operand_count(difficulty))
        .map(|_| rng.gen_range(1..=max))
        .collect()
}

pub(crate) fn pick<T: Copy>(rng: &mut dyn RngCore, items: &[T]) -> T {
    items[rng.gen_range(0..items.len())]
}
