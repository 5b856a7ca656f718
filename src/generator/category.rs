use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum MathCategory {
    Addition,
    Subtraction,
    Multiplication,
    Division,
    Mixed,
    Algebra,
    Percentages,
    Exponents,
    Fractions,
    Decimals,
    Ratios,
    SquareRoots,
    OrderOfOperations,
    AreaOfSquares,
    AreaOfRectangles,
    AreaOfTriangles,
    Circumference,
    PythagoreanTheorem,
    LinearEquations,
    QuadraticEquations,
    PrimeNumbers,
    Factors,
    Multiples,
    RomanNumerals,
    Mean,
    Median,
    Mode,
    Range,
    SimpleProbability,
    SimpleInterest,
    Discounts,
    UnitConversion,
    TimeCalculation,
    LogicPuzzles,
    Sine,
    Cosine,
    Tangent,
    BasicDerivatives,
    BasicIntegrals,
    Logarithms,
    PolynomialAddition,
    PolynomialSubtraction,
    Inequalities,
    VolumeCube,
    VolumeSphere,
    VolumeCylinder,
    DistanceFormula,
    SlopeFormula,
    Permutations,
    Combinations,
    SetUnion,
    SetIntersection,
    Factorial,
    CompoundInterest,
    SalesTax,
}

/// Categories `Mixed` draws from.
pub const MIXED_POOL: [MathCategory; 4] = [
    MathCategory::Addition,
    MathCategory::Subtraction,
    MathCategory::Multiplication,
    MathCategory::Division,
];

pub const ALL_CATEGORIES: &[MathCategory] = &[
    MathCategory::Addition,
    MathCategory::Subtraction,
    MathCategory::Multiplication,
    MathCategory::Division,
    MathCategory::Mixed,
    MathCategory::Algebra,
    MathCategory::Percentages,
    MathCategory::Exponents,
    MathCategory::Fractions,
    MathCategory::Decimals,
    MathCategory::Ratios,
    MathCategory::SquareRoots,
    MathCategory::OrderOfOperations,
    MathCategory::AreaOfSquares,
    MathCategory::AreaOfRectangles,
    MathCategory::AreaOfTriangles,
    MathCategory::Circumference,
    MathCategory::PythagoreanTheorem,
    MathCategory::LinearEquations,
    MathCategory::QuadraticEquations,
    MathCategory::PrimeNumbers,
    MathCategory::Factors,
    MathCategory::Multiples,
    MathCategory::RomanNumerals,
    MathCategory::Mean,
    MathCategory::Median,
    MathCategory::Mode,
    MathCategory::Range,
    MathCategory::SimpleProbability,
    MathCategory::SimpleInterest,
    MathCategory::Discounts,
    MathCategory::UnitConversion,
    MathCategory::TimeCalculation,
    MathCategory::LogicPuzzles,
    MathCategory::Sine,
    MathCategory::Cosine,
    MathCategory::Tangent,
    MathCategory::BasicDerivatives,
    MathCategory::BasicIntegrals,
    MathCategory::Logarithms,
    MathCategory::PolynomialAddition,
    MathCategory::PolynomialSubtraction,
    MathCategory::Inequalities,
    MathCategory::VolumeCube,
    MathCategory::VolumeSphere,
    MathCategory::VolumeCylinder,
    MathCategory::DistanceFormula,
    MathCategory::SlopeFormula,
    MathCategory::Permutations,
    MathCategory::Combinations,
    MathCategory::SetUnion,
    MathCategory::SetIntersection,
    MathCategory::Factorial,
    MathCategory::CompoundInterest,
    MathCategory::SalesTax,
];

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum CategoryGroup {
    Arithmetic,
    AdvancedArithmetic,
    Algebra,
    Geometry,
    NumberTheory,
    Statistics,
    PracticalMath,
    Logic,
    Trigonometry,
    Calculus,
    Combinatorics,
}

pub const ALL_GROUPS: &[CategoryGroup] = &[
    CategoryGroup::Arithmetic,
    CategoryGroup::AdvancedArithmetic,
    CategoryGroup::Algebra,
    CategoryGroup::Geometry,
    CategoryGroup::NumberTheory,
    CategoryGroup::Statistics,
    CategoryGroup::PracticalMath,
    CategoryGroup::Logic,
    CategoryGroup::Trigonometry,
    CategoryGroup::Calculus,
    CategoryGroup::Combinatorics,
];

impl CategoryGroup {
    pub fn label(self) -> &'static str {
        match self {
            CategoryGroup::Arithmetic => "Arithmetic",
            CategoryGroup::AdvancedArithmetic => "Advanced Arithmetic",
            CategoryGroup::Algebra => "Algebra",
            CategoryGroup::Geometry => "Geometry",
            CategoryGroup::NumberTheory => "Number Theory",
            CategoryGroup::Statistics => "Statistics & Probability",
            CategoryGroup::PracticalMath => "Practical Math",
            CategoryGroup::Logic => "Logic",
            CategoryGroup::Trigonometry => "Trigonometry",
            CategoryGroup::Calculus => "Calculus",
            CategoryGroup::Combinatorics => "Sets & Counting",
        }
    }

    pub fn categories(self) -> Vec<MathCategory> {
        ALL_CATEGORIES
            .iter()
            .copied()
            .filter(|c| c.group() == self)
            .collect()
    }
}

/// Presentational glyph for a category.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum OperatorSymbol {
    Plus,
    Minus,
    Times,
    Divide,
    Unknown,
    Percent,
    Power,
    Fraction,
    Decimal,
    Ratio,
    Root,
    Pemdas,
    Square,
    Rectangle,
    Triangle,
    Circle,
    Pythagoras,
    Solve,
    Roots,
    PrimeTest,
    FactorCount,
    Multiple,
    Roman,
    Average,
    MedianMark,
    ModeMark,
    RangeMark,
    Probability,
    Money,
    Convert,
    Clock,
    Therefore,
    Sin,
    Cos,
    Tan,
    Derivative,
    Integral,
    Log,
    PolySum,
    PolyDiff,
    LessThan,
    Cube,
    Sphere,
    Cylinder,
    Distance,
    Slope,
    Permutation,
    Combination,
    Union,
    Intersection,
    Bang,
    Compound,
    Tax,
}

impl OperatorSymbol {
    pub fn glyph(self) -> &'static str {
        match self {
            OperatorSymbol::Plus => "+",
            OperatorSymbol::Minus => "-",
            OperatorSymbol::Times => "×",
            OperatorSymbol::Divide => "÷",
            OperatorSymbol::Unknown => "?",
            OperatorSymbol::Percent => "%",
            OperatorSymbol::Power => "^",
            OperatorSymbol::Fraction => "ƒ",
            OperatorSymbol::Decimal => ".",
            OperatorSymbol::Ratio => ":",
            OperatorSymbol::Root => "√",
            OperatorSymbol::Pemdas => "PEMDAS",
            OperatorSymbol::Square => "■",
            OperatorSymbol::Rectangle => "▭",
            OperatorSymbol::Triangle => "△",
            OperatorSymbol::Circle => "○",
            OperatorSymbol::Pythagoras => "a²+b²=c²",
            OperatorSymbol::Solve => "x=",
            OperatorSymbol::Roots => "x₁‚x₂",
            OperatorSymbol::PrimeTest => "P?",
            OperatorSymbol::FactorCount => "ƒ(n)",
            OperatorSymbol::Multiple => "M",
            OperatorSymbol::Roman => "I",
            OperatorSymbol::Average => "avg",
            OperatorSymbol::MedianMark => "med",
            OperatorSymbol::ModeMark => "mode",
            OperatorSymbol::RangeMark => "R",
            OperatorSymbol::Probability => "P(A)",
            OperatorSymbol::Money => "$",
            OperatorSymbol::Convert => "⇔",
            OperatorSymbol::Clock => "⏳",
            OperatorSymbol::Therefore => "∴",
            OperatorSymbol::Sin => "sin",
            OperatorSymbol::Cos => "cos",
            OperatorSymbol::Tan => "tan",
            OperatorSymbol::Derivative => "d/dx",
            OperatorSymbol::Integral => "∫",
            OperatorSymbol::Log => "log",
            OperatorSymbol::PolySum => "P(x)+Q(x)",
            OperatorSymbol::PolyDiff => "P(x)-Q(x)",
            OperatorSymbol::LessThan => "<",
            OperatorSymbol::Cube => "V³",
            OperatorSymbol::Sphere => "V⨁",
            OperatorSymbol::Cylinder => "V▭",
            OperatorSymbol::Distance => "↔",
            OperatorSymbol::Slope => "m",
            OperatorSymbol::Permutation => "P(n,k)",
            OperatorSymbol::Combination => "C(n,k)",
            OperatorSymbol::Union => "∪",
            OperatorSymbol::Intersection => "∩",
            OperatorSymbol::Bang => "!",
            OperatorSymbol::Compound => "CI",
            OperatorSymbol::Tax => "tax",
        }
    }
}

impl MathCategory {
    pub fn slug(self) -> &'static str {
        match self {
            MathCategory::Addition => "addition",
            MathCategory::Subtraction => "subtraction",
            MathCategory::Multiplication => "multiplication",
            MathCategory::Division => "division",
            MathCategory::Mixed => "mixed",
            MathCategory::Algebra => "algebra",
            MathCategory::Percentages => "percentages",
            MathCategory::Exponents => "exponents",
            MathCategory::Fractions => "fractions",
            MathCategory::Decimals => "decimals",
            MathCategory::Ratios => "ratios",
            MathCategory::SquareRoots => "square-roots",
            MathCategory::OrderOfOperations => "order-of-operations",
            MathCategory::AreaOfSquares => "area-of-squares",
            MathCategory::AreaOfRectangles => "area-of-rectangles",
            MathCategory::AreaOfTriangles => "area-of-triangles",
            MathCategory::Circumference => "circumference",
            MathCategory::PythagoreanTheorem => "pythagorean-theorem",
            MathCategory::LinearEquations => "linear-equations",
            MathCategory::QuadraticEquations => "quadratic-equations",
            MathCategory::PrimeNumbers => "prime-numbers",
            MathCategory::Factors => "factors",
            MathCategory::Multiples => "multiples",
            MathCategory::RomanNumerals => "roman-numerals",
            MathCategory::Mean => "mean",
            MathCategory::Median => "median",
            MathCategory::Mode => "mode",
            MathCategory::Range => "range",
            MathCategory::SimpleProbability => "simple-probability",
            MathCategory::SimpleInterest => "simple-interest",
            MathCategory::Discounts => "discounts",
            MathCategory::UnitConversion => "unit-conversion",
            MathCategory::TimeCalculation => "time-calculation",
            MathCategory::LogicPuzzles => "logic-puzzles",
            MathCategory::Sine => "sine",
            MathCategory::Cosine => "cosine",
            MathCategory::Tangent => "tangent",
            MathCategory::BasicDerivatives => "basic-derivatives",
            MathCategory::BasicIntegrals => "basic-integrals",
            MathCategory::Logarithms => "logarithms",
            MathCategory::PolynomialAddition => "polynomial-addition",
            MathCategory::PolynomialSubtraction => "polynomial-subtraction",
            MathCategory::Inequalities => "inequalities",
            MathCategory::VolumeCube => "volume-cube",
            MathCategory::VolumeSphere => "volume-sphere",
            MathCategory::VolumeCylinder => "volume-cylinder",
            MathCategory::DistanceFormula => "distance-formula",
            MathCategory::SlopeFormula => "slope-formula",
            MathCategory::Permutations => "permutations",
            MathCategory::Combinations => "combinations",
            MathCategory::SetUnion => "set-union",
            MathCategory::SetIntersection => "set-intersection",
            MathCategory::Factorial => "factorial",
            MathCategory::CompoundInterest => "compound-interest",
            MathCategory::SalesTax => "sales-tax",
        }
    }

    pub fn from_slug(slug: &str) -> Option<Self> {
        ALL_CATEGORIES
            .iter()
            .copied()
            .find(|c| c.slug().eq_ignore_ascii_case(slug.trim()))
    }

    /// Human label derived from the slug ("square-roots" -> "Square Roots").
    pub fn label(self) -> String {
        self.slug()
            .split('-')
            .map(|word| {
                let mut chars = word.chars();
                match chars.next() {
                    Some(first) => first.to_uppercase().chain(chars).collect::<String>(),
                    None => String::new(),
                }
            })
            .collect::<Vec<_>>()
            .join(" ")
    }

    pub fn group(self) -> CategoryGroup {
        use MathCategory::*;
        match self {
            Addition | Subtraction | Multiplication | Division | Mixed => CategoryGroup::Arithmetic,
            Fractions | Decimals | Percentages | Ratios | Exponents | SquareRoots
            | OrderOfOperations => CategoryGroup::AdvancedArithmetic,
            Algebra | LinearEquations | QuadraticEquations | Inequalities | PolynomialAddition
            | PolynomialSubtraction | Logarithms => CategoryGroup::Algebra,
            AreaOfSquares | AreaOfRectangles | AreaOfTriangles | Circumference
            | PythagoreanTheorem | VolumeCube | VolumeSphere | VolumeCylinder
            | DistanceFormula | SlopeFormula => CategoryGroup::Geometry,
            PrimeNumbers | Factors | Multiples | RomanNumerals | Factorial => {
                CategoryGroup::NumberTheory
            }
            Mean | Median | Mode | Range | SimpleProbability => CategoryGroup::Statistics,
            SimpleInterest | CompoundInterest | Discounts | SalesTax | UnitConversion
            | TimeCalculation => CategoryGroup::PracticalMath,
            LogicPuzzles => CategoryGroup::Logic,
            Sine | Cosine | Tangent => CategoryGroup::Trigonometry,
            BasicDerivatives | BasicIntegrals => CategoryGroup::Calculus,
            Permutations | Combinations | SetUnion | SetIntersection => {
                CategoryGroup::Combinatorics
            }
        }
    }

    pub fn operator(self) -> OperatorSymbol {
        use MathCategory::*;
        match self {
            Addition => OperatorSymbol::Plus,
            Subtraction => OperatorSymbol::Minus,
            Multiplication => OperatorSymbol::Times,
            Division => OperatorSymbol::Divide,
            Mixed | Algebra => OperatorSymbol::Unknown,
            Percentages => OperatorSymbol::Percent,
            Exponents => OperatorSymbol::Power,
            Fractions => OperatorSymbol::Fraction,
            Decimals => OperatorSymbol::Decimal,
            Ratios => OperatorSymbol::Ratio,
            SquareRoots => OperatorSymbol::Root,
            OrderOfOperations => OperatorSymbol::Pemdas,
            AreaOfSquares => OperatorSymbol::Square,
            AreaOfRectangles => OperatorSymbol::Rectangle,
            AreaOfTriangles => OperatorSymbol::Triangle,
            Circumference => OperatorSymbol::Circle,
            PythagoreanTheorem => OperatorSymbol::Pythagoras,
            LinearEquations => OperatorSymbol::Solve,
            QuadraticEquations => OperatorSymbol::Roots,
            PrimeNumbers => OperatorSymbol::PrimeTest,
            Factors => OperatorSymbol::FactorCount,
            Multiples => OperatorSymbol::Multiple,
            RomanNumerals => OperatorSymbol::Roman,
            Mean => OperatorSymbol::Average,
            Median => OperatorSymbol::MedianMark,
            Mode => OperatorSymbol::ModeMark,
            Range => OperatorSymbol::RangeMark,
            SimpleProbability => OperatorSymbol::Probability,
            SimpleInterest | Discounts => OperatorSymbol::Money,
            UnitConversion => OperatorSymbol::Convert,
            TimeCalculation => OperatorSymbol::Clock,
            LogicPuzzles => OperatorSymbol::Therefore,
            Sine => OperatorSymbol::Sin,
            Cosine => OperatorSymbol::Cos,
            Tangent => OperatorSymbol::Tan,
            BasicDerivatives => OperatorSymbol::Derivative,
            BasicIntegrals => OperatorSymbol::Integral,
            Logarithms => OperatorSymbol::Log,
            PolynomialAddition => OperatorSymbol::PolySum,
            PolynomialSubtraction => OperatorSymbol::PolyDiff,
            Inequalities => OperatorSymbol::LessThan,
            VolumeCube => OperatorSymbol::Cube,
            VolumeSphere => OperatorSymbol::Sphere,
            VolumeCylinder => OperatorSymbol::Cylinder,
            DistanceFormula => OperatorSymbol::Distance,
            SlopeFormula => OperatorSymbol::Slope,
            Permutations => OperatorSymbol::Permutation,
            Combinations => OperatorSymbol::Combination,
            SetUnion => OperatorSymbol::Union,
            SetIntersection => OperatorSymbol::Intersection,
            Factorial => OperatorSymbol::Bang,
            CompoundInterest => OperatorSymbol::Compound,
            SalesTax => OperatorSymbol::Tax,
        }
    }
}

impl std::fmt::Display for MathCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.slug())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_slug_round_trips_for_every_category() {
        for &category in ALL_CATEGORIES {
            assert_eq!(MathCategory::from_slug(category.slug()), Some(category));
        }
    }

    #[test]
    fn test_serde_uses_slug() {
        let json = serde_json::to_string(&MathCategory::OrderOfOperations).unwrap();
        assert_eq!(json, "\"order-of-operations\"");
        let parsed: MathCategory = serde_json::from_str("\"square-roots\"").unwrap();
        assert_eq!(parsed, MathCategory::SquareRoots);
    }

    #[test]
    fn test_label() {
        assert_eq!(MathCategory::SquareRoots.label(), "Square Roots");
        assert_eq!(MathCategory::Addition.label(), "Addition");
    }

    #[test]
    fn test_every_category_belongs_to_a_listed_group() {
        let grouped: usize = ALL_GROUPS.iter().map(|g| g.categories().len()).sum();
        assert_eq!(grouped, ALL_CATEGORIES.len());
    }

    #[test]
    fn test_unknown_slug() {
        assert_eq!(MathCategory::from_slug("calculus-3"), None);
    }
}
