use std::f64::consts::PI;

use rand::{Rng, RngCore};

use crate::generator::category::MathCategory;
use crate::generator::challenge::Draft;
use crate::generator::{max_number, pick};

/// Integer right triangles, smallest first.
const TRIPLES: [(i64, i64, i64); 4] = [(3, 4, 5), (5, 12, 13), (8, 15, 17), (7, 24, 25)];

fn scaled_triple(rng: &mut dyn RngCore, difficulty: u32) -> (i64, i64, i64) {
    let available = (1 + difficulty as usize / 3).min(TRIPLES.len());
    let (a, b, c) = pick(rng, &TRIPLES[..available]);
    let k = rng.gen_range(1..=1 + difficulty as i64 / 4);
    (a * k, b * k, c * k)
}

pub fn area_of_squares(rng: &mut dyn RngCore, difficulty: u32) -> Draft {
    let side = rng.gen_range(2..=max_number(difficulty));
    Draft::numeric(
        MathCategory::AreaOfSquares,
        &[side],
        format!("Area of a square with side {side}"),
        (side * side) as f64,
    )
}

pub fn area_of_rectangles(rng: &mut dyn RngCore, difficulty: u32) -> Draft {
    let max = max_number(difficulty);
    let width = rng.gen_range(2..=max);
    let height = rng.gen_range(2..=max);
    Draft::numeric(
        MathCategory::AreaOfRectangles,
        &[width, height],
        format!("Area of a {width} by {height} rectangle"),
        (width * height) as f64,
    )
}

pub fn area_of_triangles(rng: &mut dyn RngCore, difficulty: u32) -> Draft {
    let max = max_number(difficulty);
    // Even base keeps base*height/2 whole.
    let base = 2 * rng.gen_range(1..=max / 2 + 1);
    let height = rng.gen_range(1..=max);
    Draft::numeric(
        MathCategory::AreaOfTriangles,
        &[base, height],
        format!("Area of a triangle with base {base} and height {height}"),
        (base * height / 2) as f64,
    )
}

pub fn circumference(rng: &mut dyn RngCore, difficulty: u32) -> Draft {
    let radius = rng.gen_range(1..=difficulty as i64 + 4);
    Draft::numeric(
        MathCategory::Circumference,
        &[radius],
        format!("Circumference of a circle with radius {radius} (2 d.p.)"),
        2.0 * PI * radius as f64,
    )
}

pub fn pythagorean_theorem(rng: &mut dyn RngCore, difficulty: u32) -> Draft {
    let (a, b, c) = scaled_triple(rng, difficulty);
    Draft::numeric(
        MathCategory::PythagoreanTheorem,
        &[a, b],
        format!("Hypotenuse with legs {a} and {b}"),
        c as f64,
    )
}

pub fn volume_cube(rng: &mut dyn RngCore, difficulty: u32) -> Draft {
    let side = rng.gen_range(2..=3 + difficulty as i64);
    Draft::numeric(
        MathCategory::VolumeCube,
        &[side],
        format!("Volume of a cube with side {side}"),
        side.pow(3) as f64,
    )
}

pub fn volume_sphere(rng: &mut dyn RngCore, difficulty: u32) -> Draft {
    let radius = rng.gen_range(1..=2 + difficulty as i64 / 2);
    Draft::numeric(
        MathCategory::VolumeSphere,
        &[radius],
        format!("Volume of a sphere with radius {radius} (2 d.p.)"),
        4.0 / 3.0 * PI * (radius.pow(3) as f64),
    )
}

pub fn volume_cylinder(rng: &mut dyn RngCore, difficulty: u32) -> Draft {
    let radius = rng.gen_range(1..=2 + difficulty as i64 / 2);
    let height = rng.gen_range(1..=difficulty as i64 + 4);
    Draft::numeric(
        MathCategory::VolumeCylinder,
        &[radius, height],
        format!("Volume of a cylinder with radius {radius} and height {height} (2 d.p.)"),
        PI * (radius * radius) as f64 * height as f64,
    )
}

pub fn distance_formula(rng: &mut dyn RngCore, difficulty: u32) -> Draft {
    let (mut dx, mut dy, c) = scaled_triple(rng, difficulty);
    if rng.gen_bool(0.5) {
        std::mem::swap(&mut dx, &mut dy);
    }
    let half = max_number(difficulty) / 2;
    let x1 = rng.gen_range(0..=half);
    let y1 = rng.gen_range(0..=half);
    let (x2, y2) = (x1 + dx, y1 + dy);
    Draft::numeric(
        MathCategory::DistanceFormula,
        &[x1, y1, x2, y2],
        format!("Distance from ({x1}, {y1}) to ({x2}, {y2})"),
        c as f64,
    )
}

pub fn slope_formula(rng: &mut dyn RngCore, difficulty: u32) -> Draft {
    let d = difficulty as i64;
    let dx = rng.gen_range(1..=d + 2);
    let mut slope = rng.gen_range(-(d + 2)..=d + 2);
    if slope == 0 {
        slope = 1;
    }
    let half = max_number(difficulty) / 2;
    let x1 = rng.gen_range(0..=half);
    let y1 = rng.gen_range(0..=half);
    let (x2, y2) = (x1 + dx, y1 + slope * dx);
    Draft::numeric(
        MathCategory::SlopeFormula,
        &[x1, y1, x2, y2],
        format!("Slope through ({x1}, {y1}) and ({x2}, {y2})"),
        slope as f64,
    )
}
