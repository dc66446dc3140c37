use std::f32::consts::SQRT_2;

use jumpgrid_core::Point;

/// Cost of one diagonal step.
pub const DIAGONAL_COST: f32 = SQRT_2;

/// Octile distance: the cost of the shortest unobstructed 8-way walk,
/// with diagonal steps costing √2 and straight steps 1.
#[inline]
pub fn octile(a: Point, b: Point) -> f32 {
    let dx = (a.x - b.x).abs();
    let dy = (a.y - b.y).abs();
    let diagonal = dx.min(dy);
    let straight = dx.max(dy) - diagonal;
    diagonal as f32 * DIAGONAL_COST + straight as f32
}

/// Chebyshev (L∞) distance between two points.
#[inline]
pub fn chebyshev(a: Point, b: Point) -> i32 {
    (a.x - b.x).abs().max((a.y - b.y).abs())
}

/// Sum of octile distances between consecutive waypoints.
pub fn path_cost(path: &[Point]) -> f32 {
    path.windows(2).map(|w| octile(w[0], w[1])).sum()
}
