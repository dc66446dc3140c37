//! Placement of a grid in continuous world coordinates.

use jumpgrid_core::Point;
use jumpgrid_paths::CollisionMap;

/// Maps grid cells to world positions and back.
///
/// Cell `(x, y)` covers `[origin + (x, y) * cell_size, origin + (x + 1,
/// y + 1) * cell_size)` in world space. World Y grows the same way as grid
/// Y.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GridLayout {
    /// World position of the top-left corner of cell (0, 0).
    pub origin: (f32, f32),
    /// World extent of one cell along X and Y.
    pub cell_size: (f32, f32),
    /// Grid size in cells.
    pub size: Point,
}

impl GridLayout {
    pub fn new(origin: (f32, f32), cell_size: (f32, f32), size: Point) -> Self {
        Self {
            origin,
            cell_size,
            size,
        }
    }

    /// Layout with square cells covering `map`.
    pub fn for_map(map: &CollisionMap, origin: (f32, f32), cell_size: f32) -> Self {
        Self::new(origin, (cell_size, cell_size), map.size())
    }

    /// World position of the centre of cell `p`. Cells outside the grid are
    /// extrapolated.
    pub fn cell_center(&self, p: Point) -> (f32, f32) {
        (
            self.origin.0 + (p.x as f32 + 0.5) * self.cell_size.0,
            self.origin.1 + (p.y as f32 + 0.5) * self.cell_size.1,
        )
    }

    /// Cell containing the world position, or `None` outside the grid or
    /// for a degenerate cell size.
    pub fn world_to_cell(&self, x: f32, y: f32) -> Option<Point> {
        if self.cell_size.0 <= 0.0 || self.cell_size.1 <= 0.0 {
            return None;
        }
        let fx = ((x - self.origin.0) / self.cell_size.0).floor();
        let fy = ((y - self.origin.1) / self.cell_size.1).floor();
        if !(fx >= 0.0 && fy >= 0.0 && fx < self.size.x as f32 && fy < self.size.y as f32) {
            return None;
        }
        Some(Point::new(fx as i32, fy as i32))
    }

    /// World positions of the centres of every waypoint.
    pub fn path_to_world(&self, path: &[Point]) -> Vec<(f32, f32)> {
        path.iter().map(|p| self.cell_center(*p)).collect()
    }
}


#[cfg(all(test, feature = "serde"))]
mod serde_tests {
    use super::*;

    #[test]
    fn layout_round_trip() {
        let l = GridLayout::new((1.5, -2.0), (0.5, 0.25), Point::new(3, 9));
        let json = serde_json::to_string(&l).unwrap();
        let back: GridLayout = serde_json::from_str(&json).unwrap();
        assert_eq!(l, back);
    }
}
