//! Occupancy map with fast nearest-obstacle / nearest-opening queries.
//!
//! A [`CollisionMap`] keeps the same obstacle set twice: once with rows
//! along X and once transposed with rows along Y. Bit scans only run along
//! a packed row, so each mirror serves the scans for one axis. The mirrors
//! are private and every mutator writes both.

use jumpgrid_core::{Dir, Point, Range};

use crate::bitgrid::BitGrid;
use crate::error::SearchError;
use crate::pathfinder::PathFinder;

/// Grid of occupied (impassable) and open cells.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CollisionMap {
    width: i32,
    height: i32,
    /// Row `y`, bit `x`.
    horizontal: BitGrid,
    /// Row `x`, bit `y`.
    vertical: BitGrid,
}

impl CollisionMap {
    /// Build an all-open map of the given size.
    pub fn new(width: i32, height: i32) -> Self {
        let width = width.max(0);
        let height = height.max(0);
        Self {
            width,
            height,
            horizontal: BitGrid::new(width, height),
            vertical: BitGrid::new(height, width),
        }
    }

    /// Build a map and mark `cells` occupied. Cells outside the map are ignored.
    pub fn from_cells(width: i32, height: i32, cells: impl IntoIterator<Item = Point>) -> Self {
        let mut map = Self::new(width, height);
        map.set_occupied_all(cells);
        map
    }

    #[inline]
    pub fn width(&self) -> i32 {
        self.width
    }

    #[inline]
    pub fn height(&self) -> i32 {
        self.height
    }

    /// Size as a `Point` (width, height).
    #[inline]
    pub fn size(&self) -> Point {
        Point::new(self.width, self.height)
    }

    /// The grid rectangle `[0, width) x [0, height)`.
    #[inline]
    pub fn bounds(&self) -> Range {
        Range::from_size(self.size())
    }

    #[inline]
    pub fn is_out_of_bounds(&self, p: Point) -> bool {
        p.x < 0 || p.y < 0 || p.x >= self.width || p.y >= self.height
    }

    /// Whether `p` is blocked. Cells outside the map count as blocked.
    #[inline]
    pub fn is_occupied(&self, p: Point) -> bool {
        self.horizontal.is_set(p.x, p.y)
    }

    /// Whether `p` is inside the map and open.
    #[inline]
    pub fn is_passable(&self, p: Point) -> bool {
        !self.is_occupied(p)
    }

    /// Mark `p` occupied. No-op outside the map.
    pub fn set_occupied(&mut self, p: Point) {
        self.write(p, true);
    }

    /// Mark `p` open. No-op outside the map.
    pub fn clear_occupied(&mut self, p: Point) {
        self.write(p, false);
    }

    /// Mark every cell of `cells` occupied.
    pub fn set_occupied_all(&mut self, cells: impl IntoIterator<Item = Point>) {
        for p in cells {
            self.write(p, true);
        }
    }

    /// Open every cell again.
    pub fn reset(&mut self) {
        self.horizontal.reset();
        self.vertical.reset();
    }

    /// Number of occupied cells.
    pub fn occupied_count(&self) -> usize {
        self.horizontal.count_set()
    }

    /// Occupied cells in row-major order.
    pub fn occupied_cells(&self) -> impl Iterator<Item = Point> + '_ {
        self.bounds().iter().filter(|p| self.is_occupied(*p))
    }

    /// Coordinate reported by the directional queries when nothing is found:
    /// `-1` towards N and W, `height` towards S, `width` towards E.
    #[inline]
    pub fn boundary(&self, dir: Dir) -> i32 {
        let step = dir.offset();
        match (step.x, step.y) {
            (1, _) => self.width,
            (-1, _) => -1,
            (_, 1) => self.height,
            _ => -1,
        }
    }

    /// Along-axis coordinate of the first occupied cell from `p` (inclusive)
    /// towards the cardinal `dir`, or [`boundary`](Self::boundary).
    #[inline]
    pub fn closest_obstacle(&self, p: Point, dir: Dir) -> i32 {
        self.scan(p, dir, false)
    }

    /// Along-axis coordinate of the first open cell from `p` (inclusive)
    /// towards the cardinal `dir`, or [`boundary`](Self::boundary).
    #[inline]
    pub fn closest_opening(&self, p: Point, dir: Dir) -> i32 {
        self.scan(p, dir, true)
    }

    /// Shortest jump-point path from `start` to `goal` with default settings.
    ///
    /// Allocates a fresh [`PathFinder`]; keep one around instead when
    /// running many queries.
    pub fn find_path(&self, start: Point, goal: Point) -> Result<Vec<Point>, SearchError> {
        PathFinder::for_map(self).jps_path(self, start, goal)
    }

    fn scan(&self, p: Point, dir: Dir, open: bool) -> i32 {
        debug_assert!(!dir.is_diagonal(), "map scans run along cardinal directions");
        // Diagonals fall back to their horizontal component.
        let step = dir.offset();
        let (grid, along, row, forward) = if step.x != 0 {
            (&self.horizontal, p.x, p.y, step.x > 0)
        } else {
            (&self.vertical, p.y, p.x, step.y > 0)
        };
        if open {
            grid.nearest_clear(along, row, forward)
        } else {
            grid.nearest_set(along, row, forward)
        }
    }

    fn write(&mut self, p: Point, occupied: bool) {
        if self.is_out_of_bounds(p) {
            return;
        }
        let h = self.horizontal.set(p.x, p.y, occupied);
        let v = self.vertical.set(p.y, p.x, occupied);
        debug_assert!(h && v, "collision mirrors disagree on bounds at {p}");
    }

    #[cfg(test)]
    pub(crate) fn mirrors_agree(&self) -> bool {
        self.bounds()
            .iter()
            .all(|p| self.horizontal.is_set(p.x, p.y) == self.vertical.is_set(p.y, p.x))
    }
}
