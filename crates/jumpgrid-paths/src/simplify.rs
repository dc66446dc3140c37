//! Waypoint simplification by line of sight.

use jumpgrid_core::Point;

use crate::collision::CollisionMap;

/// Cells of the Bresenham line from `from` to `to`, both ends included.
///
/// Consecutive cells are 8-adjacent and the line visits
/// `max(|dx|, |dy|) + 1` cells.
#[derive(Clone, Debug)]
pub struct Line {
    cur: Point,
    end: Point,
    dx: i32,
    dy: i32,
    sx: i32,
    sy: i32,
    err: i32,
    done: bool,
}

impl Line {
    pub fn new(from: Point, to: Point) -> Self {
        let dx = (to.x - from.x).abs();
        let dy = -(to.y - from.y).abs();
        Self {
            cur: from,
            end: to,
            dx,
            dy,
            sx: (to.x - from.x).signum(),
            sy: (to.y - from.y).signum(),
            err: dx + dy,
            done: false,
        }
    }
}

impl Iterator for Line {
    type Item = Point;

    fn next(&mut self) -> Option<Point> {
        if self.done {
            return None;
        }
        let p = self.cur;
        if p == self.end {
            self.done = true;
            return Some(p);
        }
        let e2 = 2 * self.err;
        if e2 >= self.dy {
            self.err += self.dy;
            self.cur.x += self.sx;
        }
        if e2 <= self.dx {
            self.err += self.dx;
            self.cur.y += self.sy;
        }
        Some(p)
    }
}

/// Whether every cell on the Bresenham line from `a` to `b` is open.
pub fn line_of_sight(map: &CollisionMap, a: Point, b: Point) -> bool {
    Line::new(a, b).all(|p| map.is_passable(p))
}

/// Drop waypoints that can be skipped by a straight line.
///
/// Each pass walks consecutive triples and removes the middle point when
/// its neighbours see each other; passes repeat until one removes nothing,
/// so afterwards no single waypoint can be dropped. Endpoints are never
/// removed. Returns whether the path changed.
pub fn pull_string(map: &CollisionMap, path: &mut Vec<Point>) -> bool {
    if path.len() <= 2 {
        return false;
    }
    let before = path.len();
    loop {
        let len = path.len();
        let mut mid = 1;
        while mid + 1 < path.len() {
            if line_of_sight(map, path[mid - 1], path[mid + 1]) {
                path.remove(mid);
            } else {
                mid += 1;
            }
        }
        if path.len() == len {
            break;
        }
    }
    path.len() < before
}
