//! Jump Point Search primitives: neighbour pruning and the jump functions.
//!
//! Straight jumps do not walk cell by cell. From the first cell of the ray
//! they look up, with two bit scans per lane, how far the centre lane stays
//! open and where each of the two side lanes first re-opens after being
//! blocked. A side lane that re-opens inside the centre span produces a
//! forced neighbour, and the cell next to the re-opening is the jump point.

use jumpgrid_core::{Dir, DirSet, Point};

use crate::collision::CollisionMap;

/// Jump point queries against one map, towards one goal.
#[derive(Clone, Copy, Debug)]
pub struct Jumper<'a> {
    map: &'a CollisionMap,
    goal: Point,
}

impl<'a> Jumper<'a> {
    pub fn new(map: &'a CollisionMap, goal: Point) -> Self {
        Self { map, goal }
    }

    #[inline]
    pub fn goal(&self) -> Point {
        self.goal
    }

    /// False for cells outside the map or occupied.
    #[inline]
    pub fn is_passable(&self, p: Point) -> bool {
        self.map.is_passable(p)
    }

    #[inline]
    fn enterable(&self, p: Point, dir: Dir) -> bool {
        self.is_passable(p.step(dir))
    }

    /// Directions that must be explored from `p` when arriving along `dir`
    /// because an adjacent obstacle hides them from the natural successors.
    ///
    /// A neighbour is forced when it is enterable but the cell that would
    /// normally lead to it is not. `None` (the start node) has no forced
    /// neighbours.
    pub fn forced_neighbors(&self, p: Point, dir: Option<Dir>) -> DirSet {
        let Some(dir) = dir else {
            return DirSet::EMPTY;
        };
        // (candidate, guard) rotations relative to `dir`
        let rules = if dir.is_diagonal() {
            [(6, 5), (2, 3)]
        } else {
            [(7, 6), (1, 2)]
        };
        let mut forced = DirSet::EMPTY;
        for (candidate, guard) in rules {
            let candidate = dir.rotate(candidate);
            if self.enterable(p, candidate) && !self.enterable(p, dir.rotate(guard)) {
                forced.insert(candidate);
            }
        }
        forced
    }

    /// Successor directions implied by the arrival direction alone: the
    /// direction itself, plus its two components for a diagonal. The start
    /// node (`None`) explores all eight.
    pub fn natural_neighbors(dir: Option<Dir>) -> DirSet {
        match dir {
            None => DirSet::ALL,
            Some(d) if d.is_diagonal() => DirSet::single(d).with(d.rotate(1)).with(d.rotate(7)),
            Some(d) => DirSet::single(d),
        }
    }

    /// Bounding-box reopen scan of the lane through `probe` towards `dir`.
    ///
    /// Returns `(near, far)` along the travel axis:
    /// - open probe: `near` is the last open cell before the first obstacle
    ///   and `far` the first open cell after that obstacle run;
    /// - occupied probe: both are the first open cell from the probe on;
    /// - probe lane outside the map: both are the map boundary.
    ///
    /// Missing cells are reported as [`CollisionMap::boundary`].
    pub fn reopen_bounds(&self, probe: Point, dir: Dir) -> (i32, i32) {
        let boundary = self.map.boundary(dir);
        let lanes = if is_horizontal(dir) {
            self.map.height()
        } else {
            self.map.width()
        };
        let lane = cross(probe, dir);
        if lane < 0 || lane >= lanes {
            return (boundary, boundary);
        }
        if self.map.is_occupied(probe) {
            let open = self.map.closest_opening(probe, dir);
            return (open, open);
        }
        let obstacle = self.map.closest_obstacle(probe, dir);
        let reopen = self.map.closest_opening(with_along(probe, dir, obstacle), dir);
        (obstacle - unit(dir), reopen)
    }

    /// Straight jump along the cardinal `dir`, starting one step past `from`.
    ///
    /// Returns the goal if it lies on the open span ahead, otherwise the
    /// first cell of the span that has a forced neighbour, or `None`.
    pub fn jump_along(&self, from: Point, dir: Dir) -> Option<Point> {
        debug_assert!(!dir.is_diagonal(), "jump_along takes a cardinal direction");
        let cur = from.step(dir);
        if !self.is_passable(cur) {
            return None;
        }
        let s = unit(dir);
        let (reach, _) = self.reopen_bounds(cur, dir);

        let goal = self.goal;
        if cross(goal, dir) == cross(cur, dir)
            && s * (along(goal, dir) - along(cur, dir)) >= 0
            && s * (reach - along(goal, dir)) >= 0
        {
            return Some(goal);
        }

        let boundary = self.map.boundary(dir);
        let mut best: Option<i32> = None;
        for side in [dir.rotate(6), dir.rotate(2)] {
            let (near, far) = self.reopen_bounds(cur.step(side), dir);
            if far == boundary {
                continue;
            }
            // The side lane is blocked at `j` and open right after it.
            let j = far - s;
            let inside = s * (reach - j) >= 0;
            let blocked_first = near == far || s * (reach - near) > 0;
            if inside && blocked_first {
                best = match best {
                    Some(b) if s * (b - j) <= 0 => Some(b),
                    _ => Some(j),
                };
            }
        }
        best.map(|j| with_along(cur, dir, j))
    }

    /// Jump from `from` towards `dir` until a jump point is found or the
    /// ray leaves the passable region.
    ///
    /// A diagonal ray stops at the first cell from which either of its two
    /// cardinal components finds a jump point, and returns that cell.
    pub fn jump(&self, from: Point, dir: Dir) -> Option<Point> {
        let mut cur = from.step(dir);
        loop {
            if !self.is_passable(cur) {
                return None;
            }
            if cur == self.goal || !self.forced_neighbors(cur, Some(dir)).is_empty() {
                return Some(cur);
            }
            if !dir.is_diagonal() {
                return self.jump_along(cur, dir);
            }
            if self.jump_along(cur, dir.rotate(7)).is_some()
                || self.jump_along(cur, dir.rotate(1)).is_some()
            {
                return Some(cur);
            }
            cur = cur.step(dir);
        }
    }
}

#[inline]
fn is_horizontal(dir: Dir) -> bool {
    dir.offset().x != 0
}

/// +1 or -1: the step of a cardinal direction along its own axis.
#[inline]
fn unit(dir: Dir) -> i32 {
    let o = dir.offset();
    o.x + o.y
}

#[inline]
fn along(p: Point, dir: Dir) -> i32 {
    if is_horizontal(dir) { p.x } else { p.y }
}

#[inline]
fn cross(p: Point, dir: Dir) -> i32 {
    if is_horizontal(dir) { p.y } else { p.x }
}

#[inline]
fn with_along(p: Point, dir: Dir, v: i32) -> Point {
    if is_horizontal(dir) {
        Point::new(v, p.y)
    } else {
        Point::new(p.x, v)
    }
}
