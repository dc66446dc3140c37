//! Obstacle generators for collision maps.
//!
//! Provides three generators, all writing through the map mutators so both
//! of its mirrors stay in sync:
//! - **Scatter**: independent single-cell blocks.
//! - **Rooms**: hollow rectangles with one door each.
//! - **Maze**: a perfect maze carved by a randomized depth-first walk.
//! - **Cellular Automata Cave**: random walls smoothed with neighbour
//!   count rules.

use jumpgrid_core::{Dir, Point, Range};
use jumpgrid_paths::CollisionMap;
use rand::{Rng, RngExt};

/// A rule for one iteration of cellular automata smoothing.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CaveRule {
    /// If a cell has >= this many wall neighbors in the 1-ring (8 neighbors),
    /// it becomes a wall.
    pub w_cutoff1: i32,
    /// If a cell has <= this many wall neighbors in the 2-ring
    /// (24 neighbors), it becomes a wall.
    pub w_cutoff2: i32,
    /// Whether cells outside the map count as walls.
    pub walls_out_of_range: bool,
    /// How many times to apply this rule.
    pub reps: usize,
}

impl Default for CaveRule {
    fn default() -> Self {
        Self {
            w_cutoff1: 5,
            w_cutoff2: 2,
            walls_out_of_range: true,
            reps: 4,
        }
    }
}

/// Map generator operating on a [`CollisionMap`].
pub struct MapGen<R: Rng> {
    pub rng: R,
    pub map: CollisionMap,
}

impl<R: Rng> MapGen<R> {
    /// Create a new MapGen with the given map.
    pub fn with_map(map: CollisionMap, rng: R) -> Self {
        Self { rng, map }
    }

    /// Consume the generator and return the map.
    pub fn into_map(self) -> CollisionMap {
        self.map
    }

    /// Occupy each cell independently with probability `density`.
    ///
    /// Returns the number of occupied cells in the map.
    pub fn scatter_blocks(&mut self, density: f64) -> usize {
        for p in self.map.bounds() {
            let r: f64 = self.rng.random();
            if r < density {
                self.map.set_occupied(p);
            }
        }
        let occupied = self.map.occupied_count();
        log::debug!("scatter {:.2}: {} cells occupied", density, occupied);
        occupied
    }

    /// Place up to `count` hollow rooms.
    ///
    /// Each room is a rectangle whose outer ring is wall and whose inside is
    /// cleared, with sizes drawn from `min..=max` (at least 3x3). One wall
    /// cell, never a corner, is opened as a door. Rooms that cannot fit the
    /// map are skipped; rooms may overlap.
    ///
    /// Returns the number of occupied cells in the map.
    pub fn rooms(&mut self, count: usize, min: Point, max: Point) -> usize {
        let min = Point::new(min.x.max(3), min.y.max(3));
        let max = Point::new(max.x.max(min.x), max.y.max(min.y));
        let size = self.map.size();
        let mut placed = 0;

        for _ in 0..count {
            let w = self.rng.random_range(min.x..=max.x);
            let h = self.rng.random_range(min.y..=max.y);
            if w > size.x || h > size.y {
                continue;
            }
            let x = self.rng.random_range(0..=size.x - w);
            let y = self.rng.random_range(0..=size.y - h);
            let room = Range::new(x, y, x + w, y + h);
            let inner = Range::new(x + 1, y + 1, x + w - 1, y + h - 1);

            for p in room {
                if inner.contains(p) {
                    self.map.clear_occupied(p);
                } else {
                    self.map.set_occupied(p);
                }
            }
            let door = self.door(room);
            self.map.clear_occupied(door);
            placed += 1;
        }

        let occupied = self.map.occupied_count();
        log::debug!("rooms: {} of {} placed, {} cells occupied", placed, count, occupied);
        occupied
    }

    /// A random non-corner cell on the ring of `room`.
    fn door(&mut self, room: Range) -> Point {
        let (w, h) = (room.width(), room.height());
        match self.rng.random_range(0..4u32) {
            0 => Point::new(room.min.x + self.rng.random_range(1..w - 1), room.min.y),
            1 => Point::new(room.min.x + self.rng.random_range(1..w - 1), room.max.y - 1),
            2 => Point::new(room.min.x, room.min.y + self.rng.random_range(1..h - 1)),
            _ => Point::new(room.max.x - 1, room.min.y + self.rng.random_range(1..h - 1)),
        }
    }

    /// Carve a perfect maze with a randomized depth-first backtracker.
    ///
    /// The whole map is filled first. Cells with odd coordinates inside the
    /// outer border are the maze cells; the walk opens them together with
    /// the wall cell between each one and the cell it was reached from. The
    /// result has no loops and every open cell is reachable from (1, 1).
    /// Maps smaller than 3x3 end up fully occupied.
    ///
    /// Returns the number of occupied cells in the map.
    pub fn maze(&mut self) -> usize {
        let bounds = self.map.bounds();
        let (w, h) = (bounds.width(), bounds.height());
        self.map.set_occupied_all(bounds);

        let is_cell = |p: Point| {
            p.x > 0 && p.y > 0 && p.x < w - 1 && p.y < h - 1 && p.x % 2 == 1 && p.y % 2 == 1
        };
        let start = Point::new(1, 1);
        if is_cell(start) {
            self.map.clear_occupied(start);
            let mut stack = vec![start];
            let mut options = Vec::with_capacity(4);
            while let Some(&cur) = stack.last() {
                options.clear();
                for d in [Dir::N, Dir::E, Dir::S, Dir::W] {
                    let next = cur + d.offset() * 2;
                    // occupied maze cells are the unvisited ones
                    if is_cell(next) && self.map.is_occupied(next) {
                        options.push(d);
                    }
                }
                if options.is_empty() {
                    stack.pop();
                    continue;
                }
                let d = options[self.rng.random_range(0..options.len())];
                let next = cur + d.offset() * 2;
                self.map.clear_occupied(cur.step(d));
                self.map.clear_occupied(next);
                stack.push(next);
            }
        }

        let occupied = self.map.occupied_count();
        log::debug!("maze {}x{}: {} cells occupied", w, h, occupied);
        occupied
    }

    /// Generate a cave using cellular automata.
    ///
    /// 1. Initialize each cell randomly: `wall_init_pct` chance of being a
    ///    wall, otherwise open.
    /// 2. Apply each rule in `rules` for its specified number of repetitions.
    ///
    /// Returns the number of occupied cells in the final map.
    pub fn cellular_caves(&mut self, wall_init_pct: f64, rules: &[CaveRule]) -> usize {
        let bounds = self.map.bounds();
        let w = self.map.width();

        for p in bounds {
            let r: f64 = self.rng.random();
            if r < wall_init_pct {
                self.map.set_occupied(p);
            } else {
                self.map.clear_occupied(p);
            }
        }

        let mut scratch = vec![false; bounds.len()];
        for rule in rules {
            for _ in 0..rule.reps {
                for p in bounds {
                    let walls1 = self.count_walls_ring(p, 1, rule.walls_out_of_range);
                    let walls2 = self.count_walls_ring(p, 2, rule.walls_out_of_range);
                    scratch[(p.y * w + p.x) as usize] =
                        walls1 >= rule.w_cutoff1 || walls2 <= rule.w_cutoff2;
                }
                for p in bounds {
                    if scratch[(p.y * w + p.x) as usize] {
                        self.map.set_occupied(p);
                    } else {
                        self.map.clear_occupied(p);
                    }
                }
            }
        }

        let occupied = self.map.occupied_count();
        log::debug!(
            "cellular caves {:.2} with {} rules: {} cells occupied",
            wall_init_pct,
            rules.len(),
            occupied
        );
        occupied
    }

    /// Count wall cells within Chebyshev distance `radius` of `center`.
    fn count_walls_ring(&self, center: Point, radius: i32, walls_out_of_range: bool) -> i32 {
        let mut count = 0;
        for dy in -radius..=radius {
            for dx in -radius..=radius {
                if dx == 0 && dy == 0 {
                    continue;
                }
                let p = center.shift(dx, dy);
                let wall = if self.map.is_out_of_bounds(p) {
                    walls_out_of_range
                } else {
                    self.map.is_occupied(p)
                };
                if wall {
                    count += 1;
                }
            }
        }
        count
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use jumpgrid_paths::PathFinder;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn generator(w: i32, h: i32, seed: u64) -> MapGen<StdRng> {
        MapGen::with_map(CollisionMap::new(w, h), StdRng::seed_from_u64(seed))
    }

    #[test]
    fn scatter_respects_extremes() {
        let mut mg = generator(70, 10, 1);
        assert_eq!(mg.scatter_blocks(0.0), 0);
        assert_eq!(mg.scatter_blocks(1.0), 700);
        let mut mg = generator(40, 40, 2);
        let occupied = mg.scatter_blocks(0.3);
        assert!(occupied > 300 && occupied < 660, "{occupied}");
    }

    #[test]
    fn rooms_have_walls_and_a_door() {
        let mut mg = generator(12, 12, 3);
        let occupied = mg.rooms(1, Point::new(5, 5), Point::new(5, 5));
        // ring of a 5x5 room minus the door
        assert_eq!(occupied, 15);
        let map = mg.into_map();
        let walls: Vec<Point> = map.occupied_cells().collect();
        let min = walls.iter().copied().min().unwrap();
        assert!(map.is_passable(min.shift(1, 1)));
        assert!(map.is_occupied(min.shift(4, 4)));
    }

    #[test]
    fn oversized_rooms_are_skipped() {
        let mut mg = generator(4, 4, 4);
        assert_eq!(mg.rooms(3, Point::new(5, 5), Point::new(8, 8)), 0);
    }

    #[test]
    fn maze_has_no_closed_pockets() {
        let mut mg = generator(21, 15, 6);
        let occupied = mg.maze();
        // 10x7 maze cells plus the 69 passages of a spanning tree
        assert_eq!(occupied, 21 * 15 - (70 + 69));
        let map = mg.into_map();
        assert!(map.bounds().iter().filter(|p| p.x == 0 || p.y == 0).all(|p| map.is_occupied(p)));

        let mut pf = PathFinder::for_map(&map);
        let start = Point::new(1, 1);
        for p in map.bounds().iter().filter(|p| map.is_passable(*p)) {
            assert!(pf.astar_path(&map, start, p).is_some(), "{p} is walled off");
        }
    }

    #[test]
    fn maze_replaces_earlier_obstacles() {
        let mut a = generator(16, 12, 8);
        a.scatter_blocks(0.5);
        a.maze();
        let mut b = generator(16, 12, 8);
        b.scatter_blocks(0.5);
        b.maze();
        assert_eq!(a.map, b.map);
        assert!(a.map.is_passable(Point::new(1, 1)));
        // even sizes leave the last row and column solid
        assert!((0..16).all(|x| a.map.is_occupied(Point::new(x, 11))));
        assert!((0..12).all(|y| a.map.is_occupied(Point::new(15, y))));
    }

    #[test]
    fn tiny_maze_is_solid() {
        let mut mg = generator(2, 5, 1);
        assert_eq!(mg.maze(), 10);
    }

    #[test]
    fn cellular_caves_produce_mixed_maps() {
        let mut mg = generator(30, 30, 5);
        let occupied = mg.cellular_caves(0.45, &[CaveRule::default()]);
        assert!(occupied > 0);
        assert!(occupied < 30 * 30);
        assert_eq!(occupied, mg.map.occupied_cells().count());
    }

    #[test]
    fn same_seed_same_map() {
        let mut a = generator(25, 18, 9);
        let mut b = generator(25, 18, 9);
        a.cellular_caves(0.4, &[CaveRule::default()]);
        b.cellular_caves(0.4, &[CaveRule::default()]);
        assert_eq!(a.map, b.map);
    }
}

#[cfg(all(test, feature = "serde"))]
mod serde_tests {
    use super::*;

    #[test]
    fn cave_rule_round_trip() {
        let rule = CaveRule {
            w_cutoff1: 4,
            w_cutoff2: 1,
            walls_out_of_range: false,
            reps: 2,
        };
        let json = serde_json::to_string(&rule).unwrap();
        let back: CaveRule = serde_json::from_str(&json).unwrap();
        assert_eq!(rule, back);
    }
}
