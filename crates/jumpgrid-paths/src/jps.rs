//! Jump Point Search (JPS) on 8-connected grids with bit-scan jumps.
//!
//! The search is A* over jump points only. Nodes are closed as soon as they
//! are discovered; a later, cheaper route to a cell that is still queued
//! replaces its entry, while cells already expanded keep their node. The
//! search stops the moment a jump lands on the goal.

use std::time::Instant;

use jumpgrid_core::{Dir, Point};

use crate::PathFinder;
use crate::collision::CollisionMap;
use crate::distance::octile;
use crate::error::{QueryFault, SearchError};
use crate::jump::Jumper;
use crate::pathfinder::{SearchNode, SearchStats};
use crate::simplify::pull_string;

impl PathFinder {
    /// Compute a shortest 8-connected path from `start` to `goal`.
    ///
    /// The result starts at `start`, ends at `goal` and lists only the
    /// turning points; consecutive waypoints are joined by straight or
    /// diagonal runs of open cells. With [`SearchConfig::simplify`] set
    /// (the default) the waypoints are then string-pulled, so consecutive
    /// waypoints only need an unobstructed line between them.
    ///
    /// [`SearchConfig::simplify`]: crate::SearchConfig::simplify
    pub fn jps_path(
        &mut self,
        map: &CollisionMap,
        start: Point,
        goal: Point,
    ) -> Result<Vec<Point>, SearchError> {
        self.stats = SearchStats::default();
        validate(map, start, goal)?;
        let started = Instant::now();

        self.fit(map);
        self.open.clear();
        self.closed.reset();
        self.nodes.clear();

        let jumper = Jumper::new(map, goal);
        let root = self.add_node(None, start, None, goal);
        let entry = self.entry(root);
        self.open.push(entry);
        self.closed.set(start.x, start.y, true);

        while let Some(current) = self.open.pop_min() {
            let ci = current.node;
            let SearchNode { pos, dir, .. } = self.nodes[ci];
            self.stats.expanded += 1;
            log::trace!(
                "expand {} via {:?}, total {:.3}, {} queued",
                pos,
                dir,
                current.total,
                self.open.len()
            );

            let dirs = jumper.forced_neighbors(pos, dir) | Jumper::natural_neighbors(dir);
            for d in dirs.iter() {
                let Some(jp) = jumper.jump(pos, d) else {
                    continue;
                };
                if jp == goal {
                    let mut path = self.backtrace(ci, goal);
                    if self.config.simplify {
                        pull_string(map, &mut path);
                    }
                    self.stats.waypoints = path.len();
                    log::debug!(
                        "jps {} -> {}: {} waypoints, {} expanded, {} generated in {:?}",
                        start,
                        goal,
                        path.len(),
                        self.stats.expanded,
                        self.stats.generated,
                        started.elapsed()
                    );
                    return Ok(path);
                }

                self.stats.generated += 1;
                let ni = self.add_node(Some(ci), jp, Some(d), goal);
                let entry = self.entry(ni);
                if !self.closed.is_set(jp.x, jp.y) {
                    self.open.push(entry);
                    self.closed.set(jp.x, jp.y, true);
                    continue;
                }
                if !self.open.insert_smaller(entry) {
                    // Not an improvement; the node was never referenced.
                    self.nodes.pop();
                }
            }
        }

        log::debug!(
            "jps {} -> {}: unreachable, {} expanded in {:?}",
            start,
            goal,
            self.stats.expanded,
            started.elapsed()
        );
        Err(SearchError::Unreachable { start, goal })
    }

    fn add_node(&mut self, parent: Option<usize>, pos: Point, dir: Option<Dir>, goal: Point) -> usize {
        let g = match parent {
            Some(p) => self.nodes[p].g + octile(self.nodes[p].pos, pos),
            None => 0.0,
        };
        self.nodes.push(SearchNode {
            parent,
            pos,
            dir,
            g,
            h: octile(pos, goal),
        });
        self.nodes.len() - 1
    }

    /// Walk parent links from `last` back to the start and emit the goal
    /// plus every node where the direction of travel changes.
    fn backtrace(&self, last: usize, goal: Point) -> Vec<Point> {
        let mut path = vec![goal];
        let mut travel = Dir::between(self.nodes[last].pos, goal);
        let mut cursor = Some(last);
        while let Some(i) = cursor {
            let node = &self.nodes[i];
            let incoming = node
                .parent
                .and_then(|p| Dir::between(self.nodes[p].pos, node.pos));
            if incoming != travel {
                path.push(node.pos);
            }
            travel = incoming;
            cursor = node.parent;
        }
        path.reverse();
        path
    }
}

/// Reject queries that cannot be searched, before touching any state.
fn validate(map: &CollisionMap, start: Point, goal: Point) -> Result<(), SearchError> {
    let fault = if map.is_out_of_bounds(start) {
        Some(QueryFault::StartOutOfBounds)
    } else if map.is_out_of_bounds(goal) {
        Some(QueryFault::GoalOutOfBounds)
    } else if start == goal {
        Some(QueryFault::SameCell)
    } else if map.is_occupied(start) {
        Some(QueryFault::StartBlocked)
    } else if map.is_occupied(goal) {
        Some(QueryFault::GoalBlocked)
    } else {
        None
    };
    match fault {
        Some(reason) => Err(SearchError::InvalidQuery { start, goal, reason }),
        None => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::SearchConfig;
    use crate::distance::path_cost;
    use crate::simplify::line_of_sight;
    use jumpgrid_core::Range;
    use rand::{RngExt, SeedableRng};

    fn p(x: i32, y: i32) -> Point {
        Point::new(x, y)
    }

    fn raw_finder(map: &CollisionMap) -> PathFinder {
        PathFinder::for_map(map).with_config(SearchConfig { simplify: false })
    }

    /// Every leg of an unsimplified path is a straight or diagonal run
    /// through open cells.
    fn assert_runs_open(map: &CollisionMap, path: &[Point]) {
        for w in path.windows(2) {
            let d = w[1] - w[0];
            assert!(
                d.x == 0 || d.y == 0 || d.x.abs() == d.y.abs(),
                "leg {} -> {} is not a straight or diagonal run",
                w[0],
                w[1]
            );
            let Some(dir) = Dir::between(w[0], w[1]) else {
                panic!("repeated waypoint {}", w[0]);
            };
            let mut cur = w[0];
            while cur != w[1] {
                assert!(map.is_passable(cur), "{cur} on leg {} -> {} is blocked", w[0], w[1]);
                cur = cur.step(dir);
            }
            assert!(map.is_passable(cur));
        }
    }

    #[test]
    fn open_map_goes_straight_to_the_goal() {
        let map = CollisionMap::new(5, 5);
        let mut pf = raw_finder(&map);
        let path = pf.jps_path(&map, p(0, 0), p(4, 4)).unwrap();
        assert_eq!(path, vec![p(0, 0), p(4, 4)]);
        assert_eq!(pf.stats().waypoints, 2);
        assert_eq!(pf.stats().expanded, 1);

        let path = pf.jps_path(&map, p(0, 2), p(4, 2)).unwrap();
        assert_eq!(path, vec![p(0, 2), p(4, 2)]);
    }

    #[test]
    fn detours_around_a_centre_obstacle() {
        let map = CollisionMap::from_cells(5, 5, [p(2, 2)]);
        let mut pf = raw_finder(&map);
        let path = pf.jps_path(&map, p(0, 0), p(4, 4)).unwrap();
        assert_eq!(path.first(), Some(&p(0, 0)));
        assert_eq!(path.last(), Some(&p(4, 4)));
        assert!(path.len() >= 3);
        assert!(!path.contains(&p(2, 2)));
        assert_runs_open(&map, &path);
        let expected = 2.0 + 3.0 * std::f32::consts::SQRT_2;
        assert!((path_cost(&path) - expected).abs() < 1e-4);
    }

    #[test]
    fn invalid_queries_are_rejected() {
        let map = CollisionMap::from_cells(5, 5, [p(1, 1)]);
        let mut pf = PathFinder::for_map(&map);
        pf.jps_path(&map, p(0, 0), p(4, 4)).unwrap();
        assert!(pf.stats().expanded > 0);
        let fault = |r: Result<Vec<Point>, SearchError>| r.unwrap_err().fault();
        assert_eq!(
            fault(pf.jps_path(&map, p(-1, 0), p(4, 4))),
            Some(QueryFault::StartOutOfBounds)
        );
        assert_eq!(
            fault(pf.jps_path(&map, p(0, 0), p(5, 4))),
            Some(QueryFault::GoalOutOfBounds)
        );
        assert_eq!(
            fault(pf.jps_path(&map, p(2, 2), p(2, 2))),
            Some(QueryFault::SameCell)
        );
        assert_eq!(
            fault(pf.jps_path(&map, p(1, 1), p(4, 4))),
            Some(QueryFault::StartBlocked)
        );
        assert_eq!(
            fault(pf.jps_path(&map, p(0, 0), p(1, 1))),
            Some(QueryFault::GoalBlocked)
        );
        // a rejected query reports an empty search
        assert_eq!(pf.stats(), SearchStats::default());
    }

    #[test]
    fn enclosed_goal_is_unreachable() {
        let walls = Range::new(1, 1, 4, 4).iter().filter(|q| *q != p(2, 2));
        let map = CollisionMap::from_cells(5, 5, walls);
        let mut pf = PathFinder::for_map(&map);
        let err = pf.jps_path(&map, p(0, 0), p(2, 2)).unwrap_err();
        assert_eq!(
            err,
            SearchError::Unreachable {
                start: p(0, 0),
                goal: p(2, 2)
            }
        );
        assert!(pf.stats().expanded > 0);
        assert_eq!(pf.stats().waypoints, 0);
    }

    #[test]
    fn corridor_with_a_turn() {
        // # # # # # # #
        // . . . . . # #
        // # # # # . # #
        // # # # # . . .
        let mut map = CollisionMap::new(7, 4);
        map.set_occupied_all(Range::new(0, 0, 7, 1));
        map.set_occupied_all([p(5, 1), p(6, 1)]);
        map.set_occupied_all(Range::new(0, 2, 4, 4));
        map.set_occupied_all([p(5, 2), p(6, 2)]);
        let mut pf = raw_finder(&map);
        let path = pf.jps_path(&map, p(0, 1), p(6, 3)).unwrap();
        assert_runs_open(&map, &path);
        assert_eq!(path.first(), Some(&p(0, 1)));
        assert_eq!(path.last(), Some(&p(6, 3)));
        let expected = 3.0 + 2.0 * std::f32::consts::SQRT_2 + 1.0;
        assert!((path_cost(&path) - expected).abs() < 1e-4, "{path:?}");
    }

    #[test]
    fn repeated_queries_are_deterministic() {
        let mut map = CollisionMap::new(20, 20);
        for y in 0..15 {
            map.set_occupied(p(10, y));
        }
        let mut pf = PathFinder::for_map(&map);
        let first = pf.jps_path(&map, p(2, 3), p(17, 4)).unwrap();
        let stats = pf.stats();
        for _ in 0..3 {
            assert_eq!(pf.jps_path(&map, p(2, 3), p(17, 4)).unwrap(), first);
            assert_eq!(pf.stats(), stats);
        }
        // a fresh finder agrees
        assert_eq!(map.find_path(p(2, 3), p(17, 4)).unwrap(), first);
    }

    #[test]
    fn finder_adapts_to_other_map_sizes() {
        let small = CollisionMap::new(4, 4);
        let wide = CollisionMap::new(90, 3);
        let mut pf = PathFinder::for_map(&small);
        assert_eq!(pf.jps_path(&small, p(0, 0), p(3, 3)).unwrap().len(), 2);
        assert_eq!(
            pf.jps_path(&wide, p(0, 0), p(89, 2)).unwrap(),
            vec![p(0, 0), p(89, 2)]
        );
        assert_eq!(pf.size(), p(90, 3));
    }

    #[test]
    fn simplified_paths_keep_line_of_sight() {
        let mut map = CollisionMap::new(30, 30);
        map.set_occupied_all(Range::new(5, 0, 6, 25));
        map.set_occupied_all(Range::new(15, 5, 16, 30));
        let mut pf = PathFinder::for_map(&map);
        let path = pf.jps_path(&map, p(1, 1), p(28, 28)).unwrap();
        assert_eq!(path.first(), Some(&p(1, 1)));
        assert_eq!(path.last(), Some(&p(28, 28)));
        for w in path.windows(2) {
            assert!(line_of_sight(&map, w[0], w[1]), "{} -> {}", w[0], w[1]);
        }
        let raw = raw_finder(&map).jps_path(&map, p(1, 1), p(28, 28)).unwrap();
        assert!(path.len() <= raw.len());
    }

    #[test]
    fn matches_astar_cost_on_random_maps() {
        let mut rng = rand::rngs::StdRng::seed_from_u64(0x5eed);
        let mut checked = 0;
        for round in 0..120 {
            let w = rng.random_range(2..=32);
            let h = rng.random_range(2..=32);
            let density = rng.random_range(0.0..0.4);
            let mut map = CollisionMap::new(w, h);
            for q in map.bounds() {
                if rng.random::<f64>() < density {
                    map.set_occupied(q);
                }
            }
            let start = p(rng.random_range(0..w), rng.random_range(0..h));
            let goal = p(rng.random_range(0..w), rng.random_range(0..h));
            map.clear_occupied(start);
            map.clear_occupied(goal);
            if start == goal {
                continue;
            }

            let mut pf = raw_finder(&map);
            let jps = pf.jps_path(&map, start, goal);
            let astar = pf.astar_path(&map, start, goal);
            match (jps, astar) {
                (Ok(path), Some(reference)) => {
                    assert_runs_open(&map, &path);
                    let (a, b) = (path_cost(&path), path_cost(&reference));
                    assert!(
                        (a - b).abs() < 1e-3,
                        "round {round}: {w}x{h} {start} -> {goal}: jps {a} vs astar {b}"
                    );
                    checked += 1;
                }
                (Err(SearchError::Unreachable { .. }), None) => {}
                (jps, astar) => panic!(
                    "round {round}: {w}x{h} {start} -> {goal}: jps {jps:?} vs astar {astar:?}"
                ),
            }
        }
        assert!(checked > 40, "only {checked} reachable queries");
    }
}
