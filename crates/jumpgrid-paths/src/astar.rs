use std::collections::BinaryHeap;

use jumpgrid_core::Point;

use crate::PathFinder;
use crate::collision::CollisionMap;
use crate::distance::octile;
use crate::pathfinder::NodeRef;

impl PathFinder {
    /// Plain 8-connected A* over every open cell of `map`.
    ///
    /// Straight steps cost 1 and diagonal steps √2, with no restriction on
    /// cutting corners. The result lists every cell of the path, both
    /// endpoints included, or is `None` when either endpoint is outside the
    /// map or occupied, or no path exists. It is much slower than
    /// [`jps_path`](Self::jps_path) and serves as its reference.
    pub fn astar_path(&mut self, map: &CollisionMap, from: Point, to: Point) -> Option<Vec<Point>> {
        self.fit(map);
        let start_idx = self.idx(from)?;
        let goal_idx = self.idx(to)?;

        if !map.is_passable(from) || !map.is_passable(to) {
            return None;
        }
        if start_idx == goal_idx {
            return Some(vec![from]);
        }

        // Bump generation to lazily invalidate all nodes.
        self.astar_generation = self.astar_generation.wrapping_add(1);
        let cur_gen = self.astar_generation;

        {
            let node = &mut self.astar_nodes[start_idx];
            node.g = 0.0;
            node.f = octile(from, to);
            node.parent = usize::MAX;
            node.generation = cur_gen;
            node.open = true;
        }

        let mut open: BinaryHeap<NodeRef> = BinaryHeap::new();
        open.push(NodeRef {
            idx: start_idx,
            f: self.astar_nodes[start_idx].f,
        });

        let found = 'search: loop {
            let Some(current) = open.pop() else {
                break 'search false;
            };
            let ci = current.idx;

            // Skip stale entries.
            if self.astar_nodes[ci].generation != cur_gen || !self.astar_nodes[ci].open {
                continue;
            }
            if ci == goal_idx {
                break 'search true;
            }

            self.astar_nodes[ci].open = false;
            let current_g = self.astar_nodes[ci].g;
            let current_point = self.point(ci);

            for np in current_point.neighbors_8() {
                if !map.is_passable(np) {
                    continue;
                }
                let Some(ni) = self.idx(np) else {
                    continue;
                };
                let tentative_g = current_g + octile(current_point, np);

                let n = &mut self.astar_nodes[ni];
                if n.generation == cur_gen {
                    if tentative_g >= n.g {
                        continue;
                    }
                } else {
                    n.generation = cur_gen;
                }

                n.g = tentative_g;
                n.f = tentative_g + octile(np, to);
                n.parent = ci;
                n.open = true;

                open.push(NodeRef { idx: ni, f: n.f });
            }
        };

        if !found {
            log::debug!("astar {} -> {}: unreachable", from, to);
            return None;
        }

        let mut path = Vec::new();
        let mut ci = goal_idx;
        while ci != usize::MAX {
            path.push(self.point(ci));
            ci = self.astar_nodes[ci].parent;
        }
        path.reverse();
        Some(path)
    }
}
