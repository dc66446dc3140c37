//! Map building helpers for jumpgrid: ASCII maps, obstacle generators and
//! world layout.

pub mod ascii;
pub mod layout;
pub mod mapgen;

pub use ascii::{AsciiMap, MapError};
pub use layout::GridLayout;
pub use mapgen::{CaveRule, MapGen};

#[cfg(test)]
mod tests {
    use super::*;
    use jumpgrid_core::Point;
    use jumpgrid_paths::{PathFinder, SearchConfig, SearchError, path_cost};
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    const MAZE: &str = "\
..........
.###.####.
.#......#.
.#.####.#.
.#.#..#.#.
.#.####.#.
.#......#.
.########.
..........";

    #[test]
    fn ascii_maze_round_trip_through_search() {
        let map = AsciiMap::new(MAZE).unwrap().to_collision_map();
        let mut pf = PathFinder::for_map(&map).with_config(SearchConfig { simplify: false });
        // the centre pocket is walled off
        let err = pf.jps_path(&map, Point::new(0, 0), Point::new(4, 4)).unwrap_err();
        assert!(matches!(err, SearchError::Unreachable { .. }));

        let inside = pf.jps_path(&map, Point::new(0, 0), Point::new(5, 6)).unwrap();
        let reference = pf.astar_path(&map, Point::new(0, 0), Point::new(5, 6)).unwrap();
        assert!((path_cost(&inside) - path_cost(&reference)).abs() < 1e-3);

        let path = pf.jps_path(&map, Point::new(0, 0), Point::new(9, 8)).unwrap();
        let reference = pf.astar_path(&map, Point::new(0, 0), Point::new(9, 8)).unwrap();
        assert!((path_cost(&path) - path_cost(&reference)).abs() < 1e-3);

        let text = AsciiMap::render(&map, &path);
        assert!(text.starts_with('*'));
        assert!(text.ends_with('*'));
    }

    #[test]
    fn jps_matches_astar_on_mazes() {
        use rand::RngExt;

        let mut rng = StdRng::seed_from_u64(23);
        for (seed, (w, h)) in [(31, 21), (71, 19), (129, 9), (40, 40)].into_iter().enumerate() {
            let mut mg = MapGen::with_map(
                jumpgrid_paths::CollisionMap::new(w, h),
                StdRng::seed_from_u64(seed as u64),
            );
            mg.maze();
            let map = mg.into_map();
            let open: Vec<Point> = map.bounds().iter().filter(|p| map.is_passable(*p)).collect();
            let mut pf = PathFinder::for_map(&map).with_config(SearchConfig { simplify: false });

            // last odd coordinate inside the border
            let last = |n: i32| if n % 2 == 1 { n - 2 } else { n - 3 };
            let mut queries = vec![(Point::new(1, 1), Point::new(last(w), last(h)))];
            for _ in 0..20 {
                let a = open[rng.random_range(0..open.len())];
                let b = open[rng.random_range(0..open.len())];
                if a != b {
                    queries.push((a, b));
                }
            }
            for (start, goal) in queries {
                let path = pf.jps_path(&map, start, goal).unwrap();
                let reference = pf.astar_path(&map, start, goal).unwrap();
                let (jc, ac) = (path_cost(&path), path_cost(&reference));
                assert!((jc - ac).abs() < 1e-3, "{w}x{h} {start} -> {goal}: jps {jc} astar {ac}");
            }
        }
    }

    #[test]
    fn generated_maps_stay_searchable() {
        let mut mg = MapGen::with_map(
            jumpgrid_paths::CollisionMap::new(48, 32),
            StdRng::seed_from_u64(11),
        );
        mg.rooms(6, Point::new(4, 4), Point::new(10, 8));
        mg.scatter_blocks(0.05);
        let map = mg.into_map();
        let mut pf = PathFinder::for_map(&map);
        let open: Vec<Point> = map.bounds().iter().filter(|p| map.is_passable(*p)).collect();
        let (start, goal) = (open[0], open[open.len() - 1]);
        match (pf.jps_path(&map, start, goal), pf.astar_path(&map, start, goal)) {
            (Ok(path), Some(_)) => {
                assert_eq!(path.first(), Some(&start));
                assert_eq!(path.last(), Some(&goal));
            }
            (Err(SearchError::Unreachable { .. }), None) => {}
            (jps, astar) => panic!("jps {jps:?} disagrees with astar {astar:?}"),
        }
    }
}
