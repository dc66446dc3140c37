//! Jump Point Search over bit-packed collision maps.
//!
//! Cells are open or occupied, movement is 8-connected, straight steps cost
//! 1 and diagonal steps √2. Straight jumps are answered with word-wide bit
//! scans over a [`CollisionMap`] instead of walking cell by cell.
//!
//! - [`CollisionMap`] stores obstacles and answers nearest obstacle / nearest
//!   opening queries along the four cardinal directions
//! - [`Jumper`] holds the pruning rules and the jump functions
//! - [`PathFinder::jps_path`] runs the search and returns the turning points
//!   of a shortest path, optionally string-pulled ([`pull_string`])
//! - [`PathFinder::astar_path`] is a cell-by-cell A* over the same map,
//!   useful as a reference
//!
//! [`PathFinder`] owns and reuses its caches so that repeated queries on
//! maps of one size incur no allocations after warm-up.
//!
//! ```
//! use jumpgrid_core::Point;
//! use jumpgrid_paths::CollisionMap;
//!
//! let mut map = CollisionMap::new(8, 8);
//! map.set_occupied(Point::new(3, 3));
//! let path = map.find_path(Point::new(0, 0), Point::new(7, 7)).unwrap();
//! assert_eq!(path.first(), Some(&Point::new(0, 0)));
//! assert_eq!(path.last(), Some(&Point::new(7, 7)));
//! ```

mod astar;
pub mod bitgrid;
mod collision;
mod distance;
mod error;
mod jps;
mod jump;
mod openlist;
mod pathfinder;
mod simplify;

pub use bitgrid::BitGrid;
pub use collision::CollisionMap;
pub use distance::{DIAGONAL_COST, chebyshev, octile, path_cost};
pub use error::{QueryFault, SearchError};
pub use jump::Jumper;
pub use pathfinder::{PathFinder, SearchConfig, SearchStats};
pub use simplify::{Line, line_of_sight, pull_string};
