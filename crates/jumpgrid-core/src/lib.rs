//! **jumpgrid-core**: shared grid types for the *jumpgrid* crates.
//!
//! Provides integer grid coordinates ([`Point`]), half-open rectangles
//! ([`Range`]) and the eight-way compass ([`Dir`], [`DirSet`]) whose index
//! order every pathfinding routine in the workspace relies on.

pub mod dir;
pub mod geom;

pub use dir::{Dir, DirSet};
pub use geom::{Point, Range, RangeIter};
