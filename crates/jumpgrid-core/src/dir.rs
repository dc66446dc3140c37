//! Compass directions and direction sets.
//!
//! ```text
//!   7 0 1      NW  N  NE
//!   6 . 2       W  .  E
//!   5 4 3      SW  S  SE
//! ```
//!
//! Odd indices are diagonal. Rotation is clockwise modulo 8, so
//! `dir.rotate(1)` is the next direction clockwise and `dir.rotate(7)` the
//! next one counter-clockwise.

use std::fmt;

use crate::geom::Point;

/// One of the eight compass directions.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[repr(u8)]
pub enum Dir {
    N = 0,
    NE = 1,
    E = 2,
    SE = 3,
    S = 4,
    SW = 5,
    W = 6,
    NW = 7,
}

impl Dir {
    /// All directions in index order.
    pub const ALL: [Dir; 8] = [
        Dir::N,
        Dir::NE,
        Dir::E,
        Dir::SE,
        Dir::S,
        Dir::SW,
        Dir::W,
        Dir::NW,
    ];

    /// Direction with the given index, taken modulo 8.
    #[inline]
    pub const fn from_index(i: u8) -> Self {
        Self::ALL[(i % 8) as usize]
    }

    /// Compass index (0 = N, clockwise).
    #[inline]
    pub const fn index(self) -> u8 {
        self as u8
    }

    /// Whether this is one of NE, SE, SW, NW.
    #[inline]
    pub const fn is_diagonal(self) -> bool {
        self.index() % 2 != 0
    }

    /// Rotate clockwise by `n` eighth-turns.
    #[inline]
    pub const fn rotate(self, n: u8) -> Self {
        Self::from_index(self.index() + n % 8)
    }

    /// The opposite direction.
    #[inline]
    pub const fn reverse(self) -> Self {
        self.rotate(4)
    }

    /// Unit step for this direction (Y grows down).
    #[inline]
    pub const fn offset(self) -> Point {
        match self {
            Dir::N => Point::new(0, -1),
            Dir::NE => Point::new(1, -1),
            Dir::E => Point::new(1, 0),
            Dir::SE => Point::new(1, 1),
            Dir::S => Point::new(0, 1),
            Dir::SW => Point::new(-1, 1),
            Dir::W => Point::new(-1, 0),
            Dir::NW => Point::new(-1, -1),
        }
    }

    /// Quantised direction of travel from `from` to `to`, or `None` when the
    /// two points coincide.
    pub fn between(from: Point, to: Point) -> Option<Self> {
        let d = (to - from).signum();
        Self::ALL.into_iter().find(|dir| dir.offset() == d)
    }
}

impl fmt::Display for Dir {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Dir::N => "N",
            Dir::NE => "NE",
            Dir::E => "E",
            Dir::SE => "SE",
            Dir::S => "S",
            Dir::SW => "SW",
            Dir::W => "W",
            Dir::NW => "NW",
        };
        f.write_str(s)
    }
}

/// A set of directions packed into one byte; bit `i` is direction `i`.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct DirSet(u8);

impl DirSet {
    /// No directions.
    pub const EMPTY: Self = Self(0);
    /// All eight directions.
    pub const ALL: Self = Self(0xff);

    /// Build a set from its raw bitmask.
    #[inline]
    pub const fn from_bits(bits: u8) -> Self {
        Self(bits)
    }

    /// Raw bitmask.
    #[inline]
    pub const fn bits(self) -> u8 {
        self.0
    }

    /// Set containing only `dir`.
    #[inline]
    pub const fn single(dir: Dir) -> Self {
        Self(1 << dir.index())
    }

    /// Return the set with `dir` added.
    #[inline]
    #[must_use]
    pub const fn with(self, dir: Dir) -> Self {
        Self(self.0 | 1 << dir.index())
    }

    /// Add `dir` in place.
    #[inline]
    pub fn insert(&mut self, dir: Dir) {
        self.0 |= 1 << dir.index();
    }

    #[inline]
    pub const fn contains(self, dir: Dir) -> bool {
        self.0 & (1 << dir.index()) != 0
    }

    #[inline]
    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    #[inline]
    pub const fn len(self) -> usize {
        self.0.count_ones() as usize
    }

    /// Members in index order.
    pub fn iter(self) -> impl Iterator<Item = Dir> {
        Dir::ALL.into_iter().filter(move |d| self.contains(*d))
    }
}

impl std::ops::BitOr for DirSet {
    type Output = Self;
    #[inline]
    fn bitor(self, rhs: Self) -> Self {
        Self(self.0 | rhs.0)
    }
}

impl std::ops::BitOrAssign for DirSet {
    #[inline]
    fn bitor_assign(&mut self, rhs: Self) {
        self.0 |= rhs.0;
    }
}

impl FromIterator<Dir> for DirSet {
    fn from_iter<I: IntoIterator<Item = Dir>>(iter: I) -> Self {
        let mut set = Self::EMPTY;
        for d in iter {
            set.insert(d);
        }
        set
    }
}
