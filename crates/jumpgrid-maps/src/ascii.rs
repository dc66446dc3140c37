//! Collision maps written as text.
//!
//! An [`AsciiMap`] parses an ASCII art string where every character is one
//! cell. By default `#` is an obstacle and `.` is open floor; both sets can
//! be replaced with [`AsciiMap::with_runes`].
//!
//! ```text
//! ######
//! #....#
//! #.##.#
//! #....#
//! ######
//! ```

use jumpgrid_core::{Point, Range};
use jumpgrid_paths::{CollisionMap, Line};

/// Characters that mark occupied cells unless configured otherwise.
pub const DEFAULT_WALLS: &str = "#";
/// Characters that mark open cells unless configured otherwise.
pub const DEFAULT_OPEN: &str = ".";
/// Character used by [`AsciiMap::render`] for cells on a path.
pub const PATH_RUNE: char = '*';

/// A rectangular map parsed from text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AsciiMap {
    content: String,
    walls: String,
    size: Point,
}

impl AsciiMap {
    /// Parse `s` with the default `#` / `.` runes.
    pub fn new(s: &str) -> Result<Self, MapError> {
        Self::with_runes(s, DEFAULT_WALLS, DEFAULT_OPEN)
    }

    /// Parse `s`, treating characters of `walls` as occupied and those of
    /// `open` as free. Any other character is rejected.
    ///
    /// Leading and trailing whitespace of the whole string is trimmed, but
    /// not of individual lines. Every line must have the same width.
    pub fn with_runes(s: &str, walls: &str, open: &str) -> Result<Self, MapError> {
        let s = s.trim();
        if s.is_empty() {
            return Err(MapError::Empty);
        }
        let mut width = None;
        let mut height = 0;
        for (y, line) in s.lines().enumerate() {
            let mut w = 0;
            for (x, ch) in line.chars().enumerate() {
                if !walls.contains(ch) && !open.contains(ch) {
                    return Err(MapError::InvalidRune {
                        ch,
                        pos: Point::new(x as i32, y as i32),
                    });
                }
                w += 1;
            }
            match width {
                None => width = Some(w),
                Some(expected) if expected != w => {
                    return Err(MapError::InconsistentSize {
                        line: y,
                        expected,
                        found: w,
                    });
                }
                Some(_) => {}
            }
            height += 1;
        }
        let width = width.unwrap_or(0);
        Ok(Self {
            content: s.lines().collect::<Vec<_>>().join("\n"),
            walls: walls.to_string(),
            size: Point::new(width as i32, height),
        })
    }

    /// The normalised text, lines joined by `'\n'`.
    pub fn content(&self) -> &str {
        &self.content
    }

    /// Return the (width, height) size of the map in cells.
    pub fn size(&self) -> Point {
        self.size
    }

    /// Whether `ch` marks an occupied cell in this map.
    pub fn is_wall(&self, ch: char) -> bool {
        self.walls.contains(ch)
    }

    /// All positions with their characters, row by row.
    pub fn iter(&self) -> impl Iterator<Item = (Point, char)> + '_ {
        self.content.split('\n').enumerate().flat_map(|(y, line)| {
            line.chars()
                .enumerate()
                .map(move |(x, ch)| (Point::new(x as i32, y as i32), ch))
        })
    }

    /// Build a collision map of the same size.
    pub fn to_collision_map(&self) -> CollisionMap {
        let mut map = CollisionMap::new(self.size.x, self.size.y);
        self.draw_into(&mut map, Point::ZERO);
        map
    }

    /// Copy this map into `map` with its top-left corner at `offset`.
    ///
    /// Wall characters set cells occupied and open characters clear them.
    /// Parts falling outside `map` are skipped. Returns the number of cells
    /// written.
    pub fn draw_into(&self, map: &mut CollisionMap, offset: Point) -> usize {
        let mut written = 0;
        for (p, ch) in self.iter() {
            let q = p + offset;
            if map.is_out_of_bounds(q) {
                continue;
            }
            if self.is_wall(ch) {
                map.set_occupied(q);
            } else {
                map.clear_occupied(q);
            }
            written += 1;
        }
        written
    }

    /// Render `map` as text with the default runes, marking every cell
    /// covered by the legs of `path` with [`PATH_RUNE`].
    pub fn render(map: &CollisionMap, path: &[Point]) -> String {
        let mut rows: Vec<Vec<char>> = (0..map.height())
            .map(|y| {
                (0..map.width())
                    .map(|x| if map.is_occupied(Point::new(x, y)) { '#' } else { '.' })
                    .collect()
            })
            .collect();

        let bounds = map.bounds();
        let mut mark = |p: Point| {
            if bounds.contains(p) {
                rows[p.y as usize][p.x as usize] = PATH_RUNE;
            }
        };
        match path {
            [] => {}
            [only] => mark(*only),
            legs => {
                for w in legs.windows(2) {
                    Line::new(w[0], w[1]).for_each(&mut mark);
                }
            }
        }

        rows.into_iter()
            .map(|row| row.into_iter().collect::<String>())
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// Rectangle covered by this map when drawn at `offset`.
    pub fn footprint(&self, offset: Point) -> Range {
        Range::from_size(self.size) + offset
    }
}

/// Errors that can occur when parsing an [`AsciiMap`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum MapError {
    /// Nothing left after trimming.
    #[error("map is empty")]
    Empty,
    /// Lines have inconsistent widths.
    #[error("map line {line} is {found} cells wide, expected {expected}")]
    InconsistentSize {
        line: usize,
        expected: usize,
        found: usize,
    },
    /// A character outside the wall and open sets was found.
    #[error("map contains invalid rune \u{201c}{ch}\u{201d} at {pos}")]
    InvalidRune { ch: char, pos: Point },
}
