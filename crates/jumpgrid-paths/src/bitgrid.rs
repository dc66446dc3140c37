//! Packed bit matrices with word-at-a-time scans along rows.
//!
//! A [`BitGrid`] stores `row_words = ceil(width / 64)` words per row. Bit
//! `x` of row `y` lives at linear position `y * row_words * 64 + x`. The
//! unused high bits of the last word in each row are kept set, so a row
//! behaves as if it were walled off right after column `width - 1`.
//!
//! Scans only run along rows; a structure that needs fast column scans keeps
//! a second, transposed grid (see [`CollisionMap`](crate::CollisionMap)).

/// Bits per storage word.
pub const WORD_BITS: i32 = u64::BITS as i32;

/// Index of the lowest set bit, or `None` for an empty word.
#[inline]
pub fn bit_scan_forward(word: u64) -> Option<u32> {
    if word == 0 {
        None
    } else {
        Some(word.trailing_zeros())
    }
}

/// Index of the highest set bit, or `None` for an empty word.
#[inline]
pub fn bit_scan_reverse(word: u64) -> Option<u32> {
    if word == 0 {
        None
    } else {
        Some(u64::BITS - 1 - word.leading_zeros())
    }
}

/// A packed 2D array of booleans.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BitGrid {
    words: Vec<u64>,
    width: i32,
    height: i32,
    row_words: usize,
}

impl BitGrid {
    /// Allocate a `width` x `height` grid with every cell cleared.
    ///
    /// Negative dimensions are treated as zero.
    pub fn new(width: i32, height: i32) -> Self {
        let width = width.max(0);
        let height = height.max(0);
        let row_words = (width as usize).div_ceil(WORD_BITS as usize);
        let mut grid = Self {
            words: vec![0; row_words * height as usize],
            width,
            height,
            row_words,
        };
        grid.fill_padding();
        grid
    }

    /// Logical number of bits per row.
    #[inline]
    pub fn width(&self) -> i32 {
        self.width
    }

    /// Number of rows.
    #[inline]
    pub fn height(&self) -> i32 {
        self.height
    }

    /// Storage words per row.
    #[inline]
    pub fn row_words(&self) -> usize {
        self.row_words
    }

    /// Clear every cell, keeping the padding set.
    pub fn reset(&mut self) {
        self.words.fill(0);
        self.fill_padding();
    }

    /// Set or clear bit `(x, y)`. Returns `false` (and does nothing) if the
    /// position is outside the grid.
    #[inline]
    pub fn set(&mut self, x: i32, y: i32, value: bool) -> bool {
        let Some((idx, mask)) = self.locate(x, y) else {
            return false;
        };
        if value {
            self.words[idx] |= mask;
        } else {
            self.words[idx] &= !mask;
        }
        true
    }

    /// Whether bit `(x, y)` is set. Positions outside the grid read as set.
    #[inline]
    pub fn is_set(&self, x: i32, y: i32) -> bool {
        match self.locate(x, y) {
            Some((idx, mask)) => self.words[idx] & mask != 0,
            None => true,
        }
    }

    /// Number of set bits inside the grid (padding excluded).
    pub fn count_set(&self) -> usize {
        let total: u32 = self.words.iter().map(|w| w.count_ones()).sum();
        total as usize - self.padding_mask().count_ones() as usize * self.height as usize
    }

    /// Column of the first set bit in `row` at or after `x` (`forward`), or
    /// at or before `x` (backward).
    ///
    /// Returns `width` when nothing is found going forward and `-1` going
    /// backward. The start column is clamped into the row; a start beyond
    /// the scanned end, or a row outside the grid, yields the same sentinel.
    #[inline]
    pub fn nearest_set(&self, x: i32, row: i32, forward: bool) -> i32 {
        self.scan(x, row, forward, false)
    }

    /// Like [`nearest_set`](Self::nearest_set) but for cleared bits. Padding
    /// is never reported.
    #[inline]
    pub fn nearest_clear(&self, x: i32, row: i32, forward: bool) -> i32 {
        self.scan(x, row, forward, true)
    }

    fn scan(&self, x: i32, row: i32, forward: bool, clear: bool) -> i32 {
        let miss = if forward { self.width } else { -1 };
        if row < 0 || row >= self.height || self.width == 0 {
            return miss;
        }
        let x = if forward {
            if x >= self.width {
                return miss;
            }
            x.max(0)
        } else {
            if x < 0 {
                return miss;
            }
            x.min(self.width - 1)
        };

        let base = row as usize * self.row_words;
        let word_at = |i: usize| {
            let w = self.words[base + i];
            if clear { !w } else { w }
        };
        let mut wi = (x / WORD_BITS) as usize;
        let bit = (x % WORD_BITS) as u32;

        if forward {
            // Suffix mask: only bits at or after the start offset.
            let mut word = word_at(wi) & (u64::MAX << bit);
            loop {
                if let Some(b) = bit_scan_forward(word) {
                    return (wi as i32 * WORD_BITS + b as i32).min(self.width);
                }
                wi += 1;
                if wi == self.row_words {
                    return miss;
                }
                word = word_at(wi);
            }
        } else {
            // Prefix mask: only bits at or before the start offset.
            let mut word = word_at(wi) & (u64::MAX >> (u64::BITS - 1 - bit));
            loop {
                if let Some(b) = bit_scan_reverse(word) {
                    return wi as i32 * WORD_BITS + b as i32;
                }
                if wi == 0 {
                    return miss;
                }
                wi -= 1;
                word = word_at(wi);
            }
        }
    }

    #[inline]
    fn locate(&self, x: i32, y: i32) -> Option<(usize, u64)> {
        if x < 0 || y < 0 || x >= self.width || y >= self.height {
            return None;
        }
        let idx = y as usize * self.row_words + (x / WORD_BITS) as usize;
        Some((idx, 1u64 << (x % WORD_BITS)))
    }

    /// Bits of the last word in each row that lie beyond `width`.
    #[inline]
    fn padding_mask(&self) -> u64 {
        match self.width % WORD_BITS {
            0 => 0,
            used => u64::MAX << used,
        }
    }

    fn fill_padding(&mut self) {
        let mask = self.padding_mask();
        if mask == 0 {
            return;
        }
        let last = self.row_words - 1;
        for row in self.words.chunks_exact_mut(self.row_words) {
            row[last] |= mask;
        }
    }
}
