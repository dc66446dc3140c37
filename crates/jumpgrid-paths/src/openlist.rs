//! Binary min-heap of search nodes keyed by total cost.
//!
//! Each grid cell has at most one live entry. A per-cell slot table tracks
//! where that entry sits in the heap, which makes the decrease-key in
//! [`OpenList::insert_smaller`] a sift-up instead of a linear search.

const NOT_QUEUED: usize = usize::MAX;

/// One heap entry: a node of the search arena and the cell it stands on.
#[derive(Clone, Copy, Debug, PartialEq)]
pub(crate) struct OpenEntry {
    pub(crate) total: f32,
    pub(crate) node: usize,
    pub(crate) cell: usize,
}

#[derive(Clone, Debug, Default)]
pub(crate) struct OpenList {
    heap: Vec<OpenEntry>,
    slots: Vec<usize>,
}

impl OpenList {
    pub(crate) fn new(cells: usize) -> Self {
        Self {
            heap: Vec::new(),
            slots: vec![NOT_QUEUED; cells],
        }
    }

    /// Drop all entries and size the slot table for `cells` cells.
    pub(crate) fn resize(&mut self, cells: usize) {
        self.heap.clear();
        self.slots.clear();
        self.slots.resize(cells, NOT_QUEUED);
    }

    /// Drop all entries, keeping allocations.
    pub(crate) fn clear(&mut self) {
        for e in self.heap.drain(..) {
            self.slots[e.cell] = NOT_QUEUED;
        }
    }

    #[inline]
    pub(crate) fn len(&self) -> usize {
        self.heap.len()
    }

    /// Whether the cell currently has an entry in the heap.
    #[inline]
    pub(crate) fn contains(&self, cell: usize) -> bool {
        self.slots[cell] != NOT_QUEUED
    }

    pub(crate) fn push(&mut self, entry: OpenEntry) {
        debug_assert!(!self.contains(entry.cell), "cell {} queued twice", entry.cell);
        let pos = self.heap.len();
        self.heap.push(entry);
        self.slots[entry.cell] = pos;
        self.sift_up(pos);
    }

    /// Remove and return the entry with the smallest total. Among equal
    /// totals the order is deterministic but unspecified.
    pub(crate) fn pop_min(&mut self) -> Option<OpenEntry> {
        let last = self.heap.len().checked_sub(1)?;
        self.swap(0, last);
        let top = self.heap.pop()?;
        self.slots[top.cell] = NOT_QUEUED;
        if !self.heap.is_empty() {
            self.sift_down(0);
        }
        Some(top)
    }

    /// Replace the queued entry for `entry.cell` if `entry` is strictly
    /// cheaper. Returns whether the replacement happened; cells that are not
    /// in the heap (already expanded, or never queued) are left alone.
    pub(crate) fn insert_smaller(&mut self, entry: OpenEntry) -> bool {
        let pos = self.slots[entry.cell];
        if pos == NOT_QUEUED || entry.total >= self.heap[pos].total {
            return false;
        }
        self.heap[pos] = entry;
        self.sift_up(pos);
        true
    }

    fn sift_up(&mut self, mut pos: usize) {
        while pos > 0 {
            let parent = (pos - 1) / 2;
            if self.heap[pos].total >= self.heap[parent].total {
                break;
            }
            self.swap(pos, parent);
            pos = parent;
        }
    }

    fn sift_down(&mut self, mut pos: usize) {
        let len = self.heap.len();
        loop {
            let left = 2 * pos + 1;
            if left >= len {
                break;
            }
            let right = left + 1;
            let child = if right < len && self.heap[right].total < self.heap[left].total {
                right
            } else {
                left
            };
            if self.heap[child].total >= self.heap[pos].total {
                break;
            }
            self.swap(pos, child);
            pos = child;
        }
    }

    #[inline]
    fn swap(&mut self, a: usize, b: usize) {
        self.heap.swap(a, b);
        self.slots[self.heap[a].cell] = a;
        self.slots[self.heap[b].cell] = b;
    }
}
