use jumpgrid_core::{Dir, Point};

use crate::bitgrid::BitGrid;
use crate::collision::CollisionMap;
use crate::openlist::{OpenEntry, OpenList};

/// Per-finder search options.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct SearchConfig {
    /// Run string pulling on the jump point path before returning it.
    pub simplify: bool,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self { simplify: true }
    }
}

/// Counters from the most recent jump point search.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SearchStats {
    /// Nodes popped from the open list.
    pub expanded: usize,
    /// Jump points discovered, goal excluded.
    pub generated: usize,
    /// Waypoints in the returned path; 0 on failure.
    pub waypoints: usize,
}

// ---------------------------------------------------------------------------
// Internal nodes
// ---------------------------------------------------------------------------

/// Jump point search node. `parent` indexes the same arena.
#[derive(Clone, Copy, Debug)]
pub(crate) struct SearchNode {
    pub(crate) parent: Option<usize>,
    pub(crate) pos: Point,
    /// Direction of travel into `pos`; `None` for the start node.
    pub(crate) dir: Option<Dir>,
    pub(crate) g: f32,
    pub(crate) h: f32,
}

impl SearchNode {
    #[inline]
    pub(crate) fn total(&self) -> f32 {
        self.g + self.h
    }
}

/// Per-cell record for the 8-connected A* baseline.
#[derive(Clone)]
pub(crate) struct Node {
    pub(crate) g: f32,
    pub(crate) f: f32,
    pub(crate) parent: usize,
    pub(crate) generation: u32,
    pub(crate) open: bool,
}

impl Default for Node {
    fn default() -> Self {
        Self {
            g: 0.0,
            f: 0.0,
            parent: usize::MAX,
            generation: 0,
            open: false,
        }
    }
}

/// Reference into the A* node array, ordered by `f` for use in `BinaryHeap`.
#[derive(Clone, Copy, PartialEq)]
pub(crate) struct NodeRef {
    pub(crate) idx: usize,
    pub(crate) f: f32,
}

impl Eq for NodeRef {}

impl Ord for NodeRef {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        // Reverse so BinaryHeap (max-heap) pops smallest f first.
        other.f.total_cmp(&self.f)
    }
}

impl PartialOrd for NodeRef {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

// ---------------------------------------------------------------------------
// PathFinder
// ---------------------------------------------------------------------------

/// Reusable search state for one map size.
///
/// `PathFinder` owns the node arena, open list and closed set so that
/// repeated queries on maps of the same size allocate nothing after the
/// first use. Searches take the map by reference; the finder only needs to
/// agree with it on dimensions and resizes itself when it does not.
pub struct PathFinder {
    pub(crate) config: SearchConfig,
    pub(crate) size: Point,
    // jump point search state
    pub(crate) nodes: Vec<SearchNode>,
    pub(crate) open: OpenList,
    pub(crate) closed: BitGrid,
    pub(crate) stats: SearchStats,
    // A* baseline caches
    pub(crate) astar_nodes: Vec<Node>,
    pub(crate) astar_generation: u32,
}

impl PathFinder {
    /// Create a finder for maps of `size` (width, height).
    pub fn new(size: Point) -> Self {
        let size = Point::new(size.x.max(0), size.y.max(0));
        let len = (size.x * size.y) as usize;
        Self {
            config: SearchConfig::default(),
            size,
            nodes: Vec::new(),
            open: OpenList::new(len),
            closed: BitGrid::new(size.x, size.y),
            stats: SearchStats::default(),
            astar_nodes: vec![Node::default(); len],
            astar_generation: 0,
        }
    }

    /// Create a finder sized for `map`.
    pub fn for_map(map: &CollisionMap) -> Self {
        Self::new(map.size())
    }

    pub fn with_config(mut self, config: SearchConfig) -> Self {
        self.config = config;
        self
    }

    #[inline]
    pub fn config(&self) -> &SearchConfig {
        &self.config
    }

    pub fn set_config(&mut self, config: SearchConfig) {
        self.config = config;
    }

    /// Map size the caches are laid out for.
    #[inline]
    pub fn size(&self) -> Point {
        self.size
    }

    /// Counters from the last [`jps_path`](Self::jps_path) call. A rejected
    /// query reports all zeros.
    #[inline]
    pub fn stats(&self) -> SearchStats {
        self.stats
    }

    /// Adapt the caches to maps of `size`.
    ///
    /// The A* node array keeps its allocation when the new size fits and
    /// only bumps its generation. The closed set and the open list slot
    /// table follow the exact dimensions.
    pub fn set_size(&mut self, size: Point) {
        let size = Point::new(size.x.max(0), size.y.max(0));
        if size == self.size {
            return;
        }
        let new_len = (size.x * size.y) as usize;
        self.size = size;
        self.nodes.clear();
        self.open.resize(new_len);
        self.closed = BitGrid::new(size.x, size.y);
        self.stats = SearchStats::default();

        if new_len <= self.astar_nodes.len() {
            self.astar_generation = self.astar_generation.wrapping_add(1);
            return;
        }
        self.astar_nodes.clear();
        self.astar_nodes.resize(new_len, Node::default());
        self.astar_generation = 0;
    }

    /// Resize to `map` if the dimensions differ.
    #[inline]
    pub(crate) fn fit(&mut self, map: &CollisionMap) {
        if self.size != map.size() {
            self.set_size(map.size());
        }
    }

    // -----------------------------------------------------------------------
    // Coordinate helpers
    // -----------------------------------------------------------------------

    /// Convert a `Point` to a flat index. Returns `None` if out of range.
    #[inline]
    pub(crate) fn idx(&self, p: Point) -> Option<usize> {
        if p.x < 0 || p.y < 0 || p.x >= self.size.x || p.y >= self.size.y {
            return None;
        }
        Some(p.y as usize * self.size.x as usize + p.x as usize)
    }

    /// Convert a flat index back to a `Point`.
    #[inline]
    pub(crate) fn point(&self, idx: usize) -> Point {
        let w = self.size.x as usize;
        Point::new((idx % w) as i32, (idx / w) as i32)
    }

    /// Heap entry for arena node `node`. The node must lie on the grid.
    #[inline]
    pub(crate) fn entry(&self, node: usize) -> OpenEntry {
        let n = &self.nodes[node];
        let w = self.size.x as usize;
        OpenEntry {
            total: n.total(),
            node,
            cell: n.pos.y as usize * w + n.pos.x as usize,
        }
    }
}

#[cfg(feature = "serde")]
#[derive(serde::Serialize, serde::Deserialize)]
struct PathFinderRepr {
    size: Point,
    #[serde(default)]
    config: SearchConfig,
}

#[cfg(feature = "serde")]
impl serde::Serialize for PathFinder {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        PathFinderRepr {
            size: self.size,
            config: self.config,
        }
        .serialize(serializer)
    }
}

#[cfg(feature = "serde")]
impl<'de> serde::Deserialize<'de> for PathFinder {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let repr = PathFinderRepr::deserialize(deserializer)?;
        Ok(PathFinder::new(repr.size).with_config(repr.config))
    }
}
