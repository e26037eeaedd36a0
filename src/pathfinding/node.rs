use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct NodeCoord {
    pub x: i32,
    pub y: i32,
}

impl NodeCoord {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    pub fn offset(self, dx: i32, dy: i32) -> Self {
        Self::new(self.x + dx, self.y + dy)
    }

    /// Manhattan distance, used unscaled as the search heuristic.
    pub fn manhattan(self, other: NodeCoord) -> u32 {
        self.x.abs_diff(other.x) + self.y.abs_diff(other.y)
    }
}

/// A grid cell. Identity is its coordinate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Node {
    pub coord: NodeCoord,
    pub walkable: bool,
}

impl Node {
    pub fn new(x: i32, y: i32) -> Self {
        Self {
            coord: NodeCoord::new(x, y),
            walkable: true,
        }
    }

    pub fn x(&self) -> i32 {
        self.coord.x
    }

    pub fn y(&self) -> i32 {
        self.coord.y
    }
}

/// Per-search bookkeeping for one node, stored densely by grid index.
#[derive(Debug, Clone, Copy)]
pub(crate) struct PathNode {
    pub g: u32,
    pub h: u32,
    pub parent: Option<usize>,
    pub open: bool,
    pub closed: bool,
}

impl PathNode {
    pub fn f(&self) -> u32 {
        self.g.saturating_add(self.h)
    }
}

impl Default for PathNode {
    fn default() -> Self {
        Self {
            g: u32::MAX,
            h: 0,
            parent: None,
            open: false,
            closed: false,
        }
    }
}
