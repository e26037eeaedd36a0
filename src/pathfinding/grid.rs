use tracing::trace;

use super::node::{Node, NodeCoord, PathNode};
use super::{CARDINAL_COST, DIAGONAL_COST};

const CARDINAL_STEPS: [(i32, i32); 4] = [(-1, 0), (1, 0), (0, -1), (0, 1)];
const DIAGONAL_STEPS: [(i32, i32); 4] = [(-1, -1), (1, -1), (-1, 1), (1, 1)];

/// Fixed-size lattice with exactly one node per coordinate.
#[derive(Debug, Clone)]
pub struct Grid {
    width: u32,
    height: u32,
    nodes: Vec<Node>,
}

impl Grid {
    pub fn new(width: u32, height: u32) -> Self {
        let mut nodes = Vec::with_capacity(width as usize * height as usize);
        for y in 0..height as i32 {
            for x in 0..width as i32 {
                nodes.push(Node::new(x, y));
            }
        }
        Self {
            width,
            height,
            nodes,
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    /// Node at `(x, y)`, or `None` outside the grid.
    pub fn node_at(&self, x: i32, y: i32) -> Option<&Node> {
        self.node(NodeCoord::new(x, y))
    }

    pub fn node(&self, coord: NodeCoord) -> Option<&Node> {
        self.index_of(coord).map(|index| &self.nodes[index])
    }

    /// Sets the walkable flag of one node. Returns `false` if the coordinate
    /// is outside the grid.
    pub fn set_walkable(&mut self, x: i32, y: i32, walkable: bool) -> bool {
        match self.index_of(NodeCoord::new(x, y)) {
            Some(index) => {
                self.nodes[index].walkable = walkable;
                true
            }
            None => false,
        }
    }

    pub fn is_walkable(&self, coord: NodeCoord) -> bool {
        self.node(coord).is_some_and(|node| node.walkable)
    }

    pub fn is_border(&self, coord: NodeCoord) -> bool {
        self.index_of(coord).is_some()
            && (coord.x == 0
                || coord.y == 0
                || coord.x == self.width as i32 - 1
                || coord.y == self.height as i32 - 1)
    }

    pub fn set_border_walkable(&mut self, walkable: bool) {
        let (max_x, max_y) = (self.width as i32 - 1, self.height as i32 - 1);
        for node in &mut self.nodes {
            let NodeCoord { x, y } = node.coord;
            if x == 0 || y == 0 || x == max_x || y == max_y {
                node.walkable = walkable;
            }
        }
    }

    /// A* from `start` to `end`, inclusive at both ends.
    ///
    /// Returns an empty path when either endpoint is missing or blocked, or
    /// when the frontier runs dry before reaching `end`. Ties on F go to the
    /// node that entered the open list first.
    pub fn find_path(&self, start: NodeCoord, end: NodeCoord, allow_diagonal: bool) -> Vec<Node> {
        let (Some(start_index), Some(end_index)) =
            (self.walkable_index(start), self.walkable_index(end))
        else {
            return Vec::new();
        };

        let mut search = vec![PathNode::default(); self.nodes.len()];
        search[start_index].g = 0;
        search[start_index].h = start.manhattan(end);
        search[start_index].open = true;
        let mut open = vec![start_index];
        let mut expanded = 0usize;

        while let Some(position) = lowest_f(&open, &search) {
            let current = open.remove(position);
            if current == end_index {
                trace!(expanded, "path found");
                return self.reconstruct(&search, current);
            }
            search[current].open = false;
            search[current].closed = true;
            expanded += 1;

            let current_g = search[current].g;
            for (neighbor, step_cost) in self.neighbors(self.nodes[current].coord, allow_diagonal) {
                let entry = &mut search[neighbor];
                if entry.closed {
                    continue;
                }
                let tentative_g = current_g.saturating_add(step_cost);
                if tentative_g >= entry.g {
                    continue;
                }
                entry.parent = Some(current);
                entry.g = tentative_g;
                entry.h = self.nodes[neighbor].coord.manhattan(end);
                if !entry.open {
                    entry.open = true;
                    open.push(neighbor);
                }
            }
        }

        trace!(expanded, "open list exhausted without reaching goal");
        Vec::new()
    }

    fn index_of(&self, coord: NodeCoord) -> Option<usize> {
        if coord.x < 0 || coord.y < 0 {
            return None;
        }
        let (x, y) = (coord.x as u32, coord.y as u32);
        if x < self.width && y < self.height {
            Some((y * self.width + x) as usize)
        } else {
            None
        }
    }

    fn walkable_index(&self, coord: NodeCoord) -> Option<usize> {
        self.index_of(coord)
            .filter(|&index| self.nodes[index].walkable)
    }

    /// Walkable neighbors with their step cost. A diagonal is only admitted
    /// when both cardinal cells it passes between are walkable.
    fn neighbors(&self, coord: NodeCoord, allow_diagonal: bool) -> Vec<(usize, u32)> {
        let mut neighbors = Vec::with_capacity(8);
        for (dx, dy) in CARDINAL_STEPS {
            if let Some(index) = self.walkable_index(coord.offset(dx, dy)) {
                neighbors.push((index, CARDINAL_COST));
            }
        }
        if allow_diagonal {
            for (dx, dy) in DIAGONAL_STEPS {
                let Some(index) = self.walkable_index(coord.offset(dx, dy)) else {
                    continue;
                };
                if self.is_walkable(coord.offset(dx, 0)) && self.is_walkable(coord.offset(0, dy)) {
                    neighbors.push((index, DIAGONAL_COST));
                }
            }
        }
        neighbors
    }

    fn reconstruct(&self, search: &[PathNode], end_index: usize) -> Vec<Node> {
        let mut path = Vec::new();
        let mut cursor = Some(end_index);
        while let Some(index) = cursor {
            path.push(self.nodes[index]);
            cursor = search[index].parent;
        }
        path.reverse();
        path
    }
}

fn lowest_f(open: &[usize], search: &[PathNode]) -> Option<usize> {
    open.iter()
        .enumerate()
        .min_by_key(|&(_, &index)| search[index].f())
        .map(|(position, _)| position)
}
