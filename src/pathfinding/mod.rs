//! Grid pathfinding: a static lattice of walkable cells searched with A*.

mod grid;
mod node;

pub use grid::Grid;
pub use node::{Node, NodeCoord};

/// Cost of a horizontal or vertical step.
pub const CARDINAL_COST: u32 = 10;
/// Cost of a diagonal step, 10·√2 rounded.
pub const DIAGONAL_COST: u32 = 14;
