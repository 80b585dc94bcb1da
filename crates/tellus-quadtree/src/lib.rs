//! The multiresolution tile quadtree: nodes indexed by `(level, x, y)` with
//! a bounded load lifecycle, lazily materialized children, and explicit
//! resource reclamation, backed by a generational arena.

mod tile;
mod tree;

pub use tile::{QuadtreeTile, TileData, TileLoadState};
pub use tree::{QuadtreeTileTree, TileId};
