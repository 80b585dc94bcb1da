//! Tiling schemes: the mapping between quadtree tile coordinates and
//! geographic rectangles, and the authority on per-level tile counts.

mod geographic;
mod scheme;

pub use geographic::GeographicTilingScheme;
pub use scheme::TilingScheme;
