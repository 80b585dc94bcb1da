use tellus_geo::{Cartographic, Ellipsoid, Rectangle};

/// A tiling scheme for geometry or imagery on the surface of an ellipsoid.
///
/// At level of detail zero, the coarsest level, the number of tiles is
/// configurable. At each subsequent level every tile has four children, two
/// in each direction.
pub trait TilingScheme {
    /// The ellipsoid the scheme tiles.
    fn ellipsoid(&self) -> &Ellipsoid;

    /// The rectangle, in radians, covered by the whole scheme.
    fn rectangle(&self) -> &Rectangle;

    /// Total number of tiles in the X direction at `level`.
    fn number_of_x_tiles_at_level(&self, level: u32) -> u32;

    /// Total number of tiles in the Y direction at `level`.
    fn number_of_y_tiles_at_level(&self, level: u32) -> u32;

    /// The geographic rectangle, in radians, covered by the tile at
    /// `(x, y, level)`.
    fn tile_x_y_to_rectangle(&self, x: u32, y: u32, level: u32) -> Rectangle;

    /// The `(x, y)` coordinates of the tile at `level` containing `position`,
    /// or `None` if the position lies outside the scheme's rectangle.
    fn position_to_tile_xy(&self, position: &Cartographic, level: u32) -> Option<(u32, u32)>;
}
