//! The equirectangular tiling scheme: tiles divide longitude and latitude
//! uniformly, with a 2×1 grid at level zero by default.

use std::f64::consts::TAU;

use tellus_geo::{Cartographic, Ellipsoid, Rectangle};

use crate::TilingScheme;

/// A tiling scheme that divides a geographic rectangle into a uniform grid,
/// doubling the tile count in each direction at every level.
#[derive(Clone, Debug)]
pub struct GeographicTilingScheme {
    ellipsoid: Ellipsoid,
    rectangle: Rectangle,
    number_of_level_zero_tiles_x: u32,
    number_of_level_zero_tiles_y: u32,
}

impl GeographicTilingScheme {
    /// Construct a scheme over `rectangle` with the given level-zero grid.
    ///
    /// # Panics
    ///
    /// Panics if either level-zero tile count is zero.
    #[must_use]
    pub fn new(
        ellipsoid: Ellipsoid,
        rectangle: Rectangle,
        number_of_level_zero_tiles_x: u32,
        number_of_level_zero_tiles_y: u32,
    ) -> Self {
        assert!(
            number_of_level_zero_tiles_x > 0 && number_of_level_zero_tiles_y > 0,
            "level-zero tile counts must be positive, got {number_of_level_zero_tiles_x}x{number_of_level_zero_tiles_y}"
        );
        Self {
            ellipsoid,
            rectangle,
            number_of_level_zero_tiles_x,
            number_of_level_zero_tiles_y,
        }
    }
}

impl Default for GeographicTilingScheme {
    /// The whole WGS84 globe with two level-zero tiles in X and one in Y.
    fn default() -> Self {
        Self::new(Ellipsoid::wgs84(), Rectangle::MAX_VALUE, 2, 1)
    }
}

impl TilingScheme for GeographicTilingScheme {
    fn ellipsoid(&self) -> &Ellipsoid {
        &self.ellipsoid
    }

    fn rectangle(&self) -> &Rectangle {
        &self.rectangle
    }

    fn number_of_x_tiles_at_level(&self, level: u32) -> u32 {
        self.number_of_level_zero_tiles_x << level
    }

    fn number_of_y_tiles_at_level(&self, level: u32) -> u32 {
        self.number_of_level_zero_tiles_y << level
    }

    fn tile_x_y_to_rectangle(&self, x: u32, y: u32, level: u32) -> Rectangle {
        let x_tiles = self.number_of_x_tiles_at_level(level);
        let y_tiles = self.number_of_y_tiles_at_level(level);
        assert!(
            x < x_tiles && y < y_tiles,
            "tile ({x}, {y}) out of range for level {level} ({x_tiles}x{y_tiles})"
        );

        let x_tile_width = self.rectangle.width() / f64::from(x_tiles);
        let west = self.rectangle.west + f64::from(x) * x_tile_width;
        let east = self.rectangle.west + f64::from(x + 1) * x_tile_width;

        let y_tile_height = self.rectangle.height() / f64::from(y_tiles);
        let north = self.rectangle.north - f64::from(y) * y_tile_height;
        let south = self.rectangle.north - f64::from(y + 1) * y_tile_height;

        Rectangle::new(west, south, east, north)
    }

    fn position_to_tile_xy(&self, position: &Cartographic, level: u32) -> Option<(u32, u32)> {
        if !self.rectangle.contains(position) {
            return None;
        }

        let x_tiles = self.number_of_x_tiles_at_level(level);
        let y_tiles = self.number_of_y_tiles_at_level(level);
        let x_tile_width = self.rectangle.width() / f64::from(x_tiles);
        let y_tile_height = self.rectangle.height() / f64::from(y_tiles);

        let mut longitude = position.longitude;
        if self.rectangle.east < self.rectangle.west && longitude < 0.0 {
            longitude += TAU;
        }

        let mut x = ((longitude - self.rectangle.west) / x_tile_width) as u32;
        if x >= x_tiles {
            x = x_tiles - 1;
        }
        let mut y = ((self.rectangle.north - position.latitude) / y_tile_height) as u32;
        if y >= y_tiles {
            y = y_tiles - 1;
        }

        Some((x, y))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::{FRAC_PI_2, PI};

    #[test]
    fn test_tile_counts_double_each_level() {
        let scheme = GeographicTilingScheme::default();
        assert_eq!(scheme.number_of_x_tiles_at_level(0), 2);
        assert_eq!(scheme.number_of_y_tiles_at_level(0), 1);
        assert_eq!(scheme.number_of_x_tiles_at_level(3), 16);
        assert_eq!(scheme.number_of_y_tiles_at_level(3), 8);
    }

    #[test]
    fn test_level_zero_tiles_split_globe_at_prime_meridian() {
        let scheme = GeographicTilingScheme::default();

        let west_tile = scheme.tile_x_y_to_rectangle(0, 0, 0);
        assert!((west_tile.west - -PI).abs() < 1e-12);
        assert!(west_tile.east.abs() < 1e-12);
        assert!((west_tile.north - FRAC_PI_2).abs() < 1e-12);
        assert!((west_tile.south - -FRAC_PI_2).abs() < 1e-12);

        let east_tile = scheme.tile_x_y_to_rectangle(1, 0, 0);
        assert!(east_tile.west.abs() < 1e-12);
        assert!((east_tile.east - PI).abs() < 1e-12);
    }

    #[test]
    fn test_y_zero_is_northernmost() {
        let scheme = GeographicTilingScheme::default();
        let top = scheme.tile_x_y_to_rectangle(0, 0, 1);
        let bottom = scheme.tile_x_y_to_rectangle(0, 1, 1);
        assert!(top.south >= bottom.north - 1e-12);
        assert!((top.north - FRAC_PI_2).abs() < 1e-12);
        assert!((bottom.south - -FRAC_PI_2).abs() < 1e-12);
    }

    #[test]
    fn test_position_round_trips_to_containing_tile() {
        let scheme = GeographicTilingScheme::default();
        let position = Cartographic::from_degrees(45.0, 30.0, 0.0);
        for level in 0..6 {
            let (x, y) = scheme
                .position_to_tile_xy(&position, level)
                .unwrap_or_else(|| panic!("position should map to a tile at level {level}"));
            let rectangle = scheme.tile_x_y_to_rectangle(x, y, level);
            assert!(
                rectangle.contains(&position),
                "tile ({x}, {y}, {level}) does not contain the position"
            );
        }
    }

    #[test]
    fn test_position_outside_rectangle_maps_to_no_tile() {
        let scheme = GeographicTilingScheme::new(
            Ellipsoid::wgs84(),
            Rectangle::new(0.0, 0.0, 1.0, 1.0),
            1,
            1,
        );
        assert_eq!(
            scheme.position_to_tile_xy(&Cartographic::new(-0.5, 0.5, 0.0), 0),
            None
        );
    }

    #[test]
    fn test_east_edge_clamps_to_last_tile() {
        let scheme = GeographicTilingScheme::default();
        let (x, y) = scheme
            .position_to_tile_xy(&Cartographic::new(PI, -FRAC_PI_2, 0.0), 2)
            .unwrap_or_else(|| panic!("globe edge should still map to a tile"));
        assert_eq!(x, scheme.number_of_x_tiles_at_level(2) - 1);
        assert_eq!(y, scheme.number_of_y_tiles_at_level(2) - 1);
    }

    #[test]
    #[should_panic(expected = "out of range")]
    fn test_out_of_range_tile_panics() {
        let scheme = GeographicTilingScheme::default();
        scheme.tile_x_y_to_rectangle(2, 0, 0);
    }
}
