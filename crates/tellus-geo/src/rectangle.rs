//! Geographic rectangles in radians, with the boundary subsampling used to
//! summarize a tile's extent as a handful of surface positions.

use std::f64::consts::{FRAC_PI_2, PI, TAU};

use glam::DVec3;

use crate::{Cartographic, Ellipsoid};

/// A two-dimensional region on the ellipsoid, bounded by meridians and
/// parallels and expressed in radians.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Rectangle {
    /// Westernmost longitude.
    pub west: f64,
    /// Southernmost latitude.
    pub south: f64,
    /// Easternmost longitude.
    pub east: f64,
    /// Northernmost latitude.
    pub north: f64,
}

impl Rectangle {
    /// The largest possible rectangle: the whole globe.
    pub const MAX_VALUE: Self = Self {
        west: -PI,
        south: -FRAC_PI_2,
        east: PI,
        north: FRAC_PI_2,
    };

    /// Construct from bounds in radians.
    #[must_use]
    pub const fn new(west: f64, south: f64, east: f64, north: f64) -> Self {
        Self {
            west,
            south,
            east,
            north,
        }
    }

    /// Angular width in radians. Rectangles crossing the anti-meridian
    /// (east < west) report their true width.
    #[must_use]
    pub fn width(&self) -> f64 {
        let mut east = self.east;
        if east < self.west {
            east += TAU;
        }
        east - self.west
    }

    /// Angular height in radians.
    #[must_use]
    pub fn height(&self) -> f64 {
        self.north - self.south
    }

    /// The center of the rectangle, with longitude wrapped to [-π, π].
    #[must_use]
    pub fn center(&self) -> Cartographic {
        let mut east = self.east;
        if east < self.west {
            east += TAU;
        }
        let longitude = ((self.west + east) * 0.5 + PI).rem_euclid(TAU) - PI;
        Cartographic::new(longitude, (self.south + self.north) * 0.5, 0.0)
    }

    /// Whether the rectangle contains a geodetic position (height ignored).
    #[must_use]
    pub fn contains(&self, position: &Cartographic) -> bool {
        let mut longitude = position.longitude;
        let mut east = self.east;
        if east < self.west {
            east += TAU;
            if longitude < 0.0 {
                longitude += TAU;
            }
        }
        longitude >= self.west
            && longitude <= east
            && position.latitude >= self.south
            && position.latitude <= self.north
    }

    /// Sample positions along the rectangle boundary, lifted to
    /// `surface_height` meters above `ellipsoid`, such that their extremes
    /// bound the rectangle's surface geometry.
    ///
    /// Samples the four corners, the contained multiples of π/2 in longitude
    /// at the latitude closest to the equator, and the west/east edge points
    /// on the equator when the rectangle straddles it.
    #[must_use]
    pub fn subsample(&self, ellipsoid: &Ellipsoid, surface_height: f64) -> Vec<DVec3> {
        let mut results = Vec::with_capacity(12);
        let mut lla = Cartographic::new(self.west, self.north, surface_height);
        results.push(ellipsoid.cartographic_to_cartesian(&lla));
        lla.longitude = self.east;
        results.push(ellipsoid.cartographic_to_cartesian(&lla));
        lla.latitude = self.south;
        results.push(ellipsoid.cartographic_to_cartesian(&lla));
        lla.longitude = self.west;
        results.push(ellipsoid.cartographic_to_cartesian(&lla));

        // The latitude at which the rectangle bulges furthest from the axis.
        if self.north < 0.0 {
            lla.latitude = self.north;
        } else if self.south > 0.0 {
            lla.latitude = self.south;
        } else {
            lla.latitude = 0.0;
        }

        for i in 1..8 {
            lla.longitude = -PI + f64::from(i) * FRAC_PI_2;
            if self.contains(&lla) {
                results.push(ellipsoid.cartographic_to_cartesian(&lla));
            }
        }

        if lla.latitude == 0.0 {
            lla.longitude = self.west;
            results.push(ellipsoid.cartographic_to_cartesian(&lla));
            lla.longitude = self.east;
            results.push(ellipsoid.cartographic_to_cartesian(&lla));
        }

        results
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_width_and_height() {
        let r = Rectangle::new(-0.5, -0.25, 0.5, 0.75);
        assert!((r.width() - 1.0).abs() < 1e-12);
        assert!((r.height() - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_width_across_anti_meridian() {
        let r = Rectangle::new(PI - 0.1, -0.1, -PI + 0.1, 0.1);
        assert!((r.width() - 0.2).abs() < 1e-12);
    }

    #[test]
    fn test_contains_interior_and_boundary() {
        let r = Rectangle::new(-1.0, -0.5, 1.0, 0.5);
        assert!(r.contains(&Cartographic::new(0.0, 0.0, 0.0)));
        assert!(r.contains(&Cartographic::new(-1.0, 0.5, 0.0)));
        assert!(!r.contains(&Cartographic::new(1.1, 0.0, 0.0)));
        assert!(!r.contains(&Cartographic::new(0.0, 0.6, 0.0)));
    }

    #[test]
    fn test_contains_across_anti_meridian() {
        let r = Rectangle::new(PI - 0.1, -0.1, -PI + 0.1, 0.1);
        assert!(r.contains(&Cartographic::new(PI - 0.05, 0.0, 0.0)));
        assert!(r.contains(&Cartographic::new(-PI + 0.05, 0.0, 0.0)));
        assert!(!r.contains(&Cartographic::new(0.0, 0.0, 0.0)));
    }

    #[test]
    fn test_center_of_whole_globe_is_origin() {
        let c = Rectangle::MAX_VALUE.center();
        assert!(c.longitude.abs() < 1e-12 || (c.longitude.abs() - PI).abs() < 1e-12);
        assert!(c.latitude.abs() < 1e-12);
    }

    #[test]
    fn test_subsample_off_equator_samples_corners() {
        let ellipsoid = Ellipsoid::unit_sphere();
        // Entirely in the northern hemisphere, narrower than a quadrant.
        let r = Rectangle::new(0.1, 0.2, 0.4, 0.5);
        let positions = r.subsample(&ellipsoid, 0.0);
        assert_eq!(positions.len(), 4);
        for p in &positions {
            assert!((p.length() - 1.0).abs() < 1e-12);
        }
    }

    #[test]
    fn test_subsample_straddling_equator_adds_edge_points() {
        let ellipsoid = Ellipsoid::unit_sphere();
        let r = Rectangle::new(-0.4, -0.3, 0.4, 0.3);
        let positions = r.subsample(&ellipsoid, 0.0);
        // 4 corners + the prime meridian crossing + west/east equator points.
        assert_eq!(positions.len(), 7);
        // The equator samples reach the full equatorial radius.
        let max_len = positions
            .iter()
            .map(|p| p.length())
            .fold(0.0_f64, f64::max);
        assert!((max_len - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_subsample_applies_surface_height() {
        let ellipsoid = Ellipsoid::unit_sphere();
        let r = Rectangle::new(0.1, 0.2, 0.4, 0.5);
        let lifted = r.subsample(&ellipsoid, 0.5);
        for p in &lifted {
            assert!((p.length() - 1.5).abs() < 1e-12);
        }
    }
}
