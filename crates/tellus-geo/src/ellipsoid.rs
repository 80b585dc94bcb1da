//! Ellipsoid body descriptor — the immutable shape parameters of a planet,
//! and the transform into the scaled space where the ellipsoid is a unit sphere.

use glam::DVec3;

use crate::Cartographic;

/// An ellipsoid centered at the origin and aligned with the coordinate axes,
/// defined by its three semi-axis radii.
///
/// Immutable once constructed; runtime state (loaded tiles, camera-derived
/// caches) belongs to the occluder and the tile tree, not here.
#[derive(Clone, Debug, PartialEq)]
pub struct Ellipsoid {
    radii: DVec3,
    radii_squared: DVec3,
    one_over_radii: DVec3,
    minimum_radius: f64,
    maximum_radius: f64,
}

impl Ellipsoid {
    /// Construct an ellipsoid from its semi-axis radii in meters.
    ///
    /// # Panics
    ///
    /// Panics if any radius is not positive.
    #[must_use]
    pub fn new(x: f64, y: f64, z: f64) -> Self {
        assert!(
            x > 0.0 && y > 0.0 && z > 0.0,
            "ellipsoid radii must be positive, got ({x}, {y}, {z})"
        );
        let radii = DVec3::new(x, y, z);
        Self {
            radii,
            radii_squared: radii * radii,
            one_over_radii: radii.recip(),
            minimum_radius: x.min(y).min(z),
            maximum_radius: x.max(y).max(z),
        }
    }

    /// The WGS84 Earth ellipsoid.
    #[must_use]
    pub fn wgs84() -> Self {
        Self::new(6_378_137.0, 6_378_137.0, 6_356_752.314_245_179)
    }

    /// The unit sphere, useful for tests and scaled-space reasoning.
    #[must_use]
    pub fn unit_sphere() -> Self {
        Self::new(1.0, 1.0, 1.0)
    }

    /// The semi-axis radii.
    #[must_use]
    pub fn radii(&self) -> DVec3 {
        self.radii
    }

    /// The smallest of the three radii.
    #[must_use]
    pub fn minimum_radius(&self) -> f64 {
        self.minimum_radius
    }

    /// The largest of the three radii.
    #[must_use]
    pub fn maximum_radius(&self) -> f64 {
        self.maximum_radius
    }

    /// Transform a position into the scaled space where this ellipsoid is a
    /// unit sphere: each component is divided by the corresponding radius.
    #[must_use]
    pub fn transform_position_to_scaled_space(&self, position: DVec3) -> DVec3 {
        position * self.one_over_radii
    }

    /// The outward unit normal of the ellipsoid surface at a geodetic position.
    #[must_use]
    pub fn geodetic_surface_normal_cartographic(&self, position: &Cartographic) -> DVec3 {
        let cos_latitude = position.latitude.cos();
        DVec3::new(
            cos_latitude * position.longitude.cos(),
            cos_latitude * position.longitude.sin(),
            position.latitude.sin(),
        )
    }

    /// Convert a geodetic position to a Cartesian position in the
    /// ellipsoid-centered frame.
    #[must_use]
    pub fn cartographic_to_cartesian(&self, position: &Cartographic) -> DVec3 {
        let n = self.geodetic_surface_normal_cartographic(position);
        let k = self.radii_squared * n;
        let gamma = n.dot(k).sqrt();
        k / gamma + n * position.height
    }
}
