/// A geodetic position: longitude and latitude in radians, height in meters
/// above the ellipsoid surface.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Cartographic {
    /// Longitude in radians, positive east.
    pub longitude: f64,
    /// Latitude in radians, positive north.
    pub latitude: f64,
    /// Height in meters above the ellipsoid.
    pub height: f64,
}

impl Cartographic {
    /// Construct from radians.
    #[must_use]
    pub const fn new(longitude: f64, latitude: f64, height: f64) -> Self {
        Self {
            longitude,
            latitude,
            height,
        }
    }

    /// Construct from degrees (height stays in meters).
    #[must_use]
    pub fn from_degrees(longitude: f64, latitude: f64, height: f64) -> Self {
        Self {
            longitude: longitude.to_radians(),
            latitude: latitude.to_radians(),
            height,
        }
    }
}
