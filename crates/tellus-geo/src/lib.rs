//! Geometric value types for the Tellus globe-streaming core: ellipsoid body
//! descriptor, geodetic coordinates, geographic rectangles, and bounding spheres.

mod bounding_sphere;
mod cartographic;
mod ellipsoid;
mod rectangle;

pub use bounding_sphere::BoundingSphere;
pub use cartographic::Cartographic;
pub use ellipsoid::Ellipsoid;
pub use rectangle::Rectangle;
