//! Bounding spheres built from point sets.

use glam::DVec3;

/// A sphere enclosing a set of positions.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BoundingSphere {
    /// Center of the sphere.
    pub center: DVec3,
    /// Radius of the sphere.
    pub radius: f64,
}

impl BoundingSphere {
    /// Compute a tight enclosing sphere for `points` using Ritter's
    /// construction: seed the sphere from the most separated axis-extreme
    /// pair, then grow it to admit any point left outside.
    ///
    /// An empty slice yields the degenerate sphere at the origin with
    /// radius zero.
    #[must_use]
    pub fn from_points(points: &[DVec3]) -> Self {
        let Some(&first) = points.first() else {
            return Self {
                center: DVec3::ZERO,
                radius: 0.0,
            };
        };

        let mut x_min = first;
        let mut x_max = first;
        let mut y_min = first;
        let mut y_max = first;
        let mut z_min = first;
        let mut z_max = first;
        for &p in points {
            if p.x < x_min.x {
                x_min = p;
            }
            if p.x > x_max.x {
                x_max = p;
            }
            if p.y < y_min.y {
                y_min = p;
            }
            if p.y > y_max.y {
                y_max = p;
            }
            if p.z < z_min.z {
                z_min = p;
            }
            if p.z > z_max.z {
                z_max = p;
            }
        }

        // Seed from the axis pair with the greatest separation.
        let x_span = (x_max - x_min).length_squared();
        let y_span = (y_max - y_min).length_squared();
        let z_span = (z_max - z_min).length_squared();
        let (mut a, mut b) = (x_min, x_max);
        if y_span > x_span && y_span > z_span {
            (a, b) = (y_min, y_max);
        } else if z_span > x_span && z_span > y_span {
            (a, b) = (z_min, z_max);
        }

        let mut center = (a + b) * 0.5;
        let mut radius = (b - center).length();

        for &p in points {
            let distance = (p - center).length();
            if distance > radius {
                let grown = (radius + distance) * 0.5;
                center += (p - center) * ((distance - grown) / distance);
                radius = grown;
            }
        }

        Self { center, radius }
    }
}
