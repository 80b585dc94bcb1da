//! Horizon occlusion for an ellipsoid centered at the origin.
//!
//! All tests run in the scaled space where the ellipsoid is a unit sphere,
//! turning "hidden behind the horizon" into a cone test from the camera.
//! At surface level this can cull roughly half of all tiles.

use glam::DVec3;

use tellus_geo::{BoundingSphere, Ellipsoid, Rectangle};

/// Determines whether points on or above an ellipsoid are hidden behind the
/// horizon as seen from a camera position.
///
/// The camera position caches two derived quantities — its scaled-space
/// image and the squared scaled-space distance to the limb. They are only
/// ever rewritten together by [`set_camera_position`], so readers never
/// observe one without the other.
///
/// [`set_camera_position`]: EllipsoidalOccluder::set_camera_position
#[derive(Clone, Debug)]
pub struct EllipsoidalOccluder {
    ellipsoid: Ellipsoid,
    camera_position: DVec3,
    camera_position_in_scaled_space: DVec3,
    distance_to_limb_in_scaled_space_squared: f64,
}

impl EllipsoidalOccluder {
    /// Create an occluder with the camera at the origin. Call
    /// [`set_camera_position`](Self::set_camera_position) before testing
    /// visibility.
    #[must_use]
    pub fn new(ellipsoid: Ellipsoid) -> Self {
        Self::from_camera_position(ellipsoid, DVec3::ZERO)
    }

    /// Create an occluder with an initial camera position.
    #[must_use]
    pub fn from_camera_position(ellipsoid: Ellipsoid, camera_position: DVec3) -> Self {
        let mut occluder = Self {
            ellipsoid,
            camera_position: DVec3::ZERO,
            camera_position_in_scaled_space: DVec3::ZERO,
            distance_to_limb_in_scaled_space_squared: 0.0,
        };
        occluder.set_camera_position(camera_position);
        occluder
    }

    /// The ellipsoid acting as the occluder.
    #[must_use]
    pub fn ellipsoid(&self) -> &Ellipsoid {
        &self.ellipsoid
    }

    /// The current camera position.
    #[must_use]
    pub fn camera_position(&self) -> DVec3 {
        self.camera_position
    }

    /// Move the camera, recomputing both derived quantities in one step.
    /// Typically called once per frame, before any visibility queries for
    /// that frame.
    pub fn set_camera_position(&mut self, camera_position: DVec3) {
        let scaled = self
            .ellipsoid
            .transform_position_to_scaled_space(camera_position);
        self.camera_position = camera_position;
        self.camera_position_in_scaled_space = scaled;
        self.distance_to_limb_in_scaled_space_squared = scaled.length_squared() - 1.0;
    }

    /// Whether `occludee` is visible from the camera, i.e. not hidden behind
    /// the horizon.
    #[must_use]
    pub fn is_point_visible(&self, occludee: DVec3) -> bool {
        let scaled = self.ellipsoid.transform_position_to_scaled_space(occludee);
        self.is_scaled_space_point_visible(scaled)
    }

    /// Visibility test for a point already expressed in the scaled space,
    /// such as a culling point from one of the `compute_horizon_culling_*`
    /// methods.
    #[must_use]
    pub fn is_scaled_space_point_visible(&self, occludee_scaled_space_position: DVec3) -> bool {
        // The point is occluded when it lies inside the cone of invisibility
        // behind the unit sphere's limb as seen from the scaled camera.
        let vt = occludee_scaled_space_position - self.camera_position_in_scaled_space;
        let vt_dot_vc = -vt.dot(self.camera_position_in_scaled_space);
        let occluded = vt_dot_vc > self.distance_to_limb_in_scaled_space_squared
            && vt_dot_vc * vt_dot_vc / vt.length_squared()
                > self.distance_to_limb_in_scaled_space_squared;
        !occluded
    }

    /// Compute a conservative horizon culling point from a set of positions:
    /// if the returned point is below the horizon, every input position is
    /// guaranteed below the horizon too.
    ///
    /// `direction_to_point` is the ray, from the ellipsoid center, along
    /// which the point will lie; the direction from the center to the
    /// positions' bounding-sphere center works well. It need not be
    /// normalized. Positions must be expressed in the ellipsoid-centered
    /// frame. The result is in scaled space, ready for
    /// [`is_scaled_space_point_visible`](Self::is_scaled_space_point_visible).
    ///
    /// Returns `None` when `positions` is empty or no finite point along the
    /// direction covers all positions.
    #[must_use]
    pub fn compute_horizon_culling_point(
        &self,
        direction_to_point: DVec3,
        positions: &[DVec3],
    ) -> Option<DVec3> {
        let scaled_space_direction =
            compute_scaled_space_direction_to_point(&self.ellipsoid, direction_to_point);
        let mut result_magnitude = 0.0_f64;
        for &position in positions {
            let candidate = compute_magnitude(&self.ellipsoid, position, scaled_space_direction);
            result_magnitude = result_magnitude.max(candidate);
        }
        magnitude_to_point(scaled_space_direction, result_magnitude)
    }

    /// Like [`compute_horizon_culling_point`], but reads positions straight
    /// out of a packed vertex buffer: every `stride` values, the first three
    /// are a position relative to `center`. Avoids materializing a `DVec3`
    /// slice for large meshes.
    ///
    /// # Panics
    ///
    /// Panics if `stride < 3`.
    ///
    /// [`compute_horizon_culling_point`]: Self::compute_horizon_culling_point
    #[must_use]
    pub fn compute_horizon_culling_point_from_vertices(
        &self,
        direction_to_point: DVec3,
        vertices: &[f64],
        stride: usize,
        center: DVec3,
    ) -> Option<DVec3> {
        assert!(stride >= 3, "vertex stride must be at least 3, got {stride}");
        let scaled_space_direction =
            compute_scaled_space_direction_to_point(&self.ellipsoid, direction_to_point);
        let mut result_magnitude = 0.0_f64;
        for vertex in vertices.chunks_exact(stride) {
            let position = DVec3::new(
                vertex[0] + center.x,
                vertex[1] + center.y,
                vertex[2] + center.z,
            );
            let candidate = compute_magnitude(&self.ellipsoid, position, scaled_space_direction);
            result_magnitude = result_magnitude.max(candidate);
        }
        magnitude_to_point(scaled_space_direction, result_magnitude)
    }

    /// Compute a horizon culling point covering an ellipsoid-conforming
    /// rectangle, by subsampling its boundary and using the samples'
    /// bounding-sphere center as the direction.
    ///
    /// `ellipsoid` is the ellipsoid the rectangle is defined on, which may
    /// differ from this occluder's ellipsoid. Returns `None` when the
    /// bounding-sphere center sits within a tenth of the minimum radius of
    /// the origin, where the horizon heuristic stops being meaningful.
    #[must_use]
    pub fn compute_horizon_culling_point_from_rectangle(
        &self,
        rectangle: &Rectangle,
        ellipsoid: &Ellipsoid,
    ) -> Option<DVec3> {
        let positions = rectangle.subsample(ellipsoid, 0.0);
        let bounding_sphere = BoundingSphere::from_points(&positions);

        if bounding_sphere.center.length() < 0.1 * ellipsoid.minimum_radius() {
            return None;
        }
        self.compute_horizon_culling_point(bounding_sphere.center, &positions)
    }
}

/// The distance along the scaled-space direction ray at which the horizon
/// tangent from `position` is reached, via the reciprocal cosine-difference
/// identity. Points below the ellipsoid surface are treated as on it.
fn compute_magnitude(
    ellipsoid: &Ellipsoid,
    position: DVec3,
    scaled_space_direction_to_point: DVec3,
) -> f64 {
    let scaled_space_position = ellipsoid.transform_position_to_scaled_space(position);
    let mut magnitude_squared = scaled_space_position.length_squared();
    let mut magnitude = magnitude_squared.sqrt();
    let direction = scaled_space_position / magnitude;

    magnitude_squared = magnitude_squared.max(1.0);
    magnitude = magnitude.max(1.0);

    let cos_alpha = direction.dot(scaled_space_direction_to_point);
    let sin_alpha = direction.cross(scaled_space_direction_to_point).length();
    let cos_beta = 1.0 / magnitude;
    let sin_beta = (magnitude_squared - 1.0).sqrt() * cos_beta;

    1.0 / (cos_alpha * cos_beta - sin_alpha * sin_beta)
}

/// Scale the magnitude along the direction into a point, or `None` when the
/// magnitude is non-positive, infinite, or NaN — covering "no positions",
/// "direction points away from every position", and degenerate arithmetic.
fn magnitude_to_point(
    scaled_space_direction_to_point: DVec3,
    result_magnitude: f64,
) -> Option<DVec3> {
    if result_magnitude <= 0.0 || !result_magnitude.is_finite() {
        return None;
    }
    Some(scaled_space_direction_to_point * result_magnitude)
}

/// The unit scaled-space image of a direction. Computed once per batch call
/// so every position is measured against the same reference direction.
fn compute_scaled_space_direction_to_point(
    ellipsoid: &Ellipsoid,
    direction_to_point: DVec3,
) -> DVec3 {
    ellipsoid
        .transform_position_to_scaled_space(direction_to_point)
        .normalize()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn occluder_1_11_09() -> EllipsoidalOccluder {
        EllipsoidalOccluder::from_camera_position(
            Ellipsoid::new(1.0, 1.1, 0.9),
            DVec3::new(0.0, 0.0, 2.5),
        )
    }

    /// The reference fixture: radii (1.0, 1.1, 0.9), camera (0, 0, 2.5),
    /// point (0, -3, -3) is visible.
    #[test]
    fn test_point_beside_limb_is_visible() {
        let occluder = occluder_1_11_09();
        assert!(occluder.is_point_visible(DVec3::new(0.0, -3.0, -3.0)));
    }

    /// A point on the far side of the body, directly behind it, is occluded.
    #[test]
    fn test_antipodal_point_is_occluded() {
        let occluder = occluder_1_11_09();
        assert!(!occluder.is_point_visible(DVec3::new(0.0, 0.0, -2.5)));
    }

    /// The world-space and scaled-space tests agree for any point.
    #[test]
    fn test_world_and_scaled_space_tests_agree() {
        let occluder = occluder_1_11_09();
        for p in [
            DVec3::new(0.0, -3.0, -3.0),
            DVec3::new(0.0, 0.0, -2.5),
            DVec3::new(2.0, 0.5, 0.1),
            DVec3::new(-0.1, -0.2, -4.0),
        ] {
            let scaled = occluder.ellipsoid().transform_position_to_scaled_space(p);
            assert_eq!(
                occluder.is_point_visible(p),
                occluder.is_scaled_space_point_visible(scaled),
                "disagreement for {p:?}"
            );
        }
    }

    /// Moving the camera refreshes the visibility verdicts.
    #[test]
    fn test_set_camera_position_updates_results() {
        let mut occluder = occluder_1_11_09();
        let far_side = DVec3::new(0.0, 0.0, -2.5);
        assert!(!occluder.is_point_visible(far_side));

        occluder.set_camera_position(DVec3::new(0.0, 0.0, -2.5));
        assert!(occluder.is_point_visible(far_side));
        assert_eq!(occluder.camera_position(), DVec3::new(0.0, 0.0, -2.5));
    }

    /// No positions means no culling point, for any direction.
    #[test]
    fn test_culling_point_of_empty_set_is_none() {
        let occluder = occluder_1_11_09();
        for direction in [DVec3::X, DVec3::NEG_Z, DVec3::new(1.0, 2.0, 3.0)] {
            assert_eq!(occluder.compute_horizon_culling_point(direction, &[]), None);
        }
    }

    /// The culling point depends only on the set of positions, not their order.
    #[test]
    fn test_culling_point_ignores_position_order() {
        let occluder = occluder_1_11_09();
        let direction = DVec3::new(1.0, 0.0, 0.0);
        let positions = [
            DVec3::new(0.9, 0.1, 0.0),
            DVec3::new(1.0, -0.2, 0.1),
            DVec3::new(0.95, 0.0, -0.1),
        ];
        let reversed: Vec<_> = positions.iter().rev().copied().collect();

        let forward = occluder.compute_horizon_culling_point(direction, &positions);
        let backward = occluder.compute_horizon_culling_point(direction, &reversed);
        assert_eq!(forward, backward);
    }

    /// A surface point in the direction of the ray yields that point's
    /// scaled-space image (magnitude 1 along the direction).
    #[test]
    fn test_culling_point_for_single_on_axis_surface_point() {
        let occluder = EllipsoidalOccluder::from_camera_position(
            Ellipsoid::new(12_345.0, 12_345.0, 12_345.0),
            DVec3::new(0.0, 0.0, 50_000.0),
        );
        let direction = DVec3::new(1.0, 0.0, 0.0);
        let point = occluder
            .compute_horizon_culling_point(direction, &[DVec3::new(12_345.0, 0.0, 0.0)])
            .unwrap_or_else(|| panic!("on-axis surface point must yield a culling point"));
        assert!((point - DVec3::X).length() < 1e-12);
    }

    /// A direction pointing away from every position cannot cover them.
    #[test]
    fn test_culling_point_is_none_when_direction_opposes_positions() {
        let occluder = occluder_1_11_09();
        let result = occluder
            .compute_horizon_culling_point(DVec3::new(1.0, 0.0, 0.0), &[DVec3::new(-1.0, 0.0, 0.0)]);
        assert_eq!(result, None);
    }

    /// The packed-vertex path agrees with the slice path.
    #[test]
    fn test_vertices_path_matches_positions_path() {
        let occluder = occluder_1_11_09();
        let direction = DVec3::new(0.3, -0.2, 0.9);
        let positions = [
            DVec3::new(0.1, 0.0, 0.9),
            DVec3::new(-0.05, 0.1, 0.92),
            DVec3::new(0.0, -0.1, 0.88),
        ];
        let mut vertices = Vec::new();
        for p in &positions {
            vertices.extend_from_slice(&[p.x, p.y, p.z, 42.0, 42.0]);
        }

        let from_positions = occluder.compute_horizon_culling_point(direction, &positions);
        let from_vertices = occluder.compute_horizon_culling_point_from_vertices(
            direction,
            &vertices,
            5,
            DVec3::ZERO,
        );
        assert_eq!(from_positions, from_vertices);
    }

    /// A per-vertex center offset shifts every reconstructed position.
    #[test]
    fn test_vertices_path_applies_center_offset() {
        let occluder = occluder_1_11_09();
        let direction = DVec3::new(0.0, 0.0, 1.0);
        let center = DVec3::new(0.1, -0.2, 0.85);
        let offsets = [
            DVec3::new(0.01, 0.02, 0.0),
            DVec3::new(-0.02, 0.01, 0.05),
        ];
        let positions: Vec<_> = offsets.iter().map(|o| *o + center).collect();
        let vertices: Vec<f64> = offsets.iter().flat_map(|o| [o.x, o.y, o.z]).collect();

        assert_eq!(
            occluder.compute_horizon_culling_point(direction, &positions),
            occluder.compute_horizon_culling_point_from_vertices(direction, &vertices, 3, center),
        );
    }

    #[test]
    #[should_panic(expected = "stride must be at least 3")]
    fn test_stride_below_three_panics() {
        let occluder = occluder_1_11_09();
        occluder.compute_horizon_culling_point_from_vertices(DVec3::X, &[1.0, 2.0], 2, DVec3::ZERO);
    }

    /// The scaled-space direction helper always returns a unit vector.
    #[test]
    fn test_scaled_space_direction_is_normalized() {
        let ellipsoid = Ellipsoid::new(1.0, 1.1, 0.9);
        for direction in [
            DVec3::new(17.0, 0.0, 0.0),
            DVec3::new(0.0, -0.001, 0.0),
            DVec3::new(1.0, 2.0, 3.0),
        ] {
            let scaled = compute_scaled_space_direction_to_point(&ellipsoid, direction);
            assert!((scaled.length() - 1.0).abs() < 1e-12);
        }
    }

    /// Positions below the surface are clamped onto it.
    #[test]
    fn test_positions_below_surface_are_clamped() {
        let occluder = occluder_1_11_09();
        let direction = DVec3::new(1.0, 0.0, 0.0);
        let on_surface =
            occluder.compute_horizon_culling_point(direction, &[DVec3::new(1.0, 0.0, 0.0)]);
        let below_surface =
            occluder.compute_horizon_culling_point(direction, &[DVec3::new(0.5, 0.0, 0.0)]);
        assert_eq!(on_surface, below_surface);
    }

    /// A rectangle on the near side of the globe produces a culling point
    /// that is itself visible; the same rectangle is hidden from the far side.
    #[test]
    fn test_rectangle_culling_point_round_trip() {
        let ellipsoid = Ellipsoid::wgs84();
        let camera = DVec3::new(ellipsoid.maximum_radius() * 3.0, 0.0, 0.0);
        let occluder = EllipsoidalOccluder::from_camera_position(ellipsoid.clone(), camera);

        let near_rectangle = Rectangle::new(-0.1, -0.1, 0.1, 0.1);
        let point = occluder
            .compute_horizon_culling_point_from_rectangle(&near_rectangle, &ellipsoid)
            .unwrap_or_else(|| panic!("near-side rectangle must yield a culling point"));
        assert!(occluder.is_scaled_space_point_visible(point));

        let mut far_occluder = occluder;
        far_occluder.set_camera_position(-camera);
        assert!(!far_occluder.is_scaled_space_point_visible(point));
    }

    /// A rectangle spanning the whole globe centers its bounding sphere near
    /// the origin, where the heuristic gives up.
    #[test]
    fn test_whole_globe_rectangle_yields_no_culling_point() {
        let ellipsoid = Ellipsoid::wgs84();
        let occluder = EllipsoidalOccluder::from_camera_position(
            ellipsoid.clone(),
            DVec3::new(ellipsoid.maximum_radius() * 3.0, 0.0, 0.0),
        );
        assert_eq!(
            occluder.compute_horizon_culling_point_from_rectangle(&Rectangle::MAX_VALUE, &ellipsoid),
            None
        );
    }
}
