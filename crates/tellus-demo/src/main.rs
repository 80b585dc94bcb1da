//! Demo binary that drives a toy tile-selection pass over the globe.
//!
//! Orbits a camera around the WGS84 ellipsoid and, each frame, walks the
//! quadtree top-down: tiles hidden behind the horizon are culled and their
//! subtrees reclaimed, visible near tiles are refined, the rest are
//! "loaded" and counted as rendered. Run with `cargo run -p tellus-demo`;
//! `RUST_LOG=debug` shows the tree lifecycle events.

use std::f64::consts::FRAC_PI_4;

use glam::DVec3;
use tellus_geo::Ellipsoid;
use tellus_lod::EllipsoidalOccluder;
use tellus_quadtree::{QuadtreeTileTree, TileId, TileLoadState};
use tellus_tiling::{GeographicTilingScheme, TilingScheme};
use tracing::info;

const FRAMES: u32 = 8;
const MAX_LEVEL: u32 = 3;

struct FrameStats {
    rendered: u32,
    refined: u32,
    culled: u32,
}

fn main() {
    tellus_log::init_logging(Some("info"));

    let scheme = GeographicTilingScheme::default();
    let ellipsoid = scheme.ellipsoid().clone();
    let mut tree = QuadtreeTileTree::new(scheme);
    let roots = tree.create_level_zero_tiles();

    let mut occluder = EllipsoidalOccluder::new(ellipsoid.clone());

    for frame in 0..FRAMES {
        let angle = f64::from(frame) * FRAC_PI_4;
        let camera = DVec3::new(angle.cos(), angle.sin(), 0.3).normalize()
            * (ellipsoid.maximum_radius() * 2.5);
        occluder.set_camera_position(camera);

        let stats = select_tiles(&mut tree, &occluder, &roots, camera);
        info!(
            frame,
            rendered = stats.rendered,
            refined = stats.refined,
            culled = stats.culled,
            live_tiles = tree.len(),
            "selection pass"
        );
    }
}

/// One top-down pass: cull against the horizon, refine what is close,
/// pretend-load and render the rest.
fn select_tiles(
    tree: &mut QuadtreeTileTree<GeographicTilingScheme>,
    occluder: &EllipsoidalOccluder,
    roots: &[TileId],
    camera: DVec3,
) -> FrameStats {
    let ellipsoid: &Ellipsoid = occluder.ellipsoid();
    let mut stats = FrameStats {
        rendered: 0,
        refined: 0,
        culled: 0,
    };

    let mut stack: Vec<TileId> = roots.to_vec();
    while let Some(id) = stack.pop() {
        let rectangle = *tree.tile(id).rectangle();

        // A culling point below the horizon hides the whole tile; no
        // culling point means "cannot cull, assume visible".
        let culling_point =
            occluder.compute_horizon_culling_point_from_rectangle(&rectangle, ellipsoid);
        let visible = culling_point
            .is_none_or(|point| occluder.is_scaled_space_point_visible(point));
        if !visible {
            if tree.tile(id).eligible_for_unloading() {
                tree.free_resources(id);
            }
            stats.culled += 1;
            continue;
        }

        let center = ellipsoid.cartographic_to_cartesian(&rectangle.center());
        let distance = (camera - center).length();
        let level = {
            let tile = tree.tile_mut(id);
            tile.distance = distance;
            if tile.needs_loading() {
                // Stand-in for the external async loader.
                tile.state = TileLoadState::Done;
                tile.renderable = true;
            }
            tile.level()
        };

        // Refine while the tile subtends too much of the view.
        let error_threshold = ellipsoid.maximum_radius() * 2.0 / f64::from(1 << level);
        if level < MAX_LEVEL && distance < error_threshold {
            stack.extend(tree.children(id));
            stats.refined += 1;
        } else {
            stats.rendered += 1;
        }
    }

    stats
}
