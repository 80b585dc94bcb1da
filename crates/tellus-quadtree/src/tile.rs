//! A single tile in the quadtree: identity, load state, and payload.

use tellus_geo::Rectangle;

use crate::tree::TileId;

/// Position of a tile in the load pipeline. The tree only reads this (via
/// [`QuadtreeTile::needs_loading`]) and resets it on reclamation; the
/// external loader drives it forward.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum TileLoadState {
    /// Nothing has happened yet.
    #[default]
    Start,
    /// A load is in flight.
    Loading,
    /// The payload has arrived but post-processing remains.
    Loaded,
    /// The tile is fully processed.
    Done,
}

/// Payload attached to a tile. The tree treats it as opaque apart from the
/// reclamation hook and the unload-eligibility flag.
pub trait TileData {
    /// Release whatever the payload holds. Called by
    /// [`QuadtreeTileTree::free_resources`](crate::QuadtreeTileTree::free_resources)
    /// before the payload is dropped.
    fn free_resources(&mut self);

    /// Whether the tile may be unloaded right now. Payloads with an
    /// asynchronous operation in flight return `false`; the default says
    /// unloading is always fine.
    fn eligible_for_unloading(&self) -> bool {
        true
    }
}

/// A node in the tile quadtree, identified by `(level, x, y)`.
///
/// Identity, rectangle, and parent are fixed at construction. Load state,
/// renderability, distance, and payload are mutated by the external
/// selection and loading passes through the owning
/// [`QuadtreeTileTree`](crate::QuadtreeTileTree).
pub struct QuadtreeTile {
    level: u32,
    x: u32,
    y: u32,
    rectangle: Rectangle,
    parent: Option<TileId>,
    pub(crate) children: Option<[TileId; 4]>,

    /// Current position in the load pipeline.
    pub state: TileLoadState,
    /// Whether the tile can currently be rendered.
    pub renderable: bool,
    /// Distance from the camera, written by the selection pass for sorting.
    pub distance: f64,
    /// Whether the tile's geometry was upsampled from its parent rather than
    /// loaded at its own resolution.
    pub upsampled_from_parent: bool,
    /// Provider-specific payload, if any.
    pub data: Option<Box<dyn TileData>>,
}

impl QuadtreeTile {
    pub(crate) fn new(
        level: u32,
        x: u32,
        y: u32,
        rectangle: Rectangle,
        parent: Option<TileId>,
    ) -> Self {
        Self {
            level,
            x,
            y,
            rectangle,
            parent,
            children: None,
            state: TileLoadState::Start,
            renderable: false,
            distance: 0.0,
            upsampled_from_parent: false,
            data: None,
        }
    }

    /// The tile's level of detail; zero is the coarsest.
    #[must_use]
    pub fn level(&self) -> u32 {
        self.level
    }

    /// The X coordinate within the level; zero is the westernmost tile.
    #[must_use]
    pub fn x(&self) -> u32 {
        self.x
    }

    /// The Y coordinate within the level; zero is the northernmost tile.
    #[must_use]
    pub fn y(&self) -> u32 {
        self.y
    }

    /// The geographic extent of the tile, in radians.
    #[must_use]
    pub fn rectangle(&self) -> &Rectangle {
        &self.rectangle
    }

    /// The parent tile's handle, absent for level-zero tiles.
    #[must_use]
    pub fn parent(&self) -> Option<TileId> {
        self.parent
    }

    /// Whether further loading work remains: true in [`TileLoadState::Start`]
    /// and [`TileLoadState::Loading`].
    #[must_use]
    pub fn needs_loading(&self) -> bool {
        matches!(self.state, TileLoadState::Start | TileLoadState::Loading)
    }

    /// Whether the tile may be unloaded: the payload's flag when a payload
    /// is attached, otherwise true.
    #[must_use]
    pub fn eligible_for_unloading(&self) -> bool {
        self.data
            .as_ref()
            .is_none_or(|data| data.eligible_for_unloading())
    }
}
