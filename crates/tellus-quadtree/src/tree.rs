//! The arena that owns every tile in a quadtree.
//!
//! Tiles are stored in generational slots and addressed by [`TileId`], so a
//! parent back-reference is a plain non-owning handle and handles into a
//! reclaimed subtree become detectably stale instead of dangling. All
//! mutation goes through `&mut QuadtreeTileTree`: one logical owner drives
//! materialization, loading-state writes, and reclamation.

use tracing::{debug, trace};

use tellus_tiling::TilingScheme;

use crate::tile::{QuadtreeTile, TileLoadState};

/// Handle to a tile slot in a [`QuadtreeTileTree`].
///
/// Becomes stale once the tile is reclaimed; stale handles are rejected by
/// [`QuadtreeTileTree::get`] and panic in the asserting accessors.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct TileId {
    index: u32,
    generation: u32,
}

struct Slot {
    generation: u32,
    tile: Option<QuadtreeTile>,
}

/// A quadtree of tiles over a tiling scheme, rooted at the scheme's
/// level-zero grid.
///
/// Children are materialized lazily on first access and cached; an entire
/// subtree is torn back down by [`free_resources`](Self::free_resources).
pub struct QuadtreeTileTree<S: TilingScheme> {
    scheme: S,
    slots: Vec<Slot>,
    free: Vec<u32>,
    roots: Vec<TileId>,
}

impl<S: TilingScheme> QuadtreeTileTree<S> {
    /// Create an empty tree over `scheme`. No tiles exist until
    /// [`create_level_zero_tiles`](Self::create_level_zero_tiles) runs.
    #[must_use]
    pub fn new(scheme: S) -> Self {
        Self {
            scheme,
            slots: Vec::new(),
            free: Vec::new(),
            roots: Vec::new(),
        }
    }

    /// The tiling scheme this tree is built over.
    #[must_use]
    pub fn scheme(&self) -> &S {
        &self.scheme
    }

    /// Create the tiles of level zero, the coarsest level, in row-major
    /// order: north-to-south, then west-to-east within each row. The handles
    /// are memoized as [`roots`](Self::roots).
    ///
    /// # Panics
    ///
    /// Panics if the level-zero tiles have already been created.
    pub fn create_level_zero_tiles(&mut self) -> Vec<TileId> {
        assert!(
            self.roots.is_empty(),
            "level-zero tiles have already been created"
        );
        let x_tiles = self.scheme.number_of_x_tiles_at_level(0);
        let y_tiles = self.scheme.number_of_y_tiles_at_level(0);
        debug!(x_tiles, y_tiles, "creating level-zero tiles");

        let mut roots = Vec::with_capacity((x_tiles as usize) * (y_tiles as usize));
        for y in 0..y_tiles {
            for x in 0..x_tiles {
                let rectangle = self.scheme.tile_x_y_to_rectangle(x, y, 0);
                roots.push(self.insert(QuadtreeTile::new(0, x, y, rectangle, None)));
            }
        }
        self.roots = roots.clone();
        roots
    }

    /// Handles of the level-zero tiles, in creation order.
    #[must_use]
    pub fn roots(&self) -> &[TileId] {
        &self.roots
    }

    /// The tile behind `id`, or `None` if the handle is stale or unknown.
    #[must_use]
    pub fn get(&self, id: TileId) -> Option<&QuadtreeTile> {
        self.slots
            .get(id.index as usize)
            .filter(|slot| slot.generation == id.generation)
            .and_then(|slot| slot.tile.as_ref())
    }

    /// Mutable access to the tile behind `id`, or `None` for stale handles.
    pub fn get_mut(&mut self, id: TileId) -> Option<&mut QuadtreeTile> {
        self.slots
            .get_mut(id.index as usize)
            .filter(|slot| slot.generation == id.generation)
            .and_then(|slot| slot.tile.as_mut())
    }

    /// The tile behind `id`.
    ///
    /// # Panics
    ///
    /// Panics if `id` is stale or unknown.
    #[must_use]
    pub fn tile(&self, id: TileId) -> &QuadtreeTile {
        match self.get(id) {
            Some(tile) => tile,
            None => panic!("stale or unknown tile id {id:?}"),
        }
    }

    /// Mutable access to the tile behind `id`.
    ///
    /// # Panics
    ///
    /// Panics if `id` is stale or unknown.
    pub fn tile_mut(&mut self, id: TileId) -> &mut QuadtreeTile {
        match self.get_mut(id) {
            Some(tile) => tile,
            None => panic!("stale or unknown tile id {id:?}"),
        }
    }

    /// Number of live tiles in the tree.
    #[must_use]
    pub fn len(&self) -> usize {
        self.slots.len() - self.free.len()
    }

    /// Whether the tree holds no tiles at all.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// The four children of `id`, materializing them on first access and
    /// returning the identical cached handles afterwards.
    ///
    /// Children sit at `level + 1` in the order `(2x, 2y)`, `(2x+1, 2y)`,
    /// `(2x, 2y+1)`, `(2x+1, 2y+1)`: northwest, northeast, southwest,
    /// southeast.
    ///
    /// # Panics
    ///
    /// Panics if `id` is stale, or if the child level or coordinates would
    /// overflow `u32`.
    pub fn children(&mut self, id: TileId) -> [TileId; 4] {
        let tile = self.tile(id);
        if let Some(children) = tile.children {
            return children;
        }
        let (level, x, y) = (tile.level(), tile.x(), tile.y());
        assert!(level < u32::MAX, "child level overflows u32");
        assert!(
            x < u32::MAX / 2 && y < u32::MAX / 2,
            "child coordinates overflow u32"
        );

        let child_level = level + 1;
        let (west_x, north_y) = (x * 2, y * 2);
        let children = [
            (west_x, north_y),
            (west_x + 1, north_y),
            (west_x, north_y + 1),
            (west_x + 1, north_y + 1),
        ]
        .map(|(child_x, child_y)| {
            let rectangle = self.scheme.tile_x_y_to_rectangle(child_x, child_y, child_level);
            self.insert(QuadtreeTile::new(
                child_level,
                child_x,
                child_y,
                rectangle,
                Some(id),
            ))
        });
        self.tile_mut(id).children = Some(children);
        children
    }

    /// The cached children of `id`, if they have been materialized.
    #[must_use]
    pub fn children_if_materialized(&self, id: TileId) -> Option<[TileId; 4]> {
        self.tile(id).children
    }

    /// Return the tile to its just-constructed state: load state back to
    /// [`TileLoadState::Start`], renderability and upsampling flags cleared,
    /// the payload's reclamation hook run and the payload dropped, and any
    /// materialized descendants reclaimed and removed from the arena so a
    /// later [`children`](Self::children) access rebuilds a fresh subtree.
    ///
    /// Idempotent: reclaiming an already-reset tile is a no-op.
    ///
    /// # Panics
    ///
    /// Panics if `id` is stale or unknown.
    pub fn free_resources(&mut self, id: TileId) {
        let tile = self.tile_mut(id);
        tile.state = TileLoadState::Start;
        tile.renderable = false;
        tile.upsampled_from_parent = false;
        let data = tile.data.take();
        let children = tile.children.take();
        let (level, x, y) = (tile.level(), tile.x(), tile.y());

        if let Some(mut data) = data {
            data.free_resources();
        }
        if let Some(children) = children {
            for child in children {
                self.release_subtree(child);
            }
            trace!(level, x, y, "discarded tile subtree");
        }
    }

    /// Reclaim a subtree and release its slots back to the arena.
    fn release_subtree(&mut self, id: TileId) {
        let Some(tile) = self.get_mut(id) else {
            return;
        };
        let data = tile.data.take();
        let children = tile.children.take();
        if let Some(mut data) = data {
            data.free_resources();
        }
        if let Some(children) = children {
            for child in children {
                self.release_subtree(child);
            }
        }
        self.remove(id);
    }

    fn insert(&mut self, tile: QuadtreeTile) -> TileId {
        if let Some(index) = self.free.pop() {
            let slot = &mut self.slots[index as usize];
            slot.tile = Some(tile);
            return TileId {
                index,
                generation: slot.generation,
            };
        }
        assert!(
            self.slots.len() < u32::MAX as usize,
            "tile arena exceeds u32 slots"
        );
        let index = self.slots.len() as u32;
        self.slots.push(Slot {
            generation: 0,
            tile: Some(tile),
        });
        TileId {
            index,
            generation: 0,
        }
    }

    fn remove(&mut self, id: TileId) {
        let slot = &mut self.slots[id.index as usize];
        if slot.generation == id.generation && slot.tile.is_some() {
            slot.tile = None;
            slot.generation += 1;
            self.free.push(id.index);
        }
    }
}
