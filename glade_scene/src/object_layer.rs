// Copyright 2025 the Glade Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Cluster-grid indexed, depth-sorted object layer.

use alloc::vec::Vec;
use core::any::Any;

use glade_compose::Layer;
use glade_damage::DamageTracker;
use glade_events::{Outcome, PointerEvent};
use glade_geom::{CellRect, grid_cells, intersection};
use glade_imaging::{DrawOp, Imaging, Target};
use hashbrown::{HashMap, HashSet};
use kurbo::{Point, Rect, Size, Vec2};
use smallvec::SmallVec;

#[cfg(not(feature = "std"))]
use kurbo::common::FloatFuncs as _;

use crate::{Sprite, SpriteArena, SpriteFlags, SpriteId};

/// World object layer backed by a uniform cluster grid.
///
/// The grid covers the world extents given at construction with square
/// cells of the cluster size; a sprite is registered in every cell its
/// bounds overlap. Membership is maintained synchronously on every
/// mutation, so the index never lags the scene.
///
/// Drawing goes through a cache of the sprites in the visible cell window,
/// kept sorted by depth (bounds bottom edge, ascending). The cache is
/// rebuilt only when the visible window changes and resorted only when a
/// sprite's depth changes, the two cheap invalidation levels the layer
/// distinguishes.
#[derive(Debug)]
pub struct ObjectLayer {
    arena: SpriteArena,
    cluster: f64,
    cols: i64,
    rows: i64,
    /// Row-major `cols × rows` cells, each listing overlapping sprite ids.
    cells: Vec<SmallVec<[SpriteId; 4]>>,
    /// Current cell window of every live sprite.
    windows: HashMap<SpriteId, CellRect>,
    visible_cells: CellRect,
    /// Visible sprites in depth order, when clean.
    cache: Vec<SpriteId>,
    cache_dirty: bool,
    cache_unsorted: bool,
    pending: Vec<Rect>,
    clicks: Vec<SpriteId>,
    size: Size,
    origin: Point,
}

impl ObjectLayer {
    /// Creates an empty layer over a world of the given extents, indexed
    /// with square cluster cells of side `cluster`.
    #[expect(
        clippy::cast_possible_truncation,
        reason = "world extents measured in cluster cells are small and non-negative"
    )]
    #[must_use]
    pub fn new(world: Size, cluster: f64) -> Self {
        let cluster = cluster.max(1.0);
        let cols = (world.width / cluster).ceil().max(0.0) as i64;
        let rows = (world.height / cluster).ceil().max(0.0) as i64;
        let mut cells = Vec::new();
        cells.resize((cols * rows) as usize, SmallVec::new());
        Self {
            arena: SpriteArena::default(),
            cluster,
            cols,
            rows,
            cells,
            windows: HashMap::new(),
            visible_cells: CellRect::EMPTY,
            cache: Vec::new(),
            cache_dirty: true,
            cache_unsorted: false,
            pending: Vec::new(),
            clicks: Vec::new(),
            size: Size::new(100.0, 100.0),
            origin: Point::ZERO,
        }
    }

    /// Inserts a sprite, returning its id.
    ///
    /// The sprite is registered in every cluster cell its bounds overlap;
    /// if that window touches the visible window it also enters the draw
    /// cache. Its screen region is damaged on the next commit.
    pub fn insert(&mut self, sprite: Sprite) -> SpriteId {
        let bounds = sprite.bounds;
        let id = self.arena.insert(sprite);
        let window = self.cell_window(bounds);
        self.register(id, window);
        self.windows.insert(id, window);
        if window.intersects(self.visible_cells) {
            self.cache.push(id);
            self.cache_unsorted = true;
        }
        let screen = self.to_screen(bounds);
        self.pending.push(screen);
        id
    }

    /// Removes a sprite. Returns `false` for stale ids.
    pub fn remove(&mut self, id: SpriteId) -> bool {
        let Some(sprite) = self.arena.remove(id) else {
            return false;
        };
        if let Some(window) = self.windows.remove(&id) {
            self.unregister(id, window);
        }
        self.cache.retain(|c| *c != id);
        let screen = self.to_screen(sprite.bounds);
        self.pending.push(screen);
        true
    }

    /// Moves a sprite's top-left corner to `pos`. Returns `false` for stale
    /// ids.
    pub fn set_position(&mut self, id: SpriteId, pos: Point) -> bool {
        let Some(sprite) = self.arena.get(id) else {
            return false;
        };
        let size = sprite.bounds.size();
        self.update_bounds(id, Rect::from_origin_size(pos, size))
    }

    /// Displaces a sprite by `delta`. Returns `false` for stale ids.
    pub fn move_by(&mut self, id: SpriteId, delta: Vec2) -> bool {
        let Some(sprite) = self.arena.get(id) else {
            return false;
        };
        let bounds = sprite.bounds + delta;
        self.update_bounds(id, bounds)
    }

    /// Resizes a sprite, keeping its top-left corner. Returns `false` for
    /// stale ids.
    pub fn resize(&mut self, id: SpriteId, size: Size) -> bool {
        let Some(sprite) = self.arena.get(id) else {
            return false;
        };
        let origin = sprite.bounds.origin();
        self.update_bounds(id, Rect::from_origin_size(origin, size))
    }

    /// Returns the sprite behind an id, if still alive.
    #[must_use]
    pub fn get(&self, id: SpriteId) -> Option<&Sprite> {
        self.arena.get(id)
    }

    /// Returns `true` if the id refers to a live sprite.
    #[must_use]
    pub fn is_alive(&self, id: SpriteId) -> bool {
        self.arena.is_alive(id)
    }

    /// Returns the number of live sprites.
    #[must_use]
    pub fn len(&self) -> usize {
        self.arena.len()
    }

    /// Returns `true` if the layer holds no sprites.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.arena.len() == 0
    }

    /// Iterates every live sprite with its id, in slot order.
    pub fn sprites(&self) -> impl Iterator<Item = (SpriteId, &Sprite)> {
        self.arena.iter()
    }

    /// Finds the sprite under a world-space point.
    ///
    /// Scans the visible cache in depth order and returns the first
    /// pickable sprite whose bounds contain the point. With overlapping
    /// sprites this favors the one drawn earliest, an approximation the
    /// layer accepts in exchange for a single forward scan.
    pub fn sprite_at(&mut self, world: Point) -> Option<SpriteId> {
        self.refresh_cache();
        self.cache.iter().copied().find(|id| {
            self.arena.get(*id).is_some_and(|sprite| {
                sprite.flags.contains(SpriteFlags::PICKABLE) && sprite.bounds.contains(world)
            })
        })
    }

    /// Drains the queue of sprites clicked since the last call.
    pub fn take_clicks(&mut self) -> Vec<SpriteId> {
        core::mem::take(&mut self.clicks)
    }

    /// Snapshot of the layer's bookkeeping for debugging and inspection.
    #[must_use]
    pub fn debug_info(&self) -> ObjectLayerDebugInfo {
        ObjectLayerDebugInfo {
            sprites: self.arena.len(),
            grid_cols: self.cols,
            grid_rows: self.rows,
            visible_cells: self.visible_cells,
            cached: self.cache.len(),
            cache_dirty: self.cache_dirty,
            cache_unsorted: self.cache_unsorted,
        }
    }

    fn cell_window(&self, bounds: Rect) -> CellRect {
        grid_cells(bounds, self.cluster, self.cluster, self.cols, self.rows)
    }

    fn to_screen(&self, bounds: Rect) -> Rect {
        bounds - self.origin.to_vec2()
    }

    #[expect(
        clippy::cast_possible_truncation,
        reason = "grid windows are clamped to non-negative in-grid cells"
    )]
    fn cell_index(&self, col: i64, row: i64) -> usize {
        (row * self.cols + col) as usize
    }

    fn register(&mut self, id: SpriteId, window: CellRect) {
        for (col, row) in window.cells() {
            let idx = self.cell_index(col, row);
            self.cells[idx].push(id);
        }
    }

    fn unregister(&mut self, id: SpriteId, window: CellRect) {
        for (col, row) in window.cells() {
            let idx = self.cell_index(col, row);
            self.cells[idx].retain(|c| *c != id);
        }
    }

    /// The single mutation path: damages old and new screen regions,
    /// migrates cell membership, and keeps the draw cache consistent.
    fn update_bounds(&mut self, id: SpriteId, new: Rect) -> bool {
        let Some(sprite) = self.arena.get_mut(id) else {
            return false;
        };
        let old = sprite.bounds;
        sprite.bounds = new;

        let old_screen = self.to_screen(old);
        let new_screen = self.to_screen(new);
        self.pending.push(old_screen);
        self.pending.push(new_screen);

        let old_window = self.windows.get(&id).copied().unwrap_or(CellRect::EMPTY);
        let new_window = self.cell_window(new);
        if new_window != old_window {
            self.unregister(id, old_window);
            self.register(id, new_window);
            self.windows.insert(id, new_window);
        }

        let was_visible = old_window.intersects(self.visible_cells);
        let now_visible = new_window.intersects(self.visible_cells);
        if now_visible && !was_visible {
            if !self.cache.contains(&id) {
                self.cache.push(id);
            }
            self.cache_unsorted = true;
        } else if was_visible && !now_visible {
            self.cache.retain(|c| *c != id);
        } else if now_visible && old.y1 != new.y1 {
            // Depth changed but membership did not: resorting is enough.
            self.cache_unsorted = true;
        }
        true
    }

    fn update_visible_window(&mut self) {
        let view = Rect::from_origin_size(self.origin, self.size);
        let visible = self.cell_window(view);
        if visible != self.visible_cells {
            self.visible_cells = visible;
            self.cache_dirty = true;
        }
    }

    fn refresh_cache(&mut self) {
        if self.cache_dirty {
            self.cache.clear();
            let mut seen: HashSet<SpriteId> = HashSet::new();
            for (col, row) in self.visible_cells.cells() {
                let idx = self.cell_index(col, row);
                for &id in &self.cells[idx] {
                    if seen.insert(id) {
                        self.cache.push(id);
                    }
                }
            }
            self.cache_dirty = false;
            self.cache_unsorted = true;
        }
        if self.cache_unsorted {
            let arena = &self.arena;
            self.cache.sort_by(|a, b| {
                let da = arena.get(*a).map_or(f64::INFINITY, |s| s.bounds.y1);
                let db = arena.get(*b).map_or(f64::INFINITY, |s| s.bounds.y1);
                da.total_cmp(&db)
            });
            self.cache_unsorted = false;
        }
    }
}

impl Layer for ObjectLayer {
    fn set_size(&mut self, size: Size) {
        self.size = size;
        self.update_visible_window();
    }

    fn set_origin(&mut self, origin: Point) {
        self.origin = origin;
        self.update_visible_window();
    }

    fn commit(&mut self, damage: &mut DamageTracker) {
        for rect in self.pending.drain(..) {
            damage.mark(rect);
        }
    }

    fn draw(&mut self, backend: &mut dyn Imaging, dirty: Option<Rect>) {
        self.refresh_cache();
        for &id in &self.cache {
            let Some(sprite) = self.arena.get(id) else {
                continue;
            };
            if !sprite.flags.contains(SpriteFlags::VISIBLE) {
                continue;
            }
            let screen = sprite.bounds - self.origin.to_vec2();
            if let Some(dirty) = dirty
                && intersection(dirty, screen).is_none()
            {
                continue;
            }
            if let Some(image) = sprite.image {
                backend.draw(
                    Target::Screen,
                    DrawOp::Image {
                        image,
                        at: screen.origin(),
                    },
                );
            }
        }
    }

    fn on_pointer_up(&mut self, event: &PointerEvent) -> Outcome {
        if event.moved {
            return Outcome::Continue;
        }
        let world = event.pos + self.origin.to_vec2();
        if let Some(id) = self.sprite_at(world) {
            self.clicks.push(id);
        }
        // Object clicks are observations, not captures: the event continues
        // to the layers below.
        Outcome::Continue
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

/// Debug snapshot of an [`ObjectLayer`]'s bookkeeping.
#[derive(Clone, Copy, Debug)]
pub struct ObjectLayerDebugInfo {
    /// Number of live sprites.
    pub sprites: usize,
    /// Cluster grid width in cells.
    pub grid_cols: i64,
    /// Cluster grid height in cells.
    pub grid_rows: i64,
    /// Cell window currently visible through the viewport.
    pub visible_cells: CellRect,
    /// Number of sprites in the visible cache.
    pub cached: usize,
    /// Whether the cache must be rebuilt before the next use.
    pub cache_dirty: bool,
    /// Whether the cache must be resorted before the next use.
    pub cache_unsorted: bool,
}
