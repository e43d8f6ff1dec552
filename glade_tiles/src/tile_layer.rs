// Copyright 2025 the Glade Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Staggered tile layer with an offscreen tile cache.

use alloc::vec::Vec;
use core::any::Any;

use glade_compose::Layer;
use glade_damage::DamageTracker;
use glade_events::{Outcome, PointerEvent};
use glade_geom::{CellRect, StaggerGrid};
use glade_imaging::{DrawOp, ImageId, Imaging, SurfaceId, Target};
use kurbo::{Point, Rect, Size, Vec2};
use peniko::Color;

#[cfg(not(feature = "std"))]
use kurbo::common::FloatFuncs as _;

use crate::TileMap;

/// Virtually-infinite staggered isometric tile layer.
///
/// The layer renders the tiles under (and slightly around) the viewport
/// into an offscreen surface and serves frames by blitting from it. The
/// cached window extends two cells past the viewport on each axis, so
/// sub-cell scrolling never exposes an uncached edge; window coordinates
/// may be negative or extend past the map, and out-of-map cells simply
/// show the backdrop.
///
/// Tile sprites may be larger than the grid cell (interlocking diamonds
/// overhang their cell); the margins shift every sprite so the overhang
/// is painted inside the offscreen surface.
#[derive(Debug)]
pub struct TileLayer {
    map: TileMap,
    tileset: ImageId,
    tile_width: f64,
    tile_height: f64,
    grid: StaggerGrid,
    margin: Vec2,
    surface: SurfaceId,
    backdrop: Color,
    /// Cell window currently cached offscreen.
    off_window: CellRect,
    /// Whether the offscreen surface must be re-rendered before blitting.
    off_dirty: bool,
    pending: Vec<Rect>,
    clicks: Vec<(i64, i64)>,
    size: Size,
    origin: Point,
}

impl TileLayer {
    /// Creates a tile layer.
    ///
    /// `tile_size` is the size of one tile sprite in the tileset;
    /// `cell_size` is the grid cell size and defaults to the tile size.
    /// `margin` shifts tile sprites up/left within their cell to account
    /// for sprite overhang. The layer draws its cache into `surface` and
    /// fills uncovered areas with `backdrop`.
    #[must_use]
    pub fn new(
        map: TileMap,
        tileset: ImageId,
        tile_size: Size,
        cell_size: Option<Size>,
        margin: Vec2,
        surface: SurfaceId,
        backdrop: Color,
    ) -> Self {
        let cell = cell_size.unwrap_or(tile_size);
        let mut layer = Self {
            map,
            tileset,
            tile_width: tile_size.width,
            tile_height: tile_size.height,
            grid: StaggerGrid::new(cell.width, cell.height),
            margin,
            surface,
            backdrop,
            off_window: CellRect::EMPTY,
            off_dirty: true,
            pending: Vec::new(),
            clicks: Vec::new(),
            size: Size::new(100.0, 100.0),
            origin: Point::ZERO,
        };
        layer.off_window = layer.visible_window();
        layer
    }

    /// Returns the tile id at `(x, y)`, or `None` outside the map.
    #[must_use]
    pub fn tile_at(&self, x: i64, y: i64) -> Option<u32> {
        self.map.get(x, y)
    }

    /// Sets the tile at `(x, y)`. Returns `false` outside the map.
    ///
    /// When the cell lies inside the cached window, the tile's screen
    /// rectangle is damaged and the cache invalidated; edits outside the
    /// window cost nothing until scrolling brings them into view.
    pub fn set_tile(&mut self, x: i64, y: i64, id: u32) -> bool {
        if !self.map.set(x, y, id) {
            return false;
        }
        if self.off_window.contains_cell(x, y) {
            let at = self.grid.tile_origin(x, y);
            let dx = at.x - self.margin.x - self.origin.x;
            let dy = at.y - self.margin.y - self.origin.y;
            self.pending
                .push(Rect::new(dx, dy, dx + self.tile_width, dy + self.tile_height));
            self.off_dirty = true;
        }
        true
    }

    /// Returns the backing tile map.
    #[must_use]
    pub fn map(&self) -> &TileMap {
        &self.map
    }

    /// Drains the queue of tile coordinates clicked since the last call.
    pub fn take_clicks(&mut self) -> Vec<(i64, i64)> {
        core::mem::take(&mut self.clicks)
    }

    /// Snapshot of the cache state for debugging and inspection.
    #[must_use]
    pub fn debug_info(&self) -> TileLayerDebugInfo {
        TileLayerDebugInfo {
            off_window: self.off_window,
            off_dirty: self.off_dirty,
        }
    }

    /// The cell window worth caching for the current viewport.
    ///
    /// One extra cell before the viewport on each axis and one after (the
    /// `+ 2`), so that scrolling by less than a cell in any direction stays
    /// within the cache.
    #[expect(
        clippy::cast_possible_truncation,
        reason = "viewports measured in cells are tiny; the float floor/ceil is exact"
    )]
    fn visible_window(&self) -> CellRect {
        let w = self.grid.cell_width;
        let half_h = self.grid.cell_height / 2.0;
        let x = ((self.origin.x - w / 2.0) / w).floor() as i64;
        let y = (self.origin.y / half_h).floor() as i64 - 1;
        let width = (self.size.width / w).ceil() as i64 + 2;
        let height = (self.size.height / half_h).ceil() as i64 + 2;
        CellRect::new(x, y, width, height)
    }

    fn surface_size(&self) -> Size {
        Size::new(
            self.off_window.width as f64 * self.grid.cell_width,
            self.off_window.height as f64 * self.grid.cell_height,
        )
    }

    /// World position of the offscreen surface's top-left corner.
    fn offscreen_world_origin(&self) -> Point {
        Point::new(
            self.off_window.x as f64 * self.grid.cell_width,
            self.off_window.y as f64 * self.grid.cell_height / 2.0,
        )
    }

    #[expect(
        clippy::cast_possible_truncation,
        reason = "tilesets hold far fewer than 2^63 sprites per row"
    )]
    fn redraw_offscreen(&mut self, backend: &mut dyn Imaging) {
        let win = self.off_window;
        let surface_rect = self.surface_size().to_rect();
        backend.ensure_surface(self.surface, surface_rect.size());
        backend.draw(
            Target::Surface(self.surface),
            DrawOp::FillRect {
                rect: surface_rect,
                color: self.backdrop,
            },
        );

        let per_row = (backend.image_size(self.tileset).width / self.tile_width)
            .floor()
            .max(1.0) as i64;
        let start_x = win.x.max(0);
        let end_x = (win.x + win.width - 1).min(self.map.cols() - 1);
        let start_y = win.y.max(0);
        let end_y = (win.y + win.height - 1).min(self.map.rows() - 1);
        let half_h = self.grid.cell_height / 2.0;

        for cy in start_y..=end_y {
            for cx in start_x..=end_x {
                let Some(id) = self.map.get(cx, cy) else {
                    continue;
                };
                let id = i64::from(id);
                let sx = (id % per_row) as f64 * self.tile_width;
                let sy = (id / per_row) as f64 * self.tile_height;
                let parity = cy.rem_euclid(2) as f64;
                let dx = (cx - win.x) as f64 * self.grid.cell_width
                    + parity * self.grid.cell_width / 2.0
                    - self.margin.x;
                let dy = (cy - win.y) as f64 * half_h - self.margin.y;
                backend.draw(
                    Target::Surface(self.surface),
                    DrawOp::ImageRegion {
                        image: self.tileset,
                        src: Rect::new(sx, sy, sx + self.tile_width, sy + self.tile_height),
                        dst: Rect::new(dx, dy, dx + self.tile_width, dy + self.tile_height),
                    },
                );
            }
        }
        self.off_dirty = false;
    }
}

impl Layer for TileLayer {
    fn set_size(&mut self, size: Size) {
        self.size = size;
        // Resizing reshapes the surface, so the cache is unconditionally
        // invalid even when the window coordinates happen to match.
        self.off_window = self.visible_window();
        self.off_dirty = true;
    }

    fn set_origin(&mut self, origin: Point) {
        self.origin = origin;
        let window = self.visible_window();
        if window != self.off_window {
            self.off_window = window;
            self.off_dirty = true;
        }
    }

    fn commit(&mut self, damage: &mut DamageTracker) {
        for rect in self.pending.drain(..) {
            damage.mark(rect);
        }
    }

    fn draw(&mut self, backend: &mut dyn Imaging, dirty: Option<Rect>) {
        if self.off_dirty {
            self.redraw_offscreen(backend);
        }
        let off_world = self.offscreen_world_origin();
        match dirty {
            Some(dirty) => {
                // Blit only the damaged sub-region, translated from screen
                // space into offscreen-surface space.
                let sx = self.origin.x - off_world.x + dirty.x0;
                let sy = self.origin.y - off_world.y + dirty.y0;
                backend.draw(
                    Target::Screen,
                    DrawOp::SurfaceRegion {
                        surface: self.surface,
                        src: Rect::new(sx, sy, sx + dirty.width(), sy + dirty.height()),
                        dst: dirty,
                    },
                );
            }
            None => {
                let size = self.surface_size();
                let at = Point::new(off_world.x - self.origin.x, off_world.y - self.origin.y);
                backend.draw(
                    Target::Screen,
                    DrawOp::SurfaceRegion {
                        surface: self.surface,
                        src: size.to_rect(),
                        dst: Rect::from_origin_size(at, size),
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
        let (tx, ty) = self.grid.world_to_tile(world);
        if self.map.contains(tx, ty) {
            self.clicks.push((tx, ty));
            return Outcome::Stop;
        }
        Outcome::Continue
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

/// Debug snapshot of a [`TileLayer`]'s cache state.
#[derive(Clone, Copy, Debug)]
pub struct TileLayerDebugInfo {
    /// Cell window currently cached offscreen.
    pub off_window: CellRect,
    /// Whether the offscreen surface must be re-rendered.
    pub off_dirty: bool,
}

#[cfg(test)]
mod tests {
    use super::*;
    use glade_imaging::{RecordedOp, Recorder};

    const CELL: Size = Size::new(124.0, 62.0);

    /// Tileset of 2×2 tile sprites, map preloaded with distinct ids.
    fn small_layer(backend: &mut Recorder) -> TileLayer {
        let tileset = backend.register_image(Size::new(248.0, 124.0));
        let mut map = TileMap::new(2, 2);
        map.set(0, 0, 0);
        map.set(1, 0, 1);
        map.set(0, 1, 2);
        map.set(1, 1, 3);
        let mut layer = TileLayer::new(
            map,
            tileset,
            CELL,
            None,
            Vec2::ZERO,
            SurfaceId(0),
            Color::BLACK,
        );
        layer.set_size(CELL);
        layer
    }

    #[test]
    fn window_covers_the_viewport_with_margin_cells() {
        let mut backend = Recorder::new();
        let tileset = backend.register_image(Size::new(248.0, 124.0));
        let mut layer = TileLayer::new(
            TileMap::new(30, 30),
            tileset,
            CELL,
            None,
            Vec2::ZERO,
            SurfaceId(0),
            Color::BLACK,
        );
        layer.set_size(Size::new(800.0, 600.0));

        assert_eq!(layer.debug_info().off_window, CellRect::new(-1, -1, 9, 22));
    }

    #[test]
    fn offscreen_renders_backdrop_then_in_map_tiles() {
        let mut backend = Recorder::new();
        let mut layer = small_layer(&mut backend);

        layer.draw(&mut backend, None);

        // Window (-1,-1,3,4): backdrop fill plus the four in-map tiles.
        let ops = backend.surface_ops(SurfaceId(0));
        assert_eq!(ops.len(), 5);
        assert!(matches!(ops[0], RecordedOp::Draw(DrawOp::FillRect { .. })));
        assert_eq!(backend.surface_size(SurfaceId(0)), Some(Size::new(372.0, 248.0)));

        // Tile (1,1) carries id 3 → tileset row 1, column 1; odd row is
        // shifted right by half a cell inside the window.
        assert_eq!(
            ops[4],
            RecordedOp::Draw(DrawOp::ImageRegion {
                image: ImageId(0),
                src: Rect::new(124.0, 62.0, 248.0, 124.0),
                dst: Rect::new(310.0, 62.0, 434.0, 124.0),
            })
        );
        assert!(!layer.debug_info().off_dirty);
    }

    #[test]
    fn full_draw_blits_the_whole_cached_window() {
        let mut backend = Recorder::new();
        let mut layer = small_layer(&mut backend);

        layer.draw(&mut backend, None);

        assert_eq!(
            backend.screen_ops(),
            [RecordedOp::Draw(DrawOp::SurfaceRegion {
                surface: SurfaceId(0),
                src: Rect::new(0.0, 0.0, 372.0, 248.0),
                dst: Rect::new(-124.0, -31.0, 248.0, 217.0),
            })]
        );
    }

    #[test]
    fn dirty_draw_blits_only_the_damaged_sub_region() {
        let mut backend = Recorder::new();
        let mut layer = small_layer(&mut backend);
        layer.draw(&mut backend, None);
        backend.clear_ops();

        layer.draw(&mut backend, Some(Rect::new(10.0, 20.0, 60.0, 70.0)));

        // Cache still valid: no surface rendering, one translated blit.
        assert!(backend.surface_ops(SurfaceId(0)).is_empty());
        assert_eq!(
            backend.screen_ops(),
            [RecordedOp::Draw(DrawOp::SurfaceRegion {
                surface: SurfaceId(0),
                src: Rect::new(134.0, 51.0, 184.0, 101.0),
                dst: Rect::new(10.0, 20.0, 60.0, 70.0),
            })]
        );
    }

    #[test]
    fn sub_cell_scrolling_keeps_the_cache() {
        let mut backend = Recorder::new();
        let mut layer = small_layer(&mut backend);
        layer.draw(&mut backend, None);
        backend.clear_ops();

        layer.set_origin(Point::new(10.0, 5.0));
        assert!(!layer.debug_info().off_dirty);

        layer.draw(&mut backend, Some(Rect::new(0.0, 0.0, 50.0, 50.0)));
        assert!(backend.surface_ops(SurfaceId(0)).is_empty());
        // Blit source shifted by the scroll offset.
        assert_eq!(
            backend.screen_ops(),
            [RecordedOp::Draw(DrawOp::SurfaceRegion {
                surface: SurfaceId(0),
                src: Rect::new(134.0, 36.0, 184.0, 86.0),
                dst: Rect::new(0.0, 0.0, 50.0, 50.0),
            })]
        );
    }

    #[test]
    fn window_shift_invalidates_the_cache() {
        let mut backend = Recorder::new();
        let mut layer = small_layer(&mut backend);
        layer.draw(&mut backend, None);

        layer.set_origin(Point::new(400.0, 0.0));
        assert!(layer.debug_info().off_dirty);
        assert_eq!(layer.debug_info().off_window.x, 2);
    }

    #[test]
    fn editing_a_cached_tile_damages_and_invalidates() {
        let mut backend = Recorder::new();
        let mut layer = small_layer(&mut backend);
        layer.draw(&mut backend, None);
        assert!(!layer.debug_info().off_dirty);

        assert!(layer.set_tile(1, 1, 0));
        assert!(layer.debug_info().off_dirty);
        assert_eq!(layer.tile_at(1, 1), Some(0));

        let mut damage = DamageTracker::new(1.0);
        damage.set_viewport(Size::new(800.0, 600.0));
        damage.clear();
        layer.commit(&mut damage);
        // Odd-row tile: origin (1·124 + 62, 1·31), one tile sprite large.
        assert_eq!(damage.dirty_rect(), Some(Rect::new(186.0, 31.0, 310.0, 93.0)));
    }

    #[test]
    fn editing_outside_the_cached_window_is_free() {
        let mut backend = Recorder::new();
        let tileset = backend.register_image(Size::new(248.0, 124.0));
        let mut layer = TileLayer::new(
            TileMap::new(30, 30),
            tileset,
            CELL,
            None,
            Vec2::ZERO,
            SurfaceId(0),
            Color::BLACK,
        );
        layer.set_size(CELL);
        layer.draw(&mut backend, None);

        assert!(layer.set_tile(20, 20, 7));
        assert!(!layer.debug_info().off_dirty);

        let mut damage = DamageTracker::new(1.0);
        damage.set_viewport(Size::new(800.0, 600.0));
        damage.clear();
        layer.commit(&mut damage);
        assert!(damage.is_all_clean());
    }

    #[test]
    fn editing_outside_the_map_fails_softly() {
        let mut backend = Recorder::new();
        let mut layer = small_layer(&mut backend);
        assert!(!layer.set_tile(5, 5, 1));
        assert_eq!(layer.tile_at(5, 5), None);
    }

    #[test]
    fn in_map_clicks_are_queued_and_consume_the_event() {
        let mut backend = Recorder::new();
        let mut layer = small_layer(&mut backend);

        let event = PointerEvent {
            pos: Point::new(62.0, 31.0), // tile (0, 0) center
            delta: Vec2::ZERO,
            moved: false,
        };
        assert_eq!(layer.on_pointer_up(&event), Outcome::Stop);
        assert_eq!(layer.take_clicks(), [(0, 0)]);
        assert!(layer.take_clicks().is_empty());
    }

    #[test]
    fn out_of_map_clicks_continue() {
        let mut backend = Recorder::new();
        let mut layer = small_layer(&mut backend);

        let event = PointerEvent {
            pos: Point::new(-300.0, 31.0),
            delta: Vec2::ZERO,
            moved: false,
        };
        assert_eq!(layer.on_pointer_up(&event), Outcome::Continue);
        assert!(layer.take_clicks().is_empty());
    }

    #[test]
    fn hit_test_accounts_for_the_scroll_origin() {
        let mut backend = Recorder::new();
        let mut layer = small_layer(&mut backend);
        layer.set_origin(Point::new(62.0, 31.0));

        // Screen (0, 0) is world (62, 31): tile (0, 0).
        let event = PointerEvent {
            pos: Point::ZERO,
            delta: Vec2::ZERO,
            moved: false,
        };
        assert_eq!(layer.on_pointer_up(&event), Outcome::Stop);
        assert_eq!(layer.take_clicks(), [(0, 0)]);
    }

    #[test]
    fn drag_end_release_is_not_a_tile_click() {
        let mut backend = Recorder::new();
        let mut layer = small_layer(&mut backend);

        let event = PointerEvent {
            pos: Point::new(62.0, 31.0),
            delta: Vec2::new(4.0, 0.0),
            moved: true,
        };
        assert_eq!(layer.on_pointer_up(&event), Outcome::Continue);
        assert!(layer.take_clicks().is_empty());
    }

    #[test]
    fn margins_shift_tile_placement_within_the_cache() {
        let mut backend = Recorder::new();
        let tileset = backend.register_image(Size::new(248.0, 124.0));
        let mut map = TileMap::new(1, 1);
        map.set(0, 0, 0);
        let mut layer = TileLayer::new(
            map,
            tileset,
            Size::new(130.0, 70.0),
            Some(CELL),
            Vec2::new(3.0, 8.0),
            SurfaceId(0),
            Color::BLACK,
        );
        layer.set_size(CELL);

        layer.draw(&mut backend, None);

        let ops = backend.surface_ops(SurfaceId(0));
        // Cell (0,0) sits one window cell in from the cached corner.
        assert_eq!(
            ops[1],
            RecordedOp::Draw(DrawOp::ImageRegion {
                image: tileset,
                src: Rect::new(0.0, 0.0, 130.0, 70.0),
                dst: Rect::new(121.0, 23.0, 251.0, 93.0),
            })
        );
    }
}
