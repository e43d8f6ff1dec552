// Copyright 2025 the Glade Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Staggered isometric tile grid transforms.
//!
//! A staggered grid packs diamond-shaped isometric tiles into a rectangular
//! index space: rows overlap vertically by half a cell, and every odd row is
//! shifted right by half a cell. [`StaggerGrid::tile_origin`] is the
//! placement used when rasterizing tiles; [`StaggerGrid::world_to_tile`] is
//! its exact inverse and is what hit-testing uses to turn a pointer position
//! into a tile coordinate.
//!
//! ## Example
//!
//! ```rust
//! use glade_geom::StaggerGrid;
//!
//! let grid = StaggerGrid::new(124.0, 62.0);
//! let center = grid.tile_center(0, 0);
//! assert_eq!(grid.world_to_tile(center), (0, 0));
//! ```

use kurbo::Point;
#[cfg(not(feature = "std"))]
use kurbo::common::FloatFuncs as _;

/// Coordinate transforms for a staggered isometric tile grid.
///
/// `cell_width` and `cell_height` are the dimensions of one grid cell in
/// world units. Tile sprites are usually somewhat larger than the cell so
/// that adjacent diamonds interlock; only the cell size participates in
/// coordinate math.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct StaggerGrid {
    /// Width of one grid cell in world units.
    pub cell_width: f64,
    /// Height of one grid cell in world units. Rows advance by half of this.
    pub cell_height: f64,
}

impl StaggerGrid {
    /// Creates a grid with the given cell dimensions.
    #[must_use]
    pub const fn new(cell_width: f64, cell_height: f64) -> Self {
        Self {
            cell_width,
            cell_height,
        }
    }

    /// Returns the world position of the top-left corner of a tile's cell.
    ///
    /// Odd rows are shifted right by half a cell; rows advance by half the
    /// cell height. This is the draw-time placement formula, so
    /// [`Self::world_to_tile`] must remain its exact inverse.
    #[must_use]
    pub fn tile_origin(&self, tx: i64, ty: i64) -> Point {
        let parity = ty.rem_euclid(2) as f64;
        Point::new(
            tx as f64 * self.cell_width + parity * self.cell_width / 2.0,
            ty as f64 * self.cell_height / 2.0,
        )
    }

    /// Returns the world position of the center of a tile's cell.
    #[must_use]
    pub fn tile_center(&self, tx: i64, ty: i64) -> Point {
        let origin = self.tile_origin(tx, ty);
        Point::new(
            origin.x + self.cell_width / 2.0,
            origin.y + self.cell_height / 2.0,
        )
    }

    /// Converts a world-space point into staggered tile coordinates.
    ///
    /// The point is projected onto two intermediate diagonal axes and the
    /// result recombined into the staggered `(tx, ty)` pair. The returned
    /// coordinate may lie outside any particular map; callers bound-check
    /// against their map dimensions.
    #[must_use]
    #[expect(
        clippy::cast_possible_truncation,
        reason = "tile indices are far below 2^53; the float floor is exact"
    )]
    pub fn world_to_tile(&self, pt: Point) -> (i64, i64) {
        let w = self.cell_width;
        let h = self.cell_height;
        let x1 = ((pt.x + 2.0 * pt.y - w / 2.0) / w).floor() as i64;
        let y1 = ((pt.y - pt.x / 2.0 + h / 2.0) / h).floor() as i64;
        ((x1 - y1).div_euclid(2), x1 + y1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn origin_tile_center_resolves_to_origin_tile() {
        let grid = StaggerGrid::new(124.0, 62.0);
        let center = grid.tile_center(0, 0);
        assert_eq!(center, Point::new(62.0, 31.0));
        assert_eq!(grid.world_to_tile(center), (0, 0));
    }

    #[test]
    fn odd_rows_are_shifted_by_half_a_cell() {
        let grid = StaggerGrid::new(124.0, 62.0);
        assert_eq!(grid.tile_origin(0, 0), Point::new(0.0, 0.0));
        assert_eq!(grid.tile_origin(0, 1), Point::new(62.0, 31.0));
        assert_eq!(grid.tile_origin(3, 2), Point::new(372.0, 62.0));
    }

    #[test]
    fn center_round_trip_across_row_parities() {
        let grid = StaggerGrid::new(124.0, 62.0);
        for ty in 0..8 {
            for tx in 0..8 {
                let center = grid.tile_center(tx, ty);
                assert_eq!(
                    grid.world_to_tile(center),
                    (tx, ty),
                    "round trip failed for ({tx}, {ty})"
                );
            }
        }
    }

    #[test]
    fn round_trip_holds_for_other_cell_sizes() {
        let grid = StaggerGrid::new(128.0, 64.0);
        for ty in 0..6 {
            for tx in 0..6 {
                let center = grid.tile_center(tx, ty);
                assert_eq!(grid.world_to_tile(center), (tx, ty));
            }
        }
    }

    #[test]
    fn points_left_of_the_map_resolve_to_negative_tiles() {
        let grid = StaggerGrid::new(124.0, 62.0);
        let (tx, _) = grid.world_to_tile(Point::new(-200.0, 31.0));
        assert!(tx < 0);
    }
}
