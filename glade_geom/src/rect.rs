// Copyright 2025 the Glade Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Rectangle queries with explicit "no overlap" results.

use kurbo::Rect;
#[cfg(not(feature = "std"))]
use kurbo::common::FloatFuncs as _;

use crate::CellRect;

/// Returns the intersection of two rectangles, or `None` when it is
/// degenerate.
///
/// Unlike [`Rect::intersect`], which clamps a disjoint result to a zero-area
/// rectangle, this makes the "no overlap" case explicit: the result is
/// `Some` only when the shared region has positive area, and the returned
/// rectangle is contained in both inputs.
#[must_use]
pub fn intersection(a: Rect, b: Rect) -> Option<Rect> {
    let r = a.intersect(b);
    if r.width() <= 0.0 || r.height() <= 0.0 {
        None
    } else {
        Some(r)
    }
}

/// Returns `true` if `outer` fully contains `inner`.
#[must_use]
pub fn covers(outer: Rect, inner: Rect) -> bool {
    inner.x0 >= outer.x0 && inner.y0 >= outer.y0 && inner.x1 <= outer.x1 && inner.y1 <= outer.y1
}

/// Maps a world-space rectangle onto the grid cells it overlaps.
///
/// The grid has cells of `cell_w` × `cell_h` world units; `max_cols` and
/// `max_rows` bound the result to `[0, max_cols) × [0, max_rows)` so that
/// cell indices can be used directly as array subscripts. A rectangle lying
/// entirely outside the grid maps to an empty window.
///
/// A zero-size rectangle still overlaps the single cell containing its
/// origin; point objects always belong somewhere.
#[must_use]
#[expect(
    clippy::cast_possible_truncation,
    reason = "cell indices are far below 2^53; the float floor is exact"
)]
pub fn grid_cells(rect: Rect, cell_w: f64, cell_h: f64, max_cols: i64, max_rows: i64) -> CellRect {
    let x = (rect.x0 / cell_w).floor().max(0.0) as i64;
    let y = (rect.y0 / cell_h).floor().max(0.0) as i64;
    let width = ((rect.x1 / cell_w).floor() as i64 - x + 1).min(max_cols - x);
    let height = ((rect.y1 / cell_h).floor() as i64 - y + 1).min(max_rows - y);
    CellRect::new(x, y, width, height)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn intersection_absent_iff_disjoint() {
        let a = Rect::new(0.0, 0.0, 10.0, 10.0);
        let b = Rect::new(20.0, 20.0, 30.0, 30.0);
        assert!(intersection(a, b).is_none());

        let c = Rect::new(5.0, 5.0, 15.0, 15.0);
        let r = intersection(a, c).unwrap();
        assert!(covers(a, r));
        assert!(covers(c, r));
        assert_eq!(r, Rect::new(5.0, 5.0, 10.0, 10.0));
    }

    #[test]
    fn touching_edges_do_not_intersect() {
        let a = Rect::new(0.0, 0.0, 10.0, 10.0);
        let b = Rect::new(10.0, 0.0, 20.0, 10.0);
        assert!(intersection(a, b).is_none());
    }

    #[test]
    fn covers_requires_full_containment() {
        let outer = Rect::new(0.0, 0.0, 100.0, 100.0);
        assert!(covers(outer, Rect::new(10.0, 10.0, 90.0, 90.0)));
        assert!(covers(outer, outer));
        assert!(!covers(outer, Rect::new(10.0, 10.0, 110.0, 90.0)));
    }

    #[test]
    fn zero_size_rect_maps_to_one_cell() {
        let cells = grid_cells(Rect::new(370.0, 30.0, 370.0, 30.0), 200.0, 200.0, 20, 20);
        assert_eq!(cells, CellRect::new(1, 0, 1, 1));
    }

    #[test]
    fn straddling_rect_maps_to_all_overlapped_cells() {
        // 150..250 crosses the 200 boundary in x; 50..120 stays in row 0.
        let cells = grid_cells(Rect::new(150.0, 50.0, 250.0, 120.0), 200.0, 200.0, 20, 20);
        assert_eq!(cells, CellRect::new(0, 0, 2, 1));
    }

    #[test]
    fn result_clamps_to_grid_extents() {
        // Extends past the right edge of a 4-column grid.
        let cells = grid_cells(Rect::new(700.0, 0.0, 1100.0, 50.0), 200.0, 200.0, 4, 4);
        assert_eq!(cells, CellRect::new(3, 0, 1, 1));

        // Entirely outside the grid: empty.
        let cells = grid_cells(Rect::new(900.0, 0.0, 1100.0, 50.0), 200.0, 200.0, 4, 4);
        assert!(cells.is_empty());
    }

    #[test]
    fn negative_coordinates_clamp_to_origin() {
        let cells = grid_cells(Rect::new(-50.0, -50.0, 30.0, 30.0), 200.0, 200.0, 4, 4);
        assert_eq!(cells, CellRect::new(0, 0, 1, 1));
    }
}
