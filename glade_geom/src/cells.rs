// Copyright 2025 the Glade Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Integer rectangles in grid-cell units.

/// An axis-aligned rectangle in grid-cell units.
///
/// Cell rectangles describe windows onto a uniform grid: the set of cluster
/// cells an object overlaps, the set of tile cells cached offscreen, or the
/// cells currently visible through the viewport. Coordinates are signed
/// because tile windows may extend past the top-left map corner while
/// scrolling near the origin; extents are never negative.
///
/// The covered cells are the half-open ranges `x..x + width` and
/// `y..y + height`.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct CellRect {
    /// Leftmost covered column.
    pub x: i64,
    /// Topmost covered row.
    pub y: i64,
    /// Number of covered columns.
    pub width: i64,
    /// Number of covered rows.
    pub height: i64,
}

impl CellRect {
    /// The empty window at the origin.
    pub const EMPTY: Self = Self {
        x: 0,
        y: 0,
        width: 0,
        height: 0,
    };

    /// Creates a cell rectangle. Negative extents are clamped to zero.
    #[must_use]
    pub const fn new(x: i64, y: i64, width: i64, height: i64) -> Self {
        Self {
            x,
            y,
            width: if width < 0 { 0 } else { width },
            height: if height < 0 { 0 } else { height },
        }
    }

    /// Returns `true` if the window covers no cells.
    #[must_use]
    pub const fn is_empty(self) -> bool {
        self.width == 0 || self.height == 0
    }

    /// Returns `true` if the two windows overlap or touch.
    ///
    /// The comparison is edge-inclusive: two windows sharing only a border
    /// still count as intersecting. Visibility checks use this deliberately
    /// conservative form so that objects on a window edge are never culled a
    /// frame early.
    #[must_use]
    pub const fn intersects(self, other: Self) -> bool {
        self.x <= other.x + other.width
            && self.x + self.width >= other.x
            && self.y <= other.y + other.height
            && self.y + self.height >= other.y
    }

    /// Returns `true` if the cell at `(col, row)` lies within the window.
    #[must_use]
    pub const fn contains_cell(self, col: i64, row: i64) -> bool {
        col >= self.x && col < self.x + self.width && row >= self.y && row < self.y + self.height
    }

    /// Iterates the covered `(col, row)` pairs in row-major order.
    #[must_use]
    pub fn cells(self) -> CellIter {
        CellIter {
            rect: self,
            col: self.x,
            row: self.y,
        }
    }
}

/// Row-major iterator over the cells of a [`CellRect`].
#[derive(Clone, Debug)]
pub struct CellIter {
    rect: CellRect,
    col: i64,
    row: i64,
}

impl Iterator for CellIter {
    type Item = (i64, i64);

    fn next(&mut self) -> Option<(i64, i64)> {
        if self.rect.is_empty() || self.row >= self.rect.y + self.rect.height {
            return None;
        }
        let cell = (self.col, self.row);
        self.col += 1;
        if self.col >= self.rect.x + self.rect.width {
            self.col = self.rect.x;
            self.row += 1;
        }
        Some(cell)
    }
}
