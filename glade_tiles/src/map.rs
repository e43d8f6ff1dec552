// Copyright 2025 the Glade Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Backing tile-id storage.

use alloc::vec;
use alloc::vec::Vec;

/// A rectangular grid of tile ids, stored row-major.
///
/// Coordinates are signed so that callers can probe with tile coordinates
/// straight out of a hit test; out-of-map probes are answered with `None`
/// rather than clamped.
#[derive(Clone, Debug)]
pub struct TileMap {
    cols: i64,
    rows: i64,
    data: Vec<u32>,
}

impl TileMap {
    /// Creates a map of the given dimensions filled with tile id 0.
    #[expect(
        clippy::cast_possible_truncation,
        reason = "dimensions are clamped to non-negative before allocating"
    )]
    #[must_use]
    pub fn new(cols: i64, rows: i64) -> Self {
        let cols = cols.max(0);
        let rows = rows.max(0);
        Self {
            cols,
            rows,
            data: vec![0; (cols * rows) as usize],
        }
    }

    /// Number of columns.
    #[must_use]
    pub fn cols(&self) -> i64 {
        self.cols
    }

    /// Number of rows.
    #[must_use]
    pub fn rows(&self) -> i64 {
        self.rows
    }

    /// Returns `true` if the coordinate lies within the map.
    #[must_use]
    pub fn contains(&self, x: i64, y: i64) -> bool {
        x >= 0 && x < self.cols && y >= 0 && y < self.rows
    }

    /// Returns the tile id at `(x, y)`, or `None` outside the map.
    #[must_use]
    pub fn get(&self, x: i64, y: i64) -> Option<u32> {
        self.index(x, y).map(|i| self.data[i])
    }

    /// Sets the tile id at `(x, y)`. Returns `false` outside the map.
    pub fn set(&mut self, x: i64, y: i64, id: u32) -> bool {
        match self.index(x, y) {
            Some(i) => {
                self.data[i] = id;
                true
            }
            None => false,
        }
    }

    #[expect(
        clippy::cast_possible_truncation,
        reason = "in-map coordinates are non-negative by the contains check"
    )]
    fn index(&self, x: i64, y: i64) -> Option<usize> {
        self.contains(x, y).then(|| (y * self.cols + x) as usize)
    }
}
