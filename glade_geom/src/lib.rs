// Copyright 2025 the Glade Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Glade Geom: grid and staggered-isometric geometry primitives.
//!
//! This crate provides the small amount of geometry the Glade compositing
//! engine needs on top of [`kurbo`]:
//!
//! - [`CellRect`]: an integer rectangle in grid-cell units, used for cluster
//!   windows and tile windows.
//! - [`grid_cells`]: mapping a world-space rectangle onto the grid cells it
//!   overlaps, clamped to the grid extents.
//! - [`intersection`] / [`covers`]: rectangle queries with explicit
//!   "no overlap" results (a degenerate intersection is absent, never a
//!   negative-extent rectangle).
//! - [`StaggerGrid`]: coordinate transforms between world space and a
//!   staggered isometric tile grid, exact inverses of each other.
//!
//! All operations are pure; methods return new values and never mutate their
//! inputs.
//!
//! ## Example
//!
//! ```rust
//! use glade_geom::{CellRect, grid_cells};
//! use kurbo::Rect;
//!
//! // A zero-size object at (370, 30) on a 200-unit cluster grid lands in
//! // exactly one cell.
//! let cells = grid_cells(Rect::new(370.0, 30.0, 370.0, 30.0), 200.0, 200.0, 20, 20);
//! assert_eq!(cells, CellRect::new(1, 0, 1, 1));
//! ```
//!
//! This crate is `no_std`.

#![no_std]

mod cells;
mod rect;
pub mod stagger;

pub use cells::{CellIter, CellRect};
pub use rect::{covers, grid_cells, intersection};
pub use stagger::StaggerGrid;
