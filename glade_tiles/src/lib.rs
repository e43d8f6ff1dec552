// Copyright 2025 the Glade Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Glade Tiles: the staggered isometric tile layer.
//!
//! A [`TileLayer`] draws a [`TileMap`] of diamond-shaped tiles packed on a
//! staggered grid (odd rows shifted right by half a cell, rows overlapping
//! vertically by half a cell). Rasterizing every visible tile each frame
//! would dwarf the cost of the rest of the scene, so the layer pre-renders
//! a window of tiles slightly larger than the viewport into an offscreen
//! surface and serves frames by blitting sub-regions from it:
//!
//! - Sub-cell scrolling stays within the cached window and costs one blit.
//! - Scrolling far enough to shift the window re-renders the offscreen
//!   surface once, then blitting resumes.
//! - Editing a tile inside the window damages its screen rectangle and
//!   invalidates the cache; edits outside the window are free.
//!
//! Tile ids index into a tileset image left to right, top to bottom. Clicks
//! resolving to an in-map tile are queued for the application
//! ([`TileLayer::take_clicks`]) and consume the event.
//!
//! This crate is `no_std` and uses `alloc`.

#![no_std]

extern crate alloc;

mod map;
mod tile_layer;

pub use map::TileMap;
pub use tile_layer::{TileLayer, TileLayerDebugInfo};
