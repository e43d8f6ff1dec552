// Copyright 2025 the Glade Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Glade Scene: the world object layer.
//!
//! World objects ([`Sprite`]s) live in a generational arena and are indexed
//! by a uniform cluster grid: the world is divided into square cluster
//! cells, and each cell lists the ids of every sprite whose bounds overlap
//! it. Viewport culling then reduces to reading the cells under the current
//! view, and hit-testing to a scan of that (small) visible set.
//!
//! [`ObjectLayer`] ties the pieces together and implements the
//! [`Layer`](glade_compose::Layer) protocol:
//!
//! - mutations go through the layer (insert/remove/move/resize), which keeps
//!   cell membership exact and buffers damage for the changed screen
//!   regions;
//! - a depth-sorted cache of the visible sprites is rebuilt lazily when the
//!   visible cell window changes, and merely resorted when only depth
//!   changed;
//! - sprites draw in depth order (bottom edge ascending), so objects lower
//!   on screen paint over objects behind them;
//! - clicks resolve to sprite ids queued for the application to drain with
//!   [`ObjectLayer::take_clicks`].
//!
//! This crate is `no_std` and uses `alloc`.

#![no_std]

extern crate alloc;

mod object_layer;
mod sprite;

pub use object_layer::{ObjectLayer, ObjectLayerDebugInfo};
pub use sprite::{Sprite, SpriteFlags, SpriteId};

pub(crate) use sprite::SpriteArena;
