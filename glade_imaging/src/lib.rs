// Copyright 2025 the Glade Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Glade Imaging: the backend-agnostic 2D drawing capability consumed by
//! Glade layers.
//!
//! The compositing core never touches pixels itself. Layers describe their
//! output as a short sequence of state ops (clip, translate) and draw ops
//! (rectangle fill, image blit, surface blit) against an abstract target,
//! and a backend — a web canvas, a GPU rasterizer, a test recorder — carries
//! them out. This mirrors the split between "what to draw" (owned by the
//! layers) and "how pixels appear" (owned by the backend).
//!
//! ## Core concepts
//!
//! - **Handles**: [`ImageId`] for loaded image assets and [`SurfaceId`] for
//!   offscreen surfaces. Both are small, opaque, and stable; how assets are
//!   loaded is out of scope.
//! - **Targets**: every op is addressed to [`Target::Screen`] or to an
//!   offscreen [`Target::Surface`]. Offscreen surfaces let layers amortize
//!   expensive rasterization (the tile layer pre-renders a window larger
//!   than the viewport and blits sub-regions from it on scroll).
//! - **Ops**: [`StateOp`] mutates target state, [`DrawOp`] produces pixels,
//!   the [`Imaging`] trait accepts both.
//! - **Reference backend**: [`Recorder`] records ops verbatim and is what
//!   the workspace tests assert against.
//!
//! ## Example
//!
//! ```rust
//! use glade_imaging::{DrawOp, Imaging, Recorder, StateOp, Target};
//! use kurbo::{Rect, Size};
//! use peniko::Color;
//!
//! let mut backend = Recorder::new();
//! let image = backend.register_image(Size::new(64.0, 64.0));
//!
//! backend.state(Target::Screen, StateOp::PushClip(Rect::new(0.0, 0.0, 100.0, 100.0)));
//! backend.draw(Target::Screen, DrawOp::Image { image, at: (10.0, 10.0).into() });
//! backend.state(Target::Screen, StateOp::PopClip);
//!
//! assert_eq!(backend.screen_ops().len(), 3);
//! ```
//!
//! This crate is `no_std` and uses `alloc`.

#![no_std]

extern crate alloc;

mod recorder;

pub use recorder::{RecordedOp, Recorder};

use kurbo::{Point, Rect, Size};
use peniko::Color;

/// Identifier for an image asset.
///
/// This is a small, opaque handle that is stable for the lifetime of the
/// resource. Images are opaque drawables with a size; loading and decoding
/// them is the embedder's concern.
#[repr(transparent)]
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct ImageId(pub u32);

/// Identifier for an offscreen surface.
///
/// Surfaces are created and resized on demand via
/// [`Imaging::ensure_surface`] and drawn into like the screen. Each owner
/// (for example a tile layer) holds its own `SurfaceId`; the core never
/// shares a surface between owners.
#[repr(transparent)]
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct SurfaceId(pub u32);

/// Addressee of a state or draw op.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Target {
    /// The visible output surface.
    Screen,
    /// An offscreen surface.
    Surface(SurfaceId),
}

/// An op that mutates target state rather than producing pixels.
///
/// Clip state nests: every [`StateOp::PushClip`] must be balanced by a
/// [`StateOp::PopClip`], which also undoes any translation applied since the
/// matching push (the save/restore discipline of 2D canvas contexts).
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum StateOp {
    /// Save the current state and intersect the clip with a rectangle.
    PushClip(Rect),
    /// Restore the state saved by the matching [`StateOp::PushClip`].
    PopClip,
    /// Translate the target's coordinate system.
    Translate(kurbo::Vec2),
}

/// An op that produces pixels on its target.
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum DrawOp {
    /// Fill a rectangle with a solid color.
    FillRect {
        /// Rectangle to fill, in target coordinates.
        rect: Rect,
        /// Fill color.
        color: Color,
    },
    /// Blit a whole image with its top-left corner at `at`.
    Image {
        /// Source image.
        image: ImageId,
        /// Destination of the image's top-left corner.
        at: Point,
    },
    /// Blit a sub-region of an image into a destination rectangle.
    ImageRegion {
        /// Source image.
        image: ImageId,
        /// Source sub-rectangle, in image coordinates.
        src: Rect,
        /// Destination rectangle, in target coordinates.
        dst: Rect,
    },
    /// Blit a sub-region of an offscreen surface into a destination
    /// rectangle.
    SurfaceRegion {
        /// Source surface.
        surface: SurfaceId,
        /// Source sub-rectangle, in surface coordinates.
        src: Rect,
        /// Destination rectangle, in target coordinates.
        dst: Rect,
    },
}

/// A 2D drawing backend.
///
/// Implementations are expected to be permissive: drawing to a surface that
/// was never sized, or blitting a region extending past a source, should
/// clamp rather than fail. The core guarantees balanced clip pushes/pops per
/// frame and never addresses a surface it has not passed to
/// [`Imaging::ensure_surface`] at least once.
pub trait Imaging {
    /// Returns the pixel size of an image asset.
    fn image_size(&self, image: ImageId) -> Size;

    /// Creates the surface if needed and resizes it to `size`.
    ///
    /// Resizing may discard the surface contents; callers treat the surface
    /// as undefined afterwards and repaint it fully.
    fn ensure_surface(&mut self, surface: SurfaceId, size: Size);

    /// Applies a state op to a target.
    fn state(&mut self, target: Target, op: StateOp);

    /// Applies a draw op to a target.
    fn draw(&mut self, target: Target, op: DrawOp);
}
