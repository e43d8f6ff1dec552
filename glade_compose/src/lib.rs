// Copyright 2025 the Glade Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Glade Compose: the layer protocol and the compositor.
//!
//! A frame is composed from an ordered stack of [`Layer`]s sharing one
//! [`DamageTracker`] and one pointer pipeline. The [`Compositor`] owns both
//! and enforces the frame discipline:
//!
//! 1. **Commit**: every layer flushes its pending damage reports into the
//!    shared tracker.
//! 2. **Draw**: if anything is dirty, clip to the covering dirty rectangle
//!    and draw the layers front to back (insertion order), each restricted
//!    to the dirty region.
//! 3. **Clear**: the tracker resets to clean for the next frame.
//!
//! Pointer events travel the opposite way: back to front (topmost layer
//! first), stopping at the first layer that returns [`Outcome::Stop`].
//!
//! The crate also provides the screen-fixed UI overlay ([`OverlayLayer`]),
//! its [`Widget`] protocol, and the [`StateButton`] widget.
//!
//! This crate is `no_std` and uses `alloc`.

#![no_std]

extern crate alloc;

mod overlay;

pub use overlay::{OverlayLayer, StateButton, Widget, WidgetEvent};

use alloc::boxed::Box;
use alloc::vec::Vec;
use core::any::Any;

use glade_damage::DamageTracker;
use glade_events::{Outcome, PointerEvent};
use glade_imaging::{Imaging, StateOp, Target};
use kurbo::{Point, Rect, Size, Vec2};

/// A member of the compositor's layer stack.
///
/// Layers mutate freely between frames, buffering the screen rectangles
/// they damaged; [`Layer::commit`] is the one moment those reports reach
/// the shared tracker. [`Layer::draw`] must confine its output to the dirty
/// rectangle when one is given (the compositor has already clipped the
/// target, so overdraw is a waste, not a correctness bug).
///
/// The `Any` supertrait allows typed access back to a concrete layer via
/// [`Compositor::layer_mut`].
pub trait Layer: Any {
    /// Informs the layer of the viewport size.
    fn set_size(&mut self, size: Size);

    /// Informs the layer of the world scroll origin.
    ///
    /// Screen-fixed layers ignore this.
    fn set_origin(&mut self, origin: Point);

    /// Flushes pending damage reports into the shared tracker.
    fn commit(&mut self, damage: &mut DamageTracker);

    /// Draws the layer, restricted to `dirty` when present.
    ///
    /// `None` means the full viewport (first frame, or a caller outside the
    /// compositor's frame loop).
    fn draw(&mut self, backend: &mut dyn Imaging, dirty: Option<Rect>);

    /// Handles a pointer release.
    fn on_pointer_up(&mut self, event: &PointerEvent) -> Outcome;

    /// Upcasts for typed access.
    fn as_any(&self) -> &dyn Any;

    /// Upcasts for typed access.
    fn as_any_mut(&mut self) -> &mut dyn Any;
}

/// Ordered layer stack sharing one damage tracker and one pointer pipeline.
///
/// Later-pushed layers draw on top and see pointer events first.
pub struct Compositor {
    layers: Vec<Box<dyn Layer>>,
    damage: DamageTracker,
    size: Size,
    origin: Point,
}

impl Compositor {
    /// Creates an empty compositor with the given damage escalation
    /// threshold.
    #[must_use]
    pub fn new(threshold: f64) -> Self {
        Self {
            layers: Vec::new(),
            damage: DamageTracker::new(threshold),
            size: Size::new(100.0, 100.0),
            origin: Point::ZERO,
        }
    }

    /// Appends a layer on top of the stack.
    ///
    /// The current viewport size and scroll origin are propagated to the
    /// layer before insertion.
    pub fn push_layer(&mut self, mut layer: Box<dyn Layer>) {
        layer.set_size(self.size);
        layer.set_origin(self.origin);
        self.layers.push(layer);
    }

    /// Sets the viewport size, propagating it to the tracker and every
    /// layer.
    pub fn set_size(&mut self, size: Size) {
        self.size = size;
        self.damage.set_viewport(size);
        for layer in &mut self.layers {
            layer.set_size(size);
        }
    }

    /// Sets the world scroll origin.
    ///
    /// Scrolling displaces everything on screen, so the whole viewport is
    /// marked dirty.
    pub fn set_origin(&mut self, origin: Point) {
        self.origin = origin;
        self.damage.mark_all();
        for layer in &mut self.layers {
            layer.set_origin(origin);
        }
    }

    /// Scrolls the viewport by a displacement.
    pub fn scroll_by(&mut self, delta: Vec2) {
        self.set_origin(self.origin + delta);
    }

    /// Runs one frame: commit, draw within the dirty region, clear.
    ///
    /// When nothing is dirty after commit, no draw op is issued at all.
    pub fn render(&mut self, backend: &mut dyn Imaging) {
        for layer in &mut self.layers {
            layer.commit(&mut self.damage);
        }
        if let Some(dirty) = self.damage.dirty_rect() {
            backend.state(Target::Screen, StateOp::PushClip(dirty));
            for layer in &mut self.layers {
                layer.draw(backend, Some(dirty));
            }
            backend.state(Target::Screen, StateOp::PopClip);
        }
        self.damage.clear();
    }

    /// Dispatches a pointer release back to front, stopping at the first
    /// layer that consumes it.
    pub fn pointer_up(&mut self, event: &PointerEvent) -> Outcome {
        for layer in self.layers.iter_mut().rev() {
            if layer.on_pointer_up(event).is_stop() {
                return Outcome::Stop;
            }
        }
        Outcome::Continue
    }

    /// Returns a typed mutable reference to the layer at `index`.
    ///
    /// `None` if the index is out of range or the layer is not an `L`.
    pub fn layer_mut<L: Layer>(&mut self, index: usize) -> Option<&mut L> {
        self.layers
            .get_mut(index)?
            .as_any_mut()
            .downcast_mut::<L>()
    }

    /// Returns the number of layers in the stack.
    #[must_use]
    pub fn len(&self) -> usize {
        self.layers.len()
    }

    /// Returns `true` if the stack holds no layers.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.layers.is_empty()
    }

    /// Returns the current scroll origin.
    #[must_use]
    pub fn origin(&self) -> Point {
        self.origin
    }

    /// Returns the shared damage tracker.
    #[must_use]
    pub fn damage(&self) -> &DamageTracker {
        &self.damage
    }
}

impl Default for Compositor {
    fn default() -> Self {
        Self::new(DamageTracker::DEFAULT_THRESHOLD)
    }
}

impl core::fmt::Debug for Compositor {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Compositor")
            .field("layers", &self.layers.len())
            .field("size", &self.size)
            .field("origin", &self.origin)
            .field("damage", &self.damage)
            .finish()
    }
}
