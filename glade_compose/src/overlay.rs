// Copyright 2025 the Glade Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Screen-fixed UI overlay layer and its widget protocol.

use alloc::boxed::Box;
use alloc::vec::Vec;
use core::any::Any;

use glade_damage::DamageTracker;
use glade_events::{Outcome, PointerEvent};
use glade_geom::intersection;
use glade_imaging::{DrawOp, ImageId, Imaging, Target};
use kurbo::{Point, Rect, Size};

use crate::Layer;

/// What a widget did with a pointer release.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum WidgetEvent {
    /// The widget did not react.
    Ignored,
    /// The widget changed state and must be repainted.
    Activated,
}

/// A member of the overlay's widget list.
pub trait Widget: Any {
    /// The widget's screen-space bounds.
    fn bounds(&self) -> Rect;

    /// Draws the widget, restricted to `dirty` when present.
    fn draw(&mut self, backend: &mut dyn Imaging, dirty: Option<Rect>);

    /// Handles a pointer release inside the widget's bounds.
    fn on_pointer_up(&mut self) -> WidgetEvent;

    /// Upcasts for typed access.
    fn as_any_mut(&mut self) -> &mut dyn Any;
}

/// Screen-fixed UI layer holding an ordered widget list.
///
/// The overlay sits on top of the world layers and ignores scrolling: widget
/// bounds are viewport coordinates. Hit-testing is a linear scan in display
/// order, first containing widget wins. Releases at the end of a drag are
/// not clicks and are ignored.
#[derive(Default)]
pub struct OverlayLayer {
    widgets: Vec<Box<dyn Widget>>,
    pending: Vec<Rect>,
}

impl core::fmt::Debug for OverlayLayer {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("OverlayLayer")
            .field("widgets", &self.widgets.len())
            .field("pending", &self.pending)
            .finish()
    }
}

impl OverlayLayer {
    /// Creates an empty overlay.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a widget to the display list.
    pub fn push_widget(&mut self, widget: Box<dyn Widget>) {
        self.widgets.push(widget);
    }

    /// Returns a typed mutable reference to the widget at `index`.
    pub fn widget_mut<W: Widget>(&mut self, index: usize) -> Option<&mut W> {
        self.widgets
            .get_mut(index)?
            .as_any_mut()
            .downcast_mut::<W>()
    }

    /// Returns the number of widgets.
    #[must_use]
    pub fn len(&self) -> usize {
        self.widgets.len()
    }

    /// Returns `true` if the overlay holds no widgets.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.widgets.is_empty()
    }
}

impl Layer for OverlayLayer {
    fn set_size(&mut self, _size: Size) {}

    // Screen-fixed: scrolling does not move the overlay.
    fn set_origin(&mut self, _origin: Point) {}

    fn commit(&mut self, damage: &mut DamageTracker) {
        for rect in self.pending.drain(..) {
            damage.mark(rect);
        }
    }

    fn draw(&mut self, backend: &mut dyn Imaging, dirty: Option<Rect>) {
        for widget in &mut self.widgets {
            if let Some(dirty) = dirty
                && intersection(dirty, widget.bounds()).is_none()
            {
                continue;
            }
            widget.draw(backend, dirty);
        }
    }

    fn on_pointer_up(&mut self, event: &PointerEvent) -> Outcome {
        if event.moved {
            return Outcome::Continue;
        }
        for widget in &mut self.widgets {
            if !widget.bounds().contains(event.pos) {
                continue;
            }
            if widget.on_pointer_up() == WidgetEvent::Activated {
                self.pending.push(widget.bounds());
                return Outcome::Stop;
            }
            return Outcome::Continue;
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

/// Clickable state-toggle button backed by a horizontal image strip.
///
/// The strip holds `frames` equal-width frames, one per state. A click
/// advances the state cyclically and activates the widget.
#[derive(Clone, Debug)]
pub struct StateButton {
    image: ImageId,
    frame_size: Size,
    frames: u32,
    frame: u32,
    at: Point,
}

impl StateButton {
    /// Creates a button at `at` showing frame 0.
    ///
    /// `frame_size` is the size of one frame, and `frames` the number of
    /// frames in the strip (clamped to at least one).
    #[must_use]
    pub fn new(image: ImageId, at: Point, frame_size: Size, frames: u32) -> Self {
        Self {
            image,
            frame_size,
            frames: frames.max(1),
            frame: 0,
            at,
        }
    }

    /// Returns the current state.
    #[must_use]
    pub fn frame(&self) -> u32 {
        self.frame
    }
}

impl Widget for StateButton {
    fn bounds(&self) -> Rect {
        Rect::from_origin_size(self.at, self.frame_size)
    }

    fn draw(&mut self, backend: &mut dyn Imaging, _dirty: Option<Rect>) {
        let w = self.frame_size.width;
        let h = self.frame_size.height;
        let x = f64::from(self.frame) * w;
        backend.draw(
            Target::Screen,
            DrawOp::ImageRegion {
                image: self.image,
                src: Rect::new(x, 0.0, x + w, h),
                dst: self.bounds(),
            },
        );
    }

    fn on_pointer_up(&mut self) -> WidgetEvent {
        self.frame = (self.frame + 1) % self.frames;
        WidgetEvent::Activated
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}
