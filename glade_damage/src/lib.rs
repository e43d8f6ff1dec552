// Copyright 2025 the Glade Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Glade Damage: dirty-region tracking with a thresholded full-repaint
//! fallback.
//!
//! A [`DamageTracker`] is the single authority for "what changed this frame".
//! Layers report damaged screen rectangles as they mutate; the tracker clips
//! each report to the viewport and accumulates one covering rectangle (the
//! convex hull of everything reported). When the covering rectangle grows
//! past a configurable fraction of the viewport area, the tracker gives up
//! on partial repaints and escalates to "everything is dirty" — at that
//! point per-rect bookkeeping costs more than it saves.
//!
//! The tracker is a three-state machine:
//!
//! - **Clean**: nothing to repaint.
//! - **Partial**: one covering rectangle to repaint.
//! - **All dirty**: repaint the full viewport.
//!
//! Once all-dirty, the state cannot narrow within a frame; only an explicit
//! [`DamageTracker::clear`] after a completed repaint returns to clean.
//!
//! ## Quick start
//!
//! ```rust
//! use glade_damage::DamageTracker;
//! use kurbo::{Rect, Size};
//!
//! let mut damage = DamageTracker::new(0.5);
//! damage.set_viewport(Size::new(800.0, 600.0));
//! damage.clear();
//!
//! damage.mark(Rect::new(10.0, 10.0, 110.0, 110.0));
//! damage.mark(Rect::new(200.0, 40.0, 300.0, 140.0));
//!
//! // One covering rectangle, still a partial repaint.
//! assert!(!damage.is_all_dirty());
//! assert_eq!(damage.dirty_rect(), Some(Rect::new(10.0, 10.0, 300.0, 140.0)));
//!
//! damage.clear();
//! assert!(damage.is_all_clean());
//! ```
//!
//! This crate is `no_std`.

#![no_std]

use kurbo::{Rect, Size};

/// Accumulates damage reports into one covering rectangle per frame.
///
/// See the [crate docs](crate) for the state machine. All inputs are
/// defensively clipped: out-of-viewport damage is discarded, degenerate
/// rectangles are ignored, and no input can produce a negative-extent dirty
/// rectangle.
#[derive(Clone, Debug)]
pub struct DamageTracker {
    /// Fraction of the viewport area above which the tracker escalates to
    /// all-dirty. `0.0` escalates on the first report; `1.0` never
    /// escalates automatically.
    threshold: f64,
    /// The screen region damage is tracked within.
    viewport: Rect,
    /// Covering rectangle of everything reported this frame.
    dirty_rect: Option<Rect>,
    /// Whether the whole viewport must be repainted.
    all_dirty: bool,
}

impl DamageTracker {
    /// The default escalation threshold.
    pub const DEFAULT_THRESHOLD: f64 = 0.5;

    /// Creates a tracker with the given escalation threshold in `[0, 1]`.
    ///
    /// The tracker starts all-dirty: the first frame has no prior contents
    /// and must paint everything. The viewport starts at a placeholder
    /// 100×100 until [`Self::set_viewport`] is called.
    #[must_use]
    pub fn new(threshold: f64) -> Self {
        let viewport = Rect::new(0.0, 0.0, 100.0, 100.0);
        Self {
            threshold: threshold.clamp(0.0, 1.0),
            viewport,
            dirty_rect: Some(viewport),
            all_dirty: true,
        }
    }

    /// Sets the viewport size.
    ///
    /// An actual size change invalidates every geometry assumption made so
    /// far, so the tracker escalates to all-dirty. Setting the same size is
    /// a no-op.
    pub fn set_viewport(&mut self, size: Size) {
        if self.viewport.size() == size {
            return;
        }
        self.viewport = size.to_rect();
        self.mark_all();
    }

    /// Marks a screen-space rectangle as needing repaint.
    ///
    /// Zero-area reports and reports outside the viewport are ignored. The
    /// report is clipped to the viewport and hulled into the covering
    /// rectangle; if the covered area then exceeds `threshold ×
    /// viewport area`, the tracker escalates to all-dirty. No-op when
    /// already all-dirty.
    pub fn mark(&mut self, rect: Rect) {
        if self.all_dirty || rect.width() <= 0.0 || rect.height() <= 0.0 {
            return;
        }
        let clipped = self.viewport.intersect(rect);
        if clipped.width() <= 0.0 || clipped.height() <= 0.0 {
            return;
        }
        let dirty = match self.dirty_rect {
            Some(dirty) => dirty.union(clipped),
            None => clipped,
        };
        self.dirty_rect = Some(dirty);
        if dirty.area() > self.threshold * self.viewport.area() {
            self.mark_all();
        }
    }

    /// Marks the whole viewport as needing repaint. Idempotent.
    pub fn mark_all(&mut self) {
        self.all_dirty = true;
        self.dirty_rect = Some(self.viewport);
    }

    /// Resets to clean after a completed repaint. Idempotent.
    pub fn clear(&mut self) {
        self.dirty_rect = None;
        self.all_dirty = false;
    }

    /// Returns `true` if nothing needs repainting this frame.
    #[must_use]
    pub fn is_all_clean(&self) -> bool {
        self.dirty_rect.is_none()
    }

    /// Returns `true` if the whole viewport needs repainting.
    #[must_use]
    pub fn is_all_dirty(&self) -> bool {
        self.all_dirty
    }

    /// Returns the covering rectangle of this frame's damage, if any.
    #[must_use]
    pub fn dirty_rect(&self) -> Option<Rect> {
        self.dirty_rect
    }

    /// Returns the current viewport rectangle.
    #[must_use]
    pub fn viewport(&self) -> Rect {
        self.viewport
    }

    /// Snapshot of the current tracker state for debugging and inspection.
    #[must_use]
    pub fn debug_info(&self) -> DamageDebugInfo {
        DamageDebugInfo {
            threshold: self.threshold,
            viewport: self.viewport,
            dirty_rect: self.dirty_rect,
            all_dirty: self.all_dirty,
        }
    }
}

impl Default for DamageTracker {
    fn default() -> Self {
        Self::new(Self::DEFAULT_THRESHOLD)
    }
}

/// Debug snapshot of a [`DamageTracker`] state.
#[derive(Clone, Copy, Debug)]
pub struct DamageDebugInfo {
    /// Escalation threshold as a fraction of viewport area.
    pub threshold: f64,
    /// Viewport rectangle damage is clipped to.
    pub viewport: Rect,
    /// Covering rectangle of this frame's damage, if any.
    pub dirty_rect: Option<Rect>,
    /// Whether the tracker has escalated to a full repaint.
    pub all_dirty: bool,
}
