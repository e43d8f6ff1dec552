// Copyright 2025 the Glade Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Glade Events: pointer gesture tracking and propagation outcomes.
//!
//! This crate contains the two small event primitives the compositor needs:
//!
//! - [`PointerTracker`]: a press/move/release state machine that separates
//!   drags from clicks. A press begins a gesture; moves are suppressed until
//!   the pointer travels past a distance threshold from the press point,
//!   after which each move yields a delta since the previous one. The
//!   release event is stamped with whether the gesture ever became a drag,
//!   so handlers can treat a release at the end of a drag differently from
//!   a click.
//! - [`Outcome`]: the value a handler returns to either let an event keep
//!   propagating or consume it.
//!
//! ## Example
//!
//! ```rust
//! use glade_events::PointerTracker;
//! use kurbo::Point;
//!
//! let mut tracker = PointerTracker::default();
//!
//! tracker.begin(Point::new(100.0, 100.0));
//! // Within the threshold: jitter, not a drag.
//! assert!(tracker.update(Point::new(103.0, 102.0)).is_none());
//!
//! // Past the threshold: moves start flowing.
//! let event = tracker.update(Point::new(120.0, 100.0)).unwrap();
//! assert!(event.moved);
//!
//! let release = tracker.finish(Point::new(120.0, 100.0)).unwrap();
//! assert!(release.moved); // Not a click.
//! ```
//!
//! This crate is `no_std`.

#![no_std]

use kurbo::{Point, Vec2};

/// A pointer event delivered to layers and widgets.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct PointerEvent {
    /// Pointer position in screen coordinates.
    pub pos: Point,
    /// Movement since the previous event of the gesture.
    pub delta: Vec2,
    /// Whether the gesture crossed the move threshold at any point.
    ///
    /// On a release event, `false` means the gesture was a click.
    pub moved: bool,
}

/// What a handler wants done with an event after seeing it.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Default)]
pub enum Outcome {
    /// The event was not consumed; keep dispatching to handlers below.
    #[default]
    Continue,
    /// The event was consumed; stop dispatching.
    Stop,
}

impl Outcome {
    /// Returns `true` if dispatch should stop.
    #[must_use]
    pub fn is_stop(self) -> bool {
        self == Self::Stop
    }
}

/// Press/move/release state machine with a drag threshold.
///
/// Small pointer jitter between press and release would otherwise turn every
/// click into a micro-drag. The tracker suppresses move events until the
/// pointer travels more than [`PointerTracker::DEFAULT_MOVE_THRESHOLD`]
/// (Euclidean distance) from the press point; once crossed, the gesture is a
/// drag for its remaining lifetime.
#[derive(Clone, Debug, Default)]
pub struct PointerTracker {
    start: Option<Point>,
    last: Point,
    moving: bool,
}

impl PointerTracker {
    /// Distance in pixels the pointer must travel from the press point
    /// before the gesture counts as a drag.
    pub const DEFAULT_MOVE_THRESHOLD: f64 = 10.0;

    /// Creates an idle tracker.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Begins a gesture at the press position.
    ///
    /// Any gesture already in flight is abandoned.
    pub fn begin(&mut self, pos: Point) {
        self.start = Some(pos);
        self.last = pos;
        self.moving = false;
    }

    /// Feeds a pointer move, returning a move event once the gesture is a
    /// drag.
    ///
    /// Returns `None` while idle and while the pointer stays within the
    /// threshold of the press point.
    pub fn update(&mut self, pos: Point) -> Option<PointerEvent> {
        let start = self.start?;
        if !self.moving {
            if (pos - start).hypot() <= Self::DEFAULT_MOVE_THRESHOLD {
                return None;
            }
            self.moving = true;
        }
        let delta = pos - self.last;
        self.last = pos;
        Some(PointerEvent {
            pos,
            delta,
            moved: true,
        })
    }

    /// Ends the gesture, returning the release event.
    ///
    /// The event's `moved` flag records whether the gesture was a drag; a
    /// `false` value means the press/release pair was a click. Returns
    /// `None` if no gesture was in flight.
    pub fn finish(&mut self, pos: Point) -> Option<PointerEvent> {
        self.start?;
        let event = PointerEvent {
            pos,
            delta: pos - self.last,
            moved: self.moving,
        };
        self.start = None;
        self.moving = false;
        Some(event)
    }

    /// Returns `true` while an in-flight gesture has crossed the threshold.
    #[must_use]
    pub fn is_moving(&self) -> bool {
        self.moving
    }

    /// Returns `true` while a gesture is in flight.
    #[must_use]
    pub fn is_active(&self) -> bool {
        self.start.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn idle_tracker_ignores_moves_and_releases() {
        let mut tracker = PointerTracker::new();
        assert!(tracker.update(Point::new(5.0, 5.0)).is_none());
        assert!(tracker.finish(Point::new(5.0, 5.0)).is_none());
        assert!(!tracker.is_active());
    }

    #[test]
    fn moves_within_threshold_are_suppressed() {
        let mut tracker = PointerTracker::new();
        tracker.begin(Point::new(100.0, 100.0));

        // 6–8 px of travel: under the 10 px threshold.
        assert!(tracker.update(Point::new(106.0, 100.0)).is_none());
        assert!(tracker.update(Point::new(100.0, 108.0)).is_none());
        assert!(!tracker.is_moving());
    }

    #[test]
    fn exactly_threshold_distance_is_not_a_drag() {
        let mut tracker = PointerTracker::new();
        tracker.begin(Point::new(0.0, 0.0));
        assert!(tracker.update(Point::new(10.0, 0.0)).is_none());
    }

    #[test]
    fn first_drag_delta_spans_from_the_press_point() {
        let mut tracker = PointerTracker::new();
        tracker.begin(Point::new(100.0, 100.0));

        let event = tracker.update(Point::new(115.0, 100.0)).unwrap();
        assert_eq!(event.delta, Vec2::new(15.0, 0.0));
        assert_eq!(event.pos, Point::new(115.0, 100.0));
        assert!(event.moved);
        assert!(tracker.is_moving());
    }

    #[test]
    fn later_deltas_are_incremental() {
        let mut tracker = PointerTracker::new();
        tracker.begin(Point::new(0.0, 0.0));

        tracker.update(Point::new(20.0, 0.0));
        let event = tracker.update(Point::new(23.0, 4.0)).unwrap();
        assert_eq!(event.delta, Vec2::new(3.0, 4.0));
    }

    #[test]
    fn release_without_movement_is_a_click() {
        let mut tracker = PointerTracker::new();
        tracker.begin(Point::new(50.0, 50.0));
        tracker.update(Point::new(53.0, 51.0));

        let release = tracker.finish(Point::new(53.0, 51.0)).unwrap();
        assert!(!release.moved);
        assert!(!tracker.is_active());
    }

    #[test]
    fn release_after_drag_is_stamped_moved() {
        let mut tracker = PointerTracker::new();
        tracker.begin(Point::new(0.0, 0.0));
        tracker.update(Point::new(30.0, 0.0));

        let release = tracker.finish(Point::new(32.0, 1.0)).unwrap();
        assert!(release.moved);
        assert_eq!(release.delta, Vec2::new(2.0, 1.0));
    }

    #[test]
    fn jitter_then_return_to_start_still_counts_as_click() {
        let mut tracker = PointerTracker::new();
        tracker.begin(Point::new(10.0, 10.0));
        tracker.update(Point::new(14.0, 10.0));
        tracker.update(Point::new(10.0, 10.0));

        let release = tracker.finish(Point::new(10.0, 10.0)).unwrap();
        assert!(!release.moved);
    }

    #[test]
    fn drag_state_is_sticky_within_a_gesture() {
        let mut tracker = PointerTracker::new();
        tracker.begin(Point::new(0.0, 0.0));
        tracker.update(Point::new(20.0, 0.0));

        // Back near the press point: still a drag.
        let event = tracker.update(Point::new(1.0, 0.0)).unwrap();
        assert_eq!(event.delta, Vec2::new(-19.0, 0.0));
        assert!(tracker.is_moving());
    }

    #[test]
    fn begin_abandons_a_gesture_in_flight() {
        let mut tracker = PointerTracker::new();
        tracker.begin(Point::new(0.0, 0.0));
        tracker.update(Point::new(50.0, 0.0));

        tracker.begin(Point::new(200.0, 200.0));
        assert!(!tracker.is_moving());
        let release = tracker.finish(Point::new(201.0, 200.0)).unwrap();
        assert!(!release.moved);
    }

    #[test]
    fn outcome_default_continues() {
        assert_eq!(Outcome::default(), Outcome::Continue);
        assert!(!Outcome::Continue.is_stop());
        assert!(Outcome::Stop.is_stop());
    }
}
