// Copyright 2025 the Glade Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Recording reference backend.

use alloc::vec::Vec;

use hashbrown::HashMap;
use kurbo::Size;

use crate::{DrawOp, ImageId, Imaging, StateOp, SurfaceId, Target};

/// A recorded state or draw op.
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum RecordedOp {
    /// A state op.
    State(StateOp),
    /// A draw op.
    Draw(DrawOp),
}

/// A backend that records every op instead of producing pixels.
///
/// `Recorder` is the reference implementation of [`Imaging`] used by the
/// workspace tests: tests register image assets with known sizes, drive the
/// compositor, and assert on the recorded op stream. It also tracks clip
/// nesting depth per target so tests can verify that clip pushes and pops
/// stay balanced across a frame.
#[derive(Clone, Debug, Default)]
pub struct Recorder {
    images: Vec<Size>,
    surfaces: HashMap<SurfaceId, Size>,
    ops: Vec<(Target, RecordedOp)>,
    screen_clip_depth: i32,
}

impl Recorder {
    /// Creates an empty recorder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers an image asset with the given size.
    #[expect(
        clippy::cast_possible_truncation,
        reason = "test backends register far fewer than 2^32 images"
    )]
    pub fn register_image(&mut self, size: Size) -> ImageId {
        let id = ImageId(self.images.len() as u32);
        self.images.push(size);
        id
    }

    /// Returns every recorded op with its target, in submission order.
    #[must_use]
    pub fn ops(&self) -> &[(Target, RecordedOp)] {
        &self.ops
    }

    /// Returns the ops recorded against the screen, in submission order.
    #[must_use]
    pub fn screen_ops(&self) -> Vec<RecordedOp> {
        self.ops_for(Target::Screen)
    }

    /// Returns the ops recorded against one surface, in submission order.
    #[must_use]
    pub fn surface_ops(&self, surface: SurfaceId) -> Vec<RecordedOp> {
        self.ops_for(Target::Surface(surface))
    }

    /// Returns the draw ops recorded against a target, skipping state ops.
    #[must_use]
    pub fn draws_for(&self, target: Target) -> Vec<DrawOp> {
        self.ops
            .iter()
            .filter(|(t, _)| *t == target)
            .filter_map(|(_, op)| match op {
                RecordedOp::Draw(d) => Some(*d),
                RecordedOp::State(_) => None,
            })
            .collect()
    }

    /// Returns the current size of a surface, if it was ever created.
    #[must_use]
    pub fn surface_size(&self, surface: SurfaceId) -> Option<Size> {
        self.surfaces.get(&surface).copied()
    }

    /// Returns the current clip nesting depth on the screen target.
    ///
    /// Zero after a well-formed frame; tests use this to catch unbalanced
    /// push/pop sequences.
    #[must_use]
    pub fn screen_clip_depth(&self) -> i32 {
        self.screen_clip_depth
    }

    /// Forgets recorded ops, keeping images and surfaces.
    pub fn clear_ops(&mut self) {
        self.ops.clear();
    }

    fn ops_for(&self, target: Target) -> Vec<RecordedOp> {
        self.ops
            .iter()
            .filter(|(t, _)| *t == target)
            .map(|(_, op)| *op)
            .collect()
    }
}

impl Imaging for Recorder {
    fn image_size(&self, image: ImageId) -> Size {
        self.images
            .get(image.0 as usize)
            .copied()
            .unwrap_or(Size::ZERO)
    }

    fn ensure_surface(&mut self, surface: SurfaceId, size: Size) {
        self.surfaces.insert(surface, size);
    }

    fn state(&mut self, target: Target, op: StateOp) {
        if target == Target::Screen {
            match op {
                StateOp::PushClip(_) => self.screen_clip_depth += 1,
                StateOp::PopClip => self.screen_clip_depth -= 1,
                StateOp::Translate(_) => {}
            }
        }
        self.ops.push((target, RecordedOp::State(op)));
    }

    fn draw(&mut self, target: Target, op: DrawOp) {
        self.ops.push((target, RecordedOp::Draw(op)));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use kurbo::{Point, Rect};
    use peniko::Color;

    #[test]
    fn records_ops_in_submission_order() {
        let mut rec = Recorder::new();
        let image = rec.register_image(Size::new(32.0, 32.0));

        rec.state(Target::Screen, StateOp::PushClip(Rect::ZERO));
        rec.draw(
            Target::Screen,
            DrawOp::Image {
                image,
                at: Point::new(1.0, 2.0),
            },
        );
        rec.state(Target::Screen, StateOp::PopClip);

        let ops = rec.screen_ops();
        assert_eq!(ops.len(), 3);
        assert!(matches!(ops[0], RecordedOp::State(StateOp::PushClip(_))));
        assert!(matches!(ops[1], RecordedOp::Draw(DrawOp::Image { .. })));
        assert_eq!(rec.screen_clip_depth(), 0);
    }

    #[test]
    fn targets_are_kept_separate() {
        let mut rec = Recorder::new();
        let surface = SurfaceId(7);
        rec.ensure_surface(surface, Size::new(256.0, 128.0));

        rec.draw(
            Target::Surface(surface),
            DrawOp::FillRect {
                rect: Rect::new(0.0, 0.0, 256.0, 128.0),
                color: Color::BLACK,
            },
        );

        assert!(rec.screen_ops().is_empty());
        assert_eq!(rec.surface_ops(surface).len(), 1);
        assert_eq!(rec.surface_size(surface), Some(Size::new(256.0, 128.0)));
    }

    #[test]
    fn unknown_image_size_is_zero() {
        let rec = Recorder::new();
        assert_eq!(rec.image_size(ImageId(99)), Size::ZERO);
    }
}
