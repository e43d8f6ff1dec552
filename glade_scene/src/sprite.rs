// Copyright 2025 the Glade Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Sprites and the generational arena that owns them.

use alloc::vec::Vec;

use glade_imaging::ImageId;
use kurbo::Rect;

/// Generational handle of a sprite in an [`ObjectLayer`](crate::ObjectLayer).
///
/// Stable across updates to the sprite, stale after removal. A stale id
/// never aliases a different live sprite because the slot generation must
/// match; lookups with a stale id simply return `None`.
///
/// The generation increments on slot reuse and never decreases. `u32` is
/// ample for practical lifetimes; behavior on generation overflow is
/// unspecified.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub struct SpriteId(pub(crate) u32, pub(crate) u32);

impl SpriteId {
    pub(crate) const fn new(idx: u32, generation: u32) -> Self {
        Self(idx, generation)
    }

    pub(crate) const fn idx(self) -> usize {
        self.0 as usize
    }
}

bitflags::bitflags! {
    /// Sprite flags controlling visibility and picking.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
    pub struct SpriteFlags: u8 {
        /// Sprite is visible (participates in drawing).
        const VISIBLE  = 0b0000_0001;
        /// Sprite is pickable (participates in hit testing).
        const PICKABLE = 0b0000_0010;
    }
}

impl Default for SpriteFlags {
    fn default() -> Self {
        Self::VISIBLE | Self::PICKABLE
    }
}

/// A world object: axis-aligned bounds, an optional image, and flags.
///
/// Bounds are world-absolute. Zero-size bounds are legal — a point object
/// participates in clustering (it lands in exactly one cell) but can never
/// be hit-tested.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Sprite {
    /// World-space bounds.
    pub bounds: Rect,
    /// Image drawn at the bounds origin, if any.
    pub image: Option<ImageId>,
    /// Visibility and picking flags.
    pub flags: SpriteFlags,
}

impl Sprite {
    /// Creates a visible, pickable sprite without an image.
    #[must_use]
    pub fn new(bounds: Rect) -> Self {
        Self {
            bounds,
            image: None,
            flags: SpriteFlags::default(),
        }
    }

    /// Creates a visible, pickable sprite drawn from an image.
    #[must_use]
    pub fn with_image(bounds: Rect, image: ImageId) -> Self {
        Self {
            bounds,
            image: Some(image),
            flags: SpriteFlags::default(),
        }
    }
}

#[derive(Debug)]
struct Slot {
    generation: u32,
    sprite: Option<Sprite>,
}

/// Dense slot arena with free-list reuse and generation bumping.
#[derive(Debug, Default)]
pub(crate) struct SpriteArena {
    slots: Vec<Slot>,
    free: Vec<u32>,
    len: usize,
}

impl SpriteArena {
    #[expect(
        clippy::cast_possible_truncation,
        reason = "slot counts stay far below 2^32"
    )]
    pub(crate) fn insert(&mut self, sprite: Sprite) -> SpriteId {
        self.len += 1;
        if let Some(idx) = self.free.pop() {
            let slot = &mut self.slots[idx as usize];
            slot.sprite = Some(sprite);
            SpriteId::new(idx, slot.generation)
        } else {
            let idx = self.slots.len() as u32;
            self.slots.push(Slot {
                generation: 0,
                sprite: Some(sprite),
            });
            SpriteId::new(idx, 0)
        }
    }

    pub(crate) fn remove(&mut self, id: SpriteId) -> Option<Sprite> {
        let slot = self.slots.get_mut(id.idx())?;
        if slot.generation != id.1 {
            return None;
        }
        let sprite = slot.sprite.take()?;
        slot.generation += 1;
        self.free.push(id.0);
        self.len -= 1;
        Some(sprite)
    }

    pub(crate) fn get(&self, id: SpriteId) -> Option<&Sprite> {
        let slot = self.slots.get(id.idx())?;
        if slot.generation != id.1 {
            return None;
        }
        slot.sprite.as_ref()
    }

    pub(crate) fn get_mut(&mut self, id: SpriteId) -> Option<&mut Sprite> {
        let slot = self.slots.get_mut(id.idx())?;
        if slot.generation != id.1 {
            return None;
        }
        slot.sprite.as_mut()
    }

    pub(crate) fn is_alive(&self, id: SpriteId) -> bool {
        self.get(id).is_some()
    }

    #[expect(
        clippy::cast_possible_truncation,
        reason = "slot counts stay far below 2^32"
    )]
    pub(crate) fn iter(&self) -> impl Iterator<Item = (SpriteId, &Sprite)> {
        self.slots.iter().enumerate().filter_map(|(idx, slot)| {
            slot.sprite
                .as_ref()
                .map(|sprite| (SpriteId::new(idx as u32, slot.generation), sprite))
        })
    }

    pub(crate) fn len(&self) -> usize {
        self.len
    }
}
