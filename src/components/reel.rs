//! Reels: ordered frame rectangles over a sprite sheet.
//!
//! A reel is one animation strip. Its frames are same-size rectangles laid
//! out next to each other, left to right ([`Direction::Horizontal`]) or top
//! to bottom ([`Direction::Vertical`]), starting at an offset in the sheet
//! image. The index of a rectangle is its playback order.
//!
//! Reels are pure geometry; they know nothing about time or images. They are
//! loaded once and then shared, read-only, by every controller playing them.

use raylib::prelude::{Rectangle, Vector2};
use serde::{Deserialize, Serialize};

use crate::error::{AnimationError, Result};
use crate::events::observers::Observers;
use crate::events::spritesheet::{ReelEvent, ReelEventKind};

/// Axis along which consecutive frames are laid out.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    #[default]
    Horizontal,
    Vertical,
}

/// Rectangle of frame `index` for a strip starting at `offset`.
pub fn frame_rect(offset: Vector2, size: Vector2, direction: Direction, index: usize) -> Rectangle {
    let step = index as f32;
    let (x, y) = match direction {
        Direction::Horizontal => (offset.x + size.x * step, offset.y),
        Direction::Vertical => (offset.x, offset.y + size.y * step),
    };
    Rectangle {
        x,
        y,
        width: size.x,
        height: size.y,
    }
}

/// An ordered, immutable-once-loaded list of frame rectangles.
#[derive(Debug, Default)]
pub struct Reel {
    direction: Direction,
    rects: Vec<Rectangle>,
    loaded: bool,
    observers: Observers<ReelEvent>,
}

impl Reel {
    /// Create an empty, not yet loaded reel.
    pub fn new(direction: Direction) -> Self {
        Self {
            direction,
            ..Default::default()
        }
    }

    /// Create and load a reel in one step.
    pub fn build(direction: Direction, offset: Vector2, size: Vector2, frames: usize) -> Self {
        let mut reel = Self::new(direction);
        reel.fill(offset, size, frames);
        reel
    }

    /// Compute the frame rectangles and publish [`ReelEvent::Loaded`].
    ///
    /// `frames == 0` produces an empty reel. Loading is one-shot: a second
    /// call fails with [`AnimationError::ReelAlreadyLoaded`] and leaves the
    /// frames untouched.
    pub fn load(&mut self, offset: Vector2, size: Vector2, frames: usize) -> Result<()> {
        if self.loaded {
            return Err(AnimationError::ReelAlreadyLoaded {
                frames: self.rects.len(),
            });
        }
        self.fill(offset, size, frames);
        Ok(())
    }

    fn fill(&mut self, offset: Vector2, size: Vector2, frames: usize) {
        self.rects = (0..frames)
            .map(|index| frame_rect(offset, size, self.direction, index))
            .collect();
        self.loaded = true;
        self.observers.publish(&ReelEvent::Loaded { frames });
    }

    /// Subscribe to this reel's notifications. Only useful before `load`.
    pub fn subscribe(&mut self, kind: ReelEventKind, handler: impl Fn(&ReelEvent) + 'static) {
        self.observers.subscribe(kind, handler);
    }

    pub fn direction(&self) -> Direction {
        self.direction
    }

    pub fn rects(&self) -> &[Rectangle] {
        &self.rects
    }

    /// Frame rectangle at `index`, if it exists.
    pub fn rect(&self, index: usize) -> Option<Rectangle> {
        self.rects.get(index).copied()
    }

    pub fn frame_count(&self) -> usize {
        self.rects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rects.is_empty()
    }

    pub fn is_loaded(&self) -> bool {
        self.loaded
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;
    use std::rc::Rc;

    const EPSILON: f32 = 1e-6;

    fn assert_rect(r: Rectangle, x: f32, y: f32, w: f32, h: f32) {
        assert!((r.x - x).abs() < EPSILON, "x: {} != {}", r.x, x);
        assert!((r.y - y).abs() < EPSILON, "y: {} != {}", r.y, y);
        assert!((r.width - w).abs() < EPSILON, "width: {} != {}", r.width, w);
        assert!((r.height - h).abs() < EPSILON, "height: {} != {}", r.height, h);
    }

    #[test]
    fn horizontal_frames_step_along_x() {
        let reel = Reel::build(
            Direction::Horizontal,
            Vector2::new(10.0, 64.0),
            Vector2::new(32.0, 48.0),
            4,
        );
        assert_eq!(reel.frame_count(), 4);
        for (i, r) in reel.rects().iter().enumerate() {
            assert_rect(*r, 10.0 + i as f32 * 32.0, 64.0, 32.0, 48.0);
        }
    }

    #[test]
    fn vertical_frames_step_along_y() {
        let reel = Reel::build(
            Direction::Vertical,
            Vector2::new(128.0, 0.0),
            Vector2::new(16.0, 24.0),
            3,
        );
        assert_rect(reel.rect(0).unwrap(), 128.0, 0.0, 16.0, 24.0);
        assert_rect(reel.rect(1).unwrap(), 128.0, 24.0, 16.0, 24.0);
        assert_rect(reel.rect(2).unwrap(), 128.0, 48.0, 16.0, 24.0);
        assert!(reel.rect(3).is_none());
    }

    #[test]
    fn zero_frames_is_an_empty_reel() {
        let reel = Reel::build(Direction::Horizontal, Vector2::zero(), Vector2::new(8.0, 8.0), 0);
        assert!(reel.is_empty());
        assert!(reel.is_loaded());
    }

    #[test]
    fn load_notifies_and_is_one_shot() {
        let loaded = Rc::new(Cell::new(None));
        let seen = loaded.clone();
        let mut reel = Reel::new(Direction::Horizontal);
        reel.subscribe(ReelEventKind::Loaded, move |ev| {
            let ReelEvent::Loaded { frames } = ev;
            seen.set(Some(*frames));
        });
        assert!(!reel.is_loaded());

        reel.load(Vector2::zero(), Vector2::new(64.0, 64.0), 5).unwrap();
        assert_eq!(loaded.get(), Some(5));

        let err = reel
            .load(Vector2::zero(), Vector2::new(64.0, 64.0), 2)
            .unwrap_err();
        assert!(matches!(err, AnimationError::ReelAlreadyLoaded { frames: 5 }));
        assert_eq!(reel.frame_count(), 5);
    }
}
