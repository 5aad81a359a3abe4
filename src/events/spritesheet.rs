//! Sprite sheet and reel notifications.

use std::rc::Rc;

use crate::components::reel::Reel;
use crate::events::observers::Event;

/// Event emitted by a [`SpriteSheet`](crate::resources::spritesheet::SpriteSheet).
#[derive(Debug, Clone)]
pub enum SheetEvent {
    /// A reel was registered under `name` (possibly replacing an older one).
    ReelAdded {
        /// Registration name.
        name: String,
        /// The stored reel.
        reel: Rc<Reel>,
    },
}

/// Discriminant of [`SheetEvent`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SheetEventKind {
    ReelAdded,
}

impl Event for SheetEvent {
    type Kind = SheetEventKind;

    fn kind(&self) -> SheetEventKind {
        match self {
            SheetEvent::ReelAdded { .. } => SheetEventKind::ReelAdded,
        }
    }
}

/// Event emitted by a [`Reel`] once its frames are computed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReelEvent {
    Loaded {
        /// Number of frame rectangles produced.
        frames: usize,
    },
}

/// Discriminant of [`ReelEvent`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ReelEventKind {
    Loaded,
}

impl Event for ReelEvent {
    type Kind = ReelEventKind;

    fn kind(&self) -> ReelEventKind {
        match self {
            ReelEvent::Loaded { .. } => ReelEventKind::Loaded,
        }
    }
}
