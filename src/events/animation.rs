//! Playback lifecycle events.
//!
//! [`AnimationEvent`]s are published by
//! [`AnimationController`](crate::components::animationcontroller::AnimationController)
//! and [`SequenceEvent`]s by
//! [`AnimationSequence`](crate::components::animationsequence::AnimationSequence).
//!
//! When a controller exhausts its repeat limit it publishes `Stopped`
//! followed by `Finished`; an explicit `stop()` only publishes `Stopped`.

use crate::events::observers::Event;

/// Event emitted by an animation controller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AnimationEvent {
    /// Playback was (re)started from the first frame.
    Started {
        /// Reel the controller plays.
        name: String,
    },
    /// Playback went from playing to stopped.
    Stopped {
        /// Reel the controller plays.
        name: String,
    },
    /// The repeat limit was exhausted.
    Finished {
        /// Reel the controller plays.
        name: String,
        /// Completed cycles at the moment playback ended.
        cycles: u32,
    },
}

/// Discriminant of [`AnimationEvent`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AnimationEventKind {
    Started,
    Stopped,
    Finished,
}

impl Event for AnimationEvent {
    type Kind = AnimationEventKind;

    fn kind(&self) -> AnimationEventKind {
        match self {
            AnimationEvent::Started { .. } => AnimationEventKind::Started,
            AnimationEvent::Stopped { .. } => AnimationEventKind::Stopped,
            AnimationEvent::Finished { .. } => AnimationEventKind::Finished,
        }
    }
}

impl AnimationEvent {
    /// Name of the reel whose controller emitted the event.
    pub fn name(&self) -> &str {
        match self {
            AnimationEvent::Started { name }
            | AnimationEvent::Stopped { name }
            | AnimationEvent::Finished { name, .. } => name,
        }
    }
}

/// Event emitted by an animation sequence.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SequenceEvent {
    /// The playing entry ended and the sequence now points at `position`.
    ///
    /// The controller at `position` has not been started; this is the point
    /// where an observer hands playback over to it.
    Advanced {
        /// New position in the sequence.
        position: usize,
        /// Reel name of the entry at `position`.
        name: String,
    },
    /// The last entry ended; the sequence is inactive.
    Finished,
}

/// Discriminant of [`SequenceEvent`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SequenceEventKind {
    Advanced,
    Finished,
}

impl Event for SequenceEvent {
    type Kind = SequenceEventKind;

    fn kind(&self) -> SequenceEventKind {
        match self {
            SequenceEvent::Advanced { .. } => SequenceEventKind::Advanced,
            SequenceEvent::Finished => SequenceEventKind::Finished,
        }
    }
}
