//! Host loop tick.
//!
//! The [`Engine`](crate::engine::Engine) publishes one [`TickEvent`] per
//! frame after advancing [`WorldTime`](crate::resources::worldtime::WorldTime).
//! Elapsed time is delivered in milliseconds, already scaled by
//! `time_scale`.

use crate::events::observers::Event;

/// One frame step of the host loop.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TickEvent {
    /// Scaled time since the previous tick, in milliseconds.
    pub elapsed_ms: f32,
    /// Frame counter after this tick (first tick is frame 1).
    pub frame: u64,
}

/// Discriminant of [`TickEvent`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TickEventKind {
    Tick,
}

impl Event for TickEvent {
    type Kind = TickEventKind;

    fn kind(&self) -> TickEventKind {
        TickEventKind::Tick
    }
}
