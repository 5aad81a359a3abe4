//! Playback state machine for a single reel.
//!
//! An [`AnimationController`] walks the frames of one [`Reel`] as external
//! ticks deliver elapsed milliseconds. It has no clock of its own, so the
//! same sequence of ticks always produces the same frames.
//!
//! # States
//!
//! ```text
//! Idle --start--> Playing --stop / repeat limit--> Stopped --start--> Playing
//! ```
//!
//! `start` can be called in any state and always rewinds to frame 0.
//! `resume` reactivates without rewinding.
//!
//! # Timing
//!
//! Elapsed time is accumulated per frame. The threshold check happens
//! *before* the current tick's time is added, so a frame change lags one
//! tick behind the moment the accumulated time crosses `frame_duration`.
//! With a 100 ms frame duration and 100 ms ticks the frame advances on the
//! second tick, not the first.
//!
//! # Repeats
//!
//! A cycle is counted every time playback reaches the last frame. With a
//! repeat limit of `R` the controller allows `R + 1` cycles and then stops,
//! publishing [`AnimationEvent::Stopped`] and [`AnimationEvent::Finished`].
//! `repeats = 0` plays the reel once.

use std::rc::Rc;

use log::debug;
use raylib::prelude::{Rectangle, Vector2};

use crate::components::reel::Reel;
use crate::error::Result;
use crate::events::animation::{AnimationEvent, AnimationEventKind};
use crate::events::observers::{Observers, Outbox};
use crate::resources::spritesheet::{SheetImage, SpriteSheet};

/// Coarse lifecycle state of a controller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlaybackState {
    /// Constructed, never started.
    Idle,
    Playing,
    /// Stopped explicitly or by exhausting the repeat limit.
    Stopped,
}

/// Runtime playback state for one reel.
#[derive(Debug)]
pub struct AnimationController {
    name: String,
    reel: Rc<Reel>,
    /// Screen offset added to the owning view's position when drawn.
    pub position: Vector2,
    active: bool,
    started: bool,
    current: usize,
    frame_duration: f32,
    time_since_last_frame_change: f32,
    count: u32,
    repeats: u32,
    observers: Observers<AnimationEvent>,
}

impl AnimationController {
    /// Bind a controller to the reel registered as `name` on `sheet`.
    ///
    /// Fails with [`ReelNotFound`](crate::error::AnimationError::ReelNotFound)
    /// when the sheet has no such reel.
    pub fn new<I: SheetImage>(sheet: &SpriteSheet<I>, name: impl Into<String>) -> Result<Self> {
        let name = name.into();
        let reel = sheet.get_reel(&name)?;
        Ok(Self::from_reel(name, reel))
    }

    /// Bind a controller to an already resolved reel.
    pub fn from_reel(name: impl Into<String>, reel: Rc<Reel>) -> Self {
        Self {
            name: name.into(),
            reel,
            position: Vector2::zero(),
            active: false,
            started: false,
            current: 0,
            frame_duration: 0.0,
            time_since_last_frame_change: 0.0,
            count: 0,
            repeats: 0,
            observers: Observers::new(),
        }
    }

    /// Rewind to the first frame and start playing.
    pub fn start(&mut self, frame_duration: f32, repeats: u32) {
        let mut outbox = Outbox::new();
        self.start_deferred(frame_duration, repeats, &mut outbox);
        outbox.flush();
    }

    /// Stop playing. Calling it on a stopped controller does nothing.
    pub fn stop(&mut self) {
        let mut outbox = Outbox::new();
        self.stop_deferred(&mut outbox);
        outbox.flush();
    }

    /// Continue playing from the current frame without resetting counters.
    pub fn resume(&mut self) {
        self.active = true;
    }

    /// Advance playback by `elapsed` milliseconds.
    pub fn update(&mut self, elapsed: f32) {
        let mut outbox = Outbox::new();
        self.update_deferred(elapsed, &mut outbox);
        outbox.flush();
    }

    /// [`start`](Self::start), posting `Started` to `outbox` instead of publishing it.
    pub(crate) fn start_deferred(&mut self, frame_duration: f32, repeats: u32, outbox: &mut Outbox) {
        self.current = 0;
        self.frame_duration = frame_duration;
        self.time_since_last_frame_change = 0.0;
        self.count = 0;
        self.repeats = repeats;
        self.started = true;
        self.resume();
        debug!(
            "Animation '{}' started ({} ms/frame, {} repeats)",
            self.name, frame_duration, repeats
        );
        outbox.post(
            &self.observers,
            AnimationEvent::Started {
                name: self.name.clone(),
            },
        );
    }

    pub(crate) fn stop_deferred(&mut self, outbox: &mut Outbox) {
        if !self.active {
            return;
        }
        self.active = false;
        debug!("Animation '{}' stopped on frame {}", self.name, self.current);
        outbox.post(
            &self.observers,
            AnimationEvent::Stopped {
                name: self.name.clone(),
            },
        );
    }

    pub(crate) fn update_deferred(&mut self, elapsed: f32, outbox: &mut Outbox) {
        let last = self.reel.frame_count();
        if !self.active || self.count > self.repeats || last == 0 {
            return;
        }

        if self.time_since_last_frame_change >= self.frame_duration {
            self.current = (self.current + 1) % last;
            self.time_since_last_frame_change = 0.0;

            if self.current == last - 1 {
                self.count += 1;

                if self.count > self.repeats {
                    self.stop_deferred(outbox);
                    outbox.post(
                        &self.observers,
                        AnimationEvent::Finished {
                            name: self.name.clone(),
                            cycles: self.count,
                        },
                    );
                }
            }
        }

        self.time_since_last_frame_change += elapsed.max(0.0);
    }

    /// Rectangle of the frame currently shown. `None` only for empty reels.
    pub fn current_frame(&self) -> Option<Rectangle> {
        self.reel.rect(self.current)
    }

    /// Subscribe to this controller's lifecycle events.
    pub fn subscribe(
        &mut self,
        kind: AnimationEventKind,
        handler: impl Fn(&AnimationEvent) + 'static,
    ) {
        self.observers.subscribe(kind, handler);
    }

    /// Where the controller is in its lifecycle.
    pub fn state(&self) -> PlaybackState {
        match (self.active, self.started) {
            (true, _) => PlaybackState::Playing,
            (false, true) => PlaybackState::Stopped,
            (false, false) => PlaybackState::Idle,
        }
    }

    /// Name of the reel this controller plays.
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn reel(&self) -> &Rc<Reel> {
        &self.reel
    }

    /// Whether the controller is currently playing.
    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn current_index(&self) -> usize {
        self.current
    }

    /// Cycles completed since the last `start`.
    pub fn completed_cycles(&self) -> u32 {
        self.count
    }

    pub fn repeats(&self) -> u32 {
        self.repeats
    }

    /// Frame duration in milliseconds.
    pub fn frame_duration(&self) -> f32 {
        self.frame_duration
    }
}
