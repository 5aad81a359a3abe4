//! Ordered chain of animations over one sprite sheet.
//!
//! An [`AnimationSequence`] plays its entries one at a time. Each entry
//! records its own frame duration and repeat limit when it is added.
//!
//! When the playing entry stops, the sequence moves its position forward by
//! one and publishes [`SequenceEvent::Advanced`]. It does **not** start the
//! next controller: whoever drives the sequence decides when the next entry
//! begins by calling [`AnimationSequence::start_current`]. A sequence owned
//! directly is handed over after `update` returns, once the position has
//! been inspected. A sequence installed on an
//! [`AnimationView`](crate::components::animationview::AnimationView) is
//! updated with its events held back until the view is released, so an
//! `Advanced` handler can call `view.with_sequence(|s| s.start_current())`.
//! An entry that is
//! never started is skipped on the following update, because an inactive
//! controller counts as ended. After the last entry the sequence becomes
//! inactive and publishes [`SequenceEvent::Finished`]. The position never
//! wraps; call [`AnimationSequence::start`] to play again.

use std::rc::Rc;

use log::debug;

use crate::components::animationcontroller::AnimationController;
use crate::error::{AnimationError, Result};
use crate::events::animation::{SequenceEvent, SequenceEventKind};
use crate::events::observers::{Observers, Outbox};
use crate::resources::spritesheet::{SheetImage, SpriteSheet};

#[derive(Debug)]
struct SequenceEntry {
    controller: AnimationController,
    frame_duration: f32,
    repeats: u32,
}

impl SequenceEntry {
    fn start(&mut self) {
        self.controller.start(self.frame_duration, self.repeats);
    }
}

/// Plays a fixed list of animations back to back.
pub struct AnimationSequence<I> {
    sheet: Rc<SpriteSheet<I>>,
    entries: Vec<SequenceEntry>,
    current: usize,
    active: bool,
    observers: Observers<SequenceEvent>,
}

impl<I: SheetImage> AnimationSequence<I> {
    pub fn new(sheet: Rc<SpriteSheet<I>>) -> Self {
        Self {
            sheet,
            entries: Vec::new(),
            current: 0,
            active: false,
            observers: Observers::new(),
        }
    }

    /// Append a controller for reel `name` with its start arguments.
    pub fn add_animation(
        &mut self,
        name: impl Into<String>,
        frame_duration: f32,
        repeats: u32,
    ) -> Result<()> {
        let controller = AnimationController::new(&self.sheet, name)?;
        self.entries.push(SequenceEntry {
            controller,
            frame_duration,
            repeats,
        });
        Ok(())
    }

    /// Rewind to the first entry and start it.
    pub fn start(&mut self) -> Result<()> {
        if self.entries.is_empty() {
            return Err(AnimationError::EmptySequence);
        }
        if self.current != 0 {
            if let Some(entry) = self.entries.get_mut(self.current) {
                entry.controller.stop();
            }
        }
        self.current = 0;
        self.entries[0].start();
        self.active = true;
        Ok(())
    }

    /// Start the entry at the current position with its recorded arguments.
    ///
    /// Returns `false` when the sequence already ran past its last entry.
    pub fn start_current(&mut self) -> bool {
        match self.entries.get_mut(self.current) {
            Some(entry) => {
                entry.start();
                self.active = true;
                true
            }
            None => false,
        }
    }

    /// Advance the playing entry by `elapsed` milliseconds.
    pub fn update(&mut self, elapsed: f32) {
        let mut outbox = Outbox::new();
        self.update_deferred(elapsed, &mut outbox);
        outbox.flush();
    }

    /// [`update`](Self::update), posting every event (the entry's own
    /// included) to `outbox` instead of publishing it.
    pub(crate) fn update_deferred(&mut self, elapsed: f32, outbox: &mut Outbox) {
        if !self.active {
            return;
        }
        let Some(entry) = self.entries.get_mut(self.current) else {
            self.active = false;
            return;
        };

        entry.controller.update_deferred(elapsed, outbox);
        if entry.controller.is_active() {
            return;
        }

        self.current += 1;
        match self.entries.get(self.current) {
            Some(next) => {
                debug!(
                    "Sequence advanced to {} ('{}')",
                    self.current,
                    next.controller.name()
                );
                let event = SequenceEvent::Advanced {
                    position: self.current,
                    name: next.controller.name().to_string(),
                };
                outbox.post(&self.observers, event);
            }
            None => {
                self.active = false;
                debug!("Sequence finished after {} animations", self.entries.len());
                outbox.post(&self.observers, SequenceEvent::Finished);
            }
        }
    }

    /// Controller at the current position, if the sequence has not run past its end.
    pub fn current_controller(&self) -> Option<&AnimationController> {
        self.entries.get(self.current).map(|e| &e.controller)
    }

    pub fn current_controller_mut(&mut self) -> Option<&mut AnimationController> {
        self.entries.get_mut(self.current).map(|e| &mut e.controller)
    }

    /// Controller of entry `index`.
    pub fn controller(&self, index: usize) -> Option<&AnimationController> {
        self.entries.get(index).map(|e| &e.controller)
    }

    pub fn current_position(&self) -> usize {
        self.current
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn sheet(&self) -> &Rc<SpriteSheet<I>> {
        &self.sheet
    }

    /// Subscribe to sequence notifications.
    pub fn subscribe(&mut self, kind: SequenceEventKind, handler: impl Fn(&SequenceEvent) + 'static) {
        self.observers.subscribe(kind, handler);
    }
}
