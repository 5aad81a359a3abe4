//! Per-object publish/subscribe.
//!
//! Every emitting object (sheet, reel, controller, sequence, engine) owns an
//! [`Observers`] list for its own event type. There is no global registry:
//! to hear about something you subscribe on the object that emits it.
//!
//! Dispatch is synchronous. Handlers registered for an event kind run in
//! registration order. [`Observers::handlers`] returns a snapshot of the
//! matching handlers so that the emitter can release its own borrows before
//! calling out; handlers are then free to subscribe new handlers or mutate
//! the emitter's collections while the event is being delivered.
//!
//! An emitter that is itself held behind a `RefCell` can go one step further
//! and post its events to an [`Outbox`], release the borrow, and only then
//! [`flush`](Outbox::flush) it. Handlers then see the emitter unborrowed and
//! may call back into it.
//!
//! Subscriptions made with [`Observers::subscribe_weak`] only hold a weak
//! reference to their target; [`Observers::prune`] drops the ones whose target
//! is gone.
//!
//! # Example
//!
//! ```
//! use spritereel::events::animation::{AnimationEvent, AnimationEventKind};
//! use spritereel::events::observers::Observers;
//! use std::cell::Cell;
//! use std::rc::Rc;
//!
//! let finished = Rc::new(Cell::new(0));
//! let counter = finished.clone();
//!
//! let mut observers = Observers::<AnimationEvent>::new();
//! observers.subscribe(AnimationEventKind::Finished, move |_| {
//!     counter.set(counter.get() + 1);
//! });
//! observers.publish(&AnimationEvent::Finished {
//!     name: "idle".into(),
//!     cycles: 1,
//! });
//! assert_eq!(finished.get(), 1);
//! ```

use std::fmt;
use std::rc::{Rc, Weak};

use smallvec::SmallVec;

/// An event that can be routed by kind.
pub trait Event {
    /// Discriminant used to select subscribers.
    type Kind: Copy + Eq + fmt::Debug;

    /// Kind of this event value.
    fn kind(&self) -> Self::Kind;
}

/// Shared event callback.
pub type Handler<E> = Rc<dyn Fn(&E)>;

struct Entry<E: Event> {
    kind: E::Kind,
    handler: Handler<E>,
    alive: Option<Box<dyn Fn() -> bool>>,
}

impl<E: Event> Entry<E> {
    fn is_alive(&self) -> bool {
        self.alive.as_ref().is_none_or(|alive| alive())
    }
}

/// Ordered list of subscribers for one emitter.
pub struct Observers<E: Event> {
    entries: Vec<Entry<E>>,
}

impl<E: Event> Default for Observers<E> {
    fn default() -> Self {
        Self {
            entries: Vec::new(),
        }
    }
}

impl<E: Event> fmt::Debug for Observers<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Observers")
            .field("subscribers", &self.entries.len())
            .finish()
    }
}

impl<E: Event> Observers<E> {
    /// Create an empty subscriber list.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `handler` for events of `kind`.
    pub fn subscribe(&mut self, kind: E::Kind, handler: impl Fn(&E) + 'static) {
        self.entries.push(Entry {
            kind,
            handler: Rc::new(handler),
            alive: None,
        });
    }

    /// Register `handler` for events of `kind` on behalf of `target`.
    ///
    /// Only a weak reference to `target` is kept. Once it is dropped the
    /// handler is no longer called and the next [`prune`](Self::prune)
    /// removes the subscription.
    pub fn subscribe_weak<T: ?Sized + 'static>(
        &mut self,
        kind: E::Kind,
        target: &Rc<T>,
        handler: impl Fn(&T, &E) + 'static,
    ) where
        E: 'static,
    {
        let weak: Weak<T> = Rc::downgrade(target);
        let probe = weak.clone();
        self.entries.push(Entry {
            kind,
            handler: Rc::new(move |event: &E| {
                if let Some(target) = weak.upgrade() {
                    handler(&target, event);
                }
            }),
            alive: Some(Box::new(move || probe.strong_count() > 0)),
        });
    }

    /// Remove subscriptions whose weak target is gone. Returns how many were removed.
    pub fn prune(&mut self) -> usize {
        let before = self.entries.len();
        self.entries.retain(Entry::is_alive);
        before - self.entries.len()
    }

    /// Snapshot of the handlers registered for `kind`, in registration order.
    pub fn handlers(&self, kind: E::Kind) -> SmallVec<[Handler<E>; 4]> {
        self.entries
            .iter()
            .filter(|entry| entry.kind == kind)
            .map(|entry| Rc::clone(&entry.handler))
            .collect()
    }

    /// Deliver `event` to every handler subscribed to its kind.
    pub fn publish(&self, event: &E) {
        dispatch(self.handlers(event.kind()), event);
    }

    /// Number of subscribers across all kinds.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Call every handler of a previously taken snapshot.
pub fn dispatch<E>(handlers: impl IntoIterator<Item = Handler<E>>, event: &E) {
    for handler in handlers {
        handler(event);
    }
}

/// Events captured with their handler snapshots, delivered later.
#[derive(Default)]
pub struct Outbox {
    pending: Vec<Box<dyn FnOnce()>>,
}

impl fmt::Debug for Outbox {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Outbox")
            .field("pending", &self.pending.len())
            .finish()
    }
}

impl Outbox {
    pub fn new() -> Self {
        Self::default()
    }

    /// Capture the current subscribers of `event`'s kind on `observers`.
    pub fn post<E: Event + 'static>(&mut self, observers: &Observers<E>, event: E) {
        let handlers = observers.handlers(event.kind());
        if handlers.is_empty() {
            return;
        }
        self.pending.push(Box::new(move || dispatch(handlers, &event)));
    }

    /// Deliver every captured event, in posting order.
    pub fn flush(self) {
        for deliver in self.pending {
            deliver();
        }
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }
}
