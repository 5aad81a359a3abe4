//! Binding point between a sprite sheet, its controllers and the host loop.
//!
//! An [`AnimationView`] listens to its sheet's
//! [`ReelAdded`](crate::events::spritesheet::SheetEvent::ReelAdded)
//! notification and creates one [`AnimationController`] per registered
//! reel. Only reels registered *after* the view was created get a
//! controller; a view created on a sheet that already has reels starts with
//! none of them. Register reels after creating the view.
//!
//! The view is a cheap handle (`Clone`) over shared state, because both the
//! sheet's subscription and the engine's tick subscription need to reach it.
//! Those subscriptions hold weak references, so dropping every handle ends
//! the view.
//!
//! Controllers are handed out as [`ControllerHandle`]s so callers can move
//! them (`position`) or subscribe to their events. Updating iterates over a
//! snapshot of the controller list; a controller that is borrowed elsewhere
//! while the view updates or renders is skipped with a warning.
//!
//! Events raised while the view advances its sequence or a controller are
//! delivered after the view has released both, so handlers may call back
//! into the view: hand a sequence over with
//! [`with_sequence`](AnimationView::with_sequence), restart a reel with
//! [`start_animation`](AnimationView::start_animation) or register new
//! reels on the sheet.

use std::cell::{Cell, RefCell};
use std::rc::{Rc, Weak};

use log::{debug, warn};
use raylib::prelude::Vector2;

use crate::components::animationcontroller::AnimationController;
use crate::components::animationsequence::AnimationSequence;
use crate::engine::TickSource;
use crate::events::observers::Outbox;
use crate::events::spritesheet::{SheetEvent, SheetEventKind};
use crate::resources::spritesheet::{SheetImage, SpriteSheet};
use crate::systems::render::{Canvas, frame_destination};

/// Shared, mutable access to a controller owned by a view.
pub type ControllerHandle = Rc<RefCell<AnimationController>>;

#[derive(Clone)]
struct Slot {
    name: String,
    handle: ControllerHandle,
}

struct ViewState<I> {
    controllers: Vec<Slot>,
    sequence: Option<AnimationSequence<I>>,
    position: Vector2,
}

/// Drives and draws every controller of one sprite sheet.
pub struct AnimationView<I: 'static> {
    sheet: Rc<SpriteSheet<I>>,
    state: Rc<RefCell<ViewState<I>>>,
    hooked: Rc<Cell<bool>>,
}

impl<I: 'static> Clone for AnimationView<I> {
    fn clone(&self) -> Self {
        Self {
            sheet: Rc::clone(&self.sheet),
            state: Rc::clone(&self.state),
            hooked: Rc::clone(&self.hooked),
        }
    }
}

impl<I: SheetImage + 'static> AnimationView<I> {
    /// Create a view and subscribe it to reel registrations on `sheet`.
    pub fn new(sheet: Rc<SpriteSheet<I>>) -> Self {
        let state = Rc::new(RefCell::new(ViewState {
            controllers: Vec::new(),
            sequence: None,
            position: Vector2::zero(),
        }));

        let weak: Weak<RefCell<ViewState<I>>> = Rc::downgrade(&state);
        sheet.subscribe(SheetEventKind::ReelAdded, move |event| {
            let SheetEvent::ReelAdded { name, reel } = event;
            let Some(state) = weak.upgrade() else {
                return;
            };
            let controller = AnimationController::from_reel(name.clone(), Rc::clone(reel));
            match state.try_borrow_mut() {
                Ok(mut state) => {
                    state.controllers.push(Slot {
                        name: name.clone(),
                        handle: Rc::new(RefCell::new(controller)),
                    });
                    debug!("View created controller for reel '{}'", name);
                }
                Err(_) => warn!("View busy, no controller created for reel '{}'", name),
            }
        });

        Self {
            sheet,
            state,
            hooked: Rc::new(Cell::new(false)),
        }
    }

    /// Advance the sequence and every controller by `elapsed` milliseconds.
    pub fn update(&self, elapsed: f32) {
        update_state(&self.state, elapsed);
    }

    /// Draw the active frames onto `canvas`, hooking into `engine` on first use.
    ///
    /// Returns the number of frames drawn.
    pub fn render<T, C>(&self, engine: &mut T, canvas: &mut C) -> usize
    where
        T: TickSource,
        C: Canvas<I>,
    {
        self.hook_animation_loop(engine);

        let state = self.state.borrow();
        let mut drawn = 0;

        if let Some(sequence) = &state.sequence {
            if let Some(controller) = sequence.current_controller() {
                if draw_controller(sequence.sheet(), controller, state.position, canvas) {
                    drawn += 1;
                }
            }
        }

        for slot in &state.controllers {
            match slot.handle.try_borrow() {
                Ok(controller) => {
                    if draw_controller(&self.sheet, &controller, state.position, canvas) {
                        drawn += 1;
                    }
                }
                Err(_) => warn!("Controller borrowed during render, skipped"),
            }
        }
        drawn
    }

    /// Subscribe this view's `update` to `engine` ticks, once.
    pub fn hook_animation_loop<T: TickSource>(&self, engine: &mut T) {
        if self.hooked.get() {
            return;
        }
        engine.subscribe_tick_weak(&self.state, |state, tick| {
            update_state(state, tick.elapsed_ms);
        });
        self.hooked.set(true);
        debug!("View hooked into the tick loop");
    }

    /// Start every controller playing reel `name`. Returns how many were started.
    pub fn start_animation(&self, name: &str, frame_duration: f32, repeats: u32) -> usize {
        self.for_each_named(name, |c, outbox| {
            c.start_deferred(frame_duration, repeats, outbox)
        })
    }

    /// Stop every controller playing reel `name`. Returns how many matched.
    pub fn stop_animation(&self, name: &str) -> usize {
        self.for_each_named(name, AnimationController::stop_deferred)
    }

    /// All controllers playing reel `name`, in creation order.
    pub fn controllers(&self, name: &str) -> Vec<ControllerHandle> {
        self.snapshot()
            .into_iter()
            .filter(|slot| slot.name == name)
            .map(|slot| slot.handle)
            .collect()
    }

    /// Install the sequence drawn and updated alongside the controllers.
    pub fn set_sequence(&self, sequence: AnimationSequence<I>) {
        self.state.borrow_mut().sequence = Some(sequence);
    }

    /// Remove and return the sequence.
    pub fn take_sequence(&self) -> Option<AnimationSequence<I>> {
        self.state.borrow_mut().sequence.take()
    }

    /// Run `f` against the installed sequence, if any.
    ///
    /// The sequence is lifted out of the view while `f` runs, so `f` and the
    /// handlers it triggers can use the rest of the view. A nested call sees
    /// no sequence. If `f` installs a replacement, the replacement is kept.
    pub fn with_sequence<R>(&self, f: impl FnOnce(&mut AnimationSequence<I>) -> R) -> Option<R> {
        let mut sequence = self.state.borrow_mut().sequence.take()?;
        let result = f(&mut sequence);
        let mut state = self.state.borrow_mut();
        if state.sequence.is_none() {
            state.sequence = Some(sequence);
        }
        Some(result)
    }

    pub fn position(&self) -> Vector2 {
        self.state.borrow().position
    }

    pub fn set_position(&self, position: Vector2) {
        self.state.borrow_mut().position = position;
    }

    pub fn controller_count(&self) -> usize {
        self.state.borrow().controllers.len()
    }

    pub fn is_hooked(&self) -> bool {
        self.hooked.get()
    }

    pub fn sheet(&self) -> &Rc<SpriteSheet<I>> {
        &self.sheet
    }

    fn snapshot(&self) -> Vec<Slot> {
        self.state.borrow().controllers.clone()
    }

    fn for_each_named(
        &self,
        name: &str,
        mut f: impl FnMut(&mut AnimationController, &mut Outbox),
    ) -> usize {
        let mut matched = 0;
        for slot in self.snapshot().into_iter().filter(|slot| slot.name == name) {
            let mut outbox = Outbox::new();
            match slot.handle.try_borrow_mut() {
                Ok(mut controller) => {
                    f(&mut controller, &mut outbox);
                    matched += 1;
                }
                Err(_) => warn!("Controller '{}' busy, skipped", name),
            }
            outbox.flush();
        }
        matched
    }
}

fn update_state<I: SheetImage>(state: &RefCell<ViewState<I>>, elapsed: f32) {
    let mut outbox = Outbox::new();
    match state.try_borrow_mut() {
        Ok(mut state) => {
            if let Some(sequence) = state.sequence.as_mut() {
                sequence.update_deferred(elapsed, &mut outbox);
            }
        }
        Err(_) => warn!("View busy, sequence update skipped"),
    }
    outbox.flush();

    let controllers = match state.try_borrow() {
        Ok(state) => state.controllers.clone(),
        Err(_) => {
            warn!("View busy, controller update skipped");
            return;
        }
    };
    for slot in controllers {
        let mut outbox = Outbox::new();
        match slot.handle.try_borrow_mut() {
            Ok(mut controller) => controller.update_deferred(elapsed, &mut outbox),
            Err(_) => warn!("Controller '{}' busy, update skipped", slot.name),
        }
        outbox.flush();
    }
}

fn draw_controller<I: SheetImage, C: Canvas<I>>(
    sheet: &SpriteSheet<I>,
    controller: &AnimationController,
    view_position: Vector2,
    canvas: &mut C,
) -> bool {
    if !controller.is_active() {
        return false;
    }
    let Some(frame) = controller.current_frame() else {
        return false;
    };
    match sheet.subsurface(frame) {
        Ok(src) => {
            let dest = frame_destination(view_position, controller.position, src);
            canvas.blit(sheet.image(), src, dest);
            true
        }
        Err(e) => {
            warn!("Animation '{}' not drawn: {}", controller.name(), e);
            false
        }
    }
}
