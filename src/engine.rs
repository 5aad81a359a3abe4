//! Host loop that drives animation views.
//!
//! The [`Engine`] keeps the simulation clock in a bevy_ecs [`World`] as a
//! [`WorldTime`] resource. Each call to [`Engine::tick`] advances the clock
//! with the frame delta and publishes a [`TickEvent`] carrying the scaled
//! elapsed time in milliseconds.
//!
//! Views hook themselves into the tick through the [`TickSource`] trait the
//! first time they render, so an application only has to:
//!
//! 1. call `engine.tick(rl.get_frame_time())` once per frame, and
//! 2. call `view.render(&mut engine, &mut draw_handle)` inside its drawing scope.

use std::rc::Rc;

use bevy_ecs::prelude::*;
use log::debug;

use crate::events::observers::Observers;
use crate::events::tick::{TickEvent, TickEventKind};
use crate::resources::gameconfig::GameConfig;
use crate::resources::worldtime::WorldTime;
use crate::systems::time::update_world_time;

/// Anything that delivers per-frame ticks to subscribers.
pub trait TickSource {
    /// Call `handler` on every tick, in subscription order.
    fn subscribe_tick(&mut self, handler: impl Fn(&TickEvent) + 'static);

    /// Call `handler` with `target` on every tick for as long as `target` lives.
    ///
    /// Only a weak reference is kept, so the subscription does not keep
    /// `target` alive and is dropped once `target` is.
    fn subscribe_tick_weak<T: 'static>(
        &mut self,
        target: &Rc<T>,
        handler: impl Fn(&T, &TickEvent) + 'static,
    );
}

/// Minimal host loop: clock, configuration and tick subscribers.
pub struct Engine {
    world: World,
    tick_observers: Observers<TickEvent>,
}

impl Default for Engine {
    fn default() -> Self {
        Self::new()
    }
}

impl Engine {
    /// Create an engine with a fresh clock and default configuration.
    pub fn new() -> Self {
        Self::with_config(GameConfig::new())
    }

    /// Create an engine owning `config` as a world resource.
    pub fn with_config(config: GameConfig) -> Self {
        let mut world = World::new();
        world.insert_resource(WorldTime::default().with_time_scale(config.time_scale));
        world.insert_resource(config);
        Self {
            world,
            tick_observers: Observers::new(),
        }
    }

    /// Advance the clock by `dt` seconds and notify tick subscribers.
    pub fn tick(&mut self, dt: f32) -> TickEvent {
        update_world_time(&mut self.world, dt);
        let time = self.time();
        let event = TickEvent {
            elapsed_ms: time.delta_ms(),
            frame: time.frame_count,
        };
        self.tick_observers.publish(&event);
        let pruned = self.tick_observers.prune();
        if pruned > 0 {
            debug!("Dropped {} tick subscribers whose target is gone", pruned);
        }
        event
    }

    /// Current clock state.
    pub fn time(&self) -> WorldTime {
        *self.world.resource::<WorldTime>()
    }

    pub fn set_time_scale(&mut self, time_scale: f32) {
        debug!("Time scale set to {}", time_scale);
        self.world.resource_mut::<WorldTime>().time_scale = time_scale;
    }

    pub fn config(&self) -> &GameConfig {
        self.world.resource::<GameConfig>()
    }

    pub fn world(&self) -> &World {
        &self.world
    }

    pub fn world_mut(&mut self) -> &mut World {
        &mut self.world
    }

    /// Number of tick subscribers.
    pub fn tick_subscribers(&self) -> usize {
        self.tick_observers.len()
    }
}

impl TickSource for Engine {
    fn subscribe_tick(&mut self, handler: impl Fn(&TickEvent) + 'static) {
        self.tick_observers.subscribe(TickEventKind::Tick, handler);
    }

    fn subscribe_tick_weak<T: 'static>(
        &mut self,
        target: &Rc<T>,
        handler: impl Fn(&T, &TickEvent) + 'static,
    ) {
        self.tick_observers
            .subscribe_weak(TickEventKind::Tick, target, handler);
    }
}
