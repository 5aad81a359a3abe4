//! Sprite reel library.
//!
//! Frame-based sprite-sheet animation driven by an external tick. A sprite
//! sheet image is cut into reels (strips of same-size frames); controllers
//! play reels, sequences chain controllers, and views draw the active frames
//! and hook themselves into the host loop.
//!
//! # Example
//!
//! ```no_run
//! use std::rc::Rc;
//! use raylib::prelude::*;
//! use spritereel::components::animationview::AnimationView;
//! use spritereel::components::reel::{Direction, Reel};
//! use spritereel::engine::Engine;
//! use spritereel::resources::spritesheet::SpriteSheet;
//!
//! let (mut rl, thread) = raylib::init().size(640, 480).build();
//! let sheet = Rc::new(SpriteSheet::load(&mut rl, &thread, "mon3_sprite_base.png").unwrap());
//! let view = AnimationView::new(sheet.clone());
//! sheet.add_reel(
//!     "idle",
//!     Reel::build(Direction::Horizontal, Vector2::zero(), Vector2::new(64.0, 64.0), 5),
//! );
//! view.start_animation("idle", 100.0, 3);
//!
//! let mut engine = Engine::new();
//! while !rl.window_should_close() {
//!     engine.tick(rl.get_frame_time());
//!     let mut d = rl.begin_drawing(&thread);
//!     d.clear_background(Color::RAYWHITE);
//!     view.render(&mut engine, &mut d);
//! }
//! ```

pub mod components;
pub mod engine;
pub mod error;
pub mod events;
pub mod resources;
pub mod systems;

pub use error::{AnimationError, Result};
