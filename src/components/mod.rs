//! Animation building blocks.
//!
//! Submodules overview:
//! - [`reel`] – frame rectangles of one animation strip
//! - [`animationcontroller`] – per-reel playback state machine
//! - [`animationsequence`] – controllers played back to back
//! - [`animationview`] – controller aggregation, tick hook and drawing

pub mod animationcontroller;
pub mod animationsequence;
pub mod animationview;
pub mod reel;
