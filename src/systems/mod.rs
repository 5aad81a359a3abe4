//! Per-frame work of the host loop.
//!
//! Submodules overview
//! - [`render`] – the `Canvas` drawing seam and its raylib implementation
//! - [`time`] – update simulation time and delta

pub mod render;
pub mod time;
