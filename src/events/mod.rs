//! Event types and the observer plumbing that delivers them.
//!
//! Each emitting object owns its own subscriber list; the modules below
//! define the typed payload of every event kind.
//!
//! Submodules:
//! - [`observers`] – ordered, snapshot-dispatched subscriber lists
//! - [`animation`] – controller and sequence lifecycle events
//! - [`spritesheet`] – reel registration and reel loading notifications
//! - [`tick`] – the host engine's per-frame tick
pub mod animation;
pub mod observers;
pub mod spritesheet;
pub mod tick;
