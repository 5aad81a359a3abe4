//! Long-lived data shared by animations and the host loop.
//!
//! Overview
//! - `gameconfig` – INI backed viewer settings
//! - `sheetmanifest` – JSON reel-definition files
//! - `spritesheet` – decoded sheet image plus its named reels
//! - `worldtime` – simulation time and delta
pub mod gameconfig;
pub mod sheetmanifest;
pub mod spritesheet;
pub mod worldtime;
