//! Reel-definition files.
//!
//! A sheet manifest is a small JSON document naming a sheet image and the
//! reels cut from it:
//!
//! ```json
//! {
//!   "image": "mon3_sprite_base.png",
//!   "reels": [
//!     { "name": "idle", "offset": [0, 0], "size": [64, 64], "frames": 5 },
//!     { "name": "hurt", "offset": [0, 128], "size": [64, 64], "frames": 3,
//!       "direction": "vertical" }
//!   ]
//! }
//! ```
//!
//! `direction` defaults to `horizontal`. The image path is resolved
//! relative to the manifest file.

use std::path::{Path, PathBuf};

use log::info;
use raylib::prelude::Vector2;
use serde::{Deserialize, Serialize};

use crate::components::reel::{Direction, Reel};
use crate::error::Result;
use crate::resources::spritesheet::{SheetImage, SpriteSheet};

/// One reel entry of a manifest.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct ReelDef {
    pub name: String,
    /// Top-left corner of the first frame, in pixels.
    pub offset: [f32; 2],
    /// Frame width and height, in pixels.
    pub size: [f32; 2],
    pub frames: usize,
    #[serde(default)]
    pub direction: Direction,
}

impl ReelDef {
    /// Build the reel described by this entry.
    pub fn to_reel(&self) -> Reel {
        Reel::build(
            self.direction,
            Vector2::new(self.offset[0], self.offset[1]),
            Vector2::new(self.size[0], self.size[1]),
            self.frames,
        )
    }
}

/// A sheet image and its reels.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct SheetManifest {
    pub image: PathBuf,
    #[serde(default)]
    pub reels: Vec<ReelDef>,
}

impl SheetManifest {
    pub fn from_json_str(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Read a manifest file; a relative `image` is resolved against the file's directory.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let json_string = std::fs::read_to_string(path)?;
        let mut manifest = Self::from_json_str(&json_string)?;
        if manifest.image.is_relative() {
            if let Some(dir) = path.parent() {
                manifest.image = dir.join(&manifest.image);
            }
        }
        info!(
            "Loaded sheet manifest {} ({} reels)",
            path.display(),
            manifest.reels.len()
        );
        Ok(manifest)
    }

    /// Register every reel on `sheet`, in file order.
    pub fn apply<I: SheetImage>(&self, sheet: &SpriteSheet<I>) -> usize {
        for def in &self.reels {
            sheet.add_reel(def.name.clone(), def.to_reel());
        }
        self.reels.len()
    }

    /// Reel names in file order.
    pub fn reel_names(&self) -> impl Iterator<Item = &str> {
        self.reels.iter().map(|r| r.name.as_str())
    }
}
