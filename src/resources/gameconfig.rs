//! Viewer configuration resource.
//!
//! Settings for the sprite reel viewer loaded from an INI configuration
//! file. Provides defaults for safe startup and methods to load/save
//! configuration.
//!
//! # Configuration File Format
//!
//! ```ini
//! [window]
//! width = 800
//! height = 600
//! target_fps = 60
//! vsync = true
//!
//! [sheet]
//! manifest = ./assets/sheets/monster.json
//!
//! [animation]
//! name = idle
//! frame_ms = 100
//! repeats = 3
//! time_scale = 1.0
//!
//! [view]
//! x = 368
//! y = 268
//! ```

use bevy_ecs::prelude::*;
use configparser::ini::Ini;
use log::info;
use std::path::PathBuf;

use crate::error::{AnimationError, Result};

/// Default safe values for startup
const DEFAULT_WINDOW_WIDTH: u32 = 800;
const DEFAULT_WINDOW_HEIGHT: u32 = 600;
const DEFAULT_TARGET_FPS: u32 = 60;
const DEFAULT_VSYNC: bool = true;
const DEFAULT_MANIFEST: &str = "./assets/sheets/monster.json";
const DEFAULT_ANIMATION: &str = "idle";
const DEFAULT_FRAME_MS: f32 = 100.0;
const DEFAULT_REPEATS: u32 = 3;
const DEFAULT_TIME_SCALE: f32 = 1.0;
const DEFAULT_CONFIG_PATH: &str = "./config.ini";

/// Viewer configuration resource.
#[derive(Resource, Debug, Clone)]
pub struct GameConfig {
    /// Window width in pixels.
    pub window_width: u32,
    /// Window height in pixels.
    pub window_height: u32,
    /// Target frames per second.
    pub target_fps: u32,
    /// Enable vertical sync.
    pub vsync: bool,
    /// Reel-definition file describing the sheet to show.
    pub sheet_manifest: PathBuf,
    /// Reel started when the viewer opens.
    pub animation: String,
    /// Frame duration in milliseconds.
    pub frame_ms: f32,
    /// Repeat limit for the started reel.
    pub repeats: u32,
    /// Multiplier applied to every tick.
    pub time_scale: f32,
    /// Screen position of the view.
    pub view_x: f32,
    pub view_y: f32,
    /// Path to the configuration file.
    pub config_path: PathBuf,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self::new()
    }
}

impl GameConfig {
    /// Create a new configuration with safe default values.
    pub fn new() -> Self {
        Self {
            window_width: DEFAULT_WINDOW_WIDTH,
            window_height: DEFAULT_WINDOW_HEIGHT,
            target_fps: DEFAULT_TARGET_FPS,
            vsync: DEFAULT_VSYNC,
            sheet_manifest: PathBuf::from(DEFAULT_MANIFEST),
            animation: DEFAULT_ANIMATION.to_string(),
            frame_ms: DEFAULT_FRAME_MS,
            repeats: DEFAULT_REPEATS,
            time_scale: DEFAULT_TIME_SCALE,
            view_x: (DEFAULT_WINDOW_WIDTH / 2) as f32 - 32.0,
            view_y: (DEFAULT_WINDOW_HEIGHT / 2) as f32 - 32.0,
            config_path: PathBuf::from(DEFAULT_CONFIG_PATH),
        }
    }

    /// Create a new configuration with a custom config file path.
    pub fn with_path(path: impl Into<PathBuf>) -> Self {
        Self {
            config_path: path.into(),
            ..Self::new()
        }
    }

    /// Load configuration from the INI file.
    ///
    /// Missing values retain their current (default) values.
    /// Returns an error if the file cannot be read or parsed.
    pub fn load_from_file(&mut self) -> Result<()> {
        let mut config = Ini::new();
        config
            .load(&self.config_path)
            .map_err(|e| AnimationError::Config(format!("Failed to load config file: {}", e)))?;
        self.apply(&config);

        info!(
            "Loaded config: {}x{} window, fps={}, vsync={}, sheet={}, animation={} ({} ms, {} repeats)",
            self.window_width,
            self.window_height,
            self.target_fps,
            self.vsync,
            self.sheet_manifest.display(),
            self.animation,
            self.frame_ms,
            self.repeats
        );

        Ok(())
    }

    /// Load configuration from INI text instead of a file.
    pub fn load_from_str(&mut self, text: &str) -> Result<()> {
        let mut config = Ini::new();
        config
            .read(text.to_string())
            .map_err(|e| AnimationError::Config(format!("Failed to parse config: {}", e)))?;
        self.apply(&config);
        Ok(())
    }

    fn apply(&mut self, config: &Ini) {
        // [window] section
        if let Some(width) = config.getuint("window", "width").ok().flatten() {
            self.window_width = width as u32;
        }
        if let Some(height) = config.getuint("window", "height").ok().flatten() {
            self.window_height = height as u32;
        }
        if let Some(fps) = config.getuint("window", "target_fps").ok().flatten() {
            self.target_fps = fps as u32;
        }
        if let Some(vsync) = config.getbool("window", "vsync").ok().flatten() {
            self.vsync = vsync;
        }

        // [sheet] section
        if let Some(manifest) = config.get("sheet", "manifest") {
            self.sheet_manifest = PathBuf::from(manifest);
        }

        // [animation] section
        if let Some(name) = config.get("animation", "name") {
            self.animation = name;
        }
        if let Some(frame_ms) = config.getfloat("animation", "frame_ms").ok().flatten() {
            self.frame_ms = frame_ms as f32;
        }
        if let Some(repeats) = config.getuint("animation", "repeats").ok().flatten() {
            self.repeats = repeats as u32;
        }
        if let Some(scale) = config.getfloat("animation", "time_scale").ok().flatten() {
            self.time_scale = scale as f32;
        }

        // [view] section
        if let Some(x) = config.getfloat("view", "x").ok().flatten() {
            self.view_x = x as f32;
        }
        if let Some(y) = config.getfloat("view", "y").ok().flatten() {
            self.view_y = y as f32;
        }
    }

    /// Save configuration to the INI file.
    ///
    /// Creates the file if it doesn't exist.
    pub fn save_to_file(&self) -> Result<()> {
        let mut config = Ini::new();

        // [window] section
        config.set("window", "width", Some(self.window_width.to_string()));
        config.set("window", "height", Some(self.window_height.to_string()));
        config.set("window", "target_fps", Some(self.target_fps.to_string()));
        config.set("window", "vsync", Some(self.vsync.to_string()));

        // [sheet] section
        config.set(
            "sheet",
            "manifest",
            Some(self.sheet_manifest.display().to_string()),
        );

        // [animation] section
        config.set("animation", "name", Some(self.animation.clone()));
        config.set("animation", "frame_ms", Some(self.frame_ms.to_string()));
        config.set("animation", "repeats", Some(self.repeats.to_string()));
        config.set("animation", "time_scale", Some(self.time_scale.to_string()));

        // [view] section
        config.set("view", "x", Some(self.view_x.to_string()));
        config.set("view", "y", Some(self.view_y.to_string()));

        config
            .write(&self.config_path)
            .map_err(|e| AnimationError::Config(format!("Failed to save config file: {}", e)))?;

        info!("Saved config to {:?}", self.config_path);

        Ok(())
    }

    /// Get the window size.
    pub fn window_size(&self) -> (u32, u32) {
        (self.window_width, self.window_height)
    }
}
