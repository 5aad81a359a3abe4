//! Sprite reel viewer.
//!
//! Opens a raylib window, loads a sheet manifest (image + reel
//! definitions), registers every reel on a sprite sheet watched by an
//! [`AnimationView`] and plays the configured reel in a loop driven by the
//! [`Engine`] tick.
//!
//! # Running
//!
//! ```sh
//! cargo run --release -- --manifest assets/sheets/monster.json --animation attack
//! ```
//!
//! Settings come from `config.ini` (see
//! [`GameConfig`](spritereel::resources::gameconfig::GameConfig)); command
//! line flags override them.

// Do not create console on Windows
#![cfg_attr(target_os = "windows", windows_subsystem = "windows")]

use std::path::PathBuf;
use std::rc::Rc;

use clap::Parser;
use log::{error, info, warn};
use raylib::ffi;
use raylib::prelude::*;

use spritereel::components::animationview::AnimationView;
use spritereel::engine::Engine;
use spritereel::error::Result;
use spritereel::events::animation::{AnimationEvent, AnimationEventKind};
use spritereel::resources::gameconfig::GameConfig;
use spritereel::resources::sheetmanifest::SheetManifest;
use spritereel::resources::spritesheet::SpriteSheet;

/// Sprite reel viewer
#[derive(Parser)]
#[command(version, about = "Plays sprite-sheet reels described by a JSON manifest.")]
struct Cli {
    /// INI configuration file.
    #[arg(long, value_name = "PATH", default_value = "./config.ini")]
    config: PathBuf,

    /// Sheet manifest to load (overrides `[sheet] manifest`).
    #[arg(long, value_name = "PATH")]
    manifest: Option<PathBuf>,

    /// Reel to play (overrides `[animation] name`).
    #[arg(long)]
    animation: Option<String>,

    /// Frame duration in milliseconds (overrides `[animation] frame_ms`).
    #[arg(long)]
    frame_ms: Option<f32>,

    /// Repeat limit (overrides `[animation] repeats`).
    #[arg(long)]
    repeats: Option<u32>,
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();

    let mut config = GameConfig::with_path(&cli.config);
    if let Err(e) = config.load_from_file() {
        warn!("{}; using defaults", e);
    }
    if let Some(manifest) = cli.manifest {
        config.sheet_manifest = manifest;
    }
    if let Some(animation) = cli.animation {
        config.animation = animation;
    }
    if let Some(frame_ms) = cli.frame_ms {
        config.frame_ms = frame_ms;
    }
    if let Some(repeats) = cli.repeats {
        config.repeats = repeats;
    }

    if let Err(e) = run(config) {
        error!("{}", e);
        std::process::exit(1);
    }
}

fn run(config: GameConfig) -> Result<()> {
    let manifest = SheetManifest::from_file(&config.sheet_manifest)?;

    let (mut rl, thread) = raylib::init()
        .size(config.window_width as i32, config.window_height as i32)
        .title("Sprite Reel Viewer")
        .build();
    unsafe {
        if config.vsync {
            ffi::SetWindowState(ffi::ConfigFlags::FLAG_VSYNC_HINT as u32);
        } else {
            ffi::ClearWindowState(ffi::ConfigFlags::FLAG_VSYNC_HINT as u32);
        }
    }
    rl.set_target_fps(config.target_fps);

    let sheet = Rc::new(SpriteSheet::load(&mut rl, &thread, &manifest.image)?);
    let view = AnimationView::new(Rc::clone(&sheet));
    view.set_position(Vector2::new(config.view_x, config.view_y));
    manifest.apply(&sheet);

    for handle in view.controllers(&config.animation) {
        handle
            .borrow_mut()
            .subscribe(AnimationEventKind::Finished, |ev: &AnimationEvent| {
                info!("Animation '{}' finished", ev.name());
            });
    }
    let started = view.start_animation(&config.animation, config.frame_ms, config.repeats);
    if started == 0 {
        warn!(
            "No reel named '{}' in {}; available: {}",
            config.animation,
            config.sheet_manifest.display(),
            sheet.reel_names().join(", ")
        );
    }

    let mut engine = Engine::with_config(config);
    let caption = format!("reels: {}", sheet.reel_names().join(", "));

    while !rl.window_should_close() {
        engine.tick(rl.get_frame_time());

        let mut d = rl.begin_drawing(&thread);
        d.clear_background(Color::RAYWHITE);
        view.render(&mut engine, &mut d);
        d.draw_text(&caption, 10, 10, 10, Color::DARKGRAY);
    }

    Ok(())
}
