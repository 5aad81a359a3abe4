//! Sprite sheet resource.
//!
//! A [`SpriteSheet`] owns one decoded image and the named [`Reel`]s defined
//! over it. It is shared (`Rc`) between the views, sequences and controllers
//! that play it, so registration works through `&self`.
//!
//! Registering a reel publishes [`SheetEvent::ReelAdded`] synchronously,
//! before [`SpriteSheet::add_reel`] returns. Subscribers are snapshotted
//! before dispatch, so a handler may register more reels or subscribe new
//! handlers without tripping over the sheet's own borrows.
//!
//! Re-registering a name replaces the previous reel silently. Controllers
//! already bound to the old reel keep playing it.

use std::cell::RefCell;
use std::path::{Path, PathBuf};
use std::rc::Rc;

use log::{debug, info};
use raylib::prelude::{RaylibHandle, RaylibThread, Rectangle, Texture2D};
use rustc_hash::FxHashMap;

use crate::components::reel::Reel;
use crate::error::{AnimationError, Result};
use crate::events::observers::{Observers, dispatch};
use crate::events::spritesheet::{SheetEvent, SheetEventKind};

/// Decoded image a sheet can be cut from.
pub trait SheetImage {
    /// Width and height in pixels.
    fn dimensions(&self) -> (f32, f32);
}

impl SheetImage for Texture2D {
    fn dimensions(&self) -> (f32, f32) {
        (self.width as f32, self.height as f32)
    }
}

/// One image plus every reel registered on it.
pub struct SpriteSheet<I = Texture2D> {
    image: I,
    source: Option<PathBuf>,
    reels: RefCell<FxHashMap<String, Rc<Reel>>>,
    observers: RefCell<Observers<SheetEvent>>,
}

impl SpriteSheet<Texture2D> {
    /// Decode `path` with raylib and wrap it in an empty sheet.
    pub fn load(
        rl: &mut RaylibHandle,
        thread: &RaylibThread,
        path: impl AsRef<Path>,
    ) -> Result<Self> {
        let path = path.as_ref();
        let texture = rl
            .load_texture(thread, &path.to_string_lossy())
            .map_err(|e| AnimationError::ImageLoad {
                path: path.display().to_string(),
                reason: e.to_string(),
            })?;
        info!(
            "Loaded sprite sheet {} ({}x{})",
            path.display(),
            texture.width,
            texture.height
        );
        Ok(Self::with_source(texture, path))
    }
}

impl<I: SheetImage> SpriteSheet<I> {
    /// Wrap an already decoded image.
    pub fn new(image: I) -> Self {
        Self {
            image,
            source: None,
            reels: RefCell::new(FxHashMap::default()),
            observers: RefCell::new(Observers::new()),
        }
    }

    /// Wrap an image and remember the file it came from.
    pub fn with_source(image: I, source: impl Into<PathBuf>) -> Self {
        Self {
            source: Some(source.into()),
            ..Self::new(image)
        }
    }

    /// Register `reel` under `name` and notify subscribers.
    pub fn add_reel(&self, name: impl Into<String>, reel: Reel) -> Rc<Reel> {
        let name = name.into();
        let reel = Rc::new(reel);
        let replaced = self
            .reels
            .borrow_mut()
            .insert(name.clone(), Rc::clone(&reel))
            .is_some();
        if replaced {
            debug!("Reel '{}' replaced on sprite sheet", name);
        } else {
            debug!("Reel '{}' added with {} frames", name, reel.frame_count());
        }

        let event = SheetEvent::ReelAdded {
            name,
            reel: Rc::clone(&reel),
        };
        let handlers = self.observers.borrow().handlers(SheetEventKind::ReelAdded);
        dispatch(handlers, &event);
        reel
    }

    /// Look up a reel by name.
    pub fn get_reel(&self, name: &str) -> Result<Rc<Reel>> {
        self.reels
            .borrow()
            .get(name)
            .cloned()
            .ok_or_else(|| AnimationError::ReelNotFound(name.to_string()))
    }

    pub fn contains_reel(&self, name: &str) -> bool {
        self.reels.borrow().contains_key(name)
    }

    /// Registered reel names, sorted.
    pub fn reel_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.reels.borrow().keys().cloned().collect();
        names.sort();
        names
    }

    pub fn reel_count(&self) -> usize {
        self.reels.borrow().len()
    }

    /// Subscribe to sheet notifications.
    pub fn subscribe(&self, kind: SheetEventKind, handler: impl Fn(&SheetEvent) + 'static) {
        self.observers.borrow_mut().subscribe(kind, handler);
    }

    pub fn image(&self) -> &I {
        &self.image
    }

    /// File the image was decoded from, when known.
    pub fn source(&self) -> Option<&Path> {
        self.source.as_deref()
    }

    /// Validate `rect` as a sub-rectangle of the sheet image.
    pub fn subsurface(&self, rect: Rectangle) -> Result<Rectangle> {
        let (image_width, image_height) = self.image.dimensions();
        let inside = rect.x >= 0.0
            && rect.y >= 0.0
            && rect.width >= 0.0
            && rect.height >= 0.0
            && rect.x + rect.width <= image_width
            && rect.y + rect.height <= image_height;
        if inside {
            Ok(rect)
        } else {
            Err(AnimationError::FrameOutOfBounds {
                x: rect.x,
                y: rect.y,
                width: rect.width,
                height: rect.height,
                image_width,
                image_height,
            })
        }
    }
}
