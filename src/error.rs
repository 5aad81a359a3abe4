//! Error type shared by sheets, reels, controllers and sequences.
//!
//! Every fallible operation returns [`Result`]. Nothing here is recovered
//! internally: a missing reel or a broken reel-definition file is handed back
//! to the caller that asked for it.

use thiserror::Error;

/// Errors raised while building or driving sprite-sheet animations.
#[derive(Debug, Error)]
pub enum AnimationError {
    /// A reel name was looked up on a sheet that never registered it.
    #[error("reel '{0}' is not registered on this sprite sheet")]
    ReelNotFound(String),

    /// `Reel::load` was called on a reel that already holds its frames.
    #[error("reel is already loaded with {frames} frames")]
    ReelAlreadyLoaded {
        /// Number of frames the reel was first loaded with.
        frames: usize,
    },

    /// A frame rectangle reaches outside of the sheet image.
    #[error(
        "frame ({x}, {y}, {width}x{height}) lies outside of the {image_width}x{image_height} sheet image"
    )]
    FrameOutOfBounds {
        /// Frame left edge.
        x: f32,
        /// Frame top edge.
        y: f32,
        /// Frame width.
        width: f32,
        /// Frame height.
        height: f32,
        /// Sheet image width.
        image_width: f32,
        /// Sheet image height.
        image_height: f32,
    },

    /// An animation sequence was started without any entries.
    #[error("animation sequence has no animations")]
    EmptySequence,

    /// The imaging backend could not decode the sheet image.
    #[error("failed to load sheet image '{path}': {reason}")]
    ImageLoad {
        /// Path that was handed to the image loader.
        path: String,
        /// Loader supplied description.
        reason: String,
    },

    /// A reel-definition file is not valid JSON for a sheet manifest.
    #[error(transparent)]
    Manifest(#[from] serde_json::Error),

    /// Reading a reel-definition or configuration file failed.
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// The INI configuration could not be read or written.
    #[error("configuration error: {0}")]
    Config(String),
}

/// Crate wide result alias.
pub type Result<T> = std::result::Result<T, AnimationError>;
