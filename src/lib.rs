//! # LAC Playback
//!
//! Read-only playback of recorded lunar rover simulation sessions.
//!
//! A recording (`.lac`) is a gzip-compressed tar archive holding the initial
//! conditions, per-frame rover telemetry, sparse per-camera state with image
//! references, and optional user records. This crate loads and validates a
//! recording and replays it through an API shaped like a live sensing agent,
//! so control code can be exercised against recorded ground truth.
//!
//! ## Modules
//!
//! - [`util`] - Errors and pose types
//! - [`lac`] - Low-level container access and archive layout
//! - [`core`] - Configuration documents and frame-keyed tables
//! - [`archive`] - Loaded, validated recording
//! - [`agent`] - Playback cursor and agent-shaped accessors
//!
//! ## Example
//!
//! ```ignore
//! use lac_playback::prelude::*;
//!
//! let mut agent = PlaybackAgent::open("session.lac")?;
//! agent.set_frame(120)?;
//! println!("BackLeft enabled? {}", agent.get_camera_state("BackLeft")?);
//! ```

pub mod util;
pub mod lac;
pub mod core;
pub mod archive;
pub mod agent;

// Re-export commonly used types
pub use util::{Error, ErrorKind, RangeErrorKind, Result, Rotation, Transform};
pub use archive::Archive;
pub use agent::PlaybackAgent;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::util::{Error, ErrorKind, RangeErrorKind, Result, Rotation, Transform};
    pub use crate::core::{CameraLookup, CameraTable, Frame, FrameTable, ImageKind};
    pub use crate::archive::Archive;
    pub use crate::agent::{InputData, PlaybackAgent};
}
