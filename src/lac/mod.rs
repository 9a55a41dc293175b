//! Low-level `.lac` container access.
//!
//! A `.lac` recording is a gzip-compressed tar archive:
//!
//! ```text
//! initial.toml                         initial conditions (required)
//! metadata.toml                        session metadata (required)
//! frames.csv                           rover telemetry, one row per frame (required)
//! cameras/<name>/<name>_frames.csv     per-camera state (optional)
//! cameras/<name>/grayscale/<file>      grayscale images
//! cameras/<name>/semantic/<file>       semantic segmentation images
//! custom/<record>.csv                  opaque user records (optional)
//! ```

mod format;
mod reader;

pub use format::*;
pub use reader::*;
