//! Recording data model.
//!
//! This module provides:
//! - [`ConfigDocument`] / [`InitialConfig`] - Configuration documents
//! - [`FrameTable`] - Rover telemetry keyed by frame
//! - [`CameraTable`] - Sparse per-camera state with [`CameraLookup`] outcomes
//! - [`CustomRecordTable`] - Opaque user tables
//! - [`decode_image`] / [`save_image`] - Camera image decoding and export

mod table;
mod config;
mod frames;
mod cameras;
mod custom;
mod decode;

pub use table::{Frame, Keyed};
pub use config::{CameraConfig, ConfigDocument, InitialConfig, REQUIRED_INITIAL_KEYS};
pub use frames::{FrameRow, FrameTable, FRAME_COLUMNS};
pub use cameras::{CameraLookup, CameraRow, CameraTable, ImageKind, CAMERA_COLUMNS};
pub use custom::CustomRecordTable;
pub use decode::{decode_image, save_image, CameraImage};
