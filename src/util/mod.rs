//! Utility types shared across the library.
//!
//! - [`Error`] / [`Result`] - Error handling
//! - [`Transform`] / [`Rotation`] - Pose values on top of `glam`

mod error;
mod math;

pub use error::*;
pub use math::*;
