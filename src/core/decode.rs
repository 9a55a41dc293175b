//! Camera image decoding.

use std::path::Path;

use image::DynamicImage;

use crate::util::{Error, Result};

/// Decoded camera image.
pub type CameraImage = DynamicImage;

/// Decode an image member, guessing the codec from its bytes.
pub fn decode_image(member: &str, bytes: &[u8]) -> Result<CameraImage> {
    image::load_from_memory(bytes).map_err(|source| Error::Decode { member: member.to_string(), source })
}

/// Write a decoded image to disk, picking the format from the file extension.
pub fn save_image(image: &CameraImage, path: &Path) -> Result<()> {
    image.save(path).map_err(|source| Error::Export { path: path.to_path_buf(), source })
}
