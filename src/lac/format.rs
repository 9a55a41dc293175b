//! LAC archive layout constants and member paths.

use crate::core::ImageKind;

/// Gzip magic bytes at the start of every `.lac` file.
pub const GZIP_MAGIC: &[u8; 2] = b"\x1f\x8b";

/// Initial conditions document.
pub const INITIAL_MEMBER: &str = "initial.toml";

/// Free-form session metadata document.
pub const METADATA_MEMBER: &str = "metadata.toml";

/// Per-frame rover telemetry table.
pub const FRAMES_MEMBER: &str = "frames.csv";

/// Directory holding per-camera tables and images.
pub const CAMERAS_DIR: &str = "cameras/";

/// Directory holding custom record tables.
pub const CUSTOM_DIR: &str = "custom/";

/// Path of the state table for one camera.
#[inline]
pub fn camera_table_member(camera: &str) -> String {
    format!("{CAMERAS_DIR}{camera}/{camera}_frames.csv")
}

/// Path of a recorded image for one camera.
#[inline]
pub fn camera_image_member(camera: &str, kind: ImageKind, file: &str) -> String {
    format!("{CAMERAS_DIR}{camera}/{}/{file}", kind.dir_name())
}

/// Camera name for a member holding a camera state table, or `None` for anything else.
///
/// Only `cameras/<name>/<name>_frames.csv` qualifies.
pub fn camera_table_name(member: &str) -> Option<&str> {
    let (camera, rest) = member.strip_prefix(CAMERAS_DIR)?.split_once('/')?;
    let file = rest.strip_prefix(camera)?;
    (!camera.is_empty() && file == "_frames.csv").then_some(camera)
}

/// Check if a member is a camera image (`cameras/<name>/<kind>/<file>`).
pub fn is_camera_image_member(member: &str) -> bool {
    let Some(rest) = member.strip_prefix(CAMERAS_DIR) else {
        return false;
    };
    let mut parts = rest.splitn(3, '/');
    match (parts.next(), parts.next(), parts.next()) {
        (Some(camera), Some(kind), Some(file)) => {
            !camera.is_empty()
                && !file.is_empty()
                && (kind == ImageKind::Grayscale.dir_name() || kind == ImageKind::Semantic.dir_name())
        }
        _ => false,
    }
}

/// Record name for a member under `custom/`, or `None` for anything else.
///
/// `custom/odometry.csv` is named `odometry`.
pub fn custom_record_name(member: &str) -> Option<&str> {
    let rest = member.strip_prefix(CUSTOM_DIR)?;
    let file = rest.rsplit('/').next()?;
    let stem = file.split('.').next()?;
    (!stem.is_empty()).then_some(stem)
}

/// Normalize a member name as stored in the tar index (drops a leading `./`).
#[inline]
pub fn normalize_member(name: &str) -> &str {
    name.trim_start_matches("./")
}
