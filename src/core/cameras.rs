//! Per-camera state tables (`cameras/<name>/<name>_frames.csv`).
//!
//! Cameras only write a row when their state is sampled, so a camera table is
//! sparse relative to the telemetry table. Callers resolve "the camera state at
//! frame N" with [`CameraTable::lookup_at_or_before`].

use serde::{Deserialize, Serialize};
use std::fmt;
use std::io::Read;

use super::table::{self, Frame, Keyed};
use crate::util::{Result, Rotation, Transform};

/// Columns a non-empty camera table must carry. `semantic` is optional.
pub const CAMERA_COLUMNS: [&str; 10] = [
    "frame",
    "enable",
    "light_intensity",
    "camera_x",
    "camera_y",
    "camera_z",
    "camera_roll",
    "camera_pitch",
    "camera_yaw",
    "grayscale",
];

/// Kind of image a camera records.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ImageKind {
    Grayscale,
    Semantic,
}

impl ImageKind {
    /// Directory name under `cameras/<name>/`.
    #[inline]
    pub const fn dir_name(self) -> &'static str {
        match self {
            Self::Grayscale => "grayscale",
            Self::Semantic => "semantic",
        }
    }
}

impl fmt::Display for ImageKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.dir_name())
    }
}

/// One sampled camera state.
#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
pub struct CameraRow {
    pub frame: Frame,
    #[serde(deserialize_with = "table::deserialize_flag")]
    pub enable: bool,
    pub light_intensity: f64,
    pub camera_x: f64,
    pub camera_y: f64,
    pub camera_z: f64,
    pub camera_roll: f64,
    pub camera_pitch: f64,
    pub camera_yaw: f64,
    /// Grayscale image file name.
    #[serde(default, deserialize_with = "table::deserialize_name")]
    pub grayscale: Option<String>,
    /// Semantic image file name, only for cameras with semantic capture.
    #[serde(default, deserialize_with = "table::deserialize_name")]
    pub semantic: Option<String>,
}

impl CameraRow {
    /// Camera pose relative to the rover.
    pub fn pose(&self) -> Transform {
        Transform::new(
            glam::DVec3::new(self.camera_x, self.camera_y, self.camera_z),
            Rotation::new(self.camera_roll, self.camera_pitch, self.camera_yaw),
        )
    }

    /// Image file name of the given kind.
    pub fn image_file(&self, kind: ImageKind) -> Option<&str> {
        match kind {
            ImageKind::Grayscale => self.grayscale.as_deref(),
            ImageKind::Semantic => self.semantic.as_deref(),
        }
    }
}

impl Keyed for CameraRow {
    #[inline]
    fn frame(&self) -> Frame {
        self.frame
    }
}

/// Outcome of a camera table lookup.
///
/// "Never recorded" and "nothing at that frame" are different situations and
/// are kept apart so call sites decide how to treat each one.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum CameraLookup<'a> {
    /// A matching row.
    Found(&'a CameraRow),
    /// The camera has recorded nothing, at all or up to the requested frame.
    NeverRecorded,
    /// The camera has rows, but none at the requested frame.
    NoExactRowAtFrame,
}

impl<'a> CameraLookup<'a> {
    /// The row, if one was found.
    #[inline]
    pub fn row(self) -> Option<&'a CameraRow> {
        match self {
            Self::Found(row) => Some(row),
            Self::NeverRecorded | Self::NoExactRowAtFrame => None,
        }
    }

    #[inline]
    pub fn is_found(&self) -> bool {
        matches!(self, Self::Found(_))
    }
}

/// Sampled state of one camera, sorted by frame.
#[derive(Clone, Debug, Default)]
pub struct CameraTable {
    name: String,
    rows: Vec<CameraRow>,
}

impl CameraTable {
    /// Table for a camera that never recorded anything.
    pub fn empty(name: impl Into<String>) -> Self {
        Self { name: name.into(), rows: Vec::new() }
    }

    /// Build a table from rows in any order; duplicate frames are rejected.
    pub fn from_rows(name: impl Into<String>, member: &str, mut rows: Vec<CameraRow>) -> Result<Self> {
        table::sort_unique(member, &mut rows)?;
        Ok(Self { name: name.into(), rows })
    }

    /// Read a CSV member. An empty member yields an empty table.
    pub fn from_csv<R: Read>(name: impl Into<String>, member: &str, reader: R) -> Result<Self> {
        let rows = table::read_csv_rows(member, reader, &CAMERA_COLUMNS)?;
        Self::from_rows(name, member, rows)
    }

    /// Camera name.
    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Row recorded at exactly `frame`.
    pub fn lookup_exact(&self, frame: Frame) -> CameraLookup<'_> {
        if self.rows.is_empty() {
            return CameraLookup::NeverRecorded;
        }
        match table::position(&self.rows, frame) {
            Some(idx) => CameraLookup::Found(&self.rows[idx]),
            None => CameraLookup::NoExactRowAtFrame,
        }
    }

    /// Most recent row recorded at or before `frame`.
    ///
    /// Reports [`CameraLookup::NeverRecorded`] both for an empty table and for a
    /// frame earlier than the first recorded row: in either case the camera has
    /// not recorded anything up to `frame`.
    pub fn lookup_at_or_before(&self, frame: Frame) -> CameraLookup<'_> {
        match table::floor_position(&self.rows, frame) {
            Some(idx) => CameraLookup::Found(&self.rows[idx]),
            None => CameraLookup::NeverRecorded,
        }
    }

    /// Number of recorded rows.
    #[inline]
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// First frame with a recorded row.
    pub fn first_frame(&self) -> Option<Frame> {
        self.rows.first().map(|r| r.frame)
    }

    /// All rows in ascending frame order.
    #[inline]
    pub fn rows(&self) -> &[CameraRow] {
        &self.rows
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::util::Error;

    const HEADER: &str = "frame,enable,light_intensity,camera_x,camera_y,camera_z,camera_roll,camera_pitch,camera_yaw,grayscale,semantic\n";

    fn front() -> CameraTable {
        let data = format!(
            "{HEADER}4,False,0.0,0.1,0.2,0.3,0,0,1.0,000004.png,\n2,True,0.75,0.1,0.2,0.3,0,0,0.5,000002.png,000002.png\n"
        );
        CameraTable::from_csv("Front", "cameras/Front/Front_frames.csv", data.as_bytes()).unwrap()
    }

    #[test]
    fn test_lookup_at_or_before() {
        let table = front();

        let row = table.lookup_at_or_before(3).row().unwrap();
        assert_eq!(row.frame, 2);
        assert!(row.enable);
        assert_eq!(row.light_intensity, 0.75);

        assert_eq!(table.lookup_at_or_before(4).row().unwrap().frame, 4);
        assert_eq!(table.lookup_at_or_before(100).row().unwrap().frame, 4);
        assert_eq!(table.lookup_at_or_before(1), CameraLookup::NeverRecorded);
    }

    #[test]
    fn test_lookup_exact() {
        let table = front();
        assert!(table.lookup_exact(2).is_found());
        assert_eq!(table.lookup_exact(3), CameraLookup::NoExactRowAtFrame);
    }

    #[test]
    fn test_never_recorded() -> Result<()> {
        let empty = CameraTable::from_csv("Rear", "cameras/Rear/Rear_frames.csv", "".as_bytes())?;
        assert!(empty.is_empty());
        assert_eq!(empty.lookup_at_or_before(10), CameraLookup::NeverRecorded);
        assert_eq!(empty.lookup_exact(10), CameraLookup::NeverRecorded);

        let header_only = CameraTable::from_csv("Rear", "x.csv", HEADER.as_bytes())?;
        assert_eq!(header_only.lookup_at_or_before(10), CameraLookup::NeverRecorded);
        Ok(())
    }

    #[test]
    fn test_image_files() {
        let table = front();
        let row = table.lookup_exact(4).row().unwrap();
        assert_eq!(row.image_file(ImageKind::Grayscale), Some("000004.png"));
        assert_eq!(row.image_file(ImageKind::Semantic), None);
        assert_eq!(row.pose().rotation.yaw, 1.0);
    }

    #[test]
    fn test_duplicate_rows() {
        let data = format!("{HEADER}2,1,0,0,0,0,0,0,0,a.png,\n2,0,0,0,0,0,0,0,0,b.png,\n");
        let err = CameraTable::from_csv("Front", "f.csv", data.as_bytes()).unwrap_err();
        assert!(matches!(err, Error::DuplicateFrame { frame: 2, .. }));
    }
}
