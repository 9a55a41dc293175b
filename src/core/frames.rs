//! Rover telemetry table (`frames.csv`).

use serde::{Deserialize, Serialize};
use std::io::Read;

use super::table::{self, Frame, Keyed};
use crate::util::{Error, Result, Rotation, Transform};

/// Columns `frames.csv` must carry.
pub const FRAME_COLUMNS: [&str; 18] = [
    "frame",
    "mission_time",
    "power",
    "accel_x",
    "accel_y",
    "accel_z",
    "gyro_x",
    "gyro_y",
    "gyro_z",
    "linear_speed",
    "angular_speed",
    "cover_angle",
    "x",
    "y",
    "z",
    "roll",
    "pitch",
    "yaw",
];

/// One recorded simulation tick of rover telemetry.
#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
pub struct FrameRow {
    pub frame: Frame,
    /// Seconds since mission start.
    pub mission_time: f64,
    /// Battery power level.
    pub power: f64,
    pub accel_x: f64,
    pub accel_y: f64,
    pub accel_z: f64,
    pub gyro_x: f64,
    pub gyro_y: f64,
    pub gyro_z: f64,
    pub linear_speed: f64,
    pub angular_speed: f64,
    /// Radiator cover angle in radians.
    pub cover_angle: f64,
    pub x: f64,
    pub y: f64,
    pub z: f64,
    pub roll: f64,
    pub pitch: f64,
    pub yaw: f64,
}

impl FrameRow {
    /// Rover pose at this frame.
    pub fn pose(&self) -> Transform {
        Transform::new(
            glam::DVec3::new(self.x, self.y, self.z),
            Rotation::new(self.roll, self.pitch, self.yaw),
        )
    }

    /// IMU vector ordered `[accel_x, accel_y, accel_z, gyro_x, gyro_y, gyro_z]`.
    pub fn imu(&self) -> [f64; 6] {
        [self.accel_x, self.accel_y, self.accel_z, self.gyro_x, self.gyro_y, self.gyro_z]
    }
}

impl Keyed for FrameRow {
    #[inline]
    fn frame(&self) -> Frame {
        self.frame
    }
}

/// All telemetry rows, sorted by frame.
///
/// Frame numbers are unique but not necessarily contiguous.
#[derive(Clone, Debug)]
pub struct FrameTable {
    rows: Vec<FrameRow>,
    min_frame: Frame,
    max_frame: Frame,
}

impl FrameTable {
    /// Build a table from rows in any order.
    ///
    /// Fails on an empty set of rows or on duplicate frame numbers.
    pub fn from_rows(member: &str, mut rows: Vec<FrameRow>) -> Result<Self> {
        table::sort_unique(member, &mut rows)?;
        let (min_frame, max_frame) = match (rows.first(), rows.last()) {
            (Some(first), Some(last)) => (first.frame, last.frame),
            _ => return Err(Error::table(member, "no frames recorded")),
        };
        Ok(Self { rows, min_frame, max_frame })
    }

    /// Read and validate a CSV member.
    pub fn from_csv<R: Read>(member: &str, reader: R) -> Result<Self> {
        let rows = table::read_csv_rows(member, reader, &FRAME_COLUMNS)?;
        Self::from_rows(member, rows)
    }

    /// Row with exactly this frame number.
    pub fn lookup(&self, frame: Frame) -> Result<&FrameRow> {
        self.position(frame)
            .map(|idx| &self.rows[idx])
            .ok_or(Error::FrameNotFound(frame))
    }

    /// Index of the row with this frame number.
    #[inline]
    pub fn position(&self, frame: Frame) -> Option<usize> {
        table::position(&self.rows, frame)
    }

    /// Row by index in frame order.
    #[inline]
    pub fn row_at(&self, index: usize) -> Option<&FrameRow> {
        self.rows.get(index)
    }

    /// Smallest frame number.
    #[inline]
    pub fn min_frame(&self) -> Frame {
        self.min_frame
    }

    /// Largest frame number.
    #[inline]
    pub fn max_frame(&self) -> Frame {
        self.max_frame
    }

    /// Smallest frame number strictly greater than `frame`.
    pub fn next_frame_after(&self, frame: Frame) -> Option<Frame> {
        table::next_position(&self.rows, frame).map(|idx| self.rows[idx].frame)
    }

    /// Number of recorded frames.
    #[inline]
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Always false for a loaded table.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Frame numbers in ascending order.
    pub fn frames(&self) -> impl Iterator<Item = Frame> + '_ {
        self.rows.iter().map(|r| r.frame)
    }

    /// All rows in ascending frame order.
    #[inline]
    pub fn rows(&self) -> &[FrameRow] {
        &self.rows
    }
}
