//! Playback agent.
//!
//! [`PlaybackAgent`] mirrors the sensor interface of a live rover agent, but
//! answers every query from a recording. The only mutable state is the
//! [`Cursor`]; all reads go through to the immutable [`Archive`].
//!
//! ## Example
//!
//! ```ignore
//! use lac_playback::agent::PlaybackAgent;
//!
//! let mut agent = PlaybackAgent::open("session.lac")?;
//! loop {
//!     let imu = agent.get_imu_data();
//!     let images = agent.input_data()?;
//!     if agent.at_end() {
//!         break;
//!     }
//!     agent.step_frame();
//! }
//! ```

mod cursor;
mod input;

pub use cursor::Cursor;
pub use input::InputData;

use std::collections::BTreeMap;
use std::path::Path;

use tracing::trace;

use crate::archive::Archive;
use crate::core::{CameraConfig, CameraImage, CameraLookup, Frame, FrameRow, ImageKind};
use crate::util::{Error, Result, Transform};

/// Replays a recording through an agent-shaped API.
#[derive(Debug)]
pub struct PlaybackAgent {
    archive: Archive,
    cursor: Cursor,
}

impl PlaybackAgent {
    /// Open a recording and position the cursor on its first frame.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        Ok(Self::new(Archive::open(path)?))
    }

    /// Wrap an already loaded archive.
    pub fn new(archive: Archive) -> Self {
        let cursor = Cursor::start(archive.frames());
        Self { archive, cursor }
    }

    /// The underlying recording.
    #[inline]
    pub fn archive(&self) -> &Archive {
        &self.archive
    }

    // ------------------------------------------------------------------------
    // Cursor
    // ------------------------------------------------------------------------

    /// Current frame number.
    #[inline]
    pub fn frame(&self) -> Frame {
        self.cursor.frame()
    }

    /// First recorded frame.
    #[inline]
    pub fn min_frame(&self) -> Frame {
        self.archive.frames().min_frame()
    }

    /// Last recorded frame.
    #[inline]
    pub fn max_frame(&self) -> Frame {
        self.archive.frames().max_frame()
    }

    /// Jump to a specific frame.
    ///
    /// Fails with [`Error::OutOfRange`] past the last frame and with
    /// [`Error::NotInDataSet`] for a frame the recording skipped. The cursor is
    /// left untouched on failure.
    pub fn set_frame(&mut self, frame: Frame) -> Result<()> {
        self.cursor = Cursor::seek(self.archive.frames(), frame)?;
        trace!(frame, "jumped");
        Ok(())
    }

    /// Step to the next recorded frame and return it. Stays put on the last frame.
    pub fn step_frame(&mut self) -> Frame {
        self.cursor = self.cursor.next(self.archive.frames());
        trace!(frame = self.cursor.frame(), "stepped");
        self.cursor.frame()
    }

    /// Check if the cursor is on the last frame.
    #[inline]
    pub fn at_end(&self) -> bool {
        self.cursor.at_end(self.archive.frames())
    }

    /// Telemetry row at the cursor.
    #[inline]
    pub fn row(&self) -> &FrameRow {
        // The cursor only ever holds indices produced from this table.
        &self.archive.frames().rows()[self.cursor.index()]
    }

    // ------------------------------------------------------------------------
    // Initial conditions
    // ------------------------------------------------------------------------

    pub fn use_fiducials(&self) -> bool {
        self.archive.initial().fiducials
    }

    /// Camera configuration keyed by camera name.
    pub fn sensors(&self) -> &BTreeMap<String, CameraConfig> {
        &self.archive.initial().cameras
    }

    /// Rover pose at mission start.
    pub fn get_initial_position(&self) -> Transform {
        self.archive.initial().rover
    }

    /// Lander pose at mission start.
    pub fn get_initial_lander_position(&self) -> Transform {
        self.archive.initial().lander
    }

    // ------------------------------------------------------------------------
    // Telemetry
    // ------------------------------------------------------------------------

    pub fn get_mission_time(&self) -> f64 {
        self.row().mission_time
    }

    pub fn get_current_power(&self) -> f64 {
        self.row().power
    }

    pub fn get_consumed_power(&self) -> Result<f64> {
        Err(Error::Unimplemented("get_consumed_power"))
    }

    /// `[accel_x, accel_y, accel_z, gyro_x, gyro_y, gyro_z]`
    pub fn get_imu_data(&self) -> [f64; 6] {
        self.row().imu()
    }

    pub fn get_linear_speed(&self) -> f64 {
        self.row().linear_speed
    }

    pub fn get_angular_speed(&self) -> f64 {
        self.row().angular_speed
    }

    pub fn get_front_arm_angle(&self) -> Result<f64> {
        Err(Error::Unimplemented("get_front_arm_angle"))
    }

    pub fn get_back_arm_angle(&self) -> Result<f64> {
        Err(Error::Unimplemented("get_back_arm_angle"))
    }

    pub fn get_front_drums_speed(&self) -> Result<f64> {
        Err(Error::Unimplemented("get_front_drums_speed"))
    }

    pub fn get_back_drums_speed(&self) -> Result<f64> {
        Err(Error::Unimplemented("get_back_drums_speed"))
    }

    pub fn get_radiator_cover_angle(&self) -> f64 {
        self.row().cover_angle
    }

    /// Rover pose at the cursor.
    pub fn get_transform(&self) -> Transform {
        self.row().pose()
    }

    // ------------------------------------------------------------------------
    // Cameras
    // ------------------------------------------------------------------------

    /// Light intensity of a camera's lamp.
    ///
    /// Before the camera records any state, this is the configured intensity.
    pub fn get_light_state(&self, camera: &str) -> Result<f64> {
        let table = self.archive.camera(camera)?;
        Ok(match table.lookup_at_or_before(self.frame()) {
            CameraLookup::Found(row) => row.light_intensity,
            CameraLookup::NeverRecorded | CameraLookup::NoExactRowAtFrame => {
                self.archive.camera_config(camera)?.light_intensity
            }
        })
    }

    /// Whether a camera is enabled. Cameras without recorded state are off.
    pub fn get_camera_state(&self, camera: &str) -> Result<bool> {
        let table = self.archive.camera(camera)?;
        Ok(match table.lookup_at_or_before(self.frame()) {
            CameraLookup::Found(row) => row.enable,
            CameraLookup::NeverRecorded | CameraLookup::NoExactRowAtFrame => false,
        })
    }

    /// Camera pose relative to the rover.
    ///
    /// Without recorded state this is the identity transform, which is only a
    /// placeholder and not the camera's real mounting offset.
    pub fn get_camera_position(&self, camera: &str) -> Result<Transform> {
        let table = self.archive.camera(camera)?;
        Ok(match table.lookup_at_or_before(self.frame()) {
            CameraLookup::Found(row) => row.pose(),
            CameraLookup::NeverRecorded | CameraLookup::NoExactRowAtFrame => Transform::IDENTITY,
        })
    }

    // TODO: recordings carry no lamp offsets; derive them from the rover geometry.
    pub fn get_light_position(&self, camera: &str) -> Result<Transform> {
        self.archive.camera(camera)?;
        Err(Error::Unimplemented("get_light_position"))
    }

    /// Image a camera recorded at the current frame.
    pub fn get_image(&self, camera: &str, kind: ImageKind) -> Result<CameraImage> {
        self.archive.camera_image(camera, self.frame(), kind)
    }

    /// Every configured camera's images at the current frame.
    ///
    /// Slots for cameras that recorded nothing at this frame are `None`.
    /// Decode failures and references to missing members are errors, since
    /// they mean the recording itself is damaged.
    pub fn input_data(&self) -> Result<InputData> {
        let mut input = InputData::default();
        for (camera, config) in self.sensors() {
            input.insert(ImageKind::Grayscale, camera, self.image_slot(camera, ImageKind::Grayscale)?);
            if config.use_semantic {
                input.insert(ImageKind::Semantic, camera, self.image_slot(camera, ImageKind::Semantic)?);
            }
        }
        Ok(input)
    }

    fn image_slot(&self, camera: &str, kind: ImageKind) -> Result<Option<CameraImage>> {
        match self.get_image(camera, kind) {
            Ok(image) => Ok(Some(image)),
            Err(Error::CameraRowNotFound { .. } | Error::ImageNotRecorded { .. }) => Ok(None),
            Err(e) => Err(e),
        }
    }
}
