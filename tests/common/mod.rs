//! Builders for synthetic `.lac` recordings.

#![allow(dead_code)]

use std::io::{Cursor, Write};
use std::path::{Path, PathBuf};

use flate2::write::GzEncoder;
use flate2::Compression;
use image::{DynamicImage, GrayImage, ImageFormat, Luma};
use tempfile::TempDir;

pub const FRAMES_HEADER: &str = "frame,mission_time,power,accel_x,accel_y,accel_z,gyro_x,gyro_y,gyro_z,linear_speed,angular_speed,cover_angle,x,y,z,roll,pitch,yaw";

pub const CAMERA_HEADER: &str =
    "frame,enable,light_intensity,camera_x,camera_y,camera_z,camera_roll,camera_pitch,camera_yaw,grayscale,semantic";

/// Initial document with three cameras: `Front` (semantic), `Left` and `Rear`.
pub const INITIAL: &str = r#"
fiducials = true
lander = [0.0, 0.0, 0.25, 0.0, 0.0, 0.0]
rover = [2.0, -1.0, 0.0, 0.0, 0.0, 1.5]

[cameras.Front]
use_semantic = true
light_intensity = 0.5
width = 4
height = 3

[cameras.Left]
use_semantic = false
light_intensity = 0.25

[cameras.Rear]
use_semantic = false
light_intensity = 0.8
"#;

pub const METADATA: &str = r#"
description = "synthetic recording"

[session]
seed = 7
"#;

/// Telemetry row where every value is derived from the frame number.
pub fn frame_row(frame: u64) -> String {
    let f = frame as f64;
    format!(
        "{frame},{t},{p},{ax},0.0,-1.62,0.0,0.0,{gz},{ls},{as_},{ca},{x},{y},0.0,0.0,0.0,{yaw}",
        t = f * 0.05,
        p = 100.0 - f,
        ax = f * 0.01,
        gz = f * 0.001,
        ls = f * 0.1,
        as_ = f * 0.2,
        ca = f * 0.3,
        x = f,
        y = f * 2.0,
        yaw = f * 0.01,
    )
}

/// CSV for `frames.csv` with one row per key.
pub fn frames_csv(frames: &[u64]) -> String {
    let mut csv = String::from(FRAMES_HEADER);
    csv.push('\n');
    for f in frames {
        csv.push_str(&frame_row(*f));
        csv.push('\n');
    }
    csv
}

/// Small grayscale PNG filled with `value`.
pub fn png(value: u8) -> Vec<u8> {
    let img = DynamicImage::ImageLuma8(GrayImage::from_pixel(4, 3, Luma([value])));
    let mut buf = Vec::new();
    img.write_to(&mut Cursor::new(&mut buf), ImageFormat::Png).unwrap();
    buf
}

/// Collects members and writes them into a gzip-compressed tar.
pub struct RecordingBuilder {
    members: Vec<(String, Vec<u8>)>,
}

impl RecordingBuilder {
    pub fn empty() -> Self {
        Self { members: Vec::new() }
    }

    /// Minimal valid recording: both documents plus telemetry for `frames`.
    pub fn new(frames: &[u64]) -> Self {
        Self::empty()
            .member("initial.toml", INITIAL)
            .member("metadata.toml", METADATA)
            .member("frames.csv", frames_csv(frames))
    }

    pub fn member(mut self, name: &str, data: impl AsRef<[u8]>) -> Self {
        self.members.push((name.to_string(), data.as_ref().to_vec()));
        self
    }

    /// Replace an existing member (or add it).
    pub fn replace(mut self, name: &str, data: impl AsRef<[u8]>) -> Self {
        self.members.retain(|(n, _)| n != name);
        self.member(name, data)
    }

    pub fn without(mut self, name: &str) -> Self {
        self.members.retain(|(n, _)| n != name);
        self
    }

    /// Camera state table from data lines (header is added).
    pub fn camera_table(self, camera: &str, lines: &[&str]) -> Self {
        let mut csv = String::from(CAMERA_HEADER);
        csv.push('\n');
        for line in lines {
            csv.push_str(line);
            csv.push('\n');
        }
        self.member(&format!("cameras/{camera}/{camera}_frames.csv"), csv)
    }

    pub fn image(self, camera: &str, kind: &str, file: &str, data: impl AsRef<[u8]>) -> Self {
        self.member(&format!("cameras/{camera}/{kind}/{file}"), data)
    }

    pub fn write(&self, path: &Path) {
        let file = std::fs::File::create(path).unwrap();
        let mut builder = tar::Builder::new(GzEncoder::new(file, Compression::default()));
        for (name, data) in &self.members {
            let mut header = tar::Header::new_gnu();
            header.set_size(data.len() as u64);
            header.set_mode(0o644);
            header.set_cksum();
            builder.append_data(&mut header, name, data.as_slice()).unwrap();
        }
        builder.into_inner().unwrap().finish().unwrap().flush().unwrap();
    }

    /// Write into a fresh temp dir; keep the dir alive for the test's duration.
    pub fn build(&self) -> (TempDir, PathBuf) {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("session.lac");
        self.write(&path);
        (dir, path)
    }
}

/// Recording used by most tests.
///
/// - frames `{1, 2, 3, 5}` (gap at 4)
/// - `Front` rows at 2 and 4 with grayscale and semantic images
/// - `Left` row at 1 with a grayscale image, row at 3 without images
/// - `Rear` never records
pub fn standard() -> RecordingBuilder {
    RecordingBuilder::new(&[1, 2, 3, 5])
        .camera_table(
            "Front",
            &[
                "2,True,0.9,0.1,0.0,0.3,0.0,0.0,0.5,000002.png,000002.png",
                "4,False,0.0,0.1,0.0,0.3,0.0,0.0,1.0,000004.png,",
            ],
        )
        .camera_table(
            "Left",
            &["1,1,0.4,0.0,0.2,0.3,0.0,0.0,0.0,000001.png,", "3,0,0.0,0.0,0.2,0.3,0.0,0.0,0.0,,"],
        )
        .image("Front", "grayscale", "000002.png", png(20))
        .image("Front", "semantic", "000002.png", png(200))
        .image("Front", "grayscale", "000004.png", png(40))
        .image("Left", "grayscale", "000001.png", png(60))
        .member("custom/waypoints.csv", "frame,label,x\n1,start,0.0\n5,goal,12.5\n")
}
