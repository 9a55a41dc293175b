//! Pose types built on `glam`.
//!
//! Recordings store poses as six numbers: position (x, y, z) in meters and
//! Euler angles (roll, pitch, yaw) in radians.

pub use glam::{DMat4, DQuat, DVec3, EulerRot};

use serde::Serialize;
use std::fmt;

/// Euler orientation in radians.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize)]
pub struct Rotation {
    pub roll: f64,
    pub pitch: f64,
    pub yaw: f64,
}

impl Rotation {
    /// Zero rotation.
    pub const ZERO: Self = Self { roll: 0.0, pitch: 0.0, yaw: 0.0 };

    #[inline]
    pub const fn new(roll: f64, pitch: f64, yaw: f64) -> Self {
        Self { roll, pitch, yaw }
    }

    /// Quaternion for this orientation, yaw applied first (Z, then Y, then X).
    pub fn to_quat(&self) -> DQuat {
        DQuat::from_euler(EulerRot::ZYX, self.yaw, self.pitch, self.roll)
    }
}

/// Rigid pose: a position plus an orientation.
///
/// Accessors return a fresh value on every call; there is no shared state.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize)]
pub struct Transform {
    pub location: DVec3,
    pub rotation: Rotation,
}

impl Transform {
    /// Zero position and orientation.
    pub const IDENTITY: Self = Self { location: DVec3::ZERO, rotation: Rotation::ZERO };

    #[inline]
    pub const fn new(location: DVec3, rotation: Rotation) -> Self {
        Self { location, rotation }
    }

    /// Build from the flat `[x, y, z, roll, pitch, yaw]` layout used by recordings.
    #[inline]
    pub fn from_array(v: [f64; 6]) -> Self {
        Self {
            location: DVec3::new(v[0], v[1], v[2]),
            rotation: Rotation::new(v[3], v[4], v[5]),
        }
    }

    /// Flatten to `(x, y, z, roll, pitch, yaw)`.
    #[inline]
    pub fn to_tuple(&self) -> (f64, f64, f64, f64, f64, f64) {
        (
            self.location.x,
            self.location.y,
            self.location.z,
            self.rotation.roll,
            self.rotation.pitch,
            self.rotation.yaw,
        )
    }

    /// Flatten to `[x, y, z, roll, pitch, yaw]`.
    #[inline]
    pub fn to_array(&self) -> [f64; 6] {
        let (x, y, z, roll, pitch, yaw) = self.to_tuple();
        [x, y, z, roll, pitch, yaw]
    }

    /// Homogeneous 4x4 matrix (rotation then translation).
    pub fn matrix(&self) -> DMat4 {
        DMat4::from_rotation_translation(self.rotation.to_quat(), self.location)
    }

    /// Check if this is the identity pose.
    #[inline]
    pub fn is_identity(&self) -> bool {
        *self == Self::IDENTITY
    }
}

impl From<[f64; 6]> for Transform {
    fn from(v: [f64; 6]) -> Self {
        Self::from_array(v)
    }
}

impl fmt::Display for Transform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "({:.3}, {:.3}, {:.3}) rpy=({:.3}, {:.3}, {:.3})",
            self.location.x,
            self.location.y,
            self.location.z,
            self.rotation.roll,
            self.rotation.pitch,
            self.rotation.yaw
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identity() {
        let t = Transform::default();
        assert!(t.is_identity());
        assert_eq!(t.to_array(), [0.0; 6]);
        assert!(t.matrix().abs_diff_eq(DMat4::IDENTITY, 1e-12));
    }

    #[test]
    fn test_flat_layout() {
        let t = Transform::from_array([1.0, 2.0, 3.0, 0.1, 0.2, 0.3]);
        assert_eq!(t.location, DVec3::new(1.0, 2.0, 3.0));
        assert_eq!(t.rotation.pitch, 0.2);
        assert_eq!(t.to_tuple(), (1.0, 2.0, 3.0, 0.1, 0.2, 0.3));
    }

    #[test]
    fn test_matrix_yaw() {
        let t = Transform::from_array([1.0, 0.0, 0.0, 0.0, 0.0, std::f64::consts::FRAC_PI_2]);
        let p = t.matrix().transform_point3(DVec3::X);
        assert!(p.abs_diff_eq(DVec3::new(1.0, 1.0, 0.0), 1e-9));
    }
}
