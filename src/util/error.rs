//! Error types for the playback library.

use std::path::PathBuf;
use thiserror::Error;

use crate::core::{Frame, ImageKind};

/// Why a cursor move was rejected.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RangeErrorKind {
    /// Target frame is past the last recorded frame.
    OutOfRange,
    /// Target frame is within bounds but falls into a gap of the recording.
    NotInDataSet,
}

/// Coarse error category, used by callers that only care about the class of failure.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ErrorKind {
    /// Missing path, archive member, frame row or camera row.
    NotFound,
    /// Malformed container, document or table at load time.
    Format,
    /// Cursor target out of bounds or absent.
    Range(RangeErrorKind),
    /// Requested capability disallowed by the recording configuration.
    Config,
    /// Accessor intentionally not modeled by a recording.
    Unimplemented,
    /// Image bytes present but undecodable.
    Decode,
    /// Underlying I/O failure.
    Io,
}

/// Main error type for playback operations.
#[derive(Error, Debug)]
pub enum Error {
    /// File does not exist or cannot be accessed
    #[error("File not found: {0}")]
    FileNotFound(PathBuf),

    /// Named member is not present in the archive
    #[error("Archive member not found: {0}")]
    MemberNotFound(String),

    /// No telemetry row carries this frame number
    #[error("Frame {0} not found")]
    FrameNotFound(Frame),

    /// Camera has no row recorded at exactly this frame
    #[error("Camera {camera} has no data at frame {frame}")]
    CameraRowNotFound { camera: String, frame: Frame },

    /// Camera row does not reference an image of the requested kind
    #[error("Camera {camera} has no {kind} image at frame {frame}")]
    ImageNotRecorded { camera: String, kind: ImageKind, frame: Frame },

    /// Container could not be read as a gzip-compressed tar archive
    #[error("Invalid archive container: {0}")]
    InvalidContainer(String),

    /// Structured document is absent, unparsable or missing required keys
    #[error("Invalid document {member}: {reason}")]
    InvalidDocument { member: String, reason: String },

    /// Tabular member is malformed
    #[error("Invalid table {member}: {reason}")]
    InvalidTable { member: String, reason: String },

    /// Frame key appears more than once in a table
    #[error("Duplicate frame {frame} in {member}")]
    DuplicateFrame { member: String, frame: Frame },

    /// Cursor target past the last frame
    #[error("Frame {frame} is out of range. Max index is {max}.")]
    OutOfRange { frame: Frame, max: Frame },

    /// Cursor target inside a gap of the recording
    #[error("Frame {0} is not in the data set.")]
    NotInDataSet(Frame),

    /// Camera is not listed in the initial configuration
    #[error("Camera {0} is not configured")]
    UnknownCamera(String),

    /// Semantic image requested from a camera without semantic capture
    #[error("Camera {0} does not have semantic images enabled")]
    SemanticDisabled(String),

    /// Accessor that recordings do not model
    #[error("{0} not implemented")]
    Unimplemented(&'static str),

    /// Image member could not be decoded
    #[error("Failed to decode {member}: {source}")]
    Decode {
        member: String,
        #[source]
        source: image::ImageError,
    },

    /// Decoded image could not be written to disk
    #[error("Failed to write {}: {source}", path.display())]
    Export {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Create an invalid document error.
    pub fn document(member: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidDocument { member: member.into(), reason: reason.into() }
    }

    /// Create an invalid table error.
    pub fn table(member: impl Into<String>, reason: impl ToString) -> Self {
        Self::InvalidTable { member: member.into(), reason: reason.to_string() }
    }

    /// Classify this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::FileNotFound(_)
            | Self::MemberNotFound(_)
            | Self::FrameNotFound(_)
            | Self::CameraRowNotFound { .. }
            | Self::ImageNotRecorded { .. } => ErrorKind::NotFound,
            Self::InvalidContainer(_)
            | Self::InvalidDocument { .. }
            | Self::InvalidTable { .. }
            | Self::DuplicateFrame { .. } => ErrorKind::Format,
            Self::OutOfRange { .. } => ErrorKind::Range(RangeErrorKind::OutOfRange),
            Self::NotInDataSet(_) => ErrorKind::Range(RangeErrorKind::NotInDataSet),
            Self::UnknownCamera(_) | Self::SemanticDisabled(_) => ErrorKind::Config,
            Self::Unimplemented(_) => ErrorKind::Unimplemented,
            Self::Decode { .. } => ErrorKind::Decode,
            Self::Export { .. } | Self::Io(_) => ErrorKind::Io,
        }
    }

    /// True for the "nothing recorded here" family of errors.
    #[inline]
    pub fn is_not_found(&self) -> bool {
        self.kind() == ErrorKind::NotFound
    }
}

/// Result type alias for playback operations.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let e = Error::OutOfRange { frame: 999, max: 500 };
        assert!(e.to_string().contains("out of range"));
        assert!(e.to_string().contains("500"));

        let e = Error::NotInDataSet(4);
        assert!(e.to_string().contains("not in the data set"));
    }

    #[test]
    fn test_range_kinds_are_distinct() {
        let out = Error::OutOfRange { frame: 10, max: 5 }.kind();
        let gap = Error::NotInDataSet(4).kind();
        assert_eq!(out, ErrorKind::Range(RangeErrorKind::OutOfRange));
        assert_eq!(gap, ErrorKind::Range(RangeErrorKind::NotInDataSet));
        assert_ne!(out, gap);
    }

    #[test]
    fn test_error_from_io() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "test");
        let err: Error = io_err.into();
        assert!(matches!(err, Error::Io(_)));
        assert_eq!(err.kind(), ErrorKind::Io);
    }

    #[test]
    fn test_export_is_io() {
        let source = image::ImageError::IoError(std::io::Error::other("disk full"));
        let err = Error::Export { path: PathBuf::from("out/front.png"), source };
        assert_eq!(err.kind(), ErrorKind::Io);
        assert!(err.to_string().contains("out/front.png"), "{err}");
    }

    #[test]
    fn test_unimplemented_is_not_a_data_error() {
        let e = Error::Unimplemented("get_consumed_power");
        assert_eq!(e.kind(), ErrorKind::Unimplemented);
        assert!(!e.is_not_found());
    }
}
