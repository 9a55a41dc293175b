//! Loaded recording.
//!
//! [`Archive::open`] reads every document and table of a `.lac` file eagerly
//! and validates them. Image bytes stay in the container and are extracted on
//! demand through [`Archive::camera_image`].
//!
//! ## Example
//!
//! ```ignore
//! use lac_playback::archive::Archive;
//!
//! let archive = Archive::open("session.lac")?;
//! println!("{} frames", archive.frames().len());
//! ```

use std::collections::BTreeMap;
use std::io::Read;
use std::path::Path;

use tracing::{debug, info, warn};

use crate::core::{
    decode_image, CameraConfig, CameraImage, CameraLookup, CameraTable, ConfigDocument,
    CustomRecordTable, Frame, FrameTable, ImageKind, InitialConfig,
};
use crate::lac::{
    camera_image_member, camera_table_member, camera_table_name, custom_record_name,
    is_camera_image_member, ArchiveStreams, CAMERAS_DIR, FRAMES_MEMBER, INITIAL_MEMBER,
    METADATA_MEMBER,
};
use crate::util::{Error, Result};

// ============================================================================
// Archive
// ============================================================================

/// Immutable, fully validated recording.
///
/// Owns the open container handle; dropping the archive closes it.
pub struct Archive {
    streams: ArchiveStreams,
    initial_document: ConfigDocument,
    initial: InitialConfig,
    metadata: ConfigDocument,
    frames: FrameTable,
    cameras: BTreeMap<String, CameraTable>,
    custom: BTreeMap<String, CustomRecordTable>,
}

/// Members collected during the load pass, before validation.
#[derive(Default)]
struct Pending {
    initial: Option<ConfigDocument>,
    metadata: Option<ConfigDocument>,
    frames: Option<FrameTable>,
    /// Raw camera state tables, parsed once the configured cameras are known.
    camera_tables: BTreeMap<String, Vec<u8>>,
    custom: BTreeMap<String, CustomRecordTable>,
}

impl Archive {
    /// Open and validate a recording.
    ///
    /// Fails with [`Error::FileNotFound`] for a missing path and with a format
    /// error for any structural defect: unreadable container, missing or
    /// invalid `initial.toml` / `metadata.toml`, missing or invalid
    /// `frames.csv`, or a table with duplicate frame numbers.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let mut streams = ArchiveStreams::open(path)?;
        let mut pending = Pending::default();

        streams.scan(|member, reader| pending.load(member, reader))?;

        let initial_document = pending
            .initial
            .ok_or_else(|| Error::document(INITIAL_MEMBER, "member is missing"))?;
        let metadata = pending
            .metadata
            .ok_or_else(|| Error::document(METADATA_MEMBER, "member is missing"))?;
        let frames = pending
            .frames
            .ok_or_else(|| Error::table(FRAMES_MEMBER, "member is missing"))?;
        let initial = InitialConfig::from_document(&initial_document)?;

        let mut raw = pending.camera_tables;
        let cameras = initial
            .camera_names()
            .map(|name| {
                let member = camera_table_member(name);
                let table = match raw.remove(name) {
                    Some(bytes) => {
                        let table = CameraTable::from_csv(name, &member, bytes.as_slice())?;
                        debug!(%member, rows = table.len(), "loaded camera table");
                        table
                    }
                    None => {
                        debug!(%member, "camera never recorded");
                        CameraTable::empty(name)
                    }
                };
                Ok((name.to_string(), table))
            })
            .collect::<Result<BTreeMap<_, _>>>()?;
        for name in raw.keys() {
            warn!(camera = %name, "ignoring state table for unconfigured camera");
        }

        info!(
            path = %streams.path().display(),
            size = streams.size(),
            frames = frames.len(),
            min_frame = frames.min_frame(),
            max_frame = frames.max_frame(),
            cameras = cameras.len(),
            custom_records = pending.custom.len(),
            "opened recording"
        );

        Ok(Self {
            streams,
            initial_document,
            initial,
            metadata,
            frames,
            cameras,
            custom: pending.custom,
        })
    }

    /// Path the recording was opened from.
    #[inline]
    pub fn path(&self) -> &Path {
        self.streams.path()
    }

    /// Typed initial conditions.
    #[inline]
    pub fn initial(&self) -> &InitialConfig {
        &self.initial
    }

    /// Raw `initial.toml`.
    #[inline]
    pub fn initial_document(&self) -> &ConfigDocument {
        &self.initial_document
    }

    /// Raw `metadata.toml`.
    #[inline]
    pub fn metadata(&self) -> &ConfigDocument {
        &self.metadata
    }

    /// Rover telemetry table.
    #[inline]
    pub fn frames(&self) -> &FrameTable {
        &self.frames
    }

    /// State table of a configured camera (empty if it never recorded).
    pub fn camera(&self, name: &str) -> Result<&CameraTable> {
        self.cameras.get(name).ok_or_else(|| Error::UnknownCamera(name.to_string()))
    }

    /// Configuration of a camera.
    pub fn camera_config(&self, name: &str) -> Result<&CameraConfig> {
        self.initial.camera(name)
    }

    /// Tables of every configured camera, ordered by name.
    pub fn cameras(&self) -> impl Iterator<Item = &CameraTable> {
        self.cameras.values()
    }

    /// Configured camera names in order.
    pub fn camera_names(&self) -> impl Iterator<Item = &str> {
        self.cameras.keys().map(String::as_str)
    }

    /// Custom record by name.
    pub fn custom_record(&self, name: &str) -> Option<&CustomRecordTable> {
        self.custom.get(name)
    }

    /// All custom records, ordered by name.
    pub fn custom_records(&self) -> impl Iterator<Item = &CustomRecordTable> {
        self.custom.values()
    }

    /// Underlying container handle.
    #[inline]
    pub fn streams(&self) -> &ArchiveStreams {
        &self.streams
    }

    /// Check if the container holds a member.
    pub fn has_member(&self, member: &str) -> bool {
        self.streams.contains(member)
    }

    /// Every member name, sorted.
    pub fn members(&self) -> impl Iterator<Item = &str> {
        self.streams.members()
    }

    /// Extract raw member bytes. A name stored more than once resolves to its
    /// last copy.
    pub fn read_member(&self, member: &str) -> Result<Vec<u8>> {
        self.streams.read_member(member)
    }

    /// Decode the image a camera recorded at exactly `frame`.
    ///
    /// Configuration is checked before the container is touched: unknown
    /// cameras and semantic requests on cameras without semantic capture fail
    /// with a config error. A camera with no row at `frame` fails with
    /// [`Error::CameraRowNotFound`].
    pub fn camera_image(&self, camera: &str, frame: Frame, kind: ImageKind) -> Result<CameraImage> {
        let config = self.initial.camera(camera)?;
        if kind == ImageKind::Semantic && !config.use_semantic {
            return Err(Error::SemanticDisabled(camera.to_string()));
        }

        let row = match self.camera(camera)?.lookup_exact(frame) {
            CameraLookup::Found(row) => row,
            CameraLookup::NeverRecorded | CameraLookup::NoExactRowAtFrame => {
                return Err(Error::CameraRowNotFound { camera: camera.to_string(), frame });
            }
        };
        let file = row.image_file(kind).ok_or_else(|| Error::ImageNotRecorded {
            camera: camera.to_string(),
            kind,
            frame,
        })?;

        let member = camera_image_member(camera, kind, file);
        let bytes = self.read_member(&member)?;
        decode_image(&member, &bytes)
    }
}

impl std::fmt::Debug for Archive {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Archive")
            .field("path", &self.path())
            .field("frames", &self.frames.len())
            .field("cameras", &self.cameras.keys().collect::<Vec<_>>())
            .field("custom", &self.custom.keys().collect::<Vec<_>>())
            .finish()
    }
}

impl Pending {
    /// Parse one member if it is a document or record; camera tables are
    /// buffered and images are only indexed. Later copies replace earlier ones.
    fn load(&mut self, member: &str, reader: &mut dyn Read) -> Result<()> {
        match member {
            INITIAL_MEMBER => self.initial = Some(read_document(member, reader)?),
            METADATA_MEMBER => self.metadata = Some(read_document(member, reader)?),
            FRAMES_MEMBER => self.frames = Some(FrameTable::from_csv(member, reader)?),
            _ => {
                if let Some(camera) = camera_table_name(member) {
                    let mut bytes = Vec::new();
                    reader.read_to_end(&mut bytes).map_err(|e| Error::table(member, e.to_string()))?;
                    self.camera_tables.insert(camera.to_string(), bytes);
                } else if let Some(record) = custom_record_name(member) {
                    let table = CustomRecordTable::from_csv(record, member, reader)?;
                    debug!(member, rows = table.len(), "loaded custom record");
                    self.custom.insert(record.to_string(), table);
                } else if member.starts_with(CAMERAS_DIR) && !is_camera_image_member(member) {
                    warn!(member, "ignoring unrecognized camera member");
                }
            }
        }
        Ok(())
    }
}

fn read_document(member: &str, reader: &mut dyn Read) -> Result<ConfigDocument> {
    let mut text = String::new();
    reader
        .read_to_string(&mut text)
        .map_err(|e| Error::document(member, e.to_string()))?;
    ConfigDocument::parse(member, &text)
}
