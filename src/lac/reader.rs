//! Streaming access to the gzip-compressed tar container.
//!
//! Gzip streams cannot seek. [`ArchiveStreams::scan`] walks the container once
//! and records where each member's bytes sit in the decompressed stream. Later
//! reads reuse one forward-moving decoder and skip ahead to the requested
//! member, so extracting members in archive order decompresses the container
//! only once. The decoder restarts from the beginning only when a member lies
//! behind its current position.

use std::cell::{Cell, RefCell};
use std::collections::BTreeMap;
use std::fs::File;
use std::io::{self, BufReader, Read, Seek, SeekFrom};
use std::path::{Path, PathBuf};

use flate2::read::GzDecoder;
use tracing::trace;

use super::format::{normalize_member, GZIP_MAGIC};
use crate::util::{Error, Result};

/// Location of a member's data in the decompressed tar stream.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct MemberSpan {
    pub offset: u64,
    pub size: u64,
}

/// Decoder positioned somewhere inside the decompressed stream.
struct ForwardStream {
    decoder: GzDecoder<BufReader<File>>,
    pos: u64,
}

impl ForwardStream {
    fn read_span(&mut self, span: MemberSpan) -> io::Result<Vec<u8>> {
        let skip = span.offset - self.pos;
        let skipped = io::copy(&mut (&mut self.decoder).take(skip), &mut io::sink())?;
        if skipped != skip {
            return Err(io::Error::new(io::ErrorKind::UnexpectedEof, "container ends before member"));
        }

        let mut buf = Vec::with_capacity(span.size as usize);
        (&mut self.decoder).take(span.size).read_to_end(&mut buf)?;
        if buf.len() as u64 != span.size {
            return Err(io::Error::new(io::ErrorKind::UnexpectedEof, "member data is truncated"));
        }
        self.pos = span.offset + span.size;
        Ok(buf)
    }
}

/// Open handle on a `.lac` container.
///
/// The file handle lives as long as this value and is closed when it is dropped.
pub struct ArchiveStreams {
    path: PathBuf,
    file: File,
    size: u64,
    index: BTreeMap<String, MemberSpan>,
    forward: RefCell<Option<ForwardStream>>,
    rewinds: Cell<usize>,
}

impl ArchiveStreams {
    /// Open a container for reading.
    ///
    /// Only the gzip header is checked here; call [`scan`](Self::scan) to index
    /// the members.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if !path.is_file() {
            return Err(Error::FileNotFound(path.to_path_buf()));
        }
        let mut file = File::open(path).map_err(|e| {
            if e.kind() == io::ErrorKind::NotFound {
                Error::FileNotFound(path.to_path_buf())
            } else {
                Error::Io(e)
            }
        })?;

        let size = file.metadata()?.len();

        let mut magic = [0u8; 2];
        if file.read_exact(&mut magic).is_err() || &magic != GZIP_MAGIC {
            return Err(Error::InvalidContainer(format!(
                "{} is not a gzip-compressed archive",
                path.display()
            )));
        }

        Ok(Self {
            path: path.to_path_buf(),
            file,
            size,
            index: BTreeMap::new(),
            forward: RefCell::new(None),
            rewinds: Cell::new(0),
        })
    }

    /// Path the container was opened from.
    #[inline]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Compressed size in bytes.
    #[inline]
    pub fn size(&self) -> u64 {
        self.size
    }

    /// Walk every regular file member once, in archive order, and index it.
    ///
    /// The visitor receives the normalized member name and a reader over its
    /// bytes. When a name occurs more than once, the last occurrence wins in
    /// the index, matching what a visitor that overwrites earlier values sees.
    /// Container-level failures surface as [`Error::InvalidContainer`]; errors
    /// returned by the visitor are passed through unchanged.
    pub fn scan<F>(&mut self, mut visit: F) -> Result<()>
    where
        F: FnMut(&str, &mut dyn Read) -> Result<()>,
    {
        let mut index = BTreeMap::new();
        {
            let mut handle = &self.file;
            handle.seek(SeekFrom::Start(0))?;
            let mut archive = tar::Archive::new(GzDecoder::new(BufReader::new(handle)));
            let entries = archive.entries().map_err(container_error)?;
            for entry in entries {
                let mut entry = entry.map_err(container_error)?;
                if !entry.header().entry_type().is_file() {
                    continue;
                }
                let name = entry.path().map_err(container_error)?.to_string_lossy().into_owned();
                let name = normalize_member(&name).to_string();
                let span = MemberSpan { offset: entry.raw_file_position(), size: entry.size() };
                visit(&name, &mut entry)?;
                index.insert(name, span);
            }
        }
        self.index = index;
        *self.forward.get_mut() = None;
        Ok(())
    }

    /// Check if the index holds a member.
    #[inline]
    pub fn contains(&self, member: &str) -> bool {
        self.index.contains_key(member)
    }

    /// Location of a member's data.
    #[inline]
    pub fn span(&self, member: &str) -> Option<MemberSpan> {
        self.index.get(member).copied()
    }

    /// Indexed member names, sorted.
    pub fn members(&self) -> impl Iterator<Item = &str> {
        self.index.keys().map(String::as_str)
    }

    /// How many times reads had to restart decompression from the beginning.
    #[inline]
    pub fn rewinds(&self) -> usize {
        self.rewinds.get()
    }

    /// Extract the full contents of one member.
    pub fn read_member(&self, member: &str) -> Result<Vec<u8>> {
        let span = self.span(member).ok_or_else(|| Error::MemberNotFound(member.to_string()))?;

        let mut slot = self.forward.borrow_mut();
        let mut stream = match slot.take() {
            Some(stream) if stream.pos <= span.offset => stream,
            Some(stream) => {
                trace!(member, from = stream.pos, to = span.offset, "rewinding container");
                self.rewinds.set(self.rewinds.get() + 1);
                self.stream_from_start()?
            }
            None => self.stream_from_start()?,
        };

        // A failed read leaves no stream behind; the next read starts over.
        let data = stream.read_span(span).map_err(container_error)?;
        *slot = Some(stream);
        Ok(data)
    }

    fn stream_from_start(&self) -> Result<ForwardStream> {
        let mut file = self.file.try_clone()?;
        file.seek(SeekFrom::Start(0))?;
        Ok(ForwardStream { decoder: GzDecoder::new(BufReader::new(file)), pos: 0 })
    }
}

fn container_error(e: io::Error) -> Error {
    Error::InvalidContainer(e.to_string())
}
