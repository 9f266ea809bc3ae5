//! Opening ZIP sources and walking their central directory.

use crate::error::ExtractError;
use crate::types::ArchiveEntry;
use std::fs::File;
use std::io::{Cursor, Read, Seek};
use std::path::Path;
use tracing::debug;
use zip::ZipArchive;

/// A validated ZIP archive backed by an in-memory buffer or an open file.
///
/// The central directory is parsed when the reader is created. Dropping the
/// reader (or the [`Entries`] it turns into) releases the underlying source.
pub struct ArchiveReader<R> {
    archive: ZipArchive<R>,
}

impl<'a> ArchiveReader<Cursor<&'a [u8]>> {
    /// Interpret `buffer` as a complete ZIP byte stream of `declared_size` bytes.
    ///
    /// # Errors
    ///
    /// Returns [`ExtractError::MalformedArchive`] if the declared size does not
    /// match the buffer, or the central directory cannot be parsed.
    pub fn from_buffer(buffer: &'a [u8], declared_size: u64) -> Result<Self, ExtractError> {
        if buffer.len() as u64 != declared_size {
            return Err(ExtractError::MalformedArchive(format!(
                "declared size {} does not match buffer length {}",
                declared_size,
                buffer.len()
            )));
        }
        Self::new(Cursor::new(buffer))
    }
}

impl ArchiveReader<File> {
    /// Open the ZIP file at `path` and parse its central directory.
    ///
    /// # Errors
    ///
    /// Returns [`ExtractError::SourceUnavailable`] if the file cannot be opened
    /// and [`ExtractError::MalformedArchive`] if it is not a readable ZIP.
    pub fn open(path: &Path) -> Result<Self, ExtractError> {
        let file = File::open(path).map_err(|source| ExtractError::SourceUnavailable {
            path: path.to_path_buf(),
            source,
        })?;
        debug!(path = %path.display(), "opened archive");
        Self::new(file)
    }
}

impl<R: Read + Seek> ArchiveReader<R> {
    /// Parse the central directory of an arbitrary seekable source.
    pub fn new(reader: R) -> Result<Self, ExtractError> {
        let archive =
            ZipArchive::new(reader).map_err(|e| ExtractError::MalformedArchive(e.to_string()))?;
        Ok(Self { archive })
    }

    /// Number of entries recorded in the central directory.
    pub fn len(&self) -> usize {
        self.archive.len()
    }

    /// Whether the central directory lists no entries at all.
    pub fn is_empty(&self) -> bool {
        self.archive.is_empty()
    }

    /// Metadata for every entry, in stored order, without decompressing anything.
    pub fn list(&mut self) -> Result<Vec<ArchiveEntry>, ExtractError> {
        let mut entries = Vec::with_capacity(self.archive.len());
        for index in 0..self.archive.len() {
            let file = self
                .archive
                .by_index_raw(index)
                .map_err(|e| entry_error(index, e))?;
            entries.push(ArchiveEntry {
                path: file.name().to_string(),
                is_directory: file.is_dir(),
                mode: file.unix_mode(),
                size: file.size(),
                compressed_size: file.compressed_size(),
            });
        }
        Ok(entries)
    }

    /// Turn the reader into its single-pass entry sequence.
    pub fn entries(self) -> Entries<R> {
        Entries {
            archive: self.archive,
            index: 0,
        }
    }
}

/// Lazy, single-pass sequence of archive entries in stored order.
///
/// Each [`Entry`] borrows the sequence, so its content stream is closed before
/// the next entry can be requested.
pub struct Entries<R> {
    archive: ZipArchive<R>,
    index: usize,
}

impl<R: Read + Seek> Entries<R> {
    /// Total number of entries in the archive.
    pub fn len(&self) -> usize {
        self.archive.len()
    }

    /// Whether the archive has no entries to yield.
    pub fn is_empty(&self) -> bool {
        self.archive.is_empty()
    }

    /// Advance to the next entry, or `None` once the archive is exhausted.
    ///
    /// # Errors
    ///
    /// Yields [`ExtractError::MalformedArchive`] when the entry's local header
    /// or compression method cannot be handled.
    pub fn next_entry(&mut self) -> Option<Result<Entry<'_>, ExtractError>> {
        if self.index >= self.archive.len() {
            return None;
        }
        let index = self.index;
        self.index += 1;

        let file = match self.archive.by_index(index) {
            Ok(file) => file,
            Err(e) => return Some(Err(entry_error(index, e))),
        };

        let info = ArchiveEntry {
            path: file.name().to_string(),
            is_directory: file.is_dir(),
            mode: file.unix_mode(),
            size: file.size(),
            compressed_size: file.compressed_size(),
        };
        let content: Option<Box<dyn Read + '_>> = if info.is_directory {
            None
        } else {
            Some(Box::new(file))
        };

        Some(Ok(Entry { info, content }))
    }
}

/// One archive entry together with its (lazily decompressed) content.
pub struct Entry<'a> {
    info: ArchiveEntry,
    content: Option<Box<dyn Read + 'a>>,
}

impl<'a> Entry<'a> {
    /// Metadata recorded for this entry in the central directory.
    pub fn info(&self) -> &ArchiveEntry {
        &self.info
    }

    /// Content stream of a file entry; `None` for directories.
    ///
    /// Reading verifies the stored CRC-32 once the stream is exhausted.
    pub fn content(&mut self) -> Option<&mut (dyn Read + 'a)> {
        self.content.as_deref_mut()
    }
}

fn entry_error(index: usize, e: zip::result::ZipError) -> ExtractError {
    ExtractError::MalformedArchive(format!("cannot open entry #{}: {}", index, e))
}
