//! # Unzipper
//!
//! Extracts ZIP archives, held in memory or on disk, into a directory tree.
//!
//! Entries are written in archive order, directory structure and permission
//! bits are reproduced, and every entry path is checked so that nothing lands
//! outside the destination root.
//!
//! ## Example
//!
//! ```rust,no_run
//! use unzipper::{unzip_file, ExtractOptions};
//! use std::path::Path;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let options = ExtractOptions { verbose: true };
//! let stats = unzip_file(Path::new("archive.zip"), Path::new("output"), &options)?;
//!
//! println!("Extracted {} files ({} bytes)", stats.files_extracted, stats.bytes_written);
//! # Ok(())
//! # }
//! ```

pub mod error;
pub mod extract;
pub mod reader;
pub mod safety;
pub mod types;

// Re-export main types
pub use error::{ExtractError, Phase, SecurityError};
pub use extract::extract_entries;
pub use reader::{ArchiveReader, Entries, Entry};
pub use types::{ArchiveEntry, ExtractOptions, ExtractStats};

use std::path::Path;

/// Extract a ZIP archive held in memory.
///
/// # Arguments
///
/// * `buffer` - Complete ZIP byte stream
/// * `declared_size` - Size the caller expects the buffer to have
/// * `output_dir` - Directory where entries will be extracted
/// * `options` - Extraction options
///
/// # Errors
///
/// Returns an error if:
/// - The buffer is not a readable ZIP or its size does not match
/// - An entry path would escape `output_dir`
/// - A directory or file cannot be created or written
pub fn unzip_buffer(
    buffer: &[u8],
    declared_size: u64,
    output_dir: &Path,
    options: &ExtractOptions,
) -> Result<ExtractStats, ExtractError> {
    let reader = ArchiveReader::from_buffer(buffer, declared_size)?;
    extract_entries(reader.entries(), output_dir, options)
}

/// Extract a ZIP file from disk.
///
/// The archive file stays open for the duration of the call only.
///
/// # Errors
///
/// Same as [`unzip_buffer`], plus [`ExtractError::SourceUnavailable`] when the
/// archive cannot be opened.
pub fn unzip_file(
    archive_path: &Path,
    output_dir: &Path,
    options: &ExtractOptions,
) -> Result<ExtractStats, ExtractError> {
    let reader = ArchiveReader::open(archive_path)?;
    extract_entries(reader.entries(), output_dir, options)
}

/// List the entries of a ZIP file without extracting it.
pub fn list_file(archive_path: &Path) -> Result<Vec<ArchiveEntry>, ExtractError> {
    ArchiveReader::open(archive_path)?.list()
}
