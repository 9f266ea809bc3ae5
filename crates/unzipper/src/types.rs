//! Type definitions for archive extraction.

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Permission bits applied to directories whose entry records no unix mode.
pub const DEFAULT_DIR_MODE: u32 = 0o755;

/// Permission bits applied to files whose entry records no unix mode.
pub const DEFAULT_FILE_MODE: u32 = 0o644;

/// Metadata for an individual entry within an archive.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArchiveEntry {
    /// Path of the entry within the archive (forward-slash separated)
    pub path: String,

    /// Whether this entry is a directory
    pub is_directory: bool,

    /// Unix mode recorded in the archive, if any
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mode: Option<u32>,

    /// Uncompressed size in bytes
    pub size: u64,

    /// Compressed size in bytes
    pub compressed_size: u64,
}

impl ArchiveEntry {
    /// Permission bits to apply when materializing this entry.
    ///
    /// File-type and setuid/setgid/sticky bits are dropped. A recorded mode
    /// with no permission bits at all (archivers that leave the unix half of
    /// the external attributes zeroed) is treated like a missing one, so the
    /// defaults apply instead of `0o000`.
    pub fn permissions(&self) -> u32 {
        match self.mode.map(|mode| mode & 0o777) {
            Some(bits) if bits != 0 => bits,
            _ if self.is_directory => DEFAULT_DIR_MODE,
            _ => DEFAULT_FILE_MODE,
        }
    }
}

/// Options for extracting an archive.
#[derive(Debug, Clone, Default)]
pub struct ExtractOptions {
    /// Log every created directory and extracted file at `info` level
    pub verbose: bool,
}

/// Statistics about a completed extraction operation.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ExtractStats {
    /// Number of files written
    pub files_extracted: u64,

    /// Number of directory entries materialized
    pub directories_created: u64,

    /// Total bytes written to disk
    pub bytes_written: u64,

    /// Duration of the extraction operation (in seconds)
    #[serde(with = "duration_serde")]
    pub duration: Duration,
}

// Helper module for Duration serialization
mod duration_serde {
    use serde::{Deserialize, Deserializer, Serialize, Serializer};
    use std::time::Duration;

    pub fn serialize<S>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        duration.as_secs().serialize(serializer)
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Duration, D::Error>
    where
        D: Deserializer<'de>,
    {
        let secs = u64::deserialize(deserializer)?;
        Ok(Duration::from_secs(secs))
    }
}
