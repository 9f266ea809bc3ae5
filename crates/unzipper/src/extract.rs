//! Archive extraction implementation with security features.

use crate::error::{ExtractError, Phase};
use crate::reader::{Entries, Entry};
use crate::safety::resolve_destination;
use crate::types::{ArchiveEntry, ExtractOptions, ExtractStats};
use std::fs::{self, File, OpenOptions};
use std::io::{self, Read, Seek};
use std::path::Path;
use std::time::Instant;
use tracing::{debug, info};

/// Materialize an entry sequence under `destination_root`.
///
/// This function performs the extraction with the following guarantees:
/// - Every entry path is validated and containment-checked before anything is
///   written for it
/// - Missing parent directories of file entries are created
/// - Entry permission bits are applied to files and directories
/// - Entries are processed in archive order and the first failure aborts the
///   whole operation; earlier entries stay on disk
///
/// # Arguments
///
/// * `entries` - Entry sequence produced by [`crate::ArchiveReader::entries`]
/// * `destination_root` - Directory to extract into; created if missing
/// * `options` - Extraction options
///
/// # Returns
///
/// Returns `ExtractStats` with extraction statistics on success.
pub fn extract_entries<R: Read + Seek>(
    mut entries: Entries<R>,
    destination_root: &Path,
    options: &ExtractOptions,
) -> Result<ExtractStats, ExtractError> {
    let start_time = Instant::now();

    fs::create_dir_all(destination_root)
        .map_err(|e| ExtractError::failed(destination_root, Phase::CreateDirectory, e))?;
    let root = destination_root
        .canonicalize()
        .map_err(|e| ExtractError::failed(destination_root, Phase::CreateDirectory, e))?;

    debug!(root = %root.display(), entries = entries.len(), "extracting archive");

    let mut stats = ExtractStats::default();

    while let Some(entry) = entries.next_entry() {
        let mut entry = entry?;
        let info = entry.info();

        let target = resolve_destination(&root, &info.path, info.is_directory).map_err(
            |reason| ExtractError::UnsafePath {
                path: info.path.clone(),
                reason,
            },
        )?;

        if info.is_directory {
            if target == root {
                debug!(entry = %info.path, "directory entry resolves to the root, skipping");
                continue;
            }
            extract_directory(&target, info, options)?;
            stats.directories_created += 1;
        } else {
            stats.bytes_written += extract_file(&target, &mut entry, options)?;
            stats.files_extracted += 1;
        }
    }

    stats.duration = start_time.elapsed();
    Ok(stats)
}

/// Create a directory entry and apply its mode to the leaf.
fn extract_directory(
    target: &Path,
    info: &ArchiveEntry,
    options: &ExtractOptions,
) -> Result<(), ExtractError> {
    fs::create_dir_all(target)
        .map_err(|e| ExtractError::failed(target, Phase::CreateDirectory, e))?;
    set_directory_mode(target, info.permissions())
        .map_err(|e| ExtractError::failed(target, Phase::SetPermissions, e))?;

    report(options, "Creating directory", target);
    Ok(())
}

/// Write a file entry, creating its parent chain first. Returns bytes written.
///
/// The destination handle lives only for this call, so descriptors never pile
/// up across entries.
fn extract_file(
    target: &Path,
    entry: &mut Entry<'_>,
    options: &ExtractOptions,
) -> Result<u64, ExtractError> {
    if let Some(parent) = target.parent() {
        fs::create_dir_all(parent)
            .map_err(|e| ExtractError::failed(parent, Phase::CreateParent, e))?;
    }

    let mut writer = create_file(target, entry.info().permissions())
        .map_err(|e| ExtractError::failed(target, Phase::CreateFile, e))?;

    let written = match entry.content() {
        Some(stream) => io::copy(stream, &mut writer)
            .map_err(|e| ExtractError::failed(target, Phase::Copy, e))?,
        None => 0,
    };

    report(options, "Decompressing", target);
    Ok(written)
}

/// Open `path` for writing, creating or truncating it.
///
/// On unix the mode is only used when the file is created, and the process
/// umask still applies.
fn create_file(path: &Path, mode: u32) -> io::Result<File> {
    let mut options = OpenOptions::new();
    options.write(true).create(true).truncate(true);

    #[cfg(unix)]
    {
        use std::os::unix::fs::OpenOptionsExt;
        options.mode(mode);
    }
    #[cfg(not(unix))]
    let _ = mode;

    options.open(path)
}

#[cfg(unix)]
fn set_directory_mode(path: &Path, mode: u32) -> io::Result<()> {
    use std::os::unix::fs::PermissionsExt;
    fs::set_permissions(path, fs::Permissions::from_mode(mode))
}

#[cfg(not(unix))]
fn set_directory_mode(_path: &Path, _mode: u32) -> io::Result<()> {
    Ok(())
}

fn report(options: &ExtractOptions, action: &str, path: &Path) {
    if options.verbose {
        info!(path = %path.display(), "{}", action);
    } else {
        debug!(path = %path.display(), "{}", action);
    }
}
