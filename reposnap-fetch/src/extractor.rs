//! Streaming tarball extraction.
//!
//! Decodes a gzip-compressed tar stream entry by entry and writes the
//! tree under a destination directory. The hosting provider's tarballs
//! always wrap the repository in a synthetic top-level directory named
//! `owner-repo-sha`; exactly one leading path component is stripped
//! from every entry to undo it.
//!
//! A single entry failing to write never aborts the run. Failures are
//! logged and folded into an aggregate partial-error flag so a mostly
//! usable tree still lands on disk.

use std::fs;
use std::io::{self, Read};
use std::path::{Component, Path, PathBuf};

use flate2::read::GzDecoder;
use futures::TryStreamExt;
use tar::{Archive, Entry};
use tokio_util::io::{StreamReader, SyncIoBridge};
use tracing::{debug, warn};

use crate::error::ExtractError;

// ============================================================================
// Path resolution
// ============================================================================

/// Normalizes a recorded entry path.
///
/// Keeps only plain components: `.` is dropped, `..` pops, leading
/// separators and prefixes are removed. A hostile path can therefore
/// never climb out of the destination.
pub fn clean_entry_path(path: &Path) -> PathBuf {
    let mut cleaned = PathBuf::new();
    for component in path.components() {
        match component {
            Component::Normal(part) => cleaned.push(part),
            Component::ParentDir => {
                cleaned.pop();
            }
            Component::CurDir | Component::RootDir | Component::Prefix(_) => {}
        }
    }
    cleaned
}

/// Drops the first path component (the archive's wrapper directory).
///
/// The wrapper entry itself becomes empty and is skipped by the caller.
pub fn strip_first_component(path: &Path) -> PathBuf {
    path.components().skip(1).collect()
}

/// Resolves where an entry lands on disk.
///
/// Once a directory entry matching the expected repository root has
/// been detected, later entries resolve beneath it; the root entry
/// itself (and any repeat of it) resolves to `destination/root`. Before
/// detection, or when the archive never contains such a directory,
/// entries land directly under `destination`.
pub fn entry_destination(
    destination: &Path,
    detected_root: Option<&str>,
    name: &Path,
    is_dir: bool,
) -> PathBuf {
    match detected_root {
        Some(root) if is_dir && name == Path::new(root) => destination.join(name),
        Some(root) => destination.join(root).join(name),
        None => destination.join(name),
    }
}

// ============================================================================
// Extraction
// ============================================================================

/// Extracts a gzip-compressed tar stream into `destination`.
///
/// Returns whether any individual entry failed to write. An empty
/// archive is a successful extraction; end-of-stream is the normal loop
/// terminator, not an error.
pub fn extract<R: Read>(
    reader: R,
    destination: &Path,
    expected_root: &str,
) -> Result<bool, ExtractError> {
    let decoder = GzDecoder::new(reader);
    let mut archive = Archive::new(decoder);

    let mut had_partial_errors = false;
    let mut detected_root: Option<String> = None;

    for entry in archive.entries()? {
        let mut entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                // A broken tar stream cannot be resynchronized; keep
                // whatever already landed on disk.
                warn!(error = %e, "Archive stream ended early");
                had_partial_errors = true;
                break;
            }
        };

        let recorded = match entry.path() {
            Ok(path) => path.into_owned(),
            Err(e) => {
                warn!(error = %e, "Skipping entry with unreadable path");
                had_partial_errors = true;
                continue;
            }
        };

        let name = strip_first_component(&clean_entry_path(&recorded));
        if name.as_os_str().is_empty() {
            // The wrapper directory itself.
            continue;
        }

        let is_dir = entry.header().entry_type().is_dir();
        if is_dir && detected_root.is_none() && name == Path::new(expected_root) {
            debug!(root = %expected_root, "Detected repository root in archive");
            detected_root = Some(expected_root.to_string());
        }

        let out = entry_destination(destination, detected_root.as_deref(), &name, is_dir);
        let mode = entry.header().mode().ok();

        let result = if is_dir {
            make_dir(&out, mode)
        } else {
            write_entry(&mut entry, &out, mode)
        };

        if let Err(e) = result {
            warn!(path = %out.display(), error = %e, "Failed to extract entry");
            had_partial_errors = true;
        }
    }

    Ok(had_partial_errors)
}

/// Extracts an HTTP response body without buffering it in memory.
///
/// The async byte stream is bridged into the blocking gzip/tar decoder
/// on a blocking task; decompression and disk writes proceed while the
/// download is still in flight.
pub async fn extract_response(
    response: reqwest::Response,
    destination: PathBuf,
    expected_root: String,
) -> Result<bool, ExtractError> {
    let stream = Box::pin(response.bytes_stream().map_err(io::Error::other));
    let reader = SyncIoBridge::new(StreamReader::new(stream));

    tokio::task::spawn_blocking(move || extract(reader, &destination, &expected_root)).await?
}

// ============================================================================
// Filesystem writes
// ============================================================================

fn make_dir(path: &Path, mode: Option<u32>) -> io::Result<()> {
    fs::create_dir_all(path)?;
    apply_mode(path, mode)
}

fn write_entry<R: Read>(entry: &mut Entry<'_, R>, path: &Path, mode: Option<u32>) -> io::Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }

    // Create/truncate: duplicate entry paths overwrite, last write wins.
    let mut file = fs::File::create(path)?;
    io::copy(entry, &mut file)?;
    drop(file);

    apply_mode(path, mode)
}

#[cfg(unix)]
fn apply_mode(path: &Path, mode: Option<u32>) -> io::Result<()> {
    use std::os::unix::fs::PermissionsExt;

    if let Some(mode) = mode {
        fs::set_permissions(path, fs::Permissions::from_mode(mode & 0o777))?;
    }
    Ok(())
}

#[cfg(not(unix))]
fn apply_mode(_path: &Path, _mode: Option<u32>) -> io::Result<()> {
    Ok(())
}
