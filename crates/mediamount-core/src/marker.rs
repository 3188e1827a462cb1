//! The ownership marker inside helper-created mount points.

use std::fs::{OpenOptions, Permissions};
use std::io::ErrorKind;
use std::os::unix::fs::{OpenOptionsExt, PermissionsExt};
use std::path::{Path, PathBuf};

use mediamount_common::error::{HelperError, Result};

/// Path of the marker file inside `mount_point`.
#[must_use]
pub fn marker_path(mount_point: &Path, marker_name: &str) -> PathBuf {
    mount_point.join(marker_name)
}

/// Writes an empty marker unless one is already there.
///
/// Uses an exclusive create so an existing file (or a symlink planted in
/// its place) is never truncated or followed. The mode is applied to the
/// open file afterwards, so the caller's umask has no effect on it.
///
/// # Errors
///
/// Returns [`HelperError::MarkerCreationFailed`] if the file cannot be created.
pub fn ensure_marker(mount_point: &Path, marker_name: &str, mode: u32) -> Result<PathBuf> {
    let path = marker_path(mount_point, marker_name);
    if path.symlink_metadata().is_ok() {
        return Ok(path);
    }
    match OpenOptions::new()
        .write(true)
        .create_new(true)
        .mode(mode)
        .open(&path)
    {
        Ok(file) => {
            if let Err(source) = file.set_permissions(Permissions::from_mode(mode)) {
                return Err(HelperError::MarkerCreationFailed { path, source });
            }
            tracing::debug!(marker = %path.display(), "marker created");
            Ok(path)
        }
        Err(e) if e.kind() == ErrorKind::AlreadyExists => Ok(path),
        Err(source) => Err(HelperError::MarkerCreationFailed { path, source }),
    }
}

/// Unlinks the marker if present. A missing marker is not an error.
///
/// # Errors
///
/// Returns [`HelperError::MarkerRemovalFailed`] if an existing marker
/// cannot be unlinked.
pub fn remove_marker(mount_point: &Path, marker_name: &str) -> Result<bool> {
    let path = marker_path(mount_point, marker_name);
    if path.symlink_metadata().is_err() {
        return Ok(false);
    }
    std::fs::remove_file(&path).map_err(|source| HelperError::MarkerRemovalFailed {
        path: path.clone(),
        source,
    })?;
    tracing::debug!(marker = %path.display(), "marker removed");
    Ok(true)
}
