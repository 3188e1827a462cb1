//! Removing a mount point the helper created.
//!
//! There is no "is it still mounted" check: `rmdir` on a busy or non-empty
//! directory fails, and that failure is what gets reported.

use mediamount_common::error::{HelperError, Result};

use crate::child;
use crate::context::HelperContext;
use crate::marker;
use crate::privilege::Privileged;
use crate::validate::MountPointPath;

/// Unlinks the marker if present, then removes the directory.
///
/// # Errors
///
/// - [`HelperError::MarkerRemovalFailed`] if an existing marker cannot be unlinked.
/// - [`HelperError::DirectoryRemovalFailed`] if the directory cannot be
///   removed (not empty, still mounted, permission denied).
pub fn remove_mount_point(
    mount_point: &MountPointPath,
    marker_name: &str,
    _root: &Privileged,
) -> Result<()> {
    let path = mount_point.as_path();
    if !marker::remove_marker(path, marker_name)? {
        tracing::debug!(mount_point = %mount_point, "no marker present");
    }
    std::fs::remove_dir(path).map_err(|source| HelperError::DirectoryRemovalFailed {
        path: path.to_path_buf(),
        source,
    })?;
    tracing::info!(mount_point = %mount_point, "removed mount point");
    Ok(())
}

/// Detaches whatever is still mounted at `mount_point`, then removes it.
///
/// The unmount is best effort: a stale mount point is usually not mounted
/// any more, so its failure is only logged.
///
/// # Errors
///
/// Same as [`remove_mount_point`].
pub fn cleanup(ctx: &HelperContext, mount_point: &MountPointPath) -> Result<()> {
    let root = ctx.gate.acquire();
    let outcome = child::run_bounded(&ctx.tools.unmount_command(mount_point), ctx.config.poll);
    if !outcome.succeeded() {
        tracing::info!(mount_point = %mount_point, %outcome, "unmount before cleanup did not succeed");
    }
    remove_mount_point(mount_point, &ctx.config.marker_name, &root)
}
