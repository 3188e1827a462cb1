//! Mounting a validated device at a validated mount point.
//!
//! The final step replaces the helper's process image with the system
//! mount utility, so on success nothing after the exec runs and the
//! utility's exit status is the helper's exit status.

use std::convert::Infallible;
use std::fs::{DirBuilder, Permissions};
use std::io::ErrorKind;
use std::os::unix::fs::{DirBuilderExt, PermissionsExt};
use std::os::unix::process::CommandExt;

use mediamount_common::error::{HelperError, Result};

use crate::context::HelperContext;
use crate::marker;
use crate::platform::ToolCommand;
use crate::validate::{DevicePath, MountPointPath};

/// Creates and marks the mount point, then returns the mount invocation.
///
/// Everything [`mount`] does short of acquiring root and exec'ing.
///
/// # Errors
///
/// - [`HelperError::DeviceNotFound`] if the device node vanished.
/// - [`HelperError::ResolutionError`] if the mount point cannot be
///   canonicalized after creation.
/// - [`HelperError::PolicyViolation`] if it no longer resolves under the
///   mount root.
/// - [`HelperError::MarkerCreationFailed`] if the marker cannot be written.
pub fn prepare_mount(
    ctx: &HelperContext,
    device: &DevicePath,
    mount_point: &MountPointPath,
) -> Result<ToolCommand> {
    if !device.as_path().exists() {
        return Err(HelperError::DeviceNotFound {
            path: device.as_path().to_path_buf(),
        });
    }

    let requested = mount_point.as_path();
    if !requested.exists() {
        // The inherited umask would otherwise narrow the mode.
        let created = DirBuilder::new()
            .mode(ctx.config.mount_point_mode)
            .create(requested)
            .and_then(|()| {
                std::fs::set_permissions(
                    requested,
                    Permissions::from_mode(ctx.config.mount_point_mode),
                )
            });
        match created {
            Ok(()) => tracing::info!(mount_point = %mount_point, "created mount point"),
            // Not fatal here: the re-check below or mount itself reports it.
            Err(e) => tracing::warn!(
                mount_point = %mount_point,
                error = %e,
                "failed to create mount point"
            ),
        }
    }

    // The directory may have been swapped since validation.
    let canonical = requested
        .canonicalize()
        .map_err(|source| HelperError::ResolutionError {
            path: requested.to_path_buf(),
            source,
        })?;
    if !ctx.policy.is_under_mount_root(&canonical) {
        return Err(HelperError::PolicyViolation {
            path: canonical,
            reason: format!(
                "mount point is not under {}",
                ctx.policy.mount_root().display()
            ),
        });
    }

    let _ = marker::ensure_marker(&canonical, &ctx.config.marker_name, ctx.config.marker_mode)?;

    let mount_point = MountPointPath::rechecked(canonical);
    Ok(ctx.tools.mount_command(device, &mount_point, ctx.caller))
}

/// Mounts `device` at `mount_point` by becoming the mount utility.
///
/// Only returns on failure.
///
/// # Errors
///
/// Any error from [`prepare_mount`], or [`HelperError::ExecFailed`] if the
/// mount utility cannot be started.
pub fn mount(
    ctx: &HelperContext,
    device: &DevicePath,
    mount_point: &MountPointPath,
) -> Result<Infallible> {
    let command = prepare_mount(ctx, device, mount_point)?;
    let _root = ctx.gate.acquire();
    Err(exec_tool(&command))
}

/// Replaces the current process with `tool`. Returns only the reason it
/// could not.
pub fn exec_tool(tool: &ToolCommand) -> HelperError {
    let Some(resolved) = tool.resolve() else {
        return HelperError::ExecFailed {
            program: tool.program().to_string(),
            source: std::io::Error::new(ErrorKind::NotFound, "not found in safe PATH"),
        };
    };
    tracing::info!(command = %tool, "exec'ing utility");
    let source = tool.to_command(&resolved).exec();
    HelperError::ExecFailed {
        program: tool.program().to_string(),
        source,
    }
}
