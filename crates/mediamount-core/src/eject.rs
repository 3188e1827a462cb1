//! Ejecting a device, with a plain unmount as second strategy.

use mediamount_common::error::{HelperError, Result};

use crate::child::{self, ChildOutcome};
use crate::cleanup::remove_mount_point;
use crate::context::HelperContext;
use crate::validate::{DevicePath, MountPointPath};

/// Ejects `device` and removes `mount_point`.
///
/// The eject utility gets the bounded poll. If it does not exit 0 in time,
/// a lazy unmount is run the same way, but the operation still fails:
/// the caller asked for the media to be released, not just detached.
/// When the eject utility is not installed at all the platform cannot
/// eject, and the unmount is the whole operation.
///
/// # Errors
///
/// - [`HelperError::EjectFailed`] if ejecting (or, without an eject utility,
///   unmounting) did not succeed.
/// - Errors from [`remove_mount_point`] once the device is released.
pub fn eject(ctx: &HelperContext, device: &DevicePath, mount_point: &MountPointPath) -> Result<()> {
    let root = ctx.gate.acquire();
    let poll = ctx.config.poll;

    let ejected = child::run_bounded(&ctx.tools.eject_command(device), poll);
    if ejected.succeeded() {
        tracing::info!(device = %device, "device ejected");
        return remove_mount_point(mount_point, &ctx.config.marker_name, &root);
    }

    let unmounted = child::run_bounded(&ctx.tools.unmount_command(mount_point), poll);

    if matches!(ejected, ChildOutcome::Missing) {
        if unmounted.succeeded() {
            tracing::info!(
                device = %device,
                mount_point = %mount_point,
                "no eject utility, unmounted instead"
            );
            return remove_mount_point(mount_point, &ctx.config.marker_name, &root);
        }
        return Err(HelperError::EjectFailed {
            device: device.as_path().to_path_buf(),
            reason: format!("no eject utility and unmount {unmounted}"),
        });
    }

    tracing::warn!(
        device = %device,
        eject = %ejected,
        unmount = %unmounted,
        "eject failed"
    );
    Err(HelperError::EjectFailed {
        device: device.as_path().to_path_buf(),
        reason: format!("eject {ejected}, fallback unmount {unmounted}"),
    })
}
