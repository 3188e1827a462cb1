//! `mediamount-helper eject` — eject a device and remove its mount point.

use mediamount_core::HelperContext;

use super::TargetArgs;

/// Validates the device and the existing mount point, then ejects.
///
/// # Errors
///
/// Returns an error if validation, ejecting or removing the mount point
/// fails.
pub fn execute(args: &TargetArgs, ctx: &HelperContext) -> anyhow::Result<()> {
    let device = ctx.policy.validate_device(&args.device)?;
    let mount_point = ctx.policy.resolve_existing_mount_point(&args.mount_point)?;
    tracing::info!(device = %device, mount_point = %mount_point, "ejecting");
    mediamount_core::eject::eject(ctx, &device, &mount_point)?;
    Ok(())
}
