//! `mediamount-helper mount` — mount a block device under the mount root.

use mediamount_core::HelperContext;

use super::TargetArgs;

/// Validates both paths, then hands the process over to the mount utility.
///
/// Only returns on failure.
///
/// # Errors
///
/// Returns an error if validation fails or the mount utility cannot be
/// started.
pub fn execute(args: &TargetArgs, ctx: &HelperContext) -> anyhow::Result<()> {
    let device = ctx.policy.validate_device(&args.device)?;
    let mount_point = ctx.policy.resolve_mount_point(&args.mount_point)?;
    tracing::info!(device = %device, mount_point = %mount_point, caller = %ctx.caller, "mounting");
    match mediamount_core::mount::mount(ctx, &device, &mount_point)? {}
}
