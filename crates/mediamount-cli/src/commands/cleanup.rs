//! `mediamount-helper cleanup` — remove a stale mount point.

use mediamount_core::HelperContext;

use super::TargetArgs;

/// Validates the existing mount point, then unmounts and removes it.
///
/// The device argument is accepted for a uniform command line but not
/// used: a stale mount point may outlive its device node.
///
/// # Errors
///
/// Returns an error if validation or removal fails.
pub fn execute(args: &TargetArgs, ctx: &HelperContext) -> anyhow::Result<()> {
    let mount_point = ctx.policy.resolve_existing_mount_point(&args.mount_point)?;
    tracing::info!(mount_point = %mount_point, "cleaning up");
    mediamount_core::cleanup::cleanup(ctx, &mount_point)?;
    Ok(())
}
