//! Process environment sanitization.

use mediamount_common::constants::SAFE_PATH;

/// Replaces `PATH` with the fixed list of system directories, so a caller
/// cannot get their own `mount` or `eject` run as root.
#[allow(unsafe_code)]
pub fn restrict_path() {
    // SAFETY: called from `main` before any other thread exists.
    unsafe { std::env::set_var("PATH", SAFE_PATH) };
    tracing::debug!(path = SAFE_PATH, "restricted PATH");
}
