//! Fixed paths, names and limits.
//!
//! These values are compiled in on purpose: a setuid helper must not take
//! any of them from files or the environment.

/// Root under which every accepted device node must resolve.
pub const DEVICE_ROOT: &str = "/dev/";

/// Root under which every accepted mount point must resolve.
pub const MOUNT_ROOT: &str = "/media/";

/// Path segment that marks a shared-memory location. Device paths
/// containing it are rejected even if they sit under [`DEVICE_ROOT`].
pub const SHM_SEGMENT: &str = "/shm/";

/// Name of the sentinel file written into mount points the helper created.
pub const MARKER_FILE: &str = ".created_by_mediamount_helper";

/// The only `PATH` the helper and its children ever see.
pub const SAFE_PATH: &str = "/bin:/sbin:/usr/bin:/usr/sbin:/usr/local/bin:/usr/local/sbin";

/// Permission bits for a freshly created mount point (`rwxr-xr-x`).
pub const MOUNT_POINT_MODE: u32 = 0o755;

/// Permission bits for the marker file (`rw-------`).
pub const MARKER_MODE: u32 = 0o600;

/// Number of one-interval polls granted to an eject or unmount child.
pub const POLL_ATTEMPTS: u32 = 7;

/// Seconds slept before each non-blocking wait on a child.
pub const POLL_INTERVAL_SECS: u64 = 1;

/// Exit status for every failure.
pub const EXIT_FAILURE: i32 = 1;

/// Log filter installed by the binary. Not overridable through `RUST_LOG`.
pub const DEFAULT_LOG_FILTER: &str = "warn";

/// Binary name of the helper.
pub const BIN_NAME: &str = "mediamount-helper";
