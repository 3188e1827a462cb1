//! Configuration model for a helper invocation.
//!
//! The binary always runs with [`HelperConfig::default`]. The struct exists
//! so the roots and timings can be pointed at scratch directories in tests.

use std::path::PathBuf;
use std::time::Duration;

use crate::constants;

/// How long to wait on an eject or unmount child.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollPolicy {
    /// Number of sleep-then-check rounds.
    pub attempts: u32,
    /// Sleep before each check.
    pub interval: Duration,
}

impl PollPolicy {
    /// Upper bound on the time spent waiting for one child.
    #[must_use]
    pub fn budget(&self) -> Duration {
        self.interval * self.attempts
    }
}

impl Default for PollPolicy {
    fn default() -> Self {
        Self {
            attempts: constants::POLL_ATTEMPTS,
            interval: Duration::from_secs(constants::POLL_INTERVAL_SECS),
        }
    }
}

/// Root configuration for the helper.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HelperConfig {
    /// Device nodes must resolve under this directory.
    pub device_root: PathBuf,
    /// Mount points must resolve under this directory.
    pub mount_root: PathBuf,
    /// Path segment that disqualifies a device path.
    pub shm_segment: String,
    /// File name of the ownership marker.
    pub marker_name: String,
    /// Mode for newly created mount points.
    pub mount_point_mode: u32,
    /// Mode for the marker file.
    pub marker_mode: u32,
    /// Bounded wait applied to eject and unmount children.
    pub poll: PollPolicy,
}

impl Default for HelperConfig {
    fn default() -> Self {
        Self {
            device_root: PathBuf::from(constants::DEVICE_ROOT),
            mount_root: PathBuf::from(constants::MOUNT_ROOT),
            shm_segment: constants::SHM_SEGMENT.to_string(),
            marker_name: constants::MARKER_FILE.to_string(),
            mount_point_mode: constants::MOUNT_POINT_MODE,
            marker_mode: constants::MARKER_MODE,
            poll: PollPolicy::default(),
        }
    }
}
