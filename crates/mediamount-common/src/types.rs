//! Domain primitive types shared by the core library and the binary.

use std::fmt;

/// The three things the helper can be asked to do.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    /// Mount a block device at a mount point.
    Mount,
    /// Eject a device and remove its mount point.
    Eject,
    /// Unmount and remove a stale mount point.
    Cleanup,
}

impl Action {
    /// Command-line spelling of the action.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Mount => "mount",
            Self::Eject => "eject",
            Self::Cleanup => "cleanup",
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Real uid and gid of the user who invoked the helper.
///
/// Captured before escalation so that mounted files end up owned by the
/// caller and not by root.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CallerIdentity {
    /// Real user id.
    pub uid: u32,
    /// Real group id.
    pub gid: u32,
}

impl CallerIdentity {
    /// Creates an identity from raw ids.
    #[must_use]
    pub const fn new(uid: u32, gid: u32) -> Self {
        Self { uid, gid }
    }
}

impl fmt::Display for CallerIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.uid, self.gid)
    }
}
