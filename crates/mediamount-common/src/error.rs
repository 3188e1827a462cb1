//! Error taxonomy for the helper.
//!
//! Every failure ends up as free-text on stderr plus a non-zero exit
//! status, so variants carry enough context for a readable diagnostic
//! and nothing more.

use std::path::PathBuf;

use thiserror::Error;

/// Every way a helper invocation can fail.
#[derive(Debug, Error)]
pub enum HelperError {
    /// The command line or a path argument has the wrong shape.
    #[error("invalid argument: {message}")]
    InvalidArgument {
        /// What was wrong with the argument.
        message: String,
    },

    /// A path could not be canonicalized.
    #[error("unable to resolve {}: {source}", path.display())]
    ResolutionError {
        /// Path as supplied by the caller.
        path: PathBuf,
        /// Underlying OS error.
        source: std::io::Error,
    },

    /// A path escapes its required root or targets a forbidden location.
    #[error("refusing to operate on {}: {reason}", path.display())]
    PolicyViolation {
        /// Offending path.
        path: PathBuf,
        /// Which rule was broken.
        reason: String,
    },

    /// The device node exists but is not a block device.
    #[error("{} is not a block device", path.display())]
    NotABlockDevice {
        /// Resolved device path.
        path: PathBuf,
    },

    /// The device node disappeared before the mount could start.
    #[error("device node {} does not exist", path.display())]
    DeviceNotFound {
        /// Device path.
        path: PathBuf,
    },

    /// The ownership marker could not be written.
    #[error("failed to create marker {}: {source}", path.display())]
    MarkerCreationFailed {
        /// Marker file path.
        path: PathBuf,
        /// Underlying OS error.
        source: std::io::Error,
    },

    /// The ownership marker could not be unlinked.
    #[error("failed to remove marker {}: {source}", path.display())]
    MarkerRemovalFailed {
        /// Marker file path.
        path: PathBuf,
        /// Underlying OS error.
        source: std::io::Error,
    },

    /// The mount point directory could not be removed.
    #[error("failed to remove mount point {}: {source}", path.display())]
    DirectoryRemovalFailed {
        /// Mount point path.
        path: PathBuf,
        /// Underlying OS error.
        source: std::io::Error,
    },

    /// A system utility could not be started.
    #[error("failed to run {program}: {source}")]
    ExecFailed {
        /// Program name as configured.
        program: String,
        /// Underlying OS error.
        source: std::io::Error,
    },

    /// The device could not be ejected.
    #[error("failed to eject {}: {reason}", device.display())]
    EjectFailed {
        /// Device path.
        device: PathBuf,
        /// Outcome of the eject attempt.
        reason: String,
    },

    /// Switching real and effective ids to root failed.
    #[error("failed to acquire root privileges: {source}")]
    PrivilegeEscalationFailed {
        /// Underlying OS error.
        source: std::io::Error,
    },
}

/// Convenience alias used throughout the workspace.
pub type Result<T> = std::result::Result<T, HelperError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn policy_violation_names_path_and_reason() {
        let err = HelperError::PolicyViolation {
            path: PathBuf::from("/tmp/fake"),
            reason: "not under /dev/".into(),
        };
        assert_eq!(
            err.to_string(),
            "refusing to operate on /tmp/fake: not under /dev/"
        );
    }

    #[test]
    fn exec_failed_keeps_os_error() {
        let err = HelperError::ExecFailed {
            program: "mount".into(),
            source: std::io::Error::from(std::io::ErrorKind::NotFound),
        };
        assert!(err.to_string().starts_with("failed to run mount: "));
        assert!(std::error::Error::source(&err).is_some());
    }
}
