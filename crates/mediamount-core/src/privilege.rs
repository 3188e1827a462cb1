//! One-way privilege acquisition.
//!
//! The helper is installed setuid-root, so its effective uid is 0 but its
//! real ids belong to the caller. Right before an operation mutates the
//! filesystem or starts a system utility it switches real and effective
//! uid and gid to 0. There is no way back: the process exits once the
//! single requested operation finishes.

use mediamount_common::constants::EXIT_FAILURE;
use mediamount_common::error::{HelperError, Result};
use mediamount_common::types::CallerIdentity;
use nix::unistd::{Gid, Uid, getgid, getuid, setgid, setuid};

/// Proof that the process runs with root as its real and effective ids.
///
/// Cannot be built outside this module, cannot be cloned and is never
/// handed back, so code that takes `&Privileged` only runs after a
/// successful escalation.
#[derive(Debug)]
pub struct Privileged {
    _private: (),
}

/// Source of the [`Privileged`] token used by the operations.
pub trait PrivilegeGate {
    /// Returns the token, or terminates the process if root cannot be
    /// obtained.
    fn acquire(&self) -> Privileged;
}

/// Production gate backed by [`ensure_root`].
#[derive(Debug, Clone, Copy, Default)]
pub struct RootGate;

impl PrivilegeGate for RootGate {
    fn acquire(&self) -> Privileged {
        ensure_root()
    }
}

/// Switches real and effective uid and gid to 0.
///
/// The uid goes first: with an effective uid of 0, `setuid(0)` also sets
/// the real and saved ids, after which `setgid(0)` is permitted.
///
/// # Errors
///
/// Returns [`HelperError::PrivilegeEscalationFailed`] if either call fails.
/// The process may then hold root uid with a non-root gid, so callers must
/// not continue; use [`ensure_root`] unless you are about to exit anyway.
pub fn escalate() -> Result<Privileged> {
    let root_uid = Uid::from_raw(0);
    let root_gid = Gid::from_raw(0);

    setuid(root_uid).map_err(|errno| HelperError::PrivilegeEscalationFailed {
        source: std::io::Error::from(errno),
    })?;
    setgid(root_gid).map_err(|errno| HelperError::PrivilegeEscalationFailed {
        source: std::io::Error::from(errno),
    })?;

    tracing::debug!("escalated to root");
    Ok(Privileged { _private: () })
}

/// Acquires root or terminates the process with the failure status.
///
/// Never returns with partial privilege.
pub fn ensure_root() -> Privileged {
    match escalate() {
        Ok(token) => token,
        Err(e) => {
            tracing::error!(error = %e, "failed to get root, aborting");
            std::process::exit(EXIT_FAILURE);
        }
    }
}

/// Reads the real uid and gid of the invoking user.
#[must_use]
pub fn current_caller() -> CallerIdentity {
    CallerIdentity::new(getuid().as_raw(), getgid().as_raw())
}

/// Gate that hands out tokens without touching process credentials.
#[cfg(test)]
pub(crate) struct AssumedRoot;

#[cfg(test)]
impl PrivilegeGate for AssumedRoot {
    fn acquire(&self) -> Privileged {
        Privileged { _private: () }
    }
}
