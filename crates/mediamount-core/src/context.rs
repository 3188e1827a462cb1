//! Everything an operation needs, gathered once per invocation.

use mediamount_common::config::HelperConfig;
use mediamount_common::types::CallerIdentity;

use crate::platform::{MediaTools, PlatformFamily};
use crate::privilege::{self, PrivilegeGate, RootGate};
use crate::validate::PathPolicy;

/// Per-invocation state shared by the mount, eject and cleanup operations.
pub struct HelperContext {
    /// Roots, marker name, modes and poll policy.
    pub config: HelperConfig,
    /// Path whitelist derived from `config`.
    pub policy: PathPolicy,
    /// User who invoked the helper, captured before escalation.
    pub caller: CallerIdentity,
    /// Utility invocations for this platform.
    pub tools: Box<dyn MediaTools>,
    /// Source of root privilege.
    pub gate: Box<dyn PrivilegeGate>,
}

impl HelperContext {
    /// Context used by the binary: default configuration, the native
    /// platform's utilities and the real root gate.
    #[must_use]
    pub fn system() -> Self {
        let config = HelperConfig::default();
        Self {
            policy: PathPolicy::new(&config),
            caller: privilege::current_caller(),
            tools: Box::new(PlatformFamily::current()),
            gate: Box::new(RootGate),
            config,
        }
    }

    /// Context with explicit parts, for alternate roots and utilities.
    #[must_use]
    pub fn with_parts(
        config: HelperConfig,
        caller: CallerIdentity,
        tools: Box<dyn MediaTools>,
        gate: Box<dyn PrivilegeGate>,
    ) -> Self {
        Self {
            policy: PathPolicy::new(&config),
            caller,
            tools,
            gate,
            config,
        }
    }
}

impl std::fmt::Debug for HelperContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HelperContext")
            .field("config", &self.config)
            .field("caller", &self.caller)
            .finish_non_exhaustive()
    }
}
