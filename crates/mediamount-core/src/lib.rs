//! # mediamount-core
//!
//! Everything the privileged helper does between argument parsing and exit:
//! - **Validation**: canonicalize and whitelist device and mount-point paths.
//! - **Privilege**: one-way acquisition of root, failing closed.
//! - **Platform**: the mount, eject and unmount argument vectors per OS family.
//! - **Operations**: mount, eject (with unmount fallback) and cleanup.
//!
//! Child processes are always started from a discrete argument vector with
//! a fixed `PATH`; no shell is ever involved.

#![cfg_attr(test, allow(clippy::expect_used, clippy::unwrap_used, clippy::panic))]

pub mod child;
pub mod cleanup;
pub mod context;
pub mod eject;
pub mod marker;
pub mod mount;
pub mod platform;
pub mod privilege;
pub mod validate;

pub use context::HelperContext;
pub use privilege::{Privileged, PrivilegeGate, RootGate};
pub use validate::{DevicePath, MountPointPath, PathPolicy};
