//! # mediamount-common
//!
//! Shared constants, the error taxonomy, the configuration model and the
//! validated path types used across the mediamount workspace.
//!
//! This crate is the leaf of the dependency graph: it depends on no other
//! internal crate and performs no I/O of its own.

pub mod config;
pub mod constants;
pub mod error;
pub mod types;
