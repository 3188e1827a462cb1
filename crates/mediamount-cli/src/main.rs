//! # mediamount-helper
//!
//! Setuid-root helper that mounts, ejects and cleans up removable media on
//! behalf of an unprivileged desktop application.
//!
//! ```text
//! mediamount-helper <mount|eject|cleanup> <device> <mount_point>
//! ```
//!
//! Exit status is 0 on success and 1 on any failure, with a diagnostic on
//! stderr.

#![cfg_attr(test, allow(clippy::expect_used, clippy::unwrap_used))]

mod commands;
mod environment;

use mediamount_common::constants::DEFAULT_LOG_FILTER;
use mediamount_core::HelperContext;

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(tracing_subscriber::EnvFilter::new(DEFAULT_LOG_FILTER))
        .with_target(false)
        .init();

    let cli = commands::parse(std::env::args_os())?;
    environment::restrict_path();

    let ctx = HelperContext::system();
    commands::execute(cli, &ctx)
}
