//! Command-line definition and action dispatch.

pub mod cleanup;
pub mod eject;
pub mod mount;

use std::ffi::OsString;
use std::path::PathBuf;

use clap::error::ErrorKind;
use clap::{Args, Parser, Subcommand};
use mediamount_common::error::HelperError;
use mediamount_common::types::Action;
use mediamount_core::HelperContext;

/// Mount, eject and clean up removable media as root.
#[derive(Parser, Debug)]
#[command(
    name = mediamount_common::constants::BIN_NAME,
    version,
    about,
    long_about = None,
    disable_help_subcommand = true
)]
pub struct Cli {
    /// Action to perform.
    #[command(subcommand)]
    pub command: Command,
}

/// The three supported actions. Names must match exactly.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Mount a block device under /media.
    Mount(TargetArgs),
    /// Eject a device and remove its mount point.
    Eject(TargetArgs),
    /// Unmount and remove a stale mount point.
    Cleanup(TargetArgs),
}

impl Command {
    /// The action this subcommand stands for.
    #[must_use]
    pub const fn action(&self) -> Action {
        match self {
            Self::Mount(_) => Action::Mount,
            Self::Eject(_) => Action::Eject,
            Self::Cleanup(_) => Action::Cleanup,
        }
    }
}

/// Positional arguments shared by every action.
#[derive(Args, Debug)]
pub struct TargetArgs {
    /// Device node, e.g. /dev/sdb1.
    pub device: PathBuf,
    /// Mount point under /media.
    pub mount_point: PathBuf,
}

/// Parses the command line.
///
/// `--help` and `--version` print and exit 0. Any other parse failure
/// prints clap's diagnostic and becomes [`HelperError::InvalidArgument`].
///
/// # Errors
///
/// Returns an error on wrong arity or an unrecognized action.
pub fn parse<I, T>(args: I) -> anyhow::Result<Cli>
where
    I: IntoIterator<Item = T>,
    T: Into<OsString> + Clone,
{
    match Cli::try_parse_from(args) {
        Ok(cli) => Ok(cli),
        Err(e) if matches!(e.kind(), ErrorKind::DisplayHelp | ErrorKind::DisplayVersion) => e.exit(),
        Err(e) => {
            let _ = e.print();
            Err(HelperError::InvalidArgument {
                message: "needs 3 arguments: action (mount, eject or cleanup), device node and mount point".into(),
            }
            .into())
        }
    }
}

/// Dispatches the parsed action to its handler.
///
/// # Errors
///
/// Returns an error if validation or the operation fails.
pub fn execute(cli: Cli, ctx: &HelperContext) -> anyhow::Result<()> {
    tracing::debug!(action = %cli.command.action(), "dispatching");
    match cli.command {
        Command::Mount(args) => mount::execute(&args, ctx),
        Command::Eject(args) => eject::execute(&args, ctx),
        Command::Cleanup(args) => cleanup::execute(&args, ctx),
    }
}
