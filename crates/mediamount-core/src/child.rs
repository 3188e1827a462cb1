//! Spawning a utility and waiting for it with a bounded poll.
//!
//! Removable-media drivers can wedge, so eject and unmount children get a
//! fixed number of sleep-then-`try_wait` rounds instead of a blocking wait.
//! A child still running afterwards counts as a failure and is left alone.

use std::fmt;
use std::os::unix::process::ExitStatusExt;
use std::process::ExitStatus;

use mediamount_common::config::PollPolicy;

use crate::platform::ToolCommand;

/// How a bounded child run ended.
#[derive(Debug)]
pub enum ChildOutcome {
    /// Exited normally with this code.
    Exited(i32),
    /// Killed by this signal.
    Signaled(i32),
    /// Still running when the poll budget ran out.
    TimedOut,
    /// The program is not installed in the safe `PATH`.
    Missing,
    /// The program was found but could not be started.
    SpawnFailed(std::io::Error),
    /// Waiting on the child failed.
    WaitFailed(std::io::Error),
}

impl ChildOutcome {
    /// `true` only for a normal exit with status 0.
    #[must_use]
    pub const fn succeeded(&self) -> bool {
        matches!(self, Self::Exited(0))
    }

    fn from_status(status: ExitStatus) -> Self {
        match (status.code(), status.signal()) {
            (Some(code), _) => Self::Exited(code),
            (None, Some(signal)) => Self::Signaled(signal),
            (None, None) => Self::WaitFailed(std::io::Error::other(format!(
                "unrecognised wait status {status}"
            ))),
        }
    }
}

impl fmt::Display for ChildOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Exited(code) => write!(f, "exited with status {code}"),
            Self::Signaled(signal) => write!(f, "killed by signal {signal}"),
            Self::TimedOut => f.write_str("timed out"),
            Self::Missing => f.write_str("not installed"),
            Self::SpawnFailed(e) => write!(f, "could not be started: {e}"),
            Self::WaitFailed(e) => write!(f, "wait failed: {e}"),
        }
    }
}

/// Runs `tool` and polls it at most `poll.attempts` times.
///
/// Each round sleeps `poll.interval` first, then checks without blocking,
/// so the total wait never exceeds [`PollPolicy::budget`].
pub fn run_bounded(tool: &ToolCommand, poll: PollPolicy) -> ChildOutcome {
    let Some(resolved) = tool.resolve() else {
        tracing::warn!(program = tool.program(), "utility not found in safe PATH");
        return ChildOutcome::Missing;
    };

    tracing::info!(command = %tool, "spawning utility");
    let mut child = match tool.to_command(&resolved).spawn() {
        Ok(child) => child,
        Err(e) => {
            tracing::warn!(program = tool.program(), error = %e, "failed to spawn utility");
            return ChildOutcome::SpawnFailed(e);
        }
    };

    for _ in 0..poll.attempts {
        std::thread::sleep(poll.interval);
        match child.try_wait() {
            Ok(Some(status)) => {
                let outcome = ChildOutcome::from_status(status);
                tracing::debug!(program = tool.program(), %outcome, "utility finished");
                return outcome;
            }
            Ok(None) => {}
            Err(e) => return ChildOutcome::WaitFailed(e),
        }
    }

    tracing::warn!(
        program = tool.program(),
        pid = child.id(),
        budget_ms = u64::try_from(poll.budget().as_millis()).unwrap_or(u64::MAX),
        "utility did not finish in time"
    );
    ChildOutcome::TimedOut
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::testing::sh;
    use std::time::{Duration, Instant};

    fn quick(attempts: u32) -> PollPolicy {
        PollPolicy {
            attempts,
            interval: Duration::from_millis(50),
        }
    }

    #[test]
    fn zero_exit_succeeds() {
        let outcome = run_bounded(&sh("exit 0"), quick(20));
        assert!(outcome.succeeded(), "{outcome}");
    }

    #[test]
    fn nonzero_exit_fails_with_code() {
        let outcome = run_bounded(&sh("exit 3"), quick(20));
        assert!(matches!(outcome, ChildOutcome::Exited(3)));
        assert!(!outcome.succeeded());
    }

    #[test]
    fn signal_termination_fails() {
        let outcome = run_bounded(&sh("kill -KILL $$"), quick(20));
        assert!(matches!(outcome, ChildOutcome::Signaled(9)), "{outcome}");
        assert!(!outcome.succeeded());
    }

    #[test]
    fn slow_child_times_out_within_budget() {
        let poll = quick(3);
        let started = Instant::now();
        let outcome = run_bounded(&sh("sleep 5"), poll);
        assert!(matches!(outcome, ChildOutcome::TimedOut));
        assert!(started.elapsed() < Duration::from_secs(3));
    }

    #[test]
    fn missing_program_is_reported() {
        let outcome = run_bounded(&ToolCommand::new("no-such-eject-utility-91c2"), quick(1));
        assert!(matches!(outcome, ChildOutcome::Missing));
    }

    #[test]
    fn child_sees_only_safe_path() {
        let script = format!(
            "test \"$PATH\" = \"{}\"",
            mediamount_common::constants::SAFE_PATH
        );
        assert!(run_bounded(&sh(&script), quick(20)).succeeded());
    }
}
