//! External validator invocation.
//!
//! The runner knows nothing about report semantics: it spawns one process,
//! waits for it with a timeout, and hands back exit code and both streams.
//! Invocation failures never surface as errors; they come back as a sentinel
//! outcome so the batch can record a failed file and keep going.

use std::ffi::OsStr;
use std::path::Path;
use std::time::Duration;

use tokio::process::Command;
use tokio::time::timeout;

/// Exit code reported when the process could not be spawned or timed out.
pub const EXEC_FAILED: i32 = -99;

/// Captured result of one validator invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatorOutcome {
    pub exit_code: i32,
    pub stdout: String,
    pub stderr: String,
}

impl ValidatorOutcome {
    fn exec_failed(diagnostic: String) -> Self {
        Self {
            exit_code: EXEC_FAILED,
            stdout: String::new(),
            stderr: diagnostic,
        }
    }

    /// True when the invocation itself failed (spawn error or timeout), as
    /// opposed to the validator running and reporting problems.
    pub fn exec_failed_outcome(&self) -> bool {
        self.exit_code == EXEC_FAILED
    }
}

/// Spawns external validators and captures their output.
#[derive(Debug, Clone)]
pub struct ValidatorRunner {
    timeout: Duration,
}

impl ValidatorRunner {
    pub fn new(timeout: Duration) -> Self {
        Self { timeout }
    }

    /// Run `executable` with `args`, blocking the batch until it exits or
    /// the timeout elapses. A timed-out process is killed.
    pub async fn run<S: AsRef<OsStr>>(&self, executable: &Path, args: &[S]) -> ValidatorOutcome {
        let mut command = Command::new(executable);
        command.args(args).kill_on_drop(true);

        match timeout(self.timeout, command.output()).await {
            Ok(Ok(output)) => ValidatorOutcome {
                exit_code: output.status.code().unwrap_or(-1),
                stdout: String::from_utf8_lossy(&output.stdout).to_string(),
                stderr: String::from_utf8_lossy(&output.stderr).to_string(),
            },
            Ok(Err(e)) => ValidatorOutcome::exec_failed(format!(
                "failed to execute {}: {}",
                executable.display(),
                e
            )),
            Err(_) => ValidatorOutcome::exec_failed(format!(
                "{} timed out after {}s",
                executable.display(),
                self.timeout.as_secs()
            )),
        }
    }
}
