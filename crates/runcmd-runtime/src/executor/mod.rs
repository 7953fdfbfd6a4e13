//! The command executor.
//!
//! A run goes through three stages: resolve the run-as identity, spawn the
//! shell in its own process group, then wait for it under the optional
//! deadline. A timed-out child is terminated with SIGTERM and, after a grace
//! period, SIGKILL.

mod command;
mod identity;

use std::fs::File;
use std::os::unix::process::{CommandExt, ExitStatusExt};
use std::path::{Path, PathBuf};
use std::process::{ExitStatus, Stdio};
use std::time::{Duration, Instant};

use runcmd_core::ExecutionSettings;
use tokio::process::Command;
use tracing::{debug, info, warn};

use crate::error::{ExecError, ExecResult};
use crate::shutdown::terminate_child;

pub use command::Invocation;
pub use identity::{Identity, resolve_user};

/// Shell used to run invocations.
pub const DEFAULT_SHELL: &str = "/bin/sh";

/// Time a timed-out child gets between SIGTERM and SIGKILL.
pub const DEFAULT_GRACE_PERIOD: Duration = Duration::from_secs(5);

/// How a child that actually ran finished.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExecutionResult {
    /// Exit status; `128 + signal` when the child was killed by a signal.
    pub exit_code: i32,
    /// Signal that terminated the child, if any.
    pub signal: Option<i32>,
    /// Whether the deadline fired.
    pub timed_out: bool,
    /// Wall time from spawn to reaping.
    pub elapsed: Duration,
}

impl ExecutionResult {
    fn from_status(status: ExitStatus, timed_out: bool, elapsed: Duration) -> Self {
        let signal = status.signal();
        let exit_code = status
            .code()
            .unwrap_or_else(|| 128 + signal.unwrap_or_default());
        Self {
            exit_code,
            signal,
            timed_out,
            elapsed,
        }
    }

    /// Whether the child was killed by a signal rather than exiting.
    pub const fn terminated_by_signal(&self) -> bool {
        self.signal.is_some()
    }

    /// Whether the child exited with status 0 on its own.
    pub const fn success(&self) -> bool {
        self.exit_code == 0 && !self.timed_out && self.signal.is_none()
    }
}

/// Launches invocations through a shell.
#[derive(Debug, Clone)]
pub struct CommandExecutor {
    shell: PathBuf,
    grace_period: Duration,
}

impl Default for CommandExecutor {
    fn default() -> Self {
        Self {
            shell: PathBuf::from(DEFAULT_SHELL),
            grace_period: DEFAULT_GRACE_PERIOD,
        }
    }
}

impl CommandExecutor {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Run invocations with `shell -c` instead of [`DEFAULT_SHELL`].
    #[must_use]
    pub fn with_shell(mut self, shell: impl Into<PathBuf>) -> Self {
        self.shell = shell.into();
        self
    }

    /// Set the delay between SIGTERM and SIGKILL on timeout.
    #[must_use]
    pub const fn with_grace_period(mut self, grace_period: Duration) -> Self {
        self.grace_period = grace_period;
        self
    }

    /// Run `invocation` in `work_dir` and interpret its status.
    ///
    /// Succeeds only when the child exits 0 on its own. A nonzero exit is
    /// [`ExecError::Exit`], a fired deadline is [`ExecError::Timeout`]. The
    /// output files are closed when this returns, whatever the outcome.
    pub async fn run(
        &self,
        invocation: &Invocation,
        work_dir: &Path,
        stdout: File,
        stderr: File,
        settings: &ExecutionSettings,
    ) -> ExecResult<ExecutionResult> {
        let result = self
            .execute(invocation, work_dir, stdout, stderr, settings)
            .await?;

        if result.timed_out {
            return Err(ExecError::Timeout {
                seconds: settings.timeout_seconds,
                code: result.exit_code,
            });
        }
        if let Some(signal) = result.signal {
            warn!(signal, exit_code = result.exit_code, "command killed by signal");
        }
        if result.exit_code != 0 {
            return Err(ExecError::Exit {
                code: result.exit_code,
                signal: result.signal,
            });
        }

        info!(elapsed_ms = duration_ms(result.elapsed), "command succeeded");
        Ok(result)
    }

    /// Run `invocation` and report how it finished without judging the status.
    ///
    /// Errors only when the child could not be started or waited on.
    pub async fn execute(
        &self,
        invocation: &Invocation,
        work_dir: &Path,
        stdout: File,
        stderr: File,
        settings: &ExecutionSettings,
    ) -> ExecResult<ExecutionResult> {
        let identity = settings.run_as_user().map(resolve_user).transpose()?;

        let mut std_command = std::process::Command::new(&self.shell);
        std_command
            .arg("-c")
            .arg(invocation.command_line())
            .current_dir(work_dir)
            .envs(invocation.env().iter().map(|(k, v)| (k, v)))
            .stdin(Stdio::null())
            .stdout(Stdio::from(stdout))
            .stderr(Stdio::from(stderr))
            .process_group(0);
        if let Some(identity) = identity {
            std_command.uid(identity.uid).gid(identity.gid);
        }
        let mut command = Command::from(std_command);
        command.kill_on_drop(true);

        info!(
            work_dir = %work_dir.display(),
            timeout_secs = settings.timeout_seconds,
            run_as_user = settings.run_as_user().unwrap_or_default(),
            env_vars = invocation.env().len(),
            "executing command"
        );

        let started = Instant::now();
        let mut child = command.spawn().map_err(ExecError::Launch)?;
        // The parent's copies of the output descriptors are released here
        drop(command);
        debug!(pid = ?child.id(), "command started");

        let (status, timed_out) = match settings.timeout() {
            Some(limit) => match tokio::time::timeout(limit, child.wait()).await {
                Ok(status) => (status.map_err(ExecError::Wait)?, false),
                Err(_) => {
                    warn!(timeout_secs = settings.timeout_seconds, "command timed out, terminating");
                    let status = terminate_child(&mut child, self.grace_period)
                        .await
                        .map_err(ExecError::Wait)?;
                    (status, true)
                }
            },
            None => (child.wait().await.map_err(ExecError::Wait)?, false),
        };

        let result = ExecutionResult::from_status(status, timed_out, started.elapsed());
        debug!(
            exit_code = result.exit_code,
            signal = ?result.signal,
            timed_out,
            elapsed_ms = duration_ms(result.elapsed),
            "command finished"
        );
        Ok(result)
    }
}

fn duration_ms(duration: Duration) -> u64 {
    u64::try_from(duration.as_millis()).unwrap_or(u64::MAX)
}
