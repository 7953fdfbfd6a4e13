//! Terminating a timed-out child with SIGTERM, escalating to SIGKILL.
//!
//! The child is the leader of its own process group, so signals reach every
//! process the script started and not only the shell.

use std::io;
use std::process::ExitStatus;
use std::time::Duration;

use nix::errno::Errno;
use nix::sys::signal::{Signal, killpg};
use nix::unistd::Pid;
use tokio::process::Child;
use tokio::time::timeout;
use tracing::{debug, warn};

/// Stop `child` and reap it.
///
/// 1. SIGTERM to the process group, then wait up to `grace`
/// 2. SIGKILL to the process group if the child is still running
/// 3. Wait for the child so no zombie is left behind
pub(crate) async fn terminate_child(child: &mut Child, grace: Duration) -> io::Result<ExitStatus> {
    let Some(pid) = child.id() else {
        // Already reaped
        return child.wait().await;
    };
    let group = Pid::from_raw(i32::try_from(pid).map_err(io::Error::other)?);

    if !signal_group(group, Signal::SIGTERM)? {
        return child.wait().await;
    }

    if let Ok(status) = timeout(grace, child.wait()).await {
        return status;
    }

    warn!(pid, ?grace, "child ignored SIGTERM, sending SIGKILL");
    if !signal_group(group, Signal::SIGKILL)? {
        return child.wait().await;
    }
    child.wait().await
}

/// Returns `false` when the group no longer exists.
fn signal_group(group: Pid, signal: Signal) -> io::Result<bool> {
    match killpg(group, signal) {
        Ok(()) => {
            debug!(pgid = group.as_raw(), signal = signal.as_str(), "signalled process group");
            Ok(true)
        }
        Err(Errno::ESRCH) => Ok(false),
        Err(e) => Err(io::Error::other(e)),
    }
}
