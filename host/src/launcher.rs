//! Sidecar process launcher
//!
//! Spawns the sidecar with the bridge coordinates in its environment, reads
//! its stdout until the port announcement, and stops it on shutdown.

use crate::error::HostError;
use crate::events::HostEvent;
use crate::state::HostState;
use portlink_common::config::{ENV_BRIDGE_TOKEN, ENV_BRIDGE_URL, ENV_SIDECAR_PORT};
use portlink_common::protocol::parse_port_announcement;
use std::path::PathBuf;
use std::process::Stdio;
use std::time::Duration;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, BufReader, Lines};
use tokio::process::Command;
use tokio::time::timeout;
use tracing::{debug, info, warn};

/// Time the sidecar gets to exit after SIGTERM before it is killed
const STOP_GRACE_PERIOD: Duration = Duration::from_secs(5);

/// Program and arguments used to start the sidecar
#[derive(Debug, Clone)]
pub struct SidecarCommand {
    /// Executable path
    pub program: PathBuf,
    /// Extra arguments
    pub args: Vec<String>,
}

impl SidecarCommand {
    /// Command without extra arguments
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
        }
    }
}

/// Environment passed to the sidecar
pub fn sidecar_env(state: &HostState) -> Vec<(&'static str, String)> {
    vec![
        (ENV_BRIDGE_URL, state.bridge_url()),
        (ENV_BRIDGE_TOKEN, state.bridge_token().to_string()),
        (ENV_SIDECAR_PORT, "0".to_string()),
    ]
}

/// Start the sidecar and wait for its port announcement
///
/// On success the child and port are recorded in `state` and a
/// [`HostEvent::ServerReady`] is published. On failure the child is killed.
pub async fn start_sidecar(
    state: &HostState,
    command: &SidecarCommand,
    startup_timeout: Duration,
) -> Result<u16, HostError> {
    info!(program = %command.program.display(), "Starting sidecar");

    let mut child = Command::new(&command.program)
        .args(&command.args)
        .envs(sidecar_env(state))
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::inherit())
        .kill_on_drop(true)
        .spawn()
        .map_err(|source| HostError::Spawn {
            program: command.program.display().to_string(),
            source,
        })?;

    let stdout = child.stdout.take().ok_or(HostError::StdoutUnavailable)?;
    let mut lines = BufReader::new(stdout).lines();

    let announced = timeout(startup_timeout, read_port_announcement(&mut lines))
        .await
        .unwrap_or(Err(HostError::StartupTimeout(startup_timeout)));

    let port = match announced {
        Ok(port) => port,
        Err(e) => {
            warn!(error = %e, "Sidecar failed to start");
            if let Err(kill_err) = child.kill().await {
                debug!(error = %kill_err, "Sidecar already exited");
            }
            return Err(e);
        }
    };

    tokio::spawn(drain_stdout(lines));
    state.attach_sidecar(child, port).await;
    info!(port, "Sidecar ready");
    Ok(port)
}

/// Read lines until the port announcement
///
/// Lines before the announcement are logged and skipped.
pub async fn read_port_announcement<R>(lines: &mut Lines<R>) -> Result<u16, HostError>
where
    R: AsyncBufRead + Unpin,
{
    while let Some(line) = lines.next_line().await.map_err(HostError::Output)? {
        match parse_port_announcement(&line) {
            Some(Ok(port)) if port != 0 => return Ok(port),
            Some(_) => return Err(HostError::InvalidPortAnnouncement(line)),
            None => debug!(target: "sidecar", "{}", line),
        }
    }
    Err(HostError::SidecarExited)
}

async fn drain_stdout<R>(mut lines: Lines<R>)
where
    R: AsyncBufRead + Unpin,
{
    loop {
        match lines.next_line().await {
            Ok(Some(line)) => debug!(target: "sidecar", "{}", line),
            Ok(None) => {
                debug!("Sidecar stdout closed");
                break;
            }
            Err(e) => {
                warn!(error = %e, "Failed to read sidecar stdout");
                break;
            }
        }
    }
}

/// Stop the sidecar if one is running
///
/// Sends SIGTERM (taskkill on Windows), waits for exit and kills the process
/// if it does not exit in time. The recorded port is cleared and
/// [`HostEvent::SidecarStopped`] is published.
pub async fn stop_sidecar(state: &HostState) -> Result<(), HostError> {
    let Some(mut child) = state.detach_sidecar().await else {
        debug!("No sidecar to stop");
        return Ok(());
    };

    info!("Stopping sidecar");
    let signalled = match child.id() {
        Some(pid) => match terminate(pid).await {
            Ok(()) => true,
            Err(e) => {
                warn!(error = %e, pid, "Failed to signal sidecar");
                false
            }
        },
        // Already reaped
        None => true,
    };

    let exited = signalled
        && match timeout(STOP_GRACE_PERIOD, child.wait()).await {
            Ok(Ok(status)) => {
                info!(%status, "Sidecar exited");
                true
            }
            Ok(Err(e)) => {
                warn!(error = %e, "Failed to wait for sidecar");
                false
            }
            Err(_) => {
                warn!("Sidecar did not exit within {:?}", STOP_GRACE_PERIOD);
                false
            }
        };

    let result = if exited {
        Ok(())
    } else {
        child
            .kill()
            .await
            .map_err(|e| HostError::Stop(e.to_string()))
    };

    state.events().publish(HostEvent::SidecarStopped);
    result
}

#[cfg(unix)]
async fn terminate(pid: u32) -> std::io::Result<()> {
    use nix::sys::signal::{kill, Signal};
    use nix::unistd::Pid;

    kill(Pid::from_raw(pid as i32), Signal::SIGTERM)
        .map_err(|e| std::io::Error::other(e.to_string()))
}

#[cfg(windows)]
async fn terminate(pid: u32) -> std::io::Result<()> {
    let output = Command::new("taskkill")
        .args(["/PID", &pid.to_string(), "/T", "/F"])
        .output()
        .await?;

    if output.status.success() {
        Ok(())
    } else {
        Err(std::io::Error::other(
            String::from_utf8_lossy(&output.stderr).to_string(),
        ))
    }
}
