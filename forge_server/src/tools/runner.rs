use super::{ToolError, ToolSpec};
use serde::Serialize;
use std::path::Path;
use std::process::Stdio;
use tokio::process::Command;
use tokio::time;

/// Captured output of one tool invocation, returned to the caller verbatim.
/// A nonzero `rc` is not treated as a failure; interpreting tool-specific
/// exit semantics is the caller's job.
#[derive(Debug, Clone, Serialize)]
pub struct ToolOutput {
    pub stdout: String,
    pub stderr: String,
    pub rc: i32,
}

/// Run a tool against an evidence file, waiting up to the spec's timeout.
///
/// The child is spawned as its own process group leader; on timeout the
/// whole group is killed so no tool process outlives its bound.
pub async fn run(spec: &ToolSpec, evidence: &Path) -> Result<ToolOutput, ToolError> {
    let mut cmd = Command::new(&spec.binary);
    cmd.args(&spec.args)
        .arg(evidence)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .kill_on_drop(true);

    #[cfg(unix)]
    cmd.process_group(0);

    tracing::info!(
        "Running {}: {} {:?} {}",
        spec.name,
        spec.binary,
        spec.args,
        evidence.display()
    );

    let child = match cmd.spawn() {
        Ok(child) => child,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            tracing::warn!("{} binary not found: {}", spec.name, spec.binary);
            return Err(ToolError::BinaryMissing {
                binary: spec.binary.clone(),
            });
        }
        Err(e) => return Err(e.into()),
    };
    let pid = child.id();

    let output = match time::timeout(spec.timeout, child.wait_with_output()).await {
        Ok(output) => output?,
        Err(_) => {
            kill_process_group(pid);
            tracing::warn!(
                "{} exceeded {}s timeout, killed process group",
                spec.name,
                spec.timeout.as_secs()
            );
            return Err(ToolError::Timeout {
                tool: spec.name,
                seconds: spec.timeout.as_secs(),
            });
        }
    };

    let result = ToolOutput {
        stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
        stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        rc: output.status.code().unwrap_or(-1),
    };

    tracing::info!("{} completed: rc={}", spec.name, result.rc);
    Ok(result)
}

#[cfg(unix)]
fn kill_process_group(pid: Option<u32>) {
    use nix::sys::signal::{killpg, Signal};
    use nix::unistd::Pid;

    // The child is its own group leader, so its pid doubles as the pgid.
    // The handle itself is already killed via kill_on_drop; this sweeps up
    // any grandchildren the tool spawned.
    if let Some(pid) = pid {
        let _ = killpg(Pid::from_raw(pid as i32), Signal::SIGKILL);
    }
}

#[cfg(not(unix))]
fn kill_process_group(_pid: Option<u32>) {}
