//! Subprocess orchestration shared by all runners.
//!
//! One child per test run.  Stdout and stderr are streamed line by line
//! into a shared buffer while a `select!` races process exit against the
//! cancellation token and the per-invocation timeout; the losing branches
//! kill the child.

use std::process::Stdio;
use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::process::Command;
use tokio_util::sync::CancellationToken;

use scales_domain::error::Result;

/// How a monitored child came to an end.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitKind {
    Finished { code: Option<i32> },
    TimedOut,
    Cancelled,
}

/// Combined output of a completed (or killed) child.
#[derive(Debug, Clone)]
pub struct CommandOutput {
    /// Interleaved stdout + stderr lines, in arrival order per stream.
    pub lines: Vec<String>,
    pub exit: ExitKind,
}

impl CommandOutput {
    pub fn contains_line_with(&self, needle: &str) -> bool {
        self.lines.iter().any(|line| line.contains(needle))
    }
}

/// Run a command to completion, streaming combined output.  The child is
/// killed on timeout or cancellation; lines collected up to that point are
/// returned either way.
pub async fn run_streaming(
    mut cmd: Command,
    cancel: &CancellationToken,
    timeout: Duration,
) -> Result<CommandOutput> {
    cmd.stdout(Stdio::piped());
    cmd.stderr(Stdio::piped());
    cmd.stdin(Stdio::null());
    cmd.kill_on_drop(true);

    let mut child = cmd.spawn()?;
    let stdout = child.stdout.take();
    let stderr = child.stderr.take();

    let lines = Arc::new(Mutex::new(Vec::<String>::new()));

    let sink = lines.clone();
    let stdout_task = tokio::spawn(async move {
        if let Some(stdout) = stdout {
            let mut reader = BufReader::new(stdout).lines();
            while let Ok(Some(line)) = reader.next_line().await {
                sink.lock().push(line);
            }
        }
    });

    let sink = lines.clone();
    let stderr_task = tokio::spawn(async move {
        if let Some(stderr) = stderr {
            let mut reader = BufReader::new(stderr).lines();
            while let Ok(Some(line)) = reader.next_line().await {
                sink.lock().push(line);
            }
        }
    });

    let exit = tokio::select! {
        result = child.wait() => {
            match result {
                Ok(status) => ExitKind::Finished { code: status.code() },
                Err(e) => {
                    tracing::warn!(error = %e, "waiting on test subprocess failed");
                    ExitKind::Finished { code: None }
                }
            }
        }
        _ = cancel.cancelled() => {
            let _ = child.kill().await;
            ExitKind::Cancelled
        }
        _ = tokio::time::sleep(timeout) => {
            let _ = child.kill().await;
            ExitKind::TimedOut
        }
    };

    // Readers finish once the pipes close (exit or kill).
    let _ = stdout_task.await;
    let _ = stderr_task.await;

    let lines = lines.lock().clone();
    Ok(CommandOutput { lines, exit })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn captures_output_of_finished_child() {
        let mut cmd = Command::new("sh");
        cmd.arg("-c").arg("echo one; echo two 1>&2");
        let output = run_streaming(cmd, &CancellationToken::new(), Duration::from_secs(5))
            .await
            .unwrap();
        assert_eq!(output.exit, ExitKind::Finished { code: Some(0) });
        assert!(output.contains_line_with("one"));
        assert!(output.contains_line_with("two"));
    }

    #[tokio::test]
    async fn zero_timeout_kills_immediately() {
        let mut cmd = Command::new("sh");
        cmd.arg("-c").arg("sleep 30");
        let started = std::time::Instant::now();
        let output = run_streaming(cmd, &CancellationToken::new(), Duration::ZERO)
            .await
            .unwrap();
        assert_eq!(output.exit, ExitKind::TimedOut);
        assert!(started.elapsed() < Duration::from_secs(2));
    }

    #[tokio::test]
    async fn cancellation_kills_within_a_second() {
        let mut cmd = Command::new("sh");
        cmd.arg("-c").arg("sleep 30");
        let cancel = CancellationToken::new();
        let killer = cancel.clone();
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(50)).await;
            killer.cancel();
        });
        let started = std::time::Instant::now();
        let output = run_streaming(cmd, &cancel, Duration::from_secs(30))
            .await
            .unwrap();
        assert_eq!(output.exit, ExitKind::Cancelled);
        assert!(started.elapsed() < Duration::from_secs(1));
    }
}
