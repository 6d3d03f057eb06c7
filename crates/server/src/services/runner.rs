use std::{process::Stdio, time::Duration};

use serde::Serialize;
use tokio::{process::Command, time::timeout};

use crate::{
    config::Config,
    error::{AppError, Result},
};

/// Executes a user-submitted snippet in a fresh temporary directory with a
/// wall-clock timeout and capped output capture. Each invocation gets its
/// own scratch directory; nothing is shared between runs.
#[derive(Clone)]
pub struct Runner {
    command: String,
    timeout: Duration,
    max_output: usize,
}

#[derive(Debug, Serialize)]
pub struct RunOutcome {
    pub stdout: String,
    pub stderr: String,
    pub exit_code: Option<i32>,
    pub timed_out: bool,
    pub truncated: bool,
}

impl Runner {
    pub fn new(command: String, timeout_ms: u64, max_output: usize) -> Self {
        Self {
            command,
            timeout: Duration::from_millis(timeout_ms),
            max_output,
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(
            config.runner_command.clone(),
            config.runner_timeout_ms,
            config.runner_max_output,
        )
    }

    pub async fn run(&self, source: &str) -> Result<RunOutcome> {
        let dir = tempfile::tempdir()
            .map_err(|e| AppError::Internal(format!("Failed to create scratch directory: {e}")))?;
        let program = dir.path().join("program");
        tokio::fs::write(&program, source)
            .await
            .map_err(|e| AppError::Internal(format!("Failed to write program: {e}")))?;

        let child = Command::new(&self.command)
            .arg(&program)
            .current_dir(dir.path())
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(|e| AppError::Internal(format!("Failed to start interpreter: {e}")))?;

        match timeout(self.timeout, child.wait_with_output()).await {
            // Dropping the output future kills the child (kill_on_drop)
            Err(_) => Ok(RunOutcome {
                stdout: String::new(),
                stderr: String::new(),
                exit_code: None,
                timed_out: true,
                truncated: false,
            }),
            Ok(Err(e)) => Err(AppError::Internal(format!("Failed to run program: {e}"))),
            Ok(Ok(output)) => {
                let (stdout, out_truncated) = clamp(&output.stdout, self.max_output);
                let (stderr, err_truncated) = clamp(&output.stderr, self.max_output);
                Ok(RunOutcome {
                    stdout,
                    stderr,
                    exit_code: output.status.code(),
                    timed_out: false,
                    truncated: out_truncated || err_truncated,
                })
            }
        }
    }
}

fn clamp(bytes: &[u8], max: usize) -> (String, bool) {
    let truncated = bytes.len() > max;
    let text = String::from_utf8_lossy(&bytes[..bytes.len().min(max)]).into_owned();
    (text, truncated)
}
