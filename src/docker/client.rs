use std::path::PathBuf;
use std::process::{ExitStatus, Stdio};
use tokio::process::Command;
use tokio_util::sync::CancellationToken;

use super::config::RunOptions;
use crate::error::{Error, Result};

pub const DEFAULT_RUNTIME: &str = "docker";

/// Drives the container runtime CLI as a foreground child process
pub struct DockerCli {
    runtime: String,
}

impl DockerCli {
    pub fn new(runtime: impl Into<String>) -> Self {
        Self {
            runtime: runtime.into(),
        }
    }

    /// Full command line for `options`, runtime binary first.
    pub fn command_line(&self, options: &RunOptions) -> Result<Vec<String>> {
        let mut line = vec![self.runtime.clone()];
        line.extend(options.args()?);
        Ok(line)
    }

    /// Locate the runtime binary on PATH (or as given, if it is a path).
    fn binary(&self) -> Result<PathBuf> {
        which::which(&self.runtime).map_err(|e| Error::Launch {
            runtime: self.runtime.clone(),
            reason: e.to_string(),
        })
    }

    /// Run a container in the foreground with the caller's stdio attached.
    ///
    /// Cancelling `token` kills the runtime process. A nonzero exit is
    /// returned as [`Error::ChildExit`] so the caller can pass the code on.
    pub async fn run(&self, token: &CancellationToken, options: &RunOptions) -> Result<()> {
        let binary = self.binary()?;
        let args = options.args()?;

        tracing::debug!("Running {} {}", binary.display(), shell_words::join(&args));

        let mut child = Command::new(&binary)
            .args(&args)
            .stdin(Stdio::inherit())
            .stdout(Stdio::inherit())
            .stderr(Stdio::inherit())
            .kill_on_drop(true)
            .spawn()
            .map_err(|e| Error::Launch {
                runtime: binary.display().to_string(),
                reason: e.to_string(),
            })?;

        let status = tokio::select! {
            status = child.wait() => status.map_err(|e| Error::Launch {
                runtime: binary.display().to_string(),
                reason: format!("failed waiting for process: {e}"),
            })?,
            _ = token.cancelled() => {
                tracing::debug!("Cancelled, killing {}", binary.display());
                if let Err(e) = child.kill().await {
                    tracing::warn!("Failed to kill {}: {}", binary.display(), e);
                }
                return Err(Error::Cancelled);
            }
        };

        match exit_code(status) {
            0 => Ok(()),
            code => {
                tracing::debug!("Container exited with code {}", code);
                Err(Error::ChildExit { code })
            }
        }
    }
}

/// Numeric exit code, using the shell convention 128+N for signal deaths.
fn exit_code(status: ExitStatus) -> i32 {
    if let Some(code) = status.code() {
        return code;
    }

    #[cfg(unix)]
    {
        use std::os::unix::process::ExitStatusExt;
        if let Some(signal) = status.signal() {
            return 128 + signal;
        }
    }

    1
}
