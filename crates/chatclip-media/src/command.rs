//! External command builder and runner.

use std::path::PathBuf;
use std::process::Stdio;

use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::process::{Child, Command};
use tracing::{debug, warn};

use crate::error::{MediaError, MediaResult};

/// Name of the Twitch downloader binary.
pub const TWITCH_CLI: &str = "TwitchDownloaderCLI";
/// Name of the FFmpeg binary.
pub const FFMPEG: &str = "ffmpeg";

/// Lines of stderr kept for error reports.
const STDERR_TAIL_LINES: usize = 40;

/// Builder for one external tool invocation.
#[derive(Debug, Clone)]
pub struct ToolCommand {
    program: String,
    args: Vec<String>,
}

impl ToolCommand {
    /// Create a new command for `program`.
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
        }
    }

    /// Append one argument.
    pub fn arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self
    }

    /// Append multiple arguments.
    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }

    pub fn program(&self) -> &str {
        &self.program
    }

    pub fn build_args(&self) -> &[String] {
        &self.args
    }
}

/// Runner for external commands with stderr capture and an optional
/// per-step timeout.
#[derive(Debug, Clone)]
pub struct ToolRunner {
    timeout_secs: Option<u64>,
}

impl Default for ToolRunner {
    fn default() -> Self {
        Self::new()
    }
}

impl ToolRunner {
    /// Create a runner without a timeout.
    pub fn new() -> Self {
        Self { timeout_secs: None }
    }

    /// Bound each run; the child is killed when the bound elapses.
    pub fn with_timeout(mut self, secs: u64) -> Self {
        self.timeout_secs = Some(secs);
        self
    }

    /// Run a command to completion.
    pub async fn run(&self, cmd: &ToolCommand) -> MediaResult<()> {
        which::which(cmd.program())
            .map_err(|_| MediaError::tool_not_found(cmd.program()))?;

        debug!("Running: {} {}", cmd.program(), cmd.build_args().join(" "));

        let mut child = Command::new(cmd.program())
            .args(cmd.build_args())
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .spawn()?;

        let stderr = child.stderr.take();
        let capture = tokio::spawn(async move {
            let mut tail: Vec<String> = Vec::new();
            if let Some(stderr) = stderr {
                let mut lines = BufReader::new(stderr).lines();
                while let Ok(Some(line)) = lines.next_line().await {
                    if tail.len() >= STDERR_TAIL_LINES {
                        tail.remove(0);
                    }
                    tail.push(line);
                }
            }
            tail.join("\n")
        });

        let status = self.wait_for_completion(&mut child).await;
        let stderr_tail = capture.await.unwrap_or_default();
        let status = status?;

        if status.success() {
            Ok(())
        } else {
            Err(MediaError::command_failed(
                cmd.program(),
                "exited with non-zero status",
                if stderr_tail.is_empty() {
                    None
                } else {
                    Some(stderr_tail)
                },
                status.code(),
            ))
        }
    }

    /// Wait for the child, killing it if the timeout elapses first.
    async fn wait_for_completion(&self, child: &mut Child) -> MediaResult<std::process::ExitStatus> {
        match self.timeout_secs {
            Some(secs) => {
                let bound = std::time::Duration::from_secs(secs);
                match tokio::time::timeout(bound, child.wait()).await {
                    Ok(status) => Ok(status?),
                    Err(_) => {
                        warn!("Command timed out after {} seconds, killing process", secs);
                        let _ = child.kill().await;
                        Err(MediaError::Timeout(secs))
                    }
                }
            }
            None => Ok(child.wait().await?),
        }
    }
}

/// Check that TwitchDownloaderCLI is available.
pub fn check_twitch_cli() -> MediaResult<PathBuf> {
    which::which(TWITCH_CLI).map_err(|_| MediaError::tool_not_found(TWITCH_CLI))
}

/// Check that FFmpeg is available.
pub fn check_ffmpeg() -> MediaResult<PathBuf> {
    which::which(FFMPEG).map_err(|_| MediaError::tool_not_found(FFMPEG))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_command_builder() {
        let cmd = ToolCommand::new(TWITCH_CLI)
            .arg("clipdownload")
            .args(["--id", "abc"])
            .arg("-o")
            .arg("/tmp/out.mp4");

        assert_eq!(cmd.program(), "TwitchDownloaderCLI");
        assert_eq!(
            cmd.build_args(),
            ["clipdownload", "--id", "abc", "-o", "/tmp/out.mp4"]
        );
    }

    #[tokio::test]
    async fn test_runner_reports_exit_code_and_stderr() {
        let cmd = ToolCommand::new("sh")
            .arg("-c")
            .arg("echo boom >&2; exit 3");

        let err = ToolRunner::new().run(&cmd).await.unwrap_err();
        match err {
            MediaError::CommandFailed {
                tool,
                stderr,
                exit_code,
                ..
            } => {
                assert_eq!(tool, "sh");
                assert_eq!(exit_code, Some(3));
                assert!(stderr.unwrap().contains("boom"));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[tokio::test]
    async fn test_runner_success() {
        let cmd = ToolCommand::new("sh").arg("-c").arg("exit 0");
        assert!(ToolRunner::new().run(&cmd).await.is_ok());
    }

    #[tokio::test]
    async fn test_runner_timeout_kills_process() {
        let cmd = ToolCommand::new("sh").arg("-c").arg("sleep 30");
        let err = ToolRunner::new().with_timeout(1).run(&cmd).await.unwrap_err();
        assert!(matches!(err, MediaError::Timeout(1)));
    }

    #[tokio::test]
    async fn test_missing_tool() {
        let cmd = ToolCommand::new("definitely-not-a-real-binary-xyz");
        let err = ToolRunner::new().run(&cmd).await.unwrap_err();
        assert!(matches!(err, MediaError::ToolNotFound(_)));
    }
}
