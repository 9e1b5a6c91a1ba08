//! Tool execution.
//!
//! Provides the trait the flows run commands through and a process-based
//! implementation.

use std::process::Stdio;

use async_trait::async_trait;
use tokio::process::Command;

use crate::command::ToolCommand;
use crate::error::{KeysignerError, Result};

/// Runs one external tool invocation to completion.
///
/// `Ok(())` means the tool exited with status zero. There are no retries
/// and no timeouts; the call lasts as long as the tool does.
#[async_trait]
pub trait ToolRunner: Send + Sync {
    async fn run(&self, command: &ToolCommand) -> Result<()>;
}

/// Spawns the tool as a child process sharing this terminal.
///
/// Arguments go straight to the OS, no shell is involved, so metacharacters
/// in passwords or paths are never interpreted.
#[derive(Debug, Default, Clone, Copy)]
pub struct ProcessRunner;

impl ProcessRunner {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl ToolRunner for ProcessRunner {
    async fn run(&self, command: &ToolCommand) -> Result<()> {
        tracing::debug!("Running {}", command.redacted());

        let status = Command::new(command.program())
            .args(command.argv())
            .envs(command.envs())
            .stdin(Stdio::inherit())
            .stdout(Stdio::inherit())
            .stderr(Stdio::inherit())
            .status()
            .await
            .map_err(|source| KeysignerError::ToolLaunch {
                program: command.program().to_string(),
                source,
            })?;

        if !status.success() {
            tracing::warn!(
                program = command.program(),
                code = ?status.code(),
                "Tool exited unsuccessfully"
            );
            return Err(KeysignerError::ToolFailed {
                program: command.program().to_string(),
                code: status.code(),
            });
        }

        tracing::info!(program = command.program(), "Tool finished successfully");
        Ok(())
    }
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_zero_exit_is_success() {
        let runner = ProcessRunner::new();
        runner.run(&ToolCommand::new("true")).await.unwrap();
    }

    #[tokio::test]
    async fn test_nonzero_exit_is_failure() {
        let runner = ProcessRunner::new();
        let err = runner
            .run(&ToolCommand::new("sh").args(["-c", "exit 3"]))
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            KeysignerError::ToolFailed { code: Some(3), .. }
        ));
    }

    #[tokio::test]
    async fn test_missing_program_is_launch_failure() {
        let runner = ProcessRunner::new();
        let err = runner
            .run(&ToolCommand::new("keysigner-no-such-tool-8f3a"))
            .await
            .unwrap_err();
        assert!(matches!(err, KeysignerError::ToolLaunch { .. }));
    }

    #[tokio::test]
    async fn test_arguments_are_not_shell_interpreted() {
        let dir = tempfile::tempdir().unwrap();
        let marker = dir.path().join("marker");
        let runner = ProcessRunner::new();
        // `echo` receives the metacharacters literally; nothing is created.
        runner
            .run(&ToolCommand::new("echo").arg(format!("; touch {}", marker.display())))
            .await
            .unwrap();
        assert!(!marker.exists());
    }
}
