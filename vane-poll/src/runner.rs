//! Process execution collaborator
//!
//! Shell-derived variables (uptime strings, brightness levels) come from
//! spawning a command and capturing its stdout. The runner is a trait so
//! tests can script outputs without touching the system.

use async_trait::async_trait;
use tokio::process::Command;

use crate::error::{PollError, Result};

/// Spawns a command and captures its stdout as text
#[async_trait]
pub trait ProcessRunner: Send + Sync {
    /// Run `argv[0]` with `argv[1..]` as arguments
    ///
    /// Resolves to the command's stdout. A spawn failure, empty argv, or
    /// non-zero exit status fails with [`PollError::RefreshFailed`].
    async fn run(&self, argv: &[String]) -> Result<String>;
}

/// Default runner backed by `tokio::process`
///
/// The spawned process inherits the parent environment. Stdout is
/// decoded lossily; invalid UTF-8 bytes become replacement characters
/// rather than failing the tick.
#[derive(Debug, Clone, Copy, Default)]
pub struct TokioProcessRunner;

#[async_trait]
impl ProcessRunner for TokioProcessRunner {
    async fn run(&self, argv: &[String]) -> Result<String> {
        let (program, args) = argv
            .split_first()
            .ok_or_else(|| PollError::RefreshFailed("empty argv".to_string()))?;

        let output = Command::new(program)
            .args(args)
            .output()
            .await
            .map_err(|e| PollError::RefreshFailed(format!("failed to spawn {program}: {e}")))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(PollError::RefreshFailed(format!(
                "{program} exited with {}: {}",
                output.status,
                stderr.trim()
            )));
        }

        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_captures_stdout() {
        let runner = TokioProcessRunner;
        let out = runner
            .run(&["echo".to_string(), "hello".to_string()])
            .await
            .unwrap();

        assert_eq!(out, "hello\n");
    }

    #[tokio::test]
    async fn test_missing_binary_fails() {
        let runner = TokioProcessRunner;
        let result = runner.run(&["definitely-not-a-command-xyz".to_string()]).await;

        assert!(matches!(result, Err(PollError::RefreshFailed(_))));
    }

    #[tokio::test]
    async fn test_nonzero_exit_fails() {
        let runner = TokioProcessRunner;
        let result = runner.run(&["false".to_string()]).await;

        assert!(matches!(result, Err(PollError::RefreshFailed(_))));
    }

    #[tokio::test]
    async fn test_empty_argv_fails() {
        let runner = TokioProcessRunner;
        let result = runner.run(&[]).await;

        assert!(matches!(result, Err(PollError::RefreshFailed(_))));
    }
}
