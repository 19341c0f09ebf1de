use std::time::Duration;

use tokio::time::timeout;

use crate::ExecutorError;

/// Runs a fixed program with argv-style arguments and captures stdout.
///
/// Every system tool the panel wraps (`pkg`, `zfs`, `zpool`, `beadm`,
/// `pciconf`, ...) goes through here so a hung tool cannot freeze the UI
/// past the configured timeout.
pub struct CommandRunner {
    timeout: Duration,
}

impl CommandRunner {
    pub fn new(timeout: Duration) -> Self {
        Self { timeout }
    }

    /// Run the program and return its stdout on success.
    ///
    /// A non-zero exit maps to `ExecutorError::Failed` carrying stderr, a
    /// spawn failure (tool not installed, permissions) to
    /// `ExecutorError::Launch`.
    pub async fn output(&self, program: &str, args: &[&str]) -> Result<String, ExecutorError> {
        tracing::info!(program, ?args, "running command");

        let run = tokio::process::Command::new(program)
            .args(args)
            .kill_on_drop(true)
            .output();

        let output = timeout(self.timeout, run)
            .await
            .map_err(|_| ExecutorError::Timeout)??;

        if output.status.success() {
            Ok(String::from_utf8_lossy(&output.stdout).to_string())
        } else {
            Err(ExecutorError::Failed(
                String::from_utf8_lossy(&output.stderr).to_string(),
            ))
        }
    }
}

impl Default for CommandRunner {
    fn default() -> Self {
        Self::new(Duration::from_secs(30))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_output_captures_stdout() {
        let runner = CommandRunner::default();
        let out = runner.output("echo", &["hello"]).await.unwrap();
        assert_eq!(out.trim(), "hello");
    }

    #[tokio::test]
    async fn test_missing_program_is_launch_error() {
        let runner = CommandRunner::default();
        let result = runner.output("definitely-not-a-real-tool", &[]).await;
        assert!(matches!(result, Err(ExecutorError::Launch(_))));
    }

    #[tokio::test]
    async fn test_nonzero_exit_carries_stderr() {
        let runner = CommandRunner::default();
        let result = runner.output("sh", &["-c", "echo boom >&2; exit 3"]).await;
        match result {
            Err(ExecutorError::Failed(stderr)) => assert!(stderr.contains("boom")),
            other => panic!("expected Failed, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_timeout() {
        let runner = CommandRunner::new(Duration::from_millis(100));
        let result = runner.output("sleep", &["5"]).await;
        assert!(matches!(result, Err(ExecutorError::Timeout)));
    }
}
