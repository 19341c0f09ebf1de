use std::process::Stdio;
use std::time::Duration;

use tokio::time::timeout;

use crate::ExecutorError;

/// Keywords that make a settings command run under sudo.
const ELEVATION_KEYWORDS: &[&str] = &["pkg", "delete", "install"];

/// Captured result of a free-text settings command.
#[derive(Debug, Clone)]
pub struct ShellOutput {
    pub stdout: String,
    pub stderr: String,
    pub exit_code: Option<i32>,
}

impl ShellOutput {
    pub fn success(&self) -> bool {
        self.exit_code == Some(0)
    }

    /// Render the output the way the Settings pane displays it: stdout,
    /// with stderr appended as an error trailer on non-zero exit.
    pub fn combined(&self) -> String {
        if self.success() || self.stderr.is_empty() {
            self.stdout.clone()
        } else {
            format!("{}\nError: {}", self.stdout, self.stderr)
        }
    }
}

/// Executes free-text command lines from the Settings tab through `sh -c`.
///
/// Lines run exactly as given; the only rewriting applied is the sudo
/// elevation heuristic.
pub struct ShellRunner {
    timeout: Duration,
}

impl ShellRunner {
    pub fn new(timeout: Duration) -> Self {
        Self { timeout }
    }

    /// Prefix the line with `sudo ` when it looks like package management
    /// and is not already elevated. Returns the line that should actually
    /// run (and that gets persisted back into the settings file).
    pub fn elevate_if_needed(line: &str) -> String {
        let lowered = line.to_lowercase();
        let wants_elevation = ELEVATION_KEYWORDS.iter().any(|kw| lowered.contains(kw));
        if wants_elevation && !lowered.trim_start().starts_with("sudo ") {
            format!("sudo {line}")
        } else {
            line.to_string()
        }
    }

    pub async fn run(&self, line: &str) -> Result<ShellOutput, ExecutorError> {
        tracing::info!(command = line, "running settings command");

        let run = tokio::process::Command::new("sh")
            .arg("-c")
            .arg(line)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .output();

        let output = timeout(self.timeout, run)
            .await
            .map_err(|_| ExecutorError::Timeout)??;

        Ok(ShellOutput {
            stdout: String::from_utf8_lossy(&output.stdout).to_string(),
            stderr: String::from_utf8_lossy(&output.stderr).to_string(),
            exit_code: output.status.code(),
        })
    }
}

impl Default for ShellRunner {
    fn default() -> Self {
        Self::new(Duration::from_secs(30))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_elevation_adds_sudo_for_pkg() {
        assert_eq!(
            ShellRunner::elevate_if_needed("pkg upgrade -y"),
            "sudo pkg upgrade -y"
        );
    }

    #[test]
    fn test_elevation_is_case_insensitive() {
        assert_eq!(
            ShellRunner::elevate_if_needed("PKG info"),
            "sudo PKG info"
        );
    }

    #[test]
    fn test_elevation_skips_already_elevated() {
        assert_eq!(
            ShellRunner::elevate_if_needed("sudo pkg upgrade -y"),
            "sudo pkg upgrade -y"
        );
    }

    #[test]
    fn test_elevation_leaves_plain_commands_alone() {
        assert_eq!(ShellRunner::elevate_if_needed("uname -a"), "uname -a");
    }

    #[tokio::test]
    async fn test_run_captures_exit_code_and_streams() {
        let runner = ShellRunner::default();
        let out = runner.run("echo out; echo err >&2; exit 2").await.unwrap();
        assert_eq!(out.exit_code, Some(2));
        assert_eq!(out.stdout.trim(), "out");
        assert_eq!(out.stderr.trim(), "err");
        assert!(!out.success());
        assert!(out.combined().contains("Error: err"));
    }

    #[tokio::test]
    async fn test_run_success_combined_is_stdout_only() {
        let runner = ShellRunner::default();
        let out = runner.run("echo fine").await.unwrap();
        assert!(out.success());
        assert_eq!(out.combined().trim(), "fine");
    }

    #[tokio::test]
    async fn test_run_timeout() {
        let runner = ShellRunner::new(Duration::from_millis(100));
        let result = runner.run("sleep 5").await;
        assert!(matches!(result, Err(ExecutorError::Timeout)));
    }
}
