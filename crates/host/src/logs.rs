//! Kernel and syslog text for the Logs tab

use std::path::Path;

use sysview_executor::CommandRunner;

use crate::HostResult;

/// Kernel message buffer.
pub async fn dmesg(runner: &CommandRunner) -> HostResult<String> {
    Ok(runner.output("dmesg", &[]).await?)
}

/// Read the syslog file (conventionally `/var/log/messages`).
pub async fn syslog(path: &Path) -> HostResult<String> {
    Ok(tokio::fs::read_to_string(path).await?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::HostError;

    #[tokio::test]
    async fn test_syslog_missing_file_is_io_error() {
        let result = syslog(Path::new("/definitely/not/a/log")).await;
        assert!(matches!(result, Err(HostError::Io(_))));
    }
}
