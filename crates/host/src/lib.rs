//! FreeBSD capability layer - everything the panel knows about the host
//!
//! Each module wraps one family of system tools:
//! - `hardware`: sysinfo stats, `pciconf` GPU lookup, `ifconfig` interfaces
//! - `process`: process table, graceful and forceful kill paths
//! - `pkg`: installed packages, uninstall
//! - `zfs`: pools and snapshots
//! - `bootenv`: boot environments via `beadm`
//! - `logs`: dmesg and syslog

pub mod bootenv;
pub mod hardware;
pub mod logs;
pub mod pkg;
pub mod process;
pub mod zfs;

use sysview_executor::ExecutorError;

/// Host capability error types
#[derive(Debug, thiserror::Error)]
pub enum HostError {
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Operation failed: {0}")]
    OperationFailed(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<ExecutorError> for HostError {
    fn from(err: ExecutorError) -> Self {
        match err {
            ExecutorError::Launch(e) => HostError::Io(e),
            ExecutorError::Failed(msg) => HostError::OperationFailed(msg),
            ExecutorError::Timeout => HostError::OperationFailed("command timed out".to_string()),
        }
    }
}

pub type HostResult<T> = Result<T, HostError>;

/// Local timestamp used for default snapshot and boot environment names.
pub(crate) fn timestamp() -> String {
    chrono::Local::now().format("%Y%m%d_%H%M%S").to_string()
}
