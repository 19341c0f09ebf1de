pub mod command;
pub mod shell;

pub use command::CommandRunner;
pub use shell::{ShellOutput, ShellRunner};

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ExecutorError {
    #[error("Failed to launch: {0}")]
    Launch(#[from] std::io::Error),
    #[error("Execution failed: {0}")]
    Failed(String),
    #[error("Timeout")]
    Timeout,
}
