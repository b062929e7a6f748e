use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;

use crate::result::CommandResult;

pub type Result<T> = std::result::Result<T, Error>;

/// Everything that can go wrong between declaring a parameter and reading
/// back the result of an `mmseqs` invocation.
#[derive(Error, Debug)]
pub enum Error {
    #[error("invalid value for parameter `{name}`: {reason}")]
    Validation { name: String, reason: String },

    #[error("input file not found: {}", path.to_string_lossy())]
    PathNotFound { path: PathBuf },

    #[error("unknown parameter: {0}")]
    UnknownParameter(String),

    #[error(
        "command `{}` exited with code {}",
        result.command_string(),
        result.exit_code
    )]
    Execution { result: CommandResult },

    #[error(
        "command `{}` timed out after {:.1}s",
        command_line.join(" "),
        timeout.as_secs_f64()
    )]
    Timeout {
        command_line: Vec<String>,
        timeout: Duration,
        stdout: String,
        stderr: String,
    },

    #[error("failed to locate the mmseqs binary: {0}")]
    BinaryResolution(String),

    #[error("failed to run child process")]
    Io(#[from] std::io::Error),
}
