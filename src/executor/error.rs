use crate::subprocess::ProcessError;
use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum ExecuteError {
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Command '{command}' failed with exit status {code}")]
    ProcessFailed { command: String, code: i32 },

    #[error(transparent)]
    Process(#[from] ProcessError),

    #[error("Failed to prepare capture file {}: {source}", path.display())]
    CaptureFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl ExecuteError {
    /// Exit status of the child, when the failure came from a non-zero exit
    pub fn exit_code(&self) -> Option<i32> {
        match self {
            ExecuteError::ProcessFailed { code, .. } => Some(*code),
            _ => None,
        }
    }
}
