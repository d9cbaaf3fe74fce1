/*!
 * Error types for the AMX client application
 */

use amx_connect::{InvokeError, RemoteAccessError};
use amx_core_interface::MalformedObjectName;
use std::io;
use std::path::PathBuf;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, AmxError>;

/// Exit code constants for structured process exit
pub const EXIT_SUCCESS: i32 = 0;
pub const EXIT_PARTIAL: i32 = 1;
pub const EXIT_FATAL: i32 = 2;

#[derive(Error, Debug)]
pub enum AmxError {
    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Snapshot file could not be read or parsed
    #[error("Invalid snapshot {path}: {reason}")]
    Snapshot { path: PathBuf, reason: String },

    /// No connection source was configured
    #[error("No snapshot configured; pass --snapshot or set `snapshot` in the config file")]
    NoConnection,

    #[error(transparent)]
    ObjectName(#[from] MalformedObjectName),

    /// A value given on the command line is not valid JSON for a bean value
    #[error("Invalid value {input:?}: {reason}")]
    InvalidValue { input: String, reason: String },

    #[error(transparent)]
    RemoteAccess(#[from] RemoteAccessError),

    #[error(transparent)]
    Invoke(#[from] InvokeError),

    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

impl AmxError {
    /// Get the process exit code for this error
    pub fn exit_code(&self) -> i32 {
        match self {
            // Fatal errors: nothing could be attempted
            AmxError::Config(_)
            | AmxError::Snapshot { .. }
            | AmxError::NoConnection
            | AmxError::ObjectName(_)
            | AmxError::InvalidValue { .. }
            | AmxError::Io(_) => EXIT_FATAL,
            // The connection was reached but the call failed
            AmxError::RemoteAccess(_) | AmxError::Invoke(_) => EXIT_PARTIAL,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use amx_core_interface::ObjectName;

    #[test]
    fn test_exit_codes() {
        assert_eq!(AmxError::NoConnection.exit_code(), EXIT_FATAL);
        assert_eq!(AmxError::Config("bad".into()).exit_code(), EXIT_FATAL);

        let malformed = ObjectName::new("broken").unwrap_err();
        assert_eq!(AmxError::from(malformed).exit_code(), EXIT_FATAL);
    }
}
