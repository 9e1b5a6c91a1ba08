//! Error types for the keysigner core library.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

use crate::models::KeystoreType;

/// Core error type for keysigner operations.
#[derive(Error, Debug)]
pub enum KeysignerError {
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    #[error("Directory or file not found: {path}: {source}")]
    DirectoryNotFound {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Permission denied: {path}: {source}. Please check the directory permissions.")]
    PermissionDenied {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("OS error occurred: {source}. Could not create or access {path}")]
    DirectoryAccess {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Failed to launch {program}: {source}")]
    ToolLaunch {
        program: String,
        #[source]
        source: io::Error,
    },

    #[error("{program} exited with {}", describe_exit(.code))]
    ToolFailed { program: String, code: Option<i32> },

    #[error("Expected output is missing after conversion: {0}")]
    MissingArtifact(PathBuf),

    #[error("Destination keystore type must differ from the source type ({0})")]
    SameKeystoreType(KeystoreType),

    #[error("Unknown keystore type: {0}")]
    UnknownKeystoreType(String),

    #[error("Cancelled by user")]
    Quit,
}

impl KeysignerError {
    /// Whether the error only ends the current operation.
    ///
    /// Tool failures are reported and the interactive menu carries on;
    /// everything else is fatal for the process.
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            KeysignerError::ToolLaunch { .. }
                | KeysignerError::ToolFailed { .. }
                | KeysignerError::MissingArtifact(_)
        )
    }
}

fn describe_exit(code: &Option<i32>) -> String {
    match code {
        Some(code) => format!("exit code {}", code),
        None => "no exit code (terminated by signal)".to_string(),
    }
}

/// Result type alias for keysigner operations.
pub type Result<T> = std::result::Result<T, KeysignerError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tool_failed_message() {
        let err = KeysignerError::ToolFailed {
            program: "keytool".to_string(),
            code: Some(1),
        };
        assert_eq!(err.to_string(), "keytool exited with exit code 1");

        let err = KeysignerError::ToolFailed {
            program: "openssl".to_string(),
            code: None,
        };
        assert!(err.to_string().contains("signal"));
    }

    #[test]
    fn test_recoverable_errors() {
        assert!(
            KeysignerError::ToolFailed {
                program: "apksigner".to_string(),
                code: Some(2),
            }
            .is_recoverable()
        );
        assert!(!KeysignerError::Quit.is_recoverable());
        assert!(!KeysignerError::UnknownKeystoreType("x".to_string()).is_recoverable());
    }
}
