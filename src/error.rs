//! Structured error handling and exit codes.

use serde::Serialize;

use crate::duplicates::FinderError;

/// Exit codes for the dupescan application.
///
/// - 0: Success (completed, with or without duplicates or warnings)
/// - 1: General error (unexpected failure or strict-mode abort)
/// - 2: Invalid root (a root is missing, not a directory, or unreadable)
/// - 130: Interrupted by user (Ctrl+C)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ExitCode {
    /// Success: the scan ran to completion.
    Success = 0,
    /// General error: an unexpected or strict-mode failure.
    GeneralError = 1,
    /// Invalid root: nothing was scanned.
    InvalidRoot = 2,
    /// Interrupted: scan was interrupted by user (Ctrl+C).
    Interrupted = 130,
}

impl ExitCode {
    /// Get the numeric exit code.
    #[must_use]
    pub fn as_i32(self) -> i32 {
        self as i32
    }

    /// Get the machine-readable code prefix.
    #[must_use]
    pub fn code_prefix(self) -> &'static str {
        match self {
            Self::Success => "DS000",
            Self::GeneralError => "DS001",
            Self::InvalidRoot => "DS002",
            Self::Interrupted => "DS130",
        }
    }

    /// Pick the exit code for a fatal error.
    #[must_use]
    pub fn for_error(err: &anyhow::Error) -> Self {
        match err.downcast_ref::<FinderError>() {
            Some(FinderError::Interrupted) => Self::Interrupted,
            Some(FinderError::InvalidRoot { .. }) => Self::InvalidRoot,
            _ => Self::GeneralError,
        }
    }
}

/// Structured error information for JSON output.
#[derive(Debug, Serialize)]
pub struct StructuredError {
    /// The error code (e.g., "DS001")
    pub code: String,
    /// The exit code number
    pub exit_code: i32,
    /// Human-readable error message
    pub message: String,
    /// Path the error concerns, when there is one
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
    /// Whether the operation was interrupted
    pub interrupted: bool,
}

impl StructuredError {
    /// Create a new structured error from an anyhow error and an exit code.
    #[must_use]
    pub fn new(err: &anyhow::Error, exit_code: ExitCode) -> Self {
        let path = err.downcast_ref::<FinderError>().and_then(|e| match e {
            FinderError::InvalidRoot { path, .. } => Some(path.display().to_string()),
            FinderError::Scan(scan) => Some(scan.path().display().to_string()),
            FinderError::Checksum(read) => Some(read.path().display().to_string()),
            FinderError::Interrupted => None,
        });

        Self {
            code: exit_code.code_prefix().to_string(),
            exit_code: exit_code.as_i32(),
            message: format!("{err:#}"),
            path,
            interrupted: exit_code == ExitCode::Interrupted,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scanner::ChecksumError;
    use std::path::PathBuf;

    #[test]
    fn test_exit_code_values() {
        assert_eq!(ExitCode::Success.as_i32(), 0);
        assert_eq!(ExitCode::GeneralError.as_i32(), 1);
        assert_eq!(ExitCode::InvalidRoot.as_i32(), 2);
        assert_eq!(ExitCode::Interrupted.as_i32(), 130);
        assert_eq!(ExitCode::InvalidRoot.code_prefix(), "DS002");
    }

    #[test]
    fn test_for_error_downcasts_finder_errors() {
        let invalid = anyhow::Error::new(FinderError::InvalidRoot {
            path: PathBuf::from("/nope"),
            reason: "path does not exist".to_string(),
        });
        assert_eq!(ExitCode::for_error(&invalid), ExitCode::InvalidRoot);

        let interrupted = anyhow::Error::new(FinderError::Interrupted);
        assert_eq!(ExitCode::for_error(&interrupted), ExitCode::Interrupted);

        let strict = anyhow::Error::new(FinderError::Checksum(ChecksumError::NotFound(
            PathBuf::from("/gone"),
        )));
        assert_eq!(ExitCode::for_error(&strict), ExitCode::GeneralError);

        let other = anyhow::anyhow!("something else");
        assert_eq!(ExitCode::for_error(&other), ExitCode::GeneralError);
    }

    #[test]
    fn test_structured_error_json() {
        let err = anyhow::Error::new(FinderError::InvalidRoot {
            path: PathBuf::from("/nope"),
            reason: "path does not exist".to_string(),
        });
        let structured = StructuredError::new(&err, ExitCode::for_error(&err));
        let json = serde_json::to_value(&structured).unwrap();

        assert_eq!(json["code"], "DS002");
        assert_eq!(json["exit_code"], 2);
        assert_eq!(json["path"], "/nope");
        assert_eq!(json["interrupted"], false);
        assert!(json["message"].as_str().unwrap().contains("does not exist"));
    }

    #[test]
    fn test_structured_error_without_path() {
        let err = anyhow::anyhow!("boom");
        let structured = StructuredError::new(&err, ExitCode::GeneralError);
        let json = serde_json::to_value(&structured).unwrap();
        assert!(json.get("path").is_none());
    }
}
