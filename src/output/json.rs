//! JSON output formatter for duplicate scan results.
//!
//! Provides machine-readable JSON output for scripting and automation.
//!
//! # Output Schema
//!
//! ```json
//! {
//!   "generated_at": "2026-01-01T12:00:00+00:00",
//!   "roots": ["/data"],
//!   "duplicates": [
//!     {
//!       "checksum": "3610a686",
//!       "size": 5,
//!       "files": ["/data/a.txt", "/data/b.txt"]
//!     }
//!   ],
//!   "warnings": [
//!     { "kind": "path_unreadable", "path": "/data/locked", "message": "..." }
//!   ],
//!   "summary": {
//!     "total_files": 4,
//!     "total_size": 17,
//!     "duplicate_groups": 1,
//!     "duplicate_files": 1,
//!     "reclaimable_space": 5,
//!     "enumerate_ms": 3,
//!     "dupe_ms": 1,
//!     "interrupted": false,
//!     "exit_code": 0,
//!     "exit_code_name": "DS000"
//!   }
//! }
//! ```
//!
//! # Example
//!
//! ```no_run
//! use dupescan::duplicates::DuplicateFinder;
//! use dupescan::output::json::JsonOutput;
//! use dupescan::error::ExitCode;
//! use std::path::Path;
//!
//! let finder = DuplicateFinder::with_defaults();
//! let (groups, summary) = finder.find_duplicates(Path::new(".")).unwrap();
//!
//! let output = JsonOutput::new(&groups, &summary, ExitCode::Success);
//! println!("{}", output.to_json_pretty().unwrap());
//! ```

use std::io::Write;

use chrono::{SecondsFormat, Utc};
use serde::Serialize;

use crate::duplicates::{DuplicateGroup, ScanSummary};
use crate::error::ExitCode;
use crate::scanner::{ChecksumError, ScanError};

/// A single duplicate group in JSON format.
#[derive(Debug, Clone, Serialize)]
pub struct JsonDuplicateGroup {
    /// CRC-32 as 8 hex digits
    pub checksum: String,
    /// File size in bytes
    pub size: u64,
    /// Paths of all duplicate files, in discovery order
    pub files: Vec<String>,
}

impl JsonDuplicateGroup {
    /// Create a JSON duplicate group from a DuplicateGroup.
    #[must_use]
    pub fn from_duplicate_group(group: &DuplicateGroup) -> Self {
        Self {
            checksum: group.checksum_hex(),
            size: group.size,
            files: group
                .files
                .iter()
                .map(|f| f.to_string_lossy().into_owned())
                .collect(),
        }
    }
}

/// A non-fatal problem in JSON format.
#[derive(Debug, Clone, Serialize)]
pub struct JsonWarning {
    /// Machine-readable kind
    pub kind: &'static str,
    /// Path the warning refers to
    pub path: String,
    /// Human-readable message
    pub message: String,
}

impl JsonWarning {
    fn from_scan_error(err: &ScanError) -> Self {
        let kind = match err {
            ScanError::PathUnreadable { .. } => "path_unreadable",
            ScanError::FileSizeUnavailable { .. } => "file_size_unavailable",
        };
        Self {
            kind,
            path: err.path().to_string_lossy().into_owned(),
            message: err.to_string(),
        }
    }

    fn from_checksum_error(err: &ChecksumError) -> Self {
        Self {
            kind: "file_read_failure",
            path: err.path().to_string_lossy().into_owned(),
            message: err.to_string(),
        }
    }
}

/// Summary statistics in JSON format.
#[derive(Debug, Clone, Serialize)]
pub struct JsonSummary {
    /// Total number of files scanned
    pub total_files: usize,
    /// Total size of all scanned files in bytes
    pub total_size: u64,
    /// Number of files sharing a size with another file
    pub candidate_files: usize,
    /// Number of files checksummed
    pub hashed_files: usize,
    /// Bytes read while checksumming
    pub hashed_bytes: u64,
    /// Number of confirmed duplicate groups
    pub duplicate_groups: usize,
    /// Total number of duplicate files (excluding originals)
    pub duplicate_files: usize,
    /// Total space that can be reclaimed by removing duplicates (bytes)
    pub reclaimable_space: u64,
    /// Duration of the size index phase in milliseconds
    pub enumerate_ms: u64,
    /// Duration of the checksum phase in milliseconds
    pub dupe_ms: u64,
    /// Duration of the scan in milliseconds
    pub scan_duration_ms: u64,
    /// Whether the scan was interrupted
    pub interrupted: bool,
    /// The exit code number
    pub exit_code: i32,
    /// The machine-readable exit code name (e.g., "DS000")
    pub exit_code_name: String,
}

impl JsonSummary {
    /// Create a JSON summary from a ScanSummary and an exit code.
    #[must_use]
    pub fn from_scan_summary(summary: &ScanSummary, exit_code: ExitCode) -> Self {
        Self {
            total_files: summary.total_files,
            total_size: summary.total_size,
            candidate_files: summary.candidate_files,
            hashed_files: summary.hashed_files,
            hashed_bytes: summary.hashed_bytes,
            duplicate_groups: summary.duplicate_groups,
            duplicate_files: summary.duplicate_files,
            reclaimable_space: summary.reclaimable_space,
            enumerate_ms: summary.enumerate_duration.as_millis() as u64,
            dupe_ms: summary.resolve_duration.as_millis() as u64,
            scan_duration_ms: summary.scan_duration.as_millis() as u64,
            interrupted: summary.interrupted,
            exit_code: exit_code.as_i32(),
            exit_code_name: exit_code.code_prefix().to_string(),
        }
    }
}

/// Complete JSON output structure.
#[derive(Debug, Clone, Serialize)]
pub struct JsonOutput {
    /// When the report was produced (RFC 3339, UTC)
    pub generated_at: String,
    /// Roots that were scanned
    pub roots: Vec<String>,
    /// List of duplicate groups
    pub duplicates: Vec<JsonDuplicateGroup>,
    /// Non-fatal problems, traversal warnings first
    pub warnings: Vec<JsonWarning>,
    /// Scan summary statistics
    pub summary: JsonSummary,
}

impl JsonOutput {
    /// Create a new JSON output from duplicate groups, summary and exit code.
    ///
    /// # Example
    ///
    /// ```
    /// use dupescan::duplicates::{DuplicateGroup, ScanSummary};
    /// use dupescan::output::json::JsonOutput;
    /// use dupescan::error::ExitCode;
    /// use std::path::PathBuf;
    ///
    /// let groups = vec![DuplicateGroup::new(
    ///     0x3610_a686,
    ///     5,
    ///     vec![PathBuf::from("/a.txt"), PathBuf::from("/b.txt")],
    /// )];
    /// let output = JsonOutput::new(&groups, &ScanSummary::default(), ExitCode::Success);
    /// assert_eq!(output.duplicates[0].checksum, "3610a686");
    /// ```
    #[must_use]
    pub fn new(groups: &[DuplicateGroup], summary: &ScanSummary, exit_code: ExitCode) -> Self {
        let warnings = summary
            .scan_warnings
            .iter()
            .map(JsonWarning::from_scan_error)
            .chain(
                summary
                    .checksum_errors
                    .iter()
                    .map(JsonWarning::from_checksum_error),
            )
            .collect();

        Self {
            generated_at: Utc::now().to_rfc3339_opts(SecondsFormat::Secs, false),
            roots: summary
                .roots
                .iter()
                .map(|r| r.to_string_lossy().into_owned())
                .collect(),
            duplicates: groups
                .iter()
                .map(JsonDuplicateGroup::from_duplicate_group)
                .collect(),
            warnings,
            summary: JsonSummary::from_scan_summary(summary, exit_code),
        }
    }

    /// Serialize to compact JSON string.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails (unlikely for valid data).
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    /// Serialize to pretty-printed JSON string.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails (unlikely for valid data).
    pub fn to_json_pretty(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Write JSON to a writer, followed by a newline.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization or writing fails.
    pub fn write_to<W: Write>(&self, writer: &mut W, pretty: bool) -> Result<(), JsonOutputError> {
        let json = if pretty {
            self.to_json_pretty()?
        } else {
            self.to_json()?
        };
        writer.write_all(json.as_bytes())?;
        writer.write_all(b"\n")?;
        Ok(())
    }
}

/// Errors that can occur during JSON output.
#[derive(thiserror::Error, Debug)]
pub enum JsonOutputError {
    /// JSON serialization error
    #[error("JSON serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// I/O error during writing
    #[error("I/O error during JSON generation: {0}")]
    Io(#[from] std::io::Error),
}
