//! CSV output formatter for duplicate scan results.
//!
//! One row is generated for each duplicate file.
//!
//! # Columns
//!
//! - `group_id`: Numeric ID identifying the duplicate group (1-based)
//! - `checksum`: CRC-32 of the content (8 hex digits)
//! - `path`: Path to the file
//! - `size`: File size in bytes
//! - `modified`: Last modified time (RFC 3339 format)
//!
//! # Example
//!
//! ```no_run
//! use dupescan::duplicates::DuplicateFinder;
//! use dupescan::output::csv::CsvOutput;
//! use std::path::Path;
//!
//! let finder = DuplicateFinder::with_defaults();
//! let (groups, _) = finder.find_duplicates(Path::new(".")).unwrap();
//!
//! let output = CsvOutput::new(&groups);
//! output.write_to(std::io::stdout()).unwrap();
//! ```

use std::io;
use std::path::Path;

use chrono::{DateTime, Utc};
use serde::Serialize;
use thiserror::Error;

use crate::duplicates::DuplicateGroup;

/// Errors that can occur during CSV output generation.
#[derive(Debug, Error)]
pub enum CsvOutputError {
    /// I/O error during writing.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// Error during CSV serialization.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
}

#[derive(Debug, Serialize)]
struct CsvRow<'a> {
    group_id: usize,
    checksum: &'a str,
    path: String,
    size: u64,
    modified: String,
}

/// CSV output formatter.
#[derive(Debug)]
pub struct CsvOutput<'a> {
    groups: &'a [DuplicateGroup],
}

impl<'a> CsvOutput<'a> {
    /// Create a new CSV output formatter.
    #[must_use]
    pub fn new(groups: &'a [DuplicateGroup]) -> Self {
        Self { groups }
    }

    /// Write the CSV output to the given writer.
    ///
    /// A header row is always written, even without groups.
    ///
    /// # Errors
    ///
    /// Returns `CsvOutputError` if writing or serialization fails.
    pub fn write_to<W: io::Write>(&self, writer: W) -> Result<(), CsvOutputError> {
        let mut csv_writer = csv::WriterBuilder::new()
            .has_headers(false)
            .from_writer(writer);
        csv_writer.write_record(["group_id", "checksum", "path", "size", "modified"])?;

        for (idx, group) in self.groups.iter().enumerate() {
            let checksum = group.checksum_hex();
            for path in &group.files {
                csv_writer.serialize(CsvRow {
                    group_id: idx + 1,
                    checksum: &checksum,
                    path: path.to_string_lossy().into_owned(),
                    size: group.size,
                    modified: modified_time(path),
                })?;
            }
        }

        csv_writer.flush()?;
        Ok(())
    }

    /// Generate CSV output as a string.
    ///
    /// # Errors
    ///
    /// Returns `CsvOutputError` if serialization fails.
    pub fn to_string(&self) -> Result<String, CsvOutputError> {
        let mut buffer = Vec::new();
        self.write_to(&mut buffer)?;
        Ok(String::from_utf8_lossy(&buffer).into_owned())
    }
}

/// Last modified time of `path`, or "unknown" if metadata cannot be read.
fn modified_time(path: &Path) -> String {
    std::fs::metadata(path)
        .and_then(|m| m.modified())
        .map(|m| DateTime::<Utc>::from(m).to_rfc3339())
        .unwrap_or_else(|_| "unknown".to_string())
}
