//! Output formatters for duplicate scan results.
//!
//! This module provides different output formats for scan results:
//! - Text, one block of paths per group
//! - JSON for automation and scripting
//! - CSV for spreadsheet import
//!
//! # Example
//!
//! ```no_run
//! use dupescan::duplicates::DuplicateFinder;
//! use dupescan::output::TextOutput;
//! use std::path::Path;
//!
//! let finder = DuplicateFinder::with_defaults();
//! let (groups, summary) = finder.find_duplicates(Path::new(".")).unwrap();
//!
//! let output = TextOutput::new(&groups, &summary).with_summary(true);
//! output.write_to(&mut std::io::stdout()).unwrap();
//! ```

pub mod csv;
pub mod json;
pub mod text;

// Re-export main types
pub use self::csv::CsvOutput;
pub use json::JsonOutput;
pub use text::TextOutput;
