//! Scanner module for directory traversal and file checksums.
//!
//! This module provides functionality for:
//! - Depth-first directory walking using jwalk
//! - Streaming CRC-32 checksums of file contents
//! - Byte-level comparison of candidate duplicates
//!
//! # Architecture
//!
//! The scanner is divided into submodules:
//! - [`walker`]: Directory traversal and file discovery
//! - [`checksum`]: CRC-32 file checksums (streaming)
//! - [`verify`]: Optional byte-for-byte confirmation
//!
//! # Example
//!
//! ```no_run
//! use dupescan::scanner::{Walker, WalkerConfig};
//! use std::path::Path;
//!
//! let config = WalkerConfig {
//!     min_size: Some(1024),
//!     skip_hidden: true,
//!     ..Default::default()
//! };
//!
//! let walker = Walker::new(Path::new("/tmp"), config);
//! for entry in walker.walk() {
//!     match entry {
//!         Ok(file) => println!("{}: {} bytes", file.path.display(), file.size),
//!         Err(e) => eprintln!("Warning: {}", e),
//!     }
//! }
//! ```

pub mod checksum;
pub mod verify;
pub mod walker;

use std::io;
use std::path::{Path, PathBuf};

// Re-export main types
pub use checksum::{
    checksum_bytes, checksum_reader, checksum_to_hex, Crc32Hasher, FileChecksum, DEFAULT_BLOCK_SIZE,
};
pub use verify::files_identical;
pub use walker::Walker;

/// A regular file discovered during traversal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileEntry {
    /// Absolute path to the file
    pub path: PathBuf,
    /// File size in bytes at enumeration time
    pub size: u64,
}

impl FileEntry {
    /// Create a new FileEntry.
    #[must_use]
    pub fn new(path: PathBuf, size: u64) -> Self {
        Self { path, size }
    }
}

/// Configuration for directory walking.
///
/// The default configuration includes every regular file, which is what
/// plain size-then-checksum detection expects.
#[derive(Debug, Clone, Default)]
pub struct WalkerConfig {
    /// Skip hidden files and directories (names starting with `.`).
    pub skip_hidden: bool,

    /// Skip zero-length files. All empty files share one checksum, so
    /// they otherwise form a single large group.
    pub skip_empty: bool,

    /// Minimum file size to include (in bytes).
    pub min_size: Option<u64>,

    /// Maximum file size to include (in bytes).
    pub max_size: Option<u64>,

    /// Glob patterns to ignore (gitignore-style), relative to each root.
    pub ignore_patterns: Vec<String>,
}

impl WalkerConfig {
    /// Check if a size passes the configured filters.
    #[must_use]
    pub fn accepts_size(&self, size: u64) -> bool {
        if self.skip_empty && size == 0 {
            return false;
        }
        if self.min_size.is_some_and(|min| size < min) {
            return false;
        }
        if self.max_size.is_some_and(|max| size > max) {
            return false;
        }
        true
    }
}

/// Non-fatal problems encountered while building the size index.
///
/// Each variant carries the path it concerns; the affected subtree or
/// entry is skipped and enumeration continues.
#[derive(thiserror::Error, Debug)]
pub enum ScanError {
    /// A directory could not be listed.
    #[error("Cannot read directory {path}: {source}")]
    PathUnreadable {
        /// Directory that could not be read
        path: PathBuf,
        /// The underlying I/O error
        #[source]
        source: io::Error,
    },

    /// The size of a discovered entry could not be determined.
    #[error("Cannot determine size of {path}: {source}")]
    FileSizeUnavailable {
        /// Entry whose metadata query failed
        path: PathBuf,
        /// The underlying I/O error
        #[source]
        source: io::Error,
    },
}

impl ScanError {
    /// Path the warning refers to.
    #[must_use]
    pub fn path(&self) -> &Path {
        match self {
            Self::PathUnreadable { path, .. } | Self::FileSizeUnavailable { path, .. } => path,
        }
    }
}

/// Errors that can occur while reading a file for checksumming or
/// verification.
#[derive(thiserror::Error, Debug)]
pub enum ChecksumError {
    /// The file disappeared between enumeration and reading.
    #[error("File not found: {0}")]
    NotFound(PathBuf),

    /// Permission was denied when reading the file.
    #[error("Permission denied: {0}")]
    PermissionDenied(PathBuf),

    /// An I/O error occurred while reading the file.
    #[error("I/O error for {path}: {source}")]
    Io {
        /// Path where the error occurred
        path: PathBuf,
        /// The underlying I/O error
        #[source]
        source: io::Error,
    },

    /// Reading stopped because shutdown was requested.
    #[error("Checksum interrupted: {0}")]
    Interrupted(PathBuf),
}

impl ChecksumError {
    /// Classify an I/O error raised while reading `path`.
    #[must_use]
    pub fn from_io(path: &Path, error: io::Error) -> Self {
        match error.kind() {
            io::ErrorKind::NotFound => Self::NotFound(path.to_path_buf()),
            io::ErrorKind::PermissionDenied => Self::PermissionDenied(path.to_path_buf()),
            _ => Self::Io {
                path: path.to_path_buf(),
                source: error,
            },
        }
    }

    /// Path the error refers to.
    #[must_use]
    pub fn path(&self) -> &Path {
        match self {
            Self::NotFound(path)
            | Self::PermissionDenied(path)
            | Self::Interrupted(path)
            | Self::Io { path, .. } => path,
        }
    }

    /// Whether this error was caused by a shutdown request rather than I/O.
    #[must_use]
    pub fn is_interrupted(&self) -> bool {
        matches!(self, Self::Interrupted(_))
    }
}
