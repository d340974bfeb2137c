//! Directory walker implementation using jwalk.
//!
//! # Overview
//!
//! This module provides the [`Walker`] struct for traversing a directory
//! tree and collecting the size of every regular file beneath it.
//!
//! # Features
//!
//! - Depth-first traversal with children sorted by name, so the order of
//!   discovered files is stable between runs
//! - Gitignore-style pattern matching via the `ignore` crate
//! - Size filtering (min/max, empty files)
//! - Hidden file filtering
//! - Graceful shutdown via atomic flag
//!
//! Symbolic links are never followed into directories. A link to a regular
//! file is reported with the size of its target.
//!
//! # Example
//!
//! ```no_run
//! use dupescan::scanner::{Walker, WalkerConfig};
//! use std::path::Path;
//!
//! let walker = Walker::new(Path::new("/home/user/Downloads"), WalkerConfig::default());
//! let files: Vec<_> = walker.walk().filter_map(Result::ok).collect();
//! println!("Found {} files", files.len());
//! ```

use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use ignore::gitignore::{Gitignore, GitignoreBuilder};
use jwalk::WalkDir;

use super::{FileEntry, ScanError, WalkerConfig};

/// Directory walker for file discovery beneath a single root.
#[derive(Debug, Clone)]
pub struct Walker {
    /// Root path to walk
    root: PathBuf,
    /// Walker configuration
    config: WalkerConfig,
    /// Optional shutdown flag for graceful termination
    shutdown_flag: Option<Arc<AtomicBool>>,
}

impl Walker {
    /// Create a new walker for the given root directory.
    ///
    /// The root is used as given; callers that need absolute paths in the
    /// results should pass an absolute root.
    #[must_use]
    pub fn new(path: &Path, config: WalkerConfig) -> Self {
        Self {
            root: path.to_path_buf(),
            config,
            shutdown_flag: None,
        }
    }

    /// Set the shutdown flag for graceful termination.
    ///
    /// When the flag is set to `true`, the walker stops iteration as soon
    /// as possible.
    #[must_use]
    pub fn with_shutdown_flag(mut self, flag: Arc<AtomicBool>) -> Self {
        self.shutdown_flag = Some(flag);
        self
    }

    fn is_shutdown_requested(&self) -> bool {
        self.shutdown_flag
            .as_ref()
            .is_some_and(|f| f.load(Ordering::SeqCst))
    }

    /// Build the ignore matcher from configured patterns.
    fn build_gitignore(&self) -> Option<Gitignore> {
        if self.config.ignore_patterns.is_empty() {
            return None;
        }

        let mut builder = GitignoreBuilder::new(&self.root);
        for pattern in &self.config.ignore_patterns {
            if let Err(e) = builder.add_line(None, pattern) {
                log::warn!("Invalid ignore pattern '{}': {}", pattern, e);
            }
        }

        match builder.build() {
            Ok(gitignore) if !gitignore.is_empty() => Some(gitignore),
            Ok(_) => None,
            Err(e) => {
                log::warn!("Failed to build ignore patterns: {}", e);
                None
            }
        }
    }

    /// Check the path and every parent directory against the ignore patterns.
    fn should_ignore(&self, path: &Path, is_dir: bool, gitignore: Option<&Gitignore>) -> bool {
        let Some(gi) = gitignore else {
            return false;
        };
        let Ok(relative) = path.strip_prefix(&self.root) else {
            return false;
        };
        if relative.as_os_str().is_empty() {
            return false;
        }
        gi.matched_path_or_any_parents(relative, is_dir).is_ignore()
    }

    /// Walk the directory tree, yielding file entries.
    ///
    /// Errors are yielded as [`ScanError`] values rather than stopping
    /// iteration: an unreadable directory produces one
    /// [`ScanError::PathUnreadable`] and its subtree is skipped.
    pub fn walk(&self) -> impl Iterator<Item = Result<FileEntry, ScanError>> + '_ {
        let gitignore = self.build_gitignore();

        let walk_dir = WalkDir::new(&self.root)
            .follow_links(false)
            .skip_hidden(self.config.skip_hidden)
            .sort(true);

        walk_dir.into_iter().filter_map(move |entry_result| {
            if self.is_shutdown_requested() {
                log::debug!("Walker: Shutdown requested, stopping iteration");
                return None;
            }

            match entry_result {
                Ok(entry) => {
                    if entry.depth == 0 || entry.file_type().is_dir() {
                        return None;
                    }

                    let path = entry.path();
                    if self.should_ignore(&path, false, gitignore.as_ref()) {
                        log::trace!("Ignoring file: {}", path.display());
                        return None;
                    }

                    self.process_entry(path)
                }
                Err(e) => {
                    let path = e
                        .path()
                        .map_or_else(|| self.root.clone(), std::borrow::ToOwned::to_owned);
                    if self.should_ignore(&path, true, gitignore.as_ref()) {
                        return None;
                    }
                    log::warn!("Skipping unreadable directory {}: {}", path.display(), e);
                    Some(Err(ScanError::PathUnreadable {
                        path,
                        source: std::io::Error::other(e.to_string()),
                    }))
                }
            }
        })
    }

    /// Query the size of a non-directory entry and apply filters.
    fn process_entry(&self, path: PathBuf) -> Option<Result<FileEntry, ScanError>> {
        let metadata = match std::fs::metadata(&path) {
            Ok(m) => m,
            Err(source) => {
                log::warn!("Cannot determine size of {}: {}", path.display(), source);
                return Some(Err(ScanError::FileSizeUnavailable { path, source }));
            }
        };

        if !metadata.is_file() {
            log::trace!("Skipping non-regular file: {}", path.display());
            return None;
        }

        let size = metadata.len();
        if !self.config.accepts_size(size) {
            log::trace!(
                "Skipping file due to size filter ({}): {}",
                size,
                path.display()
            );
            return None;
        }

        Some(Ok(FileEntry::new(path, size)))
    }
}
