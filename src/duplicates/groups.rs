//! Size index and duplicate group types.
//!
//! # Overview
//!
//! Size grouping is the first phase of duplicate detection: files with
//! different lengths cannot be duplicates, so every discovered file is
//! filed under its byte length in a [`SizeIndex`]. Only sizes shared by two
//! or more files go on to be checksummed.
//!
//! # Example
//!
//! ```
//! use dupescan::scanner::FileEntry;
//! use dupescan::duplicates::group_by_size;
//! use std::path::PathBuf;
//!
//! let files = vec![
//!     FileEntry::new(PathBuf::from("/file1.txt"), 1024),
//!     FileEntry::new(PathBuf::from("/file2.txt"), 1024),
//!     FileEntry::new(PathBuf::from("/file3.txt"), 2048),
//! ];
//!
//! let (index, stats) = group_by_size(files);
//!
//! assert_eq!(stats.total_files, 3);
//! assert_eq!(stats.potential_duplicates, 2);
//! assert_eq!(index.candidate_buckets().count(), 1);
//! ```

use std::collections::BTreeMap;
use std::path::PathBuf;

use serde::Serialize;

use crate::scanner::{checksum_to_hex, FileEntry};

/// Files partitioned by byte length.
///
/// Within a bucket, files keep the order in which they were inserted.
/// Sizes iterate in ascending order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SizeIndex {
    buckets: BTreeMap<u64, Vec<PathBuf>>,
}

impl SizeIndex {
    /// Create an empty index.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a file to the bucket for `size`.
    pub fn insert(&mut self, size: u64, path: PathBuf) {
        self.buckets.entry(size).or_default().push(path);
    }

    /// Files recorded with exactly `size` bytes.
    #[must_use]
    pub fn get(&self, size: u64) -> Option<&[PathBuf]> {
        self.buckets.get(&size).map(Vec::as_slice)
    }

    /// Number of distinct sizes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.buckets.len()
    }

    /// Check if no files were recorded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.buckets.is_empty()
    }

    /// Total number of files across all buckets.
    #[must_use]
    pub fn total_files(&self) -> usize {
        self.buckets.values().map(Vec::len).sum()
    }

    /// Sum of all file sizes.
    #[must_use]
    pub fn total_bytes(&self) -> u64 {
        self.buckets
            .iter()
            .map(|(size, files)| size * files.len() as u64)
            .sum()
    }

    /// Iterate over `(size, files)` pairs in ascending size order.
    pub fn iter(&self) -> impl DoubleEndedIterator<Item = (u64, &[PathBuf])> + '_ {
        self.buckets
            .iter()
            .map(|(size, files)| (*size, files.as_slice()))
    }

    /// Buckets that could contain duplicates (two or more files).
    pub fn candidate_buckets(&self) -> impl DoubleEndedIterator<Item = (u64, &[PathBuf])> + '_ {
        self.iter().filter(|(_, files)| files.len() > 1)
    }

    /// Number of files in candidate buckets.
    #[must_use]
    pub fn candidate_files(&self) -> usize {
        self.candidate_buckets().map(|(_, files)| files.len()).sum()
    }
}

impl Extend<FileEntry> for SizeIndex {
    fn extend<T: IntoIterator<Item = FileEntry>>(&mut self, iter: T) {
        for file in iter {
            self.insert(file.size, file.path);
        }
    }
}

impl FromIterator<FileEntry> for SizeIndex {
    fn from_iter<T: IntoIterator<Item = FileEntry>>(iter: T) -> Self {
        let mut index = Self::new();
        index.extend(iter);
        index
    }
}

/// Confirmed duplicate group: two or more files sharing size and checksum.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DuplicateGroup {
    /// CRC-32 of the shared content
    pub checksum: u32,
    /// File size in bytes (shared by all files)
    pub size: u64,
    /// Member files in discovery order
    pub files: Vec<PathBuf>,
}

impl DuplicateGroup {
    /// Create a new duplicate group.
    #[must_use]
    pub fn new(checksum: u32, size: u64, files: Vec<PathBuf>) -> Self {
        debug_assert!(files.len() > 1, "a duplicate group needs two files");
        Self {
            checksum,
            size,
            files,
        }
    }

    /// Number of files in this group.
    #[must_use]
    pub fn len(&self) -> usize {
        self.files.len()
    }

    /// Check if this group is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    /// Total size of all files in this group.
    #[must_use]
    pub fn total_size(&self) -> u64 {
        self.size * self.files.len() as u64
    }

    /// Space taken by every copy except one.
    #[must_use]
    pub fn wasted_space(&self) -> u64 {
        self.size * self.duplicate_count() as u64
    }

    /// Number of duplicate copies (total - 1 original).
    #[must_use]
    pub fn duplicate_count(&self) -> usize {
        self.files.len().saturating_sub(1)
    }

    /// Checksum as 8 hex digits.
    #[must_use]
    pub fn checksum_hex(&self) -> String {
        checksum_to_hex(self.checksum)
    }
}

/// Statistics from size grouping.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GroupingStats {
    /// Total number of files processed
    pub total_files: usize,
    /// Total size of all files in bytes
    pub total_size: u64,
    /// Number of unique file sizes
    pub unique_sizes: usize,
    /// Number of files that could be duplicates (in buckets of 2+)
    pub potential_duplicates: usize,
    /// Number of files eliminated as unique (singleton buckets)
    pub eliminated_unique: usize,
    /// Number of size buckets with 2+ files
    pub duplicate_groups: usize,
}

impl GroupingStats {
    /// Compute statistics for an index.
    #[must_use]
    pub fn from_index(index: &SizeIndex) -> Self {
        let mut stats = Self {
            total_files: index.total_files(),
            total_size: index.total_bytes(),
            unique_sizes: index.len(),
            ..Default::default()
        };
        for (_, files) in index.iter() {
            if files.len() > 1 {
                stats.potential_duplicates += files.len();
                stats.duplicate_groups += 1;
            } else {
                stats.eliminated_unique += files.len();
            }
        }
        stats
    }

    /// Percentage of files eliminated by size grouping.
    #[must_use]
    pub fn elimination_rate(&self) -> f64 {
        if self.total_files == 0 {
            0.0
        } else {
            (self.eliminated_unique as f64 / self.total_files as f64) * 100.0
        }
    }
}

/// Group files by size.
///
/// Every file lands in exactly one bucket. Singleton buckets are kept in
/// the index (they count toward totals) but are never checksummed.
#[must_use]
pub fn group_by_size(files: impl IntoIterator<Item = FileEntry>) -> (SizeIndex, GroupingStats) {
    let index: SizeIndex = files.into_iter().collect();
    let stats = GroupingStats::from_index(&index);

    log::debug!(
        "Size grouping: {} files → {} potential duplicates ({:.1}% eliminated)",
        stats.total_files,
        stats.potential_duplicates,
        stats.elimination_rate()
    );

    (index, stats)
}
