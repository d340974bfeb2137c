//! Duplicate detection module.
//!
//! This module provides functionality for:
//! - Size-based file grouping (Phase 1)
//! - CRC-32 comparison of same-size files (Phase 2)
//! - Optional byte verification of checksum matches
//! - Duplicate group management

pub mod finder;
pub mod groups;

pub use finder::{
    build_size_index, build_size_index_with, find_duplicates, find_duplicates_with,
    resolve_roots, ChecksumIssue, DuplicateFinder, FinderConfig, FinderError, IndexOutcome,
    ResolveOutcome, ResolveStats, ResolverConfig, ScanIssue, ScanSummary,
};
pub use groups::{group_by_size, DuplicateGroup, GroupingStats, SizeIndex};
