//! Duplicate finder implementation with two-phase detection.
//!
//! # Overview
//!
//! This module orchestrates the duplicate detection pipeline:
//! 1. **Phase 1 - Size index**: Walk every root and group files by size
//!    (see [`crate::duplicates::groups`])
//! 2. **Phase 2 - Checksum**: CRC-32 every file in a size bucket holding
//!    two or more files, then group each bucket by checksum
//!
//! An optional verification pass confirms checksum groups byte for byte.
//!
//! # Example
//!
//! ```no_run
//! use dupescan::duplicates::{build_size_index, find_duplicates};
//! use dupescan::scanner::WalkerConfig;
//!
//! let (index, warnings) = build_size_index(&["."], &WalkerConfig::default()).unwrap();
//! let (groups, errors) = find_duplicates(&index);
//!
//! println!(
//!     "{} groups, {} warnings, {} read errors",
//!     groups.len(),
//!     warnings.len(),
//!     errors.len()
//! );
//! ```

use std::collections::HashMap;
use std::path::{Component, Path, PathBuf};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use bytesize::ByteSize;
use rayon::prelude::*;

use super::groups::{DuplicateGroup, GroupingStats, SizeIndex};
use crate::progress::{ProgressCallback, PHASE_CHECKSUM, PHASE_WALKING};
use crate::scanner::{
    files_identical, ChecksumError, Crc32Hasher, FileChecksum, ScanError, Walker, WalkerConfig,
    DEFAULT_BLOCK_SIZE,
};

/// Non-fatal warning raised while building the size index.
pub type ScanIssue = ScanError;

/// Non-fatal read failure raised while resolving duplicates.
pub type ChecksumIssue = ChecksumError;

/// Errors that stop a scan.
#[derive(thiserror::Error, Debug)]
pub enum FinderError {
    /// A root is missing, not a directory, or cannot be listed.
    #[error("Invalid root {path}: {reason}")]
    InvalidRoot {
        /// Root as given by the caller
        path: PathBuf,
        /// Human-readable cause
        reason: String,
    },

    /// The scan was interrupted by user (Ctrl+C or shutdown signal).
    #[error("Scan interrupted by user")]
    Interrupted,

    /// A traversal warning escalated by strict mode.
    #[error(transparent)]
    Scan(#[from] ScanError),

    /// A read failure escalated by strict mode.
    #[error(transparent)]
    Checksum(#[from] ChecksumError),
}

/// Resolve, validate and deduplicate root directories.
///
/// Every root is made absolute, with `.` and `..` removed. A root that does
/// not exist, is not a directory, or cannot be listed fails the whole call.
/// A root equal to or nested inside another root is dropped so no file is
/// indexed twice; the surviving roots keep the order in which they were
/// given. Containment is decided on canonical paths, so `..` and symbolic
/// links cannot hide one root inside another.
///
/// # Errors
///
/// Returns [`FinderError::InvalidRoot`] for the first unusable root.
pub fn resolve_roots<P: AsRef<Path>>(roots: &[P]) -> Result<Vec<PathBuf>, FinderError> {
    // (root to walk, canonical form used for containment checks)
    let mut resolved: Vec<(PathBuf, PathBuf)> = Vec::with_capacity(roots.len());

    for root in roots {
        let root = root.as_ref();
        let invalid = |reason: String| FinderError::InvalidRoot {
            path: root.to_path_buf(),
            reason,
        };

        let absolute = std::path::absolute(root).map_err(|e| invalid(e.to_string()))?;
        let metadata = std::fs::metadata(&absolute).map_err(|e| match e.kind() {
            std::io::ErrorKind::NotFound => invalid("path does not exist".to_string()),
            _ => invalid(e.to_string()),
        })?;
        if !metadata.is_dir() {
            return Err(invalid("not a directory".to_string()));
        }
        std::fs::read_dir(&absolute).map_err(|e| invalid(format!("cannot be read: {e}")))?;
        let canonical = std::fs::canonicalize(&absolute).map_err(|e| invalid(e.to_string()))?;

        // Lexical `..` removal is only safe when it lands on the same directory.
        let normalized = normalize_lexically(&absolute);
        let walk_root = match std::fs::canonicalize(&normalized) {
            Ok(c) if c == canonical => normalized,
            _ => canonical.clone(),
        };

        if resolved.iter().any(|(_, kept)| canonical.starts_with(kept)) {
            log::debug!("Skipping root {} (already covered)", walk_root.display());
            continue;
        }
        resolved.retain(|(kept_root, kept)| {
            let nested = kept.starts_with(&canonical);
            if nested {
                log::debug!("Root {} covers {}", walk_root.display(), kept_root.display());
            }
            !nested
        });
        resolved.push((walk_root, canonical));
    }

    Ok(resolved.into_iter().map(|(root, _)| root).collect())
}

/// Drop `.` components and fold `..` into the preceding component.
fn normalize_lexically(path: &Path) -> PathBuf {
    let mut normalized = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                if !normalized.pop() {
                    normalized.push(component);
                }
            }
            other => normalized.push(other),
        }
    }
    normalized
}

/// Result of building a size index.
#[derive(Debug, Default)]
pub struct IndexOutcome {
    /// Files grouped by size, in discovery order within each size
    pub index: SizeIndex,
    /// Warnings about skipped directories and entries
    pub issues: Vec<ScanIssue>,
    /// Roots that were actually walked
    pub roots: Vec<PathBuf>,
    /// Whether walking stopped on a shutdown request
    pub interrupted: bool,
}

/// Build a size index over every file beneath `roots`.
///
/// Roots are walked in order; see [`resolve_roots`] for validation.
/// Unreadable directories and entries whose size cannot be read are
/// skipped and returned as warnings.
///
/// # Errors
///
/// Returns [`FinderError::InvalidRoot`] before any traversal if a root is
/// unusable.
pub fn build_size_index<P: AsRef<Path>>(
    roots: &[P],
    config: &WalkerConfig,
) -> Result<(SizeIndex, Vec<ScanIssue>), FinderError> {
    let finder_config = FinderConfig::default().with_walker_config(config.clone());
    let outcome = build_size_index_with(roots, &finder_config)?;
    Ok((outcome.index, outcome.issues))
}

/// Build a size index using the walker, strictness, shutdown flag and
/// progress callback of a [`FinderConfig`].
///
/// # Errors
///
/// Returns [`FinderError::InvalidRoot`] for an unusable root, or
/// [`FinderError::Scan`] for the first warning when `strict` is set.
pub fn build_size_index_with<P: AsRef<Path>>(
    roots: &[P],
    config: &FinderConfig,
) -> Result<IndexOutcome, FinderError> {
    let roots = resolve_roots(roots)?;
    let mut outcome = IndexOutcome::default();

    if let Some(ref callback) = config.progress_callback {
        callback.on_phase_start(PHASE_WALKING, 0);
    }

    let mut discovered = 0usize;
    for root in &roots {
        if config.is_shutdown_requested() {
            break;
        }
        log::debug!("Walking {}", root.display());
        if let Some(ref callback) = config.progress_callback {
            callback.on_message(&format!("Walking {}", root.display()));
        }

        let mut walker = Walker::new(root, config.walker_config.clone());
        if let Some(ref flag) = config.shutdown_flag {
            walker = walker.with_shutdown_flag(flag.clone());
        }

        for result in walker.walk() {
            match result {
                Ok(file) => {
                    discovered += 1;
                    if let Some(ref callback) = config.progress_callback {
                        callback.on_progress(discovered, &file.path.to_string_lossy());
                    }
                    outcome.index.insert(file.size, file.path);
                }
                Err(e) if config.strict => return Err(FinderError::Scan(e)),
                Err(e) => outcome.issues.push(e),
            }
        }
    }

    if let Some(ref callback) = config.progress_callback {
        callback.on_phase_end(PHASE_WALKING);
    }

    outcome.interrupted = config.is_shutdown_requested();
    outcome.roots = roots;
    Ok(outcome)
}

/// Configuration for the duplicate resolver.
#[derive(Clone)]
pub struct ResolverConfig {
    /// Number of I/O threads for parallel checksumming.
    /// Default is 4 to prevent disk thrashing.
    pub io_threads: usize,
    /// Read block size for checksums and byte verification.
    pub block_size: usize,
    /// Stop scheduling work after the first read failure.
    pub strict: bool,
    /// Confirm checksum groups byte for byte.
    pub verify: bool,
    /// Optional shutdown flag for graceful termination.
    pub shutdown_flag: Option<Arc<AtomicBool>>,
    /// Optional progress callback.
    pub progress_callback: Option<Arc<dyn ProgressCallback>>,
}

impl std::fmt::Debug for ResolverConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ResolverConfig")
            .field("io_threads", &self.io_threads)
            .field("block_size", &self.block_size)
            .field("strict", &self.strict)
            .field("verify", &self.verify)
            .field("shutdown_flag", &self.shutdown_flag)
            .field(
                "progress_callback",
                &self.progress_callback.as_ref().map(|_| "<callback>"),
            )
            .finish()
    }
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self {
            io_threads: 4,
            block_size: DEFAULT_BLOCK_SIZE,
            strict: false,
            verify: false,
            shutdown_flag: None,
            progress_callback: None,
        }
    }
}

impl ResolverConfig {
    /// Set the number of I/O threads. Zero is raised to one.
    #[must_use]
    pub fn with_io_threads(mut self, threads: usize) -> Self {
        self.io_threads = threads.max(1);
        self
    }

    /// Set the verification block size.
    #[must_use]
    pub fn with_block_size(mut self, block_size: usize) -> Self {
        self.block_size = block_size.max(1);
        self
    }

    /// Enable or disable fail-fast behavior.
    #[must_use]
    pub fn with_strict(mut self, strict: bool) -> Self {
        self.strict = strict;
        self
    }

    /// Enable or disable byte verification.
    #[must_use]
    pub fn with_verify(mut self, verify: bool) -> Self {
        self.verify = verify;
        self
    }

    /// Set the shutdown flag.
    #[must_use]
    pub fn with_shutdown_flag(mut self, flag: Arc<AtomicBool>) -> Self {
        self.shutdown_flag = Some(flag);
        self
    }

    /// Set the progress callback.
    #[must_use]
    pub fn with_progress_callback(mut self, callback: Arc<dyn ProgressCallback>) -> Self {
        self.progress_callback = Some(callback);
        self
    }

    fn is_shutdown_requested(&self) -> bool {
        self.shutdown_flag
            .as_ref()
            .is_some_and(|f| f.load(Ordering::SeqCst))
    }
}

/// Statistics from duplicate resolution.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResolveStats {
    /// Number of sizes shared by two or more files
    pub candidate_sizes: usize,
    /// Number of files in those sizes
    pub candidate_files: usize,
    /// Number of files successfully checksummed
    pub hashed_files: usize,
    /// Bytes read to compute those checksums
    pub hashed_bytes: u64,
    /// Number of files dropped because they could not be read
    pub failed_files: usize,
    /// Number of files dropped by byte verification despite a checksum match
    pub verify_rejected: usize,
    /// Number of confirmed duplicate groups
    pub duplicate_groups: usize,
    /// Total number of duplicate files (excluding originals)
    pub duplicate_files: usize,
    /// Total wasted space (bytes that could be reclaimed)
    pub wasted_space: u64,
}

/// Result of duplicate resolution.
#[derive(Debug, Default)]
pub struct ResolveOutcome {
    /// Confirmed groups: size descending, then by first discovered file
    pub groups: Vec<DuplicateGroup>,
    /// Read failures, in discovery order
    pub issues: Vec<ChecksumIssue>,
    /// Counters for the run
    pub stats: ResolveStats,
    /// Whether work was cut short by a shutdown request
    pub interrupted: bool,
}

/// Find duplicate groups in a size index with the default CRC-32 hasher.
///
/// Files that cannot be read are dropped and reported; resolution always
/// runs to completion.
#[must_use]
pub fn find_duplicates(index: &SizeIndex) -> (Vec<DuplicateGroup>, Vec<ChecksumIssue>) {
    let outcome = find_duplicates_with(index, &Crc32Hasher::new(), &ResolverConfig::default());
    (outcome.groups, outcome.issues)
}

/// Find duplicate groups in a size index using a custom checksum source.
///
/// Only sizes holding two or more files are read. All checksums for a size
/// are known before its groups are formed, and group order never depends
/// on which worker finished first.
///
/// With `strict` set, no new reads are started after the first failure;
/// the returned issues then hold that failure.
pub fn find_duplicates_with(
    index: &SizeIndex,
    checksum: &dyn FileChecksum,
    config: &ResolverConfig,
) -> ResolveOutcome {
    let mut outcome = ResolveOutcome::default();

    // Largest sizes first; files keep discovery order.
    let candidates: Vec<(u64, &Path)> = index
        .candidate_buckets()
        .rev()
        .flat_map(|(size, files)| files.iter().map(move |path| (size, path.as_path())))
        .collect();

    outcome.stats.candidate_sizes = index.candidate_buckets().count();
    outcome.stats.candidate_files = candidates.len();

    if candidates.is_empty() {
        log::debug!("No size shared by two files, nothing to checksum");
        return outcome;
    }

    log::info!(
        "Phase 2: Checksumming {} files in {} size groups",
        candidates.len(),
        outcome.stats.candidate_sizes
    );

    if let Some(ref callback) = config.progress_callback {
        callback.on_phase_start(PHASE_CHECKSUM, candidates.len());
    }

    let failed = AtomicBool::new(false);
    let processed = AtomicUsize::new(0);

    let results: Vec<Option<Result<u32, ChecksumError>>> = run_in_pool(config.io_threads, || {
        candidates
            .par_iter()
            .map(|&(_, path)| {
                let aborted = config.strict && failed.load(Ordering::SeqCst);
                if aborted || config.is_shutdown_requested() {
                    return None;
                }

                let result = checksum.checksum(path);
                if result.is_err() {
                    failed.store(true, Ordering::SeqCst);
                }

                let done = processed.fetch_add(1, Ordering::SeqCst) + 1;
                if let Some(ref callback) = config.progress_callback {
                    callback.on_progress(done, &path.to_string_lossy());
                }
                Some(result)
            })
            .collect()
    });

    if let Some(ref callback) = config.progress_callback {
        callback.on_phase_end(PHASE_CHECKSUM);
    }

    // Checksum buckets per size, in order of each checksum's first file.
    let mut pending: Vec<DuplicateGroup> = Vec::new();
    let mut current_size: Option<u64> = None;
    let mut buckets: Vec<DuplicateGroup> = Vec::new();
    let mut positions: HashMap<u32, usize> = HashMap::new();

    for (&(size, path), result) in candidates.iter().zip(results) {
        if current_size != Some(size) {
            flush_buckets(&mut buckets, &mut pending);
            positions.clear();
            current_size = Some(size);
        }

        match result {
            Some(Ok(crc)) => {
                outcome.stats.hashed_files += 1;
                outcome.stats.hashed_bytes += size;
                match positions.get(&crc) {
                    Some(&pos) => buckets[pos].files.push(path.to_path_buf()),
                    None => {
                        positions.insert(crc, buckets.len());
                        buckets.push(DuplicateGroup {
                            checksum: crc,
                            size,
                            files: vec![path.to_path_buf()],
                        });
                    }
                }
            }
            Some(Err(e)) if e.is_interrupted() => outcome.interrupted = true,
            Some(Err(e)) => {
                log::warn!("Skipping unreadable file: {}", e);
                outcome.stats.failed_files += 1;
                outcome.issues.push(e);
            }
            None => {}
        }
    }
    flush_buckets(&mut buckets, &mut pending);

    if config.verify && !pending.is_empty() {
        log::info!("Verifying {} checksum groups byte for byte", pending.len());
        let block_size = config.block_size;
        let split: Vec<(Vec<DuplicateGroup>, Vec<ChecksumError>, usize)> =
            run_in_pool(config.io_threads, || {
                pending
                    .into_par_iter()
                    .map(|group| {
                        if config.is_shutdown_requested() {
                            return (Vec::new(), Vec::new(), 0);
                        }
                        split_identical(group, block_size)
                    })
                    .collect()
            });

        for (groups, errors, rejected) in split {
            outcome.groups.extend(groups);
            outcome.stats.failed_files += errors.len();
            outcome.stats.verify_rejected += rejected;
            outcome.issues.extend(errors);
        }
    } else {
        outcome.groups = pending;
    }

    outcome.interrupted |= config.is_shutdown_requested();

    outcome.stats.duplicate_groups = outcome.groups.len();
    outcome.stats.duplicate_files = outcome.groups.iter().map(DuplicateGroup::duplicate_count).sum();
    outcome.stats.wasted_space = outcome.groups.iter().map(DuplicateGroup::wasted_space).sum();

    log::info!(
        "Phase 2 complete: {} duplicate groups, {} duplicate files, {} read errors",
        outcome.stats.duplicate_groups,
        outcome.stats.duplicate_files,
        outcome.stats.failed_files
    );

    outcome
}

/// Move every bucket with two or more files into `groups`.
fn flush_buckets(buckets: &mut Vec<DuplicateGroup>, groups: &mut Vec<DuplicateGroup>) {
    groups.extend(buckets.drain(..).filter(|bucket| bucket.files.len() > 1));
}

/// Where a file ends up after comparison against the current classes.
enum Placement {
    Class(usize),
    NewClass,
    Dropped,
}

/// Split a checksum group into classes of byte-identical files.
///
/// Each file is compared against the first member of every class so far.
/// A file that cannot be read is dropped and reported once; when the
/// unreadable file is a class representative, the next member of that
/// class takes its place and the comparison is repeated. Returns the
/// classes holding two or more files, the read errors, and the number of
/// files left without a match.
fn split_identical(
    group: DuplicateGroup,
    block_size: usize,
) -> (Vec<DuplicateGroup>, Vec<ChecksumError>, usize) {
    let mut classes: Vec<Vec<PathBuf>> = Vec::new();
    let mut errors = Vec::new();

    for file in group.files {
        let mut placement = Placement::NewClass;
        let mut i = 0;

        while i < classes.len() {
            match files_identical(&classes[i][0], &file, block_size) {
                Ok(true) => {
                    placement = Placement::Class(i);
                    break;
                }
                Ok(false) => i += 1,
                Err(e) if e.path() == classes[i][0].as_path() => {
                    log::warn!("Dropping file during verification: {}", e);
                    errors.push(e);
                    classes[i].remove(0);
                    if classes[i].is_empty() {
                        classes.remove(i);
                    }
                }
                Err(e) => {
                    log::warn!("Dropping file during verification: {}", e);
                    errors.push(e);
                    placement = Placement::Dropped;
                    break;
                }
            }
        }

        match placement {
            Placement::Class(i) => classes[i].push(file),
            Placement::NewClass => classes.push(vec![file]),
            Placement::Dropped => {}
        }
    }

    let rejected = classes.iter().filter(|class| class.len() == 1).count();
    if rejected > 0 {
        log::debug!(
            "Checksum {:08x}: {} files differ despite matching CRC-32",
            group.checksum,
            rejected
        );
    }

    let groups = classes
        .into_iter()
        .filter(|class| class.len() > 1)
        .map(|files| DuplicateGroup::new(group.checksum, group.size, files))
        .collect();

    (groups, errors, rejected)
}

/// Run `op` on a dedicated pool of `threads` workers.
fn run_in_pool<R: Send>(threads: usize, op: impl FnOnce() -> R + Send) -> R {
    match rayon::ThreadPoolBuilder::new()
        .num_threads(threads.max(1))
        .build()
    {
        Ok(pool) => pool.install(op),
        Err(e) => {
            log::warn!(
                "Failed to create thread pool ({}), using global pool with {} threads",
                e,
                rayon::current_num_threads()
            );
            op()
        }
    }
}

/// Configuration for the duplicate finder.
#[derive(Clone, Default)]
pub struct FinderConfig {
    /// Walker filters applied to every root
    pub walker_config: WalkerConfig,
    /// Resolver settings
    pub resolver: ResolverConfig,
    /// Abort on the first warning or read failure
    pub strict: bool,
    /// Optional shutdown flag for graceful termination
    pub shutdown_flag: Option<Arc<AtomicBool>>,
    /// Optional progress callback
    pub progress_callback: Option<Arc<dyn ProgressCallback>>,
}

impl std::fmt::Debug for FinderConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FinderConfig")
            .field("walker_config", &self.walker_config)
            .field("resolver", &self.resolver)
            .field("strict", &self.strict)
            .field("shutdown_flag", &self.shutdown_flag)
            .field(
                "progress_callback",
                &self.progress_callback.as_ref().map(|_| "<callback>"),
            )
            .finish()
    }
}

impl FinderConfig {
    /// Set the walker configuration.
    #[must_use]
    pub fn with_walker_config(mut self, config: WalkerConfig) -> Self {
        self.walker_config = config;
        self
    }

    /// Set the number of I/O threads.
    #[must_use]
    pub fn with_io_threads(mut self, threads: usize) -> Self {
        self.resolver = self.resolver.with_io_threads(threads);
        self
    }

    /// Set the read block size for checksums and verification.
    #[must_use]
    pub fn with_block_size(mut self, block_size: usize) -> Self {
        self.resolver = self.resolver.with_block_size(block_size);
        self
    }

    /// Enable or disable strict (fail-fast) mode.
    #[must_use]
    pub fn with_strict(mut self, strict: bool) -> Self {
        self.strict = strict;
        self.resolver.strict = strict;
        self
    }

    /// Enable or disable byte verification.
    #[must_use]
    pub fn with_verify(mut self, verify: bool) -> Self {
        self.resolver.verify = verify;
        self
    }

    /// Set the shutdown flag.
    #[must_use]
    pub fn with_shutdown_flag(mut self, flag: Arc<AtomicBool>) -> Self {
        self.resolver.shutdown_flag = Some(flag.clone());
        self.shutdown_flag = Some(flag);
        self
    }

    /// Set the progress callback.
    #[must_use]
    pub fn with_progress_callback(mut self, callback: Arc<dyn ProgressCallback>) -> Self {
        self.resolver.progress_callback = Some(callback.clone());
        self.progress_callback = Some(callback);
        self
    }

    fn is_shutdown_requested(&self) -> bool {
        self.shutdown_flag
            .as_ref()
            .is_some_and(|f| f.load(Ordering::SeqCst))
    }
}

/// Summary statistics from a duplicate scan.
#[derive(Debug, Default)]
pub struct ScanSummary {
    /// Roots that were walked, after resolution and deduplication
    pub roots: Vec<PathBuf>,
    /// Total number of files indexed
    pub total_files: usize,
    /// Total size of all indexed files in bytes
    pub total_size: u64,
    /// Number of files sharing a size with another file
    pub candidate_files: usize,
    /// Number of files checksummed successfully
    pub hashed_files: usize,
    /// Bytes read while checksumming
    pub hashed_bytes: u64,
    /// Number of confirmed duplicate groups
    pub duplicate_groups: usize,
    /// Total number of duplicate files (excluding originals)
    pub duplicate_files: usize,
    /// Total space that can be reclaimed by removing duplicates
    pub reclaimable_space: u64,
    /// Time spent building the size index
    pub enumerate_duration: Duration,
    /// Time spent checksumming and grouping
    pub resolve_duration: Duration,
    /// Duration of the entire scan
    pub scan_duration: Duration,
    /// Whether the scan was interrupted
    pub interrupted: bool,
    /// Directories and entries skipped during traversal
    pub scan_warnings: Vec<ScanIssue>,
    /// Files dropped because they could not be read
    pub checksum_errors: Vec<ChecksumIssue>,
}

impl ScanSummary {
    /// Calculate the percentage of space that is wasted by duplicates.
    #[must_use]
    pub fn wasted_percentage(&self) -> f64 {
        if self.total_size == 0 {
            0.0
        } else {
            (self.reclaimable_space as f64 / self.total_size as f64) * 100.0
        }
    }

    /// Format reclaimable space as human-readable string.
    #[must_use]
    pub fn reclaimable_display(&self) -> String {
        ByteSize::b(self.reclaimable_space).to_string()
    }

    /// Format total size as human-readable string.
    #[must_use]
    pub fn total_size_display(&self) -> String {
        ByteSize::b(self.total_size).to_string()
    }

    /// Number of non-fatal problems of either kind.
    #[must_use]
    pub fn issue_count(&self) -> usize {
        self.scan_warnings.len() + self.checksum_errors.len()
    }
}

/// Duplicate finder that orchestrates the detection pipeline.
///
/// # Example
///
/// ```no_run
/// use dupescan::duplicates::{DuplicateFinder, FinderConfig};
/// use std::path::PathBuf;
///
/// let config = FinderConfig::default().with_io_threads(4);
/// let finder = DuplicateFinder::new(config);
///
/// let (groups, summary) = finder
///     .find_duplicates_in_paths(vec![PathBuf::from("/some/path")])
///     .unwrap();
///
/// println!("Found {} duplicate groups", groups.len());
/// println!("Reclaimable space: {}", summary.reclaimable_display());
/// ```
#[derive(Debug)]
pub struct DuplicateFinder {
    config: FinderConfig,
    hasher: Crc32Hasher,
}

impl DuplicateFinder {
    /// Create a new duplicate finder with the given configuration.
    #[must_use]
    pub fn new(config: FinderConfig) -> Self {
        let mut hasher = Crc32Hasher::new().with_block_size(config.resolver.block_size);
        if let Some(ref flag) = config.shutdown_flag {
            hasher = hasher.with_shutdown_flag(flag.clone());
        }
        Self { config, hasher }
    }

    /// Create a new duplicate finder with default configuration.
    #[must_use]
    pub fn with_defaults() -> Self {
        Self::new(FinderConfig::default())
    }

    /// Find all duplicate files beneath a single root.
    ///
    /// # Errors
    ///
    /// See [`DuplicateFinder::find_duplicates_in_paths`].
    pub fn find_duplicates(
        &self,
        path: &Path,
    ) -> Result<(Vec<DuplicateGroup>, ScanSummary), FinderError> {
        self.find_duplicates_in_paths(vec![path.to_path_buf()])
    }

    /// Find all duplicate files beneath several roots.
    ///
    /// Builds the size index over all roots, then checksums the candidates
    /// and groups them. Each phase is timed separately.
    ///
    /// # Errors
    ///
    /// Returns `FinderError` if:
    /// - A root is missing, not a directory, or unreadable
    /// - The scan is interrupted by shutdown signal
    /// - Strict mode is on and any warning or read failure occurs
    pub fn find_duplicates_in_paths(
        &self,
        paths: Vec<PathBuf>,
    ) -> Result<(Vec<DuplicateGroup>, ScanSummary), FinderError> {
        let start_time = Instant::now();
        let mut summary = ScanSummary::default();

        if self.config.is_shutdown_requested() {
            return Err(FinderError::Interrupted);
        }

        log::info!("Phase 1: Building size index for {} root(s)...", paths.len());
        let indexed = build_size_index_with(&paths, &self.config)?;
        summary.enumerate_duration = start_time.elapsed();

        if indexed.interrupted || self.config.is_shutdown_requested() {
            return Err(FinderError::Interrupted);
        }

        let size_stats = GroupingStats::from_index(&indexed.index);
        summary.roots = indexed.roots;
        summary.total_files = size_stats.total_files;
        summary.total_size = size_stats.total_size;
        summary.scan_warnings = indexed.issues;

        log::info!(
            "Phase 1 complete: {} files ({}) → {} candidates ({:.1}% eliminated)",
            size_stats.total_files,
            summary.total_size_display(),
            size_stats.potential_duplicates,
            size_stats.elimination_rate()
        );

        let resolve_start = Instant::now();
        let mut outcome = find_duplicates_with(&indexed.index, &self.hasher, &self.config.resolver);
        summary.resolve_duration = resolve_start.elapsed();

        if outcome.interrupted || self.config.is_shutdown_requested() {
            return Err(FinderError::Interrupted);
        }
        if self.config.strict && !outcome.issues.is_empty() {
            return Err(FinderError::Checksum(outcome.issues.swap_remove(0)));
        }

        summary.candidate_files = outcome.stats.candidate_files;
        summary.hashed_files = outcome.stats.hashed_files;
        summary.hashed_bytes = outcome.stats.hashed_bytes;
        summary.duplicate_groups = outcome.stats.duplicate_groups;
        summary.duplicate_files = outcome.stats.duplicate_files;
        summary.reclaimable_space = outcome.stats.wasted_space;
        summary.checksum_errors = outcome.issues;
        summary.scan_duration = start_time.elapsed();

        log::info!(
            "Scan complete: {} duplicate groups, {} duplicate files, {} reclaimable, {} warnings",
            summary.duplicate_groups,
            summary.duplicate_files,
            summary.reclaimable_display(),
            summary.issue_count()
        );

        Ok((outcome.groups, summary))
    }
}
