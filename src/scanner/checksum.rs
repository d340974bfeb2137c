//! Streaming CRC-32 file checksums.
//!
//! # Overview
//!
//! Files are read in fixed-size blocks and fed into a single incremental
//! CRC-32 accumulator, so memory use is bounded by the block size and the
//! result does not depend on how the stream was chunked. The polynomial is
//! the standard IEEE one used by zlib, gzip and PNG, which means values
//! agree with `zlib.crc32` and `cksum -a crc32b`-style tools.
//!
//! # Example
//!
//! ```no_run
//! use dupescan::scanner::{checksum_to_hex, Crc32Hasher, FileChecksum};
//! use std::path::Path;
//!
//! let hasher = Crc32Hasher::new();
//! let crc = hasher.checksum(Path::new("Cargo.toml")).unwrap();
//! println!("{}", checksum_to_hex(crc));
//! ```

use std::fs::File;
use std::io::{self, ErrorKind, Read};
use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use super::ChecksumError;

/// Default read block size (64 KiB).
pub const DEFAULT_BLOCK_SIZE: usize = 64 * 1024;

/// Source of whole-file checksums.
///
/// The duplicate resolver only talks to this trait, which keeps the
/// hashing strategy swappable and lets tests observe which files get read.
pub trait FileChecksum: Send + Sync {
    /// Compute the checksum of the entire content of `path`.
    ///
    /// # Errors
    ///
    /// Returns [`ChecksumError`] if the file cannot be opened or a read
    /// fails partway through.
    fn checksum(&self, path: &Path) -> Result<u32, ChecksumError>;
}

/// Checksum an in-memory buffer.
#[must_use]
pub fn checksum_bytes(data: &[u8]) -> u32 {
    crc32fast::hash(data)
}

/// Checksum everything readable from `reader`, `block_size` bytes at a time.
///
/// A block size of zero is treated as one byte.
///
/// # Errors
///
/// Propagates the first read error other than [`ErrorKind::Interrupted`],
/// which is retried.
pub fn checksum_reader<R: Read>(mut reader: R, block_size: usize) -> io::Result<u32> {
    let checksum = stream_checksum(&mut reader, block_size, || false)?;
    Ok(checksum.unwrap_or_default())
}

/// Block read loop shared by every checksum entry point.
///
/// `should_stop` is polled before each read; `Ok(None)` means it fired.
fn stream_checksum<R: Read>(
    reader: &mut R,
    block_size: usize,
    should_stop: impl Fn() -> bool,
) -> io::Result<Option<u32>> {
    let mut hasher = crc32fast::Hasher::new();
    let mut buffer = vec![0u8; block_size.max(1)];

    loop {
        if should_stop() {
            return Ok(None);
        }
        match reader.read(&mut buffer) {
            Ok(0) => break,
            Ok(n) => hasher.update(&buffer[..n]),
            Err(e) if e.kind() == ErrorKind::Interrupted => continue,
            Err(e) => return Err(e),
        }
    }

    Ok(Some(hasher.finalize()))
}

/// Format a checksum as 8 lowercase hex digits.
#[must_use]
pub fn checksum_to_hex(checksum: u32) -> String {
    format!("{checksum:08x}")
}

/// CRC-32 file hasher with bounded-memory streaming reads.
#[derive(Debug, Clone)]
pub struct Crc32Hasher {
    block_size: usize,
    shutdown_flag: Option<Arc<AtomicBool>>,
}

impl Default for Crc32Hasher {
    fn default() -> Self {
        Self::new()
    }
}

impl Crc32Hasher {
    /// Create a hasher using [`DEFAULT_BLOCK_SIZE`].
    #[must_use]
    pub fn new() -> Self {
        Self {
            block_size: DEFAULT_BLOCK_SIZE,
            shutdown_flag: None,
        }
    }

    /// Use a custom read block size. Zero is raised to one.
    #[must_use]
    pub fn with_block_size(mut self, block_size: usize) -> Self {
        self.block_size = block_size.max(1);
        self
    }

    /// Set the shutdown flag. A set flag aborts reading at the next block.
    #[must_use]
    pub fn with_shutdown_flag(mut self, flag: Arc<AtomicBool>) -> Self {
        self.shutdown_flag = Some(flag);
        self
    }

    /// Configured block size in bytes.
    #[must_use]
    pub fn block_size(&self) -> usize {
        self.block_size
    }

    fn is_shutdown_requested(&self) -> bool {
        self.shutdown_flag
            .as_ref()
            .is_some_and(|f| f.load(Ordering::SeqCst))
    }
}

impl FileChecksum for Crc32Hasher {
    fn checksum(&self, path: &Path) -> Result<u32, ChecksumError> {
        // The handle is dropped on every return path below.
        let mut file = File::open(path).map_err(|e| ChecksumError::from_io(path, e))?;
        let checksum = match stream_checksum(&mut file, self.block_size, || {
            self.is_shutdown_requested()
        }) {
            Ok(Some(checksum)) => checksum,
            Ok(None) => return Err(ChecksumError::Interrupted(path.to_path_buf())),
            Err(e) => return Err(ChecksumError::from_io(path, e)),
        };

        log::trace!("CRC-32 {} for {}", checksum_to_hex(checksum), path.display());
        Ok(checksum)
    }
}
