//! Byte-for-byte file comparison.
//!
//! CRC-32 matches are accepted as duplicates by default. When certainty
//! matters, the resolver can confirm each checksum group with
//! [`files_identical`], which streams both files side by side.

use std::fs::File;
use std::io::{self, ErrorKind, Read};
use std::path::Path;

use super::ChecksumError;

/// Compare two files block by block.
///
/// Returns `Ok(false)` as soon as a differing block or length is found.
///
/// # Errors
///
/// Returns [`ChecksumError`] if either file cannot be opened or read.
pub fn files_identical(a: &Path, b: &Path, block_size: usize) -> Result<bool, ChecksumError> {
    let block_size = block_size.max(1);
    let mut file_a = File::open(a).map_err(|e| ChecksumError::from_io(a, e))?;
    let mut file_b = File::open(b).map_err(|e| ChecksumError::from_io(b, e))?;

    let mut buf_a = vec![0u8; block_size];
    let mut buf_b = vec![0u8; block_size];

    loop {
        let n_a = fill(&mut file_a, &mut buf_a).map_err(|e| ChecksumError::from_io(a, e))?;
        let n_b = fill(&mut file_b, &mut buf_b).map_err(|e| ChecksumError::from_io(b, e))?;

        if n_a != n_b || buf_a[..n_a] != buf_b[..n_b] {
            return Ok(false);
        }
        if n_a == 0 {
            return Ok(true);
        }
    }
}

/// Read until `buf` is full or the stream ends.
fn fill<R: Read>(reader: &mut R, buf: &mut [u8]) -> io::Result<usize> {
    let mut filled = 0;
    while filled < buf.len() {
        match reader.read(&mut buf[filled..]) {
            Ok(0) => break,
            Ok(n) => filled += n,
            Err(e) if e.kind() == ErrorKind::Interrupted => continue,
            Err(e) => return Err(e),
        }
    }
    Ok(filled)
}
