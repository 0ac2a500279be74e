//! Content checksums for published urls (blake3).

use std::fs;
use std::io;
use std::path::Path;

/// Hex characters kept in a published checksum.
pub const CHECKSUM_LEN: usize = 8;

/// A 256-bit content hash (blake3 output).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ContentHash([u8; 32]);

impl ContentHash {
    /// Hash a byte slice.
    pub fn of(bytes: &[u8]) -> Self {
        Self(*blake3::hash(bytes).as_bytes())
    }

    /// Short lowercase hex prefix used in file names.
    pub fn short(self) -> String {
        hex::encode(&self.0[..CHECKSUM_LEN / 2])
    }
}

impl std::fmt::Display for ContentHash {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.short())
    }
}

/// Short checksum of `bytes`.
pub fn checksum(bytes: &[u8]) -> String {
    ContentHash::of(bytes).short()
}

/// Short checksum of a file's contents.
pub fn file_checksum(path: &Path) -> io::Result<String> {
    let bytes = fs::read(path)?;
    Ok(checksum(&bytes))
}
