//! Freshness detection: mtime for build outputs, blake3 for published checksums.

mod hash;
pub mod mtime;

pub use hash::{CHECKSUM_LEN, ContentHash, checksum, file_checksum};
pub use mtime::{get_mtime, is_output_fresh};
