//! Third-party component resolution.
//!
//! ```text
//! roots ──▶ expand ──▶ dedupe ──▶ main_files ──▶ filter_by_extension
//!          (records)  (one per    (FileEntry)     (.js / .css)
//!                      name)
//! ```

pub mod files;
pub mod manifest;
pub mod resolve;
pub mod version;

pub use files::{collect, filter_by_extension, main_files};
pub use manifest::{Manifest, component_directory, locate, read};
pub use resolve::{DependencyRecord, ResolvedDependency, dedupe, expand, resolve};

use std::path::Path;

use crate::error::Result;
use crate::source::FileEntry;

/// Full component pipeline: resolve roots and keep main files with `ext`.
pub fn component_files<P: AsRef<Path> + Sync>(roots: &[P], ext: &str) -> Result<Vec<FileEntry>> {
    let resolved = resolve(roots)?;
    let files = collect(&resolved)?;
    Ok(filter_by_extension(files, ext))
}
