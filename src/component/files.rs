//! Main-file collection for resolved components.

use std::path::{Path, PathBuf};

use rayon::prelude::*;

use super::manifest;
use super::resolve::ResolvedDependency;
use crate::error::{AssetError, Result};
use crate::source::{FileEntry, SourceSpec, is_glob};

/// Stat every `main` entry of a resolved component.
///
/// Entries resolve against the manifest's directory. A plain entry that
/// does not exist fails the whole component with `MissingMainFile`; glob
/// entries are expanded and may match nothing.
pub fn main_files(resolved: &ResolvedDependency) -> Result<Vec<FileEntry>> {
    let manifest = manifest::read(&resolved.manifest_path)?;
    let dir = manifest::manifest_dir(&resolved.manifest_path);

    let mut files = Vec::with_capacity(manifest.main.len());
    for entry in &manifest.main {
        if is_glob(entry) {
            let matched = SourceSpec::new(entry.as_str())
                .cwd(&dir)
                .base(&dir)
                .discover()?;
            files.extend(matched);
            continue;
        }

        let path = dir.join(entry);
        let relative = path
            .strip_prefix(&dir)
            .map(Path::to_path_buf)
            .unwrap_or_else(|_| PathBuf::from(entry));
        let file = FileEntry::stat(path.clone(), relative)
            .map_err(|source| AssetError::MissingMainFile { path, source })?;
        files.push(file);
    }

    Ok(files)
}

/// Keep files whose name ends with `.<ext>` (case-sensitive).
///
/// `ext` may be given with or without the leading dot.
pub fn filter_by_extension(files: Vec<FileEntry>, ext: &str) -> Vec<FileEntry> {
    let suffix = format!(".{}", ext.trim_start_matches('.'));
    files
        .into_iter()
        .filter(|f| f.file_name().ends_with(&suffix))
        .collect()
}

/// Main files of every resolved component, in resolution order.
pub fn collect(resolved: &[ResolvedDependency]) -> Result<Vec<FileEntry>> {
    let per_component = resolved
        .par_iter()
        .map(main_files)
        .collect::<Result<Vec<_>>>()?;
    Ok(per_component.into_iter().flatten().collect())
}
