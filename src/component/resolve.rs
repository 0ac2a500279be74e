//! Dependency expansion and version deduplication.
//!
//! Two stages:
//! - `expand`: walk every root manifest and emit one record per dependency
//!   edge, sub-dependencies first (post-order)
//! - `dedupe`: fold the records into one entry per component name, keeping
//!   the highest semantic version
//!
//! Third-party trees are frequently half-installed, so expansion never fails:
//! a dependency whose manifest is missing or malformed is skipped together
//! with its subtree.

use std::path::{Path, PathBuf};

use rayon::prelude::*;
use rustc_hash::FxHashMap;
use serde::Serialize;

use super::manifest::{self, Manifest};
use super::version;
use crate::error::Result;
use crate::{debug, log};

/// One dependency edge found during expansion. Not deduplicated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DependencyRecord {
    pub name: String,
    pub range: String,
    pub manifest_path: PathBuf,
}

/// The surviving entry for a component name after deduplication.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResolvedDependency {
    pub name: String,
    pub range: String,
    pub version: Option<String>,
    pub manifest_path: PathBuf,
}

/// Expand root manifests into dependency records.
///
/// Roots are walked in parallel; results are concatenated in root order, so
/// the output is identical across runs on an unchanged tree.
pub fn expand<P: AsRef<Path> + Sync>(roots: &[P]) -> Vec<DependencyRecord> {
    roots
        .par_iter()
        .map(|root| expand_root(root.as_ref()))
        .collect::<Vec<_>>()
        .into_iter()
        .flatten()
        .collect()
}

/// Expand a single root (manifest file or component directory).
fn expand_root(root: &Path) -> Vec<DependencyRecord> {
    let (manifest_path, manifest) = match load(root) {
        Ok(loaded) => loaded,
        Err(e) => {
            debug!("resolve"; "skipping root {}: {}", root.display(), e);
            return Vec::new();
        }
    };

    // The whole subtree resolves against the root's components directory
    let components = manifest::component_directory(&manifest_path);

    let mut walker = Walker {
        components: &components,
        stack: vec![manifest_path],
        records: Vec::new(),
    };
    walker.visit(&manifest);
    walker.records
}

fn load(path: &Path) -> Result<(PathBuf, Manifest)> {
    let manifest_path = manifest::locate(path)?;
    let manifest = manifest::read(&manifest_path)?;
    Ok((manifest_path, manifest))
}

/// Depth-first walk state for one root.
struct Walker<'a> {
    components: &'a Path,
    /// Manifests on the current recursion path (cycle guard)
    stack: Vec<PathBuf>,
    records: Vec<DependencyRecord>,
}

impl Walker<'_> {
    fn visit(&mut self, manifest: &Manifest) {
        for (name, range) in &manifest.dependencies {
            let (dep_path, dep) = match load(&self.components.join(name)) {
                Ok(loaded) => loaded,
                Err(e) => {
                    debug!("resolve"; "skipping {}: {}", name, e);
                    continue;
                }
            };

            if self.stack.contains(&dep_path) {
                debug!("resolve"; "dependency cycle through {}", name);
                continue;
            }

            self.stack.push(dep_path.clone());
            self.visit(&dep);
            self.stack.pop();

            self.records.push(DependencyRecord {
                name: name.clone(),
                range: range.clone(),
                manifest_path: dep_path,
            });
        }
    }
}

/// Deduplicate records by name, keeping the highest version.
///
/// The incoming record replaces the retained one only if its version is
/// strictly greater (or the retained version does not parse). Output keeps
/// first-occurrence order.
pub fn dedupe<I>(records: I) -> Result<Vec<ResolvedDependency>>
where
    I: IntoIterator<Item = DependencyRecord>,
{
    let mut index: FxHashMap<String, usize> = FxHashMap::default();
    let mut resolved: Vec<ResolvedDependency> = Vec::new();

    for record in records {
        let candidate = ResolvedDependency {
            version: manifest::read(&record.manifest_path)?.version,
            name: record.name,
            range: record.range,
            manifest_path: record.manifest_path,
        };

        let Some(&slot) = index.get(&candidate.name) else {
            index.insert(candidate.name.clone(), resolved.len());
            resolved.push(candidate);
            continue;
        };

        let existing = &mut resolved[slot];
        if version::supersedes(candidate.version.as_deref(), existing.version.as_deref()) {
            debug!(
                "resolve";
                "{}: {} supersedes {}",
                candidate.name,
                candidate.version.as_deref().unwrap_or("?"),
                existing.version.as_deref().unwrap_or("?")
            );
            let replaced = std::mem::replace(existing, candidate);
            warn_mismatch(existing, &replaced);
        } else {
            warn_mismatch(existing, &candidate);
        }
    }

    Ok(resolved)
}

/// Log when the surviving version does not satisfy a dropped candidate's range.
fn warn_mismatch(survivor: &ResolvedDependency, dropped: &ResolvedDependency) {
    let Some(version) = survivor.version.as_deref() else {
        return;
    };
    if version::satisfies(version, &dropped.range) == Some(false) {
        log!(
            "warning";
            "{} {} does not satisfy `{}` requested via {}",
            survivor.name,
            version,
            dropped.range,
            dropped.manifest_path.display()
        );
    }
}

/// Expand and dedupe in one step.
pub fn resolve<P: AsRef<Path> + Sync>(roots: &[P]) -> Result<Vec<ResolvedDependency>> {
    dedupe(expand(roots))
}
