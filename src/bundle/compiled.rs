//! Compiled output: published entries grouped by extension, and routes.

use std::collections::BTreeMap;
use std::path::PathBuf;

use rayon::prelude::*;
use rustc_hash::FxHashSet;
use serde::Serialize;

use crate::error::{AssetError, Result};
use crate::resource::{BuildOptions, Resource};

/// Http method of a route descriptor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Method {
    #[serde(rename = "GET")]
    Get,
}

/// A route the host server should register.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Route {
    pub method: Method,
    pub path: String,
    pub file: PathBuf,
}

/// One published resource (or raw reference) as seen by the host page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CompiledEntry {
    pub description: String,
    pub extension: String,
    pub priority: i32,
    /// Urls in load order
    pub paths: Vec<String>,
    /// Routes to register; empty unless the entry is auto-routed
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub routes: Vec<Route>,
}

impl CompiledEntry {
    pub fn from_resource(resource: &Resource) -> Self {
        let paths = resource.paths().iter().map(|p| p.url.clone()).collect();
        let routes = if resource.autoroute {
            resource
                .paths()
                .iter()
                .map(|p| Route {
                    method: Method::Get,
                    path: p.url.clone(),
                    file: p.file.clone(),
                })
                .collect()
        } else {
            Vec::new()
        };

        Self {
            description: resource.filename().to_string(),
            extension: resource.extension().to_string(),
            priority: resource.priority,
            paths,
            routes,
        }
    }

    /// Entry for a url the host serves itself (CDN script, static stylesheet).
    pub fn raw(url: impl Into<String>, extension: impl Into<String>, priority: i32) -> Self {
        let url = url.into();
        Self {
            description: url.clone(),
            extension: extension.into(),
            priority,
            paths: vec![url],
            routes: Vec::new(),
        }
    }
}

/// Grouped compile result.
///
/// ```json
/// { "groups": { "css": [...], "js": [...] }, "modules": ["ui.router"] }
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CompiledAssets {
    /// Extension to entries, highest priority first
    pub groups: BTreeMap<String, Vec<CompiledEntry>>,
    /// Integration module names, first appearance order
    pub modules: Vec<String>,
}

impl CompiledAssets {
    /// Sort `entries` by priority (descending, stable) and group them.
    pub fn new(mut entries: Vec<CompiledEntry>, modules: Vec<String>) -> Self {
        sort_by_priority(&mut entries);
        let mut groups: BTreeMap<String, Vec<CompiledEntry>> = BTreeMap::new();
        for entry in entries {
            groups.entry(entry.extension.clone()).or_default().push(entry);
        }
        Self { groups, modules }
    }

    /// Entries published under `extension`.
    pub fn group(&self, extension: &str) -> &[CompiledEntry] {
        self.groups.get(extension).map(Vec::as_slice).unwrap_or_default()
    }

    /// Every url under `extension`, in load order.
    pub fn urls(&self, extension: &str) -> Vec<&str> {
        self.group(extension)
            .iter()
            .flat_map(|e| e.paths.iter().map(String::as_str))
            .collect()
    }

    /// Routes of every auto-routed entry.
    pub fn routes(&self) -> impl Iterator<Item = &Route> {
        self.groups.values().flatten().flat_map(|e| e.routes.iter())
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }
}

/// Stable sort, highest priority first.
pub fn sort_by_priority(entries: &mut [CompiledEntry]) {
    entries.sort_by(|a, b| b.priority.cmp(&a.priority));
}

/// Select every resource, then build it (or publish its sources).
///
/// Selection always runs in parallel; builds follow `options.parallel`.
/// The first failure aborts the whole pass. With `prune`, resources that
/// selected nothing are dropped before building. Two resources sharing an
/// output file fail the pass before anything is written.
pub(crate) fn compile_resources(
    mut resources: Vec<&mut Resource>,
    options: &BuildOptions,
    prune: bool,
) -> Result<Vec<CompiledEntry>> {
    resources
        .par_iter_mut()
        .try_for_each(|r| r.select().map(drop))?;

    if prune {
        resources.retain(|r| !r.is_empty());
    }

    if options.minify {
        let mut outputs = FxHashSet::default();
        if let Some(dup) = resources.iter().find(|r| !outputs.insert(r.filename())) {
            return Err(AssetError::DuplicateOutput(dup.filename().to_string()));
        }
    }

    if !options.minify {
        for r in resources.iter_mut() {
            r.publish_sources()?;
        }
    } else if options.parallel {
        resources
            .par_iter_mut()
            .try_for_each(|r| r.build(options).map(drop))?;
    } else {
        for r in resources.iter_mut() {
            r.build(options)?;
        }
    }

    let mut entries: Vec<CompiledEntry> = resources
        .iter()
        .map(|r| CompiledEntry::from_resource(r))
        .collect();
    sort_by_priority(&mut entries);
    Ok(entries)
}
