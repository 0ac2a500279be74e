//! Component manifest reading.
//!
//! A component is a directory with a `bower.json` (or `package.json`)
//! describing its name, version, dependencies and main files. Installed
//! dependencies live in a sibling components directory, `bower_components`
//! unless a `.bowerrc` says otherwise.

use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use serde_json::{Map, Value};

use crate::error::{AssetError, Result};

/// Manifest file names, in lookup order.
pub const MANIFEST_FILES: &[&str] = &["bower.json", "package.json"];

/// Override file for the installed-components directory.
pub const RC_FILE: &str = ".bowerrc";

/// Installed-components directory used when no override exists.
pub const DEFAULT_COMPONENTS_DIR: &str = "bower_components";

/// A parsed component manifest.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Manifest {
    pub name: Option<String>,
    pub version: Option<String>,
    /// Declared dependencies in file order: `(name, version range)`.
    pub dependencies: Vec<(String, String)>,
    /// Main entries relative to the manifest's directory.
    pub main: Vec<String>,
}

#[derive(Deserialize)]
struct RawManifest {
    name: Option<String>,
    version: Option<String>,
    #[serde(default)]
    dependencies: Map<String, Value>,
    #[serde(default)]
    main: Option<MainEntry>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum MainEntry {
    One(String),
    Many(Vec<String>),
}

#[derive(Deserialize)]
struct RcFile {
    directory: Option<String>,
}

impl Manifest {
    /// Parse a manifest from JSON text.
    pub fn from_json(content: &str) -> serde_json::Result<Self> {
        let raw: RawManifest = serde_json::from_str(content)?;

        let dependencies = raw
            .dependencies
            .into_iter()
            .map(|(name, range)| {
                let range = match range {
                    Value::String(s) => s,
                    other => other.to_string(),
                };
                (name, range)
            })
            .collect();

        let main = match raw.main {
            Some(MainEntry::One(entry)) => vec![entry],
            Some(MainEntry::Many(entries)) => entries,
            None => Vec::new(),
        };

        Ok(Self {
            name: raw.name,
            version: raw.version,
            dependencies,
            main,
        })
    }
}

/// Resolve a manifest path from a file or a component directory.
///
/// A file is returned as-is. A directory is searched for `bower.json`, then
/// `package.json`.
pub fn locate(path: &Path) -> Result<PathBuf> {
    if path.is_file() {
        return Ok(path.to_path_buf());
    }
    if path.is_dir() {
        for name in MANIFEST_FILES {
            let candidate = path.join(name);
            if candidate.is_file() {
                return Ok(candidate);
            }
        }
    }
    Err(AssetError::ManifestNotFound(path.to_path_buf()))
}

/// Read and parse a manifest. Nothing is cached.
pub fn read(manifest_path: &Path) -> Result<Manifest> {
    let content =
        fs::read_to_string(manifest_path).map_err(|err| AssetError::io(manifest_path, err))?;
    Manifest::from_json(&content).map_err(|source| AssetError::ManifestParse {
        path: manifest_path.to_path_buf(),
        source,
    })
}

/// Directory holding a manifest (or the path itself if it is a directory).
pub fn manifest_dir(path: &Path) -> PathBuf {
    if path.is_dir() {
        path.to_path_buf()
    } else {
        path.parent().map(Path::to_path_buf).unwrap_or_default()
    }
}

/// Installed-components directory for a manifest or its folder.
///
/// Honors `directory` in a sibling `.bowerrc`; relative values resolve
/// against the manifest's folder. Falls back to `bower_components`.
pub fn component_directory(path: &Path) -> PathBuf {
    let folder = manifest_dir(path);

    let configured = fs::read_to_string(folder.join(RC_FILE))
        .ok()
        .and_then(|content| serde_json::from_str::<RcFile>(&content).ok())
        .and_then(|rc| rc.directory)
        .filter(|dir| !dir.trim().is_empty());

    folder.join(configured.as_deref().unwrap_or(DEFAULT_COMPONENTS_DIR))
}
