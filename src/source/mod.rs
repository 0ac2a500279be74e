//! Source discovery: glob patterns to file snapshots.
//!
//! Enumeration order is deterministic: patterns are visited in declaration
//! order and each pattern's matches are yielded sorted (the `glob` crate walks
//! directories alphabetically). A file matched by several patterns is kept at
//! its first position.

use std::fs;
use std::path::{Component, Path, PathBuf};
use std::time::SystemTime;

use rustc_hash::FxHashSet;
use serde::{Deserialize, Serialize};

use crate::error::{AssetError, Result};

/// Characters that make a path segment a glob.
const GLOB_CHARS: &[char] = &['*', '?', '['];

/// Snapshot of a discovered file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileEntry {
    /// Absolute path
    pub path: PathBuf,
    /// Path relative to the discovery base
    pub relative: PathBuf,
    pub modified: SystemTime,
}

impl FileEntry {
    /// Stat `path` and record it with the given relative path.
    pub fn stat(path: PathBuf, relative: PathBuf) -> std::io::Result<Self> {
        let modified = fs::metadata(&path)?.modified()?;
        Ok(Self {
            path,
            relative,
            modified,
        })
    }

    /// Relative path with forward slashes, for use in urls.
    pub fn relative_url(&self) -> String {
        self.relative
            .components()
            .filter_map(|c| match c {
                Component::Normal(s) => Some(s.to_string_lossy()),
                _ => None,
            })
            .collect::<Vec<_>>()
            .join("/")
    }

    /// Final path segment.
    pub fn file_name(&self) -> String {
        self.path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default()
    }
}

/// Newest modification time among `files`.
pub fn newest(files: &[FileEntry]) -> Option<SystemTime> {
    files.iter().map(|f| f.modified).max()
}

/// Glob-based source declaration.
///
/// Patterns starting with `!` exclude files matched by the others.
///
/// ```toml
/// scripts = { src = ["src/**/*.js", "!src/**/*.spec.js"], cwd = "web" }
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceSpec {
    #[serde(rename = "src", deserialize_with = "one_or_many")]
    pub patterns: Vec<String>,
    /// Directory relative patterns resolve against (default: process cwd).
    #[serde(default)]
    pub cwd: Option<PathBuf>,
    /// Directory relative paths are computed from (default: each
    /// pattern's non-glob prefix).
    #[serde(default)]
    pub base: Option<PathBuf>,
}

impl SourceSpec {
    pub fn new(pattern: impl Into<String>) -> Self {
        Self {
            patterns: vec![pattern.into()],
            ..Self::default()
        }
    }

    pub fn pattern(mut self, pattern: impl Into<String>) -> Self {
        self.patterns.push(pattern.into());
        self
    }

    pub fn cwd(mut self, cwd: impl Into<PathBuf>) -> Self {
        self.cwd = Some(cwd.into());
        self
    }

    pub fn base(mut self, base: impl Into<PathBuf>) -> Self {
        self.base = Some(base.into());
        self
    }

    /// Resolve `cwd` and `base` against `root` when relative.
    pub fn rooted(mut self, root: &Path) -> Self {
        let cwd = match self.cwd.take() {
            Some(cwd) if cwd.is_absolute() => cwd,
            Some(cwd) => root.join(cwd),
            None => root.to_path_buf(),
        };
        if let Some(base) = self.base.take() {
            self.base = Some(if base.is_absolute() { base } else { root.join(base) });
        }
        self.cwd = Some(cwd);
        self
    }

    /// Enumerate matching files.
    pub fn discover(&self) -> Result<Vec<FileEntry>> {
        let cwd = match &self.cwd {
            Some(cwd) => cwd.clone(),
            None => std::env::current_dir().map_err(|e| AssetError::io(".", e))?,
        };

        let (excludes, includes): (Vec<&String>, Vec<&String>) =
            self.patterns.iter().partition(|p| p.starts_with('!'));

        let excludes = excludes
            .into_iter()
            .map(|p| compile(&absolute(&cwd, &p[1..])))
            .collect::<Result<Vec<_>>>()?;

        let mut seen = FxHashSet::default();
        let mut files = Vec::new();

        for pattern in includes {
            let base = self
                .base
                .clone()
                .unwrap_or_else(|| pattern_base(&cwd, pattern));
            let pattern = absolute(&cwd, pattern);

            let paths = glob::glob(&pattern).map_err(|source| AssetError::Pattern {
                pattern: pattern.clone(),
                source,
            })?;

            for entry in paths {
                let path = entry.map_err(|e| AssetError::io(e.path().to_path_buf(), e.into()))?;
                if !path.is_file()
                    || excludes.iter().any(|ex| ex.matches_path(&path))
                    || !seen.insert(path.clone())
                {
                    continue;
                }

                let relative = relative_to(&path, &base);
                let file =
                    FileEntry::stat(path.clone(), relative).map_err(|e| AssetError::io(path, e))?;
                files.push(file);
            }
        }

        Ok(files)
    }
}

pub(crate) fn one_or_many<'de, D>(deserializer: D) -> std::result::Result<Vec<String>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum OneOrMany {
        One(String),
        Many(Vec<String>),
    }

    Ok(match OneOrMany::deserialize(deserializer)? {
        OneOrMany::One(s) => vec![s],
        OneOrMany::Many(v) => v,
    })
}

fn compile(pattern: &str) -> Result<glob::Pattern> {
    glob::Pattern::new(pattern).map_err(|source| AssetError::Pattern {
        pattern: pattern.to_string(),
        source,
    })
}

/// Join a relative pattern onto `cwd`, escaping glob characters in `cwd`.
fn absolute(cwd: &Path, pattern: &str) -> String {
    if Path::new(pattern).is_absolute() {
        pattern.to_string()
    } else {
        let dir = glob::Pattern::escape(&cwd.to_string_lossy());
        Path::new(&dir).join(pattern).to_string_lossy().into_owned()
    }
}

/// Returns `true` if the string contains glob metacharacters.
pub fn is_glob(pattern: &str) -> bool {
    pattern.contains(GLOB_CHARS)
}

/// Leading directory of a pattern before its first glob segment.
///
/// `/web/src/**/*.js` -> `/web/src`
pub fn glob_parent(pattern: &str) -> PathBuf {
    let mut parent = PathBuf::new();
    for component in Path::new(pattern).components() {
        if is_glob(&component.as_os_str().to_string_lossy()) {
            return parent;
        }
        parent.push(component);
    }
    // No glob at all: the pattern names a file
    parent.parent().map(Path::to_path_buf).unwrap_or_default()
}

/// Default base of a pattern: its non-glob prefix, resolved against `cwd`.
///
/// Computed before escaping so literal brackets in `cwd` are kept.
fn pattern_base(cwd: &Path, pattern: &str) -> PathBuf {
    let parent = glob_parent(pattern);
    if Path::new(pattern).is_absolute() {
        parent
    } else if parent.as_os_str().is_empty() {
        cwd.to_path_buf()
    } else {
        cwd.join(parent)
    }
}

fn relative_to(path: &Path, base: &Path) -> PathBuf {
    path.strip_prefix(base)
        .map(Path::to_path_buf)
        .unwrap_or_else(|_| path.file_name().map(PathBuf::from).unwrap_or_default())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_fixtures::write_file;
    use tempfile::TempDir;

    fn relatives(files: &[FileEntry]) -> Vec<String> {
        files.iter().map(FileEntry::relative_url).collect()
    }

    #[test]
    fn test_glob_parent() {
        assert_eq!(glob_parent("/web/src/**/*.js"), PathBuf::from("/web/src"));
        assert_eq!(glob_parent("/web/*.css"), PathBuf::from("/web"));
        assert_eq!(glob_parent("/web/app.js"), PathBuf::from("/web"));
    }

    #[test]
    fn test_discover_sorted_and_relative() {
        let dir = TempDir::new().unwrap();
        write_file(&dir.path().join("src/b.js"), "b");
        write_file(&dir.path().join("src/a.js"), "a");
        write_file(&dir.path().join("src/nested/c.js"), "c");
        write_file(&dir.path().join("src/style.css"), "");

        let files = SourceSpec::new("src/**/*.js")
            .cwd(dir.path())
            .discover()
            .unwrap();

        assert_eq!(relatives(&files), vec!["a.js", "b.js", "nested/c.js"]);
        assert!(files.iter().all(|f| f.path.is_absolute()));
    }

    #[test]
    fn test_discover_stable_across_runs() {
        let dir = TempDir::new().unwrap();
        for name in ["z.js", "m.js", "a.js"] {
            write_file(&dir.path().join(name), name);
        }
        let spec = SourceSpec::new("*.js").cwd(dir.path());

        assert_eq!(spec.discover().unwrap(), spec.discover().unwrap());
    }

    #[test]
    fn test_discover_excludes_and_dedupes() {
        let dir = TempDir::new().unwrap();
        write_file(&dir.path().join("app.js"), "");
        write_file(&dir.path().join("app.spec.js"), "");
        write_file(&dir.path().join("vendor.js"), "");

        let files = SourceSpec::new("vendor.js")
            .pattern("*.js")
            .pattern("!*.spec.js")
            .cwd(dir.path())
            .discover()
            .unwrap();

        // vendor.js keeps its first position
        assert_eq!(relatives(&files), vec!["vendor.js", "app.js"]);
    }

    #[test]
    fn test_discover_explicit_base() {
        let dir = TempDir::new().unwrap();
        write_file(&dir.path().join("public/views/home.html"), "");

        let files = SourceSpec::new("public/views/*.html")
            .cwd(dir.path())
            .base(dir.path().join("public"))
            .discover()
            .unwrap();

        assert_eq!(relatives(&files), vec!["views/home.html"]);
    }

    #[test]
    fn test_discover_cwd_with_glob_characters() {
        let dir = TempDir::new().unwrap();
        let site = dir.path().join("site[1]");
        write_file(&site.join("a.js"), "");
        write_file(&site.join("lib/b.js"), "");
        write_file(&site.join("a.spec.js"), "");

        let files = SourceSpec::new("**/*.js")
            .pattern("!*.spec.js")
            .cwd(&site)
            .discover()
            .unwrap();
        assert_eq!(relatives(&files), vec!["a.js", "lib/b.js"]);
        assert!(files[0].path.starts_with(&site));
    }

    #[test]
    fn test_discover_no_matches() {
        let dir = TempDir::new().unwrap();
        let files = SourceSpec::new("**/*.js").cwd(dir.path()).discover().unwrap();
        assert!(files.is_empty());
    }

    #[test]
    fn test_discover_invalid_pattern() {
        let dir = TempDir::new().unwrap();
        let err = SourceSpec::new("src/[.js").cwd(dir.path()).discover().unwrap_err();
        assert!(matches!(err, AssetError::Pattern { .. }));
    }

    #[test]
    fn test_newest() {
        let dir = TempDir::new().unwrap();
        write_file(&dir.path().join("old.js"), "");
        crate::test_fixtures::tick();
        write_file(&dir.path().join("new.js"), "");

        let files = SourceSpec::new("*.js").cwd(dir.path()).discover().unwrap();
        let latest = newest(&files).unwrap();
        assert_eq!(latest, files.iter().find(|f| f.file_name() == "new.js").unwrap().modified);
        assert_eq!(newest(&[]), None);
    }

    #[test]
    fn test_spec_deserialize_one_or_many() {
        let spec: SourceSpec = serde_json::from_str(r#"{ "src": "a/*.js" }"#).unwrap();
        assert_eq!(spec.patterns, vec!["a/*.js"]);

        let spec: SourceSpec =
            serde_json::from_str(r#"{ "src": ["a/*.js", "b/*.js"], "cwd": "web" }"#).unwrap();
        assert_eq!(spec.patterns.len(), 2);
        assert_eq!(spec.cwd, Some(PathBuf::from("web")));
    }

    #[test]
    fn test_rooted() {
        let spec = SourceSpec::new("*.js").cwd("web").base("web/src").rooted(Path::new("/site"));
        assert_eq!(spec.cwd, Some(PathBuf::from("/site/web")));
        assert_eq!(spec.base, Some(PathBuf::from("/site/web/src")));

        let spec = SourceSpec::new("*.js").rooted(Path::new("/site"));
        assert_eq!(spec.cwd, Some(PathBuf::from("/site")));
    }
}
