//! Output writing and checksum-addressed url publication.
//!
//! `app.min.js` with checksum `3f9a01bc` is published as
//! `<base>/app.min-3f9a01bc.js`; the file on disk keeps its plain name.

use std::fs;
use std::io::Write;
use std::path::Path;
use std::sync::LazyLock;

use regex::Regex;
use serde::Serialize;
use tempfile::NamedTempFile;

use crate::error::{AssetError, Result};
use crate::freshness;

/// A url served by the host and the file behind it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PublishedPath {
    pub url: String,
    pub file: std::path::PathBuf,
}

/// Splice `-<checksum>` before the final extension of `filename`.
///
/// A name without extension gets the checksum appended.
pub fn checksum_filename(filename: &str, checksum: &str) -> String {
    static RE_EXTENSION: LazyLock<Regex> =
        LazyLock::new(|| Regex::new(r"\.[0-9A-Za-z]+$").unwrap());

    match RE_EXTENSION.find(filename) {
        Some(ext) => format!("{}-{checksum}{}", &filename[..ext.start()], ext.as_str()),
        None => format!("{filename}-{checksum}"),
    }
}

/// Join a url base and a path with exactly one slash between them.
pub fn join_url(base: &str, path: &str) -> String {
    let base = base.trim_end_matches('/');
    let path = path.trim_start_matches('/');
    format!("{base}/{path}")
}

/// Published url for `output`, checksummed when `checksums` is set.
pub fn published_url(base: &str, filename: &str, output: &Path, checksums: bool) -> Result<String> {
    if !checksums {
        return Ok(join_url(base, filename));
    }
    let sum = freshness::file_checksum(output).map_err(|e| AssetError::io(output, e))?;
    Ok(join_url(base, &checksum_filename(filename, &sum)))
}

/// Write `content` to `path` through a temporary file in the same folder.
///
/// Readers never observe a partially written output.
pub fn write_atomic(path: &Path, content: &[u8]) -> Result<()> {
    let write_err = |source| AssetError::OutputWrite {
        path: path.to_path_buf(),
        source,
    };

    let dir = path.parent().unwrap_or_else(|| Path::new("."));
    fs::create_dir_all(dir).map_err(write_err)?;

    let mut temp = NamedTempFile::new_in(dir).map_err(write_err)?;
    temp.write_all(content).map_err(write_err)?;
    temp.persist(path).map_err(|e| write_err(e.error))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::freshness::checksum;
    use tempfile::TempDir;

    #[test]
    fn test_checksum_filename() {
        assert_eq!(checksum_filename("app.min.js", "0123abcd"), "app.min-0123abcd.js");
        assert_eq!(checksum_filename("style.CSS", "0123abcd"), "style-0123abcd.CSS");
        assert_eq!(checksum_filename("LICENSE", "0123abcd"), "LICENSE-0123abcd");
    }

    #[test]
    fn test_join_url() {
        assert_eq!(join_url("/app", "a.js"), "/app/a.js");
        assert_eq!(join_url("/app/", "/a.js"), "/app/a.js");
        assert_eq!(join_url("", "a.js"), "/a.js");
    }

    #[test]
    fn test_published_url() {
        let dir = TempDir::new().unwrap();
        let output = dir.path().join("app.min.js");
        fs::write(&output, "var a=1;").unwrap();

        let plain = published_url("/app", "app.min.js", &output, false).unwrap();
        assert_eq!(plain, "/app/app.min.js");

        let sum = checksum(b"var a=1;");
        let url = published_url("/app", "app.min.js", &output, true).unwrap();
        assert_eq!(url, format!("/app/app.min-{sum}.js"));
    }

    #[test]
    fn test_published_url_missing_output() {
        let dir = TempDir::new().unwrap();
        let err = published_url("/app", "a.js", &dir.path().join("a.js"), true).unwrap_err();
        assert!(matches!(err, AssetError::Io { .. }));
    }

    #[test]
    fn test_write_atomic_creates_and_replaces() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("scripts/app.min.js");

        write_atomic(&path, b"one").unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), "one");

        write_atomic(&path, b"two").unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), "two");

        // No temp files left behind
        let entries = fs::read_dir(dir.path().join("scripts")).unwrap().count();
        assert_eq!(entries, 1);
    }
}
