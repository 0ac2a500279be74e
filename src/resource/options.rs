//! Options shared by every resource build.

use std::path::{Path, PathBuf};

/// Build switches and output layout.
///
/// Artifacts land in `output_dir/<subfolder>/<filename>`, where the
/// subfolder is `scripts` for `js`, `styles` for `css`, and the extension
/// itself for anything else.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildOptions {
    /// Build minified bundles; when off, sources are published as is
    pub minify: bool,
    /// Splice a content checksum into published urls
    pub checksums: bool,
    pub output_dir: PathBuf,
    pub scripts: String,
    pub styles: String,
    /// Build resources concurrently
    pub parallel: bool,
    /// Shorten local names in scripts
    pub mangle: bool,
}

impl Default for BuildOptions {
    fn default() -> Self {
        Self {
            minify: true,
            checksums: true,
            output_dir: PathBuf::from("dist"),
            scripts: "scripts".into(),
            styles: "styles".into(),
            parallel: true,
            mangle: false,
        }
    }
}

impl BuildOptions {
    /// Output subfolder for an extension.
    pub fn subfolder<'a>(&'a self, extension: &'a str) -> &'a str {
        match extension {
            "js" => &self.scripts,
            "css" => &self.styles,
            other => other,
        }
    }

    /// Output path of a resource file.
    pub fn output_path(&self, extension: &str, filename: &str) -> PathBuf {
        self.output_dir.join(self.subfolder(extension)).join(filename)
    }

    /// Builder-style override of the output directory.
    pub fn with_output_dir(mut self, dir: impl AsRef<Path>) -> Self {
        self.output_dir = dir.as_ref().to_path_buf();
        self
    }
}
