//! `[build]` section configuration.
//!
//! # Example
//!
//! ```toml
//! [build]
//! minify = true       # Build minified bundles (false: serve sources)
//! checksums = true    # Checksum published urls
//! output = "dist"     # Output directory (relative to config file)
//! scripts = "scripts" # Output subfolder for .js
//! styles = "styles"   # Output subfolder for .css
//! parallel = true     # Build resources concurrently
//! mangle = false      # Shorten local names in scripts
//! module = "app"      # Template module for scanned directories
//! ```

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::bundle::DEFAULT_TEMPLATE_MODULE;
use crate::config::ConfigDiagnostics;
use crate::resource::BuildOptions;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BuildSection {
    pub minify: bool,
    pub checksums: bool,
    pub output: PathBuf,
    pub scripts: String,
    pub styles: String,
    pub parallel: bool,
    pub mangle: bool,
    pub module: String,
}

impl Default for BuildSection {
    fn default() -> Self {
        let options = BuildOptions::default();
        Self {
            minify: options.minify,
            checksums: options.checksums,
            output: options.output_dir,
            scripts: options.scripts,
            styles: options.styles,
            parallel: options.parallel,
            mangle: options.mangle,
            module: DEFAULT_TEMPLATE_MODULE.to_string(),
        }
    }
}

impl BuildSection {
    pub fn to_options(&self) -> BuildOptions {
        BuildOptions {
            minify: self.minify,
            checksums: self.checksums,
            output_dir: self.output.clone(),
            scripts: self.scripts.clone(),
            styles: self.styles.clone(),
            parallel: self.parallel,
            mangle: self.mangle,
        }
    }

    pub fn validate(&self, diag: &mut ConfigDiagnostics) {
        for (field, value) in [("build.scripts", &self.scripts), ("build.styles", &self.styles)] {
            if value.is_empty() || value.contains(['/', '\\']) {
                diag.error_with_hint(
                    field,
                    format!("`{value}` is not a folder name"),
                    "use a single path segment such as \"scripts\"",
                );
            }
        }
        if self.scripts == self.styles {
            diag.error("build.styles", "scripts and styles must use different folders");
        }
        if self.module.is_empty() {
            diag.error("build.module", "must not be empty");
        }
    }
}
