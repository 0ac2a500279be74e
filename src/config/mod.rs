//! Pipeline configuration in `assets.toml`.
//!
//! # Module Structure
//!
//! ```text
//! config/
//! ├── section/   # [build], [[bundle]], [page]
//! ├── error      # ConfigError, ConfigDiagnostics
//! ├── util       # config lookup, path normalization
//! └── mod.rs     # AssetConfig (this file)
//! ```
//!
//! # Sections
//!
//! | Section      | Purpose                                          |
//! |--------------|--------------------------------------------------|
//! | `[build]`    | Minify/checksum switches, output layout          |
//! | `[[bundle]]` | Components, scripts, styles, templates per id    |
//! | `[page]`     | Raw script/style urls and integration modules    |
//!
//! All file-system paths are relative to the config file's directory.

mod error;
pub mod section;
mod util;

pub use error::{ConfigDiagnostic, ConfigDiagnostics, ConfigError};
pub use section::{BuildSection, BundleSection, PageRef, PageSection, SourceDecl, TemplatesDecl};
pub use util::{find_config_file, normalize_path};

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::bundle::{Bundle, Hostpage};
use crate::log;
use crate::resource::BuildOptions;

/// Default config file name.
pub const CONFIG_FILE: &str = "assets.toml";

type Result<T> = std::result::Result<T, ConfigError>;

/// Command-line overrides applied after loading.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BuildOverrides {
    pub minify: Option<bool>,
    pub checksums: Option<bool>,
    pub output: Option<PathBuf>,
}

// ============================================================================
// root configuration
// ============================================================================

/// Root configuration structure representing `assets.toml`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AssetConfig {
    /// Absolute path to the config file (internal use only)
    #[serde(skip)]
    pub config_path: PathBuf,

    /// Directory holding the config file (internal use only)
    #[serde(skip)]
    pub root: PathBuf,

    #[serde(default)]
    pub build: BuildSection,

    #[serde(default, rename = "bundle")]
    pub bundles: Vec<BundleSection>,

    #[serde(default)]
    pub page: PageSection,
}

impl AssetConfig {
    /// Find `config_name` upward from the current directory and load it.
    pub fn load(config_name: &Path) -> Result<Self> {
        let cwd = std::env::current_dir().map_err(|e| ConfigError::Io(PathBuf::from("."), e))?;
        let path = find_config_file(config_name, &cwd)
            .ok_or_else(|| ConfigError::NotFound(config_name.to_path_buf()))?;
        Self::from_path(&path)
    }

    /// Load, normalize and validate the config at `path`.
    ///
    /// Unknown fields are reported as a warning and otherwise ignored.
    pub fn from_path(path: &Path) -> Result<Self> {
        let content =
            fs::read_to_string(path).map_err(|err| ConfigError::Io(path.to_path_buf(), err))?;

        let (mut config, ignored) = Self::parse_with_ignored(&content)?;
        if !ignored.is_empty() {
            Self::print_unknown_fields_warning(&ignored, path);
        }

        config.config_path = normalize_path(path);
        let root = config
            .config_path
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_default();
        config.normalize_paths(&root);
        config.validate()?;
        Ok(config)
    }

    /// Parse configuration from a TOML string (no normalization).
    pub fn from_str(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }

    /// Parse TOML content, collecting any unknown fields.
    fn parse_with_ignored(content: &str) -> Result<(Self, Vec<String>)> {
        let mut ignored = Vec::new();
        let deserializer = toml::Deserializer::new(content);
        let config = serde_ignored::deserialize(deserializer, |path: serde_ignored::Path| {
            ignored.push(path.to_string());
        })?;
        Ok((config, ignored))
    }

    fn print_unknown_fields_warning(fields: &[String], path: &Path) {
        let display_path = path
            .file_name()
            .map(|n| n.to_string_lossy())
            .unwrap_or_else(|| path.to_string_lossy());
        log!("warning"; "unknown fields in {}, ignoring:", display_path);
        for field in fields {
            eprintln!("- {field}");
        }
    }

    /// Resolve every file-system path against `root`.
    pub fn normalize_paths(&mut self, root: &Path) {
        let root = normalize_path(root);
        self.build.output = util::resolve_config_path(&self.build.output, &root);
        for bundle in &mut self.bundles {
            bundle.normalize(&root);
        }
        self.root = root;
    }

    /// Apply command-line overrides.
    pub fn apply_overrides(&mut self, overrides: &BuildOverrides) {
        Self::update_option(&mut self.build.minify, overrides.minify.as_ref());
        Self::update_option(&mut self.build.checksums, overrides.checksums.as_ref());
        if let Some(output) = &overrides.output {
            let root = std::env::current_dir().unwrap_or_else(|_| self.root.clone());
            self.build.output = util::resolve_config_path(output, &root);
        }
    }

    /// Update config option if CLI value is provided.
    fn update_option<T: Clone>(config_option: &mut T, cli_option: Option<&T>) {
        if let Some(option) = cli_option {
            *config_option = option.clone();
        }
    }

    // ========================================================================
    // validation
    // ========================================================================

    /// Validate all sections, collecting every error.
    pub fn validate(&self) -> Result<()> {
        let mut diag = ConfigDiagnostics::new();

        self.build.validate(&mut diag);
        self.page.validate(&mut diag);

        for (index, bundle) in self.bundles.iter().enumerate() {
            bundle.validate(index, &mut diag);
            let duplicate = self.bundles[..index].iter().any(|b| b.id == bundle.id);
            if duplicate && !bundle.id.is_empty() {
                diag.error_with_hint(
                    format!("bundle[{index}].id"),
                    format!("duplicate bundle id `{}`", bundle.id),
                    "bundle ids name output files and must be unique",
                );
            }
        }

        diag.into_result()
    }

    // ========================================================================
    // pipeline construction
    // ========================================================================

    pub fn build_options(&self) -> BuildOptions {
        self.build.to_options()
    }

    /// One [`Bundle`] per `[[bundle]]` section.
    pub fn bundles(&self) -> Vec<Bundle> {
        let options = self.build_options();
        self.bundles
            .iter()
            .map(|section| {
                let mut bundle = Bundle::new(section.url_base(), &section.id, options.clone())
                    .with_module(&self.build.module);
                bundle.resources(section.to_bundle_config(&self.root));
                if let Some(dir) = &section.scan {
                    bundle.scan(dir, None);
                }
                bundle
            })
            .collect()
    }

    /// Host page with every bundle and `[page]` reference.
    pub fn hostpage(&self) -> Hostpage {
        let mut page = Hostpage::new();
        for script in &self.page.scripts {
            page.script(&script.url, script.priority);
        }
        for style in &self.page.styles {
            page.style(&style.url, style.priority);
        }
        for bundle in self.bundles() {
            page.bundle(bundle);
        }
        if !self.page.modules.is_empty() {
            page.modules(self.page.modules.iter().cloned());
        }
        page
    }
}

// ============================================================================
// tests
// ============================================================================
