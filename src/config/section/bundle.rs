//! `[[bundle]]` sections.
//!
//! # Example
//!
//! ```toml
//! [[bundle]]
//! id = "app"
//! base = "/app"                  # default: "/<id>"
//! add_routes = true
//! components = "bower.json"      # one or many manifests / directories
//! scripts = "src/**/*.js"        # or { src = [...], cwd = "...", base = "..." }
//! styles = { src = ["src/**/*.css", "!src/**/print.css"] }
//! templates = { src = "src/**/*.html", module = "app" }
//! scan = "public"                # add every .js/.html/.css under a directory
//! ```

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::bundle::{BundleConfig, TemplateSources};
use crate::config::ConfigDiagnostics;
use crate::config::util::resolve_config_path;
use crate::source::{SourceSpec, one_or_many};

/// A source declaration: a bare pattern or a full spec.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SourceDecl {
    Pattern(String),
    Spec(SourceSpec),
}

impl SourceDecl {
    /// Source spec with `cwd`/`base` resolved against `root`.
    pub fn to_spec(&self, root: &Path) -> SourceSpec {
        let spec = match self {
            Self::Pattern(pattern) => SourceSpec::new(pattern.as_str()),
            Self::Spec(spec) => spec.clone(),
        };
        spec.rooted(root)
    }

    fn patterns(&self) -> Vec<&str> {
        match self {
            Self::Pattern(pattern) => vec![pattern.as_str()],
            Self::Spec(spec) => spec.patterns.iter().map(String::as_str).collect(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TemplatesDecl {
    #[serde(deserialize_with = "one_or_many")]
    pub src: Vec<String>,
    #[serde(default)]
    pub cwd: Option<PathBuf>,
    #[serde(default)]
    pub base: Option<PathBuf>,
    pub module: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BundleSection {
    pub id: String,
    #[serde(default)]
    pub base: Option<String>,
    #[serde(default = "default_add_routes")]
    pub add_routes: bool,
    #[serde(default, deserialize_with = "paths_one_or_many")]
    pub components: Vec<PathBuf>,
    #[serde(default)]
    pub scripts: Option<SourceDecl>,
    #[serde(default)]
    pub styles: Option<SourceDecl>,
    #[serde(default)]
    pub templates: Option<TemplatesDecl>,
    #[serde(default)]
    pub scan: Option<PathBuf>,
}

fn default_add_routes() -> bool {
    true
}

fn paths_one_or_many<'de, D>(deserializer: D) -> Result<Vec<PathBuf>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    Ok(one_or_many(deserializer)?
        .into_iter()
        .map(PathBuf::from)
        .collect())
}

impl BundleSection {
    /// Url base: explicit, or `/<id>`.
    pub fn url_base(&self) -> String {
        self.base.clone().unwrap_or_else(|| format!("/{}", self.id))
    }

    /// Resolve file-system paths against the config root.
    pub fn normalize(&mut self, root: &Path) {
        for manifest in &mut self.components {
            *manifest = resolve_config_path(manifest, root);
        }
        if let Some(scan) = self.scan.take() {
            self.scan = Some(resolve_config_path(&scan, root));
        }
    }

    /// Resource declarations for [`crate::bundle::Bundle::resources`].
    pub fn to_bundle_config(&self, root: &Path) -> BundleConfig {
        BundleConfig {
            add_routes: self.add_routes,
            components: self.components.clone(),
            scripts: self.scripts.as_ref().map(|s| s.to_spec(root)),
            styles: self.styles.as_ref().map(|s| s.to_spec(root)),
            templates: self.templates.as_ref().map(|t| TemplateSources {
                spec: SourceSpec {
                    patterns: t.src.clone(),
                    cwd: t.cwd.clone(),
                    base: t.base.clone(),
                }
                .rooted(root),
                module: t.module.clone(),
            }),
        }
    }

    pub fn validate(&self, index: usize, diag: &mut ConfigDiagnostics) {
        let field = |name: &str| format!("bundle[{index}].{name}");

        if self.id.trim().is_empty() {
            diag.error(field("id"), "must not be empty");
        } else if self.id.contains(['/', '\\']) {
            diag.error(field("id"), format!("`{}` is used in file names", self.id));
        }

        if let Some(base) = &self.base
            && !base.starts_with('/')
        {
            diag.error_with_hint(
                field("base"),
                format!("`{base}` is not an absolute url path"),
                format!("use \"/{}\"", base.trim_start_matches('/')),
            );
        }

        let declared = !self.components.is_empty()
            || self.scripts.is_some()
            || self.styles.is_some()
            || self.templates.is_some()
            || self.scan.is_some();
        if !declared {
            diag.error_with_hint(
                format!("bundle[{index}]"),
                "declares no resources",
                "add `components`, `scripts`, `styles`, `templates` or `scan`",
            );
        }

        for (name, decl) in [("scripts", &self.scripts), ("styles", &self.styles)] {
            if let Some(decl) = decl
                && decl.patterns().iter().all(|p| p.starts_with('!'))
            {
                diag.error(field(name), "needs at least one include pattern");
            }
        }

        if let Some(templates) = &self.templates {
            if templates.module.trim().is_empty() {
                diag.error(field("templates.module"), "must not be empty");
            }
            if templates.src.iter().all(|p| p.starts_with('!')) {
                diag.error(field("templates.src"), "needs at least one include pattern");
            }
        }
    }
}
