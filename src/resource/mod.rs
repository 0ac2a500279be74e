//! Resources: one published output built from a group of source files.
//!
//! # Lifecycle
//!
//! ```text
//! Constructed ──src/add_manifest──▶ Sourced ──select──▶ Selected ──build──▶ Built
//!                                                          │                  │
//!                                                   publish_sources      build again
//!                                                   (dev mode urls)    (staleness check)
//! ```
//!
//! `select` snapshots the input files and their newest mtime. `build`
//! reuses an existing output that is strictly newer than every input,
//! otherwise concatenates and transforms the inputs into
//! `output_dir/<subfolder>/<filename>`, then publishes a single url.

mod options;
pub mod publish;

pub use options::BuildOptions;
pub use publish::PublishedPath;

use std::fs;
use std::path::PathBuf;
use std::time::SystemTime;

use crate::asset::{Template, minify_css, minify_js, render_templates, template_url};
use crate::component;
use crate::error::{AssetError, Result};
use crate::freshness::is_output_fresh;
use crate::logger::plural_count;
use crate::source::{FileEntry, SourceSpec, newest};
use crate::{debug, log};

/// Priority of third-party component resources.
pub const COMPONENT_PRIORITY: i32 = 100;

/// Caller-supplied transform: selected files to output text.
pub type CustomTransform = fn(&[FileEntry], &BuildOptions) -> Result<String>;

/// How selected files become the output.
#[derive(Debug, Clone)]
pub enum Transform {
    /// Concatenate and minify as JavaScript
    Script,
    /// Concatenate and minify as CSS
    Style,
    /// Register HTML files in a template cache module, then minify as script
    Template { module: String },
    Custom(CustomTransform),
}

/// Where a resource's files come from.
#[derive(Debug, Clone, Default)]
pub enum Source {
    #[default]
    None,
    Globs(SourceSpec),
    /// Component manifests, filtered by the resource extension
    Components(Vec<PathBuf>),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ResourceState {
    Constructed,
    Sourced,
    Selected,
    Built,
}

/// A logical asset group with a single published output.
#[derive(Debug, Clone)]
pub struct Resource {
    base: String,
    filename: String,
    extension: String,
    transform: Transform,
    source: Source,
    /// Ordering weight in compiled output (higher first)
    pub priority: i32,
    /// Whether the host should register routes for this resource
    pub autoroute: bool,
    files: Vec<FileEntry>,
    paths: Vec<PublishedPath>,
    last_modified: Option<SystemTime>,
    state: ResourceState,
}

impl Resource {
    /// Resource with an explicit transform. The extension is taken from
    /// `filename`.
    pub fn new(base: impl Into<String>, filename: impl Into<String>, transform: Transform) -> Self {
        let filename = filename.into();
        let extension = match transform {
            Transform::Template { .. } => "html".to_string(),
            _ => extension_of(&filename),
        };
        Self {
            base: base.into(),
            filename,
            extension,
            transform,
            source: Source::None,
            priority: 0,
            autoroute: false,
            files: Vec::new(),
            paths: Vec::new(),
            last_modified: None,
            state: ResourceState::Constructed,
        }
    }

    pub fn script(base: impl Into<String>, filename: impl Into<String>) -> Self {
        Self::new(base, filename, Transform::Script)
    }

    pub fn style(base: impl Into<String>, filename: impl Into<String>) -> Self {
        Self::new(base, filename, Transform::Style)
    }

    /// Template cache resource registering into `module`.
    ///
    /// Its extension reads `html` until built, then `js`.
    pub fn template(
        base: impl Into<String>,
        filename: impl Into<String>,
        module: impl Into<String>,
    ) -> Self {
        Self::new(
            base,
            filename,
            Transform::Template {
                module: module.into(),
            },
        )
    }

    /// Third-party component resource. Scripts or styles depending on the
    /// filename's extension; always routed, priority [`COMPONENT_PRIORITY`].
    pub fn components(base: impl Into<String>, filename: impl Into<String>) -> Self {
        let filename = filename.into();
        let transform = match extension_of(&filename).as_str() {
            "css" => Transform::Style,
            _ => Transform::Script,
        };
        let mut resource = Self::new(base, filename, transform);
        resource.source = Source::Components(Vec::new());
        resource.priority = COMPONENT_PRIORITY;
        resource.autoroute = true;
        resource
    }

    pub fn with_priority(mut self, priority: i32) -> Self {
        self.priority = priority;
        self
    }

    pub fn with_autoroute(mut self, autoroute: bool) -> Self {
        self.autoroute = autoroute;
        self
    }

    // ========================================================================
    // Accessors
    // ========================================================================

    pub fn base(&self) -> &str {
        &self.base
    }

    pub fn filename(&self) -> &str {
        &self.filename
    }

    pub fn extension(&self) -> &str {
        &self.extension
    }

    pub fn state(&self) -> ResourceState {
        self.state
    }

    /// Files captured by the last `select`.
    pub fn files(&self) -> &[FileEntry] {
        &self.files
    }

    /// Published urls. Empty before `select`.
    pub fn paths(&self) -> &[PublishedPath] {
        &self.paths
    }

    pub fn last_modified(&self) -> Option<SystemTime> {
        self.last_modified
    }

    /// Returns `true` if the last `select` found no files.
    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    // ========================================================================
    // Lifecycle
    // ========================================================================

    /// Attach glob patterns.
    pub fn src(mut self, spec: SourceSpec) -> Self {
        self.source = Source::Globs(spec);
        self.state = ResourceState::Sourced;
        self
    }

    /// Add a component manifest (or its directory). Calls accumulate.
    pub fn add_manifest(mut self, manifest: impl Into<PathBuf>) -> Self {
        self.push_manifest(manifest);
        self
    }

    /// In-place form of [`Resource::add_manifest`].
    pub fn push_manifest(&mut self, manifest: impl Into<PathBuf>) {
        let manifest = manifest.into();
        match &mut self.source {
            Source::Components(manifests) => manifests.push(manifest),
            source => *source = Source::Components(vec![manifest]),
        }
        self.state = ResourceState::Sourced;
    }

    /// Enumerate input files and record their newest mtime.
    ///
    /// Also publishes the inputs themselves as dev-mode paths.
    pub fn select(&mut self) -> Result<&mut Self> {
        let files = match &self.source {
            Source::None => Vec::new(),
            Source::Globs(spec) => spec.discover()?,
            Source::Components(manifests) => {
                component::component_files(manifests, &self.extension)?
            }
        };

        debug!("select"; "{}: {} files", self.filename, files.len());

        // Component resources track only their own extension's files, so a
        // stylesheet edit does not rebuild the script bundle.
        self.last_modified = newest(&files);
        self.files = files;
        self.paths = self.source_paths();
        self.state = ResourceState::Selected;
        Ok(self)
    }

    /// Serve the selected source files unbuilt.
    pub fn publish_sources(&mut self) -> Result<&mut Self> {
        if self.state < ResourceState::Selected {
            return Err(AssetError::NotSelected(self.filename.clone()));
        }
        self.paths = self.source_paths();
        Ok(self)
    }

    /// Build (or reuse) the output and publish its url.
    pub fn build(&mut self, options: &BuildOptions) -> Result<&mut Self> {
        if self.state < ResourceState::Selected {
            return Err(AssetError::NotSelected(self.filename.clone()));
        }

        if matches!(self.transform, Transform::Template { .. }) {
            self.extension = "js".to_string();
        }

        let output = options.output_path(&self.extension, &self.filename);

        if is_output_fresh(&output, self.last_modified) {
            debug!("build"; "{} is up to date", self.filename);
        } else {
            let content = self.transform(options)?;
            publish::write_atomic(&output, content.as_bytes())?;
            let count = plural_count(self.files.len(), "file");
            log!("build"; "{} ({count})", self.filename);
        }

        let url = publish::published_url(&self.base, &self.filename, &output, options.checksums)?;
        self.paths = vec![PublishedPath { url, file: output }];
        self.autoroute = true;
        self.state = ResourceState::Built;
        Ok(self)
    }

    // ========================================================================
    // Internals
    // ========================================================================

    fn source_paths(&self) -> Vec<PublishedPath> {
        let components = matches!(self.source, Source::Components(_));
        self.files
            .iter()
            .map(|file| {
                let path = if components {
                    file.file_name()
                } else {
                    file.relative_url()
                };
                PublishedPath {
                    url: publish::join_url(&self.base, &path),
                    file: file.path.clone(),
                }
            })
            .collect()
    }

    fn read_inputs(&self) -> Result<Vec<String>> {
        self.files
            .iter()
            .map(|f| fs::read_to_string(&f.path).map_err(|e| AssetError::io(&f.path, e)))
            .collect()
    }

    fn transform(&self, options: &BuildOptions) -> Result<String> {
        let minify_err = |message| AssetError::Minify {
            file: self.filename.clone(),
            message,
        };

        match &self.transform {
            Transform::Script => {
                let joined = self.read_inputs()?.join("\n");
                minify_js(&joined, options.mangle).map_err(minify_err)
            }
            Transform::Style => {
                let joined = self.read_inputs()?.join("\n");
                minify_css(&joined).map_err(minify_err)
            }
            Transform::Template { module } => {
                let contents = self.read_inputs()?;
                let urls: Vec<String> = self
                    .files
                    .iter()
                    .map(|f| template_url(&self.base, &f.relative_url()))
                    .collect();
                let templates: Vec<Template<'_>> = urls
                    .iter()
                    .zip(&contents)
                    .map(|(url, html)| Template { url, html })
                    .collect();
                minify_js(&render_templates(module, &templates), options.mangle)
                    .map_err(minify_err)
            }
            Transform::Custom(transform) => transform(&self.files, options),
        }
    }
}

fn extension_of(filename: &str) -> String {
    filename
        .rsplit_once('.')
        .map(|(_, ext)| ext.to_string())
        .unwrap_or_default()
}
