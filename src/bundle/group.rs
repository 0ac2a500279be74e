//! Named bundles of resources under one url base.

use std::path::{Path, PathBuf};

use super::compiled::{CompiledEntry, compile_resources};
use crate::error::Result;
use crate::log;
use crate::logger::plural_count;
use crate::resource::{BuildOptions, Resource};
use crate::source::SourceSpec;

/// Template module used by [`Bundle::scan`] when none is configured.
pub const DEFAULT_TEMPLATE_MODULE: &str = "templates";

/// Template sources and the module they register into.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TemplateSources {
    pub spec: SourceSpec,
    pub module: String,
}

/// Resource declarations for a bundle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BundleConfig {
    /// Route every resource even when sources are served unbuilt
    pub add_routes: bool,
    /// Component manifests (files or directories)
    pub components: Vec<PathBuf>,
    pub scripts: Option<SourceSpec>,
    pub styles: Option<SourceSpec>,
    pub templates: Option<TemplateSources>,
}

impl Default for BundleConfig {
    fn default() -> Self {
        Self {
            add_routes: true,
            components: Vec::new(),
            scripts: None,
            styles: None,
            templates: None,
        }
    }
}

/// A group of resources published under `base` and named after `id`.
///
/// | declaration  | resources                                        |
/// |--------------|--------------------------------------------------|
/// | `components` | `{id}-bower.min.js`, `{id}-bower.min.css` (100)  |
/// | `scripts`    | `{id}-scripts.min.js`                            |
/// | `templates`  | `{id}-templates.min.js`                          |
/// | `styles`     | `{id}-styles.min.css`                            |
#[derive(Debug, Clone)]
pub struct Bundle {
    base: String,
    id: String,
    options: BuildOptions,
    module: String,
    resources: Vec<Resource>,
    compiled: Option<Vec<CompiledEntry>>,
}

impl Bundle {
    pub fn new(base: impl Into<String>, id: impl Into<String>, options: BuildOptions) -> Self {
        Self {
            base: base.into(),
            id: id.into(),
            options,
            module: DEFAULT_TEMPLATE_MODULE.to_string(),
            resources: Vec::new(),
            compiled: None,
        }
    }

    /// Template module for resources added by [`Bundle::scan`].
    pub fn with_module(mut self, module: impl Into<String>) -> Self {
        self.module = module.into();
        self
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn resource_list(&self) -> &[Resource] {
        &self.resources
    }

    /// Create resources from `config` and append them.
    pub fn resources(&mut self, config: BundleConfig) -> &mut Self {
        let autoroute = config.add_routes || self.options.minify;
        let (base, id) = (&self.base, &self.id);
        let mut created = Vec::new();

        if !config.components.is_empty() {
            for ext in ["js", "css"] {
                let resource = config.components.iter().fold(
                    Resource::components(base.as_str(), format!("{id}-bower.min.{ext}")),
                    |r, manifest| r.add_manifest(manifest),
                );
                created.push(resource);
            }
        }
        if let Some(spec) = config.scripts {
            created.push(Resource::script(base.as_str(), format!("{id}-scripts.min.js")).src(spec));
        }
        if let Some(templates) = config.templates {
            created.push(
                Resource::template(base.as_str(), format!("{id}-templates.min.js"), templates.module)
                    .src(templates.spec),
            );
        }
        if let Some(spec) = config.styles {
            created.push(Resource::style(base.as_str(), format!("{id}-styles.min.css")).src(spec));
        }

        self.resources
            .extend(created.into_iter().map(|r| r.with_autoroute(autoroute)));
        self
    }

    /// Add script, template and style resources for everything under `dir`
    /// (or `dir/subdir`).
    ///
    /// Files are named after the scanned folder (`{id}-public-scripts.min.js`)
    /// so they never share an output with the bundle's declared sources.
    pub fn scan(&mut self, dir: &Path, subdir: Option<&str>) -> &mut Self {
        let dir = match subdir {
            Some(sub) => dir.join(sub),
            None => dir.to_path_buf(),
        };
        let label = dir
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "scan".to_string());
        let rooted = |pattern: &str| SourceSpec::new(pattern).cwd(&dir).base(&dir);
        let (base, prefix) = (self.base.as_str(), format!("{}-{label}", self.id));

        let created = [
            Resource::script(base, format!("{prefix}-scripts.min.js")).src(rooted("**/*.js")),
            Resource::template(base, format!("{prefix}-templates.min.js"), self.module.as_str())
                .src(rooted("**/*.html")),
            Resource::style(base, format!("{prefix}-styles.min.css")).src(rooted("**/*.css")),
        ];
        self.resources
            .extend(created.into_iter().map(|r| r.with_autoroute(true)));
        self
    }

    /// Add a prepared resource.
    pub fn push(&mut self, resource: Resource) -> &mut Self {
        self.resources.push(resource);
        self
    }

    /// Select and build every resource; memoized after the first success.
    pub fn compile(&mut self) -> Result<&[CompiledEntry]> {
        if self.compiled.is_none() {
            let count = plural_count(self.resources.len(), "resource");
            log!("bundle"; "compiling {} ({count})", self.id);
            let entries =
                compile_resources(self.resources.iter_mut().collect(), &self.options, false)?;
            self.compiled = Some(entries);
        }
        Ok(self.compiled.as_deref().unwrap_or_default())
    }

    /// Entries of a previous successful [`Bundle::compile`].
    pub fn compiled(&self) -> Option<&[CompiledEntry]> {
        self.compiled.as_deref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_fixtures::{install_component, write_file, write_manifest};
    use tempfile::TempDir;

    fn options(dir: &TempDir) -> BuildOptions {
        BuildOptions::default().with_output_dir(dir.path().join("dist"))
    }

    fn names(bundle: &Bundle) -> Vec<&str> {
        bundle.resource_list().iter().map(Resource::filename).collect()
    }

    #[test]
    fn test_resources_naming() {
        let dir = TempDir::new().unwrap();
        let mut bundle = Bundle::new("/app", "app", options(&dir));
        bundle.resources(BundleConfig {
            components: vec![dir.path().join("bower.json")],
            scripts: Some(SourceSpec::new("*.js")),
            styles: Some(SourceSpec::new("*.css")),
            templates: Some(TemplateSources {
                spec: SourceSpec::new("*.html"),
                module: "app".into(),
            }),
            ..BundleConfig::default()
        });

        assert_eq!(
            names(&bundle),
            vec![
                "app-bower.min.js",
                "app-bower.min.css",
                "app-scripts.min.js",
                "app-templates.min.js",
                "app-styles.min.css",
            ]
        );
        assert_eq!(bundle.resource_list()[0].priority, 100);
        assert_eq!(bundle.resource_list()[2].priority, 0);
    }

    #[test]
    fn test_autoroute_follows_config() {
        let dir = TempDir::new().unwrap();
        let dev = BuildOptions {
            minify: false,
            ..options(&dir)
        };

        let mut bundle = Bundle::new("/app", "app", dev.clone());
        bundle.resources(BundleConfig {
            add_routes: false,
            scripts: Some(SourceSpec::new("*.js")),
            ..BundleConfig::default()
        });
        assert!(!bundle.resource_list()[0].autoroute);

        let mut bundle = Bundle::new("/app", "app", options(&dir));
        bundle.resources(BundleConfig {
            add_routes: false,
            scripts: Some(SourceSpec::new("*.js")),
            ..BundleConfig::default()
        });
        assert!(bundle.resource_list()[0].autoroute);
    }

    #[test]
    fn test_compile_sorted_and_memoized() {
        let dir = TempDir::new().unwrap();
        let components = dir.path().join("bower_components");
        install_component(&components, "lib", Some("1.0.0"), &[], &[("lib.js", "window.lib = 1;")]);
        let root = write_manifest(dir.path(), "bower.json", "app", None, &[("lib", "*")], &[]);
        write_file(&dir.path().join("src/app.js"), "window.app = 1;");
        write_file(&dir.path().join("src/app.css"), ".app { color: blue; }");

        let mut bundle = Bundle::new("/app", "app", options(&dir));
        bundle.resources(BundleConfig {
            components: vec![root],
            scripts: Some(SourceSpec::new("src/*.js").cwd(dir.path())),
            styles: Some(SourceSpec::new("src/*.css").cwd(dir.path())),
            ..BundleConfig::default()
        });

        let entries = bundle.compile().unwrap().to_vec();
        let order: Vec<_> = entries.iter().map(|e| e.description.as_str()).collect();
        assert_eq!(
            order,
            vec!["app-bower.min.js", "app-bower.min.css", "app-scripts.min.js", "app-styles.min.css"]
        );
        assert!(entries.iter().all(|e| e.paths.len() == 1));
        assert!(entries.iter().all(|e| e.routes.len() == 1));

        // Second call returns the memo without touching disk
        write_file(&dir.path().join("src/late.js"), "window.late = 1;");
        assert_eq!(bundle.compile().unwrap(), entries.as_slice());
    }

    #[test]
    fn test_compile_dev_mode_serves_sources() {
        let dir = TempDir::new().unwrap();
        write_file(&dir.path().join("src/a.js"), "");
        write_file(&dir.path().join("src/b.js"), "");

        let dev = BuildOptions {
            minify: false,
            ..options(&dir)
        };
        let mut bundle = Bundle::new("/app", "app", dev);
        bundle.resources(BundleConfig {
            scripts: Some(SourceSpec::new("src/*.js").cwd(dir.path())),
            ..BundleConfig::default()
        });

        let entries = bundle.compile().unwrap();
        assert_eq!(entries[0].paths, vec!["/app/a.js", "/app/b.js"]);
        assert_eq!(entries[0].routes.len(), 2);
        assert!(!dir.path().join("dist").exists());
    }

    #[test]
    fn test_compile_fails_closed() {
        let dir = TempDir::new().unwrap();
        write_file(&dir.path().join("src/bad.js"), "function (");

        let mut bundle = Bundle::new("/app", "app", options(&dir));
        bundle.resources(BundleConfig {
            scripts: Some(SourceSpec::new("src/*.js").cwd(dir.path())),
            ..BundleConfig::default()
        });

        assert!(bundle.compile().is_err());
        assert!(bundle.compiled().is_none());
    }

    #[test]
    fn test_scan() {
        let dir = TempDir::new().unwrap();
        let public = dir.path().join("public");
        write_file(&public.join("js/app.js"), "window.app = 1;");
        write_file(&public.join("views/home.html"), "<p>home</p>");
        write_file(&public.join("css/site.css"), ".site { margin: 0; }");

        let mut bundle = Bundle::new("/public", "site", options(&dir)).with_module("site");
        bundle.scan(dir.path(), Some("public"));
        assert_eq!(
            names(&bundle),
            vec![
                "site-public-scripts.min.js",
                "site-public-templates.min.js",
                "site-public-styles.min.css",
            ]
        );

        let entries = bundle.compile().unwrap();
        assert_eq!(entries.len(), 3);
        let templates = &entries[1];
        assert_eq!(templates.extension, "js");
        let js = std::fs::read_to_string(&templates.routes[0].file).unwrap();
        assert!(js.contains("/public/views/home.html"));
    }

    #[test]
    fn test_scan_alongside_declared_scripts() {
        let dir = TempDir::new().unwrap();
        write_file(&dir.path().join("src/app.js"), "window.fromScripts = 1;");
        write_file(&dir.path().join("public/extra.js"), "window.fromScan = 1;");

        let mut bundle = Bundle::new("/app", "app", options(&dir));
        bundle.resources(BundleConfig {
            scripts: Some(SourceSpec::new("src/*.js").cwd(dir.path())),
            ..BundleConfig::default()
        });
        bundle.scan(dir.path(), Some("public"));

        let entries = bundle.compile().unwrap().to_vec();
        let scripts: Vec<_> = entries
            .iter()
            .filter(|e| e.extension == "js" && e.description.ends_with("scripts.min.js"))
            .collect();
        assert_eq!(scripts.len(), 2);
        assert_ne!(scripts[0].routes[0].file, scripts[1].routes[0].file);

        let outputs: String = scripts
            .iter()
            .map(|e| std::fs::read_to_string(&e.routes[0].file).unwrap())
            .collect();
        assert!(outputs.contains("fromScripts"));
        assert!(outputs.contains("fromScan"));
    }

    #[test]
    fn test_duplicate_output_rejected() {
        let dir = TempDir::new().unwrap();
        write_file(&dir.path().join("a.js"), "window.a = 1;");

        let mut bundle = Bundle::new("/app", "app", options(&dir));
        let spec = SourceSpec::new("a.js").cwd(dir.path());
        bundle.push(Resource::script("/app", "app.min.js").src(spec.clone()));
        bundle.push(Resource::script("/app", "app.min.js").src(spec));

        let err = bundle.compile().unwrap_err();
        assert!(matches!(err, crate::error::AssetError::DuplicateOutput(name) if name == "app.min.js"));
    }
}
