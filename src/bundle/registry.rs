//! Named asset modules sharing one pair of component resources.
//!
//! ```ignore
//! let mut registry = Registry::new();
//! registry
//!     .module("app", 10)
//!     .script(SourceSpec::new("app/**/*.js"))
//!     .template("app", SourceSpec::new("app/**/*.html"))
//!     .components("bower.json");
//! registry.integration_modules(["ui.router"]);
//! let assets = registry.assemble(&options)?;
//! ```

use std::path::PathBuf;

use rustc_hash::FxHashMap;

use super::compiled::{CompiledAssets, compile_resources};
use crate::error::Result;
use crate::log;
use crate::resource::{BuildOptions, Resource};
use crate::source::SourceSpec;

/// Url base of the shared component resources.
pub const COMPONENTS_BASE: &str = "/bower_components";

/// Resources declared under one module name.
#[derive(Debug, Clone)]
pub struct AssetModule {
    pub name: String,
    pub priority: i32,
    pub resources: Vec<Resource>,
}

/// Handle for adding resources to a module.
pub struct ModuleBuilder<'a> {
    module: &'a mut AssetModule,
    components: &'a mut [Resource; 2],
}

impl ModuleBuilder<'_> {
    fn base(&self) -> String {
        format!("/{}", self.module.name)
    }

    fn file(&self, suffix: &str) -> String {
        format!("{}-{suffix}", self.module.name)
    }

    /// Add a resource; it inherits the module priority.
    pub fn resource(&mut self, resource: Resource) -> &mut Self {
        let resource = resource.with_priority(self.module.priority);
        self.module.resources.push(resource);
        self
    }

    pub fn script(&mut self, spec: SourceSpec) -> &mut Self {
        let resource = Resource::script(self.base(), self.file("scripts.min.js")).src(spec);
        self.resource(resource)
    }

    pub fn css(&mut self, spec: SourceSpec) -> &mut Self {
        let resource = Resource::style(self.base(), self.file("styles.min.css")).src(spec);
        self.resource(resource)
    }

    /// Templates registered into the integration module `module`.
    pub fn template(&mut self, module: &str, spec: SourceSpec) -> &mut Self {
        let resource =
            Resource::template(self.base(), self.file("templates.min.js"), module).src(spec);
        self.resource(resource)
    }

    /// Add a component manifest to the shared component resources.
    pub fn components(&mut self, manifest: impl Into<PathBuf>) -> &mut Self {
        let manifest = manifest.into();
        for resource in self.components.iter_mut() {
            resource.push_manifest(manifest.clone());
        }
        self
    }
}

/// Owned collection of asset modules.
#[derive(Debug, Clone)]
pub struct Registry {
    modules: Vec<AssetModule>,
    index: FxHashMap<String, usize>,
    components: [Resource; 2],
    integration_modules: Vec<String>,
}

impl Default for Registry {
    fn default() -> Self {
        Self::new()
    }
}

impl Registry {
    pub fn new() -> Self {
        Self {
            modules: Vec::new(),
            index: FxHashMap::default(),
            components: [
                Resource::components(COMPONENTS_BASE, "bower.min.js"),
                Resource::components(COMPONENTS_BASE, "bower.min.css"),
            ],
            integration_modules: Vec::new(),
        }
    }

    /// Module named `name`, created with `priority` on first use.
    ///
    /// Later calls return the existing module; their priority is ignored.
    pub fn module(&mut self, name: &str, priority: i32) -> ModuleBuilder<'_> {
        let idx = match self.index.get(name).copied() {
            Some(idx) => idx,
            None => {
                self.modules.push(AssetModule {
                    name: name.to_string(),
                    priority,
                    resources: Vec::new(),
                });
                self.index.insert(name.to_string(), self.modules.len() - 1);
                self.modules.len() - 1
            }
        };
        ModuleBuilder {
            module: &mut self.modules[idx],
            components: &mut self.components,
        }
    }

    pub fn modules(&self) -> &[AssetModule] {
        &self.modules
    }

    /// Record integration module names, keeping first appearance order.
    pub fn integration_modules<I, S>(&mut self, names: I) -> &mut Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        for name in names {
            let name = name.into();
            if !self.integration_modules.contains(&name) {
                self.integration_modules.push(name);
            }
        }
        self
    }

    pub fn integration_module_names(&self) -> &[String] {
        &self.integration_modules
    }

    /// Every resource: module resources in declaration order, then the
    /// shared component resources.
    pub fn resources(&self) -> impl Iterator<Item = &Resource> {
        self.modules
            .iter()
            .flat_map(|m| m.resources.iter())
            .chain(self.components.iter())
    }

    /// Select everything, drop empty resources, build the rest and group
    /// the result by extension.
    pub fn assemble(&mut self, options: &BuildOptions) -> Result<CompiledAssets> {
        let resources: Vec<&mut Resource> = self
            .modules
            .iter_mut()
            .flat_map(|m| m.resources.iter_mut())
            .chain(self.components.iter_mut())
            .collect();

        log!("assemble"; "{} modules", self.index.len());
        let entries = compile_resources(resources, options, true)?;
        Ok(CompiledAssets::new(entries, self.integration_modules.clone()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_fixtures::{install_component, write_file, write_manifest};
    use tempfile::TempDir;

    fn options(dir: &TempDir) -> BuildOptions {
        BuildOptions {
            checksums: false,
            ..BuildOptions::default().with_output_dir(dir.path().join("dist"))
        }
    }

    #[test]
    fn test_module_is_created_once() {
        let mut registry = Registry::new();
        registry.module("app", 10).script(SourceSpec::new("*.js"));
        registry.module("app", 99).css(SourceSpec::new("*.css"));
        registry.module("admin", 0);

        let modules = registry.modules();
        assert_eq!(modules.len(), 2);
        assert_eq!(modules[0].priority, 10);
        assert_eq!(modules[0].resources.len(), 2);
        assert!(modules[0].resources.iter().all(|r| r.priority == 10));
        assert_eq!(modules[0].resources[0].filename(), "app-scripts.min.js");
        assert_eq!(modules[0].resources[0].base(), "/app");
    }

    #[test]
    fn test_components_are_shared() {
        let mut registry = Registry::new();
        registry.module("a", 0).components("a/bower.json");
        registry.module("b", 0).components("b/bower.json");

        let names: Vec<_> = registry.resources().map(Resource::filename).collect();
        assert_eq!(names, vec!["bower.min.js", "bower.min.css"]);
        assert!(registry.resources().all(|r| r.base() == COMPONENTS_BASE));
    }

    #[test]
    fn test_integration_modules_dedup() {
        let mut registry = Registry::new();
        registry
            .integration_modules(["ui.router", "ngAnimate"])
            .integration_modules(vec!["ui.router".to_string(), "app".to_string()]);
        assert_eq!(registry.integration_module_names(), ["ui.router", "ngAnimate", "app"]);
    }

    #[test]
    fn test_assemble_prunes_empty_resources() {
        let dir = TempDir::new().unwrap();
        let components = dir.path().join("bower_components");
        install_component(&components, "lib", Some("1.0.0"), &[], &[("lib.js", "window.lib = 1;")]);
        let root = write_manifest(dir.path(), "bower.json", "app", None, &[("lib", "*")], &[]);
        write_file(&dir.path().join("app/main.js"), "window.main = 1;");

        let mut registry = Registry::new();
        registry
            .module("app", 0)
            .script(SourceSpec::new("app/**/*.js").cwd(dir.path()))
            .css(SourceSpec::new("app/**/*.css").cwd(dir.path()))
            .components(&root);
        registry.integration_modules(["app"]);

        let assets = registry.assemble(&options(&dir)).unwrap();
        // no styles anywhere: both css resources pruned
        assert!(assets.group("css").is_empty());
        assert_eq!(
            assets.urls("js"),
            vec!["/bower_components/bower.min.js", "/app/app-scripts.min.js"]
        );
        assert_eq!(assets.modules, vec!["app"]);
        assert_eq!(assets.routes().count(), 2);
        assert!(dir.path().join("dist/scripts/bower.min.js").exists());
    }

    #[test]
    fn test_assemble_dev_mode() {
        let dir = TempDir::new().unwrap();
        write_file(&dir.path().join("app/a.js"), "");
        write_file(&dir.path().join("app/b.js"), "");

        let mut registry = Registry::new();
        registry
            .module("app", 0)
            .script(SourceSpec::new("app/*.js").cwd(dir.path()));

        let dev = BuildOptions {
            minify: false,
            ..options(&dir)
        };
        let assets = registry.assemble(&dev).unwrap();
        assert_eq!(assets.urls("js"), vec!["/app/a.js", "/app/b.js"]);
        // module resources are not routed unless built
        assert_eq!(assets.routes().count(), 0);
    }
}
