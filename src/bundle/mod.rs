//! Bundle assembly: many resources into one grouped, routed result.
//!
//! - [`Bundle`]: resources declared for one id under one url base
//! - [`Hostpage`]: bundles plus raw references a page loads
//! - [`Registry`]: named modules sharing component resources
//!
//! All three select resources concurrently, build them (or serve sources
//! in dev mode), then sort by priority and group by extension.

mod compiled;
mod group;
mod hostpage;
mod registry;

pub use compiled::{CompiledAssets, CompiledEntry, Method, Route, sort_by_priority};
pub use group::{Bundle, BundleConfig, DEFAULT_TEMPLATE_MODULE, TemplateSources};
pub use hostpage::{Hostpage, PageAsset};
pub use registry::{AssetModule, COMPONENTS_BASE, ModuleBuilder, Registry};
