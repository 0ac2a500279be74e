//! assetman - front-end asset pipeline.
//!
//! Resolves third-party component trees, bundles and minifies scripts,
//! stylesheets and templates, and publishes checksum-addressed urls with
//! the routes a host server needs to serve them.
//!
//! ```text
//! component ──▶ resource ──▶ bundle ──▶ CompiledAssets (+ routes)
//!   resolve      select        Bundle / Hostpage / Registry
//!   dedupe       build
//!   main files   publish
//! ```

pub mod asset;
pub mod bundle;
pub mod component;
pub mod config;
pub mod error;
pub mod freshness;
pub mod logger;
pub mod resource;
pub mod source;

#[cfg(test)]
mod test_fixtures;

pub use bundle::{Bundle, BundleConfig, CompiledAssets, CompiledEntry, Hostpage, Registry, Route};
pub use error::{AssetError, Result};
pub use resource::{BuildOptions, PublishedPath, Resource};
pub use source::{FileEntry, SourceSpec};
