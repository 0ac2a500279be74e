//! Configuration sections of `assets.toml`.

mod build;
mod bundle;
mod page;

pub use build::BuildSection;
pub use bundle::{BundleSection, SourceDecl, TemplatesDecl};
pub use page::{PageRef, PageSection};
