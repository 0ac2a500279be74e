//! Host page: every asset a page loads, in priority order.

use rayon::prelude::*;

use super::compiled::{CompiledAssets, CompiledEntry};
use super::group::Bundle;
use crate::error::Result;

/// Something a host page references.
#[derive(Debug, Clone)]
pub enum PageAsset {
    /// Script url served elsewhere
    Script { url: String, priority: i32 },
    /// Stylesheet url served elsewhere
    Style { url: String, priority: i32 },
    Bundle(Box<Bundle>),
    /// Integration module names the page bootstraps with
    Modules(Vec<String>),
}

/// Composes bundles and raw references into one grouped asset list.
#[derive(Debug, Clone, Default)]
pub struct Hostpage {
    assets: Vec<PageAsset>,
    compiled: Option<CompiledAssets>,
}

impl Hostpage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn inject(&mut self, asset: PageAsset) -> &mut Self {
        self.assets.push(asset);
        self
    }

    pub fn script(&mut self, url: impl Into<String>, priority: i32) -> &mut Self {
        self.inject(PageAsset::Script {
            url: url.into(),
            priority,
        })
    }

    pub fn style(&mut self, url: impl Into<String>, priority: i32) -> &mut Self {
        self.inject(PageAsset::Style {
            url: url.into(),
            priority,
        })
    }

    pub fn bundle(&mut self, bundle: Bundle) -> &mut Self {
        self.inject(PageAsset::Bundle(Box::new(bundle)))
    }

    pub fn modules<I, S>(&mut self, names: I) -> &mut Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.inject(PageAsset::Modules(names.into_iter().map(Into::into).collect()))
    }

    /// Compile every bundle and merge raw references; memoized after the
    /// first success.
    pub fn compile(&mut self) -> Result<&CompiledAssets> {
        if self.compiled.is_none() {
            self.assets
                .par_iter_mut()
                .filter_map(|asset| match asset {
                    PageAsset::Bundle(bundle) => Some(bundle),
                    _ => None,
                })
                .try_for_each(|bundle| bundle.compile().map(drop))?;

            let mut entries = Vec::new();
            let mut modules: Vec<String> = Vec::new();
            for asset in &self.assets {
                match asset {
                    PageAsset::Script { url, priority } => {
                        entries.push(CompiledEntry::raw(url.as_str(), "js", *priority));
                    }
                    PageAsset::Style { url, priority } => {
                        entries.push(CompiledEntry::raw(url.as_str(), "css", *priority));
                    }
                    PageAsset::Bundle(bundle) => {
                        entries.extend(bundle.compiled().unwrap_or_default().iter().cloned());
                    }
                    PageAsset::Modules(names) => {
                        for name in names {
                            if !modules.contains(name) {
                                modules.push(name.clone());
                            }
                        }
                    }
                }
            }

            self.compiled = Some(CompiledAssets::new(entries, modules));
        }
        Ok(self.compiled.get_or_insert_default())
    }
}
