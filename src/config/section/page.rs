//! `[page]` section: references the host page loads besides bundles.
//!
//! ```toml
//! [page]
//! modules = ["ui.router", "ngAnimate"]
//! scripts = [{ url = "https://cdn.example/x.js", priority = 200 }]
//! styles = [{ url = "/fonts.css" }]
//! ```

use serde::{Deserialize, Serialize};

use crate::config::ConfigDiagnostics;

/// An externally served url.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageRef {
    pub url: String,
    #[serde(default)]
    pub priority: i32,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PageSection {
    /// Integration modules the page bootstraps with
    pub modules: Vec<String>,
    pub scripts: Vec<PageRef>,
    pub styles: Vec<PageRef>,
}

impl PageSection {
    pub fn validate(&self, diag: &mut ConfigDiagnostics) {
        let refs = self
            .scripts
            .iter()
            .map(|r| ("page.scripts", r))
            .chain(self.styles.iter().map(|r| ("page.styles", r)));
        for (field, r) in refs {
            if r.url.trim().is_empty() {
                diag.error(field, "url must not be empty");
            }
        }
        if self.modules.iter().any(|m| m.trim().is_empty()) {
            diag.error("page.modules", "module names must not be empty");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_page() {
        let page: PageSection = toml::from_str(
            r#"
            modules = ["ui.router"]
            scripts = [{ url = "https://cdn.example/x.js", priority = 200 }]
            styles = [{ url = "/fonts.css" }]
            "#,
        )
        .unwrap();
        assert_eq!(page.modules, vec!["ui.router"]);
        assert_eq!(page.scripts[0].priority, 200);
        assert_eq!(page.styles[0].priority, 0);
    }

    #[test]
    fn test_validate_empty_url() {
        let page = PageSection {
            styles: vec![PageRef { url: " ".into(), priority: 0 }],
            ..PageSection::default()
        };
        let mut diag = ConfigDiagnostics::new();
        page.validate(&mut diag);
        assert_eq!(diag.errors()[0].field, "page.styles");
    }
}
