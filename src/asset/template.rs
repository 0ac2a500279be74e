//! HTML templates to a template-cache registration script.
//!
//! Each template becomes a `$templateCache.put(url, html)` call inside a
//! single `run` block of the target module:
//!
//! ```text
//! angular.module("app").run(["$templateCache", function($templateCache) {
//! $templateCache.put("views/home.html", "<h1>Home</h1>");
//! }]);
//! ```

/// A template file and the url it is registered under.
#[derive(Debug, Clone, Copy)]
pub struct Template<'a> {
    pub url: &'a str,
    pub html: &'a str,
}

/// Cache url for a template: `root` joined with its relative path.
pub fn template_url(root: &str, relative: &str) -> String {
    let root = root.trim_end_matches('/');
    let relative = relative.trim_start_matches('/');
    if root.is_empty() {
        relative.to_string()
    } else {
        format!("{root}/{relative}")
    }
}

/// Render the registration script for `templates` in `module`.
pub fn render(module: &str, templates: &[Template<'_>]) -> String {
    let mut out = format!(
        "angular.module({}).run([\"$templateCache\", function($templateCache) {{\n",
        js_string(module)
    );
    for template in templates {
        out.push_str("$templateCache.put(");
        out.push_str(&js_string(template.url));
        out.push_str(", ");
        out.push_str(&js_string(template.html));
        out.push_str(");\n");
    }
    out.push_str("}]);\n");
    out
}

/// Quote a string as a JavaScript literal.
fn js_string(s: &str) -> String {
    // U+2028/9 are line terminators in pre-ES2019 string literals
    serde_json::Value::String(s.to_string())
        .to_string()
        .replace('\u{2028}', "\\u2028")
        .replace('\u{2029}', "\\u2029")
}
