//! Asset transforms: minification and template-cache generation.

pub mod minify;
pub mod template;

pub use minify::{minify_css, minify_js};
pub use template::{Template, render as render_templates, template_url};
