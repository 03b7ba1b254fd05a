//! HTML template rendering for the share-link pages.
//!
//! Templates are stored as separate files for maintainability:
//! - `templates/index.html` - page shell
//! - `templates/styles.css` - CSS styles
//! - `templates/app.js` - share button, photo fallback, notices
//! - `templates/tree.js` - SVG drawing and pan/zoom for the lineage page
//!
//! Files are embedded at compile time using `include_str!`.

use serde::Serialize;

// Embed template files at compile time
const HTML_TEMPLATE: &str = include_str!("templates/index.html");
const STYLES: &str = include_str!("templates/styles.css");
const SCRIPT: &str = include_str!("templates/app.js");
const TREE_SCRIPT: &str = include_str!("templates/tree.js");

/// d3 bundle providing `d3.zoom` for the lineage page.
const D3_URL: &str = "https://cdn.jsdelivr.net/npm/d3@7";

/// Shown when a horse has no photo or its photo fails to load.
pub const PLACEHOLDER_PHOTO: &str = "data:image/svg+xml;utf8,\
<svg xmlns='http://www.w3.org/2000/svg' viewBox='0 0 64 64'>\
<rect width='64' height='64' rx='8' fill='%23e6e1d8'/>\
<path d='M18 46c2-10 8-16 14-18l4-8 4 3-2 6c6 3 8 9 8 17z' fill='%23a8998a'/>\
</svg>";

/// Which scripts a page needs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageKind {
    Plain,
    Tree,
}

/// Render a full page.
///
/// Assembles the final HTML by substituting placeholders in the template:
/// - `{{TITLE}}` - page title (escaped here)
/// - `{{BADGE}}` - header badge, already HTML
/// - `{{CONTENT}}` - page body, already HTML
/// - `{{STYLES}}` / `{{SCRIPTS}}` - embedded assets
pub fn render_page(title: &str, badge: &str, content: &str, kind: PageKind) -> String {
    let scripts = match kind {
        PageKind::Plain => format!("<script>{}</script>", SCRIPT),
        PageKind::Tree => format!(
            "<script src=\"{}\"></script>\n<script>{}</script>\n<script>{}</script>",
            D3_URL, SCRIPT, TREE_SCRIPT
        ),
    };

    HTML_TEMPLATE
        .replace("{{TITLE}}", &html_escape(title))
        .replace("{{STYLES}}", STYLES)
        .replace("{{PLACEHOLDER}}", PLACEHOLDER_PHOTO)
        .replace("{{SCRIPTS}}", &scripts)
        .replace("{{BADGE}}", badge)
        .replace("{{CONTENT}}", content)
}

/// Escape HTML special characters to prevent XSS.
pub fn html_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}

/// Serialize `value` for embedding inside a `<script>` element.
pub fn script_json<T: Serialize>(value: &T) -> String {
    serde_json::to_string(value)
        .unwrap_or_else(|_| "null".to_string())
        .replace("</", "<\\/")
}
