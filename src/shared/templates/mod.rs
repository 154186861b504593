//! Server-side HTML rendering for the public site.
//!
//! Templates live under `templates/site/` and use Jinja2 syntax. Files named
//! `*.html.jinja` are auto-escaped; pre-rendered rich text must be marked `|safe`.

pub mod engine;

pub use engine::{SiteRenderer, TemplateError};

/// Template names used by the page handlers
pub const HOME_TEMPLATE: &str = "home.html.jinja";
pub const PAGE_TEMPLATE: &str = "page.html.jinja";
pub const NOT_FOUND_TEMPLATE: &str = "not_found.html.jinja";
