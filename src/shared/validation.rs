use lazy_static::lazy_static;
use regex::Regex;
use validator::ValidationErrors;

lazy_static! {
    /// Regex for validating page slugs coming from the catch-all route
    /// Lowercase alphanumeric segments joined by hyphens or slashes
    /// - Valid: "privacy-policy", "about/team", "faq"
    /// - Invalid: "-faq", "faq-", "About", "faq?x=1", "../etc"
    pub static ref SLUG_REGEX: Regex =
        Regex::new(r"^[a-z0-9]+(?:[-/][a-z0-9]+)*$").unwrap();
}

/// Normalize a raw path into a slug, returning `None` when it cannot be one
pub fn normalize_slug(raw: &str) -> Option<String> {
    let slug = raw.trim().trim_matches('/').to_ascii_lowercase();
    if SLUG_REGEX.is_match(&slug) {
        Some(slug)
    } else {
        None
    }
}

/// Flatten validator output into sorted "field: message" strings
pub fn field_errors(errors: &ValidationErrors) -> Vec<String> {
    let mut messages: Vec<String> = errors
        .field_errors()
        .into_iter()
        .flat_map(|(field, errs)| {
            errs.iter().map(move |err| {
                let message = err
                    .message
                    .as_ref()
                    .map(|m| m.to_string())
                    .unwrap_or_else(|| err.code.to_string());
                format!("{}: {}", field, message)
            })
        })
        .collect();
    messages.sort();
    messages
}
