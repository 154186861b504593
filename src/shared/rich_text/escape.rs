/// Escape text for use in HTML element content and quoted attribute values
pub fn escape_html(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for ch in input.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(ch),
        }
    }
    out
}

/// Schemes a rendered link may point to
const ALLOWED_SCHEMES: [&str; 3] = ["http", "https", "mailto"];

/// Returns the escaped `href` value when the URL is safe to link to.
///
/// Absolute URLs must use an allowed scheme. Protocol-relative, root-relative,
/// fragment and plain relative URLs are accepted.
pub fn safe_href(url: &str) -> Option<String> {
    let url = url.trim();
    if url.is_empty() {
        return None;
    }

    // A scheme is whatever precedes the first ':' as long as no path,
    // query or fragment delimiter comes first.
    let scheme_end = url.find(':');
    let delimiter = url.find(['/', '?', '#']);
    let scheme = match (scheme_end, delimiter) {
        (Some(colon), Some(delim)) if colon < delim => Some(&url[..colon]),
        (Some(colon), None) => Some(&url[..colon]),
        _ => None,
    };

    match scheme {
        Some(scheme)
            if !ALLOWED_SCHEMES
                .iter()
                .any(|allowed| scheme.eq_ignore_ascii_case(allowed)) =>
        {
            None
        }
        _ => Some(escape_html(url)),
    }
}
