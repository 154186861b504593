//! Markdown-like string rendering.
//!
//! Supports the subset the CMS editors actually type into plain text fields:
//! ATX headings, `**bold**`, `*italic*`, `` `code` ``, `- item` lists and
//! paragraphs separated by blank lines. A line with three or more
//! `;`-separated parts is read as a list. Input is escaped before any markup
//! is introduced.

use lazy_static::lazy_static;
use regex::{Captures, Regex};

use super::escape::escape_html;

lazy_static! {
    static ref HEADING: Regex = Regex::new(r"(?m)^(#{1,6})\s+(.*)$").unwrap();
    static ref BOLD: Regex = Regex::new(r"\*\*(.*?)\*\*").unwrap();
    static ref ITALIC: Regex = Regex::new(r"\*(.*?)\*").unwrap();
    static ref CODE: Regex = Regex::new(r"`(.*?)`").unwrap();
    static ref BLOCK_BREAK: Regex = Regex::new(r"\n{2,}").unwrap();
    static ref HEADING_TAG: Regex = Regex::new(r"^<h[1-6]>").unwrap();

    /// Text that starts like a markdown heading (`# Title`, `### Title`, ...)
    pub static ref HEADING_PREFIX: Regex = Regex::new(r"^#{1,6}\s+").unwrap();
}

/// Render a markdown-like string to HTML
pub fn render_markdown(text: &str) -> String {
    if text.is_empty() {
        return String::new();
    }

    let normalized = semicolon_lists(&text.replace("\r\n", "\n"));
    let escaped = escape_html(&normalized);

    let html = HEADING.replace_all(&escaped, |caps: &Captures| {
        let level = caps[1].len();
        format!("<h{level}>{}</h{level}>", &caps[2])
    });
    let html = BOLD.replace_all(&html, "<strong>$1</strong>");
    let html = ITALIC.replace_all(&html, "<em>$1</em>");
    let html = CODE.replace_all(&html, "<code>$1</code>");

    BLOCK_BREAK.split(&html).map(render_block).collect()
}

/// `Wassen; Knippen; Föhnen` becomes one `- ` line per part
fn semicolon_lists(text: &str) -> String {
    text.split('\n')
        .map(|line| {
            let parts: Vec<&str> = line
                .split(';')
                .map(str::trim)
                .filter(|part| !part.is_empty())
                .collect();
            if line.split(';').count() > 2 && parts.len() > 1 {
                parts
                    .iter()
                    .map(|part| format!("- {part}"))
                    .collect::<Vec<_>>()
                    .join("\n")
            } else {
                line.to_string()
            }
        })
        .collect::<Vec<_>>()
        .join("\n")
}

fn render_block(block: &str) -> String {
    let trimmed = block.trim();
    if trimmed.is_empty() {
        return String::new();
    }
    if HEADING_TAG.is_match(trimmed) {
        return trimmed.to_string();
    }

    let mut html = String::new();
    let mut lines: Vec<&str> = Vec::new();
    let mut items: Vec<&str> = Vec::new();
    for line in trimmed.lines().map(str::trim) {
        if let Some(item) = line.strip_prefix("- ") {
            flush_paragraph(&mut html, &mut lines);
            items.push(item.trim());
        } else {
            flush_list(&mut html, &mut items);
            lines.push(line);
        }
    }
    flush_paragraph(&mut html, &mut lines);
    flush_list(&mut html, &mut items);
    html
}

fn flush_paragraph(html: &mut String, lines: &mut Vec<&str>) {
    if !lines.is_empty() {
        html.push_str(&format!("<p>{}</p>", lines.join("<br>")));
        lines.clear();
    }
}

fn flush_list(html: &mut String, items: &mut Vec<&str>) {
    if !items.is_empty() {
        html.push_str("<ul>");
        for item in items.iter() {
            html.push_str(&format!("<li>{item}</li>"));
        }
        html.push_str("</ul>");
        items.clear();
    }
}

/// Whether the text should be treated as markdown instead of a plain paragraph
pub fn looks_like_heading(text: &str) -> bool {
    HEADING_PREFIX.is_match(text.trim())
}
