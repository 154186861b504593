//! CMS rich-text block rendering.

use serde::Deserialize;

use super::escape::{escape_html, safe_href};
use super::markdown::{looks_like_heading, render_markdown};
use crate::modules::cms::{Media, NormalizeMedia};

/// Top-level rich-text block as exported by the CMS
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum Block {
    Paragraph {
        #[serde(default)]
        children: Vec<Inline>,
    },
    Heading {
        #[serde(default)]
        level: Option<u8>,
        #[serde(default)]
        children: Vec<Inline>,
    },
    List {
        #[serde(default)]
        format: Option<String>,
        #[serde(default)]
        children: Vec<ListChild>,
    },
    Quote {
        #[serde(default)]
        children: Vec<Inline>,
    },
    Code {
        #[serde(default)]
        children: Vec<Inline>,
    },
    Image {
        #[serde(default)]
        image: Option<Media>,
    },
    #[serde(other)]
    Unsupported,
}

impl NormalizeMedia for Block {
    fn normalize_media(&mut self, base_url: &str) {
        if let Block::Image { image } = self {
            image.normalize_media(base_url);
        }
    }
}

/// Child of a list block: an item, or a nested list
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum ListChild {
    ListItem {
        #[serde(default)]
        children: Vec<Inline>,
    },
    List {
        #[serde(default)]
        format: Option<String>,
        #[serde(default)]
        children: Vec<ListChild>,
    },
    #[serde(other)]
    Unsupported,
}

/// Inline node: a text run or a link wrapping text runs
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Inline {
    #[serde(rename = "type", default)]
    pub kind: Option<String>,
    #[serde(default)]
    pub text: Option<String>,
    #[serde(default)]
    pub bold: bool,
    #[serde(default)]
    pub italic: bool,
    #[serde(default)]
    pub underline: bool,
    #[serde(default)]
    pub strikethrough: bool,
    #[serde(default)]
    pub code: bool,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub children: Vec<Inline>,
}

impl Inline {
    fn is_link(&self) -> bool {
        self.kind.as_deref() == Some("link")
    }

    /// Concatenated raw text of this node and its children
    fn plain_text(&self) -> String {
        let mut out = self.text.clone().unwrap_or_default();
        for child in &self.children {
            out.push_str(&child.plain_text());
        }
        out
    }

    fn render(&self) -> String {
        if self.is_link() {
            let inner = if self.children.is_empty() {
                escape_html(self.text.as_deref().unwrap_or_default())
            } else {
                render_inlines(&self.children)
            };
            return match self.url.as_deref().and_then(safe_href) {
                Some(href) => format!(
                    r#"<a href="{href}" target="_blank" rel="noopener noreferrer">{inner}</a>"#
                ),
                None => inner,
            };
        }

        let mut html = escape_html(self.text.as_deref().unwrap_or_default());
        if self.code {
            html = format!("<code>{html}</code>");
        }
        if self.strikethrough {
            html = format!("<s>{html}</s>");
        }
        if self.underline {
            html = format!("<u>{html}</u>");
        }
        if self.italic {
            html = format!("<em>{html}</em>");
        }
        if self.bold {
            html = format!("<strong>{html}</strong>");
        }
        html
    }
}

fn render_inlines(children: &[Inline]) -> String {
    children.iter().map(Inline::render).collect()
}

fn list_tag(format: Option<&str>) -> &'static str {
    if format == Some("ordered") {
        "ol"
    } else {
        "ul"
    }
}

fn render_list(format: Option<&str>, children: &[ListChild]) -> String {
    let tag = list_tag(format);
    let items: String = children
        .iter()
        .map(|child| match child {
            ListChild::ListItem { children } => format!("<li>{}</li>", render_inlines(children)),
            ListChild::List { format, children } => render_list(format.as_deref(), children),
            ListChild::Unsupported => String::new(),
        })
        .collect();
    format!("<{tag}>{items}</{tag}>")
}

fn render_block(block: &Block) -> String {
    match block {
        Block::Paragraph { children } => {
            let raw: String = children.iter().map(Inline::plain_text).collect();
            if looks_like_heading(&raw) {
                render_markdown(&raw)
            } else {
                format!("<p>{}</p>", render_inlines(children))
            }
        }
        Block::Heading { level, children } => {
            let level = level.unwrap_or(1).clamp(1, 6);
            format!("<h{level}>{}</h{level}>", render_inlines(children))
        }
        Block::List { format, children } => render_list(format.as_deref(), children),
        Block::Quote { children } => {
            format!("<blockquote>{}</blockquote>", render_inlines(children))
        }
        Block::Code { children } => {
            let raw: String = children.iter().map(Inline::plain_text).collect();
            format!("<pre><code>{}</code></pre>", escape_html(&raw))
        }
        Block::Image { image } => image.as_ref().map(render_image).unwrap_or_default(),
        Block::Unsupported => String::new(),
    }
}

fn render_image(image: &Media) -> String {
    match safe_href(&image.url) {
        Some(src) => {
            let alt = escape_html(image.alternative_text.as_deref().unwrap_or_default());
            format!(r#"<figure><img src="{src}" alt="{alt}"></figure>"#)
        }
        None => String::new(),
    }
}

/// Render a sequence of CMS blocks to HTML
pub fn render_blocks(blocks: &[Block]) -> String {
    blocks.iter().map(render_block).collect()
}
