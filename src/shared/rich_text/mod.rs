//! Rich-text to HTML conversion.
//!
//! CMS fields arrive either as structured blocks or as markdown-like strings,
//! sometimes wrapped in an object (`{ content }`, `{ body }`) or JSON-encoded
//! inside a string. [`RichText::from_value`] normalizes all of these shapes.

mod blocks;
mod escape;
mod markdown;

pub use blocks::Block;

use blocks::render_blocks;
use markdown::render_markdown;

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;

use crate::modules::cms::NormalizeMedia;

/// Object keys that may carry a plain-text fallback
const TEXT_FIELDS: [&str; 6] = ["body", "text", "content", "html", "value", "description"];

#[derive(Debug, Clone, Default)]
pub enum RichText {
    Blocks(Vec<Block>),
    Markdown(String),
    #[default]
    Empty,
}

impl RichText {
    pub fn from_value(value: &Value) -> Self {
        match value {
            Value::Array(items) => Self::from_array(items),
            Value::String(s) => Self::from_str_content(s),
            Value::Object(map) => {
                for key in ["content", "body"] {
                    if let Some(inner) = map.get(key) {
                        let parsed = Self::from_value(inner);
                        if !parsed.is_empty() {
                            return parsed;
                        }
                    }
                }
                TEXT_FIELDS
                    .iter()
                    .filter_map(|field| map.get(*field).and_then(Value::as_str))
                    .find(|s| !s.trim().is_empty())
                    .map(|s| RichText::Markdown(s.trim().to_string()))
                    .unwrap_or_default()
            }
            _ => RichText::Empty,
        }
    }

    fn from_array(items: &[Value]) -> Self {
        if items.is_empty() {
            return RichText::Empty;
        }

        let all_typed = items
            .iter()
            .all(|item| item.get("type").and_then(Value::as_str).is_some());
        if all_typed {
            if let Ok(blocks) = serde_json::from_value::<Vec<Block>>(Value::Array(items.to_vec()))
            {
                return RichText::Blocks(blocks);
            }
        }

        // Not block content: salvage whatever text the items carry
        let text = items
            .iter()
            .filter_map(|item| match item {
                Value::String(s) => Some(s.clone()),
                Value::Object(map) => ["text", "body", "content"]
                    .iter()
                    .find_map(|k| map.get(*k).and_then(Value::as_str))
                    .map(str::to_string),
                _ => None,
            })
            .collect::<Vec<_>>()
            .join(" ");

        if text.trim().is_empty() {
            RichText::Empty
        } else {
            RichText::Markdown(text)
        }
    }

    fn from_str_content(s: &str) -> Self {
        let trimmed = s.trim();
        if trimmed.is_empty() {
            return RichText::Empty;
        }

        if trimmed.starts_with('[') || trimmed.starts_with('{') {
            if let Ok(parsed) = serde_json::from_str::<Value>(trimmed) {
                let parsed = Self::from_value(&parsed);
                if !parsed.is_empty() {
                    return parsed;
                }
            }
        }

        RichText::Markdown(trimmed.to_string())
    }

    pub fn is_empty(&self) -> bool {
        match self {
            RichText::Blocks(blocks) => blocks.is_empty(),
            RichText::Markdown(text) => text.trim().is_empty(),
            RichText::Empty => true,
        }
    }

    pub fn to_html(&self) -> String {
        match self {
            RichText::Blocks(blocks) => render_blocks(blocks),
            RichText::Markdown(text) => render_markdown(text),
            RichText::Empty => String::new(),
        }
    }
}

impl<'de> Deserialize<'de> for RichText {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = Value::deserialize(deserializer)?;
        Ok(RichText::from_value(&value))
    }
}

/// Image blocks carry CMS uploads like any other model
impl NormalizeMedia for RichText {
    fn normalize_media(&mut self, base_url: &str) {
        if let RichText::Blocks(blocks) = self {
            blocks.normalize_media(base_url);
        }
    }
}

/// Serializes as rendered HTML so templates can emit it with `|safe`
impl Serialize for RichText {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&self.to_html())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_serializes_as_html() {
        let text = RichText::Markdown("**hi**".to_string());
        assert_eq!(serde_json::to_value(&text).unwrap(), json!("<p><strong>hi</strong></p>"));
    }

    #[test]
    fn test_from_block_array() {
        let rich = RichText::from_value(&json!([
            { "type": "paragraph", "children": [{ "type": "text", "text": "Hello" }] }
        ]));
        assert_eq!(rich.to_html(), "<p>Hello</p>");
    }

    #[test]
    fn test_from_markdown_string() {
        let rich = RichText::from_value(&json!("**Open** daily"));
        assert_eq!(rich.to_html(), "<p><strong>Open</strong> daily</p>");
    }

    #[test]
    fn test_from_json_encoded_blocks() {
        let encoded = json!([
            { "type": "heading", "level": 2, "children": [{ "type": "text", "text": "Team" }] }
        ])
        .to_string();
        let rich = RichText::from_value(&Value::String(encoded));
        assert_eq!(rich.to_html(), "<h2>Team</h2>");
    }

    #[test]
    fn test_from_wrapped_body() {
        let rich = RichText::from_value(&json!({ "id": 4, "body": "Cancellation within 24h" }));
        assert_eq!(rich.to_html(), "<p>Cancellation within 24h</p>");

        let rich = RichText::from_value(&json!({
            "content": [{ "type": "paragraph", "children": [{ "type": "text", "text": "Wrapped" }] }]
        }));
        assert_eq!(rich.to_html(), "<p>Wrapped</p>");
    }

    #[test]
    fn test_untyped_array_falls_back_to_text() {
        let rich = RichText::from_value(&json!([{ "text": "one" }, "two"]));
        assert_eq!(rich.to_html(), "<p>one two</p>");
    }

    #[test]
    fn test_empty_shapes() {
        assert!(RichText::from_value(&json!(null)).is_empty());
        assert!(RichText::from_value(&json!("   ")).is_empty());
        assert!(RichText::from_value(&json!([])).is_empty());
        assert_eq!(RichText::from_value(&json!({})).to_html(), "");
    }

    #[test]
    fn test_deserialize_as_field() {
        #[derive(Deserialize)]
        struct Section {
            #[serde(default)]
            body: RichText,
        }

        let section: Section = serde_json::from_value(json!({ "body": "# Policy" })).unwrap();
        assert_eq!(section.body.to_html(), "<h1>Policy</h1>");

        let section: Section = serde_json::from_value(json!({})).unwrap();
        assert!(section.body.is_empty());
    }
}
