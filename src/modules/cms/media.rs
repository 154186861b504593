//! Media URL normalization.
//!
//! The CMS returns upload URLs relative to its own origin (`/uploads/x.jpg`)
//! unless an external provider is configured. Every media URL handed to the
//! templates must be absolute.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// Prefix relative CMS URLs with the CMS base URL
pub fn normalize_url(base_url: &str, url: Option<&str>) -> Option<String> {
    let url = url.filter(|u| !u.is_empty())?;
    if url.starts_with("http") {
        Some(url.to_string())
    } else {
        Some(format!("{}{}", base_url.trim_end_matches('/'), url))
    }
}

pub fn normalize_with_fallback(
    base_url: &str,
    url: Option<&str>,
    fallback: Option<&str>,
) -> String {
    normalize_url(base_url, url)
        .or_else(|| fallback.map(str::to_string))
        .unwrap_or_default()
}

/// Uploaded file reference, flattened from any of the CMS response shapes
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(from = "RawMedia")]
#[serde(rename_all = "camelCase")]
pub struct Media {
    pub id: Option<i64>,
    pub url: String,
    pub alternative_text: Option<String>,
    pub caption: Option<String>,
    pub width: Option<u32>,
    pub height: Option<u32>,
}

/// Wire shape: flat, `{ attributes }`, `{ data: { url } }` or `{ data: { attributes } }`
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawMedia {
    id: Option<i64>,
    url: Option<String>,
    alternative_text: Option<String>,
    caption: Option<String>,
    width: Option<u32>,
    height: Option<u32>,
    attributes: Option<Box<RawMedia>>,
    data: Option<Box<RawMedia>>,
}

impl RawMedia {
    fn first_url(&self) -> Option<String> {
        self.url
            .clone()
            .filter(|u| !u.is_empty())
            .or_else(|| self.data.as_ref().and_then(|d| d.first_url()))
            .or_else(|| self.attributes.as_ref().and_then(|a| a.first_url()))
    }

    fn first_alt(&self) -> Option<String> {
        self.alternative_text
            .clone()
            .or_else(|| self.data.as_ref().and_then(|d| d.first_alt()))
            .or_else(|| self.attributes.as_ref().and_then(|a| a.first_alt()))
    }

    fn first_caption(&self) -> Option<String> {
        self.caption
            .clone()
            .or_else(|| self.data.as_ref().and_then(|d| d.first_caption()))
            .or_else(|| self.attributes.as_ref().and_then(|a| a.first_caption()))
    }
}

impl From<RawMedia> for Media {
    fn from(raw: RawMedia) -> Self {
        let nested = raw.data.as_deref().or(raw.attributes.as_deref());
        Media {
            id: raw.id.or_else(|| nested.and_then(|n| n.id)),
            url: raw.first_url().unwrap_or_default(),
            alternative_text: raw.first_alt(),
            caption: raw.first_caption(),
            width: raw.width.or_else(|| nested.and_then(|n| n.width)),
            height: raw.height.or_else(|| nested.and_then(|n| n.height)),
        }
    }
}

impl Media {
    pub fn has_url(&self) -> bool {
        !self.url.is_empty()
    }
}

/// Treat an explicit `null` like a missing field
pub fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Option::unwrap_or_default)
}

/// Accept a bare array or a `{ data: [...] }` wrapper, dropping entries without a URL
pub fn media_list<'de, D>(deserializer: D) -> Result<Vec<Media>, D::Error>
where
    D: Deserializer<'de>,
{
    let items = match Value::deserialize(deserializer)? {
        Value::Array(items) => items,
        Value::Object(mut map) => match map.remove("data") {
            Some(Value::Array(items)) => items,
            _ => Vec::new(),
        },
        _ => Vec::new(),
    };

    Ok(items
        .into_iter()
        .filter_map(|item| serde_json::from_value::<Media>(item).ok())
        .filter(Media::has_url)
        .collect())
}

/// Rewrite every media URL reachable from a content model to an absolute URL
pub trait NormalizeMedia {
    fn normalize_media(&mut self, base_url: &str);
}

impl NormalizeMedia for Media {
    fn normalize_media(&mut self, base_url: &str) {
        if let Some(url) = normalize_url(base_url, Some(&self.url)) {
            self.url = url;
        }
    }
}

impl<T: NormalizeMedia> NormalizeMedia for Option<T> {
    fn normalize_media(&mut self, base_url: &str) {
        if let Some(inner) = self {
            inner.normalize_media(base_url);
        }
    }
}

impl<T: NormalizeMedia> NormalizeMedia for Vec<T> {
    fn normalize_media(&mut self, base_url: &str) {
        for item in self.iter_mut() {
            item.normalize_media(base_url);
        }
    }
}
