use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use crate::modules::cms::{media_list, null_as_default, Media, NormalizeMedia};
use crate::shared::constants::{CONTENT_SECTION, POLICY_SECTION, SIMPLE_IMAGE_SECTION};
use crate::shared::rich_text::RichText;

/// Generic CMS page addressed by slug
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Page {
    #[serde(default)]
    pub id: Option<i64>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub slug: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub title: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub sections: Vec<PageSection>,
    #[serde(default)]
    pub seo: Option<Seo>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all(deserialize = "camelCase"))]
pub struct Seo {
    #[serde(default)]
    pub meta_title: Option<String>,
    #[serde(default)]
    pub meta_description: Option<String>,
    #[serde(default)]
    pub share_image: Option<Media>,
}

/// Dynamic-zone entry, dispatched on its `__component` identifier
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum PageSection {
    Content(ContentSection),
    SimpleImage(SimpleImageSection),
    Policy(PolicySection),
    Unknown { component: String },
}

impl<'de> Deserialize<'de> for PageSection {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = Value::deserialize(deserializer)?;
        let component = value
            .get("__component")
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string();

        let section = match component.as_str() {
            CONTENT_SECTION => serde_json::from_value(value).map(PageSection::Content),
            SIMPLE_IMAGE_SECTION => serde_json::from_value(value).map(PageSection::SimpleImage),
            POLICY_SECTION => serde_json::from_value(value).map(PageSection::Policy),
            _ => return Ok(PageSection::Unknown { component }),
        };

        section.map_err(serde::de::Error::custom)
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all(deserialize = "camelCase"))]
pub struct ContentSection {
    #[serde(default, deserialize_with = "null_as_default")]
    pub headings: Vec<String>,
    #[serde(default)]
    pub heading: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub rich_text: RichText,
    #[serde(default)]
    pub button_label: Option<String>,
    #[serde(default)]
    pub button_url: Option<String>,
    #[serde(default, deserialize_with = "media_list")]
    pub images: Vec<Media>,
    #[serde(default)]
    pub full_width_image: Option<Media>,
    #[serde(default)]
    pub overlay_title: Option<String>,
    #[serde(default)]
    pub overlay_content: Option<String>,
    #[serde(default)]
    pub overlay_button_label: Option<String>,
    #[serde(default)]
    pub overlay_button_url: Option<String>,
}

impl ContentSection {
    /// `headings` wins over the single `heading`
    pub fn all_headings(&self) -> Vec<String> {
        if !self.headings.is_empty() {
            return self.headings.clone();
        }
        self.heading.iter().cloned().collect()
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SimpleImageSection {
    #[serde(default, alias = "Title")]
    pub title: Option<String>,
    #[serde(default)]
    pub image: Option<Media>,
    #[serde(default, rename(deserialize = "fullWidthImage"))]
    pub full_width_image: Option<Media>,
}

impl SimpleImageSection {
    /// `image`, falling back to `fullWidthImage`
    pub fn display_image(&self) -> Option<&Media> {
        self.image
            .as_ref()
            .filter(|m| m.has_url())
            .or_else(|| self.full_width_image.as_ref().filter(|m| m.has_url()))
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PolicySection {
    #[serde(default)]
    pub title: Option<String>,
    /// Each block is its `body` or the block itself
    #[serde(default, deserialize_with = "null_as_default")]
    pub blocks: Vec<RichText>,
}

impl NormalizeMedia for PageSection {
    fn normalize_media(&mut self, base_url: &str) {
        match self {
            PageSection::Content(section) => {
                section.rich_text.normalize_media(base_url);
                section.images.normalize_media(base_url);
                section.full_width_image.normalize_media(base_url);
            }
            PageSection::SimpleImage(section) => {
                section.image.normalize_media(base_url);
                section.full_width_image.normalize_media(base_url);
            }
            PageSection::Policy(section) => section.blocks.normalize_media(base_url),
            PageSection::Unknown { .. } => {}
        }
    }
}

impl NormalizeMedia for Page {
    fn normalize_media(&mut self, base_url: &str) {
        self.sections.normalize_media(base_url);
        if let Some(seo) = &mut self.seo {
            seo.share_image.normalize_media(base_url);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sample_page() -> Page {
        serde_json::from_value(json!({
            "id": 3,
            "slug": "privacy",
            "title": "Privacy",
            "sections": [
                {
                    "__component": "sections.content-section",
                    "headings": ["Over ons", "Ons team"],
                    "richText": [{ "type": "paragraph", "children": [{ "type": "text", "text": "Hallo" }] }],
                    "images": { "data": [{ "id": 1, "attributes": { "url": "/uploads/salon.jpg" } }] },
                    "fullWidthImage": { "data": { "attributes": { "url": "/uploads/wide.jpg" } } }
                },
                {
                    "__component": "sections.simple-image-section",
                    "Title": "Salon",
                    "fullWidthImage": { "url": "https://cdn.example.com/salon.jpg" }
                },
                {
                    "__component": "sections.policy-section",
                    "title": "Privacybeleid",
                    "blocks": [{ "body": "## Gegevens\n\nWij bewaren niets." }]
                },
                { "__component": "sections.newsletter", "title": "ignored" }
            ],
            "seo": { "metaTitle": "Privacy | Bei Capelli", "shareImage": { "url": "/uploads/og.png" } }
        }))
        .unwrap()
    }

    #[test]
    fn test_sections_dispatch_on_component() {
        let page = sample_page();
        assert_eq!(page.sections.len(), 4);
        assert!(matches!(page.sections[0], PageSection::Content(_)));
        assert!(matches!(page.sections[1], PageSection::SimpleImage(_)));
        assert!(matches!(page.sections[2], PageSection::Policy(_)));
        match &page.sections[3] {
            PageSection::Unknown { component } => assert_eq!(component, "sections.newsletter"),
            other => panic!("unexpected section {:?}", other),
        }
    }

    #[test]
    fn test_page_media_normalized() {
        let mut page = sample_page();
        page.normalize_media("https://cms.example.com");

        let PageSection::Content(content) = &page.sections[0] else {
            panic!("expected content section");
        };
        assert_eq!(content.images[0].url, "https://cms.example.com/uploads/salon.jpg");
        assert_eq!(
            content.full_width_image.as_ref().unwrap().url,
            "https://cms.example.com/uploads/wide.jpg"
        );
        assert_eq!(content.all_headings(), vec!["Over ons", "Ons team"]);

        let PageSection::SimpleImage(simple) = &page.sections[1] else {
            panic!("expected simple image section");
        };
        assert_eq!(simple.title.as_deref(), Some("Salon"));
        assert_eq!(
            simple.display_image().unwrap().url,
            "https://cdn.example.com/salon.jpg"
        );

        assert_eq!(
            page.seo.unwrap().share_image.unwrap().url,
            "https://cms.example.com/uploads/og.png"
        );
    }

    #[test]
    fn test_policy_blocks_render_rich_text() {
        let page = sample_page();
        let value = serde_json::to_value(&page.sections[2]).unwrap();
        assert_eq!(value["kind"], "policy");
        let html = value["blocks"][0].as_str().unwrap();
        assert!(html.contains("<h2>Gegevens</h2>"));
        assert!(html.contains("<p>Wij bewaren niets.</p>"));
    }

    #[test]
    fn test_explicit_nulls_keep_the_page() {
        let page: Page = serde_json::from_value(json!({
            "slug": "over-ons",
            "title": null,
            "sections": [
                {
                    "__component": "sections.content-section",
                    "headings": null,
                    "heading": "Over ons",
                    "richText": null,
                    "images": null
                },
                { "__component": "sections.policy-section", "title": "Voorwaarden", "blocks": null }
            ],
            "seo": null
        }))
        .unwrap();

        assert_eq!(page.title, "");
        let PageSection::Content(content) = &page.sections[0] else {
            panic!("expected content section");
        };
        assert_eq!(content.all_headings(), vec!["Over ons"]);
        assert!(content.images.is_empty());
        let PageSection::Policy(policy) = &page.sections[1] else {
            panic!("expected policy section");
        };
        assert!(policy.blocks.is_empty());

        let empty: Page = serde_json::from_value(json!({ "slug": "x", "sections": null })).unwrap();
        assert!(empty.sections.is_empty());
    }

    #[test]
    fn test_rich_text_images_are_normalized() {
        let mut page: Page = serde_json::from_value(json!({
            "slug": "salon",
            "sections": [{
                "__component": "sections.content-section",
                "richText": [{ "type": "image", "image": { "url": "/uploads/stoel.jpg" } }]
            }]
        }))
        .unwrap();
        page.normalize_media("https://cms.example.com");

        let value = serde_json::to_value(&page.sections[0]).unwrap();
        assert_eq!(
            value["rich_text"],
            "<figure><img src=\"https://cms.example.com/uploads/stoel.jpg\" alt=\"\"></figure>"
        );
    }
}
