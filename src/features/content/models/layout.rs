use serde::{Deserialize, Serialize};

use crate::modules::cms::{null_as_default, Media, NormalizeMedia};

/// Site header: logo, menu entries and call-to-action button
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all(deserialize = "camelCase"))]
pub struct Navigation {
    #[serde(default)]
    pub logo_alt_text: Option<String>,
    #[serde(default, rename(deserialize = "logoLinkURL"))]
    pub logo_link_url: Option<String>,
    #[serde(default)]
    pub logo_image: Option<Media>,
    #[serde(default, deserialize_with = "null_as_default", rename(deserialize = "NavigationItems"))]
    pub items: Vec<NavigationItem>,
    #[serde(default)]
    pub nav_button: Option<NavButton>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NavigationItem {
    #[serde(default, deserialize_with = "null_as_default")]
    pub label: String,
    #[serde(default, deserialize_with = "null_as_default", rename(deserialize = "URL"))]
    pub url: String,
    #[serde(default, deserialize_with = "null_as_default", rename(deserialize = "Order"))]
    pub order: i32,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NavButton {
    #[serde(default, deserialize_with = "null_as_default", rename(deserialize = "ButtonText"))]
    pub text: String,
    #[serde(default, deserialize_with = "null_as_default", rename(deserialize = "buttonURL"))]
    pub url: String,
    #[serde(default, rename(deserialize = "openInNewTab"))]
    pub open_in_new_tab: Option<bool>,
}

impl NormalizeMedia for Navigation {
    fn normalize_media(&mut self, base_url: &str) {
        self.logo_image.normalize_media(base_url);
    }
}

/// Home page banner
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all(deserialize = "camelCase"))]
pub struct Hero {
    #[serde(default, deserialize_with = "null_as_default")]
    pub title: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub description: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub button_text: String,
    #[serde(default)]
    pub background_image: Option<Media>,
}

impl NormalizeMedia for Hero {
    fn normalize_media(&mut self, base_url: &str) {
        self.background_image.normalize_media(base_url);
    }
}

/// Opening hours and newsletter form copy
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all(deserialize = "camelCase"))]
pub struct Footer {
    #[serde(default)]
    pub schedule_block: Option<ScheduleBlock>,
    #[serde(default)]
    pub form_block: Option<FormBlock>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all(deserialize = "camelCase"))]
pub struct ScheduleBlock {
    #[serde(default, deserialize_with = "null_as_default")]
    pub left_title_label: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub right_title_label: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub schedule: Vec<ScheduleEntry>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ScheduleEntry {
    #[serde(default, deserialize_with = "null_as_default")]
    pub day: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub hours: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all(deserialize = "camelCase"))]
pub struct FormBlock {
    #[serde(default, deserialize_with = "null_as_default")]
    pub title: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub description: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub submit_text: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub privacy_notice: String,
}
