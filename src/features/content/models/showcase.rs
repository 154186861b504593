use serde::{Deserialize, Deserializer, Serialize};

use super::CarouselButtons;
use crate::modules::cms::{null_as_default, Media, NormalizeMedia};
use crate::shared::rich_text::RichText;

// =============================================================================
// TEAM
// =============================================================================

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all(deserialize = "camelCase"))]
pub struct TeamSection {
    #[serde(default, deserialize_with = "null_as_default", rename(deserialize = "Title"))]
    pub title: String,
    #[serde(default, deserialize_with = "null_as_default", rename(deserialize = "Description"))]
    pub description: String,
    #[serde(default, deserialize_with = "null_as_default", rename(deserialize = "TeamMember"))]
    pub members: Vec<TeamMember>,
    #[serde(default, rename(deserialize = "CalendarIcon"))]
    pub calendar_icon: Option<Media>,
    #[serde(default, rename(deserialize = "ScheduleIcon"))]
    pub schedule_icon: Option<Media>,
    #[serde(default)]
    pub carousel_buttons: Option<CarouselButtons>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TeamMember {
    #[serde(default, deserialize_with = "null_as_default", rename(deserialize = "Name"))]
    pub name: String,
    #[serde(default, deserialize_with = "null_as_default", rename(deserialize = "Role"))]
    pub role: String,
    #[serde(default, rename(deserialize = "TeamMemberImage"))]
    pub image: Option<Media>,
    #[serde(default, rename(deserialize = "Availability"))]
    pub availability: RichText,
    #[serde(default, deserialize_with = "null_as_default", rename(deserialize = "Schedule"))]
    pub schedule: String,
    #[serde(default, deserialize_with = "null_as_default", rename(deserialize = "Order"))]
    pub order: i32,
}

impl TeamSection {
    pub fn sort_members(&mut self) {
        self.members.sort_by_key(|member| member.order);
    }
}

impl NormalizeMedia for TeamSection {
    fn normalize_media(&mut self, base_url: &str) {
        for member in &mut self.members {
            member.image.normalize_media(base_url);
        }
        self.calendar_icon.normalize_media(base_url);
        self.schedule_icon.normalize_media(base_url);
        self.carousel_buttons.normalize_media(base_url);
    }
}

// =============================================================================
// PRODUCTS
// =============================================================================

/// Featured product line with its call-to-action
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProductSection {
    #[serde(default, deserialize_with = "null_as_default", rename(deserialize = "Title"))]
    pub title: String,
    #[serde(default, rename(deserialize = "Description"))]
    pub description: RichText,
    #[serde(default, deserialize_with = "null_as_default", rename(deserialize = "ButtonText"))]
    pub button_text: String,
    #[serde(default, rename(deserialize = "ButtonURL"))]
    pub button_url: Option<String>,
    #[serde(default, rename(deserialize = "ButtonIcon"))]
    pub button_icon: Option<Media>,
    #[serde(default, rename(deserialize = "ProductLogo"))]
    pub logo: Option<Media>,
    #[serde(default, rename(deserialize = "ProductImage"))]
    pub image: Option<Media>,
}

impl NormalizeMedia for ProductSection {
    fn normalize_media(&mut self, base_url: &str) {
        self.button_icon.normalize_media(base_url);
        self.logo.normalize_media(base_url);
        self.image.normalize_media(base_url);
    }
}

// =============================================================================
// WELCOME
// =============================================================================

/// Intro for first-time visitors plus the items fetched from `welcome-items`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct WelcomeSection {
    #[serde(default, deserialize_with = "null_as_default")]
    pub title: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub description: String,
    #[serde(default, skip_deserializing)]
    pub items: Vec<WelcomeItem>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct WelcomeItem {
    #[serde(default, deserialize_with = "null_as_default")]
    pub title: String,
    #[serde(default)]
    pub description: RichText,
    #[serde(default)]
    pub icon: Option<Media>,
}

impl NormalizeMedia for WelcomeSection {
    fn normalize_media(&mut self, base_url: &str) {
        for item in &mut self.items {
            item.icon.normalize_media(base_url);
            item.description.normalize_media(base_url);
        }
    }
}

// =============================================================================
// BEFORE / AFTER
// =============================================================================

const BEFORE_AFTER_TITLE: &str = "VOOR & NA";
const BEFORE_AFTER_FILTERS: [&str; 4] = ["All", "Kleuringen", "Stylen", "Knippen"];

/// Filterable gallery of before/after photos
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all(deserialize = "camelCase"))]
pub struct BeforeAfterSection {
    #[serde(default, deserialize_with = "null_as_default", rename(deserialize = "Title"))]
    pub title: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub before_after_items: Vec<BeforeAfterItem>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub filter_options: Vec<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub enable_zoom: bool,
    #[serde(default)]
    pub carousel_buttons: Option<CarouselButtons>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all(deserialize = "camelCase"))]
pub struct BeforeAfterItem {
    #[serde(default, deserialize_with = "null_as_default")]
    pub category: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub title: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub description: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub benefits: Vec<String>,
    #[serde(default)]
    pub before_after_image: Option<Media>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub order: i32,
    #[serde(default = "active_by_default", deserialize_with = "null_as_active")]
    pub is_active: bool,
}

fn active_by_default() -> bool {
    true
}

fn null_as_active<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    Option::<bool>::deserialize(deserializer).map(|value| value.unwrap_or(true))
}

impl BeforeAfterSection {
    /// Fill the copy editors usually leave empty
    pub fn apply_defaults(&mut self) {
        if self.title.trim().is_empty() {
            self.title = BEFORE_AFTER_TITLE.to_string();
        }
        if self.filter_options.is_empty() {
            self.filter_options = BEFORE_AFTER_FILTERS.iter().map(|f| f.to_string()).collect();
        }
        self.before_after_items.sort_by_key(|item| item.order);
    }
}

impl NormalizeMedia for BeforeAfterSection {
    fn normalize_media(&mut self, base_url: &str) {
        for item in &mut self.before_after_items {
            item.before_after_image.normalize_media(base_url);
        }
        self.carousel_buttons.normalize_media(base_url);
    }
}
