use serde::{Deserialize, Serialize};

use crate::modules::cms::{null_as_default, Media, NormalizeMedia};

/// Icons of the previous/next carousel controls
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all(deserialize = "camelCase"))]
pub struct CarouselButtons {
    #[serde(default)]
    pub prev_active_icon: Option<Media>,
    #[serde(default)]
    pub prev_inactive_icon: Option<Media>,
    #[serde(default)]
    pub next_active_icon: Option<Media>,
    #[serde(default)]
    pub next_inactive_icon: Option<Media>,
}

impl CarouselButtons {
    /// Relation names requested for the four icons
    pub const ICON_FIELDS: [&'static str; 4] = [
        "prevActiveIcon",
        "prevInactiveIcon",
        "nextActiveIcon",
        "nextInactiveIcon",
    ];
}

impl NormalizeMedia for CarouselButtons {
    fn normalize_media(&mut self, base_url: &str) {
        self.prev_active_icon.normalize_media(base_url);
        self.prev_inactive_icon.normalize_media(base_url);
        self.next_active_icon.normalize_media(base_url);
        self.next_inactive_icon.normalize_media(base_url);
    }
}

// =============================================================================
// SERVICES
// =============================================================================

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all(deserialize = "camelCase"))]
pub struct ServicesSection {
    #[serde(default, deserialize_with = "null_as_default", rename(deserialize = "Title"))]
    pub title: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub services: Vec<Service>,
    #[serde(default)]
    pub carousel_buttons: Option<CarouselButtons>,
}

/// A price list (e.g. "Dames", "Heren")
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Service {
    #[serde(default, deserialize_with = "null_as_default", rename(deserialize = "Title"))]
    pub title: String,
    #[serde(default, deserialize_with = "null_as_default", rename(deserialize = "Order"))]
    pub order: i32,
    #[serde(default, deserialize_with = "null_as_default", rename(deserialize = "ServiceSection"))]
    pub categories: Vec<ServiceCategory>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ServiceCategory {
    #[serde(default, deserialize_with = "null_as_default", rename(deserialize = "Category"))]
    pub category: String,
    #[serde(default, deserialize_with = "null_as_default", rename(deserialize = "PriceLabel"))]
    pub price_label: String,
    #[serde(default, deserialize_with = "null_as_default", rename(deserialize = "ServiceItem"))]
    pub items: Vec<ServiceItem>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ServiceItem {
    #[serde(default, deserialize_with = "null_as_default", rename(deserialize = "Service"))]
    pub name: String,
    #[serde(default, deserialize_with = "null_as_default", rename(deserialize = "Price"))]
    pub price: String,
}

impl NormalizeMedia for ServicesSection {
    fn normalize_media(&mut self, base_url: &str) {
        self.carousel_buttons.normalize_media(base_url);
    }
}

// =============================================================================
// REVIEWS
// =============================================================================

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all(deserialize = "camelCase"))]
pub struct ReviewsSection {
    #[serde(default, deserialize_with = "null_as_default")]
    pub title: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub reviews: Vec<Review>,
    #[serde(default)]
    pub carousel_buttons: Option<CarouselButtons>,
    #[serde(default)]
    pub button: Option<SectionButton>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all(deserialize = "camelCase"))]
pub struct Review {
    #[serde(default, deserialize_with = "null_as_default")]
    pub customer_name: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub review_text: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub rating: u8,
    #[serde(default)]
    pub review_date: Option<String>,
    #[serde(default)]
    pub customer_avatar: Option<Media>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub order: i32,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SectionButton {
    #[serde(default, deserialize_with = "null_as_default")]
    pub text: String,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub icon: Option<Media>,
}

impl ReviewsSection {
    /// Stable sort by `order`, entries without one first
    pub fn sort_reviews(&mut self) {
        self.reviews.sort_by_key(|review| review.order);
    }
}

impl NormalizeMedia for ReviewsSection {
    fn normalize_media(&mut self, base_url: &str) {
        for review in &mut self.reviews {
            review.customer_avatar.normalize_media(base_url);
        }
        self.carousel_buttons.normalize_media(base_url);
        if let Some(button) = &mut self.button {
            button.icon.normalize_media(base_url);
        }
    }
}

// =============================================================================
// RESULTS
// =============================================================================

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ResultsSection {
    #[serde(default, deserialize_with = "null_as_default", rename(deserialize = "ResultCard"))]
    pub cards: Vec<ResultCard>,
}

/// Before/after showcase card
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ResultCard {
    #[serde(default, deserialize_with = "null_as_default", rename(deserialize = "Title"))]
    pub title: String,
    #[serde(default, deserialize_with = "null_as_default", rename(deserialize = "Description"))]
    pub description: String,
    #[serde(default, rename(deserialize = "CardImage"))]
    pub image: Option<Media>,
    #[serde(default, rename(deserialize = "ButtonText"))]
    pub button_text: Option<String>,
    #[serde(default, rename(deserialize = "ButtonURL"))]
    pub button_url: Option<String>,
    #[serde(default, deserialize_with = "null_as_default", rename(deserialize = "Order"))]
    pub order: i32,
}

impl NormalizeMedia for ResultsSection {
    fn normalize_media(&mut self, base_url: &str) {
        for card in &mut self.cards {
            card.image.normalize_media(base_url);
        }
    }
}

// =============================================================================
// CONTACT
// =============================================================================

/// Map embed plus the cards fetched from the `contact-cards` collection
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all(deserialize = "camelCase"))]
pub struct ContactSection {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub map_embed_url: Option<String>,
    #[serde(default, skip_deserializing)]
    pub cards: Vec<ContactCard>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ContactCard {
    #[serde(default, deserialize_with = "null_as_default")]
    pub title: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub content: Vec<String>,
    #[serde(default)]
    pub icon: Option<Media>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub order: i32,
}

impl NormalizeMedia for ContactSection {
    fn normalize_media(&mut self, base_url: &str) {
        for card in &mut self.cards {
            card.icon.normalize_media(base_url);
        }
    }
}
