//! Headless CMS integration: query serialization, HTTP client and media URLs.

pub mod client;
pub mod error;
pub mod media;
pub mod query;

pub use client::CmsClient;
pub use error::CmsError;
pub use media::{media_list, normalize_with_fallback, null_as_default, Media, NormalizeMedia};
pub use query::{CmsQuery, Filter, Populate, Relation};
