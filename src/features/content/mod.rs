//! CMS-backed site content: one fetch per page section.

pub mod models;
pub mod services;

pub use services::ContentService;
