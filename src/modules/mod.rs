//! Modules layer - Infrastructure components for external integrations
//!
//! Contains clients and adapters for external services like the headless CMS.

pub mod cms;
