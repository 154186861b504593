//! Contact form feature for the public site.
//!
//! ## Endpoints
//!
//! | Method | Endpoint | Auth | Description |
//! |--------|----------|------|-------------|
//! | POST | `/api/contact` | No | Submit a contact message (5 per 15 minutes per client) |

pub mod dtos;
pub mod handlers;
pub mod models;
pub mod routes;
pub mod services;

pub use services::{ContactNotifier, ContactService, SmtpNotifier, TracingNotifier};
