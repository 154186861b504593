//! Server-rendered HTML pages.
//!
//! ## Endpoints
//!
//! | Method | Endpoint | Description |
//! |--------|----------|-------------|
//! | GET | `/` | Home page composed from all sections |
//! | GET | `/{*slug}` | Generic CMS page, 404 page when unknown |

pub mod handlers;
pub mod routes;

pub use handlers::PagesState;
