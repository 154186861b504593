use std::sync::Arc;

use axum::{routing::get, Router};

use crate::features::pages::handlers;
use crate::features::pages::PagesState;

/// Create routes for the server-rendered pages
///
/// The slug route is a catch-all; merge it after every other router.
pub fn routes(state: Arc<PagesState>) -> Router {
    Router::new()
        .route("/", get(handlers::home_page))
        .route("/{*slug}", get(handlers::cms_page))
        .with_state(state)
}
