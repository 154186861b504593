use std::sync::Arc;

use axum::{middleware, routing::post, Router};

use crate::features::contact::handlers;
use crate::features::contact::services::ContactService;
use crate::features::rate_limits::{rate_limit_middleware, RateLimitGuard};

/// Create routes for the contact feature
///
/// Every request to the endpoint counts against the guard's policy,
/// including rejected and honeypot submissions.
pub fn routes(service: Arc<ContactService>, guard: RateLimitGuard) -> Router {
    Router::new()
        .route("/api/contact", post(handlers::submit_contact_form))
        .route_layer(middleware::from_fn_with_state(guard, rate_limit_middleware))
        .with_state(service)
}
