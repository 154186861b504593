//! Fixed-window request throttling keyed by client address.

pub mod middleware;
pub mod models;
pub mod services;

pub use middleware::{client_identifier, rate_limit_middleware, ClientIp, RateLimitGuard};
pub use models::RateLimitPolicy;
pub use services::{spawn_sweeper, RateLimitStore};
