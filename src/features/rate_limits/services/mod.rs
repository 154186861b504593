pub mod clock;
pub mod rate_limit_store;

pub use clock::{Clock, SystemClock};
pub use rate_limit_store::{spawn_sweeper, RateLimitStore};

#[cfg(test)]
pub use clock::ManualClock;
