use std::sync::Arc;
use std::time::Duration;

use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;

use super::clock::{Clock, SystemClock};
use crate::features::rate_limits::models::{
    rate_limit::window_millis, RateLimitDecision, RateLimitEntry,
};

/// In-process fixed-window counters keyed by client identifier
pub struct RateLimitStore {
    entries: DashMap<String, RateLimitEntry>,
    clock: Arc<dyn Clock>,
}

impl Default for RateLimitStore {
    fn default() -> Self {
        Self::new()
    }
}

impl RateLimitStore {
    pub fn new() -> Self {
        Self::with_clock(Arc::new(SystemClock))
    }

    pub fn with_clock(clock: Arc<dyn Clock>) -> Self {
        Self {
            entries: DashMap::new(),
            clock,
        }
    }

    pub fn now_millis(&self) -> i64 {
        self.clock.now_millis()
    }

    /// Count one request for `identifier` and decide whether it is allowed
    pub fn check(
        &self,
        identifier: &str,
        max_requests: u32,
        window: Duration,
    ) -> RateLimitDecision {
        let now = self.clock.now_millis();
        let window_ms = window_millis(window);

        if max_requests == 0 {
            return RateLimitDecision {
                limited: true,
                remaining: 0,
                reset_time: now.saturating_add(window_ms),
            };
        }

        // The entry guard holds the shard lock for the whole read-modify-write
        match self.entries.entry(identifier.to_string()) {
            Entry::Vacant(vacant) => {
                let entry = vacant.insert(RateLimitEntry::open(now, window_ms));
                RateLimitDecision {
                    limited: false,
                    remaining: max_requests - 1,
                    reset_time: entry.reset_time,
                }
            }
            Entry::Occupied(mut occupied) => {
                let entry = occupied.get_mut();

                if entry.is_expired(now) {
                    *entry = RateLimitEntry::open(now, window_ms);
                    return RateLimitDecision {
                        limited: false,
                        remaining: max_requests - 1,
                        reset_time: entry.reset_time,
                    };
                }

                if entry.count >= max_requests {
                    return RateLimitDecision {
                        limited: true,
                        remaining: 0,
                        reset_time: entry.reset_time,
                    };
                }

                entry.count += 1;
                RateLimitDecision {
                    limited: false,
                    remaining: max_requests - entry.count,
                    reset_time: entry.reset_time,
                }
            }
        }
    }

    /// Drop every entry whose window has passed
    pub fn sweep(&self) -> usize {
        if self.is_empty() {
            return 0;
        }

        let now = self.clock.now_millis();
        let mut removed = 0;
        self.entries.retain(|_, entry| {
            let keep = !entry.is_expired(now);
            if !keep {
                removed += 1;
            }
            keep
        });
        removed
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Run [`RateLimitStore::sweep`] on a fixed interval until the task is aborted
pub fn spawn_sweeper(store: Arc<RateLimitStore>, interval: Duration) -> JoinHandle<()> {
    let interval = interval.max(Duration::from_millis(1));

    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        // First tick completes immediately
        ticker.tick().await;

        loop {
            ticker.tick().await;
            let removed = store.sweep();
            if removed > 0 {
                tracing::debug!(
                    "Swept {} expired rate limit entries, {} remaining",
                    removed,
                    store.len()
                );
            }
        }
    })
}
