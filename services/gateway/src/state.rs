use crate::rate_limit::{RateLimitConfig, RateLimiter};
use contracts::Exchange;
use parking_lot::RwLock;
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    /// Single writer, many consistent readers
    pub exchange: Arc<RwLock<Exchange>>,
    pub rate_limiter: Arc<RateLimiter>,
}

impl AppState {
    pub fn new(exchange: Exchange, limits: RateLimitConfig) -> Self {
        Self {
            exchange: Arc::new(RwLock::new(exchange)),
            rate_limiter: Arc::new(RateLimiter::new(limits)),
        }
    }
}
