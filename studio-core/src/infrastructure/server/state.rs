use super::rate_limit::RateLimiter;
use crate::application::router::ProviderRouter;
use std::sync::Arc;

pub(crate) struct ServerState {
    router: Arc<ProviderRouter>,
    limiter: RateLimiter,
}

impl ServerState {
    pub(crate) fn new(router: Arc<ProviderRouter>, limiter: RateLimiter) -> Self {
        Self { router, limiter }
    }

    pub(crate) fn router(&self) -> Arc<ProviderRouter> {
        Arc::clone(&self.router)
    }

    pub(crate) fn limiter(&self) -> &RateLimiter {
        &self.limiter
    }
}
