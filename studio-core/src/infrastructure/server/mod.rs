mod docs;
mod dto;
mod error;
mod rate_limit;
mod router;
mod routes;
mod state;

pub use dto::{
    ErrorResponse, HealthResponse, ProviderListResponse, ProviderSummary, StreamFrame,
    TaskResponse,
};
pub use error::{ServerError, status_for};
pub use rate_limit::{RateDecision, RateLimiter};

use crate::application::router::ProviderRouter;
use crate::config::ServerSettings;
use std::future::Future;
use std::sync::Arc;
use tokio::net::TcpListener;

/// Bind `settings.bind` and serve until Ctrl-C.
pub async fn serve(router: Arc<ProviderRouter>, settings: &ServerSettings) -> Result<(), ServerError> {
    router::serve(router, settings).await
}

/// Serve on an already bound listener until `shutdown` resolves.
pub async fn serve_with_shutdown<F>(
    router: Arc<ProviderRouter>,
    settings: &ServerSettings,
    listener: TcpListener,
    shutdown: F,
) -> Result<(), ServerError>
where
    F: Future<Output = ()> + Send + 'static,
{
    router::serve_listener(router, settings, listener, shutdown).await
}
