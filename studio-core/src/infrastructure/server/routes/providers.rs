use super::super::dto::{ProviderListResponse, ProviderSummary};
use super::super::state::ServerState;
use axum::Json;
use axum::extract::State;
use std::sync::Arc;
use tracing::debug;

#[utoipa::path(
    get,
    path = "/api/providers",
    tag = "providers",
    responses(
        (status = 200, description = "Configured providers and their availability", body = ProviderListResponse)
    )
)]
pub async fn providers_handler(State(state): State<Arc<ServerState>>) -> Json<ProviderListResponse> {
    let router = state.router();
    let providers: Vec<ProviderSummary> = router
        .registry()
        .iter()
        .map(ProviderSummary::from)
        .collect();
    debug!(provider_count = providers.len(), "Serving /api/providers request");
    Json(ProviderListResponse { providers })
}
