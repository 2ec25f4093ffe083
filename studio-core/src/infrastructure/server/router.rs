use super::docs::ApiDoc;
use super::error::ServerError;
use super::rate_limit::{self, LIMIT_HEADER, REMAINING_HEADER, RESET_HEADER, RateLimiter};
use super::routes;
use super::state::ServerState;
use crate::application::router::ProviderRouter;
use crate::config::ServerSettings;
use axum::Router;
use axum::http::{HeaderName, HeaderValue, Method};
use axum::middleware;
use axum::routing::{get, post};
use std::future::Future;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::cors::{Any, CorsLayer};
use tracing::{info, warn};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

fn cors_layer(origins: &[String]) -> CorsLayer {
    let origins: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| match HeaderValue::from_str(origin) {
            Ok(value) => Some(value),
            Err(_) => {
                warn!(origin = origin.as_str(), "Ignoring invalid CORS origin");
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(origins)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers(Any)
        .expose_headers([
            HeaderName::from_static(LIMIT_HEADER),
            HeaderName::from_static(REMAINING_HEADER),
            HeaderName::from_static(RESET_HEADER),
        ])
}

pub(super) fn build_app(router: Arc<ProviderRouter>, settings: &ServerSettings) -> Router {
    let api = ApiDoc::openapi();
    let state = Arc::new(ServerState::new(
        router,
        RateLimiter::new(settings.rate_limit),
    ));

    let tasks = Router::new()
        .route("/api/summarize", post(routes::tasks::summarize_handler))
        .route("/api/generate-ideas", post(routes::tasks::generate_ideas_handler))
        .route("/api/refine-content", post(routes::tasks::refine_content_handler))
        .route("/api/chat", post(routes::tasks::chat_handler))
        .route("/api/generate-image", post(routes::tasks::generate_image_handler))
        .route("/api/gamedev/{kind}", post(routes::tasks::gamedev_handler))
        .route("/api/summarize/stream", post(routes::stream::summarize_stream_handler))
        .route(
            "/api/generate-ideas/stream",
            post(routes::stream::generate_ideas_stream_handler),
        )
        .route(
            "/api/refine-content/stream",
            post(routes::stream::refine_content_stream_handler),
        )
        .route("/api/chat/stream", post(routes::stream::chat_stream_handler))
        .route(
            "/api/gamedev/{kind}/stream",
            post(routes::stream::gamedev_stream_handler),
        )
        .route_layer(middleware::from_fn_with_state(
            Arc::clone(&state),
            rate_limit::enforce,
        ));

    Router::new()
        .merge(SwaggerUi::new("/docs").url("/api-doc/openapi.json", api))
        .route("/", get(routes::health::root_handler))
        .route("/health", get(routes::health::health_handler))
        .route("/api/providers", get(routes::providers::providers_handler))
        .merge(tasks)
        .layer(cors_layer(&settings.allowed_origins))
        .with_state(state)
}

pub(super) async fn serve_listener<F>(
    router: Arc<ProviderRouter>,
    settings: &ServerSettings,
    listener: TcpListener,
    shutdown: F,
) -> Result<(), ServerError>
where
    F: Future<Output = ()> + Send + 'static,
{
    let app = build_app(router, settings);
    if let Ok(addr) = listener.local_addr() {
        info!(%addr, "REST server ready to accept connections");
    }

    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(shutdown)
    .await
    .map_err(ServerError::Serve)
}

pub(super) async fn serve(
    router: Arc<ProviderRouter>,
    settings: &ServerSettings,
) -> Result<(), ServerError> {
    let addr = settings.bind;
    info!(%addr, "Binding REST server");

    let listener = TcpListener::bind(addr)
        .await
        .map_err(|source| ServerError::Bind { addr, source })?;

    serve_listener(router, settings, listener, async {
        if tokio::signal::ctrl_c().await.is_ok() {
            info!("Shutdown signal received");
        }
    })
    .await
}
