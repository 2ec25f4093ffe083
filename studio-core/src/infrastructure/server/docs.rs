use super::dto::{
    ChatRequest, ErrorResponse, GamedevRequest, GenerateIdeasRequest, GenerateImageRequest,
    HealthResponse, ProviderListResponse, ProviderSummary, RefineContentRequest,
    SummarizeRequest, TaskResponse,
};
use super::routes;
use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
    info(title = "Content Studio Router", description = "Multi-provider AI routing for content generation"),
    paths(
        routes::health::root_handler,
        routes::health::health_handler,
        routes::providers::providers_handler,
        routes::tasks::summarize_handler,
        routes::tasks::generate_ideas_handler,
        routes::tasks::refine_content_handler,
        routes::tasks::chat_handler,
        routes::tasks::generate_image_handler,
        routes::tasks::gamedev_handler,
        routes::stream::summarize_stream_handler,
        routes::stream::generate_ideas_stream_handler,
        routes::stream::refine_content_stream_handler,
        routes::stream::chat_stream_handler,
        routes::stream::gamedev_stream_handler
    ),
    components(
        schemas(
            TaskResponse,
            ErrorResponse,
            HealthResponse,
            ProviderSummary,
            ProviderListResponse,
            SummarizeRequest,
            GenerateIdeasRequest,
            RefineContentRequest,
            ChatRequest,
            GenerateImageRequest,
            GamedevRequest
        )
    ),
    tags(
        (name = "health", description = "Liveness checks"),
        (name = "providers", description = "Configured upstream providers"),
        (name = "tasks", description = "Content generation tasks"),
        (name = "gamedev", description = "Game development assistants"),
        (name = "streaming", description = "Text tasks streamed as server-sent events")
    )
)]
pub(super) struct ApiDoc;
