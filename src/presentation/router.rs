use axum::Router;
use axum::extract::DefaultBodyLimit;
use axum::middleware;
use axum::routing::{get, post};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer};
use tracing::Level;

use crate::application::ports::MediaTool;
use crate::infrastructure::observability::request_id_middleware;
use crate::presentation::handlers::{
    archive_transcript_handler, get_transcript_handler, health_handler, list_transcripts_handler,
    transcribe_handler,
};
use crate::presentation::state::AppState;

/// Uploads are raw audio files, so the default 2 MB body limit is far too small.
const MAX_UPLOAD_BYTES: usize = 512 * 1024 * 1024;

pub fn create_router<M>(state: AppState<M>) -> Router
where
    M: MediaTool + 'static,
{
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let trace_layer = TraceLayer::new_for_http()
        .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
        .on_response(DefaultOnResponse::new().level(Level::INFO));

    Router::new()
        .route("/health", get(health_handler))
        .route("/api/v1/transcriptions", post(transcribe_handler::<M>))
        .route("/api/v1/transcripts", get(list_transcripts_handler::<M>))
        .route(
            "/api/v1/transcripts/{transcript_id}",
            get(get_transcript_handler::<M>),
        )
        .route(
            "/api/v1/transcripts/{transcript_id}/archive",
            post(archive_transcript_handler::<M>),
        )
        .layer(DefaultBodyLimit::max(MAX_UPLOAD_BYTES))
        .layer(middleware::from_fn(request_id_middleware))
        .layer(trace_layer)
        .layer(cors)
        .with_state(state)
}
