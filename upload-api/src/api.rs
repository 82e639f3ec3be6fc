use crate::errors::UploadApiError;
use crate::metrics_defs::UPLOAD_DURATION;
use crate::multipart::read_upload_form;
use crate::pipeline::UploadPipeline;
use axum::extract::{DefaultBodyLimit, Multipart, State};
use axum::routing::post;
use axum::{Json, Router};
use letter_store::UploadedWord;
use shared::histogram;
use std::sync::Arc;
use std::time::Instant;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

pub const UPLOAD_PATH: &str = "/api/upload";

/// Builds the public router: the upload endpoint plus, when a directory is
/// given, static files for every other path.
pub fn build_router(
    pipeline: Arc<UploadPipeline>,
    static_dir: Option<&str>,
    max_upload_bytes: usize,
) -> Router {
    let router = Router::new()
        .route(UPLOAD_PATH, post(upload_handler))
        .layer(DefaultBodyLimit::max(max_upload_bytes))
        .with_state(pipeline);

    let router = match static_dir {
        Some(dir) => router.fallback_service(ServeDir::new(dir)),
        None => router,
    };

    router.layer(TraceLayer::new_for_http())
}

async fn upload_handler(
    State(pipeline): State<Arc<UploadPipeline>>,
    multipart: Multipart,
) -> Result<Json<Vec<UploadedWord>>, UploadApiError> {
    let start = Instant::now();

    let items = read_upload_form(multipart).await?;
    let received = items.len();
    let recorded = pipeline.handle(items).await;

    tracing::info!(received, recorded = recorded.len(), "Upload processed");
    histogram!(UPLOAD_DURATION).record(start.elapsed().as_secs_f64());

    Ok(Json(recorded))
}
