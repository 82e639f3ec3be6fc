pub mod api;
pub mod config;
pub mod errors;
mod locks;
pub mod metrics_defs;
pub mod multipart;
pub mod naming;
pub mod object_store;
pub mod pipeline;

#[cfg(test)]
mod testutils;

use errors::UploadApiError;
use letter_store::PersistenceGateway;
use metrics_defs::LETTER_DOCUMENTS;
use naming::TitleCase;
use pipeline::UploadPipeline;
use shared::admin_service::AdminService;
use shared::gauge;
use shared::http::run_http_service;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use tokio::net::TcpListener;

pub async fn run(config: config::Config) -> Result<(), UploadApiError> {
    config.validate()?;

    let letters = config.document_store.build();
    let assets = config.object_store.build()?;
    let pipeline = Arc::new(UploadPipeline::new(
        assets,
        letters.clone(),
        Arc::new(TitleCase),
    ));

    // Flipped once the document store answered and the API listener is bound.
    let ready = Arc::new(AtomicBool::new(false));

    let admin_ready = ready.clone();
    let admin_service: AdminService<_, UploadApiError> =
        AdminService::new(move || admin_ready.load(Ordering::Relaxed));
    let admin_task = run_http_service(
        &config.admin_listener.host,
        config.admin_listener.port,
        admin_service,
    );

    let api_task = serve_api(&config, pipeline, letters, ready);

    tokio::try_join!(api_task, admin_task)?;
    Ok(())
}

async fn serve_api(
    config: &config::Config,
    pipeline: Arc<UploadPipeline>,
    letters: Arc<dyn PersistenceGateway>,
    ready: Arc<AtomicBool>,
) -> Result<(), UploadApiError> {
    probe_document_store(letters.as_ref()).await?;

    let app = api::build_router(
        pipeline,
        config.static_dir.as_deref(),
        config.max_upload_bytes,
    );

    let listener = TcpListener::bind(config.listener.address()).await?;
    tracing::info!(address = %config.listener.address(), "Upload API listening");
    ready.store(true, Ordering::Relaxed);

    axum::serve(listener, app).await?;
    Ok(())
}

/// Counts the stored letter documents; a store that cannot be read aborts startup.
async fn probe_document_store(letters: &dyn PersistenceGateway) -> Result<usize, UploadApiError> {
    let existing = letters.count().await?;
    gauge!(LETTER_DOCUMENTS).set(existing as f64);
    tracing::info!(existing, "Connected to document store");
    Ok(existing)
}
