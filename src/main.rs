use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Context;
use tokio::net::TcpListener;

use skopun::application::ports::{BlobStore, TranscriptRepository};
use skopun::application::services::TranscriptionPipeline;
use skopun::infrastructure::drive::GoogleDriveStore;
use skopun::infrastructure::media::FfmpegMediaTool;
use skopun::infrastructure::observability::{TracingConfig, init_tracing};
use skopun::infrastructure::persistence::{
    InMemoryTranscriptRepository, PgTranscriptRepository, create_pool,
};
use skopun::infrastructure::providers::ProviderFactory;
use skopun::presentation::{AppState, Settings, create_router};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let settings = Settings::from_env().context("failed to load configuration")?;

    let tracing_config = TracingConfig {
        environment: settings.environment.to_string(),
        ..TracingConfig::default()
    };
    init_tracing(tracing_config, settings.server.port);

    let media_tool = Arc::new(FfmpegMediaTool::new(settings.pipeline.tool_timeout()));

    let provider = ProviderFactory::create(
        settings.provider.kind,
        settings.provider.api_key.clone(),
        settings.provider.base_url.clone(),
        settings.provider.model.clone(),
        settings.pipeline.provider_timeout(),
    );
    tracing::info!(provider = provider.name(), "transcription provider ready");

    let repository: Arc<dyn TranscriptRepository> = match &settings.database {
        Some(db) => {
            let pool = create_pool(&db.url, db.max_connections)
                .await
                .context("failed to connect to Postgres")?;
            let repo = PgTranscriptRepository::new(pool);
            repo.ensure_schema()
                .await
                .context("failed to prepare transcripts table")?;
            Arc::new(repo)
        }
        None => {
            tracing::warn!("DATABASE_URL not set, transcripts are kept in memory only");
            Arc::new(InMemoryTranscriptRepository::new())
        }
    };

    let blob_store: Option<Arc<dyn BlobStore>> = settings.drive.as_ref().map(|drive| {
        Arc::new(GoogleDriveStore::new(
            drive.access_token.clone(),
            settings.pipeline.provider_timeout(),
        )) as Arc<dyn BlobStore>
    });

    let pipeline = Arc::new(TranscriptionPipeline::new(
        Arc::clone(&media_tool),
        Arc::clone(&repository),
        settings.pipeline.clone(),
        settings.workspace_dir.clone(),
    ));

    let state = AppState {
        pipeline,
        provider,
        transcript_repository: repository,
        blob_store,
        drive_folder_id: settings
            .drive
            .as_ref()
            .and_then(|drive| drive.folder_id.clone()),
    };

    let router = create_router(state);

    let addr: SocketAddr = format!("{}:{}", settings.server.host, settings.server.port)
        .parse()
        .context("invalid server address")?;
    tracing::info!("Listening on {}", addr);

    let listener = TcpListener::bind(addr).await?;
    axum::serve(listener, router).await?;

    Ok(())
}
