use anyhow::Result;
use country_api::config::AppConfig;
use country_api::server::ServerBuilder;
use country_api::storage;
use tracing_subscriber::EnvFilter;

const DEFAULT_LOG_FILTER: &str = "country_api=info,tower_http=info";

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER)),
        )
        .init();

    let config = AppConfig::load()?;
    let store = storage::connect(&config.storage).await?;

    tracing::info!(
        backend = store.backend_name(),
        patch_visibility = ?config.repository.patch_visibility,
        "country store connected"
    );

    ServerBuilder::new()
        .with_shared_store(store)
        .with_repository_config(config.repository)
        .serve(&config.server.bind_addr)
        .await
}
