//! ServerBuilder for fluent API to build HTTP servers

use super::handlers::AppState;
use super::router::{build_country_routes, health_routes};
use crate::core::repository::{CountryRepository, RepositoryConfig};
use crate::core::store::CountryStore;
use anyhow::Result;
use axum::Router;
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;

/// Builder for the country API router
///
/// # Example
///
/// ```ignore
/// let app = ServerBuilder::new()
///     .with_store(InMemoryCountryStore::new())
///     .build()?;
/// ```
pub struct ServerBuilder {
    store: Option<Arc<dyn CountryStore>>,
    repository_config: RepositoryConfig,
}

impl ServerBuilder {
    /// Create a new ServerBuilder
    pub fn new() -> Self {
        Self {
            store: None,
            repository_config: RepositoryConfig::default(),
        }
    }

    /// Set the country store (required)
    pub fn with_store(self, store: impl CountryStore + 'static) -> Self {
        self.with_shared_store(Arc::new(store))
    }

    /// Set an already shared country store
    pub fn with_shared_store(mut self, store: Arc<dyn CountryStore>) -> Self {
        self.store = Some(store);
        self
    }

    /// Set repository behavior (patch visibility)
    pub fn with_repository_config(mut self, config: RepositoryConfig) -> Self {
        self.repository_config = config;
        self
    }

    /// Build the repository the handlers will share
    pub fn build_repository(&mut self) -> Result<CountryRepository> {
        let store = self
            .store
            .take()
            .ok_or_else(|| anyhow::anyhow!("CountryStore is required. Call .with_store()"))?;

        Ok(CountryRepository::with_config(store, self.repository_config))
    }

    /// Build the final router: country and health routes wrapped in a
    /// request tracing layer.
    pub fn build(mut self) -> Result<Router> {
        let repository = self.build_repository()?;
        tracing::debug!(
            patch_visibility = ?repository.config().patch_visibility,
            "building country router"
        );

        let app = health_routes().merge(build_country_routes(AppState { repository }));
        Ok(app.layer(TraceLayer::new_for_http()))
    }

    /// Serve the application with graceful shutdown
    ///
    /// This will:
    /// - Bind to the provided address
    /// - Start serving requests
    /// - Handle SIGTERM and SIGINT (Ctrl+C) for graceful shutdown
    ///
    /// # Example
    ///
    /// ```ignore
    /// ServerBuilder::new()
    ///     .with_store(store)
    ///     .serve("127.0.0.1:5000").await?;
    /// ```
    pub async fn serve(self, addr: &str) -> Result<()> {
        let app = self.build()?;
        let listener = TcpListener::bind(addr).await?;

        tracing::info!("Server listening on {}", addr);

        axum::serve(listener, app)
            .with_graceful_shutdown(shutdown_signal())
            .await?;

        tracing::info!("Server shutdown complete");
        Ok(())
    }
}

impl Default for ServerBuilder {
    fn default() -> Self {
        Self::new()
    }
}

async fn shutdown_signal() {
    use tokio::signal;

    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!("failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                tracing::error!("failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::info!("Received Ctrl+C signal, initiating graceful shutdown...");
        },
        _ = terminate => {
            tracing::info!("Received SIGTERM signal, initiating graceful shutdown...");
        },
    }
}
