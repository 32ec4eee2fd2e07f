//! Web server for Filedock.

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use tokio::net::TcpListener;
use tower_http::compression::CompressionLayer;

use crate::config::{SweepConfig, WebConfig};
use crate::registry::LifecycleAuthority;
use crate::storage::BlobStore;

use super::handlers::{AppState, SharedDatabase};
use super::middleware::JwtState;
use super::router::{create_health_router, create_router, create_swagger_router};

/// Web server for the API.
pub struct WebServer {
    /// Server address.
    addr: SocketAddr,
    /// Application state.
    app_state: Arc<AppState>,
    /// JWT state.
    jwt_state: Arc<JwtState>,
    /// Web configuration.
    web_config: WebConfig,
    /// Purge sweep configuration, if the in-process sweep should run.
    sweep_config: Option<SweepConfig>,
}

impl WebServer {
    /// Create a new web server.
    pub fn new(config: &WebConfig, db: SharedDatabase, blob_store: Arc<dyn BlobStore>) -> Self {
        let addr = format!("{}:{}", config.host, config.port)
            .parse()
            .expect("Invalid web server address");

        let app_state = Arc::new(AppState::new(db, blob_store));
        let jwt_state = Arc::new(JwtState::new(&config.jwt_secret));

        Self {
            addr,
            app_state,
            jwt_state,
            web_config: config.clone(),
            sweep_config: None,
        }
    }

    /// Enable the in-process purge sweep.
    pub fn with_sweep(mut self, config: SweepConfig) -> Self {
        self.sweep_config = Some(config);
        self
    }

    /// Get the server address.
    pub fn addr(&self) -> SocketAddr {
        self.addr
    }

    /// Start the purge sweep background task.
    ///
    /// Permanently removes soft-deleted files on the configured interval.
    /// Cadence is deployment policy; deployments that drive purging from an
    /// external scheduler disable this task.
    fn start_purge_sweep_task(db: SharedDatabase, config: SweepConfig) {
        if !config.enabled {
            tracing::info!("Purge sweep disabled by configuration");
            return;
        }

        tokio::spawn(async move {
            let period = Duration::from_secs(config.interval_secs.max(1));
            let mut interval = tokio::time::interval(period);

            // Skip the first immediate tick
            interval.tick().await;

            loop {
                interval.tick().await;

                let authority = LifecycleAuthority::new(db.pool());
                match authority.sweep().await {
                    Ok(purged) => {
                        if purged > 0 {
                            tracing::info!(purged, "Purge sweep completed");
                        } else {
                            tracing::debug!("Purge sweep found nothing to remove");
                        }
                    }
                    Err(e) => {
                        tracing::warn!(error = %e, "Purge sweep failed");
                    }
                }
            }
        });
    }

    fn build_router(&self) -> axum::Router {
        create_router(self.app_state.clone(), self.jwt_state.clone(), &self.web_config)
            .merge(create_health_router())
            .merge(create_swagger_router())
            .layer(CompressionLayer::new())
    }

    /// Run the web server.
    pub async fn run(self) -> Result<(), std::io::Error> {
        let router = self.build_router();
        let db = self.app_state.db.clone();

        let listener = TcpListener::bind(self.addr).await?;
        let local_addr = listener.local_addr()?;

        if let Some(sweep_config) = self.sweep_config.clone() {
            Self::start_purge_sweep_task(db, sweep_config);
        }

        tracing::info!("Web server listening on http://{}", local_addr);

        axum::serve(listener, router).await
    }

    /// Run the server and return the actual bound address.
    ///
    /// This is useful for testing when binding to port 0.
    pub async fn run_with_addr(self) -> Result<SocketAddr, std::io::Error> {
        let router = self.build_router();
        let db = self.app_state.db.clone();

        let listener = TcpListener::bind(self.addr).await?;
        let local_addr = listener.local_addr()?;

        if let Some(sweep_config) = self.sweep_config.clone() {
            Self::start_purge_sweep_task(db, sweep_config);
        }

        tracing::info!("Web server listening on http://{}", local_addr);

        tokio::spawn(async move {
            if let Err(e) = axum::serve(listener, router).await {
                tracing::error!("Web server error: {}", e);
            }
        });

        Ok(local_addr)
    }
}
