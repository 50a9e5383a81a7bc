//! HTTP server assembly for Scrivener

mod cors;
mod health;

use std::{net::SocketAddr, sync::Arc};

use anyhow::Context;
use axum::Router;
use http::StatusCode;
use scrivener_config::Config;
use scrivener_core::{Diagnostics, Failure};
use scrivener_keystore::KeyStore;
use tower_http::{services::ServeDir, trace::TraceLayer};

/// Assembled server with all routes and middleware
pub struct Server {
    router: Router,
    listen_address: SocketAddr,
}

impl Server {
    /// Build the server from configuration
    ///
    /// # Errors
    ///
    /// Returns an error if the upload directories cannot be created
    pub fn new(config: &Config) -> anyhow::Result<Self> {
        std::fs::create_dir_all(&config.storage.uploads_dir).with_context(|| {
            format!(
                "failed to create uploads directory {}",
                config.storage.uploads_dir.display()
            )
        })?;

        let diagnostics = Diagnostics::new(config.server.environment.exposes_details());
        let keystore = KeyStore::from_config(&config.storage);

        let transcriber = stt::build_transcriber(config, Arc::clone(&keystore));
        let engine = merge::build_engine(config, Arc::clone(&keystore));
        let pipeline = Arc::new(dictation::Pipeline::new(config, transcriber, engine));

        let api = Router::new()
            .merge(dictation::endpoint_router(pipeline))
            .merge(preview::endpoint_router())
            .merge(scrivener_keystore::endpoint_router(keystore, diagnostics));

        let mut app = Router::new();

        // Health check
        if config.server.health.enabled {
            app = app.route(&config.server.health.path, axum::routing::get(health::health_handler));
        }

        // API routes, mounted under the configured prefix
        let prefix = config.server.path_prefix.trim_end_matches('/');
        app = if prefix.is_empty() { app.merge(api) } else { app.nest(prefix, api) };

        // Kept recordings
        if let Some(dir) = &config.storage.recordings_dir {
            std::fs::create_dir_all(dir)
                .with_context(|| format!("failed to create recordings directory {}", dir.display()))?;
            app = app.nest_service("/uploads", ServeDir::new(dir));
        }

        app = app.fallback(not_found);

        // Tracing
        app = app.layer(TraceLayer::new_for_http());

        // CORS
        if let Some(ref cors_config) = config.server.cors {
            app = app.layer(cors::cors_layer(cors_config));
        }

        tracing::debug!(prefix = %config.server.path_prefix, "routes assembled");

        Ok(Self {
            router: app,
            listen_address: config.server.listen_address,
        })
    }

    /// Get the configured listen address
    #[must_use]
    pub const fn listen_address(&self) -> SocketAddr {
        self.listen_address
    }

    /// Consume the server and return the inner router
    ///
    /// Useful for testing when the caller manages the listener
    pub fn into_router(self) -> Router {
        self.router
    }

    /// Start serving requests
    ///
    /// Blocks until the cancellation token is triggered.
    ///
    /// # Errors
    ///
    /// Returns an error if binding the TCP listener or serving fails
    pub async fn serve(self, shutdown: tokio_util::sync::CancellationToken) -> anyhow::Result<()> {
        let listener = tokio::net::TcpListener::bind(self.listen_address).await?;
        let local_addr = listener.local_addr()?;
        tracing::info!(%local_addr, "server listening");

        axum::serve(listener, self.router)
            .with_graceful_shutdown(async move {
                shutdown.cancelled().await;
                tracing::info!("graceful shutdown initiated");
            })
            .await?;

        Ok(())
    }
}

async fn not_found() -> Failure {
    Failure::new(StatusCode::NOT_FOUND, "not_found", "Route not found")
}
