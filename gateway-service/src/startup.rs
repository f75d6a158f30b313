//! Application startup and lifecycle management.

use crate::config::GatewayConfig;
use crate::handlers;
use crate::services::providers::gemini::{GeminiConfig, GeminiTextProvider};
use crate::services::providers::TextProvider;
use axum::{
    routing::{get, post},
    Router,
};
use service_core::error::AppError;
use std::net::{IpAddr, SocketAddr};
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio::signal;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

/// Shared application state. The Model Client is an injected dependency,
/// so tests can swap in a scripted double.
#[derive(Clone)]
pub struct AppState {
    pub config: GatewayConfig,
    pub provider: Arc<dyn TextProvider>,
}

pub struct Application {
    port: u16,
    listener: TcpListener,
    router: Router,
}

impl Application {
    /// Build the application against the real Gemini backend.
    pub async fn build(config: GatewayConfig) -> Result<Self, AppError> {
        let gemini = GeminiTextProvider::new(GeminiConfig {
            api_key: config.google.api_key.clone(),
            model: config.model.name.clone(),
            temperature: config.model.temperature,
        })
        .map_err(|e| AppError::Internal(format!("Failed to build Gemini client: {}", e)))?;

        tracing::info!(model = %config.model.name, "Initialized Gemini text provider");

        Self::build_with_provider(config, Arc::new(gemini)).await
    }

    /// Build the application with an explicit provider (used by tests).
    pub async fn build_with_provider(
        config: GatewayConfig,
        provider: Arc<dyn TextProvider>,
    ) -> Result<Self, AppError> {
        tokio::fs::create_dir_all(&config.storage.upload_path)
            .await
            .map_err(|e| {
                tracing::error!(
                    "Failed to create upload directory {}: {}",
                    config.storage.upload_path,
                    e
                );
                AppError::from(e)
            })?;

        let state = AppState {
            config: config.clone(),
            provider,
        };

        let router = Router::new()
            .route("/health", get(handlers::health_check))
            .route("/generate-text", post(handlers::generate_text))
            .route("/generate-from-image", post(handlers::generate_from_image))
            .route(
                "/generate-from-document",
                post(handlers::generate_from_document),
            )
            .route("/generate-from-audio", post(handlers::generate_from_audio))
            .layer(TraceLayer::new_for_http())
            .layer(CorsLayer::permissive())
            .with_state(state);

        let host: IpAddr = config.common.host.parse().map_err(|e| {
            AppError::ConfigError(anyhow::anyhow!(
                "Invalid bind host {}: {}",
                config.common.host,
                e
            ))
        })?;

        // Port 0 gives a random port for testing.
        let addr = SocketAddr::new(host, config.common.port);
        let listener = TcpListener::bind(addr).await.map_err(|e| {
            tracing::error!("Failed to bind TCP listener to {}: {}", addr, e);
            AppError::from(e)
        })?;
        let port = listener.local_addr().map_err(AppError::from)?.port();

        tracing::info!("Listening on {}", port);

        Ok(Self {
            port,
            listener,
            router,
        })
    }

    /// Get the port the server is listening on.
    pub fn port(&self) -> u16 {
        self.port
    }

    /// Run the application until a shutdown signal arrives.
    pub async fn run_until_stopped(self) -> std::io::Result<()> {
        axum::serve(self.listener, self.router)
            .with_graceful_shutdown(shutdown_signal())
            .await
    }
}

async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received");
}
