//! Application startup and lifecycle management.

use crate::captioning::{Captioner, HuggingFaceCaptioner};
use crate::completion::{CompletionProvider, OpenAiClient};
use crate::config::AppConfig;
use crate::error::AppError;
use crate::handlers;
use crate::recommender::Recommender;
use crate::storage::UploadStore;
use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio::signal;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub recommender: Arc<Recommender>,
    pub store: UploadStore,
}

impl AppState {
    pub fn new(recommender: Recommender, store: UploadStore) -> Self {
        Self {
            recommender: Arc::new(recommender),
            store,
        }
    }
}

pub fn build_router(state: AppState, max_upload_bytes: usize) -> Router {
    Router::new()
        .route("/", get(handlers::index))
        .route("/health", get(handlers::health_check))
        .route("/upload", post(handlers::upload_image))
        .layer(DefaultBodyLimit::max(max_upload_bytes))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

pub struct Application {
    port: u16,
    listener: TcpListener,
    router: Router,
}

impl Application {
    /// Wire up the real captioning and completion backends and bind.
    pub async fn build(config: AppConfig) -> Result<Self, AppError> {
        let api_key = config.completion.api_key.clone().ok_or_else(|| {
            AppError::ConfigError(anyhow::anyhow!("completion API key is not set"))
        })?;

        let completion = OpenAiClient::new(&config.completion, api_key)
            .map_err(|e| AppError::ConfigError(anyhow::anyhow!("HTTP client: {}", e)))?;
        tracing::info!(
            model = %completion.model(),
            endpoint = %config.completion.endpoint,
            "Initialized completion client"
        );

        let captioner = HuggingFaceCaptioner::new(&config.captioner)
            .map_err(|e| AppError::ConfigError(anyhow::anyhow!("HTTP client: {}", e)))?;
        if config.captioner.api_token.is_none() {
            tracing::warn!("HF_API_TOKEN not set, caption requests are unauthenticated");
        }
        tracing::info!(
            base = %config.captioner.base_model,
            large = %config.captioner.large_model,
            "Initialized caption backend"
        );

        let captioner: Arc<dyn Captioner> = Arc::new(captioner);
        let completion: Arc<dyn CompletionProvider> = Arc::new(completion);

        Self::build_with(config, captioner, completion).await
    }

    /// Bind with caller-supplied backends.
    pub async fn build_with(
        config: AppConfig,
        captioner: Arc<dyn Captioner>,
        completion: Arc<dyn CompletionProvider>,
    ) -> Result<Self, AppError> {
        let store = UploadStore::new(&config.upload_dir).await.map_err(|e| {
            tracing::error!("Failed to create upload directory {}: {}", config.upload_dir, e);
            e
        })?;

        let state = AppState::new(Recommender::new(captioner, completion), store);
        let router = build_router(state, config.max_upload_bytes);

        let addr: SocketAddr = format!("{}:{}", config.host, config.port)
            .parse()
            .map_err(|e| AppError::ConfigError(anyhow::anyhow!("Invalid listen address: {}", e)))?;
        let listener = TcpListener::bind(addr).await.map_err(|e| {
            tracing::error!("Failed to bind TCP listener to {}: {}", addr, e);
            AppError::from(e)
        })?;
        let port = listener.local_addr()?.port();

        tracing::info!("Listening on {}", port);

        Ok(Self {
            port,
            listener,
            router,
        })
    }

    pub fn port(&self) -> u16 {
        self.port
    }

    pub async fn run_until_stopped(self) -> std::io::Result<()> {
        axum::serve(self.listener, self.router)
            .with_graceful_shutdown(shutdown_signal())
            .await
    }
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received");
}
