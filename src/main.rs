use caption_recommender::config::AppConfig;
use caption_recommender::startup::Application;
use caption_recommender::telemetry::init_tracing;

#[tokio::main]
async fn main() -> std::io::Result<()> {
    let config = AppConfig::load().map_err(|e| {
        eprintln!("Failed to load configuration: {}", e);
        std::io::Error::other(format!("Configuration error: {}", e))
    })?;

    init_tracing("info", config.log_format);

    let app = Application::build(config).await.map_err(|e| {
        tracing::error!("Failed to start application: {}", e);
        std::io::Error::other(format!("Startup error: {}", e))
    })?;

    tracing::info!("Server running on http://localhost:{}", app.port());

    app.run_until_stopped().await
}
