use directory_service::{config::DirectoryConfig, services::metrics, startup::Application};
use service_core::error::AppError;
use service_core::observability::init_tracing;

#[tokio::main]
async fn main() -> Result<(), AppError> {
    // Load configuration - fail fast if invalid
    let config = DirectoryConfig::load()?;

    init_tracing(
        &config.service_name,
        &config.log_level,
        config.otlp_endpoint.as_deref(),
    )
    .map_err(AppError::ConfigError)?;

    metrics::init_metrics().map_err(AppError::InternalError)?;

    tracing::info!(
        service = %config.service_name,
        version = env!("CARGO_PKG_VERSION"),
        "Starting directory service"
    );

    let application = Application::build(config).await?;
    application.run_until_stopped().await?;

    tracing::info!("Service shutdown complete");
    Ok(())
}
