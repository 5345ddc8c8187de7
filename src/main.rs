use std::sync::Arc;

use tracing_subscriber::EnvFilter;

use visionaid::api::{start_server, ApiContext};
use visionaid::config;
use visionaid::db;
use visionaid::detection::{Detector, SimulatedClassifier};
use visionaid::notify::LogMailer;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(config::default_log_filter())),
        )
        .init();

    tracing::info!("{} server starting v{}", config::APP_NAME, config::APP_VERSION);

    let db_path = config::db_path();
    let conn = db::open_database(&db_path)?;
    tracing::info!(path = %db_path.display(), "scan database opened");

    let classifier = match config::simulated_latency() {
        latency if latency.is_zero() => SimulatedClassifier::new(),
        latency => SimulatedClassifier::with_latency(latency),
    };
    let detector = Detector::new(Arc::new(classifier), config::detect_timeout());

    let ctx = ApiContext::new(conn, detector, Arc::new(LogMailer));

    let mut server = start_server(ctx, config::bind_addr())
        .await
        .map_err(|e| -> Box<dyn std::error::Error> { e.into() })?;
    tracing::info!(addr = %server.addr, "listening");

    tokio::signal::ctrl_c().await?;
    tracing::info!("shutdown requested");
    server.shutdown();

    Ok(())
}
