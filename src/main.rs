use anyhow::Context;
use tracing_subscriber::EnvFilter;

use camgallery::server::{self, AppState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env if present so cargo run picks up CAMGALLERY_* overrides
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let config = camgallery::config::config();
    tracing::info!("Starting camgallery in {:?} mode", config.environment);

    let state = AppState::open(&config.server.static_dir, &config.server.settings_file)?;

    let bind_addr = format!("0.0.0.0:{}", config.server.port);
    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .with_context(|| format!("failed to bind {}", bind_addr))?;

    tracing::info!("camgallery listening on http://{}", bind_addr);

    server::serve(listener, state, &config.server).await?;
    Ok(())
}
