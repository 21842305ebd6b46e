use anyhow::{Context, Result};
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::EnvFilter;

use watchtime::activity::WatchReportEngine;
use watchtime::api;
use watchtime::auth::AuthService;
use watchtime::config::{AuthMode, Config};
use watchtime::youtube::YouTubeClient;

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("watchtime=info")),
        )
        .init();

    // Load configuration
    let config = Config::from_env()?;
    info!("Loaded configuration");

    let client = YouTubeClient::from_config(&config.youtube)
        .context("failed to build YouTube API client")?;
    info!("📺 YouTube API: {}", config.youtube.api_base_url);

    let engine = WatchReportEngine::new(Arc::new(client), config.report.engine_settings());
    info!(
        window_days = config.report.window_days,
        top_up_target = config.report.top_up_target,
        sources = ?config.report.sources,
        "Report engine ready"
    );

    match config.auth.mode {
        AuthMode::None => {
            info!("🔓 Authentication is disabled - every caller receives demo data");
        }
        AuthMode::Bearer => {
            info!("🔐 Reading YouTube access tokens from the Authorization header");
        }
    }
    let auth_service = Arc::new(AuthService::new(config.auth.clone()));

    if let Some(ref static_dir) = config.frontend.static_dir {
        info!("🎨 Serving frontend from directory: {}", static_dir);
    } else {
        info!("🎨 Serving embedded frontend");
    }

    let router = api::create_api_router(engine, auth_service, config.frontend.clone());

    let addr = format!("{}:{}", config.api_server.host, config.api_server.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;
    info!("🚀 Server listening on http://{}", addr);
    info!("   - Watch report at http://{}/api/watch-history", addr);
    info!("   - Demo dashboard at http://{}/demo", addr);

    axum::serve(listener, router).await?;

    Ok(())
}
