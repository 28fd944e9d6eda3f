/// Main application entry point
use nasa_proxy::clients::NasaClient;
use nasa_proxy::config::{AppConfig, DEMO_API_KEY};
use nasa_proxy::handlers::AppState;
use nasa_proxy::routes::build_router;
use nasa_proxy::services::ProxyService;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(EnvFilter::from_default_env())
        .finish();
    let _ = tracing::subscriber::set_global_default(subscriber);

    // Load configuration
    let config = AppConfig::from_env()?;
    info!("Configuration loaded successfully");
    if config.nasa_api_key == DEMO_API_KEY {
        warn!("NASA_API_KEY not set, using the shared demo key");
    }

    // Initialize upstream client and service
    let nasa_client = NasaClient::new(
        config.nasa_api_url.clone(),
        config.nasa_api_key.clone(),
        Duration::from_secs(config.http_timeout_seconds),
    )?;
    info!("Forwarding to {}", nasa_client.base_url());

    let state = AppState {
        proxy: Arc::new(ProxyService::new(Arc::new(nasa_client))),
    };

    // Build router
    let app = build_router(state);

    // Start server
    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!("nasa_proxy listening on {}", addr);

    axum::serve(listener, app.into_make_service()).await?;

    Ok(())
}
