/// Application configuration module
use std::env;

const DEFAULT_NASA_API_URL: &str = "https://api.nasa.gov";
const DEFAULT_PROXY_URL: &str = "http://localhost:9000";

/// Shared public key accepted by api.nasa.gov with strict rate limits
pub const DEMO_API_KEY: &str = "DEMO_KEY";

/// Proxy server configuration
#[derive(Clone, Debug)]
pub struct AppConfig {
    pub nasa_api_url: String,
    pub nasa_api_key: String,
    pub port: u16,
    pub http_timeout_seconds: u64,
}

/// Configuration for consumers of the proxy
#[derive(Clone, Debug)]
pub struct ClientConfig {
    pub proxy_base_url: String,
    pub http_timeout_seconds: u64,
}

impl AppConfig {
    /// Load configuration from environment variables
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();

        let nasa_api_url = env::var("NASA_API_URL")
            .ok()
            .filter(|s| !s.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_NASA_API_URL.to_string());

        let nasa_api_key = env::var("NASA_API_KEY")
            .ok()
            .filter(|s| !s.trim().is_empty())
            .unwrap_or_else(|| DEMO_API_KEY.to_string());

        let port = match env::var("PORT") {
            Ok(raw) => raw
                .parse()
                .map_err(|e| anyhow::anyhow!("PORT must be a valid port number: {e}"))?,
            Err(_) => 9000,
        };

        Ok(Self {
            nasa_api_url: nasa_api_url.trim_end_matches('/').to_string(),
            nasa_api_key,
            port,
            http_timeout_seconds: env_u64("HTTP_TIMEOUT_SECONDS", 30),
        })
    }
}

impl ClientConfig {
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();

        let proxy_base_url = env::var("NASA_PROXY_URL")
            .ok()
            .filter(|s| !s.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_PROXY_URL.to_string());

        Self {
            proxy_base_url: proxy_base_url.trim_end_matches('/').to_string(),
            http_timeout_seconds: env_u64("HTTP_TIMEOUT_SECONDS", 30),
        }
    }
}

fn env_u64(key: &str, default: u64) -> u64 {
    env::var(key)
        .ok()
        .and_then(|s| s.parse().ok())
        .unwrap_or(default)
}
