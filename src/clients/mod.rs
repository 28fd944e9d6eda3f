/// External API clients module
use crate::errors::ApiResult;
use async_trait::async_trait;
use reqwest::Client;
use serde_json::Value;
use std::time::Duration;
use tracing::debug;

/// Outbound access to the NASA open APIs.
///
/// Implementations attach credentials themselves; callers pass only the
/// resource path and its query parameters.
#[async_trait]
pub trait NasaApi: Send + Sync {
    async fn get_json(&self, path: &str, query: &[(&str, String)]) -> ApiResult<Value>;
}

/// HTTP client wrapper with common configuration
pub struct HttpClient {
    client: Client,
}

impl HttpClient {
    pub fn new(timeout: Duration) -> ApiResult<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent("nasa-proxy/0.1")
            .build()?;
        Ok(Self { client })
    }

    pub fn get_client(&self) -> &Client {
        &self.client
    }
}

/// NASA APIs client (APOD, Mars Rover Photos, EPIC, NeoWs, DONKI)
pub struct NasaClient {
    http_client: HttpClient,
    base_url: String,
    api_key: String,
}

impl NasaClient {
    pub fn new(base_url: String, api_key: String, timeout: Duration) -> ApiResult<Self> {
        Ok(Self {
            http_client: HttpClient::new(timeout)?,
            base_url,
            api_key,
        })
    }

    /// Get base URL
    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}

#[async_trait]
impl NasaApi for NasaClient {
    async fn get_json(&self, path: &str, query: &[(&str, String)]) -> ApiResult<Value> {
        let url = format!("{}{}", self.base_url, path);
        debug!(%url, "NASA upstream request");

        let resp = self
            .http_client
            .get_client()
            .get(&url)
            .query(query)
            .query(&[("api_key", &self.api_key)])
            .send()
            .await?
            .error_for_status()?;

        // DONKI answers an empty range with an empty body rather than `[]`
        let body = resp.text().await?;
        if body.trim().is_empty() {
            return Ok(Value::Null);
        }
        Ok(serde_json::from_str(&body)?)
    }
}
