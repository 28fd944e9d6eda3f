//! HTTP client for the proxy, as used by the dashboard views.
//!
//! Failure handling deliberately differs per resource: imagery and NEO
//! fetches surface the error to the caller, DONKI event fetches fall back
//! to an empty list and the status fetch to zero counts.

use crate::config::ClientConfig;
use crate::dashboard::donki::map_events;
use crate::domain::{
    ApodEntry, DonkiEventType, DonkiStatus, EpicImage, MarsPhotoPage, NeoFeed, Rover,
    SpaceWeatherEvent,
};
use crate::errors::ApiResult;
use chrono::{NaiveDate, Utc};
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::time::Duration;
use tracing::{error, warn};

pub struct ProxyClient {
    client: Client,
    base_url: String,
}

impl ProxyClient {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> ApiResult<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent("nasa-dashboard/0.1")
            .build()?;
        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    pub fn from_config(config: &ClientConfig) -> ApiResult<Self> {
        Self::new(
            config.proxy_base_url.clone(),
            Duration::from_secs(config.http_timeout_seconds),
        )
    }

    async fn get<T: DeserializeOwned>(&self, path: &str, query: &[(&str, String)]) -> ApiResult<T> {
        let resp = self
            .client
            .get(format!("{}{}", self.base_url, path))
            .query(query)
            .send()
            .await?
            .error_for_status()?;
        Ok(resp.json().await?)
    }

    pub async fn fetch_apod(&self) -> ApiResult<Vec<ApodEntry>> {
        self.get("/apod", &[]).await
    }

    pub async fn fetch_epic(&self) -> ApiResult<Vec<EpicImage>> {
        self.get("/epic", &[]).await
    }

    pub async fn fetch_mars_photos(
        &self,
        rover: Rover,
        earth_date: NaiveDate,
    ) -> ApiResult<MarsPhotoPage> {
        self.get(
            &format!("/mars/{}", rover),
            &[("earth_date", earth_date.to_string())],
        )
        .await
        .map_err(|e| {
            error!("Mars rover API error: {}", e);
            e
        })
    }

    pub async fn fetch_neo_feed(&self, start: NaiveDate, end: NaiveDate) -> ApiResult<NeoFeed> {
        self.get(
            "/neo",
            &[("start_date", start.to_string()), ("end_date", end.to_string())],
        )
        .await
    }

    /// Raw DONKI records; any failure yields an empty list
    pub async fn fetch_events(
        &self,
        kind: DonkiEventType,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Value {
        let path = format!("/donki/{}", kind.slug());
        let query = [("startDate", start.to_string()), ("endDate", end.to_string())];
        match self.get::<Value>(&path, &query).await {
            Ok(data) => data,
            Err(e) => {
                warn!("Error fetching {} data: {}", kind.upstream_segment(), e);
                Value::Array(Vec::new())
            }
        }
    }

    /// Fetched and mapped DONKI events for one panel
    pub async fn load_events(
        &self,
        kind: DonkiEventType,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Vec<SpaceWeatherEvent> {
        let raw = self.fetch_events(kind, start, end).await;
        map_events(kind, &raw)
    }

    /// Status summary; any failure yields zero counts stamped now
    pub async fn fetch_status(&self) -> DonkiStatus {
        match self.get::<DonkiStatus>("/donki/status", &[]).await {
            Ok(status) => status,
            Err(e) => {
                warn!("Error fetching status data: {}", e);
                DonkiStatus::empty(Utc::now())
            }
        }
    }
}
