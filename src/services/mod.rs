/// Business logic services layer
use crate::clients::NasaApi;
use crate::domain::{DonkiEventType, DonkiStatus, PhotoDay, Rover};
use crate::errors::{ApiError, ApiResult};
use chrono::{DateTime, Days, NaiveDate, Utc};
use serde_json::Value;
use std::sync::Arc;
use tracing::{error, warn};

/// Days of history covered by the DONKI status summary
pub const STATUS_WINDOW_DAYS: u64 = 30;

/// Optional APOD selectors forwarded as-is
#[derive(Debug, Default, Clone)]
pub struct ApodParams {
    pub date: Option<NaiveDate>,
    pub count: Option<u32>,
}

/// Forwards validated requests to NASA and reshapes the few payloads
/// that need it. Holds no state beyond the upstream handle.
pub struct ProxyService {
    nasa: Arc<dyn NasaApi>,
}

impl ProxyService {
    pub fn new(nasa: Arc<dyn NasaApi>) -> Self {
        Self { nasa }
    }

    async fn fetch(
        &self,
        resource: &'static str,
        path: &str,
        query: &[(&str, String)],
    ) -> ApiResult<Value> {
        self.nasa.get_json(path, query).await.map_err(|e| {
            error!("{} fetch error: {}", resource, e);
            ApiError::fetch_failed(resource)(e)
        })
    }

    /// Astronomy Picture of the Day, always as a list
    pub async fn apod(&self, params: &ApodParams) -> ApiResult<Value> {
        let mut query = Vec::new();
        if let Some(date) = params.date {
            query.push(("date", date.to_string()));
        }
        if let Some(count) = params.count {
            query.push(("count", count.to_string()));
        }

        let data = self.fetch("APOD", "/planetary/apod", &query).await?;
        Ok(match data {
            Value::Array(_) => data,
            other => Value::Array(vec![other]),
        })
    }

    /// Mars rover photos for one day
    pub async fn mars_photos(&self, rover: Rover, day: &PhotoDay) -> ApiResult<Value> {
        let path = format!("/mars-photos/api/v1/rovers/{}/photos", rover);
        self.fetch("Mars rover", &path, &[day.query()]).await
    }

    /// Most recent EPIC natural-colour set, or the set for `date`
    pub async fn epic(&self, date: Option<NaiveDate>) -> ApiResult<Value> {
        let path = match date {
            Some(d) => format!("/EPIC/api/natural/date/{}", d),
            None => "/EPIC/api/natural".to_string(),
        };
        self.fetch("EPIC", &path, &[]).await
    }

    /// NeoWs feed for an inclusive date range
    pub async fn neo_feed(&self, start: NaiveDate, end: NaiveDate) -> ApiResult<Value> {
        self.fetch(
            "NEO",
            "/neo/rest/v1/feed",
            &[("start_date", start.to_string()), ("end_date", end.to_string())],
        )
        .await
    }

    /// DONKI events of one type; a null upstream body becomes `[]`
    pub async fn donki_events(
        &self,
        kind: DonkiEventType,
        start: NaiveDate,
        end: NaiveDate,
    ) -> ApiResult<Value> {
        let path = format!("/DONKI/{}", kind.upstream_segment());
        let data = self
            .fetch(
                "DONKI",
                &path,
                &[("startDate", start.to_string()), ("endDate", end.to_string())],
            )
            .await?;
        Ok(match data {
            Value::Null => Value::Array(Vec::new()),
            other => other,
        })
    }

    /// CME and flare counts over the trailing window ending `now`.
    ///
    /// Re-queries DONKI on every call. A failed sub-query counts as zero.
    pub async fn donki_status(&self, now: DateTime<Utc>) -> DonkiStatus {
        let end = now.date_naive();
        let start = end - Days::new(STATUS_WINDOW_DAYS);

        let cme_count = self.count_events(DonkiEventType::Cme, start, end).await;
        let flare_count = self.count_events(DonkiEventType::Flr, start, end).await;

        DonkiStatus {
            cme_count,
            flare_count,
            last_updated: now,
        }
    }

    async fn count_events(&self, kind: DonkiEventType, start: NaiveDate, end: NaiveDate) -> usize {
        match self.donki_events(kind, start, end).await {
            Ok(Value::Array(items)) => items.len(),
            Ok(other) => {
                warn!(
                    "DONKI {} returned a non-array payload: {}",
                    kind.upstream_segment(),
                    other
                );
                0
            }
            Err(_) => 0,
        }
    }
}

#[cfg(test)]
pub(crate) mod testing {
    use super::*;
    use async_trait::async_trait;
    use std::collections::HashMap;
    use std::sync::Mutex;

    /// One recorded upstream call: path and query pairs
    pub type Call = (String, Vec<(String, String)>);

    /// In-memory stand-in for api.nasa.gov that records every call
    #[derive(Default)]
    pub struct FakeNasa {
        responses: HashMap<String, Result<Value, String>>,
        calls: Mutex<Vec<Call>>,
    }

    impl FakeNasa {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn respond(mut self, path: &str, body: Value) -> Self {
            self.responses.insert(path.to_string(), Ok(body));
            self
        }

        pub fn fail(mut self, path: &str, msg: &str) -> Self {
            self.responses.insert(path.to_string(), Err(msg.to_string()));
            self
        }

        pub fn calls(&self) -> Vec<Call> {
            self.calls.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl NasaApi for FakeNasa {
        async fn get_json(&self, path: &str, query: &[(&str, String)]) -> ApiResult<Value> {
            self.calls.lock().unwrap().push((
                path.to_string(),
                query.iter().map(|(k, v)| (k.to_string(), v.clone())).collect(),
            ));
            match self.responses.get(path) {
                Some(Ok(body)) => Ok(body.clone()),
                Some(Err(msg)) => Err(ApiError::Internal(msg.clone())),
                None => Err(ApiError::Internal(format!("no fake response for {path}"))),
            }
        }
    }
}
