/// HTTP request handlers
use crate::domain::{DonkiEventType, DonkiStatus, Health, PhotoDay, Rover};
use crate::errors::{ApiError, ApiResult};
use crate::services::{ApodParams, ProxyService};
use crate::utils::parse_date;
use axum::{
    extract::{
        rejection::{PathRejection, QueryRejection},
        Path, Query, State,
    },
    Json,
};
use chrono::{NaiveDate, Utc};
use serde::Deserialize;
use serde_json::Value;
use std::sync::Arc;

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub proxy: Arc<ProxyService>,
}

#[derive(Debug, Default, Deserialize)]
pub struct ApodQuery {
    pub date: Option<String>,
    pub count: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct MarsQuery {
    pub earth_date: Option<String>,
    pub sol: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct EpicQuery {
    pub date: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct NeoQuery {
    pub start_date: Option<String>,
    pub end_date: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DonkiQuery {
    pub start_date: Option<String>,
    pub end_date: Option<String>,
}

/// Empty strings count as absent
fn present(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

fn date_param(name: &str, raw: &str) -> ApiResult<NaiveDate> {
    parse_date(raw).ok_or_else(|| {
        ApiError::InvalidInput(format!("{name} must be a date in YYYY-MM-DD format"))
    })
}

fn optional_date(name: &str, raw: Option<String>) -> ApiResult<Option<NaiveDate>> {
    present(raw).map(|v| date_param(name, &v)).transpose()
}

fn date_range(
    start_name: &str,
    start: Option<String>,
    end_name: &str,
    end: Option<String>,
) -> ApiResult<(NaiveDate, NaiveDate)> {
    let (Some(start), Some(end)) = (present(start), present(end)) else {
        return Err(ApiError::InvalidInput(format!(
            "{start_name} and {end_name} required"
        )));
    };
    Ok((date_param(start_name, &start)?, date_param(end_name, &end)?))
}

/// Health check handler
pub async fn health() -> Json<Health> {
    Json(Health {
        status: "ok",
        now: Utc::now(),
    })
}

/// Astronomy Picture of the Day
pub async fn get_apod(
    query: Result<Query<ApodQuery>, QueryRejection>,
    State(state): State<AppState>,
) -> Result<Json<Value>, ApiError> {
    let Query(query) = query?;
    let count = present(query.count)
        .map(|raw| match raw.trim().parse::<u32>() {
            Ok(n) if n > 0 => Ok(n),
            _ => Err(ApiError::InvalidInput(
                "count must be a positive integer".to_string(),
            )),
        })
        .transpose()?;
    let params = ApodParams {
        date: optional_date("date", query.date)?,
        count,
    };

    let data = state.proxy.apod(&params).await?;
    Ok(Json(data))
}

/// Mars rover photos by earth date or sol
pub async fn get_mars_photos(
    rover: Result<Path<String>, PathRejection>,
    query: Result<Query<MarsQuery>, QueryRejection>,
    State(state): State<AppState>,
) -> Result<Json<Value>, ApiError> {
    let Path(rover) = rover?;
    let Query(query) = query?;
    let rover: Rover = rover
        .parse()
        .map_err(|_| ApiError::InvalidInput("Invalid rover name".to_string()))?;

    let day = match (present(query.earth_date), present(query.sol)) {
        (Some(earth_date), _) => PhotoDay::EarthDate(date_param("earth_date", &earth_date)?),
        (None, Some(sol)) => PhotoDay::Sol(sol.trim().parse().map_err(|_| {
            ApiError::InvalidInput("sol must be a non-negative integer".to_string())
        })?),
        (None, None) => {
            return Err(ApiError::InvalidInput(
                "Earth date or sol is required".to_string(),
            ))
        }
    };

    let data = state.proxy.mars_photos(rover, &day).await?;
    Ok(Json(data))
}

/// EPIC natural-colour imagery metadata
pub async fn get_epic(
    query: Result<Query<EpicQuery>, QueryRejection>,
    State(state): State<AppState>,
) -> Result<Json<Value>, ApiError> {
    let Query(query) = query?;
    let date = optional_date("date", query.date)?;
    let data = state.proxy.epic(date).await?;
    Ok(Json(data))
}

/// Near-earth object feed
pub async fn get_neo(
    query: Result<Query<NeoQuery>, QueryRejection>,
    State(state): State<AppState>,
) -> Result<Json<Value>, ApiError> {
    let Query(query) = query?;
    let (start, end) = date_range("start_date", query.start_date, "end_date", query.end_date)?;
    let data = state.proxy.neo_feed(start, end).await?;
    Ok(Json(data))
}

/// DONKI events of the type named in the path
pub async fn get_donki_events(
    kind: Result<Path<String>, PathRejection>,
    query: Result<Query<DonkiQuery>, QueryRejection>,
    State(state): State<AppState>,
) -> Result<Json<Value>, ApiError> {
    let Path(kind) = kind?;
    let Query(query) = query?;
    let kind: DonkiEventType = kind.parse().map_err(ApiError::InvalidInput)?;
    let (start, end) = date_range("startDate", query.start_date, "endDate", query.end_date)?;
    let data = state.proxy.donki_events(kind, start, end).await?;
    Ok(Json(data))
}

/// Trailing-month CME and flare counts
pub async fn get_donki_status(State(state): State<AppState>) -> Json<DonkiStatus> {
    Json(state.proxy.donki_status(Utc::now()).await)
}
