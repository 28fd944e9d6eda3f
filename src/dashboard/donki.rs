//! DONKI space weather event mapping.

use crate::domain::{DonkiEventType, EventDetails, GeomagneticScale, SpaceWeatherEvent};
use crate::utils::{date_prefix, num, parse_timestamp, s_pick};
use chrono::{Days, Months, NaiveDate};
use serde_json::Value;
use std::collections::BTreeMap;
use tracing::warn;

const UNKNOWN_ID: &str = "unknown";

/// NOAA G-scale for a planetary K-index
pub fn kp_to_scale(kp_index: f64) -> GeomagneticScale {
    if kp_index.is_nan() || kp_index < 5.0 {
        GeomagneticScale::G0
    } else if kp_index < 6.0 {
        GeomagneticScale::G1
    } else if kp_index < 7.0 {
        GeomagneticScale::G2
    } else if kp_index < 8.0 {
        GeomagneticScale::G3
    } else if kp_index < 9.0 {
        GeomagneticScale::G4
    } else {
        GeomagneticScale::G5
    }
}

/// Map one raw DONKI record. Returns `None` when no calendar date can be
/// derived from the record.
pub fn map_event(kind: DonkiEventType, raw: &Value) -> Option<SpaceWeatherEvent> {
    let id_key = match kind {
        DonkiEventType::Cme => "activityID",
        DonkiEventType::Flr => "flrID",
        DonkiEventType::Sep => "sepID",
        DonkiEventType::Gst => "gstID",
    };
    let id = s_pick(raw, &[id_key]);
    let date = event_date(raw, id.as_deref())?;
    let field = |key: &str| num(&raw[key]).unwrap_or(0.0);

    let (note, details) = match kind {
        DonkiEventType::Cme => {
            let analysis = &raw["cmeAnalyses"][0];
            (
                note_or(raw, "No additional notes"),
                EventDetails::Cme {
                    speed: num(&analysis["speed"]).unwrap_or(0.0),
                    half_angle: num(&analysis["halfAngle"]).unwrap_or(0.0),
                },
            )
        }
        DonkiEventType::Flr => (
            "Solar flare event".to_string(),
            EventDetails::Flr {
                class: s_pick(raw, &["classType"]).unwrap_or_else(|| "Unknown".to_string()),
                intensity: field("peakIntensity"),
                duration: num(&raw["duration"])
                    .or_else(|| flare_minutes(raw))
                    .unwrap_or(0.0),
            },
        ),
        DonkiEventType::Sep => (
            note_or(raw, "Solar energetic particle event"),
            EventDetails::Sep {
                flux: field("flux"),
                probability: field("probability"),
            },
        ),
        DonkiEventType::Gst => {
            let kp_index = max_kp(raw);
            (
                "Geomagnetic storm event".to_string(),
                EventDetails::Gst {
                    kp_index,
                    scale: kp_to_scale(kp_index),
                },
            )
        }
    };

    Some(SpaceWeatherEvent {
        id: id.unwrap_or_else(|| UNKNOWN_ID.to_string()),
        date,
        note,
        details,
    })
}

/// Map a raw upstream array; anything that is not an array maps to nothing
pub fn map_events(kind: DonkiEventType, raw: &Value) -> Vec<SpaceWeatherEvent> {
    let Some(items) = raw.as_array() else {
        return Vec::new();
    };
    items
        .iter()
        .filter_map(|item| {
            let event = map_event(kind, item);
            if event.is_none() {
                warn!("dropping undated {} record", kind.upstream_segment());
            }
            event
        })
        .collect()
}

fn event_date(raw: &Value, id: Option<&str>) -> Option<NaiveDate> {
    s_pick(raw, &["time21_5", "beginTime", "startTime", "eventTime"])
        .and_then(|s| date_prefix(&s))
        .or_else(|| id.and_then(date_prefix))
}

fn note_or(raw: &Value, placeholder: &str) -> String {
    s_pick(raw, &["note"]).unwrap_or_else(|| placeholder.to_string())
}

fn flare_minutes(raw: &Value) -> Option<f64> {
    let begin = parse_timestamp(raw["beginTime"].as_str()?)?;
    let end = parse_timestamp(raw["endTime"].as_str()?)?;
    (end >= begin).then(|| (end - begin).num_minutes() as f64)
}

fn max_kp(raw: &Value) -> f64 {
    raw["allKpIndex"]
        .as_array()
        .map(|entries| {
            entries
                .iter()
                .filter_map(|e| num(&e["kpIndex"]))
                .fold(0.0, f64::max)
        })
        .unwrap_or(0.0)
}

/// Chart axis maxima, never below the dashboard's fixed floors
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ChartScale {
    pub speed: f64,
    pub intensity: f64,
    pub flux: f64,
    pub kp: f64,
}

impl Default for ChartScale {
    fn default() -> Self {
        Self {
            speed: 1000.0,
            intensity: 10.0,
            flux: 15000.0,
            kp: 9.0,
        }
    }
}

impl ChartScale {
    pub fn from_events(events: &[SpaceWeatherEvent]) -> Self {
        events
            .iter()
            .fold(Self::default(), |mut scale, event| {
                match &event.details {
                    EventDetails::Cme { speed, .. } => scale.speed = scale.speed.max(*speed),
                    EventDetails::Flr { intensity, .. } => {
                        scale.intensity = scale.intensity.max(*intensity)
                    }
                    EventDetails::Sep { flux, .. } => scale.flux = scale.flux.max(*flux),
                    EventDetails::Gst { kp_index, .. } => scale.kp = scale.kp.max(*kp_index),
                }
                scale
            })
    }
}

/// Storm count per G-scale level; levels with no storms are omitted
pub fn count_by_scale(events: &[SpaceWeatherEvent]) -> BTreeMap<GeomagneticScale, usize> {
    let mut counts = BTreeMap::new();
    for event in events {
        if let EventDetails::Gst { scale, .. } = event.details {
            *counts.entry(scale).or_insert(0) += 1;
        }
    }
    counts
}

/// Dashboard time range presets
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum TimeRange {
    OneWeek,
    TwoWeeks,
    #[default]
    OneMonth,
    ThreeMonths,
    SixMonths,
}

impl TimeRange {
    /// Inclusive `(start, end)` ending on `today`
    pub fn bounds(&self, today: NaiveDate) -> (NaiveDate, NaiveDate) {
        let start = match self {
            TimeRange::OneWeek => today.checked_sub_days(Days::new(7)),
            TimeRange::TwoWeeks => today.checked_sub_days(Days::new(14)),
            TimeRange::OneMonth => today.checked_sub_months(Months::new(1)),
            TimeRange::ThreeMonths => today.checked_sub_months(Months::new(3)),
            TimeRange::SixMonths => today.checked_sub_months(Months::new(6)),
        };
        (start.unwrap_or(NaiveDate::MIN), today)
    }
}

impl std::str::FromStr for TimeRange {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "1w" => Ok(TimeRange::OneWeek),
            "2w" => Ok(TimeRange::TwoWeeks),
            "1m" => Ok(TimeRange::OneMonth),
            "3m" => Ok(TimeRange::ThreeMonths),
            "6m" => Ok(TimeRange::SixMonths),
            other => Err(format!("unknown time range '{other}'")),
        }
    }
}
