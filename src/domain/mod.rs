/// Domain models for the application
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

/// Rovers accepted by the Mars Rover Photos API
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Rover {
    Curiosity,
    Opportunity,
    Spirit,
    Perseverance,
}

impl Rover {
    pub const ALL: [Rover; 4] = [
        Rover::Curiosity,
        Rover::Opportunity,
        Rover::Spirit,
        Rover::Perseverance,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Rover::Curiosity => "curiosity",
            Rover::Opportunity => "opportunity",
            Rover::Spirit => "spirit",
            Rover::Perseverance => "perseverance",
        }
    }
}

impl FromStr for Rover {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lowered = s.trim().to_ascii_lowercase();
        Rover::ALL
            .into_iter()
            .find(|r| r.as_str() == lowered)
            .ok_or_else(|| format!("unknown rover '{s}'"))
    }
}

impl fmt::Display for Rover {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Selector for a Mars photo query
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PhotoDay {
    EarthDate(NaiveDate),
    Sol(u32),
}

impl PhotoDay {
    pub fn query(&self) -> (&'static str, String) {
        match self {
            PhotoDay::EarthDate(d) => ("earth_date", d.to_string()),
            PhotoDay::Sol(sol) => ("sol", sol.to_string()),
        }
    }
}

/// DONKI event families served by the proxy
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DonkiEventType {
    Cme,
    Flr,
    Sep,
    Gst,
}

impl DonkiEventType {
    pub const ALL: [DonkiEventType; 4] = [
        DonkiEventType::Cme,
        DonkiEventType::Flr,
        DonkiEventType::Sep,
        DonkiEventType::Gst,
    ];

    /// Lowercase route segment on the proxy
    pub fn slug(&self) -> &'static str {
        match self {
            DonkiEventType::Cme => "cme",
            DonkiEventType::Flr => "flr",
            DonkiEventType::Sep => "sep",
            DonkiEventType::Gst => "gst",
        }
    }

    /// Path segment on api.nasa.gov/DONKI
    pub fn upstream_segment(&self) -> &'static str {
        match self {
            DonkiEventType::Cme => "CME",
            DonkiEventType::Flr => "FLR",
            DonkiEventType::Sep => "SEP",
            DonkiEventType::Gst => "GST",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            DonkiEventType::Cme => "Coronal Mass Ejection (CME)",
            DonkiEventType::Flr => "Solar Flare (FLR)",
            DonkiEventType::Sep => "Solar Energetic Particle (SEP)",
            DonkiEventType::Gst => "Geomagnetic Storm (GST)",
        }
    }
}

impl FromStr for DonkiEventType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lowered = s.trim().to_ascii_lowercase();
        DonkiEventType::ALL
            .into_iter()
            .find(|t| t.slug() == lowered)
            .ok_or_else(|| format!("unknown DONKI event type '{s}'"))
    }
}

/// NOAA geomagnetic storm scale
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum GeomagneticScale {
    G0,
    G1,
    G2,
    G3,
    G4,
    G5,
}

/// Near-earth object flattened out of a NeoWs feed
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NearEarthObject {
    pub id: String,
    pub date: NaiveDate,
    pub name: String,
    pub diameter_km: f64,
    pub hazardous: bool,
    pub velocity_km_per_sec: f64,
    pub miss_distance_km: f64,
}

/// Raw NeoWs feed as relayed by the proxy
#[derive(Debug, Clone, Default, Deserialize)]
pub struct NeoFeed {
    #[serde(default)]
    pub element_count: Option<u64>,
    #[serde(default)]
    pub near_earth_objects: BTreeMap<String, Vec<RawNeo>>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawNeo {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub estimated_diameter: EstimatedDiameter,
    #[serde(default)]
    pub is_potentially_hazardous_asteroid: bool,
    #[serde(default)]
    pub close_approach_data: Vec<CloseApproach>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct EstimatedDiameter {
    #[serde(default)]
    pub kilometers: DiameterRange,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct DiameterRange {
    #[serde(default)]
    pub estimated_diameter_min: f64,
    #[serde(default)]
    pub estimated_diameter_max: f64,
}

/// NeoWs encodes the numeric fields below as decimal strings
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CloseApproach {
    #[serde(default)]
    pub relative_velocity: serde_json::Value,
    #[serde(default)]
    pub miss_distance: serde_json::Value,
}

/// Space weather event reduced to what the dashboard renders
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SpaceWeatherEvent {
    pub id: String,
    pub date: NaiveDate,
    pub note: String,
    #[serde(flatten)]
    pub details: EventDetails,
}

impl SpaceWeatherEvent {
    pub fn event_type(&self) -> DonkiEventType {
        match self.details {
            EventDetails::Cme { .. } => DonkiEventType::Cme,
            EventDetails::Flr { .. } => DonkiEventType::Flr,
            EventDetails::Sep { .. } => DonkiEventType::Sep,
            EventDetails::Gst { .. } => DonkiEventType::Gst,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "UPPERCASE")]
pub enum EventDetails {
    #[serde(rename_all = "camelCase")]
    Cme { speed: f64, half_angle: f64 },
    #[serde(rename_all = "camelCase")]
    Flr {
        class: String,
        intensity: f64,
        duration: f64,
    },
    #[serde(rename_all = "camelCase")]
    Sep { flux: f64, probability: f64 },
    #[serde(rename_all = "camelCase")]
    Gst {
        kp_index: f64,
        scale: GeomagneticScale,
    },
}

/// Astronomy Picture of the Day entry
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ApodEntry {
    pub title: String,
    pub url: String,
    pub hdurl: Option<String>,
    pub media_type: String,
    pub explanation: String,
    pub copyright: Option<String>,
    pub date: String,
}

/// Mars Rover Photos response page
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MarsPhotoPage {
    pub photos: Vec<MarsPhoto>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MarsPhoto {
    pub id: u64,
    pub img_src: String,
    pub camera: Camera,
    pub rover: RoverInfo,
    pub earth_date: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Camera {
    pub name: String,
    pub full_name: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RoverInfo {
    pub name: String,
    pub launch_date: Option<String>,
    pub landing_date: Option<String>,
    pub status: String,
}

/// EPIC natural-colour image metadata
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EpicImage {
    pub identifier: String,
    pub caption: String,
    pub image: String,
    pub date: String,
}

/// CME and flare activity over the trailing month
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DonkiStatus {
    pub cme_count: usize,
    pub flare_count: usize,
    pub last_updated: DateTime<Utc>,
}

impl DonkiStatus {
    pub fn empty(now: DateTime<Utc>) -> Self {
        Self {
            cme_count: 0,
            flare_count: 0,
            last_updated: now,
        }
    }
}

/// Health check response
#[derive(Serialize)]
pub struct Health {
    pub status: &'static str,
    pub now: DateTime<Utc>,
}
