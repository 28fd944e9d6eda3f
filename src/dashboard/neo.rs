//! Near-earth object aggregation for the NEO dashboard.
//!
//! Everything here is a pure pass over an already-fetched feed. Statistics
//! are recomputed from scratch whenever the filter changes.

use crate::domain::{NearEarthObject, NeoFeed, RawNeo};
use crate::utils::{num, parse_date, within};
use chrono::NaiveDate;
use serde::Serialize;
use std::collections::BTreeMap;
use tracing::warn;

/// Upper bounds of the first four size buckets, in kilometres
const SIZE_BOUNDS_KM: [f64; 4] = [0.5, 1.0, 2.0, 5.0];
const SIZE_LABELS: [&str; 5] = ["<0.5km", "0.5-1km", "1-2km", "2-5km", "5+km"];

/// Flatten a date-keyed feed into one list, in date order.
///
/// Records filed under a key that is not a calendar date are dropped.
pub fn flatten_feed(feed: &NeoFeed) -> Vec<NearEarthObject> {
    let mut out = Vec::new();
    for (key, records) in &feed.near_earth_objects {
        let Some(date) = parse_date(key) else {
            warn!("skipping {} NEO records under non-date key {:?}", records.len(), key);
            continue;
        };
        out.extend(records.iter().map(|raw| to_object(date, raw)));
    }
    out
}

fn to_object(date: NaiveDate, raw: &RawNeo) -> NearEarthObject {
    let km = &raw.estimated_diameter.kilometers;
    let approach = raw.close_approach_data.first();
    let velocity = approach
        .and_then(|a| num(&a.relative_velocity["kilometers_per_second"]))
        .unwrap_or(0.0);
    let miss = approach
        .and_then(|a| num(&a.miss_distance["kilometers"]))
        .unwrap_or(0.0);

    NearEarthObject {
        id: raw.id.clone(),
        date,
        name: raw.name.clone(),
        diameter_km: (km.estimated_diameter_min + km.estimated_diameter_max) / 2.0,
        hazardous: raw.is_potentially_hazardous_asteroid,
        velocity_km_per_sec: velocity,
        miss_distance_km: miss,
    }
}

/// Size and hazard filter applied to flattened objects
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NeoFilter {
    pub hazardous_only: bool,
    pub min_diameter_km: f64,
    pub max_diameter_km: f64,
}

impl Default for NeoFilter {
    fn default() -> Self {
        Self {
            hazardous_only: false,
            min_diameter_km: 0.0,
            max_diameter_km: 10.0,
        }
    }
}

impl NeoFilter {
    pub fn matches(&self, neo: &NearEarthObject) -> bool {
        self.min_diameter_km <= neo.diameter_km
            && neo.diameter_km <= self.max_diameter_km
            && (!self.hazardous_only || neo.hazardous)
    }

    pub fn apply(&self, objects: &[NearEarthObject]) -> Vec<NearEarthObject> {
        objects.iter().filter(|n| self.matches(n)).cloned().collect()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SizeBucket {
    pub range: &'static str,
    pub count: usize,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct DayRollup {
    pub total: usize,
    pub hazardous: usize,
}

/// Figures for the hazardous subset only
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HazardSummary {
    pub avg_diameter_km: f64,
    pub avg_velocity_km_per_sec: f64,
    pub closest_miss_km: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NeoStats {
    pub total: usize,
    pub hazardous_count: usize,
    pub hazardous_percent: f64,
    pub avg_diameter_km: f64,
    pub avg_velocity_km_per_sec: f64,
    pub largest_km: Option<f64>,
    pub smallest_km: Option<f64>,
    pub size_distribution: Vec<SizeBucket>,
    pub timeline: BTreeMap<NaiveDate, DayRollup>,
    pub hazards: Option<HazardSummary>,
}

impl NeoStats {
    pub fn compute(objects: &[NearEarthObject]) -> Self {
        let total = objects.len();
        let hazardous: Vec<&NearEarthObject> = objects.iter().filter(|n| n.hazardous).collect();

        let mut buckets = [0usize; 5];
        let mut timeline: BTreeMap<NaiveDate, DayRollup> = BTreeMap::new();
        for neo in objects {
            buckets[size_bucket(neo.diameter_km)] += 1;
            let day = timeline.entry(neo.date).or_default();
            day.total += 1;
            if neo.hazardous {
                day.hazardous += 1;
            }
        }

        let hazards = (!hazardous.is_empty()).then(|| HazardSummary {
            avg_diameter_km: mean(hazardous.iter().map(|n| n.diameter_km)),
            avg_velocity_km_per_sec: mean(hazardous.iter().map(|n| n.velocity_km_per_sec)),
            closest_miss_km: hazardous
                .iter()
                .map(|n| n.miss_distance_km)
                .fold(f64::INFINITY, f64::min),
        });

        Self {
            total,
            hazardous_count: hazardous.len(),
            hazardous_percent: if total == 0 {
                0.0
            } else {
                hazardous.len() as f64 / total as f64 * 100.0
            },
            avg_diameter_km: mean(objects.iter().map(|n| n.diameter_km)),
            avg_velocity_km_per_sec: mean(objects.iter().map(|n| n.velocity_km_per_sec)),
            largest_km: objects.iter().map(|n| n.diameter_km).reduce(f64::max),
            smallest_km: objects.iter().map(|n| n.diameter_km).reduce(f64::min),
            size_distribution: SIZE_LABELS
                .iter()
                .zip(buckets)
                .map(|(&range, count)| SizeBucket { range, count })
                .collect(),
            timeline,
            hazards,
        }
    }
}

/// Index into the five half-open size ranges
fn size_bucket(diameter_km: f64) -> usize {
    SIZE_BOUNDS_KM
        .iter()
        .position(|&upper| diameter_km < upper)
        .unwrap_or(SIZE_BOUNDS_KM.len())
}

fn mean(values: impl Iterator<Item = f64>) -> f64 {
    let (sum, n) = values.fold((0.0, 0usize), |(s, n), v| (s + v, n + 1));
    if n == 0 {
        0.0
    } else {
        sum / n as f64
    }
}

/// Stable ordering for callers that need one
pub fn sort_by_date_then_id(objects: &mut [NearEarthObject]) {
    objects.sort_by(|a, b| a.date.cmp(&b.date).then_with(|| a.id.cmp(&b.id)));
}

/// Largest objects first
pub fn largest(objects: &[NearEarthObject], n: usize) -> Vec<NearEarthObject> {
    let mut sorted = objects.to_vec();
    sorted.sort_by(|a, b| b.diameter_km.total_cmp(&a.diameter_km));
    sorted.truncate(n);
    sorted
}

/// Hazardous objects by ascending miss distance
pub fn closest_hazardous(objects: &[NearEarthObject], n: usize) -> Vec<NearEarthObject> {
    let mut hazardous: Vec<NearEarthObject> =
        objects.iter().filter(|o| o.hazardous).cloned().collect();
    hazardous.sort_by(|a, b| a.miss_distance_km.total_cmp(&b.miss_distance_km));
    hazardous.truncate(n);
    hazardous
}

/// Objects approaching between `start` and `end`, both inclusive
pub fn within_dates(
    objects: &[NearEarthObject],
    start: NaiveDate,
    end: NaiveDate,
) -> Vec<NearEarthObject> {
    objects
        .iter()
        .filter(|o| within(o.date, start, end))
        .cloned()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn feed(value: serde_json::Value) -> NeoFeed {
        serde_json::from_value(json!({ "near_earth_objects": value })).unwrap()
    }

    fn raw(id: &str, min: f64, max: f64, hazardous: bool, velocity: &str, miss: &str) -> serde_json::Value {
        json!({
            "id": id,
            "name": format!("({id})"),
            "estimated_diameter": {"kilometers": {
                "estimated_diameter_min": min,
                "estimated_diameter_max": max
            }},
            "is_potentially_hazardous_asteroid": hazardous,
            "close_approach_data": [{
                "relative_velocity": {"kilometers_per_second": velocity},
                "miss_distance": {"kilometers": miss}
            }]
        })
    }

    fn sample() -> Vec<NearEarthObject> {
        flatten_feed(&feed(json!({
            "2024-01-02": [
                raw("3", 0.8, 1.2, true, "20", "700000"),
                raw("4", 4.0, 8.0, false, "5", "9000000"),
            ],
            "2024-01-01": [
                raw("1", 0.1, 0.3, false, "10", "50000"),
                raw("2", 1.5, 2.5, true, "15", "300000"),
            ],
        })))
    }

    #[test]
    fn test_single_object_diameter_is_mean_of_estimates() {
        let objects = flatten_feed(&feed(json!({
            "2024-01-01": [{
                "id": "1",
                "estimated_diameter": {"kilometers": {
                    "estimated_diameter_min": 0.1,
                    "estimated_diameter_max": 0.3
                }},
                "is_potentially_hazardous_asteroid": false,
                "close_approach_data": [{
                    "relative_velocity": {"kilometers_per_second": "10"},
                    "miss_distance": {"kilometers": "50000"}
                }]
            }]
        })));

        assert_eq!(objects.len(), 1);
        let neo = &objects[0];
        assert!((neo.diameter_km - 0.2).abs() < 1e-12);
        assert_eq!(neo.velocity_km_per_sec, 10.0);
        assert_eq!(neo.miss_distance_km, 50000.0);
        assert_eq!(neo.date, parse_date("2024-01-01").unwrap());
    }

    #[test]
    fn test_flatten_orders_by_date_and_drops_bad_keys() {
        let mut value = json!({
            "2024-01-02": [raw("b", 0.1, 0.1, false, "1", "1")],
            "2024-01-01": [raw("a", 0.1, 0.1, false, "1", "1")],
        });
        value["not-a-date"] = json!([raw("z", 0.1, 0.1, false, "1", "1")]);

        let ids: Vec<String> = flatten_feed(&feed(value)).into_iter().map(|n| n.id).collect();
        assert_eq!(ids, vec!["a", "b"]);
    }

    #[test]
    fn test_missing_approach_data_defaults_to_zero() {
        let objects = flatten_feed(&feed(json!({"2024-01-01": [{"id": "9"}]})));
        assert_eq!(objects[0].velocity_km_per_sec, 0.0);
        assert_eq!(objects[0].miss_distance_km, 0.0);
        assert_eq!(objects[0].diameter_km, 0.0);
    }

    #[test]
    fn test_filter_respects_inclusive_range() {
        let objects = sample();
        let filter = NeoFilter {
            hazardous_only: false,
            min_diameter_km: 0.15,
            max_diameter_km: 2.0,
        };
        let kept = filter.apply(&objects);

        assert!(!kept.is_empty());
        for neo in &kept {
            assert!(filter.min_diameter_km <= neo.diameter_km && neo.diameter_km <= filter.max_diameter_km);
        }
        for neo in objects.iter().filter(|n| !kept.contains(n)) {
            assert!(neo.diameter_km < 0.15 || neo.diameter_km > 2.0);
        }
        let mut ids: Vec<&str> = kept.iter().map(|n| n.id.as_str()).collect();
        ids.sort();
        assert_eq!(ids, vec!["1", "2", "3"]);
    }

    #[test]
    fn test_hazardous_only_is_subset() {
        let objects = sample();
        for (min, max) in [(0.0, 10.0), (0.5, 3.0), (5.0, 6.0), (0.0, 0.1)] {
            let all = NeoFilter {
                hazardous_only: false,
                min_diameter_km: min,
                max_diameter_km: max,
            }
            .apply(&objects);
            let hazardous = NeoFilter {
                hazardous_only: true,
                min_diameter_km: min,
                max_diameter_km: max,
            }
            .apply(&objects);

            assert!(hazardous.iter().all(|n| n.hazardous));
            assert!(hazardous.iter().all(|n| all.contains(n)));
        }
    }

    #[test]
    fn test_stats() {
        let stats = NeoStats::compute(&sample());

        assert_eq!(stats.total, 4);
        assert_eq!(stats.hazardous_count, 2);
        assert_eq!(stats.hazardous_percent, 50.0);
        assert!((stats.avg_diameter_km - (0.2 + 2.0 + 1.0 + 6.0) / 4.0).abs() < 1e-9);
        assert_eq!(stats.avg_velocity_km_per_sec, 12.5);
        assert_eq!(stats.largest_km, Some(6.0));
        assert!((stats.smallest_km.unwrap() - 0.2).abs() < 1e-12);

        let counts: Vec<usize> = stats.size_distribution.iter().map(|b| b.count).collect();
        assert_eq!(counts, vec![1, 0, 1, 1, 1]);
        assert_eq!(stats.size_distribution[4].range, "5+km");

        let day1 = stats.timeline[&parse_date("2024-01-01").unwrap()];
        assert_eq!(day1, DayRollup { total: 2, hazardous: 1 });

        let hazards = stats.hazards.unwrap();
        assert_eq!(hazards.closest_miss_km, 300000.0);
        assert_eq!(hazards.avg_velocity_km_per_sec, 17.5);
    }

    #[test]
    fn test_stats_on_empty_input() {
        let stats = NeoStats::compute(&[]);
        assert_eq!(stats.total, 0);
        assert_eq!(stats.avg_diameter_km, 0.0);
        assert_eq!(stats.hazardous_percent, 0.0);
        assert_eq!(stats.largest_km, None);
        assert!(stats.hazards.is_none());
        assert!(stats.timeline.is_empty());
        assert_eq!(stats.size_distribution.len(), 5);
    }

    #[test]
    fn test_size_bucket_boundaries() {
        assert_eq!(size_bucket(0.0), 0);
        assert_eq!(size_bucket(0.499), 0);
        assert_eq!(size_bucket(0.5), 1);
        assert_eq!(size_bucket(1.0), 2);
        assert_eq!(size_bucket(2.0), 3);
        assert_eq!(size_bucket(4.999), 3);
        assert_eq!(size_bucket(5.0), 4);
        assert_eq!(size_bucket(250.0), 4);
    }

    #[test]
    fn test_orderings() {
        let objects = sample();

        let mut sorted = objects.clone();
        sort_by_date_then_id(&mut sorted);
        let ids: Vec<&str> = sorted.iter().map(|n| n.id.as_str()).collect();
        assert_eq!(ids, vec!["1", "2", "3", "4"]);

        assert_eq!(largest(&objects, 1)[0].id, "4");
        let closest: Vec<String> = closest_hazardous(&objects, 5).into_iter().map(|n| n.id).collect();
        assert_eq!(closest, vec!["2", "3"]);
    }

    #[test]
    fn test_within_dates_inclusive() {
        let objects = sample();
        let day = parse_date("2024-01-02").unwrap();
        assert_eq!(within_dates(&objects, day, day).len(), 2);
    }
}
