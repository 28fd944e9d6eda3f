/// Utility functions
use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde_json::Value;

/// Extract number from JSON value
pub fn num(v: &Value) -> Option<f64> {
    if let Some(x) = v.as_f64() {
        return Some(x);
    }
    if let Some(s) = v.as_str() {
        return s.trim().parse::<f64>().ok();
    }
    None
}

/// Pick string value from JSON by trying multiple keys
pub fn s_pick(v: &Value, keys: &[&str]) -> Option<String> {
    for k in keys {
        if let Some(x) = v.get(*k) {
            if let Some(s) = x.as_str() {
                if !s.is_empty() {
                    return Some(s.to_string());
                }
            } else if x.is_number() {
                return Some(x.to_string());
            }
        }
    }
    None
}

/// Parse a strict `YYYY-MM-DD` calendar date
pub fn parse_date(s: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d").ok()
}

/// Calendar date at the start of a DONKI-style timestamp or identifier
/// such as `2024-01-03T12:00Z` or `2024-01-03T12:00:00-GST-001`
pub fn date_prefix(s: &str) -> Option<NaiveDate> {
    s.get(..10).and_then(parse_date)
}

/// Parse DONKI timestamps, which omit seconds and use a bare `Z`
pub fn parse_timestamp(s: &str) -> Option<DateTime<Utc>> {
    if let Ok(dt) = s.parse::<DateTime<Utc>>() {
        return Some(dt);
    }
    let trimmed = s.trim_end_matches('Z');
    ["%Y-%m-%dT%H:%M", "%Y-%m-%dT%H:%M:%S"]
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(trimmed, fmt).ok())
        .map(|ndt| ndt.and_utc())
}

/// Inclusive on both ends
pub fn within(date: NaiveDate, start: NaiveDate, end: NaiveDate) -> bool {
    start <= date && date <= end
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(s: &str) -> NaiveDate {
        parse_date(s).unwrap()
    }

    #[test]
    fn test_num_from_float() {
        let json = serde_json::json!(42.5);
        assert_eq!(num(&json), Some(42.5));
    }

    #[test]
    fn test_num_from_string() {
        let json = serde_json::json!("42.5");
        assert_eq!(num(&json), Some(42.5));
    }

    #[test]
    fn test_num_from_invalid() {
        let json = serde_json::json!("invalid");
        assert_eq!(num(&json), None);
        assert_eq!(num(&Value::Null), None);
    }

    #[test]
    fn test_s_pick_finds_first() {
        let json = serde_json::json!({"time21_5": "2024-01-02T10:00Z", "startTime": "2024-01-01T00:00Z"});
        assert_eq!(
            s_pick(&json, &["time21_5", "startTime"]),
            Some("2024-01-02T10:00Z".to_string())
        );
    }

    #[test]
    fn test_s_pick_skips_empty_strings() {
        let json = serde_json::json!({"note": "", "fallback": "x"});
        assert_eq!(s_pick(&json, &["note", "fallback"]), Some("x".to_string()));
    }

    #[test]
    fn test_s_pick_not_found() {
        let json = serde_json::json!({"other": "value"});
        assert_eq!(s_pick(&json, &["name", "title"]), None);
    }

    #[test]
    fn test_parse_date_rejects_other_formats() {
        assert!(parse_date("2024-01-31").is_some());
        assert!(parse_date("2024-02-30").is_none());
        assert!(parse_date("01/31/2024").is_none());
        assert!(parse_date("").is_none());
    }

    #[test]
    fn test_date_prefix_from_gst_id() {
        assert_eq!(date_prefix("2024-01-03T12:00:00-GST-001"), Some(d("2024-01-03")));
        assert_eq!(date_prefix("2024"), None);
    }

    #[test]
    fn test_parse_timestamp_donki_format() {
        let begin = parse_timestamp("2024-01-01T10:15Z").unwrap();
        let end = parse_timestamp("2024-01-01T10:45Z").unwrap();
        assert_eq!((end - begin).num_minutes(), 30);
        assert!(parse_timestamp("2024-01-01T10:15:30Z").is_some());
        assert!(parse_timestamp("garbage").is_none());
    }

    #[test]
    fn test_within_is_inclusive() {
        let (start, end) = (d("2024-01-01"), d("2024-01-07"));
        assert!(within(start, start, end));
        assert!(within(end, start, end));
        assert!(!within(d("2024-01-08"), start, end));
    }
}
