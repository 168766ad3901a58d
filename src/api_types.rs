use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde::Deserialize;
use serde_json::Value;
use xxhash_rust::xxh3::xxh3_64;

use crate::models::Report;

/// Raw record as served by the CMS. Fields stay untyped so that a value of the
/// wrong JSON type degrades to "absent" instead of failing the decode.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ApiReport {
    #[serde(rename = "_id")]
    pub object_id: Value,
    pub id: Value,
    pub title: Value,
    pub description: Value,
    pub category: Value,
    pub is_free: Value,
    pub rating: Value,
    pub created_at: Value,
    pub download_url: Value,
    pub background_image: Value,
}

fn as_string(v: &Value) -> Option<String> {
    match v {
        Value::String(s) => Some(s.clone()),
        _ => None,
    }
}

fn as_id(v: &Value) -> Option<String> {
    match v {
        Value::String(s) if !s.trim().is_empty() => Some(s.trim().to_string()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

fn as_rating(v: &Value) -> Option<f64> {
    v.as_f64().filter(|r| r.is_finite())
}

/// Accepts RFC 3339, naive ISO datetimes, plain `YYYY-MM-DD` dates (UTC
/// midnight) and epoch milliseconds. Anything else is absent.
pub fn parse_timestamp(v: &Value) -> Option<DateTime<Utc>> {
    match v {
        Value::String(s) => {
            let s = s.trim();
            if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
                return Some(dt.with_timezone(&Utc));
            }
            for fmt in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"] {
                if let Ok(naive) = NaiveDateTime::parse_from_str(s, fmt) {
                    return Some(naive.and_utc());
                }
            }
            NaiveDate::parse_from_str(s, "%Y-%m-%d")
                .ok()
                .and_then(|d| d.and_hms_opt(0, 0, 0))
                .map(|naive| naive.and_utc())
        }
        Value::Number(n) => n
            .as_i64()
            .or_else(|| n.as_f64().filter(|f| f.is_finite()).map(|f| f as i64))
            .and_then(DateTime::from_timestamp_millis),
        _ => None,
    }
}

fn synthetic_id(title: &Value, created_at: &Value) -> String {
    let title = title.as_str().unwrap_or_default();
    let created = match created_at {
        Value::Null => String::new(),
        other => other.to_string(),
    };
    format!("{:016x}", xxh3_64(format!("{}|{}", title, created).as_bytes()))
}

impl From<ApiReport> for Report {
    fn from(a: ApiReport) -> Self {
        let id = as_id(&a.object_id)
            .or_else(|| as_id(&a.id))
            .unwrap_or_else(|| synthetic_id(&a.title, &a.created_at));

        Report {
            id,
            title: as_string(&a.title),
            description: as_string(&a.description),
            category: as_string(&a.category),
            is_free: a.is_free.as_bool().unwrap_or(false),
            rating: as_rating(&a.rating),
            created_at: parse_timestamp(&a.created_at),
            download_url: as_string(&a.download_url),
            background_image: as_string(&a.background_image),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Datelike, Timelike};
    use serde_json::json;

    fn decode(v: Value) -> Report {
        serde_json::from_value::<ApiReport>(v).unwrap().into()
    }

    #[test]
    fn decodes_cms_shape() {
        let r = decode(json!({
            "_id": "66a1",
            "title": "Access Whitepaper",
            "description": "Free access study",
            "category": "Whitepaper",
            "isFree": true,
            "rating": 5,
            "createdAt": "2023-06-01T10:30:00.000Z",
            "downloadUrl": "https://cdn.example/a.pdf",
            "backgroundImage": "https://cdn.example/a.png",
            "__v": 0
        }));
        assert_eq!(r.id, "66a1");
        assert_eq!(r.title.as_deref(), Some("Access Whitepaper"));
        assert!(r.is_free);
        assert_eq!(r.rating, Some(5.0));
        let ts = r.created_at.unwrap();
        assert_eq!((ts.year(), ts.month(), ts.day(), ts.hour()), (2023, 6, 1, 10));
        assert!(r.has_download());
    }

    #[test]
    fn wrong_types_degrade_to_absent() {
        let r = decode(json!({
            "id": 42,
            "title": ["not", "a", "string"],
            "category": 7,
            "isFree": "yes",
            "rating": "five",
            "createdAt": "last tuesday"
        }));
        assert_eq!(r.id, "42");
        assert_eq!(r.title, None);
        assert_eq!(r.category, None);
        assert!(!r.is_free);
        assert_eq!(r.rating, None);
        assert_eq!(r.created_at, None);
    }

    #[test]
    fn object_id_wins_over_plain_id() {
        let r = decode(json!({ "_id": "mongo", "id": "plain" }));
        assert_eq!(r.id, "mongo");
    }

    #[test]
    fn missing_id_gets_stable_synthetic_one() {
        let a = decode(json!({ "title": "Vaccine Market 2024", "createdAt": "2024-01-01" }));
        let b = decode(json!({ "title": "Vaccine Market 2024", "createdAt": "2024-01-01" }));
        let c = decode(json!({ "title": "Vaccine Market 2025", "createdAt": "2024-01-01" }));
        assert_eq!(a.id.len(), 16);
        assert_eq!(a.id, b.id);
        assert_ne!(a.id, c.id);
    }

    #[test]
    fn timestamp_formats() {
        let date = parse_timestamp(&json!("2024-01-01")).unwrap();
        assert_eq!((date.year(), date.month(), date.day(), date.hour()), (2024, 1, 1, 0));

        let naive = parse_timestamp(&json!("2024-03-05T08:00:00")).unwrap();
        assert_eq!(naive.hour(), 8);

        let epoch = parse_timestamp(&json!(1_704_067_200_000_i64)).unwrap();
        assert_eq!(epoch, date);

        assert!(parse_timestamp(&json!(null)).is_none());
        assert!(parse_timestamp(&json!(true)).is_none());
        assert!(parse_timestamp(&json!("")).is_none());
    }
}
