use chrono::{DateTime, Utc};
use std::cmp::Ordering;
use tracing::debug;
use unicode_normalization::{char::is_combining_mark, UnicodeNormalization};

use crate::models::Report;
use crate::query::SortKey;

/// Collation key approximating a locale-aware compare: accents and case are
/// ignored first, accented lower-case text breaks the tie, then case with
/// lower case first. Missing titles go last.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
struct TitleKey {
    missing: bool,
    primary: String,
    secondary: String,
    uppercase: Vec<bool>,
}

impl TitleKey {
    fn new(title: Option<&str>) -> Self {
        let title = title.unwrap_or_default();
        let composed: String = title.nfc().collect();
        let uppercase = composed.chars().map(char::is_uppercase).collect();
        let secondary = composed.to_lowercase();
        let primary: String = title
            .nfd()
            .filter(|c| !is_combining_mark(*c))
            .collect::<String>()
            .to_lowercase();
        TitleKey {
            missing: title.trim().is_empty(),
            primary,
            secondary,
            uppercase,
        }
    }
}

/// Dated records first in the requested direction; undated ones after them.
fn by_created_at(a: Option<DateTime<Utc>>, b: Option<DateTime<Utc>>, newest_first: bool) -> Ordering {
    match (a, b) {
        (Some(a), Some(b)) if newest_first => b.cmp(&a),
        (Some(a), Some(b)) => a.cmp(&b),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

/// Stable sort into a new vector. The input slice is left untouched and
/// [`SortKey::Unsorted`] returns it in its original order.
pub fn sort_reports<'a>(reports: &[&'a Report], key: SortKey) -> Vec<&'a Report> {
    let mut out = reports.to_vec();
    match key {
        SortKey::Newest => out.sort_by(|a, b| by_created_at(a.created_at, b.created_at, true)),
        SortKey::Oldest => out.sort_by(|a, b| by_created_at(a.created_at, b.created_at, false)),
        SortKey::Rating => out.sort_by(|a, b| {
            b.sort_rating()
                .partial_cmp(&a.sort_rating())
                .unwrap_or(Ordering::Equal)
        }),
        SortKey::Title => out.sort_by_cached_key(|r| TitleKey::new(r.title.as_deref())),
        SortKey::Unsorted => {}
    }
    debug!("Sort applied - key={}, records={}", key, out.len());
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api_types::parse_timestamp;
    use serde_json::json;

    fn dated(id: &str, title: &str, created: Option<&str>, rating: Option<f64>) -> Report {
        let mut r = Report::new(id, title);
        r.created_at = created.and_then(|c| parse_timestamp(&json!(c)));
        r.rating = rating;
        r
    }

    fn ids(v: &[&Report]) -> Vec<String> {
        v.iter().map(|r| r.id.clone()).collect()
    }

    fn fixture() -> Vec<Report> {
        vec![
            dated("a", "beta", Some("2024-01-01"), Some(4.0)),
            dated("b", "Alpha", Some("2023-06-01"), Some(5.0)),
            dated("c", "Gamma", None, None),
            dated("d", "alpha", Some("2024-01-01"), Some(4.0)),
            dated("e", "Émile", Some("2022-02-02"), Some(3.5)),
        ]
    }

    #[test]
    fn newest_and_oldest() {
        let c = fixture();
        let refs: Vec<&Report> = c.iter().collect();
        assert_eq!(ids(&sort_reports(&refs, SortKey::Newest)), ["a", "d", "b", "e", "c"]);
        assert_eq!(ids(&sort_reports(&refs, SortKey::Oldest)), ["e", "b", "a", "d", "c"]);
    }

    #[test]
    fn rating_descending_with_absent_as_zero() {
        let c = fixture();
        let refs: Vec<&Report> = c.iter().collect();
        assert_eq!(ids(&sort_reports(&refs, SortKey::Rating)), ["b", "a", "d", "e", "c"]);
    }

    #[test]
    fn title_is_case_and_accent_insensitive() {
        let c = fixture();
        let refs: Vec<&Report> = c.iter().collect();
        assert_eq!(ids(&sort_reports(&refs, SortKey::Title)), ["d", "b", "a", "e", "c"]);
    }

    #[test]
    fn title_ties_break_lower_case_first() {
        let c = vec![
            dated("1", "Alpha", None, None),
            dated("2", "alpha", None, None),
            dated("3", "ALPHA", None, None),
        ];
        let refs: Vec<&Report> = c.iter().collect();
        let titles: Vec<&str> = sort_reports(&refs, SortKey::Title)
            .iter()
            .map(|r| r.title_str())
            .collect();
        assert_eq!(titles, ["alpha", "Alpha", "ALPHA"]);
    }

    #[test]
    fn missing_titles_sort_last() {
        let mut untitled = dated("none", "", None, None);
        untitled.title = None;
        let c = vec![
            untitled,
            dated("blank", "   ", None, None),
            dated("z", "Zebra", None, None),
            dated("a", "aardvark", None, None),
        ];
        let refs: Vec<&Report> = c.iter().collect();
        assert_eq!(ids(&sort_reports(&refs, SortKey::Title)), ["a", "z", "none", "blank"]);
    }

    #[test]
    fn unknown_key_is_identity() {
        let c = fixture();
        let refs: Vec<&Report> = c.iter().collect();
        assert_eq!(ids(&sort_reports(&refs, SortKey::Unsorted)), ["a", "b", "c", "d", "e"]);
    }

    #[test]
    fn equal_keys_keep_input_order() {
        let c = vec![
            dated("x", "Same", Some("2024-01-01"), Some(2.0)),
            dated("y", "Same", Some("2024-01-01"), Some(2.0)),
            dated("z", "Same", Some("2024-01-01"), Some(2.0)),
        ];
        let forward: Vec<&Report> = c.iter().collect();
        let backward: Vec<&Report> = c.iter().rev().collect();
        for key in SortKey::OPTIONS {
            assert_eq!(ids(&sort_reports(&forward, key)), ["x", "y", "z"]);
            assert_eq!(ids(&sort_reports(&backward, key)), ["z", "y", "x"]);
        }
    }

    #[test]
    fn input_is_not_reordered() {
        let c = fixture();
        let refs: Vec<&Report> = c.iter().collect();
        let _ = sort_reports(&refs, SortKey::Title);
        assert_eq!(ids(&refs), ["a", "b", "c", "d", "e"]);
    }
}
