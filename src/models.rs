use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::api_types::ApiReport;

/// One catalog entry as the engine sees it.
///
/// Every field that the CMS may omit or send with the wrong type is optional
/// here; decoding goes through [`ApiReport`] so a single bad record never
/// fails the whole payload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "ApiReport")]
#[serde(rename_all = "camelCase")]
pub struct Report {
    #[serde(rename = "_id")]
    pub id: String,
    pub title: Option<String>,
    pub description: Option<String>,
    pub category: Option<String>,
    pub is_free: bool,
    pub rating: Option<f64>,
    pub created_at: Option<DateTime<Utc>>,
    pub download_url: Option<String>,
    pub background_image: Option<String>,
}

impl Report {
    pub fn new(id: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: Some(title.into()),
            description: None,
            category: None,
            is_free: false,
            rating: None,
            created_at: None,
            download_url: None,
            background_image: None,
        }
    }

    pub fn title_str(&self) -> &str {
        self.title.as_deref().unwrap_or("")
    }

    pub fn description_str(&self) -> &str {
        self.description.as_deref().unwrap_or("")
    }

    /// Rating used for ordering: absent or non-finite values count as 0.
    pub fn sort_rating(&self) -> f64 {
        match self.rating {
            Some(r) if r.is_finite() => r,
            _ => 0.0,
        }
    }

    /// Case-insensitive substring test on the category. `needle` must already
    /// be lower-cased. A missing category never matches.
    pub fn category_contains(&self, needle: &str) -> bool {
        self.category
            .as_deref()
            .is_some_and(|c| c.to_lowercase().contains(needle))
    }

    pub fn has_download(&self) -> bool {
        self.download_url.as_deref().is_some_and(|u| !u.trim().is_empty())
    }
}
