use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::{fs, path::Path};
use tracing::debug;

use crate::models::Report;

pub const DEFAULT_SECTION_LIMIT: usize = 4;
pub const DEFAULT_WHITEPAPER_MARKER: &str = "white";

/// Business rules for splitting a view into page sections. The defaults
/// reproduce the live site: four cards per section, and a "whitepaper" is any
/// free record whose category mentions "white".
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BucketPolicy {
    pub top_limit: usize,
    pub whitepaper_limit: usize,
    pub market_limit: usize,
    pub whitepaper_marker: String,
}

impl Default for BucketPolicy {
    fn default() -> Self {
        Self {
            top_limit: DEFAULT_SECTION_LIMIT,
            whitepaper_limit: DEFAULT_SECTION_LIMIT,
            market_limit: DEFAULT_SECTION_LIMIT,
            whitepaper_marker: DEFAULT_WHITEPAPER_MARKER.to_string(),
        }
    }
}

impl BucketPolicy {
    /// Reads a JSON policy file; omitted keys keep their defaults.
    pub fn load(path: &Path) -> Result<Self> {
        let raw = fs::read_to_string(path)
            .with_context(|| format!("Reading bucket policy {}", path.display()))?;
        let policy: BucketPolicy = serde_json::from_str(&raw)
            .with_context(|| format!("Decoding bucket policy {}", path.display()))?;
        debug!("Bucket policy loaded - path={}, policy={:?}", path.display(), policy);
        Ok(policy)
    }

    pub fn marker(&self) -> String {
        self.whitepaper_marker.to_lowercase()
    }

    /// A free record whose category carries the whitepaper marker. Every
    /// other record belongs to the market section.
    pub fn is_free_whitepaper(&self, report: &Report) -> bool {
        is_marked_free(report, &self.marker())
    }
}

/// `marker` must already be lower-cased.
fn is_marked_free(report: &Report, marker: &str) -> bool {
    report.is_free && report.category_contains(marker)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Section {
    Top,
    Whitepapers,
    Market,
}

impl Section {
    pub const ALL: [Section; 3] = [Section::Top, Section::Whitepapers, Section::Market];
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Buckets<'a> {
    pub top: Vec<&'a Report>,
    pub whitepapers: Vec<&'a Report>,
    pub market: Vec<&'a Report>,
}

impl<'a> Buckets<'a> {
    pub fn section(&self, section: Section) -> &[&'a Report] {
        match section {
            Section::Top => &self.top,
            Section::Whitepapers => &self.whitepapers,
            Section::Market => &self.market,
        }
    }
}

pub fn bucketize<'a>(view: &[&'a Report]) -> Buckets<'a> {
    bucketize_with(view, &BucketPolicy::default())
}

/// Three independent passes over the same filtered and sorted view. A record
/// may show up in `top` and in one of the other two sections.
pub fn bucketize_with<'a>(view: &[&'a Report], policy: &BucketPolicy) -> Buckets<'a> {
    let marker = policy.marker();
    let top: Vec<&Report> = view.iter().copied().take(policy.top_limit).collect();
    let whitepapers: Vec<&Report> = view
        .iter()
        .copied()
        .filter(|r| is_marked_free(r, &marker))
        .take(policy.whitepaper_limit)
        .collect();
    let market: Vec<&Report> = view
        .iter()
        .copied()
        .filter(|r| !is_marked_free(r, &marker))
        .take(policy.market_limit)
        .collect();

    debug!(
        "Bucketized view - records={}, top={}, whitepapers={}, market={}",
        view.len(),
        top.len(),
        whitepapers.len(),
        market.len()
    );

    Buckets {
        top,
        whitepapers,
        market,
    }
}
