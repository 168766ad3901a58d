use serde::Serialize;
use std::sync::Arc;
use tracing::{debug, info, warn};

use crate::bucket::{bucketize_with, BucketPolicy, Buckets};
use crate::categories::unique_categories;
use crate::featured::impact_report;
use crate::filter::filter_catalog;
use crate::models::Report;
use crate::query::Query;
use crate::sort::sort_reports;

/// Source of truth for one fetch. Immutable once built; a re-fetch replaces
/// the whole value. Clones share the same records.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    reports: Arc<[Report]>,
}

/// Everything a report page needs for one (catalog, query) pair. Records are
/// borrowed from the catalog.
#[derive(Debug, Clone, Serialize)]
pub struct DerivedCatalog<'a> {
    pub query: Query,
    pub view: Vec<&'a Report>,
    pub buckets: Buckets<'a>,
    pub categories: Vec<String>,
    pub summary: Option<String>,
    pub impact_report: Option<&'a Report>,
}

impl Catalog {
    pub fn new(reports: Vec<Report>) -> Self {
        Self {
            reports: reports.into(),
        }
    }

    pub fn reports(&self) -> &[Report] {
        &self.reports
    }

    pub fn len(&self) -> usize {
        self.reports.len()
    }

    pub fn is_empty(&self) -> bool {
        self.reports.is_empty()
    }

    pub fn categories(&self) -> Vec<String> {
        unique_categories(self.reports.iter())
    }

    pub fn derive(&self, query: &Query) -> DerivedCatalog<'_> {
        self.derive_with(query, &BucketPolicy::default())
    }

    /// filter -> sort -> bucketize. Categories and the impact report always
    /// come from the full catalog.
    pub fn derive_with(&self, query: &Query, policy: &BucketPolicy) -> DerivedCatalog<'_> {
        let filtered = filter_catalog(self.reports.iter(), query);
        let view = sort_reports(&filtered, query.sort_key);
        let buckets = bucketize_with(&view, policy);
        let summary = query.summary(view.len());
        debug!(
            "Derived catalog view - catalog={}, view={}, sort={}",
            self.len(),
            view.len(),
            query.sort_key
        );

        DerivedCatalog {
            query: query.clone(),
            view,
            buckets,
            categories: self.categories(),
            summary,
            impact_report: impact_report(self.reports.iter()),
        }
    }
}

impl From<Vec<Report>> for Catalog {
    fn from(reports: Vec<Report>) -> Self {
        Catalog::new(reports)
    }
}

impl FromIterator<Report> for Catalog {
    fn from_iter<T: IntoIterator<Item = Report>>(iter: T) -> Self {
        Catalog::new(iter.into_iter().collect())
    }
}

/// Page load lifecycle: `Idle -> Loading -> Ready | Failed`, with retry
/// re-entering `Loading` from any state.
#[derive(Debug, Clone, Default)]
pub enum LoadState {
    #[default]
    Idle,
    Loading,
    Ready(Catalog),
    Failed(String),
}

impl LoadState {
    pub fn begin_load(&mut self) {
        debug!("Catalog load starting - previous={}", self.name());
        *self = LoadState::Loading;
    }

    /// Settles a pending load. Results arriving outside `Loading` are stale
    /// and dropped.
    pub fn finish(&mut self, result: anyhow::Result<Vec<Report>>) {
        if !self.is_loading() {
            warn!("Dropping load result outside of loading state - state={}", self.name());
            return;
        }
        *self = match result {
            Ok(reports) => {
                info!("Catalog ready - reports={}", reports.len());
                LoadState::Ready(Catalog::new(reports))
            }
            Err(e) => {
                warn!("Catalog load failed - error={:#}", e);
                LoadState::Failed(format!("{:#}", e))
            }
        };
    }

    pub fn is_loading(&self) -> bool {
        matches!(self, LoadState::Loading)
    }

    pub fn catalog(&self) -> Option<&Catalog> {
        match self {
            LoadState::Ready(catalog) => Some(catalog),
            _ => None,
        }
    }

    pub fn error(&self) -> Option<&str> {
        match self {
            LoadState::Failed(msg) => Some(msg),
            _ => None,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            LoadState::Idle => "idle",
            LoadState::Loading => "loading",
            LoadState::Ready(_) => "ready",
            LoadState::Failed(_) => "failed",
        }
    }
}
