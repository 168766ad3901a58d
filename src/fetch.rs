use anyhow::{bail, Context, Result};
use reqwest::Client;
use serde_json::Value;
use std::{fs, path::Path};
use tracing::{debug, info, warn};

use crate::api_types::ApiReport;
use crate::models::Report;

pub const DEFAULT_ENDPOINT: &str = "https://cms.pbr.com.ng/api/reports";

/// Decodes a CMS payload. The top level must be a JSON array; entries that
/// are not objects are skipped instead of failing the load.
pub fn parse_reports(body: &str) -> Result<Vec<Report>> {
    let value: Value = serde_json::from_str(body).context("Decoding report payload")?;
    let Value::Array(items) = value else {
        bail!("Report payload is not a JSON array");
    };

    let total = items.len();
    let reports: Vec<Report> = items
        .into_iter()
        .enumerate()
        .filter_map(|(idx, item)| {
            // serde would also map a JSON sequence onto the struct fields by position
            if !item.is_object() {
                warn!("Skipping non-object report entry - index={}", idx);
                return None;
            }
            match serde_json::from_value::<ApiReport>(item) {
                Ok(api) => Some(Report::from(api)),
                Err(e) => {
                    warn!("Skipping malformed report - index={}, error={}", idx, e);
                    None
                }
            }
        })
        .collect();

    debug!("Parsed report payload - entries={}, reports={}", total, reports.len());
    Ok(reports)
}

/// One GET against the CMS. Non-2xx responses and undecodable bodies are
/// errors; there is no retry here.
pub async fn fetch_reports(client: &Client, endpoint: &str) -> Result<Vec<Report>> {
    let start = std::time::Instant::now();
    debug!("Fetching reports - endpoint={}", endpoint);

    let resp = client
        .get(endpoint)
        .send()
        .await
        .with_context(|| format!("Request failed for {}", endpoint))?;

    let resp = resp
        .error_for_status()
        .with_context(|| format!("HTTP error for {}", endpoint))?;

    let body = resp
        .text()
        .await
        .with_context(|| format!("Reading body from {}", endpoint))?;

    let reports = normalize_reports(
        parse_reports(&body).with_context(|| format!("Decoding JSON for {}", endpoint))?,
    );

    let elapsed = start.elapsed();
    info!(
        "Report fetch completed - endpoint={}, duration={:.2}s, reports={}",
        endpoint,
        elapsed.as_secs_f32(),
        reports.len()
    );
    Ok(reports)
}

/// Offline counterpart of [`fetch_reports`] for a saved payload.
pub fn load_reports_file(path: &Path) -> Result<Vec<Report>> {
    let body = fs::read_to_string(path)
        .with_context(|| format!("Reading reports from {}", path.display()))?;
    let reports = normalize_reports(
        parse_reports(&body).with_context(|| format!("Decoding JSON in {}", path.display()))?,
    );
    info!("Loaded reports from file - path={}, reports={}", path.display(), reports.len());
    Ok(reports)
}

pub fn normalize_reports(mut reports: Vec<Report>) -> Vec<Report> {
    for r in reports.iter_mut() {
        if let Some(title) = r.title.as_mut() {
            *title = title.trim().to_string();
        }
        if let Some(category) = r.category.as_mut() {
            *category = category.trim().to_string();
        }
    }
    reports
}
