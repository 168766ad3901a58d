// src/render.rs
use crate::bucket::{BucketPolicy, Section};
use crate::catalog::DerivedCatalog;
use crate::featured::{display_title, star_count, MAX_STARS};
use crate::models::Report;

pub const PAID_PRICE_LABEL: &str = "$10";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Cover<'a> {
    Image(&'a str),
    Free,
    Paid,
}

/// `marker` is the lower-cased whitepaper marker, see [`BucketPolicy::marker`].
pub fn cover<'a>(report: &'a Report, marker: &str) -> Cover<'a> {
    if let Some(url) = report.background_image.as_deref().filter(|u| !u.trim().is_empty()) {
        return Cover::Image(url);
    }
    if report.is_free || report.category_contains(marker) {
        Cover::Free
    } else {
        Cover::Paid
    }
}

pub fn heading(section: Section) -> &'static str {
    match section {
        Section::Top => "Top Report Section",
        Section::Whitepapers => "Whitepaper Section",
        Section::Market => "Market Intelligence Reports Section",
    }
}

pub fn blurb(section: Section) -> &'static str {
    match section {
        Section::Top => "Explore our collection of free whitepapers and paid market intelligence reports covering the latest trends, analyses, and forecasts in the pharmaceutical and life sciences industry.",
        Section::Whitepapers => "Access our free whitepapers to stay informed on critical industry topics.",
        Section::Market => "Our premium Market Intelligence Reports offer in-depth analyses for only $10 each.",
    }
}

pub fn empty_message(section: Section) -> &'static str {
    match section {
        Section::Top => "No reports found matching your criteria.",
        Section::Whitepapers => "No whitepapers found matching your criteria.",
        Section::Market => "No market intelligence reports found.",
    }
}

pub fn price_label(report: &Report, section: Section) -> Option<&'static str> {
    match section {
        Section::Top => report.is_free.then_some("FREE"),
        Section::Whitepapers => Some("FREE"),
        Section::Market => (!report.is_free).then_some(PAID_PRICE_LABEL),
    }
}

/// Button text, or `None` when the record has no download link.
pub fn action_label(report: &Report, section: Section) -> Option<&'static str> {
    if !report.has_download() {
        return None;
    }
    match section {
        Section::Market if !report.is_free => Some("Purchase & Download"),
        _ => Some("Download"),
    }
}

pub fn render_stars(rating: Option<f64>) -> String {
    let filled = star_count(rating) as usize;
    let mut out = "★".repeat(filled);
    out.push_str(&"☆".repeat(MAX_STARS as usize - filled));
    out
}

fn render_card(out: &mut String, report: &Report, section: Section, marker: &str) {
    out.push_str(&format!("- **{}**", report.title_str()));
    if let Some(category) = report.category.as_deref().filter(|c| !c.is_empty()) {
        out.push_str(&format!(" [{}]", category));
    }
    if let Some(price) = price_label(report, section) {
        out.push_str(&format!(" {}", price));
    }
    if let Cover::Image(url) = cover(report, marker) {
        out.push_str(&format!(" (cover: {})", url));
    }
    out.push('\n');

    let description = report.description_str().trim();
    if !description.is_empty() {
        out.push_str(&format!("  {}\n", description));
    }
    if let (Some(action), Some(url)) = (action_label(report, section), report.download_url.as_deref()) {
        out.push_str(&format!("  {}: {}\n", action, url));
    }
}

pub fn render_impact_report(report: &Report) -> String {
    let mut md = String::new();
    md.push_str("## Navigating Africa's Healthcare Evolution\n\n");
    md.push_str(&format!("### {}\n\n", display_title(report)));
    let description = report.description_str().trim();
    if !description.is_empty() {
        md.push_str(&format!("{}\n\n", description));
    }
    if star_count(report.rating) > 0 {
        md.push_str(&format!("{}\n\n", render_stars(report.rating)));
    }
    md.push_str(&format!(
        "Download Report: {}\n",
        report.download_url.as_deref().unwrap_or("#")
    ));
    md
}

pub fn render_markdown(derived: &DerivedCatalog<'_>, policy: &BucketPolicy) -> String {
    let marker = policy.marker();
    let mut md = String::new();
    md.push_str("# Reports\n\n");

    if let Some(impact) = derived.impact_report {
        md.push_str(&render_impact_report(impact));
        md.push('\n');
    }

    md.push_str(&format!("Sort: {}", derived.query.sort_key.label()));
    if !derived.categories.is_empty() {
        md.push_str(&format!(" | Categories: {}", derived.categories.join(", ")));
    }
    md.push_str("\n\n");

    if let Some(summary) = &derived.summary {
        md.push_str(&format!("{}\n\n", summary));
    }

    for section in Section::ALL {
        md.push_str(&format!("## {}\n\n", heading(section)));
        md.push_str(&format!("{}\n\n", blurb(section)));
        let reports = derived.buckets.section(section);
        if reports.is_empty() {
            md.push_str(&format!("{}\n\n", empty_message(section)));
            continue;
        }
        for report in reports {
            render_card(&mut md, report, section, &marker);
        }
        md.push('\n');
    }

    md
}
