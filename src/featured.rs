use crate::models::Report;

pub const IMPACT_CATEGORY: &str = "Impact Report";
pub const TITLE_PREFIX: &str = "PBR - ";
pub const MAX_STARS: u8 = 5;

/// The headline impact report: first free record filed exactly under
/// "Impact Report". Looked up on the full catalog, not on a filtered view.
pub fn impact_report<'a, I>(reports: I) -> Option<&'a Report>
where
    I: IntoIterator<Item = &'a Report>,
{
    reports
        .into_iter()
        .find(|r| r.is_free && r.category.as_deref() == Some(IMPACT_CATEGORY))
}

pub fn display_title(report: &Report) -> &str {
    let title = report.title_str();
    title.strip_prefix(TITLE_PREFIX).unwrap_or(title)
}

/// Filled stars for a rating, floor-rounded and clamped to 0..=5.
pub fn star_count(rating: Option<f64>) -> u8 {
    match rating {
        Some(r) if r.is_finite() && r > 0.0 => r.floor().min(MAX_STARS as f64) as u8,
        _ => 0,
    }
}
