use tracing::debug;

use crate::models::Report;
use crate::query::Query;

fn contains_lower(field: Option<&str>, needle: &str) -> bool {
    field.is_some_and(|f| f.to_lowercase().contains(needle))
}

/// Title OR description contains `needle` (already lower-cased).
pub fn matches_search(report: &Report, needle: &str) -> bool {
    contains_lower(report.title.as_deref(), needle)
        || contains_lower(report.description.as_deref(), needle)
}

/// Keeps the records matching both the search term and the category filter.
/// Input order is preserved; nothing is cloned.
pub fn filter_catalog<'a, I>(reports: I, query: &Query) -> Vec<&'a Report>
where
    I: IntoIterator<Item = &'a Report>,
{
    let search = query.search_needle();
    let category = query.category_filter.needle();

    let mut seen = 0usize;
    let out: Vec<&Report> = reports
        .into_iter()
        .inspect(|_| seen += 1)
        .filter(|r| search.as_deref().map_or(true, |needle| matches_search(r, needle)))
        .filter(|r| category.as_deref().map_or(true, |needle| r.category_contains(needle)))
        .collect();

    debug!(
        "Filter applied - input={}, kept={}, search={:?}, category={:?}",
        seen,
        out.len(),
        search,
        category
    );
    out
}
