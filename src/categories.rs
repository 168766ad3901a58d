use itertools::Itertools;

use crate::models::Report;

/// Distinct, non-blank categories in ascending order. Callers pass the full
/// catalog so the filter options never shrink with the current view.
pub fn unique_categories<'a, I>(reports: I) -> Vec<String>
where
    I: IntoIterator<Item = &'a Report>,
{
    reports
        .into_iter()
        .filter_map(|r| r.category.as_deref())
        .filter(|c| !c.trim().is_empty())
        .sorted_unstable()
        .dedup()
        .map(str::to_string)
        .collect()
}
