use serde::{Serialize, Serializer};
use std::fmt;
use tracing::debug;

/// Sentinel category value meaning "no category filter".
pub const ALL_CATEGORIES: &str = "all";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SortKey {
    #[default]
    Newest,
    Oldest,
    Rating,
    Title,
    /// Unknown key from the caller. Keeps the filtered order untouched.
    Unsorted,
}

impl SortKey {
    pub const OPTIONS: [SortKey; 4] = [SortKey::Newest, SortKey::Oldest, SortKey::Rating, SortKey::Title];

    /// Never fails: anything but the exact lower-case key names falls back
    /// to [`SortKey::Unsorted`].
    pub fn parse(value: &str) -> Self {
        match value {
            "newest" => SortKey::Newest,
            "oldest" => SortKey::Oldest,
            "rating" => SortKey::Rating,
            "title" => SortKey::Title,
            other => {
                debug!("Unknown sort key, keeping input order - key={}", other);
                SortKey::Unsorted
            }
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            SortKey::Newest => "newest",
            SortKey::Oldest => "oldest",
            SortKey::Rating => "rating",
            SortKey::Title => "title",
            SortKey::Unsorted => "unsorted",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            SortKey::Newest => "Latest",
            SortKey::Oldest => "Oldest",
            SortKey::Rating => "Highest Rating",
            SortKey::Title => "A-Z",
            SortKey::Unsorted => "Sort by",
        }
    }
}

impl From<&str> for SortKey {
    fn from(value: &str) -> Self {
        SortKey::parse(value)
    }
}

impl fmt::Display for SortKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub enum CategoryFilter {
    #[default]
    All,
    Only(String),
}

impl CategoryFilter {
    /// `"all"` is the sentinel; any other value (including an empty one) is a
    /// substring filter.
    pub fn parse(value: &str) -> Self {
        if value == ALL_CATEGORIES {
            CategoryFilter::All
        } else {
            CategoryFilter::Only(value.to_string())
        }
    }

    pub fn is_all(&self) -> bool {
        matches!(self, CategoryFilter::All)
    }

    /// Lower-cased, trimmed needle, or `None` when unfiltered.
    pub fn needle(&self) -> Option<String> {
        match self {
            CategoryFilter::All => None,
            CategoryFilter::Only(v) => Some(v.trim().to_lowercase()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            CategoryFilter::All => ALL_CATEGORIES,
            CategoryFilter::Only(v) => v,
        }
    }
}

impl Serialize for CategoryFilter {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl From<&str> for CategoryFilter {
    fn from(value: &str) -> Self {
        CategoryFilter::parse(value)
    }
}

/// User-driven input to the engine. Owned by the caller and updated through
/// [`Query::apply`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Query {
    pub search_term: String,
    pub sort_key: SortKey,
    pub category_filter: CategoryFilter,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QueryEvent {
    Search(String),
    Sort(SortKey),
    Category(CategoryFilter),
    Clear,
}

impl Query {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_search(mut self, term: impl Into<String>) -> Self {
        self.search_term = term.into();
        self
    }

    pub fn with_sort(mut self, key: impl Into<SortKey>) -> Self {
        self.sort_key = key.into();
        self
    }

    pub fn with_category(mut self, filter: impl Into<CategoryFilter>) -> Self {
        self.category_filter = filter.into();
        self
    }

    pub fn apply(&mut self, event: QueryEvent) {
        debug!("Query event - {:?}", event);
        match event {
            QueryEvent::Search(term) => self.search_term = term.trim().to_string(),
            QueryEvent::Sort(key) => self.sort_key = key,
            QueryEvent::Category(filter) => self.category_filter = filter,
            QueryEvent::Clear => *self = Query::default(),
        }
    }

    /// Lower-cased, trimmed search needle, or `None` for a blank term.
    pub fn search_needle(&self) -> Option<String> {
        let trimmed = self.search_term.trim();
        (!trimmed.is_empty()).then(|| trimmed.to_lowercase())
    }

    pub fn is_filtered(&self) -> bool {
        self.search_needle().is_some() || !self.category_filter.is_all()
    }

    /// Result banner shown while a search or category filter is active.
    pub fn summary(&self, result_count: usize) -> Option<String> {
        if !self.is_filtered() {
            return None;
        }
        let mut out = format!(
            "Found {} report{}",
            result_count,
            if result_count == 1 { "" } else { "s" }
        );
        let term = self.search_term.trim();
        if !term.is_empty() {
            out.push_str(&format!(" for \"{}\"", term));
        }
        if let CategoryFilter::Only(category) = &self.category_filter {
            out.push_str(&format!(" in {}", category));
        }
        Some(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let q = Query::new();
        assert_eq!(q.search_term, "");
        assert_eq!(q.sort_key, SortKey::Newest);
        assert_eq!(q.category_filter, CategoryFilter::All);
        assert!(!q.is_filtered());
        assert_eq!(q.summary(3), None);
    }

    #[test]
    fn unknown_sort_key_is_unsorted() {
        assert_eq!(SortKey::parse("rating"), SortKey::Rating);
        assert_eq!(SortKey::parse("title"), SortKey::Title);
        assert_eq!(SortKey::parse("Title"), SortKey::Unsorted);
        assert_eq!(SortKey::parse(" rating"), SortKey::Unsorted);
        assert_eq!(SortKey::parse("popularity"), SortKey::Unsorted);
        assert_eq!(SortKey::parse(""), SortKey::Unsorted);
    }

    #[test]
    fn category_sentinel() {
        assert!(CategoryFilter::parse("all").is_all());
        assert_eq!(CategoryFilter::parse("All"), CategoryFilter::Only("All".into()));
        assert_eq!(CategoryFilter::parse(" White ").needle().as_deref(), Some("white"));
    }

    #[test]
    fn blank_search_is_no_filter() {
        let q = Query::new().with_search("   \t");
        assert_eq!(q.search_needle(), None);
        assert!(!q.is_filtered());
    }

    #[test]
    fn reducer_events() {
        let mut q = Query::new();
        q.apply(QueryEvent::Search("  Vaccine ".into()));
        q.apply(QueryEvent::Sort(SortKey::Title));
        q.apply(QueryEvent::Category(CategoryFilter::parse("Whitepaper")));
        assert_eq!(q.search_term, "Vaccine");
        assert_eq!(q.sort_key, SortKey::Title);
        assert_eq!(q.category_filter.as_str(), "Whitepaper");

        q.apply(QueryEvent::Clear);
        assert_eq!(q, Query::default());
    }

    #[test]
    fn summary_banner() {
        let q = Query::new().with_search("vaccine");
        assert_eq!(q.summary(1).as_deref(), Some("Found 1 report for \"vaccine\""));

        let q = q.with_category("Market Intelligence");
        assert_eq!(
            q.summary(0).as_deref(),
            Some("Found 0 reports for \"vaccine\" in Market Intelligence")
        );

        let q = Query::new().with_category("Whitepaper");
        assert_eq!(q.summary(2).as_deref(), Some("Found 2 reports in Whitepaper"));
    }
}
