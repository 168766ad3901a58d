//! Filtered, sorted and bucketed views over a research report catalog.
//!
//! The engine stages ([`filter_catalog`], [`sort_reports`], [`bucketize`],
//! [`unique_categories`]) are pure functions over borrowed records. The
//! [`fetch`] and [`render`] modules are the collaborators the binary uses to
//! load a catalog from the CMS and print the page sections.

pub mod api_types;
pub mod bucket;
pub mod catalog;
pub mod categories;
pub mod featured;
pub mod fetch;
pub mod filter;
pub mod models;
pub mod query;
pub mod render;
pub mod sort;

pub use bucket::{bucketize, bucketize_with, BucketPolicy, Buckets, Section};
pub use catalog::{Catalog, DerivedCatalog, LoadState};
pub use categories::unique_categories;
pub use filter::filter_catalog;
pub use models::Report;
pub use query::{CategoryFilter, Query, QueryEvent, SortKey};
pub use sort::sort_reports;
