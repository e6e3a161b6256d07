//! Field catalog access for the mapping engine.
//!
//! The remote work-tracking system is reached through [`CatalogFetcher`];
//! [`FieldCatalogCache`] memoizes its answers per project and item type and
//! falls back to [`default_field_catalog`] when the remote system is
//! unreachable.

#![deny(unsafe_code)]

pub mod cache;
pub mod fallback;
pub mod fetcher;

pub use cache::{CatalogKey, CatalogLookup, CatalogSource, FieldCatalogCache};
pub use fallback::default_field_catalog;
pub use fetcher::{CatalogFetcher, StaticCatalogFetcher};
