//! Per-project field catalog cache.
//!
//! Catalogs are fetched once per (project, item type) and reused until
//! invalidated. A failed fetch is never cached: the caller gets the built-in
//! fallback catalog plus a degraded-mode warning, and the next lookup tries
//! the remote system again.

use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, RwLock};

use tracing::{debug, info, trace, warn};
use witmap_model::{Diagnostic, DiagnosticKind, FieldDefinition};

use crate::fallback::default_field_catalog;
use crate::fetcher::CatalogFetcher;

/// Cache key. Project and item type are compared case-sensitively.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CatalogKey {
    pub project: String,
    pub item_type: String,
}

impl CatalogKey {
    pub fn new(project: &str, item_type: &str) -> Self {
        Self {
            project: project.to_string(),
            item_type: item_type.to_string(),
        }
    }
}

impl fmt::Display for CatalogKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.project, self.item_type)
    }
}

/// Where a looked-up catalog came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CatalogSource {
    /// Served from the cache without contacting the remote system.
    Cached,
    /// Fetched from the remote system and stored.
    Fetched,
    /// Fetch failed; the built-in catalog was returned and nothing was stored.
    Fallback,
}

/// A catalog lookup result.
#[derive(Debug, Clone)]
pub struct CatalogLookup {
    pub fields: Arc<[FieldDefinition]>,
    pub source: CatalogSource,
    /// Set when `source` is [`CatalogSource::Fallback`].
    pub warning: Option<Diagnostic>,
}

impl CatalogLookup {
    pub fn is_degraded(&self) -> bool {
        self.source == CatalogSource::Fallback
    }

    pub fn to_vec(&self) -> Vec<FieldDefinition> {
        self.fields.to_vec()
    }
}

type Entries = HashMap<CatalogKey, Arc<[FieldDefinition]>>;

/// Thread-safe catalog cache shared by every import in the process.
///
/// Cloning is cheap and clones share entries. Two threads missing the same
/// key at once may both fetch; the last write wins and both results are
/// equivalent catalogs.
#[derive(Clone)]
pub struct FieldCatalogCache {
    fetcher: Arc<dyn CatalogFetcher>,
    entries: Arc<RwLock<Entries>>,
}

impl fmt::Debug for FieldCatalogCache {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FieldCatalogCache")
            .field("entries", &self.len())
            .finish_non_exhaustive()
    }
}

impl FieldCatalogCache {
    pub fn new(fetcher: impl CatalogFetcher + 'static) -> Self {
        Self::from_shared(Arc::new(fetcher))
    }

    pub fn from_shared(fetcher: Arc<dyn CatalogFetcher>) -> Self {
        Self {
            fetcher,
            entries: Arc::default(),
        }
    }

    /// Looks up the catalog for `project`/`item_type`, fetching on a miss.
    pub fn get(&self, project: &str, item_type: &str) -> CatalogLookup {
        let key = CatalogKey::new(project, item_type);
        if let Some(fields) = self.cached(&key) {
            trace!(catalog = %key, "field catalog cache hit");
            return CatalogLookup {
                fields,
                source: CatalogSource::Cached,
                warning: None,
            };
        }

        debug!(catalog = %key, "field catalog cache miss");
        match self.fetch(&key) {
            Ok(fields) => {
                info!(catalog = %key, fields = fields.len(), "field catalog fetched");
                if let Ok(mut entries) = self.entries.write() {
                    entries.insert(key, Arc::clone(&fields));
                }
                CatalogLookup {
                    fields,
                    source: CatalogSource::Fetched,
                    warning: None,
                }
            }
            Err(err) => {
                warn!(
                    catalog = %key,
                    error = %format!("{err:#}"),
                    "field catalog unavailable, using built-in fallback"
                );
                let warning = Diagnostic::new(
                    DiagnosticKind::SchemaFetchDegraded,
                    format!(
                        "Could not load the field catalog for {key}; \
                         only standard fields can be mapped ({err})"
                    ),
                );
                CatalogLookup {
                    fields: default_field_catalog().into(),
                    source: CatalogSource::Fallback,
                    warning: Some(warning),
                }
            }
        }
    }

    /// Catalog for `project`/`item_type`, fetched on first use.
    ///
    /// Never fails; see [`Self::get`] for the degraded-mode details.
    pub fn get_cached_catalog(&self, project: &str, item_type: &str) -> Vec<FieldDefinition> {
        self.get(project, item_type).to_vec()
    }

    /// Drops cached catalogs.
    ///
    /// With both `project` and `item_type` only that entry is removed;
    /// otherwise the whole cache is cleared. Returns the number of entries
    /// removed.
    pub fn invalidate(&self, project: Option<&str>, item_type: Option<&str>) -> usize {
        let Ok(mut entries) = self.entries.write() else {
            return 0;
        };
        let removed = match (project, item_type) {
            (Some(project), Some(item_type)) => entries
                .remove(&CatalogKey::new(project, item_type))
                .map_or(0, |_| 1),
            _ => {
                let count = entries.len();
                entries.clear();
                count
            }
        };
        debug!(removed, "field catalog cache invalidated");
        removed
    }

    pub fn contains(&self, project: &str, item_type: &str) -> bool {
        self.entries
            .read()
            .map(|e| e.contains_key(&CatalogKey::new(project, item_type)))
            .unwrap_or(false)
    }

    pub fn len(&self) -> usize {
        self.entries.read().map(|e| e.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn cached(&self, key: &CatalogKey) -> Option<Arc<[FieldDefinition]>> {
        self.entries.read().ok()?.get(key).cloned()
    }

    fn fetch(&self, key: &CatalogKey) -> anyhow::Result<Arc<[FieldDefinition]>> {
        let fields = self
            .fetcher
            .fetch_field_catalog(&key.project, &key.item_type)?;
        if fields.is_empty() {
            anyhow::bail!("the remote system returned an empty field list");
        }
        Ok(fields.into())
    }
}
