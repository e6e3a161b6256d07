//! The seam to the remote field catalog.

use std::collections::HashMap;

use anyhow::{Context, Result, bail};
use witmap_model::FieldDefinition;

use crate::cache::CatalogKey;

/// Source of live field catalogs, one per project and item type.
///
/// Implementations talk to the remote work-tracking system and may fail for
/// any transport or authorization reason; the cache turns failures into a
/// degraded-mode warning.
pub trait CatalogFetcher: Send + Sync {
    fn fetch_field_catalog(&self, project: &str, item_type: &str) -> Result<Vec<FieldDefinition>>;
}

impl<F> CatalogFetcher for F
where
    F: Fn(&str, &str) -> Result<Vec<FieldDefinition>> + Send + Sync,
{
    fn fetch_field_catalog(&self, project: &str, item_type: &str) -> Result<Vec<FieldDefinition>> {
        self(project, item_type)
    }
}

/// Fetcher serving catalogs registered up front, e.g. exported JSON files.
#[derive(Debug, Clone, Default)]
pub struct StaticCatalogFetcher {
    catalogs: HashMap<CatalogKey, Vec<FieldDefinition>>,
}

impl StaticCatalogFetcher {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_catalog(
        mut self,
        project: &str,
        item_type: &str,
        fields: Vec<FieldDefinition>,
    ) -> Self {
        self.catalogs
            .insert(CatalogKey::new(project, item_type), fields);
        self
    }

    /// Registers a catalog given as a JSON array of field definitions.
    pub fn with_catalog_json(self, project: &str, item_type: &str, json: &str) -> Result<Self> {
        let fields: Vec<FieldDefinition> = serde_json::from_str(json).with_context(|| {
            format!("Failed to parse field catalog for {project}/{item_type}")
        })?;
        Ok(self.with_catalog(project, item_type, fields))
    }
}

impl CatalogFetcher for StaticCatalogFetcher {
    fn fetch_field_catalog(&self, project: &str, item_type: &str) -> Result<Vec<FieldDefinition>> {
        match self.catalogs.get(&CatalogKey::new(project, item_type)) {
            Some(fields) => Ok(fields.clone()),
            None => bail!("no field catalog registered for {project}/{item_type}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn static_fetcher_serves_registered_catalogs() {
        let fetcher = StaticCatalogFetcher::new()
            .with_catalog_json(
                "P",
                "Test Case",
                r#"[
                    {"referenceName": "System.Title", "displayName": "Title", "required": true},
                    {"referenceName": "Custom.RiskLevel", "displayName": "Risk Level", "valueType": "string"}
                ]"#,
            )
            .expect("catalog json");

        let fields = fetcher.fetch_field_catalog("P", "Test Case").expect("catalog");
        assert_eq!(fields.len(), 2);
        assert!(fields[0].required);
        assert_eq!(fields[1].display_name, "Risk Level");

        let err = fetcher.fetch_field_catalog("P", "Bug").unwrap_err();
        assert!(err.to_string().contains("P/Bug"));
    }

    #[test]
    fn rejects_malformed_catalog_json() {
        let err = StaticCatalogFetcher::new()
            .with_catalog_json("P", "Bug", "[{\"displayName\": 1}]")
            .unwrap_err();
        assert!(format!("{err:#}").contains("Failed to parse field catalog for P/Bug"));
    }
}
