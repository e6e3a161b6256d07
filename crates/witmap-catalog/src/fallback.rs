//! Built-in catalog used when the live catalog cannot be fetched.

use witmap_model::{CuratedField, FieldDefinition};

/// Default field list covering the curated fields.
///
/// Enough to import titles, steps and the common planning fields while the
/// remote catalog is unavailable; custom fields cannot be matched in this
/// mode.
pub fn default_field_catalog() -> Vec<FieldDefinition> {
    CuratedField::ALL.iter().map(CuratedField::definition).collect()
}
