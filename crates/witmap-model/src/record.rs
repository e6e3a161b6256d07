use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::cell::{RawRow, RawValue};

/// Work item identifier taken from an import row.
///
/// Numeric ids address existing items; anything else is kept verbatim so the
/// caller can report it instead of silently creating a new item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ItemId {
    Numeric(i64),
    Raw(String),
}

impl fmt::Display for ItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Numeric(id) => write!(f, "{id}"),
            Self::Raw(id) => f.write_str(id),
        }
    }
}

/// Coerced values of the curated fields other than the title.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct KnownFields {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<ItemId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub steps: Option<String>,
    /// Always within 1..=4 when present.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub priority: Option<u8>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub area_path: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub iteration_path: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tags: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub automation_status: Option<String>,
}

/// One import row turned into a create/update payload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MappedRecord {
    /// Trimmed, never empty.
    pub title: String,
    pub known_fields: KnownFields,
    /// Resolved fields outside the curated set, values untouched.
    pub extra_fields: BTreeMap<String, RawValue>,
    pub original_row: RawRow,
    /// Row number as shown in the source sheet (header row is row 1).
    pub row_index: usize,
}

impl MappedRecord {
    pub fn has_id(&self) -> bool {
        self.known_fields.id.is_some()
    }
}

/// Row number a human sees for the zero-based data row `index`.
pub fn display_row_index(index: usize) -> usize {
    index + 2
}
