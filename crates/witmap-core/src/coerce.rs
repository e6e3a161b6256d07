//! Type coercion for curated fields.
//!
//! Every coercion returns `None` when the cell cannot carry a value for the
//! field; the caller leaves the field unset and moves on.

use std::ops::RangeInclusive;

use witmap_model::{CuratedField, ItemId, KnownFields, RawValue};

/// Priorities the work-tracking system accepts.
pub const PRIORITY_RANGE: RangeInclusive<i64> = 1..=4;

/// Trimmed text; blank cells are absent.
pub fn coerce_text(value: &RawValue) -> Option<String> {
    value.as_trimmed_text()
}

/// Base-10 priority within [`PRIORITY_RANGE`].
pub fn coerce_priority(value: &RawValue) -> Option<u8> {
    value
        .as_integer()
        .filter(|p| PRIORITY_RANGE.contains(p))
        .and_then(|p| u8::try_from(p).ok())
}

/// Numeric ids address existing items; anything else is kept as written.
pub fn coerce_id(value: &RawValue) -> Option<ItemId> {
    match value.as_integer() {
        Some(id) => Some(ItemId::Numeric(id)),
        None => value.as_trimmed_text().map(ItemId::Raw),
    }
}

/// Stores `value` into the matching slot of `known`.
///
/// Returns false when the value was dropped. The title has no slot here and
/// is always rejected.
pub fn apply_curated(known: &mut KnownFields, field: CuratedField, value: &RawValue) -> bool {
    match field {
        CuratedField::Title => false,
        CuratedField::Id => set(&mut known.id, coerce_id(value)),
        CuratedField::Priority => set(&mut known.priority, coerce_priority(value)),
        CuratedField::Steps => set(&mut known.steps, coerce_text(value)),
        CuratedField::AreaPath => set(&mut known.area_path, coerce_text(value)),
        CuratedField::IterationPath => set(&mut known.iteration_path, coerce_text(value)),
        CuratedField::Description => set(&mut known.description, coerce_text(value)),
        CuratedField::Tags => set(&mut known.tags, coerce_text(value)),
        CuratedField::AutomationStatus => set(&mut known.automation_status, coerce_text(value)),
    }
}

fn set<T>(slot: &mut Option<T>, value: Option<T>) -> bool {
    let stored = value.is_some();
    if stored {
        *slot = value;
    }
    stored
}
