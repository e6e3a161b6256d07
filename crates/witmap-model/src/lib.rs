//! Shared types for mapping spreadsheet imports onto work item fields.
//!
//! Everything here is plain data: catalogs, raw rows, suggestions, resolved
//! mappings, records and the diagnostics collected while importing.

#![deny(unsafe_code)]

pub mod cell;
pub mod error;
pub mod field;
pub mod mapping;
pub mod options;
pub mod record;
pub mod result;

pub use cell::{RawRow, RawValue, format_numeric, parse_i64};
pub use error::{ImportError, Result};
pub use field::{CuratedField, FieldDefinition, FieldValueType, TITLE_REFERENCE_NAME, is_title};
pub use mapping::{FieldCandidate, MappingSuggestion, MatchReason, ResolvedEntry, ResolvedMapping};
pub use options::MappingOptions;
pub use record::{ItemId, KnownFields, MappedRecord, display_row_index};
pub use result::{Diagnostic, DiagnosticKind, ImportStats, OperationResult};
