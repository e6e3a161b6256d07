use std::fmt;

use serde::{Deserialize, Serialize};

use crate::record::MappedRecord;

/// Category of a diagnostic raised while mapping an import.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum DiagnosticKind {
    /// Catalog fetch failed; the built-in fallback catalog was used.
    SchemaFetchDegraded,
    /// No header maps to the title. Fatal for the whole operation.
    RequiredFieldUnresolved,
    /// A row could not be turned into a record and was left out.
    RowProcessingError,
    /// A header has several close candidates.
    AmbiguousMapping,
    /// Which field a header was mapped to, and why.
    MappingSummary,
    /// A header matched nothing, or was left for review.
    UnmappedHeader,
    /// Several headers feed the same field.
    DuplicateTarget,
    /// A header targets a field the remote system will not accept writes for.
    ReadOnlyTarget,
    /// A field the catalog marks as required has no column.
    RequiredFieldMissing,
}

impl DiagnosticKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::SchemaFetchDegraded => "SchemaFetchDegraded",
            Self::RequiredFieldUnresolved => "RequiredFieldUnresolved",
            Self::RowProcessingError => "RowProcessingError",
            Self::AmbiguousMapping => "AmbiguousMapping",
            Self::MappingSummary => "MappingSummary",
            Self::UnmappedHeader => "UnmappedHeader",
            Self::DuplicateTarget => "DuplicateTarget",
            Self::ReadOnlyTarget => "ReadOnlyTarget",
            Self::RequiredFieldMissing => "RequiredFieldMissing",
        }
    }
}

impl fmt::Display for DiagnosticKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A single error or warning attached to an [`OperationResult`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Diagnostic {
    pub kind: DiagnosticKind,
    /// Source-sheet row number, for row-scoped diagnostics.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub row_index: Option<usize>,
    /// Header the diagnostic is about, if any.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub header: Option<String>,
    pub message: String,
}

impl Diagnostic {
    pub fn new(kind: DiagnosticKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            row_index: None,
            header: None,
            message: message.into(),
        }
    }

    #[must_use]
    pub fn with_row(mut self, row_index: usize) -> Self {
        self.row_index = Some(row_index);
        self
    }

    #[must_use]
    pub fn with_header(mut self, header: impl Into<String>) -> Self {
        self.header = Some(header.into());
        self
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.row_index {
            Some(row) => write!(f, "Row {row}: {}", self.message),
            None => f.write_str(&self.message),
        }
    }
}

/// Row counters for one import operation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImportStats {
    /// Rows handed to the mapper, including skipped and failed ones.
    pub total_rows: usize,
    /// Rows that produced a record.
    pub valid_rows: usize,
    /// Records carrying an id (updates).
    pub rows_with_id: usize,
    /// Records without an id (creates).
    pub rows_without_id: usize,
}

/// Everything an import operation produced: usable records plus every
/// diagnostic raised on the way.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OperationResult {
    pub records: Vec<MappedRecord>,
    pub errors: Vec<Diagnostic>,
    pub warnings: Vec<Diagnostic>,
    pub stats: ImportStats,
}

impl OperationResult {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push_error(&mut self, diagnostic: Diagnostic) {
        self.errors.push(diagnostic);
    }

    pub fn push_warning(&mut self, diagnostic: Diagnostic) {
        self.warnings.push(diagnostic);
    }

    /// Appends a record and updates the record counters.
    pub fn push_record(&mut self, record: MappedRecord) {
        self.stats.valid_rows += 1;
        if record.has_id() {
            self.stats.rows_with_id += 1;
        } else {
            self.stats.rows_without_id += 1;
        }
        self.records.push(record);
    }

    pub fn error_count(&self) -> usize {
        self.errors.len()
    }

    pub fn warning_count(&self) -> usize {
        self.warnings.len()
    }

    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }

    /// True if the whole operation failed rather than individual rows.
    pub fn is_fatal(&self) -> bool {
        self.errors
            .iter()
            .any(|e| e.kind == DiagnosticKind::RequiredFieldUnresolved)
    }

    pub fn errors_of(&self, kind: DiagnosticKind) -> impl Iterator<Item = &Diagnostic> {
        self.errors.iter().filter(move |e| e.kind == kind)
    }

    pub fn warnings_of(&self, kind: DiagnosticKind) -> impl Iterator<Item = &Diagnostic> {
        self.warnings.iter().filter(move |w| w.kind == kind)
    }

    pub fn error_messages(&self) -> Vec<String> {
        self.errors.iter().map(ToString::to_string).collect()
    }

    pub fn warning_messages(&self) -> Vec<String> {
        self.warnings.iter().map(ToString::to_string).collect()
    }
}
