//! Batch import: header mapping, row mapping and result aggregation.
//!
//! # Example
//!
//! ```ignore
//! use witmap_core::ImportPipeline;
//!
//! let pipeline = ImportPipeline::default();
//! let outcome = pipeline.run_with_cache(&cache, "Web", "Test Case", &headers, &rows);
//! for warning in outcome.result.warning_messages() {
//!     println!("{warning}");
//! }
//! ```

use tracing::{debug, info, warn};
use witmap_catalog::{CatalogSource, FieldCatalogCache};
use witmap_map::{MappingEngine, SuggestionReport, SynonymTable};
use witmap_model::{
    Diagnostic, DiagnosticKind, FieldDefinition, ImportError, MappingOptions, MappingSuggestion,
    OperationResult, RawRow, ResolvedMapping, Result, display_row_index, is_title,
};

use crate::row_mapper::{RowMapper, RowOutcome};

const ID_REFERENCE_NAME: &str = "System.Id";

/// Everything one batch run produced.
#[derive(Debug, Clone)]
pub struct ImportOutcome {
    /// Header suggestions and the mapping that was applied.
    pub report: SuggestionReport,
    pub result: OperationResult,
    /// Set when the catalog came from a [`FieldCatalogCache`].
    pub catalog_source: Option<CatalogSource>,
}

impl ImportOutcome {
    pub fn is_fatal(&self) -> bool {
        self.result.is_fatal()
    }

    pub fn resolved_mapping(&self) -> &ResolvedMapping {
        &self.report.resolved_mapping
    }
}

/// Maps headers and rows for one import at a time.
#[derive(Debug, Clone, Default)]
pub struct ImportPipeline {
    options: MappingOptions,
    synonyms: Option<SynonymTable>,
}

impl ImportPipeline {
    pub fn new(options: MappingOptions) -> Result<Self> {
        options.validate()?;
        Ok(Self {
            options,
            synonyms: None,
        })
    }

    /// Uses `synonyms` instead of the built-in table.
    #[must_use]
    pub fn with_synonyms(mut self, synonyms: SynonymTable) -> Self {
        self.synonyms = Some(synonyms);
        self
    }

    pub fn options(&self) -> &MappingOptions {
        &self.options
    }

    /// Mapping engine for `catalog` configured like this pipeline.
    pub fn engine(&self, catalog: &[FieldDefinition]) -> MappingEngine {
        let engine = MappingEngine::new(catalog.to_vec(), self.options.clone());
        match &self.synonyms {
            Some(synonyms) => engine.with_synonyms(synonyms.clone()),
            None => engine,
        }
    }

    /// Applies `mapping` to every row.
    ///
    /// Rows without a title are skipped silently; rows that cannot be
    /// imported become row-scoped errors and processing continues. Fails
    /// only when `mapping` has no title header.
    pub fn map_rows(&self, rows: &[RawRow], mapping: &ResolvedMapping) -> Result<OperationResult> {
        let mapper = RowMapper::new(mapping, &self.options)?;
        let mut result = OperationResult::new();
        result.stats.total_rows = rows.len();

        let mut skipped = 0usize;
        for (index, row) in rows.iter().enumerate() {
            match mapper.map_row(index, row) {
                RowOutcome::Mapped(record) => result.push_record(*record),
                RowOutcome::Skipped => skipped += 1,
                RowOutcome::Failed(err) => {
                    let row_index = display_row_index(index);
                    debug!(row = row_index, error = %err, "row excluded from import");
                    result.push_error(
                        Diagnostic::new(DiagnosticKind::RowProcessingError, err.to_string())
                            .with_row(row_index),
                    );
                }
            }
        }

        info!(
            total = result.stats.total_rows,
            valid = result.stats.valid_rows,
            skipped,
            failed = result.error_count(),
            "rows mapped"
        );
        Ok(result)
    }

    /// Maps `headers` against `catalog`, then maps every row.
    ///
    /// Never fails: a missing title mapping yields an empty result carrying
    /// a [`DiagnosticKind::RequiredFieldUnresolved`] error.
    pub fn run<S: AsRef<str>>(
        &self,
        headers: &[S],
        rows: &[RawRow],
        catalog: &[FieldDefinition],
    ) -> ImportOutcome {
        let report = self.engine(catalog).suggest(headers);

        let mut result = match self.map_rows(rows, &report.resolved_mapping) {
            Ok(result) => result,
            Err(err) => {
                let err = match err {
                    ImportError::RequiredFieldUnresolved { .. } => {
                        ImportError::RequiredFieldUnresolved {
                            headers: headers.iter().map(|h| h.as_ref().to_string()).collect(),
                        }
                    }
                    other => other,
                };
                warn!(error = %err, "import aborted");
                let mut result = OperationResult::new();
                result.stats.total_rows = rows.len();
                result.push_error(Diagnostic::new(diagnostic_kind(&err), err.to_string()));
                result
            }
        };

        let mut warnings = mapping_warnings(&report, catalog, self.options.ambiguity_gap);
        warnings.append(&mut result.warnings);
        result.warnings = warnings;

        info!(
            headers = report.suggestions.len(),
            mapped = report.resolved_mapping.len(),
            unmapped = report.unmapped_headers.len(),
            records = result.records.len(),
            errors = result.error_count(),
            warnings = result.warning_count(),
            "import mapped"
        );

        ImportOutcome {
            report,
            result,
            catalog_source: None,
        }
    }

    /// Like [`Self::run`], with the catalog looked up in `cache`.
    ///
    /// A degraded catalog lookup adds its warning ahead of all others.
    pub fn run_with_cache<S: AsRef<str>>(
        &self,
        cache: &FieldCatalogCache,
        project: &str,
        item_type: &str,
        headers: &[S],
        rows: &[RawRow],
    ) -> ImportOutcome {
        let lookup = cache.get(project, item_type);
        let mut outcome = self.run(headers, rows, &lookup.fields);
        if let Some(warning) = lookup.warning {
            outcome.result.warnings.insert(0, warning);
        }
        outcome.catalog_source = Some(lookup.source);
        outcome
    }
}

fn diagnostic_kind(err: &ImportError) -> DiagnosticKind {
    match err {
        ImportError::RequiredFieldUnresolved { .. } => DiagnosticKind::RequiredFieldUnresolved,
        _ => DiagnosticKind::RowProcessingError,
    }
}

/// Warnings describing how the headers were mapped.
///
/// Per header, in header order: an ambiguity warning when candidates were
/// close, then either a summary of the applied mapping or an unmapped
/// notice. Duplicate targets, read-only targets and required fields without
/// a column follow.
pub fn mapping_warnings(
    report: &SuggestionReport,
    catalog: &[FieldDefinition],
    ambiguity_gap: u8,
) -> Vec<Diagnostic> {
    let mapping = &report.resolved_mapping;
    let mut warnings = Vec::new();

    for suggestion in &report.suggestions {
        let header = suggestion.header.as_str();
        let applied = mapping.get(header);
        if suggestion.ambiguous {
            warnings.push(ambiguity_warning(suggestion, ambiguity_gap, applied));
        }
        let diagnostic = match (applied, suggestion.suggested_field.as_deref()) {
            (Some(field), _) => Diagnostic::new(
                DiagnosticKind::MappingSummary,
                format!(
                    "'{header}' → {field} ({}%, {})",
                    suggestion.confidence,
                    suggestion.reason.description()
                ),
            ),
            (None, Some(field)) => Diagnostic::new(
                DiagnosticKind::UnmappedHeader,
                format!(
                    "'{header}' was not mapped automatically; closest field {field} ({}%) needs review",
                    suggestion.confidence
                ),
            ),
            (None, None) => Diagnostic::new(
                DiagnosticKind::UnmappedHeader,
                format!("'{header}' matched no field and will be ignored"),
            ),
        };
        warnings.push(diagnostic.with_header(header));
    }

    for (field, headers) in mapping.duplicate_targets() {
        let listed = headers
            .iter()
            .map(|h| format!("'{h}'"))
            .collect::<Vec<_>>()
            .join(", ");
        let mut diagnostic = Diagnostic::new(
            DiagnosticKind::DuplicateTarget,
            format!("Headers {listed} all map to {field}; the first non-blank value in each row is used"),
        );
        if let Some(first) = headers.first() {
            diagnostic = diagnostic.with_header(first.as_str());
        }
        warnings.push(diagnostic);
    }

    for (header, reference_name) in mapping.iter() {
        if reference_name.eq_ignore_ascii_case(ID_REFERENCE_NAME) {
            continue;
        }
        let read_only = catalog
            .iter()
            .any(|f| f.read_only && f.reference_name.eq_ignore_ascii_case(reference_name));
        if read_only {
            warnings.push(
                Diagnostic::new(
                    DiagnosticKind::ReadOnlyTarget,
                    format!("'{header}' maps to read-only field {reference_name}; its values cannot be written"),
                )
                .with_header(header),
            );
        }
    }

    for field in catalog {
        if field.required
            && !is_title(&field.reference_name)
            && mapping.headers_for(&field.reference_name).is_empty()
        {
            warnings.push(Diagnostic::new(
                DiagnosticKind::RequiredFieldMissing,
                format!(
                    "Required field '{}' ({}) has no column",
                    field.display_name, field.reference_name
                ),
            ));
        }
    }

    warnings
}

fn ambiguity_warning(
    suggestion: &MappingSuggestion,
    ambiguity_gap: u8,
    applied: Option<&str>,
) -> Diagnostic {
    let best = suggestion.confidence;
    let contenders = suggestion
        .candidates
        .iter()
        .filter(|c| best.saturating_sub(c.score) <= ambiguity_gap)
        .map(|c| format!("{} ({}%)", c.reference_name, c.score))
        .collect::<Vec<_>>()
        .join(", ");
    let outcome = match applied {
        Some(field) => format!("kept {field}"),
        None => "left for review".to_string(),
    };
    Diagnostic::new(
        DiagnosticKind::AmbiguousMapping,
        format!("'{}' is ambiguous between {contenders}; {outcome}", suggestion.header),
    )
    .with_header(suggestion.header.as_str())
}
