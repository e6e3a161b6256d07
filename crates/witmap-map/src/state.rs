//! Mapping state management for interactive review workflows.
//!
//! A review UI starts from the engine's report, lets a person confirm,
//! override or clear individual headers, and hands the final
//! [`ResolvedMapping`] to the row mapper.

use std::collections::HashSet;

use witmap_model::{FieldDefinition, MappingSuggestion, ResolvedMapping, is_title};

use crate::engine::{MappingEngine, SuggestionReport};
use crate::error::MappingError;

/// State of a header mapping review for one import.
#[derive(Debug, Clone)]
pub struct MappingState {
    /// Catalog the headers are mapped against
    pub catalog: Vec<FieldDefinition>,
    /// Import headers, in sheet order
    pub headers: Vec<String>,
    /// All suggestions from the engine
    pub suggestions: Vec<MappingSuggestion>,
    /// Accepted mappings; starts as the engine's resolved mapping
    pub accepted: ResolvedMapping,
    /// UI state: search filter text
    pub search_filter: String,
}

impl MappingState {
    /// Create a review state from engine results.
    pub fn new(catalog: Vec<FieldDefinition>, headers: Vec<String>, report: SuggestionReport) -> Self {
        Self {
            catalog,
            headers,
            suggestions: report.suggestions,
            accepted: report.resolved_mapping,
            search_filter: String::new(),
        }
    }

    /// Create a review state by running the mapping engine.
    pub fn from_engine(engine: &MappingEngine, headers: &[String]) -> Self {
        let report = engine.suggest(headers);
        Self::new(engine.catalog().to_vec(), headers.to_vec(), report)
    }

    /// Catalog fields matching the search text, by display or reference name.
    pub fn filtered_fields(&self) -> Vec<(usize, &FieldDefinition)> {
        let filter = self.search_filter.to_lowercase();
        self.catalog
            .iter()
            .enumerate()
            .filter(|(_, f)| {
                filter.is_empty()
                    || f.display_name.to_lowercase().contains(&filter)
                    || f.reference_name.to_lowercase().contains(&filter)
            })
            .collect()
    }

    pub fn suggestion_for(&self, header: &str) -> Option<&MappingSuggestion> {
        self.suggestions.iter().find(|s| s.header == header)
    }

    pub fn header_status(&self, header: &str) -> HeaderMappingStatus {
        if self.accepted.contains_header(header) {
            HeaderMappingStatus::Accepted
        } else if self.suggestion_for(header).is_some_and(MappingSuggestion::is_match) {
            HeaderMappingStatus::Suggested
        } else {
            HeaderMappingStatus::Unmapped
        }
    }

    /// Accept the engine's suggested field for a header.
    pub fn accept_suggestion(&mut self, header: &str) -> Result<(), MappingError> {
        let field = self
            .suggestion_for(header)
            .and_then(|s| s.suggested_field.clone())
            .ok_or_else(|| MappingError::NoSuggestion(header.to_string()))?;
        self.accepted.insert(header, field);
        Ok(())
    }

    /// Map a header to a field of the reviewer's choosing.
    pub fn accept_manual(&mut self, header: &str, reference_name: &str) -> Result<(), MappingError> {
        if !self.headers.iter().any(|h| h == header) {
            return Err(MappingError::HeaderNotFound(header.to_string()));
        }
        let field = self
            .catalog
            .iter()
            .find(|f| f.reference_name.eq_ignore_ascii_case(reference_name))
            .ok_or_else(|| MappingError::FieldNotFound(reference_name.to_string()))?;
        self.accepted.insert(header, field.reference_name.clone());
        Ok(())
    }

    /// Clear the mapping for a header.
    pub fn clear_mapping(&mut self, header: &str) -> bool {
        self.accepted.remove(header).is_some()
    }

    /// Catalog fields no header is mapped to yet.
    pub fn available_fields(&self) -> Vec<&FieldDefinition> {
        let used: HashSet<String> = self
            .accepted
            .iter()
            .map(|(_, field)| field.to_ascii_lowercase())
            .collect();
        self.catalog
            .iter()
            .filter(|f| !used.contains(&f.reference_name.to_ascii_lowercase()))
            .collect()
    }

    /// Get summary counts.
    pub fn summary(&self) -> MappingSummary {
        let required: Vec<&FieldDefinition> = self
            .catalog
            .iter()
            .filter(|f| f.required || is_title(&f.reference_name))
            .collect();
        let required_mapped = required
            .iter()
            .filter(|f| !self.accepted.headers_for(&f.reference_name).is_empty())
            .count();
        let suggested = self
            .headers
            .iter()
            .filter(|h| self.header_status(h) == HeaderMappingStatus::Suggested)
            .count();

        MappingSummary {
            total_headers: self.headers.len(),
            mapped: self.accepted.len(),
            suggested,
            unmapped: self
                .headers
                .len()
                .saturating_sub(self.accepted.len() + suggested),
            required_total: required.len(),
            required_mapped,
        }
    }

    /// The mapping to hand to the row mapper.
    pub fn resolved(&self) -> &ResolvedMapping {
        &self.accepted
    }
}

/// Status of a header's mapping.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HeaderMappingStatus {
    /// Has an accepted mapping.
    Accepted,
    /// Has a suggestion but not yet accepted.
    Suggested,
    /// No mapping or suggestion.
    Unmapped,
}

/// Summary of mapping counts.
#[derive(Debug, Clone, Copy)]
pub struct MappingSummary {
    /// Number of import headers.
    pub total_headers: usize,
    /// Headers with an accepted mapping.
    pub mapped: usize,
    /// Headers with a pending suggestion.
    pub suggested: usize,
    /// Headers with neither.
    pub unmapped: usize,
    /// Required catalog fields (title included).
    pub required_total: usize,
    /// Required catalog fields some header maps to.
    pub required_mapped: usize,
}
