//! Mapping engine implementation.

use std::collections::BTreeMap;

use tracing::{debug, warn};
use witmap_model::{
    FieldCandidate, FieldDefinition, MappingOptions, MappingSuggestion, ResolvedMapping,
};

use crate::patterns::SynonymTable;
use crate::score::FieldScorer;

/// Confidence level categories for mapping quality assessment.
///
/// These levels help categorize suggestions by their reliability:
/// - `High`: Near-certain matches that can be used without review
/// - `Medium`: Good matches that should be verified
/// - `Low`: Weak matches requiring manual confirmation
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ConfidenceLevel {
    /// Low confidence (≥ low threshold, < medium threshold).
    Low,
    /// Medium confidence (≥ medium threshold, < high threshold).
    Medium,
    /// High confidence (≥ high threshold).
    High,
}

impl ConfidenceLevel {
    /// Returns a human-readable description of the confidence level.
    #[must_use]
    pub fn description(&self) -> &'static str {
        match self {
            Self::High => "high confidence - likely correct",
            Self::Medium => "medium confidence - should review",
            Self::Low => "low confidence - needs verification",
        }
    }
}

/// Configurable thresholds for categorizing suggestion confidence.
///
/// - Below `low`: not categorized
/// - `low` to `medium`: [`ConfidenceLevel::Low`]
/// - `medium` to `high`: [`ConfidenceLevel::Medium`]
/// - At or above `high`: [`ConfidenceLevel::High`]
#[derive(Debug, Clone, Copy)]
pub struct ConfidenceThresholds {
    /// Minimum confidence for high-quality matches (default: 95).
    pub high: u8,
    /// Minimum confidence for medium-quality matches (default: 80).
    pub medium: u8,
    /// Minimum confidence to be categorized at all (default: 70).
    pub low: u8,
}

impl Default for ConfidenceThresholds {
    fn default() -> Self {
        Self {
            high: 95,
            medium: 80,
            low: 70,
        }
    }
}

impl ConfidenceThresholds {
    /// Creates thresholds with strict boundaries for high-quality mapping.
    #[must_use]
    pub fn strict() -> Self {
        Self {
            high: 100,
            medium: 90,
            low: 80,
        }
    }

    /// Creates thresholds with relaxed boundaries for exploratory mapping.
    #[must_use]
    pub fn relaxed() -> Self {
        Self {
            high: 90,
            medium: 75,
            low: 1,
        }
    }

    /// Categorizes a confidence score into a confidence level.
    ///
    /// Returns `None` if the score is below the low threshold.
    #[must_use]
    pub fn categorize(&self, confidence: u8) -> Option<ConfidenceLevel> {
        if confidence >= self.high {
            Some(ConfidenceLevel::High)
        } else if confidence >= self.medium {
            Some(ConfidenceLevel::Medium)
        } else if confidence >= self.low {
            Some(ConfidenceLevel::Low)
        } else {
            None
        }
    }
}

/// Result of mapping a set of headers against a catalog.
#[derive(Debug, Clone, Default)]
pub struct SuggestionReport {
    /// One suggestion per input header, in input order.
    pub suggestions: Vec<MappingSuggestion>,
    /// Suggestions the engine applied without review.
    pub resolved_mapping: ResolvedMapping,
    /// Headers absent from `resolved_mapping`, in input order.
    pub unmapped_headers: Vec<String>,
}

impl SuggestionReport {
    /// Suggestion for `header`, if it was part of the input.
    #[must_use]
    pub fn suggestion_for(&self, header: &str) -> Option<&MappingSuggestion> {
        self.suggestions.iter().find(|s| s.header == header)
    }

    /// True if some header was resolved to `System.Title`.
    #[must_use]
    pub fn has_title(&self) -> bool {
        self.resolved_mapping.title_header().is_some()
    }

    /// Suggestions flagged as ambiguous, whether or not they were applied.
    #[must_use]
    pub fn ambiguous(&self) -> Vec<&MappingSuggestion> {
        self.suggestions.iter().filter(|s| s.ambiguous).collect()
    }

    /// Suggestions that matched something but were not applied.
    #[must_use]
    pub fn needs_review(&self) -> Vec<&MappingSuggestion> {
        self.suggestions
            .iter()
            .filter(|s| s.is_match() && !self.resolved_mapping.contains_header(&s.header))
            .collect()
    }

    /// Returns the count of matched suggestions at each confidence level.
    ///
    /// Uses default thresholds. For custom thresholds, use [`Self::count_by_level_with`].
    #[must_use]
    pub fn count_by_level(&self) -> BTreeMap<ConfidenceLevel, usize> {
        self.count_by_level_with(&ConfidenceThresholds::default())
    }

    /// Returns the count of matched suggestions at each confidence level using custom thresholds.
    #[must_use]
    pub fn count_by_level_with(
        &self,
        thresholds: &ConfidenceThresholds,
    ) -> BTreeMap<ConfidenceLevel, usize> {
        let mut counts = BTreeMap::new();
        for suggestion in &self.suggestions {
            if let Some(level) = thresholds.categorize(suggestion.confidence) {
                *counts.entry(level).or_insert(0) += 1;
            }
        }
        counts
    }

    /// Returns the mean confidence of matched suggestions, if any.
    #[must_use]
    pub fn mean_confidence(&self) -> Option<f32> {
        let matched: Vec<u8> = self
            .suggestions
            .iter()
            .filter(|s| s.is_match())
            .map(|s| s.confidence)
            .collect();
        if matched.is_empty() {
            return None;
        }
        let sum: u32 = matched.iter().map(|&c| u32::from(c)).sum();
        Some(sum as f32 / matched.len() as f32)
    }
}

/// Engine for mapping spreadsheet headers to catalog fields.
///
/// Each header is first looked up in the synonym table. Headers the table
/// does not know are scored against every catalog field; the best candidate
/// is applied unless a runner-up comes within the configured ambiguity gap,
/// in which case it is applied only when it clears the auto-accept score.
///
/// # Example
///
/// ```ignore
/// use witmap_map::MappingEngine;
///
/// let engine = MappingEngine::new(catalog, MappingOptions::default());
/// let report = engine.suggest(&["Title", "Risk Level"]);
/// ```
#[derive(Debug, Clone)]
pub struct MappingEngine {
    catalog: Vec<FieldDefinition>,
    scorer: FieldScorer,
    synonyms: SynonymTable,
    options: MappingOptions,
}

impl MappingEngine {
    /// Creates an engine for one catalog using the built-in synonym table.
    pub fn new(catalog: Vec<FieldDefinition>, options: MappingOptions) -> Self {
        let scorer = FieldScorer::new(&catalog);
        Self {
            catalog,
            scorer,
            synonyms: SynonymTable::builtin().clone(),
            options,
        }
    }

    /// Replaces the synonym table.
    #[must_use]
    pub fn with_synonyms(mut self, synonyms: SynonymTable) -> Self {
        self.synonyms = synonyms;
        self
    }

    pub fn catalog(&self) -> &[FieldDefinition] {
        &self.catalog
    }

    pub fn options(&self) -> &MappingOptions {
        &self.options
    }

    /// Looks up a catalog field by reference name, ignoring case.
    pub fn field(&self, reference_name: &str) -> Option<&FieldDefinition> {
        self.catalog
            .iter()
            .find(|f| f.reference_name.eq_ignore_ascii_case(reference_name))
    }

    /// Suggests a field for every header.
    ///
    /// Returns one suggestion per header plus the subset of suggestions safe
    /// to apply without review. Headers never fail: the worst outcome is a
    /// `NoMatch` suggestion.
    pub fn suggest<S: AsRef<str>>(&self, headers: &[S]) -> SuggestionReport {
        let mut report = SuggestionReport::default();

        for header in headers {
            let header = header.as_ref();
            let (suggestion, apply) = self.suggest_header(header);
            if apply && let Some(field) = suggestion.suggested_field.as_deref() {
                report.resolved_mapping.insert(header, field);
            } else {
                report.unmapped_headers.push(header.to_string());
            }
            report.suggestions.push(suggestion);
        }

        for (field, headers) in report.resolved_mapping.duplicate_targets() {
            warn!(
                field = %field,
                headers = ?headers,
                "multiple headers map to the same field"
            );
        }
        if !report.has_title() {
            debug!("no header resolved to the title field");
        }

        report
    }

    /// Suggestion for a single header, and whether it may be applied.
    pub fn suggest_header(&self, header: &str) -> (MappingSuggestion, bool) {
        if let Some(hit) = self.synonyms.lookup(header) {
            let reference_name = self.canonical_reference_name(&hit.reference_name);
            let apply = hit.confidence >= self.options.min_confidence;
            debug!(
                header,
                field = %reference_name,
                confidence = hit.confidence,
                reason = %hit.reason,
                "header resolved by synonym"
            );
            let suggestion = MappingSuggestion {
                header: header.to_string(),
                suggested_field: Some(reference_name.clone()),
                confidence: hit.confidence,
                candidates: vec![FieldCandidate::new(reference_name, hit.confidence)],
                reason: hit.reason,
                ambiguous: false,
            };
            return (suggestion, apply);
        }

        let scored = self.scorer.score_header(header);
        let Some(best) = scored.first() else {
            debug!(header, "header matched no catalog field");
            return (MappingSuggestion::no_match(header), false);
        };

        let ambiguous = scored
            .get(1)
            .is_some_and(|runner_up| best.score - runner_up.score <= self.options.ambiguity_gap);
        let apply = best.score >= self.options.min_confidence
            && (!ambiguous || best.score >= self.options.auto_accept_score);

        if ambiguous {
            let contenders: Vec<String> = scored
                .iter()
                .take(self.options.max_candidates)
                .map(|s| s.explain())
                .collect();
            if apply {
                debug!(header, field = %best.reference_name, ?contenders, "ambiguous header auto-accepted");
            } else {
                warn!(header, ?contenders, "ambiguous header left for review");
            }
        } else {
            debug!(
                header,
                field = %best.reference_name,
                score = best.score,
                reason = %best.reason,
                applied = apply,
                "header resolved by heuristic match"
            );
        }

        let suggestion = MappingSuggestion {
            header: header.to_string(),
            suggested_field: Some(best.reference_name.clone()),
            confidence: best.score,
            candidates: scored
                .iter()
                .take(self.options.max_candidates)
                .map(|s| FieldCandidate::new(s.reference_name.clone(), s.score))
                .collect(),
            reason: best.reason,
            ambiguous,
        };
        (suggestion, apply)
    }

    /// Uses the catalog's spelling of a synonym target when it has one.
    fn canonical_reference_name(&self, reference_name: &str) -> String {
        self.field(reference_name)
            .map_or_else(|| reference_name.to_string(), |f| f.reference_name.clone())
    }
}

/// Maps `headers` against `catalog` with default options.
pub fn suggest_mapping<S: AsRef<str>>(
    headers: &[S],
    catalog: &[FieldDefinition],
) -> SuggestionReport {
    MappingEngine::new(catalog.to_vec(), MappingOptions::default()).suggest(headers)
}
