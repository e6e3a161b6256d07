//! Configuration options for header mapping and row import.

use serde::{Deserialize, Serialize};

use crate::error::{ImportError, Result};

/// Policy knobs for the mapping engine and row mapper.
///
/// By default a header is ambiguous when the runner-up scores within 5 points
/// of the winner, and an ambiguous winner is still applied when it scores 90
/// or more.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct MappingOptions {
    /// The winner must beat the runner-up by more than this many points to
    /// count as unambiguous.
    pub ambiguity_gap: u8,

    /// Ambiguous winners scoring at least this much are applied anyway.
    pub auto_accept_score: u8,

    /// Number of candidates kept on each suggestion.
    pub max_candidates: usize,

    /// Unambiguous matches below this score are left for review.
    /// Zero applies every unambiguous match.
    pub min_confidence: u8,

    /// Titles longer than this are rejected row by row.
    pub max_title_length: usize,
}

impl Default for MappingOptions {
    fn default() -> Self {
        Self {
            ambiguity_gap: 5,
            auto_accept_score: 90,
            max_candidates: 5,
            min_confidence: 0,
            max_title_length: 255,
        }
    }
}

impl MappingOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Only near-certain matches are applied without review.
    pub fn strict() -> Self {
        Self {
            ambiguity_gap: 10,
            auto_accept_score: 95,
            min_confidence: 90,
            ..Self::default()
        }
    }

    /// Apply more matches automatically, for exploratory imports.
    pub fn relaxed() -> Self {
        Self {
            ambiguity_gap: 2,
            auto_accept_score: 80,
            ..Self::default()
        }
    }

    /// Loads options from JSON; missing keys keep their defaults.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let options: Self = serde_json::from_str(json)?;
        options.validate()?;
        Ok(options)
    }

    pub fn validate(&self) -> Result<()> {
        if self.auto_accept_score > 100 {
            return Err(ImportError::InvalidOptions(format!(
                "autoAcceptScore must be at most 100, got {}",
                self.auto_accept_score
            )));
        }
        if self.min_confidence > 100 {
            return Err(ImportError::InvalidOptions(format!(
                "minConfidence must be at most 100, got {}",
                self.min_confidence
            )));
        }
        if self.max_candidates == 0 {
            return Err(ImportError::InvalidOptions(
                "maxCandidates must be at least 1".to_string(),
            ));
        }
        if self.max_title_length == 0 {
            return Err(ImportError::InvalidOptions(
                "maxTitleLength must be at least 1".to_string(),
            ));
        }
        Ok(())
    }

    #[must_use]
    pub fn with_ambiguity_gap(mut self, gap: u8) -> Self {
        self.ambiguity_gap = gap;
        self
    }

    #[must_use]
    pub fn with_auto_accept_score(mut self, score: u8) -> Self {
        self.auto_accept_score = score;
        self
    }

    #[must_use]
    pub fn with_max_candidates(mut self, max: usize) -> Self {
        self.max_candidates = max;
        self
    }

    #[must_use]
    pub fn with_min_confidence(mut self, score: u8) -> Self {
        self.min_confidence = score;
        self
    }

    #[must_use]
    pub fn with_max_title_length(mut self, max: usize) -> Self {
        self.max_title_length = max;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn json_keeps_defaults_for_missing_keys() {
        let options = MappingOptions::from_json_str(r#"{"ambiguityGap": 8}"#).expect("options");
        assert_eq!(options.ambiguity_gap, 8);
        assert_eq!(options.auto_accept_score, 90);
        assert_eq!(options.max_candidates, 5);
    }

    #[test]
    fn rejects_out_of_range_scores() {
        let err = MappingOptions::from_json_str(r#"{"autoAcceptScore": 120}"#).unwrap_err();
        assert!(matches!(err, ImportError::InvalidOptions(_)));

        let err = MappingOptions::from_json_str("{not json").unwrap_err();
        assert!(matches!(err, ImportError::OptionsJson(_)));
    }
}
