//! Fuzzy scoring of headers against catalog fields.
//!
//! Each field is compared through two normalized keys: its display name and
//! the tail of its reference name. Several independent signals may fire for
//! a pair; the pair's score is the strongest of them, never a sum.

use rapidfuzz::distance::levenshtein;
use witmap_model::{FieldDefinition, MatchReason};

use crate::utils::{normalize, singularize};

const EXACT_NAME_SCORE: u8 = 100;
const EXACT_TAIL_SCORE: u8 = 95;
const SINGULAR_SCORE: u8 = 90;
const SUBSTRING_NAME_SCORE: u8 = 80;
const SUBSTRING_TAIL_SCORE: u8 = 78;
const ONE_EDIT_SCORE: u8 = 75;
const TWO_EDIT_SCORE: u8 = 70;

/// A catalog field that scored against a header.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScoredField {
    pub reference_name: String,
    pub score: u8,
    /// The signal that produced `score`.
    pub reason: MatchReason,
    /// Position of the field in the catalog, used to break ties.
    pub catalog_index: usize,
}

impl ScoredField {
    /// Human-readable explanation of the score.
    pub fn explain(&self) -> String {
        format!("{}: {}% ({})", self.reference_name, self.score, self.reason)
    }
}

#[derive(Debug, Clone)]
struct FieldKeys {
    reference_name: String,
    name: String,
    tail: String,
}

/// Scores headers against one catalog.
///
/// Normalized field keys are computed once per catalog, so scoring many
/// headers against the same catalog only normalizes each header.
#[derive(Debug, Clone)]
pub struct FieldScorer {
    fields: Vec<FieldKeys>,
}

impl FieldScorer {
    pub fn new(catalog: &[FieldDefinition]) -> Self {
        let fields = catalog
            .iter()
            .map(|field| FieldKeys {
                reference_name: field.reference_name.clone(),
                name: normalize(&field.display_name),
                tail: normalize(field.tail()),
            })
            .collect();
        Self { fields }
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Every field at least one signal fired for, best first.
    ///
    /// Equal scores keep catalog order. Fields with no signal are left out
    /// rather than reported with a zero score.
    pub fn score_header(&self, header: &str) -> Vec<ScoredField> {
        let normalized = normalize(header);
        if normalized.is_empty() {
            return Vec::new();
        }
        let singular = singularize(&normalized);
        let mut scored: Vec<ScoredField> = self
            .fields
            .iter()
            .enumerate()
            .filter_map(|(catalog_index, keys)| {
                let (score, reason) = score_keys(&normalized, &singular, keys)?;
                Some(ScoredField {
                    reference_name: keys.reference_name.clone(),
                    score,
                    reason,
                    catalog_index,
                })
            })
            .collect();
        // Stable sort: ties stay in catalog order.
        scored.sort_by(|a, b| b.score.cmp(&a.score));
        scored
    }

    /// Score of `header` against one field, `None` if no signal fires or the
    /// field is not in the catalog.
    pub fn score(&self, header: &str, reference_name: &str) -> Option<ScoredField> {
        let normalized = normalize(header);
        if normalized.is_empty() {
            return None;
        }
        let singular = singularize(&normalized);
        let (catalog_index, keys) = self
            .fields
            .iter()
            .enumerate()
            .find(|(_, keys)| keys.reference_name.eq_ignore_ascii_case(reference_name))?;
        let (score, reason) = score_keys(&normalized, &singular, keys)?;
        Some(ScoredField {
            reference_name: keys.reference_name.clone(),
            score,
            reason,
            catalog_index,
        })
    }
}

fn score_keys(header: &str, singular: &str, keys: &FieldKeys) -> Option<(u8, MatchReason)> {
    let name = keys.name.as_str();
    let tail = keys.tail.as_str();

    if !name.is_empty() && header == name {
        return Some((EXACT_NAME_SCORE, MatchReason::ExactName));
    }

    let mut best: Option<(u8, MatchReason)> = None;
    let mut offer = |score: u8, reason: MatchReason| {
        if best.is_none_or(|(current, _)| score > current) {
            best = Some((score, reason));
        }
    };

    if !tail.is_empty() && header == tail {
        offer(EXACT_TAIL_SCORE, MatchReason::ExactTail);
    }
    if !singular.is_empty() && (singular == name || singular == tail) {
        offer(SINGULAR_SCORE, MatchReason::SingularMatch);
    }
    if contains_either(header, name) {
        offer(SUBSTRING_NAME_SCORE, MatchReason::SubstringMatch);
    }
    if contains_either(header, tail) {
        offer(SUBSTRING_TAIL_SCORE, MatchReason::SubstringMatch);
    }
    for key in [name, tail] {
        if key.is_empty() {
            continue;
        }
        match levenshtein::distance(header.chars(), key.chars()) {
            1 => offer(ONE_EDIT_SCORE, MatchReason::EditDistance),
            2 => offer(TWO_EDIT_SCORE, MatchReason::EditDistance),
            _ => {}
        }
    }

    best
}

fn contains_either(header: &str, key: &str) -> bool {
    !key.is_empty() && (key.contains(header) || header.contains(key))
}
