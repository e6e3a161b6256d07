//! Header-to-field mapping types.
//!
//! The engine produces one [`MappingSuggestion`] per input header and a
//! [`ResolvedMapping`] holding only the suggestions it is willing to apply
//! without review.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::field::is_title;

/// Why a header was matched to its suggested field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MatchReason {
    /// Normalized header is a synonym-table key.
    DirectSynonym,
    /// Singular form of the header is a synonym-table key.
    SingularSynonym,
    /// Header equals the field's display name.
    ExactName,
    /// Header equals the last segment of the reference name.
    ExactTail,
    /// Singular form of the header equals the display name or tail.
    SingularMatch,
    /// Header and display name (or tail) contain one another.
    SubstringMatch,
    /// Header is one or two edits away from the display name or tail.
    EditDistance,
    NoMatch,
}

impl MatchReason {
    pub fn description(&self) -> &'static str {
        match self {
            Self::DirectSynonym => "direct synonym",
            Self::SingularSynonym => "singular synonym",
            Self::ExactName => "exact name",
            Self::ExactTail => "exact reference name",
            Self::SingularMatch => "singular name",
            Self::SubstringMatch => "partial name",
            Self::EditDistance => "similar spelling",
            Self::NoMatch => "no match",
        }
    }

    /// True for reasons produced by the synonym table.
    pub fn is_synonym(&self) -> bool {
        matches!(self, Self::DirectSynonym | Self::SingularSynonym)
    }
}

impl fmt::Display for MatchReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.description())
    }
}

/// A catalog field competing for a header.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldCandidate {
    pub reference_name: String,
    /// Heuristic score, 0 to 100.
    pub score: u8,
}

impl FieldCandidate {
    pub fn new(reference_name: impl Into<String>, score: u8) -> Self {
        Self {
            reference_name: reference_name.into(),
            score,
        }
    }
}

/// Suggested target for one input header.
///
/// `confidence == 0` exactly when `suggested_field` is `None`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MappingSuggestion {
    pub header: String,
    pub suggested_field: Option<String>,
    pub confidence: u8,
    /// Competing fields, best first; ties keep catalog order.
    pub candidates: Vec<FieldCandidate>,
    pub reason: MatchReason,
    /// Set when a runner-up scored within the ambiguity gap of the winner.
    #[serde(default)]
    pub ambiguous: bool,
}

impl MappingSuggestion {
    pub fn no_match(header: impl Into<String>) -> Self {
        Self {
            header: header.into(),
            suggested_field: None,
            confidence: 0,
            candidates: Vec::new(),
            reason: MatchReason::NoMatch,
            ambiguous: false,
        }
    }

    pub fn is_match(&self) -> bool {
        self.suggested_field.is_some()
    }

    /// Score of the strongest competitor other than the suggested field.
    pub fn runner_up(&self) -> Option<&FieldCandidate> {
        self.candidates.get(1)
    }
}

/// One accepted `header → reference name` pair.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResolvedEntry {
    pub header: String,
    pub reference_name: String,
}

/// Accepted header-to-field assignments, in header order.
///
/// Headers are unique keys. Several headers may point at the same field;
/// that is reported by [`ResolvedMapping::duplicate_targets`] but never
/// rejected here.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ResolvedMapping {
    entries: Vec<ResolvedEntry>,
}

impl ResolvedMapping {
    pub fn new() -> Self {
        Self::default()
    }

    /// Maps `header` to `reference_name`, returning the previous target.
    pub fn insert(
        &mut self,
        header: impl Into<String>,
        reference_name: impl Into<String>,
    ) -> Option<String> {
        let header = header.into();
        let reference_name = reference_name.into();
        if let Some(entry) = self.entries.iter_mut().find(|e| e.header == header) {
            return Some(std::mem::replace(&mut entry.reference_name, reference_name));
        }
        self.entries.push(ResolvedEntry {
            header,
            reference_name,
        });
        None
    }

    pub fn remove(&mut self, header: &str) -> Option<String> {
        let position = self.entries.iter().position(|e| e.header == header)?;
        Some(self.entries.remove(position).reference_name)
    }

    pub fn get(&self, header: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|e| e.header == header)
            .map(|e| e.reference_name.as_str())
    }

    pub fn contains_header(&self, header: &str) -> bool {
        self.get(header).is_some()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries
            .iter()
            .map(|e| (e.header.as_str(), e.reference_name.as_str()))
    }

    /// Headers mapped to `reference_name` (case-insensitive), in order.
    pub fn headers_for(&self, reference_name: &str) -> Vec<&str> {
        self.entries
            .iter()
            .filter(|e| e.reference_name.eq_ignore_ascii_case(reference_name))
            .map(|e| e.header.as_str())
            .collect()
    }

    /// First header mapped to `System.Title`.
    pub fn title_header(&self) -> Option<&str> {
        self.entries
            .iter()
            .find(|e| is_title(&e.reference_name))
            .map(|e| e.header.as_str())
    }

    /// Fields targeted by more than one header, with those headers.
    ///
    /// Targets compare case-insensitively and are keyed by their first
    /// spelling.
    pub fn duplicate_targets(&self) -> BTreeMap<String, Vec<String>> {
        let mut groups: Vec<(&str, Vec<String>)> = Vec::new();
        for entry in &self.entries {
            match groups
                .iter_mut()
                .find(|(target, _)| target.eq_ignore_ascii_case(&entry.reference_name))
            {
                Some((_, headers)) => headers.push(entry.header.clone()),
                None => groups.push((entry.reference_name.as_str(), vec![entry.header.clone()])),
            }
        }
        groups
            .into_iter()
            .filter(|(_, headers)| headers.len() > 1)
            .map(|(target, headers)| (target.to_string(), headers))
            .collect()
    }

    /// Header-keyed view, convenient for serialization to callers.
    pub fn to_map(&self) -> BTreeMap<String, String> {
        self.entries
            .iter()
            .map(|e| (e.header.clone(), e.reference_name.clone()))
            .collect()
    }
}

impl<H, R> FromIterator<(H, R)> for ResolvedMapping
where
    H: Into<String>,
    R: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (H, R)>>(iter: I) -> Self {
        let mut mapping = Self::new();
        for (header, reference_name) in iter {
            mapping.insert(header, reference_name);
        }
        mapping
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn insert_replaces_existing_header() {
        let mut mapping = ResolvedMapping::new();
        assert_eq!(mapping.insert("Pri", "System.Title"), None);
        assert_eq!(
            mapping.insert("Pri", "Microsoft.VSTS.Common.Priority"),
            Some("System.Title".to_string())
        );
        assert_eq!(mapping.len(), 1);
        assert_eq!(mapping.get("Pri"), Some("Microsoft.VSTS.Common.Priority"));
    }

    #[test]
    fn reports_duplicate_targets() {
        let mapping: ResolvedMapping = [
            ("Name", "System.Title"),
            ("Summary", "System.Title"),
            ("Steps", "Microsoft.VSTS.TCM.Steps"),
        ]
        .into_iter()
        .collect();

        assert_eq!(mapping.title_header(), Some("Name"));
        let duplicates = mapping.duplicate_targets();
        assert_eq!(duplicates.len(), 1);
        assert_eq!(
            duplicates.get("System.Title"),
            Some(&vec!["Name".to_string(), "Summary".to_string()])
        );
    }
}
