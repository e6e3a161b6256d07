//! Synonym table for well-known work item fields.
//!
//! Headers matching a synonym key resolve immediately, before any fuzzy
//! scoring, so common spreadsheet columns never end up contested.

use std::collections::BTreeMap;
use std::sync::LazyLock;

use witmap_model::{CuratedField, MatchReason};

use crate::utils::{normalize, singularize};

/// Confidence for a header that is itself a synonym key.
pub const DIRECT_SYNONYM_CONFIDENCE: u8 = 100;
/// Confidence for a header whose singular form is a synonym key.
pub const SINGULAR_SYNONYM_CONFIDENCE: u8 = 95;

const BUILTIN_SYNONYMS: &[(&str, &str)] = &[
    ("title", "System.Title"),
    ("name", "System.Title"),
    ("summary", "System.Title"),
    ("testcasetitle", "System.Title"),
    ("testcasename", "System.Title"),
    ("testtitle", "System.Title"),
    ("testname", "System.Title"),
    ("workitemtitle", "System.Title"),
    ("id", "System.Id"),
    ("testcaseid", "System.Id"),
    ("workitemid", "System.Id"),
    ("itemid", "System.Id"),
    ("tcid", "System.Id"),
    ("steps", "Microsoft.VSTS.TCM.Steps"),
    ("teststeps", "Microsoft.VSTS.TCM.Steps"),
    ("testprocedure", "Microsoft.VSTS.TCM.Steps"),
    ("priority", "Microsoft.VSTS.Common.Priority"),
    ("pri", "Microsoft.VSTS.Common.Priority"),
    ("prio", "Microsoft.VSTS.Common.Priority"),
    ("areapath", "System.AreaPath"),
    ("area", "System.AreaPath"),
    ("iterationpath", "System.IterationPath"),
    ("iteration", "System.IterationPath"),
    ("sprint", "System.IterationPath"),
    ("description", "System.Description"),
    ("desc", "System.Description"),
    ("details", "System.Description"),
    ("tags", "System.Tags"),
    ("labels", "System.Tags"),
    ("automationstatus", "Microsoft.VSTS.TCM.AutomationStatus"),
    ("automated", "Microsoft.VSTS.TCM.AutomationStatus"),
    ("state", "System.State"),
    ("assignedto", "System.AssignedTo"),
    ("assignee", "System.AssignedTo"),
    ("owner", "System.AssignedTo"),
    ("reason", "System.Reason"),
];

static BUILTIN: LazyLock<SynonymTable> =
    LazyLock::new(|| SynonymTable::from_pairs(BUILTIN_SYNONYMS.iter().copied()));

/// Result of a synonym lookup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SynonymMatch {
    pub reference_name: String,
    pub confidence: u8,
    pub reason: MatchReason,
}

/// Immutable map from normalized header terms to reference names.
#[derive(Debug, Clone, Default)]
pub struct SynonymTable {
    entries: BTreeMap<String, String>,
}

impl SynonymTable {
    /// The shared built-in table.
    pub fn builtin() -> &'static SynonymTable {
        &BUILTIN
    }

    /// Builds a table; keys are normalized on the way in.
    pub fn from_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Into<String>,
    {
        let mut entries = BTreeMap::new();
        for (key, reference_name) in pairs {
            let key = normalize(key.as_ref());
            if key.is_empty() {
                continue;
            }
            entries.entry(key).or_insert_with(|| reference_name.into());
        }
        Self { entries }
    }

    /// Copy of this table with one more synonym. Existing keys are replaced.
    #[must_use]
    pub fn with_synonym(mut self, term: &str, reference_name: impl Into<String>) -> Self {
        let key = normalize(term);
        if !key.is_empty() {
            self.entries.insert(key, reference_name.into());
        }
        self
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Looks up a raw header: exact normalized key first, then its singular.
    pub fn lookup(&self, header: &str) -> Option<SynonymMatch> {
        let normalized = normalize(header);
        if normalized.is_empty() {
            return None;
        }
        if let Some(reference_name) = self.entries.get(&normalized) {
            return Some(SynonymMatch {
                reference_name: reference_name.clone(),
                confidence: DIRECT_SYNONYM_CONFIDENCE,
                reason: MatchReason::DirectSynonym,
            });
        }
        let singular = singularize(&normalized);
        if singular != normalized
            && let Some(reference_name) = self.entries.get(&singular)
        {
            return Some(SynonymMatch {
                reference_name: reference_name.clone(),
                confidence: SINGULAR_SYNONYM_CONFIDENCE,
                reason: MatchReason::SingularSynonym,
            });
        }
        None
    }

    /// Synonym keys pointing at `reference_name`.
    pub fn terms_for(&self, reference_name: &str) -> Vec<&str> {
        self.entries
            .iter()
            .filter(|(_, target)| target.eq_ignore_ascii_case(reference_name))
            .map(|(key, _)| key.as_str())
            .collect()
    }

    /// True if every curated field can be reached through some synonym.
    pub fn covers_curated_fields(&self) -> bool {
        CuratedField::ALL
            .iter()
            .all(|field| !self.terms_for(field.reference_name()).is_empty())
    }
}
