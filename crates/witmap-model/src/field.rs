//! Field catalog types.
//!
//! A catalog is the list of [`FieldDefinition`]s a project exposes for one
//! item type. Catalogs come from the remote work-tracking system and include
//! project-specific custom fields, so nothing here assumes a closed set of
//! reference names except [`CuratedField`], the handful of well-known fields
//! the row mapper coerces explicitly.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Reference name of the only hard-required field.
pub const TITLE_REFERENCE_NAME: &str = "System.Title";

/// Semantic value type of a catalog field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldValueType {
    /// Short single-line string.
    #[default]
    String,
    /// Integer or decimal number.
    Number,
    /// Long or rich text (HTML, step XML).
    Text,
    Boolean,
    #[serde(alias = "dateTime")]
    DateTime,
}

impl FieldValueType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::String => "string",
            Self::Number => "number",
            Self::Text => "text",
            Self::Boolean => "boolean",
            Self::DateTime => "datetime",
        }
    }
}

impl fmt::Display for FieldValueType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for FieldValueType {
    type Err = String;

    /// Accepts the remote system's type names as well as the canonical ones
    /// (`integer`/`double` → number, `html`/`plainText` → text, ...).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "string" | "identity" | "treepath" => Ok(Self::String),
            "number" | "integer" | "double" => Ok(Self::Number),
            "text" | "html" | "plaintext" | "history" => Ok(Self::Text),
            "boolean" | "bool" => Ok(Self::Boolean),
            "datetime" | "date" => Ok(Self::DateTime),
            other => Err(format!("unknown field value type: {other}")),
        }
    }
}

/// One field of a work item type, as described by the remote catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldDefinition {
    /// Globally unique schema key, e.g. `System.Title` or `Custom.RiskLevel`.
    pub reference_name: String,
    /// Human-readable name shown in the work-tracking UI.
    pub display_name: String,
    #[serde(default)]
    pub value_type: FieldValueType,
    #[serde(default)]
    pub required: bool,
    #[serde(default)]
    pub read_only: bool,
}

impl FieldDefinition {
    pub fn new(
        reference_name: impl Into<String>,
        display_name: impl Into<String>,
        value_type: FieldValueType,
    ) -> Self {
        Self {
            reference_name: reference_name.into(),
            display_name: display_name.into(),
            value_type,
            required: false,
            read_only: false,
        }
    }

    #[must_use]
    pub fn with_required(mut self, required: bool) -> Self {
        self.required = required;
        self
    }

    #[must_use]
    pub fn with_read_only(mut self, read_only: bool) -> Self {
        self.read_only = read_only;
        self
    }

    /// Last dot-separated segment of the reference name
    /// (`Microsoft.VSTS.Common.Priority` → `Priority`).
    pub fn tail(&self) -> &str {
        self.reference_name
            .rsplit('.')
            .next()
            .unwrap_or(self.reference_name.as_str())
    }

    /// The curated field this definition describes, if any.
    pub fn curated(&self) -> Option<CuratedField> {
        CuratedField::from_reference_name(&self.reference_name)
    }
}

/// Well-known fields the row mapper coerces with fixed rules.
///
/// Every other resolved field is passed through untouched as an extra field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum CuratedField {
    Id,
    Title,
    Steps,
    Priority,
    AreaPath,
    IterationPath,
    Description,
    Tags,
    AutomationStatus,
}

impl CuratedField {
    pub const ALL: [CuratedField; 9] = [
        CuratedField::Id,
        CuratedField::Title,
        CuratedField::Steps,
        CuratedField::Priority,
        CuratedField::AreaPath,
        CuratedField::IterationPath,
        CuratedField::Description,
        CuratedField::Tags,
        CuratedField::AutomationStatus,
    ];

    pub fn reference_name(&self) -> &'static str {
        match self {
            Self::Id => "System.Id",
            Self::Title => TITLE_REFERENCE_NAME,
            Self::Steps => "Microsoft.VSTS.TCM.Steps",
            Self::Priority => "Microsoft.VSTS.Common.Priority",
            Self::AreaPath => "System.AreaPath",
            Self::IterationPath => "System.IterationPath",
            Self::Description => "System.Description",
            Self::Tags => "System.Tags",
            Self::AutomationStatus => "Microsoft.VSTS.TCM.AutomationStatus",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            Self::Id => "ID",
            Self::Title => "Title",
            Self::Steps => "Steps",
            Self::Priority => "Priority",
            Self::AreaPath => "Area Path",
            Self::IterationPath => "Iteration Path",
            Self::Description => "Description",
            Self::Tags => "Tags",
            Self::AutomationStatus => "Automation Status",
        }
    }

    pub fn value_type(&self) -> FieldValueType {
        match self {
            Self::Id | Self::Priority => FieldValueType::Number,
            Self::Steps | Self::Description => FieldValueType::Text,
            Self::Title
            | Self::AreaPath
            | Self::IterationPath
            | Self::Tags
            | Self::AutomationStatus => FieldValueType::String,
        }
    }

    /// Case-insensitive lookup by reference name.
    pub fn from_reference_name(reference_name: &str) -> Option<Self> {
        let trimmed = reference_name.trim();
        Self::ALL
            .into_iter()
            .find(|field| field.reference_name().eq_ignore_ascii_case(trimmed))
    }

    /// Catalog entry for this field as the remote system usually describes it.
    pub fn definition(&self) -> FieldDefinition {
        FieldDefinition::new(self.reference_name(), self.display_name(), self.value_type())
            .with_required(matches!(self, Self::Title))
            .with_read_only(matches!(self, Self::Id))
    }
}

impl fmt::Display for CuratedField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.reference_name())
    }
}

/// True if `reference_name` names the title field.
pub fn is_title(reference_name: &str) -> bool {
    reference_name.trim().eq_ignore_ascii_case(TITLE_REFERENCE_NAME)
}
