use std::borrow::Cow;
use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

/// A raw spreadsheet cell as handed over by the file decoder.
///
/// Decoders emit either text or a number; empty cells arrive as `null` or are
/// simply missing from the row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RawValue {
    Number(f64),
    Text(String),
    Empty,
}

/// One decoded row keyed by header.
pub type RawRow = BTreeMap<String, RawValue>;

impl RawValue {
    pub fn text(value: impl Into<String>) -> Self {
        Self::Text(value.into())
    }

    /// Cell rendered as text; integral numbers print without a fraction.
    pub fn as_text(&self) -> Cow<'_, str> {
        match self {
            Self::Text(value) => Cow::Borrowed(value.as_str()),
            Self::Number(value) => Cow::Owned(format_numeric(*value)),
            Self::Empty => Cow::Borrowed(""),
        }
    }

    /// Trimmed text, `None` when the cell is empty or whitespace.
    pub fn as_trimmed_text(&self) -> Option<String> {
        let text = self.as_text();
        let trimmed = text.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(trimmed.to_string())
        }
    }

    /// Base-10 integer value of the cell.
    ///
    /// Text must parse as a whole integer after trimming; numbers must be
    /// finite and integral. Anything else is `None`.
    pub fn as_integer(&self) -> Option<i64> {
        match self {
            Self::Text(value) => parse_i64(value),
            Self::Number(value) => {
                if value.is_finite()
                    && value.fract() == 0.0
                    && *value >= i64::MIN as f64
                    && *value <= i64::MAX as f64
                {
                    Some(*value as i64)
                } else {
                    None
                }
            }
            Self::Empty => None,
        }
    }

    pub fn is_blank(&self) -> bool {
        match self {
            Self::Text(value) => value.trim().is_empty(),
            Self::Number(value) => value.is_nan(),
            Self::Empty => true,
        }
    }
}

impl fmt::Display for RawValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.as_text())
    }
}

impl From<&str> for RawValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<String> for RawValue {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<f64> for RawValue {
    fn from(value: f64) -> Self {
        Self::Number(value)
    }
}

impl From<i64> for RawValue {
    fn from(value: i64) -> Self {
        Self::Number(value as f64)
    }
}

/// Formats a number the way a spreadsheet displays it (`2.0` → `2`).
pub fn format_numeric(v: f64) -> String {
    format!("{v}")
}

/// Parses a string as i64, returning None for invalid or empty strings.
pub fn parse_i64(value: &str) -> Option<i64> {
    if value.trim().is_empty() {
        return None;
    }
    value.trim().parse::<i64>().ok()
}
