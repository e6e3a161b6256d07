//! Error types for mapping review operations.

use std::fmt;

/// Errors from mapping review operations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MappingError {
    /// Header is not part of the import.
    HeaderNotFound(String),
    /// Field is not in the catalog.
    FieldNotFound(String),
    /// Header has no suggestion to accept.
    NoSuggestion(String),
}

impl fmt::Display for MappingError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::HeaderNotFound(h) => write!(f, "Header not found: {h}"),
            Self::FieldNotFound(r) => write!(f, "Field not found in catalog: {r}"),
            Self::NoSuggestion(h) => write!(f, "No suggestion for header: {h}"),
        }
    }
}

impl std::error::Error for MappingError {}
