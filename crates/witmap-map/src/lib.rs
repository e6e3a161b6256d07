#![deny(unsafe_code)]

//! Header-to-field mapping for spreadsheet imports.
//!
//! Headers are normalized ([`utils`]), checked against a synonym table
//! ([`patterns`]), and otherwise scored against the field catalog
//! ([`score`]). The [`engine`] turns scores into suggestions and decides
//! which of them are safe to apply; [`state`] supports reviewing the rest.

pub mod engine;
pub mod error;
pub mod patterns;
pub mod score;
pub mod state;
pub mod utils;

pub use engine::{
    ConfidenceLevel, ConfidenceThresholds, MappingEngine, SuggestionReport, suggest_mapping,
};
pub use error::MappingError;
pub use patterns::{SynonymMatch, SynonymTable};
pub use score::{FieldScorer, ScoredField};
pub use state::{HeaderMappingStatus, MappingState, MappingSummary};
pub use utils::{normalize, singularize};
