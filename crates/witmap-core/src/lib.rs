//! Row mapping and import aggregation.
//!
//! [`ImportPipeline`] ties the pieces together: headers are mapped by
//! [`witmap_map::MappingEngine`], rows are turned into records by
//! [`RowMapper`], and everything lands in one
//! [`OperationResult`](witmap_model::OperationResult).

#![deny(unsafe_code)]

pub mod coerce;
pub mod pipeline;
pub mod row_mapper;

pub use pipeline::{ImportOutcome, ImportPipeline, mapping_warnings};
pub use row_mapper::{RowMapper, RowOutcome};
pub use witmap_map::suggest_mapping;

use witmap_model::{OperationResult, RawRow, ResolvedMapping, Result};

/// Applies `mapping` to `rows` with default options.
///
/// Fails only when `mapping` has no title header.
pub fn map_rows(rows: &[RawRow], mapping: &ResolvedMapping) -> Result<OperationResult> {
    ImportPipeline::default().map_rows(rows, mapping)
}
