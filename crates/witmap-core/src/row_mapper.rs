//! Turns raw rows into [`MappedRecord`]s under a resolved mapping.

use std::collections::BTreeMap;

use tracing::trace;
use witmap_model::{
    CuratedField, ImportError, KnownFields, MappedRecord, MappingOptions, RawRow, RawValue,
    ResolvedMapping, Result, display_row_index,
};

use crate::coerce::apply_curated;

/// Where a group of headers writes to.
#[derive(Debug, Clone, PartialEq, Eq)]
enum Target {
    Curated(CuratedField),
    Extra(String),
}

/// Headers sharing one target, in mapping order.
#[derive(Debug, Clone)]
struct Column {
    target: Target,
    headers: Vec<String>,
}

impl Column {
    /// First non-blank cell among the column's headers.
    fn pick<'r>(&self, row: &'r RawRow) -> Option<(&str, &'r RawValue)> {
        self.headers.iter().find_map(|header| {
            row.get(header)
                .filter(|value| !value.is_blank())
                .map(|value| (header.as_str(), value))
        })
    }
}

/// Outcome of mapping one row.
#[derive(Debug)]
pub enum RowOutcome {
    Mapped(Box<MappedRecord>),
    /// Blank or missing title; the row is ignored without a diagnostic.
    Skipped,
    /// The row cannot be imported and is reported.
    Failed(ImportError),
}

/// Applies one resolved mapping to any number of rows.
#[derive(Debug, Clone)]
pub struct RowMapper {
    title: Column,
    columns: Vec<Column>,
    max_title_length: usize,
}

impl RowMapper {
    /// Prepares a mapper for `mapping`.
    ///
    /// Fails with [`ImportError::RequiredFieldUnresolved`] when no header
    /// maps to the title.
    pub fn new(mapping: &ResolvedMapping, options: &MappingOptions) -> Result<Self> {
        let mut title = Column {
            target: Target::Curated(CuratedField::Title),
            headers: Vec::new(),
        };
        let mut columns: Vec<Column> = Vec::new();

        for (header, reference_name) in mapping.iter() {
            let target = match CuratedField::from_reference_name(reference_name) {
                Some(CuratedField::Title) => {
                    title.headers.push(header.to_string());
                    continue;
                }
                Some(field) => Target::Curated(field),
                None => Target::Extra(reference_name.to_string()),
            };
            match columns.iter_mut().find(|c| same_target(&c.target, &target)) {
                Some(column) => column.headers.push(header.to_string()),
                None => columns.push(Column {
                    target,
                    headers: vec![header.to_string()],
                }),
            }
        }

        if title.headers.is_empty() {
            return Err(ImportError::RequiredFieldUnresolved {
                headers: mapping.iter().map(|(h, _)| h.to_string()).collect(),
            });
        }

        Ok(Self {
            title,
            columns,
            max_title_length: options.max_title_length,
        })
    }

    /// Headers supplying the title, in mapping order.
    pub fn title_headers(&self) -> &[String] {
        &self.title.headers
    }

    /// Maps the zero-based data row `index`.
    pub fn map_row(&self, index: usize, row: &RawRow) -> RowOutcome {
        let row_index = display_row_index(index);

        let Some(title) = self
            .title
            .pick(row)
            .and_then(|(_, value)| value.as_trimmed_text())
        else {
            trace!(row = row_index, "row skipped: no title");
            return RowOutcome::Skipped;
        };
        let length = title.chars().count();
        if length > self.max_title_length {
            return RowOutcome::Failed(ImportError::TitleTooLong {
                length,
                max: self.max_title_length,
            });
        }

        let mut known_fields = KnownFields::default();
        let mut extra_fields = BTreeMap::new();
        for column in &self.columns {
            let Some((header, value)) = column.pick(row) else {
                continue;
            };
            match &column.target {
                Target::Curated(field) => {
                    if !apply_curated(&mut known_fields, *field, value) {
                        trace!(
                            row = row_index,
                            header,
                            field = field.reference_name(),
                            "value not coercible, field left unset"
                        );
                    }
                }
                Target::Extra(reference_name) => {
                    extra_fields.insert(reference_name.clone(), value.clone());
                }
            }
        }

        RowOutcome::Mapped(Box::new(MappedRecord {
            title,
            known_fields,
            extra_fields,
            original_row: row.clone(),
            row_index,
        }))
    }
}

fn same_target(a: &Target, b: &Target) -> bool {
    match (a, b) {
        (Target::Curated(a), Target::Curated(b)) => a == b,
        (Target::Extra(a), Target::Extra(b)) => a.eq_ignore_ascii_case(b),
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use witmap_model::ItemId;

    use super::*;

    fn mapping(pairs: &[(&str, &str)]) -> ResolvedMapping {
        pairs.iter().map(|(h, f)| (h.to_string(), f.to_string())).collect()
    }

    fn row(cells: &[(&str, RawValue)]) -> RawRow {
        cells
            .iter()
            .map(|(h, v)| (h.to_string(), v.clone()))
            .collect()
    }

    fn mapped(outcome: RowOutcome) -> MappedRecord {
        match outcome {
            RowOutcome::Mapped(record) => *record,
            other => panic!("expected a record, got {other:?}"),
        }
    }

    #[test]
    fn requires_a_title_header() {
        let err = RowMapper::new(
            &mapping(&[("Steps", "Microsoft.VSTS.TCM.Steps")]),
            &MappingOptions::default(),
        )
        .unwrap_err();
        assert!(matches!(
            err,
            ImportError::RequiredFieldUnresolved { ref headers } if headers == &["Steps".to_string()]
        ));
    }

    #[test]
    fn duplicate_targets_take_first_non_blank_header() {
        let mapper = RowMapper::new(
            &mapping(&[
                ("Title", "System.Title"),
                ("Name", "System.Title"),
                ("Owner", "Custom.Owner"),
                ("Assigned", "custom.owner"),
            ]),
            &MappingOptions::default(),
        )
        .expect("mapper");
        assert_eq!(mapper.title_headers(), ["Title", "Name"]);

        let record = mapped(mapper.map_row(
            0,
            &row(&[
                ("Title", RawValue::text("  ")),
                ("Name", RawValue::text("Login works")),
                ("Owner", RawValue::Empty),
                ("Assigned", RawValue::text("dana")),
            ]),
        ));
        assert_eq!(record.title, "Login works");
        assert_eq!(record.extra_fields.len(), 1);
        assert_eq!(record.extra_fields["Custom.Owner"], RawValue::text("dana"));
    }

    #[test]
    fn blank_title_is_skipped() {
        let mapper = RowMapper::new(&mapping(&[("Title", "System.Title")]), &MappingOptions::default())
            .expect("mapper");
        assert!(matches!(mapper.map_row(0, &RawRow::new()), RowOutcome::Skipped));
        assert!(matches!(
            mapper.map_row(1, &row(&[("Title", RawValue::text(" \t "))])),
            RowOutcome::Skipped
        ));
    }

    #[test]
    fn overlong_title_fails_the_row() {
        let options = MappingOptions::default().with_max_title_length(5);
        let mapper = RowMapper::new(&mapping(&[("Title", "System.Title")]), &options).expect("mapper");
        match mapper.map_row(0, &row(&[("Title", RawValue::text("Too long"))])) {
            RowOutcome::Failed(ImportError::TitleTooLong { length, max }) => {
                assert_eq!((length, max), (8, 5));
            }
            other => panic!("expected failure, got {other:?}"),
        }
    }

    #[test]
    fn numeric_title_renders_as_integer() {
        let mapper = RowMapper::new(
            &mapping(&[("Title", "System.Title"), ("ID", "System.Id")]),
            &MappingOptions::default(),
        )
        .expect("mapper");
        let record = mapped(mapper.map_row(
            3,
            &row(&[("Title", RawValue::Number(2024.0)), ("ID", RawValue::Number(15.0))]),
        ));
        assert_eq!(record.title, "2024");
        assert_eq!(record.known_fields.id, Some(ItemId::Numeric(15)));
        assert_eq!(record.row_index, 5);
    }
}
