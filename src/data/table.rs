//! Survey Table Module
//! In-memory table of survey responses backed by a Polars DataFrame.
//!
//! Every column is held as text; a null cell is a missing answer.

use crate::data::schema::{ColumnKind, SurveySchema};
use polars::prelude::*;
use std::collections::BTreeMap;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum TableError {
    #[error("Column not found: {0}")]
    ColumnNotFound(String),
    #[error("Schema does not match the table columns")]
    SchemaMismatch,
    #[error("Polars error: {0}")]
    PolarsError(#[from] PolarsError),
}

/// A single survey response: ordered column name to optional value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Record {
    fields: Vec<(String, Option<String>)>,
}

impl Record {
    pub fn new(fields: Vec<(String, Option<String>)>) -> Self {
        Self { fields }
    }

    /// Value of `column`, `Ok(None)` when the answer is missing.
    pub fn get(&self, column: &str) -> Result<Option<&str>, TableError> {
        self.fields
            .iter()
            .find(|(name, _)| name == column)
            .map(|(_, value)| value.as_deref())
            .ok_or_else(|| TableError::ColumnNotFound(column.to_string()))
    }

}

/// Row filter; a missing value never matches.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RowPredicate {
    Equals { column: String, value: String },
    OneOf { column: String, values: Vec<String> },
}

impl RowPredicate {
    pub fn equals(column: impl Into<String>, value: impl Into<String>) -> Self {
        RowPredicate::Equals {
            column: column.into(),
            value: value.into(),
        }
    }

    pub fn one_of<S: Into<String>>(column: impl Into<String>, values: impl IntoIterator<Item = S>) -> Self {
        RowPredicate::OneOf {
            column: column.into(),
            values: values.into_iter().map(Into::into).collect(),
        }
    }

    pub fn column(&self) -> &str {
        match self {
            RowPredicate::Equals { column, .. } | RowPredicate::OneOf { column, .. } => column,
        }
    }

    pub fn matches(&self, value: Option<&str>) -> bool {
        let Some(value) = value else {
            return false;
        };
        match self {
            RowPredicate::Equals { value: expected, .. } => value == expected,
            RowPredicate::OneOf { values, .. } => values.iter().any(|v| v == value),
        }
    }
}

/// Ordered survey records sharing one schema.
#[derive(Debug, Clone)]
pub struct Table {
    frame: DataFrame,
    schema: SurveySchema,
}

impl Table {
    /// Wrap a DataFrame, casting every column to text.
    pub fn new(frame: DataFrame, schema: SurveySchema) -> Result<Self, TableError> {
        let names: Vec<String> = frame
            .get_column_names()
            .iter()
            .map(|s| s.to_string())
            .collect();
        if names != schema.names() {
            return Err(TableError::SchemaMismatch);
        }

        let columns = frame
            .get_columns()
            .iter()
            .map(|col| col.cast(&DataType::String))
            .collect::<PolarsResult<Vec<_>>>()?;
        let frame = DataFrame::new(columns)?;

        Ok(Self { frame, schema })
    }

    pub fn column_names(&self) -> Vec<String> {
        self.schema.names()
    }

    pub fn kind(&self, column: &str) -> Option<ColumnKind> {
        self.schema.kind(column)
    }

    pub fn height(&self) -> usize {
        self.frame.height()
    }

    pub fn is_empty(&self) -> bool {
        self.height() == 0
    }

    /// Text view of a column.
    pub fn text(&self, column: &str) -> Result<&StringChunked, TableError> {
        let col = self
            .frame
            .column(column)
            .map_err(|_| TableError::ColumnNotFound(column.to_string()))?;
        Ok(col.str()?)
    }

    /// Values of a column in row order.
    #[cfg(test)]
    pub fn column_values(&self, column: &str) -> Result<Vec<Option<&str>>, TableError> {
        Ok(self.text(column)?.into_iter().collect())
    }

    pub fn record(&self, index: usize) -> Option<Record> {
        if index >= self.height() {
            return None;
        }

        let fields = self
            .frame
            .get_columns()
            .iter()
            .map(|col| {
                let value = col
                    .str()
                    .ok()
                    .and_then(|ca| ca.get(index))
                    .map(str::to_string);
                (col.name().to_string(), value)
            })
            .collect();

        Some(Record::new(fields))
    }

    /// Projection without `names`. Row count and order are untouched.
    pub fn drop_columns<S: AsRef<str>>(&self, names: &[S]) -> Result<Self, TableError> {
        let removed: Vec<String> = names.iter().map(|n| n.as_ref().to_string()).collect();
        if let Some(missing) = removed.iter().find(|n| !self.schema.contains(n)) {
            return Err(TableError::ColumnNotFound(missing.clone()));
        }

        let schema = self.schema.without(&removed);
        let frame = self.frame.select(schema.names())?;

        Ok(Self { frame, schema })
    }

    /// Projection onto `names`, in the table's column order.
    pub fn select<S: AsRef<str>>(&self, names: &[S]) -> Result<Self, TableError> {
        let wanted: Vec<String> = names.iter().map(|n| n.as_ref().to_string()).collect();
        if let Some(missing) = wanted.iter().find(|n| !self.schema.contains(n)) {
            return Err(TableError::ColumnNotFound(missing.clone()));
        }

        let removed: Vec<String> = self
            .schema
            .names()
            .into_iter()
            .filter(|n| !wanted.contains(n))
            .collect();
        self.drop_columns(&removed)
    }

    /// Keep the first occurrence of every distinct full row.
    pub fn deduplicate(&self) -> Result<Self, TableError> {
        let frame = self
            .frame
            .unique_stable(None, UniqueKeepStrategy::First, None)?;
        Ok(Self {
            frame,
            schema: self.schema.clone(),
        })
    }

    /// Rows matching every predicate.
    pub fn filter(&self, predicates: &[RowPredicate]) -> Result<Self, TableError> {
        let columns = predicates
            .iter()
            .map(|p| self.text(p.column()).map(|ca| (p, ca)))
            .collect::<Result<Vec<_>, _>>()?;

        let keep: Vec<bool> = (0..self.height())
            .map(|i| columns.iter().all(|(p, ca)| p.matches(ca.get(i))))
            .collect();

        self.masked(&keep)
    }

    /// Row indices per distinct value of `column`, labels sorted.
    /// Rows with a missing value belong to no group.
    pub fn group_indices(&self, column: &str) -> Result<BTreeMap<String, Vec<usize>>, TableError> {
        let mut groups: BTreeMap<String, Vec<usize>> = BTreeMap::new();
        for (i, value) in self.text(column)?.into_iter().enumerate() {
            if let Some(value) = value {
                groups.entry(value.to_string()).or_default().push(i);
            }
        }
        Ok(groups)
    }

    fn masked(&self, keep: &[bool]) -> Result<Self, TableError> {
        let mask = BooleanChunked::from_slice("mask".into(), keep);
        Ok(Self {
            frame: self.frame.filter(&mask)?,
            schema: self.schema.clone(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::test_table;

    fn sample() -> Table {
        test_table(&[
            ("Id", &[Some("1"), Some("2"), Some("2"), Some("3")]),
            ("Country", &[Some("India"), Some("Germany"), Some("Germany"), None]),
            ("Age", &[Some("18-24"), Some("25-34"), Some("25-34"), Some("18-24")]),
        ])
    }

    #[test]
    fn test_drop_columns_is_projection() {
        let table = sample();
        let dropped = table.drop_columns(&["Id"]).unwrap();

        assert_eq!(dropped.column_names(), vec!["Country", "Age"]);
        assert_eq!(dropped.height(), table.height());
        assert_eq!(
            dropped.column_values("Country").unwrap(),
            table.column_values("Country").unwrap()
        );
    }

    #[test]
    fn test_drop_unknown_column_fails() {
        let err = sample().drop_columns(&["Nope"]).unwrap_err();
        assert!(matches!(err, TableError::ColumnNotFound(name) if name == "Nope"));
    }

    #[test]
    fn test_deduplicate_keeps_first_and_is_idempotent() {
        let table = sample();
        let once = table.deduplicate().unwrap();
        let twice = once.deduplicate().unwrap();

        assert_eq!(once.height(), 3);
        assert_eq!(
            once.column_values("Id").unwrap(),
            vec![Some("1"), Some("2"), Some("3")]
        );
        assert_eq!(twice.height(), once.height());
        for column in once.column_names() {
            assert_eq!(
                twice.column_values(&column).unwrap(),
                once.column_values(&column).unwrap()
            );
        }
    }

    #[test]
    fn test_deduplicate_treats_missing_as_equal() {
        let table = test_table(&[("a", &[None, None, Some("x")])]);
        assert_eq!(table.deduplicate().unwrap().height(), 2);
    }

    #[test]
    fn test_filter_conjunction_skips_missing() {
        let table = sample();
        let filtered = table
            .filter(&[
                RowPredicate::one_of("Country", ["India", "Germany"]),
                RowPredicate::equals("Age", "25-34"),
            ])
            .unwrap();
        assert_eq!(filtered.column_values("Id").unwrap(), vec![Some("2"), Some("2")]);

        let none = table
            .filter(&[RowPredicate::equals("Country", "Peru")])
            .unwrap();
        assert!(none.is_empty());
        assert_eq!(none.column_names(), table.column_names());
    }

    #[test]
    fn test_filter_unknown_column_fails() {
        let err = sample()
            .filter(&[RowPredicate::equals("Region", "EU")])
            .unwrap_err();
        assert!(matches!(err, TableError::ColumnNotFound(_)));
    }

    #[test]
    fn test_group_indices_sorted_and_skip_missing() {
        let groups = sample().group_indices("Country").unwrap();
        let labels: Vec<&String> = groups.keys().collect();
        assert_eq!(labels, vec!["Germany", "India"]);
        assert_eq!(groups["Germany"], vec![1, 2]);
    }

    #[test]
    fn test_record_access() {
        let table = sample();
        let record = table.record(3).unwrap();

        assert_eq!(record.get("Id").unwrap(), Some("3"));
        assert_eq!(record.get("Country").unwrap(), None);
        assert!(matches!(
            record.get("Region"),
            Err(TableError::ColumnNotFound(name)) if name == "Region"
        ));
        assert!(table.record(4).is_none());
    }

    #[test]
    fn test_select_keeps_table_order() {
        let table = sample();
        let projected = table.select(&["Age", "Id"]).unwrap();

        assert_eq!(projected.column_names(), vec!["Id", "Age"]);
        assert_eq!(projected.height(), 4);
        assert!(matches!(
            table.select(&["Region"]),
            Err(TableError::ColumnNotFound(name)) if name == "Region"
        ));
    }

    #[test]
    fn test_schema_mismatch_rejected() {
        let frame = df!("a" => &["x"]).unwrap();
        let schema = SurveySchema::from_header(&["b"], &[], &[]);
        let err = Table::new(frame, schema).unwrap_err();
        assert!(matches!(err, TableError::SchemaMismatch));
    }
}
