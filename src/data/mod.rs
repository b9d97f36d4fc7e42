//! Data module - CSV loading, table model and cleaning

mod loader;
mod processor;
mod schema;
mod table;

pub use loader::SurveyLoader;
pub use processor::DataProcessor;
pub use schema::ColumnKind;
pub use table::{Record, RowPredicate, Table, TableError};

/// Build an all-text table from literal columns.
#[cfg(test)]
pub(crate) fn test_table(columns: &[(&str, &[Option<&str>])]) -> Table {
    use polars::prelude::*;

    let names: Vec<&str> = columns.iter().map(|(name, _)| *name).collect();
    let columns: Vec<Column> = columns
        .iter()
        .map(|(name, values)| Column::new((*name).into(), *values))
        .collect();
    let schema = schema::SurveySchema::from_header(&names, &[], &[]);
    Table::new(DataFrame::new(columns).unwrap(), schema).unwrap()
}
