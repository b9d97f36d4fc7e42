//! Data Processor Module
//! Cleaning and subsetting steps applied before aggregation.

use crate::data::{RowPredicate, Table, TableError};
use tracing::{debug, info, warn};

/// Outcome of the cleaning pass.
#[derive(Debug, Clone)]
pub struct CleanedTable {
    pub table: Table,
    pub duplicates_removed: usize,
}

/// Handles data cleaning and row selection.
pub struct DataProcessor;

impl DataProcessor {
    /// Remove duplicate responses, then drop the irrelevant columns.
    ///
    /// Duplicates are detected on the full raw row, before any column is
    /// dropped.
    pub fn clean<S: AsRef<str>>(table: &Table, drop_columns: &[S]) -> Result<CleanedTable, TableError> {
        let deduped = table.deduplicate()?;
        let duplicates_removed = table.height() - deduped.height();
        if duplicates_removed > 0 {
            info!("Removed {} duplicate rows", duplicates_removed);
        }

        let cleaned = deduped.drop_columns(drop_columns)?;
        info!(
            "Kept {} columns after dropping {}",
            cleaned.column_names().len(),
            drop_columns.len()
        );
        debug!("Columns: {:?}", cleaned.column_names());

        Ok(CleanedTable {
            table: cleaned,
            duplicates_removed,
        })
    }

    /// Rows whose `column` value is one of `categories`.
    pub fn restrict_to(table: &Table, column: &str, categories: &[String]) -> Result<Table, TableError> {
        let subset = table.filter(&[RowPredicate::one_of(column, categories.iter().cloned())])?;
        debug!(
            "Restricted {} to {} categories: {} of {} rows",
            column,
            categories.len(),
            subset.height(),
            table.height()
        );
        Ok(subset)
    }

    /// Respondents from one country whose age band is in `ages`.
    pub fn cohort(
        table: &Table,
        country_column: &str,
        country: &str,
        age_column: &str,
        ages: &[String],
    ) -> Result<Table, TableError> {
        let cohort = table.filter(&[
            RowPredicate::equals(country_column, country),
            RowPredicate::one_of(age_column, ages.iter().cloned()),
        ])?;

        if cohort.is_empty() {
            warn!("No respondents match {} = {:?} with ages {:?}", country_column, country, ages);
        } else {
            info!("Cohort {:?}: {} respondents", country, cohort.height());
        }
        Ok(cohort)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::test_table;

    fn survey() -> Table {
        test_table(&[
            ("ResponseId", &[Some("1"), Some("1"), Some("2"), Some("3")]),
            ("Q120", &[Some("x"), Some("x"), Some("x"), Some("x")]),
            ("Country", &[Some("UK"), Some("UK"), Some("UK"), Some("India")]),
            ("Age", &[Some("Under 18"), Some("Under 18"), Some("35-44"), Some("Under 18")]),
        ])
    }

    #[test]
    fn test_clean_dedupes_before_dropping() {
        let cleaned = DataProcessor::clean(&survey(), &["ResponseId", "Q120"]).unwrap();

        assert_eq!(cleaned.duplicates_removed, 1);
        assert_eq!(cleaned.table.height(), 3);
        assert_eq!(cleaned.table.column_names(), vec!["Country", "Age"]);
    }

    #[test]
    fn test_clean_rejects_unknown_column() {
        assert!(DataProcessor::clean(&survey(), &["SOAccount"]).is_err());
    }

    #[test]
    fn test_restrict_to() {
        let subset =
            DataProcessor::restrict_to(&survey(), "Country", &["India".to_string()]).unwrap();
        assert_eq!(subset.column_values("ResponseId").unwrap(), vec![Some("3")]);
    }

    #[test]
    fn test_cohort() {
        let cohort = DataProcessor::cohort(
            &survey(),
            "Country",
            "UK",
            "Age",
            &["Under 18".to_string(), "18-24".to_string()],
        )
        .unwrap();
        assert_eq!(cohort.height(), 2);

        let empty =
            DataProcessor::cohort(&survey(), "Country", "Peru", "Age", &["Under 18".to_string()])
                .unwrap();
        assert!(empty.is_empty());
    }
}
