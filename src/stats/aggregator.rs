//! Multi-select Aggregator Module
//! Turns `;`-joined survey answers into category counts.
//!
//! A missing answer contributes no tokens. A present answer is split
//! verbatim: no trimming, no case folding, and an empty piece between two
//! delimiters is counted as the empty category.

use crate::data::{ColumnKind, Record, Table, TableError};
use crate::stats::frequency::{CategoryCount, FrequencyTable};
use std::collections::BTreeMap;
use tracing::debug;

/// Separator between the options of a multi-select answer.
pub const DELIMITER: char = ';';

/// Pure aggregation routines over a `Table`.
pub struct Aggregator;

impl Aggregator {
    /// Options of one answer.
    pub fn tokens(value: Option<&str>) -> impl Iterator<Item = &str> {
        value.into_iter().flat_map(|v| v.split(DELIMITER))
    }

    /// Number of options in one answer.
    pub fn token_count(value: Option<&str>) -> usize {
        Self::tokens(value).count()
    }

    /// Frequency of every option of a multi-select column.
    pub fn count_tokens(table: &Table, column: &str) -> Result<FrequencyTable, TableError> {
        let values = table.text(column)?;
        if table.kind(column) != Some(ColumnKind::MultiSelect) {
            debug!("Splitting {} although it is not declared multi-select", column);
        }

        let mut freq = FrequencyTable::new();
        for value in values.into_iter() {
            for token in Self::tokens(value) {
                freq.add(token);
            }
        }
        Ok(freq)
    }

    /// Breadth of one respondent's answer.
    pub fn count_tokens_per_row(record: &Record, column: &str) -> Result<usize, TableError> {
        Ok(Self::token_count(record.get(column)?))
    }

    /// The `n` most frequent values of a single-value column.
    ///
    /// Missing values are not counted. Ties keep first-seen order.
    pub fn top_n_categories(
        table: &Table,
        column: &str,
        n: usize,
    ) -> Result<Vec<CategoryCount>, TableError> {
        let freq: FrequencyTable = table.text(column)?.into_iter().flatten().collect();
        Ok(freq.top(n))
    }

    /// Per-row breadth of `value_column`, collected per `group_column` value.
    ///
    /// Groups are ordered by label and rows keep table order. Rows without a
    /// group value are left out; rows without an answer count as zero.
    pub fn grouped_breadth(
        table: &Table,
        group_column: &str,
        value_column: &str,
    ) -> Result<BTreeMap<String, Vec<usize>>, TableError> {
        let groups = table.group_indices(group_column)?;
        let pair = table.select(&[group_column, value_column])?;

        groups
            .into_iter()
            .map(|(group, rows)| {
                let breadth = rows
                    .into_iter()
                    .filter_map(|i| pair.record(i))
                    .map(|record| Self::count_tokens_per_row(&record, value_column))
                    .collect::<Result<Vec<_>, _>>()?;
                Ok((group, breadth))
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::test_table;

    fn languages() -> Table {
        test_table(&[
            ("Country", &[Some("UK"), Some("India"), Some("UK"), None]),
            (
                "LanguageHaveWorkedWith",
                &[Some("Python;SQL"), Some("Python;JavaScript"), Some("SQL"), None],
            ),
        ])
    }

    #[test]
    fn test_count_tokens_example() {
        let freq = Aggregator::count_tokens(&languages(), "LanguageHaveWorkedWith").unwrap();

        assert_eq!(freq.len(), 3);
        assert_eq!(freq.get("Python"), Some(2));
        assert_eq!(freq.get("SQL"), Some(2));
        assert_eq!(freq.get("JavaScript"), Some(1));
        assert_eq!(freq.get(""), None);
    }

    #[test]
    fn test_count_tokens_is_exact() {
        let table = test_table(&[("Tools", &[Some("Git; git;Git"), Some("a;;b")])]);
        let freq = Aggregator::count_tokens(&table, "Tools").unwrap();

        assert_eq!(freq.get("Git"), Some(2));
        assert_eq!(freq.get(" git"), Some(1));
        assert_eq!(freq.get(""), Some(1));
    }

    #[test]
    fn test_total_matches_per_row_breadth() {
        let table = test_table(&[(
            "LearnCode",
            &[Some("Books;School"), None, Some("Online"), Some("a;;b;c"), Some("")],
        )]);

        let total = Aggregator::count_tokens(&table, "LearnCode").unwrap().total();
        let per_row: usize = (0..table.height())
            .filter_map(|i| table.record(i))
            .map(|r| Aggregator::count_tokens_per_row(&r, "LearnCode").unwrap())
            .sum();

        assert_eq!(total, per_row as u64);
        assert_eq!(per_row, 2 + 0 + 1 + 4 + 1);
    }

    #[test]
    fn test_count_tokens_per_row() {
        let table = languages();
        let breadth: Vec<usize> = (0..table.height())
            .filter_map(|i| table.record(i))
            .map(|r| Aggregator::count_tokens_per_row(&r, "LanguageHaveWorkedWith").unwrap())
            .collect();
        assert_eq!(breadth, vec![2, 2, 1, 0]);

        let record = table.record(0).unwrap();
        assert!(matches!(
            Aggregator::count_tokens_per_row(&record, "Age"),
            Err(TableError::ColumnNotFound(_))
        ));
    }

    #[test]
    fn test_empty_table_gives_empty_results() {
        let table = test_table(&[("Country", &[]), ("LearnCode", &[])]);

        assert!(Aggregator::count_tokens(&table, "LearnCode").unwrap().is_empty());
        assert!(Aggregator::top_n_categories(&table, "Country", 5).unwrap().is_empty());
        assert!(Aggregator::grouped_breadth(&table, "Country", "LearnCode")
            .unwrap()
            .is_empty());
    }

    #[test]
    fn test_missing_column() {
        let table = languages();
        assert!(matches!(
            Aggregator::count_tokens(&table, "LearnCode"),
            Err(TableError::ColumnNotFound(c)) if c == "LearnCode"
        ));
        assert!(Aggregator::top_n_categories(&table, "Age", 3).is_err());
        assert!(Aggregator::grouped_breadth(&table, "Country", "Age").is_err());
        assert!(Aggregator::grouped_breadth(&table, "Age", "Country").is_err());
    }

    #[test]
    fn test_top_n_with_six_countries() {
        let countries = [
            "India", "USA", "Germany", "USA", "UK", "France", "Brazil", "Germany", "USA", "UK",
        ];
        let values: Vec<Option<&str>> = countries.iter().copied().map(Some).collect();
        let table = test_table(&[("Country", values.as_slice())]);

        let top = Aggregator::top_n_categories(&table, "Country", 5).unwrap();
        assert_eq!(
            top,
            vec![
                CategoryCount::new("USA", 3),
                CategoryCount::new("Germany", 2),
                CategoryCount::new("UK", 2),
                CategoryCount::new("India", 1),
                CategoryCount::new("France", 1),
            ]
        );
    }

    #[test]
    fn test_top_n_skips_missing_and_is_idempotent() {
        let table = test_table(&[("Country", &[None, None, None, Some("Peru"), Some("Chile")])]);
        let top = Aggregator::top_n_categories(&table, "Country", 2).unwrap();
        assert_eq!(
            top,
            vec![CategoryCount::new("Peru", 1), CategoryCount::new("Chile", 1)]
        );

        let mut again = FrequencyTable::new();
        for entry in &top {
            again.add_count(&entry.category, entry.count);
        }
        assert_eq!(again.top(2), top);
    }

    #[test]
    fn test_grouped_breadth() {
        let groups =
            Aggregator::grouped_breadth(&languages(), "Country", "LanguageHaveWorkedWith").unwrap();

        let labels: Vec<&String> = groups.keys().collect();
        assert_eq!(labels, vec!["India", "UK"]);
        assert_eq!(groups["UK"], vec![2, 1]);
        assert_eq!(groups["India"], vec![2]);
    }

    #[test]
    fn test_grouped_breadth_matches_per_row_counts() {
        let table = languages();
        let groups =
            Aggregator::grouped_breadth(&table, "Country", "LanguageHaveWorkedWith").unwrap();

        for (group, rows) in table.group_indices("Country").unwrap() {
            let expected: Vec<usize> = rows
                .iter()
                .map(|&i| {
                    let record = table.record(i).unwrap();
                    Aggregator::count_tokens_per_row(&record, "LanguageHaveWorkedWith").unwrap()
                })
                .collect();
            assert_eq!(groups[&group], expected);
        }
    }

    #[test]
    fn test_grouped_breadth_same_column_for_group_and_value() {
        let table = test_table(&[("Tags", &[Some("a;b"), Some("c"), Some("a;b")])]);
        let groups = Aggregator::grouped_breadth(&table, "Tags", "Tags").unwrap();
        assert_eq!(groups["a;b"], vec![2, 2]);
        assert_eq!(groups["c"], vec![1]);
    }

    #[test]
    fn test_grouped_breadth_counts_missing_answer_as_zero() {
        let table = test_table(&[
            ("Country", &[Some("UK"), Some("UK")]),
            ("Platform", &[None, Some("AWS;Azure;GCP")]),
        ]);
        let groups = Aggregator::grouped_breadth(&table, "Country", "Platform").unwrap();
        assert_eq!(groups["UK"], vec![0, 3]);
    }
}
