//! Frequency Table Module
//! Category counts in first-seen order with a stable descending view.

use serde::Serialize;
use std::collections::HashMap;

/// One category and how often it occurred.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CategoryCount {
    pub category: String,
    pub count: u64,
}

impl CategoryCount {
    pub fn new(category: impl Into<String>, count: u64) -> Self {
        Self {
            category: category.into(),
            count,
        }
    }
}

/// Counts per category label; labels compare by exact string equality.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct FrequencyTable {
    entries: Vec<CategoryCount>,
    #[serde(skip)]
    index: HashMap<String, usize>,
}

impl FrequencyTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, category: &str) {
        self.add_count(category, 1);
    }

    pub fn add_count(&mut self, category: &str, count: u64) {
        match self.index.get(category) {
            Some(&i) => self.entries[i].count += count,
            None => {
                self.index.insert(category.to_string(), self.entries.len());
                self.entries.push(CategoryCount::new(category, count));
            }
        }
    }

    pub fn get(&self, category: &str) -> Option<u64> {
        self.index.get(category).map(|&i| self.entries[i].count)
    }

    /// Number of distinct categories.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Sum of all counts.
    pub fn total(&self) -> u64 {
        self.iter().map(|e| e.count).sum()
    }

    /// Entries in the order their category was first seen.
    pub fn iter(&self) -> impl Iterator<Item = &CategoryCount> {
        self.entries.iter()
    }

    /// Entries by descending count; equal counts keep first-seen order.
    pub fn sorted_desc(&self) -> Vec<CategoryCount> {
        let mut sorted = self.entries.clone();
        sorted.sort_by(|a, b| b.count.cmp(&a.count));
        sorted
    }

    pub fn top(&self, n: usize) -> Vec<CategoryCount> {
        let mut sorted = self.sorted_desc();
        sorted.truncate(n);
        sorted
    }
}

impl<'a> FromIterator<&'a str> for FrequencyTable {
    fn from_iter<I: IntoIterator<Item = &'a str>>(iter: I) -> Self {
        let mut table = FrequencyTable::new();
        for category in iter {
            table.add(category);
        }
        table
    }
}

/// Two frequency tables aligned on the union of their categories.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FrequencyComparison {
    pub categories: Vec<String>,
    pub primary: Vec<Option<u64>>,
    pub secondary: Vec<Option<u64>>,
}

impl FrequencyComparison {
    /// Align `secondary` onto `primary`.
    ///
    /// Categories follow the primary's descending order; those only present
    /// in the secondary come last, in the secondary's descending order.
    pub fn compare(primary: &FrequencyTable, secondary: &FrequencyTable) -> Self {
        let mut categories: Vec<String> = primary
            .sorted_desc()
            .into_iter()
            .map(|e| e.category)
            .collect();
        categories.extend(
            secondary
                .sorted_desc()
                .into_iter()
                .filter(|e| primary.get(&e.category).is_none())
                .map(|e| e.category),
        );

        Self {
            primary: categories.iter().map(|c| primary.get(c)).collect(),
            secondary: categories.iter().map(|c| secondary.get(c)).collect(),
            categories,
        }
    }

    pub fn len(&self) -> usize {
        self.categories.len()
    }

    pub fn is_empty(&self) -> bool {
        self.categories.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_counts_in_first_seen_order() {
        let table: FrequencyTable = ["b", "a", "b", "c", "a", "b"].into_iter().collect();

        let seen: Vec<&str> = table.iter().map(|e| e.category.as_str()).collect();
        assert_eq!(seen, vec!["b", "a", "c"]);
        assert_eq!(table.get("b"), Some(3));
        assert_eq!(table.get("z"), None);
        assert_eq!(table.total(), 6);
        assert_eq!(table.len(), 3);
    }

    #[test]
    fn test_sorted_desc_is_stable() {
        let table: FrequencyTable = ["x", "y", "z", "z", "y"].into_iter().collect();
        assert_eq!(
            table.sorted_desc(),
            vec![
                CategoryCount::new("y", 2),
                CategoryCount::new("z", 2),
                CategoryCount::new("x", 1),
            ]
        );
        assert_eq!(table.top(1), vec![CategoryCount::new("y", 2)]);
        assert_eq!(table.top(10).len(), 3);
    }

    #[test]
    fn test_compare_aligns_union() {
        let have: FrequencyTable = ["Python", "SQL", "Python", "C"].into_iter().collect();
        let want: FrequencyTable = ["Rust", "Python", "Rust", "Go"].into_iter().collect();

        let cmp = FrequencyComparison::compare(&have, &want);
        assert_eq!(cmp.categories, vec!["Python", "SQL", "C", "Rust", "Go"]);
        assert_eq!(cmp.primary, vec![Some(2), Some(1), Some(1), None, None]);
        assert_eq!(cmp.secondary, vec![Some(1), None, None, Some(2), Some(1)]);
    }

    #[test]
    fn test_compare_empty() {
        let cmp = FrequencyComparison::compare(&FrequencyTable::new(), &FrequencyTable::new());
        assert!(cmp.is_empty());
    }
}
