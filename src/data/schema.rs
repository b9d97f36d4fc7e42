//! Survey Schema Module
//! Column names and value kinds, fixed when a file is loaded.

use std::collections::HashSet;

/// How the values of a column are interpreted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnKind {
    /// Exactly one category per response (e.g. country, age band).
    Categorical,
    /// Several options joined by `;`.
    MultiSelect,
    /// Anything else; carried through untouched.
    Text,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnSpec {
    pub name: String,
    pub kind: ColumnKind,
}

/// Ordered column schema of a loaded table.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SurveySchema {
    columns: Vec<ColumnSpec>,
}

impl SurveySchema {
    /// Build a schema for `header`, tagging the declared columns.
    ///
    /// Columns that appear in neither list are `Text`. A column listed as
    /// both categorical and multi-select is treated as multi-select.
    pub fn from_header<S: AsRef<str>>(
        header: &[S],
        categorical: &[String],
        multi_select: &[String],
    ) -> Self {
        let categorical: HashSet<&str> = categorical.iter().map(String::as_str).collect();
        let multi_select: HashSet<&str> = multi_select.iter().map(String::as_str).collect();

        let columns = header
            .iter()
            .map(|name| {
                let name = name.as_ref();
                let kind = if multi_select.contains(name) {
                    ColumnKind::MultiSelect
                } else if categorical.contains(name) {
                    ColumnKind::Categorical
                } else {
                    ColumnKind::Text
                };
                ColumnSpec {
                    name: name.to_string(),
                    kind,
                }
            })
            .collect();

        Self { columns }
    }

    pub fn names(&self) -> Vec<String> {
        self.columns.iter().map(|c| c.name.clone()).collect()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.columns.iter().any(|c| c.name == name)
    }

    pub fn kind(&self, name: &str) -> Option<ColumnKind> {
        self.columns.iter().find(|c| c.name == name).map(|c| c.kind)
    }

    /// Schema without the given columns, order preserved.
    pub fn without(&self, removed: &[String]) -> Self {
        Self {
            columns: self
                .columns
                .iter()
                .filter(|c| !removed.contains(&c.name))
                .cloned()
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kinds_from_declarations() {
        let schema = SurveySchema::from_header(
            &["Country", "LearnCode", "MainBranch"],
            &["Country".to_string()],
            &["LearnCode".to_string()],
        );

        assert_eq!(schema.kind("Country"), Some(ColumnKind::Categorical));
        assert_eq!(schema.kind("LearnCode"), Some(ColumnKind::MultiSelect));
        assert_eq!(schema.kind("MainBranch"), Some(ColumnKind::Text));
        assert_eq!(schema.kind("Missing"), None);
    }

    #[test]
    fn test_without_keeps_order() {
        let schema = SurveySchema::from_header(&["a", "b", "c", "d"], &[], &[]);
        let trimmed = schema.without(&["b".to_string(), "d".to_string()]);
        assert_eq!(trimmed.names(), vec!["a", "c"]);
        assert_eq!(schema.names().len(), 4);
    }
}
