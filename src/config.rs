//! Configuration file handling.
//!
//! Every column name and filter the analysis uses lives here, with the
//! developer-survey defaults. Values can be overridden from a
//! `survey-lens.toml` file.

use crate::cli::Args;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// File looked up in the working directory when `--config` is not given.
pub const DEFAULT_CONFIG_FILE: &str = "survey-lens.toml";

/// Root configuration structure.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub input: InputConfig,

    #[serde(default)]
    pub cleaning: CleaningConfig,

    #[serde(default)]
    pub countries: CountriesConfig,

    #[serde(default)]
    pub breadth: BreadthConfig,

    #[serde(default)]
    pub spotlight: SpotlightConfig,

    #[serde(default)]
    pub learning: LearningConfig,

    #[serde(default)]
    pub output: OutputConfig,
}

/// Source file settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InputConfig {
    /// Survey CSV export.
    #[serde(default = "default_input_path")]
    pub path: PathBuf,

    /// Cell text that marks an unanswered question.
    #[serde(default = "default_null_marker")]
    pub null_marker: String,
}

impl Default for InputConfig {
    fn default() -> Self {
        Self {
            path: default_input_path(),
            null_marker: default_null_marker(),
        }
    }
}

fn default_input_path() -> PathBuf {
    PathBuf::from("survey_results_public.csv")
}

fn default_null_marker() -> String {
    "NA".to_string()
}

/// Columns removed before any analysis.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CleaningConfig {
    #[serde(default = "default_drop_columns")]
    pub drop_columns: Vec<String>,
}

impl Default for CleaningConfig {
    fn default() -> Self {
        Self {
            drop_columns: default_drop_columns(),
        }
    }
}

fn default_drop_columns() -> Vec<String> {
    vec![
        "ResponseId",
        "Q120",
        "SOAccount",
        "SOComm",
        "TBranch",
        "ICorPM",
        "TimeSearching",
        "TimeAnswering",
        "SurveyLength",
        "SurveyEase",
        "OfficeStackAsyncHaveWorkedWith",
        "OfficeStackAsyncWantToWorkWith",
        "OfficeStackSyncHaveWorkedWith",
    ]
    .into_iter()
    .map(String::from)
    .collect()
}

/// Participant ranking by country.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CountriesConfig {
    #[serde(default = "default_country_column")]
    pub column: String,

    #[serde(default = "default_top_n")]
    pub top_n: usize,
}

impl Default for CountriesConfig {
    fn default() -> Self {
        Self {
            column: default_country_column(),
            top_n: default_top_n(),
        }
    }
}

fn default_country_column() -> String {
    "Country".to_string()
}

fn default_top_n() -> usize {
    5
}

/// Per-respondent technology breadth, compared across the top countries.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BreadthConfig {
    #[serde(default = "default_country_column")]
    pub group_column: String,

    #[serde(default = "default_breadth_columns")]
    pub columns: Vec<String>,
}

impl Default for BreadthConfig {
    fn default() -> Self {
        Self {
            group_column: default_country_column(),
            columns: default_breadth_columns(),
        }
    }
}

fn default_breadth_columns() -> Vec<String> {
    vec![
        "LanguageHaveWorkedWith",
        "DatabaseHaveWorkedWith",
        "PlatformHaveWorkedWith",
        "WebframeHaveWorkedWith",
    ]
    .into_iter()
    .map(String::from)
    .collect()
}

/// Cohort whose current and wished-for languages are compared.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SpotlightConfig {
    #[serde(default = "default_country_column")]
    pub country_column: String,

    #[serde(default = "default_spotlight_country")]
    pub country: String,

    #[serde(default = "default_age_column")]
    pub age_column: String,

    #[serde(default = "default_spotlight_ages")]
    pub ages: Vec<String>,

    #[serde(default = "default_have_column")]
    pub have_column: String,

    #[serde(default = "default_want_column")]
    pub want_column: String,

    /// Short cohort description used in the chart title.
    #[serde(default = "default_spotlight_label")]
    pub label: String,
}

impl Default for SpotlightConfig {
    fn default() -> Self {
        Self {
            country_column: default_country_column(),
            country: default_spotlight_country(),
            age_column: default_age_column(),
            ages: default_spotlight_ages(),
            have_column: default_have_column(),
            want_column: default_want_column(),
            label: default_spotlight_label(),
        }
    }
}

fn default_spotlight_country() -> String {
    "United Kingdom of Great Britain and Northern Ireland".to_string()
}

fn default_age_column() -> String {
    "Age".to_string()
}

fn default_spotlight_ages() -> Vec<String> {
    vec!["18-24 years old".to_string(), "Under 18 years old".to_string()]
}

fn default_have_column() -> String {
    "LanguageHaveWorkedWith".to_string()
}

fn default_want_column() -> String {
    "LanguageWantToWorkWith".to_string()
}

fn default_spotlight_label() -> String {
    "UK, Age 18-24 or under 18".to_string()
}

/// One bar chart of learning resources.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LearningPanel {
    pub column: String,
    pub title: String,
    pub x_label: String,
}

impl LearningPanel {
    fn new(column: &str, title: &str, x_label: &str) -> Self {
        Self {
            column: column.to_string(),
            title: title.to_string(),
            x_label: x_label.to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LearningConfig {
    #[serde(default = "default_learning_panels")]
    pub panels: Vec<LearningPanel>,
}

impl Default for LearningConfig {
    fn default() -> Self {
        Self {
            panels: default_learning_panels(),
        }
    }
}

fn default_learning_panels() -> Vec<LearningPanel> {
    vec![
        LearningPanel::new("LearnCode", "LearnCode Methods", "Method"),
        LearningPanel::new("LearnCodeOnline", "LearnCodeOnline Resources", "Resource"),
        LearningPanel::new(
            "LearnCodeCoursesCert",
            "LearnCodeCoursesCert Platforms",
            "Platform",
        ),
    ]
}

/// Static image export settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    /// Pixels per inch of figure size.
    #[serde(default = "default_dpi")]
    pub dpi: u32,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self { dpi: default_dpi() }
    }
}

fn default_dpi() -> u32 {
    100
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))
    }

    /// Load `path` if given, else `survey-lens.toml` when present, else
    /// defaults.
    pub fn resolve(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => Self::load(path),
            None => {
                let fallback = Path::new(DEFAULT_CONFIG_FILE);
                if fallback.is_file() {
                    Self::load(fallback)
                } else {
                    Ok(Self::default())
                }
            }
        }
    }

    /// Apply command-line overrides.
    pub fn merge_with_args(&mut self, args: &Args) {
        if let Some(input) = &args.input {
            self.input.path = input.clone();
        }
        if let Some(top) = args.top {
            self.countries.top_n = top;
        }
    }

    /// Columns holding one category per response.
    pub fn categorical_columns(&self) -> Vec<String> {
        let mut columns = vec![
            self.countries.column.clone(),
            self.breadth.group_column.clone(),
            self.spotlight.country_column.clone(),
            self.spotlight.age_column.clone(),
        ];
        columns.sort();
        columns.dedup();
        columns
    }

    /// Columns holding `;`-joined options.
    pub fn multi_select_columns(&self) -> Vec<String> {
        let mut columns = self.breadth.columns.clone();
        columns.push(self.spotlight.have_column.clone());
        columns.push(self.spotlight.want_column.clone());
        columns.extend(self.learning.panels.iter().map(|p| p.column.clone()));
        columns.sort();
        columns.dedup();
        columns
    }

    /// Generate a default configuration as TOML string.
    pub fn default_toml() -> String {
        toml::to_string_pretty(&Self::default()).unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.input.path, PathBuf::from("survey_results_public.csv"));
        assert_eq!(config.countries.top_n, 5);
        assert_eq!(config.cleaning.drop_columns.len(), 13);
        assert_eq!(config.breadth.columns.len(), 4);
        assert_eq!(config.learning.panels[2].x_label, "Platform");
    }

    #[test]
    fn test_parse_partial_config() {
        let toml_content = r#"
[input]
path = "2024.csv"

[countries]
top_n = 3

[spotlight]
country = "Ireland"
ages = ["25-34 years old"]
label = "Ireland, 25-34"
"#;

        let config: Config = toml::from_str(toml_content).unwrap();
        assert_eq!(config.input.path, PathBuf::from("2024.csv"));
        assert_eq!(config.input.null_marker, "NA");
        assert_eq!(config.countries.top_n, 3);
        assert_eq!(config.countries.column, "Country");
        assert_eq!(config.spotlight.country, "Ireland");
        assert_eq!(config.spotlight.age_column, "Age");
        assert_eq!(config.learning.panels.len(), 3);
    }

    #[test]
    fn test_default_toml_round_trips() {
        let toml_str = Config::default_toml();
        assert!(toml_str.contains("[input]"));
        assert!(toml_str.contains("[[learning.panels]]"));

        let parsed: Config = toml::from_str(&toml_str).unwrap();
        assert_eq!(parsed.learning.panels, Config::default().learning.panels);
    }

    #[test]
    fn test_column_kinds() {
        let config = Config::default();
        assert_eq!(config.categorical_columns(), vec!["Age", "Country"]);

        let multi = config.multi_select_columns();
        assert!(multi.contains(&"LanguageWantToWorkWith".to_string()));
        assert!(multi.contains(&"LearnCodeOnline".to_string()));
        assert_eq!(multi.len(), 8);
    }

    #[test]
    fn test_merge_with_args() {
        let args = Args::parse_from(["survey-lens", "--input", "other.csv", "--top", "7"]);
        let mut config = Config::default();
        config.merge_with_args(&args);
        assert_eq!(config.input.path, PathBuf::from("other.csv"));
        assert_eq!(config.countries.top_n, 7);
    }

    #[test]
    fn test_missing_config_file_errors() {
        assert!(Config::load(Path::new("/no/such/survey-lens.toml")).is_err());
    }
}
