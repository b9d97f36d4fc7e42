//! Survey Report Module
//! Runs the full analysis over a loaded table and lays out the figures.

use crate::charts::{ChartKind, Figure, Panel};
use crate::config::Config;
use crate::data::{DataProcessor, Table, TableError};
use crate::stats::{
    Aggregator, CategoryCount, FrequencyComparison, FrequencyTable, GroupStats, StatsCalculator,
};
use serde::Serialize;
use std::collections::BTreeMap;
use tracing::{debug, info, warn};

const HAVE_SERIES: &str = "Have Worked With";
const WANT_SERIES: &str = "Want To Work With";

/// Breadth distributions of one multi-select column.
#[derive(Debug, Clone, Serialize)]
pub struct BreadthReport {
    pub column: String,
    pub groups: BTreeMap<String, Vec<usize>>,
    pub stats: Vec<GroupStats>,
}

/// Current versus wished-for languages of the spotlight cohort.
#[derive(Debug, Clone, Serialize)]
pub struct SpotlightReport {
    pub label: String,
    pub respondents: usize,
    pub have: FrequencyTable,
    pub want: FrequencyTable,
    pub comparison: FrequencyComparison,
}

#[derive(Debug, Clone, Serialize)]
pub struct LearningReport {
    pub column: String,
    pub title: String,
    pub x_label: String,
    pub frequencies: Vec<CategoryCount>,
}

/// Every aggregate the charts are drawn from.
#[derive(Debug, Clone, Serialize)]
pub struct SurveyReport {
    pub respondents: usize,
    pub duplicates_removed: usize,
    pub columns: Vec<String>,
    pub top_countries: Vec<CategoryCount>,
    pub breadth: Vec<BreadthReport>,
    pub spotlight: SpotlightReport,
    pub learning: Vec<LearningReport>,
}

impl SurveyReport {
    /// Clean `raw` and derive all aggregates.
    pub fn build(raw: &Table, config: &Config) -> Result<Self, TableError> {
        let cleaned = DataProcessor::clean(raw, &config.cleaning.drop_columns)?;
        let table = &cleaned.table;

        let top_countries =
            Aggregator::top_n_categories(table, &config.countries.column, config.countries.top_n)?;
        info!(
            "Top {} countries: {:?}",
            top_countries.len(),
            top_countries.iter().map(|c| &c.category).collect::<Vec<_>>()
        );

        let top_labels: Vec<String> = top_countries.iter().map(|c| c.category.clone()).collect();
        let top_subset = DataProcessor::restrict_to(table, &config.countries.column, &top_labels)?;

        let breadth = config
            .breadth
            .columns
            .iter()
            .map(|column| {
                let groups =
                    Aggregator::grouped_breadth(&top_subset, &config.breadth.group_column, column)?;
                let stats = StatsCalculator::describe_groups(&groups);
                debug!("Breadth of {}: {} groups", column, groups.len());
                Ok(BreadthReport {
                    column: column.clone(),
                    groups,
                    stats,
                })
            })
            .collect::<Result<Vec<_>, TableError>>()?;

        let spotlight = Self::spotlight(table, config)?;

        let learning = config
            .learning
            .panels
            .iter()
            .map(|panel| {
                let freq = Aggregator::count_tokens(table, &panel.column)?;
                if freq.is_empty() {
                    warn!("No answers in {}", panel.column);
                }
                debug!(
                    "{}: {} distinct answers, {} mentions",
                    panel.column,
                    freq.len(),
                    freq.total()
                );
                Ok(LearningReport {
                    column: panel.column.clone(),
                    title: panel.title.clone(),
                    x_label: panel.x_label.clone(),
                    frequencies: freq.sorted_desc(),
                })
            })
            .collect::<Result<Vec<_>, TableError>>()?;

        Ok(Self {
            respondents: table.height(),
            duplicates_removed: cleaned.duplicates_removed,
            columns: table.column_names(),
            top_countries,
            breadth,
            spotlight,
            learning,
        })
    }

    fn spotlight(table: &Table, config: &Config) -> Result<SpotlightReport, TableError> {
        let spot = &config.spotlight;
        let cohort = DataProcessor::cohort(
            table,
            &spot.country_column,
            &spot.country,
            &spot.age_column,
            &spot.ages,
        )?;

        let have = Aggregator::count_tokens(&cohort, &spot.have_column)?;
        let want = Aggregator::count_tokens(&cohort, &spot.want_column)?;
        let comparison = FrequencyComparison::compare(&have, &want);
        if !comparison.is_empty() {
            debug!("{}: {} languages compared", spot.label, comparison.len());
        }

        Ok(SpotlightReport {
            label: spot.label.clone(),
            respondents: cohort.height(),
            have,
            want,
            comparison,
        })
    }

    /// Label/value pairs shown next to the charts.
    pub fn summary(&self) -> Vec<(String, String)> {
        vec![
            ("Respondents".to_string(), self.respondents.to_string()),
            ("Duplicates removed".to_string(), self.duplicates_removed.to_string()),
            ("Columns".to_string(), self.columns.len().to_string()),
            (self.spotlight.label.clone(), self.spotlight.respondents.to_string()),
        ]
    }

    /// Figures in display order.
    pub fn figures(&self) -> Vec<Figure> {
        let mut figures = Vec::with_capacity(4);

        figures.push(Figure::single(
            "top-countries",
            (10.0, 6.0),
            Panel::new(
                format!(
                    "Top {} Countries with Most Survey Participants",
                    self.top_countries.len()
                ),
                "Country",
                ChartKind::bars(self.top_countries.clone()),
            )
            .with_y_label("Number of Participants"),
        ));

        let breadth_panels = self
            .breadth
            .iter()
            .map(|b| {
                Panel::new(
                    format!("Distribution of {}", b.column),
                    "",
                    ChartKind::boxes(&b.groups),
                )
                .with_y_label("Count of Technologies Used")
            })
            .collect();
        figures.push(Figure::grid(
            "technology-breadth",
            (12.0, 8.0),
            2,
            2,
            breadth_panels,
        ));

        figures.push(Figure::single(
            "language-spotlight",
            (15.0, 5.0),
            Panel::new(
                format!(
                    "Most Popular Languages Have Worked With & Want To Work With ({})",
                    self.spotlight.label
                ),
                "Programming Languages",
                ChartKind::comparison(&self.spotlight.comparison, HAVE_SERIES, WANT_SERIES),
            )
            .with_y_label("Frequency"),
        ));

        let learning_panels: Vec<Panel> = self
            .learning
            .iter()
            .enumerate()
            .map(|(i, l)| {
                let panel = Panel::new(
                    l.title.clone(),
                    l.x_label.clone(),
                    ChartKind::bars(l.frequencies.clone()),
                );
                // Only the leftmost panel carries the shared y label
                if i == 0 {
                    panel.with_y_label("Frequency")
                } else {
                    panel
                }
            })
            .collect();
        let cols = learning_panels.len();
        figures.push(Figure::grid(
            "learning-methods",
            (14.0, 6.0),
            1,
            cols,
            learning_panels,
        ));

        figures
    }
}
