//! Stats module - multi-select aggregation and descriptive statistics

mod aggregator;
mod calculator;
mod frequency;

pub use aggregator::Aggregator;
pub use calculator::{BoxSummary, GroupStats, StatsCalculator};
pub use frequency::{CategoryCount, FrequencyComparison, FrequencyTable};
