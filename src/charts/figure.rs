//! Figure Model
//! Plain descriptions of the charts to draw. Renderers only read these.

use crate::stats::{BoxSummary, CategoryCount, FrequencyComparison};
use serde::Serialize;
use std::collections::BTreeMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Marker {
    Circle,
    Cross,
}

/// One box of a box plot.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BoxData {
    pub label: String,
    pub values: Vec<f64>,
    pub summary: Option<BoxSummary>,
}

impl BoxData {
    pub fn new(label: impl Into<String>, values: Vec<f64>) -> Self {
        let summary = BoxSummary::from_values(&values);
        Self {
            label: label.into(),
            values,
            summary,
        }
    }
}

/// One line over the shared categories; `None` leaves a gap.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SeriesData {
    pub name: String,
    pub values: Vec<Option<f64>>,
    pub marker: Marker,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum ChartKind {
    Bars(Vec<CategoryCount>),
    Boxes(Vec<BoxData>),
    Lines {
        categories: Vec<String>,
        series: Vec<SeriesData>,
    },
}

impl ChartKind {
    /// Bar chart in the given order.
    pub fn bars(counts: Vec<CategoryCount>) -> Self {
        ChartKind::Bars(counts)
    }

    /// One box per group, in map order.
    pub fn boxes(groups: &BTreeMap<String, Vec<usize>>) -> Self {
        ChartKind::Boxes(
            groups
                .iter()
                .map(|(label, breadth)| {
                    BoxData::new(label.clone(), breadth.iter().map(|&v| v as f64).collect())
                })
                .collect(),
        )
    }

    /// Two lines from an aligned comparison.
    pub fn comparison(
        comparison: &FrequencyComparison,
        primary_name: &str,
        secondary_name: &str,
    ) -> Self {
        let to_f64 = |values: &[Option<u64>]| -> Vec<Option<f64>> {
            values.iter().map(|v| v.map(|c| c as f64)).collect()
        };

        ChartKind::Lines {
            categories: comparison.categories.clone(),
            series: vec![
                SeriesData {
                    name: primary_name.to_string(),
                    values: to_f64(&comparison.primary),
                    marker: Marker::Circle,
                },
                SeriesData {
                    name: secondary_name.to_string(),
                    values: to_f64(&comparison.secondary),
                    marker: Marker::Cross,
                },
            ],
        }
    }

    /// Category labels along the x axis.
    pub fn categories(&self) -> Vec<String> {
        match self {
            ChartKind::Bars(bars) => bars.iter().map(|b| b.category.clone()).collect(),
            ChartKind::Boxes(boxes) => boxes.iter().map(|b| b.label.clone()).collect(),
            ChartKind::Lines { categories, .. } => categories.clone(),
        }
    }

    pub fn is_empty(&self) -> bool {
        match self {
            ChartKind::Bars(bars) => bars.is_empty(),
            ChartKind::Boxes(boxes) => boxes.iter().all(|b| b.values.is_empty()),
            ChartKind::Lines { categories, .. } => categories.is_empty(),
        }
    }

    /// Largest plotted value, 0 when empty.
    pub fn max_value(&self) -> f64 {
        match self {
            ChartKind::Bars(bars) => bars.iter().map(|b| b.count as f64).fold(0.0, f64::max),
            ChartKind::Boxes(boxes) => boxes
                .iter()
                .flat_map(|b| b.values.iter().copied())
                .fold(0.0, f64::max),
            ChartKind::Lines { series, .. } => series
                .iter()
                .flat_map(|s| s.values.iter().flatten().copied())
                .fold(0.0, f64::max),
        }
    }
}

/// One subplot.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Panel {
    pub title: String,
    pub x_label: String,
    pub y_label: Option<String>,
    pub chart: ChartKind,
}

impl Panel {
    pub fn new(title: impl Into<String>, x_label: impl Into<String>, chart: ChartKind) -> Self {
        Self {
            title: title.into(),
            x_label: x_label.into(),
            y_label: None,
            chart,
        }
    }

    pub fn with_y_label(mut self, label: impl Into<String>) -> Self {
        self.y_label = Some(label.into());
        self
    }
}

/// A window's worth of panels on a row-major grid.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Figure {
    /// File-name friendly identifier.
    pub slug: String,
    pub rows: usize,
    pub cols: usize,
    /// Width and height in inches.
    pub size: (f32, f32),
    pub panels: Vec<Panel>,
}

impl Figure {
    pub fn single(slug: impl Into<String>, size: (f32, f32), panel: Panel) -> Self {
        Self {
            slug: slug.into(),
            rows: 1,
            cols: 1,
            size,
            panels: vec![panel],
        }
    }

    /// Grid of `rows` x `cols`; grows extra rows if there are more panels.
    pub fn grid(
        slug: impl Into<String>,
        size: (f32, f32),
        rows: usize,
        cols: usize,
        panels: Vec<Panel>,
    ) -> Self {
        let cols = cols.max(1);
        let rows = rows.max(panels.len().div_ceil(cols)).max(1);
        Self {
            slug: slug.into(),
            rows,
            cols,
            size,
            panels,
        }
    }

    /// Title shown for the whole figure.
    pub fn heading(&self) -> String {
        match self.panels.as_slice() {
            [only] => only.title.clone(),
            _ => self
                .panels
                .iter()
                .map(|p| p.title.as_str())
                .collect::<Vec<_>>()
                .join(" | "),
        }
    }

    /// Pixel dimensions at `dpi`.
    pub fn pixels(&self, dpi: u32) -> (u32, u32) {
        let dpi = dpi as f32;
        (
            (self.size.0 * dpi).round().max(1.0) as u32,
            (self.size.1 * dpi).round().max(1.0) as u32,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stats::FrequencyTable;

    #[test]
    fn test_grid_grows_to_fit() {
        let panels = (0..5)
            .map(|i| Panel::new(format!("p{i}"), "x", ChartKind::bars(vec![])))
            .collect();
        let figure = Figure::grid("g", (12.0, 8.0), 2, 2, panels);
        assert_eq!((figure.rows, figure.cols), (3, 2));
        assert_eq!(figure.pixels(100), (1200, 800));
    }

    #[test]
    fn test_boxes_from_groups() {
        let mut groups = BTreeMap::new();
        groups.insert("India".to_string(), vec![1, 2, 3]);
        groups.insert("UK".to_string(), vec![]);

        let chart = ChartKind::boxes(&groups);
        assert_eq!(chart.categories(), vec!["India", "UK"]);
        assert_eq!(chart.max_value(), 3.0);
        assert!(!chart.is_empty());

        let ChartKind::Boxes(boxes) = chart else {
            panic!("expected boxes");
        };
        assert_eq!(boxes[0].summary.as_ref().unwrap().median, 2.0);
        assert!(boxes[1].summary.is_none());
    }

    #[test]
    fn test_comparison_lines() {
        let have: FrequencyTable = ["Rust", "Go", "Rust"].into_iter().collect();
        let want: FrequencyTable = ["Zig"].into_iter().collect();
        let cmp = FrequencyComparison::compare(&have, &want);

        let chart = ChartKind::comparison(&cmp, "Have", "Want");
        let ChartKind::Lines { categories, series } = &chart else {
            panic!("expected lines");
        };
        assert_eq!(categories, &vec!["Rust", "Go", "Zig"]);
        assert_eq!(series[0].values, vec![Some(2.0), Some(1.0), None]);
        assert_eq!(series[1].marker, Marker::Cross);
        assert_eq!(chart.max_value(), 2.0);
    }

    #[test]
    fn test_heading() {
        let single = Figure::single(
            "s",
            (10.0, 6.0),
            Panel::new("Top", "Country", ChartKind::bars(vec![])),
        );
        assert_eq!(single.heading(), "Top");
        assert!(single.panels[0].chart.is_empty());
    }
}
