//! Chart Plotter Module
//! Draws figure panels interactively using egui_plot.

use crate::charts::figure::{BoxData, ChartKind, Marker, Panel, SeriesData};
use crate::stats::CategoryCount;
use egui::{Color32, RichText};
use egui_plot::{
    Bar, BarChart, BoxElem, BoxPlot, BoxSpread, GridMark, Legend, Line, MarkerShape, Plot,
    PlotPoints, Points,
};
use std::ops::RangeInclusive;

/// Bar fill
pub const BAR_COLOR: Color32 = Color32::from_rgb(52, 152, 219); // Blue

pub const PALETTE: [Color32; 10] = [
    Color32::from_rgb(231, 76, 60),  // Red
    Color32::from_rgb(46, 204, 113), // Green
    Color32::from_rgb(155, 89, 182), // Purple
    Color32::from_rgb(243, 156, 18), // Orange
    Color32::from_rgb(26, 188, 156), // Teal
    Color32::from_rgb(233, 30, 99),  // Pink
    Color32::from_rgb(0, 188, 212),  // Cyan
    Color32::from_rgb(255, 87, 34),  // Deep Orange
    Color32::from_rgb(121, 85, 72),  // Brown
    Color32::from_rgb(96, 125, 139), // Blue Grey
];

/// Draws figure panels with egui_plot.
pub struct ChartPlotter;

impl ChartPlotter {
    pub fn series_color(index: usize) -> Color32 {
        PALETTE[index % PALETTE.len()]
    }

    /// Label for the category at an integer grid position, empty elsewhere.
    pub fn category_label(labels: &[String], value: f64) -> String {
        let idx = value.round();
        if idx < 0.0 || (value - idx).abs() > 1e-6 {
            return String::new();
        }
        labels.get(idx as usize).cloned().unwrap_or_default()
    }

    /// Draw one panel: title, plot, and for box plots a summary table.
    pub fn draw_panel(ui: &mut egui::Ui, id: &str, panel: &Panel, height: f32) {
        ui.label(RichText::new(&panel.title).size(14.0).strong());

        if panel.chart.is_empty() {
            ui.add_sized(
                [ui.available_width(), height],
                egui::Label::new(RichText::new("No Data").size(16.0).color(Color32::GRAY)),
            );
            return;
        }

        let labels = panel.chart.categories();
        let n = labels.len();

        let mut plot = Plot::new(id.to_string())
            .height(height)
            .allow_scroll(false)
            .x_axis_label(panel.x_label.clone())
            .include_y(0.0)
            .include_x(-0.5)
            .include_x(n as f64 - 0.5)
            .x_grid_spacer(move |_input| {
                (0..n)
                    .map(|i| GridMark {
                        value: i as f64,
                        step_size: 1.0,
                    })
                    .collect()
            })
            .x_axis_formatter(move |mark: GridMark, _range: &RangeInclusive<f64>| {
                Self::category_label(&labels, mark.value)
            });
        if let Some(y_label) = &panel.y_label {
            plot = plot.y_axis_label(y_label.clone());
        }

        match &panel.chart {
            ChartKind::Bars(bars) => {
                plot.show(ui, |plot_ui| plot_ui.bar_chart(Self::bar_chart(bars)));
            }
            ChartKind::Boxes(boxes) => {
                plot.show(ui, |plot_ui| {
                    for (i, data) in boxes.iter().enumerate() {
                        Self::draw_box(plot_ui, i, data);
                    }
                });
                Self::draw_box_table(ui, id, boxes);
            }
            ChartKind::Lines { series, .. } => {
                plot.legend(Legend::default()).show(ui, |plot_ui| {
                    for (i, data) in series.iter().enumerate() {
                        Self::draw_series(plot_ui, i, data);
                    }
                });
            }
        }
    }

    fn bar_chart(bars: &[CategoryCount]) -> BarChart {
        let bars = bars
            .iter()
            .enumerate()
            .map(|(i, entry)| {
                Bar::new(i as f64, entry.count as f64)
                    .name(&entry.category)
                    .width(0.8)
                    .fill(BAR_COLOR)
            })
            .collect();
        BarChart::new(bars).color(BAR_COLOR)
    }

    fn draw_box(plot_ui: &mut egui_plot::PlotUi, index: usize, data: &BoxData) {
        let Some(summary) = &data.summary else {
            return;
        };
        let color = Self::series_color(index);
        let x = index as f64;

        let elem = BoxElem::new(
            x,
            BoxSpread::new(
                summary.lower_whisker,
                summary.q1,
                summary.median,
                summary.q3,
                summary.upper_whisker,
            ),
        )
        .name(&data.label)
        .box_width(0.5)
        .fill(color.gamma_multiply(0.3))
        .stroke(egui::Stroke::new(1.5, color));
        plot_ui.box_plot(BoxPlot::new(vec![elem]).name(&data.label));

        if !summary.outliers.is_empty() {
            let points: PlotPoints = summary.outliers.iter().map(|&y| [x, y]).collect();
            plot_ui.points(
                Points::new(points)
                    .shape(MarkerShape::Circle)
                    .filled(false)
                    .radius(3.0)
                    .color(color),
            );
        }
    }

    fn draw_series(plot_ui: &mut egui_plot::PlotUi, index: usize, data: &SeriesData) {
        let color = Self::series_color(index);

        // A missing value breaks the line into separate runs
        let mut run: Vec<[f64; 2]> = Vec::new();
        let mut runs: Vec<Vec<[f64; 2]>> = Vec::new();
        for (i, value) in data.values.iter().enumerate() {
            match value {
                Some(v) => run.push([i as f64, *v]),
                None if !run.is_empty() => runs.push(std::mem::take(&mut run)),
                None => {}
            }
        }
        if !run.is_empty() {
            runs.push(run);
        }

        for points in &runs {
            plot_ui.line(
                Line::new(PlotPoints::from_iter(points.iter().copied()))
                    .color(color)
                    .width(1.5)
                    .name(&data.name),
            );
        }

        let shape = match data.marker {
            Marker::Circle => MarkerShape::Circle,
            Marker::Cross => MarkerShape::Cross,
        };
        let points: PlotPoints = runs.iter().flatten().copied().collect();
        plot_ui.points(
            Points::new(points)
                .shape(shape)
                .radius(4.0)
                .color(color)
                .name(&data.name),
        );
    }

    /// Draw per-box summary table
    pub fn draw_box_table(ui: &mut egui::Ui, id: &str, boxes: &[BoxData]) {
        egui::Frame::none()
            .fill(ui.visuals().widgets.noninteractive.bg_fill)
            .rounding(5.0)
            .inner_margin(8.0)
            .show(ui, |ui| {
                egui::Grid::new(ui.make_persistent_id(format!("box_table_{id}")))
                    .striped(true)
                    .min_col_width(45.0)
                    .spacing([8.0, 4.0])
                    .show(ui, |ui| {
                        for header in ["Group", "N", "Q1", "Median", "Q3", "Outliers"] {
                            ui.label(RichText::new(header).strong().size(11.0));
                        }
                        ui.end_row();

                        for (i, data) in boxes.iter().enumerate() {
                            ui.label(
                                RichText::new(&data.label)
                                    .size(11.0)
                                    .color(Self::series_color(i)),
                            );
                            ui.label(RichText::new(data.values.len().to_string()).size(11.0));
                            match &data.summary {
                                Some(s) => {
                                    ui.label(RichText::new(format!("{:.2}", s.q1)).size(11.0));
                                    ui.label(RichText::new(format!("{:.2}", s.median)).size(11.0));
                                    ui.label(RichText::new(format!("{:.2}", s.q3)).size(11.0));
                                    ui.label(
                                        RichText::new(s.outliers.len().to_string()).size(11.0),
                                    );
                                }
                                None => {
                                    for _ in 0..4 {
                                        ui.label(RichText::new("-").size(11.0));
                                    }
                                }
                            }
                            ui.end_row();
                        }
                    });
            });
    }
}
