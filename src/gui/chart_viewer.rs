//! Chart Viewer Widget
//! Central panel showing one figure with its panels laid out on a grid.

use crate::charts::{ChartPlotter, Figure};
use egui::{RichText, ScrollArea};

/// Chart card configuration
const CHART_SPACING: f32 = 15.0;
const MIN_PANEL_HEIGHT: f32 = 220.0;
/// Room for panel title, axis labels and box tables
const PANEL_CHROME: f32 = 90.0;

/// Displays the panels of a figure row by row.
#[derive(Default)]
pub struct ChartViewer;

impl ChartViewer {
    pub fn new() -> Self {
        Self
    }

    /// Plot height that fits `rows` panels in `available` points.
    pub fn panel_height(available: f32, rows: usize) -> f32 {
        let rows = rows.max(1) as f32;
        (available / rows - PANEL_CHROME - CHART_SPACING).max(MIN_PANEL_HEIGHT)
    }

    pub fn show(&self, ui: &mut egui::Ui, figure: Option<&Figure>) {
        let Some(figure) = figure else {
            ui.centered_and_justified(|ui| {
                ui.label(RichText::new("No Data").size(20.0));
            });
            return;
        };

        ui.label(RichText::new(figure.heading()).size(18.0).strong());
        ui.add_space(8.0);

        let height = Self::panel_height(ui.available_height(), figure.rows);

        ScrollArea::vertical()
            .auto_shrink([false, false])
            .show(ui, |ui| {
                for row in 0..figure.rows {
                    ui.columns(figure.cols, |columns| {
                        for (col, col_ui) in columns.iter_mut().enumerate() {
                            let idx = row * figure.cols + col;
                            if let Some(panel) = figure.panels.get(idx) {
                                let id = format!("{}_{}", figure.slug, idx);
                                ChartPlotter::draw_panel(col_ui, &id, panel, height);
                            }
                        }
                    });
                    ui.add_space(CHART_SPACING);
                }
            });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_panel_height() {
        assert_eq!(ChartViewer::panel_height(1000.0, 1), 1000.0 - 105.0);
        assert_eq!(ChartViewer::panel_height(400.0, 2), MIN_PANEL_HEIGHT);
        assert_eq!(ChartViewer::panel_height(1000.0, 0), 895.0);
    }
}
