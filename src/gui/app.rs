//! Survey Lens Viewer Application
//! Main window with control panel and chart viewer.

use crate::charts::{Figure, FigureRenderer, RenderError};
use crate::gui::{ChartViewer, ControlPanel, ControlPanelAction};
use egui::SidePanel;
use tracing::info;

/// Main application window.
pub struct SurveyLensApp {
    control_panel: ControlPanel,
    chart_viewer: ChartViewer,
    figures: Vec<Figure>,
    current: usize,
}

impl SurveyLensApp {
    pub fn new(
        _cc: &eframe::CreationContext<'_>,
        figures: Vec<Figure>,
        summary: Vec<(String, String)>,
    ) -> Self {
        Self {
            control_panel: ControlPanel::new(summary),
            chart_viewer: ChartViewer::new(),
            figures,
            current: 0,
        }
    }

    fn apply(&mut self, action: ControlPanelAction) {
        self.current = ControlPanel::navigate(action, self.current, self.figures.len());
    }
}

impl eframe::App for SurveyLensApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // Arrow keys step through the figures
        let key_action = ctx.input(|i| {
            if i.key_pressed(egui::Key::ArrowRight) {
                ControlPanelAction::Next
            } else if i.key_pressed(egui::Key::ArrowLeft) {
                ControlPanelAction::Previous
            } else {
                ControlPanelAction::None
            }
        });
        self.apply(key_action);

        // Left panel - Control Panel
        SidePanel::left("control_panel")
            .min_width(280.0)
            .max_width(340.0)
            .show(ctx, |ui| {
                egui::ScrollArea::vertical().show(ui, |ui| {
                    let action = self.control_panel.show(ui, &self.figures, self.current);
                    self.apply(action);
                });
            });

        // Central panel - Chart Viewer
        egui::CentralPanel::default().show(ctx, |ui| {
            self.chart_viewer.show(ui, self.figures.get(self.current));
        });
    }
}

/// Presents figures in a native window until it is closed.
pub struct ViewerRenderer {
    title: String,
    summary: Vec<(String, String)>,
}

impl ViewerRenderer {
    pub fn new(title: impl Into<String>, summary: Vec<(String, String)>) -> Self {
        Self {
            title: title.into(),
            summary,
        }
    }
}

impl FigureRenderer for ViewerRenderer {
    fn render(&mut self, figures: &[Figure]) -> Result<(), RenderError> {
        let options = eframe::NativeOptions {
            viewport: egui::ViewportBuilder::default()
                .with_inner_size([1400.0, 800.0])
                .with_min_inner_size([1000.0, 600.0])
                .with_title(self.title.clone()),
            ..Default::default()
        };

        info!("Opening chart window with {} figures", figures.len());
        let figures = figures.to_vec();
        let summary = self.summary.clone();

        eframe::run_native(
            &self.title,
            options,
            Box::new(move |cc| Ok(Box::new(SurveyLensApp::new(cc, figures, summary)))),
        )
        .map_err(|e| RenderError::Window(e.to_string()))
    }
}
