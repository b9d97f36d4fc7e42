//! Control Panel Widget
//! Left side panel with the run summary and figure navigation.

use crate::charts::Figure;
use egui::{Color32, RichText};

/// User request coming out of the control panel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControlPanelAction {
    None,
    Select(usize),
    Previous,
    Next,
}

/// Left side control panel.
#[derive(Default)]
pub struct ControlPanel {
    /// Label/value pairs describing the analysed data
    pub summary: Vec<(String, String)>,
}

impl ControlPanel {
    pub fn new(summary: Vec<(String, String)>) -> Self {
        Self { summary }
    }

    /// Index after applying `action` to `current` over `count` figures.
    pub fn navigate(action: ControlPanelAction, current: usize, count: usize) -> usize {
        if count == 0 {
            return 0;
        }
        match action {
            ControlPanelAction::None => current.min(count - 1),
            ControlPanelAction::Select(i) => i.min(count - 1),
            ControlPanelAction::Previous => current.saturating_sub(1),
            ControlPanelAction::Next => (current + 1).min(count - 1),
        }
    }

    /// Draw the control panel
    pub fn show(&mut self, ui: &mut egui::Ui, figures: &[Figure], current: usize) -> ControlPanelAction {
        let mut action = ControlPanelAction::None;

        ui.vertical_centered(|ui| {
            ui.add_space(5.0);
            ui.label(
                RichText::new("📊 Survey Lens")
                    .size(22.0)
                    .color(Color32::from_rgb(100, 149, 237)),
            );
        });
        ui.add_space(10.0);
        ui.separator();
        ui.add_space(5.0);

        // ===== Summary Section =====
        ui.label(RichText::new("📁 Data").size(14.0).strong());
        ui.add_space(5.0);
        egui::Frame::none()
            .fill(ui.visuals().widgets.noninteractive.bg_fill)
            .rounding(5.0)
            .inner_margin(8.0)
            .show(ui, |ui| {
                egui::Grid::new("summary_grid")
                    .num_columns(2)
                    .spacing([8.0, 4.0])
                    .show(ui, |ui| {
                        for (label, value) in &self.summary {
                            ui.label(RichText::new(label).size(12.0).color(Color32::GRAY));
                            ui.label(RichText::new(value).size(12.0));
                            ui.end_row();
                        }
                    });
            });

        ui.add_space(10.0);
        ui.separator();
        ui.add_space(5.0);

        // ===== Figures Section =====
        ui.label(RichText::new("📈 Charts").size(14.0).strong());
        ui.add_space(5.0);
        for (i, figure) in figures.iter().enumerate() {
            let text = format!("{}. {}", i + 1, figure.heading());
            if ui.selectable_label(i == current, text).clicked() {
                action = ControlPanelAction::Select(i);
            }
        }

        ui.add_space(10.0);
        ui.horizontal(|ui| {
            if ui
                .add_enabled(current > 0, egui::Button::new("◀ Previous"))
                .clicked()
            {
                action = ControlPanelAction::Previous;
            }
            if ui
                .add_enabled(current + 1 < figures.len(), egui::Button::new("Next ▶"))
                .clicked()
            {
                action = ControlPanelAction::Next;
            }
        });

        action
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_navigate_clamps() {
        assert_eq!(ControlPanel::navigate(ControlPanelAction::Next, 3, 4), 3);
        assert_eq!(ControlPanel::navigate(ControlPanelAction::Next, 1, 4), 2);
        assert_eq!(ControlPanel::navigate(ControlPanelAction::Previous, 0, 4), 0);
        assert_eq!(ControlPanel::navigate(ControlPanelAction::Select(9), 0, 4), 3);
        assert_eq!(ControlPanel::navigate(ControlPanelAction::None, 2, 4), 2);
        assert_eq!(ControlPanel::navigate(ControlPanelAction::Next, 0, 0), 0);
    }
}
