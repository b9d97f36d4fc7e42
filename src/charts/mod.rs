//! Charts module - figure descriptions and their renderers

mod figure;
mod plotter;
mod renderer;

pub use figure::{ChartKind, Figure, Panel};
pub use plotter::ChartPlotter;
pub use renderer::StaticChartRenderer;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum RenderError {
    #[error("Failed to draw chart: {0}")]
    Drawing(String),
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Chart window failed: {0}")]
    Window(String),
}

/// Anything that can present a list of figures.
pub trait FigureRenderer {
    fn render(&mut self, figures: &[Figure]) -> Result<(), RenderError>;
}
