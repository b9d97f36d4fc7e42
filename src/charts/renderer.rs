//! Static Chart Renderer
//! Writes each figure as a PNG using plotters.
//!
//! Layout per figure: panels on the figure's grid, each with its title as
//! caption, category labels along x and the count axis along y.

use crate::charts::figure::{BoxData, ChartKind, Figure, Marker, Panel, SeriesData};
use crate::charts::{FigureRenderer, RenderError};
use crate::stats::{BoxSummary, CategoryCount};
use plotters::coord::Shift;
use plotters::prelude::*;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

type Area<'a> = DrawingArea<BitMapBackend<'a>, Shift>;

const BAR_COLOR: RGBColor = RGBColor(52, 152, 219);
const FONT: &str = "sans-serif";
/// Half width of a box and of its whisker caps, in pixels.
const BOX_HALF_WIDTH: i32 = 12;
const CAP_HALF_WIDTH: i32 = 6;

fn draw_err<E: std::fmt::Display>(e: E) -> RenderError {
    RenderError::Drawing(e.to_string())
}

/// Exports figures as PNG files into a directory.
pub struct StaticChartRenderer {
    out_dir: PathBuf,
    dpi: u32,
    open_after: bool,
    written: Vec<PathBuf>,
}

impl StaticChartRenderer {
    pub fn new(out_dir: impl Into<PathBuf>, dpi: u32) -> Self {
        Self {
            out_dir: out_dir.into(),
            dpi,
            open_after: false,
            written: Vec::new(),
        }
    }

    /// Open every written file with the system viewer.
    pub fn open_after(mut self, open_after: bool) -> Self {
        self.open_after = open_after;
        self
    }

    /// Files written by the last `render` call.
    pub fn written(&self) -> &[PathBuf] {
        &self.written
    }

    /// `01-top-countries.png` style name for the figure at `index`.
    pub fn file_name(index: usize, figure: &Figure) -> String {
        format!("{:02}-{}.png", index + 1, figure.slug)
    }

    /// Render one figure to `path`.
    pub fn render_figure(figure: &Figure, path: &Path, dpi: u32) -> Result<(), RenderError> {
        let root = BitMapBackend::new(path, figure.pixels(dpi)).into_drawing_area();
        root.fill(&WHITE).map_err(draw_err)?;

        let areas = root.split_evenly((figure.rows, figure.cols));
        for (panel, area) in figure.panels.iter().zip(areas.iter()) {
            Self::draw_panel(area, panel)?;
        }

        root.present().map_err(draw_err)?;
        Ok(())
    }

    fn draw_panel(area: &Area, panel: &Panel) -> Result<(), RenderError> {
        if panel.chart.is_empty() {
            let inner = area.titled(&panel.title, (FONT, 18)).map_err(draw_err)?;
            let (w, h) = inner.dim_in_pixel();
            let grey = BLACK.mix(0.5);
            let style = TextStyle::from((FONT, 16).into_font()).color(&grey);
            inner
                .draw_text("No Data", &style, (w as i32 / 2 - 30, h as i32 / 2))
                .map_err(draw_err)?;
            return Ok(());
        }

        match &panel.chart {
            ChartKind::Bars(bars) => Self::draw_bars(area, panel, bars),
            ChartKind::Boxes(boxes) => Self::draw_boxes(area, panel, boxes),
            ChartKind::Lines { categories, series } => {
                Self::draw_lines(area, panel, categories, series)
            }
        }
    }

    /// Height reserved under the x axis for the vertical category labels.
    fn x_label_area(labels: &[String]) -> u32 {
        let longest = labels.iter().map(|l| l.chars().count()).max().unwrap_or(0) as u32;
        (longest * 7 + 30).clamp(40, 220)
    }

    fn x_label_style() -> TextStyle<'static> {
        (FONT, 12).into_font().transform(FontTransform::Rotate90).into()
    }

    /// Whisker, box and median levels of one box, bottom to top.
    fn box_levels(summary: &BoxSummary) -> [f32; 5] {
        [
            summary.lower_whisker as f32,
            summary.q1 as f32,
            summary.median as f32,
            summary.q3 as f32,
            summary.upper_whisker as f32,
        ]
    }

    fn category_label(labels: &[String], value: &SegmentValue<usize>) -> String {
        match value {
            SegmentValue::CenterOf(i) => labels.get(*i).cloned().unwrap_or_default(),
            _ => String::new(),
        }
    }

    /// Upper bound of the value axis with some headroom.
    fn value_ceiling(max: f64) -> f64 {
        if max > 0.0 {
            max * 1.1
        } else {
            1.0
        }
    }

    fn draw_bars(area: &Area, panel: &Panel, bars: &[CategoryCount]) -> Result<(), RenderError> {
        let labels = panel.chart.categories();
        let n = labels.len();

        let mut chart = ChartBuilder::on(area)
            .caption(&panel.title, (FONT, 18))
            .margin(10)
            .x_label_area_size(Self::x_label_area(&labels))
            .y_label_area_size(60)
            .build_cartesian_2d(
                (0..n).into_segmented(),
                0f64..Self::value_ceiling(panel.chart.max_value()),
            )
            .map_err(draw_err)?;

        chart
            .configure_mesh()
            .disable_x_mesh()
            .x_labels(n)
            .x_label_formatter(&|v: &SegmentValue<usize>| Self::category_label(&labels, v))
            .x_label_style(Self::x_label_style())
            .x_desc(panel.x_label.as_str())
            .y_desc(panel.y_label.as_deref().unwrap_or(""))
            .draw()
            .map_err(draw_err)?;

        chart
            .draw_series(
                Histogram::vertical(&chart)
                    .style(BAR_COLOR.filled())
                    .margin(6)
                    .data(bars.iter().enumerate().map(|(i, b)| (i, b.count as f64))),
            )
            .map_err(draw_err)?;

        Ok(())
    }

    fn draw_boxes(area: &Area, panel: &Panel, boxes: &[BoxData]) -> Result<(), RenderError> {
        let labels = panel.chart.categories();
        let n = labels.len();
        let ceiling = Self::value_ceiling(panel.chart.max_value()) as f32;

        let mut chart = ChartBuilder::on(area)
            .caption(&panel.title, (FONT, 18))
            .margin(10)
            .x_label_area_size(Self::x_label_area(&labels))
            .y_label_area_size(60)
            .build_cartesian_2d((0..n).into_segmented(), 0f32..ceiling)
            .map_err(draw_err)?;

        chart
            .configure_mesh()
            .disable_x_mesh()
            .x_labels(n)
            .x_label_formatter(&|v: &SegmentValue<usize>| Self::category_label(&labels, v))
            .x_label_style(Self::x_label_style())
            .x_desc(panel.x_label.as_str())
            .y_desc(panel.y_label.as_deref().unwrap_or(""))
            .draw()
            .map_err(draw_err)?;

        for (i, data) in boxes.iter().enumerate() {
            let Some(summary) = &data.summary else {
                continue;
            };
            let style = Palette99::pick(i).stroke_width(2);
            let at = || SegmentValue::CenterOf(i);
            let [low, q1, median, q3, high] = Self::box_levels(summary);
            let box_height =
                chart.backend_coord(&(at(), q1)).1 - chart.backend_coord(&(at(), q3)).1;

            chart
                .draw_series(std::iter::once(
                    EmptyElement::at((at(), q3))
                        + Rectangle::new(
                            [(-BOX_HALF_WIDTH, 0), (BOX_HALF_WIDTH, box_height)],
                            style,
                        ),
                ))
                .map_err(draw_err)?;

            chart
                .draw_series(
                    [(low, q1), (q3, high)]
                        .into_iter()
                        .map(|(from, to)| PathElement::new(vec![(at(), from), (at(), to)], style)),
                )
                .map_err(draw_err)?;

            // Whisker caps and the median line
            let ticks = [
                (low, CAP_HALF_WIDTH),
                (median, BOX_HALF_WIDTH),
                (high, CAP_HALF_WIDTH),
            ];
            chart
                .draw_series(ticks.into_iter().map(|(y, half)| {
                    EmptyElement::at((at(), y))
                        + PathElement::new(vec![(-half, 0), (half, 0)], style)
                }))
                .map_err(draw_err)?;

            chart
                .draw_series(summary.outliers.iter().map(|&y| {
                    Circle::new((at(), y as f32), 3, Palette99::pick(i).stroke_width(1))
                }))
                .map_err(draw_err)?;
        }

        Ok(())
    }

    fn draw_lines(
        area: &Area,
        panel: &Panel,
        categories: &[String],
        series: &[SeriesData],
    ) -> Result<(), RenderError> {
        let n = categories.len();

        let mut chart = ChartBuilder::on(area)
            .caption(&panel.title, (FONT, 18))
            .margin(10)
            .x_label_area_size(Self::x_label_area(categories))
            .y_label_area_size(60)
            .build_cartesian_2d(
                (0..n).into_segmented(),
                0f64..Self::value_ceiling(panel.chart.max_value()),
            )
            .map_err(draw_err)?;

        chart
            .configure_mesh()
            .x_labels(n)
            .x_label_formatter(&|v: &SegmentValue<usize>| Self::category_label(categories, v))
            .x_label_style(Self::x_label_style())
            .x_desc(panel.x_label.as_str())
            .y_desc(panel.y_label.as_deref().unwrap_or(""))
            .draw()
            .map_err(draw_err)?;

        for (s, data) in series.iter().enumerate() {
            let style = Palette99::pick(s).stroke_width(2);
            let points: Vec<(usize, f64)> = data
                .values
                .iter()
                .enumerate()
                .filter_map(|(i, v)| v.map(|v| (i, v)))
                .collect();

            // Consecutive categories form one run; a gap starts a new one
            let mut runs: Vec<Vec<(usize, f64)>> = Vec::new();
            for &(i, v) in &points {
                match runs.last_mut() {
                    Some(run) if run.last().is_some_and(|&(j, _)| j + 1 == i) => run.push((i, v)),
                    _ => runs.push(vec![(i, v)]),
                }
            }

            for (r, run) in runs.iter().enumerate() {
                let anno = chart
                    .draw_series(LineSeries::new(
                        run.iter().map(|&(i, v)| (SegmentValue::CenterOf(i), v)),
                        style,
                    ))
                    .map_err(draw_err)?;
                if r == 0 {
                    anno.label(data.name.as_str()).legend(move |(x, y)| {
                        PathElement::new(vec![(x, y), (x + 20, y)], style)
                    });
                }
            }

            match data.marker {
                Marker::Circle => chart.draw_series(
                    points
                        .iter()
                        .map(|&(i, v)| Circle::new((SegmentValue::CenterOf(i), v), 4, style)),
                ),
                Marker::Cross => chart.draw_series(
                    points
                        .iter()
                        .map(|&(i, v)| Cross::new((SegmentValue::CenterOf(i), v), 4, style)),
                ),
            }
            .map_err(draw_err)?;
        }

        chart
            .configure_series_labels()
            .background_style(&WHITE.mix(0.8))
            .border_style(&BLACK)
            .draw()
            .map_err(draw_err)?;

        Ok(())
    }
}

impl FigureRenderer for StaticChartRenderer {
    fn render(&mut self, figures: &[Figure]) -> Result<(), RenderError> {
        std::fs::create_dir_all(&self.out_dir)?;
        self.written.clear();

        for (index, figure) in figures.iter().enumerate() {
            let path = self.out_dir.join(Self::file_name(index, figure));
            Self::render_figure(figure, &path, self.dpi)?;
            info!("Chart saved to {}", path.display());
            self.written.push(path);
        }

        if self.open_after {
            for path in &self.written {
                if let Err(e) = open::that(path) {
                    warn!("Could not open {}: {}", path.display(), e);
                }
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_file_name() {
        let figure = Figure::single(
            "top-countries",
            (10.0, 6.0),
            Panel::new("Top", "Country", ChartKind::bars(vec![])),
        );
        assert_eq!(
            StaticChartRenderer::file_name(0, &figure),
            "01-top-countries.png"
        );
        assert_eq!(
            StaticChartRenderer::file_name(11, &figure),
            "12-top-countries.png"
        );
    }

    #[test]
    fn test_label_area_fits_longest_label() {
        let labels = vec!["Stack Overflow".to_string(), "Books".to_string()];
        assert_eq!(StaticChartRenderer::x_label_area(&labels), 14 * 7 + 30);
        assert_eq!(StaticChartRenderer::x_label_area(&[]), 40);
    }

    #[test]
    fn test_box_levels_stop_at_observed_values() {
        let values = [1.0, 2.0, 3.0, 4.0, 5.0, 40.0];
        let summary = BoxSummary::from_values(&values).unwrap();
        let levels = StaticChartRenderer::box_levels(&summary);

        assert_eq!(levels, [1.0, 2.25, 3.5, 4.75, 5.0]);
        assert!(levels.iter().all(|&y| y >= 1.0));
        assert!(summary.outliers.iter().all(|&y| y as f32 > levels[4]));
    }

    #[test]
    fn test_value_ceiling() {
        assert_eq!(StaticChartRenderer::value_ceiling(0.0), 1.0);
        assert!((StaticChartRenderer::value_ceiling(10.0) - 11.0).abs() < 1e-9);
    }

    #[test]
    fn test_category_label() {
        let labels = vec!["a".to_string()];
        assert_eq!(
            StaticChartRenderer::category_label(&labels, &SegmentValue::CenterOf(0)),
            "a"
        );
        assert_eq!(
            StaticChartRenderer::category_label(&labels, &SegmentValue::Exact(0)),
            ""
        );
    }
}
