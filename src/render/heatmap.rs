use std::fmt::Display;
use std::ops::Range;
use std::path::Path;

use plotters::coord::Shift;
use plotters::prelude::*;
use plotters::style::FontTransform;
use plotters::style::text_anchor::{HPos, Pos, VPos};
use tracing::debug;

use crate::analyzers::types::AxisLabels;
use crate::error::{PlotError, Result};
use crate::matrix::Matrix;
use crate::render::colors::{ColorScale, NO_DATA, default_ticks};
use crate::render::partition::partition;

/// Year labels are rotated once a panel has more columns than this.
const DENSE_YEAR_LABELS: usize = 6;

const FONT: &str = "sans-serif";

/// Pixel geometry of a rendered figure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RenderConfig {
    pub panel_width: u32,
    pub height: u32,
    pub legend_width: u32,
    pub font_size: u32,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            panel_width: 360,
            height: 900,
            legend_width: 120,
            font_size: 14,
        }
    }
}

/// What to draw: a title, the colour ticks and the number of panels.
#[derive(Debug, Clone, PartialEq)]
pub struct HeatmapSpec {
    pub title: String,
    pub ticks: Vec<f64>,
    pub subplots: usize,
}

impl HeatmapSpec {
    /// Percentage heatmap with ticks 0, 10, …, 100.
    pub fn new(title: impl Into<String>, subplots: usize) -> Self {
        Self {
            title: title.into(),
            ticks: default_ticks(),
            subplots,
        }
    }

    pub fn with_ticks(mut self, ticks: Vec<f64>) -> Self {
        self.ticks = ticks;
        self
    }
}

/// A rendered figure held in memory as SVG.
#[derive(Debug, Clone)]
pub struct Figure {
    width: u32,
    height: u32,
    panels: Vec<Range<usize>>,
    svg: String,
}

impl Figure {
    pub fn size(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    /// Network index ranges drawn in each panel, left to right.
    pub fn panels(&self) -> &[Range<usize>] {
        &self.panels
    }

    pub fn as_svg(&self) -> &str {
        &self.svg
    }

    /// Writes the SVG document to `path`.
    pub fn save(&self, path: &Path) -> Result<()> {
        std::fs::write(path, &self.svg).map_err(|e| PlotError::from_io(path, e))
    }
}

/// Smallest figure height leaving room for the title and the colour legend.
fn min_height(config: &RenderConfig) -> u32 {
    (config.font_size + 6) * 2 + config.font_size * 10
}

fn render_err<E: Display>(e: E) -> PlotError {
    PlotError::Render(e.to_string())
}

/// Label for an axis position that sits exactly on a cell centre.
fn label_at<T: ToString>(value: f64, labels: &[T]) -> String {
    let idx = value.round();
    if (value - idx).abs() > 1e-6 || idx < 0.0 {
        return String::new();
    }
    labels
        .get(idx as usize)
        .map(ToString::to_string)
        .unwrap_or_default()
}

/// Renders `matrix` as side-by-side heatmap panels sharing one colour scale.
///
/// Rows of `matrix` follow `labels.networks` and columns `labels.years`.
/// The network axis is split into `spec.subplots` contiguous panels.
///
/// # Errors
///
/// Returns [`PlotError::InvalidArgument`] if the matrix shape does not match
/// the labels or the panel count does not fit the network count, and
/// [`PlotError::Render`] if drawing fails.
#[tracing::instrument(skip_all, fields(title = %spec.title, subplots = spec.subplots))]
pub fn render_heatmap(
    labels: &AxisLabels,
    matrix: &Matrix,
    spec: &HeatmapSpec,
    config: &RenderConfig,
) -> Result<Figure> {
    if matrix.rows() != labels.networks.len() || matrix.cols() != labels.years.len() {
        return Err(PlotError::InvalidArgument(format!(
            "matrix is {}x{} but labels are {}x{}",
            matrix.rows(),
            matrix.cols(),
            labels.networks.len(),
            labels.years.len()
        )));
    }
    let panels = partition(labels.networks.len(), spec.subplots)?;
    let scale = ColorScale::from_ticks(&spec.ticks)?;

    let width = u32::try_from(panels.len())
        .ok()
        .and_then(|n| config.panel_width.checked_mul(n))
        .and_then(|w| w.checked_add(config.legend_width))
        .ok_or_else(|| {
            PlotError::InvalidArgument(format!(
                "{} panels of {} px do not fit in a figure",
                panels.len(),
                config.panel_width
            ))
        })?;
    let height = config.height;
    if height < min_height(config) {
        return Err(PlotError::InvalidArgument(format!(
            "figure height {height} too small, need at least {}",
            min_height(config)
        )));
    }
    let mut svg = String::new();
    {
        // The backend borrows `svg` and is dropped at the end of this block,
        // including on early return.
        let root = SVGBackend::with_string(&mut svg, (width, height)).into_drawing_area();
        draw_figure(&root, labels, matrix, spec, &scale, &panels, config)?;
        root.present().map_err(render_err)?;
    }

    debug!(
        width,
        height,
        panels = panels.len(),
        defined_cells = matrix.defined_cells(),
        "Figure rendered"
    );
    Ok(Figure {
        width,
        height,
        panels,
        svg,
    })
}

fn draw_figure<DB: DrawingBackend>(
    root: &DrawingArea<DB, Shift>,
    labels: &AxisLabels,
    matrix: &Matrix,
    spec: &HeatmapSpec,
    scale: &ColorScale,
    panels: &[Range<usize>],
    config: &RenderConfig,
) -> Result<()> {
    root.fill(&WHITE).map_err(render_err)?;
    let body = root
        .titled(&spec.title, (FONT, config.font_size + 6))
        .map_err(render_err)?;

    let (body_width, _) = body.dim_in_pixel();
    let (panel_area, legend_area) =
        body.split_horizontally(body_width.saturating_sub(config.legend_width));
    let areas = panel_area.split_evenly((1, panels.len()));
    let middle = panels.len() / 2;

    for (i, (area, rows)) in areas.iter().zip(panels).enumerate() {
        let block = matrix.slice_rows(rows.clone())?;
        draw_panel(
            area,
            &labels.networks[rows.clone()],
            &labels.years,
            &block,
            scale,
            config,
            i == 0,
            i == middle,
        )?;
    }

    draw_legend(&legend_area, scale, config)
}

#[allow(clippy::too_many_arguments)]
fn draw_panel<DB: DrawingBackend>(
    area: &DrawingArea<DB, Shift>,
    networks: &[String],
    years: &[i32],
    block: &Matrix,
    scale: &ColorScale,
    config: &RenderConfig,
    first: bool,
    middle: bool,
) -> Result<()> {
    let rows = block.rows();
    let cols = block.cols();
    let longest_network = networks.iter().map(String::len).max().unwrap_or(0) as u32;

    let mut chart = ChartBuilder::on(area)
        .margin(8)
        .x_label_area_size(config.font_size * 5)
        .y_label_area_size(config.font_size * (longest_network + 3) / 2 + 20)
        .build_cartesian_2d(-0.5..cols as f64 - 0.5, -0.5..rows as f64 - 0.5)
        .map_err(render_err)?;

    // first network at the top, like an image
    let top_down: Vec<&str> = networks.iter().rev().map(String::as_str).collect();
    let x_fmt = |v: &f64| label_at(*v, years);
    let y_fmt = |v: &f64| label_at(*v, &top_down);

    let mut x_style = FontDesc::from((FONT, config.font_size as f64));
    if cols > DENSE_YEAR_LABELS {
        x_style = x_style.transform(FontTransform::Rotate90);
    }

    let mut mesh = chart.configure_mesh();
    mesh.disable_mesh()
        .x_labels(cols)
        .y_labels(rows)
        .x_label_formatter(&x_fmt)
        .y_label_formatter(&y_fmt)
        .x_label_style(x_style)
        .y_label_style((FONT, config.font_size))
        .axis_desc_style((FONT, config.font_size + 2));
    if first {
        mesh.y_desc("Network");
    }
    if middle {
        mesh.x_desc("Years");
    }
    mesh.draw().map_err(render_err)?;

    let mut cells = Vec::with_capacity(rows * cols);
    let mut missing = Vec::new();
    for r in 0..rows {
        let y = (rows - 1 - r) as f64;
        for c in 0..cols {
            let x = c as f64;
            let corners = [(x - 0.5, y - 0.5), (x + 0.5, y + 0.5)];
            let value = block.get(r, c);
            cells.push(Rectangle::new(corners, scale.color_for(value).filled()));
            if value.is_none() {
                missing.push(PathElement::new(
                    vec![(x - 0.5, y - 0.5), (x + 0.5, y + 0.5)],
                    BLACK.mix(0.3),
                ));
            }
        }
    }
    chart.draw_series(cells).map_err(render_err)?;
    chart.draw_series(missing).map_err(render_err)?;

    Ok(())
}

fn draw_legend<DB: DrawingBackend>(
    area: &DrawingArea<DB, Shift>,
    scale: &ColorScale,
    config: &RenderConfig,
) -> Result<()> {
    let (_, h) = area.dim_in_pixel();
    let font = config.font_size as i32;
    let top = font * 2;
    let bottom = h as i32 - font * 6;
    let (left, right) = (10, 30);
    if bottom <= top {
        return Err(PlotError::InvalidArgument(format!(
            "figure height {} too small for the colour legend",
            config.height
        )));
    }

    let (min, max) = scale.range();
    let to_px = |v: f64| bottom - ((v - min) / (max - min) * f64::from(bottom - top)).round() as i32;

    let n = scale.levels().len();
    for (k, color) in scale.levels().iter().enumerate() {
        let lo = min + (max - min) * k as f64 / n as f64;
        let hi = min + (max - min) * (k + 1) as f64 / n as f64;
        area.draw(&Rectangle::new([(left, to_px(hi)), (right, to_px(lo))], color.filled()))
            .map_err(render_err)?;
    }
    area.draw(&Rectangle::new([(left, top), (right, bottom)], BLACK.stroke_width(1)))
        .map_err(render_err)?;

    let style = TextStyle::from((FONT, config.font_size as f64).into_font())
        .pos(Pos::new(HPos::Left, VPos::Center));
    for &tick in scale.ticks() {
        let y = to_px(tick);
        area.draw(&PathElement::new(vec![(right, y), (right + 4, y)], BLACK))
            .map_err(render_err)?;
        area.draw(&Text::new(format!("{tick}"), (right + 7, y), style.clone()))
            .map_err(render_err)?;
    }

    let na_top = bottom + font * 2;
    area.draw(&Rectangle::new(
        [(left, na_top), (right, na_top + font)],
        NO_DATA.filled(),
    ))
    .map_err(render_err)?;
    area.draw(&Text::new("no data", (right + 7, na_top + font / 2), style))
        .map_err(render_err)?;

    Ok(())
}
