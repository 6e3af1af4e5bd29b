//! Static Chart Renderer
//! Draws a [`Figure`] with plotters onto bitmap or SVG backends.
//!
//! Layout:
//! 1. The figure is split evenly into `rows x cols` cells, one panel per cell.
//! 2. Each cell gets a title band (one line of text per title line) above the axes.
//! 3. Axes: inward tick marks, optional minor ticks, axis descriptions.
//! 4. Reference lines, then curves in z-order, then the legend box.

use crate::charts::figure::{AxisScale, Curve, Figure, LegendPosition, Panel};
use crate::charts::style::{
    Rgb, Stroke, StyleConfig, TickDirection, AXES_LINE_WIDTH, POINTS_PER_INCH,
};
use crate::data::SeriesProcessor;
use image::{ImageFormat, RgbImage};
use plotters::coord::ranged1d::{BoldPoints, Ranged, ValueFormatter};
use plotters::coord::types::RangedCoordf64;
use plotters::coord::Shift;
use plotters::prelude::*;
use plotters::style::text_anchor::{HPos, Pos, VPos};
use std::io::Cursor;
use std::path::Path;
use thiserror::Error;
use tracing::{debug, trace, warn};

/// Upper bound on labelled ticks per axis.
const MAJOR_TICK_COUNT: usize = 10;

#[derive(Error, Debug)]
pub enum RenderError {
    #[error("drawing failed: {0}")]
    Drawing(String),
    #[error("unsupported output format `{0}`, expected `png` or `svg`")]
    UnsupportedFormat(String),
    #[error("a {rows}x{cols} grid cannot hold {panels} panels")]
    GridOverflow {
        rows: usize,
        cols: usize,
        panels: usize,
    },
    #[error("pixel buffer does not match the figure size")]
    Buffer,
    #[error("image encoding failed: {0}")]
    Image(#[from] image::ImageError),
}

fn drawing_error<E>(err: DrawingAreaErrorKind<E>) -> RenderError
where
    E: std::error::Error + Send + Sync,
{
    RenderError::Drawing(err.to_string())
}

fn rgb(color: Rgb) -> RGBColor {
    RGBColor(color.0, color.1, color.2)
}

fn font(size_px: f64, italic: bool) -> FontDesc<'static> {
    let style = if italic {
        FontStyle::Italic
    } else {
        FontStyle::Normal
    };
    FontDesc::new(FontFamily::Serif, size_px, style)
}

fn legend_position(position: LegendPosition) -> SeriesLabelPosition {
    match position {
        LegendPosition::UpperLeft => SeriesLabelPosition::UpperLeft,
        LegendPosition::UpperRight => SeriesLabelPosition::UpperRight,
        LegendPosition::LowerLeft => SeriesLabelPosition::LowerLeft,
        LegendPosition::LowerRight => SeriesLabelPosition::LowerRight,
    }
}

/// Minor tick count between two linear major ticks: five for 1/5/10 steps, four otherwise.
fn minor_subdivisions(step: f64) -> usize {
    let mantissa = step / 10f64.powf(step.log10().floor());
    let close = |v: f64| (mantissa - v).abs() < 1e-6;
    if close(1.0) || close(5.0) || close(10.0) {
        5
    } else {
        4
    }
}

/// Minor tick positions that subdivide the given major ticks, limited to `range`.
///
/// Log axes get the skipped decades between majors, or the 2..9 multiples when
/// majors sit on every decade.
fn minor_ticks(majors: &[f64], range: (f64, f64), log: bool) -> Vec<f64> {
    if majors.len() < 2 {
        return Vec::new();
    }
    let (lo, hi) = (range.0.min(range.1), range.0.max(range.1));
    let mut minors = Vec::new();

    if log {
        let ratio = majors[1] / majors[0];
        let decades = ratio.log10().round() as i32;
        if decades < 1 {
            return Vec::new();
        }
        let bases = std::iter::once(majors[0] / ratio).chain(majors.iter().copied());
        for base in bases {
            if decades > 1 {
                minors.extend((1..decades).map(|k| base * 10f64.powi(k)));
            } else {
                minors.extend((2..10).map(|m| base * m as f64));
            }
        }
    } else {
        let step = majors[1] - majors[0];
        if step <= 0.0 || !step.is_finite() {
            return Vec::new();
        }
        let n = minor_subdivisions(step);
        let minor_step = step / n as f64;
        for i in 0..=majors.len() {
            let base = majors[0] + (i as f64 - 1.0) * step;
            minors.extend((1..n).map(|k| base + k as f64 * minor_step));
        }
    }

    minors.retain(|v| *v >= lo && *v <= hi);
    minors
}

/// Keep points whose rendered positions are at least `gap_px` apart.
fn thin_by_pixel_gap<F>(points: &[(f64, f64)], gap_px: f64, to_pixel: F) -> Vec<(f64, f64)>
where
    F: Fn(&(f64, f64)) -> (i32, i32),
{
    let mut kept = Vec::new();
    let mut last: Option<(i32, i32)> = None;

    for point in points {
        let pixel = to_pixel(point);
        let far_enough = match last {
            None => true,
            Some((lx, ly)) => {
                let dx = (pixel.0 - lx) as f64;
                let dy = (pixel.1 - ly) as f64;
                (dx * dx + dy * dy).sqrt() >= gap_px
            }
        };
        if far_enough {
            kept.push(*point);
            last = Some(pixel);
        }
    }

    kept
}

/// Pixel sizes for one panel, derived from the style and the cell size.
struct PanelMetrics {
    resolution: f64,
    font_px: f64,
    axis_desc_px: f64,
    title_band_px: u32,
    margin_px: u32,
    x_label_area_px: u32,
    y_label_area_px: u32,
    major_tick_px: i32,
    minor_tick_px: i32,
    tick_width_px: u32,
    axis_width_px: u32,
    legend_margin_px: u32,
    legend_edge_px: u32,
    legend_sample_px: u32,
}

impl PanelMetrics {
    fn new(style: &StyleConfig, panel: &Panel, cell: (u32, u32)) -> Self {
        let font_px = style.points_to_px(style.font_size);
        let axis_desc_px = style.points_to_px(panel.axis_label_size.unwrap_or(style.font_size));
        let stroke = |points: f64| style.points_to_px(points).round().max(1.0) as u32;
        let sign = match style.ticks.direction {
            TickDirection::In => -1,
            TickDirection::Out => 1,
        };

        let title_lines = panel
            .title
            .as_deref()
            .map(|t| t.lines().count())
            .unwrap_or(0);

        let margin = if style.constrained_layout {
            let w_gap = style.layout.wspace * cell.0 as f64 / 2.0
                + style.inches_to_px(style.layout.w_pad);
            let h_gap = style.layout.hspace * cell.1 as f64 / 2.0
                + style.inches_to_px(style.layout.h_pad);
            w_gap.max(h_gap).max(font_px * 0.3)
        } else {
            font_px * 1.5
        };

        Self {
            resolution: style.resolution as f64,
            font_px,
            axis_desc_px,
            title_band_px: (title_lines as f64 * font_px * 1.4).round() as u32,
            margin_px: margin.round() as u32,
            x_label_area_px: (font_px * 1.6 + axis_desc_px * 1.6).ceil() as u32,
            y_label_area_px: (font_px * 4.0 + axis_desc_px * 1.6).ceil() as u32,
            major_tick_px: sign * style.points_to_px(style.ticks.major_size).round() as i32,
            minor_tick_px: sign * style.points_to_px(style.ticks.minor_size).round() as i32,
            tick_width_px: stroke(style.ticks.major_width),
            axis_width_px: stroke(AXES_LINE_WIDTH),
            legend_margin_px: (style.legend.border_pad * font_px).round() as u32,
            legend_edge_px: stroke(style.legend.edge_width),
            legend_sample_px: (font_px * 2.0).round().max(10.0) as u32,
        }
    }

    fn points_to_px(&self, points: f64) -> f64 {
        points * self.resolution / POINTS_PER_INCH
    }
}

/// Renders figures to files, strings and in-memory images.
pub struct StaticChartRenderer;

impl StaticChartRenderer {
    /// Write a PNG file.
    pub fn render_png<P: AsRef<Path>>(figure: &Figure, path: P) -> Result<(), RenderError> {
        let size = figure.pixel_size();
        debug!(path = %path.as_ref().display(), width = size.0, height = size.1, "render png");
        let root = BitMapBackend::new(path.as_ref(), size).into_drawing_area();
        Self::draw_figure(root, figure)
    }

    /// Write an SVG file.
    pub fn render_svg<P: AsRef<Path>>(figure: &Figure, path: P) -> Result<(), RenderError> {
        let size = figure.pixel_size();
        debug!(path = %path.as_ref().display(), width = size.0, height = size.1, "render svg");
        let root = SVGBackend::new(path.as_ref(), size).into_drawing_area();
        Self::draw_figure(root, figure)
    }

    /// Write a PNG or SVG file depending on the path's extension.
    pub fn save<P: AsRef<Path>>(figure: &Figure, path: P) -> Result<(), RenderError> {
        let path = path.as_ref();
        let extension = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_ascii_lowercase())
            .unwrap_or_default();

        match extension.as_str() {
            "png" => Self::render_png(figure, path),
            "svg" => Self::render_svg(figure, path),
            _ => Err(RenderError::UnsupportedFormat(extension)),
        }
    }

    /// Render to an SVG document held in memory.
    pub fn render_svg_string(figure: &Figure) -> Result<String, RenderError> {
        let mut svg = String::new();
        {
            let root = SVGBackend::with_string(&mut svg, figure.pixel_size()).into_drawing_area();
            Self::draw_figure(root, figure)?;
        }
        Ok(svg)
    }

    /// Render to an RGB image.
    pub fn render_rgb_image(figure: &Figure) -> Result<RgbImage, RenderError> {
        let (width, height) = figure.pixel_size();
        let mut buffer = vec![0u8; width as usize * height as usize * 3];
        {
            let root = BitMapBackend::with_buffer(&mut buffer, (width, height)).into_drawing_area();
            Self::draw_figure(root, figure)?;
        }
        RgbImage::from_raw(width, height, buffer).ok_or(RenderError::Buffer)
    }

    /// Render to PNG-encoded bytes.
    pub fn render_png_bytes(figure: &Figure) -> Result<Vec<u8>, RenderError> {
        let image = Self::render_rgb_image(figure)?;
        let mut bytes = Cursor::new(Vec::new());
        image.write_to(&mut bytes, ImageFormat::Png)?;
        Ok(bytes.into_inner())
    }

    fn draw_figure<DB: DrawingBackend>(
        root: DrawingArea<DB, Shift>,
        figure: &Figure,
    ) -> Result<(), RenderError> {
        let capacity = figure.rows * figure.cols;
        if figure.panel_count() > capacity {
            return Err(RenderError::GridOverflow {
                rows: figure.rows,
                cols: figure.cols,
                panels: figure.panel_count(),
            });
        }

        debug!(
            panels = figure.panel_count(),
            rows = figure.rows,
            cols = figure.cols,
            "draw figure"
        );

        root.fill(&WHITE).map_err(drawing_error)?;
        let cells = root.split_evenly((figure.rows, figure.cols));
        for (cell, panel) in cells.iter().zip(&figure.panels) {
            Self::draw_panel(cell, panel, &figure.style)?;
        }
        root.present().map_err(drawing_error)?;

        Ok(())
    }

    fn draw_panel<DB: DrawingBackend>(
        cell: &DrawingArea<DB, Shift>,
        panel: &Panel,
        style: &StyleConfig,
    ) -> Result<(), RenderError> {
        let metrics = PanelMetrics::new(style, panel, cell.dim_in_pixel());

        let (title_area, plot_area) = cell.split_vertically(metrics.title_band_px);
        if let Some(title) = &panel.title {
            Self::draw_title(&title_area, title, style, &metrics)?;
        }

        let (x_min, x_max) = panel.x_range();
        let (y_min, y_max) = panel.y_range();
        trace!(x_min, x_max, y_min, y_max, "panel ranges");

        let mut builder = ChartBuilder::on(&plot_area);
        builder
            .margin(metrics.margin_px)
            .x_label_area_size(metrics.x_label_area_px)
            .y_label_area_size(metrics.y_label_area_px);

        match panel.y_scale {
            AxisScale::Linear => {
                let mut chart = builder
                    .build_cartesian_2d(x_min..x_max, y_min..y_max)
                    .map_err(drawing_error)?;
                Self::draw_axes_and_series(&mut chart, panel, style, &metrics, None)
            }
            AxisScale::Log => {
                let log_tick = |v: &f64| format!("{:.0e}", v);
                let formatter: &dyn Fn(&f64) -> String = &log_tick;
                let mut chart = builder
                    .build_cartesian_2d(x_min..x_max, (y_min..y_max).log_scale())
                    .map_err(drawing_error)?;
                Self::draw_axes_and_series(&mut chart, panel, style, &metrics, Some(formatter))
            }
        }
    }

    fn draw_title<DB: DrawingBackend>(
        area: &DrawingArea<DB, Shift>,
        title: &str,
        style: &StyleConfig,
        metrics: &PanelMetrics,
    ) -> Result<(), RenderError> {
        let (width, height) = area.dim_in_pixel();
        let lines: Vec<&str> = title.lines().map(str::trim).collect();
        if lines.is_empty() {
            return Ok(());
        }

        let text = font(metrics.font_px, false)
            .color(&rgb(style.text_color))
            .pos(Pos::new(HPos::Center, VPos::Center));
        let line_height = height as f64 / lines.len() as f64;

        for (i, line) in lines.iter().enumerate() {
            let y = (line_height * (i as f64 + 0.5)).round() as i32;
            area.draw_text(line, &text, (width as i32 / 2, y))
                .map_err(drawing_error)?;
        }

        Ok(())
    }

    fn draw_axes_and_series<'a, DB, Y>(
        chart: &mut ChartContext<'a, DB, Cartesian2d<RangedCoordf64, Y>>,
        panel: &Panel,
        style: &StyleConfig,
        metrics: &PanelMetrics,
        y_formatter: Option<&dyn Fn(&f64) -> String>,
    ) -> Result<(), RenderError>
    where
        DB: DrawingBackend + 'a,
        Y: Ranged<ValueType = f64> + ValueFormatter<f64>,
    {
        let text_color = rgb(style.text_color);
        let log_y = panel.y_scale == AxisScale::Log;

        {
            let mut mesh = chart.configure_mesh();
            mesh.disable_mesh()
                .x_desc(panel.x_label.as_str())
                .y_desc(panel.y_label.as_str())
                .label_style(font(metrics.font_px, false).color(&text_color))
                .axis_desc_style(font(metrics.axis_desc_px, style.typeset_text).color(&text_color))
                .axis_style(text_color.stroke_width(metrics.axis_width_px))
                .set_tick_mark_size(LabelAreaPosition::Left, metrics.major_tick_px)
                .set_tick_mark_size(LabelAreaPosition::Bottom, metrics.major_tick_px)
                .x_labels(MAJOR_TICK_COUNT)
                .y_labels(MAJOR_TICK_COUNT);
            if let Some(formatter) = y_formatter {
                mesh.y_label_formatter(formatter);
            }
            mesh.draw().map_err(drawing_error)?;
        }

        if style.ticks.minor_visible {
            Self::draw_minor_ticks(chart, style, metrics, log_y)?;
        }

        let x_range = chart.as_coord_spec().x_spec().range();
        for line in &panel.reference_lines {
            if log_y && line.y <= 0.0 {
                continue;
            }
            let width = metrics.points_to_px(line.style.width).round().max(1.0) as u32;
            chart
                .draw_series(std::iter::once(PathElement::new(
                    vec![(x_range.start, line.y), (x_range.end, line.y)],
                    rgb(line.style.color).stroke_width(width),
                )))
                .map_err(drawing_error)?;
        }

        for curve in panel.curves_by_z_order() {
            Self::draw_curve(chart, curve, log_y, metrics)?;
        }

        if let Some(position) = panel.legend.filter(|_| panel.shows_legend()) {
            let legend = &style.legend;
            chart
                .configure_series_labels()
                .position(legend_position(position))
                .margin(metrics.legend_margin_px)
                .legend_area_size(metrics.legend_sample_px)
                .background_style(rgb(legend.face_color).mix(legend.face_alpha))
                .border_style(rgb(legend.edge_color).stroke_width(metrics.legend_edge_px))
                .label_font(font(metrics.font_px, false).color(&text_color))
                .draw()
                .map_err(drawing_error)?;
        }

        Ok(())
    }

    /// Short unlabelled marks along the bottom and left edges of the plot.
    fn draw_minor_ticks<'a, DB, Y>(
        chart: &ChartContext<'a, DB, Cartesian2d<RangedCoordf64, Y>>,
        style: &StyleConfig,
        metrics: &PanelMetrics,
        log_y: bool,
    ) -> Result<(), RenderError>
    where
        DB: DrawingBackend + 'a,
        Y: Ranged<ValueType = f64>,
    {
        let spec = chart.as_coord_spec();
        let x_range = spec.x_spec().range();
        let y_range = spec.y_spec().range();
        let x_minors = minor_ticks(
            &spec.x_spec().key_points(BoldPoints(MAJOR_TICK_COUNT)),
            (x_range.start, x_range.end),
            false,
        );
        let y_minors = minor_ticks(
            &spec.y_spec().key_points(BoldPoints(MAJOR_TICK_COUNT)),
            (y_range.start, y_range.end),
            log_y,
        );

        let plotting = chart.plotting_area();
        let (base_x, base_y) = plotting.get_base_pixel();
        let area = plotting.strip_coord_spec();
        let (_, height) = area.dim_in_pixel();
        // Last pixel row inside the plotting area.
        let bottom = height as i32 - 1;

        // Positive lengths point into the plot for inward ticks.
        let len = -metrics.minor_tick_px;
        let tick_style = rgb(style.text_color).stroke_width(metrics.tick_width_px);

        for x in x_minors {
            let (px, _) = chart.backend_coord(&(x, y_range.start));
            let px = px - base_x;
            area.draw(&PathElement::new(vec![(px, bottom), (px, bottom - len)], tick_style))
                .map_err(drawing_error)?;
        }
        for y in y_minors {
            let (_, py) = chart.backend_coord(&(x_range.start, y));
            let py = py - base_y;
            area.draw(&PathElement::new(vec![(0, py), (len, py)], tick_style))
                .map_err(drawing_error)?;
        }

        Ok(())
    }

    fn draw_curve<'a, DB, Y>(
        chart: &mut ChartContext<'a, DB, Cartesian2d<RangedCoordf64, Y>>,
        curve: &Curve,
        log_y: bool,
        metrics: &PanelMetrics,
    ) -> Result<(), RenderError>
    where
        DB: DrawingBackend + 'a,
        Y: Ranged<ValueType = f64>,
    {
        let runs = if log_y {
            SeriesProcessor::positive_runs(&curve.points)
        } else {
            SeriesProcessor::finite_runs(&curve.points)
        };

        let kept: usize = runs.iter().map(Vec::len).sum();
        let hidden = curve.points.len() - kept;
        if hidden > 0 {
            warn!(
                hidden,
                curve = curve.label.as_deref().unwrap_or("unlabelled"),
                log_y,
                "samples cannot be drawn on this axis"
            );
        }

        let color = rgb(curve.style.color);
        let width_px = metrics.points_to_px(curve.style.width).max(1.0);
        let sample_len = metrics.legend_sample_px as i32;

        for (i, run) in runs.iter().enumerate() {
            let label = if i == 0 { curve.label.as_deref() } else { None };

            match curve.style.stroke {
                Stroke::Solid => {
                    let line = color.stroke_width(width_px.round() as u32);
                    let anno = chart
                        .draw_series(LineSeries::new(run.iter().copied(), line))
                        .map_err(drawing_error)?;
                    if let Some(label) = label {
                        anno.label(label).legend(move |(x, y)| {
                            PathElement::new(vec![(x, y), (x + sample_len, y)], line)
                        });
                    }
                }
                Stroke::Dotted { gap } => {
                    let radius = (width_px / 2.0).round().max(1.0) as i32;
                    let legend_radius = radius.min((metrics.font_px / 2.0).round() as i32).max(1);
                    let fill = color.filled();
                    let dots = thin_by_pixel_gap(run, gap * width_px, |p| chart.backend_coord(p));

                    let anno = chart
                        .draw_series(dots.iter().map(|&p| Circle::new(p, radius, fill)))
                        .map_err(drawing_error)?;
                    if let Some(label) = label {
                        anno.label(label).legend(move |(x, y)| {
                            Circle::new((x + sample_len / 2, y), legend_radius, fill)
                        });
                    }

                    if let Some(outline) = curve.style.outline {
                        let contour = rgb(outline).stroke_width(metrics.tick_width_px);
                        chart
                            .draw_series(dots.iter().map(|&p| Circle::new(p, radius, contour)))
                            .map_err(drawing_error)?;
                    }
                }
            }
        }

        Ok(())
    }
}
