//! Figure Model
//! Declarative description of a chart: a grid of panels, each holding curves,
//! reference lines, axis labels and limits. Built by [`ChartPlotter`] and drawn
//! by [`StaticChartRenderer`].
//!
//! [`ChartPlotter`]: crate::charts::ChartPlotter
//! [`StaticChartRenderer`]: crate::charts::StaticChartRenderer

use crate::charts::style::{CurveStyle, Rgb, StyleConfig};
use crate::data::{SeriesProcessor, AUTO_MARGIN};
use serde::{Deserialize, Serialize};

/// How an axis range is chosen.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum AxisLimits {
    /// Fit the data, padded by a small margin.
    Auto,
    Fixed(f64, f64),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AxisScale {
    Linear,
    Log,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LegendPosition {
    UpperLeft,
    UpperRight,
    LowerLeft,
    LowerRight,
}

/// One plotted line.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Curve {
    pub label: Option<String>,
    pub points: Vec<(f64, f64)>,
    pub style: CurveStyle,
}

impl Curve {
    /// Curve through `(xs[i], ys[i])`; callers check the lengths first.
    pub fn new(xs: &[f64], ys: &[f64], style: CurveStyle) -> Self {
        Self {
            label: None,
            points: SeriesProcessor::zip_points(xs, ys),
            style,
        }
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }
}

/// Horizontal line across the whole panel.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReferenceLine {
    pub y: f64,
    pub style: CurveStyle,
}

/// A single set of axes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Panel {
    pub title: Option<String>,
    pub x_label: String,
    pub y_label: String,
    /// Axis description size in points; the style's font size when `None`.
    pub axis_label_size: Option<f64>,
    pub x_limits: AxisLimits,
    pub y_limits: AxisLimits,
    pub y_scale: AxisScale,
    pub reference_lines: Vec<ReferenceLine>,
    pub curves: Vec<Curve>,
    pub legend: Option<LegendPosition>,
}

impl Panel {
    pub fn new(x_label: impl Into<String>, y_label: impl Into<String>) -> Self {
        Self {
            title: None,
            x_label: x_label.into(),
            y_label: y_label.into(),
            axis_label_size: None,
            x_limits: AxisLimits::Auto,
            y_limits: AxisLimits::Auto,
            y_scale: AxisScale::Linear,
            reference_lines: Vec::new(),
            curves: Vec::new(),
            legend: None,
        }
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn with_axis_label_size(mut self, points: f64) -> Self {
        self.axis_label_size = Some(points);
        self
    }

    pub fn with_x_limits(mut self, min: f64, max: f64) -> Self {
        self.x_limits = AxisLimits::Fixed(min, max);
        self
    }

    pub fn with_y_limits(mut self, min: f64, max: f64) -> Self {
        self.y_limits = AxisLimits::Fixed(min, max);
        self
    }

    pub fn with_log_y(mut self) -> Self {
        self.y_scale = AxisScale::Log;
        self
    }

    /// Black horizontal line at y = 0.
    pub fn with_zero_line(mut self, width: f64) -> Self {
        self.reference_lines.push(ReferenceLine {
            y: 0.0,
            style: CurveStyle::solid(Rgb::BLACK, width),
        });
        self
    }

    pub fn with_curve(mut self, curve: Curve) -> Self {
        self.curves.push(curve);
        self
    }

    pub fn with_legend(mut self, position: LegendPosition) -> Self {
        self.legend = Some(position);
        self
    }

    /// Whether a legend box will be drawn.
    pub fn shows_legend(&self) -> bool {
        self.legend.is_some() && self.curves.iter().any(|c| c.label.is_some())
    }

    /// Curves sorted so higher z-orders come last.
    pub fn curves_by_z_order(&self) -> Vec<&Curve> {
        let mut curves: Vec<&Curve> = self.curves.iter().collect();
        curves.sort_by_key(|c| c.style.z_order);
        curves
    }

    /// The x range to draw.
    ///
    /// A non-finite fixed bound falls back to the data-driven bound for that end.
    pub fn x_range(&self) -> (f64, f64) {
        match self.x_limits {
            AxisLimits::Fixed(min, max) => {
                Self::fixed_or_auto(min, max, f64::is_finite, || self.auto_x_range())
            }
            AxisLimits::Auto => self.auto_x_range(),
        }
    }

    /// The y range to draw, including reference lines.
    ///
    /// On a log axis, non-positive fixed bounds are treated like non-finite ones.
    pub fn y_range(&self) -> (f64, f64) {
        match self.y_limits {
            AxisLimits::Fixed(min, max) => {
                let log = self.y_scale == AxisScale::Log;
                let usable = move |v: f64| v.is_finite() && (!log || v > 0.0);
                Self::fixed_or_auto(min, max, usable, || self.auto_y_range())
            }
            AxisLimits::Auto => self.auto_y_range(),
        }
    }

    fn fixed_or_auto<U, A>(min: f64, max: f64, usable: U, auto: A) -> (f64, f64)
    where
        U: Fn(f64) -> bool,
        A: FnOnce() -> (f64, f64),
    {
        if usable(min) && usable(max) {
            return SeriesProcessor::widen_degenerate(min, max);
        }

        let (auto_min, auto_max) = auto();
        let lo = if usable(min) { min } else { auto_min };
        let hi = if usable(max) { max } else { auto_max };
        if lo < hi {
            (lo, hi)
        } else {
            (auto_min, auto_max)
        }
    }

    fn auto_x_range(&self) -> (f64, f64) {
        let xs = self.curves.iter().flat_map(|c| c.points.iter().map(|p| p.0));
        match SeriesProcessor::finite_bounds(xs) {
            Some((min, max)) => SeriesProcessor::padded_range(min, max, AUTO_MARGIN),
            None => (0.0, 1.0),
        }
    }

    fn auto_y_range(&self) -> (f64, f64) {
        let curve_ys = self.curves.iter().flat_map(|c| c.points.iter().map(|p| p.1));
        match self.y_scale {
            AxisScale::Linear => {
                let ys = curve_ys.chain(self.reference_lines.iter().map(|l| l.y));
                match SeriesProcessor::finite_bounds(ys) {
                    Some((min, max)) => SeriesProcessor::padded_range(min, max, AUTO_MARGIN),
                    None => (0.0, 1.0),
                }
            }
            AxisScale::Log => {
                let ys = curve_ys.filter(|y| *y > 0.0);
                match SeriesProcessor::finite_bounds(ys) {
                    Some((min, max)) => SeriesProcessor::decade_range(min, max),
                    None => (1e-1, 1.0),
                }
            }
        }
    }
}

/// A rendered-to-be chart: a grid of panels plus the style to draw them with.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Figure {
    /// Width in inches.
    pub width_in: f64,
    /// Height in inches.
    pub height_in: f64,
    pub rows: usize,
    pub cols: usize,
    pub panels: Vec<Panel>,
    pub style: StyleConfig,
}

impl Figure {
    pub fn new(style: StyleConfig, size_in: (f64, f64), grid: (usize, usize)) -> Self {
        Self {
            width_in: size_in.0,
            height_in: size_in.1,
            rows: grid.0.max(1),
            cols: grid.1.max(1),
            panels: Vec::new(),
            style,
        }
    }

    pub fn with_panel(mut self, panel: Panel) -> Self {
        self.panels.push(panel);
        self
    }

    pub fn panel_count(&self) -> usize {
        self.panels.len()
    }

    /// Output size in pixels at the style's resolution.
    pub fn pixel_size(&self) -> (u32, u32) {
        let w = self.style.inches_to_px(self.width_in).round().max(1.0);
        let h = self.style.inches_to_px(self.height_in).round().max(1.0);
        (w as u32, h as u32)
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}
