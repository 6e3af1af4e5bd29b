//! Charts module - Figure model, chart builders and rendering

mod figure;
mod plotter;
mod renderer;
mod style;

pub use figure::{AxisLimits, AxisScale, Curve, Figure, LegendPosition, Panel, ReferenceLine};
pub use plotter::{ChartPlotter, PlotterError, ERROR_AXIS_RANGE};
pub use renderer::{RenderError, StaticChartRenderer};
pub use style::{
    CurveStyle, LayoutPads, LegendStyle, Rgb, Stroke, StyleConfig, TickDirection, TickStyle,
    AXES_LINE_WIDTH, DEFAULT_RESOLUTION, NORMAL_FONT_SIZE, POINTS_PER_INCH, PRESENTATION_FONT_SIZE,
};
