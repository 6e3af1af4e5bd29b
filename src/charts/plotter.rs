//! Chart Plotter Module
//! Builds the figures for the ODE solution charts.
//!
//! Each builder validates its sample series, then lays out a fixed set of
//! panels. Nothing is drawn here; hand the returned [`Figure`] to
//! [`StaticChartRenderer`](crate::charts::StaticChartRenderer).

use crate::charts::figure::{Curve, Figure, LegendPosition, Panel};
use crate::charts::style::{CurveStyle, Rgb, StyleConfig};
use crate::data::{SeriesError, SeriesProcessor};
use crate::stats::{CalculatorError, ErrorCalculator, ErrorMode};
use thiserror::Error;
use tracing::debug;

/// Fixed display range of the error panel.
pub const ERROR_AXIS_RANGE: (f64, f64) = (1e-20, 1.0);

/// Headroom above the highest point of a trajectory, in metres.
const TRAJECTORY_HEADROOM: f64 = 0.5;

/// Axis description size of the second-order chart, in points.
const ODE_AXIS_LABEL_SIZE: f64 = 20.0;

const FREE_FALL_TITLE: &str = "Solution to Newtons equation in free-fall:";

#[derive(Error, Debug, Clone, PartialEq)]
pub enum PlotterError {
    #[error("invalid series: {0}")]
    Series(#[from] SeriesError),
    #[error("error computation failed: {0}")]
    Calculator(#[from] CalculatorError),
}

/// Builds ODE solution charts with one shared style.
#[derive(Debug, Clone, Default)]
pub struct ChartPlotter {
    style: StyleConfig,
}

impl ChartPlotter {
    pub fn new(style: StyleConfig) -> Self {
        Self { style }
    }

    pub fn style(&self) -> &StyleConfig {
        &self.style
    }

    fn figure(&self, size_in: (f64, f64), grid: (usize, usize)) -> Figure {
        Figure::new(self.style.clone(), size_in, grid)
    }

    /// Exact and numerical velocity side by side with their error on a log scale.
    pub fn velocity_vs_time(
        &self,
        t: &[f64],
        v_exact: &[f64],
        v_num: &[f64],
        mode: ErrorMode,
    ) -> Result<Figure, PlotterError> {
        let len = SeriesProcessor::check_non_empty(&[
            ("t", t),
            ("v_exact", v_exact),
            ("v_num", v_num),
        ])?;
        debug!(len, mode = mode.label(), "velocity vs. time chart");

        let error = ErrorCalculator::compute_error(v_exact, v_num, mode)?;

        let velocity = Panel::new("t [s]", "v(t) [m/s]")
            .with_title("Velocity vs. time")
            .with_curve(
                Curve::new(t, v_num, self.style.numerical.clone())
                    .with_label(self.style.numerical_label.clone()),
            )
            .with_curve(
                Curve::new(t, v_exact, self.style.exact.clone())
                    .with_label(self.style.exact_label.clone()),
            )
            .with_legend(LegendPosition::UpperLeft);

        let (lo, hi) = ERROR_AXIS_RANGE;
        let errors = Panel::new("t [s]", "v(t) [m/s]")
            .with_title(format!(
                "{} error between analytic and numerical solutions",
                mode.label()
            ))
            .with_log_y()
            .with_y_limits(lo, hi)
            .with_curve(Curve::new(t, &error, CurveStyle::solid(Rgb::RED, 1.5)));

        Ok(self
            .figure((8.0, 4.0), (1, 2))
            .with_panel(velocity)
            .with_panel(errors))
    }

    /// A solution `y` and its derivative `dy` over `x`.
    pub fn second_order_ode(
        &self,
        x: &[f64],
        y: &[f64],
        dy: &[f64],
    ) -> Result<Figure, PlotterError> {
        let len = SeriesProcessor::check_non_empty(&[("x", x), ("y", y), ("dy", dy)])?;
        debug!(len, "second-order ODE chart");

        let panel = Panel::new("x", "U_sol")
            .with_title("Solution to second-order differential equation")
            .with_axis_label_size(ODE_AXIS_LABEL_SIZE)
            .with_x_limits(x[0], x[len - 1])
            .with_zero_line(1.5)
            .with_curve(Curve::new(x, y, CurveStyle::solid(Rgb::BLUE, 2.0)).with_label("y"))
            .with_curve(Curve::new(x, dy, CurveStyle::solid(Rgb::RED, 2.0)).with_label("dy/dx"))
            .with_legend(LegendPosition::UpperLeft);

        Ok(self.figure((6.4, 4.8), (1, 1)).with_panel(panel))
    }

    /// Trajectory, positions and velocities of a projectile, stacked.
    pub fn projectile_motion(
        &self,
        t: &[f64],
        x: &[f64],
        y: &[f64],
        dx: &[f64],
        dy: &[f64],
    ) -> Result<Figure, PlotterError> {
        let len = SeriesProcessor::check_non_empty(&[
            ("t", t),
            ("x", x),
            ("y", y),
            ("dx", dx),
            ("dy", dy),
        ])?;
        debug!(len, "projectile motion chart");

        let (t_first, t_last) = (t[0], t[len - 1]);
        let y_top = SeriesProcessor::max_finite(y).unwrap_or(0.0) + TRAJECTORY_HEADROOM;

        let trajectory = Panel::new("x [m]", "y [m]")
            .with_title("Projectile motion")
            .with_x_limits(0.0, x[len - 1])
            .with_y_limits(0.0, y_top)
            .with_zero_line(1.0)
            .with_curve(Curve::new(x, y, CurveStyle::solid(Rgb::GREEN, 2.0)));

        let position = Panel::new("t [s]", "Position [meters]")
            .with_x_limits(t_first, t_last)
            .with_zero_line(1.0)
            .with_curve(Curve::new(t, x, CurveStyle::solid(Rgb::BLUE, 2.0)).with_label("x(t)"))
            .with_curve(Curve::new(t, y, CurveStyle::solid(Rgb::RED, 2.0)).with_label("y(t)"))
            .with_legend(LegendPosition::UpperRight);

        let velocity = Panel::new("t [s]", "Velocity [m/s]")
            .with_x_limits(t_first, t_last)
            .with_zero_line(1.0)
            .with_curve(Curve::new(t, dx, CurveStyle::solid(Rgb::BLUE, 2.0)).with_label("dx/dt"))
            .with_curve(Curve::new(t, dy, CurveStyle::solid(Rgb::RED, 2.0)).with_label("dy/dt"))
            .with_legend(LegendPosition::UpperRight);

        Ok(self
            .figure((8.0, 8.0), (3, 1))
            .with_panel(trajectory)
            .with_panel(position)
            .with_panel(velocity))
    }

    /// Position and velocity of a falling body side by side.
    pub fn free_fall(&self, t: &[f64], x: &[f64], dx: &[f64]) -> Result<Figure, PlotterError> {
        let len = SeriesProcessor::check_non_empty(&[("t", t), ("x", x), ("dx", dx)])?;
        debug!(len, "free fall chart");

        let (t_first, t_last) = (t[0], t[len - 1]);

        let position = Panel::new("t [s]", "x(t) [m]")
            .with_title(format!("{FREE_FALL_TITLE}\nPosition"))
            .with_x_limits(t_first, t_last)
            .with_zero_line(1.0)
            .with_curve(Curve::new(t, x, CurveStyle::solid(Rgb::BLUE, 2.0)));

        let velocity = Panel::new("t [s]", "v(t) [m/s]")
            .with_title(format!("{FREE_FALL_TITLE}\nVelocity"))
            .with_x_limits(t_first, t_last)
            .with_zero_line(1.0)
            .with_curve(Curve::new(t, dx, CurveStyle::solid(Rgb::RED, 1.5)));

        Ok(self
            .figure((8.0, 4.0), (1, 2))
            .with_panel(position)
            .with_panel(velocity))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::charts::figure::AxisScale;

    fn samples(n: usize) -> Vec<f64> {
        (0..n).map(|i| i as f64 * 0.1).collect()
    }

    #[test]
    fn velocity_chart_has_error_panel_on_log_axis() {
        let t = samples(5);
        let exact: Vec<f64> = t.iter().map(|t| 9.81 * t).collect();
        let num: Vec<f64> = exact.iter().map(|v| v + 1e-6).collect();

        let figure = ChartPlotter::default()
            .velocity_vs_time(&t, &exact, &num, ErrorMode::Absolute)
            .unwrap();

        assert_eq!(figure.panel_count(), 2);
        let errors = &figure.panels[1];
        assert_eq!(errors.y_scale, AxisScale::Log);
        assert_eq!(errors.y_range(), ERROR_AXIS_RANGE);
        assert!(errors.title.as_deref().unwrap().starts_with("Abs. error"));
        assert_eq!(figure.panels[0].curves.len(), 2);
    }

    #[test]
    fn numerical_curve_is_drawn_above_exact() {
        let t = samples(3);
        let figure = ChartPlotter::default()
            .velocity_vs_time(&t, &t, &t, ErrorMode::Relative)
            .unwrap();
        let top = figure.panels[0].curves_by_z_order().pop().unwrap();
        assert_eq!(top.label.as_deref(), Some("Numerical"));
    }

    #[test]
    fn second_order_uses_first_and_last_x() {
        let x = [-1.0, 0.0, 2.0];
        let figure = ChartPlotter::default()
            .second_order_ode(&x, &[1.0, 0.0, -1.0], &[0.0, 1.0, 0.0])
            .unwrap();
        assert_eq!(figure.panel_count(), 1);
        assert_eq!(figure.panels[0].x_range(), (-1.0, 2.0));
        assert_eq!(figure.panels[0].legend, Some(LegendPosition::UpperLeft));
    }

    #[test]
    fn projectile_trajectory_leaves_headroom() {
        let t = samples(4);
        let x = [0.0, 1.0, 2.0, 3.0];
        let y = [0.0, 1.5, 2.0, 1.0];
        let figure = ChartPlotter::default()
            .projectile_motion(&t, &x, &y, &[1.0; 4], &[1.0; 4])
            .unwrap();
        assert_eq!(figure.panel_count(), 3);
        assert_eq!((figure.rows, figure.cols), (3, 1));
        assert_eq!(figure.panels[0].y_range(), (0.0, 2.5));
        assert_eq!(figure.panels[0].x_range(), (0.0, 3.0));
    }

    #[test]
    fn free_fall_titles_span_two_lines() {
        let t = samples(3);
        let figure = ChartPlotter::default().free_fall(&t, &t, &t).unwrap();
        assert_eq!(figure.panel_count(), 2);
        for panel in &figure.panels {
            assert_eq!(panel.title.as_deref().unwrap().lines().count(), 2);
        }
    }

    #[test]
    fn figures_carry_the_plotter_style() {
        let plotter = ChartPlotter::new(StyleConfig::presentation());
        assert_eq!(plotter.style().font_size, crate::charts::style::PRESENTATION_FONT_SIZE);

        let t = samples(3);
        let figure = plotter.free_fall(&t, &t, &t).unwrap();
        assert_eq!(&figure.style, plotter.style());
    }

    #[test]
    fn nan_time_endpoints_give_finite_axes() {
        let x = [0.0, 1.0, 2.0];
        let figure = ChartPlotter::default()
            .free_fall(&[f64::NAN, 1.0, 2.0], &x, &x)
            .unwrap();
        for panel in &figure.panels {
            let (lo, hi) = panel.x_range();
            assert!(lo.is_finite() && hi.is_finite() && lo < hi);
        }
    }

    #[test]
    fn mismatched_series_are_rejected() {
        let err = ChartPlotter::default()
            .free_fall(&[0.0, 1.0], &[0.0], &[0.0, 1.0])
            .unwrap_err();
        assert!(matches!(
            err,
            PlotterError::Series(SeriesError::LengthMismatch { ref name, .. }) if name == "x"
        ));
    }

    #[test]
    fn empty_series_are_rejected() {
        let err = ChartPlotter::default()
            .second_order_ode(&[], &[], &[])
            .unwrap_err();
        assert!(matches!(err, PlotterError::Series(SeriesError::Empty { .. })));
    }
}
