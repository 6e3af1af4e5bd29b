//! ode_charts - Charts for ODE solutions
//!
//! Builds and renders figures for free fall, projectile motion and
//! second-order differential equations, with error curves comparing
//! numerical and exact solutions.
//!
//! ```no_run
//! use ode_charts::{ChartPlotter, ErrorMode, StaticChartRenderer, StyleConfig};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let style = StyleConfig::setup(false, true, true, 200);
//! let plotter = ChartPlotter::new(style);
//!
//! let t: Vec<f64> = (0..50).map(|i| i as f64 * 0.1).collect();
//! let exact: Vec<f64> = t.iter().map(|t| 9.81 * t).collect();
//! let numerical: Vec<f64> = exact.iter().map(|v| v * (1.0 + 1e-9)).collect();
//!
//! let figure = plotter.velocity_vs_time(&t, &exact, &numerical, ErrorMode::Relative)?;
//! StaticChartRenderer::save(&figure, "velocity.png")?;
//! # Ok(())
//! # }
//! ```

pub mod charts;
pub mod data;
pub mod stats;

pub use charts::{
    ChartPlotter, Figure, PlotterError, RenderError, StaticChartRenderer, StyleConfig,
};
pub use data::{SeriesError, SeriesProcessor};
pub use stats::{CalculatorError, ErrorCalculator, ErrorMode};
