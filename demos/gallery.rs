//! Renders every chart from closed-form demo data.
//!
//! Usage: `cargo run --example gallery -- [out_dir]`

use anyhow::{Context, Result};
use ode_charts::{ChartPlotter, ErrorMode, StaticChartRenderer, StyleConfig};
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::EnvFilter;

const G: f64 = 9.81;
const DRAG: f64 = 0.5;
const STEPS: usize = 200;

fn linspace(start: f64, end: f64, n: usize) -> Vec<f64> {
    let step = (end - start) / (n - 1) as f64;
    (0..n).map(|i| start + i as f64 * step).collect()
}

/// Falling body with linear drag: exact velocity and forward Euler steps.
fn drag_velocity(t: &[f64]) -> (Vec<f64>, Vec<f64>) {
    let exact = t
        .iter()
        .map(|t| G / DRAG * (1.0 - (-DRAG * t).exp()))
        .collect();

    let mut numerical = Vec::with_capacity(t.len());
    let mut v = 0.0;
    numerical.push(v);
    for pair in t.windows(2) {
        let dt = pair[1] - pair[0];
        v += dt * (G - DRAG * v);
        numerical.push(v);
    }

    (exact, numerical)
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let out_dir = std::env::args()
        .nth(1)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("gallery"));
    std::fs::create_dir_all(&out_dir)
        .with_context(|| format!("creating {}", out_dir.display()))?;

    let plotter = ChartPlotter::new(StyleConfig::setup(false, true, true, 150));

    let t = linspace(0.0, 10.0, STEPS);
    let (v_exact, v_num) = drag_velocity(&t);
    let velocity = plotter.velocity_vs_time(&t, &v_exact, &v_num, ErrorMode::Relative)?;

    let x = linspace(0.0, 4.0 * std::f64::consts::PI, STEPS);
    let y: Vec<f64> = x.iter().map(|x| x.cos()).collect();
    let dy: Vec<f64> = x.iter().map(|x| -x.sin()).collect();
    let ode = plotter.second_order_ode(&x, &y, &dy)?;

    let (speed, angle) = (20.0_f64, 45.0_f64.to_radians());
    let (vx, vy) = (speed * angle.cos(), speed * angle.sin());
    let flight = linspace(0.0, 2.0 * vy / G, STEPS);
    let px: Vec<f64> = flight.iter().map(|t| vx * t).collect();
    let py: Vec<f64> = flight.iter().map(|t| vy * t - 0.5 * G * t * t).collect();
    let pdx = vec![vx; STEPS];
    let pdy: Vec<f64> = flight.iter().map(|t| vy - G * t).collect();
    let projectile = plotter.projectile_motion(&flight, &px, &py, &pdx, &pdy)?;

    let height = 100.0;
    let fall = linspace(0.0, (2.0 * height / G).sqrt(), STEPS);
    let fx: Vec<f64> = fall.iter().map(|t| height - 0.5 * G * t * t).collect();
    let fdx: Vec<f64> = fall.iter().map(|t| -G * t).collect();
    let free_fall = plotter.free_fall(&fall, &fx, &fdx)?;

    for (name, figure) in [
        ("velocity_vs_time.png", &velocity),
        ("second_order_ode.svg", &ode),
        ("projectile_motion.png", &projectile),
        ("free_fall.png", &free_fall),
    ] {
        let path = out_dir.join(name);
        StaticChartRenderer::save(figure, &path)
            .with_context(|| format!("rendering {}", path.display()))?;
        info!(path = %path.display(), "saved chart");
    }

    Ok(())
}
