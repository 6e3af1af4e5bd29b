use ode_charts::charts::{AxisScale, Figure, LegendPosition, Stroke};
use ode_charts::{
    CalculatorError, ChartPlotter, ErrorCalculator, ErrorMode, PlotterError, StyleConfig,
};

fn time(n: usize) -> Vec<f64> {
    (0..n).map(|i| i as f64 * 0.05).collect()
}

fn plotter() -> ChartPlotter {
    ChartPlotter::new(StyleConfig::setup(false, true, true, 100))
}

#[test]
fn every_chart_has_documented_panel_count() {
    let t = time(20);
    let x: Vec<f64> = t.iter().map(|t| t * 2.0).collect();
    let v: Vec<f64> = t.iter().map(|t| 9.81 * t).collect();
    let p = plotter();

    let counts = [
        p.velocity_vs_time(&t, &v, &v, ErrorMode::Relative).unwrap().panel_count(),
        p.second_order_ode(&t, &x, &v).unwrap().panel_count(),
        p.projectile_motion(&t, &x, &x, &v, &v).unwrap().panel_count(),
        p.free_fall(&t, &x, &v).unwrap().panel_count(),
    ];
    assert_eq!(counts, [2, 1, 3, 2]);
}

#[test]
fn documented_examples_hold() {
    let abs = ErrorCalculator::absolute_error(&[10.0, 0.0], &[8.0, 0.0]).unwrap();
    assert_eq!(abs, vec![2.0, 0.0]);

    let rel = ErrorCalculator::relative_error(&[10.0], &[8.0]).unwrap();
    assert!((rel[0] - 0.2222222222222222).abs() < 1e-15);
}

#[test]
fn invalid_mode_name_fails() {
    let err = ErrorCalculator::compute_error_by_name(&[1.0], &[2.0], "Invalid").unwrap_err();
    assert!(matches!(err, CalculatorError::InvalidErrorMode(_)));
}

#[test]
fn second_style_setup_wins() {
    let first = StyleConfig::setup(true, true, true, 300);
    let second = StyleConfig::setup(false, true, true, 300);
    assert_eq!(first.font_size, 11.0);
    assert_eq!(second.font_size, 9.0);

    let figure = ChartPlotter::new(second.clone())
        .free_fall(&time(3), &time(3), &time(3))
        .unwrap();
    assert_eq!(figure.style, second);
}

#[test]
fn velocity_chart_uses_style_presets() {
    let t = time(10);
    let figure = plotter()
        .velocity_vs_time(&t, &t, &t, ErrorMode::Absolute)
        .unwrap();

    let panel = &figure.panels[0];
    let numerical = panel.curves.iter().find(|c| c.label.as_deref() == Some("Numerical")).unwrap();
    assert!(matches!(numerical.style.stroke, Stroke::Dotted { .. }));
    assert!(panel.shows_legend());
    assert_eq!(figure.panels[1].y_scale, AxisScale::Log);
}

#[test]
fn velocity_chart_rejects_unequal_lengths() {
    let err = plotter()
        .velocity_vs_time(&time(4), &time(4), &time(3), ErrorMode::Relative)
        .unwrap_err();
    assert!(matches!(err, PlotterError::Series(_)));
}

#[test]
fn figure_json_round_trips() {
    let t = time(5);
    let figure = plotter().second_order_ode(&t, &t, &t).unwrap();
    let json = figure.to_json().unwrap();
    let restored = Figure::from_json(&json).unwrap();
    assert_eq!(restored.panel_count(), figure.panel_count());
    assert_eq!(restored.panels[0].title, figure.panels[0].title);
    assert_eq!(restored.panels[0].curves.len(), 2);
    assert_eq!(restored.panels[0].legend, Some(LegendPosition::UpperLeft));
    assert_eq!(restored.style.font_size, figure.style.font_size);
}

#[test]
fn auto_ranges_cover_data_and_zero_line() {
    let t = time(10);
    let v: Vec<f64> = t.iter().map(|t| 3.0 + t).collect();
    let figure = plotter().free_fall(&t, &v, &v).unwrap();

    let (lo, hi) = figure.panels[0].y_range();
    assert!(lo <= 0.0);
    assert!(hi >= v[9]);
}

#[test]
fn pixel_size_is_inches_times_resolution() {
    let figure = plotter().projectile_motion(&time(2), &time(2), &time(2), &time(2), &time(2)).unwrap();
    assert_eq!(figure.pixel_size(), (800, 800));
}
