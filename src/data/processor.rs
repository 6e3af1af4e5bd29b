//! Data Processor Module
//! Handles sample-series checks and cleaning before anything is drawn.

use thiserror::Error;

/// Fraction of the data span added on each side of an automatic axis range.
pub const AUTO_MARGIN: f64 = 0.05;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum SeriesError {
    #[error("series `{name}` has {found} samples, expected {expected}")]
    LengthMismatch {
        name: String,
        expected: usize,
        found: usize,
    },
    #[error("series `{name}` is empty")]
    Empty { name: String },
}

/// Handles sample-series validation and range computation.
pub struct SeriesProcessor;

impl SeriesProcessor {
    /// Check that all named series share the length of the first one.
    ///
    /// Returns the common length.
    pub fn check_lengths(series: &[(&str, &[f64])]) -> Result<usize, SeriesError> {
        let Some((_, first)) = series.first() else {
            return Ok(0);
        };
        let expected = first.len();

        for (name, values) in series {
            if values.len() != expected {
                return Err(SeriesError::LengthMismatch {
                    name: (*name).to_string(),
                    expected,
                    found: values.len(),
                });
            }
        }

        Ok(expected)
    }

    /// Like [`check_lengths`](Self::check_lengths), but an empty common length is an error.
    pub fn check_non_empty(series: &[(&str, &[f64])]) -> Result<usize, SeriesError> {
        let len = Self::check_lengths(series)?;
        if len == 0 {
            let name = series.first().map(|(n, _)| *n).unwrap_or("series");
            return Err(SeriesError::Empty {
                name: name.to_string(),
            });
        }
        Ok(len)
    }

    /// Pair two equal-length series into plot points.
    pub fn zip_points(xs: &[f64], ys: &[f64]) -> Vec<(f64, f64)> {
        xs.iter().copied().zip(ys.iter().copied()).collect()
    }

    /// Split points into contiguous runs whose samples all satisfy `keep`.
    ///
    /// A rejected sample ends the current run, so lines are not drawn across gaps.
    pub fn runs_where<F>(points: &[(f64, f64)], keep: F) -> Vec<Vec<(f64, f64)>>
    where
        F: Fn(&(f64, f64)) -> bool,
    {
        let mut runs = Vec::new();
        let mut current: Vec<(f64, f64)> = Vec::new();

        for point in points {
            if keep(point) {
                current.push(*point);
            } else if !current.is_empty() {
                runs.push(std::mem::take(&mut current));
            }
        }
        if !current.is_empty() {
            runs.push(current);
        }

        runs
    }

    /// Runs of points with both coordinates finite.
    pub fn finite_runs(points: &[(f64, f64)]) -> Vec<Vec<(f64, f64)>> {
        Self::runs_where(points, |(x, y)| x.is_finite() && y.is_finite())
    }

    /// Runs of points usable on a logarithmic y axis.
    pub fn positive_runs(points: &[(f64, f64)]) -> Vec<Vec<(f64, f64)>> {
        Self::runs_where(points, |(x, y)| x.is_finite() && y.is_finite() && *y > 0.0)
    }

    /// Minimum and maximum of the finite values, ignoring NaN and infinities.
    pub fn finite_bounds<I>(values: I) -> Option<(f64, f64)>
    where
        I: IntoIterator<Item = f64>,
    {
        let mut min = f64::INFINITY;
        let mut max = f64::NEG_INFINITY;
        for v in values {
            if v.is_finite() {
                min = min.min(v);
                max = max.max(v);
            }
        }
        if min > max {
            None
        } else {
            Some((min, max))
        }
    }

    /// Maximum finite value of a series.
    pub fn max_finite(values: &[f64]) -> Option<f64> {
        Self::finite_bounds(values.iter().copied()).map(|(_, max)| max)
    }

    /// Pad a linear range by `margin` of its span on each side.
    ///
    /// A zero-width range is widened so the axis still has extent.
    pub fn padded_range(min: f64, max: f64, margin: f64) -> (f64, f64) {
        let (lo, hi) = Self::widen_degenerate(min, max);
        let pad = (hi - lo) * margin;
        (lo - pad, hi + pad)
    }

    /// Widen a zero-width range; other ranges are returned untouched.
    ///
    /// A range with a non-finite end becomes `(0, 1)`.
    pub fn widen_degenerate(min: f64, max: f64) -> (f64, f64) {
        if !min.is_finite() || !max.is_finite() {
            return (0.0, 1.0);
        }
        if (max - min).abs() > f64::EPSILON * max.abs().max(min.abs()).max(1.0) {
            return (min, max);
        }
        let half = if min == 0.0 { 0.5 } else { min.abs() * 0.05 };
        (min - half, max + half)
    }

    /// Expand a positive range outward to whole decades.
    pub fn decade_range(min: f64, max: f64) -> (f64, f64) {
        let lo = 10f64.powf(min.log10().floor());
        let mut hi = 10f64.powf(max.log10().ceil());
        if hi <= lo {
            hi = lo * 10.0;
        }
        (lo, hi)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn check_lengths_reports_offending_series() {
        let t = [0.0, 1.0, 2.0];
        let x = [1.0, 2.0];
        let err = SeriesProcessor::check_lengths(&[("t", &t), ("x", &x)]).unwrap_err();
        assert_eq!(
            err,
            SeriesError::LengthMismatch {
                name: "x".into(),
                expected: 3,
                found: 2,
            }
        );
    }

    #[test]
    fn check_non_empty_rejects_empty_input() {
        let t: [f64; 0] = [];
        let err = SeriesProcessor::check_non_empty(&[("t", &t), ("x", &t)]).unwrap_err();
        assert_eq!(err, SeriesError::Empty { name: "t".into() });
    }

    #[test]
    fn runs_break_on_rejected_samples() {
        let points = [(0.0, 1.0), (1.0, f64::NAN), (2.0, 3.0), (3.0, 4.0)];
        let runs = SeriesProcessor::finite_runs(&points);
        assert_eq!(runs, vec![vec![(0.0, 1.0)], vec![(2.0, 3.0), (3.0, 4.0)]]);

        let runs = SeriesProcessor::positive_runs(&[(0.0, 1e-3), (1.0, 0.0), (2.0, 1e-5)]);
        assert_eq!(runs.len(), 2);
    }

    #[test]
    fn bounds_ignore_non_finite_values() {
        let bounds = SeriesProcessor::finite_bounds([3.0, f64::NAN, -1.0, f64::INFINITY]);
        assert_eq!(bounds, Some((-1.0, 3.0)));
        assert_eq!(SeriesProcessor::finite_bounds([f64::NAN]), None);
    }

    #[test]
    fn degenerate_ranges_are_widened() {
        assert_eq!(SeriesProcessor::padded_range(0.0, 0.0, 0.0), (-0.5, 0.5));
        let (lo, hi) = SeriesProcessor::padded_range(0.0, 10.0, AUTO_MARGIN);
        assert!((lo + 0.5).abs() < 1e-12 && (hi - 10.5).abs() < 1e-12);
    }

    #[test]
    fn non_finite_ranges_become_unit_range() {
        assert_eq!(SeriesProcessor::widen_degenerate(f64::NAN, 2.0), (0.0, 1.0));
        assert_eq!(SeriesProcessor::widen_degenerate(0.0, f64::NAN), (0.0, 1.0));
        assert_eq!(SeriesProcessor::widen_degenerate(f64::NEG_INFINITY, 1.0), (0.0, 1.0));
    }

    #[test]
    fn decade_range_snaps_outward() {
        let (lo, hi) = SeriesProcessor::decade_range(3e-7, 0.02);
        assert!((lo - 1e-7).abs() < 1e-20);
        assert!((hi - 0.1).abs() < 1e-12);
    }
}
