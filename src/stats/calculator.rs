//! Error Calculator Module
//! Compares exact and numerical solutions sample by sample.

use crate::data::{SeriesError, SeriesProcessor};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;
use tracing::trace;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum CalculatorError {
    #[error("unknown error mode `{0}`, expected `Rel.` or `Abs.`")]
    InvalidErrorMode(String),
    #[error(transparent)]
    Series(#[from] SeriesError),
}

/// Error formula applied pairwise to an exact and a numerical series.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ErrorMode {
    /// `2|e - o| / (|e| + |o|)`, bounded in [0, 2]
    Relative,
    /// `|e - o|`
    Absolute,
}

impl Default for ErrorMode {
    fn default() -> Self {
        ErrorMode::Relative
    }
}

impl ErrorMode {
    /// Short label used in chart titles.
    pub fn label(self) -> &'static str {
        match self {
            ErrorMode::Relative => "Rel.",
            ErrorMode::Absolute => "Abs.",
        }
    }

    /// Error between one pair of samples.
    pub fn apply(self, expected: f64, observed: f64) -> f64 {
        let diff = (expected - observed).abs();
        match self {
            ErrorMode::Absolute => diff,
            ErrorMode::Relative => {
                let scale = expected.abs() + observed.abs();
                // 0/0: both samples are exactly zero and therefore agree.
                if scale == 0.0 {
                    0.0
                } else {
                    2.0 * diff / scale
                }
            }
        }
    }
}

impl fmt::Display for ErrorMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for ErrorMode {
    type Err = CalculatorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "rel." | "rel" | "relative" => Ok(ErrorMode::Relative),
            "abs." | "abs" | "absolute" => Ok(ErrorMode::Absolute),
            _ => Err(CalculatorError::InvalidErrorMode(s.to_string())),
        }
    }
}

/// Computes error curves between exact and numerical solutions.
pub struct ErrorCalculator;

impl ErrorCalculator {
    /// Pairwise error between `expected` and `observed`.
    pub fn compute_error(
        expected: &[f64],
        observed: &[f64],
        mode: ErrorMode,
    ) -> Result<Vec<f64>, CalculatorError> {
        let len = SeriesProcessor::check_lengths(&[("expected", expected), ("observed", observed)])?;
        trace!(len, mode = mode.label(), "compute error");

        Ok(expected
            .iter()
            .zip(observed)
            .map(|(&e, &o)| mode.apply(e, o))
            .collect())
    }

    /// Same as [`compute_error`](Self::compute_error) with the mode given as text.
    pub fn compute_error_by_name(
        expected: &[f64],
        observed: &[f64],
        mode: &str,
    ) -> Result<Vec<f64>, CalculatorError> {
        let mode: ErrorMode = mode.parse()?;
        Self::compute_error(expected, observed, mode)
    }

    pub fn relative_error(expected: &[f64], observed: &[f64]) -> Result<Vec<f64>, CalculatorError> {
        Self::compute_error(expected, observed, ErrorMode::Relative)
    }

    pub fn absolute_error(expected: &[f64], observed: &[f64]) -> Result<Vec<f64>, CalculatorError> {
        Self::compute_error(expected, observed, ErrorMode::Absolute)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn absolute_error_example() {
        let err = ErrorCalculator::absolute_error(&[10.0, 0.0], &[8.0, 0.0]).unwrap();
        assert_eq!(err, vec![2.0, 0.0]);
    }

    #[test]
    fn relative_error_example() {
        let err = ErrorCalculator::relative_error(&[10.0], &[8.0]).unwrap();
        assert_relative_eq!(err[0], 2.0 * 2.0 / 18.0);
    }

    #[test]
    fn relative_error_of_two_zeros_is_zero() {
        let err = ErrorCalculator::relative_error(&[0.0, -0.0], &[0.0, 0.0]).unwrap();
        assert_eq!(err, vec![0.0, 0.0]);
    }

    #[test]
    fn nan_propagates() {
        let err = ErrorCalculator::relative_error(&[f64::NAN], &[1.0]).unwrap();
        assert!(err[0].is_nan());
    }

    #[test]
    fn invalid_mode_name_is_rejected() {
        let err = ErrorCalculator::compute_error_by_name(&[1.0], &[1.0], "Invalid").unwrap_err();
        assert_eq!(err, CalculatorError::InvalidErrorMode("Invalid".into()));
    }

    #[test]
    fn mode_names_parse() {
        assert_eq!("Rel.".parse::<ErrorMode>().unwrap(), ErrorMode::Relative);
        assert_eq!("Abs.".parse::<ErrorMode>().unwrap(), ErrorMode::Absolute);
        assert_eq!("absolute".parse::<ErrorMode>().unwrap(), ErrorMode::Absolute);
        assert_eq!(ErrorMode::Relative.to_string(), "Rel.");
    }

    #[test]
    fn mismatched_lengths_are_rejected() {
        let err = ErrorCalculator::absolute_error(&[1.0, 2.0], &[1.0]).unwrap_err();
        assert!(matches!(
            err,
            CalculatorError::Series(SeriesError::LengthMismatch { found: 1, .. })
        ));
    }
}
