//! Stats module - error curves between exact and numerical solutions

mod calculator;

pub use calculator::{CalculatorError, ErrorCalculator, ErrorMode};
