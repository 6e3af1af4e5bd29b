//! Data module - sample series validation and cleaning

mod processor;

pub use processor::{SeriesError, SeriesProcessor, AUTO_MARGIN};
