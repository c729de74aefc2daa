//! Common infrastructure shared by every figure set
//!
//! This module provides reusable infrastructure for:
//! - Sample generation and fixed-width histograms
//! - Buckets, partition checks and ASCII summary tables
//! - The figure scaffold and the bitmap renderer behind it
//! - Progress and console reporting

pub mod buckets;
pub mod histogram;
pub mod plots;
pub mod report;
pub mod sample;
pub mod scaffold;
pub mod style;

// Re-export commonly used items
pub use plots::{BitmapRenderer, PlotError};
pub use report::FigureReporter;
pub use sample::{SampleError, SampleSet};
