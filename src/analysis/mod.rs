//! Figure sets built on the shared sample
//!
//! This module contains the figure definitions for:
//! - Hiring funnel thresholds
//! - The exponential match model between a company and the market

pub mod constants;
pub mod exp_model;
pub mod hiring;

use crate::common::plots::PlotError;
use crate::common::report::FigureReporter;
use crate::common::sample::SampleSet;
use crate::common::scaffold::{with_figure, Figure, FigureRenderer, FigureScope};

// Re-export analysis functions for convenience
pub use exp_model::generate_exp_model_plots;
pub use hiring::generate_hiring_plots;

/// Total number of figures written by every figure set
pub const TOTAL_FIGURE_COUNT: u64 = hiring::HIRING_FIGURE_COUNT + exp_model::EXP_MODEL_FIGURE_COUNT;

/// Draws one figure through [`with_figure`] and reports it once saved
fn save_figure<R, F>(
    sample: &SampleSet,
    renderer: &R,
    reporter: &FigureReporter,
    figure: Figure,
    body: F,
) -> Result<Figure, PlotError>
where
    R: FigureRenderer,
    F: FnOnce(&mut FigureScope<'_, R>) -> Result<(), PlotError>,
{
    let figure = with_figure(sample, renderer, figure, body)?;
    reporter.record(&figure);
    Ok(figure)
}
