mod analysis;
mod common;

use std::path::Path;
use thiserror::Error;
use tracing::{info, Level};

use analysis::constants::{SAMPLE_CORRELATION, SAMPLE_SEED, SAMPLE_SIZE};
use analysis::{generate_exp_model_plots, generate_hiring_plots, TOTAL_FIGURE_COUNT};
use common::{BitmapRenderer, FigureReporter, PlotError, SampleError, SampleSet};
use rand::rngs::StdRng;
use rand::SeedableRng;

/// Errors that can occur while generating the figures
#[derive(Error, Debug)]
pub enum AnalysisError {
    #[error("Sample generation error: {0}")]
    Sample(#[from] SampleError),

    #[error("Hiring figure error: {0}")]
    Plot(#[from] PlotError),

    #[error("Exponential model figure error: {0}")]
    ExpModel(#[from] analysis::exp_model::ExpModelError),
}

type Result<T> = core::result::Result<T, AnalysisError>;

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .compact()
        .with_max_level(Level::INFO)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();

    // Seeded so every run writes the same figures
    let mut rng = StdRng::seed_from_u64(SAMPLE_SEED);
    let sample = SampleSet::generate(&mut rng, SAMPLE_SIZE, SAMPLE_CORRELATION)?;
    info!(points = sample.len(), correlation = SAMPLE_CORRELATION, "Generated sample");

    let renderer = BitmapRenderer::default();
    let reporter = FigureReporter::new(TOTAL_FIGURE_COUNT, sample.len());
    let output_dir = Path::new(".");

    let hiring = generate_hiring_plots(&sample, &renderer, &reporter, output_dir)?;
    let exp_model = generate_exp_model_plots(&sample, &renderer, &reporter, output_dir)?;

    reporter.finish();
    info!(figures = hiring.len() + exp_model.len(), "Finished");
    Ok(())
}
