//! Exponential match model figures
//!
//! A candidate at (x, y) is scored by how much a company wants them relative to how much the
//! whole market wants them:
//!
//! `score = ln( exp(company · p) / (1 + exp(market · p)) )`
//!
//! The sample is split into tertiles of this score, and one figure is drawn per company
//! vector with arrows for both preference vectors.

use super::constants::{BLUE, COMPANY_COLOR, COMPANY_VECTORS, MARKET_COLOR, MARKET_VECTOR, PURPLE, RED};
use super::save_figure;
use crate::common::plots::PlotError;
use crate::common::report::FigureReporter;
use crate::common::sample::SampleSet;
use crate::common::scaffold::{output_path, Figure, FigureRenderer};
use std::path::Path;
use tracing::debug;

/// Number of figures written by [`generate_exp_model_plots`]
pub const EXP_MODEL_FIGURE_COUNT: u64 = COMPANY_VECTORS.len() as u64;

pub const LEAST_MATCHING: &str = "Least matching candidates";
pub const MIDDLE_GROUP: &str = "Middle group";
pub const BEST_MATCHING: &str = "Best matching candidates";

/// Errors that can occur while generating exponential match model figures
#[derive(Debug)]
pub enum ExpModelError {
    EmptySample,
    PlotGeneration(PlotError),
}

impl std::fmt::Display for ExpModelError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ExpModelError::EmptySample => write!(f, "Cannot split an empty sample into tertiles"),
            ExpModelError::PlotGeneration(e) => write!(f, "Failed to generate plot: {}", e),
        }
    }
}

impl std::error::Error for ExpModelError {}

impl From<PlotError> for ExpModelError {
    fn from(err: PlotError) -> Self {
        ExpModelError::PlotGeneration(err)
    }
}

type Result<T> = core::result::Result<T, ExpModelError>;

/// Company and market preference vectors over the two abilities
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MatchModel {
    pub company: (f64, f64),
    pub market: (f64, f64),
}

impl MatchModel {
    pub fn new(company: (f64, f64), market: (f64, f64)) -> Self {
        Self { company, market }
    }

    /// Log of the company's interest over one plus the market's interest
    ///
    /// Computed as `company · p - ln(1 + exp(market · p))` so large inputs do not overflow.
    pub fn score(&self, x: f64, y: f64) -> f64 {
        let company = self.company.0 * x + self.company.1 * y;
        let market = self.market.0 * x + self.market.1 * y;
        company - softplus(market)
    }
}

/// `ln(1 + exp(z))` without overflow for large `z`
fn softplus(z: f64) -> f64 {
    if z > 0.0 {
        z + (-z).exp().ln_1p()
    } else {
        z.exp().ln_1p()
    }
}

/// Which third of the score distribution a candidate falls into
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tier {
    Least,
    Middle,
    Best,
}

/// Score thresholds splitting a sample into three equally sized groups
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TertileSplit {
    pub model: MatchModel,
    /// Score at index `n / 3` of the sorted scores
    pub lo: f64,
    /// Score at index `2n / 3` of the sorted scores
    pub hi: f64,
}

impl TertileSplit {
    /// Sorts the scores of every sample point and picks the tertile thresholds
    pub fn fit(model: MatchModel, sample: &SampleSet) -> Result<Self> {
        if sample.is_empty() {
            return Err(ExpModelError::EmptySample);
        }

        let mut scores: Vec<f64> = sample.points().iter().map(|p| model.score(p.x, p.y)).collect();
        scores.sort_unstable_by(f64::total_cmp);

        let n = scores.len();
        Ok(Self {
            model,
            lo: scores[n / 3],
            hi: scores[n * 2 / 3],
        })
    }

    /// Least: `score < lo`, middle: `lo <= score < hi`, best: `hi <= score`
    pub fn tier(&self, x: f64, y: f64) -> Tier {
        let score = self.model.score(x, y);
        if score < self.lo {
            Tier::Least
        } else if score < self.hi {
            Tier::Middle
        } else {
            Tier::Best
        }
    }
}

/// Output file name for a company vector, e.g. `exp_model_0.75_0.75.png`
pub fn exp_model_file_name(company: (f64, f64)) -> String {
    format!("exp_model_{:.2}_{:.2}.png", company.0, company.1)
}

/// Title lines naming both preference vectors
pub fn exp_model_title(model: &MatchModel) -> Vec<String> {
    vec![
        format!("Market vector = ({:.2}, {:.2})", model.market.0, model.market.1),
        format!("Company vector = ({:.2}, {:.2})", model.company.0, model.company.1),
    ]
}

/// Generate one exponential match model figure per company vector
///
/// # Arguments
/// * `sample` - Shared sample set
/// * `renderer` - Renderer writing each figure
/// * `reporter` - Receives each saved figure for the console summary
/// * `output_dir` - Directory where the PNG files should be saved
///
/// # Returns
/// * `Ok(Vec<Figure>)` - The figures that were written, in [`COMPANY_VECTORS`] order
/// * `Err(ExpModelError)` - If the sample is empty or a figure could not be written
pub fn generate_exp_model_plots<R: FigureRenderer>(
    sample: &SampleSet,
    renderer: &R,
    reporter: &FigureReporter,
    output_dir: &Path,
) -> Result<Vec<Figure>> {
    let mut figures = Vec::with_capacity(COMPANY_VECTORS.len());

    for company in COMPANY_VECTORS {
        let model = MatchModel::new(company, MARKET_VECTOR);
        let split = TertileSplit::fit(model, sample)?;
        debug!(?company, lo = split.lo, hi = split.hi, "Fitted tertile thresholds");

        let figure = Figure::new(output_path(output_dir, &exp_model_file_name(company)));
        figures.push(save_figure(sample, renderer, reporter, figure, |fig| {
            fig.scatter(|x, y| split.tier(x, y) == Tier::Least, RED, LEAST_MATCHING);
            fig.scatter(|x, y| split.tier(x, y) == Tier::Middle, PURPLE, MIDDLE_GROUP);
            fig.scatter(|x, y| split.tier(x, y) == Tier::Best, BLUE, BEST_MATCHING);

            fig.annotate_vector(model.market.0, model.market.1, MARKET_COLOR, "Market");
            fig.annotate_vector(model.company.0, model.company.1, COMPANY_COLOR, "Company");
            fig.set_title(exp_model_title(&model));
            Ok(())
        })?);
    }

    Ok(figures)
}
