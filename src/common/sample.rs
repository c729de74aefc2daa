//! Synthetic bivariate-normal sample set shared by every figure

use rand::Rng;
use rand_distr::StandardNormal;
use thiserror::Error;

/// Errors that can occur while generating a sample set
#[derive(Error, Debug, PartialEq)]
pub enum SampleError {
    #[error("Correlation {0} is outside the valid range -1..=1")]
    InvalidCorrelation(f64),

    #[error("Sample size must be greater than zero")]
    EmptySample,
}

type Result<T> = core::result::Result<T, SampleError>;

/// A single (x, y) observation
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

/// Immutable, ordered set of points drawn once and read by every figure
#[derive(Debug, Clone)]
pub struct SampleSet {
    points: Vec<Point>,
}

impl SampleSet {
    /// Draws `size` points from a standard bivariate normal with the given correlation
    ///
    /// Both marginals have zero mean and unit variance. The second coordinate is built from
    /// the Cholesky factor of the covariance matrix: `y = ρ·z1 + sqrt(1 - ρ²)·z2`.
    /// A correlation of `0.0` yields independent coordinates.
    ///
    /// # Arguments
    /// * `rng` - Source of randomness; seed it for reproducible figures
    /// * `size` - Number of points to draw
    /// * `correlation` - Pearson correlation between x and y, in `-1.0..=1.0`
    pub fn generate<R: Rng + ?Sized>(rng: &mut R, size: usize, correlation: f64) -> Result<Self> {
        if !(-1.0..=1.0).contains(&correlation) {
            return Err(SampleError::InvalidCorrelation(correlation));
        }

        if size == 0 {
            return Err(SampleError::EmptySample);
        }

        let residual = (1.0 - correlation * correlation).sqrt();
        let points = (0..size)
            .map(|_| {
                let z1: f64 = rng.sample(StandardNormal);
                let z2: f64 = rng.sample(StandardNormal);
                Point {
                    x: z1,
                    y: correlation * z1 + residual * z2,
                }
            })
            .collect();

        Ok(Self { points })
    }

    /// Wraps an existing list of points
    #[cfg(test)]
    pub fn from_points(points: Vec<Point>) -> Self {
        Self { points }
    }

    pub fn points(&self) -> &[Point] {
        &self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Collects the points accepted by `predicate`, preserving sample order
    pub fn filter<F>(&self, predicate: F) -> Vec<Point>
    where
        F: Fn(f64, f64) -> bool,
    {
        self.points
            .iter()
            .filter(|point| predicate(point.x, point.y))
            .copied()
            .collect()
    }
}
