//! Figure scaffold: scoped collection of buckets and annotations for one output file
//!
//! A [`FigureScope`] is opened for an output path, receives buckets through
//! [`FigureScope::scatter`], and is finalized exactly once: either explicitly through
//! [`FigureScope::finish`] or, on any early exit, when it is dropped. Finalizing hands the
//! collected [`Figure`] to a [`FigureRenderer`], which lays out the panels, draws the legend
//! and writes the file.

use super::buckets::{Bucket, BucketSummary};
use super::plots::PlotError;
use super::sample::SampleSet;
use super::style::Rgb;
use crate::analysis::constants::{DEFAULT_X_LABEL, DEFAULT_Y_LABEL};
use std::path::{Path, PathBuf};
use tracing::{debug, error};

type Result<T> = core::result::Result<T, PlotError>;

/// One legend entry registered while a figure scope was open
#[derive(Debug, Clone, PartialEq)]
pub struct LegendEntry {
    pub label: String,
    pub color: Rgb,
}

/// Arrow from the origin along a vector, with a text label at the vector's tip
#[derive(Debug, Clone, PartialEq)]
pub struct VectorAnnotation {
    pub dx: f64,
    pub dy: f64,
    pub label: String,
    pub color: Rgb,
}

/// Everything a renderer needs to draw one output file
#[derive(Debug, Clone, Default)]
pub struct Figure {
    pub path: PathBuf,
    pub x_label: String,
    pub y_label: String,
    /// Multi-line title drawn in the top left corner
    pub title: Vec<String>,
    pub buckets: Vec<Bucket>,
    pub annotations: Vec<VectorAnnotation>,
}

impl Figure {
    /// Creates a figure with the default axis descriptions
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self::with_labels(path, DEFAULT_X_LABEL, DEFAULT_Y_LABEL)
    }

    pub fn with_labels(path: impl Into<PathBuf>, x_label: &str, y_label: &str) -> Self {
        Self {
            path: path.into(),
            x_label: x_label.to_string(),
            y_label: y_label.to_string(),
            title: Vec::new(),
            buckets: Vec::new(),
            annotations: Vec::new(),
        }
    }

    /// Legend entries in registration order, one per bucket
    pub fn legend_entries(&self) -> Vec<LegendEntry> {
        self.buckets
            .iter()
            .map(|bucket| LegendEntry {
                label: bucket.label.clone(),
                color: bucket.color,
            })
            .collect()
    }

    /// Summary rows for the console table, relative to `sample_size`
    pub fn bucket_summaries(&self, sample_size: usize) -> Vec<BucketSummary> {
        self.buckets
            .iter()
            .map(|bucket| BucketSummary::of(bucket, sample_size))
            .collect()
    }
}

/// Turns a finished [`Figure`] into an output file
pub trait FigureRenderer {
    fn render(&self, figure: &Figure) -> Result<()>;
}

/// An open figure: collects buckets until it is finished or dropped
pub struct FigureScope<'a, R: FigureRenderer> {
    sample: &'a SampleSet,
    renderer: &'a R,
    figure: Figure,
    /// Set once the figure has been handed to the renderer
    finished: bool,
}

impl<'a, R: FigureRenderer> FigureScope<'a, R> {
    /// Opens a scope drawing from `sample` into `figure`
    pub fn open(sample: &'a SampleSet, renderer: &'a R, figure: Figure) -> Self {
        debug!(path = %figure.path.display(), "Opening figure");
        Self {
            sample,
            renderer,
            figure,
            finished: false,
        }
    }

    /// Registers a bucket: a legend entry plus the points accepted by `predicate`
    ///
    /// A predicate matching nothing yields an empty scatter and all-zero histograms.
    pub fn scatter<F>(&mut self, predicate: F, color: Rgb, label: &str) -> &Bucket
    where
        F: Fn(f64, f64) -> bool,
    {
        let buckets = &mut self.figure.buckets;
        buckets.push(Bucket::select(self.sample, predicate, color, label));
        &buckets[buckets.len() - 1]
    }

    /// Draws an arrow from the origin along `(dx, dy)` labelled at its tip
    pub fn annotate_vector(&mut self, dx: f64, dy: f64, color: Rgb, label: &str) {
        self.figure.annotations.push(VectorAnnotation {
            dx,
            dy,
            label: label.to_string(),
            color,
        });
    }

    /// Sets the title drawn in the top left corner, one entry per line
    pub fn set_title(&mut self, lines: Vec<String>) {
        self.figure.title = lines;
    }

    /// Renders and saves the figure, returning what was drawn
    pub fn finish(mut self) -> Result<Figure> {
        self.finished = true;
        let figure = std::mem::take(&mut self.figure);
        self.renderer.render(&figure)?;
        Ok(figure)
    }
}

impl<R: FigureRenderer> Drop for FigureScope<'_, R> {
    fn drop(&mut self) {
        // Only renders when the scope was not finished, e.g. unwinding from a panic.
        if self.finished {
            return;
        }

        self.finished = true;
        if let Err(e) = self.renderer.render(&self.figure) {
            error!(path = %self.figure.path.display(), "Failed to save figure: {}", e);
        }
    }
}

/// Opens a figure, runs `body` on it, then renders and saves it
///
/// The figure is saved even when `body` fails; the body's error takes precedence over a
/// failure to save.
///
/// # Arguments
/// * `sample` - Shared sample set the buckets are selected from
/// * `renderer` - Renderer that writes the output file
/// * `figure` - Output path, axis descriptions and any pre-set content
/// * `body` - Registers buckets and annotations
///
/// # Returns
/// * `Ok(Figure)` - The figure that was written
/// * `Err(PlotError)` - The body's error, or the error raised while saving
pub fn with_figure<R, F>(sample: &SampleSet, renderer: &R, figure: Figure, body: F) -> Result<Figure>
where
    R: FigureRenderer,
    F: FnOnce(&mut FigureScope<'_, R>) -> Result<()>,
{
    let mut scope = FigureScope::open(sample, renderer, figure);
    let body_result = body(&mut scope);
    let saved = scope.finish();
    body_result?;
    saved
}

/// Output path for `file_name` inside `output_dir`
pub fn output_path(output_dir: &Path, file_name: &str) -> PathBuf {
    output_dir.join(file_name)
}
