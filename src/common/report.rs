//! Console feedback while figures are generated
//!
//! Tracks progress with an [`indicatif`] bar and prints each figure's bucket summary table
//! above it once the figure has been saved.

use super::buckets::{format_summary_table, PartitionReport};
use super::scaffold::Figure;
use indicatif::{ProgressBar, ProgressStyle};
use tracing::{debug, warn};

/// Reports saved figures and partition problems
pub struct FigureReporter {
    progress: ProgressBar,
    sample_size: usize,
}

impl FigureReporter {
    /// Creates a reporter with a visible progress bar over `total_figures`
    pub fn new(total_figures: u64, sample_size: usize) -> Self {
        let progress = ProgressBar::new(total_figures);
        progress.set_style(
            ProgressStyle::with_template("{spinner} [{bar:40}] {pos}/{len} {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_bar())
                .progress_chars("=> "),
        );

        Self {
            progress,
            sample_size,
        }
    }

    /// Creates a reporter that draws nothing
    #[cfg(test)]
    pub fn hidden(sample_size: usize) -> Self {
        Self {
            progress: ProgressBar::hidden(),
            sample_size,
        }
    }

    /// Prints the bucket summary of a saved figure and advances the bar
    ///
    /// # Returns
    /// The printed summary table
    pub fn record(&self, figure: &Figure) -> String {
        let name = figure.path.display().to_string();
        let table = format_summary_table(&name, &figure.bucket_summaries(self.sample_size));

        self.progress.println(&table);
        self.progress.set_message(name);
        self.progress.inc(1);
        table
    }

    /// Logs a warning when the buckets of `figure_name` do not partition the sample
    pub fn check_partition(&self, figure_name: &str, report: PartitionReport) {
        if report.is_partition() {
            debug!(figure = figure_name, points = report.total, "Buckets partition the sample");
            return;
        }

        warn!(
            figure = figure_name,
            unmatched = report.unmatched,
            overlapping = report.overlapping,
            "Buckets do not partition the sample"
        );
    }

    pub fn finish(&self) {
        self.progress.finish_with_message("All figures saved");
    }
}
