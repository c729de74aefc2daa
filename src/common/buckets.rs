//! Buckets of the sample set and their console summaries
//!
//! This module provides:
//! - [`Bucket`], a labelled, colored subset of the sample selected by a predicate
//! - [`PartitionReport`], an optional check that a set of predicates partitions the sample
//! - [`BucketSummary`] rows and their [`tabled`] console table

use super::histogram::Histogram;
use super::sample::{Point, SampleSet};
use super::style::Rgb;
use tabled::settings::Style;
use tabled::{Table, Tabled};

/// A labelled subset of the sample set, as drawn into one figure
#[derive(Debug, Clone)]
pub struct Bucket {
    /// Legend label
    pub label: String,
    /// Color of the scatter points and histogram bars
    pub color: Rgb,
    /// Points accepted by the bucket's predicate, in sample order
    pub points: Vec<Point>,
}

impl Bucket {
    /// Selects the points of `sample` accepted by `predicate`
    pub fn select<F>(sample: &SampleSet, predicate: F, color: Rgb, label: impl Into<String>) -> Self
    where
        F: Fn(f64, f64) -> bool,
    {
        Self {
            label: label.into(),
            color,
            points: sample.filter(predicate),
        }
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Histogram of the x coordinates over `[min, max]`
    pub fn x_histogram(&self, min: f64, max: f64, bin_width: f64) -> Histogram {
        Histogram::from_values(self.points.iter().map(|p| p.x), min, max, bin_width)
    }

    /// Histogram of the y coordinates over `[min, max]`
    pub fn y_histogram(&self, min: f64, max: f64, bin_width: f64) -> Histogram {
        Histogram::from_values(self.points.iter().map(|p| p.y), min, max, bin_width)
    }
}

/// Result of checking whether a set of predicates partitions a sample
///
/// Buckets are meant to be mutually exclusive and exhaustive, but nothing enforces it.
/// This report only describes the situation; it never changes any bucket.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PartitionReport {
    /// Number of points checked
    pub total: usize,
    /// Points accepted by no predicate
    pub unmatched: usize,
    /// Points accepted by more than one predicate
    pub overlapping: usize,
}

impl PartitionReport {
    /// Counts, for every point, how many of `predicates` accept it
    pub fn check(sample: &SampleSet, predicates: &[&dyn Fn(f64, f64) -> bool]) -> Self {
        let mut unmatched = 0;
        let mut overlapping = 0;

        for point in sample.points() {
            let matches = predicates
                .iter()
                .filter(|predicate| predicate(point.x, point.y))
                .count();
            match matches {
                0 => unmatched += 1,
                1 => {}
                _ => overlapping += 1,
            }
        }

        Self {
            total: sample.len(),
            unmatched,
            overlapping,
        }
    }

    /// True when every point is accepted by exactly one predicate
    pub fn is_partition(&self) -> bool {
        self.unmatched == 0 && self.overlapping == 0
    }
}

/// One row of a figure's console summary
#[derive(Debug, Clone, Tabled)]
pub struct BucketSummary {
    #[tabled(rename = "Bucket")]
    pub label: String,
    #[tabled(rename = "Points")]
    pub points: usize,
    /// Share of the whole sample, e.g. `38.60%`
    #[tabled(rename = "Share")]
    pub share: String,
}

impl BucketSummary {
    /// Summarizes `bucket` relative to a sample of `sample_size` points
    pub fn of(bucket: &Bucket, sample_size: usize) -> Self {
        Self {
            label: bucket.label.clone(),
            points: bucket.len(),
            share: format_share(bucket.len(), sample_size),
        }
    }
}

fn format_share(points: usize, sample_size: usize) -> String {
    match sample_size {
        0 => "0.00%".to_string(),
        n => format!("{:.2}%", points as f64 * 100.0 / n as f64),
    }
}

/// Renders the bucket rows of one figure under the figure's name
///
/// A figure without buckets renders as a single line saying so.
pub fn format_summary_table(figure_name: &str, rows: &[BucketSummary]) -> String {
    if rows.is_empty() {
        return format!("{}: no buckets registered", figure_name);
    }

    let mut table = Table::new(rows);
    table.with(Style::modern());
    format!("{}\n{}", figure_name, table)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::constants::{BLUE, RED};

    fn grid_sample() -> SampleSet {
        let points = (-2..=2)
            .flat_map(|x| (-2..=2).map(move |y| Point { x: x as f64, y: y as f64 }))
            .collect();
        SampleSet::from_points(points)
    }

    #[test]
    fn summary_reports_share_of_sample() {
        let sample = grid_sample();
        let bucket = Bucket::select(&sample, |x, _| x < -1.0, BLUE, "left column");

        let summary = BucketSummary::of(&bucket, sample.len());
        assert_eq!(summary.label, "left column");
        assert_eq!(summary.points, 5);
        assert_eq!(summary.share, "20.00%");
        assert_eq!(BucketSummary::of(&bucket, 0).share, "0.00%");
    }

    #[test]
    fn summary_table_lists_every_bucket_under_figure_name() {
        let sample = grid_sample();
        let rows = [
            BucketSummary::of(&Bucket::select(&sample, |x, y| x + y > 0.5, BLUE, "above"), sample.len()),
            BucketSummary::of(&Bucket::select(&sample, |x, y| x + y <= 0.5, RED, "below"), sample.len()),
        ];

        let table = format_summary_table("plot2.png", &rows);
        assert!(table.starts_with("plot2.png\n"));
        for column in ["Bucket", "Points", "Share", "above", "below", "40.00%", "60.00%"] {
            assert!(table.contains(column), "missing {column}");
        }

        assert_eq!(format_summary_table("plot.png", &[]), "plot.png: no buckets registered");
    }

    #[test]
    fn partitioning_buckets_cover_the_sample() {
        let sample = grid_sample();
        let above = Bucket::select(&sample, |x, y| x + y > 0.5, BLUE, "above");
        let below = Bucket::select(&sample, |x, y| x + y <= 0.5, RED, "below");

        assert_eq!(above.len() + below.len(), sample.len());
        assert_eq!(above.len(), 10);
    }

    #[test]
    fn marginal_histograms_count_every_bucket_point() {
        let sample = grid_sample();
        let bucket = Bucket::select(&sample, |x, _| x >= 0.0, BLUE, "right");

        let xs = bucket.x_histogram(-4.0, 4.0, 0.25);
        let ys = bucket.y_histogram(-4.0, 4.0, 0.25);
        assert_eq!(xs.binned(), bucket.len());
        assert_eq!(ys.binned(), bucket.len());
    }

    #[test]
    fn empty_bucket_has_zero_histograms() {
        let sample = grid_sample();
        let bucket = Bucket::select(&sample, |_, _| false, RED, "nobody");

        assert!(bucket.is_empty());
        assert_eq!(bucket.x_histogram(-4.0, 4.0, 0.25).peak_density(), 0.0);
        assert_eq!(bucket.y_histogram(-4.0, 4.0, 0.25).peak_density(), 0.0);
    }

    #[test]
    fn partition_report_detects_gaps_and_overlaps() {
        let sample = grid_sample();

        let exact = PartitionReport::check(&sample, &[&|x: f64, _: f64| x < 0.0, &|x: f64, _: f64| x >= 0.0]);
        assert!(exact.is_partition());
        assert_eq!(exact.total, 25);

        let gap = PartitionReport::check(&sample, &[&|x: f64, _: f64| x < 0.0, &|x: f64, _: f64| x > 0.0]);
        assert_eq!(gap.unmatched, 5);
        assert_eq!(gap.overlapping, 0);
        assert!(!gap.is_partition());

        let overlap = PartitionReport::check(&sample, &[&|x: f64, _: f64| x <= 0.0, &|x: f64, _: f64| x >= 0.0]);
        assert_eq!(overlap.overlapping, 5);
        assert_eq!(overlap.unmatched, 0);
    }
}
