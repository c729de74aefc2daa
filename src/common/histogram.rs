//! Fixed-width histogram binning with density normalization
//!
//! Bin edges start at `min` and step by a fixed width while they stay strictly below `max`,
//! so with `[-4, 4)` and a width of `0.25` the last edge is `3.75` and there are 31 bins.
//! Every bin is half-open except the last, which also includes its upper edge. Values
//! outside the edges (and NaN) are tallied separately so that every input value is accounted
//! for exactly once.

/// A binned distribution of one coordinate of a bucket
#[derive(Debug, Clone, PartialEq)]
pub struct Histogram {
    min: f64,
    bin_width: f64,
    counts: Vec<usize>,
    outside: usize,
}

/// Number of edges `min, min + w, ...` strictly below `max`
fn edge_count(min: f64, max: f64, bin_width: f64) -> usize {
    if bin_width > 0.0 && max > min {
        ((max - min) / bin_width).ceil() as usize
    } else {
        0
    }
}

impl Histogram {
    /// Bins `values` between the edges `min, min + bin_width, ...` that lie below `max`
    ///
    /// # Arguments
    /// * `values` - Values to bin; any iterator of `f64`
    /// * `min` - Lower edge of the first bin
    /// * `max` - Exclusive bound on the edges; the last edge is the greatest one below it
    /// * `bin_width` - Width of every bin; must be positive
    pub fn from_values(values: impl IntoIterator<Item = f64>, min: f64, max: f64, bin_width: f64) -> Self {
        let bin_count = edge_count(min, max, bin_width).saturating_sub(1);
        let upper = min + bin_count as f64 * bin_width;

        let mut counts = vec![0usize; bin_count];
        let mut outside = 0usize;

        for value in values {
            if bin_count == 0 || !(min..=upper).contains(&value) {
                outside += 1;
                continue;
            }

            let index = (((value - min) / bin_width).floor() as usize).min(bin_count - 1);
            counts[index] += 1;
        }

        Self {
            min,
            bin_width,
            counts,
            outside,
        }
    }

    #[cfg(test)]
    pub fn counts(&self) -> &[usize] {
        &self.counts
    }

    /// Number of values that fell outside the binned range
    pub fn outside(&self) -> usize {
        self.outside
    }

    /// Number of values that landed in a bin
    pub fn binned(&self) -> usize {
        self.counts.iter().sum()
    }

    /// Number of values seen, binned or not
    #[cfg(test)]
    pub fn total(&self) -> usize {
        self.binned() + self.outside
    }

    /// Lower and upper edge of bin `index`
    pub fn edges(&self, index: usize) -> (f64, f64) {
        let lo = self.min + index as f64 * self.bin_width;
        (lo, lo + self.bin_width)
    }

    /// Probability density of each bin, so that the bar areas sum to one
    ///
    /// Normalizes by the number of binned values. An empty histogram yields all zeros.
    pub fn densities(&self) -> Vec<f64> {
        let binned = self.binned();
        if binned == 0 {
            return vec![0.0; self.counts.len()];
        }

        let scale = 1.0 / (binned as f64 * self.bin_width);
        self.counts.iter().map(|&count| count as f64 * scale).collect()
    }

    /// Tallest density among all bins, or zero when empty
    pub fn peak_density(&self) -> f64 {
        self.densities().into_iter().fold(0.0, f64::max)
    }

    /// Iterates `(lower_edge, upper_edge, density)` for every bin
    pub fn density_bars(&self) -> impl Iterator<Item = (f64, f64, f64)> + '_ {
        self.densities()
            .into_iter()
            .enumerate()
            .map(|(index, density)| {
                let (lo, hi) = self.edges(index);
                (lo, hi, density)
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::constants::{AXIS_MAX, AXIS_MIN, HIST_BIN_WIDTH};
    use rstest::rstest;

    #[test]
    fn axis_range_edges_stop_below_upper_limit() {
        let hist = Histogram::from_values(std::iter::empty(), AXIS_MIN, AXIS_MAX, HIST_BIN_WIDTH);
        assert_eq!(hist.counts().len(), 31);
        assert_eq!(hist.edges(0), (-4.0, -3.75));
        assert_eq!(hist.edges(30), (3.5, 3.75));
    }

    #[rstest]
    #[case::lower_edge(-4.0, 0)]
    #[case::inside_first(-3.9, 0)]
    #[case::bin_boundary(-3.75, 1)]
    #[case::zero(0.0, 16)]
    #[case::last_edge_is_inclusive(3.75, 30)]
    fn places_values_in_expected_bin(#[case] value: f64, #[case] index: usize) {
        let hist = Histogram::from_values([value], AXIS_MIN, AXIS_MAX, HIST_BIN_WIDTH);
        assert_eq!(hist.counts()[index], 1);
        assert_eq!(hist.binned(), 1);
    }

    #[rstest]
    #[case::past_last_edge(3.9)]
    #[case::axis_limit(4.0)]
    #[case::below_axis(-4.01)]
    #[case::not_a_number(f64::NAN)]
    fn values_beyond_the_edges_are_not_binned(#[case] value: f64) {
        let hist = Histogram::from_values([value, 0.0], AXIS_MIN, AXIS_MAX, HIST_BIN_WIDTH);
        assert_eq!(hist.binned(), 1);
        assert_eq!(hist.outside(), 1);
        // Density is normalized by the binned value alone
        assert!((hist.peak_density() - 1.0 / HIST_BIN_WIDTH).abs() < 1e-12);
    }

    #[test]
    fn every_value_is_counted_once() {
        let values = [-5.0, -4.0, -1.2, 0.0, 0.1, 3.75, 3.99, 4.0, 4.01, f64::NAN];
        let hist = Histogram::from_values(values, AXIS_MIN, AXIS_MAX, HIST_BIN_WIDTH);

        assert_eq!(hist.binned(), 5);
        assert_eq!(hist.outside(), 5);
        assert_eq!(hist.total(), values.len());
    }

    #[test]
    fn degenerate_range_has_no_bins() {
        let hist = Histogram::from_values([0.0, 0.1], 0.0, 0.25, 0.25);
        assert!(hist.counts().is_empty());
        assert_eq!(hist.outside(), 2);
        assert_eq!(hist.peak_density(), 0.0);
    }

    #[test]
    fn densities_integrate_to_one() {
        let values = (0..1000).map(|i| -3.0 + 6.0 * i as f64 / 1000.0);
        let hist = Histogram::from_values(values, -4.0, 4.0, 0.25);

        let area: f64 = hist.density_bars().map(|(lo, hi, d)| (hi - lo) * d).sum();
        assert!((area - 1.0).abs() < 1e-9);
    }

    #[test]
    fn empty_input_yields_zero_densities() {
        let hist = Histogram::from_values(std::iter::empty(), -4.0, 4.0, 0.25);

        assert_eq!(hist.total(), 0);
        assert!(hist.densities().iter().all(|&d| d == 0.0));
        assert_eq!(hist.peak_density(), 0.0);
    }

    #[test]
    fn peak_density_matches_tallest_bin() {
        let hist = Histogram::from_values([0.1, 0.2, 1.1], -4.0, 4.0, 0.25);
        // 2 of 3 values in one bin of width 0.25
        assert!((hist.peak_density() - 2.0 / (3.0 * 0.25)).abs() < 1e-12);
    }
}
