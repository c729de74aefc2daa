//! Hiring funnel figures
//!
//! Each figure splits the sample into candidates that are brought in, rejected, or out of
//! reach, using fixed linear thresholds on the two abilities.

use super::constants::{BLUE, GREEN, ORANGE, RED};
use super::save_figure;
use crate::common::buckets::PartitionReport;
use crate::common::plots::PlotError;
use crate::common::report::FigureReporter;
use crate::common::sample::SampleSet;
use crate::common::scaffold::{output_path, Figure, FigureRenderer};
use std::path::Path;

type Result<T> = core::result::Result<T, PlotError>;

pub const CONSIDERED: &str = "Candidates we consider";
pub const BROUGHT_IN: &str = "Candidates we bring in";
pub const NOT_BROUGHT_IN: &str = "Candidates we do not bring in";
pub const OUT_OF_REACH: &str = "Candidates that do not want to talk to us";

/// Number of figures written by [`generate_hiring_plots`]
pub const HIRING_FIGURE_COUNT: u64 = 5;

pub fn everyone(_x: f64, _y: f64) -> bool {
    true
}

pub fn above_bar(x: f64, y: f64) -> bool {
    x + y > 0.5
}

pub fn below_bar(x: f64, y: f64) -> bool {
    x + y <= 0.5
}

/// Strong enough that they have better options than us
pub fn out_of_reach(x: f64, y: f64) -> bool {
    x + y > 1.5
}

pub fn within_reach(x: f64, y: f64) -> bool {
    x + y <= 1.5
}

pub fn above_bar_within_reach(x: f64, y: f64) -> bool {
    above_bar(x, y) && within_reach(x, y)
}

/// Selected on competence alone
pub fn competent_within_reach(x: f64, y: f64) -> bool {
    1.0 < x && within_reach(x, y)
}

pub fn not_competent_within_reach(x: f64, y: f64) -> bool {
    x <= 1.0 && within_reach(x, y)
}

/// Selected on competence weighted twice as much as school fanciness
pub fn fancy_school_pick(x: f64, y: f64) -> bool {
    2.0 < 2.0 * x + y && within_reach(x, y)
}

pub fn fancy_school_reject(x: f64, y: f64) -> bool {
    2.0 * x + y <= 2.0 && within_reach(x, y)
}

/// Generate the hiring funnel figures
///
/// Writes `plot.png`, `plot2.png`, `plot3.png`, `plot_confidence.png` and
/// `plot_fancy_school.png` into `output_dir`.
///
/// # Arguments
/// * `sample` - Shared sample set
/// * `renderer` - Renderer writing each figure
/// * `reporter` - Receives each saved figure for the console summary
/// * `output_dir` - Directory where the PNG files should be saved
///
/// # Returns
/// The figures that were written, in order
pub fn generate_hiring_plots<R: FigureRenderer>(
    sample: &SampleSet,
    renderer: &R,
    reporter: &FigureReporter,
    output_dir: &Path,
) -> Result<Vec<Figure>> {
    let mut figures = Vec::with_capacity(HIRING_FIGURE_COUNT as usize);

    figures.push(save_figure(sample, renderer, reporter, Figure::new(output_path(output_dir, "plot.png")), |fig| {
        fig.scatter(everyone, BLUE, CONSIDERED);
        Ok(())
    })?);

    reporter.check_partition("plot2.png", PartitionReport::check(sample, &[&above_bar, &below_bar]));
    figures.push(save_figure(sample, renderer, reporter, Figure::new(output_path(output_dir, "plot2.png")), |fig| {
        fig.scatter(above_bar, GREEN, BROUGHT_IN);
        fig.scatter(below_bar, RED, NOT_BROUGHT_IN);
        Ok(())
    })?);

    reporter.check_partition(
        "plot3.png",
        PartitionReport::check(sample, &[&out_of_reach, &above_bar_within_reach, &below_bar]),
    );
    figures.push(save_figure(sample, renderer, reporter, Figure::new(output_path(output_dir, "plot3.png")), |fig| {
        fig.scatter(out_of_reach, ORANGE, OUT_OF_REACH);
        fig.scatter(above_bar_within_reach, GREEN, BROUGHT_IN);
        fig.scatter(below_bar, RED, NOT_BROUGHT_IN);
        Ok(())
    })?);

    reporter.check_partition(
        "plot_confidence.png",
        PartitionReport::check(sample, &[&out_of_reach, &competent_within_reach, &not_competent_within_reach]),
    );
    let confidence = Figure::with_labels(
        output_path(output_dir, "plot_confidence.png"),
        "Competence",
        "Confidence",
    );
    figures.push(save_figure(sample, renderer, reporter, confidence, |fig| {
        fig.scatter(out_of_reach, ORANGE, OUT_OF_REACH);
        fig.scatter(competent_within_reach, GREEN, BROUGHT_IN);
        fig.scatter(not_competent_within_reach, RED, NOT_BROUGHT_IN);
        Ok(())
    })?);

    reporter.check_partition(
        "plot_fancy_school.png",
        PartitionReport::check(sample, &[&out_of_reach, &fancy_school_pick, &fancy_school_reject]),
    );
    let fancy_school = Figure::with_labels(
        output_path(output_dir, "plot_fancy_school.png"),
        "Competence",
        "School fanciness",
    );
    figures.push(save_figure(sample, renderer, reporter, fancy_school, |fig| {
        fig.scatter(out_of_reach, ORANGE, OUT_OF_REACH);
        fig.scatter(fancy_school_pick, GREEN, BROUGHT_IN);
        fig.scatter(fancy_school_reject, RED, NOT_BROUGHT_IN);
        Ok(())
    })?);

    Ok(figures)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::scaffold::tests::RecordingRenderer;
    use proptest::prelude::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use rstest::rstest;

    type Predicate = fn(f64, f64) -> bool;

    fn exactly_one(predicates: &[Predicate], x: f64, y: f64) -> bool {
        predicates.iter().filter(|p| p(x, y)).count() == 1
    }

    proptest! {
        #[test]
        fn bar_split_partitions_the_plane(x in -10.0f64..10.0, y in -10.0f64..10.0) {
            prop_assert!(exactly_one(&[above_bar, below_bar], x, y));
        }

        #[test]
        fn reach_split_partitions_the_plane(x in -10.0f64..10.0, y in -10.0f64..10.0) {
            prop_assert!(exactly_one(&[out_of_reach, above_bar_within_reach, below_bar], x, y));
        }

        #[test]
        fn confidence_split_partitions_the_plane(x in -10.0f64..10.0, y in -10.0f64..10.0) {
            prop_assert!(exactly_one(&[out_of_reach, competent_within_reach, not_competent_within_reach], x, y));
        }

        #[test]
        fn fancy_school_split_partitions_the_plane(x in -10.0f64..10.0, y in -10.0f64..10.0) {
            prop_assert!(exactly_one(&[out_of_reach, fancy_school_pick, fancy_school_reject], x, y));
        }
    }

    #[rstest]
    #[case::on_bar(0.25, 0.25, false)]
    #[case::just_above_bar(0.5, 0.01, true)]
    #[case::on_reach_limit(0.75, 0.75, true)]
    #[case::past_reach(1.0, 1.0, false)]
    fn above_bar_within_reach_boundaries(#[case] x: f64, #[case] y: f64, #[case] expected: bool) {
        assert_eq!(above_bar_within_reach(x, y), expected);
    }

    #[test]
    fn writes_five_figures_that_partition_the_sample() {
        let sample = SampleSet::generate(&mut StdRng::seed_from_u64(3), 500, 0.5).unwrap();
        let renderer = RecordingRenderer::default();
        let reporter = FigureReporter::hidden(sample.len());

        let figures = generate_hiring_plots(&sample, &renderer, &reporter, Path::new("out")).unwrap();

        let names: Vec<_> = figures
            .iter()
            .map(|f| f.path.file_name().unwrap().to_string_lossy().into_owned())
            .collect();
        assert_eq!(
            names,
            ["plot.png", "plot2.png", "plot3.png", "plot_confidence.png", "plot_fancy_school.png"]
        );
        assert_eq!(renderer.rendered.borrow().len(), 5);

        for figure in &figures {
            let covered: usize = figure.buckets.iter().map(|b| b.len()).sum();
            assert_eq!(covered, sample.len(), "{}", figure.path.display());
        }

        assert_eq!(figures[0].legend_entries().len(), 1);
        assert_eq!(figures[2].legend_entries().len(), 3);
        assert_eq!(figures[3].x_label, "Competence");
        assert_eq!(figures[4].y_label, "School fanciness");
    }

    #[test]
    fn bucket_proportions_follow_thresholds() {
        let sample = SampleSet::generate(&mut StdRng::seed_from_u64(11), 20_000, 0.5).unwrap();
        let above = sample.filter(above_bar).len() as f64 / sample.len() as f64;

        // x + y ~ N(0, 3) with correlation 0.5, so P(x + y > 0.5) = 1 - Φ(0.5 / √3) ≈ 0.386
        assert!((above - 0.386).abs() < 0.02);
    }
}
