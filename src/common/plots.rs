//! Plotting infrastructure for bucketed scatter figures
//!
//! This module draws a [`Figure`] using the [`plotters`] crate. Each figure is a 2x2 grid:
//! the x marginal histogram on top, the main scatter panel bottom left, the y marginal
//! histogram on the right and an empty corner. Charts are saved as PNG files.

use super::histogram::Histogram;
use super::scaffold::{Figure, FigureRenderer, VectorAnnotation};
use super::style::FigureStyle;
use crate::analysis::constants::{
    ANNOTATION_BOX_ALPHA, ARROW_ALPHA, ARROW_HEAD_LENGTH, ARROW_HEAD_WIDTH, ARROW_PAD, ARROW_WIDTH,
};
use plotters::coord::ranged1d::Ranged;
use plotters::coord::types::RangedCoordf64;
use plotters::coord::Shift;
use plotters::prelude::*;
use plotters::style::text_anchor::{HPos, Pos, VPos};
use thiserror::Error;
use tracing::{debug, info, warn};

/// Errors that can occur during plot generation
#[derive(Error, Debug)]
pub enum PlotError {
    #[error("Failed to create drawing area: {0}")]
    DrawingArea(String),

    #[error("Failed to configure chart: {0}")]
    ChartConfig(String),

    #[error("Failed to draw chart elements: {0}")]
    Drawing(String),
}

type Result<T> = core::result::Result<T, PlotError>;

/// Coordinate system of the main panel
type MainCoord = Cartesian2d<RangedCoordf64, RangedCoordf64>;

/// Renders figures into PNG files with the bitmap backend
///
/// # Headless Compatibility
/// Uses plotters' bitmap backend; text is rendered through the `ttf` feature, which needs a
/// system sans-serif font.
#[derive(Debug, Clone, Default)]
pub struct BitmapRenderer {
    pub style: FigureStyle,
}

impl FigureRenderer for BitmapRenderer {
    fn render(&self, figure: &Figure) -> Result<()> {
        create_bucket_plot(figure, &self.style)?;
        info!(
            path = %figure.path.display(),
            buckets = figure.buckets.len(),
            "Figure saved"
        );
        Ok(())
    }
}

/// Marginal histograms of every bucket in a figure, in bucket order
struct Marginals {
    x: Vec<Histogram>,
    y: Vec<Histogram>,
}

impl Marginals {
    fn of(figure: &Figure, style: &FigureStyle) -> Self {
        let (min, max, width) = (style.axis_min, style.axis_max, style.bin_width);
        let marginals = Self {
            x: figure.buckets.iter().map(|b| b.x_histogram(min, max, width)).collect(),
            y: figure.buckets.iter().map(|b| b.y_histogram(min, max, width)).collect(),
        };

        debug!(
            path = %figure.path.display(),
            x_outside = marginals.x.iter().map(Histogram::outside).sum::<usize>(),
            y_outside = marginals.y.iter().map(Histogram::outside).sum::<usize>(),
            "Values left out of the marginal bins"
        );
        marginals
    }
}

/// Label for a candidate tick position on the main panel
///
/// Positions that are not one of `ticks` get an empty label, which hides the limits `±4`.
pub fn tick_label(value: f64, ticks: &[f64]) -> String {
    ticks
        .iter()
        .find(|tick| (*tick - value).abs() < 1e-9)
        .map(|tick| format!("{:.0}", tick))
        .unwrap_or_default()
}

/// Number of candidate label positions requested from plotters per axis
///
/// Two more than the ticks, so the axis limits land on key points and every tick does too.
fn label_hint(style: &FigureStyle) -> usize {
    style.ticks.len() + 2
}

/// Labels drawn along each main panel axis, in axis order, with hidden positions removed
pub fn main_axis_labels(style: &FigureStyle) -> Vec<String> {
    RangedCoordf64::from(style.axis_min..style.axis_max)
        .key_points(label_hint(style))
        .into_iter()
        .map(|value| tick_label(value, &style.ticks))
        .filter(|label| !label.is_empty())
        .collect()
}

/// Upper limit of a marginal density axis, with headroom above the tallest bar
///
/// Falls back to `1.0` when every histogram is empty, so the axis range stays valid.
pub fn marginal_axis_limit(histograms: &[Histogram], headroom: f64) -> f64 {
    let peak = histograms
        .iter()
        .map(Histogram::peak_density)
        .fold(0.0, f64::max);

    if peak > 0.0 {
        peak * headroom
    } else {
        1.0
    }
}

/// Outline of an arrow from the origin along `(dx, dy)`, in data coordinates
///
/// The shaft runs to `pad * (dx, dy)` and the head extends `head_length` beyond it.
/// Returns `None` for a zero vector, which has no direction.
pub fn arrow_polygon(
    dx: f64,
    dy: f64,
    pad: f64,
    width: f64,
    head_width: f64,
    head_length: f64,
) -> Option<Vec<(f64, f64)>> {
    let length = dx.hypot(dy);
    if length == 0.0 {
        return None;
    }

    let (ux, uy) = (dx / length, dy / length);
    let (nx, ny) = (-uy, ux);
    let (bx, by) = (dx * pad, dy * pad);
    let (sw, hw) = (width / 2.0, head_width / 2.0);

    Some(vec![
        (nx * sw, ny * sw),
        (bx + nx * sw, by + ny * sw),
        (bx + nx * hw, by + ny * hw),
        (bx + ux * head_length, by + uy * head_length),
        (bx - nx * hw, by - ny * hw),
        (bx - nx * sw, by - ny * sw),
        (-nx * sw, -ny * sw),
    ])
}

/// Creates the scatter plus marginal histogram chart for `figure` and saves it as a PNG
///
/// # Arguments
/// * `figure` - Buckets, annotations and labels to draw
/// * `style` - Canvas size, panel ratios, limits, fonts and opacities
///
/// # Chart Properties
/// * Main panel: both axes fixed to `[axis_min, axis_max]`, ticks at `style.ticks`,
///   faint gridlines, equal aspect ratio
/// * Marginal panels: density histograms sharing the main panel's scale, no axes
/// * Legend: one entry per bucket, framed, in the upper right corner of the figure
pub fn create_bucket_plot(figure: &Figure, style: &FigureStyle) -> Result<()> {
    let root = BitMapBackend::new(&figure.path, style.canvas_size).into_drawing_area();
    root.fill(&WHITE)
        .map_err(|e| PlotError::DrawingArea(e.to_string()))?;

    let (width, height) = style.canvas_size;
    let (main_width, _) = style.panel_split(width);
    let (_, top_height) = style.panel_split(height);

    let (top, bottom) = root.split_vertically(top_height);
    let (x_area, _corner) = top.split_horizontally(main_width);
    let (main_area, y_area) = bottom.split_horizontally(main_width);

    let marginals = Marginals::of(figure, style);
    draw_main_panel(&main_area, figure, style)?;
    draw_x_marginal(&x_area, figure, &marginals.x, style)?;
    draw_y_marginal(&y_area, figure, &marginals.y, style)?;
    draw_title(&root, &figure.title, style)?;
    draw_legend(&root, figure, style)?;

    root.present()
        .map_err(|e| PlotError::Drawing(e.to_string()))?;

    Ok(())
}

fn draw_main_panel(area: &DrawingArea<BitMapBackend<'_>, Shift>, figure: &Figure, style: &FigureStyle) -> Result<()> {
    let limits = style.axis_min..style.axis_max;
    let mut chart = ChartBuilder::on(area)
        .x_label_area_size(style.label_area_size)
        .y_label_area_size(style.label_area_size)
        .build_cartesian_2d(limits.clone(), limits)
        .map_err(|e| PlotError::ChartConfig(e.to_string()))?;

    let faint = BLACK.mix(style.tick_alpha);
    let label = |v: &f64| tick_label(*v, &style.ticks);
    chart
        .configure_mesh()
        .disable_mesh()
        .x_labels(label_hint(style))
        .y_labels(label_hint(style))
        .x_desc(figure.x_label.as_str())
        .y_desc(figure.y_label.as_str())
        .axis_desc_style(style.font(style.font_size))
        .label_style(style.font(style.tick_font_size).color(&faint))
        .axis_style(faint)
        .x_label_formatter(&label)
        .y_label_formatter(&label)
        .draw()
        .map_err(|e| PlotError::Drawing(e.to_string()))?;

    // Gridlines only at the labelled ticks
    let grid = BLACK.mix(style.grid_alpha);
    for &tick in &style.ticks {
        chart
            .draw_series([
                PathElement::new(vec![(tick, style.axis_min), (tick, style.axis_max)], grid),
                PathElement::new(vec![(style.axis_min, tick), (style.axis_max, tick)], grid),
            ])
            .map_err(|e| PlotError::Drawing(e.to_string()))?;
    }

    let in_limits = |v: f64| (style.axis_min..=style.axis_max).contains(&v);
    for bucket in figure.buckets.iter().filter(|b| !b.is_empty()) {
        let fill = bucket.color.to_rgb_color().mix(style.scatter_alpha).filled();
        chart
            .draw_series(
                bucket
                    .points
                    .iter()
                    .filter(|p| in_limits(p.x) && in_limits(p.y))
                    .map(|p| Circle::new((p.x, p.y), style.scatter_radius, fill)),
            )
            .map_err(|e| PlotError::Drawing(e.to_string()))?;
    }

    for annotation in &figure.annotations {
        draw_vector_annotation(&mut chart, annotation, style)?;
    }

    Ok(())
}

fn draw_vector_annotation(
    chart: &mut ChartContext<'_, BitMapBackend<'_>, MainCoord>,
    annotation: &VectorAnnotation,
    style: &FigureStyle,
) -> Result<()> {
    let color = annotation.color.to_rgb_color();

    if let Some(outline) = arrow_polygon(
        annotation.dx,
        annotation.dy,
        ARROW_PAD,
        ARROW_WIDTH,
        ARROW_HEAD_WIDTH,
        ARROW_HEAD_LENGTH,
    ) {
        let mut edge = outline.clone();
        edge.push(outline[0]);
        chart
            .draw_series(std::iter::once(Polygon::new(outline, color.mix(ARROW_ALPHA).filled())))
            .map_err(|e| PlotError::Drawing(e.to_string()))?;
        chart
            .draw_series(std::iter::once(PathElement::new(edge, WHITE)))
            .map_err(|e| PlotError::Drawing(e.to_string()))?;
    }

    let text_style = TextStyle::from(style.font(style.font_size))
        .color(&color)
        .pos(Pos::new(HPos::Center, VPos::Bottom));
    let (w, h) = chart
        .plotting_area()
        .estimate_text_size(&annotation.label, &text_style)
        .map_err(|e| PlotError::Drawing(e.to_string()))?;
    let (half_w, h, pad) = (w as i32 / 2 + 2, h as i32, 2);

    chart
        .draw_series(std::iter::once(
            EmptyElement::at((annotation.dx, annotation.dy))
                + Rectangle::new(
                    [(-half_w, -h - pad), (half_w, pad)],
                    WHITE.mix(ANNOTATION_BOX_ALPHA).filled(),
                )
                + Text::new(annotation.label.clone(), (0, 0), text_style.clone()),
        ))
        .map_err(|e| PlotError::Drawing(e.to_string()))?;

    Ok(())
}

fn draw_x_marginal(
    area: &DrawingArea<BitMapBackend<'_>, Shift>,
    figure: &Figure,
    histograms: &[Histogram],
    style: &FigureStyle,
) -> Result<()> {
    let peak = marginal_axis_limit(histograms, style.hist_headroom);
    let mut chart = ChartBuilder::on(area)
        .y_label_area_size(style.label_area_size)
        .build_cartesian_2d(style.axis_min..style.axis_max, 0.0..peak)
        .map_err(|e| PlotError::ChartConfig(e.to_string()))?;

    for (bucket, histogram) in figure.buckets.iter().zip(histograms) {
        let fill = bucket.color.to_rgb_color().mix(style.hist_alpha).filled();
        chart
            .draw_series(
                histogram
                    .density_bars()
                    .filter(|&(_, _, density)| density > 0.0)
                    .map(|(lo, hi, density)| Rectangle::new([(lo, 0.0), (hi, density)], fill)),
            )
            .map_err(|e| PlotError::Drawing(e.to_string()))?;
    }

    Ok(())
}

fn draw_y_marginal(
    area: &DrawingArea<BitMapBackend<'_>, Shift>,
    figure: &Figure,
    histograms: &[Histogram],
    style: &FigureStyle,
) -> Result<()> {
    let peak = marginal_axis_limit(histograms, style.hist_headroom);
    let mut chart = ChartBuilder::on(area)
        .x_label_area_size(style.label_area_size)
        .build_cartesian_2d(0.0..peak, style.axis_min..style.axis_max)
        .map_err(|e| PlotError::ChartConfig(e.to_string()))?;

    for (bucket, histogram) in figure.buckets.iter().zip(histograms) {
        let fill = bucket.color.to_rgb_color().mix(style.hist_alpha).filled();
        chart
            .draw_series(
                histogram
                    .density_bars()
                    .filter(|&(_, _, density)| density > 0.0)
                    .map(|(lo, hi, density)| Rectangle::new([(0.0, lo), (density, hi)], fill)),
            )
            .map_err(|e| PlotError::Drawing(e.to_string()))?;
    }

    Ok(())
}

fn draw_title(root: &DrawingArea<BitMapBackend<'_>, Shift>, lines: &[String], style: &FigureStyle) -> Result<()> {
    let (width, height) = style.canvas_size;
    let x = (width as f64 * 0.02) as i32;
    let mut y = (height as f64 * 0.02) as i32;
    let font = style.font(style.font_size);

    for line in lines {
        root.draw(&Text::new(line.as_str(), (x, y), font.clone()))
            .map_err(|e| PlotError::Drawing(e.to_string()))?;
        y += style.font_size as i32 + 4;
    }

    Ok(())
}

fn draw_legend(root: &DrawingArea<BitMapBackend<'_>, Shift>, figure: &Figure, style: &FigureStyle) -> Result<()> {
    let entries = figure.legend_entries();
    if entries.is_empty() {
        warn!(path = %figure.path.display(), "No buckets registered; skipping legend");
        return Ok(());
    }

    let font = style.font(style.font_size);
    let text_style = TextStyle::from(font).pos(Pos::new(HPos::Left, VPos::Center));

    let mut text_width = 0;
    for entry in &entries {
        let (w, _) = root
            .estimate_text_size(&entry.label, &text_style)
            .map_err(|e| PlotError::Drawing(e.to_string()))?;
        text_width = text_width.max(w as i32);
    }

    let padding = 8;
    let marker = style.font_size as i32 / 3;
    let row_height = style.font_size as i32 + 6;
    let box_width = padding * 3 + marker * 2 + text_width;
    let box_height = padding * 2 + row_height * entries.len() as i32;

    let right = style.canvas_size.0 as i32 - 1;
    let left = right - box_width;
    let top = 1;

    root.draw(&Rectangle::new([(left, top), (right, top + box_height)], WHITE.filled()))
        .map_err(|e| PlotError::Drawing(e.to_string()))?;
    root.draw(&Rectangle::new([(left, top), (right, top + box_height)], BLACK.mix(0.2)))
        .map_err(|e| PlotError::Drawing(e.to_string()))?;

    for (row, entry) in entries.iter().enumerate() {
        let cy = top + padding + row_height * row as i32 + row_height / 2;
        let cx = left + padding + marker;
        root.draw(&Circle::new((cx, cy), marker as u32, entry.color.to_rgb_color().filled()))
            .map_err(|e| PlotError::Drawing(e.to_string()))?;
        root.draw(&Text::new(
            entry.label.as_str(),
            (cx + marker + padding, cy),
            text_style.clone(),
        ))
        .map_err(|e| PlotError::Drawing(e.to_string()))?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::constants::{BLUE, RED};
    use crate::common::sample::{Point, SampleSet};
    use crate::common::scaffold::with_figure;
    use rstest::rstest;

    #[test]
    fn marginal_limit_adds_headroom_to_tallest_bar() {
        let a = Histogram::from_values([0.1, 0.2], -4.0, 4.0, 0.25);
        let b = Histogram::from_values([0.1, 1.1, 2.1, 3.1], -4.0, 4.0, 0.25);

        let limit = marginal_axis_limit(&[a, b], 1.05);
        assert!((limit - 4.0 * 1.05).abs() < 1e-12);
    }

    #[test]
    fn marginal_limit_for_empty_histograms_stays_valid() {
        let empty = Histogram::from_values(std::iter::empty(), -4.0, 4.0, 0.25);
        assert_eq!(marginal_axis_limit(&[empty], 1.05), 1.0);
        assert_eq!(marginal_axis_limit(&[], 1.05), 1.0);
    }

    #[test]
    fn main_axes_label_exactly_the_ticks() {
        let style = FigureStyle::default();
        let expected: Vec<String> = style.ticks.iter().map(|t| format!("{:.0}", t)).collect();

        assert_eq!(main_axis_labels(&style), expected);
        assert_eq!(main_axis_labels(&style), ["-3", "-2", "-1", "0", "1", "2", "3"]);
    }

    #[rstest]
    #[case::lower_limit(-4.0, "")]
    #[case::upper_limit(4.0, "")]
    #[case::between_ticks(0.5, "")]
    #[case::negative_tick(-3.0, "-3")]
    #[case::origin(0.0, "0")]
    #[case::negative_zero(-0.0, "0")]
    #[case::rounding_noise(2.999_999_999_99, "3")]
    fn tick_labels_hide_non_tick_positions(#[case] value: f64, #[case] expected: &str) {
        assert_eq!(tick_label(value, &FigureStyle::default().ticks), expected);
    }

    #[test]
    fn zero_vector_has_no_arrow() {
        assert!(arrow_polygon(0.0, 0.0, 0.9, 0.1, 0.4, 0.4).is_none());
    }

    #[rstest]
    #[case::diagonal(1.0, 1.0)]
    #[case::horizontal(1.0, 0.0)]
    #[case::steep(0.0, 3.0)]
    fn arrow_tip_extends_head_length_past_shaft(#[case] dx: f64, #[case] dy: f64) {
        let outline = arrow_polygon(dx, dy, 0.9, 0.1, 0.4, 0.4).unwrap();
        assert_eq!(outline.len(), 7);

        let length = dx.hypot(dy);
        let (tx, ty) = outline[3];
        assert!((tx.hypot(ty) - (0.9 * length + 0.4)).abs() < 1e-9);

        // Head corners are 0.4 apart, shaft corners 0.1 apart
        let head = (outline[2].0 - outline[4].0).hypot(outline[2].1 - outline[4].1);
        let shaft = (outline[0].0 - outline[6].0).hypot(outline[0].1 - outline[6].1);
        assert!((head - 0.4).abs() < 1e-9);
        assert!((shaft - 0.1).abs() < 1e-9);
    }

    #[test]
    #[ignore = "Font rendering not available in test environment"]
    fn test_create_bucket_plot_success() {
        let temp_dir = tempfile::tempdir().unwrap();
        let output_path = temp_dir.path().join("test_bucket_plot.png");

        let sample = SampleSet::from_points(vec![
            Point { x: -1.0, y: -0.5 },
            Point { x: 0.5, y: 1.5 },
            Point { x: 2.0, y: 0.0 },
            Point { x: 5.0, y: 5.0 },
        ]);
        let renderer = BitmapRenderer::default();

        let result = with_figure(&sample, &renderer, Figure::new(&output_path), |fig| {
            fig.scatter(|x, y| x + y > 0.5, BLUE, "above");
            fig.scatter(|x, y| x + y <= 0.5, RED, "below");
            fig.scatter(|_, _| false, RED, "nobody");
            fig.annotate_vector(1.0, 1.0, BLUE, "Market");
            fig.annotate_vector(0.0, 0.0, RED, "Company");
            fig.set_title(vec!["Market vector".to_string(), "Company vector".to_string()]);
            Ok(())
        });

        assert!(result.is_ok());
        assert!(output_path.exists());
    }

    #[test]
    #[ignore = "Font rendering not available in test environment"]
    fn unwritable_path_fails() {
        let sample = SampleSet::from_points(vec![Point { x: 0.0, y: 0.0 }]);
        let renderer = BitmapRenderer::default();
        let path = std::path::Path::new("/nonexistent-directory/plot.png");

        let result = with_figure(&sample, &renderer, Figure::new(path), |fig| {
            fig.scatter(|_, _| true, BLUE, "everyone");
            Ok(())
        });

        assert!(result.is_err());
    }
}
