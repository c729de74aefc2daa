//! Colors and the shared visual style of every figure

use crate::analysis::constants::*;
use plotters::style::{FontDesc, IntoFont, RGBColor};

/// An opaque color given as fractional RGB channels in `0.0..=1.0`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rgb {
    pub r: f64,
    pub g: f64,
    pub b: f64,
}

impl Rgb {
    pub const fn new(r: f64, g: f64, b: f64) -> Self {
        Self { r, g, b }
    }

    /// Converts to a plotters color, clamping each channel into range
    pub fn to_rgb_color(self) -> RGBColor {
        fn channel(value: f64) -> u8 {
            (value.clamp(0.0, 1.0) * 255.0).round() as u8
        }

        RGBColor(channel(self.r), channel(self.g), channel(self.b))
    }
}

/// Visual parameters applied by the bitmap renderer
///
/// Built from [`crate::analysis::constants`] via [`Default`]; tests override
/// individual fields to shrink the canvas.
#[derive(Debug, Clone, PartialEq)]
pub struct FigureStyle {
    pub canvas_size: (u32, u32),
    pub axis_min: f64,
    pub axis_max: f64,
    pub ticks: Vec<f64>,
    pub bin_width: f64,
    pub main_ratio: u32,
    pub marginal_ratio: u32,
    pub label_area_size: u32,
    pub font_family: &'static str,
    pub font_size: u32,
    pub tick_font_size: u32,
    pub grid_alpha: f64,
    pub tick_alpha: f64,
    pub scatter_alpha: f64,
    pub scatter_radius: u32,
    pub hist_alpha: f64,
    pub hist_headroom: f64,
}

impl FigureStyle {
    /// Splits a canvas extent into the main panel and marginal panel sizes
    ///
    /// The main panel receives `main_ratio / (main_ratio + marginal_ratio)` of the extent.
    pub fn panel_split(&self, extent: u32) -> (u32, u32) {
        let total = self.main_ratio + self.marginal_ratio;
        let main = extent * self.main_ratio / total;
        (main, extent - main)
    }

    /// The figure's font family at `size` pixels
    pub fn font(&self, size: u32) -> FontDesc<'static> {
        (self.font_family, f64::from(size)).into_font()
    }
}

impl Default for FigureStyle {
    fn default() -> Self {
        Self {
            canvas_size: CANVAS_SIZE,
            axis_min: AXIS_MIN,
            axis_max: AXIS_MAX,
            ticks: (TICK_MIN..=TICK_MAX).map(f64::from).collect(),
            bin_width: HIST_BIN_WIDTH,
            main_ratio: MAIN_PANEL_RATIO,
            marginal_ratio: MARGINAL_PANEL_RATIO,
            label_area_size: LABEL_AREA_SIZE,
            font_family: "sans-serif",
            font_size: FONT_SIZE,
            tick_font_size: TICK_FONT_SIZE,
            grid_alpha: GRID_ALPHA,
            tick_alpha: TICK_ALPHA,
            scatter_alpha: SCATTER_ALPHA,
            scatter_radius: SCATTER_RADIUS,
            hist_alpha: HIST_ALPHA,
            hist_headroom: HIST_HEADROOM,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case::blue(BLUE, RGBColor(0, 0, 255))]
    #[case::green(GREEN, RGBColor(0, 128, 0))]
    #[case::orange(ORANGE, RGBColor(255, 128, 0))]
    #[case::out_of_range(Rgb::new(-1.0, 2.0, 0.4), RGBColor(0, 255, 102))]
    fn converts_fractional_channels(#[case] color: Rgb, #[case] expected: RGBColor) {
        assert_eq!(color.to_rgb_color(), expected);
    }

    #[test]
    fn default_ticks_are_integers_from_minus_three_to_three() {
        let style = FigureStyle::default();
        assert_eq!(style.ticks, vec![-3.0, -2.0, -1.0, 0.0, 1.0, 2.0, 3.0]);
    }

    #[test]
    fn panel_split_follows_ratio() {
        let style = FigureStyle::default();
        assert_eq!(style.panel_split(700), (612, 88));
        assert_eq!(style.panel_split(80), (70, 10));
    }
}
