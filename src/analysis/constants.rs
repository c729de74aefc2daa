//! Fixed constants for sample generation and figure layout
//!
//! Every figure shares these values; there is no runtime configuration.
//! Colors are expressed as RGB fractions in `0.0..=1.0`.

use crate::common::style::Rgb;

/// Number of (x, y) pairs in the shared sample set
pub const SAMPLE_SIZE: usize = 5000;

/// Correlation between the two coordinates of the sample set
pub const SAMPLE_CORRELATION: f64 = 0.5;

/// Seed for the sample generator, making every run reproducible
pub const SAMPLE_SEED: u64 = 0x5eed_cafe;

/// Lower limit of both axes on the main panel
pub const AXIS_MIN: f64 = -4.0;

/// Upper limit of both axes on the main panel
pub const AXIS_MAX: f64 = 4.0;

/// Lowest labelled tick on both axes
pub const TICK_MIN: i32 = -3;

/// Highest labelled tick on both axes
pub const TICK_MAX: i32 = 3;

/// Width of each marginal histogram bin
///
/// Edges step from [`AXIS_MIN`] while below [`AXIS_MAX`], so the last edge is `3.75`.
pub const HIST_BIN_WIDTH: f64 = 0.25;

/// Figure canvas size in pixels (7 inches at 100 DPI)
pub const CANVAS_SIZE: (u32, u32) = (700, 700);

/// Relative size of the main panel against the marginal panel (width and height)
pub const MAIN_PANEL_RATIO: u32 = 7;

/// Relative size of each marginal panel
pub const MARGINAL_PANEL_RATIO: u32 = 1;

/// Space reserved for tick labels and axis descriptions on the main panel
pub const LABEL_AREA_SIZE: u32 = 60;

/// Base font size for axis descriptions, legend and annotations
pub const FONT_SIZE: u32 = 21;

/// Font size for tick labels
pub const TICK_FONT_SIZE: u32 = 17;

/// Opacity of gridlines on the main panel
pub const GRID_ALPHA: f64 = 0.2;

/// Opacity of tick labels and axis lines on the main panel
pub const TICK_ALPHA: f64 = 0.2;

/// Opacity of individual scatter points
pub const SCATTER_ALPHA: f64 = 0.1;

/// Radius of a scatter point in pixels
pub const SCATTER_RADIUS: u32 = 3;

/// Opacity of marginal histogram bars
pub const HIST_ALPHA: f64 = 0.3;

/// Headroom added above the tallest marginal bar
pub const HIST_HEADROOM: f64 = 1.05;

/// Default x-axis description
pub const DEFAULT_X_LABEL: &str = "Ability with thing A";

/// Default y-axis description
pub const DEFAULT_Y_LABEL: &str = "Ability with thing B";

/// Market preference vector used by the exponential match model
pub const MARKET_VECTOR: (f64, f64) = (1.0, 1.0);

/// Company preference vectors rendered by the exponential match model
pub const COMPANY_VECTORS: [(f64, f64); 7] = [
    (1.0, 0.0),
    (1.0, 0.5),
    (0.75, 0.75),
    (2.0, 2.0),
    (0.0, 1.0),
    (0.0, 0.0),
    (0.0, 3.0),
];

/// Fraction of a preference vector covered by the arrow shaft
pub const ARROW_PAD: f64 = 0.9;

/// Full width of an arrow shaft in data units
pub const ARROW_WIDTH: f64 = 0.1;

/// Full width of an arrow head in data units
pub const ARROW_HEAD_WIDTH: f64 = 0.4;

/// Length of an arrow head in data units
pub const ARROW_HEAD_LENGTH: f64 = 0.4;

/// Opacity of arrow fills
pub const ARROW_ALPHA: f64 = 0.7;

/// Opacity of the box behind annotation labels
pub const ANNOTATION_BOX_ALPHA: f64 = 0.3;

pub const BLUE: Rgb = Rgb::new(0.0, 0.0, 1.0);
pub const GREEN: Rgb = Rgb::new(0.0, 0.5, 0.0);
pub const RED: Rgb = Rgb::new(1.0, 0.0, 0.0);
pub const ORANGE: Rgb = Rgb::new(1.0, 0.5, 0.0);
pub const PURPLE: Rgb = Rgb::new(0.5, 0.0, 0.5);
pub const MARKET_COLOR: Rgb = Rgb::new(0.4, 0.4, 0.0);
pub const COMPANY_COLOR: Rgb = Rgb::new(0.0, 0.4, 0.4);
