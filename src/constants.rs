// src/constants.rs

use plotters::style::colors::full_palette::GREY_400;
use plotters::style::RGBColor;

// Maximum number of registered functions per controller.
pub const DEFAULT_MAX_PLOTS: usize = 10;

// Default domain, used until set_domain is called.
pub const DEFAULT_DOMAIN_MIN: f64 = 0.0;
pub const DEFAULT_DOMAIN_MAX: f64 = 5.0;
pub const DEFAULT_FRAME_COUNT: usize = 100;

// Frame loop defaults.
pub const DEFAULT_INTERVAL_MS: u64 = 20;
pub const DEFAULT_FPS: u32 = 30;
pub const DEFAULT_DPI: u32 = 300;
pub const DEFAULT_FORMAT: &str = "gif";

// Output file stem; the extension is the output format.
pub const OUTPUT_FILE_STEM: &str = "Animation";
pub const PREVIEW_FILE_NAME: &str = "Animation_preview.png";

// Figure size in inches; pixel size is inches * dpi.
pub const FIGURE_WIDTH_IN: f64 = 6.4;
pub const FIGURE_HEIGHT_IN: f64 = 4.8;
pub const LIVE_PREVIEW_DPI: u32 = 100;

// Auto-range padding: 15% of the span, or a fixed amount for flat data.
pub const AUTO_RANGE_PADDING_RATIO: f64 = 0.15;
pub const AUTO_RANGE_FLAT_PADDING: f64 = 0.5;

// Stroke widths for lines
pub const LINE_WIDTH_PLOT: u32 = 2;
pub const LINE_WIDTH_LEGEND: u32 = 2;

// Dash patterns, in samples: (drawn, skipped).
pub const DASH_PATTERN_SAMPLES: (usize, usize) = (8, 5);
pub const DOT_PATTERN_SAMPLES: (usize, usize) = (2, 3);

// Chart layout, in pixels at 100 dpi; scaled with the figure dpi.
pub const CHART_MARGIN_PX: u32 = 10;
pub const X_LABEL_AREA_PX: u32 = 40;
pub const Y_LABEL_AREA_PX: u32 = 50;

// Font sizes at 100 dpi.
pub const FONT_SIZE_CHART_TITLE: i32 = 18;
pub const FONT_SIZE_AXIS_LABEL: i32 = 12;
pub const FONT_SIZE_LEGEND: i32 = 12;

pub const GRID_COLOR: RGBColor = GREY_400;

// src/constants.rs
