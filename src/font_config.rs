// src/font_config.rs

// Font styles for chart text. Sizes in constants.rs are given at 100 dpi and
// scaled here so text keeps its physical size at any output resolution.

use crate::constants::{FONT_SIZE_AXIS_LABEL, FONT_SIZE_CHART_TITLE, FONT_SIZE_LEGEND};

/// Font family name for default system fonts
pub const FONT_FAMILY_SYSTEM: &str = "sans-serif";

/// Represents a font style (family + size)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FontStyle {
    pub family: &'static str,
    pub size: i32,
}

impl FontStyle {
    /// Scales the 100 dpi size to `dpi`, never below 1px.
    pub fn at_dpi(self, dpi: u32) -> (&'static str, i32) {
        let size = (self.size as f64 * dpi as f64 / 100.0).round() as i32;
        (self.family, size.max(1))
    }
}

pub const FONT_CHART_TITLE: FontStyle = FontStyle {
    family: FONT_FAMILY_SYSTEM,
    size: FONT_SIZE_CHART_TITLE,
};

pub const FONT_AXIS_LABEL: FontStyle = FontStyle {
    family: FONT_FAMILY_SYSTEM,
    size: FONT_SIZE_AXIS_LABEL,
};

pub const FONT_LEGEND: FontStyle = FontStyle {
    family: FONT_FAMILY_SYSTEM,
    size: FONT_SIZE_LEGEND,
};


// src/font_config.rs
