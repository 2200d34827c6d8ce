// src/config.rs

use serde::Deserialize;
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::animation::engine::RunOptions;
use crate::constants::{
    DEFAULT_DPI, DEFAULT_FORMAT, DEFAULT_FPS, DEFAULT_INTERVAL_MS, DEFAULT_MAX_PLOTS,
    FIGURE_HEIGHT_IN, FIGURE_WIDTH_IN,
};
use crate::error::Result;

/// Render settings read from a TOML file. Missing keys keep their defaults.
///
/// ```toml
/// interval_ms = 5
/// fps = 24
/// dpi = 150
/// format = "gif"
/// repeat = true
/// max_plots = 12
/// figure_width_in = 8.0
/// figure_height_in = 4.5
/// output_dir = "renders"
/// ```
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RenderSettings {
    pub interval_ms: u64,
    pub fps: u32,
    pub dpi: u32,
    pub format: String,
    pub repeat: bool,
    pub max_plots: usize,
    pub figure_width_in: f64,
    pub figure_height_in: f64,
    pub output_dir: Option<PathBuf>,
}

impl Default for RenderSettings {
    fn default() -> Self {
        Self {
            interval_ms: DEFAULT_INTERVAL_MS,
            fps: DEFAULT_FPS,
            dpi: DEFAULT_DPI,
            format: DEFAULT_FORMAT.to_string(),
            repeat: true,
            max_plots: DEFAULT_MAX_PLOTS,
            figure_width_in: FIGURE_WIDTH_IN,
            figure_height_in: FIGURE_HEIGHT_IN,
            output_dir: None,
        }
    }
}

impl RenderSettings {
    pub fn from_toml_str(text: &str) -> Result<Self> {
        Ok(toml::from_str(text)?)
    }

    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        let settings = Self::from_toml_str(&text)?;
        debug!("Loaded render settings from '{}': {:?}", path.display(), settings);
        Ok(settings)
    }

    /// Run options carrying these settings; `save` and `max_cycles` are left
    /// for the caller.
    pub fn run_options(&self) -> RunOptions {
        RunOptions {
            interval_ms: self.interval_ms,
            repeat: self.repeat,
            output_dir: self.output_dir.clone(),
            format: self.format.clone(),
            fps: self.fps,
            dpi: self.dpi,
            ..RunOptions::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::AnimateError;
    use std::io::Write;

    #[test]
    fn test_partial_file_keeps_defaults() {
        let settings = RenderSettings::from_toml_str("fps = 12\nrepeat = false\n").unwrap();
        assert_eq!(settings.fps, 12);
        assert!(!settings.repeat);
        assert_eq!(settings.dpi, DEFAULT_DPI);
        assert_eq!(settings.format, "gif");
    }

    #[test]
    fn test_unknown_key_rejected() {
        assert!(matches!(
            RenderSettings::from_toml_str("frames_per_second = 12"),
            Err(AnimateError::Config(_))
        ));
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "interval_ms = 5\noutput_dir = \"renders\"").unwrap();
        let settings = RenderSettings::load(file.path()).unwrap();
        let options = settings.run_options();
        assert_eq!(options.interval_ms, 5);
        assert_eq!(options.output_path(), PathBuf::from("renders/Animation.gif"));
        assert!(!options.save);
    }
}

// src/config.rs
