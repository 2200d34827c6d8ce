// src/error.rs

use crate::animation::controller::ControllerState;

/// Errors raised while configuring or running an animation.
///
/// Configuration and run-start errors are raised before any state is mutated
/// and before any frame is rendered.
#[derive(Debug, thiserror::Error)]
pub enum AnimateError {
    #[error("Maximum number of plots reached ({max_plots}). Raise max_plots to add more.")]
    CapacityExceeded { max_plots: usize },

    #[error("Padding should either be a number or a pair of numbers, got {len} values.")]
    InvalidPadding { len: usize },

    #[error("Delayed lines cannot be saved with repeat disabled: the delayed part would be truncated.")]
    IncompatibleDelayConfig,

    #[error("Plot index {index} is out of range (max_plots = {max_plots}).")]
    InvalidPlotIndex { index: usize, max_plots: usize },

    #[error("Delay of {delay} frames cannot be scheduled over {frame_count} frames.")]
    DelayOutOfRange { delay: usize, frame_count: usize },

    #[error("Frame count must be at least 1.")]
    InvalidFrameCount,

    #[error("Line {index} produced {actual} samples, expected {expected}.")]
    ShapeMismatch {
        index: usize,
        expected: usize,
        actual: usize,
    },

    #[error("Configuration is frozen while the controller is {0:?}.")]
    Frozen(ControllerState),

    #[error("No functions registered.")]
    NoLines,

    #[error("Unsupported output format '{0}'.")]
    UnsupportedFormat(String),

    #[error("Render error: {0}")]
    Render(String),

    #[error("Config error: {0}")]
    Config(#[from] toml::de::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, AnimateError>;

/// Stringifies a plotters drawing error.
pub(crate) fn render_err<E: std::fmt::Display>(err: E) -> AnimateError {
    AnimateError::Render(err.to_string())
}

// src/error.rs
