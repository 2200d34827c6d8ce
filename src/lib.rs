// src/lib.rs - Library interface

pub mod animation;
pub mod config;
pub mod constants;
pub mod error;
pub mod font_config;
pub mod lines;
pub mod plot_framework;
pub mod renderer;
pub mod types;

pub use animation::{
    AnimationController, AxisExtent, ControllerState, Domain, LineOptions, Padding, RunOptions,
    RunSummary,
};
pub use error::{AnimateError, Result};
pub use plot_framework::{AxesAttrs, DashStyle, LineStyle, PlottersRenderer};
pub use renderer::{FrameTarget, LineHandle, RecordingRenderer, Renderer};

pub fn crate_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
