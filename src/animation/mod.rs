// src/animation/mod.rs

pub mod controller;
pub mod domain;
pub mod engine;
pub mod line;

pub use controller::{AnimationController, ControllerState};
pub use domain::{AxisExtent, Domain, Padding};
pub use engine::{RunOptions, RunSummary};
pub use line::{delay_frames, LineOptions, LineRecord};

// src/animation/mod.rs
