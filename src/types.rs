// src/types.rs
// Type aliases shared by the controller, renderers and CLI

use ndarray::Array1;

/// A registered line function: evaluated over the whole domain, returning one
/// sample per domain point.
pub type LineFn = Box<dyn Fn(&Array1<f64>) -> Array1<f64>>;

/// Visible (horizontal, vertical) samples of one line, as last handed to a renderer.
pub type LinePoints = (Vec<f64>, Vec<f64>);

// src/types.rs
