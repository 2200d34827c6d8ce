// src/lines.rs

// Constant lines and the named functions the CLI can animate.

use ndarray::Array1;
use std::str::FromStr;

use crate::types::LineFn;

/// Vertical line `x = k`. Register it inverted: the constant then lands on
/// the horizontal axis while the domain sweeps the vertical one.
pub fn vline(k: f64) -> impl Fn(&Array1<f64>) -> Array1<f64> {
    constant(k)
}

/// Horizontal line `y = k`.
pub fn hline(k: f64) -> impl Fn(&Array1<f64>) -> Array1<f64> {
    constant(k)
}

fn constant(k: f64) -> impl Fn(&Array1<f64>) -> Array1<f64> {
    move |samples: &Array1<f64>| Array1::from_elem(samples.len(), k)
}

/// Functions selectable by name on the command line.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum BuiltinFunction {
    Sin,
    Cos,
    /// `e^-x`
    Exp,
    /// `sin(x^2)`
    Sin2,
    Identity,
    Square,
    Vline(f64),
    Hline(f64),
}

impl BuiltinFunction {
    pub fn into_fn(self) -> LineFn {
        match self {
            BuiltinFunction::Sin => Box::new(|x: &Array1<f64>| x.mapv(f64::sin)),
            BuiltinFunction::Cos => Box::new(|x: &Array1<f64>| x.mapv(f64::cos)),
            BuiltinFunction::Exp => Box::new(|x: &Array1<f64>| x.mapv(|v| (-v).exp())),
            BuiltinFunction::Sin2 => Box::new(|x: &Array1<f64>| x.mapv(|v| (v * v).sin())),
            BuiltinFunction::Identity => Box::new(|x: &Array1<f64>| x.clone()),
            BuiltinFunction::Square => Box::new(|x: &Array1<f64>| x.mapv(|v| v * v)),
            BuiltinFunction::Vline(k) => Box::new(vline(k)),
            BuiltinFunction::Hline(k) => Box::new(hline(k)),
        }
    }

    /// Vertical lines only make sense drawn inverted.
    pub fn wants_inversion(&self) -> bool {
        matches!(self, BuiltinFunction::Vline(_))
    }

    pub fn name(&self) -> String {
        match self {
            BuiltinFunction::Sin => "sin(x)".to_string(),
            BuiltinFunction::Cos => "cos(x)".to_string(),
            BuiltinFunction::Exp => "exp(-x)".to_string(),
            BuiltinFunction::Sin2 => "sin(x²)".to_string(),
            BuiltinFunction::Identity => "x".to_string(),
            BuiltinFunction::Square => "x²".to_string(),
            BuiltinFunction::Vline(k) => format!("x = {k}"),
            BuiltinFunction::Hline(k) => format!("y = {k}"),
        }
    }
}

impl FromStr for BuiltinFunction {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim().to_ascii_lowercase();
        if let Some((kind, value)) = s.split_once('=') {
            let k: f64 = value
                .trim()
                .parse()
                .map_err(|_| format!("invalid constant '{value}' for {kind}"))?;
            return match kind.trim() {
                "vline" => Ok(BuiltinFunction::Vline(k)),
                "hline" => Ok(BuiltinFunction::Hline(k)),
                other => Err(format!("'{other}' takes no constant")),
            };
        }
        match s.as_str() {
            "sin" | "sine" => Ok(BuiltinFunction::Sin),
            "cos" | "cosine" => Ok(BuiltinFunction::Cos),
            "exp" => Ok(BuiltinFunction::Exp),
            "sin2" => Ok(BuiltinFunction::Sin2),
            "identity" | "x" => Ok(BuiltinFunction::Identity),
            "square" => Ok(BuiltinFunction::Square),
            other => Err(format!(
                "unknown function '{other}' (expected sin, cos, exp, sin2, identity, square, vline=<k>, hline=<k>)"
            )),
        }
    }
}


// src/lines.rs
