// src/animation/domain.rs

use ndarray::Array1;

use crate::constants::{DEFAULT_DOMAIN_MAX, DEFAULT_DOMAIN_MIN, DEFAULT_FRAME_COUNT};
use crate::error::{AnimateError, Result};

/// The shared horizontal sample points every line is evaluated over.
/// One sample per animation frame.
#[derive(Debug, Clone, PartialEq)]
pub struct Domain {
    min: f64,
    max: f64,
    values: Array1<f64>,
}

impl Default for Domain {
    fn default() -> Self {
        Self {
            min: DEFAULT_DOMAIN_MIN,
            max: DEFAULT_DOMAIN_MAX,
            values: Array1::linspace(DEFAULT_DOMAIN_MIN, DEFAULT_DOMAIN_MAX, DEFAULT_FRAME_COUNT),
        }
    }
}

impl Domain {
    /// Evenly spaced `frame_count` samples from `min` to `max`, both inclusive.
    pub fn linspace(min: f64, max: f64, frame_count: usize) -> Result<Self> {
        if frame_count == 0 {
            return Err(AnimateError::InvalidFrameCount);
        }
        Ok(Self {
            min,
            max,
            values: Array1::linspace(min, max, frame_count),
        })
    }

    pub fn min(&self) -> f64 {
        self.min
    }

    pub fn max(&self) -> f64 {
        self.max
    }

    pub fn values(&self) -> &Array1<f64> {
        &self.values
    }

    /// Number of samples, which is also the frame count.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

/// Axis padding around a `[min, max]` range.
///
/// Built from a single number (same padding on both sides) or from a pair
/// `(low, high)`. Slices and vectors convert only when they hold exactly two
/// values; anything else is `InvalidPadding`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Padding {
    Uniform(f64),
    Split { low: f64, high: f64 },
}

impl Padding {
    pub fn low(&self) -> f64 {
        match *self {
            Padding::Uniform(p) => p,
            Padding::Split { low, .. } => low,
        }
    }

    pub fn high(&self) -> f64 {
        match *self {
            Padding::Uniform(p) => p,
            Padding::Split { high, .. } => high,
        }
    }

    /// Applies the padding to `[min, max]`.
    pub fn extent(&self, min: f64, max: f64) -> AxisExtent {
        AxisExtent::new(min - self.low(), max + self.high())
    }
}

impl Default for Padding {
    fn default() -> Self {
        Padding::Uniform(0.0)
    }
}

// No `From` impls here: they would bring the blanket `TryFrom` with an
// `Infallible` error and conflict with the impls below.
impl TryFrom<f64> for Padding {
    type Error = AnimateError;

    fn try_from(p: f64) -> Result<Self> {
        Ok(Padding::Uniform(p))
    }
}

impl TryFrom<i32> for Padding {
    type Error = AnimateError;

    fn try_from(p: i32) -> Result<Self> {
        Ok(Padding::Uniform(p as f64))
    }
}

impl TryFrom<(f64, f64)> for Padding {
    type Error = AnimateError;

    fn try_from((low, high): (f64, f64)) -> Result<Self> {
        Ok(Padding::Split { low, high })
    }
}

impl TryFrom<&[f64]> for Padding {
    type Error = AnimateError;

    fn try_from(values: &[f64]) -> Result<Self> {
        match values {
            [low, high] => Ok(Padding::Split {
                low: *low,
                high: *high,
            }),
            _ => Err(AnimateError::InvalidPadding { len: values.len() }),
        }
    }
}

impl TryFrom<Vec<f64>> for Padding {
    type Error = AnimateError;

    fn try_from(values: Vec<f64>) -> Result<Self> {
        Padding::try_from(values.as_slice())
    }
}

/// Visible range of one axis.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AxisExtent {
    pub min: f64,
    pub max: f64,
}

impl AxisExtent {
    pub fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }

    /// A drawable range: ordered, and widened when it collapses to a point.
    pub fn to_range(&self) -> std::ops::Range<f64> {
        let (lo, hi) = if self.min <= self.max {
            (self.min, self.max)
        } else {
            (self.max, self.min)
        };
        if (hi - lo).abs() < 1e-12 {
            (lo - 0.5)..(hi + 0.5)
        } else {
            lo..hi
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_linspace_endpoints_and_length() {
        let domain = Domain::linspace(0.0, 10.0, 500).unwrap();
        assert_eq!(domain.len(), 500);
        assert_relative_eq!(domain.values()[0], 0.0);
        assert_relative_eq!(domain.values()[499], 10.0);
        assert!(domain.values().windows(2).into_iter().all(|w| w[1] > w[0]));
    }

    #[test]
    fn test_default_domain() {
        let domain = Domain::default();
        assert_eq!(domain.len(), 100);
        assert_relative_eq!(domain.values()[99], 5.0);
    }

    #[test]
    fn test_zero_frames_rejected() {
        assert!(matches!(
            Domain::linspace(0.0, 1.0, 0),
            Err(AnimateError::InvalidFrameCount)
        ));
    }

    #[test]
    fn test_padding_shapes() {
        assert_eq!(Padding::try_from(1.5_f64).unwrap(), Padding::Uniform(1.5));
        assert_eq!(Padding::try_from(2_i32).unwrap(), Padding::Uniform(2.0));
        assert_eq!(
            Padding::try_from((0.5, 1.0)).unwrap(),
            Padding::Split { low: 0.5, high: 1.0 }
        );
        assert_eq!(
            Padding::try_from(vec![0.5, 1.0]).unwrap(),
            Padding::Split { low: 0.5, high: 1.0 }
        );
        for bad in [vec![], vec![1.0], vec![1.0, 2.0, 3.0]] {
            let len = bad.len();
            match Padding::try_from(bad) {
                Err(AnimateError::InvalidPadding { len: got }) => assert_eq!(got, len),
                other => panic!("unexpected result: {:?}", other),
            }
        }
    }

    #[test]
    fn test_padding_extent() {
        let extent = Padding::Uniform(1.0).extent(0.0, 10.0);
        assert_eq!(extent, AxisExtent::new(-1.0, 11.0));
        let extent = Padding::Split { low: 0.5, high: 2.0 }.extent(-3.0, 2.0);
        assert_eq!(extent, AxisExtent::new(-3.5, 4.0));
    }

    #[test]
    fn test_extent_range_is_drawable() {
        assert_eq!(AxisExtent::new(2.0, -1.0).to_range(), -1.0..2.0);
        assert_eq!(AxisExtent::new(3.0, 3.0).to_range(), 2.5..3.5);
    }
}

// src/animation/domain.rs
