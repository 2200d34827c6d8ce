// src/animation/line.rs

use ndarray::Array1;

use crate::animation::domain::Domain;
use crate::error::{AnimateError, Result};
use crate::plot_framework::LineStyle;
use crate::renderer::LineHandle;
use crate::types::LineFn;

/// Per-line options given at registration.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LineOptions {
    /// Swap the horizontal and vertical roles of the line.
    pub inverted: bool,
    /// Frames the reveal is held back before it starts advancing.
    pub delay: Option<usize>,
    pub style: LineStyle,
}

impl LineOptions {
    pub fn inverted(mut self, inverted: bool) -> Self {
        self.inverted = inverted;
        self
    }

    pub fn delay(mut self, frames: usize) -> Self {
        self.delay = Some(frames);
        self
    }

    pub fn style(mut self, style: LineStyle) -> Self {
        self.style = style;
        self
    }
}

/// Converts a delay in seconds into frames at the given frame interval.
pub fn delay_frames(seconds: f64, interval_ms: u64) -> usize {
    if seconds.is_nan() || seconds <= 0.0 || interval_ms == 0 {
        return 0;
    }
    (seconds * 1000.0 / interval_ms as f64).ceil() as usize
}

/// One registered line and its animation state.
pub struct LineRecord {
    func: LineFn,
    pub(crate) inverted: bool,
    pub(crate) delay: Option<usize>,
    pub(crate) style: LineStyle,
    pub(crate) handle: Option<LineHandle>,
    held_count: usize,
    reveal: usize,
    // Function values over the current domain
    values: Option<Array1<f64>>,
}

impl LineRecord {
    pub(crate) fn new(func: LineFn, options: LineOptions) -> Self {
        Self {
            func,
            inverted: options.inverted,
            delay: options.delay.filter(|&frames| frames > 0),
            style: options.style,
            handle: None,
            held_count: 0,
            reveal: 0,
            values: None,
        }
    }

    pub fn inverted(&self) -> bool {
        self.inverted
    }

    pub fn delay(&self) -> Option<usize> {
        self.delay
    }

    pub fn style(&self) -> &LineStyle {
        &self.style
    }

    pub fn handle(&self) -> Option<LineHandle> {
        self.handle
    }

    /// Hold ticks elapsed so far in the current cycle.
    pub fn held_count(&self) -> usize {
        self.held_count
    }

    /// Samples last handed to the renderer.
    pub fn reveal(&self) -> usize {
        self.reveal
    }

    /// Decides this tick's reveal count. `None` while the line is held back;
    /// its displayed data then stays as it was.
    pub(crate) fn schedule(&mut self, frame_index: usize, frame_count: usize) -> Option<usize> {
        match self.delay {
            Some(delay) if frame_index < delay => {
                self.held_count = (self.held_count + 1).min(delay);
                None
            }
            delay => {
                let reveal = frame_index
                    .saturating_sub(delay.unwrap_or(0))
                    .min(frame_count);
                self.reveal = reveal;
                Some(reveal)
            }
        }
    }

    /// Function values over `domain`, evaluated once per domain.
    pub(crate) fn evaluate(&mut self, index: usize, domain: &Domain) -> Result<&Array1<f64>> {
        let values = match self.values.take() {
            Some(values) => values,
            None => {
                let values = (self.func)(domain.values());
                if values.len() != domain.len() {
                    return Err(AnimateError::ShapeMismatch {
                        index,
                        expected: domain.len(),
                        actual: values.len(),
                    });
                }
                values
            }
        };
        Ok(self.values.insert(values))
    }

    pub(crate) fn invalidate(&mut self) {
        self.values = None;
    }

    pub(crate) fn rewind(&mut self) {
        self.held_count = 0;
        self.reveal = 0;
    }
}

impl std::fmt::Debug for LineRecord {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LineRecord")
            .field("inverted", &self.inverted)
            .field("delay", &self.delay)
            .field("style", &self.style)
            .field("handle", &self.handle)
            .field("held_count", &self.held_count)
            .field("reveal", &self.reveal)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn identity() -> LineFn {
        Box::new(|x: &Array1<f64>| x.clone())
    }

    #[test]
    fn test_undelayed_reveal_follows_frame_index() {
        let mut line = LineRecord::new(identity(), LineOptions::default());
        for frame in 0..=100 {
            assert_eq!(line.schedule(frame, 100), Some(frame));
        }
        // Clamped to the frame count past the end of the domain
        assert_eq!(line.schedule(130, 100), Some(100));
        assert_eq!(line.held_count(), 0);
    }

    #[test]
    fn test_delayed_line_holds_then_advances() {
        let mut line = LineRecord::new(identity(), LineOptions::default().delay(5));
        for frame in 0..5 {
            assert_eq!(line.schedule(frame, 20), None);
            assert_eq!(line.held_count(), frame + 1);
        }
        assert_eq!(line.schedule(5, 20), Some(0));
        assert_eq!(line.schedule(6, 20), Some(1));
        assert_eq!(line.schedule(25, 20), Some(20));
        assert_eq!(line.held_count(), 5);
    }

    #[test]
    fn test_zero_delay_is_no_delay() {
        let mut line = LineRecord::new(identity(), LineOptions::default().delay(0));
        assert_eq!(line.delay(), None);
        assert_eq!(line.schedule(0, 10), Some(0));
        assert_eq!(line.held_count(), 0);
    }

    #[test]
    fn test_rewind_resets_counters() {
        let mut line = LineRecord::new(identity(), LineOptions::default().delay(3));
        for frame in 0..6 {
            line.schedule(frame, 10);
        }
        assert_eq!(line.reveal(), 2);
        line.rewind();
        assert_eq!(line.reveal(), 0);
        assert_eq!(line.held_count(), 0);
    }

    #[test]
    fn test_evaluate_checks_length() {
        let domain = Domain::linspace(0.0, 1.0, 4).unwrap();
        let mut line = LineRecord::new(
            Box::new(|_x: &Array1<f64>| Array1::<f64>::zeros(2)),
            LineOptions::default(),
        );
        match line.evaluate(7, &domain) {
            Err(AnimateError::ShapeMismatch {
                index,
                expected,
                actual,
            }) => assert_eq!((index, expected, actual), (7, 4, 2)),
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[test]
    fn test_delay_frames_from_seconds() {
        assert_eq!(delay_frames(1.0, 20), 50);
        assert_eq!(delay_frames(0.03, 20), 2);
        assert_eq!(delay_frames(0.0, 20), 0);
        assert_eq!(delay_frames(1.0, 0), 0);
    }

    #[test]
    fn test_delay_frames_non_finite() {
        assert_eq!(delay_frames(f64::NAN, 20), 0);
        assert_eq!(delay_frames(f64::NEG_INFINITY, 20), 0);
        // Saturates; registration rejects it
        assert_eq!(delay_frames(f64::INFINITY, 20), usize::MAX);
        assert_eq!(delay_frames(1e30, 20), usize::MAX);
    }
}

// src/animation/line.rs
