// src/animation/controller.rs

use ndarray::{s, Array1};
use ndarray_stats::QuantileExt;
use std::collections::BTreeMap;
use tracing::{debug, info, trace, warn};

use crate::animation::domain::{AxisExtent, Domain, Padding};
use crate::animation::line::{LineOptions, LineRecord};
use crate::constants::DEFAULT_MAX_PLOTS;
use crate::error::{AnimateError, Result};
use crate::plot_framework::{calculate_range, AxesAttrs, LineStyle};
use crate::renderer::{LineHandle, Renderer};
use crate::types::LineFn;

/// Lifecycle of a controller. There is no way back from `Running`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControllerState {
    /// No line registered yet.
    Unconfigured,
    /// Lines registered, ready to run.
    Configured,
    Running,
    /// A live, repeating run stopped after its last cycle.
    Idle,
    /// The file was saved or a non-repeating run ran out of frames.
    Terminated,
}

/// Holds registered functions and their configuration, and decides, frame by
/// frame, how much of every line the renderer shows.
pub struct AnimationController<R: Renderer> {
    pub(crate) renderer: R,
    pub(crate) lines: Vec<LineRecord>,
    // Styles set for indices that have no line yet
    pending_styles: BTreeMap<usize, LineStyle>,
    max_plots: usize,
    pub(crate) domain: Domain,
    y_extent: Option<AxisExtent>,
    axes: AxesAttrs,
    pub(crate) state: ControllerState,
}

impl<R: Renderer> AnimationController<R> {
    pub fn new(renderer: R) -> Self {
        Self::with_max_plots(renderer, DEFAULT_MAX_PLOTS)
    }

    pub fn with_max_plots(mut renderer: R, max_plots: usize) -> Self {
        let domain = Domain::default();
        renderer.set_x_extent(Padding::default().extent(domain.min(), domain.max()));
        Self {
            renderer,
            lines: Vec::new(),
            pending_styles: BTreeMap::new(),
            max_plots,
            domain,
            y_extent: None,
            axes: AxesAttrs::default(),
            state: ControllerState::Unconfigured,
        }
    }

    pub fn state(&self) -> ControllerState {
        self.state
    }

    pub fn max_plots(&self) -> usize {
        self.max_plots
    }

    pub fn lines(&self) -> &[LineRecord] {
        &self.lines
    }

    pub fn line_count(&self) -> usize {
        self.lines.len()
    }

    pub fn domain(&self) -> &Domain {
        &self.domain
    }

    pub fn y_extent(&self) -> Option<AxisExtent> {
        self.y_extent
    }

    pub fn axes_attrs(&self) -> &AxesAttrs {
        &self.axes
    }

    pub fn renderer(&self) -> &R {
        &self.renderer
    }

    pub fn renderer_mut(&mut self) -> &mut R {
        &mut self.renderer
    }

    pub fn into_renderer(self) -> R {
        self.renderer
    }

    /// Reveal counts last handed to the renderer, in registration order.
    pub fn reveal_counts(&self) -> Vec<usize> {
        self.lines.iter().map(LineRecord::reveal).collect()
    }

    fn ensure_configurable(&self) -> Result<()> {
        match self.state {
            ControllerState::Unconfigured | ControllerState::Configured => Ok(()),
            frozen => Err(AnimateError::Frozen(frozen)),
        }
    }

    /// Registers a function with default options.
    pub fn register<F>(&mut self, func: F) -> Result<&mut Self>
    where
        F: Fn(&Array1<f64>) -> Array1<f64> + 'static,
    {
        self.register_with(func, LineOptions::default())
    }

    /// Registers a function with inversion, delay and style options.
    pub fn register_with<F>(&mut self, func: F, options: LineOptions) -> Result<&mut Self>
    where
        F: Fn(&Array1<f64>) -> Array1<f64> + 'static,
    {
        self.ensure_configurable()?;
        self.check_capacity(1)?;
        if let Some(delay) = options.delay {
            check_delay(delay, self.domain.len())?;
        }
        self.push_line(Box::new(func), options);
        Ok(self)
    }

    /// Registers a batch of functions. Either all of them fit or none is added.
    pub fn register_all(&mut self, funcs: Vec<LineFn>) -> Result<&mut Self> {
        self.ensure_configurable()?;
        self.check_capacity(funcs.len())?;
        for func in funcs {
            self.push_line(func, LineOptions::default());
        }
        Ok(self)
    }

    fn check_capacity(&self, additional: usize) -> Result<()> {
        if self.lines.len() + additional > self.max_plots {
            warn!(
                "Cannot register {} more line(s): {} of {} slots used.",
                additional,
                self.lines.len(),
                self.max_plots
            );
            return Err(AnimateError::CapacityExceeded {
                max_plots: self.max_plots,
            });
        }
        Ok(())
    }

    fn push_line(&mut self, func: LineFn, options: LineOptions) {
        let index = self.lines.len();
        let mut style = self.pending_styles.remove(&index).unwrap_or_default();
        style.merge(&options.style);
        let line = LineRecord::new(func, LineOptions { style, ..options });
        debug!(
            "Registered line {index} (inverted: {}, delay: {:?}).",
            line.inverted, line.delay
        );
        self.lines.push(line);
        self.state = ControllerState::Configured;
    }

    /// Sets the shared domain: `frame_count` evenly spaced samples from `min`
    /// to `max`, one per frame. The horizontal extent becomes
    /// `[min - low, max + high]`.
    pub fn set_domain<P>(
        &mut self,
        min: f64,
        max: f64,
        frame_count: usize,
        padding: P,
    ) -> Result<&mut Self>
    where
        P: TryInto<Padding, Error = AnimateError>,
    {
        self.ensure_configurable()?;
        let padding = padding.try_into()?;
        let domain = Domain::linspace(min, max, frame_count)?;
        if let Some(delay) = self.max_delay() {
            check_delay(delay, frame_count)?;
        }

        self.domain = domain;
        self.renderer.set_x_extent(padding.extent(min, max));
        for line in &mut self.lines {
            line.invalidate();
        }
        info!("Domain set to [{min}, {max}] over {frame_count} frames.");
        Ok(self)
    }

    /// Sets the vertical extent to `[min - low, max + high]`.
    pub fn set_range<P>(&mut self, min: f64, max: f64, padding: P) -> Result<&mut Self>
    where
        P: TryInto<Padding, Error = AnimateError>,
    {
        self.ensure_configurable()?;
        let padding = padding.try_into()?;
        let extent = padding.extent(min, max);
        self.y_extent = Some(extent);
        self.renderer.set_y_extent(extent);
        Ok(self)
    }

    /// Merges style attributes into the line at `index`, which may be
    /// registered later.
    pub fn set_plot_attrs(&mut self, index: usize, style: LineStyle) -> Result<&mut Self> {
        self.ensure_configurable()?;
        if index >= self.max_plots {
            return Err(AnimateError::InvalidPlotIndex {
                index,
                max_plots: self.max_plots,
            });
        }
        match self.lines.get_mut(index) {
            Some(line) => {
                line.style.merge(&style);
                if let Some(handle) = line.handle {
                    self.renderer.set_line_style(handle, &line.style)?;
                }
            }
            None => self.pending_styles.entry(index).or_default().merge(&style),
        }
        Ok(self)
    }

    pub fn set_axes_attrs(&mut self, attrs: AxesAttrs) -> Result<&mut Self> {
        self.ensure_configurable()?;
        self.axes.merge(&attrs);
        self.renderer.set_axes_attrs(&self.axes);
        Ok(self)
    }

    pub(crate) fn has_delays(&self) -> bool {
        self.lines.iter().any(|line| line.delay.is_some())
    }

    fn max_delay(&self) -> Option<usize> {
        self.lines.iter().filter_map(|line| line.delay).max()
    }

    /// Frames in one run: the domain length, extended so the most delayed
    /// line still reaches its full reveal.
    pub fn compute_total_frames(&self) -> usize {
        let frame_count = self.domain.len();
        match self.max_delay() {
            Some(max_delay) => frame_count.saturating_add(max_delay).saturating_add(1),
            None => frame_count,
        }
    }

    /// Creates renderer artists for lines that have none yet.
    pub(crate) fn attach_lines(&mut self) -> Result<()> {
        for line in self.lines.iter_mut().filter(|line| line.handle.is_none()) {
            line.handle = Some(self.renderer.add_line(&line.style)?);
        }
        Ok(())
    }

    /// Updates every line for `frame_index` and returns the handles of the
    /// lines whose data changed.
    pub fn advance(&mut self, frame_index: usize) -> Result<Vec<LineHandle>> {
        self.attach_lines()?;
        let frame_count = self.domain.len();
        let mut updated = Vec::with_capacity(self.lines.len());

        for (index, line) in self.lines.iter_mut().enumerate() {
            let Some(reveal) = line.schedule(frame_index, frame_count) else {
                continue;
            };
            let Some(handle) = line.handle else {
                continue;
            };
            let inverted = line.inverted;

            let xs = self.domain.values().slice(s![..reveal]);
            let ys = line.evaluate(index, &self.domain)?.slice(s![..reveal]);
            if inverted {
                self.renderer.set_line_data(handle, ys, xs)?;
            } else {
                self.renderer.set_line_data(handle, xs, ys)?;
            }
            updated.push(handle);
        }

        trace!("Frame {frame_index}: {} line(s) updated.", updated.len());
        Ok(updated)
    }

    /// Resets every line to its start-of-run state and clears its data.
    pub fn rewind(&mut self) -> Result<()> {
        let empty = self.domain.values().slice(s![..0]);
        for line in &mut self.lines {
            line.rewind();
            if let Some(handle) = line.handle {
                self.renderer.set_line_data(handle, empty, empty)?;
            }
        }
        Ok(())
    }

    /// Fits the vertical extent to the data when `set_range` was never called.
    pub(crate) fn fit_y_extent(&mut self) -> Result<()> {
        if self.y_extent.is_some() {
            return Ok(());
        }
        let mut lo = f64::INFINITY;
        let mut hi = f64::NEG_INFINITY;
        for (index, line) in self.lines.iter_mut().enumerate() {
            let inverted = line.inverted;
            let values = line.evaluate(index, &self.domain)?;
            // Inverted lines put the domain on the vertical axis
            let vertical = if inverted {
                self.domain.values()
            } else {
                values
            };
            lo = lo.min(*vertical.min_skipnan());
            hi = hi.max(*vertical.max_skipnan());
        }
        if !lo.is_finite() || !hi.is_finite() {
            warn!("No finite values to fit the vertical extent; keeping the renderer default.");
            return Ok(());
        }
        let (min, max) = calculate_range(lo, hi);
        let extent = AxisExtent::new(min, max);
        debug!("Vertical extent fitted to [{min:.3}, {max:.3}].");
        self.y_extent = Some(extent);
        self.renderer.set_y_extent(extent);
        Ok(())
    }
}

/// A delayed run lasts `frame_count + delay + 1` frames; that count must fit.
fn check_delay(delay: usize, frame_count: usize) -> Result<()> {
    match frame_count.checked_add(delay).and_then(|n| n.checked_add(1)) {
        Some(_) => Ok(()),
        None => Err(AnimateError::DelayOutOfRange { delay, frame_count }),
    }
}


// src/animation/controller.rs
