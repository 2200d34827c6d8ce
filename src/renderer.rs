// src/renderer.rs

use ndarray::ArrayView1;
use std::path::PathBuf;

use crate::animation::domain::AxisExtent;
use crate::error::{AnimateError, Result};
use crate::plot_framework::{AxesAttrs, LineStyle};
use crate::types::LinePoints;

/// Identifies a line artist owned by a renderer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct LineHandle(usize);

impl LineHandle {
    pub fn new(index: usize) -> Self {
        Self(index)
    }

    pub fn index(&self) -> usize {
        self.0
    }
}

/// Where presented frames go.
#[derive(Debug, Clone, PartialEq)]
pub enum FrameTarget {
    /// Encode every frame into one animation file.
    File { path: PathBuf, fps: u32, dpi: u32 },
    /// Show frames as they are produced.
    Live { path: PathBuf, dpi: u32 },
}

/// The drawing collaborator driven by the animation controller.
///
/// The controller decides what is visible; a renderer only keeps line data,
/// axis extents and attributes, and turns them into frames.
pub trait Renderer {
    /// Opens the frame target. Called once per run, before the first frame.
    fn begin(&mut self, target: &FrameTarget) -> Result<()>;

    /// Creates an empty line artist.
    fn add_line(&mut self, style: &LineStyle) -> Result<LineHandle>;

    fn set_line_style(&mut self, handle: LineHandle, style: &LineStyle) -> Result<()>;

    /// Replaces the line's visible data. Both views have the same length.
    fn set_line_data(
        &mut self,
        handle: LineHandle,
        xs: ArrayView1<'_, f64>,
        ys: ArrayView1<'_, f64>,
    ) -> Result<()>;

    fn set_x_extent(&mut self, extent: AxisExtent);

    fn set_y_extent(&mut self, extent: AxisExtent);

    fn set_axes_attrs(&mut self, attrs: &AxesAttrs);

    /// Draws the current state as frame `frame_index`.
    fn present_frame(&mut self, frame_index: usize) -> Result<()>;

    /// Flushes and closes the frame target.
    fn finish(&mut self) -> Result<()>;
}

/// A line as seen by [`RecordingRenderer`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RecordedLine {
    pub style: LineStyle,
    pub xs: Vec<f64>,
    pub ys: Vec<f64>,
    /// Number of `set_line_data` calls received.
    pub updates: usize,
}

impl RecordedLine {
    pub fn points(&self) -> LinePoints {
        (self.xs.clone(), self.ys.clone())
    }
}

/// Headless renderer that keeps the latest state of every line.
/// Backs `--dry-run` and the tests.
#[derive(Debug, Clone, Default)]
pub struct RecordingRenderer {
    pub target: Option<FrameTarget>,
    pub lines: Vec<RecordedLine>,
    pub x_extent: Option<AxisExtent>,
    pub y_extent: Option<AxisExtent>,
    pub axes: AxesAttrs,
    pub frames_presented: usize,
    pub finished: bool,
}

impl RecordingRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn line(&self, handle: LineHandle) -> Option<&RecordedLine> {
        self.lines.get(handle.index())
    }

    fn line_mut(&mut self, handle: LineHandle) -> Result<&mut RecordedLine> {
        self.lines
            .get_mut(handle.index())
            .ok_or_else(|| AnimateError::Render(format!("unknown line handle {handle:?}")))
    }
}

impl Renderer for RecordingRenderer {
    fn begin(&mut self, target: &FrameTarget) -> Result<()> {
        self.target = Some(target.clone());
        self.finished = false;
        Ok(())
    }

    fn add_line(&mut self, style: &LineStyle) -> Result<LineHandle> {
        self.lines.push(RecordedLine {
            style: style.clone(),
            ..RecordedLine::default()
        });
        Ok(LineHandle::new(self.lines.len() - 1))
    }

    fn set_line_style(&mut self, handle: LineHandle, style: &LineStyle) -> Result<()> {
        self.line_mut(handle)?.style = style.clone();
        Ok(())
    }

    fn set_line_data(
        &mut self,
        handle: LineHandle,
        xs: ArrayView1<'_, f64>,
        ys: ArrayView1<'_, f64>,
    ) -> Result<()> {
        let line = self.line_mut(handle)?;
        line.xs = xs.to_vec();
        line.ys = ys.to_vec();
        line.updates += 1;
        Ok(())
    }

    fn set_x_extent(&mut self, extent: AxisExtent) {
        self.x_extent = Some(extent);
    }

    fn set_y_extent(&mut self, extent: AxisExtent) {
        self.y_extent = Some(extent);
    }

    fn set_axes_attrs(&mut self, attrs: &AxesAttrs) {
        self.axes = attrs.clone();
    }

    fn present_frame(&mut self, _frame_index: usize) -> Result<()> {
        self.frames_presented += 1;
        Ok(())
    }

    fn finish(&mut self) -> Result<()> {
        self.finished = true;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    #[test]
    fn test_recording_keeps_latest_data() {
        let mut renderer = RecordingRenderer::new();
        let handle = renderer.add_line(&LineStyle::default()).unwrap();
        renderer
            .set_line_data(handle, array![1.0, 2.0].view(), array![3.0, 4.0].view())
            .unwrap();
        renderer
            .set_line_data(handle, array![5.0].view(), array![6.0].view())
            .unwrap();
        let line = renderer.line(handle).unwrap();
        assert_eq!(line.points(), (vec![5.0], vec![6.0]));
        assert_eq!(line.updates, 2);
    }

    #[test]
    fn test_unknown_handle_is_an_error() {
        let mut renderer = RecordingRenderer::new();
        let result = renderer.set_line_data(
            LineHandle::new(3),
            array![1.0].view(),
            array![1.0].view(),
        );
        assert!(matches!(result, Err(AnimateError::Render(_))));
    }
}

// src/renderer.rs
