// src/plot_framework.rs

use plotters::backend::{BitMapBackend, DrawingBackend};
use plotters::chart::{ChartBuilder, SeriesLabelPosition};
use plotters::coord::Shift;
use plotters::drawing::{DrawingArea, IntoDrawingArea};
use plotters::element::PathElement;
use plotters::series::LineSeries;
use plotters::style::colors::full_palette;
use plotters::style::colors::{BLACK, WHITE};
use plotters::style::{Color, RGBColor};

use ndarray::ArrayView1;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use tracing::{debug, info};

use crate::animation::domain::AxisExtent;
use crate::constants::{
    AUTO_RANGE_FLAT_PADDING, AUTO_RANGE_PADDING_RATIO, CHART_MARGIN_PX, DASH_PATTERN_SAMPLES,
    DOT_PATTERN_SAMPLES, FIGURE_HEIGHT_IN, FIGURE_WIDTH_IN, GRID_COLOR, LINE_WIDTH_LEGEND,
    LINE_WIDTH_PLOT, X_LABEL_AREA_PX, Y_LABEL_AREA_PX,
};
use crate::error::{render_err, AnimateError, Result};
use crate::font_config::{FONT_AXIS_LABEL, FONT_CHART_TITLE, FONT_LEGEND};
use crate::renderer::{FrameTarget, LineHandle, Renderer};

/// Calculate plot range with padding.
/// Adds 15% padding, or a fixed padding for very small ranges.
pub fn calculate_range(min_val: f64, max_val: f64) -> (f64, f64) {
    let (min, max) = if min_val <= max_val {
        (min_val, max_val)
    } else {
        (max_val, min_val)
    };
    let range = (max - min).abs();
    let padding = if range < 1e-6 {
        AUTO_RANGE_FLAT_PADDING
    } else {
        range * AUTO_RANGE_PADDING_RATIO
    };
    (min - padding, max + padding)
}

/// How a line's stroke is broken up.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DashStyle {
    #[default]
    Solid,
    Dashed,
    Dotted,
}

impl DashStyle {
    /// (drawn, skipped) run lengths in samples, `None` for a continuous stroke.
    fn pattern(self) -> Option<(usize, usize)> {
        match self {
            DashStyle::Solid => None,
            DashStyle::Dashed => Some(DASH_PATTERN_SAMPLES),
            DashStyle::Dotted => Some(DOT_PATTERN_SAMPLES),
        }
    }
}

impl FromStr for DashStyle {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "solid" | "-" => Ok(DashStyle::Solid),
            "dashed" | "--" => Ok(DashStyle::Dashed),
            "dotted" | ":" => Ok(DashStyle::Dotted),
            other => Err(format!("unknown line style '{other}'")),
        }
    }
}

/// Per-line render attributes. Unset fields fall back to renderer defaults.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LineStyle {
    pub color: Option<RGBColor>,
    pub stroke_width: Option<u32>,
    pub dash: Option<DashStyle>,
    pub label: Option<String>,
}

impl LineStyle {
    pub fn color(mut self, color: RGBColor) -> Self {
        self.color = Some(color);
        self
    }

    pub fn stroke_width(mut self, width: u32) -> Self {
        self.stroke_width = Some(width);
        self
    }

    pub fn dash(mut self, dash: DashStyle) -> Self {
        self.dash = Some(dash);
        self
    }

    pub fn label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    /// Overwrites the fields that are set in `other`.
    pub fn merge(&mut self, other: &LineStyle) {
        if other.color.is_some() {
            self.color = other.color;
        }
        if other.stroke_width.is_some() {
            self.stroke_width = other.stroke_width;
        }
        if other.dash.is_some() {
            self.dash = other.dash;
        }
        if other.label.is_some() {
            self.label = other.label.clone();
        }
    }
}

/// Axes-wide attributes: title, axis descriptions, grid and legend switches.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AxesAttrs {
    pub title: Option<String>,
    pub x_label: Option<String>,
    pub y_label: Option<String>,
    pub grid: Option<bool>,
    pub legend: Option<bool>,
}

impl AxesAttrs {
    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn x_label(mut self, label: impl Into<String>) -> Self {
        self.x_label = Some(label.into());
        self
    }

    pub fn y_label(mut self, label: impl Into<String>) -> Self {
        self.y_label = Some(label.into());
        self
    }

    pub fn grid(mut self, on: bool) -> Self {
        self.grid = Some(on);
        self
    }

    pub fn legend(mut self, on: bool) -> Self {
        self.legend = Some(on);
        self
    }

    /// Overwrites the fields that are set in `other`.
    pub fn merge(&mut self, other: &AxesAttrs) {
        if other.title.is_some() {
            self.title = other.title.clone();
        }
        if other.x_label.is_some() {
            self.x_label = other.x_label.clone();
        }
        if other.y_label.is_some() {
            self.y_label = other.y_label.clone();
        }
        if other.grid.is_some() {
            self.grid = other.grid;
        }
        if other.legend.is_some() {
            self.legend = other.legend;
        }
    }
}

/// Parses a colour name (`red`, `purple`, ...) or a `#rrggbb` hex string.
pub fn parse_color(name: &str) -> Option<RGBColor> {
    let name = name.trim().to_ascii_lowercase();
    if let Some(hex) = name.strip_prefix('#') {
        if hex.len() != 6 || !hex.chars().all(|c| c.is_ascii_hexdigit()) {
            return None;
        }
        let channel = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).ok();
        return Some(RGBColor(channel(0)?, channel(2)?, channel(4)?));
    }
    let color = match name.as_str() {
        "black" | "k" => BLACK,
        "white" | "w" => WHITE,
        "red" | "r" => full_palette::RED,
        "green" | "g" => full_palette::GREEN,
        "blue" | "b" => full_palette::BLUE,
        "cyan" | "c" => full_palette::CYAN,
        "magenta" | "m" => full_palette::PINK,
        "yellow" | "y" => full_palette::YELLOW,
        "orange" => full_palette::ORANGE,
        "purple" => full_palette::PURPLE,
        "brown" => full_palette::BROWN,
        "pink" => full_palette::PINK,
        "grey" | "gray" => full_palette::GREY,
        "teal" => full_palette::TEAL,
        "lightblue" => full_palette::LIGHTBLUE,
        "amber" => full_palette::AMBER,
        _ => return None,
    };
    Some(color)
}

/// Default colour for the line at `index`: the category-10 cycle.
pub fn default_line_color(index: usize) -> RGBColor {
    let palette = colorous::CATEGORY10;
    let c = palette[index % palette.len()];
    RGBColor(c.r, c.g, c.b)
}

/// Pixel size of a figure given in inches at `dpi`.
pub fn figure_pixels(width_in: f64, height_in: f64, dpi: u32) -> (u32, u32) {
    let px = |inches: f64| ((inches * dpi as f64).round() as u32).max(1);
    (px(width_in), px(height_in))
}

#[derive(Clone)]
struct PlotSeries {
    data: Vec<(f64, f64)>,
    style: LineStyle,
}

/// Everything needed to draw one frame.
struct FrameScene<'a> {
    x_extent: AxisExtent,
    y_extent: AxisExtent,
    axes: &'a AxesAttrs,
    series: &'a [PlotSeries],
    dpi: u32,
}

fn scale_px(px: u32, dpi: u32) -> u32 {
    ((px as f64 * dpi as f64 / 100.0).round() as u32).max(1)
}

/// Draws one frame of the animated chart onto `area`.
fn draw_frame<DB>(area: &DrawingArea<DB, Shift>, scene: &FrameScene) -> Result<()>
where
    DB: DrawingBackend,
    DB::ErrorType: 'static,
{
    area.fill(&WHITE).map_err(render_err)?;

    let mut builder = ChartBuilder::on(area);
    builder
        .margin(scale_px(CHART_MARGIN_PX, scene.dpi))
        .x_label_area_size(scale_px(X_LABEL_AREA_PX, scene.dpi))
        .y_label_area_size(scale_px(Y_LABEL_AREA_PX, scene.dpi));
    if let Some(title) = &scene.axes.title {
        builder.caption(title, FONT_CHART_TITLE.at_dpi(scene.dpi));
    }
    let mut chart = builder
        .build_cartesian_2d(scene.x_extent.to_range(), scene.y_extent.to_range())
        .map_err(render_err)?;

    let mut mesh = chart.configure_mesh();
    if let Some(x_label) = &scene.axes.x_label {
        mesh.x_desc(x_label.as_str());
    }
    if let Some(y_label) = &scene.axes.y_label {
        mesh.y_desc(y_label.as_str());
    }
    if !scene.axes.grid.unwrap_or(true) {
        mesh.disable_mesh();
    }
    mesh.light_line_style(WHITE.mix(0.7))
        .bold_line_style(GRID_COLOR.mix(0.5))
        .label_style(FONT_AXIS_LABEL.at_dpi(scene.dpi))
        .draw()
        .map_err(render_err)?;

    let mut legend_series_count = 0;
    let legend_width = scale_px(LINE_WIDTH_LEGEND, scene.dpi);
    let legend_len = scale_px(20, scene.dpi) as i32;

    for (index, s) in scene.series.iter().enumerate() {
        if s.data.is_empty() {
            continue;
        }
        let color = s.style.color.unwrap_or_else(|| default_line_color(index));
        let stroke = color.stroke_width(scale_px(
            s.style.stroke_width.unwrap_or(LINE_WIDTH_PLOT),
            scene.dpi,
        ));

        // Dashed styles: alternate drawn and skipped runs of samples
        let runs: Vec<&[(f64, f64)]> = match s.style.dash.unwrap_or_default().pattern() {
            None => vec![&s.data[..]],
            Some((drawn, skipped)) => {
                let mut runs = Vec::new();
                let mut start = 0;
                while start < s.data.len() {
                    // Overlap by one sample so each dash spans `drawn` intervals
                    let end = (start + drawn + 1).min(s.data.len());
                    runs.push(&s.data[start..end]);
                    start += drawn + skipped;
                }
                runs
            }
        };

        let mut first_run = true;
        for run in runs {
            let anno = chart
                .draw_series(LineSeries::new(run.iter().copied(), stroke))
                .map_err(render_err)?;
            if first_run {
                if let Some(label) = &s.style.label {
                    anno.label(label.as_str()).legend(move |(x, y)| {
                        PathElement::new(
                            vec![(x, y), (x + legend_len, y)],
                            color.stroke_width(legend_width),
                        )
                    });
                    legend_series_count += 1;
                }
                first_run = false;
            }
        }
    }

    if legend_series_count > 0 && scene.axes.legend.unwrap_or(true) {
        chart
            .configure_series_labels()
            .position(SeriesLabelPosition::UpperRight)
            .background_style(WHITE.mix(0.8))
            .border_style(BLACK)
            .label_font(FONT_LEGEND.at_dpi(scene.dpi))
            .draw()
            .map_err(render_err)?;
    }

    Ok(())
}

enum ActiveTarget {
    Gif {
        area: DrawingArea<BitMapBackend<'static>, Shift>,
        path: PathBuf,
        dpi: u32,
    },
    Preview {
        path: PathBuf,
        dpi: u32,
    },
}

/// Renders frames with plotters: an animated GIF when saving, or a PNG preview
/// image overwritten on every frame when running live.
pub struct PlottersRenderer {
    figure_width_in: f64,
    figure_height_in: f64,
    x_extent: AxisExtent,
    y_extent: AxisExtent,
    axes: AxesAttrs,
    series: Vec<PlotSeries>,
    target: Option<ActiveTarget>,
}

impl Default for PlottersRenderer {
    fn default() -> Self {
        Self::new(FIGURE_WIDTH_IN, FIGURE_HEIGHT_IN)
    }
}

impl PlottersRenderer {
    pub fn new(figure_width_in: f64, figure_height_in: f64) -> Self {
        Self {
            figure_width_in,
            figure_height_in,
            x_extent: AxisExtent::new(0.0, 1.0),
            y_extent: AxisExtent::new(0.0, 1.0),
            axes: AxesAttrs::default(),
            series: Vec::new(),
            target: None,
        }
    }

    /// Output formats this renderer can encode.
    pub fn supports_format(format: &str) -> bool {
        format.eq_ignore_ascii_case("gif")
    }

    fn pixels(&self, dpi: u32) -> (u32, u32) {
        figure_pixels(self.figure_width_in, self.figure_height_in, dpi)
    }

    fn scene(&self, dpi: u32) -> FrameScene<'_> {
        FrameScene {
            x_extent: self.x_extent,
            y_extent: self.y_extent,
            axes: &self.axes,
            series: &self.series,
            dpi,
        }
    }

    fn series_mut(&mut self, handle: LineHandle) -> Result<&mut PlotSeries> {
        self.series
            .get_mut(handle.index())
            .ok_or_else(|| AnimateError::Render(format!("unknown line handle {handle:?}")))
    }
}

impl Renderer for PlottersRenderer {
    fn begin(&mut self, target: &FrameTarget) -> Result<()> {
        let active = match target {
            FrameTarget::File { path, fps, dpi } => {
                let extension = path
                    .extension()
                    .and_then(|e| e.to_str())
                    .unwrap_or_default();
                if !Self::supports_format(extension) {
                    return Err(AnimateError::UnsupportedFormat(extension.to_string()));
                }
                ensure_parent_dir(path)?;
                let frame_delay_ms = 1000 / (*fps).max(1);
                let area = BitMapBackend::gif(path, self.pixels(*dpi), frame_delay_ms)
                    .map_err(render_err)?
                    .into_drawing_area();
                debug!(
                    "GIF target '{}' at {:?}px, {}ms per frame",
                    path.display(),
                    self.pixels(*dpi),
                    frame_delay_ms
                );
                ActiveTarget::Gif {
                    area,
                    path: path.clone(),
                    dpi: *dpi,
                }
            }
            FrameTarget::Live { path, dpi } => {
                ensure_parent_dir(path)?;
                ActiveTarget::Preview {
                    path: path.clone(),
                    dpi: *dpi,
                }
            }
        };
        self.target = Some(active);
        Ok(())
    }

    fn add_line(&mut self, style: &LineStyle) -> Result<LineHandle> {
        self.series.push(PlotSeries {
            data: Vec::new(),
            style: style.clone(),
        });
        Ok(LineHandle::new(self.series.len() - 1))
    }

    fn set_line_style(&mut self, handle: LineHandle, style: &LineStyle) -> Result<()> {
        self.series_mut(handle)?.style = style.clone();
        Ok(())
    }

    fn set_line_data(
        &mut self,
        handle: LineHandle,
        xs: ArrayView1<'_, f64>,
        ys: ArrayView1<'_, f64>,
    ) -> Result<()> {
        let series = self.series_mut(handle)?;
        series.data.clear();
        series
            .data
            .extend(xs.iter().copied().zip(ys.iter().copied()));
        Ok(())
    }

    fn set_x_extent(&mut self, extent: AxisExtent) {
        self.x_extent = extent;
    }

    fn set_y_extent(&mut self, extent: AxisExtent) {
        self.y_extent = extent;
    }

    fn set_axes_attrs(&mut self, attrs: &AxesAttrs) {
        self.axes = attrs.clone();
    }

    fn present_frame(&mut self, frame_index: usize) -> Result<()> {
        match &self.target {
            Some(ActiveTarget::Gif { area, dpi, .. }) => {
                draw_frame(area, &self.scene(*dpi))?;
                area.present().map_err(render_err)?;
            }
            Some(ActiveTarget::Preview { path, dpi }) => {
                let area = BitMapBackend::new(path, self.pixels(*dpi)).into_drawing_area();
                draw_frame(&area, &self.scene(*dpi))?;
                area.present().map_err(render_err)?;
            }
            None => {
                return Err(AnimateError::Render(
                    "present_frame called before begin".to_string(),
                ))
            }
        }
        debug!("Frame {frame_index} presented.");
        Ok(())
    }

    fn finish(&mut self) -> Result<()> {
        match self.target.take() {
            Some(ActiveTarget::Gif { area, path, .. }) => {
                // Dropping the drawing area flushes the GIF trailer
                drop(area);
                info!("Animation saved as '{}'.", path.display());
            }
            Some(ActiveTarget::Preview { path, .. }) => {
                info!("Last frame left in '{}'.", path.display());
            }
            None => {}
        }
        Ok(())
    }
}

fn ensure_parent_dir(path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    #[test]
    fn test_calculate_range_padding() {
        let (lo, hi) = calculate_range(0.0, 10.0);
        assert!((lo - -1.5).abs() < 1e-12);
        assert!((hi - 11.5).abs() < 1e-12);
        // Flat data gets a fixed margin
        assert_eq!(calculate_range(2.0, 2.0), (1.5, 2.5));
        // Reversed input is reordered
        assert_eq!(calculate_range(10.0, 0.0), calculate_range(0.0, 10.0));
    }

    #[test]
    fn test_parse_color() {
        assert_eq!(parse_color("purple"), Some(full_palette::PURPLE));
        assert_eq!(parse_color(" Green "), Some(full_palette::GREEN));
        assert_eq!(parse_color("#ff8000"), Some(RGBColor(255, 128, 0)));
        assert_eq!(parse_color("#ff80"), None);
        // Six bytes but not six hex digits
        assert_eq!(parse_color("#aééb"), None);
        assert_eq!(parse_color("#+1ff00"), None);
        assert_eq!(parse_color("chartreuse-ish"), None);
    }

    #[test]
    fn test_default_colors_cycle() {
        assert_eq!(default_line_color(0), default_line_color(10));
        assert_ne!(default_line_color(0), default_line_color(1));
    }

    #[test]
    fn test_line_style_merge_keeps_unset_fields() {
        let mut style = LineStyle::default().color(BLACK).stroke_width(3);
        style.merge(&LineStyle::default().label("sine"));
        assert_eq!(style.color, Some(BLACK));
        assert_eq!(style.stroke_width, Some(3));
        assert_eq!(style.label.as_deref(), Some("sine"));
    }

    #[test]
    fn test_axes_attrs_merge() {
        let mut attrs = AxesAttrs::default().title("A").grid(false);
        attrs.merge(&AxesAttrs::default().title("B").x_label("x"));
        assert_eq!(attrs.title.as_deref(), Some("B"));
        assert_eq!(attrs.x_label.as_deref(), Some("x"));
        assert_eq!(attrs.grid, Some(false));
    }

    #[test]
    fn test_dash_style_parse() {
        assert_eq!("dashed".parse::<DashStyle>(), Ok(DashStyle::Dashed));
        assert_eq!(":".parse::<DashStyle>(), Ok(DashStyle::Dotted));
        assert!("wavy".parse::<DashStyle>().is_err());
    }

    #[test]
    fn test_figure_pixels() {
        assert_eq!(figure_pixels(6.4, 4.8, 300), (1920, 1440));
        assert_eq!(figure_pixels(6.4, 4.8, 100), (640, 480));
    }

    #[test]
    fn test_rejects_unsupported_format() {
        let mut renderer = PlottersRenderer::default();
        let target = FrameTarget::File {
            path: PathBuf::from("Animation.mp4"),
            fps: 30,
            dpi: 100,
        };
        assert!(matches!(
            renderer.begin(&target),
            Err(AnimateError::UnsupportedFormat(f)) if f == "mp4"
        ));
    }

    #[test]
    #[ignore = "needs a system sans-serif font for axis labels"]
    fn test_writes_gif() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("Animation.gif");
        let mut renderer = PlottersRenderer::new(2.0, 1.5);
        renderer.set_x_extent(AxisExtent::new(0.0, 2.0));
        renderer.set_y_extent(AxisExtent::new(0.0, 2.0));
        renderer
            .begin(&FrameTarget::File {
                path: path.clone(),
                fps: 10,
                dpi: 50,
            })
            .unwrap();
        let handle = renderer
            .add_line(&LineStyle::default().dash(DashStyle::Dashed).label("id"))
            .unwrap();
        let xs = array![0.0, 1.0, 2.0];
        for n in 0..=3 {
            renderer
                .set_line_data(handle, xs.slice(ndarray::s![..n]), xs.slice(ndarray::s![..n]))
                .unwrap();
            renderer.present_frame(n).unwrap();
        }
        renderer.finish().unwrap();
        assert!(std::fs::metadata(&path).unwrap().len() > 0);
    }
}

// src/plot_framework.rs
