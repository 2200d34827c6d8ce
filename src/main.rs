// src/main.rs

use clap::Parser;
use std::error::Error;
use std::path::PathBuf;
use std::str::FromStr;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

use plot_animate::animation::{delay_frames, AnimationController, LineOptions, RunOptions};
use plot_animate::config::RenderSettings;
use plot_animate::constants::{DEFAULT_DOMAIN_MAX, DEFAULT_DOMAIN_MIN, DEFAULT_FRAME_COUNT};
use plot_animate::lines::BuiltinFunction;
use plot_animate::plot_framework::{parse_color, AxesAttrs, DashStyle, LineStyle};
use plot_animate::renderer::{RecordingRenderer, Renderer};
use plot_animate::{crate_version, Padding, PlottersRenderer};

/// Delay before a line starts drawing, in frames or seconds.
#[derive(Debug, Clone, Copy, PartialEq)]
enum DelaySpec {
    Frames(usize),
    Seconds(f64),
}

impl DelaySpec {
    fn frames(self, interval_ms: u64) -> usize {
        match self {
            DelaySpec::Frames(frames) => frames,
            DelaySpec::Seconds(seconds) => delay_frames(seconds, interval_ms),
        }
    }
}

/// One `--func` argument:
/// `name[:inverted][:delay=N|Ns][:color=C][:width=W][:style=S][:label=L]`.
#[derive(Debug, Clone, PartialEq)]
struct LineArg {
    function: BuiltinFunction,
    inverted: bool,
    delay: Option<DelaySpec>,
    style: LineStyle,
}

impl FromStr for LineArg {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut parts = s.split(':');
        let name = parts.next().unwrap_or_default();
        let function: BuiltinFunction = name.parse()?;
        let mut arg = LineArg {
            function,
            inverted: function.wants_inversion(),
            delay: None,
            style: LineStyle::default().label(function.name()),
        };

        for part in parts {
            let (key, value) = part.split_once('=').unwrap_or((part, ""));
            match key.trim() {
                "inverted" | "inv" => arg.inverted = true,
                "delay" => {
                    let value = value.trim();
                    arg.delay = Some(match value.strip_suffix('s') {
                        Some(seconds) => DelaySpec::Seconds(
                            seconds
                                .parse()
                                .map_err(|_| format!("invalid delay '{value}'"))?,
                        ),
                        None => DelaySpec::Frames(
                            value
                                .parse()
                                .map_err(|_| format!("invalid delay '{value}'"))?,
                        ),
                    });
                }
                "color" => {
                    let color =
                        parse_color(value).ok_or_else(|| format!("unknown colour '{value}'"))?;
                    arg.style = arg.style.color(color);
                }
                "width" => {
                    let width = value
                        .trim()
                        .parse()
                        .map_err(|_| format!("invalid width '{value}'"))?;
                    arg.style = arg.style.stroke_width(width);
                }
                "style" => arg.style = arg.style.dash(value.parse::<DashStyle>()?),
                "label" => arg.style = arg.style.label(value),
                other => return Err(format!("unknown line option '{other}'")),
            }
        }
        Ok(arg)
    }
}

/// Animate mathematical functions being drawn over their domain
#[derive(Parser, Debug)]
#[command(name = "plot_animate")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Function to animate; repeat for more lines.
    /// Format: name[:inverted][:delay=N|Ns][:color=C][:width=W][:style=solid|dashed|dotted][:label=L]
    #[arg(short, long = "func", value_name = "SPEC")]
    funcs: Vec<LineArg>,

    /// Domain start
    #[arg(long, allow_hyphen_values = true, default_value_t = DEFAULT_DOMAIN_MIN)]
    xmin: f64,

    /// Domain end
    #[arg(long, allow_hyphen_values = true, default_value_t = DEFAULT_DOMAIN_MAX)]
    xmax: f64,

    /// Samples in the domain, one per frame
    #[arg(long, default_value_t = DEFAULT_FRAME_COUNT)]
    frames: usize,

    /// Horizontal padding: one value for both sides or LOW HIGH
    #[arg(long, num_args = 1..=2, value_name = "P")]
    xpad: Vec<f64>,

    /// Vertical extent start; fitted to the data when no range is given
    #[arg(long, allow_hyphen_values = true, requires = "ymax")]
    ymin: Option<f64>,

    /// Vertical extent end
    #[arg(long, allow_hyphen_values = true, requires = "ymin")]
    ymax: Option<f64>,

    /// Vertical padding: one value for both sides or LOW HIGH
    #[arg(long, num_args = 1..=2, value_name = "P")]
    ypad: Vec<f64>,

    #[arg(long)]
    title: Option<String>,

    #[arg(long)]
    xlabel: Option<String>,

    #[arg(long)]
    ylabel: Option<String>,

    /// Hide the grid
    #[arg(long)]
    no_grid: bool,

    /// Milliseconds between live frames
    #[arg(long)]
    interval: Option<u64>,

    /// Play a live run once instead of looping
    #[arg(long)]
    no_repeat: bool,

    /// Save the animation to a file instead of previewing it
    #[arg(long)]
    save: bool,

    /// Directory for the saved animation and the live preview
    #[arg(long)]
    out_dir: Option<PathBuf>,

    /// Output format of a saved animation
    #[arg(long)]
    format: Option<String>,

    #[arg(long)]
    fps: Option<u32>,

    #[arg(long)]
    dpi: Option<u32>,

    /// Stop a looping live run after this many cycles
    #[arg(long)]
    loops: Option<usize>,

    /// Maximum number of lines
    #[arg(long)]
    max_plots: Option<usize>,

    /// TOML file with render settings; flags override it
    #[arg(long)]
    config: Option<PathBuf>,

    /// Run the schedule without drawing and print the final reveal counts
    #[arg(long)]
    dry_run: bool,

    /// Debug logging
    #[arg(short, long)]
    verbose: bool,
}

impl Cli {
    fn settings(&self) -> Result<RenderSettings, Box<dyn Error>> {
        let mut settings = match &self.config {
            Some(path) => RenderSettings::load(path)?,
            None => RenderSettings::default(),
        };
        if let Some(interval) = self.interval {
            settings.interval_ms = interval;
        }
        if self.no_repeat {
            settings.repeat = false;
        }
        if let Some(dir) = &self.out_dir {
            settings.output_dir = Some(dir.clone());
        }
        if let Some(format) = &self.format {
            settings.format = format.clone();
        }
        if let Some(fps) = self.fps {
            settings.fps = fps;
        }
        if let Some(dpi) = self.dpi {
            settings.dpi = dpi;
        }
        if let Some(max_plots) = self.max_plots {
            settings.max_plots = max_plots;
        }
        Ok(settings)
    }

    fn lines(&self) -> Vec<LineArg> {
        if !self.funcs.is_empty() {
            return self.funcs.clone();
        }
        // Demo set
        ["cos", "sin", "sin2", "exp"]
            .iter()
            .filter_map(|name| name.parse().ok())
            .collect()
    }

    fn axes(&self) -> AxesAttrs {
        let mut axes = AxesAttrs::default().grid(!self.no_grid);
        if let Some(title) = &self.title {
            axes = axes.title(title);
        }
        if let Some(label) = &self.xlabel {
            axes = axes.x_label(label);
        }
        if let Some(label) = &self.ylabel {
            axes = axes.y_label(label);
        }
        axes
    }
}

/// `(low, high)` padding from one or two flag values.
fn padding(values: &[f64]) -> Result<(f64, f64), Box<dyn Error>> {
    let padding = match values {
        [] => Padding::default(),
        [p] => Padding::try_from(*p)?,
        _ => Padding::try_from(values)?,
    };
    Ok((padding.low(), padding.high()))
}

fn configure<R: Renderer>(
    ctl: &mut AnimationController<R>,
    cli: &Cli,
    settings: &RenderSettings,
) -> Result<(), Box<dyn Error>> {
    ctl.set_domain(cli.xmin, cli.xmax, cli.frames, padding(&cli.xpad)?)?;
    if let (Some(ymin), Some(ymax)) = (cli.ymin, cli.ymax) {
        ctl.set_range(ymin, ymax, padding(&cli.ypad)?)?;
    }
    ctl.set_axes_attrs(cli.axes())?;

    for line in cli.lines() {
        let mut options = LineOptions::default()
            .inverted(line.inverted)
            .style(line.style);
        if let Some(delay) = line.delay {
            options = options.delay(delay.frames(settings.interval_ms));
        }
        ctl.register_with(line.function.into_fn(), options)?;
    }
    Ok(())
}

fn main() -> Result<(), Box<dyn Error>> {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();

    info!("plot_animate {}", crate_version());
    let settings = cli.settings()?;
    debug!("Render settings: {:?}", settings);

    let mut options = RunOptions {
        save: cli.save,
        max_cycles: cli.loops,
        ..settings.run_options()
    };

    if cli.dry_run {
        options.save = false;
        options.interval_ms = 0;
        options.max_cycles = Some(1);
        let mut ctl = AnimationController::with_max_plots(RecordingRenderer::new(), settings.max_plots);
        configure(&mut ctl, &cli, &settings)?;
        let summary = ctl.run(&options)?;
        println!(
            "{} frame(s) per cycle, {} presented, final state {:?}",
            summary.frames_per_cycle, summary.frames_presented, summary.final_state
        );
        for (index, line) in ctl.lines().iter().enumerate() {
            println!(
                "  line {index} ({}): revealed {} point(s)",
                line.style().label.as_deref().unwrap_or("unnamed"),
                line.reveal()
            );
        }
        return Ok(());
    }

    let renderer = PlottersRenderer::new(settings.figure_width_in, settings.figure_height_in);
    let mut ctl = AnimationController::with_max_plots(renderer, settings.max_plots);
    configure(&mut ctl, &cli, &settings)?;
    let summary = ctl.run(&options)?;
    if let Some(path) = summary.output {
        println!("Animation saved as '{}'.", path.display());
    }
    Ok(())
}


// src/main.rs
