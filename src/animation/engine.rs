// src/animation/engine.rs

use std::path::PathBuf;
use std::thread;
use std::time::{Duration, Instant};
use tracing::{debug, info};

use crate::animation::controller::{AnimationController, ControllerState};
use crate::constants::{
    DEFAULT_DPI, DEFAULT_FORMAT, DEFAULT_FPS, DEFAULT_INTERVAL_MS, LIVE_PREVIEW_DPI,
    OUTPUT_FILE_STEM, PREVIEW_FILE_NAME,
};
use crate::error::{AnimateError, Result};
use crate::renderer::{FrameTarget, Renderer};

/// How a run is driven and where its frames go.
#[derive(Debug, Clone, PartialEq)]
pub struct RunOptions {
    /// Delay between live frames.
    pub interval_ms: u64,
    /// Restart from the first frame after the last one (live runs).
    pub repeat: bool,
    /// Encode to `Animation.<format>` instead of previewing live.
    pub save: bool,
    /// Directory the output file is written to; the working directory if unset.
    pub output_dir: Option<PathBuf>,
    pub format: String,
    pub fps: u32,
    pub dpi: u32,
    /// Stop a repeating live run after this many cycles. Unbounded if unset.
    pub max_cycles: Option<usize>,
}

impl Default for RunOptions {
    fn default() -> Self {
        Self {
            interval_ms: DEFAULT_INTERVAL_MS,
            repeat: true,
            save: false,
            output_dir: None,
            format: DEFAULT_FORMAT.to_string(),
            fps: DEFAULT_FPS,
            dpi: DEFAULT_DPI,
            max_cycles: None,
        }
    }
}

impl RunOptions {
    /// Path of the saved animation.
    pub fn output_path(&self) -> PathBuf {
        let file_name = format!("{OUTPUT_FILE_STEM}.{}", self.format);
        match &self.output_dir {
            Some(dir) => dir.join(file_name),
            None => PathBuf::from(file_name),
        }
    }

    /// Path of the live preview image.
    pub fn preview_path(&self) -> PathBuf {
        match &self.output_dir {
            Some(dir) => dir.join(PREVIEW_FILE_NAME),
            None => PathBuf::from(PREVIEW_FILE_NAME),
        }
    }

    fn target(&self) -> FrameTarget {
        if self.save {
            FrameTarget::File {
                path: self.output_path(),
                fps: self.fps,
                dpi: self.dpi,
            }
        } else {
            FrameTarget::Live {
                path: self.preview_path(),
                dpi: LIVE_PREVIEW_DPI,
            }
        }
    }
}

/// What a finished run did.
#[derive(Debug, Clone, PartialEq)]
pub struct RunSummary {
    pub frames_per_cycle: usize,
    pub cycles: usize,
    pub frames_presented: usize,
    /// The saved file, for save runs.
    pub output: Option<PathBuf>,
    pub final_state: ControllerState,
}

impl<R: Renderer> AnimationController<R> {
    /// Drives the animation: `advance` once per frame for
    /// `compute_total_frames()` frames, then either saves the encoded file or
    /// keeps previewing while `repeat` is set.
    pub fn run(&mut self, options: &RunOptions) -> Result<RunSummary> {
        match self.state {
            ControllerState::Unconfigured => return Err(AnimateError::NoLines),
            ControllerState::Configured => {}
            frozen => return Err(AnimateError::Frozen(frozen)),
        }
        if options.save && !options.repeat && self.has_delays() {
            return Err(AnimateError::IncompatibleDelayConfig);
        }

        self.fit_y_extent()?;
        self.renderer.begin(&options.target())?;
        self.attach_lines()?;
        self.state = ControllerState::Running;

        let result = self.drive(options);
        let finished = self.renderer.finish();
        match (result, finished) {
            (Ok(summary), Ok(())) => {
                self.state = summary.final_state;
                info!(
                    "Run finished: {} frame(s) over {} cycle(s).",
                    summary.frames_presented, summary.cycles
                );
                Ok(summary)
            }
            (Err(err), _) | (Ok(_), Err(err)) => {
                self.state = ControllerState::Terminated;
                Err(err)
            }
        }
    }

    fn drive(&mut self, options: &RunOptions) -> Result<RunSummary> {
        let total_frames = self.compute_total_frames();
        let interval = Duration::from_millis(options.interval_ms);
        info!(
            "Running {} line(s) over {} frames ({}).",
            self.lines.len(),
            total_frames,
            if options.save { "save" } else { "live" }
        );

        let mut cycles = 0;
        let mut frames_presented = 0;
        loop {
            self.rewind()?;
            for frame_index in 0..total_frames {
                let started = Instant::now();
                self.advance(frame_index)?;
                self.renderer.present_frame(frame_index)?;
                frames_presented += 1;
                if !options.save {
                    // Pace live frames; slow frames are not made up for
                    if let Some(remaining) = interval.checked_sub(started.elapsed()) {
                        thread::sleep(remaining);
                    }
                }
            }
            cycles += 1;

            // A saved file holds exactly one pass
            if options.save || !options.repeat {
                return Ok(RunSummary {
                    frames_per_cycle: total_frames,
                    cycles,
                    frames_presented,
                    output: options.save.then(|| options.output_path()),
                    final_state: ControllerState::Terminated,
                });
            }
            if options.max_cycles.is_some_and(|max| cycles >= max) {
                return Ok(RunSummary {
                    frames_per_cycle: total_frames,
                    cycles,
                    frames_presented,
                    output: None,
                    final_state: ControllerState::Idle,
                });
            }
            debug!("Cycle {cycles} done, repeating.");
        }
    }
}


// src/animation/engine.rs
