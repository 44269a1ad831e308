use tracing::{debug, info, warn};

use mandelzoom_core::{FractalParams, Viewport, ViewportController};
use mandelzoom_render::{EngineConfig, Frame, FrameEngine};

use crate::command::Command;
use crate::error::AppError;
use crate::preferences::AppPreferences;

/// What the driver loop should do after a command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Continue,
    Show,
    ListPresets,
    Quit,
}

/// One exploration session: the controller, the engine, and the last
/// published frame.
///
/// Commands only change state; [`redraw_if_needed`](Self::redraw_if_needed)
/// recomputes the frame when the controller reports it stale.  The published
/// frame is replaced only by a complete new one.
pub struct Explorer {
    controller: ViewportController,
    engine: FrameEngine,
    max_iterations: u32,
    monochrome: bool,
    frame: Option<Frame>,
    frames_rendered: u64,
}

impl Explorer {
    pub fn new(prefs: &AppPreferences) -> Result<Self, AppError> {
        let params = FractalParams::new(prefs.max_iterations)?;
        let config = EngineConfig::new(prefs.rows_per_band)?;
        let mut controller = ViewportController::with_presets(
            prefs.image_width,
            prefs.image_height,
            prefs.preset_table(),
        );
        if prefs.restore_last_view {
            if let Some(vp) = prefs.last_view {
                controller.set_viewport(vp)?;
            }
        }
        Ok(Self {
            controller,
            engine: FrameEngine::new(config),
            max_iterations: params.max_iterations,
            monochrome: prefs.monochrome,
            frame: None,
            frames_rendered: 0,
        })
    }

    pub fn controller(&self) -> &ViewportController {
        &self.controller
    }

    pub fn viewport(&self) -> Viewport {
        self.controller.viewport()
    }

    pub fn frame(&self) -> Option<&Frame> {
        self.frame.as_ref()
    }

    pub fn frames_rendered(&self) -> u64 {
        self.frames_rendered
    }

    pub fn max_iterations(&self) -> u32 {
        self.max_iterations
    }

    pub fn monochrome(&self) -> bool {
        self.monochrome
    }

    /// Apply one command.  A rejected command leaves the session unchanged.
    pub fn handle(&mut self, cmd: Command) -> Result<Outcome, AppError> {
        debug!(?cmd, "Handling command");
        match cmd {
            Command::BeginSelection { x, y } => {
                if !self.controller.begin_selection(x, y) {
                    warn!("Selection already in progress");
                }
            }
            Command::UpdateSelection { x, y } => {
                if self.controller.selection().is_none() {
                    warn!("No selection in progress");
                } else if self.controller.update_selection(x, y).is_none() {
                    debug!("Selection is still empty");
                }
            }
            Command::CommitSelection => {
                if self.controller.commit_selection()?.is_none() {
                    warn!("No selection to commit");
                }
            }
            Command::CancelSelection => {
                self.controller.cancel_selection();
            }
            Command::Reset => self.controller.reset(),
            Command::Preset(name) => {
                self.controller.apply_preset(&name)?;
            }
            Command::ToggleMonochrome => self.toggle_monochrome(),
            Command::Resize { width, height } => self.controller.resize(width, height),
            Command::MaxIterations(n) => self.set_max_iterations(n)?,
            Command::Show => return Ok(Outcome::Show),
            Command::ListPresets => return Ok(Outcome::ListPresets),
            Command::Quit => return Ok(Outcome::Quit),
        }
        Ok(Outcome::Continue)
    }

    /// Recompute the frame if the viewport, image size or cap changed.
    ///
    /// Returns the new frame when one was computed.
    pub fn redraw_if_needed(&mut self) -> Result<Option<&Frame>, AppError> {
        if !self.controller.take_needs_recompute() {
            return Ok(None);
        }
        let (width, height) = self.controller.image_size();
        let viewport = self.controller.viewport();
        match self
            .engine
            .compute_frame(width, height, &viewport, self.max_iterations, self.monochrome)
        {
            Ok(frame) => {
                self.frames_rendered += 1;
                self.frame = Some(frame);
                Ok(self.frame.as_ref())
            }
            Err(e) => {
                // Try again on the next poll.
                self.controller.invalidate();
                Err(e.into())
            }
        }
    }

    /// Flip monochrome mode and recolor the current frame in place.
    /// The iteration data is reused as is.
    pub fn toggle_monochrome(&mut self) {
        self.monochrome = !self.monochrome;
        info!(monochrome = self.monochrome, "Monochrome toggled");
        if let Some(frame) = self.frame.as_mut() {
            frame.pixels = self.engine.recolor(&frame.iterations, self.monochrome);
            frame.monochrome = self.monochrome;
        }
    }

    /// Change the iteration cap.  The next redraw recomputes the grid, and
    /// the engine's color cache is rebuilt for the new cap.
    pub fn set_max_iterations(&mut self, n: u32) -> Result<(), AppError> {
        let params = FractalParams::new(n)?;
        if params.max_iterations != self.max_iterations {
            self.max_iterations = params.max_iterations;
            self.controller.invalidate();
        }
        Ok(())
    }

    /// Copy the session's view settings into `prefs` for saving.
    pub fn store_into(&self, prefs: &mut AppPreferences) {
        let (width, height) = self.controller.image_size();
        prefs.image_width = width;
        prefs.image_height = height;
        prefs.max_iterations = self.max_iterations;
        prefs.monochrome = self.monochrome;
        prefs.last_view = Some(self.controller.viewport());
    }
}
