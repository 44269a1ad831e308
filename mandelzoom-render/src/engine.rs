use std::sync::Arc;
use std::time::{Duration, Instant};

use tracing::{info, warn};

use mandelzoom_core::{FractalParams, Viewport};

use crate::band::{band_count_for, ROWS_PER_BAND};
use crate::buffer::RenderBuffer;
use crate::error::RenderError;
use crate::grid::IterationGrid;
use crate::palette::ColorCache;
use crate::renderer::{render_grid_at, RenderCancel};

/// Scheduler settings for a [`FrameEngine`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EngineConfig {
    /// Target band height; the band count is `height / rows_per_band`.
    pub rows_per_band: u32,
}

impl EngineConfig {
    pub fn new(rows_per_band: u32) -> crate::Result<Self> {
        if rows_per_band == 0 {
            return Err(RenderError::InvalidBandSize(rows_per_band));
        }
        Ok(Self { rows_per_band })
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            rows_per_band: ROWS_PER_BAND,
        }
    }
}

/// A finished frame: iteration data plus its colored pixels.
#[derive(Debug, Clone)]
pub struct Frame {
    pub iterations: IterationGrid,
    pub pixels: RenderBuffer,
    pub viewport: Viewport,
    pub monochrome: bool,
    pub elapsed: Duration,
}

impl Frame {
    fn empty(width: u32, height: u32, viewport: Viewport, max_iter: u32, monochrome: bool) -> Self {
        Self {
            iterations: IterationGrid::new(width, height, max_iter),
            pixels: RenderBuffer::new(width, height),
            viewport,
            monochrome,
            elapsed: Duration::ZERO,
        }
    }
}

/// The compute engine the presentation layer talks to.
///
/// Owns the color cache, so palette lookups are shared across frames for as
/// long as the iteration cap stays the same.
#[derive(Debug)]
pub struct FrameEngine {
    config: EngineConfig,
    colors: ColorCache,
    cancel: Arc<RenderCancel>,
}

impl FrameEngine {
    pub fn new(config: EngineConfig) -> Self {
        Self {
            config,
            colors: ColorCache::new(),
            cancel: Arc::new(RenderCancel::new()),
        }
    }

    pub fn config(&self) -> EngineConfig {
        self.config
    }

    pub fn color_cache(&self) -> &ColorCache {
        &self.colors
    }

    /// Handle another thread can use to supersede an in-flight frame.
    pub fn cancel_handle(&self) -> Arc<RenderCancel> {
        Arc::clone(&self.cancel)
    }

    /// Compute and color a full frame.  Blocks until the buffer is complete.
    ///
    /// A zero width or height produces an empty frame.  A cap of zero or an
    /// inverted or non-finite viewport is rejected before any work starts.
    /// If the frame is cancelled through [`cancel_handle`](Self::cancel_handle)
    /// nothing is colored and [`RenderError::Cancelled`] is returned.
    pub fn compute_frame(
        &mut self,
        width: u32,
        height: u32,
        viewport: &Viewport,
        max_iterations: u32,
        monochrome: bool,
    ) -> crate::Result<Frame> {
        let generation = self.cancel.generation();
        self.compute_frame_at(generation, width, height, viewport, max_iterations, monochrome)
    }

    /// [`compute_frame`](Self::compute_frame) for a request issued at
    /// `generation` of the cancel handle.  A request cancelled before the
    /// pass starts returns [`RenderError::Cancelled`] without touching the
    /// color cache.
    pub fn compute_frame_at(
        &mut self,
        generation: u64,
        width: u32,
        height: u32,
        viewport: &Viewport,
        max_iterations: u32,
        monochrome: bool,
    ) -> crate::Result<Frame> {
        let params = FractalParams::new(max_iterations)?;
        let viewport = Viewport::new(viewport.x_min, viewport.x_max, viewport.y_min, viewport.y_max)?;
        if width == 0 || height == 0 {
            warn!(width, height, "Empty image requested, skipping render");
            return Ok(Frame::empty(
                width,
                height,
                viewport,
                params.max_iterations,
                monochrome,
            ));
        }

        let start = Instant::now();
        let bands = band_count_for(height, self.config.rows_per_band);
        let result = render_grid_at(
            width,
            height,
            params.max_iterations,
            &viewport,
            bands,
            &self.cancel,
            generation,
        );
        let Some(iterations) = result.grid else {
            return Err(RenderError::Cancelled);
        };

        let pixels = self.colors.colorize(&iterations, monochrome);
        let elapsed = start.elapsed();
        info!(
            elapsed_ms = elapsed.as_millis(),
            width,
            height,
            max_iterations,
            monochrome,
            cached_colors = self.colors.len(),
            "Frame ready"
        );

        Ok(Frame {
            iterations,
            pixels,
            viewport,
            monochrome,
            elapsed,
        })
    }

    /// Recolor existing iteration data, e.g. after toggling monochrome mode.
    pub fn recolor(&mut self, grid: &IterationGrid, monochrome: bool) -> RenderBuffer {
        self.colors.colorize(grid, monochrome)
    }
}

impl Default for FrameEngine {
    fn default() -> Self {
        Self::new(EngineConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::buffer::{ESCAPED_MONOCHROME_COLOR, INSIDE_COLOR};
    use mandelzoom_core::CoreError;

    #[test]
    fn frame_has_matching_sizes() {
        let mut engine = FrameEngine::default();
        let frame = engine
            .compute_frame(64, 48, &Viewport::DEFAULT, 100, false)
            .unwrap();
        assert_eq!(frame.iterations.data.len(), 64 * 48);
        assert_eq!(frame.pixels.pixels.len(), 64 * 48 * 4);
        assert_eq!(frame.viewport, Viewport::DEFAULT);
    }

    #[test]
    fn zero_size_gives_empty_frame() {
        let mut engine = FrameEngine::default();
        let frame = engine
            .compute_frame(0, 0, &Viewport::DEFAULT, 100, false)
            .unwrap();
        assert!(frame.pixels.is_empty());
        assert!(frame.iterations.is_empty());
    }

    #[test]
    fn zero_cap_rejected() {
        let mut engine = FrameEngine::default();
        let err = engine
            .compute_frame(8, 8, &Viewport::DEFAULT, 0, false)
            .unwrap_err();
        assert!(matches!(err, RenderError::Core(_)));
    }

    #[test]
    fn invalid_band_size() {
        assert!(matches!(
            EngineConfig::new(0),
            Err(RenderError::InvalidBandSize(0))
        ));
        assert_eq!(EngineConfig::new(8).unwrap().rows_per_band, 8);
    }

    #[test]
    fn recolor_toggles_monochrome() {
        let mut engine = FrameEngine::default();
        let vp = Viewport::new(-2.0, 2.0, -2.0, 2.0).unwrap();
        let frame = engine.compute_frame(4, 4, &vp, 50, false).unwrap();
        let mono = engine.recolor(&frame.iterations, true);

        assert_eq!(mono.pixel(2, 2), Some(INSIDE_COLOR));
        assert_eq!(mono.pixel(3, 3), Some(ESCAPED_MONOCHROME_COLOR));
        assert_eq!(frame.pixels.pixel(2, 2), Some(INSIDE_COLOR));
        assert_ne!(frame.pixels.pixel(3, 3), Some(ESCAPED_MONOCHROME_COLOR));
    }

    #[test]
    fn cache_follows_cap() {
        let mut engine = FrameEngine::default();
        engine
            .compute_frame(16, 16, &Viewport::DEFAULT, 100, false)
            .unwrap();
        assert_eq!(engine.color_cache().max_iterations(), 100);
        engine
            .compute_frame(16, 16, &Viewport::DEFAULT, 300, false)
            .unwrap();
        assert_eq!(engine.color_cache().max_iterations(), 300);
    }

    #[test]
    fn invalid_viewport_rejected() {
        let mut engine = FrameEngine::default();
        let inverted = Viewport {
            x_min: 2.0,
            x_max: -2.0,
            y_min: 2.0,
            y_max: -2.0,
        };
        let err = engine.compute_frame(4, 4, &inverted, 50, false).unwrap_err();
        assert!(matches!(
            err,
            RenderError::Core(CoreError::InvalidViewport { .. })
        ));

        let nan = Viewport {
            x_min: f64::NAN,
            ..Viewport::DEFAULT
        };
        let err = engine.compute_frame(4, 4, &nan, 50, false).unwrap_err();
        assert!(matches!(
            err,
            RenderError::Core(CoreError::InvalidViewport { .. })
        ));

        // Checked even when there is nothing to draw.
        assert!(engine.compute_frame(0, 0, &inverted, 50, false).is_err());
        assert!(engine.color_cache().is_empty());
    }

    #[test]
    fn cancelled_frame_leaves_cache_alone() {
        let mut engine = FrameEngine::default();
        engine
            .compute_frame(32, 32, &Viewport::DEFAULT, 100, false)
            .unwrap();
        let cached = engine.color_cache().len();
        assert!(cached > 0);

        let cancel = engine.cancel_handle();
        let request = cancel.generation();
        cancel.cancel();

        let err = engine
            .compute_frame_at(request, 32, 32, &Viewport::DEFAULT, 300, false)
            .unwrap_err();
        assert!(matches!(err, RenderError::Cancelled));
        assert_eq!(engine.color_cache().len(), cached);
        assert_eq!(engine.color_cache().max_iterations(), 100);
        assert_eq!(cancel.progress().0, 0);

        // A fresh request goes through again.
        let frame = engine
            .compute_frame(32, 32, &Viewport::DEFAULT, 300, false)
            .unwrap();
        assert_eq!(frame.iterations.max_iterations, 300);
    }
}
