use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::time::{Duration, Instant};

use rayon::prelude::*;
use tracing::{debug, info};

use mandelzoom_core::{escape_iterations, Viewport};

use crate::band::{band_count_for, build_bands, Band, ROWS_PER_BAND};
use crate::grid::IterationGrid;

// ---------------------------------------------------------------------------
// Cancellation
// ---------------------------------------------------------------------------

/// Tracks the current render generation for cancellation and progress.
///
/// Incrementing the generation makes bands that have not started yet skip
/// their work; the pass then publishes no grid at all.  The progress
/// counters count finished bands.
#[derive(Debug)]
pub struct RenderCancel {
    generation: AtomicU64,
    progress_done: AtomicUsize,
    progress_total: AtomicUsize,
}

impl RenderCancel {
    pub fn new() -> Self {
        Self {
            generation: AtomicU64::new(0),
            progress_done: AtomicUsize::new(0),
            progress_total: AtomicUsize::new(0),
        }
    }

    /// Cancel the current render by advancing the generation.
    pub fn cancel(&self) {
        self.generation.fetch_add(1, Ordering::SeqCst);
    }

    /// Read the current generation.
    pub fn generation(&self) -> u64 {
        self.generation.load(Ordering::SeqCst)
    }

    /// Reset progress for a new pass with `total` bands.
    pub fn reset_progress(&self, total: usize) {
        self.progress_total.store(total, Ordering::Relaxed);
        self.progress_done.store(0, Ordering::Relaxed);
    }

    fn inc_progress(&self) {
        self.progress_done.fetch_add(1, Ordering::Relaxed);
    }

    /// Read the current progress as `(done, total)`.
    pub fn progress(&self) -> (usize, usize) {
        (
            self.progress_done.load(Ordering::Relaxed),
            self.progress_total.load(Ordering::Relaxed),
        )
    }
}

impl Default for RenderCancel {
    fn default() -> Self {
        Self::new()
    }
}

// ---------------------------------------------------------------------------
// Result
// ---------------------------------------------------------------------------

/// The outcome of one grid pass.
///
/// `grid` is `None` when the pass was cancelled: a partially filled grid is
/// never handed out.
#[derive(Debug)]
pub struct RenderResult {
    pub grid: Option<IterationGrid>,
    pub elapsed: Duration,
    pub band_count: usize,
    pub bands_rendered: usize,
}

impl RenderResult {
    pub fn cancelled(&self) -> bool {
        self.grid.is_none()
    }
}

// ---------------------------------------------------------------------------
// Per-band rendering
// ---------------------------------------------------------------------------

/// Evaluate every pixel of one band into its own row-major buffer.
fn render_band(
    viewport: &Viewport,
    width: u32,
    height: u32,
    max_iter: u32,
    band: &Band,
) -> Vec<u32> {
    let mut data = Vec::with_capacity(band.pixel_count(width));
    for py in band.start_row..band.end_row {
        for px in 0..width {
            let (x, y) = viewport.pixel_to_plane(px as f64, py as f64, width, height);
            data.push(escape_iterations(x, y, max_iter));
        }
    }
    data
}

// ---------------------------------------------------------------------------
// Full-frame render
// ---------------------------------------------------------------------------

/// Compute the full iteration grid for `viewport` on a `width × height` image.
///
/// Rows are split into bands of about [`ROWS_PER_BAND`] rows that run in
/// parallel on the rayon pool.  Blocks until every band is done.
pub fn compute_grid(width: u32, height: u32, max_iter: u32, viewport: &Viewport) -> IterationGrid {
    compute_grid_with_bands(
        width,
        height,
        max_iter,
        viewport,
        band_count_for(height, ROWS_PER_BAND),
    )
}

/// [`compute_grid`] with an explicit band count.  The result does not depend
/// on `band_count`.
pub fn compute_grid_with_bands(
    width: u32,
    height: u32,
    max_iter: u32,
    viewport: &Viewport,
    band_count: u32,
) -> IterationGrid {
    let cancel = RenderCancel::new();
    render_grid(width, height, max_iter, viewport, band_count, &cancel)
        .grid
        .unwrap_or_else(|| IterationGrid::new(width, height, max_iter))
}

/// Render a grid in `band_count` bands, honoring `cancel`.
///
/// Each band fills its own buffer; the buffers are stitched into the grid
/// after the join, so no two tasks ever touch the same memory.  If the
/// generation of `cancel` moves before every band has started, the
/// remaining bands are skipped and the pass returns without a grid.
pub fn render_grid(
    width: u32,
    height: u32,
    max_iter: u32,
    viewport: &Viewport,
    band_count: u32,
    cancel: &RenderCancel,
) -> RenderResult {
    render_grid_at(
        width,
        height,
        max_iter,
        viewport,
        band_count,
        cancel,
        cancel.generation(),
    )
}

/// [`render_grid`] for a request issued at `generation`.
///
/// A band only runs while `cancel` is still at `generation`, so a request
/// that was cancelled before the pass began renders nothing.
pub fn render_grid_at(
    width: u32,
    height: u32,
    max_iter: u32,
    viewport: &Viewport,
    band_count: u32,
    cancel: &RenderCancel,
    generation: u64,
) -> RenderResult {
    let start = Instant::now();
    let gen = generation;

    let bands = if width == 0 { Vec::new() } else { build_bands(height, band_count) };
    let band_count = bands.len();
    debug!(band_count, width, height, max_iter, "Starting banded render");
    cancel.reset_progress(band_count);

    let band_data: Vec<Option<Vec<u32>>> = bands
        .par_iter()
        .map(|band| {
            if cancel.generation() != gen {
                return None;
            }
            let data = render_band(viewport, width, height, max_iter, band);
            cancel.inc_progress();
            Some(data)
        })
        .collect();

    let bands_rendered = band_data.iter().filter(|d| d.is_some()).count();
    let cancelled = bands_rendered < band_count;

    let grid = if cancelled {
        None
    } else {
        let mut grid = IterationGrid::new(width, height, max_iter);
        for (band, data) in bands.iter().zip(band_data.iter().flatten()) {
            grid.blit_band(band, data);
        }
        Some(grid)
    };

    let elapsed = start.elapsed();
    info!(
        elapsed_ms = elapsed.as_millis(),
        band_count, bands_rendered, cancelled, "Render complete"
    );

    RenderResult {
        grid,
        elapsed,
        band_count,
        bands_rendered,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn basic_render_produces_iteration_data() {
        let grid = compute_grid(128, 96, 100, &Viewport::DEFAULT);
        assert_eq!(grid.data.len(), 128 * 96);
        assert!(grid.data.iter().all(|&n| n <= 100));
        assert!(grid.inside_count() > 0);
    }

    #[test]
    fn matches_sequential_evaluation() {
        let vp = Viewport::new(-2.0, 1.0, -1.5, 1.5).unwrap();
        let grid = compute_grid(40, 31, 80, &vp);
        for py in 0..31 {
            for px in 0..40 {
                let (x, y) = vp.pixel_to_plane(px as f64, py as f64, 40, 31);
                assert_eq!(grid.get(px, py), Some(escape_iterations(x, y, 80)));
            }
        }
    }

    #[test]
    fn zero_dimensions_yield_empty_grid() {
        let grid = compute_grid(0, 100, 50, &Viewport::DEFAULT);
        assert!(grid.is_empty());
        let grid = compute_grid(100, 0, 50, &Viewport::DEFAULT);
        assert!(grid.is_empty());
        assert_eq!(grid.width, 100);
    }

    #[test]
    fn result_reports_bands() {
        let cancel = RenderCancel::new();
        let result = render_grid(16, 10, 50, &Viewport::DEFAULT, 3, &cancel);
        assert!(!result.cancelled());
        assert_eq!(result.band_count, 3);
        assert_eq!(result.bands_rendered, 3);
        assert_eq!(cancel.progress(), (3, 3));
    }

    #[test]
    fn cancelled_request_publishes_nothing() {
        let cancel = RenderCancel::new();
        let gen = cancel.generation();
        cancel.cancel();

        let result = render_grid_at(64, 30, 100, &Viewport::DEFAULT, 10, &cancel, gen);
        assert!(result.cancelled());
        assert!(result.grid.is_none());
        assert_eq!(result.band_count, 10);
        assert_eq!(result.bands_rendered, 0);
        assert_eq!(cancel.progress(), (0, 10));
    }

    #[test]
    fn current_generation_renders_everything() {
        let cancel = RenderCancel::new();
        cancel.cancel();
        let result = render_grid_at(
            64,
            30,
            100,
            &Viewport::DEFAULT,
            10,
            &cancel,
            cancel.generation(),
        );
        assert!(!result.cancelled());
        assert_eq!(result.bands_rendered, 10);
        assert_eq!(result.grid.unwrap(), compute_grid_with_bands(64, 30, 100, &Viewport::DEFAULT, 10));
    }
}
