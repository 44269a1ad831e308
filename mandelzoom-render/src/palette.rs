use std::f64::consts::PI;

use rayon::prelude::*;
use tracing::debug;

use crate::buffer::{RenderBuffer, ESCAPED_MONOCHROME_COLOR, INSIDE_COLOR};
use crate::grid::IterationGrid;
use crate::lch::Lch;

// ---------------------------------------------------------------------------
// Palette math
// ---------------------------------------------------------------------------

/// Perceptual palette color for an iteration count, without caching.
///
/// Points that reached `max_iter` are black.  Escaped points walk a hue
/// spiral whose lightness and chroma dip and recover as `s = iter / max`
/// goes from 0 to 1:
///
/// ```text
/// v = 1 − cos²(π·s)
/// L = 75 − 75·v
/// C = 28 + 75 − 75·v
/// H = (360·s)^1.5 mod 360
/// ```
pub fn palette_color(iter: u32, max_iter: u32) -> [u8; 4] {
    if iter >= max_iter {
        return INSIDE_COLOR;
    }
    let s = iter as f64 / max_iter as f64;
    let cos = (PI * s).cos();
    let v = 1.0 - cos * cos;
    let l = 75.0 - 75.0 * v;
    let c = 28.0 + (75.0 - 75.0 * v);
    let h = (360.0 * s).powf(1.5) % 360.0;
    Lch::new(l, c, h).to_rgba()
}

/// Color for an iteration count, honoring monochrome mode.
///
/// In monochrome mode every escaped point is white and only points inside
/// the set stay black.
pub fn color_for_mode(iter: u32, max_iter: u32, monochrome: bool) -> [u8; 4] {
    if monochrome {
        if iter >= max_iter {
            INSIDE_COLOR
        } else {
            ESCAPED_MONOCHROME_COLOR
        }
    } else {
        palette_color(iter, max_iter)
    }
}

// ---------------------------------------------------------------------------
// Cache
// ---------------------------------------------------------------------------

/// Memoized palette colors for one iteration cap.
///
/// Entries are filled lazily and never evicted while the cap stays the
/// same.  Asking for a color under a different cap clears the table first,
/// so a color computed for one cap is never served for another.
#[derive(Debug, Clone, Default)]
pub struct ColorCache {
    max_iterations: u32,
    entries: Vec<Option<[u8; 4]>>,
    filled: usize,
}

impl ColorCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// The cap the cached entries belong to.
    pub fn max_iterations(&self) -> u32 {
        self.max_iterations
    }

    /// Number of cached colors.
    pub fn len(&self) -> usize {
        self.filled
    }

    pub fn is_empty(&self) -> bool {
        self.filled == 0
    }

    /// Drop every entry.
    pub fn clear(&mut self) {
        self.entries.clear();
        self.filled = 0;
    }

    /// Palette color for `iter` under `max_iter`, computed at most once.
    pub fn color_for(&mut self, iter: u32, max_iter: u32) -> [u8; 4] {
        self.retarget(max_iter);
        self.lookup_or_insert(iter.min(max_iter))
    }

    /// [`color_for`](Self::color_for) with monochrome mode.  Monochrome
    /// colors are constant and skip the cache.
    pub fn color_for_mode(&mut self, iter: u32, max_iter: u32, monochrome: bool) -> [u8; 4] {
        if monochrome {
            color_for_mode(iter, max_iter, true)
        } else {
            self.color_for(iter, max_iter)
        }
    }

    /// Colorize an entire iteration grid into an RGBA pixel buffer.
    ///
    /// Missing palette entries are filled on this thread first; the pixels
    /// are then mapped in parallel against the read-only table.
    pub fn colorize(&mut self, grid: &IterationGrid, monochrome: bool) -> RenderBuffer {
        let max_iter = grid.max_iterations;
        if !monochrome {
            self.retarget(max_iter);
            for &n in &grid.data {
                self.lookup_or_insert(n.min(max_iter));
            }
        }

        let entries = &self.entries;
        let mut pixels = vec![0u8; grid.data.len() * 4];
        pixels
            .par_chunks_mut(4)
            .zip(grid.data.par_iter())
            .for_each(|(pixel, &n)| {
                let c = if monochrome {
                    color_for_mode(n, max_iter, true)
                } else {
                    entries
                        .get(n.min(max_iter) as usize)
                        .copied()
                        .flatten()
                        .unwrap_or_else(|| palette_color(n, max_iter))
                };
                pixel.copy_from_slice(&c);
            });

        RenderBuffer {
            width: grid.width,
            height: grid.height,
            pixels,
        }
    }

    fn retarget(&mut self, max_iter: u32) {
        if max_iter != self.max_iterations {
            if self.filled > 0 {
                debug!(
                    old = self.max_iterations,
                    new = max_iter,
                    dropped = self.filled,
                    "Iteration cap changed, clearing color cache"
                );
            }
            self.clear();
            self.max_iterations = max_iter;
        }
    }

    fn lookup_or_insert(&mut self, iter: u32) -> [u8; 4] {
        let idx = iter as usize;
        if idx >= self.entries.len() {
            self.entries.resize(idx + 1, None);
        }
        match self.entries[idx] {
            Some(c) => c,
            None => {
                let c = palette_color(iter, self.max_iterations);
                self.entries[idx] = Some(c);
                self.filled += 1;
                c
            }
        }
    }
}
