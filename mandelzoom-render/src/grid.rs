use crate::band::Band;

/// Per-pixel escape-time counts for a full frame, row-major.
///
/// This is the raw output of the scheduler before coloring.  Keeping it
/// separate from colored pixels lets the presentation layer recolor (e.g.
/// toggle monochrome) without recomputing iterations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IterationGrid {
    pub width: u32,
    pub height: u32,
    pub max_iterations: u32,
    pub data: Vec<u32>,
}

impl IterationGrid {
    pub fn new(width: u32, height: u32, max_iterations: u32) -> Self {
        Self {
            width,
            height,
            max_iterations,
            data: vec![0; width as usize * height as usize],
        }
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    #[inline]
    pub fn get(&self, x: u32, y: u32) -> Option<u32> {
        if x >= self.width || y >= self.height {
            return None;
        }
        self.data.get(y as usize * self.width as usize + x as usize).copied()
    }

    /// Number of pixels that never escaped.
    pub fn inside_count(&self) -> usize {
        self.data.iter().filter(|&&n| n >= self.max_iterations).count()
    }

    /// Copy a band's rows into place.
    pub fn blit_band(&mut self, band: &Band, band_data: &[u32]) {
        debug_assert_eq!(band_data.len(), band.pixel_count(self.width));
        let start = band.start_row as usize * self.width as usize;
        let end = (start + band_data.len()).min(self.data.len());
        self.data[start..end].copy_from_slice(&band_data[..end - start]);
    }
}
