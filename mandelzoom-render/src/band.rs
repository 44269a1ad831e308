/// Default target band height.  Small enough that the pool has plenty of
/// bands to balance across threads, large enough that task overhead stays
/// negligible next to the per-pixel work.
pub const ROWS_PER_BAND: u32 = 3;

/// A contiguous range of image rows, `start_row..end_row`, computed as one task.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Band {
    pub start_row: u32,
    pub end_row: u32,
}

impl Band {
    pub fn row_count(&self) -> u32 {
        self.end_row - self.start_row
    }

    /// Number of pixels in this band for an image `width` pixels wide.
    pub fn pixel_count(&self, width: u32) -> usize {
        self.row_count() as usize * width as usize
    }
}

/// How many bands to cut `height` rows into for a target of `rows_per_band`.
///
/// Always at least one band for a non-empty image; zero for an empty one.
pub fn band_count_for(height: u32, rows_per_band: u32) -> u32 {
    if height == 0 {
        return 0;
    }
    (height / rows_per_band.max(1)).max(1)
}

/// Split `height` rows into `band_count` bands of equal height.
///
/// The last band absorbs the remainder of the integer division, so every
/// row is covered exactly once.  `band_count` is clamped to `1..=height`.
pub fn build_bands(height: u32, band_count: u32) -> Vec<Band> {
    if height == 0 {
        return Vec::new();
    }
    let count = band_count.clamp(1, height);
    let rows = height / count;
    (0..count)
        .map(|i| {
            let start_row = i * rows;
            let end_row = if i == count - 1 { height } else { start_row + rows };
            Band { start_row, end_row }
        })
        .collect()
}
