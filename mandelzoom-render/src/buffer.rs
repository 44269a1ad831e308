/// Opaque black, used for points inside the set.
pub const INSIDE_COLOR: [u8; 4] = [0, 0, 0, 255];

/// Opaque white, used for every escaped point in monochrome mode.
pub const ESCAPED_MONOCHROME_COLOR: [u8; 4] = [255, 255, 255, 255];

/// An RGBA pixel buffer representing a rendered image.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderBuffer {
    pub width: u32,
    pub height: u32,
    /// RGBA pixel data, 4 bytes per pixel, row-major order.
    pub pixels: Vec<u8>,
}

impl RenderBuffer {
    /// Create a new buffer filled with opaque black.
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            pixels: INSIDE_COLOR.repeat(width as usize * height as usize),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.pixels.is_empty()
    }

    /// The RGBA value at `(x, y)`, or `None` outside the image.
    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let idx = (y as usize * self.width as usize + x as usize) * 4;
        let px = self.pixels.get(idx..idx + 4)?;
        Some([px[0], px[1], px[2], px[3]])
    }
}
