use mandelzoom_render::RenderBuffer;

/// Characters from dark to light.
const RAMP: &[u8] = b" .:-=+*#%@";

/// Render a coarse text picture of `buffer`, `columns` characters wide.
///
/// Terminal cells are about twice as tall as they are wide, so each row of
/// text covers twice as many pixel rows as a column covers pixel columns.
/// Each cell shows the luminance of the pixel at its center.
pub fn text_preview(buffer: &RenderBuffer, columns: u32) -> String {
    if buffer.is_empty() || columns == 0 {
        return String::new();
    }
    let columns = columns.min(buffer.width);
    let cell_w = buffer.width as f64 / columns as f64;
    let cell_h = cell_w * 2.0;
    let rows = ((buffer.height as f64 / cell_h).round() as u32).max(1);

    let mut out = String::with_capacity(((columns + 1) * rows) as usize);
    for row in 0..rows {
        let py = (((row as f64 + 0.5) * cell_h) as u32).min(buffer.height - 1);
        for col in 0..columns {
            let px = (((col as f64 + 0.5) * cell_w) as u32).min(buffer.width - 1);
            let c = buffer.pixel(px, py).map_or(' ', |rgba| ramp_char(luminance(rgba)));
            out.push(c);
        }
        out.push('\n');
    }
    out
}

/// Rec. 709 luma of an 8-bit color, in `0.0..=1.0`.
fn luminance(rgba: [u8; 4]) -> f64 {
    (0.2126 * rgba[0] as f64 + 0.7152 * rgba[1] as f64 + 0.0722 * rgba[2] as f64) / 255.0
}

fn ramp_char(lum: f64) -> char {
    let idx = (lum * (RAMP.len() - 1) as f64).round() as usize;
    RAMP[idx.min(RAMP.len() - 1)] as char
}
