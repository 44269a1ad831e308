//! CIE LCh(uv) → sRGB conversion.
//!
//! Lightness and chroma are on the usual 0–100 CIE scale, hue in degrees.
//! The path is LCh(uv) → CIELUV → XYZ (D65 white) → linear sRGB → gamma
//! encoded sRGB, clamped to the displayable gamut per channel.

/// D65 reference white.
const WHITE_X: f64 = 0.95047;
const WHITE_Y: f64 = 1.0;
const WHITE_Z: f64 = 1.08883;

/// CIE ε·κ = (6/29)³ · (29/3)³ = 8, the lightness below which `Y` is linear in `L`.
const KAPPA_EPSILON: f64 = 8.0;
/// CIE κ = (29/3)³.
const KAPPA: f64 = 24389.0 / 27.0;

/// An LCh(uv) color.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Lch {
    pub l: f64,
    pub c: f64,
    pub h: f64,
}

impl Lch {
    pub fn new(l: f64, c: f64, h: f64) -> Self {
        Self { l, c, h }
    }

    /// Convert to 8-bit sRGB with full alpha.
    pub fn to_rgba(self) -> [u8; 4] {
        let (l, u, v) = self.to_luv();
        let (x, y, z) = luv_to_xyz(l, u, v);
        let [r, g, b] = xyz_to_srgb(x, y, z);
        [r, g, b, 255]
    }

    fn to_luv(self) -> (f64, f64, f64) {
        let h = self.h.to_radians();
        (self.l, self.c * h.cos(), self.c * h.sin())
    }
}

/// The `u'`/`v'` chromaticity of the reference white.
fn white_uv() -> (f64, f64) {
    let denom = WHITE_X + 15.0 * WHITE_Y + 3.0 * WHITE_Z;
    (4.0 * WHITE_X / denom, 9.0 * WHITE_Y / denom)
}

fn luv_to_xyz(l: f64, u: f64, v: f64) -> (f64, f64, f64) {
    if l <= 0.0 {
        return (0.0, 0.0, 0.0);
    }
    let y = if l > KAPPA_EPSILON {
        WHITE_Y * ((l + 16.0) / 116.0).powi(3)
    } else {
        WHITE_Y * l / KAPPA
    };
    let (un, vn) = white_uv();
    let u_prime = u / (13.0 * l) + un;
    let v_prime = v / (13.0 * l) + vn;
    if v_prime == 0.0 {
        return (0.0, y, 0.0);
    }
    let x = y * 9.0 * u_prime / (4.0 * v_prime);
    let z = y * (12.0 - 3.0 * u_prime - 20.0 * v_prime) / (4.0 * v_prime);
    (x, y, z)
}

fn xyz_to_srgb(x: f64, y: f64, z: f64) -> [u8; 3] {
    let r = 3.2404542 * x - 1.5371385 * y - 0.4985314 * z;
    let g = -0.9692660 * x + 1.8760108 * y + 0.0415560 * z;
    let b = 0.0556434 * x - 0.2040259 * y + 1.0572252 * z;
    [encode(r), encode(g), encode(b)]
}

/// Gamma-encode a linear channel, clamp and round it to a byte.
fn encode(linear: f64) -> u8 {
    let c = if linear <= 0.0031308 {
        12.92 * linear
    } else {
        1.055 * linear.powf(1.0 / 2.4) - 0.055
    };
    (c.clamp(0.0, 1.0) * 255.0).round() as u8
}
