use crate::error::CoreError;

/// Map a screen-space coordinate onto one axis of the complex plane.
///
/// `screen_coord / screen_max` is the fraction along the axis, which is then
/// scaled into `[bound_min, bound_max]`.  Coordinates outside
/// `[0, screen_max]` extrapolate linearly.  `screen_max` must be positive.
#[inline]
pub fn map_coordinate(screen_coord: f64, screen_max: f64, bound_max: f64, bound_min: f64) -> f64 {
    (screen_coord / screen_max) * (bound_max - bound_min) + bound_min
}

/// The rectangular region of the complex plane mapped onto the output image.
///
/// Both axes are mapped independently: pixel column 0 lands on `x_min` and
/// pixel row 0 lands on `y_min`.  If the image aspect ratio differs from the
/// viewport's, the picture is stretched.
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize)]
pub struct Viewport {
    pub x_min: f64,
    pub x_max: f64,
    pub y_min: f64,
    pub y_max: f64,
}

/// Deserialization goes through [`Viewport::new`] so a config file can never
/// smuggle in an inverted or empty region.
impl<'de> serde::Deserialize<'de> for Viewport {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(serde::Deserialize)]
        struct Raw {
            x_min: f64,
            x_max: f64,
            y_min: f64,
            y_max: f64,
        }
        let raw = Raw::deserialize(deserializer)?;
        Viewport::new(raw.x_min, raw.x_max, raw.y_min, raw.y_max)
            .map_err(serde::de::Error::custom)
    }
}

impl Viewport {
    /// Startup view: the whole set with some margin, `[-2.2, 2.2]²`.
    pub const DEFAULT: Viewport = Viewport {
        x_min: -2.2,
        x_max: 2.2,
        y_min: -2.2,
        y_max: 2.2,
    };

    /// Create a viewport, rejecting non-finite bounds and non-positive spans.
    pub fn new(x_min: f64, x_max: f64, y_min: f64, y_max: f64) -> crate::Result<Self> {
        if ![x_min, x_max, y_min, y_max].iter().all(|v| v.is_finite()) {
            return Err(CoreError::InvalidViewport {
                reason: format!(
                    "bounds must be finite, got x [{x_min}, {x_max}] y [{y_min}, {y_max}]"
                ),
            });
        }
        if x_max <= x_min {
            return Err(CoreError::InvalidViewport {
                reason: format!("x span must be positive, got [{x_min}, {x_max}]"),
            });
        }
        if y_max <= y_min {
            return Err(CoreError::InvalidViewport {
                reason: format!("y span must be positive, got [{y_min}, {y_max}]"),
            });
        }
        Ok(Self {
            x_min,
            x_max,
            y_min,
            y_max,
        })
    }

    /// Map a pixel of a `width × height` image to a point on the complex plane.
    #[inline]
    pub fn pixel_to_plane(&self, px: f64, py: f64, width: u32, height: u32) -> (f64, f64) {
        (
            map_coordinate(px, width as f64, self.x_max, self.x_min),
            map_coordinate(py, height as f64, self.y_max, self.y_min),
        )
    }

    /// The viewport covered by the pixel rectangle `[px0, px1] × [py0, py1]`
    /// of a `width × height` image showing `self`.
    pub fn sub_viewport(
        &self,
        px0: f64,
        py0: f64,
        px1: f64,
        py1: f64,
        width: u32,
        height: u32,
    ) -> crate::Result<Self> {
        if width == 0 || height == 0 {
            return Err(CoreError::InvalidViewport {
                reason: format!("image dimensions must be > 0, got {width}×{height}"),
            });
        }
        let (x_min, y_min) = self.pixel_to_plane(px0, py0, width, height);
        let (x_max, y_max) = self.pixel_to_plane(px1, py1, width, height);
        Self::new(x_min, x_max, y_min, y_max)
    }

    pub fn width(&self) -> f64 {
        self.x_max - self.x_min
    }

    pub fn height(&self) -> f64 {
        self.y_max - self.y_min
    }

    /// `true` if `other` lies inside `self` and is strictly narrower on both axes.
    pub fn strictly_contains(&self, other: &Viewport) -> bool {
        other.x_min >= self.x_min
            && other.x_max <= self.x_max
            && other.y_min >= self.y_min
            && other.y_max <= self.y_max
            && other.width() < self.width()
            && other.height() < self.height()
    }
}

impl Default for Viewport {
    fn default() -> Self {
        Self::DEFAULT
    }
}
