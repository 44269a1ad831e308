use crate::error::CoreError;

/// Parameters controlling escape-time iteration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct FractalParams {
    /// Maximum number of iterations before declaring a point inside the set.
    pub max_iterations: u32,
}

impl FractalParams {
    pub const DEFAULT_MAX_ITERATIONS: u32 = 2000;

    pub fn new(max_iterations: u32) -> crate::Result<Self> {
        if max_iterations < 1 {
            return Err(CoreError::InvalidMaxIterations(max_iterations));
        }
        Ok(Self { max_iterations })
    }

    /// `true` if `iterations` is the cap, i.e. the point never escaped.
    #[inline]
    pub fn is_inside(&self, iterations: u32) -> bool {
        iterations >= self.max_iterations
    }
}

impl Default for FractalParams {
    fn default() -> Self {
        Self {
            max_iterations: Self::DEFAULT_MAX_ITERATIONS,
        }
    }
}
