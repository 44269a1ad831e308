use thiserror::Error;

/// Errors originating from the core fractal engine.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum CoreError {
    #[error("invalid max iterations: {0} (must be >= 1)")]
    InvalidMaxIterations(u32),

    #[error("invalid viewport: {reason}")]
    InvalidViewport { reason: String },

    #[error("unknown preset: {0:?}")]
    UnknownPreset(String),
}
