use thiserror::Error;

/// Errors originating from the rendering pipeline.
#[derive(Debug, Error)]
pub enum RenderError {
    #[error("invalid rows per band: {0} (must be > 0)")]
    InvalidBandSize(u32),

    #[error("render cancelled")]
    Cancelled,

    #[error(transparent)]
    Core(#[from] mandelzoom_core::CoreError),
}
