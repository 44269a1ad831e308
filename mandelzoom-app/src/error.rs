use thiserror::Error;

use mandelzoom_core::CoreError;
use mandelzoom_render::RenderError;

use crate::command::CommandError;

/// Anything a single driver command can fail with.  None of these end the
/// session; the driver logs them and carries on with the previous state.
#[derive(Debug, Error)]
pub enum AppError {
    #[error(transparent)]
    Command(#[from] CommandError),

    #[error(transparent)]
    Core(#[from] CoreError),

    #[error(transparent)]
    Render(#[from] RenderError),
}
