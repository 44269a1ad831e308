pub mod band;
pub mod buffer;
pub mod engine;
pub mod error;
pub mod grid;
pub mod lch;
pub mod palette;
pub mod renderer;

pub use band::{band_count_for, build_bands, Band, ROWS_PER_BAND};
pub use buffer::{RenderBuffer, ESCAPED_MONOCHROME_COLOR, INSIDE_COLOR};
pub use engine::{EngineConfig, Frame, FrameEngine};
pub use error::RenderError;
pub use grid::IterationGrid;
pub use lch::Lch;
pub use palette::{color_for_mode, palette_color, ColorCache};
pub use renderer::{
    compute_grid, compute_grid_with_bands, render_grid, render_grid_at, RenderCancel, RenderResult,
};

/// Convenience result type for the render crate.
pub type Result<T> = std::result::Result<T, RenderError>;
