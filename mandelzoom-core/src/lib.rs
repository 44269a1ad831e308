pub mod controller;
pub mod error;
pub mod fractal;
pub mod mandelbrot;
pub mod preset;
pub mod viewport;

// Re-export primary types for convenience.
pub use controller::{ControllerState, Selection, SelectionRect, ViewportController};
pub use error::CoreError;
pub use fractal::FractalParams;
pub use mandelbrot::{escape_iterations, ESCAPE_RADIUS_SQ};
pub use preset::{builtin_presets, Preset, PresetTable};
pub use viewport::{map_coordinate, Viewport};

/// Convenience result type for the core crate.
pub type Result<T> = std::result::Result<T, CoreError>;
