use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::{debug, error, info, warn};

use mandelzoom_core::{FractalParams, Preset, PresetTable, Viewport};
use mandelzoom_render::ROWS_PER_BAND;

// ---------------------------------------------------------------------------
// Application preferences
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AppPreferences {
    #[serde(default = "default_image_size")]
    pub image_width: u32,
    #[serde(default = "default_image_size")]
    pub image_height: u32,
    #[serde(default = "default_max_iterations")]
    pub max_iterations: u32,
    /// Start with escaped points drawn white instead of the palette.
    #[serde(default)]
    pub monochrome: bool,
    /// Target band height for the parallel scheduler.
    #[serde(default = "default_rows_per_band")]
    pub rows_per_band: u32,
    /// Extra named views, added to (or overriding) the built-in presets.
    #[serde(default)]
    pub presets: Vec<Preset>,
    #[serde(default = "default_true")]
    pub restore_last_view: bool,
    #[serde(default)]
    pub last_view: Option<Viewport>,
}

fn default_image_size() -> u32 {
    1080
}
fn default_max_iterations() -> u32 {
    FractalParams::DEFAULT_MAX_ITERATIONS
}
fn default_rows_per_band() -> u32 {
    ROWS_PER_BAND
}
fn default_true() -> bool {
    true
}

impl Default for AppPreferences {
    fn default() -> Self {
        Self {
            image_width: default_image_size(),
            image_height: default_image_size(),
            max_iterations: default_max_iterations(),
            monochrome: false,
            rows_per_band: default_rows_per_band(),
            presets: Vec::new(),
            restore_last_view: true,
            last_view: None,
        }
    }
}

impl AppPreferences {
    /// Load preferences next to the executable, falling back to defaults.
    pub fn load() -> Self {
        Self::load_from(&crate::app_dir::preferences_path())
    }

    /// Load preferences from `path`.  A missing, unreadable or malformed
    /// file yields the defaults.
    pub fn load_from(path: &Path) -> Self {
        if !path.exists() {
            debug!("No preferences file at {}", path.display());
            return Self::default();
        }
        match fs::read_to_string(path) {
            Ok(json) => match serde_json::from_str::<AppPreferences>(&json) {
                Ok(prefs) => {
                    info!("Loaded preferences from {}", path.display());
                    return prefs.sanitized();
                }
                Err(e) => error!("Failed to parse preferences: {e}"),
            },
            Err(e) => error!("Failed to read preferences file: {e}"),
        }
        Self::default()
    }

    /// Persist preferences next to the executable.
    pub fn save(&self) {
        self.save_to(&crate::app_dir::preferences_path());
    }

    pub fn save_to(&self, path: &Path) {
        if let Some(parent) = path.parent() {
            if let Err(e) = fs::create_dir_all(parent) {
                error!("Failed to create config directory: {e}");
                return;
            }
        }
        match serde_json::to_string_pretty(self) {
            Ok(json) => {
                if let Err(e) = fs::write(path, &json) {
                    error!("Failed to write preferences: {e}");
                } else {
                    debug!("Saved preferences");
                }
            }
            Err(e) => error!("Failed to serialize preferences: {e}"),
        }
    }

    /// Built-in presets plus the user's own.
    pub fn preset_table(&self) -> PresetTable {
        let mut table = PresetTable::new();
        for preset in &self.presets {
            table.insert(preset.clone());
        }
        table
    }

    /// Replace values the engine would reject with their defaults.
    fn sanitized(mut self) -> Self {
        if self.max_iterations == 0 {
            warn!("max_iterations of 0 in preferences, using default");
            self.max_iterations = default_max_iterations();
        }
        if self.rows_per_band == 0 {
            warn!("rows_per_band of 0 in preferences, using default");
            self.rows_per_band = default_rows_per_band();
        }
        self
    }
}
