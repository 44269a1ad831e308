use crate::error::CoreError;
use crate::viewport::Viewport;

/// A named, fixed region of the complex plane.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Preset {
    pub name: String,
    pub viewport: Viewport,
}

impl Preset {
    pub fn new(name: impl Into<String>, viewport: Viewport) -> Self {
        Self {
            name: name.into(),
            viewport,
        }
    }
}

/// Built-in views, `home` first.
pub fn builtin_presets() -> Vec<Preset> {
    vec![
        Preset::new("home", Viewport::DEFAULT),
        Preset::new(
            "wide",
            Viewport {
                x_min: -5.0,
                x_max: 5.0,
                y_min: -1.0,
                y_max: 1.0,
            },
        ),
        Preset::new(
            "seahorse",
            Viewport {
                x_min: -0.7881,
                x_max: -0.7281,
                y_min: -0.1755,
                y_max: -0.1155,
            },
        ),
        Preset::new(
            "elephant",
            Viewport {
                x_min: 0.235,
                x_max: 0.315,
                y_min: -0.04,
                y_max: 0.04,
            },
        ),
    ]
}

/// Lookup table of presets by name.
///
/// Names are matched case-insensitively.  Adding a preset whose name already
/// exists replaces the older entry.
#[derive(Debug, Clone)]
pub struct PresetTable {
    presets: Vec<Preset>,
}

impl PresetTable {
    pub fn new() -> Self {
        Self {
            presets: builtin_presets(),
        }
    }

    pub fn insert(&mut self, preset: Preset) {
        match self
            .presets
            .iter_mut()
            .find(|p| p.name.eq_ignore_ascii_case(&preset.name))
        {
            Some(existing) => existing.viewport = preset.viewport,
            None => self.presets.push(preset),
        }
    }

    pub fn get(&self, name: &str) -> crate::Result<Viewport> {
        self.presets
            .iter()
            .find(|p| p.name.eq_ignore_ascii_case(name))
            .map(|p| p.viewport)
            .ok_or_else(|| CoreError::UnknownPreset(name.to_string()))
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.presets.iter().map(|p| p.name.as_str())
    }
}

impl Default for PresetTable {
    fn default() -> Self {
        Self::new()
    }
}
