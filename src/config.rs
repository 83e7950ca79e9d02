use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::history::DEFAULT_MAX_HISTORY;

pub const DEFAULT_GRID_SIZE: usize = 24;
/// Largest accepted grid side, in pixels
pub const MAX_GRID_SIZE: usize = 256;
/// Largest accepted magnification
pub const MAX_SCALE: usize = 64;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config: {0}")]
    Read(#[from] std::io::Error),

    #[error("Failed to parse config: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Invalid config: {0}")]
    Invalid(String),
}

/// Modifier key that temporarily switches to the eyedropper while held
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PickModifier {
    #[default]
    Alt,
    Ctrl,
    Shift,
}

impl PickModifier {
    pub fn is_held(self, modifiers: egui::Modifiers) -> bool {
        match self {
            PickModifier::Alt => modifiers.alt,
            PickModifier::Ctrl => modifiers.ctrl,
            PickModifier::Shift => modifiers.shift,
        }
    }
}

/// Editor settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)] // if we add new fields, give them default values when deserializing old config
pub struct EditorConfig {
    pub width: usize,
    pub height: usize,
    /// Maximum number of history entries, including the initial state
    pub max_history: usize,
    /// Pencil writes the selected opacity instead of forcing it opaque
    pub opacity_aware_pencil: bool,
    pub pick_modifier: PickModifier,
    /// Screen pixels per texture pixel
    pub scale: usize,
    pub show_grid: bool,
    pub checker_light: [u8; 3],
    pub checker_dark: [u8; 3],
    pub grid_color: [u8; 3],
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            width: DEFAULT_GRID_SIZE,
            height: DEFAULT_GRID_SIZE,
            max_history: DEFAULT_MAX_HISTORY,
            opacity_aware_pencil: false,
            pick_modifier: PickModifier::Alt,
            scale: 16,
            show_grid: true,
            checker_light: [204, 204, 204],
            checker_dark: [153, 153, 153],
            grid_color: [80, 80, 80],
        }
    }
}

impl EditorConfig {
    /// Loads a JSON config file; missing fields take their defaults
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let json = fs::read_to_string(path)?;
        Self::from_json(&json)
    }

    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.width == 0 || self.height == 0 {
            return Err(ConfigError::Invalid(format!(
                "grid {}x{} has no pixels",
                self.width, self.height
            )));
        }
        if self.width > MAX_GRID_SIZE || self.height > MAX_GRID_SIZE {
            return Err(ConfigError::Invalid(format!(
                "grid {}x{} exceeds {}x{}",
                self.width, self.height, MAX_GRID_SIZE, MAX_GRID_SIZE
            )));
        }
        if self.max_history == 0 {
            return Err(ConfigError::Invalid("max_history must be at least 1".to_owned()));
        }
        if self.scale == 0 || self.scale > MAX_SCALE {
            return Err(ConfigError::Invalid(format!(
                "scale {} is outside 1..={}",
                self.scale, MAX_SCALE
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_json_uses_defaults() {
        let config = EditorConfig::from_json(r#"{ "opacity_aware_pencil": true, "pick_modifier": "shift" }"#)
            .unwrap();
        assert!(config.opacity_aware_pencil);
        assert_eq!(config.pick_modifier, PickModifier::Shift);
        assert_eq!(config.width, 24);
        assert_eq!(config.max_history, 30);
    }

    #[test]
    fn test_invalid_values_rejected() {
        assert!(matches!(
            EditorConfig::from_json(r#"{ "width": 0 }"#),
            Err(ConfigError::Invalid(_))
        ));
        assert!(matches!(
            EditorConfig::from_json("not json"),
            Err(ConfigError::Parse(_))
        ));
    }

    #[test]
    fn test_oversized_values_rejected() {
        assert!(matches!(
            EditorConfig::from_json(r#"{ "width": 4294967296, "height": 4294967296 }"#),
            Err(ConfigError::Invalid(_))
        ));
        assert!(matches!(
            EditorConfig::from_json(r#"{ "height": 257 }"#),
            Err(ConfigError::Invalid(_))
        ));
        assert!(matches!(
            EditorConfig::from_json(r#"{ "scale": 65 }"#),
            Err(ConfigError::Invalid(_))
        ));
        assert!(EditorConfig::from_json(r#"{ "width": 256, "height": 256, "scale": 64 }"#).is_ok());
    }

    #[test]
    fn test_load_from_file() {
        let path = std::env::temp_dir().join(format!("texture_painter_{}.json", uuid::Uuid::new_v4()));
        fs::write(&path, r#"{ "width": 16, "show_grid": false }"#).unwrap();
        let loaded = EditorConfig::load(&path);
        fs::remove_file(&path).unwrap();

        let config = loaded.unwrap();
        assert_eq!(config.width, 16);
        assert_eq!(config.height, 24);
        assert!(!config.show_grid);
        assert!(matches!(
            EditorConfig::load(std::env::temp_dir().join("texture_painter_missing.json")),
            Err(ConfigError::Read(_))
        ));
    }

    #[test]
    fn test_pick_modifier() {
        let alt = egui::Modifiers { alt: true, ..Default::default() };
        assert!(PickModifier::Alt.is_held(alt));
        assert!(!PickModifier::Shift.is_held(alt));
    }
}
