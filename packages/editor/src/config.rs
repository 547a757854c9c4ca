use crate::errors::ConfigError;
use crate::placement::{Canvas, CenteredFrameTransform};
use serde::{Deserialize, Serialize};
use std::path::Path;

pub const DEFAULT_CONFIG_NAME: &str = "manimdsl.config.json";

/// Editor page configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct EditorConfig {
    /// Placement canvas width in pixels
    pub canvas_width: f64,

    /// Placement canvas height in pixels
    pub canvas_height: f64,

    /// Scene frame width in target units
    pub frame_width: f64,

    /// Scene frame height in target units
    pub frame_height: f64,

    /// Suffix (without the dot) that marks program source files
    pub program_extension: String,

    /// Suffix (without the dot) that marks style configuration files
    pub style_extension: String,

    /// Filename tracked for the program source until a file is imported
    pub program_file_name: String,

    /// Filename tracked for the style configuration until a file is imported
    pub style_file_name: String,

    /// Name submitted with every compile request
    pub animation_name: String,

    /// Flush the editing surface into the active document before an import
    /// overwrites it. Off by default: unflushed edits are dropped on import.
    pub flush_before_import: bool,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            canvas_width: 700.0,
            canvas_height: 400.0,
            frame_width: 8.0 * 16.0 / 9.0,
            frame_height: 8.0,
            program_extension: "manimdsl".to_string(),
            style_extension: "json".to_string(),
            program_file_name: "code.manimdsl".to_string(),
            style_file_name: "test.json".to_string(),
            animation_name: "myAnim".to_string(),
            flush_before_import: false,
        }
    }
}

impl EditorConfig {
    /// Load config from a directory, falling back to defaults when absent
    pub fn load(dir: &Path) -> Result<Self, ConfigError> {
        let config_path = dir.join(DEFAULT_CONFIG_NAME);

        if config_path.exists() {
            let content = std::fs::read_to_string(&config_path)?;
            Self::from_json(&content)
        } else {
            Ok(Self::default())
        }
    }

    pub fn from_json(content: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Canvas and frame dimensions must be positive for placement to map
    pub fn validate(&self) -> Result<(), ConfigError> {
        let dimensions = [
            ("canvasWidth", self.canvas_width),
            ("canvasHeight", self.canvas_height),
            ("frameWidth", self.frame_width),
            ("frameHeight", self.frame_height),
        ];

        for (field, value) in dimensions {
            if !(value.is_finite() && value > 0.0) {
                return Err(ConfigError::NotPositive { field, value });
            }
        }
        Ok(())
    }

    pub fn canvas(&self) -> Canvas {
        Canvas {
            width: self.canvas_width,
            height: self.canvas_height,
        }
    }

    /// Coordinate transform onto this config's scene frame
    pub fn frame_transform(&self) -> CenteredFrameTransform {
        CenteredFrameTransform {
            frame_width: self.frame_width,
            frame_height: self.frame_height,
        }
    }
}
