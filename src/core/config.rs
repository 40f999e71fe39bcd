//! Canvas configuration
//!
//! Loaded from a JSON file; every field is optional and falls back to the
//! defaults below, so a partial file only overrides what it names.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use super::errors::CanvasError;

const CONFIG_DIR_NAME: &str = "maskcanvas";
const CONFIG_FILE_NAME: &str = "canvas.json";

/// Pointer interaction tuning (render pixels)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct InteractionConfig {
    /// Pick radius for transform handles
    pub handle_hit_radius: f32,
    /// Extra slop around thin shapes (linear centre line, band edges)
    pub line_hit_tolerance: f32,
    /// Rotation handle distance above a radial shape's top edge
    pub rotate_handle_offset: f32,
}

impl Default for InteractionConfig {
    fn default() -> Self {
        Self {
            handle_hit_radius: 8.0,
            line_hit_tolerance: 6.0,
            rotate_handle_offset: 24.0,
        }
    }
}

/// Initial brush settings for freshly opened canvases
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct BrushDefaults {
    /// Diameter in render pixels
    pub size: f32,
    /// Normalized feather (0.0 - 1.0)
    pub feather: f32,
}

impl Default for BrushDefaults {
    fn default() -> Self {
        Self {
            size: 50.0,
            feather: 0.5,
        }
    }
}

/// White-balance picker constants
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct WhiteBalanceConfig {
    /// Neighborhood radius; the sampled window is `2 * radius + 1` wide
    pub sample_radius: u32,
    pub gamma: f64,
    pub temperature_scale: f64,
    pub tint_scale: f64,
    /// Denominators below this produce a zero delta
    pub min_denominator: f64,
    /// Resulting temperature/tint are clamped to `[-limit, limit]`
    pub limit: f64,
}

impl Default for WhiteBalanceConfig {
    fn default() -> Self {
        Self {
            sample_radius: 5,
            gamma: 2.2,
            temperature_scale: 125.0,
            tint_scale: 400.0,
            min_denominator: 1e-4,
            limit: 100.0,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct CanvasConfig {
    pub interaction: InteractionConfig,
    pub brush: BrushDefaults,
    pub white_balance: WhiteBalanceConfig,
}

impl CanvasConfig {
    /// Parse a JSON document, filling absent fields with defaults.
    pub fn from_json_str(json: &str) -> Result<Self, CanvasError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Load from `path`, or from the per-user config location when `None`.
    ///
    /// A missing file is not an error: defaults are returned.
    pub fn load(path: Option<&Path>) -> Result<Self, CanvasError> {
        let path = match path {
            Some(p) => p.to_path_buf(),
            None => match default_config_path() {
                Some(p) => p,
                None => {
                    tracing::debug!("No config directory available, using defaults");
                    return Ok(Self::default());
                }
            },
        };

        if !path.exists() {
            tracing::debug!("Config {} not found, using defaults", path.display());
            return Ok(Self::default());
        }

        let text = std::fs::read_to_string(&path)?;
        let config = Self::from_json_str(&text)?;
        tracing::info!("Loaded canvas config from {}", path.display());
        Ok(config)
    }

    fn validate(&self) -> Result<(), CanvasError> {
        let wb = &self.white_balance;
        if !wb.gamma.is_finite() || wb.gamma <= 0.0 {
            return Err(CanvasError::Config(
                "whiteBalance.gamma must be a positive finite number".to_string(),
            ));
        }
        if !wb.limit.is_finite() || wb.limit <= 0.0 {
            return Err(CanvasError::Config(
                "whiteBalance.limit must be a positive finite number".to_string(),
            ));
        }
        if !self.interaction.handle_hit_radius.is_finite()
            || self.interaction.handle_hit_radius < 0.0
        {
            return Err(CanvasError::Config(
                "interaction.handleHitRadius must be non-negative".to_string(),
            ));
        }
        if !(0.0..=1.0).contains(&self.brush.feather) {
            return Err(CanvasError::Config(
                "brush.feather must be in [0, 1]".to_string(),
            ));
        }
        Ok(())
    }
}

/// `<config_dir>/maskcanvas/canvas.json`
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join(CONFIG_DIR_NAME).join(CONFIG_FILE_NAME))
}
