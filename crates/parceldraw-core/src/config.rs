//! Editor tuning parameters.

use crate::shapes::{MAX_POLYGON_POINTS, MIN_POLYGON_POINTS};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors raised while loading an editor configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to parse config: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("invalid config: {field} must be {requirement}")]
    Invalid {
        field: &'static str,
        requirement: &'static str,
    },
}

/// Tunable thresholds for the interaction controller.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EditorConfig {
    /// Both extents of a new rectangle/circle must exceed this to commit.
    pub min_draw_extent: f64,
    /// Smallest width/height a resize may produce.
    pub min_resize_size: f64,
    /// Polygon samples are recorded only once the pointer moved further than this.
    pub polygon_sample_distance: f64,
    /// Initial polygon target point count.
    pub default_point_count: usize,
    /// Degrees added by one rotate action.
    pub rotate_step: f64,
    /// Pick radius around handles and action buttons.
    pub handle_tolerance: f64,
    /// Hit tolerance used when picking shapes.
    pub shape_tolerance: f64,
    /// Distance of the action cluster above a rectangle/circle.
    pub action_offset: f64,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            min_draw_extent: 10.0,
            min_resize_size: 50.0,
            polygon_sample_distance: 20.0,
            default_point_count: 8,
            rotate_step: 90.0,
            handle_tolerance: 8.0,
            shape_tolerance: 2.0,
            action_offset: 48.0,
        }
    }
}

impl EditorConfig {
    /// Parse and validate a JSON configuration. Missing fields take defaults.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Check that every threshold is usable.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let non_negative = [
            ("min_draw_extent", self.min_draw_extent),
            ("polygon_sample_distance", self.polygon_sample_distance),
            ("handle_tolerance", self.handle_tolerance),
            ("shape_tolerance", self.shape_tolerance),
            ("action_offset", self.action_offset),
        ];
        for (field, value) in non_negative {
            if !value.is_finite() || value < 0.0 {
                return Err(ConfigError::Invalid {
                    field,
                    requirement: "a finite non-negative number",
                });
            }
        }
        if !self.min_resize_size.is_finite() || self.min_resize_size <= 0.0 {
            return Err(ConfigError::Invalid {
                field: "min_resize_size",
                requirement: "a finite positive number",
            });
        }
        if !self.rotate_step.is_finite() {
            return Err(ConfigError::Invalid {
                field: "rotate_step",
                requirement: "finite",
            });
        }
        if !(MIN_POLYGON_POINTS..=MAX_POLYGON_POINTS).contains(&self.default_point_count) {
            return Err(ConfigError::Invalid {
                field: "default_point_count",
                requirement: "between 3 and 20",
            });
        }
        Ok(())
    }
}
