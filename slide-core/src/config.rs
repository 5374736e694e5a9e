//! Canvas configuration.
//!
//! All fields have defaults, so hosts can deserialize a partial JSON document
//! and only override what they need.

use serde::{Deserialize, Serialize};

use crate::geometry::ScalePolicy;
use crate::toolbar::ToolbarLayout;

/// Timing windows for gesture disambiguation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GestureConfig {
    /// How long after a first click a second click on the same element arms a drag.
    pub click_arm_window_ms: u64,
    /// How long a touch must be held before moving it drags the element.
    pub long_press_ms: u64,
}

impl Default for GestureConfig {
    fn default() -> Self {
        Self {
            click_arm_window_ms: 300,
            long_press_ms: 300,
        }
    }
}

/// Floating toolbar placement.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ToolbarConfig {
    /// Gap between the element edge and the toolbar anchor, in pixels.
    pub offset_px: f64,
    /// Above (standard) or below (compact) placement.
    pub layout: ToolbarLayout,
}

impl Default for ToolbarConfig {
    fn default() -> Self {
        Self {
            offset_px: 60.0,
            layout: ToolbarLayout::Standard,
        }
    }
}

/// Complete canvas configuration.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CanvasConfig {
    /// Gesture timing.
    pub gesture: GestureConfig,
    /// Toolbar placement.
    pub toolbar: ToolbarConfig,
    /// How the display scale is derived.
    pub scale: ScalePolicy,
    /// Screen-space hit radius of resize handles, in pixels.
    pub handle_radius_px: f64,
}

impl Default for CanvasConfig {
    fn default() -> Self {
        Self {
            gesture: GestureConfig::default(),
            toolbar: ToolbarConfig::default(),
            scale: ScalePolicy::default(),
            handle_radius_px: 8.0,
        }
    }
}

impl CanvasConfig {
    /// Configuration for constrained (mobile) displays: fit-to-width scale and
    /// the toolbar placed below the element.
    #[must_use]
    pub fn compact(padding: f64) -> Self {
        Self {
            toolbar: ToolbarConfig {
                layout: ToolbarLayout::Compact,
                ..ToolbarConfig::default()
            },
            scale: ScalePolicy::FitWidth { padding },
            ..Self::default()
        }
    }

    /// Parse a configuration from JSON, filling in defaults.
    ///
    /// # Errors
    ///
    /// Returns an error if the JSON is malformed.
    pub fn from_json(json: &str) -> crate::SlideResult<Self> {
        Ok(serde_json::from_str(json)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_source_timings() {
        let config = CanvasConfig::default();
        assert_eq!(config.gesture.click_arm_window_ms, 300);
        assert_eq!(config.gesture.long_press_ms, 300);
        assert_eq!(config.toolbar.layout, ToolbarLayout::Standard);
    }

    #[test]
    fn test_partial_json_fills_defaults() {
        let config =
            CanvasConfig::from_json(r#"{"gesture": {"long_press_ms": 500}}"#).expect("parse");
        assert_eq!(config.gesture.long_press_ms, 500);
        assert_eq!(config.gesture.click_arm_window_ms, 300);
        assert!((config.handle_radius_px - 8.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_compact_places_toolbar_below() {
        let config = CanvasConfig::compact(24.0);
        assert_eq!(config.toolbar.layout, ToolbarLayout::Compact);
        assert_eq!(config.scale, ScalePolicy::FitWidth { padding: 24.0 });
    }
}
