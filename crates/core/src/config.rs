use crate::RenderConfig;
use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError};

/// Configuration for a whole board: tile geometry, the initial seeded area,
/// and nested config for each of the subsystems. Every field has a default, so
/// a partial config (or an empty one) deserializes into something usable.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct BoardConfig {
    /// World-space size of each hexagon, i.e. the distance from its center to
    /// any vertex. This is the size of a tile at zoom 1.0.
    #[validate(range(min = 0.001))]
    pub hex_radius: f64,

    /// Tiles are seeded in a hexagon around the origin with this many rings
    /// (not counting the center tile). 0 means just the origin tile.
    #[validate(range(max = 1000))]
    pub seed_radius: u16,

    /// Config for the pan/zoom camera
    #[validate]
    pub camera: CameraConfig,

    /// Config for how pointer input is interpreted
    #[validate]
    pub gesture: GestureConfig,

    /// Config for the visual output
    #[validate]
    pub render: RenderConfig,
}

/// Configuration for the camera. Zoom is a world-to-screen scale factor, so
/// 2.0 means each world pixel takes up two screen pixels.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize, Validate)]
#[validate(schema(function = "validate_zoom_bounds"))]
#[serde(default)]
pub struct CameraConfig {
    /// Furthest the camera can zoom out
    #[validate(range(min = 0.001))]
    pub zoom_min: f64,
    /// Furthest the camera can zoom in
    #[validate(range(min = 0.001))]
    pub zoom_max: f64,
}

/// Configuration for turning raw pointer and wheel input into gestures.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct GestureConfig {
    /// How far (in screen pixels, along either axis) a pointer can move
    /// between press and release and still count as a tap. Anything that
    /// moves this far or further is a drag, and won't toggle a tile.
    #[validate(range(min = 0.0))]
    pub tap_slop: f64,

    /// Two presses closer together than this (in milliseconds) make a
    /// double-tap.
    #[validate(range(min = 0.0))]
    pub double_tap_window_ms: f64,

    /// Zoom multiplier applied on a double-tap
    #[validate(range(min = 1.0))]
    pub double_tap_zoom: f64,

    /// Each wheel event zooms by `wheel_zoom_base ^ -delta_y`, so scrolling up
    /// (negative delta) zooms in.
    #[validate(range(min = 1.0))]
    pub wheel_zoom_base: f64,
}

impl Default for BoardConfig {
    fn default() -> Self {
        Self {
            hex_radius: 25.0,
            seed_radius: 8,
            camera: CameraConfig::default(),
            gesture: GestureConfig::default(),
            render: RenderConfig::default(),
        }
    }
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            zoom_min: 0.5,
            zoom_max: 3.5,
        }
    }
}

impl Default for GestureConfig {
    fn default() -> Self {
        Self {
            tap_slop: 6.0,
            double_tap_window_ms: 280.0,
            double_tap_zoom: 1.6,
            wheel_zoom_base: 1.0015,
        }
    }
}

fn validate_zoom_bounds(config: &CameraConfig) -> Result<(), ValidationError> {
    if config.zoom_min <= config.zoom_max {
        Ok(())
    } else {
        let mut error = ValidationError::new("zoom_bounds");
        error.message = Some("zoom_min must not be greater than zoom_max".into());
        Err(error)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_valid() {
        BoardConfig::default().validate().unwrap();
    }

    #[test]
    fn test_inverted_zoom_bounds() {
        let config = CameraConfig {
            zoom_min: 2.0,
            zoom_max: 1.0,
        };
        let errors = config.validate().unwrap_err();
        assert!(
            errors.errors().contains_key("__all__"),
            "expected a struct-level error in {:#?}",
            errors
        );
    }

    #[test]
    fn test_partial_deserialize() {
        let config: BoardConfig = serde_json::from_str(
            r#"{"seed_radius": 3, "camera": {"zoom_max": 5.0}}"#,
        )
        .unwrap();
        assert_eq!(config.seed_radius, 3);
        assert_eq!(config.camera.zoom_max, 5.0);
        // Everything else comes from defaults
        assert_eq!(config.camera.zoom_min, 0.5);
        assert_eq!(config.hex_radius, 25.0);
        assert_eq!(config.gesture, GestureConfig::default());
    }
}
