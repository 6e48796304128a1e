use crate::Color;
use serde::{Deserialize, Serialize};
use validator::Validate;

/// Configuration specific to visually rendering a board. These options have
/// absolutely no bearing on board _state_ (tile ownership, camera position),
/// only on how that state is presented each frame.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct RenderConfig {
    /// Extra world-space padding around the viewport before culling, measured
    /// in on-screen hex radii. Tiles that are partly visible at the edges have
    /// centers outside the viewport, so we need some slack.
    #[validate(range(min = 0.0))]
    pub cull_padding_radii: f64,

    /// Extra padding applied to the culling box after it's converted to
    /// axial coordinates, in tiles.
    #[validate(range(min = 0, max = 100))]
    pub cull_padding_tiles: i32,

    /// Subtracted from each hexagon's on-screen radius, so neighboring tiles
    /// don't overlap along their shared edge. Without this, antialiasing
    /// makes the seams visible.
    #[validate(range(min = 0.0))]
    pub seam_inset: f64,

    /// Fill color for owned tiles. Unowned tiles are outline-only.
    pub owned_color: Color,

    /// Stroke color for every tile's outline
    pub grid_color: Color,

    /// Weight of the previous value in the smoothed FPS metric. Each frame,
    /// `fps = fps * smoothing + instant_fps * (1 - smoothing)`.
    #[validate(range(min = 0.0, max = 1.0))]
    pub fps_smoothing: f64,

    /// Upper bound for the device pixel ratio. Very dense displays would
    /// otherwise get enormous backing buffers.
    #[validate(range(min = 1.0))]
    pub max_pixel_ratio: f64,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            cull_padding_radii: 3.0,
            cull_padding_tiles: 2,
            seam_inset: 0.5,
            owned_color: Color::new_int(0x26, 0xc2, 0x81),
            grid_color: Color::new_rgba(255, 255, 255, 0.08),
            fps_smoothing: 0.92,
            max_pixel_ratio: 3.0,
        }
    }
}
