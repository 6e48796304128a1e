pub mod config;
pub mod frame;
pub mod surface;
#[cfg(feature = "svg")]
pub mod svg;
pub mod unit;

use crate::{
    axial_to_pixel, hex_polygon_vertices, pixel_to_axial, AxialRange, Camera,
    DrawSurface, FrameClock, Grid, Point2, RenderConfig, Tile,
};
use anyhow::Context;
use log::{debug, warn};
use serde::Serialize;
use validator::Validate;

/// A viewport renderer draws the visible part of a [Grid] onto a
/// [DrawSurface] each frame. A renderer is created using a particular
/// [RenderConfig], and from there can be used to draw any number of frames.
///
/// Besides drawing, the renderer owns the frame clock, so it's also the source
/// of the smoothed FPS metric.
#[derive(Clone, Debug)]
pub struct ViewportRenderer {
    /// Config that determines how rendering is done
    render_config: RenderConfig,
    clock: FrameClock,
}

/// Summary of a single rendered frame
#[derive(Copy, Clone, Debug, Default, PartialEq, Serialize)]
pub struct RenderStats {
    /// Number of tiles drawn successfully
    pub drawn: usize,
    /// Number of tiles skipped because they were outside the culling box
    pub culled_box: usize,
    /// Number of tiles whose draw commands failed. These tiles are skipped
    /// for this frame; the rest of the frame still gets drawn.
    pub failed: usize,
    /// Smoothed frames per second, as of this frame
    pub fps: f64,
}

impl ViewportRenderer {
    /// Initialize a new renderer with the given options. Returns an error if
    /// the render config is invalid.
    pub fn new(render_config: RenderConfig) -> anyhow::Result<Self> {
        render_config.validate()?;
        Ok(Self {
            clock: FrameClock::new(render_config.fps_smoothing),
            render_config,
        })
    }

    /// Get a reference to the config that this renderer uses
    pub fn render_config(&self) -> &RenderConfig {
        &self.render_config
    }

    /// The smoothed FPS, as of the last rendered frame
    pub fn fps(&self) -> f64 {
        self.clock.fps()
    }

    /// Calculate the box of axial coordinates that could possibly be visible
    /// with the given camera. The box is a superset of the visible tiles: all
    /// four viewport corners are padded outwards in world space, converted to
    /// axial, and the bounding box of those is padded again by a few tiles.
    pub fn visible_range(&self, camera: &Camera, hex_radius: f64) -> AxialRange {
        let pad =
            self.render_config.cull_padding_radii * hex_radius * camera.zoom();
        let (top_left, bottom_right) = camera.visible_world_rect();
        let corners = [
            Point2::new(top_left.x - pad, top_left.y - pad),
            Point2::new(bottom_right.x + pad, top_left.y - pad),
            Point2::new(top_left.x - pad, bottom_right.y + pad),
            Point2::new(bottom_right.x + pad, bottom_right.y + pad),
        ];
        AxialRange::bounding(
            corners
                .iter()
                .map(|corner| pixel_to_axial(*corner, hex_radius)),
        )
        // We always pass 4 corners, so this is unreachable
        .unwrap_or_else(|| AxialRange::new(0, 0, 0, 0))
        .padded(self.render_config.cull_padding_tiles)
    }

    /// Draw one frame. The surface is cleared, then every tile in the culling
    /// box is drawn as a hexagon: owned tiles filled, all tiles stroked.
    ///
    /// This never fails. If a draw command errors, the tile is skipped (and
    /// counted in [RenderStats::failed]) and drawing carries on, so one bad
    /// frame can't break the render loop.
    ///
    /// ## Params
    /// - `surface` - Where to draw
    /// - `grid` - The tiles to draw
    /// - `camera` - Viewport transform to draw with
    /// - `pixel_ratio` - Device pixel ratio, only used to pick a line width.
    ///   Scaling to physical pixels is up to the surface.
    /// - `timestamp_ms` - Frame timestamp, used for the FPS metric
    pub fn render(
        &mut self,
        surface: &mut impl DrawSurface,
        grid: &Grid,
        camera: &Camera,
        pixel_ratio: f64,
        timestamp_ms: f64,
    ) -> RenderStats {
        let fps = self.clock.tick(timestamp_ms);

        let viewport = camera.viewport();
        if let Err(err) =
            surface.clear_rect(0.0, 0.0, viewport.width, viewport.height)
        {
            warn!("Error clearing surface: {:#}", err);
        }

        let hex_radius = grid.hex_radius();
        let screen_radius = (hex_radius * camera.zoom()
            - self.render_config.seam_inset)
            .max(0.0);
        let line_width = (pixel_ratio / 2.0).max(1.0);
        let range = self.visible_range(camera, hex_radius);

        let mut stats = RenderStats {
            fps,
            ..RenderStats::default()
        };
        grid.for_each_in_range(range, |point, tile| {
            let center = camera.world_to_screen(axial_to_pixel(point, hex_radius));
            match self.draw_tile(
                &mut *surface,
                tile,
                center,
                screen_radius,
                line_width,
            ) {
                Ok(()) => stats.drawn += 1,
                Err(err) => {
                    warn!("Error drawing tile {}: {:#}", point, err);
                    stats.failed += 1;
                }
            }
        });
        stats.culled_box = grid.len() - stats.drawn - stats.failed;

        debug!(
            "Rendered frame with range {}: {} drawn, {} culled, {} failed",
            range, stats.drawn, stats.culled_box, stats.failed
        );
        stats
    }

    /// Draw a single tile as a hexagon centered on a screen point
    fn draw_tile(
        &self,
        surface: &mut impl DrawSurface,
        tile: &Tile,
        center: Point2,
        radius: f64,
        line_width: f64,
    ) -> anyhow::Result<()> {
        let vertices = hex_polygon_vertices(center, radius);
        surface.begin_path()?;
        surface.move_to(vertices[0])?;
        for vertex in &vertices[1..] {
            surface.line_to(*vertex)?;
        }
        surface.close_path()?;
        if tile.owned {
            surface
                .fill(self.render_config.owned_color)
                .context("error filling tile")?;
        }
        surface
            .stroke(self.render_config.grid_color, line_width)
            .context("error stroking tile")?;
        Ok(())
    }
}
