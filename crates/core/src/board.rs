use crate::{
    resize_backing, BackingStore, BoardConfig, Camera, DrawSurface,
    GestureController, GestureOutcome, Grid, InputEvent, RenderStats, Size2,
    TileToggle, ViewportRenderer,
};
use anyhow::Context;
use log::info;
use std::fmt;
use validator::Validate;

/// Something that wants to know whenever a tap flips a tile, e.g. to play a
/// sound or persist the new state. Implemented for all `FnMut(TileToggle)`
/// closures.
pub trait TileToggleListener {
    fn on_tile_toggled(&mut self, toggle: TileToggle);
}

impl<F: FnMut(TileToggle)> TileToggleListener for F {
    fn on_tile_toggled(&mut self, toggle: TileToggle) {
        self(toggle)
    }
}

/// A complete board: the tile grid, a camera looking at it, the gesture
/// controller that moves the camera, and the renderer that draws it all.
///
/// The board owns all of its state. Hosts feed it input events and animation
/// frames, and it never reaches out to any global state, so any number of
/// boards can exist side by side.
pub struct Board {
    config: BoardConfig,
    grid: Grid,
    camera: Camera,
    gestures: GestureController,
    renderer: ViewportRenderer,
    pixel_ratio: f64,
    listeners: Vec<Box<dyn TileToggleListener>>,
}

impl Board {
    /// Create a new board and seed its grid. Returns an error if the config
    /// is invalid.
    pub fn new(config: BoardConfig) -> anyhow::Result<Self> {
        config.validate().context("invalid board config")?;

        let mut grid = Grid::new(config.hex_radius);
        grid.seed(config.seed_radius);
        let board = Self {
            camera: Camera::new(&config.camera),
            gestures: GestureController::new(config.gesture)?,
            renderer: ViewportRenderer::new(config.render)?,
            grid,
            pixel_ratio: 1.0,
            listeners: Vec::new(),
            config,
        };
        info!("Created board with {} tiles", board.grid.len());
        Ok(board)
    }

    /// Get a reference to the config that defines this board
    pub fn config(&self) -> &BoardConfig {
        &self.config
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    /// Mutable access to the grid, e.g. to load persisted ownership
    pub fn grid_mut(&mut self) -> &mut Grid {
        &mut self.grid
    }

    pub fn camera(&self) -> &Camera {
        &self.camera
    }

    pub fn camera_mut(&mut self) -> &mut Camera {
        &mut self.camera
    }

    pub fn gestures(&self) -> &GestureController {
        &self.gestures
    }

    /// The device pixel ratio currently in use, after clamping
    pub fn pixel_ratio(&self) -> f64 {
        self.pixel_ratio
    }

    /// Smoothed FPS as of the last rendered frame
    pub fn fps(&self) -> f64 {
        self.renderer.fps()
    }

    /// Register a callback for tile toggles. Listeners are called in the
    /// order they were added, synchronously, while the triggering event is
    /// being handled.
    pub fn on_tile_toggled(
        &mut self,
        listener: impl TileToggleListener + 'static,
    ) {
        self.listeners.push(Box::new(listener));
    }

    /// Feed one input event through the gesture controller. All camera and
    /// grid changes are applied before this returns, so the next frame sees
    /// a consistent state.
    pub fn handle_input(&mut self, event: InputEvent) -> GestureOutcome {
        let outcome =
            self.gestures
                .handle(event, &mut self.camera, &mut self.grid);
        if let Some(toggle) = outcome.toggled() {
            for listener in &mut self.listeners {
                listener.on_tile_toggled(toggle);
            }
        }
        outcome
    }

    /// Draw one frame onto the given surface
    pub fn render_frame(
        &mut self,
        surface: &mut impl DrawSurface,
        timestamp_ms: f64,
    ) -> RenderStats {
        self.renderer.render(
            surface,
            &self.grid,
            &self.camera,
            self.pixel_ratio,
            timestamp_ms,
        )
    }

    /// Update the viewport size (logical pixels) and device pixel ratio, and
    /// resize the backing store to match. The pixel ratio is clamped to
    /// `[1, max_pixel_ratio]`. The camera keeps its position and zoom.
    ///
    /// Returns whether the backing store was reallocated.
    pub fn resize(
        &mut self,
        size: Size2,
        pixel_ratio: f64,
        backing: &mut impl BackingStore,
    ) -> anyhow::Result<bool> {
        let max_pixel_ratio = self.config.render.max_pixel_ratio;
        // NaN from a broken host falls back to 1
        self.pixel_ratio = if pixel_ratio.is_nan() {
            1.0
        } else {
            pixel_ratio.max(1.0).min(max_pixel_ratio)
        };
        self.camera.set_viewport(size);
        resize_backing(backing, size, self.pixel_ratio)
            .context("error resizing backing store")
    }

    /// Put the camera back at the origin and clear all ownership
    pub fn reset(&mut self) {
        self.camera.reset();
        self.grid.reset_all();
    }
}

impl fmt::Debug for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Board")
            .field("config", &self.config)
            .field("grid", &self.grid)
            .field("camera", &self.camera)
            .field("gestures", &self.gestures)
            .field("renderer", &self.renderer)
            .field("pixel_ratio", &self.pixel_ratio)
            .field("listeners", &self.listeners.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{AxialPoint, CommandRecorder, Point2};
    use assert_approx_eq::assert_approx_eq;
    use std::{cell::RefCell, rc::Rc};

    fn board() -> (Board, CommandRecorder) {
        let mut board = Board::new(BoardConfig::default()).unwrap();
        let mut surface = CommandRecorder::default();
        board
            .resize(Size2::new(800.0, 600.0), 1.0, &mut surface)
            .unwrap();
        (board, surface)
    }

    #[test]
    fn test_new_seeds_grid() {
        let (board, _) = board();
        assert_eq!(board.grid().len(), 217);
        assert_eq!(board.camera().zoom(), 1.0);
    }

    #[test]
    fn test_listeners() {
        let (mut board, _) = board();
        let seen = Rc::new(RefCell::new(Vec::new()));
        let seen_clone = Rc::clone(&seen);
        board.on_tile_toggled(move |toggle: TileToggle| {
            seen_clone.borrow_mut().push(toggle)
        });

        board.handle_input(InputEvent::pointer_down(1, 400.0, 300.0, 0.0));
        board.handle_input(InputEvent::pointer_up(1, 400.0, 300.0, 10.0));
        // Drag, no toggle
        board.handle_input(InputEvent::pointer_down(1, 400.0, 300.0, 1000.0));
        board.handle_input(InputEvent::pointer_move(1, 450.0, 300.0, 1010.0));
        board.handle_input(InputEvent::pointer_up(1, 450.0, 300.0, 1020.0));

        assert_eq!(
            *seen.borrow(),
            vec![TileToggle {
                point: AxialPoint::ORIGIN,
                owned: true
            }]
        );
    }

    #[test]
    fn test_resize_keeps_camera() {
        let (mut board, mut surface) = board();
        board.camera_mut().center_on(Point2::new(12.0, 34.0));
        board.camera_mut().zoom_by(2.0);
        let reallocated = board
            .resize(Size2::new(1024.0, 768.0), 2.0, &mut surface)
            .unwrap();
        assert!(reallocated);
        assert_eq!(board.camera().center(), Point2::new(12.0, 34.0));
        assert_approx_eq!(board.camera().zoom(), 2.0);
        assert_eq!(board.camera().viewport(), Size2::new(1024.0, 768.0));
        assert_eq!(surface.backing_size(), (2048, 1536));
    }

    #[test]
    fn test_resize_keeps_fps() {
        let (mut board, mut surface) = board();
        board.render_frame(&mut surface, 0.0);
        board.render_frame(&mut surface, 20.0);
        board.render_frame(&mut surface, 45.0);
        let before = board.fps();
        assert!(before < 60.0);

        board
            .resize(Size2::new(1280.0, 720.0), 2.0, &mut surface)
            .unwrap();
        assert_approx_eq!(board.fps(), before);

        // The average picks up where it left off
        let stats = board.render_frame(&mut surface, 65.0);
        assert_approx_eq!(stats.fps, before * 0.92 + 50.0 * 0.08);
    }

    #[test]
    fn test_pixel_ratio_clamped() {
        let (mut board, mut surface) = board();
        let size = Size2::new(100.0, 100.0);
        board.resize(size, 5.0, &mut surface).unwrap();
        assert_approx_eq!(board.pixel_ratio(), 3.0);
        assert_eq!(surface.backing_size(), (300, 300));
        board.resize(size, 0.25, &mut surface).unwrap();
        assert_approx_eq!(board.pixel_ratio(), 1.0);
        board.resize(size, f64::NAN, &mut surface).unwrap();
        assert_approx_eq!(board.pixel_ratio(), 1.0);
    }

    #[test]
    fn test_reset() {
        let (mut board, _) = board();
        board.grid_mut().toggle_owned(AxialPoint::new(1, 1));
        board.camera_mut().pan(100.0, 100.0);
        board.camera_mut().zoom_by(3.0);
        board.reset();
        assert_eq!(board.grid().owned_count(), 0);
        assert_eq!(board.grid().len(), 217);
        assert_eq!(board.camera().center(), Point2::ORIGIN);
        assert_approx_eq!(board.camera().zoom(), 1.0);
    }

    #[test]
    fn test_render_frame() {
        let (mut board, mut surface) = board();
        let stats = board.render_frame(&mut surface, 0.0);
        assert_eq!(stats.drawn, 217);
        let stats = board.render_frame(&mut surface, 20.0);
        assert_approx_eq!(stats.fps, 60.0 * 0.92 + 50.0 * 0.08);
        assert_approx_eq!(board.fps(), stats.fps);
    }
}
