use crate::{CameraConfig, NumRange, Point2, Size2};
use log::debug;

/// The viewport transform. The camera looks at `center` (a world point, which
/// is always drawn at the middle of the viewport) with a scale of `zoom`
/// screen pixels per world pixel.
///
/// Zoom is kept within the configured bounds after every mutation. The
/// viewport size is supplied by the host, in logical pixels.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Camera {
    center: Point2,
    zoom: f64,
    zoom_range: NumRange<f64>,
    viewport: Size2,
}

impl Camera {
    /// Create a camera at the world origin with zoom 1.0 (or as close to it
    /// as the bounds allow). The viewport starts out empty; call
    /// [Self::set_viewport] once the host knows its size.
    pub fn new(config: &CameraConfig) -> Self {
        let zoom_range = NumRange::new(config.zoom_min, config.zoom_max);
        Self {
            center: Point2::ORIGIN,
            zoom: zoom_range.clamp(1.0),
            zoom_range,
            viewport: Size2::default(),
        }
    }

    /// The world point at the center of the viewport
    pub fn center(&self) -> Point2 {
        self.center
    }

    pub fn zoom(&self) -> f64 {
        self.zoom
    }

    pub fn zoom_range(&self) -> NumRange<f64> {
        self.zoom_range
    }

    pub fn viewport(&self) -> Size2 {
        self.viewport
    }

    /// Update the viewport size. This doesn't move the camera; the same world
    /// point stays at the center of the (new) viewport.
    pub fn set_viewport(&mut self, viewport: Size2) {
        self.viewport = viewport;
    }

    /// Convert a world point to a screen point
    pub fn world_to_screen(&self, world: Point2) -> Point2 {
        (world - self.center) * self.zoom + self.viewport.center()
    }

    /// Convert a screen point to a world point. Exact inverse of
    /// [Self::world_to_screen].
    pub fn screen_to_world(&self, screen: Point2) -> Point2 {
        (screen - self.viewport.center()) / self.zoom + self.center
    }

    /// Move the camera by a drag distance, in screen pixels. Dragging right
    /// moves the camera left, so the world follows the finger. The distance
    /// is scaled by zoom, so a drag covers the same screen distance at every
    /// zoom level.
    pub fn pan(&mut self, dx: f64, dy: f64) {
        self.center.x -= dx / self.zoom;
        self.center.y -= dy / self.zoom;
    }

    /// Multiply zoom by `factor` while keeping the world point under
    /// `screen_point` in the same spot on screen. The zoom is clamped first,
    /// and the correction is computed from the clamped value, so the focal
    /// point stays put even when the zoom limit is hit.
    pub fn zoom_around_screen_point(&mut self, screen_point: Point2, factor: f64) {
        let before = self.screen_to_world(screen_point);
        self.zoom = self.zoom_range.clamp(self.zoom * factor);
        let after = self.screen_to_world(screen_point);
        self.center += before - after;
    }

    /// Multiply zoom by `factor` (clamped), keeping the same center point
    pub fn zoom_by(&mut self, factor: f64) {
        self.zoom = self.zoom_range.clamp(self.zoom * factor);
    }

    /// Jump the camera so the given world point is at the center
    pub fn center_on(&mut self, world: Point2) {
        debug!("Centering camera on {}", world);
        self.center = world;
    }

    /// Move back to the origin at zoom 1.0 (clamped)
    pub fn reset(&mut self) {
        self.center = Point2::ORIGIN;
        self.zoom = self.zoom_range.clamp(1.0);
    }

    /// Get the world-space rectangle that's currently visible, as its
    /// `(top_left, bottom_right)` corners
    pub fn visible_world_rect(&self) -> (Point2, Point2) {
        (
            self.screen_to_world(Point2::ORIGIN),
            self.screen_to_world(Point2::new(
                self.viewport.width,
                self.viewport.height,
            )),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_approx_eq::assert_approx_eq;

    fn camera() -> Camera {
        let mut camera = Camera::new(&CameraConfig::default());
        camera.set_viewport(Size2::new(800.0, 600.0));
        camera
    }

    fn assert_point_eq(actual: Point2, expected: Point2) {
        assert_approx_eq!(actual.x, expected.x, 1e-9);
        assert_approx_eq!(actual.y, expected.y, 1e-9);
    }

    #[test]
    fn test_world_to_screen() {
        let mut camera = camera();
        assert_point_eq(
            camera.world_to_screen(Point2::ORIGIN),
            Point2::new(400.0, 300.0),
        );

        camera.center_on(Point2::new(10.0, -20.0));
        camera.zoom_by(2.0);
        assert_point_eq(
            camera.world_to_screen(Point2::new(15.0, -20.0)),
            Point2::new(410.0, 300.0),
        );
    }

    #[test]
    fn test_screen_to_world_inverse() {
        let mut camera = camera();
        camera.center_on(Point2::new(-123.4, 56.7));
        camera.zoom_by(2.7);
        for &(x, y) in &[(0.0, 0.0), (800.0, 600.0), (13.0, 477.5)] {
            let screen = Point2::new(x, y);
            assert_point_eq(
                camera.world_to_screen(camera.screen_to_world(screen)),
                screen,
            );
        }
    }

    #[test]
    fn test_pan() {
        let mut camera = camera();
        camera.zoom_by(2.5);
        camera.pan(10.0, -5.0);
        assert_approx_eq!(camera.center().x, -10.0 / 2.5);
        assert_approx_eq!(camera.center().y, 5.0 / 2.5);
        // Zoom is unaffected
        assert_approx_eq!(camera.zoom(), 2.5);
    }

    #[test]
    fn test_zoom_focal_stability() {
        let factors = [1.1, 0.9, 1.5, 0.3, 20.0, 0.01];
        let focal_points = [
            Point2::new(0.0, 0.0),
            Point2::new(400.0, 300.0),
            Point2::new(731.0, 12.5),
        ];
        for &factor in &factors {
            for &focal in &focal_points {
                let mut camera = camera();
                camera.center_on(Point2::new(37.0, -81.0));
                camera.zoom_by(1.3);
                let before = camera.screen_to_world(focal);
                camera.zoom_around_screen_point(focal, factor);
                let after = camera.screen_to_world(focal);
                assert_point_eq(after, before);
            }
        }
    }

    #[test]
    fn test_zoom_clamp() {
        let mut camera = camera();
        assert_eq!(camera.zoom_range(), NumRange::new(0.5, 3.5));
        let focal = Point2::new(100.0, 100.0);
        for _ in 0..50 {
            camera.zoom_around_screen_point(focal, 1.7);
            assert!(camera.zoom_range().contains(camera.zoom()));
        }
        assert_approx_eq!(camera.zoom(), 3.5);

        for _ in 0..50 {
            camera.zoom_around_screen_point(focal, 0.6);
            assert!(camera.zoom() >= 0.5);
        }
        assert_approx_eq!(camera.zoom(), 0.5);

        camera.zoom_by(100.0);
        assert_approx_eq!(camera.zoom(), 3.5);
    }

    #[test]
    fn test_reset() {
        let mut camera = camera();
        camera.pan(100.0, 100.0);
        camera.zoom_by(3.0);
        camera.reset();
        assert_eq!(camera.center(), Point2::ORIGIN);
        assert_approx_eq!(camera.zoom(), 1.0);
        // Viewport survives a reset
        assert_eq!(camera.viewport(), Size2::new(800.0, 600.0));
    }

    #[test]
    fn test_initial_zoom_respects_bounds() {
        let camera = Camera::new(&CameraConfig {
            zoom_min: 1.5,
            zoom_max: 2.0,
        });
        assert_approx_eq!(camera.zoom(), 1.5);
    }

    #[test]
    fn test_visible_world_rect() {
        let mut camera = camera();
        camera.zoom_by(2.0);
        let (top_left, bottom_right) = camera.visible_world_rect();
        assert_point_eq(top_left, Point2::new(-200.0, -150.0));
        assert_point_eq(bottom_right, Point2::new(200.0, 150.0));
    }
}
