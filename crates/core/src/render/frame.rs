use crate::{BackingStore, Size2};
use log::debug;

/// Tracks frame timing and keeps an exponentially smoothed frames-per-second
/// value. Timestamps are supplied by the caller (e.g. the value passed to a
/// `requestAnimationFrame` callback), in milliseconds, so the clock is fully
/// deterministic under test.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct FrameClock {
    /// Weight of the previous value on each update, in [0, 1]
    smoothing: f64,
    /// Timestamp of the previous frame
    last_timestamp: Option<f64>,
    fps: f64,
}

impl FrameClock {
    /// Instantaneous FPS to assume when we can't measure one, i.e. on the
    /// first frame or when the clock didn't advance
    pub const DEFAULT_FPS: f64 = 60.0;

    pub fn new(smoothing: f64) -> Self {
        Self {
            smoothing,
            last_timestamp: None,
            fps: Self::DEFAULT_FPS,
        }
    }

    /// Record a new frame at the given timestamp (ms), and return the updated
    /// smoothed FPS.
    pub fn tick(&mut self, timestamp_ms: f64) -> f64 {
        let delta_secs = match self.last_timestamp {
            Some(last) => (timestamp_ms - last) / 1000.0,
            None => 0.0,
        };
        self.last_timestamp = Some(timestamp_ms);

        let instant_fps = if delta_secs > 0.0 {
            1.0 / delta_secs
        } else {
            Self::DEFAULT_FPS
        };
        self.fps =
            self.fps * self.smoothing + instant_fps * (1.0 - self.smoothing);
        self.fps
    }

    /// The current smoothed FPS
    pub fn fps(&self) -> f64 {
        self.fps
    }
}

/// Calculate the physical pixel size of a backing buffer for a viewport. Each
/// dimension is `floor(logical * pixel_ratio)`, but never less than 1.
pub fn backing_size(size: Size2, pixel_ratio: f64) -> (u32, u32) {
    fn scale(logical: f64, pixel_ratio: f64) -> u32 {
        // `as` saturates, and maps NaN to 0
        ((logical * pixel_ratio).floor() as u32).max(1)
    }
    (scale(size.width, pixel_ratio), scale(size.height, pixel_ratio))
}

/// Bring a backing store in line with the viewport. The buffer is only
/// reallocated if its physical size actually changed, since reallocating
/// clears it. The pixel ratio transform is re-applied either way, so that all
/// drawing after this can use logical pixels.
///
/// Returns whether the buffer was reallocated.
pub fn resize_backing(
    store: &mut impl BackingStore,
    size: Size2,
    pixel_ratio: f64,
) -> anyhow::Result<bool> {
    let (width, height) = backing_size(size, pixel_ratio);
    let reallocate = store.backing_size() != (width, height);
    if reallocate {
        debug!(
            "Resizing backing store to {}x{} ({} @ {}x)",
            width, height, size, pixel_ratio
        );
        store.set_backing_size(width, height)?;
    }
    store.set_pixel_ratio(pixel_ratio)?;
    Ok(reallocate)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{CommandRecorder, DrawCommand};
    use assert_approx_eq::assert_approx_eq;

    #[test]
    fn test_first_frame() {
        let mut clock = FrameClock::new(0.92);
        assert_approx_eq!(clock.tick(1234.0), 60.0);
    }

    #[test]
    fn test_smoothing() {
        let mut clock = FrameClock::new(0.92);
        clock.tick(0.0);
        // 50ms -> 20 fps instantaneous
        assert_approx_eq!(clock.tick(50.0), 60.0 * 0.92 + 20.0 * 0.08);
        // Clock didn't move, so assume 60
        let expected = clock.fps() * 0.92 + 60.0 * 0.08;
        assert_approx_eq!(clock.tick(50.0), expected);
        // Clock went backwards, same deal
        let expected = clock.fps() * 0.92 + 60.0 * 0.08;
        assert_approx_eq!(clock.tick(10.0), expected);
    }

    #[test]
    fn test_converges() {
        let mut clock = FrameClock::new(0.92);
        for i in 0..500 {
            clock.tick(i as f64 * 25.0);
        }
        assert_approx_eq!(clock.fps(), 40.0, 0.01);
    }

    #[test]
    fn test_backing_size() {
        assert_eq!(backing_size(Size2::new(800.0, 600.0), 1.0), (800, 600));
        assert_eq!(backing_size(Size2::new(333.0, 101.0), 1.5), (499, 151));
        assert_eq!(backing_size(Size2::new(0.0, 0.2), 2.0), (1, 1));
    }

    #[test]
    fn test_resize_backing_only_when_changed() {
        let mut recorder = CommandRecorder::default();
        let size = Size2::new(400.0, 300.0);
        assert!(resize_backing(&mut recorder, size, 2.0).unwrap());
        assert_eq!(recorder.backing_size(), (800, 600));
        assert_eq!(
            recorder.take(),
            vec![
                DrawCommand::SetBackingSize {
                    width: 800,
                    height: 600
                },
                DrawCommand::SetPixelRatio { pixel_ratio: 2.0 },
            ]
        );

        // Same physical size, just the transform gets reapplied
        assert!(!resize_backing(&mut recorder, size, 2.0).unwrap());
        assert_eq!(
            recorder.take(),
            vec![DrawCommand::SetPixelRatio { pixel_ratio: 2.0 }]
        );

        // Different ratio that rounds to the same size
        assert!(!resize_backing(&mut recorder, size, 2.001).unwrap());
    }
}
