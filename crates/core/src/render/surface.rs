//! The drawing boundary. The renderer never talks to a real display; it issues
//! path commands against a [DrawSurface], and the host decides what those
//! commands turn into (canvas calls, SVG elements, a recorded list, ...).

use crate::{Color, Point2};
use serde::Serialize;

/// A minimal 2D path-drawing surface. Coordinates are logical screen pixels,
/// with the origin in the top-left and y pointing down. Any device pixel ratio
/// scaling is the surface's own business (see [BackingStore]).
///
/// Every operation can fail, e.g. if a canvas context was lost. The renderer
/// treats failures as non-fatal: it skips the current shape and keeps going.
pub trait DrawSurface {
    /// Start a new path, discarding any path in progress
    fn begin_path(&mut self) -> anyhow::Result<()>;

    /// Start a new sub-path at the given point
    fn move_to(&mut self, point: Point2) -> anyhow::Result<()>;

    /// Add a straight line from the current point to the given point
    fn line_to(&mut self, point: Point2) -> anyhow::Result<()>;

    /// Connect the current point back to the start of the sub-path
    fn close_path(&mut self) -> anyhow::Result<()>;

    /// Fill the current path
    fn fill(&mut self, color: Color) -> anyhow::Result<()>;

    /// Stroke the current path. `width` is in logical pixels.
    fn stroke(&mut self, color: Color, width: f64) -> anyhow::Result<()>;

    /// Clear a rectangle to transparent
    fn clear_rect(
        &mut self,
        x: f64,
        y: f64,
        width: f64,
        height: f64,
    ) -> anyhow::Result<()>;
}

/// A surface that's backed by a pixel buffer, which has to be resized when the
/// viewport or the device pixel ratio changes. See
/// [resize_backing](crate::resize_backing).
pub trait BackingStore {
    /// Current size of the pixel buffer, in physical pixels
    fn backing_size(&self) -> (u32, u32);

    /// Reallocate the pixel buffer. This typically wipes its contents and any
    /// transform that was applied.
    fn set_backing_size(&mut self, width: u32, height: u32)
        -> anyhow::Result<()>;

    /// Scale all subsequent drawing by the given ratio, so callers can keep
    /// drawing in logical pixels. Replaces any previous scale.
    fn set_pixel_ratio(&mut self, pixel_ratio: f64) -> anyhow::Result<()>;
}

/// One call made against a [CommandRecorder]
#[derive(Copy, Clone, Debug, PartialEq, Serialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum DrawCommand {
    BeginPath,
    MoveTo { x: f64, y: f64 },
    LineTo { x: f64, y: f64 },
    ClosePath,
    Fill { color: Color },
    Stroke { color: Color, width: f64 },
    ClearRect {
        x: f64,
        y: f64,
        width: f64,
        height: f64,
    },
    SetBackingSize { width: u32, height: u32 },
    SetPixelRatio { pixel_ratio: f64 },
}

/// A surface that just remembers every call made against it. Useful for
/// tests, benchmarks, and headless runs where you want to inspect what a frame
/// would have drawn.
#[derive(Clone, Debug, Default)]
pub struct CommandRecorder {
    commands: Vec<DrawCommand>,
    backing_size: (u32, u32),
}

impl CommandRecorder {
    /// Every command recorded so far, in order
    pub fn commands(&self) -> &[DrawCommand] {
        &self.commands
    }

    /// Take all recorded commands, leaving the recorder empty. The backing
    /// size is kept.
    pub fn take(&mut self) -> Vec<DrawCommand> {
        std::mem::take(&mut self.commands)
    }

    /// Number of recorded fill commands
    pub fn fill_count(&self) -> usize {
        self.commands
            .iter()
            .filter(|command| matches!(command, DrawCommand::Fill { .. }))
            .count()
    }

    /// Number of recorded stroke commands
    pub fn stroke_count(&self) -> usize {
        self.commands
            .iter()
            .filter(|command| matches!(command, DrawCommand::Stroke { .. }))
            .count()
    }

    fn push(&mut self, command: DrawCommand) -> anyhow::Result<()> {
        self.commands.push(command);
        Ok(())
    }
}

impl DrawSurface for CommandRecorder {
    fn begin_path(&mut self) -> anyhow::Result<()> {
        self.push(DrawCommand::BeginPath)
    }

    fn move_to(&mut self, point: Point2) -> anyhow::Result<()> {
        self.push(DrawCommand::MoveTo {
            x: point.x,
            y: point.y,
        })
    }

    fn line_to(&mut self, point: Point2) -> anyhow::Result<()> {
        self.push(DrawCommand::LineTo {
            x: point.x,
            y: point.y,
        })
    }

    fn close_path(&mut self) -> anyhow::Result<()> {
        self.push(DrawCommand::ClosePath)
    }

    fn fill(&mut self, color: Color) -> anyhow::Result<()> {
        self.push(DrawCommand::Fill { color })
    }

    fn stroke(&mut self, color: Color, width: f64) -> anyhow::Result<()> {
        self.push(DrawCommand::Stroke { color, width })
    }

    fn clear_rect(
        &mut self,
        x: f64,
        y: f64,
        width: f64,
        height: f64,
    ) -> anyhow::Result<()> {
        self.push(DrawCommand::ClearRect {
            x,
            y,
            width,
            height,
        })
    }
}

impl BackingStore for CommandRecorder {
    fn backing_size(&self) -> (u32, u32) {
        self.backing_size
    }

    fn set_backing_size(
        &mut self,
        width: u32,
        height: u32,
    ) -> anyhow::Result<()> {
        self.backing_size = (width, height);
        self.push(DrawCommand::SetBackingSize { width, height })
    }

    fn set_pixel_ratio(&mut self, pixel_ratio: f64) -> anyhow::Result<()> {
        self.push(DrawCommand::SetPixelRatio { pixel_ratio })
    }
}
