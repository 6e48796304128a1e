//! Raw input events, and the gesture controller that interprets them. See
//! [GestureController] for the state machine.

mod gesture;

pub use self::gesture::*;

use crate::Point2;
use serde::{Deserialize, Serialize};

/// Identifies one pointer (finger, pen, mouse) for the lifetime of a press.
/// Hosts can use whatever ids their platform provides.
pub type PointerId = i32;

/// A single raw input event, in screen coordinates (logical pixels).
/// Timestamps are in milliseconds on whatever clock the host uses; only the
/// difference between two timestamps is ever looked at.
///
/// Events serialize with a `kind` tag:
///
/// ```json
/// {"kind": "pointer_down", "id": 1, "x": 100.0, "y": 100.0, "timestamp": 0.0}
/// {"kind": "wheel", "x": 100.0, "y": 100.0, "delta_y": -120.0}
/// ```
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum InputEvent {
    PointerDown {
        id: PointerId,
        x: f64,
        y: f64,
        #[serde(default)]
        timestamp: f64,
    },
    PointerMove {
        id: PointerId,
        x: f64,
        y: f64,
        #[serde(default)]
        timestamp: f64,
    },
    PointerUp {
        id: PointerId,
        x: f64,
        y: f64,
        #[serde(default)]
        timestamp: f64,
    },
    /// The host lost a pointer without a proper release (e.g. the browser
    /// took over the touch for scrolling). Never counts as a tap.
    PointerCancel { id: PointerId },
    /// Scroll wheel or trackpad scroll. Positive `delta_y` is scrolling down,
    /// which zooms out.
    Wheel { x: f64, y: f64, delta_y: f64 },
}

impl InputEvent {
    pub fn pointer_down(id: PointerId, x: f64, y: f64, timestamp: f64) -> Self {
        Self::PointerDown { id, x, y, timestamp }
    }

    pub fn pointer_move(id: PointerId, x: f64, y: f64, timestamp: f64) -> Self {
        Self::PointerMove { id, x, y, timestamp }
    }

    pub fn pointer_up(id: PointerId, x: f64, y: f64, timestamp: f64) -> Self {
        Self::PointerUp { id, x, y, timestamp }
    }

    pub fn pointer_cancel(id: PointerId) -> Self {
        Self::PointerCancel { id }
    }

    pub fn wheel(x: f64, y: f64, delta_y: f64) -> Self {
        Self::Wheel { x, y, delta_y }
    }

    /// Screen position of the event, if it has one
    pub fn position(&self) -> Option<Point2> {
        match *self {
            Self::PointerDown { x, y, .. }
            | Self::PointerMove { x, y, .. }
            | Self::PointerUp { x, y, .. }
            | Self::Wheel { x, y, .. } => Some(Point2::new(x, y)),
            Self::PointerCancel { .. } => None,
        }
    }
}
