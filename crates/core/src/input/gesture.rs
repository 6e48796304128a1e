use crate::{
    pixel_to_axial, AxialPoint, Camera, GestureConfig, Grid, InputEvent,
    Point2, PointerId,
};
use fnv::FnvBuildHasher;
use indexmap::IndexMap;
use log::trace;
use serde::Serialize;
use validator::Validate;

/// What the gesture controller is currently doing. The state is derived from
/// how many pointers are held, but each variant carries the extra context it
/// needs (where a press started, which two pointers make up a pinch).
#[derive(Copy, Clone, Debug, PartialEq, strum::Display)]
#[strum(serialize_all = "snake_case")]
pub enum GestureState {
    /// No pointers held
    Idle,
    /// One pointer held, dragging pans the camera
    OnePointer {
        id: PointerId,
        /// Where the press started, for tap detection
        start: Point2,
        /// Position as of the previous event, for pan deltas
        last: Point2,
        /// Can this press still become a tap? Cleared as soon as the pointer
        /// strays too far from `start`, or if this press is a leftover from a
        /// pinch.
        tap_eligible: bool,
    },
    /// Two pointers held, moving either one pinch-zooms
    TwoPointers { ids: [PointerId; 2] },
}

/// A tile whose ownership was flipped by a tap
#[derive(Copy, Clone, Debug, PartialEq, Serialize)]
pub struct TileToggle {
    pub point: AxialPoint,
    /// Ownership state after the toggle
    pub owned: bool,
}

/// The result of feeding one event to the [GestureController]. Useful for
/// logging and tests; the camera and grid have already been updated by the
/// time you see this.
#[derive(Copy, Clone, Debug, PartialEq, strum::Display)]
#[strum(serialize_all = "snake_case")]
pub enum GestureOutcome {
    /// Event didn't do anything (unknown pointer, third finger, etc.)
    Ignored,
    /// A pointer started being tracked
    Pressed,
    /// Second press within the double-tap window. The camera jumped to the
    /// tapped point and zoomed in.
    DoubleTap { world: Point2 },
    /// The camera was dragged
    Panned,
    /// The camera was zoomed by a pinch
    Pinched { factor: f64 },
    /// The camera was zoomed by the wheel
    WheelZoomed { factor: f64 },
    /// A tap landed on a tile position. `toggle` is `None` if there's no tile
    /// there.
    Tapped {
        point: AxialPoint,
        toggle: Option<TileToggle>,
    },
    /// A pointer was released without tapping
    Released,
}

impl GestureOutcome {
    /// If this outcome flipped a tile, get the details
    pub fn toggled(&self) -> Option<TileToggle> {
        match self {
            Self::Tapped { toggle, .. } => *toggle,
            _ => None,
        }
    }
}

/// Turns raw pointer and wheel events into camera motion and tile toggles.
///
/// - One pointer: drag to pan; press and release without moving (less than
///   the tap slop on both axes) to toggle the tile underneath.
/// - Two presses within the double-tap window: jump the camera to the second
///   press and zoom in.
/// - Two pointers: pinch to zoom around their midpoint.
/// - Wheel: zoom around the cursor, in any state.
///
/// Pointers beyond the first two are tracked (so their releases are handled
/// properly) but never affect the camera. Time only comes from event
/// timestamps, so the controller is fully deterministic.
#[derive(Clone, Debug)]
pub struct GestureController {
    config: GestureConfig,
    state: GestureState,
    /// Every held pointer and its latest position, in press order
    pointers: IndexMap<PointerId, Point2, FnvBuildHasher>,
    /// Timestamp of the last press that started a gesture from idle
    last_press_ms: Option<f64>,
}

impl GestureController {
    /// Create a new controller. Returns an error if the config is invalid.
    pub fn new(config: GestureConfig) -> anyhow::Result<Self> {
        config.validate()?;
        Ok(Self {
            config,
            state: GestureState::Idle,
            pointers: IndexMap::default(),
            last_press_ms: None,
        })
    }

    pub fn state(&self) -> GestureState {
        self.state
    }

    /// Number of pointers currently held, including any beyond the first two
    pub fn pointer_count(&self) -> usize {
        self.pointers.len()
    }

    /// Apply one input event to the camera and grid
    pub fn handle(
        &mut self,
        event: InputEvent,
        camera: &mut Camera,
        grid: &mut Grid,
    ) -> GestureOutcome {
        let outcome = match event {
            InputEvent::PointerDown { id, x, y, timestamp } => {
                self.pointer_down(id, Point2::new(x, y), timestamp, camera)
            }
            InputEvent::PointerMove { id, x, y, .. } => {
                self.pointer_move(id, Point2::new(x, y), camera)
            }
            InputEvent::PointerUp { id, x, y, .. } => {
                self.pointer_up(id, Some(Point2::new(x, y)), camera, grid)
            }
            InputEvent::PointerCancel { id } => {
                self.pointer_up(id, None, camera, grid)
            }
            InputEvent::Wheel { x, y, delta_y } => {
                let factor = self.config.wheel_zoom_base.powf(-delta_y);
                camera.zoom_around_screen_point(Point2::new(x, y), factor);
                GestureOutcome::WheelZoomed { factor }
            }
        };
        trace!("{:?} -> {} (state: {})", event, outcome, self.state);
        outcome
    }

    fn pointer_down(
        &mut self,
        id: PointerId,
        position: Point2,
        timestamp: f64,
        camera: &mut Camera,
    ) -> GestureOutcome {
        if self.pointers.insert(id, position).is_some() {
            // Duplicate press for a held pointer, just take the new position
            return GestureOutcome::Ignored;
        }

        match self.state {
            GestureState::Idle => {
                let is_double_tap = self.last_press_ms.map_or(false, |last| {
                    timestamp - last < self.config.double_tap_window_ms
                });
                // Every first press restarts the window, whether or not it
                // completed a double-tap
                self.last_press_ms = Some(timestamp);
                self.state = GestureState::OnePointer {
                    id,
                    start: position,
                    last: position,
                    tap_eligible: true,
                };

                if is_double_tap {
                    let world = camera.screen_to_world(position);
                    camera.center_on(world);
                    camera.zoom_by(self.config.double_tap_zoom);
                    GestureOutcome::DoubleTap { world }
                } else {
                    GestureOutcome::Pressed
                }
            }
            GestureState::OnePointer { id: first, .. } => {
                self.state = GestureState::TwoPointers { ids: [first, id] };
                GestureOutcome::Pressed
            }
            // Tracked, but it won't do anything until one of the first two
            // lets go
            GestureState::TwoPointers { .. } => GestureOutcome::Ignored,
        }
    }

    fn pointer_move(
        &mut self,
        id: PointerId,
        position: Point2,
        camera: &mut Camera,
    ) -> GestureOutcome {
        let previous = match self.pointers.get_mut(&id) {
            Some(stored) => std::mem::replace(stored, position),
            None => return GestureOutcome::Ignored,
        };

        match &mut self.state {
            GestureState::OnePointer {
                id: active,
                start,
                last,
                tap_eligible,
            } if *active == id => {
                let delta = position - *last;
                *last = position;
                if !within_slop(*start, position, self.config.tap_slop) {
                    *tap_eligible = false;
                }
                camera.pan(delta.x, delta.y);
                GestureOutcome::Panned
            }
            GestureState::TwoPointers { ids } if ids.contains(&id) => {
                let other_id = if ids[0] == id { ids[1] } else { ids[0] };
                let other = match self.pointers.get(&other_id) {
                    Some(other) => *other,
                    None => return GestureOutcome::Ignored,
                };
                let previous_distance = previous.distance_to(other);
                let current_distance = position.distance_to(other);
                if previous_distance > 0.0 && current_distance > 0.0 {
                    let factor = current_distance / previous_distance;
                    camera.zoom_around_screen_point(
                        position.midpoint(other),
                        factor,
                    );
                    GestureOutcome::Pinched { factor }
                } else {
                    GestureOutcome::Ignored
                }
            }
            _ => GestureOutcome::Ignored,
        }
    }

    /// Handle a release. `position` is `None` for a cancelled pointer, which
    /// can never tap.
    fn pointer_up(
        &mut self,
        id: PointerId,
        position: Option<Point2>,
        camera: &Camera,
        grid: &mut Grid,
    ) -> GestureOutcome {
        if self.pointers.shift_remove(&id).is_none() {
            return GestureOutcome::Ignored;
        }

        match self.state {
            GestureState::OnePointer {
                id: active,
                start,
                tap_eligible,
                ..
            } if active == id => {
                self.state = GestureState::Idle;
                match position {
                    Some(position)
                        if tap_eligible
                            && within_slop(
                                start,
                                position,
                                self.config.tap_slop,
                            ) =>
                    {
                        self.tap(position, camera, grid)
                    }
                    _ => GestureOutcome::Released,
                }
            }
            GestureState::TwoPointers { ids } if !ids.contains(&id) => {
                // An extra pointer let go, the pinch carries on
                GestureOutcome::Released
            }
            _ => {
                self.state = self.state_from_held_pointers();
                GestureOutcome::Released
            }
        }
    }

    fn tap(
        &self,
        position: Point2,
        camera: &Camera,
        grid: &mut Grid,
    ) -> GestureOutcome {
        let world = camera.screen_to_world(position);
        let point = pixel_to_axial(world, grid.hex_radius());
        let toggle = grid
            .toggle_owned(point)
            .map(|owned| TileToggle { point, owned });
        GestureOutcome::Tapped { point, toggle }
    }

    /// Rebuild state after a pointer in an active gesture let go. A pointer
    /// left over from a pinch can pan, but can't tap.
    fn state_from_held_pointers(&self) -> GestureState {
        let mut held = self.pointers.iter();
        match (held.next(), held.next()) {
            (None, _) => GestureState::Idle,
            (Some((&id, &position)), None) => GestureState::OnePointer {
                id,
                start: position,
                last: position,
                tap_eligible: false,
            },
            (Some((&first, _)), Some((&second, _))) => {
                GestureState::TwoPointers {
                    ids: [first, second],
                }
            }
        }
    }
}

/// Are two points close enough, on both axes, to count as the same tap?
fn within_slop(a: Point2, b: Point2, slop: f64) -> bool {
    (a.x - b.x).abs() < slop && (a.y - b.y).abs() < slop
}
