//! Hexer is an infinite hexagonal tile board. This crate contains all the core
//! logic: hex coordinate math, the sparse tile store, the pan/zoom camera, the
//! viewport renderer and the gesture controller that turns raw pointer input
//! into camera motion and tile toggles. Presentation layers (an HTML canvas,
//! an SVG file, etc.) are implemented elsewhere, behind the [DrawSurface]
//! trait.
//!
//! ```
//! use hexer::{Board, BoardConfig, CommandRecorder, InputEvent, Size2};
//!
//! let mut board = Board::new(BoardConfig::default()).unwrap();
//! let mut surface = CommandRecorder::default();
//! board
//!     .resize(Size2::new(800.0, 600.0), 2.0, &mut surface)
//!     .unwrap();
//!
//! // A tap in the middle of the screen toggles the origin tile
//! board.handle_input(InputEvent::pointer_down(1, 400.0, 300.0, 0.0));
//! let outcome = board.handle_input(InputEvent::pointer_up(1, 400.0, 300.0, 90.0));
//! assert_eq!(outcome.toggled().map(|toggle| toggle.owned), Some(true));
//!
//! let stats = board.render_frame(&mut surface, 16.0);
//! println!("drew {} tiles", stats.drawn);
//! ```
//!
//! See [BoardConfig] for details on how the board can be customized.

mod board;
mod camera;
mod config;
mod grid;
mod hex;
mod input;
mod render;
mod util;

pub use crate::{
    board::{Board, TileToggleListener},
    camera::Camera,
    config::{BoardConfig, CameraConfig, GestureConfig},
    grid::{AxialRange, Grid, Tile},
    hex::{
        axial_to_pixel, hex_polygon_vertices, pixel_to_axial, round_to_axial,
        AxialPoint, AxialPointMap, AxialPointSet,
    },
    input::{
        GestureController, GestureOutcome, GestureState, InputEvent,
        PointerId, TileToggle,
    },
    render::{
        config::RenderConfig,
        frame::{backing_size, resize_backing, FrameClock},
        surface::{BackingStore, CommandRecorder, DrawCommand, DrawSurface},
        unit::Color,
        RenderStats, ViewportRenderer,
    },
    util::{
        hex_count,
        range::NumRange,
        unit::{Point2, Size2},
    },
};

#[cfg(feature = "svg")]
pub use crate::render::svg::SvgSurface;
