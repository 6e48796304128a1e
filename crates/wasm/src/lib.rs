//! This crate provides WebAssembly bindings for Hexer. The [Hexer] struct is
//! the main interface: construct one per canvas, and it will take care of
//! listening for pointer input on that canvas and drawing the board into it
//! every animation frame.
//!
//! ```js
//! const hexer = new Hexer(canvas, Hexer.default_config());
//! hexer.resize(canvas.clientWidth, canvas.clientHeight, devicePixelRatio);
//! hexer.on_tile_toggled((key, owned) => console.log(key, owned));
//! hexer.start();
//! ```
//!
//! You probably won't ever want to include this crate in another Rust project.
//! Instead, use `wasm-pack` to build this into an npm package, then import that
//! into your JS project.

mod canvas;
mod input;
mod render_loop;
mod toggles;
mod util;

use crate::{
    canvas::CanvasSurface, input::InputBindings, render_loop::RenderLoop,
    toggles::ToggleQueue, util::ResultExt,
};
use anyhow::anyhow;
use hexer::{Board, InputEvent, RenderStats, Size2, TileToggle};
use log::{debug, trace};
use std::{
    cell::{RefCell, RefMut},
    rc::Rc,
    sync::Once,
};
use wasm_bindgen::prelude::*;
use web_sys::HtmlCanvasElement;

static INIT: Once = Once::new();

/// Everything a frame needs: the board and the surface it's drawn onto.
/// Shared between the public handle, the frame callback and the DOM
/// listeners.
pub struct Host {
    pub board: Board,
    surface: CanvasSurface,
}

impl Host {
    /// Draw one frame
    pub fn render(&mut self, timestamp: f64) -> RenderStats {
        let stats = self.board.render_frame(&mut self.surface, timestamp);
        if stats.failed > 0 {
            debug!("Frame had {} failed tiles: {:?}", stats.failed, stats);
        } else {
            trace!("Frame: {:?}", stats);
        }
        stats
    }
}

/// A board bound to a single canvas.
#[wasm_bindgen]
pub struct Hexer {
    host: Rc<RefCell<Host>>,
    toggles: ToggleQueue,
    render_loop: RenderLoop,
    _input: InputBindings,
}

#[wasm_bindgen]
impl Hexer {
    /// Build a board from the given config and bind it to the canvas. Pass
    /// `undefined` to use the default config. Rendering doesn't begin until
    /// [Hexer::start] is called.
    #[wasm_bindgen(constructor)]
    pub fn new(
        canvas: HtmlCanvasElement,
        config: BoardConfigObject,
    ) -> Result<Hexer, JsValue> {
        // Global hooks can only be installed once per page, but there can be
        // any number of boards
        INIT.call_once(|| {
            std::panic::set_hook(Box::new(console_error_panic_hook::hook));
            wasm_logger::init(wasm_logger::Config::default());
        });

        let config = util::deserialize_config(&config)?;
        let mut board = Board::new(config).into_js()?;
        let toggles = ToggleQueue::new();
        let pusher = toggles.clone();
        board.on_tile_toggled(move |toggle: TileToggle| pusher.push(toggle));
        let surface = CanvasSurface::new(canvas.clone()).into_js()?;
        let host = Rc::new(RefCell::new(Host { board, surface }));
        let input =
            InputBindings::attach(&canvas, &host, &toggles).into_js()?;

        Ok(Self {
            host,
            toggles,
            render_loop: RenderLoop::new(),
            _input: input,
        })
    }

    /// Get the default board config as a JS object.
    pub fn default_config() -> Result<BoardConfigObject, JsValue> {
        util::default_config()
    }

    /// Verify that the given JS object is a valid board config. Return the
    /// validated config, with all defaults populated, if it's valid. Return
    /// an error if it isn't.
    pub fn validate_config(
        input: BoardConfigObject,
    ) -> Result<BoardConfigObject, JsValue> {
        util::validate_config(input)
    }

    /// Update the canvas size (CSS pixels) and device pixel ratio. Call this
    /// whenever the canvas' layout size or the ratio changes. Returns whether
    /// the canvas' backing store was reallocated.
    pub fn resize(
        &self,
        width: f64,
        height: f64,
        pixel_ratio: f64,
    ) -> Result<bool, JsValue> {
        let mut host = self.host()?;
        let Host { board, surface } = &mut *host;
        board
            .resize(Size2::new(width, height), pixel_ratio, surface)
            .into_js()
    }

    /// Start drawing every animation frame
    pub fn start(&self) -> Result<(), JsValue> {
        self.render_loop.start(&self.host).into_js()
    }

    /// Stop drawing. Board state is kept, so the loop can be restarted.
    pub fn stop(&self) -> Result<(), JsValue> {
        self.render_loop.stop().into_js()
    }

    pub fn is_running(&self) -> bool {
        self.render_loop.is_running()
    }

    /// Draw a single frame outside of the render loop. Returns the frame
    /// stats as an object.
    pub fn render(&self, timestamp: f64) -> Result<JsValue, JsValue> {
        let stats = self.host()?.render(timestamp);
        JsValue::from_serde(&stats)
            .map_err(|err| format!("Error serializing stats: {}", err).into())
    }

    /// Smoothed frames per second, as of the last frame
    pub fn fps(&self) -> Result<f64, JsValue> {
        Ok(self.host()?.board.fps())
    }

    /// Number of tiles currently owned
    pub fn owned_count(&self) -> Result<usize, JsValue> {
        Ok(self.host()?.board.grid().owned_count())
    }

    /// Register a callback that's called as `callback(key, owned)` whenever
    /// a tap toggles a tile, where `key` is the tile's `"q,r"` string.
    /// Callbacks run after the triggering event has been fully applied, so
    /// they're free to call back into this object, e.g. to save
    /// [Hexer::ownership_json].
    pub fn on_tile_toggled(&self, callback: js_sys::Function) {
        self.toggles.subscribe(callback);
    }

    // The methods below feed input by hand, for hosts that want to do their
    // own event handling or scripted playback. Each returns the name of the
    // gesture outcome.

    pub fn pointer_down(
        &self,
        id: i32,
        x: f64,
        y: f64,
        timestamp: f64,
    ) -> Result<String, JsValue> {
        self.handle_input(InputEvent::pointer_down(id, x, y, timestamp))
    }

    pub fn pointer_move(
        &self,
        id: i32,
        x: f64,
        y: f64,
        timestamp: f64,
    ) -> Result<String, JsValue> {
        self.handle_input(InputEvent::pointer_move(id, x, y, timestamp))
    }

    pub fn pointer_up(
        &self,
        id: i32,
        x: f64,
        y: f64,
        timestamp: f64,
    ) -> Result<String, JsValue> {
        self.handle_input(InputEvent::pointer_up(id, x, y, timestamp))
    }

    pub fn pointer_cancel(&self, id: i32) -> Result<String, JsValue> {
        self.handle_input(InputEvent::pointer_cancel(id))
    }

    pub fn wheel(
        &self,
        x: f64,
        y: f64,
        delta_y: f64,
    ) -> Result<String, JsValue> {
        self.handle_input(InputEvent::wheel(x, y, delta_y))
    }

    /// Put the camera back at the origin and clear all ownership
    pub fn reset(&self) -> Result<(), JsValue> {
        self.host()?.board.reset();
        Ok(())
    }

    /// Snapshot tile ownership as a JSON object of `"q,r": owned`
    pub fn ownership_json(&self) -> Result<String, JsValue> {
        Ok(self.host()?.board.grid().ownership_to_json())
    }

    /// Load an ownership snapshot produced by [Hexer::ownership_json].
    /// Returns the number of tiles updated.
    pub fn load_ownership_json(&self, json: &str) -> Result<usize, JsValue> {
        self.host()?.board.grid_mut().load_ownership_json(json).into_js()
    }
}

impl Hexer {
    /// Borrow the shared state. This fails, rather than panicking, if called
    /// re-entrantly, e.g. from inside a tile toggle callback.
    fn host(&self) -> Result<RefMut<'_, Host>, JsValue> {
        self.host
            .try_borrow_mut()
            .map_err(|_| anyhow!("board is busy"))
            .into_js()
    }

    fn handle_input(&self, event: InputEvent) -> Result<String, JsValue> {
        let outcome = self.host()?.board.handle_input(event);
        self.toggles.flush();
        Ok(outcome.to_string())
    }
}

#[wasm_bindgen(typescript_custom_section)]
const TS_APPEND_CONTENT: &'static str = r#"

/**
 * See description in the `extern "C"` section below
 */
export interface BoardConfigObject {
    hex_radius: number;
    seed_radius: number;
    camera: {
        zoom_min: number;
        zoom_max: number;
    };
    gesture: {
        tap_slop: number;
        double_tap_window_ms: number;
        double_tap_zoom: number;
        wheel_zoom_base: number;
    };
    render: {
        cull_padding_radii: number;
        cull_padding_tiles: number;
        seam_inset: number;
        owned_color: string;
        grid_color: string;
        fps_smoothing: number;
        max_pixel_ratio: number;
    };
}
"#;

#[wasm_bindgen]
extern "C" {
    /// A TS version of the [hexer::BoardConfig] type from the core crate.
    /// This needs to be mapped manually because some types change between
    /// Rust and TS. This type represents what **can be deserialized into a
    /// [hexer::BoardConfig]**; every field is optional on the way in.
    ///
    /// **It is very important that this stays up to date with the
    /// [hexer::BoardConfig] type**.
    #[wasm_bindgen(typescript_type = "BoardConfigObject")]
    pub type BoardConfigObject;
}
