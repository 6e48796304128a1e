use crate::{toggles::ToggleQueue, util::js_error, Host};
use anyhow::Context;
use hexer::InputEvent;
use log::{trace, warn};
use std::{cell::RefCell, rc::Rc};
use js_sys::Reflect;
use wasm_bindgen::{closure::Closure, JsCast, JsValue};
use web_sys::{
    AddEventListenerOptions, HtmlCanvasElement, MouseEvent, PointerEvent,
    WheelEvent,
};

type Listener = Closure<dyn FnMut(web_sys::Event)>;

/// DOM event listeners that forward canvas input to the board. Listeners are
/// removed when this is dropped.
pub struct InputBindings {
    canvas: HtmlCanvasElement,
    toggles: ToggleQueue,
    listeners: Vec<(&'static str, Listener)>,
}

impl InputBindings {
    /// Attach pointer and wheel listeners to the canvas. Positions are taken
    /// relative to the canvas, and each pressed pointer is captured so its
    /// moves and release keep coming even if it leaves the canvas. Pending
    /// tile toggles are flushed after each event, once the board is released.
    pub fn attach(
        canvas: &HtmlCanvasElement,
        host: &Rc<RefCell<Host>>,
        toggles: &ToggleQueue,
    ) -> anyhow::Result<Self> {
        let mut bindings = Self {
            canvas: canvas.clone(),
            toggles: toggles.clone(),
            listeners: Vec::new(),
        };

        let capture_canvas = canvas.clone();
        bindings.listen::<PointerEvent>("pointerdown", host, move |event| {
            if let Err(err) =
                capture_canvas.set_pointer_capture(event.pointer_id())
            {
                warn!("Error capturing pointer: {:?}", err);
            }
            let (x, y) = offset(&event);
            Some(InputEvent::pointer_down(
                event.pointer_id(),
                x,
                y,
                event.time_stamp(),
            ))
        })?;
        bindings.listen::<PointerEvent>("pointermove", host, |event| {
            let (x, y) = offset(&event);
            Some(InputEvent::pointer_move(
                event.pointer_id(),
                x,
                y,
                event.time_stamp(),
            ))
        })?;
        bindings.listen::<PointerEvent>("pointerup", host, |event| {
            let (x, y) = offset(&event);
            Some(InputEvent::pointer_up(
                event.pointer_id(),
                x,
                y,
                event.time_stamp(),
            ))
        })?;
        bindings.listen::<PointerEvent>("pointercancel", host, |event| {
            Some(InputEvent::pointer_cancel(event.pointer_id()))
        })?;
        bindings.listen::<WheelEvent>("wheel", host, |event| {
            // Keep the page from scrolling while zooming
            event.prevent_default();
            let (x, y) = offset(&event);
            Some(InputEvent::wheel(x, y, event.delta_y()))
        })?;

        Ok(bindings)
    }

    /// Register one listener. `convert` turns the DOM event into a board
    /// event; the result is fed to the board.
    fn listen<E: JsCast + 'static>(
        &mut self,
        event_type: &'static str,
        host: &Rc<RefCell<Host>>,
        mut convert: impl FnMut(E) -> Option<InputEvent> + 'static,
    ) -> anyhow::Result<()> {
        let host = Rc::clone(host);
        let toggles = self.toggles.clone();
        let closure = Closure::wrap(Box::new(move |event: web_sys::Event| {
            let event = match event.dyn_into::<E>() {
                Ok(event) => event,
                Err(_) => return,
            };
            if let Some(input) = convert(event) {
                match host.try_borrow_mut() {
                    Ok(mut host) => {
                        let outcome = host.board.handle_input(input);
                        trace!("{} -> {}", event_type, outcome);
                    }
                    Err(_) => warn!("Board busy, dropping {}", event_type),
                }
                toggles.flush();
            }
        }) as Box<dyn FnMut(web_sys::Event)>);

        // Wheel listeners have to be active to be able to prevent scrolling
        let options = AddEventListenerOptions::new();
        options.set_passive(event_type != "wheel");
        self.canvas
            .add_event_listener_with_callback_and_add_event_listener_options(
                event_type,
                closure.as_ref().unchecked_ref(),
                &options,
            )
            .map_err(js_error)
            .with_context(|| format!("error adding {} listener", event_type))?;
        self.listeners.push((event_type, closure));
        Ok(())
    }
}

impl Drop for InputBindings {
    fn drop(&mut self) {
        for (event_type, closure) in &self.listeners {
            if let Err(err) = self.canvas.remove_event_listener_with_callback(
                event_type,
                closure.as_ref().unchecked_ref(),
            ) {
                warn!("Error removing {} listener: {:?}", event_type, err);
            }
        }
    }
}

/// Position of an event relative to the canvas, in CSS pixels. Browsers
/// report `offsetX`/`offsetY` with sub-pixel precision, but web-sys types
/// them as integers, so the raw properties are read instead.
fn offset(event: &MouseEvent) -> (f64, f64) {
    let read = |name: &str| {
        Reflect::get(event, &JsValue::from_str(name))
            .ok()
            .and_then(|value| value.as_f64())
    };
    (
        coordinate(read("offsetX"), event.offset_x()),
        coordinate(read("offsetY"), event.offset_y()),
    )
}

/// Prefer the fractional coordinate, falling back to the truncated one
fn coordinate(raw: Option<f64>, truncated: i32) -> f64 {
    raw.filter(|value| value.is_finite())
        .unwrap_or_else(|| f64::from(truncated))
}
