use crate::{util::js_error, Host};
use anyhow::Context;
use log::{debug, warn};
use std::{
    cell::{Cell, RefCell},
    rc::Rc,
};
use wasm_bindgen::{closure::Closure, JsCast};

type FrameCallback = Closure<dyn FnMut(f64)>;

/// Drives rendering off `requestAnimationFrame`. Each frame draws the board
/// and then schedules the next one, until [RenderLoop::stop] is called.
/// Stopping only cancels the pending frame; board state is untouched, so a
/// stopped loop can be started again where it left off.
pub struct RenderLoop {
    /// The frame callback. It needs a handle to itself to reschedule, so
    /// it lives behind a shared cell.
    callback: Rc<RefCell<Option<FrameCallback>>>,
    /// ID of the pending frame request, if the loop is running
    request_id: Rc<Cell<Option<i32>>>,
}

impl RenderLoop {
    pub fn new() -> Self {
        Self {
            callback: Rc::new(RefCell::new(None)),
            request_id: Rc::new(Cell::new(None)),
        }
    }

    pub fn is_running(&self) -> bool {
        self.request_id.get().is_some()
    }

    /// Start rendering the given host every frame. No-op if already running.
    pub fn start(&self, host: &Rc<RefCell<Host>>) -> anyhow::Result<()> {
        if self.is_running() {
            return Ok(());
        }

        if self.callback.borrow().is_none() {
            let host = Rc::clone(host);
            let callback = Rc::clone(&self.callback);
            let request_id = Rc::clone(&self.request_id);
            let closure = Closure::wrap(Box::new(move |timestamp: f64| {
                match host.try_borrow_mut() {
                    Ok(mut host) => {
                        host.render(timestamp);
                    }
                    // Something else is holding the board, skip this frame
                    Err(_) => warn!("Board busy, skipping frame"),
                }

                // Only continue if nobody stopped us during the frame
                if request_id.get().is_some() {
                    if let Err(err) = schedule(&callback, &request_id) {
                        warn!("Error scheduling frame: {:#}", err);
                        request_id.set(None);
                    }
                }
            }) as Box<dyn FnMut(f64)>);
            *self.callback.borrow_mut() = Some(closure);
        }

        schedule(&self.callback, &self.request_id)?;
        debug!("Render loop started");
        Ok(())
    }

    /// Cancel the pending frame. No-op if not running.
    pub fn stop(&self) -> anyhow::Result<()> {
        if let Some(id) = self.request_id.take() {
            window()?
                .cancel_animation_frame(id)
                .map_err(js_error)
                .context("error cancelling frame")?;
            debug!("Render loop stopped");
        }
        Ok(())
    }
}

impl Drop for RenderLoop {
    fn drop(&mut self) {
        if let Err(err) = self.stop() {
            warn!("Error stopping render loop: {:#}", err);
        }
        // The callback holds a handle to its own cell, so we have to break
        // the cycle by hand
        self.callback.borrow_mut().take();
    }
}

fn window() -> anyhow::Result<web_sys::Window> {
    web_sys::window().context("no global window")
}

/// Request a frame for the stored callback, and remember its ID
fn schedule(
    callback: &Rc<RefCell<Option<FrameCallback>>>,
    request_id: &Cell<Option<i32>>,
) -> anyhow::Result<()> {
    let callback = callback.borrow();
    let closure = callback.as_ref().context("no frame callback")?;
    let id = window()?
        .request_animation_frame(closure.as_ref().unchecked_ref())
        .map_err(js_error)
        .context("error requesting frame")?;
    request_id.set(Some(id));
    Ok(())
}
