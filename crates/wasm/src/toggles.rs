use hexer::TileToggle;
use log::warn;
use std::{cell::RefCell, rc::Rc};
use wasm_bindgen::JsValue;

/// Something outside the board that wants to hear about tile toggles
pub trait ToggleCallback {
    fn call(&self, toggle: TileToggle) -> Result<(), JsValue>;
}

/// JS callbacks are called as `callback(key, owned)`, where `key` is the
/// tile's `"q,r"` string
impl ToggleCallback for js_sys::Function {
    fn call(&self, toggle: TileToggle) -> Result<(), JsValue> {
        let key = JsValue::from_str(&toggle.point.to_string());
        let owned = JsValue::from_bool(toggle.owned);
        self.call2(&JsValue::NULL, &key, &owned).map(|_| ())
    }
}

/// Holds toggles back until the board is no longer borrowed. The board only
/// pushes onto the queue; callbacks run on [ToggleQueue::flush], which the
/// host calls once it has let go of the board. That way a callback can read
/// from (or even feed input to) the board it's listening to.
pub struct ToggleQueue<C = js_sys::Function> {
    pending: Rc<RefCell<Vec<TileToggle>>>,
    callbacks: Rc<RefCell<Vec<Rc<C>>>>,
}

impl<C> ToggleQueue<C> {
    pub fn new() -> Self {
        Self {
            pending: Rc::default(),
            callbacks: Rc::default(),
        }
    }

    pub fn push(&self, toggle: TileToggle) {
        self.pending.borrow_mut().push(toggle);
    }

    pub fn subscribe(&self, callback: C) {
        self.callbacks.borrow_mut().push(Rc::new(callback));
    }
}

impl<C: ToggleCallback> ToggleQueue<C> {
    /// Deliver every pending toggle to every callback, in order. Toggles
    /// caused by the callbacks themselves are delivered too.
    pub fn flush(&self) {
        loop {
            let pending = std::mem::take(&mut *self.pending.borrow_mut());
            if pending.is_empty() {
                break;
            }
            // Callbacks may subscribe more callbacks, so don't hold the borrow
            let callbacks = self.callbacks.borrow().clone();
            for toggle in pending {
                for callback in &callbacks {
                    if let Err(err) = callback.call(toggle) {
                        warn!(
                            "Tile toggle callback failed for {}: {:?}",
                            toggle.point, err
                        );
                    }
                }
            }
        }
    }
}

impl<C> Clone for ToggleQueue<C> {
    fn clone(&self) -> Self {
        Self {
            pending: Rc::clone(&self.pending),
            callbacks: Rc::clone(&self.callbacks),
        }
    }
}
