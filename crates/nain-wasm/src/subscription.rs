//! Scoped browser subscriptions. Each one detaches itself when dropped.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use wasm_bindgen::closure::Closure;
use wasm_bindgen::{JsCast, JsValue};
use web_sys::{Event, EventTarget, HtmlImageElement};

fn window() -> Result<web_sys::Window, JsValue> {
    web_sys::window().ok_or_else(|| JsValue::from_str("no window"))
}

/// An event listener that is removed again on drop.
pub struct EventSubscription {
    target: EventTarget,
    event: &'static str,
    callback: Closure<dyn FnMut(Event)>,
}

impl EventSubscription {
    pub fn new<F>(target: &EventTarget, event: &'static str, handler: F) -> Result<Self, JsValue>
    where
        F: FnMut(Event) + 'static,
    {
        let callback = Closure::wrap(Box::new(handler) as Box<dyn FnMut(Event)>);
        target.add_event_listener_with_callback(event, callback.as_ref().unchecked_ref())?;
        Ok(Self {
            target: target.clone(),
            event,
            callback,
        })
    }

    /// Listen on the global `window`.
    pub fn on_window<F>(event: &'static str, handler: F) -> Result<Self, JsValue>
    where
        F: FnMut(Event) + 'static,
    {
        let window: EventTarget = window()?.into();
        Self::new(&window, event, handler)
    }
}

impl Drop for EventSubscription {
    fn drop(&mut self) {
        let _ = self
            .target
            .remove_event_listener_with_callback(self.event, self.callback.as_ref().unchecked_ref());
    }
}

type FrameCallback = Rc<RefCell<Option<Closure<dyn FnMut(f64)>>>>;

fn request_frame(callback: &Closure<dyn FnMut(f64)>) -> Result<i32, JsValue> {
    window()?.request_animation_frame(callback.as_ref().unchecked_ref())
}

/// A `requestAnimationFrame` loop. The callback receives the frame timestamp
/// in milliseconds. Dropping the loop cancels the pending frame.
pub struct AnimationLoop {
    pending: Rc<Cell<Option<i32>>>,
    callback: FrameCallback,
}

impl AnimationLoop {
    pub fn start<F>(mut on_frame: F) -> Result<Self, JsValue>
    where
        F: FnMut(f64) + 'static,
    {
        let callback: FrameCallback = Rc::new(RefCell::new(None));
        let pending = Rc::new(Cell::new(None));

        let this = Rc::downgrade(&callback);
        let next = pending.clone();
        *callback.borrow_mut() = Some(Closure::wrap(Box::new(move |now: f64| {
            next.set(None);
            on_frame(now);
            // Re-arm while the loop is alive.
            if let Some(callback) = this.upgrade() {
                if let Some(closure) = callback.borrow().as_ref() {
                    next.set(request_frame(closure).ok());
                }
            }
        }) as Box<dyn FnMut(f64)>));

        let first = match callback.borrow().as_ref() {
            Some(closure) => Some(request_frame(closure)?),
            None => None,
        };
        pending.set(first);
        Ok(Self { pending, callback })
    }
}

impl Drop for AnimationLoop {
    fn drop(&mut self) {
        if let Some(id) = self.pending.take() {
            if let Ok(window) = window() {
                let _ = window.cancel_animation_frame(id);
            }
        }
        self.callback.borrow_mut().take();
    }
}

/// An image fetch with `onload`/`onerror` handlers that are detached on drop.
/// The fetch itself cannot be cancelled.
pub struct ImageRequest {
    element: HtmlImageElement,
    _onload: Closure<dyn FnMut()>,
    _onerror: Closure<dyn FnMut()>,
}

impl ImageRequest {
    pub fn start<L, E>(src: &str, on_load: L, on_error: E) -> Result<Self, JsValue>
    where
        L: FnMut(HtmlImageElement) + 'static,
        E: FnMut() + 'static,
    {
        let element = HtmlImageElement::new()?;
        let mut on_load = on_load;
        let loaded = element.clone();
        let onload = Closure::wrap(Box::new(move || on_load(loaded.clone())) as Box<dyn FnMut()>);
        let onerror = Closure::wrap(Box::new(on_error) as Box<dyn FnMut()>);
        element.set_onload(Some(onload.as_ref().unchecked_ref()));
        element.set_onerror(Some(onerror.as_ref().unchecked_ref()));
        element.set_src(src);
        Ok(Self {
            element,
            _onload: onload,
            _onerror: onerror,
        })
    }
}

impl Drop for ImageRequest {
    fn drop(&mut self) {
        self.element.set_onload(None);
        self.element.set_onerror(None);
    }
}
