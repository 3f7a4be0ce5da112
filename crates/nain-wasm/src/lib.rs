//! # nain-wasm
//!
//! WebAssembly bindings for the NAIN site engine. Drives the scroll-sequence
//! player from a real canvas, animates the sticky-reveal layers, and exposes
//! the small pieces of page behaviour (header state, gallery lightbox) the
//! static pages need.

mod canvas;
mod layer;
mod player;
mod subscription;

pub use canvas::{CanvasSurface, ImageFrame};
pub use layer::WebScrollChoreography;
pub use player::WebSequencePlayer;
pub use subscription::{AnimationLoop, EventSubscription, ImageRequest};

use nain_motion::FramePath;
use wasm_bindgen::prelude::*;
use web_sys::Element;

/// Whether the fixed header should use its scrolled style at `scroll_y`.
#[wasm_bindgen]
pub fn header_scrolled(scroll_y: f64) -> bool {
    nain_motion::header_scrolled(scroll_y)
}

/// URL of frame `index` for a sequence stored at `{base}{index:0pad}.{ext}`.
#[wasm_bindgen]
pub fn frame_path(base: &str, pad: usize, ext: &str, index: usize) -> String {
    FramePath::new(base, pad, ext).path_for(index)
}

/// Toggles `class_name` on the header element as the window scrolls past
/// the threshold.
#[wasm_bindgen]
pub struct HeaderWatcher {
    _scroll: EventSubscription,
}

#[wasm_bindgen]
impl HeaderWatcher {
    #[wasm_bindgen(constructor)]
    pub fn new(header: Element, class_name: String) -> Result<HeaderWatcher, JsValue> {
        let update = move || {
            let scroll_y = web_sys::window()
                .and_then(|w| w.scroll_y().ok())
                .unwrap_or(0.0);
            let _ = header
                .class_list()
                .toggle_with_force(&class_name, header_scrolled(scroll_y));
        };
        update();
        let scroll = EventSubscription::on_window("scroll", move |_| update())?;
        Ok(HeaderWatcher { _scroll: scroll })
    }
}

/// Gallery lightbox state, driven by tile clicks and keyboard events.
#[wasm_bindgen(js_name = Lightbox)]
pub struct WebLightbox {
    inner: nain_motion::Lightbox,
}

#[wasm_bindgen(js_class = Lightbox)]
impl WebLightbox {
    #[wasm_bindgen(constructor)]
    pub fn new(len: usize) -> WebLightbox {
        WebLightbox {
            inner: nain_motion::Lightbox::new(len),
        }
    }

    pub fn open(&mut self, index: usize) {
        self.inner.open(index);
    }

    pub fn close(&mut self) {
        self.inner.close();
    }

    pub fn next(&mut self) {
        self.inner.next();
    }

    pub fn prev(&mut self) {
        self.inner.prev();
    }

    /// Feed a `KeyboardEvent.key`. Returns true when the key was handled and
    /// the event's default should be prevented.
    #[wasm_bindgen(js_name = handleKey)]
    pub fn handle_key(&mut self, key: &str) -> bool {
        self.inner.handle_key(key)
    }

    /// Index of the open item, or `undefined` when closed.
    pub fn active(&self) -> Option<u32> {
        self.inner.active().map(|i| i as u32)
    }

    #[wasm_bindgen(js_name = isOpen)]
    pub fn is_open(&self) -> bool {
        self.inner.is_open()
    }
}

/// Get the version string.
#[wasm_bindgen]
pub fn version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}
