//! Scroll-driven page layers: the DOM side of [`ScrollLayer`].

use std::cell::RefCell;
use std::rc::{Rc, Weak};

use nain_core::{FrameClock, SiteConfig};
use nain_motion::{Choreography, LayerStyle, ScrollLayer, SectionGeometry};
use wasm_bindgen::prelude::*;
use web_sys::{Element, HtmlElement};

use crate::subscription::{AnimationLoop, EventSubscription};

/// Where `section` sits relative to the current viewport.
pub(crate) fn section_geometry(section: &Element) -> SectionGeometry {
    let rect = section.get_bounding_client_rect();
    let viewport_height = web_sys::window()
        .and_then(|w| w.inner_height().ok())
        .and_then(|h| h.as_f64())
        .unwrap_or(rect.height());
    SectionGeometry::new(rect.top(), rect.height(), viewport_height)
}

pub(crate) fn parse_config(config_json: Option<String>) -> Result<SiteConfig, JsValue> {
    let Some(json) = config_json else {
        return Ok(SiteConfig::default());
    };
    SiteConfig::from_json(&json).map_err(|e| JsValue::from_str(&format!("invalid config: {}", e)))
}

/// An element whose `transform` and `opacity` follow a [`LayerStyle`].
/// Writes to the DOM only when the style changes.
pub(crate) struct StyledElement {
    element: HtmlElement,
    applied: Option<LayerStyle>,
}

impl StyledElement {
    pub(crate) fn new(element: HtmlElement) -> Self {
        Self {
            element,
            applied: None,
        }
    }

    pub(crate) fn apply(&mut self, style: LayerStyle) {
        if self.applied == Some(style) {
            return;
        }
        let css = self.element.style();
        let _ = css.set_property("transform", &style.css_transform());
        let _ = css.set_property("opacity", &style.opacity.to_string());
        self.applied = Some(style);
    }
}

struct Mounted {
    layer: ScrollLayer,
    section: Element,
    element: StyledElement,
    clock: FrameClock,
}

impl Mounted {
    fn on_scroll(&mut self) {
        let geometry = section_geometry(&self.section);
        self.layer.scroll(&geometry);
    }

    fn on_frame(&mut self, now_ms: f64) {
        let dt = self.clock.tick(now_ms);
        let style = self.layer.tick(dt);
        self.element.apply(style);
    }
}

fn with_mounted(weak: &Weak<RefCell<Mounted>>, f: impl FnOnce(&mut Mounted)) {
    if let Some(mounted) = weak.upgrade() {
        f(&mut mounted.borrow_mut());
    }
}

/// A page layer animated by the scroll progress of a section, e.g. the
/// sticky reveal's background video (`"reveal-video"`) or its call-to-action
/// (`"reveal-cta"`). Listeners and the animation loop are released when the
/// object is unmounted or freed.
#[wasm_bindgen(js_name = ScrollChoreography)]
pub struct WebScrollChoreography {
    mounted: Rc<RefCell<Mounted>>,
    _scroll: EventSubscription,
    _resize: EventSubscription,
    _frames: AnimationLoop,
}

#[wasm_bindgen(js_class = ScrollChoreography)]
impl WebScrollChoreography {
    /// Track `section` and drive `layer` with the named preset. The spring
    /// comes from `config_json` when given, the site defaults otherwise.
    pub fn mount(
        section: Element,
        layer: HtmlElement,
        preset: &str,
        config_json: Option<String>,
    ) -> Result<WebScrollChoreography, JsValue> {
        let choreography = Choreography::named(preset)
            .ok_or_else(|| JsValue::from_str(&format!("unknown choreography '{}'", preset)))?;
        let config = parse_config(config_json)?;

        let mut scroll_layer = ScrollLayer::new(choreography, config.spring.into());
        let mut element = StyledElement::new(layer);
        element.apply(scroll_layer.settle(&section_geometry(&section)));

        let mounted = Rc::new(RefCell::new(Mounted {
            layer: scroll_layer,
            section,
            element,
            clock: FrameClock::new(),
        }));

        let weak = Rc::downgrade(&mounted);
        let scroll = {
            let weak = weak.clone();
            EventSubscription::on_window("scroll", move |_| with_mounted(&weak, Mounted::on_scroll))?
        };
        let resize = {
            let weak = weak.clone();
            EventSubscription::on_window("resize", move |_| with_mounted(&weak, Mounted::on_scroll))?
        };
        let frames = AnimationLoop::start(move |now| with_mounted(&weak, |m| m.on_frame(now)))?;

        Ok(WebScrollChoreography {
            mounted,
            _scroll: scroll,
            _resize: resize,
            _frames: frames,
        })
    }

    /// Detach every listener and stop the animation loop.
    pub fn unmount(self) {}

    pub fn progress(&self) -> f64 {
        self.mounted.borrow().layer.progress()
    }

    pub fn smoothed(&self) -> f64 {
        self.mounted.borrow().layer.smoothed()
    }

    pub fn opacity(&self) -> f64 {
        self.mounted.borrow().layer.style().opacity
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_config_uses_defaults() {
        let config = parse_config(None).unwrap();
        assert_eq!(config.sequence.count, 51);
    }

    #[test]
    fn test_partial_config_json() {
        let json = r#"{"sequence": {"count": 8, "ext": "webp"}}"#;
        let config = parse_config(Some(json.to_string())).unwrap();
        assert_eq!(config.sequence.count, 8);
        assert_eq!(config.sequence.pad, 4);
        assert_eq!(config.spring.stiffness, 140.0);
    }
}
