use std::cell::RefCell;
use std::rc::{Rc, Weak};

use nain_core::FrameClock;
use nain_motion::{FramePath, PlayerOptions, SequencePlayer};
use wasm_bindgen::prelude::*;
use web_sys::{Element, HtmlCanvasElement, HtmlElement};

use crate::canvas::{CanvasSurface, ImageFrame};
use crate::layer::{parse_config, section_geometry, StyledElement};
use crate::subscription::{AnimationLoop, EventSubscription, ImageRequest};

struct Mounted {
    player: SequencePlayer<CanvasSurface>,
    section: Element,
    overlay: StyledElement,
    clock: FrameClock,
}

impl Mounted {
    fn on_scroll(&mut self) {
        let geometry = section_geometry(&self.section);
        self.player.scroll(&geometry);
    }

    fn on_resize(&mut self) {
        self.on_scroll();
        self.player.resize();
    }

    fn on_frame(&mut self, now_ms: f64) {
        let dt = self.clock.tick(now_ms);
        let tick = self.player.tick(dt);
        self.overlay.apply(tick.style);
    }
}

fn with_mounted(weak: &Weak<RefCell<Mounted>>, f: impl FnOnce(&mut Mounted)) {
    if let Some(mounted) = weak.upgrade() {
        f(&mut mounted.borrow_mut());
    }
}

/// A mounted scroll-sequence player. Every listener, the animation loop and
/// the pending image callbacks belong to this object and are released when it
/// is unmounted or freed.
#[wasm_bindgen(js_name = SequencePlayer)]
pub struct WebSequencePlayer {
    mounted: Rc<RefCell<Mounted>>,
    _scroll: EventSubscription,
    _resize: EventSubscription,
    _frames: AnimationLoop,
    _images: Vec<ImageRequest>,
}

#[wasm_bindgen(js_class = SequencePlayer)]
impl WebSequencePlayer {
    /// Attach to `section` (the tall scroll track), draw into `canvas`, and
    /// drive the transform/opacity of `overlay`. `config_json` is an optional
    /// site config in JSON form; omitted sections use the defaults.
    pub fn mount(
        section: Element,
        canvas: HtmlCanvasElement,
        overlay: HtmlElement,
        config_json: Option<String>,
    ) -> Result<WebSequencePlayer, JsValue> {
        let config = parse_config(config_json)?;
        let options = PlayerOptions::from_config(&config)
            .map_err(|e| JsValue::from_str(&e.to_string()))?;

        let mounted = Rc::new(RefCell::new(Mounted {
            player: SequencePlayer::new(CanvasSurface::new(canvas), options),
            section,
            overlay: StyledElement::new(overlay),
            clock: FrameClock::new(),
        }));
        {
            let mut m = mounted.borrow_mut();
            let geometry = section_geometry(&m.section);
            m.player.settle(&geometry);
            let style = m.player.style();
            m.overlay.apply(style);
        }

        let weak = Rc::downgrade(&mounted);
        let scroll = {
            let weak = weak.clone();
            EventSubscription::on_window("scroll", move |_| with_mounted(&weak, Mounted::on_scroll))?
        };
        let resize = {
            let weak = weak.clone();
            EventSubscription::on_window("resize", move |_| with_mounted(&weak, Mounted::on_resize))?
        };
        let frames = {
            let weak = weak.clone();
            AnimationLoop::start(move |now| with_mounted(&weak, |m| m.on_frame(now)))?
        };

        let path = FramePath::from(&config.sequence);
        let mut images = Vec::with_capacity(config.sequence.count);
        for index in 0..config.sequence.count {
            let src = path.path_for(index);
            let on_load = {
                let weak = weak.clone();
                move |element| {
                    with_mounted(&weak, |m| {
                        if let Err(e) = m.player.frame_loaded(index, ImageFrame(element)) {
                            web_sys::console::warn_1(&JsValue::from_str(&e.to_string()));
                        }
                    })
                }
            };
            let on_error = {
                let weak = weak.clone();
                let src = src.clone();
                move || {
                    web_sys::console::warn_1(&JsValue::from_str(&format!(
                        "sequence frame {} failed to load; the sequence will not play",
                        src
                    )));
                    with_mounted(&weak, |m| {
                        m.player.frame_failed(index, format!("failed to load {}", src));
                    })
                }
            };
            images.push(ImageRequest::start(&src, on_load, on_error)?);
        }

        Ok(WebSequencePlayer {
            mounted,
            _scroll: scroll,
            _resize: resize,
            _frames: frames,
            _images: images,
        })
    }

    /// Detach every listener and stop the animation loop.
    pub fn unmount(self) {}

    /// Raw scroll progress of the section, 0..=1.
    pub fn progress(&self) -> f64 {
        self.mounted.borrow().player.progress()
    }

    pub fn smoothed(&self) -> f64 {
        self.mounted.borrow().player.smoothed()
    }

    #[wasm_bindgen(js_name = currentFrame)]
    pub fn current_frame(&self) -> u32 {
        self.mounted.borrow().player.current_frame() as u32
    }

    #[wasm_bindgen(js_name = isReady)]
    pub fn is_ready(&self) -> bool {
        self.mounted.borrow().player.is_ready()
    }

    #[wasm_bindgen(js_name = loadState)]
    pub fn load_state(&self) -> String {
        self.mounted.borrow().player.load_state().to_string()
    }

    pub fn phase(&self) -> String {
        self.mounted.borrow().player.phase().to_string()
    }
}
