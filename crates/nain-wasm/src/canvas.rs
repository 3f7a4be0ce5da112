//! [`DrawSurface`] over an `HtmlCanvasElement` 2D context.

use nain_core::{Rect, Size2D};
use nain_motion::{DrawSurface, FrameImage, Smoothing};
use wasm_bindgen::{JsCast, JsValue};
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement, HtmlImageElement};

/// A decoded sequence frame held by the browser.
#[derive(Debug, Clone)]
pub struct ImageFrame(pub HtmlImageElement);

impl FrameImage for ImageFrame {
    fn width(&self) -> u32 {
        self.0.natural_width()
    }

    fn height(&self) -> u32 {
        self.0.natural_height()
    }
}

pub struct CanvasSurface {
    canvas: HtmlCanvasElement,
    context: Option<CanvasRenderingContext2d>,
}

impl CanvasSurface {
    pub fn new(canvas: HtmlCanvasElement) -> Self {
        Self {
            canvas,
            context: None,
        }
    }

    pub fn canvas(&self) -> &HtmlCanvasElement {
        &self.canvas
    }

    fn context(&mut self) -> Option<&CanvasRenderingContext2d> {
        if self.context.is_none() {
            self.context = self
                .canvas
                .get_context("2d")
                .ok()
                .flatten()
                .and_then(|ctx| ctx.dyn_into::<CanvasRenderingContext2d>().ok());
        }
        self.context.as_ref()
    }
}

impl DrawSurface for CanvasSurface {
    type Image = ImageFrame;

    /// The canvas fills its parent, so the parent's box is the layout size.
    fn css_size(&self) -> Size2D {
        let rect = match self.canvas.parent_element() {
            Some(parent) => parent.get_bounding_client_rect(),
            None => self.canvas.get_bounding_client_rect(),
        };
        Size2D::new(rect.width(), rect.height())
    }

    fn device_pixel_ratio(&self) -> f64 {
        web_sys::window()
            .map(|w| w.device_pixel_ratio())
            .unwrap_or(1.0)
    }

    fn backing_size(&self) -> (u32, u32) {
        (self.canvas.width(), self.canvas.height())
    }

    fn resize_backing(&mut self, width: u32, height: u32) {
        self.canvas.set_width(width);
        self.canvas.set_height(height);
    }

    fn context_available(&mut self) -> bool {
        self.context().is_some()
    }

    fn reset_transform(&mut self) {
        if let Some(ctx) = self.context() {
            let _ = ctx.set_transform(1.0, 0.0, 0.0, 1.0, 0.0, 0.0);
        }
    }

    fn clear(&mut self) {
        let (width, height) = self.backing_size();
        if let Some(ctx) = self.context() {
            ctx.clear_rect(0.0, 0.0, width as f64, height as f64);
        }
    }

    fn scale(&mut self, factor: f64) {
        if let Some(ctx) = self.context() {
            let _ = ctx.scale(factor, factor);
        }
    }

    fn draw_image(&mut self, image: &ImageFrame, dest: Rect, smoothing: Smoothing) {
        let Some(ctx) = self.context() else {
            return;
        };
        let high = smoothing == Smoothing::High;
        ctx.set_image_smoothing_enabled(high);
        if high {
            let _ = js_sys::Reflect::set(
                ctx,
                &JsValue::from_str("imageSmoothingQuality"),
                &JsValue::from_str("high"),
            );
        }
        let _ = ctx.draw_image_with_html_image_element_and_dw_and_dh(
            &image.0,
            dest.x(),
            dest.y(),
            dest.width(),
            dest.height(),
        );
    }
}
