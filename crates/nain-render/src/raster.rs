//! CPU implementation of [`DrawSurface`] over a [`FrameBuffer`].

use nain_core::{Color, FrameBuffer, Rect, Size2D};
use nain_motion::{DrawSurface, Smoothing};

/// An in-memory stand-in for a 2D canvas: a backing buffer in device pixels
/// plus a uniform scale transform.
#[derive(Debug, Clone)]
pub struct RasterSurface {
    css: Size2D,
    device_pixel_ratio: f64,
    target: FrameBuffer,
    scale: f64,
}

impl RasterSurface {
    pub fn new(css: Size2D, device_pixel_ratio: f64) -> Self {
        Self {
            css,
            device_pixel_ratio,
            target: FrameBuffer::new(0, 0),
            scale: 1.0,
        }
    }

    pub fn set_css_size(&mut self, css: Size2D) {
        self.css = css;
    }

    pub fn set_device_pixel_ratio(&mut self, ratio: f64) {
        self.device_pixel_ratio = ratio;
    }

    /// The backing buffer as last drawn.
    pub fn target(&self) -> &FrameBuffer {
        &self.target
    }

    pub fn into_target(self) -> FrameBuffer {
        self.target
    }
}

impl DrawSurface for RasterSurface {
    type Image = FrameBuffer;

    fn css_size(&self) -> Size2D {
        self.css
    }

    fn device_pixel_ratio(&self) -> f64 {
        self.device_pixel_ratio
    }

    fn backing_size(&self) -> (u32, u32) {
        (self.target.width, self.target.height)
    }

    fn resize_backing(&mut self, width: u32, height: u32) {
        self.target = FrameBuffer::new(width, height);
    }

    fn context_available(&mut self) -> bool {
        true
    }

    fn reset_transform(&mut self) {
        self.scale = 1.0;
    }

    fn clear(&mut self) {
        self.target.fill(&Color::TRANSPARENT);
    }

    fn scale(&mut self, factor: f64) {
        self.scale *= factor;
    }

    fn draw_image(&mut self, image: &FrameBuffer, dest: Rect, smoothing: Smoothing) {
        let device = Rect::new(
            dest.x() * self.scale,
            dest.y() * self.scale,
            dest.width() * self.scale,
            dest.height() * self.scale,
        );
        draw_scaled(&mut self.target, image, device, smoothing);
    }
}

/// Resample `image` into the device-pixel rect `dest` of `target`. A pixel
/// is covered when its center falls inside `dest`.
fn draw_scaled(target: &mut FrameBuffer, image: &FrameBuffer, dest: Rect, smoothing: Smoothing) {
    if image.is_empty() || target.is_empty() || dest.width() <= 0.0 || dest.height() <= 0.0 {
        return;
    }

    let x0 = dest.x().max(0.0).floor() as u32;
    let y0 = dest.y().max(0.0).floor() as u32;
    let x1 = ((dest.x() + dest.width()).ceil().max(0.0) as u32).min(target.width);
    let y1 = ((dest.y() + dest.height()).ceil().max(0.0) as u32).min(target.height);

    let sx = image.width as f64 / dest.width();
    let sy = image.height as f64 / dest.height();

    for py in y0..y1 {
        let cy = py as f64 + 0.5;
        if cy < dest.y() || cy >= dest.y() + dest.height() {
            continue;
        }
        let v = (cy - dest.y()) * sy;
        for px in x0..x1 {
            let cx = px as f64 + 0.5;
            if cx < dest.x() || cx >= dest.x() + dest.width() {
                continue;
            }
            let u = (cx - dest.x()) * sx;
            let rgba = match smoothing {
                Smoothing::High => image.sample_bilinear(u, v),
                Smoothing::Low => image
                    .get_pixel(
                        (u.floor() as u32).min(image.width - 1),
                        (v.floor() as u32).min(image.height - 1),
                    )
                    .unwrap_or_default(),
            };
            target.blend_pixel(px, py, rgba);
        }
    }
}
