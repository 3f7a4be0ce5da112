use nain_core::{Rect, Size2D};

use crate::frame_set::FrameImage;

/// Resampling quality requested for a draw.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Smoothing {
    /// Nearest neighbour.
    Low,
    #[default]
    High,
}

/// A 2D raster target the sequence player draws onto.
///
/// Coordinates passed to [`DrawSurface::draw_image`] are in CSS pixels; the
/// player applies the device pixel ratio through [`DrawSurface::scale`].
pub trait DrawSurface {
    type Image: FrameImage;

    /// Layout size of the surface's container, in CSS pixels.
    fn css_size(&self) -> Size2D;

    fn device_pixel_ratio(&self) -> f64;

    /// Current backing buffer size in device pixels.
    fn backing_size(&self) -> (u32, u32);

    /// Reallocate the backing buffer. Only called when the size changes.
    fn resize_backing(&mut self, width: u32, height: u32);

    /// Whether a drawing context can be obtained. A surface without one is
    /// skipped silently.
    fn context_available(&mut self) -> bool;

    fn reset_transform(&mut self);

    /// Clear the whole backing buffer, ignoring the current transform.
    fn clear(&mut self);

    fn scale(&mut self, factor: f64);

    fn draw_image(&mut self, image: &Self::Image, dest: Rect, smoothing: Smoothing);
}
