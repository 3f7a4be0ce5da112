//! Owned RGBA8 pixel buffers: decoded sequence frames and native draw targets.

use crate::color::Color;
use crate::error::{NainError, NainResult};

const CHANNELS: usize = 4;

/// Straight-alpha RGBA8 pixels, row-major, no padding.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FrameBuffer {
    pub width: u32,
    pub height: u32,
    pub data: Vec<u8>,
}

impl FrameBuffer {
    /// A fully transparent buffer.
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            data: vec![0; width as usize * height as usize * CHANNELS],
        }
    }

    pub fn solid(width: u32, height: u32, color: &Color) -> Self {
        let mut fb = Self::new(width, height);
        fb.fill(color);
        fb
    }

    /// Wrap decoded pixels. `data` must hold exactly `width * height` RGBA pixels.
    pub fn from_raw(width: u32, height: u32, data: Vec<u8>) -> NainResult<Self> {
        let expected = width as usize * height as usize * CHANNELS;
        if data.len() != expected {
            return Err(NainError::InvalidArgument(format!(
                "{}x{} RGBA buffer needs {} bytes, got {}",
                width,
                height,
                expected,
                data.len()
            )));
        }
        Ok(Self {
            width,
            height,
            data,
        })
    }

    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    pub fn fill(&mut self, color: &Color) {
        let rgba = color.to_rgba8();
        for px in self.data.chunks_exact_mut(CHANNELS) {
            px.copy_from_slice(&rgba);
        }
    }

    fn offset(&self, x: u32, y: u32) -> Option<usize> {
        (x < self.width && y < self.height)
            .then(|| (y as usize * self.width as usize + x as usize) * CHANNELS)
    }

    pub fn get_pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        let i = self.offset(x, y)?;
        let mut px = [0; 4];
        px.copy_from_slice(&self.data[i..i + CHANNELS]);
        Some(px)
    }

    /// Out-of-bounds writes are dropped.
    pub fn set_pixel(&mut self, x: u32, y: u32, rgba: [u8; 4]) {
        if let Some(i) = self.offset(x, y) {
            self.data[i..i + CHANNELS].copy_from_slice(&rgba);
        }
    }

    /// Bilinearly filtered sample at continuous pixel coordinates, where
    /// `(0.5, 0.5)` is the center of the top-left pixel. Coordinates are
    /// clamped to the edge pixels.
    pub fn sample_bilinear(&self, x: f64, y: f64) -> [u8; 4] {
        if self.is_empty() {
            return [0; 4];
        }
        let fx = (x - 0.5).clamp(0.0, (self.width - 1) as f64);
        let fy = (y - 0.5).clamp(0.0, (self.height - 1) as f64);
        let (x0, y0) = (fx.floor() as u32, fy.floor() as u32);
        let x1 = (x0 + 1).min(self.width - 1);
        let y1 = (y0 + 1).min(self.height - 1);
        let (tx, ty) = (fx - x0 as f64, fy - y0 as f64);

        let corner = |x, y| self.get_pixel(x, y).unwrap_or_default();
        let (p00, p10, p01, p11) = (corner(x0, y0), corner(x1, y0), corner(x0, y1), corner(x1, y1));

        std::array::from_fn(|c| {
            let top = p00[c] as f64 + (p10[c] as f64 - p00[c] as f64) * tx;
            let bottom = p01[c] as f64 + (p11[c] as f64 - p01[c] as f64) * tx;
            (top + (bottom - top) * ty).round().clamp(0.0, 255.0) as u8
        })
    }

    /// Source-over one pixel onto this buffer.
    pub fn blend_pixel(&mut self, x: u32, y: u32, src: [u8; 4]) {
        if let Some(i) = self.offset(x, y) {
            source_over(src, &mut self.data[i..i + CHANNELS]);
        }
    }

    /// Source-over all of `src` with its top-left corner at `(dx, dy)`.
    /// Parts falling outside this buffer are clipped.
    pub fn composite_over(&mut self, src: &FrameBuffer, dx: i32, dy: i32) {
        let x_range = clip_span(dx, src.width, self.width);
        let y_range = clip_span(dy, src.height, self.height);
        let (Some((sx0, sx1)), Some((sy0, sy1))) = (x_range, y_range) else {
            return;
        };

        let row_bytes = (sx1 - sx0) as usize * CHANNELS;
        for sy in sy0..sy1 {
            let ty = (sy as i64 + dy as i64) as usize;
            let tx = (sx0 as i64 + dx as i64) as usize;
            let s = (sy as usize * src.width as usize + sx0 as usize) * CHANNELS;
            let d = (ty * self.width as usize + tx) * CHANNELS;
            let src_row = &src.data[s..s + row_bytes];
            let dst_row = &mut self.data[d..d + row_bytes];
            for (sp, dp) in src_row
                .chunks_exact(CHANNELS)
                .zip(dst_row.chunks_exact_mut(CHANNELS))
            {
                source_over([sp[0], sp[1], sp[2], sp[3]], dp);
            }
        }
    }
}

/// Source columns (or rows) `[start, end)` of a `src_len` span placed at
/// `offset` that land inside `0..dst_len`.
fn clip_span(offset: i32, src_len: u32, dst_len: u32) -> Option<(u32, u32)> {
    let start = (-(offset as i64)).max(0);
    let end = (src_len as i64).min(dst_len as i64 - offset as i64);
    (start < end).then_some((start as u32, end as u32))
}

fn source_over(src: [u8; 4], dst: &mut [u8]) {
    match src[3] {
        0 => {}
        255 => dst.copy_from_slice(&src),
        sa => {
            let sa = sa as u32;
            let da = dst[3] as u32;
            let keep = da * (255 - sa) / 255;
            let out_a = sa + keep;
            for c in 0..3 {
                dst[c] = ((src[c] as u32 * sa + dst[c] as u32 * keep) / out_a) as u8;
            }
            dst[3] = out_a as u8;
        }
    }
}
