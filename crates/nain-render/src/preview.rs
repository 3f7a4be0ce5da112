//! Still previews of the sequence overlay at a given scroll progress.

use std::path::Path;

use nain_core::{
    effective_pixel_ratio, Color, FrameBuffer, NainError, NainResult, SiteConfig, Size2D,
};
use nain_motion::{FramePath, PlayerOptions, SequencePlayer};

use crate::raster::RasterSurface;
use crate::sequence::load_frames;

#[derive(Debug, Clone, Copy)]
pub struct PreviewOptions {
    /// Smoothed progress to render at.
    pub progress: f64,
    /// Viewport size in CSS pixels.
    pub viewport: Size2D,
    pub device_pixel_ratio: f64,
}

impl Default for PreviewOptions {
    fn default() -> Self {
        Self {
            progress: 0.5,
            viewport: Size2D::new(1440.0, 900.0),
            device_pixel_ratio: 1.0,
        }
    }
}

/// Render the viewport as the sequence overlay leaves it at
/// `options.progress`: the overlay background with the letterboxed frame
/// centered on it, offset by the slide-in and faded by the exit opacity.
/// Uncovered viewport pixels stay transparent.
pub fn render_preview(
    public_dir: &Path,
    config: &SiteConfig,
    options: &PreviewOptions,
) -> NainResult<FrameBuffer> {
    let background = Color::from_hex(&config.sequence.background).map_err(|e| {
        NainError::config(format!(
            "sequence.background '{}': {}",
            config.sequence.background, e
        ))
    })?;

    let dpr = effective_pixel_ratio(options.device_pixel_ratio);
    let container = config.canvas.container_size(options.viewport);
    let surface = RasterSurface::new(container, dpr);
    let mut player = SequencePlayer::new(surface, PlayerOptions::from_config(config)?);

    let path = FramePath::from(&config.sequence);
    let mut rejected = None;
    load_frames(public_dir, &path, config.sequence.count, |index, result| {
        match result {
            Ok(frame) => {
                if let Err(e) = player.frame_loaded(index, frame) {
                    rejected = Some(e);
                }
            }
            Err(e) => {
                player.frame_failed(index, e.to_string());
            }
        }
    });
    if let Some(e) = rejected {
        return Err(e);
    }
    if !player.is_ready() {
        return Err(NainError::asset(
            format!("sequence not playable: {}", player.load_state()),
            public_dir,
        ));
    }

    player.seek(options.progress);
    player.resize();
    let style = player.style();
    tracing::info!(
        "preview at progress {:.3}: frame {}, opacity {:.2}, offset {:.1}vh",
        player.smoothed(),
        player.current_frame(),
        style.opacity,
        style.translate_y_vh * 100.0
    );

    let (vw, vh) = options.viewport.to_device_pixels(dpr);
    let mut overlay = FrameBuffer::solid(vw, vh, &background);
    let canvas = player.into_surface().into_target();
    let cx = (vw as i32 - canvas.width as i32) / 2;
    let cy = (vh as i32 - canvas.height as i32) / 2;
    overlay.composite_over(&canvas, cx, cy);
    fade(&mut overlay, style.opacity);

    let mut out = FrameBuffer::new(vw, vh);
    let dy = (style.translate_y_px(options.viewport.height) * dpr).round() as i32;
    out.composite_over(&overlay, 0, dy);
    Ok(out)
}

/// Multiply every alpha value by `opacity`.
fn fade(fb: &mut FrameBuffer, opacity: f64) {
    let opacity = opacity.clamp(0.0, 1.0);
    if opacity >= 1.0 {
        return;
    }
    for px in fb.data.chunks_exact_mut(4) {
        px[3] = (px[3] as f64 * opacity).round() as u8;
    }
}
