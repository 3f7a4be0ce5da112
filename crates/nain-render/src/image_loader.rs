//! Image loading module.
//! Decodes PNG, JPEG, WebP and other formats into FrameBuffers, and encodes
//! rendered buffers back to PNG.

use std::io::Cursor;
use std::path::Path;

use image::{ImageFormat, RgbaImage};
use nain_core::{FrameBuffer, NainError, NainResult};

/// Load an image file and convert it to a FrameBuffer.
pub fn load_image(path: &Path) -> NainResult<FrameBuffer> {
    let img = image::open(path).map_err(|e| {
        NainError::asset(
            format!("failed to load image '{}': {}", path.display(), e),
            path,
        )
    })?;
    into_frame_buffer(img.to_rgba8())
}

fn into_frame_buffer(rgba: RgbaImage) -> NainResult<FrameBuffer> {
    let (width, height) = rgba.dimensions();
    FrameBuffer::from_raw(width, height, rgba.into_raw())
}

fn to_rgba_image(fb: &FrameBuffer) -> NainResult<RgbaImage> {
    RgbaImage::from_raw(fb.width, fb.height, fb.data.clone()).ok_or_else(|| {
        NainError::Render(format!(
            "buffer holds {} bytes, expected {}x{}x4",
            fb.data.len(),
            fb.width,
            fb.height
        ))
    })
}

/// Encode an RGBA buffer as PNG bytes.
pub fn encode_png(fb: &FrameBuffer) -> NainResult<Vec<u8>> {
    let img = to_rgba_image(fb)?;
    let mut out = Cursor::new(Vec::new());
    img.write_to(&mut out, ImageFormat::Png)
        .map_err(|e| NainError::Render(format!("failed to encode PNG: {}", e)))?;
    Ok(out.into_inner())
}

/// Write an RGBA buffer to `path` as PNG, creating parent directories.
pub fn save_png(fb: &FrameBuffer, path: &Path) -> NainResult<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }
    std::fs::write(path, encode_png(fb)?)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use nain_core::Color;

    #[test]
    fn test_load_image_missing_file() {
        let err = load_image(Path::new("/nonexistent/frame_0000.png")).unwrap_err();
        assert!(matches!(err, NainError::Asset { .. }));
    }

    #[test]
    fn test_png_bytes_decode_back() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("frame_0000.png");
        let fb = FrameBuffer::solid(4, 2, &Color::rgb(255, 0, 0));
        std::fs::write(&path, encode_png(&fb).unwrap()).unwrap();
        let decoded = load_image(&path).unwrap();
        assert_eq!((decoded.width, decoded.height), (4, 2));
        assert_eq!(decoded.get_pixel(3, 1), Some([255, 0, 0, 255]));
    }

    #[test]
    fn test_garbage_bytes_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("frame_0000.png");
        std::fs::write(&path, b"not an image").unwrap();
        assert!(matches!(load_image(&path), Err(NainError::Asset { .. })));
    }

    #[test]
    fn test_truncated_buffer_not_encodable() {
        let mut fb = FrameBuffer::new(2, 2);
        fb.data.truncate(7);
        assert!(matches!(encode_png(&fb), Err(NainError::Render(_))));
    }

    #[test]
    fn test_save_png_creates_directories() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out/preview.png");
        save_png(&FrameBuffer::solid(2, 2, &Color::WHITE), &path).unwrap();
        assert_eq!(load_image(&path).unwrap().width, 2);
    }
}
