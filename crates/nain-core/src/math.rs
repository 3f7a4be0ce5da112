use serde::{Deserialize, Serialize};

/// A 2D point.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Point2D {
    pub x: f64,
    pub y: f64,
}

impl Point2D {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// A 2D size.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Size2D {
    pub width: f64,
    pub height: f64,
}

impl Size2D {
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    /// Compute the aspect ratio (width / height).
    pub fn aspect_ratio(&self) -> f64 {
        if self.height == 0.0 {
            return 0.0;
        }
        self.width / self.height
    }

    pub fn is_empty(&self) -> bool {
        self.width <= 0.0 || self.height <= 0.0
    }

    /// Backing-store dimensions for this CSS size at the given device pixel ratio.
    /// Ratios below 1 are treated as 1.
    pub fn to_device_pixels(&self, device_pixel_ratio: f64) -> (u32, u32) {
        let dpr = effective_pixel_ratio(device_pixel_ratio);
        (
            (self.width * dpr).round().max(0.0) as u32,
            (self.height * dpr).round().max(0.0) as u32,
        )
    }
}

/// Clamp a reported device pixel ratio to something drawable.
pub fn effective_pixel_ratio(device_pixel_ratio: f64) -> f64 {
    if device_pixel_ratio.is_finite() {
        device_pixel_ratio.max(1.0)
    } else {
        1.0
    }
}

/// An axis-aligned rectangle.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub origin: Point2D,
    pub size: Size2D,
}

impl Rect {
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            origin: Point2D::new(x, y),
            size: Size2D::new(width, height),
        }
    }

    pub fn x(&self) -> f64 {
        self.origin.x
    }

    pub fn y(&self) -> f64 {
        self.origin.y
    }

    pub fn width(&self) -> f64 {
        self.size.width
    }

    pub fn height(&self) -> f64 {
        self.size.height
    }

    /// Uniformly scale `content` to fit inside `container`, centered.
    ///
    /// The aspect ratio is preserved and nothing is cropped, so the unused
    /// axis is letterboxed. Empty inputs produce an empty rect at the center.
    pub fn fit_contain(container: Size2D, content: Size2D) -> Rect {
        if container.is_empty() || content.is_empty() {
            return Rect::new(container.width / 2.0, container.height / 2.0, 0.0, 0.0);
        }
        let scale = (container.width / content.width).min(container.height / content.height);
        let width = content.width * scale;
        let height = content.height * scale;
        Rect::new(
            (container.width - width) / 2.0,
            (container.height - height) / 2.0,
            width,
            height,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_size_aspect_ratio() {
        let s = Size2D::new(1920.0, 1080.0);
        assert!((s.aspect_ratio() - 16.0 / 9.0).abs() < 0.01);
        assert_eq!(Size2D::new(10.0, 0.0).aspect_ratio(), 0.0);
    }

    #[test]
    fn test_device_pixels_rounds_and_floors_ratio() {
        let s = Size2D::new(780.5, 439.0);
        assert_eq!(s.to_device_pixels(2.0), (1561, 878));
        assert_eq!(s.to_device_pixels(0.5), (781, 439));
        assert_eq!(s.to_device_pixels(f64::NAN), (781, 439));
    }

    #[test]
    fn test_fit_contain_letterboxes_wide_image() {
        // 16:9 image in a square container: full width, bars above and below.
        let r = Rect::fit_contain(Size2D::new(400.0, 400.0), Size2D::new(1600.0, 900.0));
        assert!((r.width() - 400.0).abs() < 1e-9);
        assert!((r.height() - 225.0).abs() < 1e-9);
        assert!(r.x().abs() < 1e-9);
        assert!((r.y() - 87.5).abs() < 1e-9);
    }

    #[test]
    fn test_fit_contain_pillarboxes_tall_image() {
        let r = Rect::fit_contain(Size2D::new(1000.0, 500.0), Size2D::new(100.0, 100.0));
        assert!((r.width() - 500.0).abs() < 1e-9);
        assert!((r.x() - 250.0).abs() < 1e-9);
        assert!(r.y().abs() < 1e-9);
    }

    #[test]
    fn test_fit_contain_empty_content() {
        let r = Rect::fit_contain(Size2D::new(100.0, 50.0), Size2D::new(0.0, 10.0));
        assert_eq!(r, Rect::new(50.0, 25.0, 0.0, 0.0));
    }
}
