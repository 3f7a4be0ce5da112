use serde::{Deserialize, Serialize};

use crate::error::{NainError, NainResult};
use crate::math::Size2D;

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct SiteInfo {
    pub name: String,
    pub tagline: String,
    pub instagram: Option<String>,
    pub youtube: Option<String>,
}

impl Default for SiteInfo {
    fn default() -> Self {
        Self {
            name: "NAIN STUDIO".to_string(),
            tagline: "We are a creative visualization studio specializing in architectural \
                      imagery, animation, and realtime experiences."
                .to_string(),
            instagram: Some("https://www.instagram.com/nainstudio0210/".to_string()),
            youtube: Some("https://www.youtube.com/@Nainstudio-v5x".to_string()),
        }
    }
}

/// Where the frames of the scroll sequence live and how the player tracks its section.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct SequenceConfig {
    /// Path prefix, e.g. "/sequence/02/frame_".
    pub base_path: String,
    pub count: usize,
    /// Zero-padding width of the numeric suffix.
    pub pad: usize,
    pub ext: String,
    /// Scroll offset at which progress is 0, as "<section edge> <viewport edge>".
    pub entry_offset: String,
    /// Scroll offset at which progress is 1.
    pub exit_offset: String,
    /// Overlay background behind the letterboxed frame.
    pub background: String,
}

impl Default for SequenceConfig {
    fn default() -> Self {
        Self {
            base_path: "/sequence/02/frame_".to_string(),
            count: 51,
            pad: 4,
            ext: "png".to_string(),
            entry_offset: "start end".to_string(),
            exit_offset: "end start".to_string(),
            background: "#000000".to_string(),
        }
    }
}

/// The box the sequence canvas is laid out in: a fraction of the viewport
/// width, capped, at a fixed aspect ratio.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct CanvasLayout {
    pub width_fraction: f64,
    pub max_width: f64,
    pub aspect_ratio: f64,
}

impl Default for CanvasLayout {
    fn default() -> Self {
        Self {
            width_fraction: 0.78,
            max_width: 1000.0,
            aspect_ratio: 16.0 / 9.0,
        }
    }
}

impl CanvasLayout {
    /// CSS size of the canvas container for a given viewport.
    pub fn container_size(&self, viewport: Size2D) -> Size2D {
        let width = (viewport.width * self.width_fraction).min(self.max_width).max(0.0);
        let height = if self.aspect_ratio > 0.0 {
            width / self.aspect_ratio
        } else {
            0.0
        };
        Size2D::new(width, height)
    }
}

/// Coefficients of the scroll-smoothing spring.
#[derive(Debug, Clone, Copy, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct SpringSettings {
    pub stiffness: f64,
    pub damping: f64,
    pub mass: f64,
    pub rest_delta: f64,
    pub rest_speed: f64,
}

impl Default for SpringSettings {
    fn default() -> Self {
        Self {
            stiffness: 140.0,
            damping: 28.0,
            mass: 0.25,
            rest_delta: 0.005,
            rest_speed: 0.01,
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ServerConfig {
    pub bind: String,
    /// Directory holding the static pages and the frame assets.
    pub public_dir: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: "127.0.0.1:3000".to_string(),
            public_dir: "public".to_string(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum MediaKind {
    Image,
    Video,
}

/// One entry of the work gallery.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct MediaItem {
    pub id: String,
    pub kind: MediaKind,
    pub src: String,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub caption: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub poster: Option<String>,
    /// Explicit tile width in grid columns; the repeating pattern applies otherwise.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub span: Option<u8>,
}

impl MediaItem {
    fn video(id: &str, src: &str, title: &str, caption: &str) -> Self {
        Self {
            id: id.to_string(),
            kind: MediaKind::Video,
            src: src.to_string(),
            title: title.to_string(),
            caption: Some(caption.to_string()),
            poster: Some(format!("/work/{}_poster.jpg", id)),
            span: None,
        }
    }

    fn image(id: &str, title: &str, caption: &str) -> Self {
        Self {
            id: id.to_string(),
            kind: MediaKind::Image,
            src: format!("/work/{}.jpg", id),
            title: title.to_string(),
            caption: Some(caption.to_string()),
            poster: None,
            span: None,
        }
    }
}

/// The published catalogue, in display order.
pub fn default_work() -> Vec<MediaItem> {
    vec![
        MediaItem::video("01", "/work/01.mp4", "High-rise Above the Clouds", "Exterior visualization / Concept"),
        MediaItem::image("02", "Arcade of Umbrellas", "Commercial / Garden"),
        MediaItem::video("03", "/work/03_low.mp4", "Fabric Facade", "Detail / Motion"),
        MediaItem::video("04", "/work/04_low.mp4", "Board & Pieces", "Lifestyle / Motion"),
        MediaItem::video("05", "/work/05.mp4", "Yellow Sprint", "Automotive / Motion"),
        MediaItem::video("06", "/work/06.mp4", "Forest Bridge", "Exterior / Night"),
        MediaItem::image("07", "Lobby Frame", "Interior / Detail"),
        MediaItem::video("08", "/work/08.mp4", "Ribbon Bridge", "Aerial / Motion"),
        MediaItem::image("09", "Brick Courtyard", "Landscape / Still"),
        MediaItem::image("10", "Pool Pavilion", "Resort / Still"),
        MediaItem::video("11", "/work/11.mp4", "Seaside Towers", "Sunset Sequence"),
        MediaItem::video("12", "/work/12.mp4", "Red Stadium", "Competition / Concept"),
        MediaItem::image("13", "Misty Pines", "Nature / Motion"),
        MediaItem::image("14", "Forest Road", "Environment / Still"),
        MediaItem::video("15", "/work/15.mp4", "Minimal Loft", "Interior / Still"),
        MediaItem::image("16", "Timber Curve", "Architecture / Still"),
    ]
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SiteConfig {
    #[serde(default)]
    pub site: SiteInfo,
    #[serde(default)]
    pub sequence: SequenceConfig,
    #[serde(default)]
    pub canvas: CanvasLayout,
    #[serde(default)]
    pub spring: SpringSettings,
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default = "default_work")]
    pub work: Vec<MediaItem>,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            site: SiteInfo::default(),
            sequence: SequenceConfig::default(),
            canvas: CanvasLayout::default(),
            spring: SpringSettings::default(),
            server: ServerConfig::default(),
            work: default_work(),
        }
    }
}

impl SiteConfig {
    pub const FILE_NAME: &'static str = "nain.config.toml";

    pub fn load_from_file(path: &std::path::Path) -> NainResult<Self> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_toml(&contents)
    }

    pub fn from_toml(contents: &str) -> NainResult<Self> {
        let config: SiteConfig =
            toml::from_str(contents).map_err(|e| NainError::config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Parse the JSON form served to the browser player.
    pub fn from_json(contents: &str) -> NainResult<Self> {
        let config: SiteConfig = serde_json::from_str(contents)?;
        config.validate()?;
        Ok(config)
    }

    pub fn save_to_file(&self, path: &std::path::Path) -> NainResult<()> {
        let contents =
            toml::to_string_pretty(self).map_err(|e| NainError::config(e.to_string()))?;
        std::fs::write(path, contents)?;
        Ok(())
    }

    /// Reject values the player cannot work with.
    pub fn validate(&self) -> NainResult<()> {
        if self.sequence.count == 0 {
            return Err(NainError::config("sequence.count must be at least 1"));
        }
        if self.sequence.pad == 0 {
            return Err(NainError::config("sequence.pad must be at least 1"));
        }
        let spring = &self.spring;
        if !(spring.stiffness > 0.0 && spring.mass > 0.0 && spring.damping >= 0.0) {
            return Err(NainError::config(
                "spring.stiffness and spring.mass must be positive, spring.damping non-negative",
            ));
        }
        if !(self.canvas.aspect_ratio > 0.0) {
            return Err(NainError::config("canvas.aspect_ratio must be positive"));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_published_site() {
        let config = SiteConfig::default();
        assert_eq!(config.sequence.count, 51);
        assert_eq!(config.sequence.pad, 4);
        assert_eq!(config.spring.stiffness, 140.0);
        assert_eq!(config.spring.damping, 28.0);
        assert_eq!(config.spring.mass, 0.25);
        assert_eq!(config.work.len(), 16);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_toml_falls_back_to_defaults() {
        let config = SiteConfig::from_toml(
            r##"
            [sequence]
            count = 24
            ext = "webp"
            background = "#101010"

            [spring]
            stiffness = 200.0
            "##,
        )
        .unwrap();
        assert_eq!(config.sequence.count, 24);
        assert_eq!(config.sequence.ext, "webp");
        assert_eq!(config.sequence.background, "#101010");
        assert_eq!(config.sequence.base_path, "/sequence/02/frame_");
        assert_eq!(config.sequence.pad, 4);
        assert_eq!(config.spring.stiffness, 200.0);
        assert_eq!(config.spring.damping, 28.0);
        assert_eq!(config.canvas.max_width, 1000.0);
        assert_eq!(config.server.bind, "127.0.0.1:3000");
        assert_eq!(config.site.name, "NAIN STUDIO");
        assert_eq!(config.work.len(), 16);
    }

    #[test]
    fn test_partial_sections_in_every_table() {
        let config = SiteConfig::from_toml(
            r#"
            [site]
            name = "Studio"

            [canvas]
            width_fraction = 0.5

            [server]
            public_dir = "www"
            "#,
        )
        .unwrap();
        assert_eq!(config.site.name, "Studio");
        assert!(config.site.instagram.is_some());
        assert_eq!(config.canvas.width_fraction, 0.5);
        assert_eq!(config.canvas.max_width, 1000.0);
        assert_eq!(config.server.public_dir, "www");
        assert_eq!(config.server.bind, "127.0.0.1:3000");
    }

    #[test]
    fn test_invalid_values_rejected() {
        let err = SiteConfig::from_toml("[spring]\nmass = 0.0\n").unwrap_err();
        assert!(err.to_string().contains("spring.mass"));

        assert!(SiteConfig::from_toml("[sequence\n").is_err());
    }

    #[test]
    fn test_work_items_from_toml() {
        let config = SiteConfig::from_toml(
            r#"
            [[work]]
            id = "a"
            kind = "video"
            src = "/work/a.mp4"
            title = "A"
            poster = "/work/a_poster.jpg"
            span = 4
            "#,
        )
        .unwrap();
        assert_eq!(config.work.len(), 1);
        assert_eq!(config.work[0].kind, MediaKind::Video);
        assert_eq!(config.work[0].span, Some(4));
        assert_eq!(config.work[0].caption, None);
    }

    #[test]
    fn test_save_and_reload_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(SiteConfig::FILE_NAME);
        let mut config = SiteConfig::default();
        config.server.bind = "0.0.0.0:8080".to_string();
        config.save_to_file(&path).unwrap();

        let loaded = SiteConfig::load_from_file(&path).unwrap();
        assert_eq!(loaded.server.bind, "0.0.0.0:8080");
        assert_eq!(loaded.work, config.work);
    }

    #[test]
    fn test_canvas_container_size() {
        let layout = CanvasLayout::default();
        let small = layout.container_size(Size2D::new(1000.0, 800.0));
        assert!((small.width - 780.0).abs() < 1e-9);
        assert!((small.height - 438.75).abs() < 1e-9);
        let wide = layout.container_size(Size2D::new(2560.0, 1440.0));
        assert!((wide.width - 1000.0).abs() < 1e-9);
        assert!((wide.height - 562.5).abs() < 1e-9);
    }

    #[test]
    fn test_json_form_validates() {
        let json = serde_json::to_string(&SiteConfig::default()).unwrap();
        assert_eq!(SiteConfig::from_json(&json).unwrap().sequence.count, 51);
        assert!(matches!(
            SiteConfig::from_json(r#"{"sequence": 3}"#),
            Err(NainError::Serialization(_))
        ));
        assert!(matches!(
            SiteConfig::from_json(r#"{"sequence": {"count": 0}}"#),
            Err(NainError::Config(_))
        ));
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let config = SiteConfig::from_json(r#"{"sequence": {"count": 8}}"#).unwrap();
        assert_eq!(config.sequence.count, 8);
        assert_eq!(config.sequence.base_path, "/sequence/02/frame_");
        assert_eq!(config.spring, SpringSettings::default());
    }
}
