//! Presentation values derived from smoothed scroll progress.
//!
//! Nothing here stores state: every style and phase is recomputed from the
//! current progress.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::mapping::{MappingError, PiecewiseLinear};

/// Scroll offset (CSS px) past which the fixed header switches to its
/// translucent "scrolled" style.
pub const HEADER_SCROLL_THRESHOLD: f64 = 10.0;

pub fn header_scrolled(scroll_y: f64) -> bool {
    scroll_y > HEADER_SCROLL_THRESHOLD
}

/// The layer property a track drives.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LayerProperty {
    /// Vertical offset in viewport heights (1.0 = 100vh).
    TranslateY,
    /// Horizontal offset in CSS pixels.
    TranslateX,
    Opacity,
}

impl fmt::Display for LayerProperty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LayerProperty::TranslateY => write!(f, "translate.y"),
            LayerProperty::TranslateX => write!(f, "translate.x"),
            LayerProperty::Opacity => write!(f, "opacity"),
        }
    }
}

/// A property + the mapping from progress to its value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Track {
    pub property: LayerProperty,
    pub mapping: PiecewiseLinear,
}

impl Track {
    pub fn new(
        property: LayerProperty,
        inputs: &[f64],
        outputs: &[f64],
    ) -> Result<Self, MappingError> {
        Ok(Self {
            property,
            mapping: PiecewiseLinear::new(inputs, outputs)?,
        })
    }
}

/// The resolved look of a layer for one progress value.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LayerStyle {
    pub translate_y_vh: f64,
    pub translate_x_px: f64,
    pub opacity: f64,
}

impl Default for LayerStyle {
    fn default() -> Self {
        Self {
            translate_y_vh: 0.0,
            translate_x_px: 0.0,
            opacity: 1.0,
        }
    }
}

impl LayerStyle {
    /// CSS `transform` value for this style.
    pub fn css_transform(&self) -> String {
        format!(
            "translate3d({}px, {}vh, 0)",
            self.translate_x_px,
            self.translate_y_vh * 100.0
        )
    }

    /// Vertical offset in CSS pixels for a viewport of `viewport_height`.
    pub fn translate_y_px(&self, viewport_height: f64) -> f64 {
        self.translate_y_vh * viewport_height
    }
}

/// A set of tracks evaluated together against one progress value.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Choreography {
    tracks: Vec<Track>,
}

impl Choreography {
    pub fn new() -> Self {
        Self { tracks: Vec::new() }
    }

    pub fn with_track(mut self, track: Track) -> Self {
        self.tracks.push(track);
        self
    }

    pub fn tracks(&self) -> &[Track] {
        &self.tracks
    }

    /// Resolve every track at `progress`. Properties without a track keep
    /// their [`LayerStyle::default`] value; later tracks win on conflicts.
    pub fn evaluate(&self, progress: f64) -> LayerStyle {
        let mut style = LayerStyle::default();
        for track in &self.tracks {
            let value = track.mapping.map(progress);
            match track.property {
                LayerProperty::TranslateY => style.translate_y_vh = value,
                LayerProperty::TranslateX => style.translate_x_px = value,
                LayerProperty::Opacity => style.opacity = value,
            }
        }
        style
    }

    /// The fixed overlay carrying the frame sequence: slides up from one
    /// viewport below over the first 12% of progress, fades out between 92%
    /// and 96%.
    pub fn sequence_overlay() -> Self {
        Self::from_tracks([
            preset(LayerProperty::TranslateY, &[0.0, 0.12], &[1.0, 0.0]),
            preset(
                LayerProperty::Opacity,
                &[0.0, 0.92, 0.96, 1.0],
                &[1.0, 1.0, 0.0, 0.0],
            ),
        ])
    }

    /// The fixed background video of the sticky reveal section.
    pub fn reveal_video() -> Self {
        Self::from_tracks([preset(
            LayerProperty::Opacity,
            &[0.0, 0.01, 0.99, 1.0],
            &[0.0, 1.0, 1.0, 0.0],
        )])
    }

    /// The call-to-action inside the sticky reveal: fades in while sliding
    /// 80px from the right, holds, then fades out.
    pub fn reveal_cta() -> Self {
        Self::from_tracks([
            preset(
                LayerProperty::Opacity,
                &[0.08, 0.2, 0.8, 0.92],
                &[0.0, 1.0, 1.0, 0.0],
            ),
            preset(LayerProperty::TranslateX, &[0.08, 0.2], &[80.0, 0.0]),
        ])
    }

    /// Look up a preset by the name pages use for it.
    pub fn named(name: &str) -> Option<Self> {
        match name {
            "sequence-overlay" => Some(Self::sequence_overlay()),
            "reveal-video" => Some(Self::reveal_video()),
            "reveal-cta" => Some(Self::reveal_cta()),
            _ => None,
        }
    }

    fn from_tracks<const N: usize>(tracks: [Option<Track>; N]) -> Self {
        Self {
            tracks: tracks.into_iter().flatten().collect(),
        }
    }
}

/// Preset breakpoints are literals; `test_presets_have_all_tracks` covers them.
fn preset(property: LayerProperty, inputs: &[f64], outputs: &[f64]) -> Option<Track> {
    Track::new(property, inputs, outputs).ok()
}

/// Where a section is in its pass through the viewport.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ScrollPhase {
    BeforeView,
    Entering,
    InView,
    Exiting,
    PastView,
}

impl fmt::Display for ScrollPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ScrollPhase::BeforeView => write!(f, "before-view"),
            ScrollPhase::Entering => write!(f, "entering"),
            ScrollPhase::InView => write!(f, "in-view"),
            ScrollPhase::Exiting => write!(f, "exiting"),
            ScrollPhase::PastView => write!(f, "past-view"),
        }
    }
}

/// Progress values separating the phases.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PhaseBounds {
    pub settled: f64,
    pub exit_start: f64,
    pub exit_end: f64,
}

impl PhaseBounds {
    /// Matches [`Choreography::sequence_overlay`].
    pub const SEQUENCE_OVERLAY: PhaseBounds = PhaseBounds {
        settled: 0.12,
        exit_start: 0.92,
        exit_end: 0.96,
    };
}

impl ScrollPhase {
    pub fn at(progress: f64, bounds: &PhaseBounds) -> ScrollPhase {
        if progress.is_nan() || progress <= 0.0 {
            ScrollPhase::BeforeView
        } else if progress < bounds.settled {
            ScrollPhase::Entering
        } else if progress < bounds.exit_start {
            ScrollPhase::InView
        } else if progress < bounds.exit_end {
            ScrollPhase::Exiting
        } else {
            ScrollPhase::PastView
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn test_overlay_slide_offset() {
        let overlay = Choreography::sequence_overlay();
        assert!(close(overlay.evaluate(0.0).translate_y_vh, 1.0));
        assert!(close(overlay.evaluate(0.06).translate_y_vh, 0.5));
        assert!(close(overlay.evaluate(0.12).translate_y_vh, 0.0));
        assert!(close(overlay.evaluate(0.7).translate_y_vh, 0.0));
    }

    #[test]
    fn test_overlay_opacity() {
        let overlay = Choreography::sequence_overlay();
        assert!(close(overlay.evaluate(0.90).opacity, 1.0));
        assert!(close(overlay.evaluate(0.94).opacity, 0.5));
        assert!(close(overlay.evaluate(0.98).opacity, 0.0));
    }

    #[test]
    fn test_reveal_cta() {
        let cta = Choreography::reveal_cta();
        let before = cta.evaluate(0.0);
        assert_eq!(before.opacity, 0.0);
        assert_eq!(before.translate_x_px, 80.0);
        let mid = cta.evaluate(0.14);
        assert!(close(mid.opacity, 0.5));
        assert!(close(mid.translate_x_px, 40.0));
        let held = cta.evaluate(0.5);
        assert_eq!(held.opacity, 1.0);
        assert_eq!(held.translate_x_px, 0.0);
        assert_eq!(cta.evaluate(1.0).opacity, 0.0);
    }

    #[test]
    fn test_reveal_video_fades_at_both_ends() {
        let video = Choreography::reveal_video();
        assert_eq!(video.evaluate(0.0).opacity, 0.0);
        assert_eq!(video.evaluate(0.5).opacity, 1.0);
        assert_eq!(video.evaluate(1.0).opacity, 0.0);
    }

    #[test]
    fn test_presets_have_all_tracks() {
        assert_eq!(Choreography::sequence_overlay().tracks().len(), 2);
        assert_eq!(Choreography::reveal_video().tracks().len(), 1);
        assert_eq!(Choreography::reveal_cta().tracks().len(), 2);
    }

    #[test]
    fn test_named_presets() {
        assert_eq!(Choreography::named("reveal-cta"), Some(Choreography::reveal_cta()));
        assert_eq!(Choreography::named("reveal-video"), Some(Choreography::reveal_video()));
        assert_eq!(
            Choreography::named("sequence-overlay"),
            Some(Choreography::sequence_overlay())
        );
        assert_eq!(Choreography::named("fade"), None);
    }

    #[test]
    fn test_empty_choreography_is_identity() {
        assert_eq!(Choreography::new().evaluate(0.3), LayerStyle::default());
    }

    #[test]
    fn test_css_transform() {
        let style = Choreography::sequence_overlay().evaluate(0.06);
        assert_eq!(style.css_transform(), "translate3d(0px, 50vh, 0)");
        assert!(close(style.translate_y_px(900.0), 450.0));
    }

    #[test]
    fn test_phases() {
        let b = PhaseBounds::SEQUENCE_OVERLAY;
        assert_eq!(ScrollPhase::at(0.0, &b), ScrollPhase::BeforeView);
        assert_eq!(ScrollPhase::at(0.05, &b), ScrollPhase::Entering);
        assert_eq!(ScrollPhase::at(0.5, &b), ScrollPhase::InView);
        assert_eq!(ScrollPhase::at(0.94, &b), ScrollPhase::Exiting);
        assert_eq!(ScrollPhase::at(0.99, &b), ScrollPhase::PastView);
    }

    #[test]
    fn test_header_threshold() {
        assert!(!header_scrolled(0.0));
        assert!(!header_scrolled(10.0));
        assert!(header_scrolled(10.5));
    }
}
