//! Scroll progress of a tracked section through the viewport.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// A position along the scroll axis of either the tracked section or the
/// viewport, as a fraction of its length.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum Edge {
    Start,
    Center,
    End,
    Fraction(f64),
}

impl Edge {
    pub fn fraction(&self) -> f64 {
        match self {
            Edge::Start => 0.0,
            Edge::Center => 0.5,
            Edge::End => 1.0,
            Edge::Fraction(f) => *f,
        }
    }
}

impl FromStr for Edge {
    type Err = OffsetParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "start" => Ok(Edge::Start),
            "center" => Ok(Edge::Center),
            "end" => Ok(Edge::End),
            other => other
                .parse::<f64>()
                .ok()
                .filter(|f| (0.0..=1.0).contains(f))
                .map(Edge::Fraction)
                .ok_or_else(|| OffsetParseError::UnknownEdge(other.to_string())),
        }
    }
}

impl fmt::Display for Edge {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Edge::Start => write!(f, "start"),
            Edge::Center => write!(f, "center"),
            Edge::End => write!(f, "end"),
            Edge::Fraction(v) => write!(f, "{}", v),
        }
    }
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum OffsetParseError {
    #[error("unknown edge '{0}' (expected start, center, end or a fraction in 0..=1)")]
    UnknownEdge(String),

    #[error("scroll offset '{0}' must be two edges, e.g. \"start end\"")]
    Malformed(String),
}

/// The moment a section edge meets a viewport edge, written as
/// `"<section edge> <viewport edge>"`. `"start end"` is the section's leading
/// edge touching the viewport's trailing edge.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScrollOffset {
    pub target: Edge,
    pub viewport: Edge,
}

impl ScrollOffset {
    pub const START_END: ScrollOffset = ScrollOffset {
        target: Edge::Start,
        viewport: Edge::End,
    };
    pub const END_START: ScrollOffset = ScrollOffset {
        target: Edge::End,
        viewport: Edge::Start,
    };

    /// Section top (relative to the viewport top) at which this offset is met.
    fn section_top(&self, geometry: &SectionGeometry) -> f64 {
        self.viewport.fraction() * geometry.viewport_height
            - self.target.fraction() * geometry.height
    }
}

impl FromStr for ScrollOffset {
    type Err = OffsetParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut parts = s.split_whitespace();
        match (parts.next(), parts.next(), parts.next()) {
            (Some(target), Some(viewport), None) => Ok(ScrollOffset {
                target: target.parse()?,
                viewport: viewport.parse()?,
            }),
            _ => Err(OffsetParseError::Malformed(s.to_string())),
        }
    }
}

impl fmt::Display for ScrollOffset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.target, self.viewport)
    }
}

/// Where the tracked section currently sits, in CSS pixels.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SectionGeometry {
    /// Section's top edge relative to the viewport's top edge. Decreases as
    /// the page scrolls down.
    pub top: f64,
    pub height: f64,
    pub viewport_height: f64,
}

impl SectionGeometry {
    pub fn new(top: f64, height: f64, viewport_height: f64) -> Self {
        Self {
            top,
            height,
            viewport_height,
        }
    }
}

/// Maps section geometry to a progress value in [0, 1]: 0 at the entry
/// offset, 1 at the exit offset, linear in between.
#[derive(Debug, Clone)]
pub struct ProgressSampler {
    entry: ScrollOffset,
    exit: ScrollOffset,
    last: f64,
}

impl Default for ProgressSampler {
    fn default() -> Self {
        Self::new(ScrollOffset::START_END, ScrollOffset::END_START)
    }
}

impl ProgressSampler {
    pub fn new(entry: ScrollOffset, exit: ScrollOffset) -> Self {
        Self {
            entry,
            exit,
            last: 0.0,
        }
    }

    pub fn entry(&self) -> ScrollOffset {
        self.entry
    }

    pub fn exit(&self) -> ScrollOffset {
        self.exit
    }

    /// The value computed by the most recent [`ProgressSampler::sample`].
    pub fn last(&self) -> f64 {
        self.last
    }

    pub fn sample(&mut self, geometry: &SectionGeometry) -> f64 {
        self.last = self.progress_at(geometry);
        self.last
    }

    /// Progress for `geometry` without recording it.
    pub fn progress_at(&self, geometry: &SectionGeometry) -> f64 {
        let start = self.entry.section_top(geometry);
        let end = self.exit.section_top(geometry);
        let span = start - end;

        let progress = if span.abs() < f64::EPSILON {
            if geometry.top <= end {
                1.0
            } else {
                0.0
            }
        } else {
            (start - geometry.top) / span
        };

        if progress.is_nan() {
            0.0
        } else {
            progress.clamp(0.0, 1.0)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_offsets() {
        assert_eq!("start end".parse::<ScrollOffset>(), Ok(ScrollOffset::START_END));
        assert_eq!(
            "  end   start ".parse::<ScrollOffset>(),
            Ok(ScrollOffset::END_START)
        );
        assert_eq!(
            "center 0.25".parse::<ScrollOffset>(),
            Ok(ScrollOffset {
                target: Edge::Center,
                viewport: Edge::Fraction(0.25)
            })
        );
        assert!("start".parse::<ScrollOffset>().is_err());
        assert!("start end extra".parse::<ScrollOffset>().is_err());
        assert!("top end".parse::<ScrollOffset>().is_err());
        assert!("start 1.5".parse::<ScrollOffset>().is_err());
    }

    #[test]
    fn test_offset_display_round_trips() {
        let offset: ScrollOffset = "center 0.25".parse().unwrap();
        assert_eq!(offset.to_string(), "center 0.25");
        assert_eq!(offset.to_string().parse::<ScrollOffset>(), Ok(offset));
    }

    #[test]
    fn test_default_offsets_span_entry_to_exit() {
        let mut sampler = ProgressSampler::default();
        let vh = 1000.0;
        let h = 3800.0;

        // Leading edge at the bottom of the viewport.
        assert_eq!(sampler.sample(&SectionGeometry::new(vh, h, vh)), 0.0);
        // Trailing edge at the top of the viewport.
        assert_eq!(sampler.sample(&SectionGeometry::new(-h, h, vh)), 1.0);
        // Halfway through the (vh + h) travel.
        let half = vh - (vh + h) / 2.0;
        assert!((sampler.sample(&SectionGeometry::new(half, h, vh)) - 0.5).abs() < 1e-12);
        assert!((sampler.last() - 0.5).abs() < 1e-12);
    }

    #[test]
    fn test_clamped_outside_travel() {
        let sampler = ProgressSampler::default();
        assert_eq!(sampler.progress_at(&SectionGeometry::new(5000.0, 100.0, 800.0)), 0.0);
        assert_eq!(sampler.progress_at(&SectionGeometry::new(-5000.0, 100.0, 800.0)), 1.0);
    }

    #[test]
    fn test_degenerate_span() {
        // "start start" to "start start" never moves: a step at the meeting point.
        let offset = ScrollOffset {
            target: Edge::Start,
            viewport: Edge::Start,
        };
        let sampler = ProgressSampler::new(offset, offset);
        assert_eq!(sampler.progress_at(&SectionGeometry::new(10.0, 100.0, 800.0)), 0.0);
        assert_eq!(sampler.progress_at(&SectionGeometry::new(0.0, 100.0, 800.0)), 1.0);
    }

    #[test]
    fn test_custom_offsets() {
        // Progress 0 when the section top reaches the viewport center,
        // 1 when the section top reaches the viewport top.
        let sampler = ProgressSampler::new(
            "start center".parse().unwrap(),
            "start start".parse().unwrap(),
        );
        let vh = 800.0;
        assert_eq!(sampler.progress_at(&SectionGeometry::new(400.0, 2000.0, vh)), 0.0);
        assert!((sampler.progress_at(&SectionGeometry::new(200.0, 2000.0, vh)) - 0.5).abs() < 1e-12);
        assert_eq!(sampler.progress_at(&SectionGeometry::new(0.0, 2000.0, vh)), 1.0);
    }
}
