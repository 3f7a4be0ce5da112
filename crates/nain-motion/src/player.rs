//! The scroll-synchronized frame-sequence player.
//!
//! [`SequencePlayer`] owns every stateful piece of the pipeline (sampler,
//! spring, selector, frame set) and a [`DrawSurface`]. The host feeds it
//! three kinds of events:
//!
//! - geometry changes via [`SequencePlayer::scroll`] (moves the spring target),
//! - frame ticks via [`SequencePlayer::tick`] (advances the spring, redraws),
//! - load completions via [`SequencePlayer::frame_loaded`] / [`SequencePlayer::frame_failed`].

use nain_core::{effective_pixel_ratio, Duration, NainError, NainResult, Rect, SiteConfig};

use crate::choreography::{Choreography, LayerStyle, PhaseBounds, ScrollPhase};
use crate::frame_set::{FrameImage, FrameSet, LoadEvent, LoadState};
use crate::progress::{ProgressSampler, ScrollOffset, SectionGeometry};
use crate::selector::FrameSelector;
use crate::spring::{Spring, SpringConfig};
use crate::surface::{DrawSurface, Smoothing};

#[derive(Debug, Clone)]
pub struct PlayerOptions {
    pub count: usize,
    pub entry: ScrollOffset,
    pub exit: ScrollOffset,
    pub spring: SpringConfig,
}

impl Default for PlayerOptions {
    fn default() -> Self {
        Self {
            count: 51,
            entry: ScrollOffset::START_END,
            exit: ScrollOffset::END_START,
            spring: SpringConfig::default(),
        }
    }
}

impl PlayerOptions {
    pub fn from_config(config: &SiteConfig) -> NainResult<Self> {
        let parse = |field: &str, value: &str| {
            value
                .parse::<ScrollOffset>()
                .map_err(|e| NainError::config(format!("sequence.{}: {}", field, e)))
        };
        Ok(Self {
            count: config.sequence.count,
            entry: parse("entry_offset", &config.sequence.entry_offset)?,
            exit: parse("exit_offset", &config.sequence.exit_offset)?,
            spring: config.spring.into(),
        })
    }
}

/// Result of one [`SequencePlayer::tick`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Tick {
    pub smoothed: f64,
    /// Overlay style for this tick.
    pub style: LayerStyle,
    /// Frame drawn during this tick, if any.
    pub redrawn: Option<usize>,
}

pub struct SequencePlayer<S: DrawSurface> {
    surface: S,
    frames: FrameSet<S::Image>,
    sampler: ProgressSampler,
    spring: Spring,
    selector: FrameSelector,
    overlay: Choreography,
    smoothed: f64,
    redraws: usize,
}

impl<S: DrawSurface> SequencePlayer<S> {
    pub fn new(surface: S, options: PlayerOptions) -> Self {
        Self {
            surface,
            frames: FrameSet::new(options.count),
            sampler: ProgressSampler::new(options.entry, options.exit),
            spring: Spring::new(options.spring, 0.0),
            selector: FrameSelector::new(options.count),
            overlay: Choreography::sequence_overlay(),
            smoothed: 0.0,
            redraws: 0,
        }
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    pub fn surface_mut(&mut self) -> &mut S {
        &mut self.surface
    }

    pub fn into_surface(self) -> S {
        self.surface
    }

    pub fn frames(&self) -> &FrameSet<S::Image> {
        &self.frames
    }

    pub fn load_state(&self) -> LoadState {
        self.frames.state()
    }

    pub fn is_ready(&self) -> bool {
        self.frames.is_ready()
    }

    /// Raw progress from the most recent geometry update.
    pub fn progress(&self) -> f64 {
        self.sampler.last()
    }

    pub fn smoothed(&self) -> f64 {
        self.smoothed
    }

    pub fn current_frame(&self) -> usize {
        self.selector.current()
    }

    /// Number of frames drawn since construction.
    pub fn redraw_count(&self) -> usize {
        self.redraws
    }

    /// Whether the spring has settled on its target.
    pub fn is_settled(&self) -> bool {
        self.spring.is_at_rest()
    }

    pub fn style(&self) -> LayerStyle {
        self.overlay.evaluate(self.smoothed)
    }

    pub fn phase(&self) -> ScrollPhase {
        ScrollPhase::at(self.smoothed, &PhaseBounds::SEQUENCE_OVERLAY)
    }

    /// Report a decoded frame. The transition to ready draws the currently
    /// selected frame.
    pub fn frame_loaded(&mut self, index: usize, image: S::Image) -> NainResult<LoadEvent> {
        let event = self.frames.complete(index, image)?;
        if event == LoadEvent::Ready {
            self.selector.select(self.smoothed);
            self.draw_frame(self.selector.current());
        }
        Ok(event)
    }

    pub fn frame_failed(&mut self, index: usize, reason: impl Into<String>) -> LoadEvent {
        self.frames.fail(index, reason)
    }

    /// Feed new section geometry. Only the spring target moves; output
    /// follows on subsequent ticks. Returns the raw progress.
    pub fn scroll(&mut self, geometry: &SectionGeometry) -> f64 {
        let progress = self.sampler.sample(geometry);
        self.spring.set_target(progress);
        progress
    }

    /// Jump straight to the progress for `geometry` without animating, as on
    /// mount or after a remount mid-page.
    pub fn settle(&mut self, geometry: &SectionGeometry) -> Option<usize> {
        let progress = self.sampler.sample(geometry);
        self.seek(progress)
    }

    /// Place the smoothed signal at `progress` directly, bypassing the
    /// sampler. Used for scrubbing and still previews.
    pub fn seek(&mut self, progress: f64) -> Option<usize> {
        let progress = if progress.is_nan() {
            0.0
        } else {
            progress.clamp(0.0, 1.0)
        };
        self.spring.reset(progress);
        self.smoothed = progress;
        self.redraw_if_changed()
    }

    /// Advance the smoothed signal by `dt`, redrawing when the frame index changes.
    pub fn tick(&mut self, dt: Duration) -> Tick {
        let previous = self.smoothed;
        self.smoothed = self.spring.tick(dt);
        let redrawn = if self.smoothed != previous {
            self.redraw_if_changed()
        } else {
            None
        };
        Tick {
            smoothed: self.smoothed,
            style: self.style(),
            redrawn,
        }
    }

    /// The surface's layout changed: redraw the current frame regardless of
    /// whether the index moved.
    pub fn resize(&mut self) -> bool {
        if !self.frames.is_ready() {
            return false;
        }
        self.draw_frame(self.selector.current())
    }

    fn redraw_if_changed(&mut self) -> Option<usize> {
        if !self.frames.is_ready() {
            return None;
        }
        let index = self.selector.select(self.smoothed)?;
        self.draw_frame(index).then_some(index)
    }

    fn draw_frame(&mut self, index: usize) -> bool {
        if !self.surface.context_available() {
            return false;
        }
        let Some(image) = self.frames.get(index) else {
            return false;
        };

        let css = self.surface.css_size();
        let dpr = effective_pixel_ratio(self.surface.device_pixel_ratio());
        let backing = css.to_device_pixels(dpr);
        if self.surface.backing_size() != backing {
            self.surface.resize_backing(backing.0, backing.1);
        }

        self.surface.reset_transform();
        self.surface.clear();
        self.surface.scale(dpr);
        let dest = Rect::fit_contain(css, image.size());
        self.surface.draw_image(image, dest, Smoothing::High);

        self.redraws += 1;
        tracing::debug!(
            "drew frame {} into {}x{} at {:.2}x",
            index,
            backing.0,
            backing.1,
            dpr
        );
        true
    }
}
