//! A page layer whose style follows the smoothed scroll progress of a section,
//! without any frames attached. The home page's sticky reveal uses two of
//! these: the background video and its call-to-action.

use nain_core::Duration;

use crate::choreography::{Choreography, LayerStyle};
use crate::progress::{ProgressSampler, SectionGeometry};
use crate::spring::{Spring, SpringConfig};

#[derive(Debug, Clone)]
pub struct ScrollLayer {
    sampler: ProgressSampler,
    spring: Spring,
    choreography: Choreography,
    smoothed: f64,
}

impl ScrollLayer {
    /// Tracks the section from `"start end"` to `"end start"`.
    pub fn new(choreography: Choreography, spring: SpringConfig) -> Self {
        Self {
            sampler: ProgressSampler::default(),
            spring: Spring::new(spring, 0.0),
            choreography,
            smoothed: 0.0,
        }
    }

    pub fn progress(&self) -> f64 {
        self.sampler.last()
    }

    pub fn smoothed(&self) -> f64 {
        self.smoothed
    }

    pub fn style(&self) -> LayerStyle {
        self.choreography.evaluate(self.smoothed)
    }

    /// Move the spring target; the style follows on later ticks.
    pub fn scroll(&mut self, geometry: &SectionGeometry) -> f64 {
        let progress = self.sampler.sample(geometry);
        self.spring.set_target(progress);
        progress
    }

    /// Jump to the progress for `geometry` without animating.
    pub fn settle(&mut self, geometry: &SectionGeometry) -> LayerStyle {
        let progress = self.sampler.sample(geometry);
        self.spring.reset(progress);
        self.smoothed = progress;
        self.style()
    }

    pub fn tick(&mut self, dt: Duration) -> LayerStyle {
        self.smoothed = self.spring.tick(dt);
        self.style()
    }
}
