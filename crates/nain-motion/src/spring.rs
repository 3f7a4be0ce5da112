//! Damped-spring smoothing of a scalar signal.
//!
//! The spring follows a *target* that the caller moves whenever the raw input
//! changes; its *position* only advances on [`Spring::tick`], which is driven
//! by the display's frame clock.

use nain_core::{Duration, SpringSettings};
use serde::{Deserialize, Serialize};

/// Longest stretch of time a single tick integrates. Anything longer (a
/// backgrounded tab, a debugger pause) is treated as this much.
pub const MAX_TICK: f64 = 0.040;

/// Fixed integration sub-step.
const SUBSTEP: f64 = 0.001;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SpringConfig {
    pub stiffness: f64,
    pub damping: f64,
    pub mass: f64,
    /// Distance from the target below which the spring may come to rest.
    pub rest_delta: f64,
    /// Speed below which the spring may come to rest.
    pub rest_speed: f64,
}

impl Default for SpringConfig {
    fn default() -> Self {
        SpringSettings::default().into()
    }
}

impl From<SpringSettings> for SpringConfig {
    fn from(s: SpringSettings) -> Self {
        Self {
            stiffness: s.stiffness,
            damping: s.damping,
            mass: s.mass,
            rest_delta: s.rest_delta,
            rest_speed: s.rest_speed,
        }
    }
}

impl SpringConfig {
    /// ζ = c / (2·√(k·m)). Above 1 the spring never overshoots.
    pub fn damping_ratio(&self) -> f64 {
        self.damping / (2.0 * (self.stiffness * self.mass).sqrt())
    }
}

#[derive(Debug, Clone)]
pub struct Spring {
    config: SpringConfig,
    position: f64,
    velocity: f64,
    target: f64,
    at_rest: bool,
}

impl Spring {
    pub fn new(config: SpringConfig, initial: f64) -> Self {
        Self {
            config,
            position: initial,
            velocity: 0.0,
            target: initial,
            at_rest: true,
        }
    }

    pub fn config(&self) -> &SpringConfig {
        &self.config
    }

    pub fn position(&self) -> f64 {
        self.position
    }

    pub fn velocity(&self) -> f64 {
        self.velocity
    }

    pub fn target(&self) -> f64 {
        self.target
    }

    pub fn is_at_rest(&self) -> bool {
        self.at_rest
    }

    /// Move the point the spring is pulled towards. The output is untouched
    /// until the next tick.
    pub fn set_target(&mut self, target: f64) {
        if target.is_nan() || target == self.target {
            return;
        }
        self.target = target;
        self.at_rest = false;
    }

    /// Jump straight to `value` with zero velocity.
    pub fn reset(&mut self, value: f64) {
        self.position = value;
        self.target = value;
        self.velocity = 0.0;
        self.at_rest = true;
    }

    /// Advance the simulation by `dt` and return the new position.
    pub fn tick(&mut self, dt: Duration) -> f64 {
        if self.at_rest {
            return self.position;
        }

        let SpringConfig {
            stiffness,
            damping,
            mass,
            ..
        } = self.config;

        let mut remaining = dt.as_seconds().min(MAX_TICK);
        while remaining > 0.0 {
            let h = remaining.min(SUBSTEP);
            // F = -kx - cv, integrated semi-implicitly.
            let displacement = self.position - self.target;
            let acceleration = (-stiffness * displacement - damping * self.velocity) / mass;
            self.velocity += acceleration * h;
            self.position += self.velocity * h;
            remaining -= h;
        }

        if (self.position - self.target).abs() < self.config.rest_delta
            && self.velocity.abs() < self.config.rest_speed
        {
            self.position = self.target;
            self.velocity = 0.0;
            self.at_rest = true;
        }

        self.position
    }
}
