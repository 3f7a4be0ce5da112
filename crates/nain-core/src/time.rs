//! Frame timing for the animation loop.

use std::fmt;

/// A non-negative span of time in fractional seconds.
#[derive(Debug, Clone, Copy, Default, PartialEq, PartialOrd)]
pub struct Duration(f64);

impl Duration {
    pub const ZERO: Duration = Duration(0.0);

    /// Negative and NaN inputs clamp to zero.
    pub fn from_seconds(seconds: f64) -> Self {
        if seconds > 0.0 {
            Duration(seconds)
        } else {
            Duration::ZERO
        }
    }

    pub fn from_millis(ms: f64) -> Self {
        Self::from_seconds(ms / 1000.0)
    }

    pub fn as_seconds(self) -> f64 {
        self.0
    }

    pub fn as_millis(self) -> f64 {
        self.0 * 1000.0
    }

    pub fn is_zero(self) -> bool {
        self.0 == 0.0
    }
}

impl fmt::Display for Duration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0 < 1.0 {
            write!(f, "{:.1}ms", self.as_millis())
        } else {
            write!(f, "{:.3}s", self.0)
        }
    }
}

/// Turns the monotonic millisecond timestamps handed out by an animation
/// scheduler (e.g. `requestAnimationFrame`) into per-tick deltas.
#[derive(Debug, Clone, Default)]
pub struct FrameClock {
    last_ms: Option<f64>,
}

impl FrameClock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Elapsed time since the previous tick. The first tick after construction
    /// or [`FrameClock::reset`] reports zero.
    pub fn tick(&mut self, now_ms: f64) -> Duration {
        let delta = self
            .last_ms
            .map_or(Duration::ZERO, |last| Duration::from_millis(now_ms - last));
        self.last_ms = Some(now_ms);
        delta
    }

    pub fn reset(&mut self) {
        self.last_ms = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clamps_to_zero() {
        assert!(Duration::from_seconds(-1.0).is_zero());
        assert!(Duration::from_seconds(f64::NAN).is_zero());
        assert_eq!(Duration::from_millis(250.0).as_seconds(), 0.25);
    }

    #[test]
    fn test_display() {
        assert_eq!(Duration::from_millis(16.0).to_string(), "16.0ms");
        assert_eq!(Duration::from_seconds(1.25).to_string(), "1.250s");
    }

    #[test]
    fn test_frame_clock_deltas() {
        let mut clock = FrameClock::new();
        assert!(clock.tick(1000.0).is_zero());
        assert!((clock.tick(1016.0).as_millis() - 16.0).abs() < 1e-9);
        assert!(clock.tick(1010.0).is_zero());
        clock.reset();
        assert!(clock.tick(5000.0).is_zero());
    }
}
