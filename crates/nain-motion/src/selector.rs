/// Projects a progress value onto a discrete frame index and remembers the
/// last index handed out, so callers only redraw on actual changes.
#[derive(Debug, Clone)]
pub struct FrameSelector {
    count: usize,
    current: usize,
}

impl FrameSelector {
    /// A selector over `count` frames, starting at frame 0. A count of zero
    /// is treated as a single frame.
    pub fn new(count: usize) -> Self {
        Self {
            count: count.max(1),
            current: 0,
        }
    }

    pub fn count(&self) -> usize {
        self.count
    }

    /// Index of the frame last returned by [`FrameSelector::select`].
    pub fn current(&self) -> usize {
        self.current
    }

    /// `round(clamp(progress, 0, 1) * (count - 1))`.
    pub fn index_for(&self, progress: f64) -> usize {
        let p = if progress.is_nan() {
            0.0
        } else {
            progress.clamp(0.0, 1.0)
        };
        let last = self.count - 1;
        ((p * last as f64).round() as usize).min(last)
    }

    /// Select the frame for `progress`. Returns the new index only when it
    /// differs from the current one.
    pub fn select(&mut self, progress: f64) -> Option<usize> {
        let index = self.index_for(progress);
        if index == self.current {
            return None;
        }
        self.current = index;
        Some(index)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_index_projection() {
        let s = FrameSelector::new(51);
        assert_eq!(s.index_for(0.0), 0);
        assert_eq!(s.index_for(1.0), 50);
        assert_eq!(s.index_for(0.5), 25);
        // 0.01 * 50 = 0.5 rounds away from zero.
        assert_eq!(s.index_for(0.01), 1);
        assert_eq!(s.index_for(0.0099), 0);
        assert_eq!(s.index_for(-0.3), 0);
        assert_eq!(s.index_for(1.7), 50);
        assert_eq!(s.index_for(f64::NAN), 0);
    }

    #[test]
    fn test_monotonic_in_progress() {
        let s = FrameSelector::new(51);
        let mut prev = 0;
        for step in 0..=10_000 {
            let idx = s.index_for(step as f64 / 10_000.0);
            assert!(idx >= prev);
            prev = idx;
        }
        assert_eq!(prev, 50);
    }

    #[test]
    fn test_select_coalesces_repeats() {
        let mut s = FrameSelector::new(51);
        assert_eq!(s.select(0.001), None);
        assert_eq!(s.select(0.02), Some(1));
        assert_eq!(s.select(0.021), None);
        assert_eq!(s.select(0.04), Some(2));
        assert_eq!(s.current(), 2);
        assert_eq!(s.select(0.0), Some(0));
    }

    #[test]
    fn test_single_frame() {
        let mut s = FrameSelector::new(0);
        assert_eq!(s.count(), 1);
        assert_eq!(s.index_for(0.7), 0);
        assert_eq!(s.select(1.0), None);
    }
}
