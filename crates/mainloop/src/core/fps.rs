//! Windowed frame-rate estimator.

/// Smooths the instantaneous frame rate into a displayable FPS value.
///
/// Once per window the estimate becomes
/// `frames * 1000 / window + (1 - alpha) * previous`.
/// Only the carried-over term is weighted; the fresh sample enters at full
/// strength, so a steady rate settles at `rate / alpha` rather than `rate`.
#[derive(Debug, Clone)]
pub struct FpsEstimator {
    fps: f64,
    alpha: f64,
    update_interval: f64,
    last_update: f64,
    frames_since_update: u32,
}

impl FpsEstimator {
    pub fn new(initial_fps: f64, alpha: f64, update_interval: f64) -> Self {
        Self {
            fps: initial_fps,
            alpha,
            update_interval,
            last_update: 0.0,
            frames_since_update: 0,
        }
    }

    /// Start a fresh window at `timestamp`, keeping the current estimate.
    pub fn restart_window(&mut self, timestamp: f64) {
        self.last_update = timestamp;
        self.frames_since_update = 0;
    }

    /// Count one frame at `timestamp`, closing the window first if it has elapsed.
    /// Returns true when the estimate was recomputed.
    pub fn record_frame(&mut self, timestamp: f64) -> bool {
        let mut recomputed = false;
        if timestamp > self.last_update + self.update_interval {
            let window = timestamp - self.last_update;
            self.fps = f64::from(self.frames_since_update) * 1000.0 / window
                + (1.0 - self.alpha) * self.fps;
            self.last_update = timestamp;
            self.frames_since_update = 0;
            recomputed = true;
        }
        self.frames_since_update += 1;
        recomputed
    }

    pub fn fps(&self) -> f64 {
        self.fps
    }

    pub fn frames_in_window(&self) -> u32 {
        self.frames_since_update
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn holds_initial_estimate_inside_window() {
        let mut est = FpsEstimator::new(60.0, 0.9, 1000.0);
        est.restart_window(0.0);
        for i in 1..=10 {
            assert!(!est.record_frame(f64::from(i) * 100.0));
        }
        assert_eq!(est.fps(), 60.0);
        assert_eq!(est.frames_in_window(), 10);
    }

    #[test]
    fn window_close_applies_weighted_formula() {
        let mut est = FpsEstimator::new(60.0, 0.9, 1000.0);
        est.restart_window(0.0);
        for i in 1..=10 {
            est.record_frame(f64::from(i) * 100.0);
        }
        assert!(est.record_frame(1100.0));

        let expected = 10.0 * 1000.0 / 1100.0 + 0.1 * 60.0;
        assert!((est.fps() - expected).abs() < 1e-9, "fps was {}", est.fps());
        // The closing frame opens the next window.
        assert_eq!(est.frames_in_window(), 1);
    }

    #[test]
    fn boundary_timestamp_does_not_close_window() {
        let mut est = FpsEstimator::new(30.0, 0.5, 500.0);
        est.restart_window(200.0);
        assert!(!est.record_frame(700.0));
        assert!(est.record_frame(700.5));
    }

    #[test]
    fn steady_rate_settles_above_sample_rate() {
        let mut est = FpsEstimator::new(0.0, 0.5, 1000.0);
        est.restart_window(0.0);
        let mut t = 0.0;
        for _ in 0..2000 {
            t += 10.0;
            est.record_frame(t);
        }
        // Each window holds ~100 frames over ~1010ms; fixed point is sample / alpha.
        assert!(est.fps() > 190.0 && est.fps() < 200.0, "fps was {}", est.fps());
    }
}
