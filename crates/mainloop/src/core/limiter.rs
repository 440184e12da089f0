/// Minimum spacing between accepted frames, derived from a maximum frame rate.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct FrameRateCap {
    /// Milliseconds that must pass between accepted frames. Zero means uncapped.
    min_frame_delay: f64,
}

impl FrameRateCap {
    pub const UNCAPPED: Self = Self {
        min_frame_delay: 0.0,
    };

    /// Cap at `fps` frames per second. Infinity is the same as uncapped.
    pub fn from_fps(fps: f64) -> Self {
        Self {
            min_frame_delay: 1000.0 / fps,
        }
    }

    /// Whether a frame at `timestamp` may run after one accepted at `last_frame_time`.
    pub fn admits(&self, timestamp: f64, last_frame_time: f64) -> bool {
        timestamp >= last_frame_time + self.min_frame_delay
    }

    pub fn min_frame_delay(&self) -> f64 {
        self.min_frame_delay
    }

    /// The frame rate this cap allows. `f64::INFINITY` when uncapped.
    pub fn max_fps(&self) -> f64 {
        1000.0 / self.min_frame_delay
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn uncapped_admits_everything_and_reports_infinity() {
        let cap = FrameRateCap::UNCAPPED;
        assert!(cap.admits(10.0, 10.0));
        assert_eq!(cap.max_fps(), f64::INFINITY);
        assert_eq!(FrameRateCap::from_fps(f64::INFINITY), FrameRateCap::UNCAPPED);
    }

    #[test]
    fn rejects_frames_inside_min_delay() {
        let cap = FrameRateCap::from_fps(50.0);
        assert_eq!(cap.min_frame_delay(), 20.0);
        assert!(!cap.admits(119.9, 100.0));
        assert!(cap.admits(120.0, 100.0));
        assert_eq!(cap.max_fps(), 50.0);
    }
}
