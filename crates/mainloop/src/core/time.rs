use crate::api::config::{DEFAULT_MAX_UPDATE_STEPS, DEFAULT_TIMESTEP_MS};

/// Fixed timestep accumulator.
/// Converts irregular frame deltas into zero or more fixed-size simulation steps.
#[derive(Debug, Clone)]
pub struct FixedTimestep {
    /// The fixed step size in milliseconds.
    dt: f64,
    /// Unsimulated time carried between frames. Never negative.
    accumulator: f64,
    /// Steps drained by the current frame.
    steps_this_frame: u32,
    /// Steps one frame may drain before giving up.
    max_steps: u32,
    /// Set when the step budget ran out; cleared explicitly at end of frame.
    panic: bool,
}

impl FixedTimestep {
    pub fn new(dt: f64) -> Self {
        Self::with_step_budget(dt, DEFAULT_MAX_UPDATE_STEPS)
    }

    pub fn with_step_budget(dt: f64, max_steps: u32) -> Self {
        Self {
            dt,
            accumulator: 0.0,
            steps_this_frame: 0,
            max_steps: max_steps.max(1),
            panic: false,
        }
    }

    /// Add elapsed frame time and open a new drain for this frame.
    pub fn accumulate(&mut self, frame_dt: f64) {
        self.accumulator += frame_dt;
        self.steps_this_frame = 0;
        self.panic = false;
    }

    /// The step size to simulate next, if a whole step is pending and the
    /// budget allows. Nothing is consumed until [`consume`](Self::consume).
    pub fn due_step(&self) -> Option<f64> {
        if self.panic || self.accumulator < self.dt {
            return None;
        }
        Some(self.dt)
    }

    /// Retire one simulated step. Clamps at zero in case the pending time
    /// was discarded while the step ran.
    ///
    /// The step that exhausts the budget still counts; the panic flag is
    /// raised with it and no further steps are handed out this frame.
    pub fn consume(&mut self) {
        self.accumulator = (self.accumulator - self.dt).max(0.0);
        self.steps_this_frame += 1;
        if self.steps_this_frame >= self.max_steps {
            self.panic = true;
        }
    }

    /// Interpolation alpha for rendering between steps.
    /// In [0, 1) unless the frame panicked with time left over.
    pub fn alpha(&self) -> f64 {
        self.accumulator / self.dt
    }

    /// Discard all pending time. Returns what was discarded.
    pub fn reset(&mut self) -> f64 {
        std::mem::take(&mut self.accumulator)
    }

    pub fn panicked(&self) -> bool {
        self.panic
    }

    pub fn clear_panic(&mut self) {
        self.panic = false;
    }

    /// The fixed step size in milliseconds.
    pub fn dt(&self) -> f64 {
        self.dt
    }

    /// Replace the step size. Takes effect on the next step handed out.
    pub fn set_dt(&mut self, dt: f64) {
        self.dt = dt;
    }

    /// Pending, unsimulated time in milliseconds.
    pub fn pending(&self) -> f64 {
        self.accumulator
    }

    pub fn steps_this_frame(&self) -> u32 {
        self.steps_this_frame
    }
}

impl Default for FixedTimestep {
    fn default() -> Self {
        Self::new(DEFAULT_TIMESTEP_MS)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn drain(ts: &mut FixedTimestep) -> u32 {
        let mut steps = 0;
        while ts.due_step().is_some() {
            ts.consume();
            steps += 1;
        }
        steps
    }

    #[test]
    fn one_step_exact() {
        let mut ts = FixedTimestep::new(16.0);
        ts.accumulate(16.0);
        assert_eq!(drain(&mut ts), 1);
        assert_eq!(ts.pending(), 0.0);
    }

    #[test]
    fn accumulates_partial() {
        let mut ts = FixedTimestep::new(16.0);
        ts.accumulate(8.0); // half a step
        assert_eq!(drain(&mut ts), 0);
        ts.accumulate(10.0); // over one step total
        assert_eq!(drain(&mut ts), 1);
        assert_eq!(ts.pending(), 2.0);
    }

    #[test]
    fn alpha_is_remaining_fraction() {
        let mut ts = FixedTimestep::new(16.0);
        ts.accumulate(50.0);
        assert_eq!(drain(&mut ts), 3);
        assert_eq!(ts.alpha(), 0.125);
    }

    #[test]
    fn budget_raises_panic_and_stops_draining() {
        let mut ts = FixedTimestep::with_step_budget(10.0, 240);
        ts.accumulate(241.0 * 10.0);
        assert_eq!(drain(&mut ts), 240);
        assert!(ts.panicked());
        assert_eq!(ts.pending(), 10.0);
        assert!(ts.alpha() >= 1.0);

        ts.clear_panic();
        ts.accumulate(0.0);
        assert_eq!(drain(&mut ts), 1);
        assert!(!ts.panicked());
    }

    #[test]
    fn exhausting_budget_exactly_still_panics() {
        let mut ts = FixedTimestep::with_step_budget(1.0, 4);
        ts.accumulate(4.0);
        assert_eq!(drain(&mut ts), 4);
        assert!(ts.panicked());
        assert_eq!(ts.pending(), 0.0);
    }

    #[test]
    fn due_step_does_not_consume() {
        let mut ts = FixedTimestep::new(10.0);
        ts.accumulate(25.0);
        assert_eq!(ts.due_step(), Some(10.0));
        assert_eq!(ts.pending(), 25.0);
        ts.consume();
        assert_eq!(ts.pending(), 15.0);
    }

    #[test]
    fn consume_after_reset_clamps_at_zero() {
        let mut ts = FixedTimestep::new(10.0);
        ts.accumulate(25.0);
        assert!(ts.due_step().is_some());
        ts.reset();
        ts.consume();
        assert_eq!(ts.pending(), 0.0);
        assert_eq!(ts.due_step(), None);
    }

    #[test]
    fn reset_returns_discarded_time() {
        let mut ts = FixedTimestep::new(16.0);
        ts.accumulate(40.0);
        assert_eq!(ts.reset(), 40.0);
        assert_eq!(ts.pending(), 0.0);
        assert_eq!(drain(&mut ts), 0);
    }
}
