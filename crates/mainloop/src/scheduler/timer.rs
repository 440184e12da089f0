use std::cell::Cell;

use super::{FrameCallback, FrameHandle, FrameScheduler};
use crate::api::config::DEFAULT_TIMESTEP_MS;

/// Identifier of a one-shot timer armed through a [`TimerHost`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TimerId(pub u64);

/// Ordinary one-shot software timers plus a millisecond clock.
pub trait TimerHost {
    /// Current time in milliseconds.
    fn now(&self) -> f64;

    /// Run `callback` once after `delay_ms`.
    fn set_timeout(&self, callback: Box<dyn FnOnce()>, delay_ms: f64) -> TimerId;

    fn clear_timeout(&self, id: TimerId);
}

/// Frame scheduler for hosts without a display-refresh primitive.
///
/// Paces itself to one frame per simulation step: each request waits out
/// whatever remains of the interval since the previous frame, then fires with
/// the timestamp it was aimed at.
pub struct TimerFallback<H: TimerHost> {
    host: H,
    interval: Cell<f64>,
    last_timestamp: Cell<f64>,
}

impl<H: TimerHost> TimerFallback<H> {
    pub fn new(host: H) -> Self {
        let now = host.now();
        Self {
            host,
            interval: Cell::new(DEFAULT_TIMESTEP_MS),
            last_timestamp: Cell::new(now),
        }
    }

    pub fn host(&self) -> &H {
        &self.host
    }

    /// Frame pacing interval in milliseconds.
    pub fn interval(&self) -> f64 {
        self.interval.get()
    }
}

impl<H: TimerHost> FrameScheduler for TimerFallback<H> {
    fn request_frame(&self, callback: FrameCallback) -> FrameHandle {
        let now = self.host.now();
        let timeout = (self.interval.get() - (now - self.last_timestamp.get())).max(0.0);
        let target = now + timeout;
        self.last_timestamp.set(target);

        let id = self
            .host
            .set_timeout(Box::new(move || callback(target)), timeout);
        FrameHandle(id.0)
    }

    fn cancel_frame(&self, handle: FrameHandle) {
        self.host.clear_timeout(TimerId(handle.0));
    }

    fn set_frame_interval(&self, interval_ms: f64) {
        self.interval.set(interval_ms);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scheduler::timer_queue::{ManualClock, TimerQueue};
    use std::rc::Rc;

    fn recorder() -> (Rc<Cell<Option<f64>>>, FrameCallback) {
        let seen = Rc::new(Cell::new(None));
        let s = Rc::clone(&seen);
        (seen, Box::new(move |t| s.set(Some(t))))
    }

    #[test]
    fn first_frame_waits_a_full_interval() {
        let clock = ManualClock::new();
        let timers = TimerQueue::new(clock.clone());
        let fallback = TimerFallback::new(timers.clone());
        fallback.set_frame_interval(16.0);

        let (seen, cb) = recorder();
        fallback.request_frame(cb);
        assert_eq!(timers.next_deadline(), Some(16.0));

        clock.set(15.0);
        assert_eq!(timers.run_due(), 0);
        clock.set(16.0);
        assert_eq!(timers.run_due(), 1);
        assert_eq!(seen.get(), Some(16.0));
    }

    #[test]
    fn late_request_shortens_the_wait() {
        let clock = ManualClock::new();
        let timers = TimerQueue::new(clock.clone());
        let fallback = TimerFallback::new(timers.clone());
        fallback.set_frame_interval(16.0);

        let (_, cb) = recorder();
        fallback.request_frame(cb);
        clock.set(20.0);
        timers.run_due();

        // 4ms of the next interval already elapsed since the 16ms target.
        let (seen, cb) = recorder();
        fallback.request_frame(cb);
        assert_eq!(timers.next_deadline(), Some(32.0));
        clock.set(32.0);
        timers.run_due();
        assert_eq!(seen.get(), Some(32.0));
    }

    #[test]
    fn overdue_request_fires_immediately_at_now() {
        let clock = ManualClock::new();
        let timers = TimerQueue::new(clock.clone());
        let fallback = TimerFallback::new(timers.clone());
        fallback.set_frame_interval(10.0);

        clock.set(100.0);
        let (seen, cb) = recorder();
        fallback.request_frame(cb);
        assert_eq!(timers.next_deadline(), Some(100.0));
        timers.run_due();
        assert_eq!(seen.get(), Some(100.0));
    }

    #[test]
    fn cancel_clears_the_timer() {
        let clock = ManualClock::new();
        let timers = TimerQueue::new(clock.clone());
        let fallback = TimerFallback::new(timers.clone());

        let handle = fallback.request_frame(Box::new(|_: f64| panic!("cancelled frame ran")));
        fallback.cancel_frame(handle);
        clock.set(1000.0);
        assert_eq!(timers.run_due(), 0);
        assert!(timers.is_empty());
    }
}
