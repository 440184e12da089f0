use std::cell::{Cell, RefCell};
use std::rc::Rc;
use std::time::{Duration, Instant};

use spin_sleep::SpinSleeper;

use super::timer::{TimerHost, TimerId};

/// Millisecond time source.
pub trait Clock {
    fn now(&self) -> f64;
}

/// Clock that only moves when told to. Clones share the same time.
#[derive(Debug, Clone, Default)]
pub struct ManualClock {
    now: Rc<Cell<f64>>,
}

impl ManualClock {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&self, now: f64) {
        self.now.set(now);
    }

    pub fn advance(&self, ms: f64) {
        self.now.set(self.now.get() + ms);
    }
}

impl Clock for ManualClock {
    fn now(&self) -> f64 {
        self.now.get()
    }
}

/// Wall clock measured from its creation.
#[derive(Debug, Clone, Copy)]
pub struct SystemClock {
    origin: Instant,
}

impl SystemClock {
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
        }
    }
}

impl Default for SystemClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for SystemClock {
    fn now(&self) -> f64 {
        self.origin.elapsed().as_secs_f64() * 1000.0
    }
}

struct Timer {
    id: TimerId,
    deadline: f64,
    callback: Box<dyn FnOnce()>,
}

#[derive(Default)]
struct TimerQueueInner {
    next_id: u64,
    timers: Vec<Timer>,
}

/// Cooperative one-shot timers for native hosts.
///
/// Nothing runs on its own: the host calls [`TimerQueue::run_due`] from its
/// event loop. Clones share the same queue.
#[derive(Clone)]
pub struct TimerQueue<C: Clock> {
    clock: C,
    inner: Rc<RefCell<TimerQueueInner>>,
}

impl<C: Clock> TimerQueue<C> {
    pub fn new(clock: C) -> Self {
        Self {
            clock,
            inner: Rc::new(RefCell::new(TimerQueueInner::default())),
        }
    }

    pub fn clock(&self) -> &C {
        &self.clock
    }

    /// Earliest deadline among armed timers.
    pub fn next_deadline(&self) -> Option<f64> {
        self.inner
            .borrow()
            .timers
            .iter()
            .map(|t| t.deadline)
            .min_by(f64::total_cmp)
    }

    pub fn len(&self) -> usize {
        self.inner.borrow().timers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Run every timer whose deadline has passed, earliest first.
    /// Timers armed by those callbacks wait for the next call, even when already due.
    pub fn run_due(&self) -> usize {
        let now = self.clock.now();
        let mut due: Vec<Timer> = {
            let mut inner = self.inner.borrow_mut();
            let (due, rest): (Vec<Timer>, Vec<Timer>) = std::mem::take(&mut inner.timers)
                .into_iter()
                .partition(|t| t.deadline <= now);
            inner.timers = rest;
            due
        };
        due.sort_by(|a, b| a.deadline.total_cmp(&b.deadline).then(a.id.cmp(&b.id)));

        let count = due.len();
        for timer in due {
            (timer.callback)();
        }
        count
    }
}

impl TimerQueue<SystemClock> {
    /// Sleep until the next deadline, then run what is due.
    /// Returns immediately with 0 when no timer is armed.
    pub fn run_blocking(&self) -> usize {
        let Some(deadline) = self.next_deadline() else {
            return 0;
        };
        // Spins out the tail of the wait to land on the deadline.
        let sleeper = SpinSleeper::default();
        loop {
            let wait = deadline - self.clock.now();
            if wait <= 0.0 {
                break;
            }
            sleeper.sleep(Duration::from_secs_f64(wait / 1000.0));
        }
        self.run_due()
    }
}

impl<C: Clock> TimerHost for TimerQueue<C> {
    fn now(&self) -> f64 {
        self.clock.now()
    }

    fn set_timeout(&self, callback: Box<dyn FnOnce()>, delay_ms: f64) -> TimerId {
        let deadline = self.clock.now() + delay_ms.max(0.0);
        let mut inner = self.inner.borrow_mut();
        inner.next_id += 1;
        let id = TimerId(inner.next_id);
        inner.timers.push(Timer {
            id,
            deadline,
            callback,
        });
        id
    }

    fn clear_timeout(&self, id: TimerId) {
        self.inner.borrow_mut().timers.retain(|t| t.id != id);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn log_into(log: &Rc<RefCell<Vec<&'static str>>>, name: &'static str) -> Box<dyn FnOnce()> {
        let log = Rc::clone(log);
        Box::new(move || log.borrow_mut().push(name))
    }

    #[test]
    fn runs_due_timers_in_deadline_order() {
        let clock = ManualClock::new();
        let timers = TimerQueue::new(clock.clone());
        let log = Rc::new(RefCell::new(Vec::new()));

        timers.set_timeout(log_into(&log, "late"), 30.0);
        timers.set_timeout(log_into(&log, "early"), 10.0);
        timers.set_timeout(log_into(&log, "early-2"), 10.0);
        timers.set_timeout(log_into(&log, "future"), 100.0);

        clock.advance(50.0);
        assert_eq!(timers.run_due(), 3);
        assert_eq!(*log.borrow(), vec!["early", "early-2", "late"]);
        assert_eq!(timers.next_deadline(), Some(100.0));
    }

    #[test]
    fn zero_delay_timer_armed_while_running_waits() {
        let clock = ManualClock::new();
        let timers = TimerQueue::new(clock.clone());
        let log = Rc::new(RefCell::new(Vec::new()));

        let t = timers.clone();
        let l = Rc::clone(&log);
        timers.set_timeout(
            Box::new(move || {
                l.borrow_mut().push("outer");
                t.set_timeout(log_into(&l, "inner"), 0.0);
            }),
            0.0,
        );

        assert_eq!(timers.run_due(), 1);
        assert_eq!(timers.len(), 1);
        assert_eq!(timers.run_due(), 1);
        assert_eq!(*log.borrow(), vec!["outer", "inner"]);
    }

    #[test]
    fn clear_timeout_disarms() {
        let timers = TimerQueue::new(ManualClock::new());
        let id = timers.set_timeout(Box::new(|| panic!("cleared timer ran")), 0.0);
        timers.clear_timeout(id);
        assert_eq!(timers.run_due(), 0);
    }

    #[test]
    fn run_blocking_sleeps_until_deadline() {
        let timers = TimerQueue::new(SystemClock::new());
        assert_eq!(timers.run_blocking(), 0);

        timers.set_timeout(Box::new(|| {}), 5.0);
        assert_eq!(timers.run_blocking(), 1);
        assert!(timers.clock().now() >= 5.0);
    }
}
