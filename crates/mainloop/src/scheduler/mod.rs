//! Scheduler adapters: the loop's only source of time.
//!
//! A [`FrameScheduler`] runs a callback once, asynchronously, before the next
//! rendering opportunity, passing a timestamp in milliseconds. The loop re-arms
//! it every frame, so adapters are never self-repeating.

pub mod frame_queue;
pub mod timer;
pub mod timer_queue;

pub use frame_queue::FrameQueue;
pub use timer::{TimerFallback, TimerHost, TimerId};
pub use timer_queue::{Clock, ManualClock, SystemClock, TimerQueue};

/// One-shot frame callback, receiving the frame timestamp in milliseconds.
pub type FrameCallback = Box<dyn FnOnce(f64)>;

/// Opaque handle to a requested frame, used to cancel it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FrameHandle(pub u64);

/// Host frame-scheduling primitive (e.g. a per-display-refresh callback).
pub trait FrameScheduler {
    /// Run `callback` exactly once, later, with a timestamp at or after now.
    /// Must never invoke the callback synchronously from inside this call.
    fn request_frame(&self, callback: FrameCallback) -> FrameHandle;

    /// Cancel a pending request. Unknown or already-fired handles are ignored.
    fn cancel_frame(&self, handle: FrameHandle);

    /// Hint of the simulation step length, for adapters that pace themselves.
    fn set_frame_interval(&self, _interval_ms: f64) {}
}

impl<S: FrameScheduler + ?Sized> FrameScheduler for Box<S> {
    fn request_frame(&self, callback: FrameCallback) -> FrameHandle {
        (**self).request_frame(callback)
    }

    fn cancel_frame(&self, handle: FrameHandle) {
        (**self).cancel_frame(handle)
    }

    fn set_frame_interval(&self, interval_ms: f64) {
        (**self).set_frame_interval(interval_ms)
    }
}
