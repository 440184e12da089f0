use std::cell::RefCell;
use std::rc::Rc;

use super::{FrameCallback, FrameHandle, FrameScheduler};

/// Host-pumped frame scheduler.
///
/// The host calls [`FrameQueue::fire`] once per display refresh (or redraw
/// event) with the current timestamp. Callbacks requested while firing wait
/// for the next `fire`. Clones share the same queue.
#[derive(Clone, Default)]
pub struct FrameQueue {
    inner: Rc<RefCell<FrameQueueInner>>,
}

#[derive(Default)]
struct FrameQueueInner {
    next_id: u64,
    pending: Vec<(FrameHandle, FrameCallback)>,
}

impl FrameQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Run every callback pending at call time with `timestamp`.
    /// Returns how many ran.
    pub fn fire(&self, timestamp: f64) -> usize {
        let batch = std::mem::take(&mut self.inner.borrow_mut().pending);
        let count = batch.len();
        for (_, callback) in batch {
            callback(timestamp);
        }
        count
    }

    /// Number of callbacks waiting for the next `fire`.
    pub fn pending(&self) -> usize {
        self.inner.borrow().pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending() == 0
    }
}

impl FrameScheduler for FrameQueue {
    fn request_frame(&self, callback: FrameCallback) -> FrameHandle {
        let mut inner = self.inner.borrow_mut();
        inner.next_id += 1;
        let handle = FrameHandle(inner.next_id);
        inner.pending.push((handle, callback));
        handle
    }

    fn cancel_frame(&self, handle: FrameHandle) {
        self.inner.borrow_mut().pending.retain(|(h, _)| *h != handle);
    }
}
