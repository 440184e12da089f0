use mainloop::{TimerHost, TimerId};
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{Performance, Window};

/// `setTimeout` / `clearTimeout` on the window, with `performance.now()` as
/// the clock (falling back to `Date.now()` when the Performance API is absent).
#[derive(Clone)]
pub struct WindowTimers {
    window: Window,
    performance: Option<Performance>,
}

impl WindowTimers {
    pub fn new(window: Window) -> Self {
        let performance = window.performance();
        Self {
            window,
            performance,
        }
    }
}

impl TimerHost for WindowTimers {
    fn now(&self) -> f64 {
        match &self.performance {
            Some(performance) => performance.now(),
            None => js_sys::Date::now(),
        }
    }

    fn set_timeout(&self, callback: Box<dyn FnOnce()>, delay_ms: f64) -> TimerId {
        let js = Closure::once_into_js(move || callback());
        // setTimeout truncates to whole milliseconds; round up so frames are never early.
        let delay = delay_ms.max(0.0).ceil() as i32;
        match self
            .window
            .set_timeout_with_callback_and_timeout_and_arguments_0(js.unchecked_ref(), delay)
        {
            Ok(id) => TimerId(u64::from(id as u32)),
            Err(err) => {
                log::error!("setTimeout failed: {err:?}");
                TimerId(0)
            }
        }
    }

    fn clear_timeout(&self, id: TimerId) {
        self.window.clear_timeout_with_handle(id.0 as i32);
    }
}
