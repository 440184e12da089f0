use mainloop::{FrameCallback, FrameHandle, FrameScheduler};
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::Window;

/// Frame scheduler backed by `window.requestAnimationFrame`.
///
/// Timestamps are the browser's `DOMHighResTimeStamp` for the frame, in
/// milliseconds since page load.
pub struct AnimationFrameScheduler {
    window: Window,
}

impl AnimationFrameScheduler {
    pub fn new(window: Window) -> Self {
        Self { window }
    }
}

impl FrameScheduler for AnimationFrameScheduler {
    fn request_frame(&self, callback: FrameCallback) -> FrameHandle {
        // Freed by wasm-bindgen once it runs. A cancelled frame leaks its closure,
        // which only happens on stop.
        let js = Closure::once_into_js(move |timestamp: f64| callback(timestamp));
        match self.window.request_animation_frame(js.unchecked_ref()) {
            Ok(id) => FrameHandle(u64::from(id as u32)),
            Err(err) => {
                log::error!("requestAnimationFrame failed: {err:?}");
                FrameHandle(0)
            }
        }
    }

    fn cancel_frame(&self, handle: FrameHandle) {
        if let Err(err) = self.window.cancel_animation_frame(handle.0 as i32) {
            log::error!("cancelAnimationFrame failed: {err:?}");
        }
    }
}
