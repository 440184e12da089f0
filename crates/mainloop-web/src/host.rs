use mainloop::{FrameScheduler, TimerFallback};
use wasm_bindgen::JsValue;

use crate::raf::AnimationFrameScheduler;
use crate::timers::WindowTimers;

/// Pick the browser's frame scheduler once, at construction.
///
/// Uses `requestAnimationFrame` when the window has it and paces frames with
/// `setTimeout` otherwise. Returns `None` outside a window context.
pub fn detect_scheduler() -> Option<Box<dyn FrameScheduler>> {
    let window = web_sys::window()?;
    let has_raf = js_sys::Reflect::has(&window, &JsValue::from_str("requestAnimationFrame"))
        .unwrap_or(false);

    if has_raf {
        log::debug!("frame scheduler: requestAnimationFrame");
        Some(Box::new(AnimationFrameScheduler::new(window)))
    } else {
        log::info!("requestAnimationFrame unavailable; pacing frames with setTimeout");
        Some(Box::new(TimerFallback::new(WindowTimers::new(window))))
    }
}

/// Route `log` to the browser console and panics to `console.error`.
/// Safe to call more than once.
pub fn init_logging(level: log::Level) {
    console_error_panic_hook::set_once();
    let _ = console_log::init_with_level(level);
}
