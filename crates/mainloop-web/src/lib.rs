pub mod host;
pub mod raf;
pub mod timers;

pub use host::{detect_scheduler, init_logging};
pub use raf::AnimationFrameScheduler;
pub use timers::WindowTimers;
pub use mainloop::{LoopConfig, LoopDriver, LoopSnapshot, Simulation};

/// Generate the `#[wasm_bindgen]` exports that drive one simulation type.
///
/// Generates:
/// - `thread_local!` storage for the LoopDriver and the simulation
/// - `with_driver()` / `with_simulation()` helpers for the crate's own exports
/// - Loop control exports (loop_init, loop_start, loop_stop, timing accessors)
/// - A snapshot pointer for SharedArrayBuffer-style reads
///
/// # Usage
///
/// ```ignore
/// use wasm_bindgen::prelude::*;
///
/// mod sim;
/// use sim::MySim;
///
/// mainloop_web::export_loop!(MySim, "my-sim");
/// ```
///
/// # Arguments
///
/// - `$sim_type`: A type implementing `mainloop::Simulation` with a `new()` constructor
/// - `$sim_name`: A string literal used in the initialization log message
#[macro_export]
macro_rules! export_loop {
    ($sim_type:ty, $sim_name:literal) => {
        use std::cell::RefCell;
        use std::rc::Rc;

        thread_local! {
            static DRIVER: RefCell<Option<$crate::LoopDriver>> = RefCell::new(None);
            static SIMULATION: RefCell<Option<Rc<RefCell<$sim_type>>>> = RefCell::new(None);
            static SNAPSHOT: RefCell<$crate::LoopSnapshot> =
                RefCell::new($crate::LoopSnapshot::default());
        }

        fn with_driver<R>(f: impl FnOnce(&$crate::LoopDriver) -> R) -> R {
            DRIVER.with(|cell| {
                let borrow = cell.borrow();
                let driver = borrow
                    .as_ref()
                    .expect("Loop not initialized. Call loop_init() first.");
                f(driver)
            })
        }

        #[allow(dead_code)]
        fn with_simulation<R>(f: impl FnOnce(&mut $sim_type) -> R) -> R {
            let simulation = SIMULATION
                .with(|cell| cell.borrow().as_ref().map(Rc::clone))
                .expect("Loop not initialized. Call loop_init() first.");
            let mut borrow = simulation.borrow_mut();
            f(&mut borrow)
        }

        #[wasm_bindgen]
        pub fn loop_init() {
            $crate::init_logging(log::Level::Info);

            let simulation = Rc::new(RefCell::new(<$sim_type>::new()));
            let config = $crate::Simulation::config(&*simulation.borrow());
            let scheduler = $crate::detect_scheduler()
                .expect("No frame scheduler available outside a browser window.");
            let driver = $crate::LoopDriver::with_config(config, scheduler)
                .expect("Invalid loop configuration");
            driver.attach(Rc::clone(&simulation));

            DRIVER.with(|cell| {
                *cell.borrow_mut() = Some(driver);
            });
            SIMULATION.with(|cell| {
                *cell.borrow_mut() = Some(simulation);
            });
            log::info!("{}: initialized", $sim_name);
        }

        #[wasm_bindgen]
        pub fn loop_start() {
            with_driver(|d| d.start());
        }

        #[wasm_bindgen]
        pub fn loop_stop() {
            with_driver(|d| d.stop());
        }

        #[wasm_bindgen]
        pub fn loop_is_running() -> bool {
            with_driver(|d| d.is_running())
        }

        #[wasm_bindgen]
        pub fn loop_get_fps() -> f64 {
            with_driver(|d| d.fps())
        }

        #[wasm_bindgen]
        pub fn loop_get_simulation_timestep() -> f64 {
            with_driver(|d| d.simulation_timestep())
        }

        #[wasm_bindgen]
        pub fn loop_set_simulation_timestep(ms: f64) {
            with_driver(|d| {
                if let Err(err) = d.set_simulation_timestep(ms) {
                    log::error!("{}: {}", $sim_name, err);
                }
            });
        }

        #[wasm_bindgen]
        pub fn loop_get_max_allowed_fps() -> f64 {
            with_driver(|d| d.max_allowed_fps())
        }

        /// `undefined` removes the cap; `0` stops the loop.
        #[wasm_bindgen]
        pub fn loop_set_max_allowed_fps(fps: Option<f64>) {
            with_driver(|d| {
                if let Err(err) = d.set_max_allowed_fps(fps) {
                    log::error!("{}: {}", $sim_name, err);
                }
            });
        }

        #[wasm_bindgen]
        pub fn loop_reset_frame_delta() -> f64 {
            with_driver(|d| d.reset_frame_delta())
        }

        // ---- Snapshot accessors ----

        /// Refreshes the snapshot and returns its address in linear memory.
        #[wasm_bindgen]
        pub fn get_snapshot_ptr() -> *const f32 {
            let snapshot = with_driver(|d| d.snapshot());
            SNAPSHOT.with(|cell| {
                *cell.borrow_mut() = snapshot;
                cell.as_ptr() as *const f32
            })
        }

        #[wasm_bindgen]
        pub fn get_snapshot_len() -> u32 {
            $crate::LoopSnapshot::FLOATS as u32
        }
    };
}
