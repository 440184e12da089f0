use std::cell::RefCell;
use std::rc::{Rc, Weak};

use crate::api::config::{validate_frame_rate, validate_timestep, LoopConfig};
use crate::api::error::LoopError;
use crate::api::simulation::Simulation;
use crate::bridge::snapshot::LoopSnapshot;
use crate::core::fps::FpsEstimator;
use crate::core::limiter::FrameRateCap;
use crate::core::time::FixedTimestep;
use crate::scheduler::{FrameHandle, FrameScheduler};

type BeginHook = Rc<RefCell<dyn FnMut(f64, f64)>>;
type StepHook = Rc<RefCell<dyn FnMut(f64)>>;
type EndHook = Rc<RefCell<dyn FnMut(f64, bool)>>;

/// The four lifecycle hooks. Each slot always holds a callable; unset slots are no-ops.
struct Hooks {
    begin: BeginHook,
    update: StepHook,
    draw: StepHook,
    end: EndHook,
}

impl Default for Hooks {
    fn default() -> Self {
        Self {
            begin: Rc::new(RefCell::new(|_: f64, _: f64| {})),
            update: Rc::new(RefCell::new(|_: f64| {})),
            draw: Rc::new(RefCell::new(|_: f64| {})),
            end: Rc::new(RefCell::new(|_: f64, _: bool| {})),
        }
    }
}

struct LoopState {
    timestep: FixedTimestep,
    fps: FpsEstimator,
    cap: FrameRateCap,
    /// Timestamp of the last accepted frame.
    last_frame_time: f64,
    /// Timestamp of the priming frame of the current run.
    origin_time: f64,
    last_update_steps: u32,
    running: bool,
    started: bool,
    /// Bumped on every start; frames scheduled under an older epoch are ignored.
    epoch: u64,
    frame_handle: Option<FrameHandle>,
}

struct Inner {
    state: RefCell<LoopState>,
    hooks: RefCell<Hooks>,
    scheduler: Box<dyn FrameScheduler>,
}

type FrameFn = fn(&Rc<Inner>, u64, f64);

impl Inner {
    /// Schedule `on_frame` for the next frame of `epoch`.
    /// The callback holds only a weak reference to the loop.
    fn request(inner: &Rc<Inner>, epoch: u64, on_frame: FrameFn) -> FrameHandle {
        let weak = Rc::downgrade(inner);
        inner.scheduler.request_frame(Box::new(move |timestamp| {
            if let Some(inner) = weak.upgrade() {
                if inner.is_current(epoch) {
                    on_frame(&inner, epoch, timestamp);
                }
            }
        }))
    }

    fn is_current(&self, epoch: u64) -> bool {
        let state = self.state.borrow();
        state.started && state.epoch == epoch
    }

    /// First frame after `start`: render once fully advanced, then begin ticking.
    fn prime(inner: &Rc<Inner>, epoch: u64, timestamp: f64) {
        inner.draw(1.0);

        // Stopped (or restarted) from inside the draw hook.
        if !inner.is_current(epoch) {
            return;
        }
        {
            let mut state = inner.state.borrow_mut();
            state.running = true;
            state.last_frame_time = timestamp;
            state.origin_time = timestamp;
            state.fps.restart_window(timestamp);
        }
        let handle = Inner::request(inner, epoch, Inner::animate);
        inner.state.borrow_mut().frame_handle = Some(handle);
        log::debug!("main loop running from t={timestamp:.3}ms");
    }

    fn animate(inner: &Rc<Inner>, epoch: u64, timestamp: f64) {
        // Re-arm before any work: a slow or panicking hook must not stall the loop.
        let handle = Inner::request(inner, epoch, Inner::animate);

        let frame_delta = {
            let mut state = inner.state.borrow_mut();
            state.frame_handle = Some(handle);

            if !state.cap.admits(timestamp, state.last_frame_time) {
                log::trace!(
                    "frame at {timestamp:.3}ms dropped by the {:.3}ms frame cap",
                    state.cap.min_frame_delay()
                );
                return;
            }

            let elapsed = timestamp - state.last_frame_time;
            state.timestep.accumulate(elapsed);
            state.last_frame_time = timestamp;
            state.timestep.pending()
        };

        inner.begin(timestamp, frame_delta);

        inner.state.borrow_mut().fps.record_frame(timestamp);

        // Time stays pending while `update` runs, and only a completed step
        // is retired.
        while let Some(step) = inner.due_step() {
            inner.update(step);
            inner.state.borrow_mut().timestep.consume();
        }

        let (interpolation, fps, panic) = {
            let mut state = inner.state.borrow_mut();
            let steps = state.timestep.steps_this_frame();
            state.last_update_steps = steps;
            let panic = state.timestep.panicked();
            if panic {
                log::warn!(
                    "update step budget exhausted after {steps} steps; {:.1}ms left undrained",
                    state.timestep.pending()
                );
            }
            (state.timestep.alpha(), state.fps.fps(), panic)
        };

        inner.draw(interpolation);
        inner.end(fps, panic);

        inner.state.borrow_mut().timestep.clear_panic();
    }

    fn due_step(&self) -> Option<f64> {
        self.state.borrow().timestep.due_step()
    }

    // Hooks are cloned out of their slot before the call, so a hook may
    // replace any slot (itself included) or call back into the driver.

    fn begin(&self, timestamp: f64, frame_delta: f64) {
        let hook = Rc::clone(&self.hooks.borrow().begin);
        (&mut *hook.borrow_mut())(timestamp, frame_delta);
    }

    fn update(&self, timestep: f64) {
        let hook = Rc::clone(&self.hooks.borrow().update);
        (&mut *hook.borrow_mut())(timestep);
    }

    fn draw(&self, interpolation: f64) {
        let hook = Rc::clone(&self.hooks.borrow().draw);
        (&mut *hook.borrow_mut())(interpolation);
    }

    fn end(&self, fps: f64, panic: bool) {
        let hook = Rc::clone(&self.hooks.borrow().end);
        (&mut *hook.borrow_mut())(fps, panic);
    }
}

impl Drop for Inner {
    fn drop(&mut self) {
        if let Some(handle) = self.state.get_mut().frame_handle.take() {
            self.scheduler.cancel_frame(handle);
        }
    }
}

/// Fixed-timestep main loop.
///
/// Each frame delivered by the [`FrameScheduler`] adds the elapsed time to an
/// accumulator, which is drained in fixed `simulation_timestep` steps through
/// the update hook. Rendering gets the leftover fraction of a step for
/// interpolation. The loop is single-threaded; clones share the same loop.
///
/// Hooks that need the driver should capture a [`WeakLoopDriver`] from
/// [`LoopDriver::downgrade`]; capturing a `LoopDriver` keeps it alive forever.
#[derive(Clone)]
pub struct LoopDriver {
    inner: Rc<Inner>,
}

impl LoopDriver {
    /// Create a loop with default configuration.
    pub fn new(scheduler: impl FrameScheduler + 'static) -> Self {
        Self::build(LoopConfig::default(), Box::new(scheduler))
    }

    pub fn with_config(
        config: LoopConfig,
        scheduler: impl FrameScheduler + 'static,
    ) -> Result<Self, LoopError> {
        config.validate()?;
        Ok(Self::build(config, Box::new(scheduler)))
    }

    fn build(config: LoopConfig, scheduler: Box<dyn FrameScheduler>) -> Self {
        scheduler.set_frame_interval(config.simulation_timestep);
        let state = LoopState {
            timestep: FixedTimestep::with_step_budget(
                config.simulation_timestep,
                config.max_update_steps,
            ),
            fps: FpsEstimator::new(
                config.initial_fps,
                config.fps_alpha,
                config.fps_update_interval,
            ),
            cap: config
                .max_allowed_fps
                .map_or(FrameRateCap::UNCAPPED, FrameRateCap::from_fps),
            last_frame_time: 0.0,
            origin_time: 0.0,
            last_update_steps: 0,
            running: false,
            started: false,
            epoch: 0,
            frame_handle: None,
        };
        Self {
            inner: Rc::new(Inner {
                state: RefCell::new(state),
                hooks: RefCell::new(Hooks::default()),
                scheduler,
            }),
        }
    }

    /// Fixed simulation step in milliseconds.
    pub fn simulation_timestep(&self) -> f64 {
        self.inner.state.borrow().timestep.dt()
    }

    /// Replace the simulation step. Takes effect on the next step drained.
    pub fn set_simulation_timestep(&self, ms: f64) -> Result<(), LoopError> {
        validate_timestep(ms)?;
        self.inner.state.borrow_mut().timestep.set_dt(ms);
        self.inner.scheduler.set_frame_interval(ms);
        Ok(())
    }

    /// Smoothed frames-per-second estimate.
    pub fn fps(&self) -> f64 {
        self.inner.state.borrow().fps.fps()
    }

    /// Current frame-rate cap; `f64::INFINITY` when uncapped.
    pub fn max_allowed_fps(&self) -> f64 {
        self.inner.state.borrow().cap.max_fps()
    }

    /// Cap the frame rate. `None` removes the cap; `Some(0.0)` stops the loop.
    pub fn set_max_allowed_fps(&self, fps: Option<f64>) -> Result<(), LoopError> {
        let cap = match fps {
            None => FrameRateCap::UNCAPPED,
            Some(fps) => {
                validate_frame_rate(fps)?;
                if fps == 0.0 {
                    self.stop();
                    return Ok(());
                }
                FrameRateCap::from_fps(fps)
            }
        };
        self.inner.state.borrow_mut().cap = cap;
        Ok(())
    }

    /// Discard pending simulation time, e.g. after a long pause or a panic.
    /// Returns the discarded milliseconds.
    pub fn reset_frame_delta(&self) -> f64 {
        self.inner.state.borrow_mut().timestep.reset()
    }

    /// Pending, unsimulated time in milliseconds.
    pub fn frame_delta(&self) -> f64 {
        self.inner.state.borrow().timestep.pending()
    }

    /// Called with `(timestamp, frame_delta)` at the start of every accepted frame.
    pub fn set_begin(&self, hook: impl FnMut(f64, f64) + 'static) {
        self.inner.hooks.borrow_mut().begin = Rc::new(RefCell::new(hook));
    }

    /// Called with the fixed timestep once per simulation step.
    pub fn set_update(&self, hook: impl FnMut(f64) + 'static) {
        self.inner.hooks.borrow_mut().update = Rc::new(RefCell::new(hook));
    }

    /// Called with the interpolation fraction once per accepted frame.
    pub fn set_draw(&self, hook: impl FnMut(f64) + 'static) {
        self.inner.hooks.borrow_mut().draw = Rc::new(RefCell::new(hook));
    }

    /// Called with `(fps, panic)` at the end of every accepted frame.
    pub fn set_end(&self, hook: impl FnMut(f64, bool) + 'static) {
        self.inner.hooks.borrow_mut().end = Rc::new(RefCell::new(hook));
    }

    /// Route all four hooks to `simulation`.
    pub fn attach<S: Simulation + 'static>(&self, simulation: Rc<RefCell<S>>) {
        let sim = Rc::clone(&simulation);
        self.set_begin(move |timestamp, frame_delta| {
            sim.borrow_mut().begin(timestamp, frame_delta)
        });
        let sim = Rc::clone(&simulation);
        self.set_update(move |timestep| sim.borrow_mut().update(timestep));
        let sim = Rc::clone(&simulation);
        self.set_draw(move |interpolation| sim.borrow_mut().draw(interpolation));
        self.set_end(move |fps, panic| simulation.borrow_mut().end(fps, panic));
    }

    /// Start the loop. No-op while already started.
    ///
    /// The first frame only draws with interpolation 1 and records its
    /// timestamp; simulation starts on the frame after.
    pub fn start(&self) {
        let epoch = {
            let mut state = self.inner.state.borrow_mut();
            if state.started {
                return;
            }
            state.started = true;
            state.epoch += 1;
            state.epoch
        };
        log::debug!("main loop starting");
        let handle = Inner::request(&self.inner, epoch, Inner::prime);
        self.inner.state.borrow_mut().frame_handle = Some(handle);
    }

    /// Stop the loop and cancel its pending frame.
    /// A frame already in progress runs to completion.
    pub fn stop(&self) {
        let (was_started, handle) = {
            let mut state = self.inner.state.borrow_mut();
            let was_started = state.started;
            state.running = false;
            state.started = false;
            (was_started, state.frame_handle.take())
        };
        if let Some(handle) = handle {
            self.inner.scheduler.cancel_frame(handle);
        }
        if was_started {
            log::debug!("main loop stopped");
        }
    }

    /// True once the first frame after `start` has fired, until `stop`.
    pub fn is_running(&self) -> bool {
        self.inner.state.borrow().running
    }

    /// True from `start` until `stop`.
    pub fn is_started(&self) -> bool {
        self.inner.state.borrow().started
    }

    /// Flat view of the loop's timing state, for hosts that read it as floats.
    pub fn snapshot(&self) -> LoopSnapshot {
        let state = self.inner.state.borrow();
        let mut flags = 0;
        if state.running {
            flags |= LoopSnapshot::FLAG_RUNNING;
        }
        if state.started {
            flags |= LoopSnapshot::FLAG_STARTED;
        }
        LoopSnapshot {
            fps: state.fps.fps() as f32,
            frame_delta: state.timestep.pending() as f32,
            interpolation: state.timestep.alpha() as f32,
            simulation_timestep: state.timestep.dt() as f32,
            max_allowed_fps: state.cap.max_fps() as f32,
            // Relative, so f32 keeps sub-millisecond precision on epoch clocks.
            last_frame_time: (state.last_frame_time - state.origin_time) as f32,
            last_update_steps: state.last_update_steps as f32,
            flags: flags as f32,
        }
    }

    pub fn downgrade(&self) -> WeakLoopDriver {
        WeakLoopDriver {
            inner: Rc::downgrade(&self.inner),
        }
    }
}

/// Non-owning handle to a [`LoopDriver`].
#[derive(Clone)]
pub struct WeakLoopDriver {
    inner: Weak<Inner>,
}

impl WeakLoopDriver {
    pub fn upgrade(&self) -> Option<LoopDriver> {
        self.inner.upgrade().map(|inner| LoopDriver { inner })
    }
}
