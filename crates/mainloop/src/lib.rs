//! Fixed-timestep main loop.
//!
//! Decouples a deterministic simulation rate from a variable-rate render
//! callback, using a host frame scheduler (display refresh callback or
//! software timer) as its only time source.

pub mod api;
pub mod core;
pub mod scheduler;
pub mod bridge;
#[cfg(feature = "interpolate")]
pub mod extensions;

// Re-export key types at crate root for convenience
pub use api::config::{LoopConfig, DEFAULT_MAX_UPDATE_STEPS, DEFAULT_TIMESTEP_MS};
pub use api::error::LoopError;
pub use api::simulation::Simulation;
pub use crate::core::mainloop::{LoopDriver, WeakLoopDriver};
pub use crate::core::time::FixedTimestep;
pub use crate::core::fps::FpsEstimator;
pub use crate::core::limiter::FrameRateCap;
pub use scheduler::{
    FrameCallback, FrameHandle, FrameScheduler,
    FrameQueue,
    TimerFallback, TimerHost, TimerId,
    TimerQueue, Clock, ManualClock, SystemClock,
};
pub use bridge::snapshot::LoopSnapshot;

#[cfg(feature = "interpolate")]
pub use extensions::{Interpolated, Lerp};
