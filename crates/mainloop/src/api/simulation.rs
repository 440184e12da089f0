use crate::api::config::LoopConfig;

/// The contract a simulation fulfills to be driven by a [`LoopDriver`](crate::LoopDriver).
///
/// Registering a `Simulation` with [`LoopDriver::attach`](crate::LoopDriver::attach)
/// wires all four lifecycle hooks at once. Only `update` is required.
pub trait Simulation {
    /// Return loop configuration. Used by hosts that build the driver for you.
    fn config(&self) -> LoopConfig {
        LoopConfig::default()
    }

    /// Called once per accepted frame, before any update step.
    /// `frame_delta` is the unsimulated time (ms) including this frame.
    fn begin(&mut self, _timestamp: f64, _frame_delta: f64) {}

    /// Advance the simulation by exactly `timestep` milliseconds.
    fn update(&mut self, timestep: f64);

    /// Render. `interpolation` is the fraction of a step not yet simulated, in [0, 1).
    fn draw(&mut self, _interpolation: f64) {}

    /// Called once per accepted frame after drawing.
    /// `panic` is true when the frame hit its update step budget.
    fn end(&mut self, _fps: f64, _panic: bool) {}
}
