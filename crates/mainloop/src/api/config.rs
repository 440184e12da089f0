use serde::{Deserialize, Serialize};

use crate::api::error::LoopError;

/// Default simulation step: 60 updates per second.
pub const DEFAULT_TIMESTEP_MS: f64 = 1000.0 / 60.0;

/// Number of update steps one frame may drain before the panic guard trips.
pub const DEFAULT_MAX_UPDATE_STEPS: u32 = 240;

/// Tuning for a [`LoopDriver`](crate::LoopDriver).
/// Every field has a default, so a JSON document only needs the overrides.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoopConfig {
    /// Fixed duration of one simulation step, in milliseconds (default: 1000/60).
    pub simulation_timestep: f64,
    /// Decay weight for the previous FPS estimate (default: 0.9).
    pub fps_alpha: f64,
    /// Milliseconds between FPS recomputations (default: 1000).
    pub fps_update_interval: f64,
    /// FPS reported before the first window closes (default: 60).
    pub initial_fps: f64,
    /// Frame-rate cap. `None` leaves the loop uncapped.
    pub max_allowed_fps: Option<f64>,
    /// Update steps per frame before the panic flag is raised (default: 240).
    pub max_update_steps: u32,
}

impl Default for LoopConfig {
    fn default() -> Self {
        Self {
            simulation_timestep: DEFAULT_TIMESTEP_MS,
            fps_alpha: 0.9,
            fps_update_interval: 1000.0,
            initial_fps: 60.0,
            max_allowed_fps: None,
            max_update_steps: DEFAULT_MAX_UPDATE_STEPS,
        }
    }
}

impl LoopConfig {
    /// Parse a configuration from a JSON string and validate it.
    pub fn from_json(json: &str) -> Result<Self, LoopError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Builder-style override of the simulation timestep.
    pub fn with_timestep(mut self, ms: f64) -> Self {
        self.simulation_timestep = ms;
        self
    }

    /// Builder-style override of the frame-rate cap.
    pub fn with_max_allowed_fps(mut self, fps: f64) -> Self {
        self.max_allowed_fps = Some(fps);
        self
    }

    pub fn validate(&self) -> Result<(), LoopError> {
        validate_timestep(self.simulation_timestep)?;
        if !(self.fps_alpha > 0.0 && self.fps_alpha < 1.0) {
            return Err(LoopError::InvalidSmoothing(self.fps_alpha));
        }
        if !(self.fps_update_interval.is_finite() && self.fps_update_interval > 0.0) {
            return Err(LoopError::InvalidUpdateInterval(self.fps_update_interval));
        }
        if !(self.initial_fps.is_finite() && self.initial_fps >= 0.0) {
            return Err(LoopError::InvalidInitialFps(self.initial_fps));
        }
        // A configured cap of zero would never admit a frame; stopping is a runtime action.
        if let Some(fps) = self.max_allowed_fps {
            if !(fps > 0.0) {
                return Err(LoopError::InvalidFrameRate(fps));
            }
        }
        if self.max_update_steps == 0 {
            return Err(LoopError::InvalidStepBudget);
        }
        Ok(())
    }
}

pub(crate) fn validate_timestep(ms: f64) -> Result<(), LoopError> {
    if ms.is_finite() && ms > 0.0 {
        Ok(())
    } else {
        Err(LoopError::InvalidTimestep(ms))
    }
}

pub(crate) fn validate_frame_rate(fps: f64) -> Result<(), LoopError> {
    if fps >= 0.0 {
        Ok(())
    } else {
        Err(LoopError::InvalidFrameRate(fps))
    }
}
