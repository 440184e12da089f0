//! Flat, float-only view of the loop state.
//!
//! Layout (all values f32 / 4 bytes), read by JavaScript through a pointer:
//! ```text
//! [0] fps                  smoothed estimate
//! [1] frame_delta          pending ms
//! [2] interpolation        frame_delta / simulation_timestep
//! [3] simulation_timestep  ms
//! [4] max_allowed_fps      Infinity when uncapped
//! [5] last_frame_time      ms since the priming frame of the current run
//! [6] last_update_steps    steps drained by the last accepted frame
//! [7] flags                bit 0 running, bit 1 started
//! ```

use bytemuck::{Pod, Zeroable};

#[repr(C)]
#[derive(Debug, Clone, Copy, Default, PartialEq, Pod, Zeroable)]
pub struct LoopSnapshot {
    pub fps: f32,
    pub frame_delta: f32,
    pub interpolation: f32,
    pub simulation_timestep: f32,
    pub max_allowed_fps: f32,
    pub last_frame_time: f32,
    pub last_update_steps: f32,
    pub flags: f32,
}

impl LoopSnapshot {
    /// Floats per snapshot (wire format, never changes).
    pub const FLOATS: usize = 8;

    pub const FLAG_RUNNING: u32 = 1;
    pub const FLAG_STARTED: u32 = 2;

    pub fn as_floats(&self) -> &[f32] {
        bytemuck::cast_slice(std::slice::from_ref(self))
    }

    pub fn running(&self) -> bool {
        (self.flags as u32) & Self::FLAG_RUNNING != 0
    }

    pub fn started(&self) -> bool {
        (self.flags as u32) & Self::FLAG_STARTED != 0
    }
}
