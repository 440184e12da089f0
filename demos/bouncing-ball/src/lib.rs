use wasm_bindgen::prelude::*;

mod ball;

use ball::BouncingBall;

mainloop_web::export_loop!(BouncingBall, "bouncing-ball");

/// Interpolated ball position from the last draw, as `[x, y]`.
#[wasm_bindgen]
pub fn ball_position() -> Vec<f32> {
    with_simulation(|sim| sim.rendered().to_array().to_vec())
}

/// Put the ball back at its starting point.
#[wasm_bindgen]
pub fn ball_reset() {
    with_simulation(|sim| sim.reset());
}

/// Current ball speed in world units per second.
#[wasm_bindgen]
pub fn ball_speed() -> f32 {
    with_simulation(|sim| sim.velocity().length())
}
