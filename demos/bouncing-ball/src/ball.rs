use glam::Vec2;
use mainloop::{Interpolated, LoopConfig, Simulation};

const WORLD_W: f32 = 800.0;
const WORLD_H: f32 = 600.0;
const RADIUS: f32 = 20.0;
/// Downward acceleration in units per second squared (Y-down).
const GRAVITY: f32 = 900.0;
const RESTITUTION: f32 = 0.85;
const START_POS: Vec2 = Vec2::new(RADIUS, RADIUS);
const START_VEL: Vec2 = Vec2::new(240.0, 0.0);

/// A ball bouncing inside the world bounds, simulated at 120 Hz.
pub struct BouncingBall {
    pos: Interpolated<Vec2>,
    vel: Vec2,
    rendered: Vec2,
}

impl BouncingBall {
    pub fn new() -> Self {
        Self {
            pos: Interpolated::new(START_POS),
            vel: START_VEL,
            rendered: START_POS,
        }
    }

    pub fn reset(&mut self) {
        self.pos.teleport(START_POS);
        self.vel = START_VEL;
        self.rendered = START_POS;
    }

    /// Position computed by the most recent draw.
    pub fn rendered(&self) -> Vec2 {
        self.rendered
    }

    pub fn velocity(&self) -> Vec2 {
        self.vel
    }
}

impl Simulation for BouncingBall {
    fn config(&self) -> LoopConfig {
        LoopConfig::default().with_timestep(1000.0 / 120.0)
    }

    fn update(&mut self, timestep: f64) {
        let dt = (timestep / 1000.0) as f32;
        self.vel.y += GRAVITY * dt;
        let mut next = self.pos.current() + self.vel * dt;

        let min = Vec2::splat(RADIUS);
        let max = Vec2::new(WORLD_W - RADIUS, WORLD_H - RADIUS);
        if next.x < min.x || next.x > max.x {
            self.vel.x = -self.vel.x * RESTITUTION;
            next.x = next.x.clamp(min.x, max.x);
        }
        if next.y < min.y || next.y > max.y {
            self.vel.y = -self.vel.y * RESTITUTION;
            next.y = next.y.clamp(min.y, max.y);
        }
        self.pos.push(next);
    }

    fn draw(&mut self, interpolation: f64) {
        self.rendered = self.pos.sample(interpolation);
    }

    fn end(&mut self, fps: f64, panic: bool) {
        if panic {
            // Too far behind (e.g. the tab was hidden): drop the backlog instead
            // of fast-forwarding through it.
            let discarded = crate::with_driver(|d| d.reset_frame_delta());
            log::warn!("bouncing-ball: discarded {discarded:.0}ms of simulation at {fps:.1} fps");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn gravity_pulls_the_ball_down() {
        let mut ball = BouncingBall::new();
        for _ in 0..30 {
            ball.update(1000.0 / 120.0);
        }
        ball.draw(1.0);
        assert!(ball.rendered().y > START_POS.y);
        assert!(ball.rendered().x > START_POS.x);
    }

    #[test]
    fn stays_inside_world_bounds() {
        let mut ball = BouncingBall::new();
        for _ in 0..5000 {
            ball.update(1000.0 / 120.0);
            ball.draw(0.5);
            let p = ball.rendered();
            assert!(p.x >= RADIUS && p.x <= WORLD_W - RADIUS, "x out of bounds: {}", p.x);
            assert!(p.y >= RADIUS && p.y <= WORLD_H - RADIUS, "y out of bounds: {}", p.y);
        }
    }

    #[test]
    fn reset_restores_start_state() {
        let mut ball = BouncingBall::new();
        ball.update(100.0);
        ball.reset();
        ball.draw(0.3);
        assert_eq!(ball.rendered(), START_POS);
        assert_eq!(ball.velocity(), START_VEL);
    }
}
