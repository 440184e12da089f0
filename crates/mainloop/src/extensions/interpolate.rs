// extensions/interpolate.rs
//
// Render-side interpolation between the last two simulated states.
// The draw hook receives the fraction of a step not yet simulated; blend with it.
//
// Usage:
//   let mut pos = Interpolated::new(Vec2::ZERO);
//   pos.push(next_pos);              // in update, once per step
//   let drawn = pos.sample(alpha);   // in draw

use glam::{Vec2, Vec3};

/// Values that can be linearly blended.
pub trait Lerp: Copy {
    fn lerp(self, other: Self, t: f32) -> Self;
}

impl Lerp for f32 {
    #[inline]
    fn lerp(self, other: Self, t: f32) -> Self {
        self + (other - self) * t
    }
}

impl Lerp for f64 {
    #[inline]
    fn lerp(self, other: Self, t: f32) -> Self {
        self + (other - self) * f64::from(t)
    }
}

impl Lerp for Vec2 {
    #[inline]
    fn lerp(self, other: Self, t: f32) -> Self {
        Vec2::lerp(self, other, t)
    }
}

impl Lerp for Vec3 {
    #[inline]
    fn lerp(self, other: Self, t: f32) -> Self {
        Vec3::lerp(self, other, t)
    }
}

/// A simulated value remembered across the last two steps.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Interpolated<T: Lerp> {
    previous: T,
    current: T,
}

impl<T: Lerp> Interpolated<T> {
    pub fn new(value: T) -> Self {
        Self {
            previous: value,
            current: value,
        }
    }

    /// Record the state produced by one simulation step.
    pub fn push(&mut self, next: T) {
        self.previous = self.current;
        self.current = next;
    }

    /// Jump to `value` without blending from the old state.
    pub fn teleport(&mut self, value: T) {
        self.previous = value;
        self.current = value;
    }

    pub fn current(&self) -> T {
        self.current
    }

    pub fn previous(&self) -> T {
        self.previous
    }

    /// Blend for rendering. `alpha` 0 is the previous step, 1 the current one.
    /// Alphas past 1 (a frame that panicked) are clamped rather than extrapolated.
    pub fn sample(&self, alpha: f64) -> T {
        self.previous.lerp(self.current, alpha.clamp(0.0, 1.0) as f32)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sample_blends_last_two_states() {
        let mut pos = Interpolated::new(Vec2::ZERO);
        pos.push(Vec2::new(10.0, 0.0));
        pos.push(Vec2::new(20.0, 4.0));
        assert_eq!(pos.sample(0.0), Vec2::new(10.0, 0.0));
        assert_eq!(pos.sample(0.25), Vec2::new(12.5, 1.0));
        assert_eq!(pos.sample(1.0), Vec2::new(20.0, 4.0));
    }

    #[test]
    fn teleport_skips_blending() {
        let mut angle = Interpolated::new(0.0_f32);
        angle.push(1.0);
        angle.teleport(5.0);
        assert_eq!(angle.sample(0.5), 5.0);
        assert_eq!(angle.previous(), 5.0);
    }

    #[test]
    fn oversized_alpha_is_clamped() {
        let mut x = Interpolated::new(0.0_f64);
        x.push(8.0);
        assert_eq!(x.sample(3.0), 8.0);
        assert_eq!(x.sample(-1.0), 0.0);
    }
}
