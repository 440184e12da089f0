// extensions/mod.rs
//
// Optional helpers for code living inside the loop hooks.
// Nothing in the driver depends on them.

pub mod interpolate;

pub use interpolate::{Interpolated, Lerp};
