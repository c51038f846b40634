//! Utility functions.
//!
//! Small building blocks shared by the filter and the dual-filter voices.

pub mod filter;
pub mod float4;
pub mod random;
pub mod rk;

/// Maps `x` linearly from `[x_min, x_max]` onto `[y_min, y_max]`. No clamping.
#[inline]
pub fn rescale(x: f32, x_min: f32, x_max: f32, y_min: f32, y_max: f32) -> f32 {
    y_min + (x - x_min) / (x_max - x_min) * (y_max - y_min)
}
