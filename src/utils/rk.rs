//! Explicit Runge-Kutta steppers for small ODE systems.

use core::ops::{Add, Mul};

/// Advances `y` by `dt` with the second order (midpoint) Runge-Kutta method.
///
/// `f` returns the derivative of the state and is evaluated twice.
#[inline]
pub fn step_rk2<T, F>(dt: f32, y: T, mut f: F) -> T
where
    T: Copy + Add<Output = T> + Mul<f32, Output = T>,
    F: FnMut(T) -> T,
{
    let k1 = f(y);
    let k2 = f(y + k1 * (dt * 0.5));
    y + k2 * dt
}
