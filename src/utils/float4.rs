//! Four-lane float vector with element-wise arithmetic.
//!
//! The filter carries its control signals and ladder states as groups of
//! four values that are always processed together. Lanes are plain `f32`s;
//! no hardware SIMD is required.

use core::ops::{Add, AddAssign, Div, Index, IndexMut, Mul, MulAssign, Neg, Sub};

#[allow(unused_imports)]
use num_traits::float::Float;

#[derive(Debug, Default, Clone, Copy, PartialEq)]
pub struct Float4(pub [f32; 4]);

impl Float4 {
    pub const ZERO: Self = Self([0.0; 4]);

    #[inline]
    pub const fn new(a: f32, b: f32, c: f32, d: f32) -> Self {
        Self([a, b, c, d])
    }

    #[inline]
    pub const fn splat(value: f32) -> Self {
        Self([value; 4])
    }

    /// Moves every lane up by one, the last lane wrapping into lane 0:
    /// `(a, b, c, d)` becomes `(d, a, b, c)`.
    #[inline]
    pub fn rotate(self) -> Self {
        let [a, b, c, d] = self.0;
        Self([d, a, b, c])
    }

    /// Replaces lane 0, keeping the upper three lanes.
    #[inline]
    pub fn with_first(mut self, value: f32) -> Self {
        self.0[0] = value;
        self
    }

    #[inline]
    pub fn clamp(self, min: f32, max: f32) -> Self {
        self.map(|x| x.clamp(min, max))
    }

    #[inline]
    pub fn map(self, f: impl Fn(f32) -> f32) -> Self {
        let [a, b, c, d] = self.0;
        Self([f(a), f(b), f(c), f(d)])
    }

    #[inline]
    fn zip(self, other: Self, f: impl Fn(f32, f32) -> f32) -> Self {
        let [a, b, c, d] = self.0;
        let [e, g, h, i] = other.0;
        Self([f(a, e), f(b, g), f(c, h), f(d, i)])
    }

    #[inline]
    pub fn exp2(self) -> Self {
        self.map(|x| x.exp2())
    }

    #[inline]
    pub fn is_finite(&self) -> bool {
        self.0.iter().all(|x| x.is_finite())
    }

    #[inline]
    pub fn max_abs(&self) -> f32 {
        self.0.iter().fold(0.0, |acc, x| f32::max(acc, x.abs()))
    }
}

impl From<f32> for Float4 {
    #[inline]
    fn from(value: f32) -> Self {
        Self::splat(value)
    }
}

impl From<[f32; 4]> for Float4 {
    #[inline]
    fn from(lanes: [f32; 4]) -> Self {
        Self(lanes)
    }
}

impl Index<usize> for Float4 {
    type Output = f32;

    #[inline]
    fn index(&self, index: usize) -> &f32 {
        &self.0[index]
    }
}

impl IndexMut<usize> for Float4 {
    #[inline]
    fn index_mut(&mut self, index: usize) -> &mut f32 {
        &mut self.0[index]
    }
}

impl Add for Float4 {
    type Output = Self;

    #[inline]
    fn add(self, rhs: Self) -> Self {
        self.zip(rhs, |a, b| a + b)
    }
}

impl Add<f32> for Float4 {
    type Output = Self;

    #[inline]
    fn add(self, rhs: f32) -> Self {
        self.map(|a| a + rhs)
    }
}

impl AddAssign for Float4 {
    #[inline]
    fn add_assign(&mut self, rhs: Self) {
        *self = *self + rhs;
    }
}

impl Sub for Float4 {
    type Output = Self;

    #[inline]
    fn sub(self, rhs: Self) -> Self {
        self.zip(rhs, |a, b| a - b)
    }
}

impl Mul for Float4 {
    type Output = Self;

    #[inline]
    fn mul(self, rhs: Self) -> Self {
        self.zip(rhs, |a, b| a * b)
    }
}

impl Mul<f32> for Float4 {
    type Output = Self;

    #[inline]
    fn mul(self, rhs: f32) -> Self {
        self.map(|a| a * rhs)
    }
}

impl Mul<Float4> for f32 {
    type Output = Float4;

    #[inline]
    fn mul(self, rhs: Float4) -> Float4 {
        rhs * self
    }
}

impl MulAssign<f32> for Float4 {
    #[inline]
    fn mul_assign(&mut self, rhs: f32) {
        *self = *self * rhs;
    }
}

impl MulAssign for Float4 {
    #[inline]
    fn mul_assign(&mut self, rhs: Self) {
        *self = *self * rhs;
    }
}

impl Div for Float4 {
    type Output = Self;

    #[inline]
    fn div(self, rhs: Self) -> Self {
        self.zip(rhs, |a, b| a / b)
    }
}

impl Div<f32> for Float4 {
    type Output = Self;

    #[inline]
    fn div(self, rhs: f32) -> Self {
        self.map(|a| a / rhs)
    }
}

impl Neg for Float4 {
    type Output = Self;

    #[inline]
    fn neg(self) -> Self {
        self.map(|a| -a)
    }
}
