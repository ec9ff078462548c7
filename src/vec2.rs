use std::ops::{Add, Mul, Neg, Sub};

use crate::error::{CastError, Result};

/// 2D vector in map-cell units.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Vec2 {
    pub x: f64,
    pub y: f64,
}

impl Vec2 {
    pub const ZERO: Vec2 = Vec2 { x: 0.0, y: 0.0 };

    #[inline]
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    #[allow(clippy::should_implement_trait)]
    #[inline]
    pub fn add(self, other: Self) -> Self {
        Self::new(self.x + other.x, self.y + other.y)
    }

    #[allow(clippy::should_implement_trait)]
    #[inline]
    pub fn sub(self, other: Self) -> Self {
        Self::new(self.x - other.x, self.y - other.y)
    }

    #[inline]
    pub fn scale(self, k: f64) -> Self {
        Self::new(self.x * k, self.y * k)
    }

    #[inline]
    pub fn dot(self, other: Self) -> f64 {
        self.x * other.x + self.y * other.y
    }

    #[inline]
    pub fn length(self) -> f64 {
        self.dot(self).sqrt()
    }

    /// Unit vector with the same heading.
    ///
    /// The caller must not pass a zero-length vector: the result would be NaN.
    /// Use [`Vec2::try_normalize`] when the input is not known to be non-zero.
    #[inline]
    pub fn normalize(self) -> Self {
        self.scale(1.0 / self.length())
    }

    pub fn try_normalize(self) -> Result<Self> {
        let len = self.length();
        if len == 0.0 || !len.is_finite() {
            return Err(CastError::DegenerateVector);
        }
        Ok(self.scale(1.0 / len))
    }

    /// Rotate by `angle` radians: (x, y) -> (x*cos - y*sin, x*sin + y*cos)
    #[inline]
    pub fn rotated(self, angle: f64) -> Self {
        let (s, c) = angle.sin_cos();
        Self::new(self.x * c - self.y * s, self.x * s + self.y * c)
    }
}

impl Add for Vec2 {
    type Output = Vec2;

    fn add(self, rhs: Vec2) -> Vec2 {
        Vec2::add(self, rhs)
    }
}

impl Sub for Vec2 {
    type Output = Vec2;

    fn sub(self, rhs: Vec2) -> Vec2 {
        Vec2::sub(self, rhs)
    }
}

impl Mul<f64> for Vec2 {
    type Output = Vec2;

    fn mul(self, k: f64) -> Vec2 {
        self.scale(k)
    }
}

impl Neg for Vec2 {
    type Output = Vec2;

    fn neg(self) -> Vec2 {
        self.scale(-1.0)
    }
}
