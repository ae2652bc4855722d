//! Two-component vector used for positions, extents and velocities.

use std::ops::{Add, AddAssign, Div, Mul, Neg, Sub};

/// 2D vector in world units
#[derive(Debug, Copy, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Vec2 {
    pub x: f32,
    pub y: f32,
}

impl Vec2 {
    pub const ZERO: Vec2 = Vec2 { x: 0.0, y: 0.0 };

    pub const fn new(x: f32, y: f32) -> Self {
        Vec2 { x, y }
    }

    pub fn zero() -> Self {
        Self::ZERO
    }

    /// Horizontal extent when the vector describes a size
    pub fn width(self) -> f32 {
        self.x
    }

    /// Vertical extent when the vector describes a size
    pub fn height(self) -> f32 {
        self.y
    }

    pub fn half(self) -> Self {
        self * 0.5
    }

    pub fn abs(self) -> Self {
        Vec2::new(self.x.abs(), self.y.abs())
    }

    pub fn is_finite(self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }
}

impl Add for Vec2 {
    type Output = Vec2;

    fn add(self, rhs: Vec2) -> Vec2 {
        Vec2::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl AddAssign for Vec2 {
    fn add_assign(&mut self, rhs: Vec2) {
        self.x += rhs.x;
        self.y += rhs.y;
    }
}

impl Sub for Vec2 {
    type Output = Vec2;

    fn sub(self, rhs: Vec2) -> Vec2 {
        Vec2::new(self.x - rhs.x, self.y - rhs.y)
    }
}

/// Component-wise product
impl Mul for Vec2 {
    type Output = Vec2;

    fn mul(self, rhs: Vec2) -> Vec2 {
        Vec2::new(self.x * rhs.x, self.y * rhs.y)
    }
}

impl Mul<f32> for Vec2 {
    type Output = Vec2;

    fn mul(self, rhs: f32) -> Vec2 {
        Vec2::new(self.x * rhs, self.y * rhs)
    }
}

impl Div<f32> for Vec2 {
    type Output = Vec2;

    fn div(self, rhs: f32) -> Vec2 {
        Vec2::new(self.x / rhs, self.y / rhs)
    }
}

impl Neg for Vec2 {
    type Output = Vec2;

    fn neg(self) -> Vec2 {
        Vec2::new(-self.x, -self.y)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_arithmetic() {
        let a = Vec2::new(3.0, -4.0);
        let b = Vec2::new(1.0, 2.0);

        assert_eq!(a + b, Vec2::new(4.0, -2.0));
        assert_eq!(a - b, Vec2::new(2.0, -6.0));
        assert_eq!(a * b, Vec2::new(3.0, -8.0));
        assert_eq!(a * 2.0, Vec2::new(6.0, -8.0));
        assert_eq!(-a, Vec2::new(-3.0, 4.0));
    }

    #[test]
    fn test_half_and_abs() {
        let size = Vec2::new(10.0, 50.0);
        assert_eq!(size.half(), Vec2::new(5.0, 25.0));
        assert_eq!(Vec2::new(-2.0, 3.0).abs(), Vec2::new(2.0, 3.0));
        assert_eq!(size.width(), 10.0);
        assert_eq!(size.height(), 50.0);
    }

    #[test]
    fn test_add_assign_leaves_operand_untouched() {
        let mut pos = Vec2::new(5.0, 235.0);
        let vel = Vec2::new(-5.0, 0.0);
        pos += vel;

        assert_eq!(pos, Vec2::new(0.0, 235.0));
        assert_eq!(vel, Vec2::new(-5.0, 0.0));
    }
}
