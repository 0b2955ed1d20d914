//! Fixed-Point 2D Vector
//!
//! Canvas-space positions and velocities (origin top-left, y down).

use std::fmt;
use serde::{Serialize, Deserialize};

use super::fixed::{Fixed, FIXED_ONE, fixed_mul, fixed_div, fixed_sqrt};

/// 2D vector with fixed-point components.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct FixedVec2 {
    /// X component (Q16.16 fixed-point)
    pub x: Fixed,
    /// Y component (Q16.16 fixed-point)
    pub y: Fixed,
}

impl FixedVec2 {
    /// Zero vector
    pub const ZERO: Self = Self { x: 0, y: 0 };

    /// Create a new vector from fixed-point components.
    #[inline]
    pub const fn new(x: Fixed, y: Fixed) -> Self {
        Self { x, y }
    }

    /// Scale by a fixed-point scalar.
    #[inline]
    pub fn scale(self, scalar: Fixed) -> Self {
        Self {
            x: fixed_mul(self.x, scalar),
            y: fixed_mul(self.y, scalar),
        }
    }

    /// Squared length.
    #[inline]
    pub fn length_squared(self) -> Fixed {
        fixed_mul(self.x, self.x)
            .wrapping_add(fixed_mul(self.y, self.y))
    }

    /// Length (magnitude).
    #[inline]
    pub fn length(self) -> Fixed {
        fixed_sqrt(self.length_squared())
    }

    /// Normalize to unit length. Returns ZERO if length is zero.
    #[inline]
    pub fn normalize(self) -> Self {
        let len = self.length();
        if len == 0 {
            return Self::ZERO;
        }
        Self {
            x: fixed_div(self.x, len),
            y: fixed_div(self.y, len),
        }
    }

    /// Convert to float tuple for rendering.
    #[inline]
    pub fn to_floats(self) -> (f32, f32) {
        (
            self.x as f32 / FIXED_ONE as f32,
            self.y as f32 / FIXED_ONE as f32,
        )
    }
}

impl fmt::Debug for FixedVec2 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (fx, fy) = self.to_floats();
        write!(f, "Vec2({:.3}, {:.3})", fx, fy)
    }
}

impl fmt::Display for FixedVec2 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (fx, fy) = self.to_floats();
        write!(f, "({:.1}, {:.1})", fx, fy)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::fixed::to_fixed;

    #[test]
    fn test_vec2_length() {
        let v = FixedVec2::new(to_fixed(3.0), to_fixed(4.0));
        assert_eq!(v.length_squared(), to_fixed(25.0));
        assert!((v.length() - to_fixed(5.0)).abs() < 200, "Length should be ~5.0");
    }

    #[test]
    fn test_vec2_normalize() {
        let norm = FixedVec2::new(to_fixed(3.0), to_fixed(4.0)).normalize();
        assert!((norm.length() - FIXED_ONE).abs() < 200, "Normalized length should be ~1.0");
        assert_eq!(FixedVec2::ZERO.normalize(), FixedVec2::ZERO);
    }

    #[test]
    fn test_vec2_display() {
        let v = FixedVec2::new(to_fixed(12.5), to_fixed(-3.0));
        assert_eq!(v.to_string(), "(12.5, -3.0)");
    }

    #[test]
    fn test_vec2_scale() {
        let v = FixedVec2::new(to_fixed(2.0), to_fixed(-3.0));
        assert_eq!(v.scale(to_fixed(2.0)), FixedVec2::new(to_fixed(4.0), to_fixed(-6.0)));
    }
}
