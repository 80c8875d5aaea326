//! Geometry primitives shared by layout and drawing.
//!
//! Layout works in **26.6 fixed-point** units (64 units per pixel), the same
//! sub-pixel representation most glyph rasterizers report advances and metrics in.
//! Conversions to whole pixels only happen at the canvas boundary:
//! - `ceil` for sizing output images,
//! - `floor`/`round` for placing rules and glyph masks.
//!
//! Coordinate convention: x grows to the right, y grows **down** (screen space).

use std::fmt;
use std::ops::{Add, AddAssign, Div, Mul, Neg, Sub, SubAssign};

/// A signed 26.6 fixed-point scalar.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Fixed(pub i32);

impl Fixed {
    pub const ZERO: Self = Self(0);
    pub const ONE: Self = Self(64);

    /// Whole pixels to fixed-point.
    #[inline]
    pub const fn from_int(px: i32) -> Self {
        Self(px << 6)
    }

    #[inline]
    pub fn from_f32(px: f32) -> Self {
        Self((px * 64.0).round() as i32)
    }

    #[inline]
    pub fn to_f32(self) -> f32 {
        self.0 as f32 / 64.0
    }

    /// Largest whole pixel not greater than `self`.
    #[inline]
    pub const fn floor(self) -> i32 {
        self.0 >> 6
    }

    /// Smallest whole pixel not less than `self`.
    #[inline]
    pub const fn ceil(self) -> i32 {
        (self.0 + 63) >> 6
    }

    /// Nearest whole pixel, halves rounding up.
    #[inline]
    pub const fn round(self) -> i32 {
        (self.0 + 32) >> 6
    }
}

impl fmt::Display for Fixed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{:02}", self.0 >> 6, self.0 & 63)
    }
}

impl Add for Fixed {
    type Output = Self;
    #[inline]
    fn add(self, rhs: Self) -> Self {
        Self(self.0 + rhs.0)
    }
}

impl Sub for Fixed {
    type Output = Self;
    #[inline]
    fn sub(self, rhs: Self) -> Self {
        Self(self.0 - rhs.0)
    }
}

impl AddAssign for Fixed {
    #[inline]
    fn add_assign(&mut self, rhs: Self) {
        self.0 += rhs.0;
    }
}

impl SubAssign for Fixed {
    #[inline]
    fn sub_assign(&mut self, rhs: Self) {
        self.0 -= rhs.0;
    }
}

impl Neg for Fixed {
    type Output = Self;
    #[inline]
    fn neg(self) -> Self {
        Self(-self.0)
    }
}

impl Mul<i32> for Fixed {
    type Output = Self;
    #[inline]
    fn mul(self, rhs: i32) -> Self {
        Self(self.0 * rhs)
    }
}

/// Truncating division, like integer division on the raw value.
impl Div<i32> for Fixed {
    type Output = Self;
    #[inline]
    fn div(self, rhs: i32) -> Self {
        Self(self.0 / rhs)
    }
}

/// Width and height of a laid out node.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq, Hash)]
pub struct Size {
    pub width: Fixed,
    pub height: Fixed,
}

impl Size {
    pub const ZERO: Self = Self {
        width: Fixed::ZERO,
        height: Fixed::ZERO,
    };

    #[inline]
    pub const fn new(width: Fixed, height: Fixed) -> Self {
        Self { width, height }
    }

    /// A size in whole pixels.
    #[inline]
    pub const fn px(width: i32, height: i32) -> Self {
        Self {
            width: Fixed::from_int(width),
            height: Fixed::from_int(height),
        }
    }
}

/// A drawing cursor ("pen") position.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq, Hash)]
pub struct Point {
    pub x: Fixed,
    pub y: Fixed,
}

impl Point {
    pub const ZERO: Self = Self {
        x: Fixed::ZERO,
        y: Fixed::ZERO,
    };

    #[inline]
    pub const fn new(x: Fixed, y: Fixed) -> Self {
        Self { x, y }
    }
}

/// Sub-pixel rectangle, used for glyph bounds relative to the pen.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq, Hash)]
pub struct FixedRect {
    pub min: Point,
    pub max: Point,
}

impl FixedRect {
    #[inline]
    pub fn width(&self) -> Fixed {
        self.max.x - self.min.x
    }

    #[inline]
    pub fn height(&self) -> Fixed {
        self.max.y - self.min.y
    }
}

/// Half-open integer pixel rectangle `[x0, x1) x [y0, y1)`.
///
/// Used for clip regions and glyph destination rectangles. A rectangle with
/// `x0 >= x1` or `y0 >= y1` is empty.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq, Hash)]
pub struct PixelRect {
    pub x0: i32,
    pub y0: i32,
    pub x1: i32,
    pub y1: i32,
}

impl PixelRect {
    #[inline]
    pub const fn new(x0: i32, y0: i32, x1: i32, y1: i32) -> Self {
        Self { x0, y0, x1, y1 }
    }

    /// Rectangle anchored at the origin.
    #[inline]
    pub const fn from_size(width: i32, height: i32) -> Self {
        Self::new(0, 0, width, height)
    }

    #[inline]
    pub fn width(&self) -> i32 {
        (self.x1 - self.x0).max(0)
    }

    #[inline]
    pub fn height(&self) -> i32 {
        (self.y1 - self.y0).max(0)
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.x0 >= self.x1 || self.y0 >= self.y1
    }

    pub fn intersect(&self, other: &Self) -> Self {
        Self {
            x0: self.x0.max(other.x0),
            y0: self.y0.max(other.y0),
            x1: self.x1.min(other.x1),
            y1: self.y1.min(other.y1),
        }
    }

    #[inline]
    pub fn contains(&self, x: i32, y: i32) -> bool {
        x >= self.x0 && x < self.x1 && y >= self.y0 && y < self.y1
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fixed_rounding() {
        let tests = [
            // raw, floor, ceil, round
            (0, 0, 0, 0),
            (64, 1, 1, 1),
            (65, 1, 2, 1),
            (96, 1, 2, 2),
            (95, 1, 2, 1),
            (-1, -1, 0, 0),
            (-64, -1, -1, -1),
        ];
        for (raw, floor, ceil, round) in tests {
            let v = Fixed(raw);
            assert_eq!(floor, v.floor(), "floor({raw})");
            assert_eq!(ceil, v.ceil(), "ceil({raw})");
            assert_eq!(round, v.round(), "round({raw})");
        }
    }

    #[test]
    fn fixed_arithmetic() {
        assert_eq!(Fixed::from_int(3), Fixed::from_int(1) + Fixed::from_int(2));
        assert_eq!(Fixed(32), Fixed::ONE / 2);
        assert_eq!(Fixed(-1), Fixed(-3) / 2);
        assert_eq!(Fixed::from_int(6), Fixed::from_int(2) * 3);
        assert_eq!(Fixed(80), Fixed::from_f32(1.25));
        assert_eq!("1:16", Fixed(80).to_string());
    }

    #[test]
    fn rect_intersection() {
        let a = PixelRect::new(0, 0, 10, 10);
        let b = PixelRect::new(5, -5, 20, 5);
        assert_eq!(PixelRect::new(5, 0, 10, 5), a.intersect(&b));
        assert!(a.intersect(&PixelRect::new(10, 10, 12, 12)).is_empty());
        assert!(a.contains(9, 0));
        assert!(!a.contains(10, 0));
    }
}
