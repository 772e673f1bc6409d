use std::ops::{Add, AddAssign, Div, Mul, Neg, Sub, SubAssign};
use serde::{Deserialize, Serialize};

pub mod hash;

// ----------------------------------------------
// Macros
// ----------------------------------------------

// Defines a bitflags struct with a Display implementation.
#[macro_export]
macro_rules! bitflags_with_display {
    (
        $(#[$meta:meta])*
        $vis:vis struct $name:ident: $ty:ty {
            $(
                const $flag:ident = $value:expr;
            )+
        }
    ) => {
        bitflags::bitflags! {
            $(#[$meta])*
            $vis struct $name: $ty {
                $(
                    const $flag = $value;
                )+
            }
        }
        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
                let mut first = true;
                $(
                    if self.contains($name::$flag) {
                        if !first {
                            write!(f, " | ")?;
                        }
                        write!(f, stringify!($flag))?;
                        first = false;
                    }
                )+
                if first {
                    write!(f, "(empty)")
                } else {
                    Ok(())
                }
            }
        }
    };
}

pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

// ----------------------------------------------
// Vec2
// ----------------------------------------------

// 2D screen space vector or point (f32).
// Screen origin is the top-left corner, +Y points down.
#[repr(C)]
#[derive(Copy, Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Vec2 {
    pub x: f32,
    pub y: f32,
}

impl Vec2 {
    #[inline]
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    #[inline]
    pub const fn zero() -> Self {
        Self { x: 0.0, y: 0.0 }
    }

    #[inline]
    #[must_use]
    pub fn dot(&self, other: Self) -> f32 {
        (self.x * other.x) + (self.y * other.y)
    }

    #[inline]
    #[must_use]
    pub fn length_squared(&self) -> f32 {
        self.dot(*self)
    }

    #[inline]
    #[must_use]
    pub fn length(&self) -> f32 {
        self.length_squared().sqrt()
    }

    // Rotates about the origin given the precomputed sine & cosine of the angle.
    #[inline]
    #[must_use]
    pub fn rotated(&self, sin: f32, cos: f32) -> Self {
        Self {
            x: (self.x * cos) - (self.y * sin),
            y: (self.x * sin) + (self.y * cos),
        }
    }

    // Integer truncation toward zero on both axes.
    #[inline]
    #[must_use]
    pub fn trunc(&self) -> Self {
        Self { x: self.x.trunc(), y: self.y.trunc() }
    }

    #[inline]
    #[must_use]
    pub fn max(&self, other: Self) -> Self {
        Self {
            x: self.x.max(other.x),
            y: self.y.max(other.y),
        }
    }
}

impl Neg for Vec2 {
    type Output = Vec2;
    fn neg(self) -> Vec2 {
        Vec2 { x: -self.x, y: -self.y }
    }
}

// Vec2 + Vec2
impl Add for Vec2 {
    type Output = Vec2;
    fn add(self, rhs: Vec2) -> Vec2 {
        Vec2 { x: self.x + rhs.x, y: self.y + rhs.y }
    }
}

// Vec2 += Vec2
impl AddAssign for Vec2 {
    fn add_assign(&mut self, rhs: Vec2) {
        self.x += rhs.x;
        self.y += rhs.y;
    }
}

// Vec2 - Vec2
impl Sub for Vec2 {
    type Output = Vec2;
    fn sub(self, rhs: Vec2) -> Vec2 {
        Vec2 { x: self.x - rhs.x, y: self.y - rhs.y }
    }
}

// Vec2 -= Vec2
impl SubAssign for Vec2 {
    fn sub_assign(&mut self, rhs: Vec2) {
        self.x -= rhs.x;
        self.y -= rhs.y;
    }
}

// Vec2 * f32
impl Mul<f32> for Vec2 {
    type Output = Vec2;
    fn mul(self, rhs: f32) -> Vec2 {
        Vec2 { x: self.x * rhs, y: self.y * rhs }
    }
}

// Vec2 / f32
impl Div<f32> for Vec2 {
    type Output = Vec2;
    fn div(self, rhs: f32) -> Vec2 {
        Vec2 { x: self.x / rhs, y: self.y / rhs }
    }
}

impl std::fmt::Display for Vec2 {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "[{:.2},{:.2}]", self.x, self.y)
    }
}

// ----------------------------------------------
// Vec3
// ----------------------------------------------

// World space position or direction (f64).
// World coordinates can be far from the origin, so these keep double precision.
#[derive(Copy, Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Vec3 {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Vec3 {
    #[inline]
    pub const fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    #[inline]
    pub const fn zero() -> Self {
        Self { x: 0.0, y: 0.0, z: 0.0 }
    }

    #[inline]
    #[must_use]
    pub fn length(&self) -> f64 {
        (self.x * self.x + self.y * self.y + self.z * self.z).sqrt()
    }

    #[inline]
    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite() && self.z.is_finite()
    }

    // Integer block coordinates containing this point.
    #[inline]
    pub fn floor_to_block(&self) -> [i32; 3] {
        [self.x.floor() as i32, self.y.floor() as i32, self.z.floor() as i32]
    }
}

// Vec3 + Vec3
impl Add for Vec3 {
    type Output = Vec3;
    fn add(self, rhs: Vec3) -> Vec3 {
        Vec3 { x: self.x + rhs.x, y: self.y + rhs.y, z: self.z + rhs.z }
    }
}

// Vec3 - Vec3
impl Sub for Vec3 {
    type Output = Vec3;
    fn sub(self, rhs: Vec3) -> Vec3 {
        Vec3 { x: self.x - rhs.x, y: self.y - rhs.y, z: self.z - rhs.z }
    }
}

impl std::fmt::Display for Vec3 {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "[{:.1},{:.1},{:.1}]", self.x, self.y, self.z)
    }
}

// ----------------------------------------------
// Color
// ----------------------------------------------

// Packed 0xAARRGGBB color, the format the host drawing calls take.
#[repr(transparent)]
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Color(pub u32);

impl Color {
    pub const TRANSPARENT: Self = Self(0x00000000);
    pub const BLACK:       Self = Self(0xFF000000);
    pub const WHITE:       Self = Self(0xFFFFFFFF);
    pub const RED:         Self = Self(0xFFFF0000);
    pub const GREEN:       Self = Self(0xFF00FF00);
    pub const LIGHT_GRAY:  Self = Self(0xFFAAAAAA);
    pub const DARK_GRAY:   Self = Self(0xFF555555);

    #[inline]
    pub const fn from_argb(argb: u32) -> Self {
        Self(argb)
    }

    // Opaque color from a 0xRRGGBB value. Any alpha bits in `rgb` are ignored.
    #[inline]
    pub const fn from_rgb(rgb: u32) -> Self {
        Self(0xFF000000 | (rgb & 0x00FFFFFF))
    }

    #[inline]
    pub const fn from_channels(a: u8, r: u8, g: u8, b: u8) -> Self {
        Self(((a as u32) << 24) | ((r as u32) << 16) | ((g as u32) << 8) | (b as u32))
    }

    #[inline] pub const fn argb(self) -> u32 { self.0 }
    #[inline] pub const fn a(self) -> u8 { (self.0 >> 24) as u8 }
    #[inline] pub const fn r(self) -> u8 { (self.0 >> 16) as u8 }
    #[inline] pub const fn g(self) -> u8 { (self.0 >> 8) as u8 }
    #[inline] pub const fn b(self) -> u8 { self.0 as u8 }

    #[inline]
    pub const fn with_alpha(self, alpha: u8) -> Self {
        Self(((alpha as u32) << 24) | (self.0 & 0x00FFFFFF))
    }

    #[inline]
    pub const fn is_transparent(self) -> bool {
        self.a() == 0
    }

    // Adds `delta` to each of the RGB channels, clamped to [0,255].
    // Negative deltas darken, positive deltas brighten. Alpha is preserved.
    #[must_use]
    pub fn offset_channels(self, delta: i32) -> Self {
        let shift = |channel: u8| (channel as i32 + delta).clamp(0, 255) as u8;
        Self::from_channels(self.a(), shift(self.r()), shift(self.g()), shift(self.b()))
    }

    // Byte order expected by RGBA8 textures.
    #[inline]
    pub const fn to_rgba_bytes(self) -> [u8; 4] {
        [self.r(), self.g(), self.b(), self.a()]
    }
}

impl std::fmt::Display for Color {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "#{:08X}", self.0)
    }
}

// ----------------------------------------------
// Size
// ----------------------------------------------

// Integer width & height pair.
#[derive(Copy, Clone, Debug, Default, PartialOrd, Ord, PartialEq, Eq, Serialize, Deserialize)]
pub struct Size {
    pub width: i32,
    pub height: i32,
}

impl Size {
    #[inline]
    pub const fn new(width: i32, height: i32) -> Self {
        Self { width, height }
    }

    #[inline]
    pub fn is_valid(&self) -> bool {
        self.width > 0 && self.height > 0
    }
}

impl std::fmt::Display for Size {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "[{},{}]", self.width, self.height)
    }
}

// ----------------------------------------------
// Rect
// ----------------------------------------------

// Screen space rectangle defined by min and max extents (f32).
// `min` is the top-left corner and `max` is the bottom-right.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct Rect {
    pub min: Vec2,
    pub max: Vec2,
}

impl Rect {
    #[inline]
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self { min: Vec2::new(x, y), max: Vec2::new(x + width, y + height) }
    }

    #[inline]
    pub fn from_pos_and_size(pos: Vec2, size: Vec2) -> Self {
        Self { min: pos, max: pos + size }
    }

    // Square of side `size` centered at `center`.
    #[inline]
    pub fn centered_square(center: Vec2, size: f32) -> Self {
        let half = Vec2::new(size * 0.5, size * 0.5);
        Self { min: center - half, max: center + half }
    }

    #[inline]
    pub fn scaled_from_origin(&self, factor: f32) -> Self {
        Self { min: self.min * factor, max: self.max * factor }
    }

    #[inline]
    pub fn expanded(&self, amount: f32) -> Self {
        let offsets = Vec2::new(amount, amount);
        Self { min: self.min - offsets, max: self.max + offsets }
    }

    // Both corners truncated toward zero (pixel snapping).
    #[inline]
    pub fn trunc(&self) -> Self {
        Self { min: self.min.trunc(), max: self.max.trunc() }
    }

    #[inline]
    pub fn is_valid(&self) -> bool {
        self.width() > 0.0 && self.height() > 0.0
    }

    #[inline]
    pub fn x(&self) -> f32 {
        self.min.x
    }

    #[inline]
    pub fn y(&self) -> f32 {
        self.min.y
    }

    #[inline]
    pub fn width(&self) -> f32 {
        self.max.x - self.min.x
    }

    #[inline]
    pub fn height(&self) -> f32 {
        self.max.y - self.min.y
    }

    #[inline]
    pub fn center(&self) -> Vec2 {
        Vec2::new(self.x() + (self.width() * 0.5), self.y() + (self.height() * 0.5))
    }

    #[inline]
    pub fn size(&self) -> Vec2 {
        Vec2::new(self.width(), self.height())
    }

    // Returns `true` if this rect intersects with another.
    #[inline]
    pub fn intersects(&self, other: &Rect) -> bool {
        self.min.x < other.max.x
        && self.max.x > other.min.x
        && self.min.y < other.max.y
        && self.max.y > other.min.y
    }

    // Returns `true` if the point is inside this rect (inclusive of min, exclusive of max).
    #[inline]
    pub fn contains_point(&self, point: Vec2) -> bool {
        point.x >= self.min.x
        && point.x < self.max.x
        && point.y >= self.min.y
        && point.y < self.max.y
    }

    // Same as contains_point() but the max edges count as inside too.
    #[inline]
    pub fn contains_point_inclusive(&self, point: Vec2) -> bool {
        point.x >= self.min.x
        && point.x <= self.max.x
        && point.y >= self.min.y
        && point.y <= self.max.y
    }
}

impl std::fmt::Display for Rect {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "(P:{}, S:{})", self.min, self.size())
    }
}

// ----------------------------------------------
// Angle helpers
// ----------------------------------------------

// Wraps an angle in degrees into the [-180, 180) range.
#[inline]
pub fn wrap_degrees(degrees: f32) -> f32 {
    let wrapped = (degrees + 180.0).rem_euclid(360.0) - 180.0;
    // rem_euclid can round up to exactly 360 for tiny negative inputs.
    if wrapped >= 180.0 { wrapped - 360.0 } else { wrapped }
}

// Sine & cosine of an angle in degrees.
// Exact for multiples of 90 degrees so axis-aligned rotations
// don't pick up rounding noise before pixel truncation.
pub fn sin_cos_degrees(degrees: f32) -> (f32, f32) {
    let normalized = degrees.rem_euclid(360.0);
    if normalized == 0.0 || normalized == 360.0 {
        (0.0, 1.0)
    } else if normalized == 90.0 {
        (1.0, 0.0)
    } else if normalized == 180.0 {
        (0.0, -1.0)
    } else if normalized == 270.0 {
        (-1.0, 0.0)
    } else {
        normalized.to_radians().sin_cos()
    }
}

#[inline]
pub fn approx_equal(a: f32, b: f32, epsilon: f32) -> bool {
    (a - b).abs() < epsilon
}

// ----------------------------------------------
// Unit Tests
// ----------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wrap_degrees() {
        assert_eq!(wrap_degrees(0.0), 0.0);
        assert_eq!(wrap_degrees(180.0), -180.0);
        assert_eq!(wrap_degrees(-180.0), -180.0);
        assert_eq!(wrap_degrees(270.0), -90.0);
        assert_eq!(wrap_degrees(-270.0), 90.0);
        assert_eq!(wrap_degrees(720.0 + 45.0), 45.0);
    }

    #[test]
    fn test_sin_cos_quadrants_are_exact() {
        assert_eq!(sin_cos_degrees(0.0), (0.0, 1.0));
        assert_eq!(sin_cos_degrees(90.0), (1.0, 0.0));
        assert_eq!(sin_cos_degrees(180.0), (0.0, -1.0));
        assert_eq!(sin_cos_degrees(-90.0), (-1.0, 0.0));
        assert_eq!(sin_cos_degrees(540.0), (0.0, -1.0));

        let (s, c) = sin_cos_degrees(45.0);
        assert!(approx_equal(s, c, 1e-6));
    }

    #[test]
    fn test_color_channel_offsets_clamp() {
        let color = Color::from_rgb(0x10F080);
        assert_eq!(color.a(), 0xFF);

        let darker = color.offset_channels(-20);
        assert_eq!((darker.r(), darker.g(), darker.b()), (0x00, 0xF0 - 20, 0x80 - 20));

        let brighter = color.offset_channels(20);
        assert_eq!((brighter.r(), brighter.g(), brighter.b()), (0x10 + 20, 0xFF, 0x80 + 20));
        assert_eq!(brighter.a(), 0xFF);
    }

    #[test]
    fn test_color_alpha() {
        assert!(Color::TRANSPARENT.is_transparent());
        assert!(!Color::BLACK.is_transparent());
        assert_eq!(Color::WHITE.with_alpha(0x80).argb(), 0x80FFFFFF);
        assert_eq!(Color::from_argb(0x11223344).to_rgba_bytes(), [0x22, 0x33, 0x44, 0x11]);
    }

    #[test]
    fn test_rect_containment() {
        let rect = Rect::new(10.0, 10.0, 20.0, 20.0);
        assert!(rect.contains_point(Vec2::new(10.0, 10.0)));
        assert!(!rect.contains_point(Vec2::new(30.0, 30.0)));
        assert!(rect.contains_point_inclusive(Vec2::new(30.0, 30.0)));
        assert_eq!(rect.center(), Vec2::new(20.0, 20.0));
        assert_eq!(rect.expanded(2.0), Rect::new(8.0, 8.0, 24.0, 24.0));
    }
}
