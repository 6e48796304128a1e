use derive_more::{
    Add, AddAssign, Display, Div, DivAssign, From, Into, Mul, MulAssign, Neg,
    Sub, SubAssign,
};
use serde::{Deserialize, Serialize};

/// A point in 2D pixel space. This same type is used for both **world** pixels
/// (the unscaled plane that hex tiles are laid out on) and **screen** pixels
/// (logical CSS pixels on the drawing surface, top-left origin, y pointing
/// down). The [Camera](crate::Camera) converts between the two. See the
/// [hex](crate::hex) module docs for how tiles map onto world space.
#[derive(
    Copy,
    Clone,
    Debug,
    Default,
    Display,
    PartialEq,
    PartialOrd,
    From,
    Into,
    Neg,
    Add,
    Sub,
    Mul,
    Div,
    AddAssign,
    SubAssign,
    MulAssign,
    DivAssign,
    Serialize,
    Deserialize,
)]
#[display(fmt = "({}, {})", x, y)]
pub struct Point2 {
    pub x: f64,
    pub y: f64,
}

impl Point2 {
    pub const ORIGIN: Self = Self::new(0.0, 0.0);

    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Straight-line distance between two points
    pub fn distance_to(self, other: Point2) -> f64 {
        (self.x - other.x).hypot(self.y - other.y)
    }

    /// The point halfway between this one and another
    pub fn midpoint(self, other: Point2) -> Point2 {
        Point2::new((self.x + other.x) / 2.0, (self.y + other.y) / 2.0)
    }
}

/// Size of the viewport, in logical pixels. The device pixel ratio is applied
/// separately, at the drawing surface boundary; none of the board math ever
/// sees physical pixels.
#[derive(
    Copy, Clone, Debug, Default, Display, PartialEq, Serialize, Deserialize,
)]
#[display(fmt = "{}x{}", width, height)]
pub struct Size2 {
    pub width: f64,
    pub height: f64,
}

impl Size2 {
    pub const fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    /// The point at the center of a surface of this size
    pub fn center(self) -> Point2 {
        Point2::new(self.width / 2.0, self.height / 2.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_approx_eq::assert_approx_eq;

    #[test]
    fn test_point_math() {
        let a = Point2::new(1.0, 2.0);
        let b = Point2::new(4.0, 6.0);
        assert_eq!(a + b, Point2::new(5.0, 8.0));
        assert_eq!(b - a, Point2::new(3.0, 4.0));
        assert_eq!(a * 2.0, Point2::new(2.0, 4.0));
        assert_approx_eq!(a.distance_to(b), 5.0);
        assert_eq!(a.midpoint(b), Point2::new(2.5, 4.0));
        assert_eq!(a.to_string(), "(1, 2)");
    }

    #[test]
    fn test_size_center() {
        let size = Size2::new(800.0, 600.0);
        assert_eq!(size.center(), Point2::new(400.0, 300.0));
        assert_eq!(size.to_string(), "800x600");
    }
}
