#[cfg(test)]
use quickcheck::Arbitrary;
#[cfg(feature = "serialize")]
use serde::{Deserialize, Serialize};
use std::{
    fmt::{Display, Formatter},
    ops::{Add, Mul, Sub},
};

#[derive(Copy, Clone, Debug, PartialEq, PartialOrd)]
#[cfg_attr(feature = "serialize", derive(Serialize, Deserialize))]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn midpoint(self, other: Self) -> Self {
        Self {
            x: (self.x + other.x) / 2.0,
            y: (self.y + other.y) / 2.0,
        }
    }

    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }

    pub fn distance(&self, other: Self) -> f64 {
        ((other.x - self.x).powi(2) + (other.y - self.y).powi(2)).sqrt()
    }

    pub fn magnitude(&self) -> f64 {
        (self.x.powi(2) + self.y.powi(2)).sqrt()
    }

    /// The z component of the cross product of two vectors.
    pub fn cross(&self, other: Self) -> f64 {
        self.x * other.y - self.y * other.x
    }

    /// Whether both components lie within `epsilon` of `other`. With an
    /// epsilon of zero this is exact equality.
    pub fn coincident(&self, other: Self, epsilon: f64) -> bool {
        (self.x - other.x).abs() <= epsilon && (self.y - other.y).abs() <= epsilon
    }
}

impl Display for Point {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result<(), std::fmt::Error> {
        write!(f, "({},{})", self.x, self.y)
    }
}

impl Add for Point {
    type Output = Self;

    fn add(self, other: Point) -> Self {
        Self {
            x: self.x + other.x,
            y: self.y + other.y,
        }
    }
}

impl Mul<f64> for Point {
    type Output = Self;

    fn mul(self, other: f64) -> Self {
        Self {
            x: self.x * other,
            y: self.y * other,
        }
    }
}

impl Sub for Point {
    type Output = Self;

    fn sub(self, other: Point) -> Self {
        Self {
            x: self.x - other.x,
            y: self.y - other.y,
        }
    }
}

impl From<Point> for robust::Coord<f64> {
    fn from(s: Point) -> robust::Coord<f64> {
        robust::Coord { x: s.x, y: s.y }
    }
}

impl From<(f64, f64)> for Point {
    fn from((x, y): (f64, f64)) -> Self {
        Self { x, y }
    }
}

/// A coordinate restricted to the `[0, 100]` test region. Generated values
/// are snapped to a 1/1024 grid so that quickcheck shrinking stays inside the
/// region.
#[cfg(test)]
#[derive(Copy, Clone, Debug, PartialEq, PartialOrd)]
pub(crate) struct RegionFloat(pub f64);

#[cfg(test)]
impl RegionFloat {
    pub const MAX: RegionFloat = RegionFloat(100.0);
    pub const MIN: RegionFloat = RegionFloat(0.0);
    pub const EPSILON: RegionFloat = RegionFloat(1.0 / 1024.0);

    pub fn new(f: f64) -> Option<Self> {
        let s = RegionFloat((f / Self::EPSILON.0).round() * Self::EPSILON.0);
        if s.0.is_finite() && s <= RegionFloat::MAX && s >= RegionFloat::MIN {
            Some(s)
        } else {
            None
        }
    }
}

#[cfg(test)]
impl Arbitrary for RegionFloat {
    fn arbitrary(g: &mut quickcheck::Gen) -> Self {
        loop {
            let whole = u32::arbitrary(g) % 100;
            let frac = u16::arbitrary(g) % 1024;
            let f = RegionFloat::new(whole as f64 + frac as f64 * Self::EPSILON.0);
            if let Some(f) = f {
                break f;
            }
        }
    }

    fn shrink(&self) -> Box<dyn Iterator<Item = Self>> {
        Box::new(self.0.shrink().filter_map(RegionFloat::new))
    }
}

#[cfg(test)]
impl Arbitrary for Point {
    fn arbitrary(g: &mut quickcheck::Gen) -> Point {
        Point {
            x: RegionFloat::arbitrary(g).0,
            y: RegionFloat::arbitrary(g).0,
        }
    }

    fn shrink(&self) -> Box<dyn Iterator<Item = Self>> {
        let y = self.y;
        Box::new(
            RegionFloat(self.x)
                .shrink()
                .map(move |x| Point::new(x.0, y)),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn region_bounds() {
        assert_eq!(RegionFloat::new(100.0), Some(RegionFloat::MAX));
        assert_eq!(RegionFloat::new(-0.5), None);
        assert_eq!(RegionFloat::new(f64::NAN), None);
        assert_ne!(RegionFloat::MAX, RegionFloat(RegionFloat::MAX.0 - RegionFloat::EPSILON.0));
    }

    #[test]
    fn arithmetic() {
        let a = Point::new(1.0, 2.0);
        let b = Point::new(4.0, 6.0);
        assert_eq!(a + b, Point::new(5.0, 8.0));
        assert_eq!(b - a, Point::new(3.0, 4.0));
        assert_eq!((b - a) * 2.0, Point::new(6.0, 8.0));
        assert_eq!(a.distance(b), 5.0);
        assert_eq!((b - a).magnitude(), 5.0);
        assert_eq!(a.midpoint(b), Point::new(2.5, 4.0));
        assert_eq!(Point::new(1.0, 0.0).cross(Point::new(0.0, 1.0)), 1.0);
    }

    #[test]
    fn coincidence() {
        let a = Point::new(1.0, 1.0);
        assert!(a.coincident(Point::new(1.0, 1.0), 0.0));
        assert!(!a.coincident(Point::new(1.0 + 1e-12, 1.0), 0.0));
        assert!(a.coincident(Point::new(1.0 + 1e-12, 1.0), 1e-9));
    }

    #[test]
    fn display() {
        assert_eq!(format!("{}", Point::new(0.5, -2.0)), "(0.5,-2)");
        assert!(!Point::new(f64::INFINITY, 0.0).is_finite());
    }
}
