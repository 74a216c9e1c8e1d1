//! Orientation and in-circle tests.
//!
//! Every predicate takes an `epsilon`. With an epsilon of zero the sign of
//! the adaptive-precision determinant from [`robust`] is used directly, so
//! the result is exact for all finite input. A positive epsilon widens the
//! band of determinants that are treated as zero.
use crate::point::Point;

#[derive(Copy, Clone, Debug, Ord, PartialOrd, Eq, PartialEq, Hash)]
pub enum Direction {
    Left,
    Straight,
    Right,
}

/// Does `pc` lie to the left or the right (or is it collinear) of the line
/// from `pa` to `pb`.
pub fn orientation(pa: Point, pb: Point, pc: Point, epsilon: f64) -> Direction {
    let r = robust::orient2d(pa.into(), pb.into(), pc.into());
    classify(r, epsilon)
}

/// [`orientation`] with exact comparison.
pub fn left_or_right(pa: Point, pb: Point, pc: Point) -> Direction {
    orientation(pa, pb, pc, 0.0)
}

pub fn is_ccw(pa: Point, pb: Point, pc: Point, epsilon: f64) -> bool {
    orientation(pa, pb, pc, epsilon) == Direction::Left
}

pub fn is_collinear(pa: Point, pb: Point, pc: Point, epsilon: f64) -> bool {
    orientation(pa, pb, pc, epsilon) == Direction::Straight
}

/// True iff `pd` lies strictly inside the circle through `pa`, `pb` and
/// `pc`, which must be in CCW order. Points on the circle are not inside.
pub fn in_circle(pa: Point, pb: Point, pc: Point, pd: Point, epsilon: f64) -> bool {
    let det = robust::incircle(pa.into(), pb.into(), pc.into(), pd.into());
    det > epsilon
}

fn classify(determinant: f64, epsilon: f64) -> Direction {
    if determinant > epsilon {
        Direction::Left
    } else if determinant < -epsilon {
        Direction::Right
    } else {
        Direction::Straight
    }
}
