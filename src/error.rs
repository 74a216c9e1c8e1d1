use thiserror::Error;

use crate::mesh::{TriangleId, VertexId};
use crate::point::Point;

/// Reasons a [`Triangulation`](crate::Triangulation) cannot be created.
#[derive(Clone, Debug, Error, PartialEq)]
pub enum ConstructError {
    #[error("bounding region corners must be finite, got {min} and {max}")]
    NonFiniteRegion { min: Point, max: Point },
    #[error("bounding region {min}-{max} has no area")]
    DegenerateRegion { min: Point, max: Point },
    #[error("epsilon must be finite and non-negative, got {0}")]
    InvalidEpsilon(f64),
}

/// Reasons a point was not inserted. The triangulation is unchanged.
#[derive(Clone, Debug, Error, PartialEq)]
pub enum InsertError {
    #[error("point {0} has a non-finite coordinate")]
    NonFinite(Point),
    #[error("point {point} lies outside the bounding region {min}-{max}")]
    OutOfBounds { point: Point, min: Point, max: Point },
    #[error("no triangle of the mesh contains {0}")]
    Unlocated(Point),
}

/// Reasons a point was not removed. The triangulation is unchanged.
#[derive(Clone, Debug, Error, PartialEq)]
pub enum RemoveError {
    #[error("no vertex at {0}")]
    NotFound(Point),
    #[error("vertex {vertex} at {point} is a corner of the bounding region")]
    SeedVertex { vertex: VertexId, point: Point },
    #[error("the hole left by vertex {vertex} at {point} could not be triangulated")]
    Unfillable { vertex: VertexId, point: Point },
}

/// A broken structural or geometric invariant found by
/// [`Triangulation::validate`](crate::Triangulation::validate).
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("triangle {triangle} references missing vertex {vertex}")]
    MissingVertex { triangle: TriangleId, vertex: VertexId },
    #[error("triangle {triangle} is not counter-clockwise")]
    NotCounterClockwise { triangle: TriangleId },
    #[error("triangle {triangle} references missing neighbour {neighbour}")]
    MissingNeighbour {
        triangle: TriangleId,
        neighbour: TriangleId,
    },
    #[error("triangle {triangle} and neighbour {neighbour} disagree across edge {edge}")]
    AsymmetricAdjacency {
        triangle: TriangleId,
        neighbour: TriangleId,
        edge: usize,
    },
    #[error("vertex {vertex} points at triangle {triangle} which does not contain it")]
    DanglingVertex { vertex: VertexId, triangle: TriangleId },
    #[error("vertex {vertex} lies strictly inside the circumcircle of triangle {triangle}")]
    DelaunayViolation { triangle: TriangleId, vertex: VertexId },
}
