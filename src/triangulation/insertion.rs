use super::{Location, Triangulation};
use crate::error::InsertError;
use crate::mesh::{TriangleId, VertexId};
use crate::point::Point;
use crate::predicates::in_circle;
use std::collections::VecDeque;

impl Triangulation {
    /// Add a point, returning its vertex. A point that coincides with an
    /// existing vertex returns that vertex and changes nothing. Returns `None`
    /// for a point outside the bounding region or with a non-finite
    /// coordinate.
    pub fn insert(&mut self, point: Point) -> Option<VertexId> {
        self.try_insert(point).ok()
    }

    pub fn try_insert(&mut self, point: Point) -> Result<VertexId, InsertError> {
        if !point.is_finite() {
            tracing::warn!("rejected non-finite point {}", point);
            return Err(InsertError::NonFinite(point));
        }
        if !self.in_bounds(point) {
            tracing::warn!("rejected {} outside {}-{}", point, self.min, self.max);
            return Err(InsertError::OutOfBounds {
                point,
                min: self.min,
                max: self.max,
            });
        }
        let (vertex, created) = match self.locate(point) {
            Location::OnVertex { vertex, .. } => {
                tracing::debug!("{} is already vertex {}", point, vertex);
                return Ok(vertex);
            }
            Location::OnEdge { triangle, edge } => {
                let point = self.onto_boundary(triangle, edge, point);
                self.mesh
                    .split_edge(triangle, edge, point)
                    .ok_or(InsertError::Unlocated(point))?
            }
            Location::InTriangle(triangle) => {
                let (vertex, created) = self.mesh.split_triangle(triangle, point);
                (vertex, created.to_vec())
            }
            Location::Outside => return Err(InsertError::Unlocated(point)),
        };
        self.representation = None;
        let flips = self.legalize(created.iter().map(|&t| (t, 0)));
        self.last_hit.set(self.mesh.vertex(vertex).map(|v| v.triangle));
        tracing::debug!("inserted {} as vertex {} with {} flips", point, vertex, flips);
        self.debug_validate();
        Ok(vertex)
    }

    /// Points found within epsilon of a boundary edge are moved onto it so
    /// the region stays a rectangle.
    pub(crate) fn onto_boundary(&self, triangle: TriangleId, edge: usize, point: Point) -> Point {
        let tri = match self.mesh.triangle(triangle) {
            Some(tri) if tri.neighbours[edge].is_none() => tri,
            _ => return point,
        };
        let (a, b) = tri.edge(edge);
        let (pa, pb) = (self.mesh.point(a), self.mesh.point(b));
        if pa.x == pb.x {
            Point::new(pa.x, point.y)
        } else if pa.y == pb.y {
            Point::new(point.x, pa.y)
        } else {
            point
        }
    }

    /// Flip every queued edge that is not locally Delaunay, queueing the outer
    /// edges of each flipped pair. Each entry is a triangle and the index of
    /// the vertex opposite the edge. Returns the number of flips.
    pub(crate) fn legalize<I>(&mut self, edges: I) -> usize
    where
        I: IntoIterator<Item = (TriangleId, usize)>,
    {
        let epsilon = self.config.epsilon;
        let mut queue: VecDeque<(TriangleId, usize)> = edges.into_iter().collect();
        let mut flips = 0;
        while let Some((t, i)) = queue.pop_front() {
            let tri = match self.mesh.triangle(t) {
                Some(tri) => *tri,
                None => continue,
            };
            let other = match tri.neighbours[i].and_then(|o| self.mesh.triangle(o)) {
                Some(other) => other,
                None => continue,
            };
            let (b, c) = tri.edge(i);
            let q = match other.edge_index(c, b) {
                Some(j) => other.vertices[j],
                None => continue,
            };
            let [pa, pb, pc] = self.mesh.triangle_points(t);
            if !in_circle(pa, pb, pc, self.mesh.point(q), epsilon) {
                continue;
            }
            if let Some((t1, t2)) = self.mesh.flip(t, i) {
                flips += 1;
                queue.extend([(t1, 0), (t1, 2), (t2, 0), (t2, 1)]);
            }
        }
        flips
    }
}
