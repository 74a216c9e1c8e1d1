use super::{Location, Triangulation};
use crate::error::RemoveError;
use crate::mesh::{Hole, VertexId};
use crate::point::Point;
use crate::predicates::{in_circle, left_or_right, Direction};

impl Triangulation {
    /// Remove the vertex coinciding with `point` (within epsilon on both
    /// axes). Returns `false` when there is no such vertex, it is a corner of
    /// the region, or its hole cannot be refilled.
    pub fn remove(&mut self, point: Point) -> bool {
        self.try_remove(point).is_ok()
    }

    pub fn try_remove(&mut self, point: Point) -> Result<VertexId, RemoveError> {
        let vertex = match self.locate(point) {
            Location::OnVertex { vertex, .. }
                if self.mesh.point(vertex).coincident(point, self.config.epsilon) =>
            {
                vertex
            }
            _ => {
                tracing::debug!("no vertex at {} to remove", point);
                return Err(RemoveError::NotFound(point));
            }
        };
        if self.is_seed(vertex) {
            tracing::warn!("refusing to remove corner {} at {}", vertex, point);
            return Err(RemoveError::SeedVertex { vertex, point });
        }
        let hole = self
            .mesh
            .hole_around(vertex)
            .ok_or(RemoveError::NotFound(point))?;
        let triangles = match self.triangulate_hole(&hole) {
            Some(triangles) => triangles,
            None => {
                tracing::error!(
                    "hole of {} vertices around {} cannot be covered, keeping vertex {}",
                    hole.polygon.len(),
                    hole.point,
                    vertex
                );
                return Err(RemoveError::Unfillable { vertex, point });
            }
        };
        let hole = self
            .mesh
            .carve_star(vertex)
            .ok_or(RemoveError::NotFound(point))?;
        let created = self.mesh.fill_hole(&hole, &triangles);
        self.representation = None;
        let flips = self.legalize(created.iter().flat_map(|&t| (0..3).map(move |i| (t, i))));
        self.last_hit.set(created.first().copied());
        tracing::debug!(
            "removed vertex {} at {}, {} triangles refilled with {} flips",
            vertex,
            point,
            created.len(),
            flips
        );
        self.debug_validate();
        Ok(vertex)
    }

    /// Delaunay triangulation of a star-shaped hole, or `None` if some
    /// part of it has no apex.
    ///
    /// For the first edge of each pending polygon the apex is the vertex left
    /// of it whose circle through the edge holds no other candidate. The
    /// triangle cuts the polygon into at most two smaller ones.
    fn triangulate_hole(&self, hole: &Hole) -> Option<Vec<[VertexId; 3]>> {
        let mut out = Vec::with_capacity(hole.polygon.len().saturating_sub(2));
        let mut pending = vec![hole.polygon.clone()];
        while let Some(polygon) = pending.pop() {
            if polygon.len() < 3 {
                continue;
            }
            let (a, b) = (polygon[0], polygon[1]);
            let apex = self.apex(&polygon)?;
            out.push([a, b, polygon[apex]]);
            pending.push(polygon[1..=apex].to_vec());
            let mut rest = polygon[apex..].to_vec();
            rest.push(a);
            pending.push(rest);
        }
        if out.len() + 2 == hole.polygon.len() {
            Some(out)
        } else {
            None
        }
    }

    /// Index of the apex over `polygon[0] -> polygon[1]`.
    fn apex(&self, polygon: &[VertexId]) -> Option<usize> {
        let pa = self.mesh.point(polygon[0]);
        let pb = self.mesh.point(polygon[1]);
        let mut best: Option<(usize, Point)> = None;
        for k in 2..polygon.len() {
            let pk = self.mesh.point(polygon[k]);
            if left_or_right(pa, pb, pk) != Direction::Left || !self.is_ear(polygon, k) {
                continue;
            }
            best = match best {
                Some((_, current)) if !in_circle(pa, pb, current, pk, 0.0) => best,
                _ => Some((k, pk)),
            };
        }
        best.map(|(k, _)| k)
    }

    /// Whether the triangle over the first edge of `polygon` with apex
    /// `polygon[k]` lies inside the polygon: no other polygon vertex in it
    /// and no polygon edge crossing its two new sides.
    fn is_ear(&self, polygon: &[VertexId], k: usize) -> bool {
        let n = polygon.len();
        let pa = self.mesh.point(polygon[0]);
        let pb = self.mesh.point(polygon[1]);
        let pq = self.mesh.point(polygon[k]);
        for (r, &v) in polygon.iter().enumerate() {
            if r == 0 || r == 1 || r == k {
                continue;
            }
            let pr = self.mesh.point(v);
            if left_or_right(pa, pb, pr) == Direction::Left
                && left_or_right(pb, pq, pr) != Direction::Right
                && left_or_right(pq, pa, pr) != Direction::Right
            {
                return false;
            }
        }
        for s in 0..n {
            let (u, w) = (s, (s + 1) % n);
            for &end in [0, 1].iter() {
                if [u, w].contains(&end) || [u, w].contains(&k) {
                    continue;
                }
                let pe = self.mesh.point(polygon[end]);
                let pu = self.mesh.point(polygon[u]);
                let pw = self.mesh.point(polygon[w]);
                if crosses(pe, pq, pu, pw) {
                    return false;
                }
            }
        }
        true
    }
}

/// Proper intersection of the open segments `a-b` and `c-d`.
fn crosses(a: Point, b: Point, c: Point, d: Point) -> bool {
    let opposite = |x: Direction, y: Direction| {
        matches!(
            (x, y),
            (Direction::Left, Direction::Right) | (Direction::Right, Direction::Left)
        )
    };
    opposite(left_or_right(a, b, c), left_or_right(a, b, d))
        && opposite(left_or_right(c, d, a), left_or_right(c, d, b))
}
