use super::Triangulation;
use crate::mesh::{TriangleId, VertexId};
use crate::point::Point;
#[cfg(feature = "serialize")]
use serde::{Deserialize, Serialize};

/// Flat, gap-free buffers describing the mesh, in the layout renderers and
/// file formats expect.
///
/// Triangle `t` has corners `indices[3 * t..3 * t + 3]` in CCW order, and
/// `adjacencies[3 * t + i]` is the triangle across the edge opposite corner
/// `i`, or `None` on the boundary.
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serialize", derive(Serialize, Deserialize))]
pub struct Representation {
    pub vertices: Vec<Point>,
    pub indices: Vec<usize>,
    pub adjacencies: Vec<Option<usize>>,
}

impl Representation {
    pub fn num_triangles(&self) -> usize {
        self.indices.len() / 3
    }

    pub fn triangle(&self, t: usize) -> Option<[Point; 3]> {
        let start = t.checked_mul(3)?;
        let corners = self.indices.get(start..start.checked_add(3)?)?;
        Some([
            *self.vertices.get(corners[0])?,
            *self.vertices.get(corners[1])?,
            *self.vertices.get(corners[2])?,
        ])
    }
}

impl Triangulation {
    /// Renumber vertices and triangles densely, keeping their relative order,
    /// and build the flat buffers.
    ///
    /// Ids handed out earlier are stale after this. Any later insert or remove
    /// discards the buffers.
    pub fn generate_representation(&mut self) -> &Representation {
        let remap = self.mesh.compact();
        self.last_hit
            .set(self.last_hit.get().and_then(|t| remap.triangles.get(&t).copied()));
        let representation = Representation {
            vertices: self.mesh.vertices().map(|(_, v)| v.point).collect(),
            indices: self
                .mesh
                .triangles()
                .flat_map(|(_, tri)| tri.vertices)
                .collect(),
            adjacencies: self
                .mesh
                .triangles()
                .flat_map(|(_, tri)| tri.neighbours)
                .collect(),
        };
        tracing::debug!(
            "generated representation of {} vertices and {} triangles",
            representation.vertices.len(),
            representation.num_triangles()
        );
        self.representation.insert(representation)
    }

    pub fn representation(&self) -> Option<&Representation> {
        self.representation.as_ref()
    }

    /// Vertex indices, three per triangle. Empty until a representation is
    /// generated.
    pub fn indices(&self) -> Vec<usize> {
        self.representation
            .as_ref()
            .map(|r| r.indices.clone())
            .unwrap_or_default()
    }

    /// Triangle adjacency, three per triangle. Empty until a representation is
    /// generated.
    pub fn adjacencies(&self) -> Vec<Option<usize>> {
        self.representation
            .as_ref()
            .map(|r| r.adjacencies.clone())
            .unwrap_or_default()
    }

    /// Vertex coordinates. Empty until a representation is generated.
    pub fn vertices(&self) -> Vec<Point> {
        self.representation
            .as_ref()
            .map(|r| r.vertices.clone())
            .unwrap_or_default()
    }

    /// The corners of a live triangle in CCW order.
    pub fn index_set(&self, triangle: TriangleId) -> Option<[VertexId; 3]> {
        self.mesh.triangle(triangle).map(|tri| tri.vertices)
    }

    /// Barycentric coordinates of `point` with respect to the corners of
    /// `triangle`, in the order [`index_set`](Self::index_set) gives them.
    /// They sum to one and are all non-negative for a point inside.
    pub fn barycentric(&self, triangle: TriangleId, point: Point) -> Option<(f64, f64, f64)> {
        self.mesh.triangle(triangle)?;
        let [a, b, c] = self.mesh.triangle_points(triangle);
        let v0 = b - a;
        let v1 = c - a;
        let v2 = point - a;
        let det = v0.cross(v1);
        if det == 0.0 || !det.is_finite() {
            return None;
        }
        let wb = v2.cross(v1) / det;
        let wc = v0.cross(v2) / det;
        Some((1.0 - wb - wc, wb, wc))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::triangulation::tests::{random_points, region};
    use approx::assert_relative_eq;
    use quickcheck_macros::quickcheck;

    #[test]
    fn empty_until_generated() {
        let mut triangulation = region();
        assert!(triangulation.indices().is_empty());
        assert!(triangulation.adjacencies().is_empty());
        assert!(triangulation.vertices().is_empty());
        assert!(triangulation.representation().is_none());
        triangulation.generate_representation();
        assert_eq!(triangulation.indices(), vec![0, 1, 2, 0, 2, 3]);
        assert_eq!(
            triangulation.adjacencies(),
            vec![None, Some(1), None, None, None, Some(0)]
        );
        assert_eq!(triangulation.vertices().len(), 4);
        triangulation.insert(Point::new(1.0, 2.0)).unwrap();
        assert!(triangulation.indices().is_empty());
    }

    #[test]
    fn three_points_repeatable() {
        let mut triangulation = region();
        for (x, y) in [(10.0, 10.0), (90.0, 10.0), (50.0, 90.0)] {
            triangulation.insert(Point::new(x, y)).unwrap();
        }
        let first = triangulation.generate_representation().clone();
        assert_eq!(first.num_triangles(), 8);
        assert_eq!(first.indices.len(), 24);
        assert_eq!(first.adjacencies.len(), 24);
        assert_eq!(first.vertices.len(), 7);
        assert!(first.triangle(7).is_some());
        assert_eq!(first.triangle(8), None);
        assert_eq!(first.triangle(usize::MAX), None);
        let second = triangulation.generate_representation().clone();
        assert_eq!(first, second);
    }

    #[test]
    fn compaction_after_removal() {
        let mut triangulation = region();
        let points = random_points(3, 20);
        for &p in points.iter() {
            triangulation.insert(p).unwrap();
        }
        for &p in points.iter().step_by(2) {
            assert!(triangulation.remove(p));
        }
        let representation = triangulation.generate_representation().clone();
        let n = representation.vertices.len();
        let t = representation.num_triangles();
        assert_eq!(n, 14);
        assert_eq!(t, triangulation.num_triangles());
        assert!(representation.indices.iter().all(|&v| v < n));
        assert!(representation.adjacencies.iter().flatten().all(|&o| o < t));
        // Adjacency is mutual in the flat buffers too.
        for tri in 0..t {
            for i in 0..3 {
                if let Some(o) = representation.adjacencies[3 * tri + i] {
                    assert!(representation.adjacencies[3 * o..3 * o + 3].contains(&Some(tri)));
                }
            }
        }
        // Survivors keep their relative order.
        let survivors: Vec<Point> = points.iter().skip(1).step_by(2).copied().collect();
        assert_eq!(&representation.vertices[4..], survivors.as_slice());
        triangulation.validate().unwrap();
        assert_eq!(triangulation.index_set(0).map(|s| s.len()), Some(3));
        assert_eq!(triangulation.index_set(t), None);
    }

    #[test]
    fn barycentric_corners() {
        let triangulation = region();
        let [a, b, c] = triangulation.mesh.triangle_points(0);
        let (wa, wb, wc) = triangulation.barycentric(0, a).unwrap();
        assert_relative_eq!(wa, 1.0);
        assert_relative_eq!(wb, 0.0);
        assert_relative_eq!(wc, 0.0);
        let (wa, wb, wc) = triangulation.barycentric(0, c).unwrap();
        assert_relative_eq!(wa + wb, 0.0);
        assert_relative_eq!(wc, 1.0);
        let (wa, wb, wc) = triangulation.barycentric(0, (a + b + c) * (1.0 / 3.0)).unwrap();
        assert_relative_eq!(wa, 1.0 / 3.0, epsilon = 1e-12);
        assert_relative_eq!(wb, 1.0 / 3.0, epsilon = 1e-12);
        assert_relative_eq!(wc, 1.0 / 3.0, epsilon = 1e-12);
        assert_eq!(triangulation.barycentric(7, a), None);
    }

    #[quickcheck]
    fn barycentric_reconstructs(seed: u64, query: Point) -> bool {
        let mut triangulation = region();
        for p in random_points(seed, 16) {
            triangulation.insert(p);
        }
        let t = match triangulation.containing_triangle(query) {
            Some(t) => t,
            None => return false,
        };
        let (wa, wb, wc) = match triangulation.barycentric(t, query) {
            Some(w) => w,
            None => return false,
        };
        let [a, b, c] = triangulation.mesh.triangle_points(t);
        let rebuilt = a * wa + b * wb + c * wc;
        let tolerance = 1e-9;
        (wa + wb + wc - 1.0).abs() < tolerance
            && wa > -tolerance
            && wb > -tolerance
            && wc > -tolerance
            && (rebuilt.x - query.x).abs() < 1e-7
            && (rebuilt.y - query.y).abs() < 1e-7
    }
}
