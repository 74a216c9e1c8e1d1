//! Arena storage for the triangulation.
//!
//! Vertices and triangles live in [`Slab`]s and refer to each other by key.
//! Removed slots go back on the slab's vacant list and are handed out again
//! by later insertions. Nothing outside this module writes a neighbour slot;
//! every primitive here leaves the mesh with mutual adjacency and with each
//! vertex pointing at a triangle that contains it.
use crate::error::ValidationError;
use crate::point::Point;
use crate::predicates::{left_or_right, Direction};
use slab::Slab;
use std::collections::HashMap;

/// An offset into the vertex slab.
pub type VertexId = usize;
/// An offset into the triangle slab.
pub type TriangleId = usize;

#[inline(always)]
pub fn next(i: usize) -> usize {
    (i + 1) % 3
}

#[inline(always)]
pub fn prev(i: usize) -> usize {
    (i + 2) % 3
}

#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Vertex {
    pub point: Point,
    /// Some triangle that has this vertex as a corner.
    pub triangle: TriangleId,
    /// Corners of the bounding region. These are never removed.
    pub seed: bool,
}

/// Three vertices in CCW order. `neighbours[i]` is the triangle across the
/// edge opposite `vertices[i]`, or `None` on the boundary of the region.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct Triangle {
    pub vertices: [VertexId; 3],
    pub neighbours: [Option<TriangleId>; 3],
}

impl Triangle {
    fn new(vertices: [VertexId; 3]) -> Self {
        Self {
            vertices,
            neighbours: [None; 3],
        }
    }

    pub fn index_of(&self, vertex: VertexId) -> Option<usize> {
        self.vertices.iter().position(|&v| v == vertex)
    }

    /// The directed edge opposite vertex `i`.
    pub fn edge(&self, i: usize) -> (VertexId, VertexId) {
        (self.vertices[next(i)], self.vertices[prev(i)])
    }

    /// The index of the vertex opposite the directed edge `a -> b`.
    pub fn edge_index(&self, a: VertexId, b: VertexId) -> Option<usize> {
        (0..3).find(|&i| self.edge(i) == (a, b))
    }
}

/// The triangles around a vertex in CCW order. An open star belongs to a
/// vertex on the boundary of the region.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Star {
    pub triangles: Vec<TriangleId>,
    pub closed: bool,
}

/// The polygon left behind when a vertex and its star are deleted.
#[derive(Clone, Debug, PartialEq)]
pub struct Hole {
    /// Polygon vertices in CCW order.
    pub polygon: Vec<VertexId>,
    /// `outside[k]` lies across the edge `polygon[k] -> polygon[k + 1]`.
    pub outside: Vec<Option<TriangleId>>,
    /// The location of the deleted vertex.
    pub point: Point,
}

impl Hole {
    pub fn edges(&self) -> impl Iterator<Item = (VertexId, VertexId)> + '_ {
        let n = self.polygon.len();
        (0..n).map(move |k| (self.polygon[k], self.polygon[(k + 1) % n]))
    }
}

/// Old key to new key for everything that survived a [`Mesh::compact`].
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Remap {
    pub vertices: HashMap<VertexId, VertexId>,
    pub triangles: HashMap<TriangleId, TriangleId>,
}

#[derive(Clone, Debug, Default)]
pub struct Mesh {
    vertices: Slab<Vertex>,
    triangles: Slab<Triangle>,
}

impl Mesh {
    /// A rectangle split along its `min -> max` diagonal.
    pub fn seed(min: Point, max: Point) -> Self {
        let mut mesh = Self::default();
        let corner = |point| Vertex {
            point,
            triangle: 0,
            seed: true,
        };
        let sw = mesh.vertices.insert(corner(min));
        let se = mesh.vertices.insert(corner(Point::new(max.x, min.y)));
        let ne = mesh.vertices.insert(corner(max));
        let nw = mesh.vertices.insert(corner(Point::new(min.x, max.y)));
        let lower = mesh.triangles.insert(Triangle::new([sw, se, ne]));
        let upper = mesh.triangles.insert(Triangle::new([sw, ne, nw]));
        mesh.link(lower, 1, Some(upper));
        mesh.claim(lower);
        mesh.claim(upper);
        mesh
    }

    pub fn vertex(&self, vertex: VertexId) -> Option<&Vertex> {
        self.vertices.get(vertex)
    }

    pub fn triangle(&self, triangle: TriangleId) -> Option<&Triangle> {
        self.triangles.get(triangle)
    }

    pub fn vertices(&self) -> impl Iterator<Item = (VertexId, &Vertex)> + '_ {
        self.vertices.iter()
    }

    pub fn triangles(&self) -> impl Iterator<Item = (TriangleId, &Triangle)> + '_ {
        self.triangles.iter()
    }

    pub fn num_vertices(&self) -> usize {
        self.vertices.len()
    }

    pub fn num_triangles(&self) -> usize {
        self.triangles.len()
    }

    pub fn any_triangle(&self) -> Option<TriangleId> {
        self.triangles.iter().next().map(|(i, _)| i)
    }

    /// The location of a live vertex. Panics on a dead key.
    pub fn point(&self, vertex: VertexId) -> Point {
        self.vertices[vertex].point
    }

    /// The corners of a live triangle. Panics on a dead key.
    pub fn triangle_points(&self, triangle: TriangleId) -> [Point; 3] {
        let [a, b, c] = self.triangles[triangle].vertices;
        [self.point(a), self.point(b), self.point(c)]
    }

    /// Point every corner of `triangle` back at it.
    fn claim(&mut self, triangle: TriangleId) {
        for v in self.triangles[triangle].vertices {
            self.vertices[v].triangle = triangle;
        }
    }

    /// Set the neighbour across edge `i` of `triangle`, and set `triangle` as
    /// the neighbour across the same edge of `other`.
    fn link(&mut self, triangle: TriangleId, i: usize, other: Option<TriangleId>) {
        self.triangles[triangle].neighbours[i] = other;
        if let Some(other) = other {
            let (a, b) = self.triangles[triangle].edge(i);
            let other_tri = &mut self.triangles[other];
            match other_tri.edge_index(b, a) {
                Some(j) => other_tri.neighbours[j] = Some(triangle),
                None => debug_assert!(
                    false,
                    "triangle {} does not share edge {}-{} with {}",
                    other, a, b, triangle
                ),
            }
        }
    }

    /// Clear whichever neighbour slot of `other` lies across `a -> b`.
    fn unlink(&mut self, other: TriangleId, a: VertexId, b: VertexId) {
        if let Some(other_tri) = self.triangles.get_mut(other) {
            if let Some(j) = other_tri.edge_index(b, a) {
                other_tri.neighbours[j] = None;
            }
        }
    }

    /// Add a vertex strictly inside `triangle`, replacing it with three
    /// triangles. Each returned triangle has the new vertex at index 0.
    pub fn split_triangle(
        &mut self,
        triangle: TriangleId,
        point: Point,
    ) -> (VertexId, [TriangleId; 3]) {
        let old = self.triangles[triangle];
        let [a, b, c] = old.vertices;
        let [na, nb, nc] = old.neighbours;
        let p = self.vertices.insert(Vertex {
            point,
            triangle,
            seed: false,
        });
        self.triangles[triangle] = Triangle::new([p, b, c]);
        let t1 = self.triangles.insert(Triangle::new([p, c, a]));
        let t2 = self.triangles.insert(Triangle::new([p, a, b]));

        self.link(triangle, 1, Some(t1));
        self.link(t1, 1, Some(t2));
        self.link(t2, 1, Some(triangle));
        self.link(triangle, 0, na);
        self.link(t1, 0, nb);
        self.link(t2, 0, nc);
        for t in [triangle, t1, t2] {
            self.claim(t);
        }
        (p, [triangle, t1, t2])
    }

    /// Add a vertex on edge `i` of `triangle`. Both triangles sharing the
    /// edge are split in two; on a boundary edge only `triangle` is. Each
    /// returned triangle has the new vertex at index 0.
    pub fn split_edge(
        &mut self,
        triangle: TriangleId,
        i: usize,
        point: Point,
    ) -> Option<(VertexId, Vec<TriangleId>)> {
        let old = *self.triangles.get(triangle)?;
        let a = old.vertices[i];
        let (b, c) = old.edge(i);
        let nb = old.neighbours[next(i)];
        let nc = old.neighbours[prev(i)];
        // (across, opposite vertex, neighbour across b-d, neighbour across d-c)
        let other_half = match old.neighbours[i] {
            Some(o) => {
                let other = self.triangles[o];
                let j = other.edge_index(c, b)?;
                Some((
                    o,
                    other.vertices[j],
                    other.neighbours[next(j)],
                    other.neighbours[prev(j)],
                ))
            }
            None => None,
        };

        let p = self.vertices.insert(Vertex {
            point,
            triangle,
            seed: false,
        });
        self.triangles[triangle] = Triangle::new([p, a, b]);
        let t2 = self.triangles.insert(Triangle::new([p, c, a]));
        let mut created = vec![triangle, t2];
        self.link(triangle, 0, nc);
        self.link(triangle, 2, Some(t2));
        self.link(t2, 0, nb);

        if let Some((o1, d, ob, oc)) = other_half {
            self.triangles[o1] = Triangle::new([p, b, d]);
            let o2 = self.triangles.insert(Triangle::new([p, d, c]));
            self.link(triangle, 1, Some(o1));
            self.link(t2, 2, Some(o2));
            self.link(o1, 1, Some(o2));
            self.link(o1, 0, ob);
            self.link(o2, 0, oc);
            created.push(o1);
            created.push(o2);
        }
        for &t in created.iter() {
            self.claim(t);
        }
        Some((p, created))
    }

    /// Replace the edge opposite vertex `i` of `triangle` with the other
    /// diagonal of the quadrilateral it forms with its neighbour.
    ///
    /// With `triangle = (a, b, c)` and opposite vertex `q` the results are
    /// `(a, b, q)` and `(a, q, c)`, returned in that order and reusing both
    /// slots. Returns `None` and leaves the mesh alone for a boundary edge or
    /// a quadrilateral that is not strictly convex.
    pub fn flip(&mut self, triangle: TriangleId, i: usize) -> Option<(TriangleId, TriangleId)> {
        let old = self.triangles[triangle];
        let other_id = old.neighbours[i]?;
        let other = self.triangles[other_id];
        let a = old.vertices[i];
        let (b, c) = old.edge(i);
        let j = other.edge_index(c, b)?;
        let q = other.vertices[j];
        let (pa, pb, pc, pq) = (self.point(a), self.point(b), self.point(c), self.point(q));
        if left_or_right(pa, pb, pq) != Direction::Left
            || left_or_right(pa, pq, pc) != Direction::Left
        {
            return None;
        }
        let outer_a = old.neighbours[next(i)];
        let outer_b = old.neighbours[prev(i)];
        let outer_c = other.neighbours[next(j)];
        let outer_d = other.neighbours[prev(j)];

        self.triangles[triangle] = Triangle::new([a, b, q]);
        self.triangles[other_id] = Triangle::new([a, q, c]);
        self.link(triangle, 0, outer_c);
        self.link(triangle, 1, Some(other_id));
        self.link(triangle, 2, outer_b);
        self.link(other_id, 0, outer_d);
        self.link(other_id, 1, outer_a);
        self.claim(triangle);
        self.claim(other_id);
        tracing::trace!("flipped {}-{} to {}-{}", b, c, a, q);
        Some((triangle, other_id))
    }

    /// The triangles incident to `vertex`, in CCW order around it.
    pub fn star(&self, vertex: VertexId) -> Option<Star> {
        let start = self.vertices.get(vertex)?.triangle;
        let limit = self.triangles.len();
        let step = |t: TriangleId, forward: bool| -> Option<TriangleId> {
            let tri = &self.triangles[t];
            let i = tri.index_of(vertex)?;
            if forward {
                tri.neighbours[next(i)]
            } else {
                tri.neighbours[prev(i)]
            }
        };

        let mut triangles = vec![start];
        let mut current = start;
        loop {
            match step(current, true) {
                Some(t) if t == start => {
                    return Some(Star {
                        triangles,
                        closed: true,
                    })
                }
                Some(t) => {
                    triangles.push(t);
                    current = t;
                }
                None => break,
            }
            if triangles.len() > limit {
                return None;
            }
        }
        // Open fan: walk back from the start to the other boundary edge.
        let mut before = Vec::new();
        current = start;
        while let Some(t) = step(current, false) {
            before.push(t);
            current = t;
            if before.len() + triangles.len() > limit {
                return None;
            }
        }
        before.reverse();
        before.extend(triangles);
        Some(Star {
            triangles: before,
            closed: false,
        })
    }

    /// The polygon that deleting `vertex` would leave, without touching the
    /// mesh. Seed vertices have none.
    pub fn hole_around(&self, vertex: VertexId) -> Option<Hole> {
        let v = self.vertices.get(vertex)?;
        if v.seed {
            return None;
        }
        let star = self.star(vertex)?;
        let mut polygon = Vec::with_capacity(star.triangles.len() + 1);
        let mut outside = Vec::with_capacity(star.triangles.len() + 1);
        let mut last = None;
        for &t in star.triangles.iter() {
            let tri = self.triangles[t];
            let i = tri.index_of(vertex)?;
            let (a, b) = tri.edge(i);
            polygon.push(a);
            outside.push(tri.neighbours[i]);
            last = Some(b);
        }
        if !star.closed {
            // The straight boundary edge that ran through the vertex.
            polygon.push(last?);
            outside.push(None);
        }
        Some(Hole {
            polygon,
            outside,
            point: v.point,
        })
    }

    /// Delete a vertex together with its star. Seed vertices are refused.
    pub fn carve_star(&mut self, vertex: VertexId) -> Option<Hole> {
        let hole = self.hole_around(vertex)?;
        let star = self.star(vertex)?;
        for &t in star.triangles.iter() {
            self.triangles.remove(t);
        }
        self.vertices.remove(vertex);
        for ((a, b), outside) in hole.edges().zip(hole.outside.iter()) {
            if let Some(o) = *outside {
                self.unlink(o, a, b);
            }
        }
        Some(hole)
    }

    /// Cover a hole with `triangles`, each CCW, and stitch them to each other
    /// and to the triangles around the hole.
    pub fn fill_hole(&mut self, hole: &Hole, triangles: &[[VertexId; 3]]) -> Vec<TriangleId> {
        let boundary: HashMap<(VertexId, VertexId), Option<TriangleId>> =
            hole.edges().zip(hole.outside.iter().copied()).collect();
        let created: Vec<TriangleId> = triangles
            .iter()
            .map(|&vertices| self.triangles.insert(Triangle::new(vertices)))
            .collect();
        let mut edges = HashMap::with_capacity(created.len() * 3);
        for &t in created.iter() {
            for i in 0..3 {
                edges.insert(self.triangles[t].edge(i), t);
            }
        }
        for &t in created.iter() {
            for i in 0..3 {
                let (a, b) = self.triangles[t].edge(i);
                let other = match edges.get(&(b, a)) {
                    Some(&inner) => Some(inner),
                    None => boundary.get(&(a, b)).copied().flatten(),
                };
                self.link(t, i, other);
            }
            self.claim(t);
        }
        created
    }

    /// Rebuild both arenas without gaps. Surviving keys keep their relative
    /// order.
    pub fn compact(&mut self) -> Remap {
        let remap = Remap {
            vertices: self
                .vertices
                .iter()
                .enumerate()
                .map(|(new, (old, _))| (old, new))
                .collect(),
            triangles: self
                .triangles
                .iter()
                .enumerate()
                .map(|(new, (old, _))| (old, new))
                .collect(),
        };
        let mut vertices = Slab::with_capacity(self.vertices.len());
        for (_, vertex) in self.vertices.iter() {
            vertices.insert(Vertex {
                triangle: remap.triangles[&vertex.triangle],
                ..*vertex
            });
        }
        let mut triangles = Slab::with_capacity(self.triangles.len());
        for (_, tri) in self.triangles.iter() {
            triangles.insert(Triangle {
                vertices: tri.vertices.map(|v| remap.vertices[&v]),
                neighbours: tri.neighbours.map(|n| n.map(|n| remap.triangles[&n])),
            });
        }
        self.vertices = vertices;
        self.triangles = triangles;
        remap
    }

    /// Check orientation, mutual adjacency and vertex back-pointers.
    pub fn validate(&self) -> Result<(), ValidationError> {
        for (t, tri) in self.triangles.iter() {
            for &v in tri.vertices.iter() {
                if !self.vertices.contains(v) {
                    return Err(ValidationError::MissingVertex {
                        triangle: t,
                        vertex: v,
                    });
                }
            }
            let [a, b, c] = self.triangle_points(t);
            if left_or_right(a, b, c) != Direction::Left {
                return Err(ValidationError::NotCounterClockwise { triangle: t });
            }
            for (i, neighbour) in tri.neighbours.iter().enumerate() {
                let n = match *neighbour {
                    Some(n) => n,
                    None => continue,
                };
                let other = self
                    .triangles
                    .get(n)
                    .ok_or(ValidationError::MissingNeighbour {
                        triangle: t,
                        neighbour: n,
                    })?;
                let (a, b) = tri.edge(i);
                let mutual = other
                    .edge_index(b, a)
                    .map_or(false, |j| other.neighbours[j] == Some(t));
                if !mutual {
                    return Err(ValidationError::AsymmetricAdjacency {
                        triangle: t,
                        neighbour: n,
                        edge: i,
                    });
                }
            }
        }
        for (v, vertex) in self.vertices.iter() {
            let contains = self
                .triangles
                .get(vertex.triangle)
                .map_or(false, |tri| tri.index_of(v).is_some());
            if !contains {
                return Err(ValidationError::DanglingVertex {
                    vertex: v,
                    triangle: vertex.triangle,
                });
            }
        }
        Ok(())
    }
}
