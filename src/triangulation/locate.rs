use super::Triangulation;
use crate::mesh::{next, prev, TriangleId, VertexId};
use crate::point::Point;
use crate::predicates::{left_or_right, orientation, Direction};
use rand::Rng;

/// Where a point sits relative to the mesh.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Location {
    /// Coincident with `vertex`, a corner of `triangle`.
    OnVertex {
        triangle: TriangleId,
        vertex: VertexId,
    },
    /// On the interior of the edge opposite vertex `edge` of `triangle`.
    OnEdge { triangle: TriangleId, edge: usize },
    InTriangle(TriangleId),
    Outside,
}

impl Location {
    pub fn triangle(&self) -> Option<TriangleId> {
        match *self {
            Location::OnVertex { triangle, .. } => Some(triangle),
            Location::OnEdge { triangle, .. } => Some(triangle),
            Location::InTriangle(triangle) => Some(triangle),
            Location::Outside => None,
        }
    }
}

enum Step {
    Found(Location),
    /// The point is to the right of these edges.
    Cross([bool; 3]),
}

/// Edges of a triangle with `point` strictly right of them, and edges it is
/// collinear with.
fn sides(corners: &[Point; 3], point: Point, epsilon: f64) -> ([bool; 3], [bool; 3]) {
    let mut right = [false; 3];
    let mut straight = [false; 3];
    for i in 0..3 {
        match orientation(corners[next(i)], corners[prev(i)], point, epsilon) {
            Direction::Right => right[i] = true,
            Direction::Straight => straight[i] = true,
            Direction::Left => (),
        }
    }
    (right, straight)
}

fn on_edges(straight: &[bool; 3]) -> Vec<usize> {
    (0..3).filter(|&i| straight[i]).collect()
}

impl Triangulation {
    /// Find the triangle, edge or vertex that `point` falls on.
    ///
    /// Walks from the triangle the previous search finished in, crossing a
    /// randomly chosen edge that has the point to its right until no such
    /// edge is left. Walking off the boundary means the point is outside.
    pub fn locate(&self, point: Point) -> Location {
        if !point.is_finite() {
            return Location::Outside;
        }
        let start = self
            .last_hit
            .get()
            .filter(|&t| self.mesh.triangle(t).is_some())
            .or_else(|| self.mesh.any_triangle());
        let mut current = match start {
            Some(t) => t,
            None => return Location::Outside,
        };
        let budget = 2 * self.mesh.num_triangles() + 16;
        let mut rng = rand::thread_rng();
        for steps in 0..budget {
            match self.step(current, point) {
                Step::Found(location) => {
                    tracing::trace!("located {} after {} steps", point, steps);
                    self.last_hit.set(location.triangle());
                    return location;
                }
                Step::Cross(right) => {
                    let count = right.iter().filter(|&&r| r).count();
                    let pick = rng.gen_range(0..count);
                    let i = (0..3).filter(|&i| right[i]).nth(pick).unwrap_or(0);
                    match self.mesh.triangle(current).and_then(|tri| tri.neighbours[i]) {
                        Some(t) => current = t,
                        None => return Location::Outside,
                    }
                }
            }
        }
        tracing::warn!(
            "walk towards {} did not finish in {} steps, scanning",
            point,
            budget
        );
        self.scan(point)
    }

    /// Test every triangle in turn.
    fn scan(&self, point: Point) -> Location {
        for (t, _) in self.mesh.triangles() {
            if let Step::Found(location) = self.step(t, point) {
                self.last_hit.set(location.triangle());
                return location;
            }
        }
        Location::Outside
    }

    fn step(&self, t: TriangleId, point: Point) -> Step {
        let epsilon = self.config.epsilon;
        let tri = match self.mesh.triangle(t) {
            Some(tri) => tri,
            None => return Step::Found(Location::Outside),
        };
        let corners = self.mesh.triangle_points(t);
        for (k, corner) in corners.iter().enumerate() {
            if corner.coincident(point, epsilon) {
                return Step::Found(Location::OnVertex {
                    triangle: t,
                    vertex: tri.vertices[k],
                });
            }
        }
        let (right, straight) = sides(&corners, point, epsilon);
        if right.iter().any(|&r| r) {
            return Step::Cross(right);
        }
        match on_edges(&straight).as_slice() {
            [] => return Step::Found(Location::InTriangle(t)),
            [edge] if self.splits_cleanly(t, *edge, point) => {
                return Step::Found(Location::OnEdge {
                    triangle: t,
                    edge: *edge,
                })
            }
            _ => (),
        }
        // The tolerance claims a corner the point does not coincide with, or
        // an edge it cannot be put on. Fall back to the exact answer.
        let (right, straight) = sides(&corners, point, 0.0);
        if right.iter().any(|&r| r) {
            return Step::Cross(right);
        }
        let location = match on_edges(&straight).as_slice() {
            [] => Location::InTriangle(t),
            [edge] => Location::OnEdge {
                triangle: t,
                edge: *edge,
            },
            [i, j, ..] => Location::OnVertex {
                triangle: t,
                vertex: tri.vertices[3 - i - j],
            },
        };
        Step::Found(location)
    }

    /// Whether splitting edge `i` of `t` at `point` leaves every new
    /// triangle CCW.
    fn splits_cleanly(&self, t: TriangleId, i: usize, point: Point) -> bool {
        let tri = match self.mesh.triangle(t) {
            Some(tri) => tri,
            None => return false,
        };
        let point = self.onto_boundary(t, i, point);
        let a = tri.vertices[i];
        let (b, c) = tri.edge(i);
        let mut fans = vec![(a, b), (c, a)];
        if let Some(other) = tri.neighbours[i].and_then(|o| self.mesh.triangle(o)) {
            match other.edge_index(c, b) {
                Some(j) => {
                    let d = other.vertices[j];
                    fans.push((b, d));
                    fans.push((d, c));
                }
                None => return false,
            }
        }
        fans.into_iter().all(|(x, y)| {
            left_or_right(point, self.mesh.point(x), self.mesh.point(y)) == Direction::Left
        })
    }

    /// The lowest live triangle whose closed region contains `point`, or
    /// `None` outside the region.
    pub fn containing_triangle(&self, point: Point) -> Option<TriangleId> {
        match self.locate(point) {
            Location::Outside => None,
            Location::InTriangle(t) => Some(t),
            Location::OnEdge { triangle, edge } => {
                let across = self.mesh.triangle(triangle)?.neighbours[edge];
                Some(across.map_or(triangle, |o| o.min(triangle)))
            }
            Location::OnVertex { triangle, vertex } => Some(
                self.mesh
                    .star(vertex)
                    .and_then(|star| star.triangles.into_iter().min())
                    .unwrap_or(triangle),
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::triangulation::tests::{random_points, region};
    use quickcheck_macros::quickcheck;

    #[test]
    fn locate_in_seed() {
        let triangulation = region();
        // Below the diagonal is the first triangle.
        assert_eq!(
            triangulation.locate(Point::new(75.0, 25.0)),
            Location::InTriangle(0)
        );
        assert_eq!(
            triangulation.locate(Point::new(25.0, 75.0)),
            Location::InTriangle(1)
        );
        assert_eq!(
            triangulation.locate(Point::new(150.0, 25.0)),
            Location::Outside
        );
        assert_eq!(
            triangulation.locate(Point::new(f64::NAN, 25.0)),
            Location::Outside
        );
    }

    #[test]
    fn locate_on_edges_and_vertices() {
        let triangulation = region();
        match triangulation.locate(Point::new(50.0, 50.0)) {
            Location::OnEdge { triangle, edge } => {
                let tri = triangulation.mesh.triangle(triangle).unwrap();
                assert!(tri.neighbours[edge].is_some());
            }
            other => panic!("expected the diagonal, got {:?}", other),
        }
        match triangulation.locate(Point::new(50.0, 0.0)) {
            Location::OnEdge { triangle, edge } => {
                assert_eq!(triangle, 0);
                assert_eq!(triangulation.mesh.triangle(0).unwrap().neighbours[edge], None);
            }
            other => panic!("expected the bottom edge, got {:?}", other),
        }
        assert!(matches!(
            triangulation.locate(Point::new(100.0, 100.0)),
            Location::OnVertex { vertex: 2, .. }
        ));
    }

    #[test]
    fn ties_go_to_the_lowest_triangle() {
        let triangulation = region();
        assert_eq!(triangulation.containing_triangle(Point::new(50.0, 50.0)), Some(0));
        assert_eq!(triangulation.containing_triangle(Point::new(0.0, 0.0)), Some(0));
        assert_eq!(triangulation.containing_triangle(Point::new(0.0, 100.0)), Some(1));
        assert_eq!(triangulation.containing_triangle(Point::new(-1.0, 0.0)), None);
    }

    #[test]
    fn epsilon_snaps_to_vertices() {
        let triangulation = Triangulation::with_config(
            Point::new(0.0, 0.0),
            Point::new(100.0, 100.0),
            crate::Config::new().with_epsilon(1e-6),
        )
        .unwrap();
        assert!(matches!(
            triangulation.locate(Point::new(100.0 - 1e-9, 100.0)),
            Location::OnVertex { vertex: 2, .. }
        ));
    }

    #[test]
    fn near_a_short_edge_corner_is_not_the_corner() {
        let mut triangulation = Triangulation::with_config(
            Point::new(0.0, 0.0),
            Point::new(1.0, 1.0),
            crate::Config::new().with_epsilon(1e-6),
        )
        .unwrap();
        let v = triangulation.insert(Point::new(0.5, 0.5)).unwrap();
        triangulation.insert(Point::new(0.51, 0.5)).unwrap();
        triangulation.insert(Point::new(0.5, 0.51)).unwrap();
        let near = Point::new(0.50003, 0.50003);
        for _ in 0..20 {
            triangulation.last_hit.set(None);
            match triangulation.locate(near) {
                Location::InTriangle(t) => {
                    assert!(triangulation.index_set(t).unwrap().contains(&v))
                }
                other => panic!("expected the small triangle at v, got {:?}", other),
            }
        }
        let before = triangulation.num_vertices();
        let w = triangulation.insert(near).unwrap();
        assert_ne!(w, v);
        assert_eq!(triangulation.num_vertices(), before + 1);
        triangulation.validate().unwrap();
    }

    #[quickcheck]
    fn walk_agrees_with_scan(seed: u64, query: Point) -> bool {
        let mut triangulation = region();
        for p in random_points(seed, 24) {
            triangulation.insert(p);
        }
        let walked = triangulation.locate(query);
        let scanned = triangulation.scan(query);
        match (walked, scanned) {
            (Location::InTriangle(a), Location::InTriangle(b)) => a == b,
            (Location::OnVertex { vertex: a, .. }, Location::OnVertex { vertex: b, .. }) => a == b,
            (Location::OnEdge { .. }, Location::OnEdge { .. }) => {
                triangulation.containing_triangle(query).is_some()
            }
            _ => false,
        }
    }
}
