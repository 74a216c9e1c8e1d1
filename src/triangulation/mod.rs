//! An incremental Delaunay triangulation over a fixed rectangular region.
use crate::config::Config;
use crate::error::{ConstructError, ValidationError};
use crate::mesh::{Mesh, TriangleId, VertexId};
use crate::point::Point;
use crate::predicates::in_circle;
use std::cell::Cell;
use std::collections::HashSet;

mod insertion;
mod locate;
mod removal;
mod representation;

pub use locate::Location;
pub use representation::Representation;

/// A Delaunay triangulation of a dynamic point set.
///
/// The bounding rectangle is seeded as four corner vertices and two
/// triangles. Points are added with [`insert`](Self::insert) and taken away
/// with [`remove`](Self::remove); after every call the mesh satisfies the
/// Delaunay property over its live vertices. The corners themselves can never
/// be removed.
#[derive(Clone, Debug)]
pub struct Triangulation {
    mesh: Mesh,
    config: Config,
    min: Point,
    max: Point,
    /// The triangle the last successful walk ended in.
    last_hit: Cell<Option<TriangleId>>,
    representation: Option<Representation>,
}

impl Triangulation {
    /// Triangulate the rectangle spanned by two opposite corners using exact
    /// predicates.
    pub fn new(a: Point, b: Point) -> Result<Self, ConstructError> {
        Self::with_config(a, b, Config::default())
    }

    pub fn with_config(a: Point, b: Point, config: Config) -> Result<Self, ConstructError> {
        config.validate()?;
        if !a.is_finite() || !b.is_finite() {
            return Err(ConstructError::NonFiniteRegion { min: a, max: b });
        }
        let min = Point::new(a.x.min(b.x), a.y.min(b.y));
        let max = Point::new(a.x.max(b.x), a.y.max(b.y));
        if min.x == max.x || min.y == max.y {
            return Err(ConstructError::DegenerateRegion { min, max });
        }
        tracing::debug!("seeding triangulation over {}-{}", min, max);
        Ok(Self {
            mesh: Mesh::seed(min, max),
            config,
            min,
            max,
            last_hit: Cell::new(None),
            representation: None,
        })
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// The corners of the bounding region.
    pub fn bounds(&self) -> (Point, Point) {
        (self.min, self.max)
    }

    /// Whether `point` lies in the closed bounding region.
    pub fn in_bounds(&self, point: Point) -> bool {
        point.x >= self.min.x
            && point.x <= self.max.x
            && point.y >= self.min.y
            && point.y <= self.max.y
    }

    pub fn num_triangles(&self) -> usize {
        self.mesh.num_triangles()
    }

    /// Live vertices, including the four corners.
    pub fn num_vertices(&self) -> usize {
        self.mesh.num_vertices()
    }

    pub fn vertex(&self, vertex: VertexId) -> Option<Point> {
        self.mesh.vertex(vertex).map(|v| v.point)
    }

    pub fn is_seed(&self, vertex: VertexId) -> bool {
        self.mesh.vertex(vertex).map_or(false, |v| v.seed)
    }

    pub fn vertex_ids(&self) -> impl Iterator<Item = VertexId> + '_ {
        self.mesh.vertices().map(|(id, _)| id)
    }

    /// Live triangles with their corners in CCW order.
    pub fn triangles(&self) -> impl Iterator<Item = (TriangleId, [Point; 3])> + '_ {
        self.mesh
            .triangles()
            .map(move |(id, _)| (id, self.mesh.triangle_points(id)))
    }

    /// The vertices joined to `vertex` by an edge, in CCW order around it.
    pub fn neighbours(&self, vertex: VertexId) -> Option<Vec<VertexId>> {
        let star = self.mesh.star(vertex)?;
        let mut link = Vec::with_capacity(star.triangles.len() + 1);
        let mut last = None;
        for &t in star.triangles.iter() {
            let tri = self.mesh.triangle(t)?;
            let (a, b) = tri.edge(tri.index_of(vertex)?);
            link.push(a);
            last = Some(b);
        }
        if !star.closed {
            link.push(last?);
        }
        Some(link)
    }

    /// The number of vertices on the boundary of the region, corners
    /// included.
    pub fn convex_hull_size(&self) -> usize {
        let mut on_hull = HashSet::new();
        for (_, tri) in self.mesh.triangles() {
            for (i, neighbour) in tri.neighbours.iter().enumerate() {
                if neighbour.is_none() {
                    let (a, b) = tri.edge(i);
                    on_hull.insert(a);
                    on_hull.insert(b);
                }
            }
        }
        on_hull.len()
    }

    /// Check the structure of the mesh and that every edge is locally
    /// Delaunay, which over a convex region implies the empty circumcircle
    /// property for every triangle.
    pub fn validate(&self) -> Result<(), ValidationError> {
        self.mesh.validate()?;
        for (t, tri) in self.mesh.triangles() {
            let [a, b, c] = self.mesh.triangle_points(t);
            for neighbour in tri.neighbours.iter().flatten() {
                let other = self
                    .mesh
                    .triangle(*neighbour)
                    .ok_or(ValidationError::MissingNeighbour {
                        triangle: t,
                        neighbour: *neighbour,
                    })?;
                for &v in other.vertices.iter() {
                    if tri.index_of(v).is_none()
                        && in_circle(a, b, c, self.mesh.point(v), self.config.epsilon)
                    {
                        return Err(ValidationError::DelaunayViolation {
                            triangle: t,
                            vertex: v,
                        });
                    }
                }
            }
        }
        Ok(())
    }

    #[cfg(debug_assertions)]
    fn debug_validate(&self) {
        if let Err(err) = self.mesh.validate() {
            panic!("mesh corrupted: {}", err);
        }
    }

    #[cfg(not(debug_assertions))]
    fn debug_validate(&self) {}
}

#[cfg(feature = "debug-table")]
impl Triangulation {
    pub fn debug_table(&self) -> String {
        use prettytable::{Cell, Row, Table};
        let name = |n: Option<TriangleId>| match n {
            Some(n) => format!("T{}", n),
            None => String::from("-"),
        };
        let mut table = Table::new();
        let mut headers = Row::empty();
        headers.add_cell(Cell::new("-"));
        let mut corners: Vec<Row> = (0..3)
            .map(|i| Row::new(vec![Cell::new(&format!("v{}", i))]))
            .collect();
        let mut across: Vec<Row> = (0..3)
            .map(|i| Row::new(vec![Cell::new(&format!("n{}", i))]))
            .collect();
        for (t, tri) in self.mesh.triangles() {
            headers.add_cell(Cell::new(&format!("T{}", t)));
            for i in 0..3 {
                corners[i].add_cell(Cell::new(&format!("P{}", tri.vertices[i])));
                across[i].add_cell(Cell::new(&name(tri.neighbours[i])));
            }
        }
        table.add_row(headers);
        for row in corners.into_iter().chain(across) {
            table.add_row(row);
        }
        let mut out = table.to_string();
        out.push('\n');
        out.push_str(&self.debug_points_table());
        out
    }

    pub fn debug_points_table(&self) -> String {
        use prettytable::{Cell, Row, Table};
        let mut table = Table::new();
        let mut headers = Row::empty();
        headers.add_cell(Cell::new("Name"));
        headers.add_cell(Cell::new("Point"));
        headers.add_cell(Cell::new("Seed"));
        table.add_row(headers);
        for (i, vertex) in self.mesh.vertices() {
            let mut row = Row::empty();
            row.add_cell(Cell::new(&format!("P{}", i)));
            row.add_cell(Cell::new(&format!("{}", vertex.point)));
            row.add_cell(Cell::new(if vertex.seed { "yes" } else { "" }));
            table.add_row(row);
        }
        table.to_string()
    }
}
