//! Incremental Delaunay triangulation of points in a rectangle.
//!
//! ```
//! use deltri::{Point, Triangulation};
//!
//! let mut triangulation =
//!     Triangulation::new(Point::new(0.0, 0.0), Point::new(100.0, 100.0)).unwrap();
//! triangulation.insert(Point::new(10.0, 10.0));
//! triangulation.insert(Point::new(90.0, 10.0));
//! triangulation.insert(Point::new(50.0, 90.0));
//! let representation = triangulation.generate_representation();
//! assert_eq!(representation.indices.len(), 3 * 8);
//! ```
pub mod config;
pub mod error;
pub mod mesh;
pub mod point;
pub mod predicates;
pub mod triangulation;

pub use config::Config;
pub use error::{ConstructError, InsertError, RemoveError, ValidationError};
pub use mesh::{TriangleId, VertexId};
pub use point::Point;
pub use triangulation::{Location, Representation, Triangulation};
