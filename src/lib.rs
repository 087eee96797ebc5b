//! Vector drawings built from live geometric expressions.
//!
//! Coordinates and lengths are nodes in a pull-based graph: moving one leaf
//! point changes the resolved position of every point, box and transformed
//! copy derived from it, with no refresh step. Shapes expose their nodes
//! through named, aliased attribute views.
//!
//! ```
//! use livesketch::{Attributes, Circle, GeomError, Group, Shape};
//!
//! # fn main() -> Result<(), GeomError> {
//! let left = Circle::new((0.0, 0.0), 1)?;
//! let right = Circle::new((2.0, 0.0), 1)?;
//! let group = Group::of([left, right.clone()])?;
//! assert_eq!(group.boundingbox().get_width()?, 4.0);
//!
//! right.center().move_to(2.0, 2.0)?;
//! assert!(group.points()["ul"].is_at(-1.0, 3.0)?);
//! # Ok(())
//! # }
//! ```

pub mod errors;
pub mod geom;
mod log;
pub mod path;
pub mod registry;
pub mod shapes;
pub mod types;
pub mod writer;

pub use errors::{ErrorKind, GeomError, RenderError};
pub use geom::{Angle, AngleNorm, Length, Operand, Point, Scalar};
pub use path::{Capabilities, Path, PathCommand};
pub use registry::{Attributes, Lengths, Points, Registered, Registry, RegistryBuilder};
pub use shapes::{BoxShape, Circle, Group, Mapping, Paint, Shape, ShapeEnum, Transform, UnionBox};
pub use types::{Bounds, Color, Edge};
pub use writer::EpsWriter;
