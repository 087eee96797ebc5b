//! The live expression graph: scalars, their length and angle refinements,
//! points, and the bound sources boxes are built on.

pub mod angle;
pub mod bounds;
pub mod length;
pub mod operand;
pub mod point;
pub mod scalar;

pub use angle::{Angle, AngleNorm};
pub use bounds::{BoundsSource, BoxBounds, CircleBounds, CornerBounds, UnionBounds};
pub use length::Length;
pub use operand::Operand;
pub use point::Point;
pub use scalar::{NaryOp, PairOp, Refinement, Scalar, UnaryOp};
