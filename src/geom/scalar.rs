//! Scalar expression graph.
//!
//! A [`Scalar`] is a shared handle to a node. Leaves hold a settable `f64`;
//! every other node holds handles to its operands and a combining operation.
//! Nothing is cached: [`Scalar::evaluate`] walks the operands on every call,
//! so a read always sees the latest leaf values.
//!
//! The graph must stay acyclic. Nodes are immutable once built, and the only
//! way to reference a node is to hold a handle that already exists, so a
//! cycle can't be built through this API.

use std::cell::Cell;
use std::fmt;
use std::ops::{Add, Div, Mul, Neg, Sub};
use std::rc::Rc;

use crate::errors::GeomError;
use crate::types::Edge;

use super::angle::AngleNorm;
use super::bounds::{BoundsSource, BoxBounds};
use super::length::Length;
use super::operand::Operand;
use super::point::Point;

/// What a scalar node promises about its value
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Refinement {
    /// Any finite or non-finite `f64`
    Plain,
    /// Never negative
    Length,
    /// Degrees
    Angle,
}

impl Refinement {
    pub fn name(self) -> &'static str {
        match self {
            Refinement::Plain => "scalar",
            Refinement::Length => "length",
            Refinement::Angle => "angle",
        }
    }
}

/// Operations folding any number of operands
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NaryOp {
    /// Pairwise left-to-right sum
    Sum,
    /// Pairwise left-to-right product
    Product,
    /// Arithmetic mean
    Mean,
}

impl NaryOp {
    /// Combine resolved operand values. `values` is never empty for a built node.
    pub fn combine(self, values: &[f64]) -> f64 {
        match self {
            NaryOp::Sum => values.iter().copied().reduce(|a, b| a + b).unwrap_or(0.0),
            NaryOp::Product => values.iter().copied().reduce(|a, b| a * b).unwrap_or(1.0),
            NaryOp::Mean => {
                let total = values.iter().copied().reduce(|a, b| a + b).unwrap_or(0.0);
                total / values.len() as f64
            }
        }
    }
}

/// Operations over exactly two operands
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PairOp {
    Difference,
    /// `|a - b|`, used for lengths so the result can't go negative
    AbsDifference,
    Quotient,
}

impl PairOp {
    pub fn combine(self, a: f64, b: f64) -> f64 {
        match self {
            PairOp::Difference => a - b,
            PairOp::AbsDifference => (a - b).abs(),
            PairOp::Quotient => a / b,
        }
    }
}

/// Operations over a single operand
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnaryOp {
    Negate,
    Abs,
    Normalize(AngleNorm),
}

impl UnaryOp {
    pub fn apply(self, v: f64) -> f64 {
        match self {
            UnaryOp::Negate => -v,
            UnaryOp::Abs => v.abs(),
            UnaryOp::Normalize(norm) => norm.apply(v),
        }
    }
}

enum Expr {
    Leaf(Cell<f64>),
    Nary { op: NaryOp, operands: Vec<Scalar> },
    Pair { op: PairOp, lhs: Scalar, rhs: Scalar },
    Unary { op: UnaryOp, operand: Scalar },
    /// Euclidean distance between two points
    Distance { from: Point, to: Point },
    /// One side of a box's live bounds
    Edge { source: Rc<BoxBounds>, edge: Edge },
}

struct Node {
    refinement: Refinement,
    expr: Expr,
}

/// A shared handle to a node in the scalar graph.
///
/// Cloning the handle shares the node; use [`Scalar::ptr_eq`] for identity.
#[derive(Clone)]
pub struct Scalar(Rc<Node>);

impl Scalar {
    /// Create a settable leaf
    pub fn leaf(value: f64) -> Scalar {
        Scalar::leaf_as(Refinement::Plain, value)
    }

    pub(crate) fn leaf_as(refinement: Refinement, value: f64) -> Scalar {
        Scalar::derive(refinement, Expr::Leaf(Cell::new(value)))
    }

    fn derive(refinement: Refinement, expr: Expr) -> Scalar {
        Scalar(Rc::new(Node { refinement, expr }))
    }

    /// Cast a raw number (new leaf) or an existing scalar (passed through)
    pub fn cast(value: impl Into<Operand>) -> Result<Scalar, GeomError> {
        Scalar::coerce(value.into(), "Scalar::cast")
    }

    pub(crate) fn coerce(value: Operand, context: &'static str) -> Result<Scalar, GeomError> {
        match value {
            Operand::Number(n) => Ok(Scalar::leaf(n)),
            Operand::Scalar(s) => Ok(s),
            other => Err(GeomError::type_kind(context, "number or scalar", other.describe())),
        }
    }

    fn coerce_all<I>(operands: I, context: &'static str) -> Result<Vec<Scalar>, GeomError>
    where
        I: IntoIterator,
        I::Item: Into<Operand>,
    {
        let operands = operands
            .into_iter()
            .map(|o| Scalar::coerce(o.into(), context))
            .collect::<Result<Vec<_>, _>>()?;
        if operands.is_empty() {
            return Err(GeomError::type_kind(context, "at least one operand", "none"));
        }
        Ok(operands)
    }

    // ------------------------------------------------------------------
    // Combinators
    // ------------------------------------------------------------------

    /// Sum of one or more operands
    pub fn sum<I>(operands: I) -> Result<Scalar, GeomError>
    where
        I: IntoIterator,
        I::Item: Into<Operand>,
    {
        let operands = Scalar::coerce_all(operands, "Scalar::sum")?;
        Ok(Scalar::nary(NaryOp::Sum, operands, Refinement::Plain))
    }

    /// Product of one or more operands
    pub fn product<I>(operands: I) -> Result<Scalar, GeomError>
    where
        I: IntoIterator,
        I::Item: Into<Operand>,
    {
        let operands = Scalar::coerce_all(operands, "Scalar::product")?;
        Ok(Scalar::nary(NaryOp::Product, operands, Refinement::Plain))
    }

    /// Arithmetic mean of one or more operands
    pub fn mean<I>(operands: I) -> Result<Scalar, GeomError>
    where
        I: IntoIterator,
        I::Item: Into<Operand>,
    {
        let operands = Scalar::coerce_all(operands, "Scalar::mean")?;
        Ok(Scalar::nary(NaryOp::Mean, operands, Refinement::Plain))
    }

    /// `a - b`
    pub fn difference(a: impl Into<Operand>, b: impl Into<Operand>) -> Result<Scalar, GeomError> {
        let a = Scalar::coerce(a.into(), "Scalar::difference")?;
        let b = Scalar::coerce(b.into(), "Scalar::difference")?;
        Ok(Scalar::pair(PairOp::Difference, a, b, Refinement::Plain))
    }

    /// `a / b`
    pub fn quotient(a: impl Into<Operand>, b: impl Into<Operand>) -> Result<Scalar, GeomError> {
        let a = Scalar::coerce(a.into(), "Scalar::quotient")?;
        let b = Scalar::coerce(b.into(), "Scalar::quotient")?;
        Ok(Scalar::pair(PairOp::Quotient, a, b, Refinement::Plain))
    }

    /// `-a`
    pub fn negate(a: impl Into<Operand>) -> Result<Scalar, GeomError> {
        let a = Scalar::coerce(a.into(), "Scalar::negate")?;
        Ok(Scalar::unary(UnaryOp::Negate, a, Refinement::Plain))
    }

    /// `|a|`, which is always a length
    pub fn abs(a: impl Into<Operand>) -> Result<Length, GeomError> {
        Length::abs(a)
    }

    pub(crate) fn nary(op: NaryOp, operands: Vec<Scalar>, refinement: Refinement) -> Scalar {
        debug_assert!(!operands.is_empty());
        Scalar::derive(refinement, Expr::Nary { op, operands })
    }

    pub(crate) fn pair(op: PairOp, lhs: Scalar, rhs: Scalar, refinement: Refinement) -> Scalar {
        Scalar::derive(refinement, Expr::Pair { op, lhs, rhs })
    }

    pub(crate) fn unary(op: UnaryOp, operand: Scalar, refinement: Refinement) -> Scalar {
        Scalar::derive(refinement, Expr::Unary { op, operand })
    }

    pub(crate) fn distance(from: Point, to: Point) -> Scalar {
        Scalar::derive(Refinement::Length, Expr::Distance { from, to })
    }

    pub(crate) fn edge(source: Rc<BoxBounds>, edge: Edge) -> Scalar {
        Scalar::derive(Refinement::Plain, Expr::Edge { source, edge })
    }

    // ------------------------------------------------------------------
    // Reading and writing
    // ------------------------------------------------------------------

    /// Resolve the current value by pulling every operand
    ///
    /// A length node that resolves to anything but a finite, non-negative
    /// number (`0 / 0`, `x / 0`) fails with a value error.
    pub fn evaluate(&self) -> Result<f64, GeomError> {
        let value = match &self.0.expr {
            Expr::Leaf(v) => v.get(),
            Expr::Nary { op, operands } => {
                let values = operands
                    .iter()
                    .map(Scalar::evaluate)
                    .collect::<Result<Vec<_>, _>>()?;
                op.combine(&values)
            }
            Expr::Pair { op, lhs, rhs } => op.combine(lhs.evaluate()?, rhs.evaluate()?),
            Expr::Unary { op, operand } => op.apply(operand.evaluate()?),
            Expr::Distance { from, to } => {
                let a = from.to_vec()?;
                let b = to.to_vec()?;
                a.distance(b)
            }
            Expr::Edge { source, edge } => source.bounds()?.edge(*edge),
        };
        if self.0.refinement == Refinement::Length && !is_length_value(value) {
            return Err(GeomError::value_kind(
                "Length::evaluate",
                format!("length resolved to {value}, expected a finite non-negative number"),
            ));
        }
        Ok(value)
    }

    /// Overwrite a leaf's value.
    ///
    /// Derived nodes can't be set. A length leaf refuses negative and
    /// non-finite values.
    pub fn set(&self, value: f64) -> Result<(), GeomError> {
        let Expr::Leaf(cell) = &self.0.expr else {
            return Err(GeomError::type_kind("Scalar::set", "leaf scalar", "derived scalar"));
        };
        if self.0.refinement == Refinement::Length && !is_length_value(value) {
            return Err(GeomError::value_kind(
                "Length::set",
                format!("length must be finite and non-negative: {value}"),
            ));
        }
        cell.set(value);
        Ok(())
    }

    pub fn is_leaf(&self) -> bool {
        matches!(self.0.expr, Expr::Leaf(_))
    }

    pub fn refinement(&self) -> Refinement {
        self.0.refinement
    }

    /// True when both handles refer to the same node
    pub fn ptr_eq(&self, other: &Scalar) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }
}

fn write_joined(f: &mut fmt::Formatter<'_>, operands: &[Scalar], sep: &str) -> fmt::Result {
    for (i, operand) in operands.iter().enumerate() {
        if i > 0 {
            f.write_str(sep)?;
        }
        write!(f, "{operand}")?;
    }
    Ok(())
}

/// Mirrors the shape of the expression. Meant for debugging, not parsing.
impl fmt::Display for Scalar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.0.expr {
            Expr::Leaf(v) => write!(f, "{}", v.get()),
            Expr::Nary { op, operands } => match op {
                NaryOp::Sum => {
                    f.write_str("(")?;
                    write_joined(f, operands, " + ")?;
                    f.write_str(")")
                }
                NaryOp::Product => {
                    f.write_str("(")?;
                    write_joined(f, operands, " * ")?;
                    f.write_str(")")
                }
                NaryOp::Mean => {
                    f.write_str("mean(")?;
                    write_joined(f, operands, ", ")?;
                    f.write_str(")")
                }
            },
            Expr::Pair { op, lhs, rhs } => match op {
                PairOp::Difference => write!(f, "({lhs} - {rhs})"),
                PairOp::AbsDifference => write!(f, "|{lhs} - {rhs}|"),
                PairOp::Quotient => write!(f, "({lhs} / {rhs})"),
            },
            Expr::Unary { op, operand } => match op {
                UnaryOp::Negate => write!(f, "-{operand}"),
                UnaryOp::Abs => write!(f, "|{operand}|"),
                UnaryOp::Normalize(norm) => write!(f, "{}({operand})", norm.name()),
            },
            Expr::Distance { from, to } => write!(f, "|{from} -- {to}|"),
            Expr::Edge { source, edge } => write!(f, "{edge}({})", source.label()),
        }
    }
}

impl fmt::Debug for Scalar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Scalar<{}>({self})", self.0.refinement.name())
    }
}

/// Finite and `>= 0`; NaN fails both
pub(crate) fn is_length_value(value: f64) -> bool {
    value.is_finite() && value >= 0.0
}

// Operators build plain derived nodes over shared handles.
macro_rules! scalar_binop {
    ($trait:ident, $method:ident, $build:expr) => {
        impl $trait<&Scalar> for &Scalar {
            type Output = Scalar;
            fn $method(self, rhs: &Scalar) -> Scalar {
                $build(self.clone(), rhs.clone())
            }
        }

        impl $trait<f64> for &Scalar {
            type Output = Scalar;
            fn $method(self, rhs: f64) -> Scalar {
                $build(self.clone(), Scalar::leaf(rhs))
            }
        }
    };
}

scalar_binop!(Add, add, |a, b| Scalar::nary(NaryOp::Sum, vec![a, b], Refinement::Plain));
scalar_binop!(Mul, mul, |a, b| Scalar::nary(NaryOp::Product, vec![a, b], Refinement::Plain));
scalar_binop!(Sub, sub, |a, b| Scalar::pair(PairOp::Difference, a, b, Refinement::Plain));
scalar_binop!(Div, div, |a, b| Scalar::pair(PairOp::Quotient, a, b, Refinement::Plain));

impl Neg for &Scalar {
    type Output = Scalar;
    fn neg(self) -> Scalar {
        Scalar::unary(UnaryOp::Negate, self.clone(), Refinement::Plain)
    }
}
