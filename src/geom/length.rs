//! Lengths: scalars that never resolve negative.
//!
//! Literal values are checked when they enter the graph: they must be finite
//! and non-negative. Derived lengths are built only from combinators that
//! can't produce a negative result from such operands (sum, product, mean,
//! quotient, distance, absolute difference, absolute value). The one hole is
//! a zero divisor, so a length node that resolves to NaN or infinity fails
//! when it is read.

use std::fmt;

use crate::errors::GeomError;

use super::operand::Operand;
use super::point::Point;
use super::scalar::{NaryOp, PairOp, Refinement, Scalar, UnaryOp, is_length_value};

/// A scalar node refined to be non-negative
#[derive(Clone)]
pub struct Length(Scalar);

impl Length {
    /// Create a settable length leaf
    pub fn leaf(value: f64) -> Result<Length, GeomError> {
        Length::checked_leaf(value, "Length::leaf")
    }

    fn checked_leaf(value: f64, context: &'static str) -> Result<Length, GeomError> {
        if !is_length_value(value) {
            return Err(GeomError::value_kind(
                context,
                format!("length must be finite and non-negative: {value}"),
            ));
        }
        Ok(Length(Scalar::leaf_as(Refinement::Length, value)))
    }

    /// A leaf for a constant known to be finite and non-negative
    pub(crate) fn fixed(value: f64) -> Length {
        debug_assert!(is_length_value(value));
        Length(Scalar::leaf_as(Refinement::Length, value))
    }

    /// Cast a non-negative number (new leaf) or an existing length (passed through)
    pub fn cast(value: impl Into<Operand>) -> Result<Length, GeomError> {
        Length::coerce(value.into(), "Length::cast")
    }

    pub(crate) fn coerce(value: Operand, context: &'static str) -> Result<Length, GeomError> {
        match value {
            Operand::Number(n) => Length::checked_leaf(n, context),
            Operand::Scalar(s) if s.refinement() == Refinement::Length => Ok(Length(s)),
            other => Err(GeomError::type_kind(context, "non-negative number or length", other.describe())),
        }
    }

    fn nary<I>(op: NaryOp, operands: I, context: &'static str) -> Result<Length, GeomError>
    where
        I: IntoIterator,
        I::Item: Into<Operand>,
    {
        let operands = operands
            .into_iter()
            .map(|o| Length::coerce(o.into(), context).map(Length::into_scalar))
            .collect::<Result<Vec<_>, _>>()?;
        if operands.is_empty() {
            return Err(GeomError::type_kind(context, "at least one operand", "none"));
        }
        Ok(Length(Scalar::nary(op, operands, Refinement::Length)))
    }

    /// Sum of one or more lengths
    pub fn sum<I>(operands: I) -> Result<Length, GeomError>
    where
        I: IntoIterator,
        I::Item: Into<Operand>,
    {
        Length::nary(NaryOp::Sum, operands, "Length::sum")
    }

    /// Product of one or more lengths
    pub fn product<I>(operands: I) -> Result<Length, GeomError>
    where
        I: IntoIterator,
        I::Item: Into<Operand>,
    {
        Length::nary(NaryOp::Product, operands, "Length::product")
    }

    /// Mean of one or more lengths
    pub fn mean<I>(operands: I) -> Result<Length, GeomError>
    where
        I: IntoIterator,
        I::Item: Into<Operand>,
    {
        Length::nary(NaryOp::Mean, operands, "Length::mean")
    }

    /// `a / b`; reading it fails while `b` resolves to zero
    pub fn quotient(a: impl Into<Operand>, b: impl Into<Operand>) -> Result<Length, GeomError> {
        let a = Length::coerce(a.into(), "Length::quotient")?;
        let b = Length::coerce(b.into(), "Length::quotient")?;
        Ok(Length(Scalar::pair(PairOp::Quotient, a.0, b.0, Refinement::Length)))
    }

    /// `|a - b|`
    pub fn difference(a: impl Into<Operand>, b: impl Into<Operand>) -> Result<Length, GeomError> {
        let a = Length::coerce(a.into(), "Length::difference")?;
        let b = Length::coerce(b.into(), "Length::difference")?;
        Ok(Length::abs_difference(a.0, b.0))
    }

    /// `|value|` for any scalar
    pub fn abs(value: impl Into<Operand>) -> Result<Length, GeomError> {
        let value = Scalar::coerce(value.into(), "Length::abs")?;
        Ok(Length::abs_of(value))
    }

    pub(crate) fn abs_of(value: Scalar) -> Length {
        Length(Scalar::unary(UnaryOp::Abs, value, Refinement::Length))
    }

    /// Straight-line distance between two points
    pub fn distance(from: &Point, to: &Point) -> Length {
        Length(Scalar::distance(from.clone(), to.clone()))
    }

    pub(crate) fn abs_difference(a: Scalar, b: Scalar) -> Length {
        Length(Scalar::pair(PairOp::AbsDifference, a, b, Refinement::Length))
    }

    /// Product of lengths already known to be valid
    pub(crate) fn product_of(operands: Vec<Length>) -> Length {
        let operands = operands.into_iter().map(Length::into_scalar).collect();
        Length(Scalar::nary(NaryOp::Product, operands, Refinement::Length))
    }

    pub(crate) fn sum_of(operands: Vec<Length>) -> Length {
        let operands = operands.into_iter().map(Length::into_scalar).collect();
        Length(Scalar::nary(NaryOp::Sum, operands, Refinement::Length))
    }

    pub fn evaluate(&self) -> Result<f64, GeomError> {
        self.0.evaluate()
    }

    /// Overwrite a leaf length; negative and non-finite values are rejected
    pub fn set(&self, value: f64) -> Result<(), GeomError> {
        self.0.set(value)
    }

    pub fn is_leaf(&self) -> bool {
        self.0.is_leaf()
    }

    pub fn ptr_eq(&self, other: &Length) -> bool {
        self.0.ptr_eq(&other.0)
    }

    pub fn as_scalar(&self) -> &Scalar {
        &self.0
    }

    pub fn into_scalar(self) -> Scalar {
        self.0
    }
}

impl From<Length> for Scalar {
    fn from(l: Length) -> Scalar {
        l.0
    }
}

impl fmt::Display for Length {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl fmt::Debug for Length {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Length({})", self.0)
    }
}
