//! The tagged union accepted at every cast boundary.
//!
//! `Scalar::cast`, `Length::cast`, `Angle::cast` and `Point::cast` all take
//! `impl Into<Operand>` and match on the variant, so a caller can pass a raw
//! number, an existing node, or a coordinate pair without picking a
//! constructor up front. Anything that doesn't fit the target fails with a
//! `Type` error naming what was received.

use super::angle::Angle;
use super::length::Length;
use super::point::Point;
use super::scalar::Scalar;

/// Anything a cast might be handed
#[derive(Debug, Clone)]
pub enum Operand {
    Number(f64),
    /// An existing scalar node of any refinement (plain, length or angle)
    Scalar(Scalar),
    Point(Point),
    /// A sequence of raw numbers, e.g. a coordinate pair
    Sequence(Vec<f64>),
    Text(String),
}

impl Operand {
    /// Short description of the operand for error messages
    pub fn describe(&self) -> String {
        match self {
            Operand::Number(n) => format!("number {n}"),
            Operand::Scalar(s) => format!("{} {}", s.refinement().name(), s),
            Operand::Point(p) => format!("point {p}"),
            Operand::Sequence(v) => format!("sequence of {} numbers", v.len()),
            Operand::Text(s) => format!("text {s:?}"),
        }
    }
}

impl From<f64> for Operand {
    fn from(v: f64) -> Self {
        Operand::Number(v)
    }
}

impl From<i32> for Operand {
    fn from(v: i32) -> Self {
        Operand::Number(f64::from(v))
    }
}

impl From<Scalar> for Operand {
    fn from(v: Scalar) -> Self {
        Operand::Scalar(v)
    }
}

impl From<&Scalar> for Operand {
    fn from(v: &Scalar) -> Self {
        Operand::Scalar(v.clone())
    }
}

impl From<Length> for Operand {
    fn from(v: Length) -> Self {
        Operand::Scalar(v.into_scalar())
    }
}

impl From<&Length> for Operand {
    fn from(v: &Length) -> Self {
        Operand::Scalar(v.as_scalar().clone())
    }
}

impl From<Angle> for Operand {
    fn from(v: Angle) -> Self {
        Operand::Scalar(v.into_scalar())
    }
}

impl From<&Angle> for Operand {
    fn from(v: &Angle) -> Self {
        Operand::Scalar(v.as_scalar().clone())
    }
}

impl From<Point> for Operand {
    fn from(v: Point) -> Self {
        Operand::Point(v)
    }
}

impl From<&Point> for Operand {
    fn from(v: &Point) -> Self {
        Operand::Point(v.clone())
    }
}

impl From<(f64, f64)> for Operand {
    fn from((x, y): (f64, f64)) -> Self {
        Operand::Sequence(vec![x, y])
    }
}

impl From<[f64; 2]> for Operand {
    fn from(v: [f64; 2]) -> Self {
        Operand::Sequence(v.to_vec())
    }
}

impl From<Vec<f64>> for Operand {
    fn from(v: Vec<f64>) -> Self {
        Operand::Sequence(v)
    }
}

impl From<&[f64]> for Operand {
    fn from(v: &[f64]) -> Self {
        Operand::Sequence(v.to_vec())
    }
}

impl From<&str> for Operand {
    fn from(v: &str) -> Self {
        Operand::Text(v.to_string())
    }
}

impl From<String> for Operand {
    fn from(v: String) -> Self {
        Operand::Text(v)
    }
}
