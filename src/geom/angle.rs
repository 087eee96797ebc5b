//! Angles in degrees, and the normalizing wrappers over them.

use std::f64::consts::PI;
use std::fmt;

use crate::errors::GeomError;

use super::operand::Operand;
use super::scalar::{NaryOp, PairOp, Refinement, Scalar, UnaryOp};

pub const RADS_PER_DEG: f64 = PI / 180.0;

/// How a normalized angle folds its inner value on each read
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AngleNorm {
    /// Closed range `[0, 360]`; 360 stays 360
    Reduced,
    /// Half-open range `[0, 360)`; 360 becomes 0
    Strict,
    /// Closed range `[-180, 180]`
    Symmetric,
    /// Reduce, fold into `[0, 90]`, then `90 - value`
    Complementary,
    /// Reduce, fold into `[0, 180]`, then `180 - value`
    Supplementary,
    /// Reduce, then `360 - value`
    Reflex,
}

/// Shift `angle` by whole turns until it lies in `[lo, lo + 360]`.
///
/// Same result as stepping by 360 in a loop (first up while below `lo`, then
/// down while above `lo + 360`), including at both closed ends.
fn wrap_closed(angle: f64, lo: f64) -> f64 {
    let hi = lo + 360.0;
    if angle < lo {
        angle + 360.0 * ((lo - angle) / 360.0).ceil()
    } else if angle > hi {
        angle - 360.0 * ((angle - hi) / 360.0).ceil()
    } else {
        angle
    }
}

/// Subtract `step` until `angle <= step`
fn fold_down(angle: f64, step: f64) -> f64 {
    if angle > step {
        angle - step * ((angle - step) / step).ceil()
    } else {
        angle
    }
}

impl AngleNorm {
    pub fn apply(self, degrees: f64) -> f64 {
        match self {
            AngleNorm::Reduced => wrap_closed(degrees, 0.0),
            AngleNorm::Strict => {
                let angle = wrap_closed(degrees, 0.0);
                if angle == 360.0 { 0.0 } else { angle }
            }
            AngleNorm::Symmetric => wrap_closed(degrees, -180.0),
            AngleNorm::Complementary => 90.0 - fold_down(wrap_closed(degrees, 0.0), 90.0),
            AngleNorm::Supplementary => 180.0 - fold_down(wrap_closed(degrees, 0.0), 180.0),
            AngleNorm::Reflex => 360.0 - wrap_closed(degrees, 0.0),
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            AngleNorm::Reduced => "reduced",
            AngleNorm::Strict => "strict",
            AngleNorm::Symmetric => "symmetric",
            AngleNorm::Complementary => "complementary",
            AngleNorm::Supplementary => "supplementary",
            AngleNorm::Reflex => "reflex",
        }
    }
}

/// A scalar interpreted as degrees
#[derive(Clone)]
pub struct Angle(Scalar);

impl Angle {
    pub fn leaf(degrees: f64) -> Angle {
        Angle(Scalar::leaf_as(Refinement::Angle, degrees))
    }

    /// Cast a raw number (new leaf) or an existing angle (passed through)
    pub fn cast(value: impl Into<Operand>) -> Result<Angle, GeomError> {
        Angle::coerce(value.into(), "Angle::cast")
    }

    pub(crate) fn coerce(value: Operand, context: &'static str) -> Result<Angle, GeomError> {
        match value {
            Operand::Number(n) => Ok(Angle::leaf(n)),
            Operand::Scalar(s) if s.refinement() == Refinement::Angle => Ok(Angle(s)),
            other => Err(GeomError::type_kind(context, "number or angle", other.describe())),
        }
    }

    fn nary<I>(op: NaryOp, operands: I, context: &'static str) -> Result<Angle, GeomError>
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
        Ok(Angle(Scalar::nary(op, operands, Refinement::Angle)))
    }

    pub fn sum<I>(operands: I) -> Result<Angle, GeomError>
    where
        I: IntoIterator,
        I::Item: Into<Operand>,
    {
        Angle::nary(NaryOp::Sum, operands, "Angle::sum")
    }

    pub fn product<I>(operands: I) -> Result<Angle, GeomError>
    where
        I: IntoIterator,
        I::Item: Into<Operand>,
    {
        Angle::nary(NaryOp::Product, operands, "Angle::product")
    }

    pub fn mean<I>(operands: I) -> Result<Angle, GeomError>
    where
        I: IntoIterator,
        I::Item: Into<Operand>,
    {
        Angle::nary(NaryOp::Mean, operands, "Angle::mean")
    }

    pub fn difference(a: impl Into<Operand>, b: impl Into<Operand>) -> Result<Angle, GeomError> {
        let a = Scalar::coerce(a.into(), "Angle::difference")?;
        let b = Scalar::coerce(b.into(), "Angle::difference")?;
        Ok(Angle(Scalar::pair(PairOp::Difference, a, b, Refinement::Angle)))
    }

    pub fn quotient(a: impl Into<Operand>, b: impl Into<Operand>) -> Result<Angle, GeomError> {
        let a = Scalar::coerce(a.into(), "Angle::quotient")?;
        let b = Scalar::coerce(b.into(), "Angle::quotient")?;
        Ok(Angle(Scalar::pair(PairOp::Quotient, a, b, Refinement::Angle)))
    }

    /// Wrap an angle so every read folds it with `norm`
    pub fn normalized(value: impl Into<Operand>, norm: AngleNorm) -> Result<Angle, GeomError> {
        let inner = Angle::coerce(value.into(), norm.name())?;
        Ok(Angle(Scalar::unary(UnaryOp::Normalize(norm), inner.0, Refinement::Angle)))
    }

    pub fn reduced(value: impl Into<Operand>) -> Result<Angle, GeomError> {
        Angle::normalized(value, AngleNorm::Reduced)
    }

    pub fn strict(value: impl Into<Operand>) -> Result<Angle, GeomError> {
        Angle::normalized(value, AngleNorm::Strict)
    }

    pub fn symmetric(value: impl Into<Operand>) -> Result<Angle, GeomError> {
        Angle::normalized(value, AngleNorm::Symmetric)
    }

    pub fn complementary(value: impl Into<Operand>) -> Result<Angle, GeomError> {
        Angle::normalized(value, AngleNorm::Complementary)
    }

    pub fn supplementary(value: impl Into<Operand>) -> Result<Angle, GeomError> {
        Angle::normalized(value, AngleNorm::Supplementary)
    }

    pub fn reflex(value: impl Into<Operand>) -> Result<Angle, GeomError> {
        Angle::normalized(value, AngleNorm::Reflex)
    }

    /// The same angle in radians, as a live plain scalar
    pub fn radians(&self) -> Scalar {
        Scalar::nary(
            NaryOp::Product,
            vec![self.0.clone(), Scalar::leaf(RADS_PER_DEG)],
            Refinement::Plain,
        )
    }

    pub fn get_radians(&self) -> Result<f64, GeomError> {
        self.radians().evaluate()
    }

    pub fn evaluate(&self) -> Result<f64, GeomError> {
        self.0.evaluate()
    }

    pub fn set(&self, degrees: f64) -> Result<(), GeomError> {
        self.0.set(degrees)
    }

    pub fn as_scalar(&self) -> &Scalar {
        &self.0
    }

    pub fn into_scalar(self) -> Scalar {
        self.0
    }
}

impl From<Angle> for Scalar {
    fn from(a: Angle) -> Scalar {
        a.0
    }
}

impl fmt::Display for Angle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl fmt::Debug for Angle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Angle({})", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::ErrorKind;

    fn eval(angle: Result<Angle, GeomError>) -> f64 {
        angle.and_then(|a| a.evaluate()).unwrap()
    }

    #[test]
    fn reduced_boundaries() {
        assert_eq!(eval(Angle::reduced(370)), 10.0);
        assert_eq!(eval(Angle::reduced(360)), 360.0);
        assert_eq!(eval(Angle::reduced(720)), 360.0);
        assert_eq!(eval(Angle::reduced(-360)), 0.0);
        assert_eq!(eval(Angle::reduced(-10)), 350.0);
        assert_eq!(eval(Angle::reduced(0)), 0.0);
    }

    #[test]
    fn strict_collapses_full_turn() {
        assert_eq!(eval(Angle::strict(360)), 0.0);
        assert_eq!(eval(Angle::strict(720)), 0.0);
        assert_eq!(eval(Angle::strict(359.5)), 359.5);
    }

    #[test]
    fn symmetric_boundaries() {
        assert_eq!(eval(Angle::symmetric(270)), -90.0);
        assert_eq!(eval(Angle::symmetric(180)), 180.0);
        assert_eq!(eval(Angle::symmetric(-180)), -180.0);
        assert_eq!(eval(Angle::symmetric(-190)), 170.0);
    }

    #[test]
    fn complementary_angles() {
        assert_eq!(eval(Angle::complementary(0)), 90.0);
        assert_eq!(eval(Angle::complementary(10)), 80.0);
        assert_eq!(eval(Angle::complementary(80)), 10.0);
        assert_eq!(eval(Angle::complementary(90)), 0.0);
        assert_eq!(eval(Angle::complementary(-10)), 10.0);
        assert_eq!(eval(Angle::complementary(200)), 70.0);
        assert_eq!(eval(Angle::complementary(500)), 40.0);
        assert_eq!(eval(Angle::complementary(-200)), 20.0);
    }

    #[test]
    fn supplementary_angles() {
        assert_eq!(eval(Angle::supplementary(0)), 180.0);
        assert_eq!(eval(Angle::supplementary(10)), 170.0);
        assert_eq!(eval(Angle::supplementary(170)), 10.0);
        assert_eq!(eval(Angle::supplementary(180)), 0.0);
        assert_eq!(eval(Angle::supplementary(360)), 0.0);
        assert_eq!(eval(Angle::supplementary(270)), 90.0);
        assert_eq!(eval(Angle::supplementary(400)), 140.0);
        assert_eq!(eval(Angle::supplementary(500)), 40.0);
        assert_eq!(eval(Angle::supplementary(-180)), 0.0);
        assert_eq!(eval(Angle::supplementary(-170)), 170.0);
        assert_eq!(eval(Angle::supplementary(-270)), 90.0);
        assert_eq!(eval(Angle::supplementary(-300)), 120.0);
    }

    #[test]
    fn reflex_angles() {
        assert_eq!(eval(Angle::reflex(0)), 360.0);
        assert_eq!(eval(Angle::reflex(360)), 0.0);
        assert_eq!(eval(Angle::reflex(180)), 180.0);
        assert_eq!(eval(Angle::reflex(-180)), 180.0);
        assert_eq!(eval(Angle::reflex(90)), 270.0);
        assert_eq!(eval(Angle::reflex(80)), 280.0);
        assert_eq!(eval(Angle::reflex(-90)), 90.0);
        assert_eq!(eval(Angle::reflex(400)), 320.0);
        assert_eq!(eval(Angle::reflex(500)), 220.0);
        assert_eq!(eval(Angle::reflex(720)), 0.0);
        assert_eq!(eval(Angle::reflex(-360)), 360.0);
        assert_eq!(eval(Angle::reflex(-200)), 200.0);
        assert_eq!(eval(Angle::reflex(-400)), 40.0);
    }

    #[test]
    fn normalization_follows_inner_angle() -> Result<(), GeomError> {
        let inner = Angle::leaf(10.0);
        let reduced = Angle::reduced(&inner)?;
        assert_eq!(reduced.evaluate()?, 10.0);
        inner.set(-30.0)?;
        assert_eq!(reduced.evaluate()?, 330.0);
        Ok(())
    }

    #[test]
    fn sum_angle() -> Result<(), GeomError> {
        assert_eq!(Angle::sum([15, 12])?.evaluate()?, 27.0);
        assert_eq!(Angle::sum([15, 12, -17])?.evaluate()?, 10.0);
        let nested = Angle::sum([Scalar::sum([10, 10])?, Angle::sum([10, 15])?.into_scalar()])?;
        assert!((nested.get_radians()? - PI / 4.0).abs() < 1e-12);
        Ok(())
    }

    #[test]
    fn cast_rejects_plain_scalars() {
        let plain = Scalar::leaf(3.0);
        assert_eq!(Angle::cast(&plain).unwrap_err().kind(), ErrorKind::Type);
        assert_eq!(Angle::reduced("ninety").unwrap_err().kind(), ErrorKind::Type);
    }

    #[test]
    fn display_names_the_fold() -> Result<(), GeomError> {
        insta::assert_snapshot!(Angle::reflex(Angle::sum([30, 15])?)?, @"reflex((30 + 15))");
        Ok(())
    }
}
