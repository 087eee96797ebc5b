//! Points: pairs of scalar nodes.
//!
//! There is deliberately no `PartialEq`. Two distinct point graphs can
//! resolve to the same coordinates at one moment and different ones the
//! next, so the only comparison offered is [`Point::is_at`] against the
//! current resolved position. Identity is [`Point::ptr_eq`].

use std::fmt;
use std::rc::Rc;

use glam::{DVec2, dvec2};

use crate::errors::GeomError;

use super::length::Length;
use super::operand::Operand;
use super::scalar::{NaryOp, PairOp, Refinement, Scalar};

struct PointNode {
    x: Scalar,
    y: Scalar,
    leaf: bool,
}

/// A shared handle to a point node
#[derive(Clone)]
pub struct Point(Rc<PointNode>);

impl Point {
    /// Create a movable point
    pub fn leaf(x: f64, y: f64) -> Point {
        Point(Rc::new(PointNode {
            x: Scalar::leaf(x),
            y: Scalar::leaf(y),
            leaf: true,
        }))
    }

    /// A new movable point at `(0, 0)`
    pub fn origin() -> Point {
        Point::leaf(0.0, 0.0)
    }

    /// A point whose coordinates are the given (usually derived) scalars
    pub fn from_scalars(x: Scalar, y: Scalar) -> Point {
        Point(Rc::new(PointNode { x, y, leaf: false }))
    }

    /// Cast a point (passed through), a two-number sequence (new leaf) or
    /// the literal `0` (a new leaf at the origin)
    pub fn cast(value: impl Into<Operand>) -> Result<Point, GeomError> {
        Point::coerce(value.into(), "Point::cast")
    }

    pub(crate) fn coerce(value: Operand, context: &'static str) -> Result<Point, GeomError> {
        match value {
            Operand::Point(p) => Ok(p),
            Operand::Sequence(coords) if coords.len() == 2 => Ok(Point::leaf(coords[0], coords[1])),
            Operand::Number(n) if n == 0.0 => Ok(Point::origin()),
            other => Err(GeomError::type_kind(
                context,
                "point, coordinate pair or 0",
                other.describe(),
            )),
        }
    }

    pub fn x(&self) -> &Scalar {
        &self.0.x
    }

    pub fn y(&self) -> &Scalar {
        &self.0.y
    }

    pub fn get_x(&self) -> Result<f64, GeomError> {
        self.0.x.evaluate()
    }

    pub fn get_y(&self) -> Result<f64, GeomError> {
        self.0.y.evaluate()
    }

    /// Current `(x, y)`
    pub fn coords(&self) -> Result<(f64, f64), GeomError> {
        Ok((self.get_x()?, self.get_y()?))
    }

    pub fn to_vec(&self) -> Result<DVec2, GeomError> {
        Ok(dvec2(self.get_x()?, self.get_y()?))
    }

    /// Whether the point currently resolves to exactly `(x, y)`
    pub fn is_at(&self, x: f64, y: f64) -> Result<bool, GeomError> {
        Ok(self.get_x()? == x && self.get_y()? == y)
    }

    pub fn is_leaf(&self) -> bool {
        self.0.leaf
    }

    pub fn ptr_eq(&self, other: &Point) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }

    fn require_leaf(&self, context: &'static str) -> Result<(), GeomError> {
        if self.0.leaf {
            Ok(())
        } else {
            Err(GeomError::type_kind(context, "leaf point", "derived point"))
        }
    }

    /// Move a leaf point to `(x, y)`. To move along one axis only, set
    /// [`x`](Point::x) or [`y`](Point::y) directly.
    pub fn move_to(&self, x: f64, y: f64) -> Result<(), GeomError> {
        self.require_leaf("Point::move_to")?;
        self.0.x.set(x)?;
        self.0.y.set(y)
    }

    /// Move a leaf point by `(dx, dy)` relative to where it is now
    pub fn move_by(&self, dx: f64, dy: f64) -> Result<(), GeomError> {
        self.require_leaf("Point::move_by")?;
        let (x, y) = self.coords()?;
        self.0.x.set(x + dx)?;
        self.0.y.set(y + dy)
    }

    /// A new leaf point at this point's current location
    pub fn fix(&self) -> Result<Point, GeomError> {
        let (x, y) = self.coords()?;
        Ok(Point::leaf(x, y))
    }

    /// A point that stays `(dx, dy)` away from this one
    pub fn translate(&self, dx: impl Into<Operand>, dy: impl Into<Operand>) -> Result<Point, GeomError> {
        let dx = Scalar::coerce(dx.into(), "Point::translate")?;
        let dy = Scalar::coerce(dy.into(), "Point::translate")?;
        Ok(self.translated_by(&dx, &dy))
    }

    pub(crate) fn translated_by(&self, dx: &Scalar, dy: &Scalar) -> Point {
        let sum = |a: &Scalar, b: &Scalar| Scalar::nary(NaryOp::Sum, vec![a.clone(), b.clone()], Refinement::Plain);
        Point::from_scalars(sum(self.x(), dx), sum(self.y(), dy))
    }

    /// This point scaled by `scale` about `origin`: `origin + (self - origin) * scale`
    pub fn dilate(&self, scale: impl Into<Operand>, origin: impl Into<Operand>) -> Result<Point, GeomError> {
        let scale = Scalar::coerce(scale.into(), "Point::dilate")?;
        let origin = Point::coerce(origin.into(), "Point::dilate")?;
        Ok(self.dilated_by(&scale, &origin))
    }

    pub(crate) fn dilated_by(&self, scale: &Scalar, origin: &Point) -> Point {
        let axis = |base: &Scalar, about: &Scalar| {
            let offset = Scalar::pair(PairOp::Difference, base.clone(), about.clone(), Refinement::Plain);
            let scaled = Scalar::nary(NaryOp::Product, vec![offset, scale.clone()], Refinement::Plain);
            Scalar::nary(NaryOp::Sum, vec![about.clone(), scaled], Refinement::Plain)
        };
        Point::from_scalars(axis(self.x(), origin.x()), axis(self.y(), origin.y()))
    }

    /// Live distance to another point (`0` casts to the origin)
    pub fn distance(&self, to: impl Into<Operand>) -> Result<Length, GeomError> {
        let to = Point::coerce(to.into(), "Point::distance")?;
        Ok(Length::distance(self, &to))
    }
}

/// The current coordinates, `(?,?)` if they can't be resolved
impl fmt::Display for Point {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.coords() {
            Ok((x, y)) => write!(f, "({x},{y})"),
            Err(_) => f.write_str("(?,?)"),
        }
    }
}

impl fmt::Debug for Point {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Point({}, {})", self.0.x, self.0.y)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::ErrorKind;

    #[test]
    fn cast_variants() -> Result<(), GeomError> {
        let p = Point::leaf(1.0, 2.0);
        assert!(Point::cast(&p)?.ptr_eq(&p));
        assert!(Point::cast((3.0, 4.0))?.is_at(3.0, 4.0)?);
        assert!(Point::cast(vec![5.0, 6.0])?.is_at(5.0, 6.0)?);
        assert!(Point::cast(0)?.is_at(0.0, 0.0)?);
        Ok(())
    }

    #[test]
    fn cast_failures_are_type_errors() {
        assert_eq!(Point::cast("origin").unwrap_err().kind(), ErrorKind::Type);
        assert_eq!(Point::cast(1.0).unwrap_err().kind(), ErrorKind::Type);
        assert_eq!(Point::cast(vec![1.0, 2.0, 3.0]).unwrap_err().kind(), ErrorKind::Type);
        assert_eq!(Point::cast(Scalar::leaf(0.0)).unwrap_err().kind(), ErrorKind::Type);
    }

    #[test]
    fn translate_follows_base() -> Result<(), GeomError> {
        let base = Point::leaf(1.0, 1.0);
        let dx = Scalar::leaf(2.0);
        let moved = base.translate(&dx, -1)?;
        assert!(moved.is_at(3.0, 0.0)?);

        base.move_to(10.0, 10.0)?;
        assert!(moved.is_at(12.0, 9.0)?);

        dx.set(0.0)?;
        assert!(moved.is_at(10.0, 9.0)?);
        Ok(())
    }

    #[test]
    fn dilate_about_origin_and_point() -> Result<(), GeomError> {
        let p = Point::leaf(2.0, 3.0);
        assert!(p.dilate(2, 0)?.is_at(4.0, 6.0)?);
        assert!(p.dilate(2, (1.0, 1.0))?.is_at(3.0, 5.0)?);
        assert!(p.dilate(-1, (1.0, 1.0))?.is_at(0.0, -1.0)?);
        Ok(())
    }

    #[test]
    fn distance_defaults_to_origin() -> Result<(), GeomError> {
        let p = Point::leaf(3.0, 4.0);
        let d = p.distance(0)?;
        assert_eq!(d.evaluate()?, 5.0);
        p.move_by(3.0, 4.0)?;
        assert_eq!(d.evaluate()?, 10.0);
        Ok(())
    }

    #[test]
    fn derived_points_cannot_move() -> Result<(), GeomError> {
        let p = Point::leaf(0.0, 0.0).translate(1, 1)?;
        assert_eq!(p.move_to(5.0, 5.0).unwrap_err().kind(), ErrorKind::Type);
        assert_eq!(p.move_by(5.0, 5.0).unwrap_err().kind(), ErrorKind::Type);
        assert_eq!(p.x().set(5.0).unwrap_err().kind(), ErrorKind::Type);
        Ok(())
    }

    #[test]
    fn single_axis_moves_go_through_the_axis_nodes() -> Result<(), GeomError> {
        let p = Point::leaf(1.0, 2.0);
        let above = p.translate(0, 1)?;

        p.x().set(7.0)?;
        assert!(p.is_at(7.0, 2.0)?);
        p.y().set(-4.0)?;
        assert!(p.is_at(7.0, -4.0)?);
        assert!(above.is_at(7.0, -3.0)?);
        Ok(())
    }

    #[test]
    fn fix_snapshots_current_location() -> Result<(), GeomError> {
        let base = Point::leaf(1.0, 2.0);
        let derived = base.translate(1, 1)?;
        let fixed = derived.fix()?;
        base.move_to(0.0, 0.0)?;
        assert!(fixed.is_at(2.0, 3.0)?);
        assert!(derived.is_at(1.0, 1.0)?);
        assert!(fixed.is_leaf());
        Ok(())
    }

    #[test]
    fn is_at_is_a_point_in_time_comparison() -> Result<(), GeomError> {
        let a = Point::leaf(1.0, 1.0);
        let b = Point::leaf(1.0, 1.0);
        assert!(a.is_at(b.get_x()?, b.get_y()?)?);
        b.move_by(0.5, 0.0)?;
        assert!(!a.is_at(b.get_x()?, b.get_y()?)?);
        assert!(!a.ptr_eq(&b));
        Ok(())
    }

    #[test]
    fn display_shows_resolved_coords() {
        insta::assert_snapshot!(Point::leaf(3.0, -1.5), @"(3,-1.5)");
    }
}
