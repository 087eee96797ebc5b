//! Sources of live box bounds.
//!
//! Every box shape owns one `Rc<BoxBounds>` and builds its edge scalars on
//! top of it, so the corners, center and dimensions of a box all re-pull
//! from here on each read.

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use enum_dispatch::enum_dispatch;

use crate::errors::GeomError;
use crate::types::Bounds;

use super::length::Length;
use super::point::Point;

/// Something that can report a box's current `(north, east, south, west)`
#[enum_dispatch]
pub trait BoundsSource {
    fn bounds(&self) -> Result<Bounds, GeomError>;

    /// Short name used when rendering edge scalars for debugging
    fn label(&self) -> &'static str;
}

/// The box spanned by two opposite corner points, in either order
#[derive(Debug, Clone)]
pub struct CornerBounds {
    a: Point,
    b: Point,
}

impl CornerBounds {
    pub fn new(a: Point, b: Point) -> Self {
        CornerBounds { a, b }
    }
}

impl BoundsSource for CornerBounds {
    fn bounds(&self) -> Result<Bounds, GeomError> {
        Ok(Bounds::from_corners(self.a.coords()?, self.b.coords()?))
    }

    fn label(&self) -> &'static str {
        "corners"
    }
}

/// Bounds computed straight from a circle's center and radius
#[derive(Debug, Clone)]
pub struct CircleBounds {
    center: Point,
    radius: Length,
}

impl CircleBounds {
    pub fn new(center: Point, radius: Length) -> Self {
        CircleBounds { center, radius }
    }
}

impl BoundsSource for CircleBounds {
    fn bounds(&self) -> Result<Bounds, GeomError> {
        let (x, y) = self.center.coords()?;
        let r = self.radius.evaluate()?;
        Ok(Bounds::new(y + r, x + r, y - r, x - r))
    }

    fn label(&self) -> &'static str {
        "circle"
    }
}

/// Shared, growable member list of a union
pub type Members = Rc<RefCell<Vec<Rc<BoxBounds>>>>;

/// The envelope of any number of member boxes
#[derive(Clone, Default)]
pub struct UnionBounds {
    members: Members,
}

impl UnionBounds {
    pub fn new(members: Members) -> Self {
        UnionBounds { members }
    }

    pub fn members(&self) -> &Members {
        &self.members
    }
}

impl BoundsSource for UnionBounds {
    fn bounds(&self) -> Result<Bounds, GeomError> {
        let members = self.members.borrow();
        let mut iter = members.iter();
        let Some(first) = iter.next() else {
            crate::log::warn!("union bounds read with no members");
            return Err(GeomError::EmptyUnion);
        };
        iter.try_fold(first.bounds()?, |acc, member| Ok(acc.envelope(member.bounds()?)))
    }

    fn label(&self) -> &'static str {
        "union"
    }
}

impl fmt::Debug for UnionBounds {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UnionBounds")
            .field("members", &self.members.borrow().len())
            .finish()
    }
}

/// All bound sources a box can be built on
#[enum_dispatch(BoundsSource)]
#[derive(Debug, Clone)]
pub enum BoxBounds {
    CornerBounds,
    CircleBounds,
    UnionBounds,
}
