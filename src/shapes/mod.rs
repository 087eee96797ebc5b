//! Shape types
//!
//! Each shape owns the leaf nodes it was built from and the derived nodes
//! its attributes resolve to, and knows how to:
//! - Test whether a point falls inside it
//! - Hand out its (live) bounding box
//! - Render itself to resolved paths
//!
//! Cloning a shape shares its nodes: moving a point of the clone moves the
//! original too.

use enum_dispatch::enum_dispatch;

use crate::errors::GeomError;
use crate::geom::{Length, Point};
use crate::path::{Capabilities, Path};
use crate::registry::{Attributes, Lengths, Points};

mod circle;
mod paint;
mod rect;
mod xform;

pub use circle::Circle;
pub use paint::Paint;
pub use rect::{BoxShape, UnionBox};
pub use xform::{Group, Mapping, Transform};

/// Common behavior for all shapes
#[enum_dispatch]
pub trait Shape: Attributes {
    /// Whether `(x, y)` is inside the shape, boundary included
    fn hittest(&self, x: f64, y: f64) -> Result<bool, GeomError>;

    /// The live bounding box
    fn boundingbox(&self) -> &BoxShape;

    /// Resolve the shape to paths, using only what `caps` allows
    fn render(&self, caps: &Capabilities) -> Result<Vec<Path>, GeomError>;

    fn title(&self) -> Option<&str>;
}

impl Shape for Circle {
    fn hittest(&self, x: f64, y: f64) -> Result<bool, GeomError> {
        self.contains(x, y)
    }

    fn boundingbox(&self) -> &BoxShape {
        self.bbox()
    }

    fn render(&self, caps: &Capabilities) -> Result<Vec<Path>, GeomError> {
        self.outline(caps)
    }

    fn title(&self) -> Option<&str> {
        self.title_str()
    }
}

impl Shape for BoxShape {
    fn hittest(&self, x: f64, y: f64) -> Result<bool, GeomError> {
        self.contains(x, y)
    }

    /// A box is its own bounding box
    fn boundingbox(&self) -> &BoxShape {
        self
    }

    fn render(&self, caps: &Capabilities) -> Result<Vec<Path>, GeomError> {
        self.outline(caps)
    }

    fn title(&self) -> Option<&str> {
        self.title_str()
    }
}

impl Shape for UnionBox {
    fn hittest(&self, x: f64, y: f64) -> Result<bool, GeomError> {
        self.as_box().contains(x, y)
    }

    fn boundingbox(&self) -> &BoxShape {
        self.as_box()
    }

    fn render(&self, caps: &Capabilities) -> Result<Vec<Path>, GeomError> {
        self.as_box().outline(caps)
    }

    fn title(&self) -> Option<&str> {
        self.as_box().title_str()
    }
}

// ============================================================================
// Shape Enum
// ============================================================================

/// A shape enum wrapping all shape types
///
/// This provides uniform storage for groups and writers while each variant
/// keeps its own attribute registry.
#[enum_dispatch(Shape)]
#[derive(Debug, Clone)]
pub enum ShapeEnum {
    Circle(Circle),
    Box(BoxShape),
    Union(UnionBox),
    Group(Group),
    Transform(Transform),
}

impl ShapeEnum {
    fn inner(&self) -> &dyn Attributes {
        match self {
            ShapeEnum::Circle(s) => s,
            ShapeEnum::Box(s) => s,
            ShapeEnum::Union(s) => s,
            ShapeEnum::Group(s) => s,
            ShapeEnum::Transform(s) => s,
        }
    }
}

impl Attributes for ShapeEnum {
    fn type_name(&self) -> &'static str {
        self.inner().type_name()
    }

    fn get_point(&self, key: &str) -> Result<&Point, GeomError> {
        self.inner().get_point(key)
    }

    fn point_keys(&self) -> Vec<&'static str> {
        self.inner().point_keys()
    }

    fn canonical_point_key(&self, key: &str) -> Option<&'static str> {
        self.inner().canonical_point_key(key)
    }

    fn get_length(&self, key: &str) -> Result<&Length, GeomError> {
        self.inner().get_length(key)
    }

    fn length_keys(&self) -> Vec<&'static str> {
        self.inner().length_keys()
    }

    fn canonical_length_key(&self, key: &str) -> Option<&'static str> {
        self.inner().canonical_length_key(key)
    }

    fn points(&self) -> Points<'_> {
        Points::new(self)
    }

    fn lengths(&self) -> Lengths<'_> {
        Lengths::new(self)
    }
}
