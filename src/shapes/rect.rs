//! Boxes and unions of boxes.
//!
//! A [`BoxShape`] is four edge scalars over one [`BoxBounds`] source, plus
//! every corner, the center and the dimensions derived from those edges.
//! Nothing is stored as a number, so a box built over a union follows its
//! members as they move.

use std::rc::Rc;
use std::sync::OnceLock;

use crate::errors::GeomError;
use crate::geom::bounds::Members;
use crate::geom::{BoundsSource, BoxBounds, CornerBounds, Length, Operand, Point, Scalar, UnionBounds};
use crate::path::{Capabilities, Path};
use crate::registry::{Registered, Registry, RegistryBuilder, registered_attributes};
use crate::types::{Bounds, Edge};

use super::Paint;

/// An axis-aligned rectangle over a live bound source
#[derive(Debug, Clone)]
pub struct BoxShape {
    source: Rc<BoxBounds>,
    north: Scalar,
    east: Scalar,
    south: Scalar,
    west: Scalar,
    ll: Point,
    lr: Point,
    ul: Point,
    ur: Point,
    center: Point,
    width: Length,
    height: Length,
    diagonal: Length,
    perimeter: Length,
    area: Length,
    paint: Paint,
    title: Option<String>,
}

impl BoxShape {
    /// A box over `source`, centered midway between its edges
    pub fn new(source: impl Into<BoxBounds>) -> BoxShape {
        BoxShape::over(Rc::new(source.into()), None)
    }

    /// The box with opposite corners `a` and `b`, in either order
    pub fn from_corners(a: impl Into<Operand>, b: impl Into<Operand>) -> Result<BoxShape, GeomError> {
        let a = Point::coerce(a.into(), "BoxShape::from_corners")?;
        let b = Point::coerce(b.into(), "BoxShape::from_corners")?;
        Ok(BoxShape::new(CornerBounds::new(a, b)))
    }

    /// Build the derived nodes over a shared source. A `center` given here
    /// replaces the edge midpoint, for sources that know their center exactly.
    pub(crate) fn over(source: Rc<BoxBounds>, center: Option<Point>) -> BoxShape {
        let edge = |e| Scalar::edge(Rc::clone(&source), e);
        let (north, east, south, west) = (edge(Edge::North), edge(Edge::East), edge(Edge::South), edge(Edge::West));

        let corner = |x: &Scalar, y: &Scalar| Point::from_scalars(x.clone(), y.clone());
        let ll = corner(&west, &south);
        let lr = corner(&east, &south);
        let ul = corner(&west, &north);
        let ur = corner(&east, &north);
        let center = center.unwrap_or_else(|| {
            let mid = |a: &Scalar, b: &Scalar| (&(a + b)) / 2.0;
            Point::from_scalars(mid(&west, &east), mid(&south, &north))
        });

        let width = Length::abs_difference(east.clone(), west.clone());
        let height = Length::abs_difference(north.clone(), south.clone());
        let diagonal = Length::distance(&ll, &ur);
        let perimeter = Length::product_of(vec![
            Length::sum_of(vec![width.clone(), height.clone()]),
            Length::fixed(2.0),
        ]);
        let area = Length::product_of(vec![width.clone(), height.clone()]);

        BoxShape {
            source,
            north,
            east,
            south,
            west,
            ll,
            lr,
            ul,
            ur,
            center,
            width,
            height,
            diagonal,
            perimeter,
            area,
            paint: Paint::default(),
            title: None,
        }
    }

    pub fn with_paint(mut self, paint: Paint) -> Self {
        self.paint = paint;
        self
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub(crate) fn source(&self) -> &Rc<BoxBounds> {
        &self.source
    }

    /// Current `(north, east, south, west)`
    pub fn bounds(&self) -> Result<Bounds, GeomError> {
        self.source.bounds()
    }

    pub fn north(&self) -> &Scalar {
        &self.north
    }

    pub fn east(&self) -> &Scalar {
        &self.east
    }

    pub fn south(&self) -> &Scalar {
        &self.south
    }

    pub fn west(&self) -> &Scalar {
        &self.west
    }

    pub fn ll(&self) -> &Point {
        &self.ll
    }

    pub fn lr(&self) -> &Point {
        &self.lr
    }

    pub fn ul(&self) -> &Point {
        &self.ul
    }

    pub fn ur(&self) -> &Point {
        &self.ur
    }

    pub fn center(&self) -> &Point {
        &self.center
    }

    pub fn width(&self) -> &Length {
        &self.width
    }

    pub fn height(&self) -> &Length {
        &self.height
    }

    pub fn diagonal(&self) -> &Length {
        &self.diagonal
    }

    pub fn perimeter(&self) -> &Length {
        &self.perimeter
    }

    pub fn area(&self) -> &Length {
        &self.area
    }

    pub fn paint(&self) -> &Paint {
        &self.paint
    }

    pub fn get_width(&self) -> Result<f64, GeomError> {
        self.width.evaluate()
    }

    pub fn get_height(&self) -> Result<f64, GeomError> {
        self.height.evaluate()
    }

    pub fn get_area(&self) -> Result<f64, GeomError> {
        self.area.evaluate()
    }

    pub(crate) fn contains(&self, x: f64, y: f64) -> Result<bool, GeomError> {
        Ok(self.bounds()?.contains(x, y))
    }

    pub(crate) fn title_str(&self) -> Option<&str> {
        self.title.as_deref()
    }

    pub(crate) fn outline(&self, _caps: &Capabilities) -> Result<Vec<Path>, GeomError> {
        let b = self.bounds()?;
        let mut path = Path::new(&self.paint)?;
        path.move_to((b.west, b.south))?
            .line_to((b.east, b.south))?
            .line_to((b.east, b.north))?
            .line_to((b.west, b.north))?
            .close();
        Ok(vec![path])
    }
}

/// The corner, center and dimension keys of a box reached through `project`.
/// Paint is not included: a drawn box adds it, an enclosing union does not.
fn box_geometry<T: 'static>(type_name: &'static str, project: fn(&T) -> &BoxShape) -> RegistryBuilder<T> {
    RegistryBuilder::new(type_name)
        .point("ll", &["bl", "lowerleft", "sw"], move |t: &T| project(t).ll())
        .point("lr", &["br", "lowerright", "se"], move |t: &T| project(t).lr())
        .point("ul", &["tl", "upperleft", "nw"], move |t: &T| project(t).ul())
        .point("ur", &["tr", "upperright", "ne"], move |t: &T| project(t).ur())
        .point("center", &["c", "middle"], move |t: &T| project(t).center())
        .length("width", &["w"], move |t: &T| project(t).width())
        .length("height", &["h"], move |t: &T| project(t).height())
        .length("diagonal", &["diag"], move |t: &T| project(t).diagonal())
        .length("perimeter", &["perim"], move |t: &T| project(t).perimeter())
        .length("area", &[], move |t: &T| project(t).area())
}

impl Registered for BoxShape {
    fn registry() -> &'static Registry<BoxShape> {
        static REGISTRY: OnceLock<Registry<BoxShape>> = OnceLock::new();
        REGISTRY.get_or_init(|| {
            box_geometry("Box", |b: &BoxShape| b)
                .inherit(Paint::registry(), BoxShape::paint)
                .build()
                .expect("invalid box attributes")
        })
    }
}

registered_attributes!(BoxShape);

/// A box enclosing any number of member boxes.
///
/// Members are held by their bound sources, so moving a member shape moves
/// the union. Clones share the member list. The union exposes the box
/// geometry keys only; it has no stroke of its own to report.
#[derive(Debug, Clone)]
pub struct UnionBox {
    base: BoxShape,
    members: Members,
}

impl UnionBox {
    pub fn new<'a>(members: impl IntoIterator<Item = &'a BoxShape>) -> UnionBox {
        let union = UnionBox::empty();
        for member in members {
            union.add(member);
        }
        union
    }

    /// A union with no members yet; reading its bounds fails until one is added
    pub fn empty() -> UnionBox {
        let source = UnionBounds::default();
        let members = Rc::clone(source.members());
        UnionBox {
            base: BoxShape::new(source),
            members,
        }
    }

    pub fn add(&self, member: &BoxShape) {
        self.members.borrow_mut().push(Rc::clone(member.source()));
    }

    pub fn len(&self) -> usize {
        self.members.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn as_box(&self) -> &BoxShape {
        &self.base
    }
}

impl Registered for UnionBox {
    fn registry() -> &'static Registry<UnionBox> {
        static REGISTRY: OnceLock<Registry<UnionBox>> = OnceLock::new();
        REGISTRY.get_or_init(|| {
            box_geometry("UnionBox", UnionBox::as_box)
                .build()
                .expect("invalid union attributes")
        })
    }
}

registered_attributes!(UnionBox);

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::ErrorKind;
    use crate::registry::Attributes;

    fn assert_at(p: &Point, x: f64, y: f64) {
        let (px, py) = p.coords().unwrap();
        assert!(
            (px - x).abs() < 1e-10 && (py - y).abs() < 1e-10,
            "expected ({x},{y}), got ({px},{py})"
        );
    }

    #[test]
    fn corners_center_dimensions() -> Result<(), GeomError> {
        let b = BoxShape::from_corners((4.0, 3.0), (0.0, 0.0))?;
        assert_at(b.ll(), 0.0, 0.0);
        assert_at(b.lr(), 4.0, 0.0);
        assert_at(b.ul(), 0.0, 3.0);
        assert_at(b.ur(), 4.0, 3.0);
        assert_at(b.center(), 2.0, 1.5);
        assert_eq!(b.get_width()?, 4.0);
        assert_eq!(b.get_height()?, 3.0);
        assert_eq!(b.diagonal().evaluate()?, 5.0);
        assert_eq!(b.perimeter().evaluate()?, 14.0);
        assert_eq!(b.get_area()?, 12.0);
        Ok(())
    }

    #[test]
    fn box_follows_its_corner_points() -> Result<(), GeomError> {
        let a = Point::leaf(0.0, 0.0);
        let b = BoxShape::from_corners(&a, (2.0, 2.0))?;
        a.move_to(4.0, 6.0)?;
        assert_at(b.ll(), 2.0, 2.0);
        assert_at(b.ur(), 4.0, 6.0);
        assert_eq!(b.get_area()?, 8.0);
        Ok(())
    }

    #[test]
    fn box_aliases() -> Result<(), GeomError> {
        let b = BoxShape::from_corners((0.0, 0.0), (1.0, 1.0))?;
        let points = b.points();
        assert_eq!(points.keys(), vec!["ll", "lr", "ul", "ur", "center"]);
        assert!(points["sw"].ptr_eq(b.ll()));
        assert!(points["ne"].ptr_eq(b.ur()));
        assert!(points["middle"].ptr_eq(b.center()));
        assert!(b.lengths()["w"].ptr_eq(b.width()));
        assert!(b.lengths()["linewidth"].ptr_eq(b.paint().stroke_width()));
        assert_eq!(
            b.lengths().keys(),
            vec!["width", "height", "diagonal", "perimeter", "area", "stroke_width"]
        );
        Ok(())
    }

    #[test]
    fn hittest_is_inclusive() -> Result<(), GeomError> {
        let b = BoxShape::from_corners((0.0, 0.0), (2.0, 1.0))?;
        assert!(b.contains(0.0, 0.0)?);
        assert!(b.contains(2.0, 1.0)?);
        assert!(b.contains(1.0, 0.5)?);
        assert!(!b.contains(2.01, 0.5)?);
        Ok(())
    }

    #[test]
    fn union_envelope_tracks_members() -> Result<(), GeomError> {
        let corner = Point::leaf(1.0, 1.0);
        let a = BoxShape::from_corners((0.0, 0.0), &corner)?;
        let b = BoxShape::from_corners((2.0, 0.0), (3.0, 1.0))?;
        let union = UnionBox::new([&a, &b]);
        assert_eq!(union.as_box().bounds()?, Bounds::new(1.0, 3.0, 0.0, 0.0));

        corner.move_to(-1.0, 5.0)?;
        assert_eq!(union.as_box().bounds()?, Bounds::new(5.0, 3.0, 0.0, -1.0));
        assert_at(union.as_box().ul(), -1.0, 5.0);
        Ok(())
    }

    #[test]
    fn empty_union_fails_on_read() -> Result<(), GeomError> {
        let union = UnionBox::empty();
        assert!(union.is_empty());
        assert_eq!(union.as_box().get_width().unwrap_err().kind(), ErrorKind::EmptyUnion);
        assert_eq!(union.points()["ll"].coords().unwrap_err(), GeomError::EmptyUnion);

        union.add(&BoxShape::from_corners((0.0, 0.0), (1.0, 2.0))?);
        assert_eq!(union.len(), 1);
        assert_eq!(union.as_box().get_height()?, 2.0);
        Ok(())
    }

    #[test]
    fn union_inherits_box_attributes() {
        let union = UnionBox::empty();
        assert_eq!(union.type_name(), "UnionBox");
        assert!(union.points()["tr"].ptr_eq(union.as_box().ur()));
        assert!(union.lengths()["w"].ptr_eq(union.as_box().width()));
        assert_eq!(union.points().len(), 5);
    }

    #[test]
    fn union_has_no_paint_keys() {
        let union = UnionBox::empty();
        assert_eq!(
            union.length_keys(),
            vec!["width", "height", "diagonal", "perimeter", "area"]
        );
        for key in ["stroke_width", "sw", "linewidth"] {
            assert_eq!(union.get_length(key).unwrap_err().kind(), ErrorKind::KeyNotFound);
        }
    }
}
