use std::f64::consts::{PI, TAU};
use std::rc::Rc;
use std::sync::OnceLock;

use glam::dvec2;

use crate::errors::GeomError;
use crate::geom::{CircleBounds, Length, Operand, Point};
use crate::path::{Capabilities, Path};
use crate::registry::{Registered, Registry, RegistryBuilder, registered_attributes};

use super::{BoxShape, Paint};

/// A circle given by a live center point and a radius leaf
#[derive(Debug, Clone)]
pub struct Circle {
    center: Point,
    radius: Length,
    north: Point,
    south: Point,
    east: Point,
    west: Point,
    diameter: Length,
    circumference: Length,
    area: Length,
    bbox: BoxShape,
    paint: Paint,
    title: Option<String>,
}

impl Circle {
    /// `center` casts like any point; `radius` must be a positive number
    pub fn new(center: impl Into<Operand>, radius: impl Into<Operand>) -> Result<Circle, GeomError> {
        let center = Point::coerce(center.into(), "Circle::new")?;
        let radius = match radius.into() {
            Operand::Number(r) if r > 0.0 && r.is_finite() => Length::fixed(r),
            Operand::Number(r) => {
                return Err(GeomError::value_kind(
                    "Circle::new",
                    format!("radius must be finite and greater than zero: {r}"),
                ));
            }
            other => return Err(GeomError::type_kind("Circle::new", "positive number", other.describe())),
        };

        let (x, y) = (center.x(), center.y());
        let r = radius.as_scalar();
        let north = Point::from_scalars(x.clone(), y + r);
        let south = Point::from_scalars(x.clone(), y - r);
        let east = Point::from_scalars(x + r, y.clone());
        let west = Point::from_scalars(x - r, y.clone());

        let diameter = Length::product_of(vec![radius.clone(), Length::fixed(2.0)]);
        let circumference = Length::product_of(vec![radius.clone(), Length::fixed(TAU)]);
        let area = Length::product_of(vec![
            Length::fixed(PI),
            Length::product_of(vec![radius.clone(), radius.clone()]),
        ]);

        let bounds = Rc::new(CircleBounds::new(center.clone(), radius.clone()).into());
        let bbox = BoxShape::over(bounds, Some(center.clone()));

        Ok(Circle {
            center,
            radius,
            north,
            south,
            east,
            west,
            diameter,
            circumference,
            area,
            bbox,
            paint: Paint::default(),
            title: None,
        })
    }

    pub fn with_paint(mut self, paint: Paint) -> Self {
        self.paint = paint;
        self
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn center(&self) -> &Point {
        &self.center
    }

    /// The radius leaf; setting it re-derives every dependent attribute
    pub fn radius(&self) -> &Length {
        &self.radius
    }

    pub fn north(&self) -> &Point {
        &self.north
    }

    pub fn south(&self) -> &Point {
        &self.south
    }

    pub fn east(&self) -> &Point {
        &self.east
    }

    pub fn west(&self) -> &Point {
        &self.west
    }

    pub fn diameter(&self) -> &Length {
        &self.diameter
    }

    pub fn circumference(&self) -> &Length {
        &self.circumference
    }

    pub fn area(&self) -> &Length {
        &self.area
    }

    pub fn paint(&self) -> &Paint {
        &self.paint
    }

    pub fn get_radius(&self) -> Result<f64, GeomError> {
        self.radius.evaluate()
    }

    pub fn get_diameter(&self) -> Result<f64, GeomError> {
        self.diameter.evaluate()
    }

    pub fn get_circumference(&self) -> Result<f64, GeomError> {
        self.circumference.evaluate()
    }

    pub fn get_area(&self) -> Result<f64, GeomError> {
        self.area.evaluate()
    }

    pub(crate) fn bbox(&self) -> &BoxShape {
        &self.bbox
    }

    pub(crate) fn title_str(&self) -> Option<&str> {
        self.title.as_deref()
    }

    /// Inclusive disc test
    pub(crate) fn contains(&self, x: f64, y: f64) -> Result<bool, GeomError> {
        let r = self.radius.evaluate()?;
        Ok(self.center.to_vec()?.distance_squared(dvec2(x, y)) <= r * r)
    }

    pub(crate) fn outline(&self, caps: &Capabilities) -> Result<Vec<Path>, GeomError> {
        let mut path = Path::new(&self.paint)?;
        if caps.circles {
            path.circle(&self.center, &self.radius)?;
        } else {
            path.arc(&self.center, &self.radius, 0, 360, true)?.close();
        }
        Ok(vec![path])
    }
}

impl Registered for Circle {
    fn registry() -> &'static Registry<Circle> {
        static REGISTRY: OnceLock<Registry<Circle>> = OnceLock::new();
        REGISTRY.get_or_init(|| {
            RegistryBuilder::new("Circle")
                .point("center", &["c"], Circle::center)
                .point("north", &["n", "up", "u"], Circle::north)
                .point("south", &["s", "down", "d"], Circle::south)
                .point("east", &["e", "right", "r"], Circle::east)
                .point("west", &["w", "left", "l"], Circle::west)
                .length("radius", &["r"], Circle::radius)
                .length("diameter", &["d", "diam"], Circle::diameter)
                .length("circumference", &["c", "circum", "perim", "perimeter"], Circle::circumference)
                .length("area", &[], Circle::area)
                .inherit(Paint::registry(), Circle::paint)
                .build()
                .expect("invalid circle attributes")
        })
    }
}

registered_attributes!(Circle);

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::ErrorKind;
    use crate::path::PathCommand;
    use crate::registry::Attributes;

    #[test]
    fn radius_must_be_a_positive_number() {
        assert_eq!(Circle::new(0, 0).unwrap_err().kind(), ErrorKind::Value);
        assert_eq!(Circle::new(0, -3.0).unwrap_err().kind(), ErrorKind::Value);
        assert_eq!(Circle::new(0, f64::INFINITY).unwrap_err().kind(), ErrorKind::Value);
        assert_eq!(Circle::new(0, "big").unwrap_err().kind(), ErrorKind::Type);
        let r = Length::leaf(1.0).unwrap();
        assert_eq!(Circle::new(0, &r).unwrap_err().kind(), ErrorKind::Type);
        assert_eq!(Circle::new("here", 1).unwrap_err().kind(), ErrorKind::Type);
    }

    #[test]
    fn cardinal_points() -> Result<(), GeomError> {
        let c = Circle::new((3.0, 4.0), 7)?;
        assert!(c.north().is_at(3.0, 11.0)?);
        assert!(c.south().is_at(3.0, -3.0)?);
        assert!(c.east().is_at(10.0, 4.0)?);
        assert!(c.west().is_at(-4.0, 4.0)?);
        Ok(())
    }

    #[test]
    fn radius_drives_every_length() -> Result<(), GeomError> {
        let c = Circle::new((3.0, 4.0), 7)?;
        assert_eq!(c.get_diameter()?, 14.0);
        assert_eq!(c.get_area()?, 49.0 * PI);

        c.radius().set(3.0)?;
        assert!(c.north().is_at(3.0, 7.0)?);
        assert_eq!(c.get_diameter()?, 6.0);
        assert_eq!(c.get_circumference()?, 3.0 * TAU);
        assert_eq!(c.get_area()?, 9.0 * PI);
        assert_eq!(c.bbox().get_width()?, 6.0);
        Ok(())
    }

    #[test]
    fn bounding_box_is_live() -> Result<(), GeomError> {
        let c = Circle::new((3.0, 4.0), 7)?;
        assert_eq!(c.bbox().get_area()?, 196.0);
        assert!(c.bbox().center().ptr_eq(c.center()));
        c.center().move_to(0.0, 0.0)?;
        assert!(c.bbox().ll().is_at(-7.0, -7.0)?);
        Ok(())
    }

    #[test]
    fn disc_hittest_is_inclusive() -> Result<(), GeomError> {
        let c = Circle::new(0, 1)?;
        assert!(c.contains(1.0, 0.0)?);
        assert!(c.contains(0.0, -1.0)?);
        assert!(!c.contains(0.9, 0.9)?);
        Ok(())
    }

    #[test]
    fn key_sets() -> Result<(), GeomError> {
        let c = Circle::new((5.0, 7.0), 3)?;
        assert_eq!(c.points().keys(), vec!["center", "north", "south", "east", "west"]);
        assert_eq!(
            c.lengths().keys(),
            vec!["radius", "diameter", "circumference", "area", "stroke_width"]
        );
        assert!(c.points()["c"].ptr_eq(c.points().get("center")?));
        assert!(c.lengths()["r"].ptr_eq(c.radius()));
        assert_eq!(c.lengths().get("nope").unwrap_err().kind(), ErrorKind::KeyNotFound);
        Ok(())
    }

    #[test]
    fn outline_respects_capabilities() -> Result<(), GeomError> {
        let c = Circle::new((1.0, 2.0), 3)?;
        let native = c.outline(&Capabilities::all())?;
        assert_eq!(
            native[0].commands(),
            &[PathCommand::Circle {
                cx: 1.0,
                cy: 2.0,
                r: 3.0
            }]
        );

        let fallback = c.outline(&Capabilities::default())?;
        assert_eq!(
            fallback[0].commands(),
            &[
                PathCommand::Arc {
                    cx: 1.0,
                    cy: 2.0,
                    r: 3.0,
                    start: 0.0,
                    stop: 360.0,
                    ccw: true,
                },
                PathCommand::ClosePath,
            ]
        );
        Ok(())
    }
}
