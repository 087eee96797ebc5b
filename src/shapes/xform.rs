//! Coordinate mappings and the shapes that apply them.
//!
//! A [`Transform`] wraps one child and re-exposes every point and length of
//! the child, mapped into the parent's coordinates. A [`Group`] holds one
//! transform per child under a shared mapping, and its bounding box is the
//! live union of the transformed children.

use std::sync::OnceLock;

use crate::errors::GeomError;
use crate::geom::{Length, Operand, Point, Scalar};
use crate::path::{Affine, Capabilities, Path};
use crate::registry::{Attributes, Lengths, Points, Registered, Registry, RegistryBuilder, registered_attributes};

use super::{BoxShape, Shape, ShapeEnum, UnionBox};

/// How local coordinates map to the parent's
#[derive(Debug, Clone)]
pub enum Mapping {
    /// `local + (dx, dy)`
    Translation { dx: Scalar, dy: Scalar },
    /// `origin + (local - origin) * scale`
    Dilation { scale: Scalar, origin: Point },
}

impl Mapping {
    pub fn translation(dx: impl Into<Operand>, dy: impl Into<Operand>) -> Result<Mapping, GeomError> {
        Ok(Mapping::Translation {
            dx: Scalar::coerce(dx.into(), "Mapping::translation")?,
            dy: Scalar::coerce(dy.into(), "Mapping::translation")?,
        })
    }

    pub fn dilation(scale: impl Into<Operand>, origin: impl Into<Operand>) -> Result<Mapping, GeomError> {
        Ok(Mapping::Dilation {
            scale: Scalar::coerce(scale.into(), "Mapping::dilation")?,
            origin: Point::coerce(origin.into(), "Mapping::dilation")?,
        })
    }

    /// A translation by `(0, 0)`
    pub fn identity() -> Mapping {
        Mapping::Translation {
            dx: Scalar::leaf(0.0),
            dy: Scalar::leaf(0.0),
        }
    }

    /// A live node for `p` in parent coordinates
    pub fn point_to_global(&self, p: &Point) -> Point {
        match self {
            Mapping::Translation { dx, dy } => p.translated_by(dx, dy),
            Mapping::Dilation { scale, origin } => p.dilated_by(scale, origin),
        }
    }

    /// A live node for `l` in parent coordinates. Translations leave lengths
    /// alone, so the child's own node comes back.
    pub fn length_to_global(&self, l: &Length) -> Length {
        match self {
            Mapping::Translation { .. } => l.clone(),
            Mapping::Dilation { scale, .. } => Length::abs_of(l.as_scalar() * scale),
        }
    }

    /// Map a resolved parent-space position back into local coordinates
    pub fn to_local(&self, x: f64, y: f64) -> Result<(f64, f64), GeomError> {
        match self {
            Mapping::Translation { dx, dy } => Ok((x - dx.evaluate()?, y - dy.evaluate()?)),
            Mapping::Dilation { scale, origin } => {
                let s = scale.evaluate()?;
                let (ox, oy) = origin.coords()?;
                Ok((ox + (x - ox) / s, oy + (y - oy) / s))
            }
        }
    }

    /// The current mapping as a resolved affine
    pub fn snapshot(&self) -> Result<Affine, GeomError> {
        match self {
            Mapping::Translation { dx, dy } => Ok(Affine::translation(dx.evaluate()?, dy.evaluate()?)),
            Mapping::Dilation { scale, origin } => {
                let s = scale.evaluate()?;
                let (ox, oy) = origin.coords()?;
                Ok(Affine {
                    scale: s,
                    dx: ox * (1.0 - s),
                    dy: oy * (1.0 - s),
                })
            }
        }
    }
}

// ============================================================================
// Transform
// ============================================================================

/// One child shape seen through a [`Mapping`]
#[derive(Debug, Clone)]
pub struct Transform {
    mapping: Mapping,
    child: Box<ShapeEnum>,
    points: Vec<(&'static str, Point)>,
    lengths: Vec<(&'static str, Length)>,
    bbox: BoxShape,
}

impl Transform {
    pub fn new(mapping: Mapping, child: impl Into<ShapeEnum>) -> Result<Transform, GeomError> {
        let child = child.into();
        let points = child
            .point_keys()
            .into_iter()
            .map(|key| Ok((key, mapping.point_to_global(child.get_point(key)?))))
            .collect::<Result<Vec<_>, GeomError>>()?;
        let lengths = child
            .length_keys()
            .into_iter()
            .map(|key| Ok((key, mapping.length_to_global(child.get_length(key)?))))
            .collect::<Result<Vec<_>, GeomError>>()?;

        let local = child.boundingbox();
        let bbox = BoxShape::from_corners(mapping.point_to_global(local.ll()), mapping.point_to_global(local.ur()))?;

        Ok(Transform {
            mapping,
            child: Box::new(child),
            points,
            lengths,
            bbox,
        })
    }

    pub fn mapping(&self) -> &Mapping {
        &self.mapping
    }

    pub fn child(&self) -> &ShapeEnum {
        &self.child
    }

    fn missing(&self, attribute: &'static str, key: &str) -> GeomError {
        GeomError::KeyNotFound {
            attribute,
            key: key.to_string(),
            owner: "Transform",
        }
    }
}

/// The child's key set, mapped; aliases resolve through the child
impl Attributes for Transform {
    fn type_name(&self) -> &'static str {
        "Transform"
    }

    fn get_point(&self, key: &str) -> Result<&Point, GeomError> {
        let canonical = self.canonical_point_key(key).ok_or_else(|| self.missing("point", key))?;
        self.points
            .iter()
            .find(|(k, _)| *k == canonical)
            .map(|(_, p)| p)
            .ok_or_else(|| self.missing("point", key))
    }

    fn point_keys(&self) -> Vec<&'static str> {
        self.points.iter().map(|(k, _)| *k).collect()
    }

    fn canonical_point_key(&self, key: &str) -> Option<&'static str> {
        self.child.canonical_point_key(key)
    }

    fn get_length(&self, key: &str) -> Result<&Length, GeomError> {
        let canonical = self.canonical_length_key(key).ok_or_else(|| self.missing("length", key))?;
        self.lengths
            .iter()
            .find(|(k, _)| *k == canonical)
            .map(|(_, l)| l)
            .ok_or_else(|| self.missing("length", key))
    }

    fn length_keys(&self) -> Vec<&'static str> {
        self.lengths.iter().map(|(k, _)| *k).collect()
    }

    fn canonical_length_key(&self, key: &str) -> Option<&'static str> {
        self.child.canonical_length_key(key)
    }

    fn points(&self) -> Points<'_> {
        Points::new(self)
    }

    fn lengths(&self) -> Lengths<'_> {
        Lengths::new(self)
    }
}

impl Shape for Transform {
    fn hittest(&self, x: f64, y: f64) -> Result<bool, GeomError> {
        let (x, y) = self.mapping.to_local(x, y)?;
        self.child.hittest(x, y)
    }

    fn boundingbox(&self) -> &BoxShape {
        &self.bbox
    }

    fn render(&self, caps: &Capabilities) -> Result<Vec<Path>, GeomError> {
        let paths = self.child.render(caps)?;
        if let Mapping::Translation { dx, dy } = &self.mapping {
            if caps.translated_paths {
                let (dx, dy) = (dx.evaluate()?, dy.evaluate()?);
                return Ok(paths.iter().map(|p| p.translated(dx, dy)).collect());
            }
        }
        let affine = self.mapping.snapshot()?;
        Ok(paths.iter().map(|p| p.mapped(affine)).collect())
    }

    fn title(&self) -> Option<&str> {
        self.child.title()
    }
}

// ============================================================================
// Group
// ============================================================================

/// Any number of children under one mapping
#[derive(Debug)]
pub struct Group {
    mapping: Mapping,
    children: Vec<Transform>,
    union: UnionBox,
    title: Option<String>,
}

impl Group {
    pub fn new<I>(mapping: Mapping, children: I) -> Result<Group, GeomError>
    where
        I: IntoIterator,
        I::Item: Into<ShapeEnum>,
    {
        let mut group = Group {
            mapping,
            children: Vec::new(),
            union: UnionBox::empty(),
            title: None,
        };
        for child in children {
            group.add(child)?;
        }
        Ok(group)
    }

    /// Children placed as-is
    pub fn of<I>(children: I) -> Result<Group, GeomError>
    where
        I: IntoIterator,
        I::Item: Into<ShapeEnum>,
    {
        Group::new(Mapping::identity(), children)
    }

    /// Children shifted by `(dx, dy)`
    pub fn translation<I>(dx: impl Into<Operand>, dy: impl Into<Operand>, children: I) -> Result<Group, GeomError>
    where
        I: IntoIterator,
        I::Item: Into<ShapeEnum>,
    {
        Group::new(Mapping::translation(dx, dy)?, children)
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    /// Wrap `child` in this group's mapping and fold it into the union
    pub fn add(&mut self, child: impl Into<ShapeEnum>) -> Result<&Transform, GeomError> {
        let transform = Transform::new(self.mapping.clone(), child)?;
        self.union.add(transform.boundingbox());
        crate::log::debug!(
            child = transform.child().type_name(),
            children = self.children.len() + 1,
            "added group child"
        );
        self.children.push(transform);
        Ok(&self.children[self.children.len() - 1])
    }

    pub fn mapping(&self) -> &Mapping {
        &self.mapping
    }

    pub fn children(&self) -> &[Transform] {
        &self.children
    }

    pub fn len(&self) -> usize {
        self.children.len()
    }

    pub fn is_empty(&self) -> bool {
        self.children.is_empty()
    }

    pub fn union(&self) -> &UnionBox {
        &self.union
    }
}

/// Children share nodes with the original; the union is rebuilt so adding to
/// one group never grows the other.
impl Clone for Group {
    fn clone(&self) -> Self {
        let union = UnionBox::new(self.children.iter().map(Transform::boundingbox));
        Group {
            mapping: self.mapping.clone(),
            children: self.children.clone(),
            union,
            title: self.title.clone(),
        }
    }
}

impl Registered for Group {
    fn registry() -> &'static Registry<Group> {
        static REGISTRY: OnceLock<Registry<Group>> = OnceLock::new();
        REGISTRY.get_or_init(|| {
            RegistryBuilder::new("Group")
                .inherit(UnionBox::registry(), Group::union)
                .build()
                .expect("invalid group attributes")
        })
    }
}

registered_attributes!(Group);

impl Shape for Group {
    fn hittest(&self, x: f64, y: f64) -> Result<bool, GeomError> {
        for child in &self.children {
            if child.hittest(x, y)? {
                return Ok(true);
            }
        }
        Ok(false)
    }

    fn boundingbox(&self) -> &BoxShape {
        self.union.as_box()
    }

    fn render(&self, caps: &Capabilities) -> Result<Vec<Path>, GeomError> {
        let mut paths = Vec::new();
        for child in &self.children {
            paths.extend(child.render(caps)?);
        }
        Ok(paths)
    }

    fn title(&self) -> Option<&str> {
        self.title.as_deref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::ErrorKind;
    use crate::path::PathCommand;
    use crate::shapes::Circle;

    #[test]
    fn translation_follows_child_and_offsets() -> Result<(), GeomError> {
        let c = Circle::new((1.0, 1.0), 1)?;
        let dx = Scalar::leaf(5.0);
        let t = Transform::new(Mapping::translation(&dx, -2)?, c.clone())?;
        assert!(t.get_point("center")?.is_at(6.0, -1.0)?);

        c.center().move_to(0.0, 0.0)?;
        assert!(t.get_point("c")?.is_at(5.0, -2.0)?);

        dx.set(0.0)?;
        assert!(t.points()["north"].is_at(0.0, -1.0)?);
        Ok(())
    }

    #[test]
    fn translated_lengths_are_the_child_nodes() -> Result<(), GeomError> {
        let c = Circle::new(0, 2)?;
        let t = Transform::new(Mapping::translation(3, 3)?, c.clone())?;
        assert!(t.lengths()["r"].ptr_eq(c.radius()));
        assert_eq!(t.length_keys(), c.length_keys());
        assert_eq!(t.point_keys(), c.point_keys());
        Ok(())
    }

    #[test]
    fn aliases_share_mapped_nodes() -> Result<(), GeomError> {
        let t = Transform::new(Mapping::identity(), Circle::new(0, 1)?)?;
        for alias in ["n", "up", "u"] {
            assert!(t.points()[alias].ptr_eq(t.get_point("north")?));
        }
        assert_eq!(t.get_point("nowhere").unwrap_err().kind(), ErrorKind::KeyNotFound);
        Ok(())
    }

    #[test]
    fn dilation_scales_points_and_lengths() -> Result<(), GeomError> {
        let c = Circle::new((2.0, 0.0), 1)?;
        let t = Transform::new(Mapping::dilation(3, (1.0, 0.0))?, c)?;
        assert!(t.get_point("center")?.is_at(4.0, 0.0)?);
        assert_eq!(t.get_length("radius")?.evaluate()?, 3.0);
        assert_eq!(t.boundingbox().get_width()?, 6.0);

        assert!(t.hittest(6.5, 0.0)?);
        assert!(!t.hittest(7.5, 0.0)?);
        assert_eq!(t.mapping().to_local(4.0, 0.0)?, (2.0, 0.0));
        Ok(())
    }

    #[test]
    fn render_nests_or_maps() -> Result<(), GeomError> {
        let t = Transform::new(Mapping::translation(10, 0)?, Circle::new(0, 1)?)?;
        let caps = Capabilities::all();
        let nested = t.render(&caps)?;
        assert!(matches!(
            nested[0].commands(),
            [PathCommand::Translated { dx, dy, .. }] if *dx == 10.0 && *dy == 0.0
        ));

        let flat = t.render(&Capabilities {
            circles: true,
            translated_paths: false,
        })?;
        assert_eq!(
            flat[0].commands(),
            &[PathCommand::Circle {
                cx: 10.0,
                cy: 0.0,
                r: 1.0
            }]
        );
        Ok(())
    }

    #[test]
    fn group_add_grows_union() -> Result<(), GeomError> {
        let mut g = Group::of([Circle::new(0, 1)?])?;
        assert_eq!(g.boundingbox().get_width()?, 2.0);

        let added = g.add(Circle::new((4.0, 0.0), 1)?)?;
        assert!(added.get_point("center")?.is_at(4.0, 0.0)?);
        assert_eq!(g.len(), 2);
        assert_eq!(g.boundingbox().get_width()?, 6.0);
        assert!(g.points()["ur"].is_at(5.0, 1.0)?);
        Ok(())
    }

    #[test]
    fn group_reports_geometry_but_no_stroke() -> Result<(), GeomError> {
        let g = Group::of([Circle::new(0, 1)?])?;
        assert_eq!(g.length_keys(), vec!["width", "height", "diagonal", "perimeter", "area"]);
        assert_eq!(g.get_length("sw").unwrap_err().kind(), ErrorKind::KeyNotFound);
        // a child still carries its own
        assert_eq!(g.children()[0].get_length("linewidth")?.evaluate()?, 1.0);
        Ok(())
    }

    #[test]
    fn empty_group_has_no_bounds() -> Result<(), GeomError> {
        let g = Group::of(Vec::<ShapeEnum>::new())?;
        assert!(g.is_empty());
        assert_eq!(g.boundingbox().get_height().unwrap_err(), GeomError::EmptyUnion);
        assert!(!g.hittest(0.0, 0.0)?);
        Ok(())
    }

    #[test]
    fn clone_gets_its_own_union() -> Result<(), GeomError> {
        let mut g = Group::of([Circle::new(0, 1)?])?;
        let copy = g.clone();
        g.add(Circle::new((10.0, 0.0), 1)?)?;
        assert_eq!(g.boundingbox().get_width()?, 12.0);
        assert_eq!(copy.boundingbox().get_width()?, 2.0);
        assert_eq!(copy.union().len(), 1);
        Ok(())
    }

    #[test]
    fn translated_group_offsets_children() -> Result<(), GeomError> {
        let c = Circle::new(0, 1)?;
        let g = Group::translation(2, 3, [c.clone()])?.with_title("shifted");
        assert!(g.children()[0].get_point("center")?.is_at(2.0, 3.0)?);
        assert!(g.hittest(2.0, 3.5)?);
        assert!(!g.hittest(0.0, 0.0)?);
        assert_eq!(g.title(), Some("shifted"));
        assert_eq!(g.points()["center"].coords()?, (2.0, 3.0));
        Ok(())
    }
}
