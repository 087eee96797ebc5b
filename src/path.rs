//! Render output.
//!
//! A [`Path`] is a snapshot: every coordinate in it was resolved when the
//! command was pushed, so later edits to the graph never reach a path that
//! has already been built.

use crate::errors::GeomError;
use crate::geom::{Angle, Length, Operand, Point, Scalar};
use crate::shapes::Paint;
use crate::types::Color;

/// Which primitives a consumer of rendered paths understands
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Capabilities {
    /// Native circle commands; otherwise circles arrive as closed arcs
    pub circles: bool,
    /// Nested translated sub-paths; otherwise coordinates are mapped eagerly
    pub translated_paths: bool,
}

impl Capabilities {
    pub fn all() -> Self {
        Capabilities {
            circles: true,
            translated_paths: true,
        }
    }
}

/// Uniform scale followed by a translation: `p * scale + (dx, dy)`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Affine {
    pub scale: f64,
    pub dx: f64,
    pub dy: f64,
}

impl Affine {
    pub const IDENTITY: Affine = Affine {
        scale: 1.0,
        dx: 0.0,
        dy: 0.0,
    };

    pub fn translation(dx: f64, dy: f64) -> Self {
        Affine { scale: 1.0, dx, dy }
    }

    pub fn apply(&self, x: f64, y: f64) -> (f64, f64) {
        (x * self.scale + self.dx, y * self.scale + self.dy)
    }

    /// `self` applied after `inner`
    pub fn then(&self, inner: Affine) -> Affine {
        Affine {
            scale: self.scale * inner.scale,
            dx: inner.dx * self.scale + self.dx,
            dy: inner.dy * self.scale + self.dy,
        }
    }
}

/// One resolved drawing command
#[derive(Debug, Clone, PartialEq)]
pub enum PathCommand {
    MoveTo { x: f64, y: f64 },
    LineTo { x: f64, y: f64 },
    MoveBy { dx: f64, dy: f64 },
    LineBy { dx: f64, dy: f64 },
    /// Angles in degrees, counter-clockwise from east
    Arc {
        cx: f64,
        cy: f64,
        r: f64,
        start: f64,
        stop: f64,
        ccw: bool,
    },
    Circle { cx: f64, cy: f64, r: f64 },
    ClosePath,
    /// Commands drawn in a coordinate system shifted by `(dx, dy)`
    Translated {
        dx: f64,
        dy: f64,
        commands: Vec<PathCommand>,
    },
}

impl PathCommand {
    /// Push this command, mapped through `affine`, onto `out`.
    /// Nested translated blocks are flattened.
    pub fn map_into(&self, affine: Affine, out: &mut Vec<PathCommand>) {
        let s = affine.scale;
        match *self {
            PathCommand::MoveTo { x, y } => {
                let (x, y) = affine.apply(x, y);
                out.push(PathCommand::MoveTo { x, y });
            }
            PathCommand::LineTo { x, y } => {
                let (x, y) = affine.apply(x, y);
                out.push(PathCommand::LineTo { x, y });
            }
            PathCommand::MoveBy { dx, dy } => out.push(PathCommand::MoveBy { dx: dx * s, dy: dy * s }),
            PathCommand::LineBy { dx, dy } => out.push(PathCommand::LineBy { dx: dx * s, dy: dy * s }),
            PathCommand::Arc {
                cx,
                cy,
                r,
                start,
                stop,
                ccw,
            } => {
                let (cx, cy) = affine.apply(cx, cy);
                // a negative scale is a half turn
                let turn = if s < 0.0 { 180.0 } else { 0.0 };
                out.push(PathCommand::Arc {
                    cx,
                    cy,
                    r: r * s.abs(),
                    start: start + turn,
                    stop: stop + turn,
                    ccw,
                });
            }
            PathCommand::Circle { cx, cy, r } => {
                let (cx, cy) = affine.apply(cx, cy);
                out.push(PathCommand::Circle { cx, cy, r: r * s.abs() });
            }
            PathCommand::ClosePath => out.push(PathCommand::ClosePath),
            PathCommand::Translated { dx, dy, ref commands } => {
                let inner = affine.then(Affine::translation(dx, dy));
                for command in commands {
                    command.map_into(inner, out);
                }
            }
        }
    }
}

/// An ordered list of commands drawn with one paint
#[derive(Debug, Clone, PartialEq)]
pub struct Path {
    stroke: Option<Color>,
    fill: Option<Color>,
    stroke_width: f64,
    commands: Vec<PathCommand>,
}

impl Path {
    /// An empty path taking its colors and resolved stroke width from `paint`
    pub fn new(paint: &Paint) -> Result<Path, GeomError> {
        Ok(Path {
            stroke: paint.stroke(),
            fill: paint.fill(),
            stroke_width: paint.stroke_width().evaluate()?,
            commands: Vec::new(),
        })
    }

    pub fn stroke(&self) -> Option<Color> {
        self.stroke
    }

    pub fn fill(&self) -> Option<Color> {
        self.fill
    }

    pub fn stroke_width(&self) -> f64 {
        self.stroke_width
    }

    pub fn commands(&self) -> &[PathCommand] {
        &self.commands
    }

    pub fn len(&self) -> usize {
        self.commands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    pub fn push(&mut self, command: PathCommand) -> &mut Self {
        self.commands.push(command);
        self
    }

    pub fn move_to(&mut self, to: impl Into<Operand>) -> Result<&mut Self, GeomError> {
        let (x, y) = Point::coerce(to.into(), "Path::move_to")?.coords()?;
        Ok(self.push(PathCommand::MoveTo { x, y }))
    }

    pub fn line_to(&mut self, to: impl Into<Operand>) -> Result<&mut Self, GeomError> {
        let (x, y) = Point::coerce(to.into(), "Path::line_to")?.coords()?;
        Ok(self.push(PathCommand::LineTo { x, y }))
    }

    pub fn move_by(&mut self, dx: impl Into<Operand>, dy: impl Into<Operand>) -> Result<&mut Self, GeomError> {
        let dx = Scalar::coerce(dx.into(), "Path::move_by")?.evaluate()?;
        let dy = Scalar::coerce(dy.into(), "Path::move_by")?.evaluate()?;
        Ok(self.push(PathCommand::MoveBy { dx, dy }))
    }

    pub fn line_by(&mut self, dx: impl Into<Operand>, dy: impl Into<Operand>) -> Result<&mut Self, GeomError> {
        let dx = Scalar::coerce(dx.into(), "Path::line_by")?.evaluate()?;
        let dy = Scalar::coerce(dy.into(), "Path::line_by")?.evaluate()?;
        Ok(self.push(PathCommand::LineBy { dx, dy }))
    }

    /// Arc around `center` from `start` to `stop` degrees
    pub fn arc(
        &mut self,
        center: impl Into<Operand>,
        radius: impl Into<Operand>,
        start: impl Into<Operand>,
        stop: impl Into<Operand>,
        ccw: bool,
    ) -> Result<&mut Self, GeomError> {
        let (cx, cy) = Point::coerce(center.into(), "Path::arc")?.coords()?;
        let r = Length::coerce(radius.into(), "Path::arc")?.evaluate()?;
        let start = Angle::coerce(start.into(), "Path::arc")?.evaluate()?;
        let stop = Angle::coerce(stop.into(), "Path::arc")?.evaluate()?;
        Ok(self.push(PathCommand::Arc {
            cx,
            cy,
            r,
            start,
            stop,
            ccw,
        }))
    }

    pub fn circle(&mut self, center: impl Into<Operand>, radius: impl Into<Operand>) -> Result<&mut Self, GeomError> {
        let (cx, cy) = Point::coerce(center.into(), "Path::circle")?.coords()?;
        let r = Length::coerce(radius.into(), "Path::circle")?.evaluate()?;
        Ok(self.push(PathCommand::Circle { cx, cy, r }))
    }

    pub fn close(&mut self) -> &mut Self {
        self.push(PathCommand::ClosePath)
    }

    /// The same path with its commands nested in one translated block
    pub fn translated(&self, dx: f64, dy: f64) -> Path {
        Path {
            commands: vec![PathCommand::Translated {
                dx,
                dy,
                commands: self.commands.clone(),
            }],
            ..self.clone()
        }
    }

    /// The same path with every coordinate mapped through `affine`
    pub fn mapped(&self, affine: Affine) -> Path {
        let mut commands = Vec::with_capacity(self.commands.len());
        for command in &self.commands {
            command.map_into(affine, &mut commands);
        }
        Path {
            stroke: self.stroke,
            fill: self.fill,
            stroke_width: self.stroke_width,
            commands,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::ErrorKind;

    fn path() -> Path {
        Path::new(&Paint::default()).unwrap()
    }

    #[test]
    fn builder_resolves_at_push_time() -> Result<(), GeomError> {
        let p = Point::leaf(1.0, 2.0);
        let mut path = path();
        path.move_to(&p)?.line_to((4.0, 6.0))?.line_by(-1, 0)?.close();
        p.move_to(100.0, 100.0)?;
        assert_eq!(
            path.commands(),
            &[
                PathCommand::MoveTo { x: 1.0, y: 2.0 },
                PathCommand::LineTo { x: 4.0, y: 6.0 },
                PathCommand::LineBy { dx: -1.0, dy: 0.0 },
                PathCommand::ClosePath,
            ]
        );
        Ok(())
    }

    #[test]
    fn paint_is_copied_into_path() {
        let p = path();
        assert_eq!(p.stroke(), Some(Color::BLACK));
        assert_eq!(p.fill(), None);
        assert_eq!(p.stroke_width(), 1.0);
        assert!(p.is_empty());
    }

    #[test]
    fn arc_rejects_negative_radius() {
        let err = path().arc((0.0, 0.0), -1, 0, 360, true).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Value);
    }

    #[test]
    fn arc_rejects_non_point_center() {
        let err = path().circle("here", 1).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Type);
    }

    #[test]
    fn mapped_flattens_translated_blocks() -> Result<(), GeomError> {
        let mut inner = path();
        inner.move_to((1.0, 1.0))?.circle((0.0, 0.0), 2)?;
        let nested = inner.translated(10.0, 0.0);
        let flat = nested.mapped(Affine {
            scale: 2.0,
            dx: 0.0,
            dy: 5.0,
        });
        assert_eq!(
            flat.commands(),
            &[
                PathCommand::MoveTo { x: 22.0, y: 7.0 },
                PathCommand::Circle {
                    cx: 20.0,
                    cy: 5.0,
                    r: 4.0
                },
            ]
        );
        Ok(())
    }

    #[test]
    fn negative_scale_turns_arcs() {
        let mut out = Vec::new();
        PathCommand::Arc {
            cx: 1.0,
            cy: 0.0,
            r: 1.0,
            start: 0.0,
            stop: 90.0,
            ccw: true,
        }
        .map_into(
            Affine {
                scale: -1.0,
                dx: 0.0,
                dy: 0.0,
            },
            &mut out,
        );
        assert_eq!(
            out,
            vec![PathCommand::Arc {
                cx: -1.0,
                cy: 0.0,
                r: 1.0,
                start: 180.0,
                stop: 270.0,
                ccw: true,
            }]
        );
    }

    #[test]
    fn affine_composition() {
        let outer = Affine {
            scale: 2.0,
            dx: 1.0,
            dy: 1.0,
        };
        let composed = outer.then(Affine::translation(3.0, -1.0));
        assert_eq!(composed.apply(0.0, 0.0), outer.apply(3.0, -1.0));
        assert_eq!(Affine::IDENTITY.apply(4.0, 5.0), (4.0, 5.0));
    }
}
