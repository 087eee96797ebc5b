//! Encapsulated PostScript output.
//!
//! Each shape is rendered at write time, so the file captures the graph as
//! it resolves at that moment.

use std::fmt::{self, Write as _};
use std::io::Write;

use crate::errors::{GeomError, RenderError};
use crate::path::{Capabilities, Path, PathCommand};
use crate::registry::Attributes;
use crate::shapes::{Shape, ShapeEnum};
use crate::types::{Bounds, Color};

/// Writes shapes as a single-page EPS document
#[derive(Debug, Clone, Default)]
pub struct EpsWriter {
    /// Emit a `%% Shape:` comment before each shape
    pub verbose: bool,
    /// Added on every side of the computed bounding box
    pub margin: f64,
}

impl EpsWriter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }

    pub fn margin(mut self, margin: f64) -> Self {
        self.margin = margin;
        self
    }

    /// PostScript has `arc` and `translate` but no circle primitive
    pub fn capabilities(&self) -> Capabilities {
        Capabilities {
            circles: false,
            translated_paths: true,
        }
    }

    pub fn write<W: Write>(&self, out: &mut W, shapes: &[ShapeEnum]) -> Result<(), RenderError> {
        let doc = self.to_string(shapes)?;
        out.write_all(doc.as_bytes())?;
        Ok(())
    }

    /// Render the whole document into a string
    pub fn to_string(&self, shapes: &[ShapeEnum]) -> Result<String, RenderError> {
        let caps = self.capabilities();
        let mut doc = String::new();

        let (west, south, east, north) = match self.extent(shapes)? {
            Some(b) => {
                let b = b.expand(self.margin);
                (b.west.floor(), b.south.floor(), b.east.ceil(), b.north.ceil())
            }
            None => (0.0, 0.0, 0.0, 0.0),
        };
        doc.push_str("%!PS-Adobe-3.0 EPSF-3.0\n");
        writeln!(doc, "%%BoundingBox: {west} {south} {east} {north}")?;
        doc.push_str("%%Creator: livesketch\n%%Pages: 1\n%%EndComments\n");

        for shape in shapes {
            let paths = shape.render(&caps)?;
            crate::log::debug!(shape = shape.type_name(), paths = paths.len(), "writing shape");
            doc.push('\n');
            if self.verbose {
                writeln!(doc, "%% Shape: {}", shape.title().unwrap_or(shape.type_name()))?;
            }
            for path in &paths {
                write_path(&mut doc, path)?;
            }
        }

        doc.push_str("\n%%EOF\n");
        Ok(doc)
    }

    fn extent(&self, shapes: &[ShapeEnum]) -> Result<Option<Bounds>, GeomError> {
        let mut extent: Option<Bounds> = None;
        for shape in shapes {
            let b = shape.boundingbox().bounds()?;
            extent = Some(match extent {
                Some(acc) => acc.envelope(b),
                None => b,
            });
        }
        Ok(extent)
    }
}

fn write_path<W: fmt::Write>(doc: &mut W, path: &Path) -> fmt::Result {
    doc.write_str("gsave newpath\n")?;
    for command in path.commands() {
        write_command(doc, command)?;
    }
    if let Some(fill) = path.fill() {
        writeln!(doc, "gsave {} fill grestore", rgb(fill))?;
    }
    if let Some(stroke) = path.stroke() {
        writeln!(doc, "{} {} setlinewidth stroke", rgb(stroke), path.stroke_width())?;
    }
    doc.write_str("grestore\n")
}

fn write_command<W: fmt::Write>(doc: &mut W, command: &PathCommand) -> fmt::Result {
    match command {
        PathCommand::MoveTo { x, y } => writeln!(doc, "{x} {y} moveto"),
        PathCommand::LineTo { x, y } => writeln!(doc, "{x} {y} lineto"),
        PathCommand::MoveBy { dx, dy } => writeln!(doc, "{dx} {dy} rmoveto"),
        PathCommand::LineBy { dx, dy } => writeln!(doc, "{dx} {dy} rlineto"),
        PathCommand::Arc {
            cx,
            cy,
            r,
            start,
            stop,
            ccw,
        } => {
            let op = if *ccw { "arc" } else { "arcn" };
            writeln!(doc, "{cx} {cy} {r} {start} {stop} {op}")
        }
        PathCommand::Circle { cx, cy, r } => writeln!(doc, "{cx} {cy} {r} 0 360 arc closepath"),
        PathCommand::ClosePath => writeln!(doc, "closepath"),
        PathCommand::Translated { dx, dy, commands } => {
            writeln!(doc, "{dx} {dy} translate")?;
            for inner in commands {
                write_command(doc, inner)?;
            }
            writeln!(doc, "{} {} translate", 0.0 - dx, 0.0 - dy)
        }
    }
}

fn rgb(color: Color) -> String {
    let (r, g, b) = color.rgbf();
    format!("{r} {g} {b} setrgbcolor")
}
