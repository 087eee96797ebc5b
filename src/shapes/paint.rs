use std::sync::OnceLock;

use crate::errors::GeomError;
use crate::geom::{Length, Operand};
use crate::registry::{Registered, Registry, RegistryBuilder, registered_attributes};
use crate::types::Color;

/// Stroke and fill settings shared by every drawable shape
#[derive(Debug, Clone)]
pub struct Paint {
    stroke: Option<Color>,
    fill: Option<Color>,
    stroke_width: Length,
}

impl Default for Paint {
    /// Black stroke of width 1, no fill
    fn default() -> Self {
        Paint {
            stroke: Some(Color::BLACK),
            fill: None,
            stroke_width: Length::fixed(1.0),
        }
    }
}

impl Paint {
    pub fn new(stroke: Option<Color>, fill: Option<Color>, stroke_width: impl Into<Operand>) -> Result<Paint, GeomError> {
        Ok(Paint {
            stroke,
            fill,
            stroke_width: Length::coerce(stroke_width.into(), "Paint::new")?,
        })
    }

    pub fn with_stroke(mut self, stroke: Option<Color>) -> Self {
        self.stroke = stroke;
        self
    }

    pub fn with_fill(mut self, fill: Option<Color>) -> Self {
        self.fill = fill;
        self
    }

    /// Replace the stroke width with a length (or a non-negative number)
    pub fn with_stroke_width(mut self, width: impl Into<Operand>) -> Result<Self, GeomError> {
        self.stroke_width = Length::coerce(width.into(), "Paint::with_stroke_width")?;
        Ok(self)
    }

    pub fn stroke(&self) -> Option<Color> {
        self.stroke
    }

    pub fn fill(&self) -> Option<Color> {
        self.fill
    }

    pub fn stroke_width(&self) -> &Length {
        &self.stroke_width
    }

    pub fn has_stroke(&self) -> bool {
        self.stroke.is_some()
    }

    pub fn has_fill(&self) -> bool {
        self.fill.is_some()
    }
}

impl Registered for Paint {
    fn registry() -> &'static Registry<Paint> {
        static REGISTRY: OnceLock<Registry<Paint>> = OnceLock::new();
        REGISTRY.get_or_init(|| {
            RegistryBuilder::new("Paint")
                .length("stroke_width", &["sw", "linewidth"], Paint::stroke_width)
                .build()
                .expect("invalid paint attributes")
        })
    }
}

registered_attributes!(Paint);
