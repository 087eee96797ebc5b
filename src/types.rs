//! Resolved (snapshot) value types.
//!
//! Everything in here is plain data: a [`Bounds`] or a [`Color`] never
//! changes once built. The live counterparts are the nodes in [`crate::geom`].

use std::fmt;

use crate::errors::GeomError;

/// One side of a box
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Edge {
    North,
    East,
    South,
    West,
}

impl Edge {
    pub fn name(self) -> &'static str {
        match self {
            Edge::North => "north",
            Edge::East => "east",
            Edge::South => "south",
            Edge::West => "west",
        }
    }
}

impl fmt::Display for Edge {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// The current extent of a box as `(north, east, south, west)`.
///
/// Y grows upward, so `north >= south` and `east >= west` for any box built
/// by this crate.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Bounds {
    pub north: f64,
    pub east: f64,
    pub south: f64,
    pub west: f64,
}

impl Bounds {
    pub fn new(north: f64, east: f64, south: f64, west: f64) -> Self {
        Bounds {
            north,
            east,
            south,
            west,
        }
    }

    /// Bounds of the box with opposite corners `a` and `b`, in either order
    pub fn from_corners(a: (f64, f64), b: (f64, f64)) -> Self {
        Bounds {
            north: a.1.max(b.1),
            east: a.0.max(b.0),
            south: a.1.min(b.1),
            west: a.0.min(b.0),
        }
    }

    /// Smallest bounds containing both `self` and `other`
    pub fn envelope(self, other: Bounds) -> Bounds {
        Bounds {
            north: self.north.max(other.north),
            east: self.east.max(other.east),
            south: self.south.min(other.south),
            west: self.west.min(other.west),
        }
    }

    /// Grow every side outward by `amount`
    pub fn expand(self, amount: f64) -> Bounds {
        Bounds {
            north: self.north + amount,
            east: self.east + amount,
            south: self.south - amount,
            west: self.west - amount,
        }
    }

    pub fn edge(&self, edge: Edge) -> f64 {
        match edge {
            Edge::North => self.north,
            Edge::East => self.east,
            Edge::South => self.south,
            Edge::West => self.west,
        }
    }

    pub fn width(&self) -> f64 {
        self.east - self.west
    }

    pub fn height(&self) -> f64 {
        self.north - self.south
    }

    pub fn center(&self) -> (f64, f64) {
        ((self.west + self.east) / 2.0, (self.south + self.north) / 2.0)
    }

    /// Inclusive containment test
    pub fn contains(&self, x: f64, y: f64) -> bool {
        self.west <= x && x <= self.east && self.south <= y && y <= self.north
    }
}

/// An RGB color with normalized components in `[0, 1]`
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Color {
    r: f64,
    g: f64,
    b: f64,
}

impl Color {
    pub const BLACK: Color = Color { r: 0.0, g: 0.0, b: 0.0 };
    pub const WHITE: Color = Color { r: 1.0, g: 1.0, b: 1.0 };

    /// Create a color from normalized components, rejecting anything outside `[0, 1]`
    pub fn try_new(r: f64, g: f64, b: f64) -> Result<Color, GeomError> {
        for c in [r, g, b] {
            if !(0.0..=1.0).contains(&c) {
                return Err(GeomError::value_kind(
                    "Color::try_new",
                    format!("components must be normalized to [0, 1], got ({r}, {g}, {b})"),
                ));
            }
        }
        Ok(Color { r, g, b })
    }

    /// Create a color from 8-bit components
    pub fn from_rgb8(r: u8, g: u8, b: u8) -> Color {
        Color {
            r: f64::from(r) / 255.0,
            g: f64::from(g) / 255.0,
            b: f64::from(b) / 255.0,
        }
    }

    pub fn rgbf(self) -> (f64, f64, f64) {
        (self.r, self.g, self.b)
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "rgb({},{},{})", self.r, self.g, self.b)
    }
}
