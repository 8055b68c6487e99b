//! Core types for the traffic simulation
//!
//! Plain geometry and tag types shared by every part of the engine.

use anyhow::{bail, Error};
use std::fmt;
use std::str::FromStr;

/// A 2D position on the drawing surface (x right, y down)
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    pub fn distance(&self, other: &Point) -> f32 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        (dx * dx + dy * dy).sqrt()
    }

    /// Heading in radians from this point towards another
    pub fn angle_to(&self, other: &Point) -> f32 {
        (other.y - self.y).atan2(other.x - self.x)
    }

    /// Rotate around the origin by `angle` radians and then translate by `origin`
    pub fn rotated_around(&self, origin: &Point, angle: f32) -> Point {
        let (sin, cos) = angle.sin_cos();
        Point {
            x: origin.x + self.x * cos - self.y * sin,
            y: origin.y + self.x * sin + self.y * cos,
        }
    }
}

/// Logical size of the drawing surface
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Size {
    pub width: f32,
    pub height: f32,
}

impl Size {
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    /// Point at the given fractions of width and height
    pub fn at(&self, fx: f32, fy: f32) -> Point {
        Point::new(self.width * fx, self.height * fy)
    }
}

impl Default for Size {
    fn default() -> Self {
        Self {
            width: DEFAULT_SURFACE_WIDTH,
            height: DEFAULT_SURFACE_HEIGHT,
        }
    }
}

/// An RGBA color
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Color {
    /// Opaque color from a 0xRRGGBB literal
    pub const fn hex(rgb: u32) -> Self {
        Self {
            r: ((rgb >> 16) & 0xFF) as u8,
            g: ((rgb >> 8) & 0xFF) as u8,
            b: (rgb & 0xFF) as u8,
            a: 255,
        }
    }

    pub const fn rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }
}

/// What a static obstacle represents; only affects its render color
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ObstacleKind {
    Building,
    Construction,
    /// Never produced by the presets (pedestrians live in their own collection)
    Pedestrian,
}

/// A static axis-aligned rectangle
#[derive(Debug, Clone, PartialEq)]
pub struct Obstacle {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
    pub kind: ObstacleKind,
}

impl Obstacle {
    pub fn new(x: f32, y: f32, width: f32, height: f32, kind: ObstacleKind) -> Self {
        Self {
            x,
            y,
            width,
            height,
            kind,
        }
    }

    pub fn center(&self) -> Point {
        Point::new(self.x + self.width / 2.0, self.y + self.height / 2.0)
    }
}

/// Weather conditions; each slows the cruise speed by a fixed factor
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Weather {
    #[default]
    Clear,
    Rain,
    Fog,
    Snow,
}

impl Weather {
    pub fn speed_factor(self) -> f32 {
        match self {
            Weather::Clear => 1.0,
            Weather::Rain => 0.8,
            Weather::Fog => 0.6,
            Weather::Snow => 0.5,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Weather::Clear => "clear",
            Weather::Rain => "rain",
            Weather::Fog => "fog",
            Weather::Snow => "snow",
        }
    }

    /// The next weather in display order, wrapping back to clear
    pub fn next(self) -> Weather {
        match self {
            Weather::Clear => Weather::Rain,
            Weather::Rain => Weather::Fog,
            Weather::Fog => Weather::Snow,
            Weather::Snow => Weather::Clear,
        }
    }
}

impl fmt::Display for Weather {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Weather {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "clear" => Ok(Weather::Clear),
            "rain" => Ok(Weather::Rain),
            "fog" => Ok(Weather::Fog),
            "snow" => Ok(Weather::Snow),
            other => bail!("unknown weather '{other}' (expected clear, rain, fog or snow)"),
        }
    }
}

/// Base cruise speed in units per tick before weather and scenario factors
pub const BASE_SPEED: f32 = 2.0;

/// Fraction of cruise speed kept while avoiding hazards
pub const AVOIDANCE_SPEED_FACTOR: f32 = 0.3;

/// Distance at which an AI vehicle counts a waypoint as reached
pub const WAYPOINT_ARRIVAL_DISTANCE: f32 = 10.0;

/// Vehicle footprint used by every preset
pub const VEHICLE_WIDTH: f32 = 40.0;
pub const VEHICLE_HEIGHT: f32 = 20.0;

/// Fallback on-screen size when the surface cannot report one
pub const DEFAULT_SURFACE_WIDTH: f32 = 800.0;
pub const DEFAULT_SURFACE_HEIGHT: f32 = 600.0;

/// Smallest logical size the surface is resized to
pub const MIN_SURFACE_WIDTH: f32 = 400.0;
pub const MIN_SURFACE_HEIGHT: f32 = 300.0;
