//! Render parameters shared by the CLI and the GUI.

use crate::error::RenderError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::RangeInclusive;
use std::str::FromStr;

pub const CANVAS_RANGE: RangeInclusive<u32> = 128..=1024;
pub const SCALE_RANGE: RangeInclusive<u32> = 50..=100;
pub const RADIUS_RANGE: RangeInclusive<u32> = 0..=256;

/// Outline the inner image is clipped to.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Shape {
    #[default]
    Rounded,
    Circle,
}

impl Shape {
    pub const ALL: [Shape; 2] = [Shape::Rounded, Shape::Circle];

    pub fn as_str(self) -> &'static str {
        match self {
            Shape::Rounded => "rounded",
            Shape::Circle => "circle",
        }
    }
}

impl fmt::Display for Shape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Shape {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "rounded" => Ok(Shape::Rounded),
            "circle" => Ok(Shape::Circle),
            other => Err(format!("unknown shape '{}' (expected rounded or circle)", other)),
        }
    }
}

/// An opaque sRGB colour, written as `#rrggbb`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Rgb { r, g, b }
    }

    pub fn to_rgba(self) -> [u8; 4] {
        [self.r, self.g, self.b, 255]
    }
}

impl Default for Rgb {
    fn default() -> Self {
        Rgb::new(0x11, 0x11, 0x11)
    }
}

impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

impl FromStr for Rgb {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let hex = s.trim();
        let hex = hex.strip_prefix('#').unwrap_or(hex);
        if !hex.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(format!("invalid colour '{}'", s));
        }
        let channel = |digits: &str| u8::from_str_radix(digits, 16).map_err(|e| e.to_string());
        match hex.len() {
            6 => Ok(Rgb::new(
                channel(&hex[0..2])?,
                channel(&hex[2..4])?,
                channel(&hex[4..6])?,
            )),
            // #abc is shorthand for #aabbcc
            3 => Ok(Rgb::new(
                channel(&hex[0..1])? * 17,
                channel(&hex[1..2])? * 17,
                channel(&hex[2..3])? * 17,
            )),
            _ => Err(format!("invalid colour '{}' (expected #rrggbb)", s)),
        }
    }
}

impl TryFrom<String> for Rgb {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Rgb> for String {
    fn from(value: Rgb) -> Self {
        value.to_string()
    }
}

/// Everything that determines how a source image becomes an icon.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderParams {
    /// Side of the square output canvas in pixels
    pub canvas_px: u32,
    /// Size of the inner image as a percentage of the canvas
    pub scale_percent: u32,
    /// Corner radius in pixels of the inner image (rounded shape only)
    pub radius_px: u32,
    pub shape: Shape,
    pub solid_background: bool,
    /// Background colour; remembered even while `solid_background` is off
    pub background: Rgb,
}

impl Default for RenderParams {
    fn default() -> Self {
        RenderParams {
            canvas_px: 512,
            scale_percent: 86,
            radius_px: 100,
            shape: Shape::Rounded,
            solid_background: false,
            background: Rgb::default(),
        }
    }
}

impl RenderParams {
    /// Check every numeric field against its range.
    pub fn validate(&self) -> Result<(), RenderError> {
        check("canvas size", self.canvas_px, &CANVAS_RANGE)?;
        check("scale", self.scale_percent, &SCALE_RANGE)?;
        check("radius", self.radius_px, &RADIUS_RANGE)?;
        Ok(())
    }

    /// Copy with every numeric field pulled into its range.
    pub fn clamped(&self) -> Self {
        RenderParams {
            canvas_px: clamp(self.canvas_px, &CANVAS_RANGE),
            scale_percent: clamp(self.scale_percent, &SCALE_RANGE),
            radius_px: clamp(self.radius_px, &RADIUS_RANGE),
            ..*self
        }
    }

    /// Side of the scaled inner image in pixels.
    pub fn inner_px(&self) -> u32 {
        (u64::from(self.canvas_px) * u64::from(self.scale_percent) / 100) as u32
    }

    /// Offset of the inner image from the top-left corner of the canvas.
    pub fn inner_offset(&self) -> u32 {
        (self.canvas_px - self.inner_px()) / 2
    }

    /// Background fill, if the solid background is switched on.
    pub fn background_rgba(&self) -> Option<[u8; 4]> {
        self.solid_background.then(|| self.background.to_rgba())
    }
}

fn check(field: &'static str, value: u32, range: &RangeInclusive<u32>) -> Result<(), RenderError> {
    if range.contains(&value) {
        Ok(())
    } else {
        Err(RenderError::InvalidParam {
            field,
            value,
            min: *range.start(),
            max: *range.end(),
        })
    }
}

fn clamp(value: u32, range: &RangeInclusive<u32>) -> u32 {
    value.clamp(*range.start(), *range.end())
}
