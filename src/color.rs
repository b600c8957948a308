//! 24-bit RGB colors: hex decoding/encoding and per-channel blending.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ColorError {
    #[error("invalid color format: {0:?} (expected #rrggbb)")]
    InvalidFormat(String),
}

/// A 24-bit color. Serialized as a `#rrggbb` string.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Build a color from a `0xRRGGBB` literal. Bits above 24 are ignored.
    pub const fn from_u24(value: u32) -> Self {
        Self {
            r: ((value >> 16) & 0xff) as u8,
            g: ((value >> 8) & 0xff) as u8,
            b: (value & 0xff) as u8,
        }
    }

    pub const fn to_u24(self) -> u32 {
        ((self.r as u32) << 16) | ((self.g as u32) << 8) | self.b as u32
    }

    /// Decode `#rrggbb` or `rrggbb`. Case-insensitive.
    pub fn from_hex(s: &str) -> Result<Self, ColorError> {
        let invalid = || ColorError::InvalidFormat(s.to_string());
        let digits = s.strip_prefix('#').unwrap_or(s).as_bytes();
        if digits.len() != 6 {
            return Err(invalid());
        }
        let r = hex_byte(&digits[0..2]).ok_or_else(invalid)?;
        let g = hex_byte(&digits[2..4]).ok_or_else(invalid)?;
        let b = hex_byte(&digits[4..6]).ok_or_else(invalid)?;
        Ok(Self { r, g, b })
    }

    /// Lowercase `#rrggbb`.
    pub fn to_hex(self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }

    /// Linear interpolation toward `other`, channel by channel, rounding to
    /// the nearest integer. `factor` is clamped to [0, 1].
    pub fn blend(self, other: Rgb, factor: f64) -> Rgb {
        let f = if factor.is_nan() { 0.0 } else { factor.clamp(0.0, 1.0) };
        Rgb {
            r: lerp_channel(self.r, other.r, f),
            g: lerp_channel(self.g, other.g, f),
            b: lerp_channel(self.b, other.b, f),
        }
    }
}

fn lerp_channel(from: u8, to: u8, f: f64) -> u8 {
    let from = from as f64;
    let to = to as f64;
    (from + (to - from) * f).round().clamp(0.0, 255.0) as u8
}

fn hex_digit(c: u8) -> Option<u8> {
    match c {
        b'0'..=b'9' => Some(c - b'0'),
        b'a'..=b'f' => Some(c - b'a' + 10),
        b'A'..=b'F' => Some(c - b'A' + 10),
        _ => None,
    }
}

fn hex_byte(pair: &[u8]) -> Option<u8> {
    Some(hex_digit(pair[0])? << 4 | hex_digit(pair[1])?)
}

impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

impl FromStr for Rgb {
    type Err = ColorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Rgb::from_hex(s)
    }
}

impl TryFrom<String> for Rgb {
    type Error = ColorError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Rgb::from_hex(&value)
    }
}

impl From<Rgb> for String {
    fn from(color: Rgb) -> Self {
        color.to_hex()
    }
}

impl From<Rgb> for ratatui::style::Color {
    fn from(color: Rgb) -> Self {
        ratatui::style::Color::Rgb(color.r, color.g, color.b)
    }
}
