//! RGBA color with straight (non-premultiplied) 8-bit channels.

use std::fmt;
use std::str::FromStr;

use crate::{FlowError, FlowResult};

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(try_from = "String", into = "String"))]
pub struct Rgba {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Rgba {
    pub const TRANSPARENT: Rgba = Rgba::new(0, 0, 0, 0);
    pub const WHITE: Rgba = Rgba::new(255, 255, 255, 255);
    pub const BLACK: Rgba = Rgba::new(0, 0, 0, 255);

    #[inline]
    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    #[inline]
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self::new(r, g, b, 255)
    }

    /// Same color with alpha scaled by `factor` (clamped to [0, 1]).
    pub fn fade(self, factor: f32) -> Rgba {
        let f = if factor.is_finite() { factor.clamp(0.0, 1.0) } else { 0.0 };
        Rgba { a: (self.a as f32 * f).round() as u8, ..self }
    }

    /// Parse `#rgb`, `#rgba`, `#rrggbb` or `#rrggbbaa`.
    pub fn parse_hex(text: &str) -> Option<Rgba> {
        let hex = text.trim().strip_prefix('#')?;
        let bytes = hex.as_bytes();

        fn nibble(c: u8) -> Option<u8> {
            (c as char).to_digit(16).map(|d| d as u8)
        }
        fn pair(b: &[u8]) -> Option<u8> {
            Some((nibble(*b.first()?)? << 4) | nibble(*b.get(1)?)?)
        }
        fn short(c: u8) -> Option<u8> {
            nibble(c).map(|n| (n << 4) | n)
        }

        match bytes.len() {
            3 => Some(Rgba::rgb(short(bytes[0])?, short(bytes[1])?, short(bytes[2])?)),
            4 => Some(Rgba::new(
                short(bytes[0])?,
                short(bytes[1])?,
                short(bytes[2])?,
                short(bytes[3])?,
            )),
            6 => Some(Rgba::rgb(pair(&bytes[0..2])?, pair(&bytes[2..4])?, pair(&bytes[4..6])?)),
            8 => Some(Rgba::new(
                pair(&bytes[0..2])?,
                pair(&bytes[2..4])?,
                pair(&bytes[4..6])?,
                pair(&bytes[6..8])?,
            )),
            _ => None,
        }
    }
}

impl Default for Rgba {
    fn default() -> Self {
        Rgba::WHITE
    }
}

impl fmt::Display for Rgba {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.a == 255 {
            write!(f, "#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
        } else {
            write!(f, "#{:02x}{:02x}{:02x}{:02x}", self.r, self.g, self.b, self.a)
        }
    }
}

impl FromStr for Rgba {
    type Err = FlowError;

    fn from_str(s: &str) -> FlowResult<Self> {
        Rgba::parse_hex(s).ok_or_else(|| FlowError::Parse(format!("invalid color {s:?}")))
    }
}

impl TryFrom<String> for Rgba {
    type Error = FlowError;

    fn try_from(s: String) -> FlowResult<Self> {
        s.parse()
    }
}

impl From<Rgba> for String {
    fn from(c: Rgba) -> String {
        c.to_string()
    }
}
