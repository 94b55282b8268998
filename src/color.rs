//! RGBA color values and color-token parsing.

use std::fmt;
use std::str::FromStr;

use crate::error::{Error, Result};

/// Bytes per RGBA pixel.
pub const BYTES_PER_PIXEL: usize = 4;

/// An 8-bit-per-channel RGBA color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Rgba {
    /// Red channel.
    pub r: u8,
    /// Green channel.
    pub g: u8,
    /// Blue channel.
    pub b: u8,
    /// Alpha channel.
    pub a: u8,
}

impl Rgba {
    /// Opaque white.
    pub const WHITE: Rgba = Rgba::new(255, 255, 255, 255);
    /// Fully transparent black.
    pub const TRANSPARENT: Rgba = Rgba::new(0, 0, 0, 0);

    /// Create a color from its four channels.
    #[inline]
    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// Create an opaque color.
    #[inline]
    pub const fn opaque(r: u8, g: u8, b: u8) -> Self {
        Self::new(r, g, b, 255)
    }

    /// Channels in wire order.
    #[inline]
    pub const fn to_bytes(self) -> [u8; 4] {
        [self.r, self.g, self.b, self.a]
    }

    /// Build a color from a 4-byte RGBA slice.
    ///
    /// # Panics
    /// Panics if `bytes` is shorter than four bytes.
    #[inline]
    pub fn from_slice(bytes: &[u8]) -> Self {
        Self::new(bytes[0], bytes[1], bytes[2], bytes[3])
    }

    /// Linear mix of `self` toward `mix` by `weight` (0.0 keeps `self`).
    ///
    /// Each channel is `floor(base * (1 - weight) + mix * weight)`.
    pub fn blend(self, mix: Rgba, weight: f64) -> Rgba {
        let channel = |base: u8, other: u8| -> u8 {
            let v = base as f64 * (1.0 - weight) + other as f64 * weight;
            v.clamp(0.0, 255.0) as u8
        };
        Rgba::new(
            channel(self.r, mix.r),
            channel(self.g, mix.g),
            channel(self.b, mix.b),
            channel(self.a, mix.a),
        )
    }

    /// Parse a color token.
    ///
    /// Accepted forms: `#RRGGBB`, `#RRGGBBAA`, the same without `#`, and
    /// `rgba(r, g, b, a)` where a fractional alpha is scaled by 255.
    pub fn parse(token: &str) -> Result<Rgba> {
        let token = token.trim();
        let invalid = || Error::InvalidColor(token.to_string());

        if token.get(..4).is_some_and(|p| p.eq_ignore_ascii_case("rgba")) {
            return parse_functional(token).ok_or_else(invalid);
        }

        let hex = token.strip_prefix('#').unwrap_or(token);
        if !hex.bytes().all(|b| b.is_ascii_hexdigit()) {
            return Err(invalid());
        }
        let channel = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).map_err(|_| invalid());
        match hex.len() {
            6 => Ok(Rgba::new(channel(0)?, channel(2)?, channel(4)?, 255)),
            8 => Ok(Rgba::new(channel(0)?, channel(2)?, channel(4)?, channel(6)?)),
            _ => Err(invalid()),
        }
    }
}

fn parse_functional(token: &str) -> Option<Rgba> {
    let open = token.find('(')?;
    let close = token.rfind(')')?;
    if close <= open {
        return None;
    }
    let parts: Vec<&str> = token[open + 1..close].split(',').map(str::trim).collect();
    if parts.len() != 4 {
        return None;
    }
    let r = parts[0].parse().ok()?;
    let g = parts[1].parse().ok()?;
    let b = parts[2].parse().ok()?;
    let a = if parts[3].contains('.') {
        let alpha: f64 = parts[3].parse().ok()?;
        (alpha.clamp(0.0, 1.0) * 255.0) as u8
    } else {
        parts[3].parse().ok()?
    };
    Some(Rgba::new(r, g, b, a))
}

impl FromStr for Rgba {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Rgba::parse(s)
    }
}

impl fmt::Display for Rgba {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "#{:02X}{:02X}{:02X}{:02X}",
            self.r, self.g, self.b, self.a
        )
    }
}
