//! Colour handling.
//!
//! Firework colours live in one canonical representation, [`Hsb`], on a
//! 0-255 scale per channel. They are converted to [`Rgb`] only when the
//! presentation layer fills a pixel, so no draw call ever depends on a
//! colour mode set by a previous one.

use crate::error::{Error, Result};
use serde::Deserialize;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(try_from = "String")]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const WHITE: Rgb = Rgb::new(255, 255, 255);
    pub const BLACK: Rgb = Rgb::new(0, 0, 0);

    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    pub const fn gray(v: u8) -> Self {
        Self { r: v, g: v, b: v }
    }

    /// Source-over blend of `src` onto `self` with `alpha` in 0-255.
    pub fn blend(self, src: Rgb, alpha: u8) -> Rgb {
        let a = alpha as f32 / 255.0;
        let mix = |dst: u8, src: u8| (dst as f32 * (1.0 - a) + src as f32 * a).round() as u8;
        Rgb::new(mix(self.r, src.r), mix(self.g, src.g), mix(self.b, src.b))
    }

    /// Average of two colours, used where one terminal cell shows two pixels.
    pub fn average(self, other: Rgb) -> Rgb {
        let avg = |a: u8, b: u8| ((a as u16 + b as u16) / 2) as u8;
        Rgb::new(avg(self.r, other.r), avg(self.g, other.g), avg(self.b, other.b))
    }
}

impl TryFrom<String> for Rgb {
    type Error = Error;

    fn try_from(value: String) -> Result<Self> {
        parse_hex_color(&value)
    }
}

impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

/// Hue/saturation/brightness, each on a 0-255 scale.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Hsb {
    pub hue: u8,
    pub saturation: u8,
    pub brightness: u8,
}

impl Hsb {
    pub const fn new(hue: u8, saturation: u8, brightness: u8) -> Self {
        Self {
            hue,
            saturation,
            brightness,
        }
    }

    pub fn to_rgb(self) -> Rgb {
        let s = self.saturation as f32 / 255.0;
        let v = self.brightness as f32 / 255.0;
        if s <= 0.0 {
            let g = (v * 255.0).round() as u8;
            return Rgb::gray(g);
        }

        // Six sectors around the colour wheel
        let h = self.hue as f32 / 255.0 * 6.0;
        let sector = (h.floor() as i32).rem_euclid(6);
        let f = h - h.floor();
        let p = v * (1.0 - s);
        let q = v * (1.0 - s * f);
        let t = v * (1.0 - s * (1.0 - f));

        let (r, g, b) = match sector {
            0 => (v, t, p),
            1 => (q, v, p),
            2 => (p, v, t),
            3 => (p, q, v),
            4 => (t, p, v),
            _ => (v, p, q),
        };

        let to_u8 = |c: f32| (c * 255.0).round().clamp(0.0, 255.0) as u8;
        Rgb::new(to_u8(r), to_u8(g), to_u8(b))
    }
}

pub fn parse_hex_color(hex: &str) -> Result<Rgb> {
    let trimmed = hex.trim_start_matches('#');
    if trimmed.len() != 6 || !trimmed.is_ascii() {
        return Err(Error::InvalidColor(hex.to_string()));
    }

    let channel = |range: std::ops::Range<usize>| {
        u8::from_str_radix(&trimmed[range], 16).map_err(|_| Error::InvalidColor(hex.to_string()))
    };

    Ok(Rgb::new(channel(0..2)?, channel(2..4)?, channel(4..6)?))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_hex_with_and_without_hash() {
        assert_eq!(parse_hex_color("1a1b26").unwrap(), Rgb::new(0x1a, 0x1b, 0x26));
        assert_eq!(parse_hex_color("#FFFFFF").unwrap(), Rgb::WHITE);
    }

    #[test]
    fn rejects_malformed_hex() {
        assert!(matches!(parse_hex_color("fff"), Err(Error::InvalidColor(_))));
        assert!(matches!(parse_hex_color("gg0000"), Err(Error::InvalidColor(_))));
        assert!(parse_hex_color("ééé").is_err());
    }

    #[test]
    fn primary_hues_convert() {
        assert_eq!(Hsb::new(0, 255, 255).to_rgb(), Rgb::new(255, 0, 0));
        assert_eq!(Hsb::new(85, 255, 255).to_rgb(), Rgb::new(0, 255, 0));
        assert_eq!(Hsb::new(170, 255, 255).to_rgb(), Rgb::new(0, 0, 255));
    }

    #[test]
    fn zero_saturation_is_gray() {
        assert_eq!(Hsb::new(42, 0, 128).to_rgb(), Rgb::gray(128));
    }

    #[test]
    fn blend_extremes() {
        let base = Rgb::WHITE;
        assert_eq!(base.blend(Rgb::BLACK, 0), Rgb::WHITE);
        assert_eq!(base.blend(Rgb::BLACK, 255), Rgb::BLACK);
    }

    #[test]
    fn display_round_trips_through_parser() {
        let c = Rgb::new(0x12, 0xab, 0x03);
        assert_eq!(parse_hex_color(&c.to_string()).unwrap(), c);
    }
}
