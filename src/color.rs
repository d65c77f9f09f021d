use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::StarfallError;

/// 24-bit color, written as `#RRGGBB`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Rgb(pub u8, pub u8, pub u8);

impl Rgb {
    pub const BLACK: Rgb = Rgb(0, 0, 0);

    /// Parses `RRGGBB` with an optional leading `#`.
    pub fn from_hex(hex: &str) -> Result<Self, StarfallError> {
        let digits = hex.trim().trim_start_matches('#');
        if digits.len() != 6 || !digits.bytes().all(|b| b.is_ascii_hexdigit()) {
            return Err(StarfallError::color(format!(
                "expected RRGGBB hex color, got '{hex}'"
            )));
        }

        let channel = |range: std::ops::Range<usize>| {
            u8::from_str_radix(&digits[range], 16)
                .map_err(|_| StarfallError::color(format!("invalid hex digits in '{hex}'")))
        };

        Ok(Self(channel(0..2)?, channel(2..4)?, channel(4..6)?))
    }

    /// Fully saturated, half-lightness color for a hue in degrees.
    pub fn from_hue(hue: f32) -> Self {
        hsl_to_rgb(hue, 1.0, 0.5)
    }

    pub fn to_hex(self) -> String {
        format!("#{:02X}{:02X}{:02X}", self.0, self.1, self.2)
    }

    /// Linear blend towards `other`; `t = 0` keeps `self`.
    pub fn lerp(self, other: Rgb, t: f32) -> Rgb {
        let t = t.clamp(0.0, 1.0);
        let mix = |a: u8, b: u8| (a as f32 * (1.0 - t) + b as f32 * t).round() as u8;
        Rgb(mix(self.0, other.0), mix(self.1, other.1), mix(self.2, other.2))
    }
}

impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl FromStr for Rgb {
    type Err = StarfallError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_hex(s)
    }
}

impl TryFrom<String> for Rgb {
    type Error = StarfallError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::from_hex(&value)
    }
}

impl From<Rgb> for String {
    fn from(value: Rgb) -> Self {
        value.to_hex()
    }
}

/// CSS notation of the per-star color, e.g. `hsl(120, 100%, 50%)`.
pub fn hue_css(hue: f32) -> String {
    format!("hsl({hue}, 100%, 50%)")
}

/// HSL to RGB. `hue` in degrees, `saturation` and `lightness` in [0, 1].
pub fn hsl_to_rgb(hue: f32, saturation: f32, lightness: f32) -> Rgb {
    let h = hue.rem_euclid(360.0) / 60.0;
    let s = saturation.clamp(0.0, 1.0);
    let l = lightness.clamp(0.0, 1.0);

    let chroma = (1.0 - (2.0 * l - 1.0).abs()) * s;
    let x = chroma * (1.0 - (h % 2.0 - 1.0).abs());
    let m = l - chroma / 2.0;

    let (r, g, b) = match h as u32 {
        0 => (chroma, x, 0.0),
        1 => (x, chroma, 0.0),
        2 => (0.0, chroma, x),
        3 => (0.0, x, chroma),
        4 => (x, 0.0, chroma),
        _ => (chroma, 0.0, x),
    };

    let to_u8 = |v: f32| ((v + m) * 255.0).round().clamp(0.0, 255.0) as u8;
    Rgb(to_u8(r), to_u8(g), to_u8(b))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_with_and_without_hash() {
        assert_eq!(Rgb::from_hex("#9E00FF").unwrap(), Rgb(0x9E, 0x00, 0xFF));
        assert_eq!(Rgb::from_hex("2eb9df").unwrap(), Rgb(0x2E, 0xB9, 0xDF));
    }

    #[test]
    fn rejects_bad_input() {
        assert!(Rgb::from_hex("#12345").is_err());
        assert!(Rgb::from_hex("zzzzzz").is_err());
        assert!(Rgb::from_hex("").is_err());
        assert!(Rgb::from_hex("#+1+2+3").is_err());
        assert!(Rgb::from_hex("-1-2-3").is_err());
    }

    #[test]
    fn hex_output_is_uppercase() {
        assert_eq!(Rgb(0x9E, 0x00, 0xFF).to_hex(), "#9E00FF");
    }

    #[test]
    fn primary_hues() {
        assert_eq!(Rgb::from_hue(0.0), Rgb(255, 0, 0));
        assert_eq!(Rgb::from_hue(120.0), Rgb(0, 255, 0));
        assert_eq!(Rgb::from_hue(240.0), Rgb(0, 0, 255));
        assert_eq!(Rgb::from_hue(360.0), Rgb(255, 0, 0));
    }

    #[test]
    fn serde_uses_hex_strings() {
        let json = serde_json::to_string(&Rgb(1, 2, 3)).unwrap();
        assert_eq!(json, "\"#010203\"");
        let back: Rgb = serde_json::from_str("\"#0A0B0C\"").unwrap();
        assert_eq!(back, Rgb(10, 11, 12));
        assert!(serde_json::from_str::<Rgb>("\"nope\"").is_err());
    }

    #[test]
    fn lerp_endpoints() {
        let a = Rgb(0, 0, 0);
        let b = Rgb(200, 100, 50);
        assert_eq!(a.lerp(b, 0.0), a);
        assert_eq!(a.lerp(b, 1.0), b);
    }
}
