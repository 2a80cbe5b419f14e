use crate::foundation::core::Rgba8Premul;
use serde::{Deserialize, Serialize};

/// Straight-alpha colour with normalized channels.
///
/// Deserializes from `"#RRGGBB"`, `"#RRGGBBAA"`, `{ "r", "g", "b", "a"? }` or `[r, g, b, a?]`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Color {
    pub r: f64,
    pub g: f64,
    pub b: f64,
    pub a: f64,
}

impl Color {
    pub const fn rgba(r: f64, g: f64, b: f64, a: f64) -> Self {
        Self { r, g, b, a }
    }

    pub fn from_rgb8(r: u8, g: u8, b: u8) -> Self {
        Self::rgba(
            f64::from(r) / 255.0,
            f64::from(g) / 255.0,
            f64::from(b) / 255.0,
            1.0,
        )
    }

    pub fn to_rgba8_premul(self) -> Rgba8Premul {
        fn to_u8(x: f64) -> u8 {
            (x.clamp(0.0, 1.0) * 255.0).round() as u8
        }

        let a = self.a.clamp(0.0, 1.0);
        Rgba8Premul {
            r: to_u8(self.r.clamp(0.0, 1.0) * a),
            g: to_u8(self.g.clamp(0.0, 1.0) * a),
            b: to_u8(self.b.clamp(0.0, 1.0) * a),
            a: to_u8(a),
        }
    }

    pub fn to_hex(self) -> String {
        let c = |x: f64| (x.clamp(0.0, 1.0) * 255.0).round() as u8;
        format!(
            "#{:02x}{:02x}{:02x}{:02x}",
            c(self.r),
            c(self.g),
            c(self.b),
            c(self.a)
        )
    }
}

impl Serialize for Color {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.to_hex())
    }
}

impl<'de> Deserialize<'de> for Color {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Repr {
            Hex(String),
            RgbaObj {
                r: f64,
                g: f64,
                b: f64,
                #[serde(default = "one")]
                a: f64,
            },
            Arr(Vec<f64>),
        }

        fn one() -> f64 {
            1.0
        }

        match Repr::deserialize(deserializer)? {
            Repr::Hex(s) => parse_hex(&s).map_err(serde::de::Error::custom),
            Repr::RgbaObj { r, g, b, a } => Ok(Self::rgba(r, g, b, a)),
            Repr::Arr(v) => match v.as_slice() {
                [r, g, b] => Ok(Self::rgba(*r, *g, *b, 1.0)),
                [r, g, b, a] => Ok(Self::rgba(*r, *g, *b, *a)),
                _ => Err(serde::de::Error::custom(
                    "rgba array must have len 3 ([r,g,b]) or 4 ([r,g,b,a])",
                )),
            },
        }
    }
}

fn parse_hex(s: &str) -> Result<Color, String> {
    let s = s.trim();
    let s = s.strip_prefix('#').unwrap_or(s);
    if !s.is_ascii() {
        return Err(format!("invalid hex color \"{s}\""));
    }

    fn hex_byte(pair: &str) -> Result<u8, String> {
        u8::from_str_radix(pair, 16).map_err(|_| format!("invalid hex byte \"{pair}\""))
    }

    let (r, g, b, a) = match s.len() {
        6 => (
            hex_byte(&s[0..2])?,
            hex_byte(&s[2..4])?,
            hex_byte(&s[4..6])?,
            255,
        ),
        8 => (
            hex_byte(&s[0..2])?,
            hex_byte(&s[2..4])?,
            hex_byte(&s[4..6])?,
            hex_byte(&s[6..8])?,
        ),
        _ => {
            return Err("hex color must be #RRGGBB or #RRGGBBAA (case-insensitive)".to_owned());
        }
    };

    Ok(Color::rgba(
        f64::from(r) / 255.0,
        f64::from(g) / 255.0,
        f64::from(b) / 255.0,
        f64::from(a) / 255.0,
    ))
}

#[cfg(test)]
#[path = "../../tests/unit/config/color.rs"]
mod tests;
