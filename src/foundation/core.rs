use crate::foundation::error::{CacheFlowError, CacheFlowResult};

pub use kurbo::{Affine, BezPath, Point, QuadBez, Rect, Vec2};

/// Milliseconds on the host clock. Every entity in a frame observes the same reading.
pub type Millis = f64;

#[derive(
    Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize,
)]
pub struct FrameIndex(pub u64);

#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Fps {
    pub num: u32,
    pub den: u32, // must be > 0
}

impl Fps {
    pub fn new(num: u32, den: u32) -> CacheFlowResult<Self> {
        if den == 0 {
            return Err(CacheFlowError::validation("Fps den must be > 0"));
        }
        if num == 0 {
            return Err(CacheFlowError::validation("Fps num must be > 0"));
        }
        Ok(Self { num, den })
    }

    pub fn as_f64(self) -> f64 {
        f64::from(self.num) / f64::from(self.den)
    }

    pub fn frame_duration_ms(self) -> Millis {
        1000.0 * f64::from(self.den) / f64::from(self.num)
    }

    /// Host clock reading at which frame `f` is presented.
    pub fn frame_to_ms(self, f: FrameIndex) -> Millis {
        (f.0 as f64) * self.frame_duration_ms()
    }

    pub fn ms_to_frames_floor(self, ms: Millis) -> u64 {
        (ms / 1000.0 * self.as_f64()).floor().max(0.0) as u64
    }
}

/// Drawing surface size in pixels.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Canvas {
    pub width: u32,
    pub height: u32,
}

impl Canvas {
    pub fn new(width: u32, height: u32) -> CacheFlowResult<Self> {
        let c = Self { width, height };
        c.validate()?;
        Ok(c)
    }

    pub fn validate(self) -> CacheFlowResult<()> {
        if self.width == 0 || self.height == 0 {
            return Err(CacheFlowError::layout("canvas width/height must be > 0"));
        }
        if self.width > u32::from(u16::MAX) || self.height > u32::from(u16::MAX) {
            return Err(CacheFlowError::layout(format!(
                "canvas {}x{} exceeds {}x{}",
                self.width,
                self.height,
                u16::MAX,
                u16::MAX
            )));
        }
        Ok(())
    }

    pub fn w(self) -> f64 {
        f64::from(self.width)
    }

    pub fn h(self) -> f64 {
        f64::from(self.height)
    }
}

/// Premultiplied RGBA8 (r,g,b already multiplied by a).
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Rgba8Premul {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Rgba8Premul {
    pub fn transparent() -> Self {
        Self {
            r: 0,
            g: 0,
            b: 0,
            a: 0,
        }
    }

    pub fn from_straight_rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        fn premul(c: u8, a: u8) -> u8 {
            let c = u16::from(c);
            let a = u16::from(a);
            (((c * a) + 127) / 255) as u8
        }

        Self {
            r: premul(r, a),
            g: premul(g, a),
            b: premul(b, a),
            a,
        }
    }

    /// Scale all channels by `opacity` in `[0, 1]`.
    pub fn with_opacity(self, opacity: f64) -> Self {
        let o = opacity.clamp(0.0, 1.0);
        let s = |c: u8| (f64::from(c) * o).round() as u8;
        Self {
            r: s(self.r),
            g: s(self.g),
            b: s(self.b),
            a: s(self.a),
        }
    }

    /// Straight-alpha channels, as CSS/peniko colours expect.
    pub fn to_straight(self) -> [u8; 4] {
        if self.a == 0 {
            return [0, 0, 0, 0];
        }
        let un = |c: u8| ((u16::from(c) * 255 + u16::from(self.a) / 2) / u16::from(self.a)) as u8;
        [un(self.r), un(self.g), un(self.b), self.a]
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/core.rs"]
mod tests;
