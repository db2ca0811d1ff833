use crate::foundation::error::{ReelError, ReelResult};

/// Absolute 0-based frame index in output timeline space.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize,
)]
pub struct FrameIndex(pub u64);

/// Frames-per-second represented as a rational `num/den`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Fps {
    /// Numerator (frames).
    pub num: u32,
    /// Denominator (seconds), must be non-zero.
    pub den: u32, // must be > 0
}

impl Fps {
    /// Create a validated FPS value.
    pub fn new(num: u32, den: u32) -> ReelResult<Self> {
        if den == 0 {
            return Err(ReelError::config("Fps den must be > 0"));
        }
        if num == 0 {
            return Err(ReelError::config("Fps num must be > 0"));
        }
        Ok(Self { num, den })
    }

    /// Parse an ffprobe-style rate such as `"30/1"`, `"30000/1001"` or `"25"`.
    pub fn parse_ratio(s: &str) -> ReelResult<Self> {
        let s = s.trim();
        let (num, den) = match s.split_once('/') {
            Some((n, d)) => (n.trim(), d.trim()),
            None => (s, "1"),
        };
        let num = num
            .parse::<u32>()
            .map_err(|_| ReelError::decode(format!("invalid frame rate '{s}'")))?;
        let den = den
            .parse::<u32>()
            .map_err(|_| ReelError::decode(format!("invalid frame rate '{s}'")))?;
        Self::new(num, den).map_err(|_| ReelError::decode(format!("invalid frame rate '{s}'")))
    }

    /// Convert to floating-point FPS.
    pub fn as_f64(self) -> f64 {
        f64::from(self.num) / f64::from(self.den)
    }

    /// Duration of one frame in seconds.
    pub fn frame_duration_secs(self) -> f64 {
        f64::from(self.den) / f64::from(self.num)
    }

    /// Convert frame count to seconds.
    pub fn frames_to_secs(self, frames: u64) -> f64 {
        (frames as f64) * self.frame_duration_secs()
    }

    /// Convert seconds to a frame count, rounding partial frames up.
    pub fn secs_to_frames_ceil(self, secs: f64) -> u64 {
        // Tolerate float noise like 67.00000000001 * 30.
        let frames = secs * self.as_f64();
        (frames - 1e-9).ceil().max(0.0) as u64
    }
}

/// Output canvas dimensions in pixels.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Canvas {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
}

impl Canvas {
    /// Number of pixels covered by the canvas.
    pub fn pixel_count(self) -> usize {
        self.width as usize * self.height as usize
    }
}

/// Opaque 8-bit RGB color.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(from = "[u8; 3]", into = "[u8; 3]")]
pub struct Rgb8 {
    /// Red channel.
    pub r: u8,
    /// Green channel.
    pub g: u8,
    /// Blue channel.
    pub b: u8,
}

impl Rgb8 {
    /// Pure white.
    pub const WHITE: Self = Self::new(255, 255, 255);
    /// Pure black.
    pub const BLACK: Self = Self::new(0, 0, 0);

    /// Construct a color from channels.
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Opaque RGBA8 (premultiplied and straight are identical at alpha 255).
    pub fn to_rgba8(self) -> [u8; 4] {
        [self.r, self.g, self.b, 255]
    }
}

impl From<[u8; 3]> for Rgb8 {
    fn from(v: [u8; 3]) -> Self {
        Self::new(v[0], v[1], v[2])
    }
}

impl From<Rgb8> for [u8; 3] {
    fn from(c: Rgb8) -> Self {
        [c.r, c.g, c.b]
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/core.rs"]
mod tests;
