use crate::foundation::error::{ReelError, ReelResult};
use crate::manifest::model::{ImageItem, Slide};

/// Half-open visibility window `[start, end)` in seconds.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize)]
pub struct TimeWindow {
    /// Inclusive start.
    pub start: f64,
    /// Exclusive end.
    pub end: f64,
}

impl TimeWindow {
    /// Create a validated window with `0 <= start < end`.
    pub fn new(start: f64, end: f64) -> ReelResult<Self> {
        if !start.is_finite() || !end.is_finite() {
            return Err(ReelError::config("time window bounds must be finite"));
        }
        if start < 0.0 {
            return Err(ReelError::config(format!(
                "start_time must be >= 0, got {start}"
            )));
        }
        if end <= start {
            return Err(ReelError::config(format!(
                "end_time ({end}) must be greater than start_time ({start})"
            )));
        }
        Ok(Self { start, end })
    }

    /// Return `true` when `t` is inside `[start, end)`.
    pub fn contains(self, t: f64) -> bool {
        self.start <= t && t < self.end
    }

    /// Return `true` when the window lies within `[0, duration]`.
    pub fn fits_within(self, duration: f64) -> bool {
        self.start >= 0.0 && self.end <= duration
    }
}

/// Linear opacity ramps at the start and end of a window.
#[derive(Clone, Copy, Debug, Default, PartialEq, serde::Serialize)]
pub struct Fade {
    /// Fade-in length in seconds (0 disables).
    pub fade_in: f64,
    /// Fade-out length in seconds (0 disables).
    pub fade_out: f64,
}

impl Fade {
    /// No ramps; fully opaque for the whole window.
    pub const NONE: Self = Self {
        fade_in: 0.0,
        fade_out: 0.0,
    };

    /// Fade in only.
    pub fn fade_in(secs: f64) -> Self {
        Self {
            fade_in: secs,
            fade_out: 0.0,
        }
    }

    /// Fade in and out with the same duration.
    pub fn symmetric(secs: f64) -> Self {
        Self {
            fade_in: secs,
            fade_out: secs,
        }
    }

    /// Opacity in `[0, 1]` of an item with this fade over `window` at time `t`.
    pub fn opacity_at(self, window: TimeWindow, t: f64) -> f32 {
        if !window.contains(t) {
            return 0.0;
        }
        let mut o = 1.0f64;
        if self.fade_in > 0.0 {
            o = o.min((t - window.start) / self.fade_in);
        }
        if self.fade_out > 0.0 {
            o = o.min((window.end - t) / self.fade_out);
        }
        o.clamp(0.0, 1.0) as f32
    }
}

/// Resolve the composite duration.
///
/// An explicit duration wins; otherwise the maximum end time over all slides and images is used
/// (an empty manifest resolves to 0).
pub fn resolve_duration(explicit: Option<f64>, slides: &[Slide], images: &[ImageItem]) -> f64 {
    if let Some(d) = explicit {
        return d;
    }
    let max_text = slides.iter().map(|s| s.end_time).fold(0.0, f64::max);
    let max_image = images.iter().map(|i| i.window.end).fold(0.0, f64::max);
    max_text.max(max_image)
}

#[cfg(test)]
#[path = "../../tests/unit/timeline/window.rs"]
mod tests;
