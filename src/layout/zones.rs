//! Split-screen zone geometry and scale-to-fit sizing.

use crate::foundation::core::Canvas;
use crate::foundation::error::{ReelError, ReelResult};

/// Rectangle of the output frame reserved for one content category.
///
/// Bounds are in pixels, `top`/`left` inclusive and `bottom`/`right` exclusive.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize)]
pub struct Zone {
    /// Top edge.
    pub top: i32,
    /// Bottom edge.
    pub bottom: i32,
    /// Left edge.
    pub left: i32,
    /// Right edge.
    pub right: i32,
}

impl Zone {
    /// Create a validated zone with `top <= bottom` and `left <= right`.
    pub fn new(top: i32, bottom: i32, left: i32, right: i32) -> ReelResult<Self> {
        if top > bottom || left > right {
            return Err(ReelError::config(format!(
                "invalid zone: top={top} bottom={bottom} left={left} right={right}"
            )));
        }
        Ok(Self {
            top,
            bottom,
            left,
            right,
        })
    }

    /// Zone height in pixels.
    pub fn height(&self) -> i32 {
        self.bottom - self.top
    }

    /// Zone width in pixels.
    pub fn width(&self) -> i32 {
        self.right - self.left
    }
}

/// Distance from the top of the frame to the header baseline box.
pub const HEADER_MARGIN_TOP: i32 = 100;
/// Gap between the header box and the caption body zone.
pub const HEADER_BODY_GAP: i32 = 20;
/// Caption character budget passed to the wrapper.
pub const CAPTION_CHAR_LIMIT: usize = 20;

/// Split-screen geometry: header and captions on the top half, imagery on the bottom half.
///
/// Font sizes derive from the frame width so the same manifest scales across resolutions.
/// Zones are clamped to their half of the frame, so on very small canvases the caption zone may
/// collapse to zero height (lines are then skipped by the placement policy rather than drawn
/// across the midline).
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize)]
pub struct SplitScreen {
    /// Output canvas.
    pub canvas: Canvas,
    /// Caption font size in pixels (5% of the frame width).
    pub font_size: u32,
    /// Header font size in pixels (caption size × 1.2).
    pub header_font_size: u32,
    /// Vertical advance per wrapped caption line.
    pub line_spacing: f64,
    /// Header zone.
    pub header: Zone,
    /// Caption body zone.
    pub body: Zone,
    /// Image zone.
    pub image: Zone,
}

impl SplitScreen {
    /// Compute the split-screen geometry for a canvas.
    pub fn for_canvas(canvas: Canvas) -> ReelResult<Self> {
        if canvas.width == 0 || canvas.height == 0 {
            return Err(ReelError::config("canvas width/height must be non-zero"));
        }
        let width = i32::try_from(canvas.width)
            .map_err(|_| ReelError::config("canvas width exceeds i32"))?;
        let height = i32::try_from(canvas.height)
            .map_err(|_| ReelError::config("canvas height exceeds i32"))?;

        let font_size = (f64::from(canvas.width) * 0.05).floor().max(1.0) as u32;
        let header_font_size = (f64::from(font_size) * 1.2).floor().max(1.0) as u32;
        let midline = height / 2;

        let header_height = 2 * header_font_size as i32;
        let header_top = HEADER_MARGIN_TOP.min(midline);
        let header_bottom = (HEADER_MARGIN_TOP + header_height).min(midline);
        let body_top = (header_height + HEADER_MARGIN_TOP + HEADER_BODY_GAP).min(midline);

        Ok(Self {
            canvas,
            font_size,
            header_font_size,
            line_spacing: f64::from(font_size) * 1.5,
            header: Zone::new(header_top, header_bottom, 0, width)?,
            body: Zone::new(body_top, midline, 0, width)?,
            image: Zone::new(midline, height, 0, width)?,
        })
    }

    /// Lowest pixel row a caption line may reach before it is skipped.
    pub fn caption_bottom_bound(&self) -> i32 {
        self.body.bottom
    }
}

/// Uniform scale-to-fit of a `src_w × src_h` image into a `max_w × max_h` box.
///
/// Returns the truncated target size (at least 1×1), or `None` for degenerate inputs.
pub fn fit_within(src_w: u32, src_h: u32, max_w: u32, max_h: u32) -> Option<(u32, u32)> {
    if src_w == 0 || src_h == 0 || max_w == 0 || max_h == 0 {
        return None;
    }
    let scale = (f64::from(max_w) / f64::from(src_w)).min(f64::from(max_h) / f64::from(src_h));
    // Truncate, but absorb float noise such as 959.9999999999999.
    let w = ((f64::from(src_w) * scale + 1e-9) as u32).clamp(1, max_w);
    let h = ((f64::from(src_h) * scale + 1e-9) as u32).clamp(1, max_h);
    Some((w, h))
}

#[cfg(test)]
#[path = "../../tests/unit/layout/zones.rs"]
mod tests;
