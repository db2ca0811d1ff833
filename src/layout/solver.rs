//! Vertical block centering and caption line placement.

use crate::foundation::math::floor_half;
use crate::layout::zones::Zone;

/// Extra gap (in multiples of `line_spacing`) inserted after each caption item.
pub const ITEM_GAP_FACTOR: f64 = 0.8;

/// Vertical start offset that centers a block of lines inside `zone`.
///
/// `start_y = zone.top + floor((zone.height - Σ heights) / 2)`, clamped to `zone.top` when the
/// block is taller than the zone.
pub fn block_start_y(zone: &Zone, line_heights: &[f64]) -> i32 {
    let total: f64 = line_heights.iter().sum();
    let offset = ((f64::from(zone.height()) - total) / 2.0).floor();
    (f64::from(zone.top) + offset).max(f64::from(zone.top)) as i32
}

/// Horizontal offset that centers an element of width `w` in a frame of width `frame_width`.
///
/// Uses floor division, so elements wider than the frame get a negative offset.
pub fn center_x(frame_width: u32, w: u32) -> i32 {
    floor_half(i64::from(frame_width) - i64::from(w)) as i32
}

/// Offset of a `w × h` element centered in `zone`.
pub fn center_in_zone(zone: &Zone, w: u32, h: u32) -> (i32, i32) {
    let x = zone.left as i64 + floor_half(i64::from(zone.width()) - i64::from(w));
    let y = zone.top as i64 + floor_half(i64::from(zone.height()) - i64::from(h));
    (x as i32, y as i32)
}

/// A wrapped caption line with its rendered size.
#[derive(Clone, Debug, PartialEq)]
pub struct MeasuredLine {
    /// Line text after wrapping.
    pub text: String,
    /// Rendered width in pixels.
    pub width: u32,
    /// Rendered height in pixels.
    pub height: u32,
}

/// Caption line placed on the frame.
#[derive(Clone, Debug, PartialEq, serde::Serialize)]
pub struct PlacedLine {
    /// Index of the source line within its slide.
    pub item: usize,
    /// Index of the wrapped line within its source line.
    pub part: usize,
    /// Line text.
    pub text: String,
    /// Left edge.
    pub x: i32,
    /// Top edge.
    pub y: i32,
}

/// Inputs shared by every slide placed in one layout.
#[derive(Clone, Copy, Debug)]
pub struct SlideLayoutParams {
    /// Zone in which each slide's block is centered.
    pub zone: Zone,
    /// Frame width used for horizontal centering.
    pub frame_width: u32,
    /// Vertical advance per wrapped line.
    pub line_spacing: f64,
    /// Lines whose bottom edge would pass this row are skipped.
    pub bottom_bound: i32,
}

/// Result of placing one slide.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct SlidePlacement {
    /// Lines that fit, in reading order.
    pub placed: Vec<PlacedLine>,
    /// `(item, part)` pairs that were skipped because they crossed the bottom bound.
    pub skipped: Vec<(usize, usize)>,
}

/// Place the wrapped lines of one slide.
///
/// The block (one `line_spacing` per wrapped line) is centered in the zone; the cursor advances
/// by `line_spacing` per wrapped line and by a further `ITEM_GAP_FACTOR × line_spacing` after
/// each source item. A line that would extend below `bottom_bound` is skipped, never clipped.
pub fn place_slide(params: &SlideLayoutParams, items: &[Vec<MeasuredLine>]) -> SlidePlacement {
    let wrapped_count: usize = items.iter().map(Vec::len).sum();
    let heights = vec![params.line_spacing; wrapped_count];
    let mut cursor = f64::from(block_start_y(&params.zone, &heights));

    let mut out = SlidePlacement::default();
    for (item, lines) in items.iter().enumerate() {
        for (part, line) in lines.iter().enumerate() {
            let y = cursor.floor() as i32;
            if i64::from(y) + i64::from(line.height) > i64::from(params.bottom_bound) {
                tracing::debug!(item, part, y, "caption line crosses bottom bound; skipping");
                out.skipped.push((item, part));
            } else {
                out.placed.push(PlacedLine {
                    item,
                    part,
                    text: line.text.clone(),
                    x: center_x(params.frame_width, line.width),
                    y,
                });
            }
            cursor += params.line_spacing;
        }
        cursor += params.line_spacing * ITEM_GAP_FACTOR;
    }
    out
}

#[cfg(test)]
#[path = "../../tests/unit/layout/solver.rs"]
mod tests;
