//! Output-to-source frame mapping for two clips of different lengths.

use crate::foundation::core::Fps;
use crate::media::probe::VideoInfo;

/// Source frame shown at output frame `i` when `total` output frames span `count` source frames.
///
/// `floor(i × count / total)` in exact integer arithmetic: monotonic in `i` and always below
/// `count` for `i < total`.
pub fn source_frame_index(i: u64, total: u64, count: u64) -> u64 {
    if total == 0 {
        return 0;
    }
    ((u128::from(i) * u128::from(count)) / u128::from(total)) as u64
}

/// Output rate: the rate of the longer source, the foreground on a tie.
pub fn output_fps(fg: &VideoInfo, bg: &VideoInfo) -> Fps {
    // frames / (num / den) compared by cross-multiplication.
    let fg_len = u128::from(fg.frame_count) * u128::from(fg.fps.den) * u128::from(bg.fps.num);
    let bg_len = u128::from(bg.frame_count) * u128::from(bg.fps.den) * u128::from(fg.fps.num);
    if bg_len > fg_len { bg.fps } else { fg.fps }
}

/// Number of composited frames: the shorter source's frame count.
pub fn total_frames(fg: &VideoInfo, bg: &VideoInfo) -> u64 {
    fg.frame_count.min(bg.frame_count)
}

#[cfg(test)]
#[path = "../../tests/unit/compositor/mapping.rs"]
mod tests;
