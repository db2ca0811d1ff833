use crate::effects::blur::{MASK_KERNEL_SIZE, MASK_SIGMA, blur_plane};
use crate::foundation::error::{ReelError, ReelResult};

/// Channel value above which a foreground pixel counts as backdrop white.
pub const WHITE_KEY_THRESHOLD: u8 = 240;

/// Per-pixel background weight in `[0, 1]`: 1 shows the background, 0 keeps the foreground.
#[derive(Clone, Debug, PartialEq)]
pub struct Mask {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
    /// Row-major weights.
    pub weights: Vec<f32>,
}

/// Build the softened white-key mask for an RGB24 foreground frame.
///
/// A pixel is keyed when all three channels exceed `threshold`; the hard mask is then blurred
/// so the matte edge blends smoothly.
pub fn white_mask(rgb: &[u8], width: u32, height: u32, threshold: u8) -> ReelResult<Mask> {
    check_rgb_len(rgb, width, height, "foreground")?;
    let hard: Vec<f32> = rgb
        .chunks_exact(3)
        .map(|px| {
            if px.iter().all(|&c| c > threshold) {
                1.0
            } else {
                0.0
            }
        })
        .collect();
    let weights = blur_plane(&hard, width, height, MASK_KERNEL_SIZE, MASK_SIGMA)?;
    Ok(Mask {
        width,
        height,
        weights,
    })
}

/// Blend two RGB24 frames of equal size: `fg × (1 − m) + bg × m` per channel.
pub fn blend_with_mask(fg: &[u8], bg: &[u8], mask: &Mask) -> ReelResult<Vec<u8>> {
    check_rgb_len(fg, mask.width, mask.height, "foreground")?;
    check_rgb_len(bg, mask.width, mask.height, "background")?;

    let mut out = Vec::with_capacity(fg.len());
    for ((f, b), &m) in fg
        .chunks_exact(3)
        .zip(bg.chunks_exact(3))
        .zip(&mask.weights)
    {
        let m = m.clamp(0.0, 1.0);
        for c in 0..3 {
            let fv = f32::from(f[c]) / 255.0;
            let bv = f32::from(b[c]) / 255.0;
            let v = (fv * (1.0 - m) + bv * m) * 255.0;
            out.push(v.round().clamp(0.0, 255.0) as u8);
        }
    }
    Ok(out)
}

fn check_rgb_len(rgb: &[u8], width: u32, height: u32, what: &str) -> ReelResult<()> {
    let expected = (width as usize) * (height as usize) * 3;
    if rgb.len() != expected {
        return Err(ReelError::decode(format!(
            "{what} frame has {} bytes, expected {expected} for {width}x{height} rgb24",
            rgb.len()
        )));
    }
    Ok(())
}

#[cfg(test)]
#[path = "../../tests/unit/effects/key.rs"]
mod tests;
