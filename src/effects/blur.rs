use crate::foundation::error::{ReelError, ReelResult};

/// Kernel size used to soften key masks.
pub const MASK_KERNEL_SIZE: usize = 5;

/// Sigma used with [`MASK_KERNEL_SIZE`].
///
/// Matches the automatic choice `0.3 × ((k − 1) × 0.5 − 1) + 0.8` for a 5-tap kernel.
pub const MASK_SIGMA: f32 = 1.1;

/// Separable gaussian blur of a single-channel `f32` plane.
///
/// Borders are handled by reflection without repeating the edge sample (`dcb|abcd|cba`).
pub fn blur_plane(
    src: &[f32],
    width: u32,
    height: u32,
    ksize: usize,
    sigma: f32,
) -> ReelResult<Vec<f32>> {
    let expected_len = (width as usize)
        .checked_mul(height as usize)
        .ok_or_else(|| ReelError::decode("blur buffer size overflow"))?;
    if src.len() != expected_len {
        return Err(ReelError::decode(
            "blur_plane expects src matching width*height",
        ));
    }
    if ksize <= 1 || expected_len == 0 {
        return Ok(src.to_vec());
    }

    let kernel = gaussian_kernel(ksize, sigma)?;
    let mut tmp = vec![0f32; expected_len];
    let mut out = vec![0f32; expected_len];

    horizontal_pass(src, &mut tmp, width as usize, height as usize, &kernel);
    vertical_pass(&tmp, &mut out, width as usize, height as usize, &kernel);
    Ok(out)
}

pub(crate) fn gaussian_kernel(ksize: usize, sigma: f32) -> ReelResult<Vec<f32>> {
    if ksize.is_multiple_of(2) {
        return Err(ReelError::config("blur kernel size must be odd"));
    }
    if !sigma.is_finite() || sigma <= 0.0 {
        return Err(ReelError::config("blur sigma must be > 0"));
    }

    let r = (ksize / 2) as i32;
    let denom = 2.0 * f64::from(sigma) * f64::from(sigma);
    let weights: Vec<f64> = (-r..=r)
        .map(|i| {
            let x = f64::from(i);
            (-x * x / denom).exp()
        })
        .collect();
    let sum: f64 = weights.iter().sum();
    Ok(weights.into_iter().map(|w| (w / sum) as f32).collect())
}

/// Reflect an out-of-range index back into `[0, n)` without repeating the edge.
pub(crate) fn reflect_101(i: isize, n: usize) -> usize {
    if n == 1 {
        return 0;
    }
    let n = n as isize;
    let period = 2 * (n - 1);
    let mut i = i.rem_euclid(period);
    if i >= n {
        i = period - i;
    }
    i as usize
}

fn horizontal_pass(src: &[f32], dst: &mut [f32], w: usize, h: usize, k: &[f32]) {
    let radius = (k.len() / 2) as isize;
    for y in 0..h {
        let row = &src[y * w..(y + 1) * w];
        for x in 0..w {
            let mut acc = 0f32;
            for (ki, &kw) in k.iter().enumerate() {
                let sx = reflect_101(x as isize + ki as isize - radius, w);
                acc += kw * row[sx];
            }
            dst[y * w + x] = acc;
        }
    }
}

fn vertical_pass(src: &[f32], dst: &mut [f32], w: usize, h: usize, k: &[f32]) {
    let radius = (k.len() / 2) as isize;
    for y in 0..h {
        for x in 0..w {
            let mut acc = 0f32;
            for (ki, &kw) in k.iter().enumerate() {
                let sy = reflect_101(y as isize + ki as isize - radius, h);
                acc += kw * src[sy * w + x];
            }
            dst[y * w + x] = acc;
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/effects/blur.rs"]
mod tests;
