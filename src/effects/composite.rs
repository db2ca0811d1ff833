use crate::assets::raster::RasterImage;
use crate::foundation::core::{Canvas, Rgb8};
use crate::foundation::error::{ReelError, ReelResult};
use crate::foundation::math::{mul_div255_u8, opacity_to_u8};

/// One premultiplied RGBA8 pixel.
pub type PremulRgba8 = [u8; 4];

/// Source-over for one premultiplied pixel, with the source scaled by `opacity`.
pub fn over(dst: PremulRgba8, src: PremulRgba8, opacity: f32) -> PremulRgba8 {
    let op = u16::from(opacity_to_u8(opacity));
    if op == 0 || src[3] == 0 {
        return dst;
    }

    let sa = mul_div255_u8(u16::from(src[3]), op);
    if sa == 0 {
        return dst;
    }

    let inv = 255u16 - u16::from(sa);

    let mut out = [0u8; 4];
    out[3] = sa.saturating_add(mul_div255_u8(u16::from(dst[3]), inv));

    for i in 0..3 {
        let sc = mul_div255_u8(u16::from(src[i]), op);
        let dc = mul_div255_u8(u16::from(dst[i]), inv);
        out[i] = sc.saturating_add(dc);
    }
    out
}

/// Fill a premultiplied canvas with an opaque color.
pub fn fill_solid(dst: &mut [u8], color: Rgb8) {
    let px = color.to_rgba8();
    for d in dst.chunks_exact_mut(4) {
        d.copy_from_slice(&px);
    }
}

/// Composite `img` onto the canvas with its top-left corner at `(x, y)`.
///
/// Parts of the image outside the canvas are clipped.
pub fn blit_over(
    dst: &mut [u8],
    canvas: Canvas,
    img: &RasterImage,
    x: i32,
    y: i32,
    opacity: f32,
) -> ReelResult<()> {
    if dst.len() != canvas.pixel_count() * 4 {
        return Err(ReelError::encode(
            "blit_over expects a canvas buffer matching width*height*4",
        ));
    }
    if opacity <= 0.0 {
        return Ok(());
    }

    let cw = i64::from(canvas.width);
    let ch = i64::from(canvas.height);
    let iw = i64::from(img.width);
    let ih = i64::from(img.height);
    let (x, y) = (i64::from(x), i64::from(y));

    let x0 = x.max(0);
    let y0 = y.max(0);
    let x1 = (x + iw).min(cw);
    let y1 = (y + ih).min(ch);
    if x0 >= x1 || y0 >= y1 {
        return Ok(());
    }

    let src = img.rgba8_premul.as_slice();
    for dy in y0..y1 {
        let sy = dy - y;
        for dx in x0..x1 {
            let sx = dx - x;
            let si = ((sy * iw + sx) as usize) * 4;
            let di = ((dy * cw + dx) as usize) * 4;
            let s = [src[si], src[si + 1], src[si + 2], src[si + 3]];
            let d = [dst[di], dst[di + 1], dst[di + 2], dst[di + 3]];
            dst[di..di + 4].copy_from_slice(&over(d, s, opacity));
        }
    }
    Ok(())
}

/// Flatten a premultiplied RGBA8 buffer over an opaque background into packed RGB24.
pub fn flatten_to_rgb24(src: &[u8], bg: Rgb8) -> ReelResult<Vec<u8>> {
    if !src.len().is_multiple_of(4) {
        return Err(ReelError::encode(
            "flatten_to_rgb24 expects an rgba8 buffer",
        ));
    }
    let bg = [bg.r, bg.g, bg.b];
    let mut out = Vec::with_capacity(src.len() / 4 * 3);
    for px in src.chunks_exact(4) {
        let inv = 255u16 - u16::from(px[3]);
        for c in 0..3 {
            out.push(px[c].saturating_add(mul_div255_u8(u16::from(bg[c]), inv)));
        }
    }
    Ok(out)
}

#[cfg(test)]
#[path = "../../tests/unit/effects/composite.rs"]
mod tests;
