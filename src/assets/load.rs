use std::path::Path;

use anyhow::Context as _;

use crate::assets::raster::{RasterImage, premultiply_rgba8_in_place};
use crate::foundation::error::{ReelError, ReelResult};
use crate::layout::zones::fit_within;

/// Load an image from disk and scale it uniformly to fit a `max_width × max_height` box.
///
/// Aspect ratio is preserved (scale-to-fit, upscaling allowed) and the resampling filter is
/// Lanczos3. Missing files surface as [`ReelError::NotFound`], undecodable files as
/// [`ReelError::Decode`]; both are recoverable at the item level.
#[tracing::instrument(level = "debug", skip_all, fields(path = %path.display()))]
pub fn load_fitted_image(path: &Path, max_width: u32, max_height: u32) -> ReelResult<RasterImage> {
    if !path.is_file() {
        return Err(ReelError::not_found("image", path));
    }
    let bytes = std::fs::read(path)
        .with_context(|| format!("read image '{}'", path.display()))?;
    let decoded = image::load_from_memory(&bytes)
        .map_err(|e| ReelError::decode(format!("decode image '{}': {e}", path.display())))?;
    fit_decoded(decoded, max_width, max_height)
}

/// Decode encoded image bytes without resizing.
pub fn decode_image(bytes: &[u8]) -> ReelResult<RasterImage> {
    let decoded = image::load_from_memory(bytes)
        .map_err(|e| ReelError::decode(format!("decode image from memory: {e}")))?;
    let rgba = decoded.to_rgba8();
    let (width, height) = rgba.dimensions();
    let mut data = rgba.into_raw();
    premultiply_rgba8_in_place(&mut data);
    RasterImage::from_premul(width, height, data)
}

fn fit_decoded(
    decoded: image::DynamicImage,
    max_width: u32,
    max_height: u32,
) -> ReelResult<RasterImage> {
    let rgba = decoded.to_rgba8();
    let (src_w, src_h) = rgba.dimensions();
    let (dst_w, dst_h) = fit_within(src_w, src_h, max_width, max_height)
        .ok_or_else(|| ReelError::decode(format!("image has degenerate size {src_w}x{src_h}")))?;

    let resized = if (dst_w, dst_h) == (src_w, src_h) {
        rgba
    } else {
        image::imageops::resize(&rgba, dst_w, dst_h, image::imageops::FilterType::Lanczos3)
    };

    let mut data = resized.into_raw();
    premultiply_rgba8_in_place(&mut data);
    RasterImage::from_premul(dst_w, dst_h, data)
}

#[cfg(test)]
#[path = "../../tests/unit/assets/load.rs"]
mod tests;
