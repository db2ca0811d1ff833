use crate::assembly::layers::{Layer, Paint};
use crate::assets::raster::RasterImage;
use crate::effects::composite::{blit_over, fill_solid, flatten_to_rgb24};
use crate::foundation::core::{Canvas, Rgb8};
use crate::foundation::error::ReelResult;
use crate::foundation::math::opacity_to_u8;
use crate::media::source::FrameSample;

/// Visible layers and their quantized opacities; equal signatures render identical pixels.
type Signature = Vec<(usize, u8)>;

/// Rasterizes layer stacks into RGB24 frames.
///
/// Consecutive frames with the same visible layer set and opacities reuse the previous
/// raster, which makes the long static stretches of a caption video cheap.
pub struct FrameRenderer {
    canvas: Canvas,
    matte: Rgb8,
    premul: Vec<u8>,
    last: Option<(Signature, Vec<u8>)>,
    reused: u64,
    rendered: u64,
}

impl FrameRenderer {
    /// Create a renderer. `matte` shows through wherever no layer paints.
    pub fn new(canvas: Canvas, matte: Rgb8) -> Self {
        Self {
            canvas,
            matte,
            premul: vec![0u8; canvas.pixel_count() * 4],
            last: None,
            reused: 0,
            rendered: 0,
        }
    }

    /// Render the frame at time `t`.
    pub fn render(&mut self, layers: &[Layer], t: f64) -> ReelResult<FrameSample> {
        let sig: Signature = layers
            .iter()
            .enumerate()
            .filter_map(|(i, l)| {
                let o = opacity_to_u8(l.opacity_at(t));
                (o > 0).then_some((i, o))
            })
            .collect();

        if let Some((last_sig, rgb)) = &self.last
            && *last_sig == sig
        {
            self.reused += 1;
            return Ok(self.sample(rgb.clone(), t));
        }

        self.premul.fill(0);
        for &(i, o) in &sig {
            let layer = &layers[i];
            let opacity = f32::from(o) / 255.0;
            match &layer.paint {
                Paint::Raster(img) => {
                    blit_over(&mut self.premul, self.canvas, img, layer.x, layer.y, opacity)?;
                }
                Paint::Solid {
                    color,
                    width,
                    height,
                } if o == 255
                    && (layer.x, layer.y) == (0, 0)
                    && (*width, *height) == (self.canvas.width, self.canvas.height) =>
                {
                    fill_solid(&mut self.premul, *color);
                }
                Paint::Solid {
                    color,
                    width,
                    height,
                } => {
                    let rect = RasterImage::solid(*width, *height, color.to_rgba8());
                    blit_over(&mut self.premul, self.canvas, &rect, layer.x, layer.y, opacity)?;
                }
            }
        }
        let rgb = flatten_to_rgb24(&self.premul, self.matte)?;
        self.rendered += 1;
        self.last = Some((sig, rgb.clone()));
        Ok(self.sample(rgb, t))
    }

    fn sample(&self, data: Vec<u8>, t: f64) -> FrameSample {
        FrameSample {
            width: self.canvas.width,
            height: self.canvas.height,
            data,
            timestamp_secs: t,
        }
    }

    /// Frames composited from scratch so far.
    pub fn rendered(&self) -> u64 {
        self.rendered
    }

    /// Frames served from the previous raster so far.
    pub fn reused(&self) -> u64 {
        self.reused
    }
}

#[cfg(test)]
#[path = "../../tests/unit/assembly/render.rs"]
mod tests;
