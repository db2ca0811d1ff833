//! Single-line text shaping and rasterization.

use std::borrow::Cow;
use std::path::Path;

use anyhow::Context as _;

use crate::assets::raster::RasterImage;
use crate::foundation::core::Rgb8;
use crate::foundation::error::{ReelError, ReelResult};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
/// RGBA8 brush color used by Parley text layout.
pub(crate) struct TextBrushRgba8 {
    pub(crate) r: u8,
    pub(crate) g: u8,
    pub(crate) b: u8,
    pub(crate) a: u8,
}

/// Which of the two configured faces to draw with.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FontRole {
    /// Caption body text.
    Regular,
    /// Header text.
    Bold,
}

struct LoadedFont {
    family: String,
    data: vello_cpu::peniko::FontData,
}

/// Shapes single caption lines with Parley and rasterizes them with `vello_cpu`.
///
/// Each call produces a tightly cropped premultiplied raster whose size is the measured
/// advance × line height, which is what horizontal centering and the skip-below-bound policy
/// operate on.
pub struct TextRasterizer {
    font_ctx: parley::FontContext,
    layout_ctx: parley::LayoutContext<TextBrushRgba8>,
    regular: LoadedFont,
    bold: LoadedFont,
}

impl TextRasterizer {
    /// Load regular and bold faces from font files.
    pub fn from_paths(regular: &Path, bold: &Path) -> ReelResult<Self> {
        let regular = read_font(regular)?;
        let bold = read_font(bold)?;
        Self::from_bytes(regular, bold)
    }

    /// Build a rasterizer from raw font bytes (TTF/OTF).
    pub fn from_bytes(regular: Vec<u8>, bold: Vec<u8>) -> ReelResult<Self> {
        let mut font_ctx = parley::FontContext::default();
        let regular = register_font(&mut font_ctx, regular)?;
        let bold = register_font(&mut font_ctx, bold)?;
        Ok(Self {
            font_ctx,
            layout_ctx: parley::LayoutContext::new(),
            regular,
            bold,
        })
    }

    /// Shape and rasterize one line of text.
    pub fn rasterize_line(
        &mut self,
        text: &str,
        role: FontRole,
        size_px: f32,
        color: Rgb8,
    ) -> ReelResult<RasterImage> {
        if !size_px.is_finite() || size_px <= 0.0 {
            return Err(ReelError::config("text size_px must be finite and > 0"));
        }

        let font = match role {
            FontRole::Regular => &self.regular,
            FontRole::Bold => &self.bold,
        };
        let family = font.family.clone();
        let font_data = font.data.clone();

        let brush = TextBrushRgba8 {
            r: color.r,
            g: color.g,
            b: color.b,
            a: 255,
        };
        let mut builder = self
            .layout_ctx
            .ranged_builder(&mut self.font_ctx, text, 1.0, true);
        builder.push_default(parley::style::StyleProperty::FontStack(
            parley::style::FontStack::Source(Cow::Owned(family)),
        ));
        builder.push_default(parley::style::StyleProperty::FontSize(size_px));
        builder.push_default(parley::style::StyleProperty::Brush(brush));
        if role == FontRole::Bold {
            builder.push_default(parley::style::StyleProperty::FontWeight(
                parley::style::FontWeight::BOLD,
            ));
        }
        let mut layout: parley::Layout<TextBrushRgba8> = builder.build(text);
        layout.break_all_lines(None);

        let (width, height) = measure(&layout)?;
        let mut ctx = vello_cpu::RenderContext::new(width, height);
        for line in layout.lines() {
            for item in line.items() {
                let parley::layout::PositionedLayoutItem::GlyphRun(run) = item else {
                    continue;
                };

                let brush = run.style().brush;
                ctx.set_paint(vello_cpu::peniko::Color::from_rgba8(
                    brush.r, brush.g, brush.b, brush.a,
                ));

                let glyphs = run.positioned_glyphs().map(|g| vello_cpu::Glyph {
                    id: g.id,
                    x: g.x,
                    y: g.y,
                });
                ctx.glyph_run(&font_data)
                    .font_size(run.run().font_size())
                    .fill_glyphs(glyphs);
            }
        }
        ctx.flush();

        let mut pixmap = vello_cpu::Pixmap::new(width, height);
        ctx.render_to_pixmap(&mut pixmap);
        RasterImage::from_premul(
            u32::from(width),
            u32::from(height),
            pixmap.data_as_u8_slice().to_vec(),
        )
    }
}

fn read_font(path: &Path) -> ReelResult<Vec<u8>> {
    if !path.is_file() {
        return Err(ReelError::not_found("font", path));
    }
    Ok(std::fs::read(path).with_context(|| format!("read font '{}'", path.display()))?)
}

fn register_font(font_ctx: &mut parley::FontContext, bytes: Vec<u8>) -> ReelResult<LoadedFont> {
    let families = font_ctx
        .collection
        .register_fonts(parley::fontique::Blob::from(bytes.clone()), None);
    let family_id = families
        .first()
        .map(|(id, _)| *id)
        .ok_or_else(|| ReelError::config("no font families registered from font bytes"))?;
    let family = font_ctx
        .collection
        .family_name(family_id)
        .ok_or_else(|| ReelError::config("registered font family has no name"))?
        .to_string();

    let data = vello_cpu::peniko::FontData::new(vello_cpu::peniko::Blob::from(bytes), 0);
    Ok(LoadedFont { family, data })
}

/// Advance width × summed line height, rounded up to whole pixels.
fn measure(layout: &parley::Layout<TextBrushRgba8>) -> ReelResult<(u16, u16)> {
    let mut w = 0.0f32;
    let mut h = 0.0f32;
    for line in layout.lines() {
        let m = line.metrics();
        w = w.max(m.advance);
        h += m.ascent + m.descent + m.leading;
    }
    let to_px = |v: f32, what: &str| -> ReelResult<u16> {
        let px = v.ceil().max(1.0);
        if px > f32::from(u16::MAX) {
            return Err(ReelError::config(format!("text {what} {px}px exceeds u16")));
        }
        Ok(px as u16)
    };
    Ok((to_px(w, "width")?, to_px(h, "height")?))
}

#[cfg(test)]
#[path = "../../tests/unit/text/rasterize.rs"]
mod tests;
