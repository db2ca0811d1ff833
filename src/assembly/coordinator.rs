use std::path::{Path, PathBuf};

use crate::assembly::layers::{Layer, LayerKind, LayerPlan, Paint, SkippedItem};
use crate::assembly::render::FrameRenderer;
use crate::assets::load::load_fitted_image;
use crate::encode::ffmpeg::{FfmpegSink, FfmpegSinkOpts, ensure_parent_dir};
use crate::encode::scratch::ScratchFile;
use crate::encode::sink::{FrameSink, SinkConfig};
use crate::foundation::core::{Canvas, Fps, FrameIndex, Rgb8};
use crate::foundation::error::{ReelError, ReelResult};
use crate::layout::solver::{
    MeasuredLine, SlideLayoutParams, center_in_zone, center_x, place_slide,
};
use crate::layout::zones::{CAPTION_CHAR_LIMIT, SplitScreen};
use crate::manifest::model::CompositeManifest;
use crate::text::rasterize::{FontRole, TextRasterizer};
use crate::text::wrap::wrap;
use crate::timeline::window::{Fade, TimeWindow};

/// Caption and header ink.
pub const TEXT_COLOR: Rgb8 = Rgb8::BLACK;

/// Encoder knobs for [`Coordinator::create_video`].
#[derive(Clone, Debug)]
pub struct AssembleOpts {
    /// x264 preset.
    pub preset: Option<String>,
    /// Encoder thread hint.
    pub threads: Option<u32>,
    /// Replace an existing output file.
    pub overwrite: bool,
}

impl Default for AssembleOpts {
    fn default() -> Self {
        Self {
            preset: Some("medium".to_string()),
            threads: Some(4),
            overwrite: true,
        }
    }
}

/// Frame counters from one render pass.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize)]
pub struct RenderStats {
    /// Frames pushed to the sink.
    pub frames: u64,
    /// Frames composited from scratch.
    pub rendered: u64,
    /// Frames that reused the previous raster.
    pub reused: u64,
}

/// Builds the split-screen caption video described by a manifest.
#[derive(Clone, Debug)]
pub struct Coordinator {
    manifest: CompositeManifest,
}

impl Coordinator {
    /// Wrap a validated manifest.
    pub fn new(manifest: CompositeManifest) -> Self {
        Self { manifest }
    }

    /// Load and validate a manifest file.
    pub fn from_path(path: &Path) -> ReelResult<Self> {
        Ok(Self::new(CompositeManifest::from_path(path)?))
    }

    /// The manifest being assembled.
    pub fn manifest(&self) -> &CompositeManifest {
        &self.manifest
    }

    /// Resolve every content item into positioned layers.
    ///
    /// Images that are missing or undecodable are skipped with a warning; anything else
    /// (fonts, geometry) fails the build.
    #[tracing::instrument(level = "debug", skip_all)]
    pub fn build(&self) -> ReelResult<Assembly> {
        let m = &self.manifest;
        let geometry = SplitScreen::for_canvas(m.canvas)?;
        let full = TimeWindow {
            start: 0.0,
            end: m.duration,
        };

        let mut layers = vec![Layer {
            kind: LayerKind::Background,
            paint: Paint::Solid {
                color: m.background_color,
                width: m.canvas.width,
                height: m.canvas.height,
            },
            text: None,
            x: 0,
            y: 0,
            window: full,
            fade: Fade::NONE,
        }];
        let mut skipped = Vec::new();

        let mut text = match &m.fonts {
            Some(fonts) if m.header.is_some() || !m.slides.is_empty() => {
                Some(TextRasterizer::from_paths(&fonts.regular, &fonts.bold)?)
            }
            _ => None,
        };

        if let (Some(header), Some(text)) = (&m.header, text.as_mut()) {
            let raster = text.rasterize_line(
                header,
                FontRole::Bold,
                geometry.header_font_size as f32,
                TEXT_COLOR,
            )?;
            layers.push(Layer {
                kind: LayerKind::Header,
                x: center_x(m.canvas.width, raster.width),
                y: geometry.header.top,
                paint: Paint::Raster(raster),
                text: Some(header.clone()),
                window: full,
                fade: Fade::NONE,
            });
        }

        if let Some(text) = text.as_mut() {
            self.build_captions(text, &geometry, &mut layers, &mut skipped)?;
        }
        self.build_images(&geometry, &mut layers, &mut skipped)?;

        tracing::info!(
            layers = layers.len(),
            skipped = skipped.len(),
            duration = m.duration,
            "composite built"
        );
        Ok(Assembly {
            canvas: m.canvas,
            fps: m.fps,
            duration: m.duration,
            background_color: m.background_color,
            layers,
            skipped,
        })
    }

    fn build_captions(
        &self,
        text: &mut TextRasterizer,
        geometry: &SplitScreen,
        layers: &mut Vec<Layer>,
        skipped: &mut Vec<SkippedItem>,
    ) -> ReelResult<()> {
        let m = &self.manifest;
        let params = SlideLayoutParams {
            zone: geometry.body,
            frame_width: m.canvas.width,
            line_spacing: geometry.line_spacing,
            bottom_bound: geometry.caption_bottom_bound(),
        };

        for (slide_idx, slide) in m.slides.iter().enumerate() {
            let mut measured = Vec::with_capacity(slide.lines.len());
            let mut rasters = Vec::with_capacity(slide.lines.len());
            for line in &slide.lines {
                let mut parts = Vec::new();
                let mut part_rasters = Vec::new();
                for part in wrap(line, CAPTION_CHAR_LIMIT) {
                    let raster = text.rasterize_line(
                        &part,
                        FontRole::Regular,
                        geometry.font_size as f32,
                        TEXT_COLOR,
                    )?;
                    parts.push(MeasuredLine {
                        text: part,
                        width: raster.width,
                        height: raster.height,
                    });
                    part_rasters.push(raster);
                }
                measured.push(parts);
                rasters.push(part_rasters);
            }

            let placement = place_slide(&params, &measured);
            for (item, part) in placement.skipped {
                tracing::warn!(slide = slide_idx, line = item, part, "caption line skipped");
                skipped.push(SkippedItem {
                    item: format!("slides[{slide_idx}].lines[{item}]"),
                    reason: format!("wrapped part {part} crosses the caption zone bottom"),
                });
            }

            let fade = if slide.fade_out {
                Fade::symmetric(m.transition)
            } else {
                Fade::fade_in(m.transition)
            };
            for placed in placement.placed {
                let raster = rasters[placed.item][placed.part].clone();
                tracing::debug!(
                    slide = slide_idx,
                    line = placed.item,
                    part = placed.part,
                    x = placed.x,
                    y = placed.y,
                    "caption placed"
                );
                layers.push(Layer {
                    kind: LayerKind::Caption {
                        slide: slide_idx,
                        line: placed.item,
                        part: placed.part,
                    },
                    paint: Paint::Raster(raster),
                    text: Some(placed.text),
                    x: placed.x,
                    y: placed.y,
                    window: slide.line_window(placed.item)?,
                    fade,
                });
            }
        }
        Ok(())
    }

    fn build_images(
        &self,
        geometry: &SplitScreen,
        layers: &mut Vec<Layer>,
        skipped: &mut Vec<SkippedItem>,
    ) -> ReelResult<()> {
        let m = &self.manifest;
        let zone = geometry.image;
        let (max_w, max_h) = (zone.width().max(1) as u32, zone.height().max(1) as u32);

        for (index, item) in m.images.iter().enumerate() {
            let raster = match load_fitted_image(&item.path, max_w, max_h) {
                Ok(r) => r,
                Err(e) if e.is_item_recoverable() => {
                    tracing::warn!(index, path = %item.path.display(), "skipping image: {e}");
                    skipped.push(SkippedItem {
                        item: format!("images[{index}]"),
                        reason: e.to_string(),
                    });
                    continue;
                }
                Err(e) => return Err(e),
            };
            let (x, y) = center_in_zone(&zone, raster.width, raster.height);
            tracing::debug!(index, x, y, w = raster.width, h = raster.height, "image placed");
            layers.push(Layer {
                kind: LayerKind::Image { index },
                paint: Paint::Raster(raster),
                text: None,
                x,
                y,
                window: item.window,
                fade: Fade::symmetric(m.transition),
            });
        }
        Ok(())
    }

    /// Build, render and encode the composite to `out_path`.
    ///
    /// Frames are encoded into a scratch file beside the target, which replaces the target only
    /// once encoding succeeded.
    #[tracing::instrument(level = "info", skip_all, fields(out = %out_path.display()))]
    pub fn create_video(&self, out_path: &Path, opts: &AssembleOpts) -> ReelResult<RenderStats> {
        let assembly = self.build()?;
        if assembly.frame_count() == 0 {
            return Err(ReelError::config("composite has zero duration; nothing to encode"));
        }
        if !opts.overwrite && out_path.exists() {
            return Err(ReelError::encode(format!(
                "output file '{}' already exists",
                out_path.display()
            )));
        }
        ensure_parent_dir(out_path)?;
        let dir = match out_path.parent() {
            Some(p) if !p.as_os_str().is_empty() => p.to_path_buf(),
            _ => PathBuf::from("."),
        };

        let scratch = ScratchFile::new_in(&dir, ".reelsmith-assemble-", ".mp4")?;
        let mut sink = FfmpegSink::new(FfmpegSinkOpts {
            out_path: scratch.path().to_path_buf(),
            overwrite: true,
            preset: opts.preset.clone(),
            threads: opts.threads,
            pad_to_even: false,
        });
        let stats = assembly.render(&mut sink)?;
        drop(sink);
        scratch.persist(out_path)?;

        tracing::info!(
            frames = stats.frames,
            reused = stats.reused,
            "video written"
        );
        Ok(stats)
    }
}

/// A built composite: layers in paint order plus what was skipped.
#[derive(Clone, Debug)]
pub struct Assembly {
    /// Output canvas.
    pub canvas: Canvas,
    /// Output frame rate.
    pub fps: Fps,
    /// Duration in seconds.
    pub duration: f64,
    /// Color shown where no layer paints.
    pub background_color: Rgb8,
    /// Layers, bottom first.
    pub layers: Vec<Layer>,
    /// Content dropped during the build.
    pub skipped: Vec<SkippedItem>,
}

impl Assembly {
    /// `ceil(duration × fps)`.
    pub fn frame_count(&self) -> u64 {
        self.fps.secs_to_frames_ceil(self.duration)
    }

    /// Serializable layer plan.
    pub fn plan(&self) -> LayerPlan {
        LayerPlan {
            canvas: self.canvas,
            fps: self.fps,
            duration: self.duration,
            frame_count: self.frame_count(),
            layers: self.layers.iter().map(Layer::summary).collect(),
            skipped: self.skipped.clone(),
        }
    }

    /// Render every frame in order into `sink`.
    pub fn render(&self, sink: &mut dyn FrameSink) -> ReelResult<RenderStats> {
        let frames = self.frame_count();
        sink.begin(SinkConfig {
            width: self.canvas.width,
            height: self.canvas.height,
            fps: self.fps,
        })?;

        let mut renderer = FrameRenderer::new(self.canvas, self.background_color);
        for i in 0..frames {
            let t = self.fps.frames_to_secs(i);
            let frame = renderer.render(&self.layers, t)?;
            sink.push_frame(FrameIndex(i), &frame)?;
            if i > 0 && i % (u64::from(self.fps.num) * 10) == 0 {
                tracing::debug!(frame = i, total = frames, "render progress");
            }
        }
        sink.end()?;

        Ok(RenderStats {
            frames,
            rendered: renderer.rendered(),
            reused: renderer.reused(),
        })
    }
}

#[cfg(test)]
#[path = "../../tests/unit/assembly/coordinator.rs"]
mod tests;
