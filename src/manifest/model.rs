use std::path::{Path, PathBuf};

use anyhow::Context as _;

use crate::foundation::core::{Canvas, Fps, Rgb8};
use crate::foundation::error::{ReelError, ReelResult};
use crate::timeline::time::TimeSpec;
use crate::timeline::window::{TimeWindow, resolve_duration};

/// Default crossfade length in seconds.
pub const DEFAULT_TRANSITION_SECS: f64 = 0.5;

fn default_width() -> u32 {
    1080
}

fn default_height() -> u32 {
    1920
}

fn default_fps() -> u32 {
    30
}

fn default_background() -> Rgb8 {
    Rgb8::WHITE
}

fn default_transition() -> f64 {
    DEFAULT_TRANSITION_SECS
}

/// JSON boundary form of a manifest. Convert with [`CompositeManifest::from_spec`].
#[derive(Clone, Debug, serde::Serialize, serde::Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ManifestSpec {
    /// Frame width in pixels.
    #[serde(default = "default_width")]
    pub width: u32,
    /// Frame height in pixels.
    #[serde(default = "default_height")]
    pub height: u32,
    /// Output frame rate.
    #[serde(default = "default_fps")]
    pub fps: u32,
    /// Explicit duration; derived from the content when absent.
    #[serde(default)]
    pub duration: Option<TimeSpec>,
    /// Full-frame background color.
    #[serde(default = "default_background")]
    pub background_color: Rgb8,
    /// Persistent header text.
    #[serde(default)]
    pub header: Option<String>,
    /// Font files, required when any text is present.
    #[serde(default)]
    pub fonts: Option<FontsSpec>,
    /// Crossfade length in seconds.
    #[serde(default = "default_transition")]
    pub transition: f64,
    /// Caption slides, top half.
    #[serde(default)]
    pub slides: Vec<SlideSpec>,
    /// Images, bottom half.
    #[serde(default)]
    pub images: Vec<ImageSpec>,
}

/// Font file paths.
#[derive(Clone, Debug, serde::Serialize, serde::Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FontsSpec {
    /// Caption face.
    pub regular: PathBuf,
    /// Header face.
    pub bold: PathBuf,
}

/// JSON form of a caption slide.
#[derive(Clone, Debug, serde::Serialize, serde::Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SlideSpec {
    /// Appearance time of each line.
    pub start_times: Vec<TimeSpec>,
    /// Shared disappearance time.
    pub end_time: TimeSpec,
    /// Caption lines (bullet marker allowed).
    pub lines: Vec<String>,
    /// Fade lines out at `end_time` as well as in.
    #[serde(default)]
    pub fade_out: bool,
}

/// JSON form of an image item.
#[derive(Clone, Debug, serde::Serialize, serde::Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ImageSpec {
    /// Appearance time.
    pub start_time: TimeSpec,
    /// Disappearance time.
    pub end_time: TimeSpec,
    /// Image file, relative to the manifest directory unless absolute.
    pub image_path: PathBuf,
}

/// Validated caption slide: lines appear at staggered times and disappear together.
#[derive(Clone, Debug, PartialEq)]
pub struct Slide {
    /// Appearance time of each line; same length as `lines`.
    pub start_times: Vec<f64>,
    /// Caption lines.
    pub lines: Vec<String>,
    /// Shared disappearance time; greater than every start time.
    pub end_time: f64,
    /// Whether lines fade out at `end_time`.
    pub fade_out: bool,
}

impl Slide {
    /// Create a validated slide.
    pub fn new(
        start_times: Vec<f64>,
        lines: Vec<String>,
        end_time: f64,
        fade_out: bool,
    ) -> ReelResult<Self> {
        if start_times.len() != lines.len() {
            return Err(ReelError::config(format!(
                "start_times has {} entries but lines has {}",
                start_times.len(),
                lines.len()
            )));
        }
        if lines.is_empty() {
            return Err(ReelError::config("slide has no lines"));
        }
        for (i, (start, line)) in start_times.iter().zip(&lines).enumerate() {
            if line.trim().is_empty() {
                return Err(ReelError::config(format!("line {i} is blank")));
            }
            TimeWindow::new(*start, end_time)
                .map_err(|e| e.at(format_args!("line {i}")))?;
        }
        Ok(Self {
            start_times,
            lines,
            end_time,
            fade_out,
        })
    }

    /// Visibility window of line `i`.
    pub fn line_window(&self, i: usize) -> ReelResult<TimeWindow> {
        let start = self
            .start_times
            .get(i)
            .copied()
            .ok_or_else(|| ReelError::config(format!("slide has no line {i}")))?;
        TimeWindow::new(start, self.end_time)
    }
}

/// Validated image item.
#[derive(Clone, Debug, PartialEq)]
pub struct ImageItem {
    /// Visibility window.
    pub window: TimeWindow,
    /// Resolved image path.
    pub path: PathBuf,
}

/// One caption line as a timed content item.
#[derive(Clone, Debug, PartialEq)]
pub struct TextLine {
    /// Slide index.
    pub slide: usize,
    /// Line index within the slide.
    pub line: usize,
    /// Unwrapped caption text.
    pub text: String,
    /// Visibility window.
    pub window: TimeWindow,
    /// Whether the line fades out as well as in.
    pub fade_out: bool,
}

/// Timed content item, in manifest order.
#[derive(Clone, Debug, PartialEq)]
pub enum ContentItem {
    /// Caption line on the top half.
    TextLine(TextLine),
    /// Image on the bottom half.
    Image {
        /// Index in the manifest's image list.
        index: usize,
        /// The item.
        item: ImageItem,
    },
}

impl ContentItem {
    /// Visibility window of the item.
    pub fn window(&self) -> TimeWindow {
        match self {
            Self::TextLine(t) => t.window,
            Self::Image { item, .. } => item.window,
        }
    }
}

/// Resolved font paths.
#[derive(Clone, Debug, PartialEq)]
pub struct FontPaths {
    /// Caption face.
    pub regular: PathBuf,
    /// Header face.
    pub bold: PathBuf,
}

/// Validated manifest owned by the assembly coordinator.
#[derive(Clone, Debug, PartialEq)]
pub struct CompositeManifest {
    /// Output canvas.
    pub canvas: Canvas,
    /// Output frame rate.
    pub fps: Fps,
    /// Resolved duration in seconds.
    pub duration: f64,
    /// Full-frame background color.
    pub background_color: Rgb8,
    /// Persistent header text.
    pub header: Option<String>,
    /// Font files.
    pub fonts: Option<FontPaths>,
    /// Crossfade length in seconds.
    pub transition: f64,
    /// Caption slides.
    pub slides: Vec<Slide>,
    /// Image items.
    pub images: Vec<ImageItem>,
}

impl CompositeManifest {
    /// Read, parse and validate a manifest file. Relative paths resolve against its directory.
    pub fn from_path(path: &Path) -> ReelResult<Self> {
        if !path.is_file() {
            return Err(ReelError::not_found("manifest", path));
        }
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("read manifest '{}'", path.display()))?;
        let base_dir = path.parent().unwrap_or_else(|| Path::new("."));
        Self::from_json_str(&text, base_dir)
    }

    /// Parse and validate manifest JSON.
    pub fn from_json_str(json: &str, base_dir: &Path) -> ReelResult<Self> {
        let spec: ManifestSpec = serde_json::from_str(json)
            .map_err(|e| ReelError::config(format!("manifest json: {e}")))?;
        Self::from_spec(spec, base_dir)
    }

    /// Validate a boundary manifest into typed records.
    pub fn from_spec(spec: ManifestSpec, base_dir: &Path) -> ReelResult<Self> {
        if spec.width == 0 || spec.height == 0 {
            return Err(ReelError::config(format!(
                "frame size must be non-zero, got {}x{}",
                spec.width, spec.height
            )));
        }
        if !spec.width.is_multiple_of(2) || !spec.height.is_multiple_of(2) {
            return Err(ReelError::config(format!(
                "frame size must be even for H.264 yuv420p output, got {}x{}",
                spec.width, spec.height
            )));
        }
        let fps = Fps::new(spec.fps, 1)?;
        if !spec.transition.is_finite() || spec.transition < 0.0 {
            return Err(ReelError::config(format!(
                "transition must be finite and >= 0, got {}",
                spec.transition
            )));
        }

        let mut slides = Vec::with_capacity(spec.slides.len());
        for (idx, s) in spec.slides.into_iter().enumerate() {
            let at = |e: ReelError| e.at(format_args!("slides[{idx}]"));
            let start_times = s
                .start_times
                .iter()
                .map(TimeSpec::to_secs)
                .collect::<ReelResult<Vec<_>>>()
                .map_err(at)?;
            let end_time = s.end_time.to_secs().map_err(at)?;
            slides.push(Slide::new(start_times, s.lines, end_time, s.fade_out).map_err(at)?);
        }

        let mut images = Vec::with_capacity(spec.images.len());
        for (idx, i) in spec.images.into_iter().enumerate() {
            let at = |e: ReelError| e.at(format_args!("images[{idx}]"));
            let start = i.start_time.to_secs().map_err(at)?;
            let end = i.end_time.to_secs().map_err(at)?;
            images.push(ImageItem {
                window: TimeWindow::new(start, end).map_err(at)?,
                path: resolve_path(base_dir, &i.image_path),
            });
        }

        let explicit = spec
            .duration
            .as_ref()
            .map(TimeSpec::to_secs)
            .transpose()
            .map_err(|e| e.at("duration"))?;
        let duration = resolve_duration(explicit, &slides, &images);

        let has_text = spec.header.is_some() || !slides.is_empty();
        let fonts = spec.fonts.map(|f| FontPaths {
            regular: resolve_path(base_dir, &f.regular),
            bold: resolve_path(base_dir, &f.bold),
        });
        if has_text && fonts.is_none() {
            return Err(ReelError::config(
                "fonts.regular and fonts.bold are required when header or slides are present",
            ));
        }

        let manifest = Self {
            canvas: Canvas {
                width: spec.width,
                height: spec.height,
            },
            fps,
            duration,
            background_color: spec.background_color,
            header: spec.header,
            fonts,
            transition: spec.transition,
            slides,
            images,
        };
        manifest.check_windows()?;
        Ok(manifest)
    }

    /// All timed items in manifest order: slide lines first, then images.
    pub fn content_items(&self) -> Vec<ContentItem> {
        let mut out = Vec::new();
        for (slide_idx, slide) in self.slides.iter().enumerate() {
            for (line_idx, (text, start)) in slide.lines.iter().zip(&slide.start_times).enumerate()
            {
                out.push(ContentItem::TextLine(TextLine {
                    slide: slide_idx,
                    line: line_idx,
                    text: text.clone(),
                    window: TimeWindow {
                        start: *start,
                        end: slide.end_time,
                    },
                    fade_out: slide.fade_out,
                }));
            }
        }
        for (index, item) in self.images.iter().enumerate() {
            out.push(ContentItem::Image {
                index,
                item: item.clone(),
            });
        }
        out
    }

    fn check_windows(&self) -> ReelResult<()> {
        for item in self.content_items() {
            let w = item.window();
            if !w.fits_within(self.duration) {
                let what = match &item {
                    ContentItem::TextLine(t) => format!("slides[{}].lines[{}]", t.slide, t.line),
                    ContentItem::Image { index, .. } => format!("images[{index}]"),
                };
                return Err(ReelError::config(format!(
                    "{what} window [{}, {}) lies outside the video duration {}",
                    w.start, w.end, self.duration
                )));
            }
        }
        Ok(())
    }
}

fn resolve_path(base_dir: &Path, p: &Path) -> PathBuf {
    if p.is_absolute() {
        p.to_path_buf()
    } else {
        base_dir.join(p)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/manifest/model.rs"]
mod tests;
