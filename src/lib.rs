//! reelsmith assembles short split-screen explainer videos and keys talking-head clips over
//! them.
//!
//! Two pipelines share the crate:
//!
//! - [`Coordinator`] turns a JSON [`CompositeManifest`] (header, timed caption slides, timed
//!   images) into a silent H.264 video, rendering frames on the CPU and streaming them into a
//!   [`FrameSink`].
//! - [`compose`] keys the white backdrop out of a foreground clip, places it over a background
//!   clip and carries the foreground's audio across.
//!
//! Encoding and decoding shell out to the system `ffmpeg`/`ffprobe`.
#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod assembly;
mod assets;
mod compositor;
mod effects;
mod encode;
mod foundation;
mod layout;
mod manifest;
mod media;
mod text;
mod timeline;

pub use crate::foundation::core::{Canvas, Fps, FrameIndex, Rgb8};
pub use crate::foundation::error::{ReelError, ReelResult};

pub use crate::assets::load::{decode_image, load_fitted_image};
pub use crate::assets::raster::RasterImage;

pub use crate::text::rasterize::{FontRole, TextRasterizer};
pub use crate::text::wrap::wrap;

pub use crate::layout::solver::{
    ITEM_GAP_FACTOR, MeasuredLine, PlacedLine, SlideLayoutParams, SlidePlacement, block_start_y,
    center_in_zone, center_x, place_slide,
};
pub use crate::layout::zones::{
    CAPTION_CHAR_LIMIT, HEADER_BODY_GAP, HEADER_MARGIN_TOP, SplitScreen, Zone, fit_within,
};

pub use crate::manifest::model::{
    CompositeManifest, ContentItem, DEFAULT_TRANSITION_SECS, FontPaths, FontsSpec, ImageItem,
    ImageSpec, ManifestSpec, Slide, SlideSpec, TextLine,
};
pub use crate::timeline::time::{TimeSpec, parse_clock};
pub use crate::timeline::window::{Fade, TimeWindow, resolve_duration};

pub use crate::effects::blur::{MASK_KERNEL_SIZE, MASK_SIGMA, blur_plane};
pub use crate::effects::composite::{
    PremulRgba8, blit_over, fill_solid, flatten_to_rgb24, over,
};
pub use crate::effects::key::{Mask, WHITE_KEY_THRESHOLD, blend_with_mask, white_mask};

pub use crate::media::mux::{AudioPolicy, attach_audio};
pub use crate::media::probe::{VideoInfo, is_ffprobe_on_path, probe_video};
pub use crate::media::source::{FfmpegFrameSource, FrameSample, FrameSource, MemoryFrameSource};

pub use crate::encode::ffmpeg::{FfmpegSink, FfmpegSinkOpts, ensure_parent_dir, is_ffmpeg_on_path};
pub use crate::encode::scratch::ScratchFile;
pub use crate::encode::sink::{FrameSink, InMemorySink, SinkConfig};

pub use crate::compositor::mapping::{output_fps, source_frame_index, total_frames};
pub use crate::compositor::overlay::{
    ComposeOpts, ComposeReport, compose, composite_frames, composite_pair,
};

pub use crate::assembly::coordinator::{
    AssembleOpts, Assembly, Coordinator, RenderStats, TEXT_COLOR,
};
pub use crate::assembly::layers::{
    Layer, LayerKind, LayerPlan, LayerSummary, Paint, SkippedItem,
};
pub use crate::assembly::render::FrameRenderer;
