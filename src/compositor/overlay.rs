//! White-key overlay of a foreground clip on a background clip.

use std::path::{Path, PathBuf};

use crate::compositor::mapping::{output_fps, source_frame_index, total_frames};
use crate::effects::key::{WHITE_KEY_THRESHOLD, blend_with_mask, white_mask};
use crate::encode::ffmpeg::{FfmpegSink, FfmpegSinkOpts, ensure_parent_dir};
use crate::encode::scratch::ScratchFile;
use crate::encode::sink::{FrameSink, SinkConfig};
use crate::foundation::core::{Fps, FrameIndex};
use crate::foundation::error::{ReelError, ReelResult};
use crate::media::mux::{AudioPolicy, attach_audio};
use crate::media::source::{FfmpegFrameSource, FrameSample, FrameSource};

/// Options for [`compose`].
#[derive(Clone, Debug)]
pub struct ComposeOpts {
    /// Channel value above which foreground pixels are keyed out.
    pub threshold: u8,
    /// Audio length policy.
    pub audio: AudioPolicy,
    /// Directory for intermediates; defaults to the output's directory.
    pub scratch_dir: Option<PathBuf>,
    /// Replace an existing output file.
    pub overwrite: bool,
    /// x264 preset for the intermediate.
    pub preset: Option<String>,
    /// Encoder thread hint.
    pub threads: Option<u32>,
}

impl Default for ComposeOpts {
    fn default() -> Self {
        Self {
            threshold: WHITE_KEY_THRESHOLD,
            audio: AudioPolicy::default(),
            scratch_dir: None,
            overwrite: true,
            preset: None,
            threads: None,
        }
    }
}

/// Outcome of a composite run.
#[derive(Clone, Debug, PartialEq, serde::Serialize)]
pub struct ComposeReport {
    /// Frames handed to the sink.
    pub frames_written: u64,
    /// Frames the run aimed for.
    pub total_frames: u64,
    /// Whether a source ran dry (or failed to decode) before `total_frames`.
    pub stopped_early: bool,
    /// Output frame rate.
    pub fps: Fps,
    /// Output width.
    pub width: u32,
    /// Output height.
    pub height: u32,
    /// Whether the foreground audio was muxed into the output.
    pub audio_attached: bool,
}

/// Key `fg` over `bg` frame by frame and stream the result into `sink`.
///
/// Output size follows the foreground; background frames are resized to match. A missing or
/// undecodable frame from either source ends the run early without failing it.
pub fn composite_frames(
    fg: &mut dyn FrameSource,
    bg: &mut dyn FrameSource,
    sink: &mut dyn FrameSink,
    threshold: u8,
) -> ReelResult<ComposeReport> {
    let fg_info = fg.info().clone();
    let bg_info = bg.info().clone();
    let fps = output_fps(&fg_info, &bg_info);
    let total = total_frames(&fg_info, &bg_info);
    let (width, height) = (fg_info.width, fg_info.height);

    tracing::info!(
        fg_frames = fg_info.frame_count,
        bg_frames = bg_info.frame_count,
        total,
        fps = fps.as_f64(),
        "compositing"
    );

    sink.begin(SinkConfig { width, height, fps })?;

    let mut written = 0u64;
    let mut stopped_early = false;
    for i in 0..total {
        let fg_idx = source_frame_index(i, total, fg_info.frame_count);
        let bg_idx = source_frame_index(i, total, bg_info.frame_count);

        let Some(fg_frame) = read_or_stop(fg, fg_idx, "foreground") else {
            stopped_early = true;
            break;
        };
        let Some(bg_frame) = read_or_stop(bg, bg_idx, "background") else {
            stopped_early = true;
            break;
        };

        let out = composite_pair(&fg_frame, &bg_frame, threshold, fps.frames_to_secs(i))?;
        sink.push_frame(FrameIndex(i), &out)?;
        written += 1;
    }
    sink.end()?;

    if stopped_early {
        tracing::warn!(written, total, "a source ended early; output is partial");
    }
    Ok(ComposeReport {
        frames_written: written,
        total_frames: total,
        stopped_early,
        fps,
        width,
        height,
        audio_attached: false,
    })
}

fn read_or_stop(src: &mut dyn FrameSource, index: u64, which: &str) -> Option<FrameSample> {
    match src.read_frame(index) {
        Ok(Some(frame)) => Some(frame.clone()),
        Ok(None) => {
            tracing::debug!(index, "{which} source exhausted");
            None
        }
        Err(e) => {
            tracing::warn!(index, "{which} frame read failed: {e}");
            None
        }
    }
}

/// Composite one keyed foreground frame over a background frame of any size.
pub fn composite_pair(
    fg: &FrameSample,
    bg: &FrameSample,
    threshold: u8,
    timestamp_secs: f64,
) -> ReelResult<FrameSample> {
    let bg = bg.resized(fg.width, fg.height)?;
    let mask = white_mask(&fg.data, fg.width, fg.height, threshold)?;
    let data = blend_with_mask(&fg.data, &bg.data, &mask)?;
    Ok(FrameSample {
        width: fg.width,
        height: fg.height,
        data,
        timestamp_secs,
    })
}

/// Composite the foreground video file over the background video file into `out_path`.
///
/// Frames go to a silent scratch intermediate, then the foreground's audio is muxed in
/// according to `opts.audio`. Intermediates never outlive the call. An odd-sized foreground is
/// padded by one black row or column in the encoded output.
#[tracing::instrument(level = "info", skip_all, fields(out = %out_path.display()))]
pub fn compose(
    fg_path: &Path,
    bg_path: &Path,
    out_path: &Path,
    opts: &ComposeOpts,
) -> ReelResult<ComposeReport> {
    let mut fg = FfmpegFrameSource::open(fg_path, "foreground video")?;
    let mut bg = FfmpegFrameSource::open(bg_path, "background video")?;

    if !opts.overwrite && out_path.exists() {
        return Err(ReelError::encode(format!(
            "output file '{}' already exists",
            out_path.display()
        )));
    }
    ensure_parent_dir(out_path)?;
    let scratch_dir = scratch_dir_for(out_path, opts.scratch_dir.as_deref());

    let silent = ScratchFile::new_in(&scratch_dir, ".reelsmith-overlay-", ".mp4")?;
    let mut sink = FfmpegSink::new(FfmpegSinkOpts {
        out_path: silent.path().to_path_buf(),
        overwrite: true,
        preset: opts.preset.clone(),
        threads: opts.threads,
        pad_to_even: true,
    });
    let mut report = composite_frames(&mut fg, &mut bg, &mut sink, opts.threshold)?;
    let has_audio = fg.info().has_audio;
    drop(fg);
    drop(bg);

    if has_audio {
        // The muxed file lands beside the output so persisting it is a rename.
        let out_dir = scratch_dir_for(out_path, None);
        let muxed = ScratchFile::new_in(&out_dir, ".reelsmith-mux-", ".mp4")?;
        attach_audio(silent.path(), fg_path, muxed.path(), opts.audio, true)?;
        muxed.persist(out_path)?;
        report.audio_attached = true;
    } else {
        tracing::warn!(
            foreground = %fg_path.display(),
            "foreground has no audio stream; writing video only"
        );
        silent.persist(out_path)?;
    }

    tracing::info!(
        frames = report.frames_written,
        audio = report.audio_attached,
        "overlay written"
    );
    Ok(report)
}

fn scratch_dir_for(out_path: &Path, explicit: Option<&Path>) -> PathBuf {
    if let Some(dir) = explicit {
        return dir.to_path_buf();
    }
    match out_path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p.to_path_buf(),
        _ => PathBuf::from("."),
    }
}

#[cfg(test)]
#[path = "../../tests/unit/compositor/overlay.rs"]
mod tests;
