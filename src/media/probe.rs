use std::path::{Path, PathBuf};

use crate::foundation::core::Fps;
use crate::foundation::error::{ReelError, ReelResult};

/// Stream properties of a video file.
#[derive(Clone, Debug, PartialEq)]
pub struct VideoInfo {
    /// Probed file.
    pub path: PathBuf,
    /// Frame width in pixels.
    pub width: u32,
    /// Frame height in pixels.
    pub height: u32,
    /// Nominal frame rate.
    pub fps: Fps,
    /// Number of video frames.
    pub frame_count: u64,
    /// Whether the container carries an audio stream.
    pub has_audio: bool,
}

impl VideoInfo {
    /// Duration implied by the frame count and rate.
    pub fn duration_secs(&self) -> f64 {
        self.fps.frames_to_secs(self.frame_count)
    }
}

/// Probe a video file with the system `ffprobe`.
#[tracing::instrument(level = "debug", skip_all, fields(path = %path.display()))]
pub fn probe_video(path: &Path, what: &'static str) -> ReelResult<VideoInfo> {
    if !path.is_file() {
        return Err(ReelError::not_found(what, path));
    }

    let out = std::process::Command::new("ffprobe")
        .args([
            "-v",
            "error",
            "-print_format",
            "json",
            "-show_streams",
            "-show_format",
        ])
        .arg(path)
        .output()
        .map_err(|e| ReelError::decode(format!("failed to run ffprobe: {e}")))?;
    if !out.status.success() {
        return Err(ReelError::decode(format!(
            "ffprobe failed for '{}': {}",
            path.display(),
            String::from_utf8_lossy(&out.stderr).trim()
        )));
    }

    let info = parse_probe_json(path, &out.stdout)?;
    tracing::debug!(
        width = info.width,
        height = info.height,
        fps = info.fps.as_f64(),
        frames = info.frame_count,
        has_audio = info.has_audio,
        "probed video"
    );
    Ok(info)
}

/// Interpret `ffprobe -print_format json -show_streams -show_format` output.
///
/// The frame count comes from the stream's `nb_frames` when present, otherwise from
/// `round(duration × fps)`.
pub(crate) fn parse_probe_json(path: &Path, json: &[u8]) -> ReelResult<VideoInfo> {
    #[derive(serde::Deserialize)]
    struct ProbeStream {
        codec_type: Option<String>,
        width: Option<u32>,
        height: Option<u32>,
        r_frame_rate: Option<String>,
        avg_frame_rate: Option<String>,
        nb_frames: Option<String>,
        duration: Option<String>,
    }
    #[derive(serde::Deserialize)]
    struct ProbeFormat {
        duration: Option<String>,
    }
    #[derive(serde::Deserialize)]
    struct ProbeOut {
        #[serde(default)]
        streams: Vec<ProbeStream>,
        format: Option<ProbeFormat>,
    }

    let parsed: ProbeOut = serde_json::from_slice(json)
        .map_err(|e| ReelError::decode(format!("ffprobe json parse failed: {e}")))?;
    let video = parsed
        .streams
        .iter()
        .find(|s| s.codec_type.as_deref() == Some("video"))
        .ok_or_else(|| {
            ReelError::decode(format!("no video stream found in '{}'", path.display()))
        })?;
    let (width, height) = match (video.width, video.height) {
        (Some(w), Some(h)) if w > 0 && h > 0 => (w, h),
        _ => {
            return Err(ReelError::decode(format!(
                "missing video dimensions for '{}'",
                path.display()
            )));
        }
    };

    // Prefer the average rate; `r_frame_rate` can be a timebase multiple for VFR sources.
    let fps = video
        .avg_frame_rate
        .as_deref()
        .and_then(|r| Fps::parse_ratio(r).ok())
        .or_else(|| {
            video
                .r_frame_rate
                .as_deref()
                .and_then(|r| Fps::parse_ratio(r).ok())
        })
        .ok_or_else(|| ReelError::decode(format!("invalid frame rate for '{}'", path.display())))?;

    let duration = video
        .duration
        .as_deref()
        .or(parsed.format.as_ref().and_then(|f| f.duration.as_deref()))
        .and_then(|s| s.parse::<f64>().ok())
        .filter(|d| d.is_finite() && *d >= 0.0);

    let frame_count = match video.nb_frames.as_deref().and_then(|s| s.parse::<u64>().ok()) {
        Some(n) if n > 0 => n,
        _ => {
            let d = duration.ok_or_else(|| {
                ReelError::decode(format!(
                    "cannot determine frame count for '{}'",
                    path.display()
                ))
            })?;
            (d * fps.as_f64()).round() as u64
        }
    };

    let has_audio = parsed
        .streams
        .iter()
        .any(|s| s.codec_type.as_deref() == Some("audio"));

    Ok(VideoInfo {
        path: path.to_path_buf(),
        width,
        height,
        fps,
        frame_count,
        has_audio,
    })
}

/// Return `true` when `ffprobe` can be invoked from `PATH`.
pub fn is_ffprobe_on_path() -> bool {
    std::process::Command::new("ffprobe")
        .arg("-version")
        .stdout(std::process::Stdio::null())
        .stderr(std::process::Stdio::null())
        .status()
        .map(|s| s.success())
        .unwrap_or(false)
}

#[cfg(test)]
#[path = "../../tests/unit/media/probe.rs"]
mod tests;
