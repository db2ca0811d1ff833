use std::io::Read;
use std::path::{Path, PathBuf};
use std::process::{Child, ChildStdin, Command, Stdio};

use crate::encode::sink::{FrameSink, SinkConfig};
use crate::foundation::core::{Fps, FrameIndex};
use crate::foundation::error::{ReelError, ReelResult};
use crate::media::source::FrameSample;

/// Options for [`FfmpegSink`] MP4 output.
#[derive(Clone, Debug)]
pub struct FfmpegSinkOpts {
    /// Output MP4 file path.
    pub out_path: PathBuf,
    /// Overwrite the output file if it already exists.
    pub overwrite: bool,
    /// x264 preset, e.g. `"medium"`.
    pub preset: Option<String>,
    /// Encoder thread hint; `None` lets ffmpeg decide.
    pub threads: Option<u32>,
    /// Accept odd frame sizes by padding the encoded picture to even dimensions.
    ///
    /// When unset, odd sizes are rejected in `begin`.
    pub pad_to_even: bool,
}

impl FfmpegSinkOpts {
    /// Create options for writing an MP4 to `out_path`.
    pub fn new(out_path: impl Into<PathBuf>) -> Self {
        Self {
            out_path: out_path.into(),
            overwrite: true,
            preset: None,
            threads: None,
            pad_to_even: false,
        }
    }
}

/// Sink that spawns the system `ffmpeg` and streams RGB24 frames to its stdin.
///
/// Output is silent H.264 (`yuv420p`, `+faststart`). Dropping a sink that was begun but not
/// ended kills and reaps the child.
pub struct FfmpegSink {
    opts: FfmpegSinkOpts,

    child: Option<Child>,
    stdin: Option<ChildStdin>,
    stderr_drain: Option<std::thread::JoinHandle<std::io::Result<Vec<u8>>>>,

    cfg: Option<SinkConfig>,
    last_idx: Option<FrameIndex>,
}

impl FfmpegSink {
    /// Create a new sink that streams into `ffmpeg`.
    pub fn new(opts: FfmpegSinkOpts) -> Self {
        Self {
            opts,
            child: None,
            stdin: None,
            stderr_drain: None,
            cfg: None,
            last_idx: None,
        }
    }

    fn build_command(&self, cfg: &SinkConfig) -> Command {
        let mut cmd = Command::new("ffmpeg");
        cmd.stdin(Stdio::piped())
            .stdout(Stdio::null())
            .stderr(Stdio::piped());
        cmd.args(encoder_args(&self.opts, cfg)).arg(&self.opts.out_path);
        cmd
    }
}

pub(crate) fn encoder_args(opts: &FfmpegSinkOpts, cfg: &SinkConfig) -> Vec<String> {
    let mut args: Vec<String> = vec![if opts.overwrite { "-y" } else { "-n" }.into()];
    args.extend(
        [
            "-loglevel",
            "error",
            "-f",
            "rawvideo",
            "-pix_fmt",
            "rgb24",
            "-s",
        ]
        .map(String::from),
    );
    args.push(format!("{}x{}", cfg.width, cfg.height));
    args.push("-r".into());
    args.push(fps_arg(cfg.fps));
    args.extend(["-i", "pipe:0", "-an", "-c:v", "libx264"].map(String::from));
    if let Some(preset) = &opts.preset {
        args.push("-preset".into());
        args.push(preset.clone());
    }
    if let Some(threads) = opts.threads {
        args.push("-threads".into());
        args.push(threads.to_string());
    }
    if opts.pad_to_even && !(cfg.width.is_multiple_of(2) && cfg.height.is_multiple_of(2)) {
        // yuv420p needs even dimensions; pad the last row/column with black.
        args.push("-vf".into());
        args.push("pad=ceil(iw/2)*2:ceil(ih/2)*2".into());
    }
    args.extend(["-pix_fmt", "yuv420p", "-movflags", "+faststart"].map(String::from));
    args
}

fn fps_arg(fps: Fps) -> String {
    format!("{}/{}", fps.num, fps.den)
}

impl FrameSink for FfmpegSink {
    fn begin(&mut self, cfg: SinkConfig) -> ReelResult<()> {
        validate_sink_config(&cfg, self.opts.pad_to_even)?;

        ensure_parent_dir(&self.opts.out_path)?;
        if !self.opts.overwrite && self.opts.out_path.exists() {
            return Err(ReelError::encode(format!(
                "output file '{}' already exists",
                self.opts.out_path.display()
            )));
        }

        if !is_ffmpeg_on_path() {
            return Err(ReelError::encode(
                "ffmpeg is required for MP4 encoding, but was not found on PATH",
            ));
        }

        let mut child = self.build_command(&cfg).spawn().map_err(|e| {
            ReelError::encode(format!(
                "failed to spawn ffmpeg (is it installed and on PATH?): {e}"
            ))
        })?;

        let stdin = child
            .stdin
            .take()
            .ok_or_else(|| ReelError::encode("failed to open ffmpeg stdin (unexpected)"))?;
        let mut stderr = child
            .stderr
            .take()
            .ok_or_else(|| ReelError::encode("failed to open ffmpeg stderr (unexpected)"))?;
        let stderr_drain = std::thread::spawn(move || {
            let mut stderr_bytes = Vec::new();
            stderr.read_to_end(&mut stderr_bytes)?;
            Ok(stderr_bytes)
        });

        tracing::debug!(out = %self.opts.out_path.display(), "encoder started");
        self.child = Some(child);
        self.stdin = Some(stdin);
        self.stderr_drain = Some(stderr_drain);
        self.cfg = Some(cfg);
        self.last_idx = None;
        Ok(())
    }

    fn push_frame(&mut self, idx: FrameIndex, frame: &FrameSample) -> ReelResult<()> {
        let cfg = self
            .cfg
            .as_ref()
            .ok_or_else(|| ReelError::encode("ffmpeg sink not started"))?;
        if let Some(last) = self.last_idx
            && idx.0 <= last.0
        {
            return Err(ReelError::encode(
                "ffmpeg sink received out-of-order frame index",
            ));
        }
        self.last_idx = Some(idx);

        if frame.width != cfg.width || frame.height != cfg.height {
            return Err(ReelError::encode(format!(
                "frame size mismatch: got {}x{}, expected {}x{}",
                frame.width, frame.height, cfg.width, cfg.height
            )));
        }
        if frame.data.len() != FrameSample::byte_len(cfg.width, cfg.height) {
            return Err(ReelError::encode(
                "frame data size mismatch with width*height*3",
            ));
        }

        let Some(stdin) = self.stdin.as_mut() else {
            return Err(ReelError::encode("ffmpeg sink is already finalized"));
        };

        use std::io::Write as _;
        stdin.write_all(&frame.data).map_err(|e| {
            ReelError::encode(format!("failed to write frame to ffmpeg stdin: {e}"))
        })?;
        Ok(())
    }

    fn end(&mut self) -> ReelResult<()> {
        drop(self.stdin.take());
        let mut child = self
            .child
            .take()
            .ok_or_else(|| ReelError::encode("ffmpeg sink not started"))?;

        let status = child
            .wait()
            .map_err(|e| ReelError::encode(format!("failed to wait for ffmpeg to finish: {e}")))?;
        let stderr_bytes = match self.stderr_drain.take() {
            Some(handle) => handle
                .join()
                .map_err(|_| ReelError::encode("ffmpeg stderr drain thread panicked"))?
                .map_err(|e| ReelError::encode(format!("ffmpeg stderr read failed: {e}")))?,
            None => Vec::new(),
        };

        if !status.success() {
            let stderr = String::from_utf8_lossy(&stderr_bytes);
            return Err(ReelError::encode(format!(
                "ffmpeg exited with status {}: {}",
                status,
                stderr.trim()
            )));
        }

        self.cfg = None;
        Ok(())
    }
}

impl Drop for FfmpegSink {
    fn drop(&mut self) {
        drop(self.stdin.take());
        if let Some(mut child) = self.child.take() {
            tracing::warn!(out = %self.opts.out_path.display(), "encoder dropped before end; stopping ffmpeg");
            if let Err(e) = child.kill() {
                tracing::warn!("failed to kill ffmpeg: {e}");
            }
            if let Err(e) = child.wait() {
                tracing::warn!("failed to reap ffmpeg: {e}");
            }
        }
    }
}

fn validate_sink_config(cfg: &SinkConfig, pad_to_even: bool) -> ReelResult<()> {
    if cfg.fps.num == 0 || cfg.fps.den == 0 {
        return Err(ReelError::config("fps must be non-zero"));
    }
    if cfg.width == 0 || cfg.height == 0 {
        return Err(ReelError::config(
            "ffmpeg sink width/height must be non-zero",
        ));
    }
    if !pad_to_even && (!cfg.width.is_multiple_of(2) || !cfg.height.is_multiple_of(2)) {
        return Err(ReelError::config(
            "ffmpeg sink width/height must be even (required for yuv420p mp4 output)",
        ));
    }
    Ok(())
}

/// Ensure the parent directory of `path` exists.
pub fn ensure_parent_dir(path: &Path) -> ReelResult<()> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        use anyhow::Context as _;
        std::fs::create_dir_all(parent)
            .with_context(|| format!("failed to create output directory '{}'", parent.display()))?;
    }
    Ok(())
}

/// Return `true` when `ffmpeg` can be invoked from `PATH`.
pub fn is_ffmpeg_on_path() -> bool {
    std::process::Command::new("ffmpeg")
        .arg("-version")
        .stdout(std::process::Stdio::null())
        .stderr(std::process::Stdio::null())
        .status()
        .map(|s| s.success())
        .unwrap_or(false)
}

#[cfg(test)]
#[path = "../../tests/unit/encode/ffmpeg.rs"]
mod tests;
