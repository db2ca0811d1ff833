use std::io::{BufReader, Read};
use std::path::{Path, PathBuf};
use std::process::{Child, ChildStdout, Command, Stdio};

use crate::foundation::core::Fps;
use crate::foundation::error::{ReelError, ReelResult};
use crate::media::probe::{VideoInfo, probe_video};

/// One decoded RGB24 frame.
#[derive(Clone, Debug, PartialEq)]
pub struct FrameSample {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
    /// Packed `R, G, B` bytes, row-major.
    pub data: Vec<u8>,
    /// Presentation time in the source, in seconds.
    pub timestamp_secs: f64,
}

impl FrameSample {
    /// Byte length of one RGB24 frame.
    pub fn byte_len(width: u32, height: u32) -> usize {
        width as usize * height as usize * 3
    }

    /// Resize to `width × height` with a triangle (bilinear) filter.
    pub fn resized(&self, width: u32, height: u32) -> ReelResult<Self> {
        if (self.width, self.height) == (width, height) {
            return Ok(self.clone());
        }
        let img = image::RgbImage::from_raw(self.width, self.height, self.data.clone())
            .ok_or_else(|| ReelError::decode("frame buffer does not match its dimensions"))?;
        let out = image::imageops::resize(&img, width, height, image::imageops::FilterType::Triangle);
        Ok(Self {
            width,
            height,
            data: out.into_raw(),
            timestamp_secs: self.timestamp_secs,
        })
    }
}

/// Random-access-forward reader over the frames of one video.
///
/// Indices passed to [`FrameSource::read_frame`] must be non-decreasing. Reading the same index
/// twice returns the cached frame.
pub trait FrameSource {
    /// Stream properties.
    fn info(&self) -> &VideoInfo;

    /// Return frame `index`, or `None` once the source is exhausted.
    fn read_frame(&mut self, index: u64) -> ReelResult<Option<&FrameSample>>;
}

/// Frame source decoding through a system `ffmpeg` child process.
pub struct FfmpegFrameSource {
    info: VideoInfo,
    child: Option<Child>,
    stdout: Option<BufReader<ChildStdout>>,
    stderr_drain: Option<std::thread::JoinHandle<std::io::Result<Vec<u8>>>>,
    current: Option<(u64, FrameSample)>,
    next_index: u64,
    exhausted: bool,
}

impl FfmpegFrameSource {
    /// Probe `path` and start decoding it as raw RGB24.
    pub fn open(path: &Path, what: &'static str) -> ReelResult<Self> {
        let info = probe_video(path, what)?;
        Self::spawn(info)
    }

    fn spawn(info: VideoInfo) -> ReelResult<Self> {
        let mut child = Command::new("ffmpeg")
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .args(["-v", "error", "-i"])
            .arg(&info.path)
            .args([
                "-map",
                "0:v:0",
                "-vsync",
                "passthrough",
                "-f",
                "rawvideo",
                "-pix_fmt",
                "rgb24",
                "pipe:1",
            ])
            .spawn()
            .map_err(|e| {
                ReelError::decode(format!(
                    "failed to spawn ffmpeg (is it installed and on PATH?): {e}"
                ))
            })?;

        let stdout = child
            .stdout
            .take()
            .ok_or_else(|| ReelError::decode("failed to open ffmpeg stdout (unexpected)"))?;
        let mut stderr = child
            .stderr
            .take()
            .ok_or_else(|| ReelError::decode("failed to open ffmpeg stderr (unexpected)"))?;
        let stderr_drain = std::thread::spawn(move || {
            let mut bytes = Vec::new();
            stderr.read_to_end(&mut bytes)?;
            Ok(bytes)
        });

        tracing::debug!(path = %info.path.display(), "decoder started");
        Ok(Self {
            info,
            child: Some(child),
            stdout: Some(BufReader::new(stdout)),
            stderr_drain: Some(stderr_drain),
            current: None,
            next_index: 0,
            exhausted: false,
        })
    }

    fn read_next(&mut self) -> ReelResult<Option<FrameSample>> {
        let Some(stdout) = self.stdout.as_mut() else {
            return Ok(None);
        };
        let len = FrameSample::byte_len(self.info.width, self.info.height);
        let mut data = vec![0u8; len];
        match stdout.read_exact(&mut data) {
            Ok(()) => {}
            Err(e) if e.kind() == std::io::ErrorKind::UnexpectedEof => {
                self.finish_stream();
                return Ok(None);
            }
            Err(e) => {
                self.finish_stream();
                return Err(ReelError::decode(format!(
                    "failed to read frame {} from '{}': {e}",
                    self.next_index,
                    self.info.path.display()
                )));
            }
        }
        let sample = FrameSample {
            width: self.info.width,
            height: self.info.height,
            data,
            timestamp_secs: self.info.fps.frames_to_secs(self.next_index),
        };
        self.next_index += 1;
        Ok(Some(sample))
    }

    fn finish_stream(&mut self) {
        self.exhausted = true;
        self.stdout = None;
        if let Some(handle) = self.stderr_drain.take()
            && let Ok(Ok(bytes)) = handle.join()
            && !bytes.is_empty()
        {
            tracing::debug!(
                path = %self.info.path.display(),
                stderr = %String::from_utf8_lossy(&bytes).trim(),
                "decoder finished with diagnostics"
            );
        }
    }
}

impl FrameSource for FfmpegFrameSource {
    fn info(&self) -> &VideoInfo {
        &self.info
    }

    fn read_frame(&mut self, index: u64) -> ReelResult<Option<&FrameSample>> {
        if let Some((cur, _)) = &self.current
            && index < *cur
        {
            return Err(ReelError::decode(format!(
                "backward read of frame {index} after {cur} from '{}'",
                self.info.path.display()
            )));
        }

        let cached = matches!(&self.current, Some((cur, _)) if *cur == index);
        if !cached {
            loop {
                if self.exhausted {
                    return Ok(None);
                }
                let decoded_index = self.next_index;
                let Some(sample) = self.read_next()? else {
                    return Ok(None);
                };
                if decoded_index == index {
                    self.current = Some((index, sample));
                    break;
                }
            }
        }
        Ok(self.current.as_ref().map(|(_, s)| s))
    }
}

impl Drop for FfmpegFrameSource {
    fn drop(&mut self) {
        self.stdout = None;
        if let Some(mut child) = self.child.take() {
            match child.try_wait() {
                Ok(Some(_)) => {}
                _ => {
                    if let Err(e) = child.kill() {
                        tracing::warn!(path = %self.info.path.display(), "failed to stop decoder: {e}");
                    }
                }
            }
            if let Err(e) = child.wait() {
                tracing::warn!(path = %self.info.path.display(), "failed to reap decoder: {e}");
            }
        }
    }
}

/// Frame source backed by frames held in memory.
#[derive(Clone, Debug)]
pub struct MemoryFrameSource {
    info: VideoInfo,
    frames: Vec<FrameSample>,
}

impl MemoryFrameSource {
    /// Wrap `frames` (all of one size) as a source at `fps`.
    pub fn new(fps: Fps, frames: Vec<FrameSample>) -> ReelResult<Self> {
        let first = frames
            .first()
            .ok_or_else(|| ReelError::decode("memory source needs at least one frame"))?;
        let (width, height) = (first.width, first.height);
        for (i, f) in frames.iter().enumerate() {
            if (f.width, f.height) != (width, height)
                || f.data.len() != FrameSample::byte_len(width, height)
            {
                return Err(ReelError::decode(format!(
                    "memory frame {i} does not match {width}x{height} rgb24"
                )));
            }
        }
        Ok(Self {
            info: VideoInfo {
                path: PathBuf::from("<memory>"),
                width,
                height,
                fps,
                frame_count: frames.len() as u64,
                has_audio: false,
            },
            frames,
        })
    }

    /// Solid-color frames, handy for tests and previews.
    pub fn solid(width: u32, height: u32, fps: Fps, count: usize, rgb: [u8; 3]) -> ReelResult<Self> {
        let frames = (0..count)
            .map(|i| FrameSample {
                width,
                height,
                data: rgb.repeat(width as usize * height as usize),
                timestamp_secs: fps.frames_to_secs(i as u64),
            })
            .collect();
        Self::new(fps, frames)
    }

    /// Override the advertised frame count, e.g. to mimic a container that overstates it.
    pub fn with_declared_frame_count(mut self, frame_count: u64) -> Self {
        self.info.frame_count = frame_count;
        self
    }
}

impl FrameSource for MemoryFrameSource {
    fn info(&self) -> &VideoInfo {
        &self.info
    }

    fn read_frame(&mut self, index: u64) -> ReelResult<Option<&FrameSample>> {
        Ok(usize::try_from(index).ok().and_then(|i| self.frames.get(i)))
    }
}

#[cfg(test)]
#[path = "../../tests/unit/media/source.rs"]
mod tests;
