use std::path::Path;
use std::process::Command;

use crate::foundation::error::{ReelError, ReelResult};

/// How the foreground audio track relates to the composited video length.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AudioPolicy {
    /// Attach the whole audio track even if it outlasts the video.
    #[default]
    KeepFull,
    /// Cut the audio at the end of the video.
    TrimToVideo,
}

/// Mux the first audio stream of `audio_src` into the silent `video`, writing `out`.
///
/// The video stream is copied; audio is re-encoded to AAC.
#[tracing::instrument(level = "debug", skip_all, fields(out = %out.display()))]
pub fn attach_audio(
    video: &Path,
    audio_src: &Path,
    out: &Path,
    policy: AudioPolicy,
    overwrite: bool,
) -> ReelResult<()> {
    let mut cmd = Command::new("ffmpeg");
    cmd.arg(if overwrite { "-y" } else { "-n" });
    cmd.args(["-v", "error", "-i"])
        .arg(video)
        .arg("-i")
        .arg(audio_src)
        .args(mux_args(policy))
        .arg(out);

    let output = cmd
        .output()
        .map_err(|e| ReelError::encode(format!("failed to run ffmpeg for audio mux: {e}")))?;
    if !output.status.success() {
        return Err(ReelError::encode(format!(
            "audio mux into '{}' failed with status {}: {}",
            out.display(),
            output.status,
            String::from_utf8_lossy(&output.stderr).trim()
        )));
    }
    Ok(())
}

pub(crate) fn mux_args(policy: AudioPolicy) -> Vec<&'static str> {
    let mut args = vec![
        "-map", "0:v:0", "-map", "1:a:0", "-c:v", "copy", "-c:a", "aac",
    ];
    if policy == AudioPolicy::TrimToVideo {
        args.push("-shortest");
    }
    args.extend(["-movflags", "+faststart"]);
    args
}

#[cfg(test)]
#[path = "../../tests/unit/media/mux.rs"]
mod tests;
