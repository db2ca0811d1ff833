use std::path::{Path, PathBuf};

use tempfile::TempPath;

use crate::foundation::error::{ReelError, ReelResult};

/// Uniquely named scratch file that is removed on drop unless persisted.
///
/// Removal failures on drop are logged, never raised.
#[derive(Debug)]
pub struct ScratchFile {
    path: Option<TempPath>,
}

impl ScratchFile {
    /// Reserve a new empty scratch file in `dir`.
    pub fn new_in(dir: &Path, prefix: &str, suffix: &str) -> ReelResult<Self> {
        let file = tempfile::Builder::new()
            .prefix(prefix)
            .suffix(suffix)
            .tempfile_in(dir)
            .map_err(|e| {
                ReelError::encode(format!(
                    "failed to create scratch file in '{}': {e}",
                    dir.display()
                ))
            })?;
        let path = file.into_temp_path();
        tracing::debug!(path = %path.display(), "scratch file reserved");
        Ok(Self { path: Some(path) })
    }

    /// Current location of the scratch file.
    pub fn path(&self) -> &Path {
        match &self.path {
            Some(p) => &**p,
            None => Path::new(""),
        }
    }

    /// Move the scratch file to `target`, replacing any existing file.
    ///
    /// A plain rename is used when possible. When the scratch directory is on another
    /// filesystem the bytes are copied into a sibling of `target` first, so the final
    /// replacement is still a rename.
    pub fn persist(mut self, target: &Path) -> ReelResult<PathBuf> {
        let path = self
            .path
            .take()
            .ok_or_else(|| ReelError::encode("scratch file already persisted"))?;
        let moved = |e: std::io::Error| {
            ReelError::encode(format!(
                "failed to move scratch output to '{}': {e}",
                target.display()
            ))
        };
        match path.persist(target) {
            Ok(()) => Ok(target.to_path_buf()),
            Err(e) if e.error.kind() == std::io::ErrorKind::CrossesDevices => {
                let src = e.path;
                tracing::debug!(
                    from = %src.display(),
                    to = %target.display(),
                    "scratch is on another filesystem; copying"
                );
                let dir = match target.parent() {
                    Some(p) if !p.as_os_str().is_empty() => p,
                    _ => Path::new("."),
                };
                let sibling = tempfile::Builder::new()
                    .prefix(".reelsmith-persist-")
                    .tempfile_in(dir)
                    .map_err(moved)?
                    .into_temp_path();
                std::fs::copy(&src, &sibling).map_err(moved)?;
                sibling.persist(target).map_err(|e| moved(e.error))?;
                Ok(target.to_path_buf())
            }
            Err(e) => Err(moved(e.error)),
        }
    }
}

impl Drop for ScratchFile {
    fn drop(&mut self) {
        if let Some(p) = self.path.take() {
            let shown = p.display().to_string();
            if let Err(e) = p.close() {
                tracing::warn!(path = %shown, "failed to remove scratch file: {e}");
            }
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/encode/scratch.rs"]
mod tests;
