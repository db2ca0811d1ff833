use std::path::{Path, PathBuf};

/// Convenience result type used across reelsmith.
pub type ReelResult<T> = Result<T, ReelError>;

/// Top-level error taxonomy used by assembly and compositing APIs.
#[derive(thiserror::Error, Debug)]
pub enum ReelError {
    /// Malformed manifest or invalid options. Raised before any encoding starts.
    #[error("configuration error: {0}")]
    Config(String),

    /// A referenced file does not exist.
    #[error("{what} not found: '{}'", path.display())]
    NotFound {
        /// What kind of resource was requested (e.g. "image", "foreground video").
        what: &'static str,
        /// Offending path.
        path: PathBuf,
    },

    /// A frame or image could not be decoded.
    #[error("decode error: {0}")]
    Decode(String),

    /// The output writer could not be opened, written or finalized.
    #[error("encode error: {0}")]
    Encode(String),

    /// Wrapped lower-level error from dependencies or IO.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl ReelError {
    /// Build a [`ReelError::Config`] value.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Build a [`ReelError::NotFound`] value.
    pub fn not_found(what: &'static str, path: impl AsRef<Path>) -> Self {
        Self::NotFound {
            what,
            path: path.as_ref().to_path_buf(),
        }
    }

    /// Build a [`ReelError::Decode`] value.
    pub fn decode(msg: impl Into<String>) -> Self {
        Self::Decode(msg.into())
    }

    /// Build a [`ReelError::Encode`] value.
    pub fn encode(msg: impl Into<String>) -> Self {
        Self::Encode(msg.into())
    }

    /// Prefix the message of a configuration error with the field it came from.
    pub fn at(self, field: impl std::fmt::Display) -> Self {
        match self {
            Self::Config(msg) => Self::Config(format!("{field}: {msg}")),
            other => other,
        }
    }

    /// Return `true` for failures that only affect a single content item.
    ///
    /// The coordinator skips such items instead of aborting the run.
    pub fn is_item_recoverable(&self) -> bool {
        matches!(self, Self::NotFound { .. } | Self::Decode(_))
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
