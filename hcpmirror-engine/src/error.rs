//! Error types for hcpmirror-engine.

use std::path::PathBuf;

use thiserror::Error;

/// All errors that can arise while syncing or materializing subjects.
#[derive(Debug, Error)]
pub enum EngineError {
    /// An I/O error, with annotated path for context.
    #[error("I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A directory walk failed part way.
    #[error("cannot walk {path}: {source}")]
    Walk {
        path: PathBuf,
        #[source]
        source: walkdir::Error,
    },

    /// The remote transfer tool exited unsuccessfully.
    #[error("sync {remote} -> {local} failed ({status})")]
    Transfer {
        remote: String,
        local: PathBuf,
        status: String,
    },

    /// A subject id that would resolve outside its root.
    #[error("subject '{subject}' is not a single directory name")]
    InvalidSubject { subject: String },

    /// The user declined to overwrite an existing subject tree.
    #[error("not overwriting {path}")]
    Declined { path: PathBuf },
}

impl EngineError {
    pub fn is_declined(&self) -> bool {
        matches!(self, EngineError::Declined { .. })
    }
}

/// Convenience constructor for [`EngineError::Io`].
pub(crate) fn io_err(path: impl Into<PathBuf>, source: std::io::Error) -> EngineError {
    EngineError::Io {
        path: path.into(),
        source,
    }
}

pub(crate) fn walk_err(path: impl Into<PathBuf>, source: walkdir::Error) -> EngineError {
    EngineError::Walk {
        path: path.into(),
        source,
    }
}
