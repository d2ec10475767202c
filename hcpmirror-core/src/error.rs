//! Error types for hcpmirror-core.

use std::fmt;
use std::path::PathBuf;

use thiserror::Error;

/// A single configuration problem detected while resolving options.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// A required flag was not supplied.
    #[error("missing required option --{flag}")]
    MissingOption { flag: &'static str },

    /// Both `--subject` and `--subjlist` were supplied.
    #[error("--subject and --subjlist are mutually exclusive")]
    ConflictingSubjects,

    /// Neither `--subject` nor `--subjlist` was supplied.
    #[error("one of --subject or --subjlist is required")]
    NoSubjects,

    /// A subject id that is not a single directory name (empty, `.`, `..`,
    /// absolute, or containing a separator).
    #[error("invalid subject '{value}'; expected a single directory name")]
    InvalidSubject { value: String },

    /// `--stage` named something other than unproc, struct or proc.
    #[error("invalid stage '{value}'; expected: unproc, struct, proc")]
    InvalidStage { value: String },

    /// The subject list file could not be read.
    #[error("cannot read subject list {path}: {source}")]
    SubjectList {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Every configuration problem found for one run, in detection order.
#[derive(Debug, Default)]
pub struct ConfigErrors(pub Vec<ConfigError>);

impl ConfigErrors {
    pub fn push(&mut self, err: ConfigError) {
        self.0.push(err);
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &ConfigError> {
        self.0.iter()
    }
}

impl fmt::Display for ConfigErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, err) in self.0.iter().enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            write!(f, "{err}")?;
        }
        Ok(())
    }
}

impl std::error::Error for ConfigErrors {}

impl From<ConfigError> for ConfigErrors {
    fn from(err: ConfigError) -> Self {
        Self(vec![err])
    }
}
