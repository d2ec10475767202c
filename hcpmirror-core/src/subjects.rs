//! Subject set resolution.
//!
//! A run names its subjects either inline (`--subject=100307`) or through a
//! plain-text list file (`--subjlist=subjects.txt`) holding whitespace
//! separated identifiers, any number per line.

use std::path::{Path, PathBuf};

use crate::error::ConfigError;
use crate::types::SubjectId;

/// Exactly one way of naming the subjects to process.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubjectSelection {
    Single(SubjectId),
    ListFile(PathBuf),
}

impl SubjectSelection {
    /// Build a selection from the two optional flags.
    ///
    /// Both or neither is a configuration error. `--subject=` with nothing
    /// after it counts as missing.
    pub fn from_flags(
        subject: Option<String>,
        subjlist: Option<PathBuf>,
    ) -> Result<Self, ConfigError> {
        let subject = subject.filter(|id| !id.is_empty());
        match (subject, subjlist) {
            (Some(id), None) => Ok(Self::Single(SubjectId::from(id))),
            (None, Some(path)) => Ok(Self::ListFile(path)),
            (Some(_), Some(_)) => Err(ConfigError::ConflictingSubjects),
            (None, None) => Err(ConfigError::NoSubjects),
        }
    }

    /// Expand into the ordered subject list. No dedup, no sorting.
    ///
    /// Every id must name a single directory under the destination root.
    pub fn resolve(&self) -> Result<Vec<SubjectId>, ConfigError> {
        let subjects = match self {
            Self::Single(id) => vec![id.clone()],
            Self::ListFile(path) => read_subject_list(path)?,
        };
        if let Some(bad) = subjects.iter().find(|id| !id.is_single_component()) {
            return Err(ConfigError::InvalidSubject {
                value: bad.0.clone(),
            });
        }
        Ok(subjects)
    }
}

/// Read a subject list file and split it on whitespace.
pub fn read_subject_list(path: &Path) -> Result<Vec<SubjectId>, ConfigError> {
    let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::SubjectList {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(parse_subject_list(&contents))
}

/// Split subject-list text into identifiers, preserving order.
pub fn parse_subject_list(contents: &str) -> Vec<SubjectId> {
    contents.split_whitespace().map(SubjectId::from).collect()
}
