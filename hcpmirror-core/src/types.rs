//! Domain types shared by both front ends.

use std::fmt;
use std::path::{Component, Path};
use std::str::FromStr;

use crate::error::ConfigError;

// ---------------------------------------------------------------------------
// SubjectId
// ---------------------------------------------------------------------------

/// Opaque token naming one data subject (e.g. `100307`).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SubjectId(pub String);

impl SubjectId {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// True if the id is exactly one plain path component, so
    /// `root.join(id)` names a child of `root` and nothing else.
    pub fn is_single_component(&self) -> bool {
        let mut parts = Path::new(&self.0).components();
        matches!(
            (parts.next(), parts.next()),
            (Some(Component::Normal(_)), None)
        ) && !self.0.contains(['/', '\\'])
    }
}

impl fmt::Display for SubjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl From<String> for SubjectId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for SubjectId {
    fn from(s: &str) -> Self {
        Self(s.to_owned())
    }
}

impl AsRef<std::path::Path> for SubjectId {
    fn as_ref(&self) -> &std::path::Path {
        std::path::Path::new(&self.0)
    }
}

// ---------------------------------------------------------------------------
// Stage
// ---------------------------------------------------------------------------

/// Tier of data completeness. Coverage grows strictly: `Unproc ⊂ Struct ⊂ Proc`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub enum Stage {
    /// Raw acquisitions plus release notes.
    #[default]
    Unproc,
    /// Adds structural preprocessing outputs, without `MNINonLinear/Results`.
    Struct,
    /// Everything, including the functional `Results` tree.
    Proc,
}

impl Stage {
    pub const ALL: [Stage; 3] = [Stage::Unproc, Stage::Struct, Stage::Proc];

    pub fn as_str(self) -> &'static str {
        match self {
            Stage::Unproc => "unproc",
            Stage::Struct => "struct",
            Stage::Proc => "proc",
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Stage {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "unproc" => Ok(Stage::Unproc),
            "struct" => Ok(Stage::Struct),
            "proc" => Ok(Stage::Proc),
            other => Err(ConfigError::InvalidStage {
                value: other.to_string(),
            }),
        }
    }
}
