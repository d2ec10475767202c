//! Option resolution.
//!
//! The CLI hands over every flag as an `Option`; resolution validates all of
//! them, collects every problem into [`ConfigErrors`], and only then yields an
//! immutable config value that the drivers take by reference.

use std::path::PathBuf;

use crate::error::{ConfigError, ConfigErrors};
use crate::subjects::SubjectSelection;
use crate::types::{Stage, SubjectId};

/// Fixed bucket/dataset prefix read by `hcp-s3-sync`.
pub const HCP_REMOTE_ROOT: &str = "s3://hcp-openaccess/HCP_1200";

// ---------------------------------------------------------------------------
// Raw options
// ---------------------------------------------------------------------------

/// Unvalidated flags for the remote sync tool.
#[derive(Debug, Clone, Default)]
pub struct SyncOptions {
    pub dest: Option<PathBuf>,
    pub subject: Option<String>,
    pub subjlist: Option<PathBuf>,
    pub stage: Option<String>,
    pub dry_run: bool,
}

/// Unvalidated flags for the local link tool.
#[derive(Debug, Clone, Default)]
pub struct LinkOptions {
    pub source: Option<PathBuf>,
    pub dest: Option<PathBuf>,
    pub subject: Option<String>,
    pub subjlist: Option<PathBuf>,
    pub stage: Option<String>,
    pub quiet: bool,
    pub dry_run: bool,
}

// ---------------------------------------------------------------------------
// Resolved configs
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyncConfig {
    pub remote_root: String,
    pub dest: PathBuf,
    pub subjects: Vec<SubjectId>,
    pub stage: Stage,
    pub dry_run: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinkConfig {
    pub source: PathBuf,
    pub dest: PathBuf,
    pub subjects: Vec<SubjectId>,
    pub stage: Stage,
    pub quiet: bool,
    pub dry_run: bool,
}

impl SyncOptions {
    pub fn resolve(self) -> Result<SyncConfig, ConfigErrors> {
        let mut errs = ConfigErrors::default();
        let dest = required_path("dest", self.dest, &mut errs);
        let stage = resolve_stage(self.stage.as_deref(), &mut errs);
        let subjects = resolve_subjects(self.subject, self.subjlist, &mut errs);

        match (dest, stage, subjects) {
            (Some(dest), Some(stage), Some(subjects)) if errs.is_empty() => Ok(SyncConfig {
                remote_root: HCP_REMOTE_ROOT.to_string(),
                dest,
                subjects,
                stage,
                dry_run: self.dry_run,
            }),
            _ => Err(errs),
        }
    }
}

impl LinkOptions {
    pub fn resolve(self) -> Result<LinkConfig, ConfigErrors> {
        let mut errs = ConfigErrors::default();
        let source = required_path("source", self.source, &mut errs);
        let dest = required_path("dest", self.dest, &mut errs);
        let stage = resolve_stage(self.stage.as_deref(), &mut errs);
        let subjects = resolve_subjects(self.subject, self.subjlist, &mut errs);

        match (source, dest, stage, subjects) {
            (Some(source), Some(dest), Some(stage), Some(subjects)) if errs.is_empty() => {
                Ok(LinkConfig {
                    source,
                    dest,
                    subjects,
                    stage,
                    quiet: self.quiet,
                    dry_run: self.dry_run,
                })
            }
            _ => Err(errs),
        }
    }
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

// `--dest=` with nothing after it counts as missing.
fn required_path(
    flag: &'static str,
    value: Option<PathBuf>,
    errs: &mut ConfigErrors,
) -> Option<PathBuf> {
    match value {
        Some(path) if !path.as_os_str().is_empty() => Some(path),
        _ => {
            errs.push(ConfigError::MissingOption { flag });
            None
        }
    }
}

fn resolve_stage(value: Option<&str>, errs: &mut ConfigErrors) -> Option<Stage> {
    match value.map(str::parse::<Stage>) {
        None => Some(Stage::default()),
        Some(Ok(stage)) => Some(stage),
        Some(Err(e)) => {
            errs.push(e);
            None
        }
    }
}

fn resolve_subjects(
    subject: Option<String>,
    subjlist: Option<PathBuf>,
    errs: &mut ConfigErrors,
) -> Option<Vec<SubjectId>> {
    let resolved =
        SubjectSelection::from_flags(subject, subjlist).and_then(|sel| sel.resolve());
    match resolved {
        Ok(subjects) => Some(subjects),
        Err(e) => {
            errs.push(e);
            None
        }
    }
}
