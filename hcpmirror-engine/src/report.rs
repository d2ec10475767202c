//! What a driver did (or, under `--dry-run`, would do) for one subject.

use std::fmt;
use std::path::PathBuf;

use hcpmirror_core::{Stage, SubjectId};

/// One filesystem or network effect.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    CreateDir { path: PathBuf },
    Sync { remote: String, local: PathBuf },
    Materialize { source: PathBuf, dest: PathBuf },
    /// Pre-clean of an existing subject tree.
    Clean { path: PathBuf },
    GrantWrite { path: PathBuf },
    Prune { path: PathBuf },
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Action::CreateDir { path } => write!(f, "create {}", path.display()),
            Action::Sync { remote, local } => {
                write!(f, "sync {remote} -> {}", local.display())
            }
            Action::Materialize { source, dest } => {
                write!(f, "copy {} -> {}", source.display(), dest.display())
            }
            Action::Clean { path } => write!(f, "remove {}", path.display()),
            Action::GrantWrite { path } => write!(f, "grant write on {}", path.display()),
            Action::Prune { path } => write!(f, "prune {}", path.display()),
        }
    }
}

/// Outcome of an individual step.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StepResult {
    /// The step ran.
    Applied(Action),
    /// `--dry-run`: the step *would* have run.
    Planned(Action),
    /// Nothing to do (e.g. pruning a path that is already absent).
    Skipped(Action),
}

impl StepResult {
    pub fn action(&self) -> &Action {
        match self {
            StepResult::Applied(a) | StepResult::Planned(a) | StepResult::Skipped(a) => a,
        }
    }
}

/// Steps taken for one subject, in order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubjectReport {
    pub subject: SubjectId,
    pub stage: Stage,
    pub steps: Vec<StepResult>,
}

impl SubjectReport {
    pub fn new(subject: SubjectId, stage: Stage) -> Self {
        Self {
            subject,
            stage,
            steps: Vec::new(),
        }
    }

    /// Steps that ran or would run and match `pred`.
    pub fn count(&self, pred: impl Fn(&Action) -> bool) -> usize {
        self.steps
            .iter()
            .filter(|s| !matches!(s, StepResult::Skipped(_)))
            .filter(|s| pred(s.action()))
            .count()
    }

    pub fn synced(&self) -> usize {
        self.count(|a| matches!(a, Action::Sync { .. }))
    }

    pub fn materialized(&self) -> usize {
        self.count(|a| matches!(a, Action::Materialize { .. }))
    }

    pub fn pruned(&self) -> usize {
        self.count(|a| matches!(a, Action::Prune { .. }))
    }

    pub fn cleaned(&self) -> bool {
        self.count(|a| matches!(a, Action::Clean { .. })) > 0
    }
}

// ---------------------------------------------------------------------------
// Step recorder shared by both drivers
// ---------------------------------------------------------------------------

pub(crate) struct Steps<'r> {
    report: &'r mut SubjectReport,
    dry_run: bool,
}

impl<'r> Steps<'r> {
    pub(crate) fn new(report: &'r mut SubjectReport, dry_run: bool) -> Self {
        Self { report, dry_run }
    }

    /// Run `op` for `action`, or only record it under `--dry-run`.
    pub(crate) fn run<E>(
        &mut self,
        action: Action,
        op: impl FnOnce() -> Result<(), E>,
    ) -> Result<(), E> {
        if self.dry_run {
            tracing::info!("would {action}");
            self.report.steps.push(StepResult::Planned(action));
            return Ok(());
        }
        op()?;
        tracing::info!("{action}");
        self.report.steps.push(StepResult::Applied(action));
        Ok(())
    }

    /// Like [`Steps::run`], but `op` reports whether there was anything to do.
    pub(crate) fn run_if<E>(
        &mut self,
        action: Action,
        op: impl FnOnce() -> Result<bool, E>,
    ) -> Result<(), E> {
        if self.dry_run {
            tracing::info!("would {action}");
            self.report.steps.push(StepResult::Planned(action));
            return Ok(());
        }
        if op()? {
            tracing::info!("{action}");
            self.report.steps.push(StepResult::Applied(action));
        } else {
            tracing::debug!("skip {action}: nothing there");
            self.report.steps.push(StepResult::Skipped(action));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counts_ignore_skipped_steps() {
        let mut report = SubjectReport::new(SubjectId::from("100307"), Stage::Struct);
        report.steps = vec![
            StepResult::Applied(Action::Prune {
                path: "/dst/100307/MNINonLinear/Results".into(),
            }),
            StepResult::Skipped(Action::Prune {
                path: "/dst/100408/MNINonLinear/Results".into(),
            }),
            StepResult::Planned(Action::Sync {
                remote: "s3://b/100307/T1w".into(),
                local: "/dst/100307/T1w".into(),
            }),
        ];
        assert_eq!(report.pruned(), 1);
        assert_eq!(report.synced(), 1);
        assert_eq!(report.materialized(), 0);
        assert!(!report.cleaned());
    }

    #[test]
    fn dry_run_records_without_running() {
        let mut report = SubjectReport::new(SubjectId::from("1"), Stage::Unproc);
        let mut steps = Steps::new(&mut report, true);
        steps
            .run::<()>(Action::CreateDir { path: "/x".into() }, || {
                panic!("must not run under dry-run")
            })
            .unwrap();
        assert!(matches!(report.steps[..], [StepResult::Planned(_)]));
    }

    #[test]
    fn action_display_reads_like_a_log_line() {
        let a = Action::Materialize {
            source: "/src/1/unprocessed/3T".into(),
            dest: "/dst/1/unprocessed/3T".into(),
        };
        assert_eq!(a.to_string(), "copy /src/1/unprocessed/3T -> /dst/1/unprocessed/3T");
    }
}
