//! Remote sync driver.
//!
//! Per subject:
//! 1. `mkdir -p <dest>/<subject>`
//! 2. for each stage subdirectory: `mkdir -p` it, then sync
//!    `<remote>/<subject>/<dir>` into it
//! 3. prune whatever the stage prunes
//!
//! Nothing is ever deleted up front: the transfer is additive and idempotent,
//! so re-running converges on the same tree.

use std::path::Path;

use hcpmirror_core::{subdirectories_for, Stage, SubjectId, SyncConfig};

use crate::error::EngineError;
use crate::report::{Action, Steps, SubjectReport};
use crate::transfer::RemoteSync;
use crate::tree::{ensure_dir, subject_dir, TreeRemover};

pub struct RemoteSyncDriver<'a> {
    syncer: &'a dyn RemoteSync,
    remover: &'a dyn TreeRemover,
}

impl<'a> RemoteSyncDriver<'a> {
    pub fn new(syncer: &'a dyn RemoteSync, remover: &'a dyn TreeRemover) -> Self {
        Self { syncer, remover }
    }

    /// Sync every configured subject, in order. Stops at the first failure.
    pub fn run(&self, config: &SyncConfig) -> Result<Vec<SubjectReport>, EngineError> {
        if !config.dry_run {
            ensure_dir(&config.dest)?;
        }
        let mut reports = Vec::with_capacity(config.subjects.len());
        for subject in &config.subjects {
            let report = self.sync_subject(
                &config.remote_root,
                &config.dest,
                subject,
                config.stage,
                config.dry_run,
            )?;
            reports.push(report);
        }
        Ok(reports)
    }

    pub fn sync_subject(
        &self,
        remote_root: &str,
        dest: &Path,
        subject: &SubjectId,
        stage: Stage,
        dry_run: bool,
    ) -> Result<SubjectReport, EngineError> {
        let policy = subdirectories_for(stage);
        let subject_dir = subject_dir(dest, subject)?;
        let remote_subject = format!("{}/{}", remote_root.trim_end_matches('/'), subject);
        tracing::info!("subject {subject}: stage {stage}");

        let mut report = SubjectReport::new(subject.clone(), stage);
        let mut steps = Steps::new(&mut report, dry_run);

        steps.run(
            Action::CreateDir {
                path: subject_dir.clone(),
            },
            || ensure_dir(&subject_dir),
        )?;

        for dir in policy.subdirs() {
            let local = subject_dir.join(dir);
            steps.run(Action::CreateDir { path: local.clone() }, || {
                ensure_dir(&local)
            })?;

            let remote = format!("{remote_subject}/{dir}");
            steps.run(
                Action::Sync {
                    remote: remote.clone(),
                    local: local.clone(),
                },
                || self.syncer.sync_tree(&remote, &local),
            )?;
        }

        for rel in policy.prune_paths() {
            let path = subject_dir.join(rel);
            steps.run_if(Action::Prune { path: path.clone() }, || {
                self.remover.remove_tree(&path)
            })?;
        }

        Ok(report)
    }
}
