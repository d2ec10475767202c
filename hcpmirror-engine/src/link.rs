//! Local link materializer.
//!
//! Rebuilds `<dest>/<subject>` from `<source>/<subject>`, one stage
//! subdirectory at a time. An existing subject tree is only deleted after the
//! [`Confirm`] gate says yes; a no aborts the whole run, leaving subjects
//! already processed in place and later ones untouched.

use std::path::{Path, PathBuf};

use hcpmirror_core::{subdirectories_for, LinkConfig, Stage, SubjectId};

use crate::confirm::Confirm;
use crate::error::{io_err, EngineError};
use crate::materialize::Materializer;
use crate::report::{Action, Steps, SubjectReport};
use crate::tree::{ensure_dir, entry_exists, grant_write_recursive, subject_dir, TreeRemover};

pub struct LinkMaterializer<'a> {
    materializer: &'a dyn Materializer,
    remover: &'a dyn TreeRemover,
    confirm: &'a mut dyn Confirm,
}

impl<'a> LinkMaterializer<'a> {
    pub fn new(
        materializer: &'a dyn Materializer,
        remover: &'a dyn TreeRemover,
        confirm: &'a mut dyn Confirm,
    ) -> Self {
        Self {
            materializer,
            remover,
            confirm,
        }
    }

    /// Materialize every configured subject, in order.
    ///
    /// Returns [`EngineError::Declined`] as soon as an overwrite is refused.
    pub fn run(&mut self, config: &LinkConfig) -> Result<Vec<SubjectReport>, EngineError> {
        if !config.dry_run {
            ensure_dir(&config.dest)?;
        }
        let mut reports = Vec::with_capacity(config.subjects.len());
        for subject in &config.subjects {
            let report = self.link_subject(
                &config.source,
                &config.dest,
                subject,
                config.stage,
                config.dry_run,
            )?;
            reports.push(report);
        }
        Ok(reports)
    }

    pub fn link_subject(
        &mut self,
        source: &Path,
        dest: &Path,
        subject: &SubjectId,
        stage: Stage,
        dry_run: bool,
    ) -> Result<SubjectReport, EngineError> {
        let policy = subdirectories_for(stage);
        let subject_src = subject_dir(source, subject)?;
        let subject_dir = subject_dir(dest, subject)?;
        tracing::info!("subject {subject}: stage {stage}");

        let mut report = SubjectReport::new(subject.clone(), stage);
        let mut steps = Steps::new(&mut report, dry_run);

        if entry_exists(&subject_dir)? {
            tracing::warn!(
                "{} already exists; its contents will be deleted",
                subject_dir.display()
            );
            if !dry_run {
                let prompt = format!("delete {} and rebuild it? [y/N] ", subject_dir.display());
                if !self.confirm.confirm(&prompt) {
                    return Err(EngineError::Declined { path: subject_dir });
                }
            }
            steps.run(
                Action::Clean {
                    path: subject_dir.clone(),
                },
                || -> Result<(), EngineError> {
                    grant_write_recursive(&subject_dir)?;
                    self.remover.remove_tree(&subject_dir).map(|_| ())
                },
            )?;
        }

        for dir in policy.subdirs() {
            let out = subject_dir.join(dir);
            steps.run(Action::CreateDir { path: out.clone() }, || ensure_dir(&out))?;

            for entry in list_entries(&subject_src.join(dir))? {
                let Some(name) = entry.file_name() else {
                    continue;
                };
                let target = out.join(name);
                steps.run(
                    Action::Materialize {
                        source: entry.clone(),
                        dest: target.clone(),
                    },
                    || self.materializer.materialize_reference(&entry, &target),
                )?;
            }
        }

        // Copies keep the mirror's (often read-only) modes; open the whole
        // destination back up so later cleans and edits work.
        steps.run(
            Action::GrantWrite {
                path: dest.to_path_buf(),
            },
            || grant_write_recursive(dest),
        )?;

        for rel in policy.prune_paths() {
            let path = subject_dir.join(rel);
            steps.run_if(Action::Prune { path: path.clone() }, || {
                self.remover.remove_tree(&path)
            })?;
        }

        Ok(report)
    }
}

/// Entries of `dir`, sorted by name for a stable order.
fn list_entries(dir: &Path) -> Result<Vec<PathBuf>, EngineError> {
    let mut entries = std::fs::read_dir(dir)
        .map_err(|e| io_err(dir, e))?
        .map(|e| e.map(|e| e.path()))
        .collect::<Result<Vec<_>, _>>()
        .map_err(|e| io_err(dir, e))?;
    entries.sort();
    Ok(entries)
}
