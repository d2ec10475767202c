//! `hcp-link` — rebuild subject trees from an existing local mirror.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;

use hcpmirror_core::LinkOptions;
use hcpmirror_engine::{CowCopier, FsRemover, LinkMaterializer, PromptConfirm};

use crate::{logging, Tool};

use super::print_summary;

/// Build per-subject trees of copy-on-write references into a local HCP
/// mirror. Existing subject trees are deleted only after confirmation.
#[derive(Parser, Debug)]
#[command(name = "hcp-link", long_about = None)]
pub struct LinkArgs {
    /// Root of the existing local mirror (read only).
    #[arg(long, value_name = "DIR")]
    pub source: Option<PathBuf>,

    /// Destination root; one directory per subject is (re)built under it.
    #[arg(long, value_name = "DIR")]
    pub dest: Option<PathBuf>,

    /// Process a single subject.
    #[arg(long, value_name = "ID")]
    pub subject: Option<String>,

    /// Process every subject listed (whitespace separated) in FILE.
    #[arg(long, value_name = "FILE")]
    pub subjlist: Option<PathBuf>,

    /// unproc | struct | proc [default: unproc]
    #[arg(long, value_name = "STAGE")]
    pub stage: Option<String>,

    /// Only log warnings and errors, not every copy and delete.
    #[arg(long)]
    pub quiet: bool,

    /// Show what would be built without touching the disk or prompting.
    #[arg(long)]
    pub dry_run: bool,
}

impl From<LinkArgs> for LinkOptions {
    fn from(a: LinkArgs) -> Self {
        LinkOptions {
            source: a.source,
            dest: a.dest,
            subject: a.subject,
            subjlist: a.subjlist,
            stage: a.stage,
            quiet: a.quiet,
            dry_run: a.dry_run,
        }
    }
}

impl Tool for LinkArgs {
    const PROGRAM: &'static str = "hcp-link";

    fn execute(self) -> Result<()> {
        let config = LinkOptions::from(self).resolve()?;
        logging::init(Self::PROGRAM, config.quiet);

        let mut gate = PromptConfirm::stdio().labelled(Self::PROGRAM);
        let mut linker = LinkMaterializer::new(&CowCopier, &FsRemover, &mut gate);
        let reports = linker.run(&config).with_context(|| {
            format!(
                "linking {} into {} failed",
                config.source.display(),
                config.dest.display()
            )
        })?;

        for r in &reports {
            let mut counts = format!("{} copied, {} pruned", r.materialized(), r.pruned());
            if r.cleaned() {
                counts.push_str(", replaced existing tree");
            }
            print_summary(r, config.dry_run, &counts);
        }
        Ok(())
    }
}

pub fn main() -> std::process::ExitCode {
    crate::launch::<LinkArgs, _, _>(std::env::args_os())
}
