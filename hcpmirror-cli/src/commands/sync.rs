//! `hcp-s3-sync` — mirror stage subdirectories from the HCP bucket.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;

use hcpmirror_core::SyncOptions;
use hcpmirror_engine::{AwsCliSync, FsRemover, RemoteSyncDriver};

use crate::{logging, Tool};

use super::print_summary;

/// Mirror per-subject HCP directories from s3://hcp-openaccess/HCP_1200.
#[derive(Parser, Debug)]
#[command(name = "hcp-s3-sync", long_about = None)]
pub struct SyncArgs {
    /// Local destination root; one directory per subject is created under it.
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

    /// Show what would be synced without touching the disk or the bucket.
    #[arg(long)]
    pub dry_run: bool,
}

impl From<SyncArgs> for SyncOptions {
    fn from(a: SyncArgs) -> Self {
        SyncOptions {
            dest: a.dest,
            subject: a.subject,
            subjlist: a.subjlist,
            stage: a.stage,
            dry_run: a.dry_run,
        }
    }
}

impl Tool for SyncArgs {
    const PROGRAM: &'static str = "hcp-s3-sync";

    fn execute(self) -> Result<()> {
        let config = SyncOptions::from(self).resolve()?;
        logging::init(Self::PROGRAM, false);

        let syncer = AwsCliSync::from_env();
        tracing::debug!("transfer tool: {}", syncer.program().display());
        let driver = RemoteSyncDriver::new(&syncer, &FsRemover);
        let reports = driver
            .run(&config)
            .with_context(|| format!("sync into {} failed", config.dest.display()))?;

        for r in &reports {
            let counts = format!("{} synced, {} pruned", r.synced(), r.pruned());
            print_summary(r, config.dry_run, &counts);
        }
        Ok(())
    }
}

pub fn main() -> std::process::ExitCode {
    crate::launch::<SyncArgs, _, _>(std::env::args_os())
}
