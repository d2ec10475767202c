//! hcpmirror — provision local copies of the HCP 1200 release.
//!
//! # Usage
//!
//! ```text
//! hcp-s3-sync --dest=DIR (--subject=ID | --subjlist=FILE) [--stage=unproc|struct|proc] [--dry-run]
//! hcp-link --source=DIR --dest=DIR (--subject=ID | --subjlist=FILE) [--stage=...] [--quiet] [--dry-run]
//! ```
//!
//! Both tools exit `0` on success and `1` on any configuration error, on
//! `--help`, on an unknown option, on a declined overwrite, or when an
//! underlying operation fails.

pub mod commands;
pub mod logging;

use std::ffi::OsString;
use std::process::ExitCode;

use anyhow::Result;
use clap::{CommandFactory, Parser};

use hcpmirror_core::ConfigErrors;
use hcpmirror_engine::EngineError;

/// A front end: parsed flags that know how to run themselves.
pub trait Tool: Parser {
    /// Program name used as the prefix of every diagnostic line.
    const PROGRAM: &'static str;

    fn execute(self) -> Result<()>;
}

/// Parse `argv`, run the tool, and map the outcome onto an exit status.
pub fn launch<T, I, A>(argv: I) -> ExitCode
where
    T: Tool,
    I: IntoIterator<Item = A>,
    A: Into<OsString> + Clone,
{
    let args = match T::try_parse_from(argv) {
        Ok(args) => args,
        Err(err) => {
            // --help lands here too; it is still a non-zero exit.
            let _ = err.print();
            return ExitCode::FAILURE;
        }
    };

    match args.execute() {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => report_failure::<T>(&err),
    }
}

fn report_failure<T: Tool>(err: &anyhow::Error) -> ExitCode {
    let program = T::PROGRAM;
    if let Some(errs) = err.downcast_ref::<ConfigErrors>() {
        for e in errs.iter() {
            eprintln!("{program}: {e}");
        }
        eprintln!("{}", T::command().render_help());
    } else if let Some(EngineError::Declined { path }) = err.downcast_ref::<EngineError>() {
        eprintln!(
            "{program}: left {} in place; aborting at user request",
            path.display()
        );
    } else {
        eprintln!("{program}: error: {err:#}");
    }
    ExitCode::FAILURE
}
