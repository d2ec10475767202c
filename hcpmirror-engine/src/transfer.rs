//! Remote transfer collaborator.

use std::ffi::OsString;
use std::path::Path;
use std::process::Command;

use crate::error::{io_err, EngineError};

/// Environment variable naming the `aws` executable.
pub const AWS_BIN_ENV: &str = "HCPMIRROR_AWS_BIN";

/// One-way, non-deleting, idempotent copy of a remote prefix into a local
/// directory.
pub trait RemoteSync {
    fn sync_tree(&self, remote: &str, local: &Path) -> Result<(), EngineError>;
}

/// [`RemoteSync`] that shells out to `aws s3 sync <remote> <local>`.
///
/// Credentials and transfer tuning come from the AWS CLI's own configuration.
/// Without `--delete`, `aws s3 sync` never removes local files and skips
/// objects whose size and timestamp already match.
#[derive(Debug, Clone)]
pub struct AwsCliSync {
    program: OsString,
}

impl AwsCliSync {
    pub fn new(program: impl Into<OsString>) -> Self {
        Self {
            program: program.into(),
        }
    }

    /// `$HCPMIRROR_AWS_BIN`, falling back to `aws` on `$PATH`.
    pub fn from_env() -> Self {
        let program = std::env::var_os(AWS_BIN_ENV)
            .filter(|p| !p.is_empty())
            .unwrap_or_else(|| OsString::from("aws"));
        Self::new(program)
    }

    pub fn program(&self) -> &Path {
        Path::new(&self.program)
    }
}

impl Default for AwsCliSync {
    fn default() -> Self {
        Self::new("aws")
    }
}

impl RemoteSync for AwsCliSync {
    fn sync_tree(&self, remote: &str, local: &Path) -> Result<(), EngineError> {
        // stdio is inherited so the CLI's own progress output reaches the user.
        let status = Command::new(&self.program)
            .args(["s3", "sync"])
            .arg(remote)
            .arg(local)
            .status()
            .map_err(|e| io_err(&self.program, e))?;

        if status.success() {
            return Ok(());
        }
        Err(EngineError::Transfer {
            remote: remote.to_string(),
            local: local.to_path_buf(),
            status: status.to_string(),
        })
    }
}
