//! # hcpmirror-engine
//!
//! Per-subject drivers for both front ends and the collaborators they call.
//!
//! - [`RemoteSyncDriver`] mirrors stage subdirectories from the remote store.
//! - [`LinkMaterializer`] rebuilds subject trees from a local mirror, asking
//!   before it deletes anything.
//!
//! Filesystem and network effects go through the narrow traits in
//! [`materialize`], [`transfer`] and [`tree`], so the orchestration can be
//! exercised against fakes.

pub mod confirm;
pub mod error;
pub mod link;
pub mod materialize;
pub mod remote;
pub mod report;
pub mod transfer;
pub mod tree;

pub use confirm::{Confirm, PromptConfirm, ScriptedConfirm};
pub use error::EngineError;
pub use link::LinkMaterializer;
pub use materialize::{CowCopier, Materializer};
pub use remote::RemoteSyncDriver;
pub use report::{Action, StepResult, SubjectReport};
pub use transfer::{AwsCliSync, RemoteSync};
pub use tree::{FsRemover, TreeRemover};
