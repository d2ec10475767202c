//! hcpmirror core library — domain types, stage policy, option resolution.
//!
//! - [`types`] — [`SubjectId`] and [`Stage`]
//! - [`stage`] — the stage-to-subdirectory table shared by both front ends
//! - [`subjects`] — subject set resolution (`--subject` / `--subjlist`)
//! - [`config`] — immutable run configuration for each tool
//! - [`error`] — [`ConfigError`] and [`ConfigErrors`]

pub mod config;
pub mod error;
pub mod stage;
pub mod subjects;
pub mod types;

pub use config::{LinkConfig, LinkOptions, SyncConfig, SyncOptions, HCP_REMOTE_ROOT};
pub use error::{ConfigError, ConfigErrors};
pub use stage::{subdirectories_for, StagePolicy};
pub use subjects::SubjectSelection;
pub use types::{Stage, SubjectId};
