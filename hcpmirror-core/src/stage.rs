//! Stage policy: which subject subdirectories each stage materializes.
//!
//! Both the remote sync driver and the local link materializer read this one
//! table, so the two front ends cannot drift apart.
//!
//! | stage  | subdirectories                                 | pruned afterwards      |
//! |--------|------------------------------------------------|------------------------|
//! | unproc | release-notes, unprocessed                     |                        |
//! | struct | release-notes, unprocessed, T1w, MNINonLinear  | `MNINonLinear/Results` |
//! | proc   | release-notes, unprocessed, T1w, MNINonLinear  |                        |

use std::path::Path;

use crate::types::Stage;

pub const RELEASE_NOTES: &str = "release-notes";
pub const UNPROCESSED: &str = "unprocessed";
pub const T1W: &str = "T1w";
pub const MNI_NON_LINEAR: &str = "MNINonLinear";
pub const MNI_RESULTS: &str = "MNINonLinear/Results";

/// Ordered subdirectories for one stage, plus the relative paths removed once
/// they have been materialized.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StagePolicy {
    pub stage: Stage,
    subdirs: &'static [&'static str],
    prune: &'static [&'static str],
}

impl StagePolicy {
    /// Subdirectory names, in materialization order.
    pub fn subdirs(&self) -> &'static [&'static str] {
        self.subdirs
    }

    /// Subject-relative paths deleted after every subdirectory is in place.
    pub fn prune_paths(&self) -> impl Iterator<Item = &'static Path> {
        self.prune.iter().map(Path::new)
    }

    pub fn prunes(&self) -> bool {
        !self.prune.is_empty()
    }
}

const BASE: &[&str] = &[RELEASE_NOTES, UNPROCESSED];
const FULL: &[&str] = &[RELEASE_NOTES, UNPROCESSED, T1W, MNI_NON_LINEAR];

static STAGE_TABLE: [StagePolicy; 3] = [
    StagePolicy {
        stage: Stage::Unproc,
        subdirs: BASE,
        prune: &[],
    },
    StagePolicy {
        stage: Stage::Struct,
        subdirs: FULL,
        prune: &[MNI_RESULTS],
    },
    StagePolicy {
        stage: Stage::Proc,
        subdirs: FULL,
        prune: &[],
    },
];

/// Look up the policy for `stage`.
pub fn subdirectories_for(stage: Stage) -> &'static StagePolicy {
    // Table rows are in `Stage` declaration order.
    &STAGE_TABLE[stage as usize]
}
