//! Full pass: list, then prune. Each step runs exactly once.

use serde::Serialize;

use crate::config::PruneConfig;
use crate::error::Result;
use crate::git::RemoteBranches;
use crate::lister::{self, ListReport};
use crate::pruner::{self, PruneReport};

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RunReport {
    /// Exit status of the listing command.
    pub list_exit_code: i32,
    pub list: ListReport,
    pub prune: PruneReport,
}

impl RunReport {
    pub fn exit_code(&self, strict: bool) -> i32 {
        self.prune.exit_code(strict)
    }
}

pub fn run<R>(remote: &mut R, config: &PruneConfig) -> Result<RunReport>
where
    R: RemoteBranches + ?Sized,
{
    let list = lister::write_branch_list(remote, config)?;
    let prune = pruner::prune_branch_list(remote, config)?;

    Ok(RunReport {
        list_exit_code: list.exit_code,
        list,
        prune,
    })
}
