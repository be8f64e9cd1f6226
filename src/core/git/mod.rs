//! Access to the remote whose branches get pruned.
//!
//! [`RemoteBranches`] is the seam: [`GitCli`] shells out to `git`,
//! [`MemoryRemote`] keeps branches in memory.

mod memory;
mod primitives;

pub use memory::*;
pub use primitives::*;

use crate::error::Result;
use crate::utils::command::CommandOutcome;

/// Result of enumerating remote-tracking branches.
#[derive(Debug, Clone)]
pub struct Listing {
    pub outcome: CommandOutcome,
    /// Text kept by the selector, in listing order.
    pub refs: Vec<String>,
}

pub trait RemoteBranches {
    /// List remote-tracking branch references, keeping whatever `select` returns
    /// for each line and dropping lines it rejects.
    ///
    /// A listing command that exits non-zero is still `Ok`; `Err` means it never ran.
    fn list_refs(&mut self, select: &dyn Fn(&str) -> Option<String>) -> Result<Listing>;

    /// Delete `branch` on `remote`. A rejected deletion is `Ok` with a failed outcome.
    fn delete_ref(&mut self, remote: &str, branch: &str) -> Result<CommandOutcome>;
}
