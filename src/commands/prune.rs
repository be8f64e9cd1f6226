use autoprune::pruner::{self, PruneReport};

use super::{git_for, CmdResult, GlobalArgs};

pub fn run(global: &GlobalArgs) -> CmdResult<PruneReport> {
    let config = global.resolve_config()?;
    let mut git = git_for(&config);

    let report = pruner::prune_branch_list(&mut git, &config)?;
    let exit_code = report.exit_code(config.strict);
    Ok((report, exit_code))
}
