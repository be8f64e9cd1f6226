use autoprune::lister::{self, ListReport};

use super::{git_for, CmdResult, GlobalArgs};

pub fn run(global: &GlobalArgs) -> CmdResult<ListReport> {
    let config = global.resolve_config()?;
    let mut git = git_for(&config);

    let report = lister::write_branch_list(&mut git, &config)?;
    Ok((report, 0))
}
