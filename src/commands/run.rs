use autoprune::run::{self, RunReport};

use super::{git_for, CmdResult, GlobalArgs};

pub fn run(global: &GlobalArgs) -> CmdResult<RunReport> {
    let config = global.resolve_config()?;
    let mut git = git_for(&config);

    let report = run::run(&mut git, &config)?;
    let exit_code = report.exit_code(config.strict);
    Ok((report, exit_code))
}
