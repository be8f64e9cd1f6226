use clap::Args;

use autoprune::config::{self, ConfigOverrides, NameMode, PruneConfig};
use autoprune::git::GitCli;

pub type CmdResult<T> = autoprune::Result<(T, i32)>;

/// Flags shared by every command. Unset flags keep the config file value.
#[derive(Args, Debug, Default)]
pub struct GlobalArgs {
    /// Remote to delete branches from [default: origin]
    #[arg(long, global = true, value_name = "NAME")]
    pub remote: Option<String>,

    /// Branch list file written by `list` and read by `prune` [default: branch_list]
    #[arg(long, global = true, value_name = "PATH")]
    pub artifact: Option<String>,

    /// Substring a remote branch must contain to be pruned [default: auto-patch]
    #[arg(long, global = true, value_name = "TEXT")]
    pub marker: Option<String>,

    /// How branch names are derived from branch list lines [default: strip_separators]
    #[arg(long, global = true, value_enum, value_name = "MODE")]
    pub name_mode: Option<NameMode>,

    /// Directory git runs in [default: .]
    #[arg(long = "repo", global = true, value_name = "DIR")]
    pub repo_dir: Option<String>,

    /// Fail on listing errors and exit non-zero when any deletion fails
    #[arg(long, global = true, overrides_with = "no_strict")]
    pub strict: bool,

    /// Turn off strict mode set in the config file
    #[arg(long, global = true, overrides_with = "strict")]
    pub no_strict: bool,

    /// List and derive branch names without deleting anything
    #[arg(long, global = true, overrides_with = "no_dry_run")]
    pub dry_run: bool,

    /// Turn off dry run set in the config file
    #[arg(long, global = true, overrides_with = "dry_run")]
    pub no_dry_run: bool,

    /// Config file [default: ~/.config/autoprune/autoprune.json]
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<String>,
}

impl GlobalArgs {
    pub(crate) fn overrides(&self) -> ConfigOverrides {
        ConfigOverrides {
            remote: self.remote.clone(),
            artifact: self.artifact.clone(),
            marker: self.marker.clone(),
            name_mode: self.name_mode,
            repo_dir: self.repo_dir.clone(),
            strict: switch(self.strict, self.no_strict),
            dry_run: switch(self.dry_run, self.no_dry_run),
        }
    }

    pub fn resolve_config(&self) -> autoprune::Result<PruneConfig> {
        config::resolve(self.config.as_deref(), self.overrides())
    }

    pub fn config_path(&self) -> autoprune::Result<String> {
        Ok(config::config_path(self.config.as_deref())?
            .display()
            .to_string())
    }
}

/// `--flag` / `--no-flag` pair; neither keeps the config file value.
fn switch(on: bool, off: bool) -> Option<bool> {
    match (on, off) {
        (true, _) => Some(true),
        (_, true) => Some(false),
        _ => None,
    }
}

fn git_for(config: &PruneConfig) -> GitCli {
    GitCli::new(config.repo_path())
}

pub mod config_cmd;
pub mod list;
pub mod prune;
pub mod run;

/// Dispatch a command to its handler and map result to JSON.
macro_rules! dispatch {
    ($global:expr, $module:ident) => {
        crate::output::map_cmd_result_to_json($module::run($global))
    };
    ($args:expr, $global:expr, $module:ident) => {
        crate::output::map_cmd_result_to_json($module::run($args, $global))
    };
}

pub(crate) fn run_json(
    command: crate::Commands,
    global: &GlobalArgs,
) -> (autoprune::Result<serde_json::Value>, i32) {
    match command {
        crate::Commands::Run => dispatch!(global, run),
        crate::Commands::List => dispatch!(global, list),
        crate::Commands::Prune => dispatch!(global, prune),
        crate::Commands::Config(args) => dispatch!(args, global, config_cmd),
    }
}
