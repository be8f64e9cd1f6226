use clap::{Args, Subcommand};
use serde::Serialize;

use autoprune::config::PruneConfig;
use autoprune::git;

use super::{CmdResult, GlobalArgs};

#[derive(Args, Debug)]
pub struct ConfigArgs {
    #[command(subcommand)]
    command: ConfigCommand,
}

#[derive(Subcommand, Debug)]
enum ConfigCommand {
    /// Display the effective configuration (defaults + file + flags)
    Show {
        /// Show only built-in defaults (ignore autoprune.json and flags)
        #[arg(long)]
        builtin: bool,
    },
    /// Show the path to the config file
    Path,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfigOutput {
    command: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    config: Option<PruneConfig>,
    #[serde(skip_serializing_if = "Option::is_none")]
    path: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    exists: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    is_git_repo: Option<bool>,
}

pub fn run(args: ConfigArgs, global: &GlobalArgs) -> CmdResult<ConfigOutput> {
    match args.command {
        ConfigCommand::Show { builtin } => show(builtin, global),
        ConfigCommand::Path => path(global),
    }
}

fn show(builtin: bool, global: &GlobalArgs) -> CmdResult<ConfigOutput> {
    let config = if builtin {
        PruneConfig::default()
    } else {
        global.resolve_config()?
    };
    let is_git_repo = git::is_git_repo(&config.repo_path());

    Ok((
        ConfigOutput {
            command: "config.show".to_string(),
            config: Some(config),
            path: None,
            exists: None,
            is_git_repo: Some(is_git_repo),
        },
        0,
    ))
}

fn path(global: &GlobalArgs) -> CmdResult<ConfigOutput> {
    let path = global.config_path()?;
    let exists = std::path::Path::new(&path).exists();

    Ok((
        ConfigOutput {
            command: "config.path".to_string(),
            config: None,
            path: Some(path),
            exists: Some(exists),
            is_git_repo: None,
        },
        0,
    ))
}
