use clap::{Parser, Subcommand};

use commands::GlobalArgs;

mod commands;
mod output;

use commands::config_cmd;

const VERSION: &str = env!("CARGO_PKG_VERSION");

#[derive(Parser)]
#[command(name = "autoprune")]
#[command(version = VERSION)]
#[command(about = "Delete remote git branches whose names contain a marker")]
struct Cli {
    #[command(flatten)]
    global: GlobalArgs,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// List marked branches, then delete them (default)
    Run,
    /// Write marked remote branches to the branch list
    List,
    /// Delete every branch named in the branch list
    Prune,
    /// Inspect configuration
    Config(config_cmd::ConfigArgs),
}

fn main() -> std::process::ExitCode {
    let cli = Cli::parse();
    let command = cli.command.unwrap_or(Commands::Run);

    let (json_result, exit_code) = commands::run_json(command, &cli.global);

    if output::print_json_result(json_result).is_err() {
        return std::process::ExitCode::from(1);
    }

    std::process::ExitCode::from(exit_code_to_u8(exit_code))
}

fn exit_code_to_u8(code: i32) -> u8 {
    if code <= 0 {
        0
    } else if code >= 255 {
        255
    } else {
        code as u8
    }
}
