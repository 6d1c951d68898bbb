use clap::Parser;
use std::process;

use taskpilot::cli;
use taskpilot::cli::commands::{Cli, Commands};

#[tokio::main]
async fn main() {
    let cli_args = Cli::parse();
    let json_output = cli_args.json;

    let exit_code = match cli_args.command {
        Commands::Init => cli::init::run(json_output),
        Commands::Task(cmd) => cli::task::run(cmd, json_output).await,
        Commands::Watch { interval } => cli::watch::run(interval, json_output).await,
    };

    process::exit(exit_code);
}
