mod cli;
mod commands;
mod observability;

use anyhow::Result;
use clap::Parser;
use cli::{Cli, Commands};

fn main() -> Result<()> {
    observability::init_tracing();
    let cli = Cli::parse();

    match cli.command.unwrap_or_else(|| Commands::Up(Default::default())) {
        Commands::Up(args) => {
            let code = commands::up::cmd_up(args)?;
            if code != 0 {
                std::process::exit(code);
            }
        }
        Commands::Check(args) => {
            commands::check::cmd_check(args)?;
        }
        Commands::Clean(args) => {
            commands::env::cmd_clean(args)?;
        }
    }

    Ok(())
}
