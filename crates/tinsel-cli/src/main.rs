use std::{error::Error, path::PathBuf, process::ExitCode};

use clap::{Parser, Subcommand};
use colored::Colorize;
use tinsel::{config::load_config, generate};

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Build the project
    Build {
        /// Path to the config file, relative paths inside it are resolved against its directory
        #[arg(long, default_value = tinsel::config::DEFAULT_CONFIG_FILE)]
        config: PathBuf,

        /// Don't print anything besides errors
        #[arg(long)]
        quiet: bool,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    match cli.command {
        // `--quiet` is picked up by the logger directly
        Commands::Build { config, quiet: _ } => {
            let result = load_config(&config)
                .map_err(tinsel::errors::TinselError::from)
                .and_then(generate);

            match result {
                Ok(_) => ExitCode::SUCCESS,
                Err(error) => {
                    eprintln!("{} {}", "error".bold().red(), error);

                    let mut source = error.source();
                    while let Some(cause) = source {
                        eprintln!("  {} {}", "caused by:".dimmed(), cause);
                        source = cause.source();
                    }

                    ExitCode::FAILURE
                }
            }
        }
    }
}
