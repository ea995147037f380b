//! Locus CLI: compile and check selector catalogs
//!
//! ## Usage
//!
//! ```bash
//! locus compile pages.yaml                 # Print every compiled selector
//! locus compile pages.yaml --name rows -f json
//! locus check pages.yaml                   # Non-zero exit on the first bad entry
//! locus config --config locus.yaml         # Show effective configuration
//! ```

use clap::Parser;
use locus_cli::{build_config, handlers, logging, Cli, CliResult, Commands};
use std::process::ExitCode;

fn main() -> ExitCode {
    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}

fn run() -> CliResult<()> {
    let cli = Cli::parse();
    let config = build_config(&cli)?;
    logging::init(config.verbosity);

    let output = match &cli.command {
        Commands::Compile(args) => handlers::execute_compile(&config, args)?,
        Commands::Check(args) => handlers::execute_check(&config, args)?,
        Commands::Config(args) => handlers::execute_config(&config, args)?,
    };
    print!("{output}");
    Ok(())
}
