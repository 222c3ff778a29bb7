#![deny(missing_docs)]

//! # ParamMap CLI
//!
//! Command Line Interface over the parameter marshalling core.
//!
//! Supported Commands:
//! - `build`: Populates a request for one operation and prints it as JSON.
//! - `check`: Lints an operation's parameter declarations.

use clap::{Parser, Subcommand};

use crate::error::CliResult;

mod build;
mod check;
mod error;
mod input;
mod logger;

#[derive(Parser, Debug)]
#[clap(author, version, about = "API request parameter marshalling")]
struct Cli {
    /// Enable debug logging.
    #[clap(long, short, global = true)]
    verbose: bool,

    #[clap(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Build a request from an operation description and argument values.
    Build(build::BuildArgs),
    /// Check an operation's parameter declarations.
    Check(check::CheckArgs),
}

fn main() -> CliResult<()> {
    let cli = Cli::parse();
    logger::init_logger(cli.verbose);

    match &cli.command {
        Commands::Build(args) => build::execute(args)?,
        Commands::Check(args) => check::execute(args)?,
    }

    Ok(())
}
