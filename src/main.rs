use std::env;

use clap::Parser;
use miette::Result;
use spriteful::cli::{Cli, Commands};
use spriteful::output::Printer;

fn main() -> Result<()> {
    let cli = Cli::parse();
    let printer = Printer::new();

    match cli.command {
        Commands::Build(args) => {
            // Everything after the subcommand, as typed
            let raw_args: Vec<String> = env::args().skip(2).collect();
            spriteful::cli::build::run(args, raw_args, &printer)?
        }
        Commands::Init(args) => spriteful::cli::init::run(args, &printer)?,
        Commands::Completions(args) => spriteful::cli::completions::run(args)?,
    }

    Ok(())
}
