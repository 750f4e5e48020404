pub mod build;
pub mod completions;
pub mod files;
pub mod init;

use clap::{Parser, Subcommand};

/// spriteful - Image sprites with matching stylesheets
#[derive(Parser, Debug)]
#[command(name = "spriteful")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Combine image directories into sprites and write their stylesheets
    Build(build::BuildArgs),

    /// Initialize a spriteful project (generates spriteful.yaml)
    Init(init::InitArgs),

    /// Generate shell completions
    Completions(completions::CompletionsArgs),
}
