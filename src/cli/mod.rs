pub mod build;
pub mod completions;
pub mod list;
pub mod mark;
pub mod validate;

use clap::{Parser, Subcommand};

/// priomap - Palette and priority tile-map pipeline
#[derive(Parser, Debug)]
#[command(name = "priomap")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Build palette and map files for every tracked image
    Build(build::BuildArgs),

    /// Mark or unmark high priority tiles on an image
    Mark(mark::MarkArgs),

    /// List tracked images and their selections
    List(list::ListArgs),

    /// Check the selection document without building
    Validate(validate::ValidateArgs),

    /// Generate shell completions
    Completions(completions::CompletionsArgs),
}
