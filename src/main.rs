use clap::Parser;
use miette::Result;
use priomap::cli::{Cli, Commands};
use priomap::output::Printer;

fn main() -> Result<()> {
    let cli = Cli::parse();
    let printer = Printer::new();

    match cli.command {
        Commands::Build(args) => priomap::cli::build::run(args, &printer)?,
        Commands::Mark(args) => priomap::cli::mark::run(args, &printer)?,
        Commands::List(args) => priomap::cli::list::run(args, &printer)?,
        Commands::Validate(args) => priomap::cli::validate::run(args, &printer)?,
        Commands::Completions(args) => priomap::cli::completions::run(args)?,
    }

    Ok(())
}
