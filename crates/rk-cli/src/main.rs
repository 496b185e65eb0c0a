//! relkit CLI - declare, inspect and modify relational tables

use anyhow::Result;
use clap::Parser;

mod cli;
mod commands;
mod context;

use cli::Cli;
use commands::{count, declare, delete, deps, drop, heading, insert, size};

fn main() -> Result<()> {
    let cli = Cli::parse();

    match &cli.command {
        cli::Commands::Declare(args) => declare::execute(args, &cli.global),
        cli::Commands::Heading(args) => heading::execute(args, &cli.global),
        cli::Commands::Deps(args) => deps::execute(args, &cli.global),
        cli::Commands::Size(args) => size::execute(args, &cli.global),
        cli::Commands::Count(args) => count::execute(args, &cli.global),
        cli::Commands::Insert(args) => insert::execute(args, &cli.global),
        cli::Commands::Delete(args) => delete::execute(args, &cli.global),
        cli::Commands::Drop(args) => drop::execute(args, &cli.global),
    }
}
