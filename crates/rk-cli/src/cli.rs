//! CLI argument definitions using clap derive API

use clap::{Args, Parser, Subcommand, ValueEnum};

/// relkit - declare, inspect and modify relational tables
#[derive(Parser, Debug)]
#[command(name = "rk")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Global options
    #[command(flatten)]
    pub global: GlobalArgs,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Global arguments available to all commands
#[derive(Args, Debug, Clone)]
pub struct GlobalArgs {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Directory containing relkit.yml
    #[arg(short = 'p', long, global = true, default_value = ".")]
    pub project_dir: String,

    /// Override config file path
    #[arg(short, long, global = true)]
    pub config: Option<String>,

    /// Override the database path from the config
    #[arg(short, long, global = true)]
    pub database: Option<String>,

    /// Answer yes to every confirmation prompt
    #[arg(short, long, global = true)]
    pub yes: bool,
}

/// Available subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Declare the tables listed in a YAML schema file
    Declare(DeclareArgs),

    /// Show the attributes of a table
    Heading(HeadingArgs),

    /// Show the foreign-key neighbours of a table
    Deps(DepsArgs),

    /// Show the on-disk size of a table
    Size(TableArgs),

    /// Count the rows of a table
    Count(FilterArgs),

    /// Insert JSON records into a table
    Insert(InsertArgs),

    /// Delete rows from a table
    Delete(FilterArgs),

    /// Drop a table and every table depending on it
    Drop(TableArgs),
}

/// Output formats shared by the inspection commands
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    /// Human-readable text
    Text,
    /// JSON document
    Json,
}

/// Arguments for the declare command
#[derive(Args, Debug)]
pub struct DeclareArgs {
    /// Path to the schema file
    pub file: String,
}

/// A table argument; unqualified names resolve against the configured schema
#[derive(Args, Debug)]
pub struct TableArgs {
    /// Table name (`table` or `database.table`)
    pub table: String,
}

/// Arguments for the heading command
#[derive(Args, Debug)]
pub struct HeadingArgs {
    #[command(flatten)]
    pub table: TableArgs,

    /// Output format
    #[arg(short, long, value_enum, default_value = "text")]
    pub output: OutputFormat,
}

/// Arguments for the deps command
#[derive(Args, Debug)]
pub struct DepsArgs {
    #[command(flatten)]
    pub table: TableArgs,

    /// Output format
    #[arg(short, long, value_enum, default_value = "text")]
    pub output: OutputFormat,
}

/// A table argument with an optional SQL restriction
#[derive(Args, Debug)]
pub struct FilterArgs {
    #[command(flatten)]
    pub table: TableArgs,

    /// SQL condition restricting the rows
    #[arg(short = 'w', long = "where")]
    pub condition: Option<String>,
}

/// Arguments for the insert command
#[derive(Args, Debug)]
pub struct InsertArgs {
    #[command(flatten)]
    pub table: TableArgs,

    /// A JSON object, or an array of objects, one per row
    pub records: String,

    /// Skip rows whose primary key already exists
    #[arg(long)]
    pub ignore: bool,

    /// Overwrite rows whose primary key already exists
    #[arg(long)]
    pub replace: bool,
}

#[cfg(test)]
#[path = "cli_test.rs"]
mod tests;
