use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

mod args;
mod commands {
    pub mod add;
    pub mod check;
    pub mod normalize;
    pub mod paths;
    pub mod properties;
    pub mod remove;
    pub mod rename;
    pub mod select;
    pub mod update;
}
mod util;

#[derive(Parser)]
#[command(name = "blueprint", about = "Blueprint JSON schema utilities")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Add a property at a dotted path
    Add(commands::add::Args),
    /// Remove the property at a dotted path
    Remove(commands::remove::Args),
    /// Rename a property in place
    Rename(commands::rename::Args),
    /// Apply a JSON patch to a property
    Update(commands::update::Args),
    /// List the children of a node, required first
    Properties(commands::properties::Args),
    /// List the selectable paths of a schema
    Paths(commands::paths::Args),
    /// Build the sub-schema for a set of selected paths
    Select(commands::select::Args),
    /// Fill in `$schema`, `properties` and `items`
    Normalize(commands::normalize::Args),
    /// Report structural problems
    Check(commands::check::Args),
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let result = match cli.command {
        Commands::Add(args) => commands::add::run(args),
        Commands::Remove(args) => commands::remove::run(args),
        Commands::Rename(args) => commands::rename::run(args),
        Commands::Update(args) => commands::update::run(args),
        Commands::Properties(args) => commands::properties::run(args),
        Commands::Paths(args) => commands::paths::run(args),
        Commands::Select(args) => commands::select::run(args),
        Commands::Normalize(args) => commands::normalize::run(args),
        Commands::Check(args) => commands::check::run(args),
    };

    if let Err(e) = result {
        eprintln!("Error: {e:#}");
        std::process::exit(1);
    }
}
