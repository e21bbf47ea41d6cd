//! cassandra-recipe CLI - build and package the Cassandra C/C++ driver

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::EnvFilter;

mod cli;
mod commands;

use cli::{Cli, Commands};

fn main() {
    if let Err(e) = run() {
        eprintln!("error: {:#}", e);
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    // Parse CLI
    let cli = Cli::parse();

    // Set up logging
    let filter = if cli.verbose {
        EnvFilter::new("cassandra_recipe=debug")
    } else {
        EnvFilter::new("cassandra_recipe=info")
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .without_time()
        .init();

    let config = commands::load_config(cli.config.as_deref())?;

    // Execute command
    match cli.command {
        Commands::Info(args) => commands::info::execute(args, &config),
        Commands::Plan(args) => commands::plan::execute(args, &config),
        Commands::Source(args) => commands::source::execute(args, &config),
        Commands::Build(args) => commands::build::execute(args, &config),
        Commands::Completions(args) => commands::completions::execute(args),
    }
}
