//! cmake-tasks CLI - configure and build CMake projects from declarative settings

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
        EnvFilter::new("cmake_tasks=debug")
    } else {
        EnvFilter::new("cmake_tasks=info")
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .without_time()
        .with_writer(std::io::stderr)
        .init();

    let manifest_path = cli.manifest_path.as_deref();

    // Execute command
    match cli.command {
        Commands::Configure(args) => commands::configure::execute(args, manifest_path),
        Commands::Build(args) => commands::build::execute(args, manifest_path),
        Commands::Run(args) => commands::run::execute(args, manifest_path),
        Commands::Tasks => commands::tasks::execute(manifest_path),
        Commands::Doctor => commands::doctor::execute(cli.verbose, manifest_path),
        Commands::Completions(args) => commands::completions::execute(args),
    }
}
