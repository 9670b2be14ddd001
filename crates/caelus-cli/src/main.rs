//! CAELUS CLI - assess design specifications against regulatory requirements.

use caelus_cli::{commands, AppConfig, Cli, Command, Formatter};
use clap::Parser;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    if let Err(e) = run().await {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

async fn run() -> caelus_cli::Result<()> {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => AppConfig::load(path)?,
        None => AppConfig::default(),
    };

    let formatter = Formatter::new(cli.format, !cli.no_color);

    match cli.command {
        Command::Assess(args) => commands::execute_assess(args, config, &formatter).await,
        Command::CheckGraph(args) => commands::execute_check_graph(args, &formatter),
    }
}
