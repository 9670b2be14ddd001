//! CLI command definitions and argument parsing.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// CAELUS CLI - assess design specifications against regulatory requirements.
#[derive(Debug, Parser)]
#[command(name = "caelus")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Output format
    #[arg(short, long, value_enum, global = true, default_value = "table")]
    pub format: CliFormat,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Configuration file path (TOML with [matcher] and [engine] sections)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

/// Output format options.
#[derive(Debug, Clone, Copy, clap::ValueEnum)]
pub enum CliFormat {
    /// Table format (default)
    Table,
    /// JSON format
    Json,
    /// Quiet format (requirement id and outcome only)
    Quiet,
}

/// CLI commands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Run a compliance assessment
    Assess(AssessArgs),

    /// Validate requirement and edge records without assessing
    CheckGraph(CheckGraphArgs),
}

/// Arguments for the assess command.
#[derive(Debug, Parser)]
pub struct AssessArgs {
    /// Path to requirement records (JSON array)
    #[arg(long)]
    pub requirements: PathBuf,

    /// Path to evidence records (JSON array)
    #[arg(long)]
    pub evidence: PathBuf,

    /// Path to relationship edge records (JSON array)
    #[arg(long)]
    pub edges: Option<PathBuf>,

    /// Ollama model to use as the judgment capability.
    /// Omit to run rule-only: quantitative clauses are still decided,
    /// everything else is recorded indeterminate.
    #[arg(long)]
    pub judge_model: Option<String>,

    /// Ollama model to embed statements with. Omit for the offline
    /// deterministic hash embedder.
    #[arg(long)]
    pub embed_model: Option<String>,

    /// Ollama API endpoint
    #[arg(long, default_value = "http://localhost:11434", env = "CAELUS_OLLAMA")]
    pub endpoint: String,

    /// Embedding vector dimension
    #[arg(long, default_value_t = 64)]
    pub embed_dim: usize,
}

/// Arguments for the check-graph command.
#[derive(Debug, Parser)]
pub struct CheckGraphArgs {
    /// Path to requirement records (JSON array)
    #[arg(long)]
    pub requirements: PathBuf,

    /// Path to relationship edge records (JSON array)
    #[arg(long)]
    pub edges: Option<PathBuf>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_assess_args_parse() {
        let cli = Cli::parse_from([
            "caelus",
            "assess",
            "--requirements",
            "reqs.json",
            "--evidence",
            "evidence.json",
        ]);
        match cli.command {
            Command::Assess(args) => {
                assert_eq!(args.requirements, PathBuf::from("reqs.json"));
                assert!(args.judge_model.is_none());
                assert_eq!(args.embed_dim, 64);
            }
            _ => panic!("expected assess command"),
        }
    }

    #[test]
    fn test_check_graph_args_parse() {
        let cli = Cli::parse_from([
            "caelus",
            "--format",
            "json",
            "check-graph",
            "--requirements",
            "reqs.json",
            "--edges",
            "edges.json",
        ]);
        assert!(matches!(cli.format, CliFormat::Json));
        assert!(matches!(cli.command, Command::CheckGraph(_)));
    }
}
