//! The `assess` command: ingest, evaluate, report.

use crate::cli::AssessArgs;
use crate::config::AppConfig;
use crate::error::{CliError, Result};
use crate::loader;
use crate::output::Formatter;
use caelus_domain::traits::JudgmentProvider;
use caelus_engine::ComplianceEngine;
use caelus_llm::ollama::{OllamaEmbedder, OllamaJudge};
use caelus_matcher::SemanticMatcher;
use caelus_store::embedding::{EmbeddingModel, MockEmbeddingModel};
use std::sync::Arc;
use tracing::info;

/// Run a full compliance assessment.
///
/// The embedder and judgment capability are picked from the CLI flags:
/// without `--embed-model` a deterministic hash embedder is used, and
/// without `--judge-model` the engine runs in rule-only mode, returning
/// indeterminate verdicts for anything the rule evaluator cannot decide.
pub async fn execute_assess(
    args: AssessArgs,
    config: AppConfig,
    formatter: &Formatter,
) -> Result<()> {
    config.validate()?;

    match (&args.embed_model, &args.judge_model) {
        (Some(embed), Some(judge)) => {
            let ingest = OllamaEmbedder::new(&args.endpoint, embed, args.embed_dim);
            let query = OllamaEmbedder::new(&args.endpoint, embed, args.embed_dim);
            let judge = OllamaJudge::new(&args.endpoint, judge);
            run(&args, config, formatter, ingest, query, Some(judge)).await
        }
        (Some(embed), None) => {
            let ingest = OllamaEmbedder::new(&args.endpoint, embed, args.embed_dim);
            let query = OllamaEmbedder::new(&args.endpoint, embed, args.embed_dim);
            run(&args, config, formatter, ingest, query, None::<OllamaJudge>).await
        }
        (None, Some(judge)) => {
            let ingest = MockEmbeddingModel::new(args.embed_dim);
            let query = MockEmbeddingModel::new(args.embed_dim);
            let judge = OllamaJudge::new(&args.endpoint, judge);
            run(&args, config, formatter, ingest, query, Some(judge)).await
        }
        (None, None) => {
            let ingest = MockEmbeddingModel::new(args.embed_dim);
            let query = MockEmbeddingModel::new(args.embed_dim);
            run(&args, config, formatter, ingest, query, None::<OllamaJudge>).await
        }
    }
}

async fn run<E, J>(
    args: &AssessArgs,
    config: AppConfig,
    formatter: &Formatter,
    ingest: E,
    query: E,
    judge: Option<J>,
) -> Result<()>
where
    E: EmbeddingModel + Send + Sync + 'static,
    J: JudgmentProvider + Send + Sync + 'static,
    J::Error: std::fmt::Display,
{
    let graph = loader::load_graph(&args.requirements, args.edges.as_deref())?;
    let index = loader::load_index_blocking(args.evidence.clone(), ingest).await?;

    let engine = match judge {
        Some(judge) => {
            let matcher = SemanticMatcher::new(query, judge, config.matcher);
            ComplianceEngine::new(matcher, config.engine)
        }
        None => {
            info!("No judgment capability configured; running rule-only");
            ComplianceEngine::<E, J>::rule_only(config.engine)
        }
    };

    let (assessment, metrics) = engine
        .assess(&graph, Arc::new(index))
        .await
        .map_err(|e| CliError::Engine(e.to_string()))?;

    info!("{}", metrics.summary());
    println!("{}", formatter.format_assessment(&assessment)?);
    Ok(())
}
