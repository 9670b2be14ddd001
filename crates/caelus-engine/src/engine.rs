//! Core Compliance Aggregator implementation

use crate::config::EngineConfig;
use crate::error::EngineError;
use crate::metrics::AssessmentMetrics;
use caelus_domain::traits::JudgmentProvider;
use caelus_domain::{
    ClauseKind, ComplianceAssessment, ConflictWarning, EdgeKind, Method, Outcome, Requirement,
    RequirementId, RunId, Verdict,
};
use caelus_matcher::SemanticMatcher;
use caelus_rules::{evaluate, RuleError, RuleOutcome};
use caelus_store::embedding::EmbeddingModel;
use caelus_store::{EvidenceIndex, RequirementGraph};
use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use tracing::{debug, info, warn};

/// Per-task bookkeeping folded into run metrics
#[derive(Debug, Default)]
struct TaskStats {
    retries: usize,
    failed: bool,
}

/// The Compliance Aggregator orchestrates a full assessment run.
///
/// Each active requirement is dispatched to the deterministic rule path
/// first; requirements the rules cannot decide fall through to the
/// Semantic Matcher. A failing judgment call is retried with exponential
/// backoff and, if it stays down, recorded as an indeterminate verdict
/// rather than failing the run.
pub struct ComplianceEngine<E, J>
where
    E: EmbeddingModel,
    J: JudgmentProvider,
{
    matcher: Option<Arc<SemanticMatcher<E, J>>>,
    config: EngineConfig,
}

impl<E, J> ComplianceEngine<E, J>
where
    E: EmbeddingModel + Send + Sync + 'static,
    J: JudgmentProvider + Send + Sync + 'static,
    J::Error: std::fmt::Display,
{
    /// Create an engine with a semantic matcher for non-rule requirements
    pub fn new(matcher: SemanticMatcher<E, J>, config: EngineConfig) -> Self {
        Self {
            matcher: Some(Arc::new(matcher)),
            config,
        }
    }

    /// Create an engine without a judgment capability.
    ///
    /// Quantitative clauses are still evaluated by rules; everything else
    /// is recorded indeterminate.
    pub fn rule_only(config: EngineConfig) -> Self {
        Self {
            matcher: None,
            config,
        }
    }

    /// The active configuration
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Run one full assessment over the active requirements.
    ///
    /// Superseded requirements are skipped. Judgment calls run under a
    /// concurrency bound; verdicts are collected keyed by requirement id
    /// so output order is stable across runs.
    pub async fn assess(
        &self,
        graph: &RequirementGraph,
        index: Arc<EvidenceIndex>,
    ) -> Result<(ComplianceAssessment, AssessmentMetrics), EngineError> {
        let start = Instant::now();

        self.config
            .validate()
            .map_err(EngineError::Config)?;

        let active: Vec<Requirement> = graph.active_requirements().cloned().collect();

        info!(
            requirements = active.len(),
            evidence = index.items().len(),
            "Starting assessment run"
        );

        // An empty index would raise EmptyIndex on every retrieval; record
        // the evidence gap as indeterminate verdicts instead of failing or
        // pointlessly retrying
        if index.items().is_empty() {
            warn!("Evidence index is empty; every requirement is indeterminate");
            let mut metrics = AssessmentMetrics::new();
            let verdicts: BTreeMap<RequirementId, Verdict> = active
                .iter()
                .map(|r| {
                    metrics.record_verdict(Method::Rule);
                    (
                        r.id.clone(),
                        Verdict::indeterminate(
                            r.id.clone(),
                            "Evidence index is empty; no evidence available to assess against",
                            Method::Rule,
                        ),
                    )
                })
                .collect();
            metrics.runtime_ms = start.elapsed().as_millis() as u64;
            let assessment = ComplianceAssessment {
                run_id: RunId::new(),
                verdicts: verdicts.into_values().collect(),
                category_scores: BTreeMap::new(),
                overall_score: None,
                warnings: Vec::new(),
            };
            return Ok((assessment, metrics));
        }

        let semaphore = Arc::new(Semaphore::new(self.config.max_concurrency));
        let mut join_set: JoinSet<(RequirementId, Verdict, TaskStats)> = JoinSet::new();
        let mut task_owners: HashMap<tokio::task::Id, RequirementId> = HashMap::new();

        for requirement in active {
            let owner = requirement.id.clone();
            let matcher = self.matcher.clone();
            let index = Arc::clone(&index);
            let semaphore = Arc::clone(&semaphore);
            let config = self.config.clone();

            let handle = join_set.spawn(async move {
                let _permit = semaphore
                    .acquire_owned()
                    .await
                    .expect("semaphore never closed during a run");

                let id = requirement.id.clone();
                let (verdict, stats) = assess_one(&requirement, &index, matcher, &config).await;
                (id, verdict, stats)
            });
            task_owners.insert(handle.id(), owner);
        }

        let mut metrics = AssessmentMetrics::new();
        let mut verdicts: BTreeMap<RequirementId, Verdict> = BTreeMap::new();

        while let Some(joined) = join_set.join_next_with_id().await {
            match joined {
                Ok((_, (id, verdict, stats))) => {
                    metrics.judgment_retries += stats.retries;
                    if stats.failed {
                        metrics.record_judgment_failure();
                    }
                    metrics.record_verdict(verdict.method);
                    verdicts.insert(id, verdict);
                }
                // A panicked or cancelled task costs its own verdict, not
                // the run
                Err(e) => {
                    let Some(id) = task_owners.get(&e.id()).cloned() else {
                        return Err(EngineError::Worker(e.to_string()));
                    };
                    warn!(requirement = %id, error = %e, "Assessment task did not complete");
                    let verdict = Verdict::indeterminate(
                        id.clone(),
                        format!("Assessment task did not complete: {}", e),
                        Method::Hybrid,
                    );
                    metrics.record_verdict(verdict.method);
                    verdicts.insert(id, verdict);
                }
            }
        }

        let warnings = self.adjust(graph, &mut verdicts, &mut metrics);
        let category_scores = category_scores(graph, &verdicts);
        let overall_score = overall_score(&category_scores, &self.config);

        metrics.runtime_ms = start.elapsed().as_millis() as u64;
        info!("Assessment complete: {}", metrics.summary());

        let assessment = ComplianceAssessment {
            run_id: RunId::new(),
            verdicts: verdicts.into_values().collect(),
            category_scores,
            overall_score,
            warnings,
        };

        Ok((assessment, metrics))
    }

    /// Graph-aware adjustment pass: conflict warnings over the verdicts
    /// as independently computed, then dependency downgrades.
    fn adjust(
        &self,
        graph: &RequirementGraph,
        verdicts: &mut BTreeMap<RequirementId, Verdict>,
        metrics: &mut AssessmentMetrics,
    ) -> Vec<ConflictWarning> {
        // A compliant dependent of a non-compliant prerequisite is capped
        // at partially compliant. Nothing is ever upgraded, and dependents
        // already at or below the cap are left alone.
        let downgrades: Vec<(RequirementId, RequirementId)> = graph
            .edges_of_kind(EdgeKind::DependsOn)
            .filter(|edge| {
                let parent_failed = verdicts
                    .get(&edge.to)
                    .is_some_and(|v| v.outcome == Outcome::NonCompliant);
                let dependent_compliant = verdicts
                    .get(&edge.from)
                    .is_some_and(|v| v.outcome == Outcome::Compliant);
                parent_failed && dependent_compliant
            })
            .map(|edge| (edge.from.clone(), edge.to.clone()))
            .collect();

        // Conflicts are judged on the independently computed verdicts; a
        // downgrade must not hide that both sides were individually met
        let mut warnings = Vec::new();
        for edge in graph.edges_of_kind(EdgeKind::ConflictsWith) {
            let both_compliant = [&edge.from, &edge.to].iter().all(|id| {
                verdicts
                    .get(id)
                    .is_some_and(|v| v.outcome == Outcome::Compliant)
            });
            if both_compliant {
                warnings.push(ConflictWarning {
                    first: edge.from.clone(),
                    second: edge.to.clone(),
                    note: format!(
                        "{} and {} are both compliant but marked as conflicting; review the requirement graph",
                        edge.from, edge.to
                    ),
                });
            }
        }
        metrics.conflict_warnings = warnings.len();

        for (dependent, parent) in downgrades {
            if let Some(verdict) = verdicts.get_mut(&dependent) {
                debug!(%dependent, %parent, "Dependency downgrade");
                verdict.outcome = Outcome::PartiallyCompliant;
                verdict.rationale.push_str(&format!(
                    " Downgraded to partially compliant: prerequisite {} is non-compliant.",
                    parent
                ));
                metrics.dependency_downgrades += 1;
            }
        }

        warnings
    }
}

/// Decide one requirement: rules first, semantic fallback.
async fn assess_one<E, J>(
    requirement: &Requirement,
    index: &EvidenceIndex,
    matcher: Option<Arc<SemanticMatcher<E, J>>>,
    config: &EngineConfig,
) -> (Verdict, TaskStats)
where
    E: EmbeddingModel + Send + Sync + 'static,
    J: JudgmentProvider + Send + Sync + 'static,
    J::Error: std::fmt::Display,
{
    if requirement.clause.is_quantitative() {
        match evaluate(requirement, index.items()) {
            Ok(RuleOutcome::Compliant(m)) => {
                let verdict = Verdict::new(
                    requirement.id.clone(),
                    Outcome::Compliant,
                    1.0,
                    vec![m.evidence_id],
                    format!(
                        "Measured {} {} satisfies the required threshold ({})",
                        m.value, m.unit, requirement.citation
                    ),
                    Method::Rule,
                );
                return (verdict, TaskStats::default());
            }
            Ok(RuleOutcome::NonCompliant(m)) => {
                let verdict = Verdict::new(
                    requirement.id.clone(),
                    Outcome::NonCompliant,
                    1.0,
                    vec![m.evidence_id],
                    format!(
                        "Measured {} {} violates the required threshold ({})",
                        m.value, m.unit, requirement.citation
                    ),
                    Method::Rule,
                );
                return (verdict, TaskStats::default());
            }
            Ok(RuleOutcome::Indeterminate) => {
                debug!(requirement = %requirement.id, "No numeric evidence; semantic fallback");
                return semantic_verdict(requirement, index, matcher, config, Method::Hybrid)
                    .await;
            }
            Err(e @ RuleError::UnitMismatch { .. }) => {
                // Numeric evidence exists but in an unrelated unit family;
                // that is an evidence-quality gap, not a rule decision
                warn!(requirement = %requirement.id, error = %e, "Unit mismatch");
                let verdict = Verdict::indeterminate(
                    requirement.id.clone(),
                    format!("Numeric evidence could not be compared: {}", e),
                    Method::Rule,
                );
                return (verdict, TaskStats::default());
            }
            Err(RuleError::NotQuantitative(_)) => {
                // Unreachable: guarded by is_quantitative above
            }
        }
    }

    semantic_verdict(requirement, index, matcher, config, Method::Semantic).await
}

/// Run the semantic path with retry and backoff, degrading to an
/// indeterminate verdict when the judgment capability stays unavailable.
async fn semantic_verdict<E, J>(
    requirement: &Requirement,
    index: &EvidenceIndex,
    matcher: Option<Arc<SemanticMatcher<E, J>>>,
    config: &EngineConfig,
    method: Method,
) -> (Verdict, TaskStats)
where
    E: EmbeddingModel + Send + Sync + 'static,
    J: JudgmentProvider + Send + Sync + 'static,
    J::Error: std::fmt::Display,
{
    let mut stats = TaskStats::default();

    let Some(matcher) = matcher else {
        let verdict = Verdict::indeterminate(
            requirement.id.clone(),
            "No judgment capability is configured and rules could not decide this requirement",
            method,
        );
        return (verdict, stats);
    };

    let mut attempt = 0;
    loop {
        match matcher.match_requirement(requirement, index).await {
            Ok(mut verdict) => {
                verdict.method = method;
                return (verdict, stats);
            }
            Err(e) if attempt < config.max_retries => {
                warn!(
                    requirement = %requirement.id,
                    attempt,
                    error = %e,
                    "Judgment call failed; retrying"
                );
                stats.retries += 1;
                tokio::time::sleep(config.backoff_delay(attempt)).await;
                attempt += 1;
            }
            Err(e) => {
                warn!(
                    requirement = %requirement.id,
                    error = %e,
                    "Judgment capability unavailable; recording indeterminate"
                );
                stats.failed = true;
                let verdict = Verdict::indeterminate(
                    requirement.id.clone(),
                    format!(
                        "Judgment capability unavailable after {} attempts: {}",
                        attempt + 1,
                        e
                    ),
                    method,
                );
                return (verdict, stats);
            }
        }
    }
}

/// Mean verdict weight per category, with indeterminate verdicts excluded
/// from the denominator. Categories whose verdicts are all indeterminate
/// carry no score.
fn category_scores(
    graph: &RequirementGraph,
    verdicts: &BTreeMap<RequirementId, Verdict>,
) -> BTreeMap<String, f64> {
    let mut sums: BTreeMap<String, (f64, usize)> = BTreeMap::new();

    for verdict in verdicts.values() {
        let Some(requirement) = graph.get(&verdict.requirement_id) else {
            continue;
        };
        if let Some(weight) = verdict.outcome.weight() {
            let entry = sums.entry(requirement.category.clone()).or_insert((0.0, 0));
            entry.0 += weight;
            entry.1 += 1;
        }
    }

    sums.into_iter()
        .map(|(category, (sum, count))| (category, sum / count as f64))
        .collect()
}

/// Weighted mean of category scores; `None` when nothing scored.
fn overall_score(scores: &BTreeMap<String, f64>, config: &EngineConfig) -> Option<f64> {
    if scores.is_empty() {
        return None;
    }

    let mut weighted_sum = 0.0;
    let mut weight_total = 0.0;
    for (category, score) in scores {
        let weight = config
            .category_weights
            .get(category)
            .copied()
            .unwrap_or(1.0);
        weighted_sum += score * weight;
        weight_total += weight;
    }

    Some(weighted_sum / weight_total)
}
