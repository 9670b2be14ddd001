//! Core Semantic Matcher implementation

use crate::config::MatcherConfig;
use crate::error::MatcherError;
use crate::parser::parse_judgment;
use crate::prompt::PromptBuilder;
use caelus_domain::traits::JudgmentProvider;
use caelus_domain::{EvidenceId, Method, Requirement, Verdict};
use caelus_store::embedding::EmbeddingModel;
use caelus_store::index::IndexError;
use caelus_store::EvidenceIndex;
use std::sync::Arc;
use tokio::time::timeout;
use tracing::{debug, info, warn};

/// The Semantic Matcher decides requirements that rules cannot.
///
/// It embeds the requirement statement, retrieves the nearest evidence,
/// and asks the external judgment capability to decide, with the final
/// confidence capped by retrieval similarity so a fluent but poorly
/// grounded judgment cannot look certain.
pub struct SemanticMatcher<E, J>
where
    E: EmbeddingModel,
    J: JudgmentProvider,
{
    embedder: Arc<E>,
    judge: Arc<J>,
    config: MatcherConfig,
}

impl<E, J> SemanticMatcher<E, J>
where
    E: EmbeddingModel + Send + Sync + 'static,
    J: JudgmentProvider + Send + Sync + 'static,
    J::Error: std::fmt::Display,
{
    /// Create a new matcher
    pub fn new(embedder: E, judge: J, config: MatcherConfig) -> Self {
        Self {
            embedder: Arc::new(embedder),
            judge: Arc::new(judge),
            config,
        }
    }

    /// The active configuration
    pub fn config(&self) -> &MatcherConfig {
        &self.config
    }

    /// Assess one requirement against the evidence index.
    ///
    /// Returns an indeterminate verdict with confidence 0 when no retrieved
    /// evidence clears the similarity floor; the judgment capability is not
    /// consulted in that case. An empty index is an error, never a silent
    /// empty retrieval.
    pub async fn match_requirement(
        &self,
        requirement: &Requirement,
        index: &EvidenceIndex,
    ) -> Result<Verdict, MatcherError> {
        let query = self.embed_requirement(&requirement.statement).await?;

        let retrieved = index
            .nearest(&query, self.config.top_k)
            .map_err(|e| match e {
                IndexError::EmptyIndex => {
                    MatcherError::Retrieval("Evidence index is empty".to_string())
                }
                other => MatcherError::Retrieval(other.to_string()),
            })?;

        let above_floor: Vec<(EvidenceId, f32)> = retrieved
            .into_iter()
            .filter(|(_, sim)| *sim >= self.config.similarity_floor)
            .collect();

        if above_floor.is_empty() {
            info!(
                requirement = %requirement.id,
                floor = self.config.similarity_floor,
                "No evidence above similarity floor"
            );
            return Ok(Verdict::indeterminate(
                requirement.id.clone(),
                format!(
                    "No evidence with similarity >= {:.2} was found for this requirement",
                    self.config.similarity_floor
                ),
                Method::Semantic,
            ));
        }

        let best_similarity = above_floor[0].1;
        debug!(
            requirement = %requirement.id,
            candidates = above_floor.len(),
            best_similarity,
            "Dispatching judgment call"
        );

        let evidence_context: Vec<(String, String, f32)> = above_floor
            .iter()
            .map(|(id, sim)| {
                let statement = index
                    .get(id)
                    .map(|item| item.statement.clone())
                    .unwrap_or_default();
                (id.to_string(), statement, *sim)
            })
            .collect();

        let builder = PromptBuilder::new(requirement).with_evidence(evidence_context);
        let requirement_block = builder.build_requirement_block();
        let evidence_texts = builder.build_evidence_texts();

        let raw = timeout(
            self.config.judgment_timeout(),
            self.call_judge(requirement_block, evidence_texts),
        )
        .await
        .map_err(|_| MatcherError::Timeout)??;

        let response = parse_judgment(&raw)?;

        // The capability's own confidence is advisory; similarity caps it
        let similarity_cap = best_similarity as f64 * self.config.trust_factor;
        let confidence = response
            .confidence
            .unwrap_or(1.0)
            .min(similarity_cap)
            .clamp(0.0, 1.0);

        if response.confidence.is_some_and(|c| c > similarity_cap) {
            warn!(
                requirement = %requirement.id,
                advisory = response.confidence,
                cap = similarity_cap,
                "Judgment confidence capped by retrieval similarity"
            );
        }

        let evidence_ids = above_floor.into_iter().map(|(id, _)| id).collect();

        Ok(Verdict::new(
            requirement.id.clone(),
            response.outcome,
            confidence,
            evidence_ids,
            response.rationale,
            Method::Semantic,
        ))
    }

    async fn embed_requirement(&self, statement: &str) -> Result<Vec<f32>, MatcherError> {
        let embedder = Arc::clone(&self.embedder);
        let statement = statement.to_string();

        // Embedding models may do blocking network I/O
        tokio::task::spawn_blocking(move || {
            embedder
                .embed(&statement)
                .map_err(|e| MatcherError::Embedding(e.to_string()))
        })
        .await
        .map_err(|e| MatcherError::Embedding(format!("Task join error: {}", e)))?
    }

    async fn call_judge(
        &self,
        requirement_block: String,
        evidence_texts: Vec<String>,
    ) -> Result<String, MatcherError> {
        let judge = Arc::clone(&self.judge);

        // Providers are sync; run them off the async worker threads
        tokio::task::spawn_blocking(move || {
            judge
                .judge(&requirement_block, &evidence_texts)
                .map_err(|e| MatcherError::Judgment(e.to_string()))
        })
        .await
        .map_err(|e| MatcherError::Judgment(format!("Task join error: {}", e)))?
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use caelus_domain::{ClauseKind, EvidenceItem, Outcome, RequirementId};
    use caelus_llm::MockJudge;
    use caelus_store::embedding::MockEmbeddingModel;

    const DIM: usize = 64;

    fn requirement(id: &str, statement: &str) -> Requirement {
        Requirement::new(
            RequirementId::new(id),
            format!("Reg. {}", id),
            statement,
            ClauseKind::Qualitative,
            "operations",
        )
    }

    fn index_with(embedder: &MockEmbeddingModel, items: &[(&str, &str)]) -> EvidenceIndex {
        let mut index = EvidenceIndex::new(DIM);
        for (id, statement) in items {
            let vector = embedder.embed(statement).unwrap();
            index
                .index(EvidenceItem::new(
                    EvidenceId::new(*id),
                    "Design Spec",
                    *statement,
                    None,
                    vector,
                ))
                .unwrap();
        }
        index
    }

    #[tokio::test]
    async fn test_judgment_outcome_carried_into_verdict() {
        let embedder = MockEmbeddingModel::new(DIM);
        let index = index_with(
            &embedder,
            &[("DS-1", "Operators complete annual simulator training")],
        );

        let req = requirement("REG-7", "Operators complete annual simulator training");
        let mut judge = MockJudge::default();
        judge.add_response(
            "Operators complete annual simulator training",
            r#"{"outcome": "compliant", "rationale": "training documented in [DS-1]", "confidence": 0.95}"#,
        );

        let matcher = SemanticMatcher::new(MockEmbeddingModel::new(DIM), judge, MatcherConfig::default());
        let verdict = matcher.match_requirement(&req, &index).await.unwrap();

        assert_eq!(verdict.outcome, Outcome::Compliant);
        assert_eq!(verdict.method, Method::Semantic);
        assert!(verdict.rationale.contains("DS-1"));
        assert_eq!(verdict.evidence_ids[0].as_str(), "DS-1");
    }

    #[tokio::test]
    async fn test_confidence_capped_by_similarity() {
        let embedder = MockEmbeddingModel::new(DIM);
        let index = index_with(
            &embedder,
            &[("DS-1", "Operators complete annual simulator training")],
        );

        // Identical text embeds identically, so best similarity is 1.0 and
        // the cap is exactly the trust factor
        let req = requirement("REG-7", "Operators complete annual simulator training");
        let judge = MockJudge::new(
            r#"{"outcome": "compliant", "rationale": "clear match", "confidence": 1.0}"#,
        );

        let config = MatcherConfig::default();
        let trust_factor = config.trust_factor;
        let matcher = SemanticMatcher::new(MockEmbeddingModel::new(DIM), judge, config);
        let verdict = matcher.match_requirement(&req, &index).await.unwrap();

        assert!(verdict.confidence <= trust_factor + 1e-6);
    }

    #[tokio::test]
    async fn test_below_floor_short_circuits_without_judge_call() {
        let embedder = MockEmbeddingModel::new(DIM);
        let index = index_with(&embedder, &[("DS-1", "completely unrelated piping detail")]);

        let req = requirement("REG-7", "Operators complete annual simulator training");
        let judge = MockJudge::new(r#"{"outcome": "compliant", "rationale": "should not be used"}"#);
        let judge_handle = judge.clone();

        let mut config = MatcherConfig::default();
        config.similarity_floor = 0.99;
        let matcher = SemanticMatcher::new(MockEmbeddingModel::new(DIM), judge, config);

        let verdict = matcher.match_requirement(&req, &index).await.unwrap();

        assert_eq!(verdict.outcome, Outcome::Indeterminate);
        assert_eq!(verdict.confidence, 0.0);
        assert!(verdict.evidence_ids.is_empty());
        assert_eq!(judge_handle.call_count(), 0);
    }

    #[tokio::test]
    async fn test_empty_index_is_an_error() {
        let index = EvidenceIndex::new(DIM);
        let req = requirement("REG-7", "Operators complete annual simulator training");
        let matcher = SemanticMatcher::new(
            MockEmbeddingModel::new(DIM),
            MockJudge::default(),
            MatcherConfig::default(),
        );

        let result = matcher.match_requirement(&req, &index).await;
        assert!(matches!(result, Err(MatcherError::Retrieval(_))));
    }

    #[tokio::test]
    async fn test_judge_failure_is_reported() {
        let embedder = MockEmbeddingModel::new(DIM);
        let index = index_with(
            &embedder,
            &[("DS-1", "Operators complete annual simulator training")],
        );

        let req = requirement("REG-7", "Operators complete annual simulator training");
        let mut judge = MockJudge::default();
        judge.add_error("Operators complete annual simulator training");

        let matcher = SemanticMatcher::new(MockEmbeddingModel::new(DIM), judge, MatcherConfig::default());
        let result = matcher.match_requirement(&req, &index).await;

        assert!(matches!(result, Err(MatcherError::Judgment(_))));
    }

    #[tokio::test]
    async fn test_garbled_judgment_is_invalid_format() {
        let embedder = MockEmbeddingModel::new(DIM);
        let index = index_with(
            &embedder,
            &[("DS-1", "Operators complete annual simulator training")],
        );

        let req = requirement("REG-7", "Operators complete annual simulator training");
        let judge = MockJudge::new("I think it is probably fine overall.");

        let matcher = SemanticMatcher::new(MockEmbeddingModel::new(DIM), judge, MatcherConfig::default());
        let result = matcher.match_requirement(&req, &index).await;

        assert!(matches!(result, Err(MatcherError::InvalidFormat(_))));
    }

    #[tokio::test]
    async fn test_missing_advisory_confidence_falls_back_to_cap() {
        let embedder = MockEmbeddingModel::new(DIM);
        let index = index_with(
            &embedder,
            &[("DS-1", "Operators complete annual simulator training")],
        );

        let req = requirement("REG-7", "Operators complete annual simulator training");
        let judge =
            MockJudge::new(r#"{"outcome": "compliant", "rationale": "documented in [DS-1]"}"#);

        let config = MatcherConfig::default();
        let trust_factor = config.trust_factor;
        let matcher = SemanticMatcher::new(MockEmbeddingModel::new(DIM), judge, config);
        let verdict = matcher.match_requirement(&req, &index).await.unwrap();

        // No advisory confidence: similarity cap alone decides
        assert!((verdict.confidence - trust_factor).abs() < 1e-6);
    }
}
