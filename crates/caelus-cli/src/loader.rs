//! Ingestion: read record files and build the in-memory stores.

use crate::error::{CliError, Result};
use crate::records::{EdgeRecord, EvidenceRecord, RequirementRecord};
use caelus_domain::EvidenceItem;
use caelus_store::embedding::EmbeddingModel;
use caelus_store::{EvidenceIndex, RequirementGraph};
use std::path::{Path, PathBuf};
use tracing::info;

/// Load requirement and edge records and build a validated graph.
///
/// Graph-construction errors are fatal: an assessment must not proceed on
/// a malformed graph.
pub fn load_graph(requirements_path: &Path, edges_path: Option<&Path>) -> Result<RequirementGraph> {
    let contents = std::fs::read_to_string(requirements_path)?;
    let records: Vec<RequirementRecord> = serde_json::from_str(&contents)?;

    let mut graph = RequirementGraph::new();
    for record in records {
        let requirement = record.into_domain()?;
        graph
            .add_requirement(requirement)
            .map_err(|e| CliError::Graph(e.to_string()))?;
    }

    if let Some(path) = edges_path {
        let contents = std::fs::read_to_string(path)?;
        let records: Vec<EdgeRecord> = serde_json::from_str(&contents)?;
        for record in records {
            let (kind, from, to) = record.into_domain()?;
            graph
                .add_edge(kind, from, to)
                .map_err(|e| CliError::Graph(e.to_string()))?;
        }
    }

    info!(requirements = graph.len(), "Requirement graph loaded");
    Ok(graph)
}

/// Load evidence records, embed their statements, and build the index,
/// off the async runtime.
///
/// Embedding models may drive their own runtime for blocking network I/O,
/// so the whole ingestion pass runs under `spawn_blocking`; calling
/// [`load_index`] directly from an async context would abort.
pub async fn load_index_blocking<E>(
    evidence_path: PathBuf,
    embedder: E,
) -> Result<EvidenceIndex>
where
    E: EmbeddingModel + Send + 'static,
{
    tokio::task::spawn_blocking(move || load_index(&evidence_path, &embedder))
        .await
        .map_err(|e| CliError::Embedding(format!("Task join error: {}", e)))?
}

/// Load evidence records, embed their statements, and build the index.
pub fn load_index<E: EmbeddingModel>(
    evidence_path: &Path,
    embedder: &E,
) -> Result<EvidenceIndex> {
    let contents = std::fs::read_to_string(evidence_path)?;
    let records: Vec<EvidenceRecord> = serde_json::from_str(&contents)?;

    let mut index = EvidenceIndex::new(embedder.dimension());
    for record in records {
        let (id, citation, statement, numeric) = record.into_parts();
        let vector = embedder
            .embed(&statement)
            .map_err(|e| CliError::Embedding(e.to_string()))?;
        index
            .index(EvidenceItem::new(id, citation, statement, numeric, vector))
            .map_err(|e| CliError::Index(e.to_string()))?;
    }

    info!(items = index.items().len(), "Evidence index built");
    Ok(index)
}

#[cfg(test)]
mod tests {
    use super::*;
    use caelus_store::embedding::MockEmbeddingModel;
    use std::io::Write;

    fn write_file(dir: &tempfile::TempDir, name: &str, contents: &str) -> std::path::PathBuf {
        let path = dir.path().join(name);
        let mut file = std::fs::File::create(&path).unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        path
    }

    #[test]
    fn test_load_graph_with_edges() {
        let dir = tempfile::tempdir().unwrap();
        let reqs = write_file(
            &dir,
            "reqs.json",
            r#"[
                {"id": "REG-1", "citation": "Reg. §1", "statement": "old rule", "category": "seismic"},
                {"id": "REG-2", "citation": "Reg. §2", "statement": "new rule", "category": "seismic"}
            ]"#,
        );
        let edges = write_file(
            &dir,
            "edges.json",
            r#"[{"from": "REG-2", "to": "REG-1", "kind": "supersedes"}]"#,
        );

        let graph = load_graph(&reqs, Some(&edges)).unwrap();
        assert_eq!(graph.len(), 2);
        assert_eq!(graph.active_requirements().count(), 1);
    }

    #[test]
    fn test_load_graph_rejects_cycle() {
        let dir = tempfile::tempdir().unwrap();
        let reqs = write_file(
            &dir,
            "reqs.json",
            r#"[
                {"id": "REG-1", "citation": "Reg. §1", "statement": "a", "category": "seismic"},
                {"id": "REG-2", "citation": "Reg. §2", "statement": "b", "category": "seismic"}
            ]"#,
        );
        let edges = write_file(
            &dir,
            "edges.json",
            r#"[
                {"from": "REG-1", "to": "REG-2", "kind": "depends_on"},
                {"from": "REG-2", "to": "REG-1", "kind": "depends_on"}
            ]"#,
        );

        let result = load_graph(&reqs, Some(&edges));
        assert!(matches!(result, Err(CliError::Graph(_))));
    }

    /// Blocks on its own runtime inside `embed`, the way network-backed
    /// embedding models do.
    struct RuntimeBoundEmbedder {
        dimension: usize,
    }

    impl EmbeddingModel for RuntimeBoundEmbedder {
        fn embed(
            &self,
            _text: &str,
        ) -> std::result::Result<Vec<f32>, caelus_store::embedding::EmbeddingError> {
            let runtime = tokio::runtime::Runtime::new().map_err(|e| {
                caelus_store::embedding::EmbeddingError::ServiceFailed(e.to_string())
            })?;
            runtime.block_on(async { Ok(vec![0.0; self.dimension]) })
        }

        fn dimension(&self) -> usize {
            self.dimension
        }
    }

    #[tokio::test]
    async fn test_index_loading_tolerates_runtime_bound_embedders() {
        let dir = tempfile::tempdir().unwrap();
        let evidence = write_file(
            &dir,
            "evidence.json",
            r#"[
                {"id": "DS-1", "citation": "Spec §2", "statement": "Wall thickness: 1.35 m"}
            ]"#,
        );

        // Must not abort even though embed blocks on a nested runtime
        let index = load_index_blocking(evidence, RuntimeBoundEmbedder { dimension: 8 })
            .await
            .unwrap();

        assert_eq!(index.items().len(), 1);
    }

    #[test]
    fn test_load_index_embeds_statements() {
        let dir = tempfile::tempdir().unwrap();
        let evidence = write_file(
            &dir,
            "evidence.json",
            r#"[
                {"id": "DS-1", "citation": "Spec §2", "statement": "Wall thickness: 1.35 m",
                 "numeric": {"value": 1.35, "unit": "m"}}
            ]"#,
        );

        let embedder = MockEmbeddingModel::new(32);
        let index = load_index(&evidence, &embedder).unwrap();

        assert_eq!(index.items().len(), 1);
        assert_eq!(index.items()[0].vector.len(), 32);
    }
}
