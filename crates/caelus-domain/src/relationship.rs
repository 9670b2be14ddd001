//! Relationship module - typed edges between requirements

use super::RequirementId;

/// Kind of relationship between two requirements.
///
/// This is the minimal set needed for defensible compliance semantics.
/// Additional kinds are an extension point, not a missing feature.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EdgeKind {
    /// The source requirement replaces the target (newer revision).
    /// Incoming supersession is unique per requirement, so these edges
    /// form a forest.
    Supersedes,

    /// The source requirement cannot be fully satisfied unless the target
    /// is satisfied. The depends_on subgraph must stay acyclic.
    DependsOn,

    /// The source requirement textually references the target.
    CrossReferences,

    /// The two requirements are mutually exclusive by construction.
    ConflictsWith,
}

impl EdgeKind {
    /// Stable string form used in logs and serialized records.
    pub fn as_str(&self) -> &'static str {
        match self {
            EdgeKind::Supersedes => "supersedes",
            EdgeKind::DependsOn => "depends_on",
            EdgeKind::CrossReferences => "cross_references",
            EdgeKind::ConflictsWith => "conflicts_with",
        }
    }

    /// Parse from the stable string form.
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "supersedes" => Some(EdgeKind::Supersedes),
            "depends_on" => Some(EdgeKind::DependsOn),
            "cross_references" => Some(EdgeKind::CrossReferences),
            "conflicts_with" => Some(EdgeKind::ConflictsWith),
            _ => None,
        }
    }
}

/// A directed, typed edge between two requirements.
///
/// Edges are created during ingestion or the graph-construction pass and
/// are read-only during assessment.
#[derive(Debug, Clone, PartialEq)]
pub struct Edge {
    /// Source requirement id.
    pub from: RequirementId,

    /// Target requirement id.
    pub to: RequirementId,

    /// Kind of relationship.
    pub kind: EdgeKind,
}

impl Edge {
    /// Create a new edge.
    pub fn new(from: RequirementId, to: RequirementId, kind: EdgeKind) -> Self {
        Self { from, to, kind }
    }
}
