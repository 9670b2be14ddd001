//! Requirement graph store
//!
//! Holds requirement nodes and typed relationship edges, and is the only
//! component allowed to mutate a requirement after creation: applying a
//! `supersedes` edge flips the target's status to `superseded`, atomically
//! with edge insertion.
//!
//! Construction-time structural errors are fatal to ingestion; assessment
//! never starts on a malformed graph.

use caelus_domain::{Edge, EdgeKind, Requirement, RequirementId, Status};
use std::collections::{HashMap, HashSet};
use thiserror::Error;

/// Errors raised during graph construction
#[derive(Error, Debug)]
pub enum GraphError {
    /// A requirement with this id already exists
    #[error("Duplicate requirement id: {0}")]
    DuplicateId(RequirementId),

    /// Adding this depends_on edge would create a cycle
    #[error("Adding depends_on edge {from} -> {to} would create a cycle")]
    Cycle {
        /// Source of the rejected edge
        from: RequirementId,
        /// Target of the rejected edge
        to: RequirementId,
    },

    /// The target requirement is already superseded by another
    #[error("Requirement {target} is already superseded by {existing}")]
    MultipleSupersession {
        /// Target of the rejected edge
        target: RequirementId,
        /// Source of the existing supersedes edge
        existing: RequirementId,
    },

    /// An edge references a requirement that was never added
    #[error("Unknown requirement id: {0}")]
    UnknownRequirement(RequirementId),
}

/// In-memory store of requirements and their relationship edges.
///
/// Requirements are kept in insertion order so [`active_requirements`]
/// is deterministic and downstream aggregation is reproducible.
///
/// [`active_requirements`]: RequirementGraph::active_requirements
///
/// # Examples
///
/// ```
/// use caelus_domain::{ClauseKind, EdgeKind, Requirement, RequirementId};
/// use caelus_store::RequirementGraph;
///
/// let mut graph = RequirementGraph::new();
/// graph.add_requirement(Requirement::new(
///     RequirementId::new("REG-1"),
///     "Reg. §1",
///     "Containment shall be seismically qualified.",
///     ClauseKind::Qualitative,
///     "seismic",
/// )).unwrap();
/// assert_eq!(graph.active_requirements().count(), 1);
/// ```
#[derive(Debug, Default)]
pub struct RequirementGraph {
    /// Requirements in insertion order
    requirements: Vec<Requirement>,

    /// Id -> position in `requirements`
    by_id: HashMap<RequirementId, usize>,

    /// All edges, in insertion order
    edges: Vec<Edge>,
}

impl RequirementGraph {
    /// Create an empty graph.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of requirements in the graph (any status).
    pub fn len(&self) -> usize {
        self.requirements.len()
    }

    /// Whether the graph holds no requirements.
    pub fn is_empty(&self) -> bool {
        self.requirements.is_empty()
    }

    /// Add a requirement node.
    ///
    /// Fails with [`GraphError::DuplicateId`] if the id is already present.
    pub fn add_requirement(&mut self, requirement: Requirement) -> Result<(), GraphError> {
        if self.by_id.contains_key(&requirement.id) {
            return Err(GraphError::DuplicateId(requirement.id));
        }

        self.by_id
            .insert(requirement.id.clone(), self.requirements.len());
        self.requirements.push(requirement);
        Ok(())
    }

    /// Add a typed edge between two existing requirements.
    ///
    /// - `depends_on` edges are rejected with [`GraphError::Cycle`] when
    ///   they would close a dependency cycle (self-loops included).
    /// - `supersedes` edges are rejected with
    ///   [`GraphError::MultipleSupersession`] when the target already has
    ///   an incoming supersedes edge; otherwise the target's status flips
    ///   to `superseded` atomically with the insert.
    pub fn add_edge(
        &mut self,
        kind: EdgeKind,
        from: RequirementId,
        to: RequirementId,
    ) -> Result<(), GraphError> {
        if !self.by_id.contains_key(&from) {
            return Err(GraphError::UnknownRequirement(from));
        }
        if !self.by_id.contains_key(&to) {
            return Err(GraphError::UnknownRequirement(to));
        }

        match kind {
            EdgeKind::DependsOn => {
                // A path to -> ... -> from (or from == to) means the new
                // edge from -> to closes a cycle.
                if from == to || self.depends_path_exists(&to, &from) {
                    return Err(GraphError::Cycle { from, to });
                }
            }
            EdgeKind::Supersedes => {
                if let Some(existing) = self.superseded_by(&to) {
                    return Err(GraphError::MultipleSupersession {
                        target: to,
                        existing: existing.clone(),
                    });
                }
                let idx = self.by_id[&to];
                self.requirements[idx].status = Status::Superseded;
            }
            EdgeKind::CrossReferences | EdgeKind::ConflictsWith => {}
        }

        self.edges.push(Edge::new(from, to, kind));
        Ok(())
    }

    /// Look up a requirement by id.
    pub fn get(&self, id: &RequirementId) -> Option<&Requirement> {
        self.by_id.get(id).map(|&idx| &self.requirements[idx])
    }

    /// All requirements with status `active`, in insertion order.
    pub fn active_requirements(&self) -> impl Iterator<Item = &Requirement> {
        self.requirements
            .iter()
            .filter(|r| r.status == Status::Active)
    }

    /// Direct `depends_on` targets of the given requirement.
    pub fn dependencies_of(&self, id: &RequirementId) -> Vec<&RequirementId> {
        self.edges
            .iter()
            .filter(|e| e.kind == EdgeKind::DependsOn && &e.from == id)
            .map(|e| &e.to)
            .collect()
    }

    /// The requirement that supersedes `id`, if any.
    ///
    /// Supersession edges form a forest, so there is at most one.
    pub fn superseded_by(&self, id: &RequirementId) -> Option<&RequirementId> {
        self.edges
            .iter()
            .find(|e| e.kind == EdgeKind::Supersedes && &e.to == id)
            .map(|e| &e.from)
    }

    /// All edges of the given kind, in insertion order.
    ///
    /// This is the extension seam for relationship kinds beyond the
    /// built-in queries.
    pub fn edges_of_kind(&self, kind: EdgeKind) -> impl Iterator<Item = &Edge> {
        self.edges.iter().filter(move |e| e.kind == kind)
    }

    /// Whether a depends_on path exists from `start` to `goal`.
    fn depends_path_exists(&self, start: &RequirementId, goal: &RequirementId) -> bool {
        let mut visited: HashSet<&RequirementId> = HashSet::new();
        let mut stack: Vec<&RequirementId> = vec![start];

        while let Some(current) = stack.pop() {
            if current == goal {
                return true;
            }
            if !visited.insert(current) {
                continue;
            }
            for next in self.dependencies_of(current) {
                stack.push(next);
            }
        }
        false
    }
}
