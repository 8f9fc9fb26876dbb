//! Typed relationships between nodes
//!
//! Edges are built in two steps. An [`EdgeSpec`] is a draft naming its
//! endpoints by id; the graph builder resolves those ids, checks them and
//! derives `cross_domain` from the endpoint domains to produce an [`Edge`].
//! `cross_domain` therefore has no setter anywhere.

use crate::domain::Domain;
use crate::error::{check_unit_interval, Result};
use crate::node::NodeId;
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Edge identity
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EdgeId(Uuid);

impl EdgeId {
    /// Fresh random id
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Wrap an existing uuid
    #[must_use]
    pub const fn from_uuid(id: Uuid) -> Self {
        Self(id)
    }
}

impl Default for EdgeId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for EdgeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Relationship semantics
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum EdgeKind {
    /// A produces B (mutation → immune escape)
    Causal,
    /// A is associated with B (treatment → reduced hospitalization)
    Correlative,
    /// A acts through B (spike protein → ACE2 binding)
    Mechanistic,
    /// A precedes B (variant emergence → policy change)
    Temporal,
    /// A suppresses B (antibody → viral replication)
    Inhibitory,
}

impl EdgeKind {
    /// All kinds in canonical order
    pub const ALL: [EdgeKind; 5] = [
        EdgeKind::Causal,
        EdgeKind::Correlative,
        EdgeKind::Mechanistic,
        EdgeKind::Temporal,
        EdgeKind::Inhibitory,
    ];
}

impl fmt::Display for EdgeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

/// Unresolved edge draft
#[derive(Debug, Clone, PartialEq)]
pub struct EdgeSpec {
    /// Source node id
    pub source: NodeId,
    /// Target node id
    pub target: NodeId,
    /// Relationship semantics
    pub kind: EdgeKind,
    /// Human-readable description
    pub relationship: String,
    /// Provenance strings (DOIs, dataset refs)
    pub evidence: Vec<String>,
    /// Confidence in `[0, 1]`
    pub confidence: f64,
}

impl EdgeSpec {
    /// Draft an edge of any kind
    pub fn new(
        source: impl Into<NodeId>,
        target: impl Into<NodeId>,
        kind: EdgeKind,
        relationship: impl Into<String>,
        evidence: Vec<String>,
        confidence: f64,
    ) -> Self {
        Self {
            source: source.into(),
            target: target.into(),
            kind,
            relationship: relationship.into(),
            evidence,
            confidence,
        }
    }
}

/// A resolved edge stored in a graph
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Edge {
    id: EdgeId,
    source: NodeId,
    target: NodeId,
    kind: EdgeKind,
    relationship: String,
    evidence: Vec<String>,
    confidence: f64,
    cross_domain: bool,
}

impl Edge {
    /// Resolve a draft against the endpoint domains
    ///
    /// Only the builder calls this, after it has checked both endpoints exist.
    pub(crate) fn resolve(
        id: EdgeId,
        spec: EdgeSpec,
        source_domain: Domain,
        target_domain: Domain,
    ) -> Result<Self> {
        check_unit_interval("edge confidence", spec.confidence)?;
        Ok(Self {
            id,
            source: spec.source,
            target: spec.target,
            kind: spec.kind,
            relationship: spec.relationship,
            evidence: spec.evidence,
            confidence: spec.confidence,
            cross_domain: source_domain != target_domain,
        })
    }

    /// Turn a stored edge back into a draft (for re-import)
    pub(crate) fn to_spec(&self) -> EdgeSpec {
        EdgeSpec {
            source: self.source.clone(),
            target: self.target.clone(),
            kind: self.kind,
            relationship: self.relationship.clone(),
            evidence: self.evidence.clone(),
            confidence: self.confidence,
        }
    }

    /// Edge id
    #[must_use]
    pub fn id(&self) -> EdgeId {
        self.id
    }

    /// Source node id
    #[must_use]
    pub fn source(&self) -> &NodeId {
        &self.source
    }

    /// Target node id
    #[must_use]
    pub fn target(&self) -> &NodeId {
        &self.target
    }

    /// Relationship semantics
    #[must_use]
    pub fn kind(&self) -> EdgeKind {
        self.kind
    }

    /// Human-readable description
    #[must_use]
    pub fn relationship(&self) -> &str {
        &self.relationship
    }

    /// Provenance references
    #[must_use]
    pub fn evidence(&self) -> &[String] {
        &self.evidence
    }

    /// Confidence in `[0, 1]`
    #[must_use]
    pub fn confidence(&self) -> f64 {
        self.confidence
    }

    /// Whether the endpoints belong to different domains
    #[must_use]
    pub fn is_cross_domain(&self) -> bool {
        self.cross_domain
    }
}

/// Drafts for the common SARS-CoV-2 relationship shapes
///
/// Each builder fixes the [`EdgeKind`]; callers only supply endpoints,
/// description, evidence and confidence.
pub mod builders {
    use super::{EdgeKind, EdgeSpec};
    use crate::node::NodeId;

    /// Genomics mutation → immunology escape (causal)
    pub fn mutation_to_immune_escape(
        mutation: impl Into<NodeId>,
        immune: impl Into<NodeId>,
        description: impl Into<String>,
        evidence: Vec<String>,
        confidence: f64,
    ) -> EdgeSpec {
        EdgeSpec::new(mutation, immune, EdgeKind::Causal, description, evidence, confidence)
    }

    /// Genomics variant → virology transmissibility (causal)
    pub fn variant_to_transmissibility(
        variant: impl Into<NodeId>,
        virology: impl Into<NodeId>,
        description: impl Into<String>,
        evidence: Vec<String>,
        confidence: f64,
    ) -> EdgeSpec {
        EdgeSpec::new(variant, virology, EdgeKind::Causal, description, evidence, confidence)
    }

    /// Treatment → outcome (correlative)
    pub fn treatment_to_outcome(
        treatment: impl Into<NodeId>,
        outcome: impl Into<NodeId>,
        description: impl Into<String>,
        evidence: Vec<String>,
        confidence: f64,
    ) -> EdgeSpec {
        EdgeSpec::new(
            treatment,
            outcome,
            EdgeKind::Correlative,
            description,
            evidence,
            confidence,
        )
    }

    /// Policy → transmission (correlative)
    pub fn policy_to_transmission(
        policy: impl Into<NodeId>,
        outcome: impl Into<NodeId>,
        description: impl Into<String>,
        evidence: Vec<String>,
        confidence: f64,
    ) -> EdgeSpec {
        EdgeSpec::new(
            policy,
            outcome,
            EdgeKind::Correlative,
            description,
            evidence,
            confidence,
        )
    }

    /// Generic link between any two nodes, recorded as an association
    pub fn cross_domain_link(
        source: impl Into<NodeId>,
        target: impl Into<NodeId>,
        description: impl Into<String>,
        evidence: Vec<String>,
        confidence: f64,
    ) -> EdgeSpec {
        EdgeSpec::new(
            source,
            target,
            EdgeKind::Correlative,
            description,
            evidence,
            confidence,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::builders::*;
    use super::*;

    #[test]
    fn builders_fix_kind() {
        let refs = vec!["doi:10.1016/j.cell.2022.06.005".to_string()];
        assert_eq!(
            mutation_to_immune_escape("m", "i", "E484K → escape", refs.clone(), 0.8).kind,
            EdgeKind::Causal
        );
        assert_eq!(
            variant_to_transmissibility("v", "t", "Delta → spread", refs.clone(), 0.8).kind,
            EdgeKind::Causal
        );
        assert_eq!(
            treatment_to_outcome("p", "o", "Paxlovid → fewer admissions", refs.clone(), 0.8).kind,
            EdgeKind::Correlative
        );
        assert_eq!(
            policy_to_transmission("m", "o", "Masks → less spread", refs.clone(), 0.8).kind,
            EdgeKind::Correlative
        );
        assert_eq!(
            cross_domain_link("a", "b", "linked", refs, 0.8).kind,
            EdgeKind::Correlative
        );
    }

    #[test]
    fn resolve_derives_cross_domain() {
        let spec = EdgeSpec::new("a", "b", EdgeKind::Temporal, "a then b", vec![], 0.4);
        let same = Edge::resolve(EdgeId::new(), spec.clone(), Domain::Genomics, Domain::Genomics)
            .unwrap();
        assert!(!same.is_cross_domain());

        let cross =
            Edge::resolve(EdgeId::new(), spec, Domain::Genomics, Domain::Immunology).unwrap();
        assert!(cross.is_cross_domain());
    }

    #[test]
    fn resolve_rejects_bad_confidence() {
        let spec = EdgeSpec::new("a", "b", EdgeKind::Causal, "x", vec![], -0.1);
        assert!(Edge::resolve(EdgeId::new(), spec, Domain::Virology, Domain::Virology).is_err());
    }
}
