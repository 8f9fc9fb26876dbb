//! Hypothesis paths
//!
//! A hypothesis path is a curated argument through the graph: an ordered run
//! of node ids and the edge ids connecting them, scored by overall
//! confidence and by how much of the needed evidence it covers. The path
//! only names ids; [`GraphBuilder::add_hypothesis_path`] checks that every
//! one of them resolves.
//!
//! [`GraphBuilder::add_hypothesis_path`]: crate::builder::GraphBuilder::add_hypothesis_path

use crate::edge::EdgeId;
use crate::error::{check_unit_interval, GraphError, Result};
use crate::node::NodeId;
use crate::trace::HypothesisType;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Ordered node and edge sequence supporting one hypothesis
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HypothesisPath {
    id: Uuid,
    hypothesis_type: HypothesisType,
    description: String,
    node_sequence: Vec<NodeId>,
    edge_sequence: Vec<EdgeId>,
    total_confidence: f64,
    evidence_coverage: f64,
}

impl HypothesisPath {
    /// Create a path; both scores must lie in `[0, 1]` and at least one node is required
    pub fn new<N, E>(
        hypothesis_type: HypothesisType,
        description: impl Into<String>,
        nodes: N,
        edges: E,
        total_confidence: f64,
        evidence_coverage: f64,
    ) -> Result<Self>
    where
        N: IntoIterator,
        N::Item: Into<NodeId>,
        E: IntoIterator<Item = EdgeId>,
    {
        let path = Self {
            id: Uuid::new_v4(),
            hypothesis_type,
            description: description.into(),
            node_sequence: nodes.into_iter().map(Into::into).collect(),
            edge_sequence: edges.into_iter().collect(),
            total_confidence,
            evidence_coverage,
        };
        path.revalidate()?;
        Ok(path)
    }

    /// Path id
    #[must_use]
    pub fn id(&self) -> Uuid {
        self.id
    }

    /// Hypothesis the path argues for
    #[must_use]
    pub fn hypothesis_type(&self) -> HypothesisType {
        self.hypothesis_type
    }

    /// Free-text statement of the hypothesis
    #[must_use]
    pub fn description(&self) -> &str {
        &self.description
    }

    /// Nodes in path order
    #[must_use]
    pub fn node_sequence(&self) -> &[NodeId] {
        &self.node_sequence
    }

    /// Edges in path order
    #[must_use]
    pub fn edge_sequence(&self) -> &[EdgeId] {
        &self.edge_sequence
    }

    /// Overall confidence in `[0, 1]`
    #[must_use]
    pub fn total_confidence(&self) -> f64 {
        self.total_confidence
    }

    /// Share of required evidence the path covers, in `[0, 1]`
    #[must_use]
    pub fn evidence_coverage(&self) -> f64 {
        self.evidence_coverage
    }

    /// Checks that need no graph; id resolution happens in the builder
    pub(crate) fn revalidate(&self) -> Result<()> {
        if self.node_sequence.is_empty() {
            return Err(GraphError::validation(format!(
                "hypothesis path {} names no nodes",
                self.id
            )));
        }
        check_unit_interval("hypothesis path confidence", self.total_confidence)?;
        check_unit_interval("hypothesis path evidence coverage", self.evidence_coverage)
    }
}
