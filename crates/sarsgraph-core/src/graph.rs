//! The built multi-intent graph
//!
//! A [`Graph`] can only be produced by [`GraphBuilder::build`] (or by
//! importing a snapshot, which replays through the builder). It has no
//! mutating methods, so a shared `&Graph` or `Arc<Graph>` is safe to read
//! from any number of threads.
//!
//! [`GraphBuilder::build`]: crate::builder::GraphBuilder::build

use crate::domain::Domain;
use crate::edge::{Edge, EdgeId, EdgeKind};
use crate::hypothesis::HypothesisPath;
use crate::node::{DomainNode, NodeId, RootEntity};
use crate::rd::RateDistortionCurve;
use crate::trace::{HypothesisType, SerendipityTrace};
use chrono::{DateTime, Utc};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use uuid::Uuid;

/// Graph identity
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct GraphId(pub Uuid);

impl GraphId {
    /// Fresh random id
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for GraphId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for GraphId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Immutable snapshot of a knowledge graph
#[derive(Debug, Clone, PartialEq)]
pub struct Graph {
    pub(crate) id: GraphId,
    pub(crate) built_at: DateTime<Utc>,
    pub(crate) root: RootEntity,
    pub(crate) nodes: IndexMap<NodeId, DomainNode>,
    pub(crate) edges: IndexMap<EdgeId, Edge>,
    pub(crate) hypothesis_paths: Vec<HypothesisPath>,
    pub(crate) traces: Vec<SerendipityTrace>,
    pub(crate) rd_curves: BTreeMap<String, RateDistortionCurve>,
}

impl Graph {
    /// Graph id
    #[must_use]
    pub fn id(&self) -> GraphId {
        self.id
    }

    /// When `build()` produced this snapshot
    #[must_use]
    pub fn built_at(&self) -> DateTime<Utc> {
        self.built_at
    }

    /// Subject of the graph
    #[must_use]
    pub fn root(&self) -> &RootEntity {
        &self.root
    }

    /// Look up a node
    #[must_use]
    pub fn node(&self, id: &NodeId) -> Option<&DomainNode> {
        self.nodes.get(id)
    }

    /// Whether a node id is present
    #[must_use]
    pub fn contains_node(&self, id: &NodeId) -> bool {
        self.nodes.contains_key(id)
    }

    /// Nodes in insertion order
    pub fn nodes(&self) -> impl ExactSizeIterator<Item = &DomainNode> + '_ {
        self.nodes.values()
    }

    /// Look up an edge
    #[must_use]
    pub fn edge(&self, id: EdgeId) -> Option<&Edge> {
        self.edges.get(&id)
    }

    /// Edges in insertion order
    pub fn edges(&self) -> impl ExactSizeIterator<Item = &Edge> + '_ {
        self.edges.values()
    }

    /// Number of nodes
    #[must_use]
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Number of edges
    #[must_use]
    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    /// Nodes belonging to `domain`
    pub fn nodes_in(&self, domain: Domain) -> impl Iterator<Item = &DomainNode> + '_ {
        self.nodes.values().filter(move |n| n.domain() == domain)
    }

    /// Nodes tagged with `intent`
    pub fn nodes_for_intent<'a>(&'a self, intent: &'a str) -> impl Iterator<Item = &'a DomainNode> + 'a {
        self.nodes.values().filter(move |n| n.intent() == intent)
    }

    /// Distinct non-empty intents, sorted
    #[must_use]
    pub fn intents(&self) -> BTreeSet<&str> {
        self.nodes
            .values()
            .map(DomainNode::intent)
            .filter(|intent| !intent.is_empty())
            .collect()
    }

    /// Edges of `kind`
    pub fn edges_of_kind(&self, kind: EdgeKind) -> impl Iterator<Item = &Edge> + '_ {
        self.edges.values().filter(move |e| e.kind() == kind)
    }

    /// Edges whose endpoints sit in different domains
    pub fn cross_domain_edges(&self) -> impl Iterator<Item = &Edge> + '_ {
        self.edges.values().filter(|e| e.is_cross_domain())
    }

    /// Hypothesis paths in insertion order
    #[must_use]
    pub fn hypothesis_paths(&self) -> &[HypothesisPath] {
        &self.hypothesis_paths
    }

    /// Hypothesis path with `id`
    #[must_use]
    pub fn hypothesis_path(&self, id: Uuid) -> Option<&HypothesisPath> {
        self.hypothesis_paths.iter().find(|p| p.id() == id)
    }

    /// Hypothesis paths arguing for `hypothesis_type`
    pub fn hypothesis_paths_for(
        &self,
        hypothesis_type: HypothesisType,
    ) -> impl Iterator<Item = &HypothesisPath> + '_ {
        self.hypothesis_paths
            .iter()
            .filter(move |p| p.hypothesis_type() == hypothesis_type)
    }

    /// Recorded serendipity traces
    #[must_use]
    pub fn traces(&self) -> &[SerendipityTrace] {
        &self.traces
    }

    /// Trace recorded for `session_id`
    #[must_use]
    pub fn trace(&self, session_id: &str) -> Option<&SerendipityTrace> {
        self.traces.iter().find(|t| t.session_id() == session_id)
    }

    /// Named rate-distortion curves
    #[must_use]
    pub fn rd_curves(&self) -> &BTreeMap<String, RateDistortionCurve> {
        &self.rd_curves
    }

    /// Curve registered under `name`
    #[must_use]
    pub fn rd_curve(&self, name: &str) -> Option<&RateDistortionCurve> {
        self.rd_curves.get(name)
    }

    /// Summed evidence count per domain; every domain is present
    #[must_use]
    pub fn evidence_by_domain(&self) -> BTreeMap<Domain, u64> {
        let mut totals: BTreeMap<Domain, u64> = Domain::ALL.iter().map(|d| (*d, 0)).collect();
        for node in self.nodes.values() {
            *totals.entry(node.domain()).or_insert(0) += u64::from(node.evidence_count());
        }
        totals
    }

    /// Evidence references per edge, in edge insertion order
    #[must_use]
    pub fn provenance(&self) -> Vec<ProvenanceEntry> {
        self.edges
            .values()
            .map(|e| ProvenanceEntry {
                edge_id: e.id(),
                source: e.source().clone(),
                target: e.target().clone(),
                kind: e.kind(),
                relationship: e.relationship().to_string(),
                evidence: e.evidence().to_vec(),
            })
            .collect()
    }

    /// Distinct evidence references across all edges, sorted
    #[must_use]
    pub fn citations(&self) -> BTreeSet<&str> {
        self.edges
            .values()
            .flat_map(|e| e.evidence().iter().map(String::as_str))
            .collect()
    }
}

/// Evidence listing for one edge
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProvenanceEntry {
    /// Edge id
    pub edge_id: EdgeId,
    /// Source node id
    pub source: NodeId,
    /// Target node id
    pub target: NodeId,
    /// Relationship semantics
    pub kind: EdgeKind,
    /// Relationship description
    pub relationship: String,
    /// Citations backing the edge
    pub evidence: Vec<String>,
}
