//! Graph Builder
//!
//! The only way to produce a [`Graph`]. Every accumulation call validates its
//! input against what has been accumulated so far and either applies it in
//! full or returns an error with the builder untouched, so callers can retry
//! with corrected input.
//!
//! Usage:
//! ```rust
//! use sarsgraph_core::prelude::*;
//!
//! # fn main() -> sarsgraph_core::Result<()> {
//! let mut builder = GraphBuilder::new(RootEntity::new("SARS-CoV-2", 29.9)?);
//! builder.add_node(DomainNode::genomics(
//!     "ba5",
//!     NodeAttrs::new("Omicron BA.5", 12, 0.85),
//!     "Omicron BA.5",
//!     ["L452R", "F486V"],
//! )?)?;
//! builder.add_node(DomainNode::immunology(
//!     "nab",
//!     NodeAttrs::new("Neutralizing antibodies", 9, 0.8),
//!     "Antibody neutralization",
//!     "Reduced titres against BA.5",
//! )?)?;
//! builder.add_edge(builders::mutation_to_immune_escape(
//!     "ba5",
//!     "nab",
//!     "F486V → antibody escape",
//!     vec!["doi:10.1016/j.cell.2022.06.005".into()],
//!     0.8,
//! ))?;
//!
//! let graph = builder.build();
//! assert_eq!(graph.cross_domain_edges().count(), 1);
//! # Ok(())
//! # }
//! ```

use crate::edge::{Edge, EdgeId, EdgeSpec};
use crate::error::{EntityKind, GraphError, Result};
use crate::graph::{Graph, GraphId};
use crate::hypothesis::HypothesisPath;
use crate::node::{DomainNode, NodeId, RootEntity};
use crate::rd::RateDistortionCurve;
use crate::trace::SerendipityTrace;
use chrono::Utc;
use indexmap::IndexMap;
use std::collections::BTreeMap;
use uuid::Uuid;

/// Accumulates a graph; single writer, not meant for shared mutation
#[derive(Debug, Clone)]
pub struct GraphBuilder {
    graph_id: GraphId,
    root: RootEntity,
    nodes: IndexMap<NodeId, DomainNode>,
    edges: IndexMap<EdgeId, Edge>,
    hypothesis_paths: Vec<HypothesisPath>,
    traces: Vec<SerendipityTrace>,
    rd_curves: BTreeMap<String, RateDistortionCurve>,
}

impl GraphBuilder {
    /// Start a graph about `root`
    pub fn new(root: RootEntity) -> Self {
        Self::with_id(GraphId::new(), root)
    }

    /// Start a graph with a known id
    pub fn with_id(graph_id: GraphId, root: RootEntity) -> Self {
        Self {
            graph_id,
            root,
            nodes: IndexMap::new(),
            edges: IndexMap::new(),
            hypothesis_paths: Vec::new(),
            traces: Vec::new(),
            rd_curves: BTreeMap::new(),
        }
    }

    /// Id the built graph will carry
    pub fn graph_id(&self) -> GraphId {
        self.graph_id
    }

    /// Root entity
    pub fn root(&self) -> &RootEntity {
        &self.root
    }

    /// Number of nodes so far
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Number of edges so far
    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    /// Number of hypothesis paths so far
    pub fn hypothesis_path_count(&self) -> usize {
        self.hypothesis_paths.len()
    }

    /// Number of traces so far
    pub fn trace_count(&self) -> usize {
        self.traces.len()
    }

    /// Look up an accumulated node
    pub fn get_node(&self, id: &NodeId) -> Option<&DomainNode> {
        self.nodes.get(id)
    }

    /// Add a node; its id must be new
    pub fn add_node(&mut self, node: DomainNode) -> Result<NodeId> {
        let result = self.try_add_node(node);
        log_rejection("add_node", &result);
        result
    }

    fn try_add_node(&mut self, node: DomainNode) -> Result<NodeId> {
        node.revalidate()?;
        if self.nodes.contains_key(node.id()) {
            return Err(GraphError::conflict(EntityKind::Node, node.id()));
        }

        let id = node.id().clone();
        tracing::debug!(node = %id, domain = %node.domain(), "added node");
        self.nodes.insert(id.clone(), node);
        Ok(id)
    }

    /// Overwrite an existing node, returning the previous version
    ///
    /// Edges referencing the node are left alone, so the replacement must
    /// stay in the same domain.
    pub fn replace_node(&mut self, node: DomainNode) -> Result<DomainNode> {
        let result = self.try_replace_node(node);
        log_rejection("replace_node", &result);
        result
    }

    fn try_replace_node(&mut self, node: DomainNode) -> Result<DomainNode> {
        node.revalidate()?;
        let Some(existing) = self.nodes.get_mut(node.id()) else {
            return Err(GraphError::not_found(EntityKind::Node, node.id()));
        };
        if existing.domain() != node.domain() {
            return Err(GraphError::validation(format!(
                "replacement for node {} changes domain from {} to {}",
                node.id(),
                existing.domain(),
                node.domain()
            )));
        }

        tracing::debug!(node = %node.id(), "replaced node");
        Ok(std::mem::replace(existing, node))
    }

    /// Resolve and add an edge; both endpoints must already be present
    ///
    /// Several edges between the same pair are allowed.
    pub fn add_edge(&mut self, spec: EdgeSpec) -> Result<EdgeId> {
        self.add_edge_with_id(EdgeId::new(), spec)
    }

    pub(crate) fn add_edge_with_id(&mut self, id: EdgeId, spec: EdgeSpec) -> Result<EdgeId> {
        let result = self.try_add_edge(id, spec);
        log_rejection("add_edge", &result);
        result
    }

    fn try_add_edge(&mut self, id: EdgeId, spec: EdgeSpec) -> Result<EdgeId> {
        let source = self
            .nodes
            .get(&spec.source)
            .ok_or_else(|| GraphError::not_found(EntityKind::Node, &spec.source))?;
        let target = self
            .nodes
            .get(&spec.target)
            .ok_or_else(|| GraphError::not_found(EntityKind::Node, &spec.target))?;
        if self.edges.contains_key(&id) {
            return Err(GraphError::conflict(EntityKind::Edge, id));
        }

        let edge = Edge::resolve(id, spec, source.domain(), target.domain())?;
        tracing::debug!(
            edge = %id,
            kind = %edge.kind(),
            cross_domain = edge.is_cross_domain(),
            "added edge"
        );
        self.edges.insert(id, edge);
        Ok(id)
    }

    /// Record a hypothesis path; every node and edge it names must already be present
    pub fn add_hypothesis_path(&mut self, path: HypothesisPath) -> Result<Uuid> {
        let result = self.try_add_hypothesis_path(path);
        log_rejection("add_hypothesis_path", &result);
        result
    }

    fn try_add_hypothesis_path(&mut self, path: HypothesisPath) -> Result<Uuid> {
        path.revalidate()?;
        if let Some(missing) = path
            .node_sequence()
            .iter()
            .find(|id| !self.nodes.contains_key(*id))
        {
            return Err(GraphError::not_found(EntityKind::Node, missing));
        }
        if let Some(missing) = path
            .edge_sequence()
            .iter()
            .find(|id| !self.edges.contains_key(*id))
        {
            return Err(GraphError::not_found(EntityKind::Edge, missing));
        }
        if self.hypothesis_paths.iter().any(|p| p.id() == path.id()) {
            return Err(GraphError::conflict(EntityKind::HypothesisPath, path.id()));
        }

        let id = path.id();
        tracing::debug!(
            path = %id,
            hypothesis = ?path.hypothesis_type(),
            nodes = path.node_sequence().len(),
            "added hypothesis path"
        );
        self.hypothesis_paths.push(path);
        Ok(id)
    }

    /// Attach a trace; session ids are unique per graph
    pub fn add_trace(&mut self, trace: SerendipityTrace) -> Result<()> {
        let result = self.try_add_trace(trace);
        log_rejection("add_trace", &result);
        result
    }

    fn try_add_trace(&mut self, trace: SerendipityTrace) -> Result<()> {
        trace.revalidate()?;
        if self
            .traces
            .iter()
            .any(|t| t.session_id() == trace.session_id())
        {
            return Err(GraphError::conflict(EntityKind::Trace, trace.session_id()));
        }

        tracing::debug!(
            session = trace.session_id(),
            steps = trace.steps().len(),
            "added trace"
        );
        self.traces.push(trace);
        Ok(())
    }

    /// Register a curve under a unique, non-empty name
    pub fn add_rd_curve(&mut self, name: impl Into<String>, curve: RateDistortionCurve) -> Result<()> {
        let result = self.try_add_rd_curve(name.into(), curve);
        log_rejection("add_rd_curve", &result);
        result
    }

    fn try_add_rd_curve(&mut self, name: String, curve: RateDistortionCurve) -> Result<()> {
        if name.trim().is_empty() {
            return Err(GraphError::invalid_argument("curve name must not be empty"));
        }
        curve.revalidate()?;
        if self.rd_curves.contains_key(&name) {
            return Err(GraphError::conflict(EntityKind::Curve, name));
        }

        tracing::debug!(curve = %name, knee_rate = curve.knee().rate, "added rate-distortion curve");
        self.rd_curves.insert(name, curve);
        Ok(())
    }

    /// Chainable [`add_node`](Self::add_node)
    pub fn with_node(mut self, node: DomainNode) -> Result<Self> {
        self.add_node(node)?;
        Ok(self)
    }

    /// Chainable [`add_edge`](Self::add_edge)
    pub fn with_edge(mut self, spec: EdgeSpec) -> Result<Self> {
        self.add_edge(spec)?;
        Ok(self)
    }

    /// Chainable [`add_hypothesis_path`](Self::add_hypothesis_path)
    pub fn with_hypothesis_path(mut self, path: HypothesisPath) -> Result<Self> {
        self.add_hypothesis_path(path)?;
        Ok(self)
    }

    /// Chainable [`add_trace`](Self::add_trace)
    pub fn with_trace(mut self, trace: SerendipityTrace) -> Result<Self> {
        self.add_trace(trace)?;
        Ok(self)
    }

    /// Chainable [`add_rd_curve`](Self::add_rd_curve)
    pub fn with_rd_curve(mut self, name: impl Into<String>, curve: RateDistortionCurve) -> Result<Self> {
        self.add_rd_curve(name, curve)?;
        Ok(self)
    }

    /// Freeze the accumulated state into an immutable graph
    pub fn build(self) -> Graph {
        tracing::info!(
            graph = %self.graph_id,
            nodes = self.nodes.len(),
            edges = self.edges.len(),
            hypothesis_paths = self.hypothesis_paths.len(),
            traces = self.traces.len(),
            curves = self.rd_curves.len(),
            "built graph"
        );
        Graph {
            id: self.graph_id,
            built_at: Utc::now(),
            root: self.root,
            nodes: self.nodes,
            edges: self.edges,
            hypothesis_paths: self.hypothesis_paths,
            traces: self.traces,
            rd_curves: self.rd_curves,
        }
    }
}

fn log_rejection<T>(operation: &str, result: &Result<T>) {
    if let Err(error) = result {
        tracing::warn!(operation, %error, "rejected graph input");
    }
}
