//! Aggregate statistics and the metrics report
//!
//! Computed on demand from a built graph, never cached on it. One pass over
//! nodes and one over edges.

use crate::domain::Domain;
use crate::edge::EdgeKind;
use crate::graph::{Graph, GraphId};
use crate::trace::SerendipitySummary;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Counts and averages over one graph
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GraphStatistics {
    /// Node count
    pub total_nodes: usize,
    /// Node count per domain, every domain present
    pub nodes_per_domain: BTreeMap<Domain, usize>,
    /// Summed evidence per domain, every domain present
    pub evidence_per_domain: BTreeMap<Domain, u64>,
    /// Domains with at least one node
    pub domains_covered: usize,
    /// Node count per intent tag; untagged nodes are not counted
    pub nodes_per_intent: BTreeMap<String, usize>,
    /// Edge count
    pub total_edges: usize,
    /// Edge count per kind, every kind present
    pub edges_per_kind: BTreeMap<EdgeKind, usize>,
    /// Edges joining different domains
    pub cross_domain_edges: usize,
    /// Mean edge confidence, 0 without edges
    pub average_edge_confidence: f64,
    /// Hypothesis path count
    pub hypothesis_paths: usize,
    /// Trace count
    pub trace_count: usize,
}

impl GraphStatistics {
    /// Compute statistics for `graph`
    #[must_use]
    pub fn compute(graph: &Graph) -> Self {
        let mut nodes_per_domain: BTreeMap<Domain, usize> =
            Domain::ALL.iter().map(|d| (*d, 0)).collect();
        let mut evidence_per_domain: BTreeMap<Domain, u64> =
            Domain::ALL.iter().map(|d| (*d, 0)).collect();
        let mut nodes_per_intent: BTreeMap<String, usize> = BTreeMap::new();
        for node in graph.nodes() {
            *nodes_per_domain.entry(node.domain()).or_insert(0) += 1;
            *evidence_per_domain.entry(node.domain()).or_insert(0) +=
                u64::from(node.evidence_count());
            if !node.intent().is_empty() {
                *nodes_per_intent.entry(node.intent().to_string()).or_insert(0) += 1;
            }
        }

        let mut edges_per_kind: BTreeMap<EdgeKind, usize> =
            EdgeKind::ALL.iter().map(|k| (*k, 0)).collect();
        let mut cross_domain_edges = 0;
        let mut confidence_sum = 0.0;
        for edge in graph.edges() {
            *edges_per_kind.entry(edge.kind()).or_insert(0) += 1;
            if edge.is_cross_domain() {
                cross_domain_edges += 1;
            }
            confidence_sum += edge.confidence();
        }

        let total_edges = graph.edge_count();
        let average_edge_confidence = if total_edges == 0 {
            0.0
        } else {
            confidence_sum / total_edges as f64
        };

        Self {
            total_nodes: graph.node_count(),
            domains_covered: nodes_per_domain.values().filter(|c| **c > 0).count(),
            nodes_per_domain,
            evidence_per_domain,
            nodes_per_intent,
            total_edges,
            edges_per_kind,
            cross_domain_edges,
            average_edge_confidence,
            hypothesis_paths: graph.hypothesis_paths().len(),
            trace_count: graph.traces().len(),
        }
    }
}

/// Statistics plus per-trace serendipity metrics
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetricsReport {
    /// Graph the report describes
    pub graph_id: GraphId,
    /// Structural statistics
    pub statistics: GraphStatistics,
    /// One summary per trace, in trace order
    pub traces: Vec<SerendipitySummary>,
    /// Mean diversity score over traces, 0 without traces
    pub avg_trace_diversity: f64,
}

impl MetricsReport {
    /// Compute the report for `graph`
    #[must_use]
    pub fn compute(graph: &Graph) -> Self {
        let traces: Vec<SerendipitySummary> = graph.traces().iter().map(|t| t.summary()).collect();
        let avg_trace_diversity = if traces.is_empty() {
            0.0
        } else {
            traces.iter().map(|t| t.diversity_score).sum::<f64>() / traces.len() as f64
        };

        Self {
            graph_id: graph.id(),
            statistics: GraphStatistics::compute(graph),
            traces,
            avg_trace_diversity,
        }
    }
}

impl Graph {
    /// Shorthand for [`GraphStatistics::compute`]
    #[must_use]
    pub fn statistics(&self) -> GraphStatistics {
        GraphStatistics::compute(self)
    }
}
