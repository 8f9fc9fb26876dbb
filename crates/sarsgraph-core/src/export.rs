//! Snapshot export and import
//!
//! The exported document is plain serde data. Importing replays every record
//! through [`GraphBuilder`], so a document that violates an invariant (for
//! example a hand-edited `cross_domain` flag or knee) is rejected instead of
//! producing an inconsistent graph.

use crate::builder::GraphBuilder;
use crate::edge::Edge;
use crate::error::{GraphError, Result};
use crate::graph::{Graph, GraphId};
use crate::hypothesis::HypothesisPath;
use crate::node::{DomainNode, RootEntity};
use crate::rd::RateDistortionCurve;
use crate::trace::SerendipityTrace;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::io::{Read, Write};

/// Serializable form of a [`Graph`]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GraphDocument {
    /// Graph id
    pub id: GraphId,
    /// Build time
    pub built_at: DateTime<Utc>,
    /// Subject
    pub root: RootEntity,
    /// Nodes in insertion order
    pub nodes: Vec<DomainNode>,
    /// Edges in insertion order
    pub edges: Vec<Edge>,
    /// Hypothesis paths in insertion order
    #[serde(default)]
    pub hypothesis_paths: Vec<HypothesisPath>,
    /// Traces in insertion order
    pub traces: Vec<SerendipityTrace>,
    /// Curves by name
    pub rd_curves: BTreeMap<String, RateDistortionCurve>,
}

impl Graph {
    /// Snapshot as a document
    #[must_use]
    pub fn to_document(&self) -> GraphDocument {
        GraphDocument {
            id: self.id,
            built_at: self.built_at,
            root: self.root.clone(),
            nodes: self.nodes.values().cloned().collect(),
            edges: self.edges.values().cloned().collect(),
            hypothesis_paths: self.hypothesis_paths.clone(),
            traces: self.traces.clone(),
            rd_curves: self.rd_curves.clone(),
        }
    }

    /// Rebuild a graph from a document, re-checking every invariant
    pub fn from_document(document: GraphDocument) -> Result<Self> {
        let GraphDocument {
            id,
            built_at,
            root,
            nodes,
            edges,
            hypothesis_paths,
            traces,
            rd_curves,
        } = document;

        let root = RootEntity::with_id(root.id(), root.name(), root.genome_kb())?;
        let mut builder = GraphBuilder::with_id(id, root);

        for node in nodes {
            builder.add_node(node)?;
        }
        for edge in &edges {
            let edge_id = builder.add_edge_with_id(edge.id(), edge.to_spec())?;
            let expected = builder
                .get_node(edge.source())
                .zip(builder.get_node(edge.target()))
                .map(|(s, t)| s.domain() != t.domain());
            if expected != Some(edge.is_cross_domain()) {
                return Err(GraphError::validation(format!(
                    "edge {edge_id} carries an inconsistent cross_domain flag"
                )));
            }
        }
        for path in hypothesis_paths {
            builder.add_hypothesis_path(path)?;
        }
        for trace in traces {
            builder.add_trace(trace)?;
        }
        for (name, curve) in rd_curves {
            builder.add_rd_curve(name, curve)?;
        }

        let mut graph = builder.build();
        graph.built_at = built_at;
        Ok(graph)
    }

    /// Pretty-printed JSON
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(&self.to_document())?)
    }

    /// Parse and import JSON
    pub fn from_json(json: &str) -> Result<Self> {
        Self::from_document(serde_json::from_str(json)?)
    }

    /// Write pretty-printed JSON to `writer`
    pub fn write_json<W: Write>(&self, writer: W) -> Result<()> {
        serde_json::to_writer_pretty(writer, &self.to_document())?;
        Ok(())
    }

    /// Read and import JSON from `reader`
    pub fn read_json<R: Read>(reader: R) -> Result<Self> {
        Self::from_document(serde_json::from_reader(reader)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Domain;
    use crate::edge::builders;
    use crate::error::ErrorKind;
    use crate::node::NodeAttrs;
    use crate::trace::HypothesisType;

    fn sample() -> Graph {
        let mut b = GraphBuilder::new(RootEntity::new("SARS-CoV-2", 29.9).unwrap());
        b.add_node(
            DomainNode::genomics(
                "ba5",
                NodeAttrs::new("BA.5", 12, 0.85)
                    .with_intent("immune_escape")
                    .with_sources(["doi:10.1016/j.cell.2022.06.005"]),
                "BA.5",
                ["F486V"],
            )
            .unwrap(),
        )
        .unwrap();
        b.add_node(
            DomainNode::immunology("nab", NodeAttrs::new("nAb", 9, 0.8), "Neutralization", "")
                .unwrap(),
        )
        .unwrap();
        let escape = b
            .add_edge(builders::mutation_to_immune_escape(
                "ba5",
                "nab",
                "F486V → escape",
                vec!["doi:10.1016/j.cell.2022.06.005".into()],
                0.8,
            ))
            .unwrap();
        b.add_hypothesis_path(
            HypothesisPath::new(
                HypothesisType::VaccineEfficacy,
                "BA.5 escapes neutralizing antibodies",
                ["ba5", "nab"],
                [escape],
                0.85,
                0.82,
            )
            .unwrap(),
        )
        .unwrap();

        let mut trace = SerendipityTrace::new("session-001", "How does BA.5 escape?");
        trace
            .add_step(HypothesisType::ImmuneEscape, "nAb", [Domain::Immunology], 15, 0.88)
            .unwrap();
        b.add_trace(trace).unwrap();
        b.add_rd_curve(
            "immune_escape",
            RateDistortionCurve::from_measurements(&[5, 10, 15], &[0.8, 0.5, 0.3]).unwrap(),
        )
        .unwrap();
        b.build()
    }

    #[test]
    fn json_round_trip_is_equal() {
        let graph = sample();
        let json = graph.to_json().unwrap();
        let restored = Graph::from_json(&json).unwrap();
        assert_eq!(restored, graph);
    }

    #[test]
    fn document_has_expected_top_level_keys() {
        let value: serde_json::Value = serde_json::from_str(&sample().to_json().unwrap()).unwrap();
        for key in ["root", "nodes", "edges", "hypothesis_paths", "traces", "rd_curves"] {
            assert!(value.get(key).is_some(), "missing {key}");
        }
        assert_eq!(value["edges"][0]["cross_domain"], true);
    }

    #[test]
    fn tampered_cross_domain_is_rejected() {
        let mut value: serde_json::Value =
            serde_json::from_str(&sample().to_json().unwrap()).unwrap();
        value["edges"][0]["cross_domain"] = serde_json::Value::Bool(false);
        let err = Graph::from_json(&value.to_string()).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Validation);
    }

    #[test]
    fn dangling_edge_is_rejected() {
        let mut value: serde_json::Value =
            serde_json::from_str(&sample().to_json().unwrap()).unwrap();
        value["edges"][0]["target"] = serde_json::Value::String("ghost".into());
        let err = Graph::from_json(&value.to_string()).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NotFound);
    }

    #[test]
    fn hypothesis_paths_and_intents_survive_round_trip() {
        let graph = sample();
        let restored = Graph::from_json(&graph.to_json().unwrap()).unwrap();

        assert_eq!(restored.hypothesis_paths(), graph.hypothesis_paths());
        assert_eq!(restored.hypothesis_paths()[0].evidence_coverage(), 0.82);
        let ba5 = restored.node(&"ba5".into()).unwrap();
        assert_eq!(ba5.intent(), "immune_escape");
        assert_eq!(ba5.sources().len(), 1);
    }

    #[test]
    fn hypothesis_path_with_unknown_edge_is_rejected() {
        let mut value: serde_json::Value =
            serde_json::from_str(&sample().to_json().unwrap()).unwrap();
        value["hypothesis_paths"][0]["edge_sequence"][0] =
            serde_json::Value::String(uuid::Uuid::new_v4().to_string());
        let err = Graph::from_json(&value.to_string()).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NotFound);
    }

    #[test]
    fn document_without_hypothesis_paths_still_imports() {
        let mut value: serde_json::Value =
            serde_json::from_str(&sample().to_json().unwrap()).unwrap();
        value
            .as_object_mut()
            .unwrap()
            .remove("hypothesis_paths");
        let restored = Graph::from_json(&value.to_string()).unwrap();
        assert!(restored.hypothesis_paths().is_empty());
    }

    #[test]
    fn malformed_json_is_serialization_error() {
        let err = Graph::from_json("{not json").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Serialization);
    }
}
