//! Testing utilities for the sarsgraph workspace
//!
//! Shared fixtures and proptest strategies.

#![allow(missing_docs)]

use proptest::prelude::*;
use sarsgraph_core::{
    sample, Domain, DomainNode, EdgeKind, EdgeSpec, Graph, GraphBuilder, HypothesisType,
    NodeAttrs, RateDistortionCurve, RootEntity, SerendipityTrace,
};

pub const HYPOTHESES: [HypothesisType; 5] = [
    HypothesisType::Transmissibility,
    HypothesisType::VaccineEfficacy,
    HypothesisType::TreatmentResponse,
    HypothesisType::ImmuneEscape,
    HypothesisType::PublicHealthImpact,
];

pub fn sample_root() -> RootEntity {
    RootEntity::new("SARS-CoV-2", 29.9).unwrap()
}

/// Node in `domain` with placeholder payload text
pub fn node(id: &str, domain: Domain, evidence_count: u32, confidence: f64) -> DomainNode {
    let attrs = NodeAttrs::new(id, evidence_count, confidence);
    match domain {
        Domain::Virology => DomainNode::virology(id, attrs, "topic", "details"),
        Domain::Immunology => DomainNode::immunology(id, attrs, "topic", "details"),
        Domain::Genomics => DomainNode::genomics(id, attrs, "variant", Vec::<String>::new()),
        Domain::Treatment => DomainNode::treatment(id, attrs, "therapy", "mechanism"),
        Domain::PublicHealth => DomainNode::public_health(id, attrs, "policy", "effect"),
    }
    .unwrap()
}

pub fn edge(source: &str, target: &str) -> EdgeSpec {
    EdgeSpec::new(source, target, EdgeKind::Causal, "linked", vec![], 0.5)
}

/// A–B–C virology chain
pub fn chain_graph() -> Graph {
    let mut b = GraphBuilder::new(sample_root());
    for id in ["A", "B", "C"] {
        b.add_node(node(id, Domain::Virology, 1, 0.5)).unwrap();
    }
    b.add_edge(edge("A", "B")).unwrap();
    b.add_edge(edge("B", "C")).unwrap();
    b.build()
}

/// Graph whose Genomics evidence sums to 8 and Virology to 12
pub fn governance_graph() -> Graph {
    let mut b = GraphBuilder::new(sample_root());
    b.add_node(node("g1", Domain::Genomics, 5, 0.8)).unwrap();
    b.add_node(node("g2", Domain::Genomics, 3, 0.7)).unwrap();
    b.add_node(node("v1", Domain::Virology, 12, 0.9)).unwrap();
    b.build()
}

pub fn reference_rd_curve() -> RateDistortionCurve {
    RateDistortionCurve::from_measurements(
        &[5, 10, 15, 20, 25, 30],
        &[0.9, 0.6, 0.5, 0.45, 0.4, 0.38],
    )
    .unwrap()
}

pub fn omicron_ba5_trace() -> SerendipityTrace {
    sample::omicron_ba5_trace().unwrap()
}

pub fn paxlovid_trace() -> SerendipityTrace {
    sample::paxlovid_trace().unwrap()
}

/// Five-domain sample graph with intents, hypothesis paths, traces and curves
pub fn sample_graph() -> Graph {
    sample::sample_graph().unwrap()
}

pub fn arb_domain() -> impl Strategy<Value = Domain> {
    proptest::sample::select(Domain::ALL.to_vec())
}

pub fn arb_edge_kind() -> impl Strategy<Value = EdgeKind> {
    proptest::sample::select(EdgeKind::ALL.to_vec())
}

pub fn arb_hypothesis() -> impl Strategy<Value = HypothesisType> {
    proptest::sample::select(HYPOTHESES.to_vec())
}

/// Trace with up to eight valid steps
pub fn arb_trace(session_id: &'static str) -> impl Strategy<Value = SerendipityTrace> {
    prop::collection::vec(
        (
            arb_hypothesis(),
            prop::collection::btree_set(arb_domain(), 1..3),
            0u32..30,
            0.0f64..=1.0,
        ),
        0..8,
    )
    .prop_map(move |steps| {
        let mut trace = SerendipityTrace::new(session_id, "generated");
        for (hypothesis, domains, evidence, confidence) in steps {
            trace
                .add_step(hypothesis, "step", domains, evidence, confidence)
                .unwrap();
        }
        trace
    })
}

/// Valid graph with up to eight nodes, twelve edges and one trace
pub fn arb_graph() -> impl Strategy<Value = Graph> {
    prop::collection::vec((arb_domain(), 0u32..20, 0.0f64..=1.0), 1..8)
        .prop_flat_map(|nodes| {
            let n = nodes.len();
            let edges = prop::collection::vec((0..n, 0..n, arb_edge_kind(), 0.0f64..=1.0), 0..12);
            (Just(nodes), edges, arb_trace("generated-session"))
        })
        .prop_map(|(nodes, edges, trace)| {
            let mut b = GraphBuilder::new(sample_root());
            for (i, (domain, evidence, confidence)) in nodes.into_iter().enumerate() {
                b.add_node(node(&format!("n{i}"), domain, evidence, confidence))
                    .unwrap();
            }
            for (i, (s, t, kind, confidence)) in edges.into_iter().enumerate() {
                b.add_edge(EdgeSpec::new(
                    format!("n{s}"),
                    format!("n{t}"),
                    kind,
                    "generated",
                    vec![format!("ref:{i}")],
                    confidence,
                ))
                .unwrap();
            }
            b.add_trace(trace).unwrap();
            b.build()
        })
}
