use pretty_assertions::assert_eq;
use sarsgraph_core::{
    check_governance, find_path, find_path_to_domain, Domain, EdgeKind, Graph, GraphRegistry,
    GovernanceRule, MetricsReport, NodeId, SarsGraphConfig,
};
use sarsgraph_test_utils::{
    chain_graph, governance_graph, node, omicron_ba5_trace, paxlovid_trace, reference_rd_curve,
    sample_graph, sample_root,
};
use std::fs::File;
use std::io::{BufReader, BufWriter};

fn ids(path: &[NodeId]) -> Vec<&str> {
    path.iter().map(NodeId::as_str).collect()
}

#[test]
fn chain_path_is_a_b_c() {
    let graph = chain_graph();
    let path = find_path(&graph, &"A".into(), &"C".into()).unwrap().unwrap();
    assert_eq!(ids(&path), vec!["A", "B", "C"]);
}

#[test]
fn sample_graph_statistics() {
    let stats = sample_graph().statistics();
    assert_eq!(stats.total_nodes, 5);
    assert_eq!(stats.domains_covered, 5);
    assert_eq!(stats.total_edges, 4);
    assert_eq!(stats.edges_per_kind[&EdgeKind::Causal], 2);
    assert_eq!(stats.edges_per_kind[&EdgeKind::Correlative], 2);
    assert_eq!(stats.cross_domain_edges, 4);
    assert_eq!(stats.trace_count, 2);
    assert_eq!(stats.evidence_per_domain[&Domain::Genomics], 18);
}

#[test]
fn sample_traces_match_expectations() {
    let omicron = omicron_ba5_trace().summary();
    assert_eq!(omicron.total_steps, 4);
    assert_eq!(omicron.unique_hypotheses, 4);
    assert!((omicron.diversity_score - 1.0).abs() < 1e-12);
    assert_eq!(omicron.cross_domain_jumps, 3);
    assert_eq!(omicron.total_evidence, 41);

    let paxlovid = paxlovid_trace().summary();
    assert_eq!(paxlovid.unique_hypotheses, 1);
    assert_eq!(paxlovid.diversity_score, 0.0);
    assert!((paxlovid.branching_factor - 3.0).abs() < 1e-12);
    // Steps 2 and 3 touch the same domains
    assert_eq!(paxlovid.cross_domain_jumps, 1);

    let report = MetricsReport::compute(&sample_graph());
    assert!((report.avg_trace_diversity - 0.5).abs() < 1e-12);
}

#[test]
fn treatment_reaches_genomics_through_shared_neighbors() {
    let graph = sample_graph();
    let path = find_path_to_domain(&graph, &"paxlovid".into(), Domain::Genomics)
        .unwrap()
        .unwrap();
    // paxlovid → masks → spike → ba5
    assert_eq!(ids(&path), vec!["paxlovid", "masks", "spike", "ba5"]);
}

#[test]
fn governance_example() {
    let rule = GovernanceRule::from_pairs([(Domain::Genomics, 10), (Domain::Virology, 10)]).unwrap();
    let result = check_governance(&governance_graph(), &rule);
    assert!(!result.passed);
    assert_eq!(result.failing_domains.len(), 1);
    let shortfall = result.failing_domains[0];
    assert_eq!(
        (shortfall.domain, shortfall.required, shortfall.actual),
        (Domain::Genomics, 10, 8)
    );
}

#[test]
fn default_config_rule_passes_sample_graph() {
    let rule = SarsGraphConfig::default().governance_rule().unwrap();
    let result = rule.check(&sample_graph());
    assert!(result.passed, "{}", result.reason);
}

#[test]
fn reference_curve_knee() {
    let curve = reference_rd_curve();
    assert_eq!(curve.knee().rate, 10);
    assert_eq!(
        curve.recommendation(),
        "Use batch size 10 for optimal coverage/quality"
    );
}

#[test]
fn export_file_round_trip() {
    let graph = sample_graph();
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("graph.json");

    graph
        .write_json(BufWriter::new(File::create(&path).unwrap()))
        .unwrap();
    let restored = Graph::read_json(BufReader::new(File::open(&path).unwrap())).unwrap();

    assert_eq!(restored, graph);
    assert_eq!(restored.built_at(), graph.built_at());
    assert_eq!(restored.citations(), graph.citations());
}

#[test]
fn provenance_lists_every_edge() {
    let graph = sample_graph();
    let provenance = graph.provenance();
    assert_eq!(provenance.len(), 4);
    assert_eq!(provenance[0].evidence, vec!["doi:10.1038/s41586-022-04980-y".to_string()]);
    assert_eq!(graph.citations().len(), 4);
}

#[test]
fn registry_publishes_shared_graph() {
    let registry = GraphRegistry::new();
    let id = registry.open(sample_root());
    registry
        .with_draft(id, |b| {
            b.add_node(node("spike", Domain::Virology, 3, 0.9))?;
            b.add_trace(omicron_ba5_trace())
        })
        .unwrap();

    let graph = registry.publish(id).unwrap();
    assert_eq!(graph.node_count(), 1);
    assert_eq!(graph.traces().len(), 1);
    assert!(registry.get(id).is_some());
}
