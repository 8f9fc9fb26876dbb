//! Subcommand implementations
//!
//! Each command writes to the given sink, plain text by default or
//! pretty-printed JSON when `json` is set.

use anyhow::{Context, Result};
use sarsgraph_core::{
    Domain, Graph, GovernanceRule, MetricsReport, NodeId, PathFinder, RateDistortionCurve,
};
use serde::Serialize;
use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::path::Path;

/// Where a path search stops
#[derive(Debug, Clone)]
pub(crate) enum PathTarget {
    /// A specific node
    Node(NodeId),
    /// Any node in a domain
    Domain(Domain),
}

fn print_json<T: Serialize + ?Sized>(out: &mut dyn Write, value: &T) -> Result<()> {
    serde_json::to_writer_pretty(&mut *out, value)?;
    writeln!(out)?;
    Ok(())
}

/// Read an exported graph, re-validating it
pub(crate) fn load_graph(path: &Path) -> Result<Graph> {
    let file = File::open(path).with_context(|| format!("cannot open {}", path.display()))?;
    let graph = Graph::read_json(BufReader::new(file))
        .with_context(|| format!("cannot import {}", path.display()))?;
    tracing::debug!(path = %path.display(), nodes = graph.node_count(), "graph loaded");
    Ok(graph)
}

/// Export `graph` to `path`, or to `out` when no path is given
pub(crate) fn export(graph: &Graph, path: Option<&Path>, out: &mut dyn Write) -> Result<()> {
    match path {
        Some(path) => {
            let file =
                File::create(path).with_context(|| format!("cannot create {}", path.display()))?;
            let mut writer = BufWriter::new(file);
            graph.write_json(&mut writer)?;
            writer.flush()?;
            writeln!(out, "wrote graph {} to {}", graph.id(), path.display())?;
        }
        None => {
            graph.write_json(&mut *out)?;
            writeln!(out)?;
        }
    }
    Ok(())
}

pub(crate) fn stats(graph: &Graph, json: bool, out: &mut dyn Write) -> Result<()> {
    let stats = graph.statistics();
    if json {
        return print_json(out, &stats);
    }

    writeln!(out, "Graph {} ({})", graph.id(), graph.root().name())?;
    writeln!(out, "Total nodes: {}", stats.total_nodes)?;
    for (domain, count) in &stats.nodes_per_domain {
        let evidence = stats.evidence_per_domain.get(domain).copied().unwrap_or(0);
        writeln!(out, "  - {domain}: {count} nodes, {evidence} evidence")?;
    }
    writeln!(out, "Domains covered: {}", stats.domains_covered)?;
    writeln!(out, "Total edges: {}", stats.total_edges)?;
    for (kind, count) in &stats.edges_per_kind {
        writeln!(out, "  - {kind}: {count}")?;
    }
    writeln!(out, "Cross-domain edges: {}", stats.cross_domain_edges)?;
    writeln!(
        out,
        "Average edge confidence: {:.2}",
        stats.average_edge_confidence
    )?;
    if !stats.nodes_per_intent.is_empty() {
        writeln!(out, "Intents:")?;
        for (intent, count) in &stats.nodes_per_intent {
            writeln!(out, "  - {intent}: {count} nodes")?;
        }
    }
    writeln!(out, "Hypothesis paths: {}", stats.hypothesis_paths)?;
    writeln!(out, "Serendipity traces: {}", stats.trace_count)?;
    Ok(())
}

pub(crate) fn traces(graph: &Graph, json: bool, out: &mut dyn Write) -> Result<()> {
    let report = MetricsReport::compute(graph);
    if json {
        return print_json(out, &report);
    }

    for trace in &report.traces {
        writeln!(out, "{}: {}", trace.session_id, trace.question)?;
        writeln!(
            out,
            "  steps={} hypotheses={} branching={:.2} diversity={:.2}",
            trace.total_steps, trace.unique_hypotheses, trace.branching_factor, trace.diversity_score
        )?;
        writeln!(
            out,
            "  cross-domain jumps={} evidence={} avg confidence={:.2}",
            trace.cross_domain_jumps, trace.total_evidence, trace.avg_confidence
        )?;
    }
    writeln!(out, "Avg trace diversity: {:.2}", report.avg_trace_diversity)?;
    Ok(())
}

pub(crate) fn provenance(graph: &Graph, json: bool, out: &mut dyn Write) -> Result<()> {
    let entries = graph.provenance();
    if json {
        return print_json(out, &entries);
    }

    for entry in &entries {
        writeln!(
            out,
            "{} -[{}]-> {}: {}",
            entry.source, entry.kind, entry.target, entry.relationship
        )?;
        for reference in &entry.evidence {
            writeln!(out, "    {reference}")?;
        }
    }
    writeln!(out, "{} distinct citations", graph.citations().len())?;
    Ok(())
}

pub(crate) fn path(
    graph: &Graph,
    from: &NodeId,
    target: &PathTarget,
    json: bool,
    out: &mut dyn Write,
) -> Result<()> {
    let finder = PathFinder::new(graph);
    let found = match target {
        PathTarget::Node(to) => finder.find_path(from, to)?,
        PathTarget::Domain(domain) => finder.find_path_to_domain(from, *domain)?,
    };

    if json {
        return print_json(out, &serde_json::json!({ "path": found }));
    }
    match found {
        Some(path) => {
            let hops: Vec<&str> = path.iter().map(NodeId::as_str).collect();
            writeln!(out, "{}", hops.join(" -> "))?;
        }
        None => writeln!(out, "no path")?,
    }
    Ok(())
}

/// Returns whether the check passed
pub(crate) fn governance(
    graph: &Graph,
    rule: &GovernanceRule,
    json: bool,
    out: &mut dyn Write,
) -> Result<bool> {
    let result = rule.check(graph);
    if json {
        print_json(
            out,
            &serde_json::json!({ "label": result.label(), "result": &result }),
        )?;
        return Ok(result.passed);
    }

    writeln!(out, "[{}] {}", result.label(), result.reason)?;
    for shortfall in &result.failing_domains {
        writeln!(
            out,
            "  - {}: {} < {}",
            shortfall.domain, shortfall.actual, shortfall.required
        )?;
    }
    Ok(result.passed)
}

pub(crate) fn rd(
    batch_sizes: &[u32],
    distortions: &[f64],
    json: bool,
    out: &mut dyn Write,
) -> Result<()> {
    let curve = RateDistortionCurve::from_measurements(batch_sizes, distortions)?;
    if json {
        return print_json(
            out,
            &serde_json::json!({ "curve": &curve, "recommendation": curve.recommendation() }),
        );
    }

    for point in curve.points() {
        let marker = if *point == curve.knee() { " <- knee" } else { "" };
        writeln!(out, "{:>6}  {:.3}{marker}", point.rate, point.distortion)?;
    }
    writeln!(out, "{}", curve.recommendation())?;
    Ok(())
}
